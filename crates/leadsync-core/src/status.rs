//! Lead status ↔ work list correspondence

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Status of a lead in the lead tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeadStatus {
    New,
    Contacted,
    Qualified,
    Lost,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 4] = [
        LeadStatus::New,
        LeadStatus::Contacted,
        LeadStatus::Qualified,
        LeadStatus::Lost,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "NEW",
            LeadStatus::Contacted => "CONTACTED",
            LeadStatus::Qualified => "QUALIFIED",
            LeadStatus::Lost => "LOST",
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeadStatus {
    type Err = Error;

    /// Parses case-insensitively, ignoring surrounding whitespace.
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_uppercase();
        LeadStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| Error::UnknownStatus {
                value: s.to_string(),
            })
    }
}

/// List a card can occupy on the work board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkList {
    Todo,
    InProgress,
    Done,
    Lost,
}

impl WorkList {
    pub const ALL: [WorkList; 4] = [
        WorkList::Todo,
        WorkList::InProgress,
        WorkList::Done,
        WorkList::Lost,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkList::Todo => "TODO",
            WorkList::InProgress => "IN_PROGRESS",
            WorkList::Done => "DONE",
            WorkList::Lost => "LOST",
        }
    }
}

impl fmt::Display for WorkList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkList {
    type Err = Error;

    /// Parses case-insensitively, ignoring surrounding whitespace.
    /// Lists outside the fixed four (renamed or foreign lists) are rejected.
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_uppercase();
        WorkList::ALL
            .into_iter()
            .find(|list| list.as_str() == normalized)
            .ok_or_else(|| Error::UnknownList {
                value: s.to_string(),
            })
    }
}

/// Static bijection between lead statuses and work lists.
///
/// | status    | list        |
/// |-----------|-------------|
/// | NEW       | TODO        |
/// | CONTACTED | IN_PROGRESS |
/// | QUALIFIED | DONE        |
/// | LOST      | LOST        |
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusMap;

impl StatusMap {
    /// Every (status, list) pair of the bijection.
    pub const PAIRS: [(LeadStatus, WorkList); 4] = [
        (LeadStatus::New, WorkList::Todo),
        (LeadStatus::Contacted, WorkList::InProgress),
        (LeadStatus::Qualified, WorkList::Done),
        (LeadStatus::Lost, WorkList::Lost),
    ];

    pub fn list_for(status: LeadStatus) -> WorkList {
        match status {
            LeadStatus::New => WorkList::Todo,
            LeadStatus::Contacted => WorkList::InProgress,
            LeadStatus::Qualified => WorkList::Done,
            LeadStatus::Lost => WorkList::Lost,
        }
    }

    pub fn status_for(list: WorkList) -> LeadStatus {
        match list {
            WorkList::Todo => LeadStatus::New,
            WorkList::InProgress => LeadStatus::Contacted,
            WorkList::Done => LeadStatus::Qualified,
            WorkList::Lost => LeadStatus::Lost,
        }
    }

    /// Translate raw status text to its list.
    ///
    /// # Errors
    ///
    /// `Error::UnknownStatus` when the text is not a known status.
    pub fn list_for_raw(status: &str) -> Result<WorkList> {
        Ok(Self::list_for(status.parse()?))
    }

    /// Translate a raw list name to its status.
    ///
    /// # Errors
    ///
    /// `Error::UnknownList` when the name is not a known list.
    pub fn status_for_raw(list: &str) -> Result<LeadStatus> {
        Ok(Self::status_for(list.parse()?))
    }
}
