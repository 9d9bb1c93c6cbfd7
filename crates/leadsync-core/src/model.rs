//! Records exchanged with the two trackers

use crate::status::{LeadStatus, WorkList};
use crate::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Back-reference written at the top of every card the engine creates.
static LEAD_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Lead ID:\s*([A-Za-z0-9_-]+)").expect("lead reference pattern is valid")
});

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id!(
    /// Identifier assigned by the lead tracker
    LeadId
);
string_id!(
    /// Identifier assigned by the work tracker
    CardId
);

/// Which side of the sync an identifier belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Lead,
    Card,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Lead => f.write_str("lead"),
            EntityKind::Card => f.write_str("card"),
        }
    }
}

/// A row in the lead tracker
///
/// `status` is kept as the tracker stores it so that rows with a status
/// outside the known set can still be read and reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub id: LeadId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub status: String,
    #[serde(default)]
    pub source: String,
    /// Backup pointer to the counterpart card
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_card_id: Option<CardId>,
}

impl Lead {
    pub fn parsed_status(&self) -> Result<LeadStatus> {
        self.status.parse()
    }

    /// Title used for the card created for this lead.
    pub fn card_title(&self) -> String {
        let name = self.name.trim();
        if name.is_empty() {
            format!("Lead {}", self.id)
        } else {
            name.to_string()
        }
    }
}

/// Lead data submitted for creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLead {
    pub name: String,
    pub email: String,
    pub status: String,
    #[serde(default)]
    pub source: String,
}

impl NewLead {
    /// Check required fields and the status value.
    ///
    /// # Errors
    ///
    /// `Error::InvalidLead` for a blank required field, `Error::UnknownStatus`
    /// for a status outside the known set.
    pub fn validate(&self) -> Result<LeadStatus> {
        for (field, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("status", &self.status),
        ] {
            if value.trim().is_empty() {
                return Err(Error::InvalidLead {
                    message: format!("missing required field: {}", field),
                });
            }
        }
        self.status.parse()
    }
}

/// A card on the work board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// List name as reported by the board
    pub list: String,
    /// Archived cards count as deleted for the engine
    #[serde(default)]
    pub archived: bool,
}

impl Card {
    pub fn parsed_list(&self) -> Result<WorkList> {
        self.list.parse()
    }

    pub fn is_live(&self) -> bool {
        !self.archived
    }

    /// Lead id recorded in the description by the engine at creation.
    pub fn lead_ref(&self) -> Option<LeadId> {
        LEAD_REF
            .captures(&self.description)
            .and_then(|caps| caps.get(1))
            .map(|m| LeadId::new(m.as_str()))
    }
}

/// Card data submitted for creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCard {
    pub title: String,
    pub description: String,
    pub list: WorkList,
}

impl NewCard {
    /// Card for `lead`, carrying the lead back-reference in its description.
    pub fn for_lead(lead: &Lead, list: WorkList) -> Self {
        let mut description = format!("Lead ID: {}", lead.id);
        for (label, value) in [("Email", &lead.email), ("Source", &lead.source)] {
            if !value.trim().is_empty() {
                description.push_str(&format!("\n{}: {}", label, value.trim()));
            }
        }

        Self {
            title: lead.card_title(),
            description,
            list,
        }
    }
}
