//! Outcome reporting for passes and runs

use serde::{Deserialize, Serialize};
use std::fmt;

/// One reconciliation step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Pass {
    /// Leads → cards: create cards for unmapped leads
    CreateMissing,
    /// Cards gone → delete their leads
    PruneDeletedCards,
    /// Leads gone → archive their cards
    PruneDeletedLeads,
    /// Cards → leads: copy list placement into lead status
    PullStatus,
    /// Leads → cards: move cards to the list matching lead status
    PushStatus,
}

impl Pass {
    pub fn name(&self) -> &'static str {
        match self {
            Pass::CreateMissing => "create-missing",
            Pass::PruneDeletedCards => "prune-deleted-cards",
            Pass::PruneDeletedLeads => "prune-deleted-leads",
            Pass::PullStatus => "pull-status",
            Pass::PushStatus => "push-status",
        }
    }
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single lead or card a pass could not process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFailure {
    /// The lead id, card id, or `lead/card` pair
    pub item: String,
    pub message: String,
}

/// What happened to one item inside a pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Outcome {
    Created(String),
    Updated(String),
    Deleted(String),
    Repaired(String),
    Skipped,
}

/// Counts and actions of one pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassSummary {
    pub pass: Pass,
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    /// Mappings recovered from a lead's or card's back-reference
    pub repaired: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Human-readable description of every mutation
    pub actions: Vec<String>,
    pub failures: Vec<ItemFailure>,
}

impl PassSummary {
    pub fn new(pass: Pass) -> Self {
        Self {
            pass,
            created: 0,
            updated: 0,
            deleted: 0,
            repaired: 0,
            skipped: 0,
            failed: 0,
            actions: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Number of changes made (or planned, in a dry run)
    pub fn mutations(&self) -> usize {
        self.created + self.updated + self.deleted + self.repaired
    }

    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }

    pub(crate) fn record(&mut self, outcome: Outcome) {
        let action = match outcome {
            Outcome::Created(action) => {
                self.created += 1;
                action
            }
            Outcome::Updated(action) => {
                self.updated += 1;
                action
            }
            Outcome::Deleted(action) => {
                self.deleted += 1;
                action
            }
            Outcome::Repaired(action) => {
                self.repaired += 1;
                action
            }
            Outcome::Skipped => {
                self.skipped += 1;
                return;
            }
        };
        self.actions.push(action);
    }

    pub(crate) fn record_failure(&mut self, item: impl Into<String>, error: &crate::Error) {
        self.failed += 1;
        self.failures.push(ItemFailure {
            item: item.into(),
            message: error.to_string(),
        });
    }
}

/// Aggregated outcome of a driver run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    pub dry_run: bool,
    pub passes: Vec<PassSummary>,
}

impl SyncReport {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            passes: Vec::new(),
        }
    }

    pub fn push(&mut self, summary: PassSummary) {
        self.passes.push(summary);
    }

    /// Summary of `pass`, if it ran
    pub fn pass(&self, pass: Pass) -> Option<&PassSummary> {
        self.passes.iter().find(|s| s.pass == pass)
    }

    /// Whether every item of every pass was processed
    pub fn success(&self) -> bool {
        self.passes.iter().all(PassSummary::is_clean)
    }

    pub fn created(&self) -> usize {
        self.sum(|s| s.created)
    }

    pub fn updated(&self) -> usize {
        self.sum(|s| s.updated)
    }

    pub fn deleted(&self) -> usize {
        self.sum(|s| s.deleted)
    }

    pub fn repaired(&self) -> usize {
        self.sum(|s| s.repaired)
    }

    pub fn skipped(&self) -> usize {
        self.sum(|s| s.skipped)
    }

    pub fn failed(&self) -> usize {
        self.sum(|s| s.failed)
    }

    pub fn mutations(&self) -> usize {
        self.sum(PassSummary::mutations)
    }

    pub fn actions(&self) -> impl Iterator<Item = &str> {
        self.passes
            .iter()
            .flat_map(|s| s.actions.iter().map(String::as_str))
    }

    pub fn failures(&self) -> impl Iterator<Item = &ItemFailure> {
        self.passes.iter().flat_map(|s| s.failures.iter())
    }

    fn sum(&self, f: impl Fn(&PassSummary) -> usize) -> usize {
        self.passes.iter().map(f).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_are_counted_but_not_listed() {
        let mut summary = PassSummary::new(Pass::PushStatus);
        summary.record(Outcome::Skipped);
        summary.record(Outcome::Updated("Moved card c1 TODO -> DONE".to_string()));

        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.actions, vec!["Moved card c1 TODO -> DONE".to_string()]);
        assert_eq!(summary.mutations(), 1);
    }

    #[test]
    fn report_totals_span_passes() {
        let mut first = PassSummary::new(Pass::CreateMissing);
        first.record(Outcome::Created("Created card".to_string()));
        first.record_failure(
            "2",
            &crate::Error::UnknownStatus {
                value: "WARM".to_string(),
            },
        );
        let mut second = PassSummary::new(Pass::PullStatus);
        second.record(Outcome::Updated("Updated lead".to_string()));

        let mut report = SyncReport::new(false);
        report.push(first);
        report.push(second);

        assert_eq!(report.created(), 1);
        assert_eq!(report.updated(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.mutations(), 2);
        assert!(!report.success());
        assert_eq!(report.actions().count(), 2);
        assert_eq!(report.failures().next().unwrap().item, "2");
    }

    #[test]
    fn pass_names_are_kebab_case() {
        assert_eq!(Pass::PruneDeletedCards.to_string(), "prune-deleted-cards");
        assert_eq!(
            serde_json::to_string(&Pass::CreateMissing).unwrap(),
            "\"create-missing\""
        );
    }
}
