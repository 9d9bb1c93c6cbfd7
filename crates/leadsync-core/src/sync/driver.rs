//! SyncDriver: run modes over the reconciliation engine

use leadsync_fs::NormalizedPath;
use tracing::info;

use crate::Result;
use crate::identity::IdentityStore;
use crate::model::{CardId, LeadId};
use crate::ports::{LeadTracker, WorkTracker};

use super::check::CheckReport;
use super::engine::{ConflictPolicy, Direction, ReconciliationEngine};
use super::report::{Pass, SyncReport};

/// Pass order of a full bidirectional sync.
///
/// Pruning runs before the status passes so they never touch stale pairs,
/// and push-status runs last so lead status wins any conflict.
pub const FULL_SYNC_ORDER: [Pass; 5] = [
    Pass::CreateMissing,
    Pass::PruneDeletedCards,
    Pass::PruneDeletedLeads,
    Pass::PullStatus,
    Pass::PushStatus,
];

const LEADS_TO_CARDS: [Pass; 2] = [Pass::CreateMissing, Pass::PushStatus];
const CARDS_TO_LEADS: [Pass; 1] = [Pass::PullStatus];
const PRUNE: [Pass; 2] = [Pass::PruneDeletedCards, Pass::PruneDeletedLeads];

/// What a driver run should do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncMode {
    /// All five passes in [`FULL_SYNC_ORDER`]
    Full,
    /// Create missing cards, then push lead status to cards
    LeadsToCards,
    /// Pull card lists into lead status
    CardsToLeads,
    /// Both deletion passes
    Prune,
    /// One pair, found by lead id
    Lead { id: LeadId, direction: Direction },
    /// One pair, found by card id
    Card { id: CardId, direction: Direction },
}

impl SyncMode {
    /// Bulk passes this mode runs, in order. Empty for single-item modes.
    pub fn passes(&self) -> &'static [Pass] {
        match self {
            SyncMode::Full => &FULL_SYNC_ORDER,
            SyncMode::LeadsToCards => &LEADS_TO_CARDS,
            SyncMode::CardsToLeads => &CARDS_TO_LEADS,
            SyncMode::Prune => &PRUNE,
            SyncMode::Lead { .. } | SyncMode::Card { .. } => &[],
        }
    }
}

/// Owns the engine and the location of the identity mapping
pub struct SyncDriver<L, W> {
    engine: ReconciliationEngine<L, W>,
    mapping_path: NormalizedPath,
}

impl<L: LeadTracker, W: WorkTracker> SyncDriver<L, W> {
    pub fn new(engine: ReconciliationEngine<L, W>, mapping_path: NormalizedPath) -> Self {
        Self {
            engine,
            mapping_path,
        }
    }

    pub fn engine(&self) -> &ReconciliationEngine<L, W> {
        &self.engine
    }

    pub fn into_engine(self) -> ReconciliationEngine<L, W> {
        self.engine
    }

    pub fn mapping_path(&self) -> &NormalizedPath {
        &self.mapping_path
    }

    /// Load the identity mapping from disk.
    pub fn load_store(&self) -> Result<IdentityStore> {
        IdentityStore::load(self.mapping_path.clone())
    }

    /// Load the mapping and run `mode` against it.
    ///
    /// # Errors
    ///
    /// Fails if the mapping cannot be loaded or a pass aborts. A failed pass
    /// stops the run; passes already completed keep their effects.
    pub fn run(&mut self, mode: SyncMode) -> Result<SyncReport> {
        let mut store = self.load_store()?;
        self.run_with_store(&mut store, mode)
    }

    /// Run `mode` against an already loaded mapping.
    pub fn run_with_store(&mut self, store: &mut IdentityStore, mode: SyncMode) -> Result<SyncReport> {
        let mut report = SyncReport::new(self.engine.options().dry_run);
        info!(?mode, dry_run = report.dry_run, "Starting sync run");

        match &mode {
            SyncMode::Lead { id, direction } => {
                report.push(self.engine.sync_lead(store, id, *direction)?);
            }
            SyncMode::Card { id, direction } => {
                report.push(self.engine.sync_card(store, id, *direction)?);
            }
            SyncMode::Full => {
                for &pass in &FULL_SYNC_ORDER {
                    let summary = match pass {
                        Pass::PullStatus => self
                            .engine
                            .pull_status_with(store, ConflictPolicy::DeferToPush)?,
                        other => self.engine.run_pass(store, other)?,
                    };
                    report.push(summary);
                }
            }
            bulk => {
                for &pass in bulk.passes() {
                    report.push(self.engine.run_pass(store, pass)?);
                }
            }
        }

        info!(
            mutations = report.mutations(),
            failed = report.failed(),
            "Sync run complete"
        );
        Ok(report)
    }

    /// Drift check against the mapping on disk.
    ///
    /// A mapping that cannot be loaded yields a `Broken` report instead of
    /// an error.
    pub fn check(&self) -> Result<CheckReport> {
        let store = match self.load_store() {
            Ok(store) => store,
            Err(e) => return Ok(CheckReport::broken(format!("Failed to load mapping: {}", e))),
        };
        self.engine.check(&store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_order_prunes_before_status_and_pushes_last() {
        let position = |pass| FULL_SYNC_ORDER.iter().position(|p| *p == pass).unwrap();

        assert_eq!(FULL_SYNC_ORDER[0], Pass::CreateMissing);
        assert!(position(Pass::PruneDeletedCards) < position(Pass::PullStatus));
        assert!(position(Pass::PruneDeletedLeads) < position(Pass::PullStatus));
        assert!(position(Pass::PullStatus) < position(Pass::PushStatus));
        assert_eq!(FULL_SYNC_ORDER[4], Pass::PushStatus);
    }

    #[test]
    fn single_item_modes_have_no_bulk_passes() {
        let mode = SyncMode::Lead {
            id: LeadId::new("1"),
            direction: Direction::Push,
        };
        assert!(mode.passes().is_empty());
        assert_eq!(SyncMode::Prune.passes(), &PRUNE);
    }
}
