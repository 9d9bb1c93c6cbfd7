//! Reconciliation engine for leadsync
//!
//! Keeps a lead tracker (rows with a status) and a work tracker (cards placed
//! in lists) converged without either side knowing about the other:
//!
//! - **StatusMap**: fixed bijection between lead statuses and work lists
//! - **IdentityStore**: persisted bidirectional lead ↔ card mapping
//! - **Ports**: `LeadTracker` / `WorkTracker` capability traits
//! - **ReconciliationEngine**: the five convergence passes, single-item sync and drift check
//! - **SyncDriver**: picks passes per run mode and aggregates a `SyncReport`
//!
//! # Architecture
//!
//! ```text
//!                 leadsync-cli
//!                      |
//!                leadsync-core
//!        +-------------+--------------+
//!        |             |              |
//!   SyncDriver   IdentityStore   local trackers
//!        |             |              |
//!        +------ leadsync-fs ---------+
//! ```
//!
//! # Example
//!
//! ```ignore
//! use leadsync_core::{ReconciliationEngine, SyncDriver, SyncMode, SyncOptions};
//!
//! let engine = ReconciliationEngine::new(leads, cards, SyncOptions::default());
//! let mut driver = SyncDriver::new(engine, mapping_path);
//! let report = driver.run(SyncMode::Full)?;
//! println!("{} mutations", report.mutations());
//! ```

pub mod config;
pub mod error;
pub mod identity;
pub mod local;
pub mod model;
pub mod ports;
pub mod status;
pub mod sync;

pub use config::{ConfigResolver, SyncConfig};
pub use error::{Error, Result};
pub use identity::{IdentityMapping, IdentityStore};
pub use local::{LocalLeadTracker, LocalWorkTracker};
pub use model::{Card, CardId, EntityKind, Lead, LeadId, NewCard, NewLead};
pub use ports::{LeadTracker, TrackerError, TrackerResult, WorkTracker};
pub use status::{LeadStatus, StatusMap, WorkList};
pub use sync::{
    CheckReport, CheckStatus, ConflictPolicy, Direction, DriftItem, FULL_SYNC_ORDER, ItemFailure,
    Pass, PassSummary, ReconciliationEngine, SyncDriver, SyncMode, SyncOptions, SyncReport,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_unknown_status_displays_value() {
        let error = Error::UnknownStatus {
            value: "PENDING".to_string(),
        };

        let display = format!("{}", error);
        assert!(
            display.contains("PENDING"),
            "Error display should contain the value, got: {}",
            display
        );
    }
}
