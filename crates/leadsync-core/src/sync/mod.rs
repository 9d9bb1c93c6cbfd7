//! Reconciliation between the lead tracker and the work tracker
//!
//! This module provides:
//! - **engine**: the five convergence passes, single-item sync and drift check
//! - **driver**: run modes and the fixed full-sync pass order
//! - **report**: per-pass summaries and the aggregated run report
//! - **check**: read-only drift reporting

mod check;
mod driver;
mod engine;
mod report;

pub use check::{CheckReport, CheckStatus, DriftItem};
pub use driver::{FULL_SYNC_ORDER, SyncDriver, SyncMode};
pub use engine::{ConflictPolicy, Direction, ReconciliationEngine, SyncOptions};
pub use report::{ItemFailure, Pass, PassSummary, SyncReport};
