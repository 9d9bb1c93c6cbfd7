//! Shared test utilities for the leadsync workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`fakes`]: in-memory trackers with failure injection
//! - [`fixtures`]: terse constructors for leads and cards
//! - [`workspace`]: [`TestWorkspace`] builder for file-backed scenarios

pub mod fakes;
pub mod fixtures;
pub mod workspace;

pub use fakes::{FakeLeadTracker, FakeWorkTracker};
pub use fixtures::{card, lead, linked_lead};
pub use workspace::TestWorkspace;
