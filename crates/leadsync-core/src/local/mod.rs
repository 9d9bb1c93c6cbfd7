//! File-backed trackers
//!
//! Each tracker keeps its records in a JSON array on disk, re-reads the file
//! on every call and writes it back atomically. Edits made by other programs
//! between polls are therefore observed exactly like changes on a remote
//! tracker would be.
//!
//! A missing file lists as empty, but lookups by id fail as unavailable: an
//! absent store says nothing about whether a given record was deleted.

mod cards;
mod leads;

pub use cards::LocalWorkTracker;
pub use leads::LocalLeadTracker;

use crate::ports::TrackerError;
use leadsync_fs::{ConfigStore, NormalizedPath};
use serde::{Serialize, de::DeserializeOwned};

fn read_records<T: DeserializeOwned>(
    tracker: &'static str,
    path: &NormalizedPath,
) -> Result<Vec<T>, TrackerError> {
    ConfigStore::new()
        .load_optional::<Vec<T>>(path)
        .map(Option::unwrap_or_default)
        .map_err(|e| TrackerError::unavailable(tracker, e))
}

/// Records for a lookup by id; a missing file is `Unavailable`, not empty.
fn read_existing_records<T: DeserializeOwned>(
    tracker: &'static str,
    path: &NormalizedPath,
) -> Result<Vec<T>, TrackerError> {
    ConfigStore::new()
        .load_optional::<Vec<T>>(path)
        .map_err(|e| TrackerError::unavailable(tracker, e))?
        .ok_or_else(|| TrackerError::unavailable(tracker, format!("{} does not exist", path)))
}

fn write_records<T: Serialize>(
    tracker: &'static str,
    path: &NormalizedPath,
    records: &[T],
) -> Result<(), TrackerError> {
    ConfigStore::new()
        .save(path, &records)
        .map_err(|e| TrackerError::unavailable(tracker, e))
}
