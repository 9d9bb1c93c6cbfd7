//! Configuration for leadsync
//!
//! Locations of the identity mapping and of the two local tracker snapshots,
//! resolved from layered config files.

mod resolver;

pub use resolver::{ConfigFile, ConfigResolver, PathsSection, SyncConfig};
