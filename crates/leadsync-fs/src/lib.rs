//! Filesystem primitives for leadsync
//!
//! Provides normalized path handling, crash-safe atomic writes and
//! format-agnostic loading of configuration and snapshot files.

pub mod config;
pub mod error;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use error::{Error, Result};
pub use path::NormalizedPath;
