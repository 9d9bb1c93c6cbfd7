//! Workspace resolution
//!
//! Turns the global `--root` / `--config` flags into a resolved
//! configuration and builds the trackers and driver from it.

use std::path::{Path, PathBuf};

use leadsync_core::{
    ConfigResolver, LocalLeadTracker, LocalWorkTracker, ReconciliationEngine, SyncConfig,
    SyncDriver, SyncOptions,
};
use leadsync_fs::NormalizedPath;

use crate::error::Result;

/// Driver over the file-backed trackers
pub type LocalDriver = SyncDriver<LocalLeadTracker, LocalWorkTracker>;

/// A resolved workspace
#[derive(Debug, Clone)]
pub struct Workspace {
    config: SyncConfig,
}

impl Workspace {
    /// Resolve the workspace rooted at `root`, or the current directory.
    pub fn resolve(root: Option<&Path>, config: Option<&Path>) -> Result<Self> {
        let root: PathBuf = match root {
            Some(root) => root.to_path_buf(),
            None => std::env::current_dir()?,
        };

        let mut resolver = ConfigResolver::new(NormalizedPath::new(&root));
        if let Some(config) = config {
            resolver = resolver.with_explicit_file(NormalizedPath::new(config));
        }
        let config = resolver.resolve()?;
        tracing::debug!(
            root = %config.root,
            mapping = %config.mapping,
            leads = %config.leads,
            cards = %config.cards,
            "Resolved workspace"
        );

        Ok(Self { config })
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn lead_tracker(&self) -> LocalLeadTracker {
        LocalLeadTracker::new(self.config.leads.clone())
    }

    pub fn work_tracker(&self) -> LocalWorkTracker {
        LocalWorkTracker::new(self.config.cards.clone())
    }

    pub fn driver(&self, dry_run: bool) -> LocalDriver {
        let engine = ReconciliationEngine::new(
            self.lead_tracker(),
            self.work_tracker(),
            SyncOptions { dry_run },
        );
        SyncDriver::new(engine, self.config.mapping.clone())
    }
}
