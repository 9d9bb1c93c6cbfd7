//! Configuration resolution with layered overrides
//!
//! The `ConfigResolver` loads configuration from multiple sources in a
//! defined hierarchy, with later sources overriding earlier ones.

use std::path::PathBuf;

use leadsync_fs::{ConfigStore, NormalizedPath};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Directory holding workspace state and config
pub const STATE_DIR: &str = ".leadsync";

const DEFAULT_MAPPING: &str = ".leadsync/mapping.json";
const DEFAULT_LEADS: &str = ".leadsync/leads.json";
const DEFAULT_CARDS: &str = ".leadsync/cards.json";

/// `[paths]` table of a config file; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsSection {
    pub mapping: Option<String>,
    pub leads: Option<String>,
    pub cards: Option<String>,
}

/// One layer of configuration as written on disk
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub paths: PathsSection,
}

impl ConfigFile {
    /// Overlay `other` on top of this layer.
    fn merge(&mut self, other: &ConfigFile) {
        if other.paths.mapping.is_some() {
            self.paths.mapping = other.paths.mapping.clone();
        }
        if other.paths.leads.is_some() {
            self.paths.leads = other.paths.leads.clone();
        }
        if other.paths.cards.is_some() {
            self.paths.cards = other.paths.cards.clone();
        }
    }
}

/// The effective configuration after merging all layers
///
/// Every path is resolved against the workspace root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub root: NormalizedPath,
    /// Identity mapping file
    pub mapping: NormalizedPath,
    /// Local lead tracker snapshot
    pub leads: NormalizedPath,
    /// Local work tracker snapshot
    pub cards: NormalizedPath,
}

impl SyncConfig {
    /// Built-in defaults under `<root>/.leadsync/`
    pub fn defaults(root: NormalizedPath) -> Self {
        Self::from_file(root, &ConfigFile::default())
    }

    fn from_file(root: NormalizedPath, file: &ConfigFile) -> Self {
        let resolve = |value: &Option<String>, default: &str| {
            NormalizedPath::new(value.as_deref().unwrap_or(default)).resolve_against(&root)
        };
        Self {
            mapping: resolve(&file.paths.mapping, DEFAULT_MAPPING),
            leads: resolve(&file.paths.leads, DEFAULT_LEADS),
            cards: resolve(&file.paths.cards, DEFAULT_CARDS),
            root,
        }
    }
}

/// Resolves configuration by merging multiple sources
///
/// Configuration is loaded from a hierarchy of sources:
/// 1. Built-in defaults (`.leadsync/` under the workspace root)
/// 2. Global config (`<config_dir>/leadsync/config.toml`)
/// 3. Workspace config (`.leadsync/config.toml`)
/// 4. An explicit file given on the command line
///
/// Later sources override earlier ones key by key.
pub struct ConfigResolver {
    root: NormalizedPath,
    /// Override for the global config directory (used for testing).
    /// When `None`, `dirs::config_dir()` is used.
    global_config_dir_override: Option<PathBuf>,
    explicit: Option<NormalizedPath>,
}

impl ConfigResolver {
    pub fn new(root: NormalizedPath) -> Self {
        Self {
            root,
            global_config_dir_override: None,
            explicit: None,
        }
    }

    /// Use a custom global config directory instead of the platform one.
    pub fn with_global_config_dir(mut self, dir: PathBuf) -> Self {
        self.global_config_dir_override = Some(dir);
        self
    }

    /// Add an explicit config file as the last layer. It must exist.
    pub fn with_explicit_file(mut self, path: NormalizedPath) -> Self {
        self.explicit = Some(path);
        self
    }

    fn global_config_dir(&self) -> Option<PathBuf> {
        if let Some(ref override_dir) = self.global_config_dir_override {
            return Some(override_dir.clone());
        }
        dirs::config_dir().map(|d| d.join("leadsync"))
    }

    /// Path of the workspace config layer
    pub fn workspace_config_path(&self) -> NormalizedPath {
        self.root.join(STATE_DIR).join("config.toml")
    }

    /// Resolve the configuration by merging all layers.
    ///
    /// Missing optional layers are skipped. Invalid content in any layer, or a
    /// missing explicit file, produces an error.
    pub fn resolve(&self) -> Result<SyncConfig> {
        let store = ConfigStore::new();
        let mut merged = ConfigFile::default();

        if let Some(global_dir) = self.global_config_dir() {
            let global_path = NormalizedPath::new(global_dir.join("config.toml"));
            match store.load_optional::<ConfigFile>(&global_path)? {
                Some(layer) => {
                    tracing::debug!(%global_path, "Loading global config");
                    merged.merge(&layer);
                }
                None => tracing::debug!(%global_path, "No global config found - skipping"),
            }
        }

        let workspace_path = self.workspace_config_path();
        if let Some(layer) = store.load_optional::<ConfigFile>(&workspace_path)? {
            tracing::debug!(%workspace_path, "Loading workspace config");
            merged.merge(&layer);
        }

        if let Some(explicit) = &self.explicit {
            let explicit = explicit.resolve_against(&self.root);
            if !explicit.is_file() {
                return Err(Error::Config {
                    message: format!("config file {} does not exist", explicit),
                });
            }
            tracing::debug!(%explicit, "Loading explicit config");
            merged.merge(&store.load::<ConfigFile>(&explicit)?);
        }

        Ok(SyncConfig::from_file(self.root.clone(), &merged))
    }
}
