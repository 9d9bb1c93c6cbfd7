//! [`TestWorkspace`] builder for file-backed scenarios.

use std::fs;
use std::path::Path;

use leadsync_core::{Card, IdentityStore, Lead, SyncConfig};
use leadsync_fs::NormalizedPath;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::TempDir;

/// A temporary workspace laid out like a real one: snapshots and the
/// identity mapping under `.leadsync/`.
///
/// # Example
///
/// ```rust,no_run
/// use leadsync_test_utils::{TestWorkspace, lead};
///
/// let ws = TestWorkspace::new().with_leads(&[lead("1", "NEW")]);
/// ws.assert_file_exists(".leadsync/leads.json");
/// ```
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorkspace {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join(".leadsync")).unwrap();
        Self { temp_dir }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Default configuration for this workspace
    pub fn config(&self) -> SyncConfig {
        SyncConfig::defaults(NormalizedPath::new(self.root()))
    }

    pub fn with_leads(self, leads: &[Lead]) -> Self {
        self.write_leads(leads);
        self
    }

    pub fn with_cards(self, cards: &[Card]) -> Self {
        self.write_cards(cards);
        self
    }

    /// Write `.leadsync/config.toml`.
    pub fn with_config(self, toml: &str) -> Self {
        fs::write(self.root().join(".leadsync/config.toml"), toml).unwrap();
        self
    }

    pub fn write_leads(&self, leads: &[Lead]) {
        write_json(&self.config().leads.to_native(), leads);
    }

    pub fn write_cards(&self, cards: &[Card]) {
        write_json(&self.config().cards.to_native(), cards);
    }

    pub fn read_leads(&self) -> Vec<Lead> {
        read_json(&self.config().leads.to_native())
    }

    pub fn read_cards(&self) -> Vec<Card> {
        read_json(&self.config().cards.to_native())
    }

    pub fn lead(&self, id: &str) -> Option<Lead> {
        self.read_leads().into_iter().find(|l| l.id.as_str() == id)
    }

    /// The identity mapping as currently persisted
    pub fn mapping(&self) -> IdentityStore {
        IdentityStore::load(self.config().mapping).unwrap()
    }

    /// Assert that `path` (relative to the workspace root) exists.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) {
    fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
}

fn read_json<T: DeserializeOwned>(path: &Path) -> T {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|_| panic!("Could not read file: {}", path.display()));
    serde_json::from_str(&content).unwrap()
}
