//! Slash-normalized paths for snapshot and mapping files

use std::fmt;
use std::path::{Path, PathBuf};

/// Path stored with forward slashes regardless of platform.
///
/// Config files may be written on Windows and read on Unix (or the other way
/// round), so paths taken from them keep a single separator and only become
/// a `PathBuf` when a file is actually opened.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedPath(String);

impl NormalizedPath {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self(path.as_ref().to_string_lossy().replace('\\', "/"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Native form for filesystem calls.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.0)
    }

    /// Append `segment`, inserting a single separator.
    pub fn join(&self, segment: &str) -> Self {
        let segment = segment.replace('\\', "/");
        match self.0.as_str() {
            "" => Self(segment),
            base if base.ends_with('/') => Self(base.to_string() + &segment),
            base => Self(format!("{base}/{segment}")),
        }
    }

    /// True for a leading `/` or anything the platform treats as absolute
    /// (drive letters on Windows).
    pub fn is_absolute(&self) -> bool {
        self.0.starts_with('/') || Path::new(&self.0).is_absolute()
    }

    /// Relative paths hang off `root`; absolute ones are kept.
    pub fn resolve_against(&self, root: &NormalizedPath) -> Self {
        if self.is_absolute() {
            self.clone()
        } else {
            root.join(&self.0)
        }
    }

    pub fn file_name(&self) -> Option<&str> {
        self.0
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
    }

    /// Text after the last dot of the file name. Dotfiles have none.
    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name()?;
        match name.rfind('.') {
            Some(0) | None => None,
            Some(dot) => Some(&name[dot + 1..]),
        }
    }

    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.0)
    }
}

impl fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backslashes_are_normalized() {
        let path = NormalizedPath::new("state\\leads.json");
        assert_eq!(path.as_str(), "state/leads.json");
    }

    #[test]
    fn join_does_not_double_separators() {
        assert_eq!(NormalizedPath::new("a/").join("b").as_str(), "a/b");
        assert_eq!(NormalizedPath::new("").join("b").as_str(), "b");
    }

    #[test]
    fn relative_paths_resolve_against_root() {
        let root = NormalizedPath::new("/work/space");
        let rel = NormalizedPath::new(".leadsync/mapping.json");
        assert_eq!(
            rel.resolve_against(&root).as_str(),
            "/work/space/.leadsync/mapping.json"
        );

        let abs = NormalizedPath::new("/var/lib/leadsync/mapping.json");
        assert_eq!(abs.resolve_against(&root), abs);
    }

    #[test]
    fn extension_ignores_dotfiles() {
        assert_eq!(NormalizedPath::new("a/config.toml").extension(), Some("toml"));
        assert_eq!(NormalizedPath::new("a/.leadsync").extension(), None);
    }
}
