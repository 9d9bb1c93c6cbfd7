//! Crash-safe file writes and locked reads

use crate::{Error, NormalizedPath, Result};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Sidecar every reader and writer of `target` locks, e.g. `.mapping.json.lock`.
///
/// The target itself is replaced by rename on each write, so a lock held on it
/// would be held on an inode that is no longer the file. The sidecar is never
/// replaced or removed.
fn lock_path(target: &Path) -> PathBuf {
    let file_name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{}.lock", file_name))
}

fn open_lock(target: &Path) -> Result<File> {
    let path = lock_path(target);
    OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(&path)
        .map_err(|e| Error::io(&path, e))
}

/// Replace `path` with `content` so readers see either the old file or the
/// new one, never a truncated mix.
///
/// The bytes go to a sibling temp file which is then renamed over the
/// target, all while holding the exclusive sidecar lock. Missing parent
/// directories are created.
pub fn write_atomic(path: &NormalizedPath, content: &[u8]) -> Result<()> {
    let target = path.to_native();

    if let Some(dir) = target.parent()
        && !dir.as_os_str().is_empty()
    {
        fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    }

    let lock = open_lock(&target)?;
    FileExt::lock_exclusive(&lock).map_err(|_| Error::LockFailed {
        path: target.clone(),
    })?;

    let file_name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp = target.with_file_name(format!(".{}.{}.tmp", file_name, std::process::id()));

    let result = write_temp(&temp, content).and_then(|()| {
        fs::rename(&temp, &target).map_err(|e| Error::io(&target, e))
    });
    if result.is_err() {
        let _ = fs::remove_file(&temp);
    }
    // Lock released when `lock` is dropped
    drop(lock);
    result?;

    tracing::trace!(path = %path, bytes = content.len(), "atomic write complete");
    Ok(())
}

fn write_temp(temp: &Path, content: &[u8]) -> Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(temp)
        .map_err(|e| Error::io(temp, e))?;
    file.write_all(content).map_err(|e| Error::io(temp, e))?;
    file.sync_all().map_err(|e| Error::io(temp, e))
}

pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native = path.to_native();
    fs::read_to_string(&native).map_err(|e| Error::io(&native, e))
}

/// Read while holding the shared sidecar lock, so no write can be in the
/// middle of replacing the file.
///
/// A missing target is reported as not found without creating the sidecar.
pub fn read_text_locked(path: &NormalizedPath) -> Result<String> {
    let native = path.to_native();
    if !native.exists() {
        return Err(Error::io(&native, std::io::ErrorKind::NotFound.into()));
    }

    let lock = open_lock(&native)?;
    FileExt::lock_shared(&lock).map_err(|_| Error::LockFailed {
        path: native.clone(),
    })?;

    let content = fs::read_to_string(&native).map_err(|e| Error::io(&native, e))?;
    drop(lock);
    Ok(content)
}
