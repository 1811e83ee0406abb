//! Keeps two servers from writing the same storage file.

use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// A lock guard that releases the lock when dropped
pub struct LockGuard {
    _file: File,
}

fn lock_path(data_path: &Path) -> Result<PathBuf> {
    let dir = data_path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("Storage path has no parent: {}", data_path.display()))?;
    fs::create_dir_all(dir)?;

    let name = data_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "storage".to_string());

    Ok(dir.join(format!("{}.lock", name)))
}

/// Acquire an exclusive lock, failing if another instance serves this file
pub fn acquire_lock(data_path: &Path) -> Result<LockGuard> {
    let path = lock_path(data_path)?;
    let file = File::create(&path).context("Failed to create lock file")?;

    file.try_lock_exclusive().map_err(|_| {
        anyhow::anyhow!(
            "Another wpl-server instance is already using {}.\n\
            If you believe this is an error, remove: {}",
            data_path.display(),
            path.display()
        )
    })?;

    Ok(LockGuard { _file: file })
}
