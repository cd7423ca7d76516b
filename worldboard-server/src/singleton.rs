//! One worldboard-server per store directory.
//!
//! The lock file sits in the store directory and records who holds it.

use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, Write};
use std::path::{Path, PathBuf};

const LOCK_FILE: &str = "worldboard-server.lock";

/// Exclusive claim on a store directory, released on drop.
pub struct StoreLock {
    file: File,
    path: PathBuf,
}

impl StoreLock {
    /// Claim `store_dir` for a server listening on `port`.
    pub fn acquire(store_dir: &Path, port: u16) -> Result<Self> {
        fs::create_dir_all(store_dir)
            .with_context(|| format!("Failed to create store directory {}", store_dir.display()))?;

        let path = store_dir.join(LOCK_FILE);
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .context("Failed to open lock file")?;

        if file.try_lock_exclusive().is_err() {
            let mut holder = String::new();
            // Best effort.
            let _ = file.read_to_string(&mut holder);
            anyhow::bail!(
                "Another worldboard-server ({}) is already using the store at {}.\n\
                If you believe this is an error, remove: {}",
                holder.trim(),
                store_dir.display(),
                path.display()
            );
        }

        file.set_len(0)?;
        file.rewind()?;
        writeln!(file, "pid {} on port {port}", std::process::id())?;

        tracing::debug!(path = %path.display(), "store locked");
        Ok(StoreLock { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!(path = %self.path.display(), "failed to release store lock: {e}");
        }
    }
}
