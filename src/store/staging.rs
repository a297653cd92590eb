//! Staging directories
//!
//! A [`StagingArea`] is a uniquely named directory next to the application
//! slots. It belongs to exactly one commit and removes itself on drop unless
//! it was promoted with [`StagingArea::promote_to`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::{Result, file_write_failed};

/// Name prefix of staging directories
pub const STAGING_PREFIX: &str = ".staging-";
/// Name prefix of slots renamed aside during promotion
pub const RETIRED_PREFIX: &str = ".retired-";

/// Exclusive scratch directory for one install
#[derive(Debug)]
pub struct StagingArea {
    dir: Option<TempDir>,
    path: PathBuf,
}

impl StagingArea {
    /// Create a fresh staging directory inside `parent`
    pub fn create(parent: &Path) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(parent)
            .map_err(|e| {
                file_write_failed(
                    parent.display().to_string(),
                    format!("cannot create staging directory: {e}"),
                )
            })?;
        let path = dir.path().to_path_buf();
        tracing::debug!(path = %path.display(), "created staging directory");
        Ok(Self {
            dir: Some(dir),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn join(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }

    /// Random part of the directory name, reused for the retired slot
    pub fn suffix(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_prefix(STAGING_PREFIX))
            .unwrap_or("")
    }

    /// Rename the staging directory to `slot`.
    ///
    /// On failure the directory is still owned by `self` and is removed when
    /// it is dropped.
    pub fn promote_to(&mut self, slot: &Path) -> io::Result<()> {
        fs::rename(&self.path, slot)?;
        if let Some(dir) = self.dir.take() {
            // The directory now lives at `slot`; only forget the old handle.
            let _ = dir.keep();
        }
        self.path = slot.to_path_buf();
        Ok(())
    }

    pub fn is_promoted(&self) -> bool {
        self.dir.is_none()
    }
}

impl Drop for StagingArea {
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take() {
            tracing::debug!(path = %self.path.display(), "discarding staging directory");
            if let Err(e) = dir.close() {
                tracing::warn!(path = %self.path.display(), "failed to remove staging directory: {e}");
            }
        }
    }
}
