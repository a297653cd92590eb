//! Cache statistics and management

use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::{Result, cache_operation_failed};

/// Cache statistics
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cached payload files
    pub files: usize,
    /// Total size in bytes
    pub total_size: u64,
}

impl CacheStats {
    /// Format total size as human-readable string
    pub fn formatted_size(&self) -> String {
        let size = self.total_size as f64;
        if size < 1024.0 {
            format!("{} B", self.total_size)
        } else if size < 1024.0 * 1024.0 {
            format!("{:.1} KB", size / 1024.0)
        } else if size < 1024.0 * 1024.0 * 1024.0 {
            format!("{:.1} MB", size / (1024.0 * 1024.0))
        } else {
            format!("{:.1} GB", size / (1024.0 * 1024.0 * 1024.0))
        }
    }
}

/// Get cache statistics for the cache rooted at `cache_root`
pub fn cache_stats(cache_root: &Path) -> Result<CacheStats> {
    let path = super::payloads_dir(cache_root);

    if !path.exists() {
        return Ok(CacheStats::default());
    }

    let mut stats = CacheStats::default();
    for entry in WalkDir::new(&path).follow_links(false) {
        let entry = entry
            .map_err(|e| cache_operation_failed(format!("Failed to read cache directory: {e}")))?;
        if entry.file_type().is_file() {
            stats.files += 1;
            stats.total_size += entry
                .metadata()
                .map_err(|e| cache_operation_failed(format!("Failed to get metadata: {e}")))?
                .len();
        }
    }

    Ok(stats)
}

/// Remove every cached payload
pub fn clear_cache(cache_root: &Path) -> Result<()> {
    let path = super::payloads_dir(cache_root);
    if path.exists() {
        fs::remove_dir_all(&path)
            .map_err(|e| cache_operation_failed(format!("Failed to clear cache: {e}")))?;
    }
    Ok(())
}
