//! Payload cache
//!
//! Remote payload archives are downloaded into the cache before they are
//! verified and transformed.
//!
//! ## Cache Structure
//!
//! ```text
//! ~/.cache/appstow/
//! └── payloads/
//!     └── payload-<random>.jar   (one per in-flight commit)
//! ```
//!
//! Every download is a uniquely named temporary file owned by one commit and
//! removed when that commit returns, so the cache can be purged at any time.

pub mod stats;

use std::path::{Path, PathBuf};

use crate::error::{Result, cache_operation_failed};

pub use stats::{CacheStats, cache_stats, clear_cache};

/// Default cache directory name under user's cache directory
const CACHE_DIR: &str = "appstow";

/// Payloads subdirectory within cache
pub const PAYLOADS_DIR: &str = "payloads";

/// Environment variable overriding the cache location
pub const CACHE_DIR_ENV: &str = "APPSTOW_CACHE_DIR";

/// Get the default cache directory path
///
/// Uses the platform's standard cache location with an `appstow`
/// subdirectory. Can be overridden with the `APPSTOW_CACHE_DIR` environment
/// variable.
pub fn cache_dir() -> Result<PathBuf> {
    resolve_cache_dir(None)
}

/// Cache directory honoring, in order: `APPSTOW_CACHE_DIR`, `configured`,
/// the platform cache directory.
pub fn resolve_cache_dir(configured: Option<&Path>) -> Result<PathBuf> {
    if let Ok(cache_dir) = std::env::var(CACHE_DIR_ENV) {
        if !cache_dir.trim().is_empty() {
            return Ok(PathBuf::from(cache_dir));
        }
    }
    if let Some(configured) = configured {
        return Ok(configured.to_path_buf());
    }

    let base = dirs::cache_dir()
        .ok_or_else(|| cache_operation_failed("Could not determine cache directory"))?;

    Ok(base.join(CACHE_DIR))
}

/// Directory holding in-flight payload downloads
pub fn payloads_dir(cache_root: &Path) -> PathBuf {
    cache_root.join(PAYLOADS_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_env_override_wins() {
        let temp = tempfile::TempDir::new().unwrap();
        unsafe { std::env::set_var(CACHE_DIR_ENV, temp.path()) };
        let resolved = resolve_cache_dir(Some(Path::new("/configured"))).unwrap();
        unsafe { std::env::remove_var(CACHE_DIR_ENV) };
        assert_eq!(resolved, temp.path());
    }

    #[test]
    #[serial]
    fn test_configured_then_default() {
        unsafe { std::env::remove_var(CACHE_DIR_ENV) };
        assert_eq!(
            resolve_cache_dir(Some(Path::new("/configured"))).unwrap(),
            PathBuf::from("/configured")
        );
        if let Ok(default) = cache_dir() {
            assert!(default.ends_with(CACHE_DIR));
        }
    }

    #[test]
    fn test_payloads_dir() {
        assert_eq!(
            payloads_dir(Path::new("/c")),
            Path::new("/c").join(PAYLOADS_DIR)
        );
    }
}
