//! Application store
//!
//! Layout under the store root:
//!
//! ```text
//! apps/<key>/converted.dex   transformed executable
//! apps/<key>/res.jar         source archive, kept for resources
//! apps/<key>/manifest.mf     merged descriptor
//! apps/<key>/record.json     StoreRecord
//! apps/<key>/icon.png        optional
//! data/<key>/                user data, survives upgrades
//! configs/<key>/             per-application configuration
//! ```
//!
//! Slots are only ever replaced by renaming a fully populated staging
//! directory over them, see [`writer`].

pub mod record;
pub mod staging;
pub mod writer;

use std::fs;
use std::path::{Path, PathBuf};

use crate::descriptor::{StoreKey, sanitize_name};
use crate::error::{Result, app_not_found, file_read_failed, file_write_failed};

pub use record::{RECORD_FILE, StoreRecord};
pub use staging::{RETIRED_PREFIX, STAGING_PREFIX, StagingArea};
pub use writer::StoreWriter;

pub const APPS_DIR: &str = "apps";
pub const DATA_DIR: &str = "data";
pub const CONFIGS_DIR: &str = "configs";

pub const EXECUTABLE_FILE: &str = "converted.dex";
pub const RESOURCE_FILE: &str = "res.jar";
pub const MANIFEST_FILE: &str = "manifest.mf";
pub const ICON_FILE: &str = "icon.png";

/// True for staging and retired directories living next to the slots
pub fn is_transient(entry_name: &str) -> bool {
    entry_name.starts_with(STAGING_PREFIX) || entry_name.starts_with(RETIRED_PREFIX)
}

/// Filesystem locations belonging to one installed application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub app_dir: PathBuf,
    pub data_dir: PathBuf,
    pub config_dir: PathBuf,
    pub executable: PathBuf,
    pub resources: PathBuf,
    pub manifest: PathBuf,
}

/// Handle on a store root
#[derive(Debug, Clone)]
pub struct Store {
    root: PathBuf,
}

impl Store {
    /// Open the store at `root`, creating its top level directories
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let store = Self { root: root.into() };
        for dir in [store.apps_dir(), store.data_root(), store.configs_root()] {
            fs::create_dir_all(&dir)
                .map_err(|e| file_write_failed(dir.display().to_string(), e.to_string()))?;
        }
        Ok(store)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn apps_dir(&self) -> PathBuf {
        self.root.join(APPS_DIR)
    }

    pub fn data_root(&self) -> PathBuf {
        self.root.join(DATA_DIR)
    }

    pub fn configs_root(&self) -> PathBuf {
        self.root.join(CONFIGS_DIR)
    }

    pub fn app_dir(&self, key: &StoreKey) -> PathBuf {
        self.apps_dir().join(key.as_str())
    }

    pub fn data_dir(&self, key: &StoreKey) -> PathBuf {
        self.data_root().join(key.as_str())
    }

    pub fn config_dir(&self, key: &StoreKey) -> PathBuf {
        self.configs_root().join(key.as_str())
    }

    pub fn paths(&self, key: &StoreKey) -> AppPaths {
        let app_dir = self.app_dir(key);
        AppPaths {
            executable: app_dir.join(EXECUTABLE_FILE),
            resources: app_dir.join(RESOURCE_FILE),
            manifest: app_dir.join(MANIFEST_FILE),
            data_dir: self.data_dir(key),
            config_dir: self.config_dir(key),
            app_dir,
        }
    }

    /// All installed applications, sorted by name then key.
    ///
    /// Staging and retired directories are skipped, as are slots whose record
    /// cannot be read.
    pub fn records(&self) -> Result<Vec<StoreRecord>> {
        let apps_dir = self.apps_dir();
        if !apps_dir.is_dir() {
            return Ok(Vec::new());
        }
        let entries = fs::read_dir(&apps_dir)
            .map_err(|e| file_read_failed(apps_dir.display().to_string(), e.to_string()))?;

        let mut records = Vec::new();
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            if is_transient(&name.to_string_lossy()) || !entry.path().is_dir() {
                continue;
            }
            let record_path = entry.path().join(RECORD_FILE);
            match StoreRecord::load(&record_path) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!(slot = %entry.path().display(), "skipping slot: {e}");
                }
            }
        }
        records.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.key.cmp(&b.key)));
        Ok(records)
    }

    /// Record stored under `key`, if any
    pub fn get(&self, key: &StoreKey) -> Result<Option<StoreRecord>> {
        let record_path = self.app_dir(key).join(RECORD_FILE);
        if !record_path.is_file() {
            return Ok(None);
        }
        StoreRecord::load(&record_path).map(Some)
    }

    /// Record of the application identified by `name` and `vendor`
    pub fn find(&self, name: &str, vendor: &str) -> Result<Option<StoreRecord>> {
        let key = StoreKey::derive(name, vendor);
        if let Some(record) = self.get(&key)? {
            return Ok(Some(record));
        }
        // Slots written under a different key for the same identity
        let wanted = sanitize_name(name);
        Ok(self
            .records()?
            .into_iter()
            .find(|r| sanitize_name(&r.name) == wanted && r.vendor == vendor))
    }

    /// Remove an application together with its data and configuration
    pub fn uninstall(&self, key: &StoreKey) -> Result<StoreRecord> {
        let record = self.get(key)?.ok_or_else(|| app_not_found(key.as_str()))?;
        let paths = self.paths(key);
        for dir in [&paths.app_dir, &paths.data_dir, &paths.config_dir] {
            if dir.exists() {
                fs::remove_dir_all(dir)
                    .map_err(|e| file_write_failed(dir.display().to_string(), e.to_string()))?;
            }
        }
        tracing::info!(key = %key, "uninstalled application");
        Ok(record)
    }
}
