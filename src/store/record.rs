//! Persisted identity of an installed application

use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::descriptor::{Descriptor, StoreKey, Version};
use crate::error::{Result, file_read_failed, file_write_failed};

/// File name of the record inside an application slot
pub const RECORD_FILE: &str = "record.json";

/// What the store knows about one installed application.
///
/// Locations are not stored: the slot, data, config and executable paths
/// come from [`Store::paths`](super::Store::paths) with `record.key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreRecord {
    pub key: StoreKey,
    pub name: String,
    pub vendor: String,
    pub version: Version,
    /// Icon file name relative to the slot, when one was extracted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Class of the first declared entry point
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_point: Option<String>,
    /// BLAKE3 digest of the installed source archive
    #[serde(default)]
    pub payload_digest: String,
    /// Unix seconds
    #[serde(default)]
    pub installed_at: u64,
}

impl StoreRecord {
    /// Build the record for a descriptor about to be installed
    pub fn for_descriptor(
        descriptor: &Descriptor,
        icon: Option<String>,
        payload_digest: String,
    ) -> Self {
        Self {
            key: descriptor.store_key(),
            name: descriptor.name().to_string(),
            vendor: descriptor.vendor().to_string(),
            version: descriptor.version().clone(),
            icon,
            entry_point: descriptor
                .entry_points()
                .into_iter()
                .next()
                .map(|e| e.class),
            payload_digest,
            installed_at: now_secs(),
        }
    }

    /// True when this record describes the application `name` by `vendor`
    pub fn is_identity(&self, name: &str, vendor: &str) -> bool {
        self.key == StoreKey::derive(name, vendor)
    }

    pub(crate) fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| file_read_failed(path.display().to_string(), e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| {
            file_read_failed(path.display().to_string(), format!("invalid record: {e}"))
        })
    }

    pub(crate) fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json + "\n")
            .map_err(|e| file_write_failed(path.display().to_string(), e.to_string()))
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
