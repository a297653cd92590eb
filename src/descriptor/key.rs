//! Filesystem-safe store keys derived from application identity

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::hash;

/// Characters removed from application names before they become directory names
const ILLEGAL_NAME_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Strip path-illegal characters from an application name and trim it
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .filter(|c| !ILLEGAL_NAME_CHARS.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Directory name of an installed application: `<name>_<hex(hash(vendor))>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreKey(String);

impl StoreKey {
    /// Derive the key for a (name, vendor) pair. Pure and deterministic.
    pub fn derive(name: &str, vendor: &str) -> Self {
        StoreKey(format!("{}_{}", sanitize_name(name), hash::short_hex(vendor)))
    }

    /// Wrap an existing key, e.g. one typed on the command line or read from a store record.
    ///
    /// Returns `None` when the value could escape the store root.
    pub fn from_raw(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty()
            || trimmed == "."
            || trimmed == ".."
            || trimmed.contains(ILLEGAL_NAME_CHARS)
        {
            return None;
        }
        Some(StoreKey(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
