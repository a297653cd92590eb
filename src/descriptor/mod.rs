//! Application descriptors
//!
//! A descriptor is an ordered list of `key: value` attributes. It comes either
//! from a standalone descriptor file shipped next to (or instead of) the
//! payload archive, or from the manifest embedded in the archive itself.
//!
//! Identity is the (name, vendor, version) triple. Every other attribute,
//! including the payload location, is carried along opaquely.

pub mod archive;
pub mod key;
pub mod version;

use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::{Result, file_read_failed, file_write_failed, malformed_descriptor};

pub use key::{StoreKey, sanitize_name};
pub use version::Version;

/// Application name attribute
pub const NAME_KEY: &str = "MIDlet-Name";
/// Application vendor attribute
pub const VENDOR_KEY: &str = "MIDlet-Vendor";
/// Application version attribute
pub const VERSION_KEY: &str = "MIDlet-Version";
/// Payload location attribute (standalone descriptors only)
pub const PAYLOAD_URL_KEY: &str = "MIDlet-Jar-URL";
/// Icon entry attribute
pub const ICON_KEY: &str = "MIDlet-Icon";
/// Prefix of numbered entry point attributes (`MIDlet-1`, `MIDlet-2`, ...)
const ENTRY_POINT_PREFIX: &str = "MIDlet-";

/// An entry point declared as `MIDlet-<n>: title, icon, class`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoint {
    pub index: u32,
    pub title: String,
    pub icon: Option<String>,
    /// Opaque identifier resolved by the runtime
    pub class: String,
}

impl EntryPoint {
    fn parse(key: &str, value: &str) -> Option<Self> {
        let index = key.strip_prefix(ENTRY_POINT_PREFIX)?.parse::<u32>().ok()?;
        let first = value.find(',')?;
        let last = value.rfind(',')?;
        let title = value[..first].trim().to_string();
        let class = value[last + 1..].trim().to_string();
        if class.is_empty() {
            return None;
        }
        let icon = if first < last {
            Some(value[first + 1..last].trim().to_string()).filter(|s| !s.is_empty())
        } else {
            None
        };
        Some(Self {
            index,
            title,
            icon,
            class,
        })
    }
}

/// Parsed application descriptor
#[derive(Debug, Clone)]
pub struct Descriptor {
    attributes: Vec<(String, String)>,
    name: String,
    vendor: String,
    version: Version,
}

impl Descriptor {
    /// Parse descriptor text.
    ///
    /// `standalone` selects the standalone descriptor format; otherwise the
    /// text is an archive manifest, where a line starting with a space
    /// continues the previous value.
    pub fn parse(text: &str, standalone: bool) -> Result<Self> {
        Self::parse_named(text, standalone, "<descriptor>")
    }

    /// Read and parse a descriptor file
    pub fn from_file(path: &Path, standalone: bool) -> Result<Self> {
        let bytes = fs::read(path)
            .map_err(|e| file_read_failed(path.display().to_string(), e.to_string()))?;
        let text = String::from_utf8_lossy(&bytes);
        Self::parse_named(&text, standalone, &path.display().to_string())
    }

    /// Parse the manifest embedded in a payload archive
    pub fn from_archive(path: &Path) -> Result<Self> {
        let text = archive::read_manifest(path)?;
        Self::parse_named(&text, false, &path.display().to_string())
    }

    fn parse_named(text: &str, standalone: bool, source_name: &str) -> Result<Self> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut attributes: Vec<(String, String)> = Vec::new();

        for raw_line in text.split('\n') {
            let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);
            if !standalone {
                if let Some(continuation) = line.strip_prefix(' ') {
                    if let Some((_, value)) = attributes.last_mut() {
                        value.push_str(continuation);
                        continue;
                    }
                }
            }
            if line.trim().is_empty() {
                continue;
            }
            let Some((key, value)) = line.split_once(':') else {
                tracing::debug!(source = source_name, line, "skipping descriptor line without ':'");
                continue;
            };
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            set_attribute(&mut attributes, key, value.trim());
        }

        // Continuations may have left trailing whitespace on manifest values
        for (_, value) in &mut attributes {
            let trimmed = value.trim();
            if trimmed.len() != value.len() {
                *value = trimmed.to_string();
            }
        }

        Self::from_attributes(attributes, source_name)
    }

    fn from_attributes(attributes: Vec<(String, String)>, source_name: &str) -> Result<Self> {
        let lookup = |key: &str| {
            attributes
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.trim())
                .filter(|v| !v.is_empty())
        };
        let name = lookup(NAME_KEY)
            .ok_or_else(|| malformed_descriptor(source_name, format!("missing {NAME_KEY}")))?
            .to_string();
        let vendor = lookup(VENDOR_KEY)
            .ok_or_else(|| malformed_descriptor(source_name, format!("missing {VENDOR_KEY}")))?
            .to_string();
        let version = lookup(VERSION_KEY)
            .and_then(Version::parse)
            .ok_or_else(|| malformed_descriptor(source_name, format!("missing {VERSION_KEY}")))?;

        Ok(Self {
            attributes,
            name,
            vendor,
            version,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    /// Look up an attribute by exact key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
    }

    /// All attributes in file order
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Declared payload location, if any
    pub fn payload_location(&self) -> Option<&str> {
        self.get(PAYLOAD_URL_KEY)
    }

    /// Icon entry inside the payload archive.
    ///
    /// Falls back to the icon of the first entry point.
    pub fn icon(&self) -> Option<&str> {
        if let Some(icon) = self.get(ICON_KEY) {
            return Some(icon);
        }
        let first = self.entry_points().into_iter().next()?;
        let value = self.get(&format!("{ENTRY_POINT_PREFIX}{}", first.index))?;
        let start = value.find(',')? + 1;
        let end = value.rfind(',')?;
        if start > end {
            return None;
        }
        Some(value[start..end].trim()).filter(|s| !s.is_empty())
    }

    /// Entry points sorted by their declared number
    pub fn entry_points(&self) -> Vec<EntryPoint> {
        let mut entries: Vec<EntryPoint> = self
            .attributes
            .iter()
            .filter_map(|(k, v)| EntryPoint::parse(k, v))
            .collect();
        entries.sort_by_key(|e| e.index);
        entries
    }

    /// Store key for this application's identity
    pub fn store_key(&self) -> StoreKey {
        StoreKey::derive(&self.name, &self.vendor)
    }

    /// Fill every attribute missing here from `other`.
    ///
    /// Neither input changes; the receiver's identity is kept.
    pub fn merge(&self, other: &Descriptor) -> Descriptor {
        let mut merged = self.clone();
        for (key, value) in &other.attributes {
            if self.get(key).is_none() {
                set_attribute(&mut merged.attributes, key, value);
            }
        }
        merged
    }

    /// Render as `key: value` lines
    pub fn to_manifest_string(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.attributes {
            out.push_str(key);
            out.push_str(": ");
            out.push_str(value);
            out.push('\n');
        }
        out
    }

    /// Write the descriptor as a manifest file
    pub fn write_to(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_manifest_string())
            .map_err(|e| file_write_failed(path.display().to_string(), e.to_string()))
    }
}

fn set_attribute(attributes: &mut Vec<(String, String)>, key: &str, value: &str) {
    if let Some(slot) = attributes.iter_mut().find(|(k, _)| k == key) {
        slot.1 = value.to_string();
    } else {
        attributes.push((key.to_string(), value.to_string()));
    }
}

/// Identity equality: name, vendor and the version text must match exactly.
/// Numeric version ordering is only used to classify upgrades.
impl PartialEq for Descriptor {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.vendor == other.vendor
            && self.version.as_str() == other.version.as_str()
    }
}

impl Eq for Descriptor {}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {} / {}", self.name, self.vendor, self.version)
    }
}
