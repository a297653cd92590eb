//! Error types and handling for appstow
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`descriptor`]: Descriptor and archive manifest errors
//! - [`fetch`]: Network fetch errors
//! - [`transform`]: External transformer errors
//! - [`store`]: Store promotion and lookup errors
//! - [`config`]: Configuration errors
//! - [`fs`]: File system errors
//! - [`cache`]: Payload cache errors

pub mod cache;
pub mod config;
pub mod descriptor;
pub mod fetch;
pub mod fs;
pub mod store;
pub mod transform;

pub use cache::operation_failed as cache_operation_failed;
pub use config::{
    invalid as config_invalid, parse_failed as config_parse_failed,
    read_failed as config_read_failed,
};
pub use descriptor::{
    archive_not_found, archive_read_failed, integrity_mismatch, malformed as malformed_descriptor,
};
pub use fetch::failed as fetch_failed;
pub use fs::{read_failed as file_read_failed, write_failed as file_write_failed};
pub use store::{app_not_found, promotion_failed};
pub use transform::failed as transform_failed;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for appstow operations
#[derive(Error, Diagnostic, Debug)]
pub enum AppstowError {
    // Descriptor errors
    #[error("Malformed descriptor {source_name}: {reason}")]
    #[diagnostic(
        code(appstow::descriptor::malformed),
        help("A descriptor needs non-empty MIDlet-Name, MIDlet-Vendor and MIDlet-Version attributes")
    )]
    MalformedDescriptor { source_name: String, reason: String },

    #[error("Descriptor does not match archive manifest: expected {expected}, found {found}")]
    #[diagnostic(
        code(appstow::descriptor::integrity_mismatch),
        help("The descriptor and the archive it points to describe different applications; select a matching pair")
    )]
    IntegrityMismatch { expected: String, found: String },

    #[error("Archive not found: {location}")]
    #[diagnostic(
        code(appstow::descriptor::archive_not_found),
        help("Pass the path of an existing .jar archive or .jad descriptor")
    )]
    ArchiveNotFound { location: String },

    #[error("Failed to read archive {path}: {reason}")]
    #[diagnostic(code(appstow::descriptor::archive_read_failed))]
    ArchiveReadFailed { path: String, reason: String },

    // Fetch errors
    #[error("Failed to download {url}: {reason}")]
    #[diagnostic(
        code(appstow::fetch::failed),
        help("Check the network connection and run the install again")
    )]
    FetchFailed { url: String, reason: String },

    #[error("Operation cancelled")]
    #[diagnostic(code(appstow::fetch::cancelled))]
    Cancelled,

    // Transformer errors
    #[error("Transformer rejected the payload: {reason}")]
    #[diagnostic(
        code(appstow::transform::failed),
        help("The archive contains bytecode the transformer cannot convert; a different archive is needed")
    )]
    TransformFailed { reason: String },

    // Store errors
    #[error("Failed to promote install into {path}: {reason}")]
    #[diagnostic(
        code(appstow::store::promotion_failed),
        help("The application store may be inconsistent; reinstall the application")
    )]
    PromotionFailed { path: String, reason: String },

    #[error("Application '{key}' is not installed")]
    #[diagnostic(
        code(appstow::store::app_not_found),
        help("Run 'appstow list' to see installed applications")
    )]
    AppNotFound { key: String },

    // Configuration errors
    #[error("Failed to read configuration file: {path}")]
    #[diagnostic(code(appstow::config::read_failed))]
    ConfigReadFailed { path: String, reason: String },

    #[error("Failed to parse configuration file: {path}: {reason}")]
    #[diagnostic(code(appstow::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(appstow::config::invalid))]
    ConfigInvalid { message: String },

    // File system errors
    #[error("Failed to read file: {path}")]
    #[diagnostic(code(appstow::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}: {reason}")]
    #[diagnostic(code(appstow::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(appstow::fs::io_error))]
    IoError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // Cache errors
    #[error("Cache operation failed: {message}")]
    #[diagnostic(code(appstow::cache::operation_failed))]
    CacheOperationFailed { message: String },
}

impl AppstowError {
    /// True when the failure happened during or after promotion, so the
    /// permanent store may hold a mix of old and new state.
    pub fn is_store_inconsistent(&self) -> bool {
        matches!(self, AppstowError::PromotionFailed { .. })
    }
}

impl From<std::io::Error> for AppstowError {
    fn from(err: std::io::Error) -> Self {
        AppstowError::IoError {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<serde_yaml::Error> for AppstowError {
    fn from(err: serde_yaml::Error) -> Self {
        AppstowError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for AppstowError {
    fn from(err: serde_json::Error) -> Self {
        AppstowError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<zip::result::ZipError> for AppstowError {
    fn from(err: zip::result::ZipError) -> Self {
        AppstowError::ArchiveReadFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<inquire::InquireError> for AppstowError {
    fn from(err: inquire::InquireError) -> Self {
        AppstowError::IoError {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, AppstowError>;
