//! Descriptor and archive manifest errors

use super::AppstowError;

/// Creates a malformed descriptor error
pub fn malformed(source_name: impl Into<String>, reason: impl Into<String>) -> AppstowError {
    AppstowError::MalformedDescriptor {
        source_name: source_name.into(),
        reason: reason.into(),
    }
}

/// Creates an integrity mismatch error between a descriptor and its archive
pub fn integrity_mismatch(expected: impl Into<String>, found: impl Into<String>) -> AppstowError {
    AppstowError::IntegrityMismatch {
        expected: expected.into(),
        found: found.into(),
    }
}

/// Creates an archive not found error
pub fn archive_not_found(location: impl Into<String>) -> AppstowError {
    AppstowError::ArchiveNotFound {
        location: location.into(),
    }
}

/// Creates an archive read failed error
pub fn archive_read_failed(path: impl Into<String>, reason: impl Into<String>) -> AppstowError {
    AppstowError::ArchiveReadFailed {
        path: path.into(),
        reason: reason.into(),
    }
}
