//! File system errors

use super::AppstowError;

/// Creates a file read failed error
pub fn read_failed(path: impl Into<String>, reason: impl Into<String>) -> AppstowError {
    AppstowError::FileReadFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a file write failed error
pub fn write_failed(path: impl Into<String>, reason: impl Into<String>) -> AppstowError {
    AppstowError::FileWriteFailed {
        path: path.into(),
        reason: reason.into(),
    }
}
