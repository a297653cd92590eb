//! Configuration errors

use super::AppstowError;

/// Creates a configuration read failed error
pub fn read_failed(path: impl Into<String>, reason: impl Into<String>) -> AppstowError {
    AppstowError::ConfigReadFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a configuration parse failed error
pub fn parse_failed(path: impl Into<String>, reason: impl Into<String>) -> AppstowError {
    AppstowError::ConfigParseFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates an invalid configuration error
pub fn invalid(message: impl Into<String>) -> AppstowError {
    AppstowError::ConfigInvalid {
        message: message.into(),
    }
}
