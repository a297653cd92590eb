//! Cache errors

use super::AppstowError;

/// Creates a cache operation failed error
pub fn operation_failed(message: impl Into<String>) -> AppstowError {
    AppstowError::CacheOperationFailed {
        message: message.into(),
    }
}
