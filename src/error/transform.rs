//! Transformer errors

use super::AppstowError;

/// Creates a transform failed error
pub fn failed(reason: impl Into<String>) -> AppstowError {
    AppstowError::TransformFailed {
        reason: reason.into(),
    }
}
