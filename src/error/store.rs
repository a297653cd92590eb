//! Store errors

use super::AppstowError;

/// Creates a promotion failed error
///
/// Only used for failures during or after the slot swap.
pub fn promotion_failed(path: impl Into<String>, reason: impl Into<String>) -> AppstowError {
    AppstowError::PromotionFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates an application not found error
pub fn app_not_found(key: impl Into<String>) -> AppstowError {
    AppstowError::AppNotFound { key: key.into() }
}
