//! Network fetch errors

use super::AppstowError;

/// Creates a fetch failed error
pub fn failed(url: impl Into<String>, reason: impl Into<String>) -> AppstowError {
    AppstowError::FetchFailed {
        url: url.into(),
        reason: reason.into(),
    }
}
