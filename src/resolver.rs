//! Version conflict classification
//!
//! Compares a candidate package against the store record of the same
//! application. The result is advisory: committing an `Older` or `Equal`
//! package is the caller's call.

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

use crate::descriptor::Version;
use crate::store::StoreRecord;

/// Relationship between a candidate package and the installed application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallOutcome {
    /// No record for this application
    New,
    /// Candidate version is lower than the installed one
    Older,
    /// Same version is installed
    Equal,
    /// Candidate version is higher than the installed one
    Newer,
    /// Descriptor and archive manifest disagree; do not commit
    Unmatched,
}

impl InstallOutcome {
    /// Whether a commit for this outcome needs explicit user confirmation
    pub fn needs_confirmation(self) -> bool {
        matches!(
            self,
            InstallOutcome::Older | InstallOutcome::Equal | InstallOutcome::Newer
        )
    }

    /// Whether a commit may be attempted at all
    pub fn is_installable(self) -> bool {
        self != InstallOutcome::Unmatched
    }
}

impl fmt::Display for InstallOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            InstallOutcome::New => "new",
            InstallOutcome::Older => "older",
            InstallOutcome::Equal => "equal",
            InstallOutcome::Newer => "newer",
            InstallOutcome::Unmatched => "unmatched",
        };
        f.write_str(label)
    }
}

/// State of the descriptor/archive integrity check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Integrity {
    /// The archive's embedded manifest equals the descriptor
    Verified,
    /// The archive is remote; checked after fetch
    Deferred,
    /// The archive's embedded manifest differs from the descriptor
    Mismatch,
}

/// Classify `candidate` against the existing record.
///
/// `New` iff there is no record. Otherwise `Unmatched` when integrity failed
/// upstream, else the sign of the version comparison.
pub fn classify(
    candidate: &Version,
    existing: Option<&StoreRecord>,
    integrity: Integrity,
) -> InstallOutcome {
    let Some(existing) = existing else {
        return InstallOutcome::New;
    };
    if integrity == Integrity::Mismatch {
        return InstallOutcome::Unmatched;
    }
    match candidate.cmp(&existing.version) {
        Ordering::Less => InstallOutcome::Older,
        Ordering::Equal => InstallOutcome::Equal,
        Ordering::Greater => InstallOutcome::Newer,
    }
}
