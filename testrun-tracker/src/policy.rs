//! Status transition policy
//!
//! Decides whether an incoming status record may replace the stored one.
//! This is the only place where concurrent writers are arbitrated, so it is
//! kept pure: no I/O, no clock, no logging.
//!
//! Rules, applied in order:
//! 1. A record with an older checkpoint is stale and dropped.
//! 2. A terminal record is never replaced.
//! 3. A record whose status comes strictly before the highest recognised
//!    status seen so far is a regression and dropped. Unknown codes never
//!    count as a regression, and passing through one does not reset the mark.
//! 4. Otherwise the incoming record replaces the stored one in full.

use testrun_core::domain::run::{StatusCode, StatusRecord};

/// Outcome of comparing an incoming record against the stored one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeVerdict {
    /// Incoming replaces existing
    Applied,
    /// Incoming checkpoint is older than the stored one
    Stale,
    /// Stored record is already terminal
    TerminalSticky,
    /// Incoming status would move the run backwards
    Regression,
}

impl MergeVerdict {
    pub fn is_applied(&self) -> bool {
        matches!(self, MergeVerdict::Applied)
    }
}

/// Highest recognised status after `status` has been stored
///
/// Unknown codes leave the mark where it was.
pub fn high_water(mark: StatusCode, status: StatusCode) -> StatusCode {
    if status.rank().is_some() { status } else { mark }
}

/// Classifies `incoming` against `existing` without building the result
///
/// `mark` is the highest recognised status the run has held, see
/// [`high_water`].
pub fn evaluate(existing: &StatusRecord, mark: StatusCode, incoming: &StatusRecord) -> MergeVerdict {
    if incoming.checkpoint < existing.checkpoint {
        return MergeVerdict::Stale;
    }

    if existing.is_terminal() {
        return MergeVerdict::TerminalSticky;
    }

    if incoming.status.precedes(&mark) || incoming.status.precedes(&existing.status) {
        return MergeVerdict::Regression;
    }

    MergeVerdict::Applied
}

/// Returns the record that should be stored after `incoming` arrives
pub fn merge(existing: StatusRecord, mark: StatusCode, incoming: StatusRecord) -> StatusRecord {
    match evaluate(&existing, mark, &incoming) {
        MergeVerdict::Applied => incoming,
        MergeVerdict::Stale | MergeVerdict::TerminalSticky | MergeVerdict::Regression => existing,
    }
}
