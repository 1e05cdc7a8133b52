//! A single commit status report.

use super::CheckState;
use chrono::{DateTime, Utc};

/// One status posted against a pull request's head commit.
///
/// Several reports may share a context when a check is re-run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    /// Name of the check stream (e.g. "kokoro/presubmit").
    pub context: String,

    /// Reported state.
    pub state: CheckState,

    /// Login of the account that posted the status.
    pub creator: String,

    /// When the status was last updated.
    pub updated_at: DateTime<Utc>,
}

impl StatusReport {
    /// Creates a report.
    pub fn new(
        context: impl Into<String>,
        state: CheckState,
        creator: impl Into<String>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            context: context.into(),
            state,
            creator: creator.into(),
            updated_at,
        }
    }
}
