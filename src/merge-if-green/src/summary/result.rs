//! Processing result types.

use crate::decision::Verdict;
use crate::forge::PullRequestRef;
use serde::Serialize;

/// Result of processing a single pull request.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ProcessingResult {
    /// A decision was reached.
    Decided {
        /// The pull request.
        pull_request: PullRequestRef,
        /// The decision and its rationale.
        verdict: Verdict,
        /// Whether a mutating action was carried out.
        applied: bool,
    },

    /// The status data was inconsistent; nothing was done.
    Anomaly {
        /// The pull request.
        pull_request: PullRequestRef,
        /// Error message.
        error: String,
    },

    /// Fetching data or applying the decision failed.
    Failed {
        /// The pull request.
        pull_request: PullRequestRef,
        /// Error message.
        error: String,
    },
}
