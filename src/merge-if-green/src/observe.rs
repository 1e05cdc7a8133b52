//! Structured reporting of aggregation and decision events.
//!
//! The runner reports through an [`EventSink`] instead of logging directly,
//! so the reporting target can be swapped (tests record events in memory).

use crate::decision::{DecisionError, Verdict};
use crate::forge::PullRequestRef;
use crate::statuses::StatusReport;
use tracing::{info, warn};

/// Receives per-pull-request observability events.
pub trait EventSink: Send + Sync {
    /// A context's verdict after aggregation. `creator` is the normalized
    /// creator name.
    fn status_verdict(&self, pull_request: &PullRequestRef, verdict: &StatusReport, creator: &str);

    /// The decision reached for a pull request.
    fn decision(&self, pull_request: &PullRequestRef, verdict: &Verdict, dry_run: bool);

    /// A decision could not be made because the data was inconsistent.
    fn anomaly(&self, pull_request: &PullRequestRef, error: &DecisionError);
}

/// Emits every event as a `tracing` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn status_verdict(&self, pull_request: &PullRequestRef, verdict: &StatusReport, creator: &str) {
        info!(
            repo = %pull_request.repository,
            pr = pull_request.number,
            state = %verdict.state,
            context = %verdict.context,
            creator,
            "Status verdict"
        );
    }

    fn decision(&self, pull_request: &PullRequestRef, verdict: &Verdict, dry_run: bool) {
        info!(
            repo = %pull_request.repository,
            pr = pull_request.number,
            title = %pull_request.title,
            decision = %verdict.decision,
            dry_run,
            "{}",
            verdict.rationale
        );
    }

    fn anomaly(&self, pull_request: &PullRequestRef, error: &DecisionError) {
        warn!(
            repo = %pull_request.repository,
            pr = pull_request.number,
            error = %error,
            "No decision made"
        );
    }
}
