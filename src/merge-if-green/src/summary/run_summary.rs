//! Run summary types.

use super::result::ProcessingResult;
use crate::decision::Decision;
use serde::Serialize;

/// Summary of a complete run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    /// Number of repositories listed for the organization.
    pub repositories_discovered: usize,

    /// Number of repositories whose pull requests could not be listed.
    pub repositories_failed: usize,

    /// Number of bot pull requests evaluated.
    pub pull_requests_evaluated: usize,

    /// Pull requests that were given a retry label (or would be, in a dry run).
    pub retries_requested: usize,

    /// Pull requests waiting on pending CI.
    pub waiting: usize,

    /// Pull requests that exhausted their retries.
    pub given_up: usize,

    /// Pull requests merged (or that would be, in a dry run).
    pub merged: usize,

    /// Pull requests with nothing to do.
    pub skipped: usize,

    /// Pull requests whose status data was out of order.
    pub anomalies: usize,

    /// Pull requests that failed to fetch or apply.
    pub failures: usize,

    /// Number of mutating actions actually carried out.
    pub actions_applied: usize,

    /// Whether this was a dry run.
    pub dry_run: bool,
}

impl RunSummary {
    /// Creates a new empty summary.
    #[must_use]
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Default::default()
        }
    }

    /// Updates the summary with a processing result.
    pub fn record_result(&mut self, result: &ProcessingResult) {
        self.pull_requests_evaluated += 1;
        match result {
            ProcessingResult::Decided {
                verdict, applied, ..
            } => {
                match verdict.decision {
                    Decision::AddRetryLabel => self.retries_requested += 1,
                    Decision::Wait => self.waiting += 1,
                    Decision::GiveUp => self.given_up += 1,
                    Decision::Merge => self.merged += 1,
                    Decision::Skip => self.skipped += 1,
                }
                if *applied {
                    self.actions_applied += 1;
                }
            }
            ProcessingResult::Anomaly { .. } => self.anomalies += 1,
            ProcessingResult::Failed { .. } => self.failures += 1,
        }
    }

    /// Returns true if any pull request or repository could not be handled.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failures > 0 || self.anomalies > 0 || self.repositories_failed > 0
    }

    /// Returns true if every pull request reached a decision.
    #[must_use]
    pub fn all_success(&self) -> bool {
        !self.has_failures()
    }
}
