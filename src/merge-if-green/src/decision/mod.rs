//! Retry and merge policy.
//!
//! [`decide`] is a pure function of the retry-label counts, the aggregated
//! statuses and the [`Policy`]. Rules are checked in order and the first
//! match wins:
//!
//! 1. No retry label was ever added: add one to start CI.
//! 2. The CI operator never reported: skip.
//! 3. Anything is pending: wait.
//! 4. The operator failed (or is silent): retry while under the ceiling,
//!    otherwise give up.
//! 5. Every context succeeded: merge.
//! 6. Otherwise: skip.

mod error;
mod verdict;

pub use error::DecisionError;
pub use verdict::{Decision, Verdict};

use crate::config::Policy;
use crate::labels::{count_retry_label_events, LabelEvent, RetryLabelCounts};
use crate::statuses::{aggregate, CheckState, Creator, StatusAggregation, StatusReport};

/// Decides what to do with a pull request.
#[must_use]
pub fn decide(
    counts: RetryLabelCounts,
    aggregation: &StatusAggregation,
    policy: &Policy,
) -> Verdict {
    if is_first_run(counts) {
        return Verdict::new(
            Decision::AddRetryLabel,
            format!("adding first {}", policy.retry_label()),
        );
    }

    let operator = policy.operator().label();

    if policy.require_operator_activity() && !aggregation.operator_reported() {
        return Verdict::new(
            Decision::Skip,
            format!("skipping as no {operator} CI runs"),
        );
    }

    let pending = aggregation.state_count(CheckState::Pending);
    if pending > 0 {
        return Verdict::new(Decision::Wait, format!("{pending} pending CI jobs"));
    }

    if aggregation.failure_count(&Creator::Operator) > 0 || !aggregation.operator_reported() {
        let attempts = format!("{} of {}", counts.added, policy.max_retries());
        return if counts.added < policy.max_retries() {
            Verdict::new(
                Decision::AddRetryLabel,
                format!("retrying {operator} CI ({attempts})"),
            )
        } else {
            Verdict::new(
                Decision::GiveUp,
                format!("too many {operator} failures ({attempts})"),
            )
        };
    }

    let contexts = aggregation.context_count();
    let succeeded = aggregation.state_count(CheckState::Success);
    if contexts > 0 && succeeded == contexts {
        return Verdict::new(
            Decision::Merge,
            format!("merging as all {contexts} statuses are good"),
        );
    }

    Verdict::new(
        Decision::Skip,
        format!("{succeeded} of {contexts} statuses successful, nothing to do"),
    )
}

/// Returns true if the pull request has never been given a retry label.
///
/// Status data is irrelevant in that case, so callers can skip fetching it.
#[must_use]
pub fn is_first_run(counts: RetryLabelCounts) -> bool {
    counts.added == 0
}

/// Where an evaluation stands after the label history is reduced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evaluation {
    /// Decided from the label history alone.
    Decided(Verdict),

    /// The statuses are needed to decide.
    NeedsStatuses(RetryLabelCounts),
}

/// Reduces the label history and decides if statuses are not needed.
///
/// Only a first run is decided here, so callers can skip fetching statuses.
#[must_use]
pub fn begin_evaluation(events: &[LabelEvent], policy: &Policy) -> Evaluation {
    let counts = count_retry_label_events(events, policy.retry_marker());
    if is_first_run(counts) {
        Evaluation::Decided(decide(counts, &StatusAggregation::default(), policy))
    } else {
        Evaluation::NeedsStatuses(counts)
    }
}

/// Aggregates the status batch and decides.
///
/// The aggregation is returned alongside the verdict for reporting.
///
/// # Errors
///
/// Returns [`DecisionError::DataIntegrity`] if the status batch is not
/// newest-first.
pub fn finish_evaluation(
    counts: RetryLabelCounts,
    reports: &[StatusReport],
    policy: &Policy,
) -> Result<(Verdict, StatusAggregation), DecisionError> {
    let aggregation = aggregate(reports, policy.operator())?;
    let verdict = decide(counts, &aggregation, policy);
    Ok((verdict, aggregation))
}

/// Runs the whole pipeline: reduce labels, aggregate statuses, decide.
///
/// Statuses are not inspected on a first run.
///
/// # Errors
///
/// Returns [`DecisionError::DataIntegrity`] if the status batch is not
/// newest-first.
pub fn evaluate(
    events: &[LabelEvent],
    reports: &[StatusReport],
    policy: &Policy,
) -> Result<Verdict, DecisionError> {
    match begin_evaluation(events, policy) {
        Evaluation::Decided(verdict) => Ok(verdict),
        Evaluation::NeedsStatuses(counts) => {
            finish_evaluation(counts, reports, policy).map(|(verdict, _)| verdict)
        }
    }
}
