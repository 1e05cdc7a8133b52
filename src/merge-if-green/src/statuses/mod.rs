//! Commit status aggregation.
//!
//! Status providers post a new report every time a check is re-run, so a
//! pull request's head commit usually carries several reports per context.
//! This module collapses them to the latest report per context and tallies
//! the result by state and by creator.

mod creator;
mod error;
mod report;
mod state;

pub use creator::{Creator, OperatorIdentity};
pub use error::AggregationError;
pub use report::StatusReport;
pub use state::CheckState;

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// Latest verdict per context plus derived tallies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusAggregation {
    verdicts: BTreeMap<String, StatusReport>,
    states: BTreeMap<CheckState, usize>,
    creators: BTreeMap<Creator, usize>,
    failures_by_creator: BTreeMap<Creator, usize>,
}

impl StatusAggregation {
    /// Verdicts keyed by context name, in context order.
    pub fn verdicts(&self) -> &BTreeMap<String, StatusReport> {
        &self.verdicts
    }

    /// Number of distinct contexts.
    #[must_use]
    pub fn context_count(&self) -> usize {
        self.verdicts.len()
    }

    /// Number of verdicts in the given state.
    #[must_use]
    pub fn state_count(&self, state: CheckState) -> usize {
        self.states.get(&state).copied().unwrap_or(0)
    }

    /// Number of verdicts posted by the given creator.
    #[must_use]
    pub fn creator_count(&self, creator: &Creator) -> usize {
        self.creators.get(creator).copied().unwrap_or(0)
    }

    /// Number of failure or error verdicts posted by the given creator.
    #[must_use]
    pub fn failure_count(&self, creator: &Creator) -> usize {
        self.failures_by_creator.get(creator).copied().unwrap_or(0)
    }

    /// Returns true if the CI operator posted at least one verdict.
    #[must_use]
    pub fn operator_reported(&self) -> bool {
        self.creator_count(&Creator::Operator) > 0
    }

    /// Verdict counts per state.
    pub fn states(&self) -> &BTreeMap<CheckState, usize> {
        &self.states
    }

    fn tally(verdicts: BTreeMap<String, StatusReport>, operator: &OperatorIdentity) -> Self {
        let mut states = BTreeMap::new();
        let mut creators = BTreeMap::new();
        let mut failures_by_creator = BTreeMap::new();

        for verdict in verdicts.values() {
            *states.entry(verdict.state).or_insert(0) += 1;

            let creator = operator.normalize(&verdict.creator);
            if verdict.state.is_failure() {
                *failures_by_creator.entry(creator.clone()).or_insert(0) += 1;
            }
            *creators.entry(creator).or_insert(0) += 1;
        }

        Self {
            verdicts,
            states,
            creators,
            failures_by_creator,
        }
    }
}

/// Reduces a newest-first batch of status reports to one verdict per context.
///
/// The first report seen for a context wins. A later report that is newer
/// than the installed one means the batch was not newest-first, and the
/// whole batch is rejected rather than guessing which report is current.
///
/// # Errors
///
/// Returns [`AggregationError::OutOfOrder`] when the batch violates the
/// newest-first ordering.
pub fn aggregate<'a, I>(
    reports: I,
    operator: &OperatorIdentity,
) -> Result<StatusAggregation, AggregationError>
where
    I: IntoIterator<Item = &'a StatusReport>,
{
    let mut verdicts: BTreeMap<String, StatusReport> = BTreeMap::new();

    for report in reports {
        match verdicts.entry(report.context.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(report.clone());
            }
            Entry::Occupied(slot) => {
                let installed = slot.get();
                if installed.updated_at < report.updated_at {
                    return Err(AggregationError::OutOfOrder {
                        context: report.context.clone(),
                        installed_at: installed.updated_at,
                        offending_at: report.updated_at,
                    });
                }
            }
        }
    }

    Ok(StatusAggregation::tally(verdicts, operator))
}
