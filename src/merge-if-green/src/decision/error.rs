//! Decision error types.

use crate::statuses::AggregationError;
use thiserror::Error;

/// Errors that prevent a decision from being made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecisionError {
    /// The status batch could not be trusted.
    #[error("data integrity anomaly: {0}")]
    DataIntegrity(#[from] AggregationError),
}
