//! Status aggregation error types.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur while aggregating a status batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregationError {
    /// The batch was not delivered newest-first.
    #[error(
        "status batch out of order for context '{context}': \
         {offending_at} arrived after {installed_at}"
    )]
    OutOfOrder {
        context: String,
        installed_at: DateTime<Utc>,
        offending_at: DateTime<Utc>,
    },
}
