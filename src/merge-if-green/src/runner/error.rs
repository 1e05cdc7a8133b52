//! Runner error types.

use crate::decision::DecisionError;
use crate::forge::ForgeError;

/// Errors that abort a whole run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Policy loading errors.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// Forge errors that affect the whole organization.
    #[error(transparent)]
    Forge(#[from] ForgeError),
}

/// Errors that stop a single pull request from being decided.
#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    /// Label history or statuses could not be fetched.
    #[error(transparent)]
    Forge(#[from] ForgeError),

    /// The fetched statuses were inconsistent.
    #[error(transparent)]
    Decision(#[from] DecisionError),

    /// Fetching and applying did not finish in time.
    #[error("Timed out after {0} seconds")]
    Timeout(u64),
}
