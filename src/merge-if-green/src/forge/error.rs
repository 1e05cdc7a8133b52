//! Forge error types.

use thiserror::Error;

/// Errors that can occur while talking to the forge.
#[derive(Debug, Error)]
pub enum ForgeError {
    /// GitHub API error.
    #[error("GitHub API error: {0}")]
    GitHubError(#[from] octocrab::Error),

    /// The API returned data the bot cannot interpret.
    #[error("Malformed {what} from {repository}: {message}")]
    MalformedPayload {
        what: &'static str,
        repository: String,
        message: String,
    },

    /// The merge endpoint answered but did not merge.
    #[error("Merge of {repository}#{number} was rejected: {message}")]
    MergeRejected {
        repository: String,
        number: u64,
        message: String,
    },
}
