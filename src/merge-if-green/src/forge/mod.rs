//! Forge access for pull request history, statuses and actions.
//!
//! The decision engine never talks to the network. Everything it needs is
//! fetched through [`ForgeService`], which also applies the resulting
//! actions. [`GitHubService`] is the production implementation.

mod error;
mod github;
mod types;

pub use error::ForgeError;
pub use github::GitHubService;
pub use types::{PullRequestRef, RepositoryRef};

use crate::labels::LabelEvent;
use crate::statuses::StatusReport;
use async_trait::async_trait;

/// Source of pull request data and applier of decisions.
#[async_trait]
pub trait ForgeService: Send + Sync {
    /// Lists the organization's repositories, excluding archived ones.
    async fn list_repositories(&self, organization: &str)
        -> Result<Vec<RepositoryRef>, ForgeError>;

    /// Lists open pull requests in a repository, oldest first.
    async fn list_open_pull_requests(
        &self,
        repository: &RepositoryRef,
    ) -> Result<Vec<PullRequestRef>, ForgeError>;

    /// Returns the label additions and removals of a pull request, in
    /// history order.
    async fn label_events(&self, pull_request: &PullRequestRef)
        -> Result<Vec<LabelEvent>, ForgeError>;

    /// Returns the statuses posted on the pull request's head commit,
    /// newest first.
    async fn status_batch(
        &self,
        pull_request: &PullRequestRef,
    ) -> Result<Vec<StatusReport>, ForgeError>;

    /// Adds a label to the pull request.
    async fn add_label(&self, pull_request: &PullRequestRef, label: &str)
        -> Result<(), ForgeError>;

    /// Merges the pull request.
    async fn merge(&self, pull_request: &PullRequestRef) -> Result<(), ForgeError>;
}
