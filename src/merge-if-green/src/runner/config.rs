//! Runner configuration.

use std::time::Duration;

/// Default time allowed for deciding and applying one pull request.
pub const DEFAULT_PULL_REQUEST_TIMEOUT_SECS: u64 = 300;

/// Configuration for a maintenance run over one organization.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Organization whose repositories are scanned.
    organization: String,
    /// Whether to decide without labeling or merging anything.
    dry_run: bool,
    /// Time allowed per pull request before it is recorded as failed.
    pull_request_timeout: Duration,
}

impl RunnerConfig {
    /// Creates a new configuration for a run.
    pub fn new(organization: impl Into<String>, dry_run: bool) -> Self {
        Self {
            organization: organization.into(),
            dry_run,
            pull_request_timeout: Duration::from_secs(DEFAULT_PULL_REQUEST_TIMEOUT_SECS),
        }
    }

    /// Sets the time allowed per pull request.
    #[must_use]
    pub fn with_pull_request_timeout(mut self, timeout: Duration) -> Self {
        self.pull_request_timeout = timeout;
        self
    }

    /// Returns the organization name.
    pub fn organization(&self) -> &str {
        &self.organization
    }

    /// Returns whether dry-run mode is enabled.
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Returns the time allowed per pull request.
    pub fn pull_request_timeout(&self) -> Duration {
        self.pull_request_timeout
    }
}
