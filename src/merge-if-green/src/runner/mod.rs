//! Orchestrates a maintenance pass over an organization's bot pull requests.
//!
//! Pull requests are handled one at a time: fetch the label history, decide,
//! and apply. A failure on one pull request is recorded in the summary and
//! the run moves on to the next.

mod config;
mod error;

pub use config::{RunnerConfig, DEFAULT_PULL_REQUEST_TIMEOUT_SECS};
pub use error::{EvaluationError, RunnerError};

use crate::config::Policy;
use crate::decision::{begin_evaluation, finish_evaluation, Decision, Evaluation, Verdict};
use crate::forge::{ForgeError, ForgeService, PullRequestRef, RepositoryRef};
use crate::observe::{EventSink, TracingSink};
use crate::summary::{ProcessingResult, RunSummary};
use tracing::{debug, error, info, info_span, Instrument};

/// Runs the retry/merge policy against every bot pull request.
pub struct Runner<F, S = TracingSink> {
    config: RunnerConfig,
    policy: Policy,
    forge: F,
    sink: S,
}

impl<F: ForgeService> Runner<F> {
    /// Builds a runner that reports through `tracing`.
    pub fn new(config: RunnerConfig, policy: Policy, forge: F) -> Self {
        Self {
            config,
            policy,
            forge,
            sink: TracingSink,
        }
    }
}

impl<F: ForgeService, S: EventSink> Runner<F, S> {
    /// Replaces the event sink.
    pub fn with_sink<T: EventSink>(self, sink: T) -> Runner<F, T> {
        Runner {
            config: self.config,
            policy: self.policy,
            forge: self.forge,
            sink,
        }
    }

    /// Returns the forge.
    pub fn forge(&self) -> &F {
        &self.forge
    }

    /// Returns the event sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Executes the full pass over the organization.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] only if the organization's repositories cannot
    /// be listed. Per-repository and per-pull-request failures are recorded
    /// in the summary instead.
    pub async fn run(&self) -> Result<RunSummary, RunnerError> {
        let mut summary = RunSummary::new(self.config.dry_run());
        let organization = self.config.organization();

        info!(organization, "Getting all repos");
        let repositories = self.forge.list_repositories(organization).await?;
        summary.repositories_discovered = repositories.len();

        for repository in &repositories {
            self.process_repository(repository, &mut summary).await;
        }

        Ok(summary)
    }

    async fn process_repository(&self, repository: &RepositoryRef, summary: &mut RunSummary) {
        info!(repo = %repository, "Getting all PRs");

        let pull_requests = match self.forge.list_open_pull_requests(repository).await {
            Ok(pull_requests) => pull_requests,
            Err(e) => {
                error!(repo = %repository, error = %e, "Failed to list pull requests");
                summary.repositories_failed += 1;
                return;
            }
        };

        for pull_request in &pull_requests {
            if !self.policy.is_bot_author(&pull_request.author) {
                debug!(
                    repo = %repository,
                    pr = pull_request.number,
                    author = %pull_request.author,
                    "Not a bot pull request"
                );
                continue;
            }

            let result = self.process_pull_request(pull_request).await;
            summary.record_result(&result);
        }
    }

    /// Decides and applies the policy for one pull request.
    ///
    /// Gives up on the pull request if fetching and applying together take
    /// longer than the configured timeout.
    pub async fn process_pull_request(&self, pull_request: &PullRequestRef) -> ProcessingResult {
        let span = info_span!(
            "pull_request",
            repo = %pull_request.repository,
            pr = pull_request.number
        );
        let limit = self.config.pull_request_timeout();

        async {
            info!(title = %pull_request.title, "Evaluating pull request");

            tokio::time::timeout(limit, self.decide_and_apply(pull_request))
                .await
                .unwrap_or_else(|_| {
                    let e = EvaluationError::Timeout(limit.as_secs());
                    error!(error = %e, "Pull request processing timed out");
                    ProcessingResult::Failed {
                        pull_request: pull_request.clone(),
                        error: e.to_string(),
                    }
                })
        }
        .instrument(span)
        .await
    }

    async fn decide_and_apply(&self, pull_request: &PullRequestRef) -> ProcessingResult {
        let verdict = match self.evaluate(pull_request).await {
            Ok(verdict) => verdict,
            Err(EvaluationError::Decision(e)) => {
                self.sink.anomaly(pull_request, &e);
                return ProcessingResult::Anomaly {
                    pull_request: pull_request.clone(),
                    error: e.to_string(),
                };
            }
            Err(e) => {
                error!(error = %e, "Failed to fetch pull request data");
                return ProcessingResult::Failed {
                    pull_request: pull_request.clone(),
                    error: e.to_string(),
                };
            }
        };

        self.sink.decision(pull_request, &verdict, self.config.dry_run());

        match self.apply(pull_request, &verdict).await {
            Ok(applied) => ProcessingResult::Decided {
                pull_request: pull_request.clone(),
                verdict,
                applied,
            },
            Err(e) => {
                error!(decision = %verdict.decision, error = %e, "Failed to apply decision");
                ProcessingResult::Failed {
                    pull_request: pull_request.clone(),
                    error: e.to_string(),
                }
            }
        }
    }

    /// Fetches what the policy needs and decides.
    ///
    /// Statuses are only fetched once the pull request has had a retry label.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError`] if fetching fails or the statuses are
    /// out of order.
    pub async fn evaluate(&self, pull_request: &PullRequestRef) -> Result<Verdict, EvaluationError> {
        let events = self.forge.label_events(pull_request).await?;
        let counts = match begin_evaluation(&events, &self.policy) {
            Evaluation::Decided(verdict) => return Ok(verdict),
            Evaluation::NeedsStatuses(counts) => counts,
        };
        debug!(added = counts.added, removed = counts.removed, "Retry label history");

        let reports = self.forge.status_batch(pull_request).await?;
        let (verdict, aggregation) = finish_evaluation(counts, &reports, &self.policy)?;

        let operator = self.policy.operator();
        for report in aggregation.verdicts().values() {
            let creator = operator.normalize(&report.creator);
            self.sink
                .status_verdict(pull_request, report, operator.display_name(&creator));
        }

        Ok(verdict)
    }

    /// Carries out a verdict. Returns true if the pull request was changed.
    async fn apply(
        &self,
        pull_request: &PullRequestRef,
        verdict: &Verdict,
    ) -> Result<bool, ForgeError> {
        if !verdict.decision.is_mutating() {
            return Ok(false);
        }

        if self.config.dry_run() {
            info!(decision = %verdict.decision, "[DRY RUN] Not applying decision");
            return Ok(false);
        }

        match verdict.decision {
            Decision::AddRetryLabel => {
                self.forge
                    .add_label(pull_request, self.policy.retry_label())
                    .await?;
            }
            Decision::Merge => self.forge.merge(pull_request).await?,
            Decision::Wait | Decision::GiveUp | Decision::Skip => return Ok(false),
        }

        Ok(true)
    }
}
