#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod config;
pub mod decision;
pub mod forge;
pub mod labels;
pub mod observe;
pub mod rate_limit;
pub mod runner;
pub mod statuses;
pub mod summary;

pub use config::{load_policy, ConfigError, Policy, PolicyFile};
pub use decision::{
    begin_evaluation, decide, evaluate, finish_evaluation, is_first_run, Decision, DecisionError,
    Evaluation, Verdict,
};
pub use forge::{ForgeError, ForgeService, GitHubService, PullRequestRef, RepositoryRef};
pub use labels::{count_retry_label_events, LabelAction, LabelEvent, RetryLabelCounts};
pub use observe::{EventSink, TracingSink};
pub use rate_limit::{check_core_rate_limit, ensure_core_rate_limit, wait_if_needed, RateLimitInfo};
pub use runner::{
    EvaluationError, Runner, RunnerConfig, RunnerError, DEFAULT_PULL_REQUEST_TIMEOUT_SECS,
};
pub use statuses::{
    aggregate, AggregationError, CheckState, Creator, OperatorIdentity, StatusAggregation,
    StatusReport,
};
pub use summary::{ProcessingResult, RunSummary};
