//! Mock forge for testing the runner without network access.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use merge_if_green::{
    CheckState, DecisionError, EventSink, ForgeError, ForgeService, LabelEvent, PullRequestRef,
    RepositoryRef, StatusReport, Verdict,
};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Key identifying a pull request across repositories.
pub type PrKey = (String, u64);

fn key(pull_request: &PullRequestRef) -> PrKey {
    (pull_request.repository.full_name(), pull_request.number)
}

fn injected(what: &'static str, repository: &str) -> ForgeError {
    ForgeError::MalformedPayload {
        what,
        repository: repository.to_string(),
        message: "injected failure".to_string(),
    }
}

/// Creates a UTC timestamp from seconds since the epoch.
pub fn at(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap()
}

/// Creates a status report.
pub fn status(context: &str, state: CheckState, creator: &str, secs: i64) -> StatusReport {
    StatusReport::new(context, state, creator, at(secs))
}

/// Mock forge with canned responses, call tracking and error injection.
#[derive(Default)]
pub struct MockForge {
    repositories: Mutex<Vec<RepositoryRef>>,
    pull_requests: Mutex<HashMap<String, Vec<PullRequestRef>>>,
    label_events: Mutex<HashMap<PrKey, Vec<LabelEvent>>>,
    statuses: Mutex<HashMap<PrKey, Vec<StatusReport>>>,
    // Call tracking
    status_calls: Mutex<Vec<PrKey>>,
    add_label_calls: Mutex<Vec<(PrKey, String)>>,
    merge_calls: Mutex<Vec<PrKey>>,
    // Error injection
    fail_list_repositories: Mutex<bool>,
    fail_list_pull_requests: Mutex<HashSet<String>>,
    fail_label_events: Mutex<HashSet<PrKey>>,
    hang_label_events: Mutex<HashSet<PrKey>>,
    fail_merge: Mutex<HashSet<PrKey>>,
}

impl MockForge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a repository with no pull requests.
    pub fn add_repository(&self, owner: &str, name: &str) -> RepositoryRef {
        let repository = RepositoryRef::new(owner, name);
        self.repositories.lock().unwrap().push(repository.clone());
        self.pull_requests
            .lock()
            .unwrap()
            .insert(repository.full_name(), Vec::new());
        repository
    }

    /// Registers an open pull request with its label history and statuses.
    pub fn add_pull_request(
        &self,
        repository: &RepositoryRef,
        number: u64,
        author: &str,
        events: Vec<LabelEvent>,
        statuses: Vec<StatusReport>,
    ) -> PullRequestRef {
        let pull_request = PullRequestRef {
            repository: repository.clone(),
            number,
            title: format!("Bump dependency #{number}"),
            author: author.to_string(),
        };
        self.pull_requests
            .lock()
            .unwrap()
            .entry(repository.full_name())
            .or_default()
            .push(pull_request.clone());
        self.label_events
            .lock()
            .unwrap()
            .insert(key(&pull_request), events);
        self.statuses
            .lock()
            .unwrap()
            .insert(key(&pull_request), statuses);
        pull_request
    }

    // === Error injection methods ===

    pub fn fail_list_repositories(&self) {
        *self.fail_list_repositories.lock().unwrap() = true;
    }

    pub fn fail_list_pull_requests(&self, repository: &RepositoryRef) {
        self.fail_list_pull_requests
            .lock()
            .unwrap()
            .insert(repository.full_name());
    }

    pub fn fail_label_events(&self, pull_request: &PullRequestRef) {
        self.fail_label_events
            .lock()
            .unwrap()
            .insert(key(pull_request));
    }

    /// Makes `label_events` for the pull request never resolve.
    pub fn hang_label_events(&self, pull_request: &PullRequestRef) {
        self.hang_label_events
            .lock()
            .unwrap()
            .insert(key(pull_request));
    }

    pub fn fail_merge(&self, pull_request: &PullRequestRef) {
        self.fail_merge.lock().unwrap().insert(key(pull_request));
    }

    // === Call inspection ===

    pub fn status_calls(&self) -> Vec<PrKey> {
        self.status_calls.lock().unwrap().clone()
    }

    pub fn add_label_calls(&self) -> Vec<(PrKey, String)> {
        self.add_label_calls.lock().unwrap().clone()
    }

    pub fn merge_calls(&self) -> Vec<PrKey> {
        self.merge_calls.lock().unwrap().clone()
    }

    pub fn mutation_count(&self) -> usize {
        self.add_label_calls().len() + self.merge_calls().len()
    }
}

#[async_trait]
impl ForgeService for MockForge {
    async fn list_repositories(
        &self,
        organization: &str,
    ) -> Result<Vec<RepositoryRef>, ForgeError> {
        if *self.fail_list_repositories.lock().unwrap() {
            return Err(injected("repository list", organization));
        }
        Ok(self.repositories.lock().unwrap().clone())
    }

    async fn list_open_pull_requests(
        &self,
        repository: &RepositoryRef,
    ) -> Result<Vec<PullRequestRef>, ForgeError> {
        let name = repository.full_name();
        if self.fail_list_pull_requests.lock().unwrap().contains(&name) {
            return Err(injected("issue list", &name));
        }
        Ok(self
            .pull_requests
            .lock()
            .unwrap()
            .get(&name)
            .cloned()
            .unwrap_or_default())
    }

    async fn label_events(
        &self,
        pull_request: &PullRequestRef,
    ) -> Result<Vec<LabelEvent>, ForgeError> {
        let key = key(pull_request);
        if self.fail_label_events.lock().unwrap().contains(&key) {
            return Err(injected("issue event", &key.0));
        }
        let hangs = self.hang_label_events.lock().unwrap().contains(&key);
        if hangs {
            std::future::pending::<()>().await;
        }
        Ok(self
            .label_events
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .unwrap_or_default())
    }

    async fn status_batch(
        &self,
        pull_request: &PullRequestRef,
    ) -> Result<Vec<StatusReport>, ForgeError> {
        let key = key(pull_request);
        self.status_calls.lock().unwrap().push(key.clone());
        Ok(self
            .statuses
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .unwrap_or_default())
    }

    async fn add_label(
        &self,
        pull_request: &PullRequestRef,
        label: &str,
    ) -> Result<(), ForgeError> {
        self.add_label_calls
            .lock()
            .unwrap()
            .push((key(pull_request), label.to_string()));
        Ok(())
    }

    async fn merge(&self, pull_request: &PullRequestRef) -> Result<(), ForgeError> {
        let key = key(pull_request);
        if self.fail_merge.lock().unwrap().contains(&key) {
            return Err(ForgeError::MergeRejected {
                repository: key.0,
                number: key.1,
                message: "Base branch was modified".to_string(),
            });
        }
        self.merge_calls.lock().unwrap().push(key);
        Ok(())
    }
}

/// Event sink that records what it was told.
#[derive(Default)]
pub struct RecordingSink {
    verdicts: Mutex<Vec<(u64, String, String)>>,
    decisions: Mutex<Vec<(u64, Verdict)>>,
    anomalies: Mutex<Vec<u64>>,
}

impl RecordingSink {
    /// Recorded `(pr, context, creator)` status verdicts.
    pub fn verdicts(&self) -> Vec<(u64, String, String)> {
        self.verdicts.lock().unwrap().clone()
    }

    pub fn decisions(&self) -> Vec<(u64, Verdict)> {
        self.decisions.lock().unwrap().clone()
    }

    pub fn anomalies(&self) -> Vec<u64> {
        self.anomalies.lock().unwrap().clone()
    }
}

impl EventSink for RecordingSink {
    fn status_verdict(&self, pull_request: &PullRequestRef, verdict: &StatusReport, creator: &str) {
        self.verdicts.lock().unwrap().push((
            pull_request.number,
            verdict.context.clone(),
            creator.to_string(),
        ));
    }

    fn decision(&self, pull_request: &PullRequestRef, verdict: &Verdict, _dry_run: bool) {
        self.decisions
            .lock()
            .unwrap()
            .push((pull_request.number, verdict.clone()));
    }

    fn anomaly(&self, pull_request: &PullRequestRef, _error: &DecisionError) {
        self.anomalies.lock().unwrap().push(pull_request.number);
    }
}
