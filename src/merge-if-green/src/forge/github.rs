//! GitHub implementation of [`ForgeService`] using octocrab.

use crate::forge::{ForgeError, ForgeService, PullRequestRef, RepositoryRef};
use crate::labels::{LabelAction, LabelEvent};
use crate::rate_limit::ensure_core_rate_limit;
use crate::statuses::{CheckState, StatusReport};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use octocrab::params::{issues::Sort, Direction, State};
use octocrab::{Octocrab, Page};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, info_span, Instrument};

/// Results per page for list endpoints.
const RESULTS_PER_PAGE: u8 = 100;

/// Connect timeout for API requests.
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Read timeout for API requests.
const READ_TIMEOUT_SECS: u64 = 30;

/// Login GitHub shows for deleted accounts.
const GHOST_LOGIN: &str = "ghost";

#[derive(Serialize)]
struct PageParams {
    per_page: u8,
}

const PAGE_PARAMS: PageParams = PageParams {
    per_page: RESULTS_PER_PAGE,
};

/// Entry of `GET /repos/{owner}/{repo}/issues/{number}/events`.
#[derive(Debug, Deserialize)]
struct RawIssueEvent {
    event: String,
    label: Option<RawLabel>,
}

#[derive(Debug, Deserialize)]
struct RawLabel {
    name: String,
}

/// Entry of `GET /repos/{owner}/{repo}/commits/{ref}/statuses`.
#[derive(Debug, Deserialize)]
struct RawStatus {
    context: String,
    state: String,
    creator: Option<RawUser>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct RawUser {
    login: String,
}

/// GitHub service backed by an authenticated octocrab client.
#[derive(Clone)]
pub struct GitHubService {
    octocrab: Octocrab,
}

impl GitHubService {
    /// Builds a service authenticated with a personal access token.
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError`] if the client cannot be constructed.
    pub fn new(token: &str) -> Result<Self, ForgeError> {
        let octocrab = Octocrab::builder()
            .personal_token(token.to_string())
            .set_connect_timeout(Some(Duration::from_secs(CONNECT_TIMEOUT_SECS)))
            .set_read_timeout(Some(Duration::from_secs(READ_TIMEOUT_SECS)))
            .build()?;
        Ok(Self { octocrab })
    }

    async fn head_sha(&self, pull_request: &PullRequestRef) -> Result<String, ForgeError> {
        let repo = &pull_request.repository;
        ensure_core_rate_limit(&self.octocrab).await?;
        let pr = self
            .octocrab
            .pulls(&repo.owner, &repo.name)
            .get(pull_request.number)
            .await?;
        Ok(pr.head.sha)
    }
}

#[async_trait]
impl ForgeService for GitHubService {
    async fn list_repositories(
        &self,
        organization: &str,
    ) -> Result<Vec<RepositoryRef>, ForgeError> {
        let span = info_span!("list_repositories", organization = %organization);

        async {
            ensure_core_rate_limit(&self.octocrab).await?;
            let first = self
                .octocrab
                .orgs(organization)
                .list_repos()
                .per_page(RESULTS_PER_PAGE)
                .send()
                .await?;
            let repositories = collect_pages(&self.octocrab, first).await?;

            let total = repositories.len();
            let active: Vec<RepositoryRef> = repositories
                .into_iter()
                .filter(|repo| !repo.archived.unwrap_or(false))
                .filter_map(|repo| {
                    let owner = repo.owner?.login;
                    Some(RepositoryRef::new(owner, repo.name))
                })
                .collect();

            info!(total, active = active.len(), "Listed repositories");
            Ok(active)
        }
        .instrument(span)
        .await
    }

    async fn list_open_pull_requests(
        &self,
        repository: &RepositoryRef,
    ) -> Result<Vec<PullRequestRef>, ForgeError> {
        let span = info_span!("list_pull_requests", repo = %repository);

        async {
            // The issues endpoint returns pull requests too; keep only those.
            ensure_core_rate_limit(&self.octocrab).await?;
            let first = self
                .octocrab
                .issues(&repository.owner, &repository.name)
                .list()
                .state(State::Open)
                .sort(Sort::Created)
                .direction(Direction::Ascending)
                .per_page(RESULTS_PER_PAGE)
                .send()
                .await?;
            let issues = collect_pages(&self.octocrab, first).await?;

            let pull_requests: Vec<PullRequestRef> = issues
                .into_iter()
                .filter(|issue| issue.pull_request.is_some())
                .map(|issue| PullRequestRef {
                    repository: repository.clone(),
                    number: issue.number,
                    title: issue.title,
                    author: issue.user.login,
                })
                .collect();

            debug!(count = pull_requests.len(), "Listed open pull requests");
            Ok(pull_requests)
        }
        .instrument(span)
        .await
    }

    async fn label_events(
        &self,
        pull_request: &PullRequestRef,
    ) -> Result<Vec<LabelEvent>, ForgeError> {
        let repo = &pull_request.repository;
        let route = format!(
            "/repos/{}/{}/issues/{}/events",
            repo.owner, repo.name, pull_request.number
        );

        ensure_core_rate_limit(&self.octocrab).await?;
        let first: Page<RawIssueEvent> = self.octocrab.get(&route, Some(&PAGE_PARAMS)).await?;
        let raw = collect_pages(&self.octocrab, first).await?;

        let events = convert_label_events(raw, repo)?;
        debug!(
            pr = pull_request.number,
            count = events.len(),
            "Fetched label events"
        );
        Ok(events)
    }

    async fn status_batch(
        &self,
        pull_request: &PullRequestRef,
    ) -> Result<Vec<StatusReport>, ForgeError> {
        let repo = &pull_request.repository;
        let sha = self.head_sha(pull_request).await?;
        let route = format!(
            "/repos/{}/{}/commits/{}/statuses",
            repo.owner, repo.name, sha
        );

        ensure_core_rate_limit(&self.octocrab).await?;
        let first: Page<RawStatus> = self.octocrab.get(&route, Some(&PAGE_PARAMS)).await?;
        let raw = collect_pages(&self.octocrab, first).await?;

        let reports = convert_statuses(raw);
        debug!(
            pr = pull_request.number,
            sha = %sha,
            count = reports.len(),
            "Fetched status batch"
        );
        Ok(reports)
    }

    async fn add_label(
        &self,
        pull_request: &PullRequestRef,
        label: &str,
    ) -> Result<(), ForgeError> {
        let repo = &pull_request.repository;
        ensure_core_rate_limit(&self.octocrab).await?;
        self.octocrab
            .issues(&repo.owner, &repo.name)
            .add_labels(pull_request.number, &[label.to_string()])
            .await?;

        info!(pr = pull_request.number, label, "Label added");
        Ok(())
    }

    async fn merge(&self, pull_request: &PullRequestRef) -> Result<(), ForgeError> {
        let repo = &pull_request.repository;
        ensure_core_rate_limit(&self.octocrab).await?;
        let result = self
            .octocrab
            .pulls(&repo.owner, &repo.name)
            .merge(pull_request.number)
            .send()
            .await?;

        if !result.merged {
            return Err(ForgeError::MergeRejected {
                repository: repo.full_name(),
                number: pull_request.number,
                message: result.message.unwrap_or_default(),
            });
        }

        info!(pr = pull_request.number, sha = ?result.sha, "Pull request merged");
        Ok(())
    }
}

/// Collects every page of a listing, checking the rate limit between pages.
async fn collect_pages<T: DeserializeOwned>(
    octocrab: &Octocrab,
    mut page: Page<T>,
) -> Result<Vec<T>, ForgeError> {
    let mut items = page.take_items();

    while let Some(mut next_page) = octocrab.get_page::<T>(&page.next).await? {
        items.extend(next_page.take_items());
        page.next = next_page.next;

        if page.next.is_none() {
            break;
        }

        ensure_core_rate_limit(octocrab).await?;
    }

    Ok(items)
}

/// Keeps label events, in order, and drops every other issue event.
fn convert_label_events(
    raw: Vec<RawIssueEvent>,
    repository: &RepositoryRef,
) -> Result<Vec<LabelEvent>, ForgeError> {
    let mut events = Vec::new();

    for event in raw {
        let Some(action) = LabelAction::from_event_name(&event.event) else {
            continue;
        };
        let label = event.label.ok_or_else(|| ForgeError::MalformedPayload {
            what: "issue event",
            repository: repository.full_name(),
            message: format!("'{}' event without a label", event.event),
        })?;
        events.push(LabelEvent {
            action,
            label: label.name,
        });
    }

    Ok(events)
}

/// Converts raw statuses, preserving the API's newest-first order.
fn convert_statuses(raw: Vec<RawStatus>) -> Vec<StatusReport> {
    raw.into_iter()
        .map(|status| StatusReport {
            context: status.context,
            state: CheckState::parse(&status.state),
            creator: status
                .creator
                .map_or_else(|| GHOST_LOGIN.to_string(), |user| user.login),
            updated_at: status.updated_at,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> RepositoryRef {
        RepositoryRef::new("SymbiFlow", "prjxray")
    }

    #[test]
    fn keeps_only_label_events_in_order() {
        let raw: Vec<RawIssueEvent> = serde_json::from_str(
            r#"[
                {"event": "labeled", "label": {"name": "dependencies", "color": "0366d6"}},
                {"event": "referenced", "commit_id": "abc"},
                {"event": "labeled", "label": {"name": "kokoro:force-run", "color": "ff0000"}},
                {"event": "unlabeled", "label": {"name": "kokoro:force-run", "color": "ff0000"}}
            ]"#,
        )
        .unwrap();

        let events = convert_label_events(raw, &repo()).unwrap();

        assert_eq!(
            events,
            vec![
                LabelEvent::added("dependencies"),
                LabelEvent::added("kokoro:force-run"),
                LabelEvent::removed("kokoro:force-run"),
            ]
        );
    }

    #[test]
    fn label_event_without_label_is_malformed() {
        let raw: Vec<RawIssueEvent> =
            serde_json::from_str(r#"[{"event": "labeled", "label": null}]"#).unwrap();

        let result = convert_label_events(raw, &repo());
        assert!(matches!(result, Err(ForgeError::MalformedPayload { .. })));
    }

    #[test]
    fn converts_statuses_in_api_order() {
        let raw: Vec<RawStatus> = serde_json::from_str(
            r#"[
                {
                    "context": "kokoro",
                    "state": "success",
                    "creator": {"login": "symbiflow-robot", "id": 1},
                    "created_at": "2020-05-01T10:00:00Z",
                    "updated_at": "2020-05-01T11:00:00Z"
                },
                {
                    "context": "kokoro",
                    "state": "weird",
                    "creator": null,
                    "updated_at": "2020-05-01T09:00:00Z"
                }
            ]"#,
        )
        .unwrap();

        let reports = convert_statuses(raw);

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].state, CheckState::Success);
        assert_eq!(reports[0].creator, "symbiflow-robot");
        assert!(reports[0].updated_at > reports[1].updated_at);
        assert_eq!(reports[1].state, CheckState::Other);
        assert_eq!(reports[1].creator, GHOST_LOGIN);
    }
}
