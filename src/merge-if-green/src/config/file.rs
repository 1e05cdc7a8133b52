//! Policy file deserialization.

use crate::config::{ConfigError, Policy};
use crate::statuses::OperatorIdentity;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// Default retry ceiling.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default label that triggers a CI run.
pub const DEFAULT_RETRY_LABEL: &str = "kokoro:force-run";

/// Default substring identifying the retry-label family.
pub const DEFAULT_RETRY_MARKER: &str = "kokoro";

/// Default canonical name of the CI operator.
pub const DEFAULT_OPERATOR_LABEL: &str = "kokoro-team";

/// Parsed contents of a policy TOML file.
///
/// Every key is optional; unset keys fall back to the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PolicyFile {
    /// Retry ceiling.
    pub max_retries: Option<u32>,

    /// Label added to trigger a CI run.
    pub retry_label: Option<String>,

    /// Substring identifying retry labels in the history.
    pub retry_marker: Option<String>,

    /// Canonical name for the CI operator.
    pub operator_label: Option<String>,

    /// Accounts whose statuses count as the CI operator.
    pub operator_accounts: Option<Vec<String>>,

    /// Pull request authors handled by the runner.
    pub bot_authors: Option<Vec<String>>,

    /// Skip pull requests where the operator never reported.
    pub require_operator_activity: Option<bool>,
}

pub(crate) fn default_operator_accounts() -> Vec<String> {
    vec!["symbiflow-robot".to_string()]
}

pub(crate) fn default_bot_authors() -> Vec<String> {
    vec![
        "dependabot-preview[bot]".to_string(),
        "dependabot[bot]".to_string(),
    ]
}

impl PolicyFile {
    /// Reads and parses a policy file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file is missing, unreadable or not valid TOML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "Loading policy file");

        if !path.exists() {
            return Err(ConfigError::MissingFile {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::TomlError {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Fills defaults and validates the result.
    ///
    /// `origin` names where the values came from, for error messages.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if a value is out of range.
    pub fn into_policy(self, origin: &str) -> Result<Policy, ConfigError> {
        let invalid = |message: &str| ConfigError::ValidationError {
            origin: origin.to_string(),
            message: message.to_string(),
        };

        let max_retries = self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES);
        if max_retries < 1 {
            return Err(invalid("max-retries must be at least 1"));
        }

        let retry_label = self
            .retry_label
            .unwrap_or_else(|| DEFAULT_RETRY_LABEL.to_string());
        if retry_label.trim().is_empty() {
            return Err(invalid("retry-label must not be empty"));
        }

        let retry_marker = self
            .retry_marker
            .unwrap_or_else(|| DEFAULT_RETRY_MARKER.to_string());
        if retry_marker.is_empty() {
            return Err(invalid("retry-marker must not be empty"));
        }

        // Otherwise labels added by the bot would never be counted.
        if !retry_label.contains(&retry_marker) {
            return Err(invalid("retry-label must contain retry-marker"));
        }

        let operator_label = self
            .operator_label
            .unwrap_or_else(|| DEFAULT_OPERATOR_LABEL.to_string());
        if operator_label.trim().is_empty() {
            return Err(invalid("operator-label must not be empty"));
        }

        let operator_accounts = self
            .operator_accounts
            .unwrap_or_else(default_operator_accounts);
        if operator_accounts.iter().all(|a| a.trim().is_empty()) {
            return Err(invalid("operator-accounts must name at least one account"));
        }

        let bot_authors = self.bot_authors.unwrap_or_else(default_bot_authors);
        if bot_authors.iter().all(|a| a.trim().is_empty()) {
            return Err(invalid("bot-authors must name at least one account"));
        }

        Ok(Policy {
            max_retries,
            retry_label,
            retry_marker,
            operator: OperatorIdentity::new(
                operator_label,
                operator_accounts.into_iter().filter(|a| !a.trim().is_empty()),
            ),
            bot_authors: bot_authors
                .into_iter()
                .filter(|a| !a.trim().is_empty())
                .collect(),
            require_operator_activity: self.require_operator_activity.unwrap_or(true),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let file: PolicyFile = toml::from_str("").unwrap();
        let policy = file.into_policy("test").unwrap();

        assert_eq!(policy.max_retries(), DEFAULT_MAX_RETRIES);
        assert_eq!(policy.retry_label(), DEFAULT_RETRY_LABEL);
        assert_eq!(policy.retry_marker(), DEFAULT_RETRY_MARKER);
        assert_eq!(policy.operator().label(), DEFAULT_OPERATOR_LABEL);
        assert!(policy.is_bot_author("dependabot-preview[bot]"));
        assert!(policy.require_operator_activity());
    }

    #[test]
    fn parses_kebab_case_keys() {
        let file: PolicyFile = toml::from_str(
            r#"
max-retries = 5
retry-label = "ci:rerun"
retry-marker = "ci:"
operator-label = "ci-team"
operator-accounts = ["ci-robot", "ci-robot-2"]
bot-authors = ["renovate[bot]"]
require-operator-activity = false
"#,
        )
        .unwrap();

        let policy = file.into_policy("test").unwrap();

        assert_eq!(policy.max_retries(), 5);
        assert_eq!(policy.retry_label(), "ci:rerun");
        assert_eq!(policy.retry_marker(), "ci:");
        assert_eq!(policy.operator().label(), "ci-team");
        assert_eq!(policy.operator().accounts().count(), 2);
        assert!(policy.is_bot_author("renovate[bot]"));
        assert!(!policy.is_bot_author("dependabot[bot]"));
        assert!(!policy.require_operator_activity());
    }

    #[test]
    fn rejects_unknown_keys() {
        let result: Result<PolicyFile, _> = toml::from_str("max-retry = 2");
        assert!(result.is_err());
    }

    #[test]
    fn rejects_zero_retries() {
        let file = PolicyFile {
            max_retries: Some(0),
            ..Default::default()
        };
        let result = file.into_policy("test");
        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }

    #[test]
    fn rejects_label_outside_marker_family() {
        let file = PolicyFile {
            retry_label: Some("rerun-ci".to_string()),
            ..Default::default()
        };
        let result = file.into_policy("test");
        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }

    #[test]
    fn rejects_empty_operator_accounts() {
        let file = PolicyFile {
            operator_accounts: Some(vec![" ".to_string()]),
            ..Default::default()
        };
        let result = file.into_policy("test");
        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }

    #[test]
    fn rejects_empty_bot_authors() {
        let file = PolicyFile {
            bot_authors: Some(Vec::new()),
            ..Default::default()
        };
        let result = file.into_policy("test");
        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }
}
