//! Validated retry and merge policy.

use crate::config::file::{
    default_bot_authors, default_operator_accounts, DEFAULT_MAX_RETRIES, DEFAULT_OPERATOR_LABEL,
    DEFAULT_RETRY_LABEL, DEFAULT_RETRY_MARKER,
};
use crate::statuses::OperatorIdentity;
use std::collections::BTreeSet;

/// Settings consumed by the decision engine and the runner.
///
/// Built from a [`PolicyFile`](crate::config::PolicyFile), which validates
/// every field, or from [`Policy::default`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    pub(crate) max_retries: u32,
    pub(crate) retry_label: String,
    pub(crate) retry_marker: String,
    pub(crate) operator: OperatorIdentity,
    pub(crate) bot_authors: BTreeSet<String>,
    pub(crate) require_operator_activity: bool,
}

impl Policy {
    /// Maximum number of retry labels added before giving up.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Label added to trigger a CI run.
    pub fn retry_label(&self) -> &str {
        &self.retry_label
    }

    /// Substring identifying retry labels in the history.
    pub fn retry_marker(&self) -> &str {
        &self.retry_marker
    }

    /// CI operator identity mapping.
    pub fn operator(&self) -> &OperatorIdentity {
        &self.operator
    }

    /// Returns true if the runner should handle pull requests by `login`.
    pub fn is_bot_author(&self, login: &str) -> bool {
        self.bot_authors.contains(login)
    }

    /// Whether pull requests without operator statuses are skipped.
    pub fn require_operator_activity(&self) -> bool {
        self.require_operator_activity
    }
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            retry_label: DEFAULT_RETRY_LABEL.to_string(),
            retry_marker: DEFAULT_RETRY_MARKER.to_string(),
            operator: OperatorIdentity::new(DEFAULT_OPERATOR_LABEL, default_operator_accounts()),
            bot_authors: default_bot_authors().into_iter().collect(),
            require_operator_activity: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PolicyFile;

    #[test]
    fn default_matches_empty_file() {
        let from_file = PolicyFile::default().into_policy("defaults").unwrap();
        assert_eq!(from_file, Policy::default());
    }
}
