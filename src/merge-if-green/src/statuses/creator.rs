//! Status creator identities.

use std::collections::BTreeSet;

/// Normalized identity of the account that posted a status.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Creator {
    /// The CI operator whose checks gate retries and merges.
    Operator,

    /// Any other account, by login.
    Account(String),
}

/// Maps known automation accounts onto the canonical CI operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorIdentity {
    label: String,
    accounts: BTreeSet<String>,
}

impl OperatorIdentity {
    /// Creates an identity with a canonical label and the accounts it covers.
    pub fn new<I, S>(label: impl Into<String>, accounts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            label: label.into(),
            accounts: accounts.into_iter().map(Into::into).collect(),
        }
    }

    /// Canonical operator label (e.g. "kokoro-team").
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Accounts that normalize to the operator.
    pub fn accounts(&self) -> impl Iterator<Item = &str> {
        self.accounts.iter().map(String::as_str)
    }

    /// Normalizes a creator login.
    ///
    /// The canonical label itself also counts as the operator, so statuses
    /// already attributed to it are not split into a separate bucket.
    #[must_use]
    pub fn normalize(&self, login: &str) -> Creator {
        if login == self.label || self.accounts.contains(login) {
            Creator::Operator
        } else {
            Creator::Account(login.to_string())
        }
    }

    /// Human-readable name for a normalized creator.
    #[must_use]
    pub fn display_name<'a>(&'a self, creator: &'a Creator) -> &'a str {
        match creator {
            Creator::Operator => &self.label,
            Creator::Account(login) => login,
        }
    }
}
