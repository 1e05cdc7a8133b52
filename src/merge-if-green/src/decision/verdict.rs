//! Decision outcomes.

use serde::Serialize;
use std::fmt;

/// What to do with a pull request on this pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Add the retry label to (re)trigger CI.
    AddRetryLabel,

    /// CI is still running.
    Wait,

    /// The retry budget is spent.
    GiveUp,

    /// Every check is green.
    Merge,

    /// Nothing actionable.
    Skip,
}

impl Decision {
    /// Returns the decision as a string.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AddRetryLabel => "add_retry_label",
            Self::Wait => "wait",
            Self::GiveUp => "give_up",
            Self::Merge => "merge",
            Self::Skip => "skip",
        }
    }

    /// Returns true if applying the decision changes the pull request.
    #[must_use]
    pub fn is_mutating(self) -> bool {
        matches!(self, Self::AddRetryLabel | Self::Merge)
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decision with the reason it was reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    /// The decision.
    pub decision: Decision,

    /// Human-readable rationale for logs.
    pub rationale: String,
}

impl Verdict {
    pub(crate) fn new(decision: Decision, rationale: impl Into<String>) -> Self {
        Self {
            decision,
            rationale: rationale.into(),
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.decision, self.rationale)
    }
}
