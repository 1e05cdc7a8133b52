//! Commit status states.

use std::fmt;

/// State reported by a commit status.
///
/// GitHub documents `success`, `pending`, `failure` and `error`. Anything
/// else maps to [`CheckState::Other`] rather than being rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CheckState {
    /// The check passed.
    Success,

    /// The check has not finished.
    Pending,

    /// The check ran and failed.
    Failure,

    /// The check could not run.
    Error,

    /// An unrecognized state.
    Other,
}

impl CheckState {
    /// Parses a state string as returned by the statuses API.
    #[must_use]
    pub fn parse(state: &str) -> Self {
        match state {
            "success" => Self::Success,
            "pending" => Self::Pending,
            "failure" => Self::Failure,
            "error" => Self::Error,
            _ => Self::Other,
        }
    }

    /// Returns true for states that count as a failed run.
    #[must_use]
    pub fn is_failure(self) -> bool {
        matches!(self, Self::Failure | Self::Error)
    }

    /// Returns the state as a string.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Pending => "pending",
            Self::Failure => "failure",
            Self::Error => "error",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for CheckState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
