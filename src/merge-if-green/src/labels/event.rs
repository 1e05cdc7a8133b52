//! Label timeline events.

/// Whether a label was attached to or detached from a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelAction {
    /// The `labeled` timeline event.
    Added,

    /// The `unlabeled` timeline event.
    Removed,
}

impl LabelAction {
    /// Maps a GitHub issue event name to a label action.
    ///
    /// Returns `None` for events unrelated to labels.
    #[must_use]
    pub fn from_event_name(name: &str) -> Option<Self> {
        match name {
            "labeled" => Some(Self::Added),
            "unlabeled" => Some(Self::Removed),
            _ => None,
        }
    }
}

/// A single label change in a pull request's history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelEvent {
    /// What happened to the label.
    pub action: LabelAction,

    /// Label name.
    pub label: String,
}

impl LabelEvent {
    /// Creates an event for a label being added.
    pub fn added(label: impl Into<String>) -> Self {
        Self {
            action: LabelAction::Added,
            label: label.into(),
        }
    }

    /// Creates an event for a label being removed.
    pub fn removed(label: impl Into<String>) -> Self {
        Self {
            action: LabelAction::Removed,
            label: label.into(),
        }
    }
}
