//! Retry-label history reduction.
//!
//! The retry ceiling is driven by how many times the retry label was ever
//! added to a pull request, so the label timeline is reduced to a pair of
//! counts before any decision is made.

mod event;

pub use event::{LabelAction, LabelEvent};

/// Number of times a retry-family label was added and removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryLabelCounts {
    /// Times a label containing the retry marker was added.
    pub added: u32,

    /// Times a label containing the retry marker was removed.
    pub removed: u32,
}

/// Tallies retry-label additions and removals in a label history.
///
/// Only labels whose name contains `marker` are counted. The whole sequence
/// is consumed; ordering does not affect the result.
pub fn count_retry_label_events<'a, I>(events: I, marker: &str) -> RetryLabelCounts
where
    I: IntoIterator<Item = &'a LabelEvent>,
{
    events
        .into_iter()
        .filter(|event| event.label.contains(marker))
        .fold(RetryLabelCounts::default(), |mut counts, event| {
            match event.action {
                LabelAction::Added => counts.added += 1,
                LabelAction::Removed => counts.removed += 1,
            }
            counts
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_history_counts_nothing() {
        let events: Vec<LabelEvent> = Vec::new();
        let counts = count_retry_label_events(&events, "kokoro");
        assert_eq!(counts, RetryLabelCounts::default());
    }

    #[test]
    fn counts_only_marker_labels() {
        let events = vec![
            LabelEvent::added("kokoro:force-run"),
            LabelEvent::added("dependencies"),
            LabelEvent::removed("kokoro:force-run"),
            LabelEvent::added("kokoro:run"),
            LabelEvent::removed("merge-if-green"),
        ];

        let counts = count_retry_label_events(&events, "kokoro");

        assert_eq!(counts.added, 2);
        assert_eq!(counts.removed, 1);
    }

    #[test]
    fn order_does_not_matter() {
        let forward = vec![
            LabelEvent::added("kokoro:force-run"),
            LabelEvent::removed("kokoro:force-run"),
            LabelEvent::added("kokoro:force-run"),
        ];
        let mut backward = forward.clone();
        backward.reverse();

        assert_eq!(
            count_retry_label_events(&forward, "kokoro"),
            count_retry_label_events(&backward, "kokoro")
        );
    }

    #[test]
    fn removals_can_exceed_additions() {
        // Labels added before history was retained still show up as removals.
        let events = vec![
            LabelEvent::removed("kokoro:force-run"),
            LabelEvent::removed("kokoro:force-run"),
        ];

        let counts = count_retry_label_events(&events, "kokoro");
        assert_eq!(counts.added, 0);
        assert_eq!(counts.removed, 2);
    }
}
