use std::time::{Duration, Instant};

use crate::protocol::ServedFile;

/// Pure debouncer: only handles timing and batching.
/// No classification, no channel access.
///
/// Every incoming event resets the quiet window. A batch closes when the
/// window elapses with no new arrivals. Events are kept in arrival order and
/// never deduplicated or dropped.
pub(super) struct Debouncer {
    quiet_window: Duration,
    pub(super) pending: Vec<ServedFile>,
    pub(super) last_event: Option<Instant>,
}

impl Debouncer {
    pub(super) fn new(quiet_window: Duration) -> Self {
        Self {
            quiet_window,
            pending: Vec::new(),
            last_event: None,
        }
    }

    /// Record one change notification and reset the quiet window.
    pub(super) fn add_event(&mut self, item: ServedFile) {
        self.pending.push(item);
        self.last_event = Some(Instant::now());
    }

    /// Close and return the batch if the quiet window elapsed.
    /// A close with nothing accumulated produces no output at all.
    pub(super) fn take_if_ready(&mut self) -> Option<Vec<ServedFile>> {
        if !self.is_ready() {
            return None;
        }

        self.last_event = None;
        let batch = std::mem::take(&mut self.pending);
        if batch.is_empty() {
            return None;
        }
        Some(batch)
    }

    pub(super) fn is_ready(&self) -> bool {
        let Some(last_event) = self.last_event else {
            return false;
        };

        last_event.elapsed() >= self.quiet_window && !self.pending.is_empty()
    }

    /// Precise sleep duration until the next possible batch close.
    /// Effectively unbounded while idle, so an empty debouncer never polls.
    pub(super) fn sleep_duration(&self) -> Duration {
        let Some(last_event) = self.last_event else {
            return Duration::from_secs(86400);
        };

        self.quiet_window
            .saturating_sub(last_event.elapsed())
            .max(Duration::from_millis(1))
    }
}
