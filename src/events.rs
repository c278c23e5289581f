//! Game Event Feed
//!
//! Bounded, most-recent-first log of user-visible notification strings.

use std::collections::VecDeque;

/// Maximum number of events retained per session
pub const EVENT_LOG_CAP: usize = 10;

/// Ordered event feed: newest entry at index 0, oldest evicted at the cap.
#[derive(Debug, Clone, Default)]
pub struct GameEventLog {
    entries: VecDeque<String>,
}

impl GameEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend an event, evicting the oldest entry past the cap
    pub fn push(&mut self, event: impl Into<String>) {
        self.entries.push_front(event.into());
        self.entries.truncate(EVENT_LOG_CAP);
    }

    /// Events, newest first
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
