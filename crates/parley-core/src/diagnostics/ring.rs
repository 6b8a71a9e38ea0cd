use crate::diagnostics::{LogEntry, LogLevel};

use std::{collections::VecDeque, time::Duration};

use chrono::{DateTime, TimeDelta, Utc};

/// Maximum entries retained before the oldest is evicted.
pub const DEFAULT_LOG_CAPACITY: usize = 1000;

/// Trailing window served by windowed reads.
pub const DEFAULT_LOG_WINDOW: Duration = Duration::from_secs(30 * 60);

/// Bounds of a [`LogRing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogRingSettings {
    /// Entry count bound. Zero is treated as one.
    pub capacity: usize,
    /// Trailing window for [`LogRing::recent`].
    pub window: Duration,
}

impl Default for LogRingSettings {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_LOG_CAPACITY,
            window: DEFAULT_LOG_WINDOW,
        }
    }
}

/// Count-bounded log history, most recent first.
///
/// Only the count bound evicts. The time window is applied when reading, so
/// stale entries stay inspectable through [`entries`](Self::entries) until
/// pushed out.
#[derive(Debug, Clone)]
pub struct LogRing {
    entries: VecDeque<LogEntry>,
    capacity: usize,
    window: TimeDelta,
}

impl LogRing {
    /// Empty ring with the given bounds.
    pub fn new(settings: LogRingSettings) -> Self {
        let capacity = settings.capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            window: TimeDelta::from_std(settings.window).unwrap_or(TimeDelta::MAX),
        }
    }

    /// Prepends `entry`, evicting the oldest entries beyond the bound.
    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push_front(entry);
        while self.entries.len() > self.capacity {
            self.entries.pop_back();
        }
    }

    /// Entries no older than the window at `now`, most recent first,
    /// optionally restricted to one level. Does not evict.
    pub fn recent(&self, now: DateTime<Utc>, level: Option<LogLevel>) -> Vec<LogEntry> {
        self.entries
            .iter()
            .filter(|e| now.signed_duration_since(e.timestamp) <= self.window)
            .filter(|e| level.is_none_or(|l| e.level == l))
            .cloned()
            .collect()
    }

    /// Every retained entry, most recent first, regardless of age.
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is retained.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry count bound.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
