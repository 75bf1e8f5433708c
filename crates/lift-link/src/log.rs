// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Bounded operational event log for one link session.

use std::collections::VecDeque;

/// Severity class of an operational event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    /// Informational line (backend log traffic).
    Log,
    /// Error report (backend errors, malformed payloads, failed fetches).
    Error,
    /// Message kind this client does not recognize.
    Unknown,
}

/// One entry in the link's operational log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    /// Severity class.
    pub kind: EventKind,
    /// Human-readable description.
    pub message: String,
}

/// In-memory event log with a fixed capacity; oldest entries are evicted
/// first.
#[derive(Debug)]
pub struct EventLog {
    entries: VecDeque<Event>,
    max: usize,
}

impl EventLog {
    /// Default capacity used by link sessions.
    pub const DEFAULT_CAPACITY: usize = 1000;

    /// Create a log holding at most `max` entries.
    pub fn new(max: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(max.min(Self::DEFAULT_CAPACITY)),
            max,
        }
    }

    /// Append an entry, evicting the oldest when full. A capacity of zero
    /// retains nothing.
    pub fn push<S: Into<String>>(&mut self, kind: EventKind, message: S) {
        if self.max == 0 {
            return;
        }
        if self.entries.len() >= self.max {
            self.entries.pop_front();
        }
        self.entries.push_back(Event {
            kind,
            message: message.into(),
        });
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy of the retained entries, oldest first.
    pub fn snapshot(&self) -> Vec<Event> {
        self.entries.iter().cloned().collect()
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
