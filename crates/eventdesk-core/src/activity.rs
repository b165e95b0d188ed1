//! Operator activity log.
//!
//! Every change made at the desk is recorded with a timestamp and the
//! operator's name, newest first.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Oldest entries are dropped past this many
const MAX_LOG_ENTRIES: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub at: DateTime<Utc>,
    pub operator: String,
    pub message: String,
}

impl LogEntry {
    /// `[HH:MM:SS] operator: message` in local time
    pub fn display(&self) -> String {
        format!(
            "[{}] {}: {}",
            self.at.with_timezone(&Local).format("%H:%M:%S"),
            self.operator,
            self.message
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityLog {
    entries: Vec<LogEntry>,
}

impl ActivityLog {
    pub fn record(&mut self, operator: &str, message: impl Into<String>) {
        self.record_at(Utc::now(), operator, message);
    }

    pub fn record_at(&mut self, at: DateTime<Utc>, operator: &str, message: impl Into<String>) {
        let name = operator.trim();
        let operator = if name.is_empty() { "System" } else { name };
        self.entries.insert(
            0,
            LogEntry {
                at,
                operator: operator.to_string(),
                message: message.into(),
            },
        );
        self.entries.truncate(MAX_LOG_ENTRIES);
    }

    /// Newest first
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
