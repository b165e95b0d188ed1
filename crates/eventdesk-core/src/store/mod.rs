//! Persistence for the roster, stock ledger and activity log.
//!
//! `RosterStore` abstracts the backend. `JsonStore` keeps one JSON file per
//! table in the data directory; `MemoryStore` keeps everything in memory for
//! tests and dry runs. Every saved table is wrapped in `Saved<T>` with the
//! time it was written.

mod import;
mod json;
mod memory;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::activity::ActivityLog;
use crate::models::{Attendee, StockLedger};

pub use import::{parse_rows, read_rows};
pub use json::JsonStore;
pub use memory::MemoryStore;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Saved<T> {
    pub data: T,
    pub saved_at: DateTime<Utc>,
}

impl<T> Saved<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            saved_at: Utc::now(),
        }
    }

    pub fn age_minutes(&self) -> i64 {
        (Utc::now() - self.saved_at).num_minutes()
    }

    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // Also covers clock skew
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            let hours = minutes / 60;
            if minutes % 60 >= 30 {
                format!("{}h ago", hours + 1)
            } else {
                format!("{}h ago", hours)
            }
        } else {
            let days = minutes / 1440;
            if (minutes % 1440) / 60 >= 12 {
                format!("{}d ago", days + 1)
            } else {
                format!("{}d ago", days)
            }
        }
    }
}

/// Storage backend for the desk. Loads return `None` when nothing was saved yet.
pub trait RosterStore {
    fn load_roster(&self) -> Result<Option<Saved<Vec<Attendee>>>>;
    fn save_roster(&mut self, attendees: &[Attendee]) -> Result<()>;

    fn load_stock(&self) -> Result<Option<Saved<StockLedger>>>;
    fn save_stock(&mut self, ledger: &StockLedger) -> Result<()>;

    fn load_activity(&self) -> Result<Option<Saved<ActivityLog>>>;
    fn save_activity(&mut self, log: &ActivityLog) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn aged(minutes: i64) -> Saved<()> {
        Saved {
            data: (),
            saved_at: Utc::now() - Duration::minutes(minutes),
        }
    }

    #[test]
    fn test_age_display() {
        assert_eq!(aged(0).age_display(), "just now");
        assert_eq!(aged(-5).age_display(), "just now");
        assert_eq!(aged(12).age_display(), "12m ago");
        assert_eq!(aged(90).age_display(), "2h ago");
        assert_eq!(aged(75).age_display(), "1h ago");
        assert_eq!(aged(1440 + 13 * 60).age_display(), "2d ago");
    }
}
