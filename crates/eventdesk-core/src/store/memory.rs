use anyhow::{bail, Result};

use super::{RosterStore, Saved};
use crate::activity::ActivityLog;
use crate::models::{Attendee, StockLedger};

/// In-memory store for tests and dry runs
#[derive(Debug, Default)]
pub struct MemoryStore {
    roster: Option<Saved<Vec<Attendee>>>,
    stock: Option<Saved<StockLedger>>,
    activity: Option<Saved<ActivityLog>>,
    /// When set, every save fails
    pub fail_writes: bool,
    /// Successful saves so far
    pub writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_roster(attendees: Vec<Attendee>) -> Self {
        Self {
            roster: Some(Saved::new(attendees)),
            ..Self::default()
        }
    }

    fn check_writable(&mut self) -> Result<()> {
        if self.fail_writes {
            bail!("store is read-only");
        }
        self.writes += 1;
        Ok(())
    }
}

impl RosterStore for MemoryStore {
    fn load_roster(&self) -> Result<Option<Saved<Vec<Attendee>>>> {
        Ok(self.roster.clone())
    }

    fn save_roster(&mut self, attendees: &[Attendee]) -> Result<()> {
        self.check_writable()?;
        self.roster = Some(Saved::new(attendees.to_vec()));
        Ok(())
    }

    fn load_stock(&self) -> Result<Option<Saved<StockLedger>>> {
        Ok(self.stock.clone())
    }

    fn save_stock(&mut self, ledger: &StockLedger) -> Result<()> {
        self.check_writable()?;
        self.stock = Some(Saved::new(ledger.clone()));
        Ok(())
    }

    fn load_activity(&self) -> Result<Option<Saved<ActivityLog>>> {
        Ok(self.activity.clone())
    }

    fn save_activity(&mut self, log: &ActivityLog) -> Result<()> {
        self.check_writable()?;
        self.activity = Some(Saved::new(log.clone()));
        Ok(())
    }
}
