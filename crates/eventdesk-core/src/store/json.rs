use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use super::{RosterStore, Saved};
use crate::activity::ActivityLog;
use crate::models::{Attendee, StockLedger};

const ROSTER_FILE: &str = "roster";
const STOCK_FILE: &str = "stock";
const ACTIVITY_FILE: &str = "activity";

/// One pretty-printed JSON file per table in the data directory
pub struct JsonStore {
    data_dir: PathBuf,
}

impl JsonStore {
    pub fn new(data_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", name))
    }

    fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Option<Saved<T>>> {
        let path = self.file_path(name);
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read data file: {}", name))?;

        let saved: Saved<T> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse data file: {}", name))?;

        debug!(file = name, saved_at = %saved.saved_at, "Loaded data file");
        Ok(Some(saved))
    }

    fn temp_path(&self, name: &str) -> PathBuf {
        self.data_dir.join(format!(".{}.json.tmp", name))
    }

    /// Write to a sibling temp file, flush it to disk, then rename over the target
    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let saved = Saved::new(data);
        let path = self.file_path(name);
        let tmp = self.temp_path(name);
        let contents = serde_json::to_string_pretty(&saved)?;

        write_synced(&tmp, contents.as_bytes())
            .with_context(|| format!("Failed to write data file: {}", name))?;
        fs::rename(&tmp, &path)
            .with_context(|| format!("Failed to replace data file: {}", name))?;

        debug!(file = name, "Saved data file");
        Ok(())
    }
}

/// The bytes are on disk before this returns, so a rename that follows
/// never exposes a half-written file.
fn write_synced(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data)?;
    file.sync_all()
}

impl RosterStore for JsonStore {
    fn load_roster(&self) -> Result<Option<Saved<Vec<Attendee>>>> {
        self.load(ROSTER_FILE)
    }

    fn save_roster(&mut self, attendees: &[Attendee]) -> Result<()> {
        self.save(ROSTER_FILE, &attendees)
    }

    fn load_stock(&self) -> Result<Option<Saved<StockLedger>>> {
        self.load(STOCK_FILE)
    }

    fn save_stock(&mut self, ledger: &StockLedger) -> Result<()> {
        self.save(STOCK_FILE, ledger)
    }

    fn load_activity(&self) -> Result<Option<Saved<ActivityLog>>> {
        self.load(ACTIVITY_FILE)
    }

    fn save_activity(&mut self, log: &ActivityLog) -> Result<()> {
        self.save(ACTIVITY_FILE, log)
    }
}
