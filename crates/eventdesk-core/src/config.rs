//! Application configuration management.
//!
//! The config holds the event name, the desk operator, the bus fleet and
//! the passcode hashes. It is stored at `~/.config/eventdesk/config.json`.
//!
//! Environment overrides (a `.env` file is honored by the binary):
//! - `EVENTDESK_DATA_DIR`: where roster, stock and activity files live
//! - `EVENTDESK_OPERATOR`: operator name shown in the activity log

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::auth::Passcodes;
use crate::models::{Fleet, Role, RoleQuota};

/// Application name used for config/data directory paths
const APP_NAME: &str = "eventdesk";

/// Config file name
const CONFIG_FILE: &str = "config.json";

pub const DATA_DIR_ENV: &str = "EVENTDESK_DATA_DIR";
pub const OPERATOR_ENV: &str = "EVENTDESK_OPERATOR";

const DEFAULT_BUS_COUNT: usize = 4;
const DEFAULT_BUS_CAPACITY: u32 = 45;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FleetConfig {
    pub bus_names: Vec<String>,
    pub capacity: u32,
    /// Role limited on every bus, e.g. "Student"
    pub quota_role: Option<String>,
    pub quota_limit: Option<u32>,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            bus_names: (1..=DEFAULT_BUS_COUNT)
                .map(|i| format!("Bus {}", i))
                .collect(),
            capacity: DEFAULT_BUS_CAPACITY,
            quota_role: None,
            quota_limit: None,
        }
    }
}

impl FleetConfig {
    pub fn build(&self) -> Fleet {
        let quota = match (&self.quota_role, self.quota_limit) {
            (Some(role), Some(limit)) if !role.trim().is_empty() => Some(RoleQuota {
                role: Role::parse(role),
                limit,
            }),
            _ => None,
        };
        Fleet::uniform(self.bus_names.iter().cloned(), self.capacity, quota)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub event_name: Option<String>,
    pub operator_name: Option<String>,
    pub fleet: FleetConfig,
    pub staff_passcode_hash: Option<String>,
    pub admin_passcode_hash: Option<String>,
    pub data_dir: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config = serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            debug!(path = %path.display(), "Loaded config");
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        debug!(path = %path.display(), "Saved config");
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Data directory: `EVENTDESK_DATA_DIR`, then the config value, then
    /// the platform data dir.
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
            return Ok(PathBuf::from(dir));
        }
        if let Some(ref dir) = self.data_dir {
            return Ok(dir.clone());
        }
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    /// Operator name: `EVENTDESK_OPERATOR`, then the config value
    pub fn operator(&self) -> String {
        std::env::var(OPERATOR_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .or_else(|| self.operator_name.clone())
            .unwrap_or_else(|| "Desk".to_string())
    }

    pub fn event_title(&self) -> &str {
        self.event_name.as_deref().unwrap_or("EventDesk")
    }

    pub fn fleet(&self) -> Fleet {
        self.fleet.build()
    }

    pub fn passcodes(&self) -> Passcodes {
        Passcodes::new(
            self.staff_passcode_hash.clone(),
            self.admin_passcode_hash.clone(),
        )
    }
}
