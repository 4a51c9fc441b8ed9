//! Runtime configuration read from the environment

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use gauge_plugin::DEFAULT_DECIMALS;
use gauge_prefs::{FileStore, MemoryStore, PreferenceStore, UnavailableStore};
use thiserror::Error;

pub const ENV_DATA_PATH: &str = "GAUGE_DATA_PATH";
pub const ENV_STORE: &str = "GAUGE_STORE";
pub const ENV_DECIMALS: &str = "GAUGE_DECIMALS";

/// More places than this only shows f64 noise
const MAX_DECIMALS: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("GAUGE_STORE must be one of file, memory, none (got '{0}')")]
    InvalidStore(String),

    #[error("GAUGE_DECIMALS must be an integer between 0 and 15 (got '{0}')")]
    InvalidDecimals(String),
}

/// Where preferences are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    File,
    Memory,
    None,
}

impl FromStr for StoreKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(StoreKind::File),
            "memory" => Ok(StoreKind::Memory),
            "none" | "off" => Ok(StoreKind::None),
            _ => Err(ConfigError::InvalidStore(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory for the file store; `None` when the platform has no data dir
    pub data_path: Option<PathBuf>,
    pub store: StoreKind,
    pub decimals: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: FileStore::default_dir(),
            store: StoreKind::File,
            decimals: DEFAULT_DECIMALS,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or blank keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Config::default();

        if let Some(path) = get(ENV_DATA_PATH) {
            config.data_path = Some(PathBuf::from(path));
        }
        if let Some(store) = get(ENV_STORE) {
            config.store = store.parse()?;
        }
        if let Some(raw) = get(ENV_DECIMALS) {
            config.decimals = raw.trim().parse::<usize>()
                .ok()
                .filter(|d| *d <= MAX_DECIMALS)
                .ok_or(ConfigError::InvalidDecimals(raw))?;
        }

        Ok(config)
    }

    /// Open the configured preference store
    pub fn open_store(&self) -> Arc<dyn PreferenceStore> {
        match (self.store, &self.data_path) {
            (StoreKind::File, Some(dir)) => {
                tracing::info!(path = %dir.display(), "using file preference store");
                Arc::new(FileStore::new(dir.clone()))
            }
            (StoreKind::File, None) => {
                tracing::warn!("no data directory available, preferences kept in memory");
                Arc::new(MemoryStore::new())
            }
            (StoreKind::Memory, _) => Arc::new(MemoryStore::new()),
            (StoreKind::None, _) => Arc::new(UnavailableStore),
        }
    }
}
