//! Key-value store abstraction

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("preference store is not available")]
    Unavailable,

    #[error("invalid preference key {0:?}")]
    InvalidKey(String),

    #[error("i/o error on {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("preference store lock poisoned")]
    Poisoned,
}

/// String key-value store that preferences are persisted in.
///
/// Implementations must be cheap to query for availability; callers skip
/// every operation when `is_available` is false.
pub trait PreferenceStore: Send + Sync {
    fn is_available(&self) -> bool;
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Store for contexts with nowhere to persist. Reads find nothing and
/// writes are refused.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableStore;

impl PreferenceStore for UnavailableStore {
    fn is_available(&self) -> bool {
        false
    }

    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable)
    }

    fn remove(&self, _key: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable)
    }
}
