//! Gauge Prefs - remembering the last conversion
//!
//! A single JSON document under `STORAGE_KEY` records the active category
//! and, per category, the last source unit, target unit and input text.
//! The backing `PreferenceStore` is injected so sessions and tests can pick
//! memory, file, or no persistence at all.

mod store;
mod memory;
mod file;
mod preferences;

pub use store::{PreferenceStore, StoreError, UnavailableStore};
pub use memory::MemoryStore;
pub use file::FileStore;
pub use preferences::{
    CategoryPreferences, Preferences, STORAGE_KEY,
    load_user_preferences, save_user_preferences, clear_user_preferences,
};
