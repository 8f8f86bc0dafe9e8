//! Persistent key-value preferences.
//!
//! The board remembers a single thing between runs: the last city the
//! viewer picked. Storage failures never reach the UI; they are logged and
//! read back as "nothing saved".

pub mod kv;
pub mod preferences;

pub use kv::{KeyValueStore, MemoryStore, SqliteStore, StoreError};
pub use preferences::{Preferences, SELECTED_CITY_KEY};
