use std::sync::Arc;

use crate::kv::KeyValueStore;

pub const SELECTED_CITY_KEY: &str = "selected_city";

/// Typed access to saved preferences.
///
/// Reads and writes never fail from the caller's point of view: store errors
/// are logged and a failed read is reported as "no saved value".
#[derive(Clone)]
pub struct Preferences {
    store: Arc<dyn KeyValueStore>,
}

impl Preferences {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Id of the last selected city, if one was saved and can be read.
    pub fn selected_city(&self) -> Option<String> {
        match self.store.get(SELECTED_CITY_KEY) {
            Ok(Some(id)) if !id.trim().is_empty() => Some(id),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!("Failed to read saved city, using default: {}", e);
                None
            }
        }
    }

    /// Remember `city_id`. Returns whether it was written.
    pub fn set_selected_city(&self, city_id: &str) -> bool {
        match self.store.set(SELECTED_CITY_KEY, city_id) {
            Ok(()) => {
                tracing::debug!(city = city_id, "Saved selected city");
                true
            }
            Err(e) => {
                tracing::warn!("Failed to save selected city: {}", e);
                false
            }
        }
    }
}
