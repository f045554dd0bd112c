//! JSON convenience layer over the raw-string CRUD surface

use crate::manager::StorageManager;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tabstore_core::{Error, SerializationOp, SetOptions};
use tracing::{debug, warn};

impl StorageManager {
    /// Store any JSON value; `false` when it could not be stored
    pub fn safe_save_to_storage(&self, key: &str, value: &Value) -> bool {
        self.save_json(key, value)
    }

    /// Stored JSON value, `None` when absent or not valid JSON
    pub fn safe_get_from_storage(&self, key: &str) -> Option<Value> {
        self.load_json(key)
    }

    pub fn save_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        match serde_json::to_string(value) {
            Ok(text) => self.set_item(key, &text, SetOptions::new()),
            Err(e) => {
                let e = Error::serialization(key, SerializationOp::Serialize, e);
                warn!("{}", e);
                false
            }
        }
    }

    pub fn load_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let text = self.get_item(key)?;
        match serde_json::from_str(&text) {
            Ok(value) => Some(value),
            Err(e) => {
                // The stored text stays in place for inspection
                debug!("'{}' does not hold valid JSON: {}", key, e);
                None
            }
        }
    }
}
