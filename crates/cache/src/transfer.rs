//! Export and import of the whole managed key space

use crate::manager::StorageManager;
use crate::metadata::is_meta_key;
use serde_json::{Map, Value};
use tabstore_core::{Error, Result, SerializationOp, SetOptions};
use tracing::{info, warn};

impl StorageManager {
    /// Flat JSON object of every managed key to its logical value
    pub fn export_data(&self) -> String {
        self.try_export().unwrap_or_else(|e| {
            warn!(recovery_hint = ?e.recovery_hint(), "Export failed: {}", e);
            "{}".to_string()
        })
    }

    fn try_export(&self) -> Result<String> {
        let mut document = Map::new();
        for entry in self.analyzer().analyze()? {
            match self.logical_value(&entry.key, entry.raw_value, entry.compressed) {
                Ok(value) => {
                    document.insert(entry.key, Value::String(value));
                }
                Err(e) if e.is_corruption() => {
                    warn!("Skipping unreadable entry '{}' in export: {}", entry.key, e);
                }
                Err(e) => return Err(e),
            }
        }

        serde_json::to_string(&Value::Object(document))
            .map_err(|e| Error::serialization("export", SerializationOp::Serialize, e))
    }

    /// Write every key of a JSON object document through `set_item`
    ///
    /// Returns `false` without touching storage when `json` is not an object.
    /// Individual write failures are logged and do not affect the result.
    pub fn import_data(&self, json: &str) -> bool {
        let document = match serde_json::from_str::<Value>(json) {
            Ok(Value::Object(document)) => document,
            Ok(other) => {
                warn!("Import expects a JSON object, got {}", json_type(&other));
                return false;
            }
            Err(e) => {
                let e = Error::serialization("import", SerializationOp::Deserialize, e);
                warn!(recovery_hint = ?e.recovery_hint(), "Import failed: {}", e);
                return false;
            }
        };

        let mut imported = 0usize;
        let mut failed = 0usize;
        for (key, value) in document {
            if is_meta_key(&key) {
                continue;
            }
            let text = match value {
                Value::String(text) => text,
                other => other.to_string(),
            };
            if self.set_item(&key, &text, SetOptions::new()) {
                imported += 1;
            } else {
                failed += 1;
            }
        }

        info!("Imported {} entries ({} failed)", imported, failed);
        true
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
