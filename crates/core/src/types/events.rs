//! Cross-context change events

use serde::{Deserialize, Serialize};
use std::fmt;

/// A mutation performed by another execution context on the shared medium
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEvent {
    /// Affected key; `None` when the whole area was cleared
    pub key: Option<String>,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

impl ChangeEvent {
    pub fn new(
        key: impl Into<String>,
        old_value: Option<String>,
        new_value: Option<String>,
    ) -> Self {
        Self {
            key: Some(key.into()),
            old_value,
            new_value,
        }
    }

    /// Event describing a wholesale clear of the area
    #[must_use]
    pub fn cleared() -> Self {
        Self {
            key: None,
            old_value: None,
            new_value: None,
        }
    }
}

/// Kinds of events listeners can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Change,
}

/// Handle returned when registering a listener, used to unregister it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}
