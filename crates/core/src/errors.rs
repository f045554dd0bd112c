use std::path::PathBuf;

/// Result type alias for tabstore operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for tabstore operations
///
/// None of these cross the public `StorageManager` boundary: the manager logs
/// them together with their [`RecoveryHint`] and degrades to an empty result.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The backend refused a write because its capacity is exhausted
    #[error("storage quota exceeded writing '{key}': requested {requested} bytes, {available} bytes available")]
    QuotaExceeded {
        key: String,
        requested: u64,
        available: u64,
        recovery_hint: RecoveryHint,
    },

    /// The storage medium itself cannot be used (disabled, restricted, gone)
    #[error("storage backend unavailable during {operation}: {reason}")]
    BackendUnavailable {
        operation: &'static str,
        reason: String,
        recovery_hint: RecoveryHint,
    },

    /// Stored data could not be interpreted
    #[error("corrupted data under '{key}': {reason}")]
    CorruptedData {
        key: String,
        reason: String,
        recovery_hint: RecoveryHint,
    },

    /// JSON serialization/deserialization errors
    #[error("failed to {operation:?} value for '{key}': {source}")]
    Serialization {
        key: String,
        operation: SerializationOp,
        #[source]
        source: serde_json::Error,
        recovery_hint: RecoveryHint,
    },

    /// Compression/decompression error
    #[error("compression error during {operation} of '{key}': {source}")]
    Compression {
        key: String,
        operation: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
        recovery_hint: RecoveryHint,
    },

    /// File system operations
    #[error("file system {operation} operation failed for '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
        recovery_hint: RecoveryHint,
    },

    /// Configuration errors
    #[error("configuration error: {message}")]
    Configuration {
        message: String,
        recovery_hint: RecoveryHint,
    },
}

/// Recovery hints for error handling
#[derive(Debug, Clone, PartialEq)]
pub enum RecoveryHint {
    /// Run a cleanup pass and retry the write
    RunCleanup,

    /// Retry the operation
    Retry,

    /// Continue without persistence
    UseFallback,

    /// Increase the storage ceiling
    IncreaseCapacity { suggested_bytes: u64 },

    /// Check file permissions
    CheckPermissions { path: PathBuf },

    /// No automated recovery possible
    Manual { instructions: String },

    /// Use a default value
    UseDefault { value: String },

    /// Operation can be safely ignored
    Ignore,

    /// No recovery possible
    NoRecovery,
}

/// Serialization operation types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerializationOp {
    Serialize,
    Deserialize,
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        use std::io::ErrorKind;

        let recovery_hint = match error.kind() {
            ErrorKind::PermissionDenied => RecoveryHint::CheckPermissions {
                path: PathBuf::from("."),
            },
            ErrorKind::WouldBlock | ErrorKind::TimedOut | ErrorKind::Interrupted => {
                RecoveryHint::Retry
            }
            _ => RecoveryHint::UseFallback,
        };

        Error::FileSystem {
            path: PathBuf::new(),
            operation: "unknown".to_string(),
            source: error,
            recovery_hint,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::Serialization {
            key: String::new(),
            operation: SerializationOp::Deserialize,
            source: error,
            recovery_hint: RecoveryHint::Manual {
                instructions: "Check JSON format and data types".to_string(),
            },
        }
    }
}

// Helper methods for creating errors with context
impl Error {
    /// Create a quota-exceeded error for a write of `requested` bytes
    #[must_use]
    pub fn quota_exceeded(key: impl Into<String>, requested: u64, available: u64) -> Self {
        Error::QuotaExceeded {
            key: key.into(),
            requested,
            available,
            recovery_hint: RecoveryHint::RunCleanup,
        }
    }

    /// Create a quota-exceeded error for a write that still fails after cleanup
    #[must_use]
    pub fn capacity_exhausted(key: impl Into<String>, requested: u64, available: u64) -> Self {
        Error::QuotaExceeded {
            key: key.into(),
            requested,
            available,
            recovery_hint: RecoveryHint::IncreaseCapacity {
                suggested_bytes: requested.saturating_sub(available),
            },
        }
    }

    /// Create a backend-unavailable error
    #[must_use]
    pub fn backend_unavailable(operation: &'static str, reason: impl Into<String>) -> Self {
        Error::BackendUnavailable {
            operation,
            reason: reason.into(),
            recovery_hint: RecoveryHint::UseFallback,
        }
    }

    /// Create a corrupted-data error; the offending key is left in place
    #[must_use]
    pub fn corrupted(key: impl Into<String>, reason: impl Into<String>) -> Self {
        let key = key.into();
        Error::CorruptedData {
            recovery_hint: RecoveryHint::Manual {
                instructions: format!("Inspect or remove the stored value for '{key}'"),
            },
            key,
            reason: reason.into(),
        }
    }

    /// Create a serialization error for a specific key
    #[must_use]
    pub fn serialization(
        key: impl Into<String>,
        operation: SerializationOp,
        source: serde_json::Error,
    ) -> Self {
        Error::Serialization {
            key: key.into(),
            operation,
            source,
            recovery_hint: RecoveryHint::Ignore,
        }
    }

    /// Create a compression error
    #[must_use]
    pub fn compression(
        key: impl Into<String>,
        operation: &'static str,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Error::Compression {
            key: key.into(),
            operation,
            source: source.into(),
            recovery_hint: RecoveryHint::NoRecovery,
        }
    }

    /// Create a file system error with context
    #[must_use]
    pub fn file_system(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        let path = path.into();
        Error::FileSystem {
            recovery_hint: RecoveryHint::CheckPermissions { path: path.clone() },
            path,
            operation: operation.into(),
            source,
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
            recovery_hint: RecoveryHint::UseDefault {
                value: "built-in defaults".to_string(),
            },
        }
    }

    /// Get the recovery hint for this error
    #[must_use]
    pub const fn recovery_hint(&self) -> &RecoveryHint {
        match self {
            Self::QuotaExceeded { recovery_hint, .. }
            | Self::BackendUnavailable { recovery_hint, .. }
            | Self::CorruptedData { recovery_hint, .. }
            | Self::Serialization { recovery_hint, .. }
            | Self::Compression { recovery_hint, .. }
            | Self::FileSystem { recovery_hint, .. }
            | Self::Configuration { recovery_hint, .. } => recovery_hint,
        }
    }

    /// Check if the backend ran out of space
    #[must_use]
    pub const fn is_quota_exceeded(&self) -> bool {
        matches!(self, Self::QuotaExceeded { .. })
    }

    /// Check if this error is transient and can be retried
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self.recovery_hint(),
            RecoveryHint::Retry | RecoveryHint::RunCleanup
        )
    }

    /// Check if this error indicates data corruption
    #[must_use]
    pub const fn is_corruption(&self) -> bool {
        matches!(self, Self::CorruptedData { .. } | Self::Compression { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_exceeded_suggests_cleanup() {
        let err = Error::quota_exceeded("image-cache-1", 2048, 10);
        assert!(err.is_quota_exceeded());
        assert!(err.is_transient());
        assert_eq!(err.recovery_hint(), &RecoveryHint::RunCleanup);
        assert_eq!(
            err.to_string(),
            "storage quota exceeded writing 'image-cache-1': requested 2048 bytes, 10 bytes available"
        );
    }

    #[test]
    fn test_exhausted_capacity_is_not_transient() {
        let err = Error::capacity_exhausted("image-cache-1", 2048, 48);
        assert!(err.is_quota_exceeded());
        assert!(!err.is_transient());
        assert_eq!(
            err.recovery_hint(),
            &RecoveryHint::IncreaseCapacity {
                suggested_bytes: 2000
            }
        );
    }

    #[test]
    fn test_corruption_is_not_transient() {
        let err = Error::corrupted("user-settings", "expected value at line 1 column 1");
        assert!(err.is_corruption());
        assert!(!err.is_transient());
        assert!(matches!(err.recovery_hint(), RecoveryHint::Manual { .. }));
    }

    #[test]
    fn test_json_conversion_keeps_source() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: Error = parse_err.into();
        assert!(std::error::Error::source(&err).is_some());
        assert!(matches!(err, Error::Serialization { .. }));
    }
}
