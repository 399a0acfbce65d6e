//! Error types for curio operations.
//!
//! Provides a structured error hierarchy with stable error codes and
//! suggestions for resolution. Storage errors carry enough detail for a
//! caller to distinguish "retry later" (quota, transient write failure)
//! from "the collection is unreadable this cycle".

use thiserror::Error;
use uuid::Uuid;

/// Result type alias for curio operations.
pub type CurioResult<T> = Result<T, CurioError>;

/// Main error type for all curio operations.
#[derive(Error, Debug)]
pub enum CurioError {
    /// The item collection could not be read from the underlying medium.
    #[error("Storage read error: {message}")]
    StorageRead {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A write to the item collection was rejected by the medium.
    #[error("Storage write error: {message}")]
    StorageWrite {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The serialized collection exceeds the store's capacity ceiling.
    #[error("Quota exceeded: {message}")]
    QuotaExceeded {
        message: String,
        code: ErrorCode,
        current_size: Option<u64>,
        limit: Option<u64>,
    },

    /// Item not found.
    #[error("Item not found: {message}")]
    NotFound {
        message: String,
        code: ErrorCode,
        item_id: Option<Uuid>,
    },

    /// Scheduler setup or lifecycle failure.
    #[error("Scheduler error: {0}")]
    Scheduler(String),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Storage (STORE_xxx)
    StoreReadFailed,
    StoreWriteFailed,
    StoreQuotaExceeded,
    StoreCorrupted,

    // Items (ITEM_xxx)
    ItemNotFound,

    // Scheduler (SCHED_xxx)
    SchedulerFailed,

    // Internal
    Internal,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::StoreReadFailed => "STORE_001",
            ErrorCode::StoreWriteFailed => "STORE_002",
            ErrorCode::StoreQuotaExceeded => "STORE_003",
            ErrorCode::StoreCorrupted => "STORE_004",
            ErrorCode::ItemNotFound => "ITEM_001",
            ErrorCode::SchedulerFailed => "SCHED_001",
            ErrorCode::Internal => "INT_001",
        }
    }
}

impl CurioError {
    /// Create a storage read error.
    pub fn storage_read(message: impl Into<String>) -> Self {
        Self::StorageRead {
            message: message.into(),
            code: ErrorCode::StoreReadFailed,
            source: None,
        }
    }

    /// Create a storage read error for a corrupt collection document,
    /// keeping the parse failure as the source.
    pub fn corrupted(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::StorageRead {
            message: message.into(),
            code: ErrorCode::StoreCorrupted,
            source: Some(Box::new(source)),
        }
    }

    /// Create a storage write error.
    pub fn storage_write(message: impl Into<String>) -> Self {
        Self::StorageWrite {
            message: message.into(),
            code: ErrorCode::StoreWriteFailed,
            source: None,
        }
    }

    /// Create a quota exceeded error with the offending and allowed sizes.
    pub fn quota_exceeded(current_size: u64, limit: u64) -> Self {
        Self::QuotaExceeded {
            message: format!(
                "serialized collection is {} bytes, capacity is {} bytes",
                current_size, limit
            ),
            code: ErrorCode::StoreQuotaExceeded,
            current_size: Some(current_size),
            limit: Some(limit),
        }
    }

    /// Create a not found error.
    pub fn not_found(item_id: Uuid) -> Self {
        Self::NotFound {
            message: format!("Item with id '{}' not found", item_id),
            code: ErrorCode::ItemNotFound,
            item_id: Some(item_id),
        }
    }

    /// Create a scheduler error.
    pub fn scheduler(message: impl Into<String>) -> Self {
        Self::Scheduler(message.into())
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::StorageRead { code, .. } => *code,
            Self::StorageWrite { code, .. } => *code,
            Self::QuotaExceeded { code, .. } => *code,
            Self::NotFound { code, .. } => *code,
            Self::Scheduler(_) => ErrorCode::SchedulerFailed,
            _ => ErrorCode::Internal,
        }
    }

    /// Whether this error came from a rejected store write.
    ///
    /// Acknowledgment callers use this to decide that the item remains due
    /// and the operation can be retried as-is.
    pub fn is_write_error(&self) -> bool {
        matches!(self, Self::StorageWrite { .. } | Self::QuotaExceeded { .. })
    }

    /// Get a user-friendly suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::StorageRead { .. } => {
                Some("The inventory could not be loaded; it will be retried on the next scan")
            }
            Self::QuotaExceeded { .. } => {
                Some("Storage quota exceeded. Consider removing old items or photos")
            }
            Self::StorageWrite { .. } => Some("The change was not saved; please retry"),
            Self::NotFound { .. } => Some("Please check the item ID and ensure it exists"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_error_detail() {
        let err = CurioError::quota_exceeded(5_000_000, 4_194_304);
        assert_eq!(err.code(), ErrorCode::StoreQuotaExceeded);
        assert!(err.is_write_error());
        assert!(err.to_string().contains("5000000"));
    }

    #[test]
    fn test_not_found_error() {
        let id = Uuid::new_v4();
        let err = CurioError::not_found(id);
        assert_eq!(err.code(), ErrorCode::ItemNotFound);
        assert!(!err.is_write_error());
        assert!(err.suggestion().is_some());
    }

    #[test]
    fn test_read_error_is_not_write_error() {
        let err = CurioError::storage_read("disk unplugged");
        assert_eq!(err.code(), ErrorCode::StoreReadFailed);
        assert!(!err.is_write_error());
    }

    #[test]
    fn test_corrupted_error_keeps_parse_failure_as_source() {
        let parse_err = serde_json::from_str::<Vec<u32>>("{not json").unwrap_err();
        let err = CurioError::corrupted("corrupt collection document", parse_err);
        assert_eq!(err.code(), ErrorCode::StoreCorrupted);
        assert!(!err.is_write_error());
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_error_code_as_str() {
        assert_eq!(ErrorCode::StoreQuotaExceeded.as_str(), "STORE_003");
        assert_eq!(ErrorCode::ItemNotFound.as_str(), "ITEM_001");
    }
}
