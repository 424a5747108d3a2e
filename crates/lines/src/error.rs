// Chunk: docs/chunks/edit_notifications - Notification validation errors
// Chunk: docs/chunks/document_config - Config loading errors

use std::io;

/// A malformed edit notification.
///
/// Returned before anything is mutated. Seeing one means the native engine
/// and the index have diverged; the usual recovery is a full rebuild.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreconditionViolation {
    #[error("edit position {position} is outside the document (length {document_length})")]
    PositionOutOfBounds {
        position: usize,
        document_length: usize,
    },

    #[error("deleting {deleted_length} bytes at {position} overruns length {document_length}")]
    DeletionOutOfBounds {
        position: usize,
        deleted_length: usize,
        document_length: usize,
    },

    #[error("negative {field} ({value}) in edit notification")]
    NegativeValue { field: &'static str, value: i64 },

    #[error("notification declares {declared} inserted bytes but carries {actual}")]
    InsertedLengthMismatch { declared: usize, actual: usize },

    #[error("text source has {source_length} bytes but the index covers {indexed_length}")]
    SourceLengthMismatch {
        source_length: usize,
        indexed_length: usize,
    },
}

/// Failure to load a [`DocumentConfig`](crate::DocumentConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
