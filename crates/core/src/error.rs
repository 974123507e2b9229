use std::io;
use std::path::PathBuf;

/// Errors that can occur during amplify-doctor operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid match expression for '{name}': {message}")]
    InvalidExpression { name: String, message: String },

    #[error("Built-in pattern '{0}' is already in the registry")]
    DuplicatePreset(String),

    #[error("Pattern not found: {0}")]
    PatternNotFound(String),

    #[error("No fix '{fix_id}' registered for pattern '{pattern_id}'")]
    FixNotFound { pattern_id: String, fix_id: String },

    #[error("Invalid fix key: {0}")]
    InvalidFixKey(String),

    #[error("Fix target already exists: {}", .0.display())]
    FixTargetExists(PathBuf),

    #[error("Fix target not found: {}", .0.display())]
    FixTargetMissing(PathBuf),

    #[error("Fix failed on {}: {source}", path.display())]
    FixIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Pattern store error: {0}")]
    StoreError(String),

    #[error("Log decode error: {0}")]
    LogDecodeError(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Result type alias for amplify-doctor operations
pub type Result<T> = std::result::Result<T, Error>;
