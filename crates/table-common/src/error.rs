//! Error types for table rendering.

use thiserror::Error;

/// Result type alias using TableError.
pub type TableResult<T> = Result<T, TableError>;

/// Primary error type for table rendering operations.
///
/// Recoverable problems (missing fonts, unparseable timestamps, highlight
/// rules naming unknown columns) never surface here; they degrade silently.
#[derive(Debug, Error)]
pub enum TableError {
    /// A referenced asset exists but could not be opened or decoded.
    #[error("Asset missing or unreadable: {0}")]
    AssetMissing(String),

    /// The table or render options cannot produce an image.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The final image could not be encoded.
    #[error("Encoding failed: {0}")]
    EncodeFailure(String),

    /// Writing the output artifact failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TableError {
    /// Short machine-readable kind, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            TableError::AssetMissing(_) => "AssetMissing",
            TableError::InvalidConfiguration(_) => "InvalidConfiguration",
            TableError::EncodeFailure(_) => "EncodeFailure",
            TableError::Io(_) => "Io",
        }
    }
}
