//! Error types

/// Core errors
///
/// The controller itself never fails; these cover configuration only.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;
