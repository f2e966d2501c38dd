//! Error types for KayaCloud

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// KayaCloud error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file unreadable or malformed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Robot model description missing at startup (fatal)
    #[error("Robot model unavailable: {0}")]
    ModelUnavailable(String),

    /// Robot model description present but malformed (fatal)
    #[error("Invalid robot model: {0}")]
    InvalidModel(String),

    /// A link carries mesh geometry but the current state has no transform
    /// for it; the affected cycle is dropped without publishing
    #[error("No world transform for link '{0}' in current state")]
    MissingTransform(String),

    /// Wire serialization or deserialization failure
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Unrecognized `state.source` value in the configuration
    #[error("Unknown state source: {0}")]
    UnknownStateSource(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}
