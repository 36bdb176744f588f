//! Error types for Herald operations

use crate::publisher::PublisherError;

/// Result type for Herald operations
pub type Result<T> = std::result::Result<T, HeraldError>;

/// Error types for the Herald publisher
#[derive(Debug, thiserror::Error)]
pub enum HeraldError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Publisher error (unsupported backend or backend fault)
    #[error(transparent)]
    Publisher(#[from] PublisherError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl HeraldError {
    /// The publisher error behind this error, if any.
    pub fn as_publisher(&self) -> Option<&PublisherError> {
        match self {
            HeraldError::Publisher(err) => Some(err),
            _ => None,
        }
    }
}

impl From<figment::Error> for HeraldError {
    fn from(err: figment::Error) -> Self {
        HeraldError::Configuration(format!("Failed to load configuration: {}", err))
    }
}
