//! Error types for publisher operations

use aws_sdk_sns::error::ProvideErrorMetadata;
use thiserror::Error;

/// Publisher specific errors
#[derive(Debug, Error)]
pub enum PublisherError {
    /// Backend selector missing or not one of the known backends
    #[error("Unsupported publisher backend: {0}")]
    UnsupportedBackend(String),

    /// The backend rejected or failed the publish call
    #[error("Backend publish error: {0}")]
    BackendPublish(#[from] BackendFault),
}

/// The fault reported by a backend, kept as-is
#[derive(Debug, Error)]
pub enum BackendFault {
    /// Fault raised by the SNS SDK (validation, auth, throttling, network)
    #[error("SNS publish failed: {0}")]
    CloudNotification(#[source] aws_sdk_sns::Error),

    /// The sidecar answered with a non-success status
    #[error("sidecar returned {status} ({}): {message}", .error_code.as_deref().unwrap_or("no error code"))]
    Sidecar {
        status: u16,
        error_code: Option<String>,
        message: String,
    },

    /// The sidecar could not be reached
    #[error("sidecar unreachable: {0}")]
    SidecarTransport(#[source] reqwest::Error),
}

impl BackendFault {
    /// Machine-readable error code reported by the backend, when there is one.
    pub fn code(&self) -> Option<&str> {
        match self {
            BackendFault::CloudNotification(err) => err.code(),
            BackendFault::Sidecar { error_code, .. } => error_code.as_deref(),
            BackendFault::SidecarTransport(_) => None,
        }
    }

    /// Human-readable message reported by the backend.
    pub fn message(&self) -> Option<&str> {
        match self {
            BackendFault::CloudNotification(err) => err.message(),
            BackendFault::Sidecar { message, .. } => Some(message),
            BackendFault::SidecarTransport(_) => None,
        }
    }

    /// HTTP status returned by the sidecar.
    pub fn status(&self) -> Option<u16> {
        match self {
            BackendFault::Sidecar { status, .. } => Some(*status),
            BackendFault::SidecarTransport(err) => err.status().map(|s| s.as_u16()),
            BackendFault::CloudNotification(_) => None,
        }
    }
}
