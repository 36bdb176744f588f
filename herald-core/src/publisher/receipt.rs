//! Response descriptor returned by a successful publish

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::traits::BackendKind;

/// What the backend acknowledged for a single publish call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishReceipt {
    /// Backend that accepted the message
    pub backend: BackendKind,

    /// Message identifier assigned by the backend (SNS only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,

    /// Sequence number for FIFO topics (SNS only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence_number: Option<String>,

    /// HTTP status of the acknowledgment (sidecar only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    /// Response metadata: request id for SNS, response headers for the sidecar
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, Vec<String>>,

    /// When the acknowledgment was received
    pub published_at: DateTime<Utc>,
}

impl PublishReceipt {
    pub(crate) fn new(backend: BackendKind) -> Self {
        Self {
            backend,
            message_id: None,
            sequence_number: None,
            status: None,
            metadata: BTreeMap::new(),
            published_at: Utc::now(),
        }
    }

    /// All values recorded under a metadata key
    pub fn metadata_values(&self, key: &str) -> &[String] {
        self.metadata
            .get(&key.to_ascii_lowercase())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// First value recorded under a metadata key
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata_values(key).first().map(String::as_str)
    }

    pub(crate) fn push_metadata(&mut self, key: impl AsRef<str>, value: impl Into<String>) {
        self.metadata
            .entry(key.as_ref().to_ascii_lowercase())
            .or_default()
            .push(value.into());
    }
}
