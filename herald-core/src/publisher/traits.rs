//! Core publisher trait definitions

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};
use std::str::FromStr;

use super::error::PublisherError;
use super::receipt::PublishReceipt;

/// Uniform publish interface over every backend
#[async_trait]
pub trait Publisher: Send + Sync + Debug {
    /// Publish a message body, as-is, to a topic
    async fn publish(&self, topic: &str, message: &str) -> Result<PublishReceipt>;

    /// Backend this publisher was built for
    fn backend_kind(&self) -> BackendKind;
}

/// The two backends a publisher can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BackendKind {
    /// Managed cloud notification service (AWS SNS)
    #[serde(rename = "aws_sns")]
    CloudNotification,
    /// Local sidecar broker (Dapr)
    #[serde(rename = "dapr")]
    SidecarBroker,
}

impl BackendKind {
    /// Canonical selector name
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::CloudNotification => "aws_sns",
            BackendKind::SidecarBroker => "dapr",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = PublisherError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aws_sns" | "sns" | "cloud_notification" => Ok(BackendKind::CloudNotification),
            "dapr" | "sidecar" | "sidecar_broker" => Ok(BackendKind::SidecarBroker),
            _ => Err(PublisherError::UnsupportedBackend(s.to_string())),
        }
    }
}
