//! Factory for creating publisher clients

use serde::Serialize;

use crate::config::{PublisherSettings, non_empty};
use crate::error::Result;

use super::cloud::CloudNotificationClient;
use super::error::PublisherError;
use super::receipt::PublishReceipt;
use super::sidecar::SidecarBrokerClient;
use super::traits::{BackendKind, Publisher};

/// Arguments forwarded to the adapter being built
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientOptions {
    /// Dapr pub/sub component name (ignored by SNS)
    pub pubsub_name: String,
}

impl ClientOptions {
    /// Options for the given pub/sub component
    pub fn new(pubsub_name: impl Into<String>) -> Self {
        Self {
            pubsub_name: pubsub_name.into(),
        }
    }

    /// Options taken from the configured settings
    pub fn from_settings(settings: &PublisherSettings) -> Self {
        Self {
            pubsub_name: non_empty(&settings.pubsub_name)
                .unwrap_or_default()
                .to_string(),
        }
    }
}

/// Create a publisher client for a backend.
///
/// The backend must be given explicitly. Callers that want the environment
/// to decide call [`crate::environment::determine_default_backend`] first and
/// pass its result.
///
/// # Errors
///
/// Returns `UnsupportedBackend` when no backend is given.
pub async fn create_client(
    kind: Option<BackendKind>,
    settings: &PublisherSettings,
    options: ClientOptions,
) -> Result<PublisherClient> {
    match kind {
        Some(BackendKind::SidecarBroker) => Ok(PublisherClient::SidecarBroker(
            SidecarBrokerClient::new(options.pubsub_name, settings),
        )),
        Some(BackendKind::CloudNotification) => Ok(PublisherClient::CloudNotification(
            CloudNotificationClient::new(settings).await,
        )),
        None => Err(PublisherError::UnsupportedBackend("none".to_string()).into()),
    }
}

/// Enum wrapper for the two publisher implementations
#[derive(Debug, Clone)]
pub enum PublisherClient {
    CloudNotification(CloudNotificationClient),
    SidecarBroker(SidecarBrokerClient),
}

impl PublisherClient {
    /// Serialize a value to JSON and publish it
    pub async fn publish_json<M>(&self, topic: &str, message: &M) -> Result<PublishReceipt>
    where
        M: Serialize + Sync + ?Sized,
    {
        let body = serde_json::to_string(message)?;
        self.publish(topic, &body).await
    }

    /// The SNS adapter, if that is the selected backend
    pub fn as_cloud_notification(&self) -> Option<&CloudNotificationClient> {
        match self {
            PublisherClient::CloudNotification(inner) => Some(inner),
            PublisherClient::SidecarBroker(_) => None,
        }
    }

    /// The sidecar adapter, if that is the selected backend
    pub fn as_sidecar_broker(&self) -> Option<&SidecarBrokerClient> {
        match self {
            PublisherClient::SidecarBroker(inner) => Some(inner),
            PublisherClient::CloudNotification(_) => None,
        }
    }
}

#[async_trait::async_trait]
impl Publisher for PublisherClient {
    async fn publish(&self, topic: &str, message: &str) -> Result<PublishReceipt> {
        match self {
            PublisherClient::CloudNotification(inner) => inner.publish(topic, message).await,
            PublisherClient::SidecarBroker(inner) => inner.publish(topic, message).await,
        }
    }

    fn backend_kind(&self) -> BackendKind {
        match self {
            PublisherClient::CloudNotification(inner) => inner.backend_kind(),
            PublisherClient::SidecarBroker(inner) => inner.backend_kind(),
        }
    }
}
