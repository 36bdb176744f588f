//! Builder for creating publisher clients

use crate::config::PublisherSettings;
use crate::environment::determine_default_backend;
use crate::error::Result;

use super::factory::{ClientOptions, PublisherClient, create_client};
use super::traits::BackendKind;

/// Builder for creating publisher clients
///
/// ```rust,no_run
/// use herald_core::prelude::*;
///
/// # async fn run() -> herald_core::error::Result<()> {
/// let publisher = PublisherBuilder::new()
///     .settings(PublisherSettings::load()?)
///     .detect_backend()
///     .pubsub_name("pubsub")
///     .build()
///     .await?;
///
/// publisher.publish("orders", r#"{"id": 1}"#).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct PublisherBuilder {
    backend: Option<BackendKind>,
    settings: PublisherSettings,
    options: ClientOptions,
}

impl PublisherBuilder {
    /// Create a new publisher builder with no backend selected
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific backend
    pub fn backend(mut self, kind: BackendKind) -> Self {
        self.backend = Some(kind);
        self
    }

    /// Use SNS
    pub fn cloud_notification(self) -> Self {
        self.backend(BackendKind::CloudNotification)
    }

    /// Use the Dapr sidecar
    pub fn sidecar_broker(self) -> Self {
        self.backend(BackendKind::SidecarBroker)
    }

    /// Let the environment probe pick the backend from the current settings.
    ///
    /// Call after [`PublisherBuilder::settings`]; the decision is made here and
    /// does not change afterwards.
    pub fn detect_backend(mut self) -> Self {
        self.backend = Some(determine_default_backend(&self.settings));
        self
    }

    /// Deployment settings for the probe and the adapters
    pub fn settings(mut self, settings: PublisherSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Dapr pub/sub component name
    pub fn pubsub_name(mut self, name: impl Into<String>) -> Self {
        self.options.pubsub_name = name.into();
        self
    }

    /// Backend selected so far, if any
    pub fn selected_backend(&self) -> Option<BackendKind> {
        self.backend
    }

    /// Build the publisher client
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedBackend` if no backend was selected.
    pub async fn build(self) -> Result<PublisherClient> {
        create_client(self.backend, &self.settings, self.options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::publisher::{Publisher, PublisherError};

    fn cluster_settings() -> PublisherSettings {
        PublisherSettings {
            kubernetes_service_host: Some("10.152.183.1".to_string()),
            kubernetes_service_port: Some("443".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_detect_backend_in_cluster() {
        let publisher = PublisherBuilder::new()
            .settings(cluster_settings())
            .detect_backend()
            .pubsub_name("pubsub")
            .build()
            .await
            .unwrap();

        assert_eq!(publisher.backend_kind(), BackendKind::SidecarBroker);
    }

    #[test]
    fn test_detection_is_fixed_once_made() {
        let builder = PublisherBuilder::new()
            .settings(cluster_settings())
            .detect_backend()
            .settings(PublisherSettings::default());

        assert_eq!(builder.selected_backend(), Some(BackendKind::SidecarBroker));
    }

    #[tokio::test]
    async fn test_build_without_backend_fails() {
        let err = PublisherBuilder::new().build().await.unwrap_err();
        assert!(matches!(
            err.as_publisher(),
            Some(PublisherError::UnsupportedBackend(_))
        ));
    }

    #[tokio::test]
    async fn test_explicit_backend_wins_over_cluster_environment() {
        let publisher = PublisherBuilder::new()
            .settings(PublisherSettings {
                aws_region: Some("eu-west-1".to_string()),
                ..cluster_settings()
            })
            .cloud_notification()
            .build()
            .await
            .unwrap();

        assert!(publisher.as_cloud_notification().is_some());
    }
}
