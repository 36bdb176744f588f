//! SNS publisher
//!
//! Publishes straight to an SNS topic ARN. When `LOCALSTACK_HOSTNAME` is set
//! the client is pointed at LocalStack instead of the regional AWS endpoint.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_sns::Client as SnsClient;
use aws_sdk_sns::config::{Builder as SnsConfigBuilder, Region};
use aws_sdk_sns::operation::RequestId;

use crate::config::{LOCAL_DEFAULT_REGION, PublisherSettings, non_empty};
use crate::error::Result;

use super::error::{BackendFault, PublisherError};
use super::receipt::PublishReceipt;
use super::traits::{BackendKind, Publisher};

/// Publisher backed by the SNS API
#[derive(Debug, Clone)]
pub struct CloudNotificationClient {
    client: SnsClient,
    endpoint: Option<String>,
}

impl CloudNotificationClient {
    /// Build an SNS client from the settings and the standard AWS config chain.
    ///
    /// The LocalStack override only replaces the endpoint; the region still comes
    /// from `aws_region` or the SDK's own chain, falling back to `us-east-1` when
    /// neither yields one.
    pub async fn new(settings: &PublisherSettings) -> Self {
        let endpoint = settings.localstack_endpoint();

        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = non_empty(&settings.aws_region) {
            loader = loader.region(Region::new(region.to_string()));
        }
        let aws_cfg = loader.load().await;

        let mut builder = SnsConfigBuilder::from(&aws_cfg);
        if let Some(ep) = endpoint.as_deref() {
            builder = builder.endpoint_url(ep);
            if aws_cfg.region().is_none() {
                builder = builder.region(Region::new(LOCAL_DEFAULT_REGION));
            }
        }
        let client = SnsClient::from_conf(builder.build());

        tracing::debug!(
            endpoint = endpoint.as_deref().unwrap_or("default"),
            region = client.config().region().map(|r| r.as_ref()).unwrap_or("unset"),
            "Created SNS publisher"
        );

        Self { client, endpoint }
    }

    /// Wrap an already configured SNS client
    pub fn from_client(client: SnsClient) -> Self {
        Self {
            client,
            endpoint: None,
        }
    }

    /// Endpoint override in use, `None` for standard AWS resolution
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    /// Underlying SDK client
    pub fn inner(&self) -> &SnsClient {
        &self.client
    }
}

#[async_trait]
impl Publisher for CloudNotificationClient {
    async fn publish(&self, topic: &str, message: &str) -> Result<PublishReceipt> {
        tracing::debug!(backend = "aws_sns", topic, "Publishing message");

        let output = self
            .client
            .publish()
            .topic_arn(topic)
            .message(message)
            .send()
            .await
            .map_err(|e| {
                let err = aws_sdk_sns::Error::from(e);
                tracing::warn!(backend = "aws_sns", topic, error = %err, "SNS rejected publish");
                PublisherError::from(BackendFault::CloudNotification(err))
            })?;

        let mut receipt = PublishReceipt::new(BackendKind::CloudNotification);
        receipt.message_id = output.message_id().map(str::to_string);
        receipt.sequence_number = output.sequence_number().map(str::to_string);
        if let Some(request_id) = output.request_id() {
            receipt.push_metadata("x-amzn-requestid", request_id);
        }

        Ok(receipt)
    }

    fn backend_kind(&self) -> BackendKind {
        BackendKind::CloudNotification
    }
}
