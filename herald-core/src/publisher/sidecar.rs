//! Dapr sidecar publisher
//!
//! Talks to the sidecar's HTTP publish API:
//! `POST {sidecar}/v1.0/publish/{pubsub_name}/{topic}`. A fresh connection is
//! opened for every call and released when the call returns, whichever way
//! it returns.

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap};
use serde::Deserialize;

use crate::config::{PublisherSettings, non_empty};
use crate::error::Result;

use super::error::{BackendFault, PublisherError};
use super::receipt::PublishReceipt;
use super::traits::{BackendKind, Publisher};

/// Content type attached to every event published through the sidecar
pub const EVENT_CONTENT_TYPE: &str = "application/json";

const API_TOKEN_HEADER: &str = "dapr-api-token";

/// Publisher that forwards events to a Dapr pub/sub component
#[derive(Debug, Clone)]
pub struct SidecarBrokerClient {
    pubsub_name: String,
    endpoint: String,
    api_token: Option<String>,
}

impl SidecarBrokerClient {
    /// Create a publisher for the given pub/sub component.
    ///
    /// # Arguments
    ///
    /// * `pubsub_name` - Name of the Dapr pub/sub component
    /// * `settings` - Sidecar address and API token
    pub fn new(pubsub_name: impl Into<String>, settings: &PublisherSettings) -> Self {
        let client = Self {
            pubsub_name: pubsub_name.into(),
            endpoint: settings.sidecar_endpoint(),
            api_token: non_empty(&settings.dapr_api_token).map(str::to_string),
        };

        tracing::debug!(
            pubsub_name = %client.pubsub_name,
            endpoint = %client.endpoint,
            "Created sidecar publisher"
        );

        client
    }

    /// Pub/sub component this publisher is bound to
    pub fn pubsub_name(&self) -> &str {
        &self.pubsub_name
    }

    /// Sidecar HTTP endpoint
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn publish_url(&self, topic: &str) -> String {
        format!(
            "{}/v1.0/publish/{}/{}",
            self.endpoint,
            urlencoding::encode(&self.pubsub_name),
            urlencoding::encode(topic)
        )
    }
}

/// A connection to the sidecar that lives for one publish call
struct SidecarConnection {
    http: reqwest::Client,
}

impl SidecarConnection {
    fn open() -> Result<Self> {
        let http = reqwest::Client::builder()
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| PublisherError::from(BackendFault::SidecarTransport(e)))?;
        Ok(Self { http })
    }
}

/// Error body returned by the sidecar
#[derive(Deserialize)]
struct SidecarErrorBody {
    #[serde(rename = "errorCode")]
    error_code: Option<String>,
    message: Option<String>,
}

#[async_trait]
impl Publisher for SidecarBrokerClient {
    async fn publish(&self, topic: &str, message: &str) -> Result<PublishReceipt> {
        tracing::debug!(
            backend = "dapr",
            pubsub_name = %self.pubsub_name,
            topic,
            "Publishing message"
        );

        let connection = SidecarConnection::open()?;

        let mut request = connection
            .http
            .post(self.publish_url(topic))
            .header(CONTENT_TYPE, EVENT_CONTENT_TYPE)
            .body(message.to_owned());
        if let Some(token) = &self.api_token {
            request = request.header(API_TOKEN_HEADER, token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| PublisherError::from(BackendFault::SidecarTransport(e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| PublisherError::from(BackendFault::SidecarTransport(e)))?;
            let fault = parse_fault(status.as_u16(), &body);
            tracing::warn!(
                backend = "dapr",
                topic,
                status = status.as_u16(),
                error = %fault,
                "Sidecar rejected publish"
            );
            return Err(PublisherError::from(fault).into());
        }

        let mut receipt = PublishReceipt::new(BackendKind::SidecarBroker);
        receipt.status = Some(status.as_u16());
        record_headers(&mut receipt, response.headers());

        Ok(receipt)
    }

    fn backend_kind(&self) -> BackendKind {
        BackendKind::SidecarBroker
    }
}

/// Dapr's `{"errorCode", "message"}` body when present; the raw body otherwise.
fn parse_fault(status: u16, body: &str) -> BackendFault {
    let parsed = serde_json::from_str::<SidecarErrorBody>(body).ok();
    let (error_code, message) = match parsed {
        Some(SidecarErrorBody {
            error_code,
            message: Some(message),
        }) => (error_code, message),
        Some(SidecarErrorBody { error_code, .. }) => (error_code, body.trim().to_string()),
        None => (None, body.trim().to_string()),
    };

    BackendFault::Sidecar {
        status,
        error_code,
        message,
    }
}

fn record_headers(receipt: &mut PublishReceipt, headers: &HeaderMap) {
    for (name, value) in headers {
        if let Ok(value) = value.to_str() {
            receipt.push_metadata(name.as_str(), value);
        }
    }
}
