//! Publishers for the two supported backends
//!
//! This module provides a uniform publish abstraction over:
//! - SNS, the cloud notification service (default outside a cluster)
//! - A Dapr sidecar, the local pub/sub broker (default inside Kubernetes)
//!
//! Use [`create_client`] or [`PublisherBuilder`] to obtain a [`PublisherClient`].

mod builder;
mod cloud;
mod error;
mod factory;
mod receipt;
mod sidecar;
mod traits;

pub use builder::PublisherBuilder;
pub use cloud::CloudNotificationClient;
pub use error::{BackendFault, PublisherError};
pub use factory::{ClientOptions, PublisherClient, create_client};
pub use receipt::PublishReceipt;
pub use sidecar::{EVENT_CONTENT_TYPE, SidecarBrokerClient};
pub use traits::{BackendKind, Publisher};
