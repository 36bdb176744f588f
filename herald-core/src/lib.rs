//! # Herald - environment-aware message publishing
//!
//! Herald publishes messages either to SNS or through a Dapr sidecar, behind
//! one `publish(topic, message)` call:
//! - Outside a cluster, messages go to SNS (or LocalStack when
//!   `LOCALSTACK_HOSTNAME` is set)
//! - Inside Kubernetes, messages go to the Dapr sidecar next to the pod
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use herald_core::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let settings = PublisherSettings::load()?;
//!     let backend = determine_default_backend(&settings);
//!
//!     let publisher =
//!         create_client(Some(backend), &settings, ClientOptions::new("pubsub")).await?;
//!     let receipt = publisher.publish("orders", r#"{"id": 42}"#).await?;
//!     println!("{:?}", receipt.message_id);
//!
//!     Ok(())
//! }
//! ```
//!
//! The factory never guesses: passing no backend is an error. Ask
//! [`environment::determine_default_backend`] when the environment should decide.

pub mod config;
pub mod environment;
pub mod error;
pub mod publisher;

/// Current library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::PublisherSettings;
    pub use crate::environment::{determine_default_backend, is_cluster_environment};
    pub use crate::error::{HeraldError, Result};
    pub use crate::publisher::{
        BackendFault, BackendKind, ClientOptions, PublishReceipt, Publisher, PublisherBuilder,
        PublisherClient, PublisherError, create_client,
    };
}
