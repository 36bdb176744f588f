//! Detect the deployment environment and publish one message
//!
//! Run inside a pod with a Dapr sidecar, or locally against LocalStack:
//!
//! ```sh
//! LOCALSTACK_HOSTNAME=localhost cargo run --example detect_and_publish -- \
//!     arn:aws:sns:us-east-1:000000000000:orders '{"id": 1}'
//! ```

use herald_core::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let topic = args.next().unwrap_or_else(|| "example".to_string());
    let message = args.next().unwrap_or_else(|| r#"{"hello": "world"}"#.to_string());

    let settings = PublisherSettings::load()?;
    println!("cluster environment: {}", is_cluster_environment(&settings));

    let publisher = PublisherBuilder::new()
        .settings(settings)
        .detect_backend()
        .pubsub_name("pubsub")
        .build()
        .await?;
    println!("publishing via {}", publisher.backend_kind());

    let receipt = publisher.publish(&topic, &message).await?;
    println!("{}", serde_json::to_string_pretty(&receipt)?);

    Ok(())
}
