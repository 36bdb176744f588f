//! Herald CLI - publish messages from the command line

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use herald_core::prelude::*;

#[derive(Parser)]
#[command(name = "herald")]
#[command(about = "Publish messages to SNS or a Dapr sidecar", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the detected environment and default backend
    Detect,
    /// Publish a message to a topic
    Publish {
        /// Topic name, or topic ARN for SNS
        topic: String,
        /// Message body, sent as-is
        message: String,
        /// Backend to use (aws_sns or dapr); detected from the environment if omitted
        #[arg(short, long)]
        backend: Option<BackendKind>,
        /// Dapr pub/sub component name
        #[arg(short, long, env = "HERALD_PUBSUB_NAME")]
        pubsub_name: Option<String>,
    },
    /// Version information
    Version,
}

/// Explicit flag first, then the configured selector, then the environment probe.
fn resolve_backend(flag: Option<BackendKind>, settings: &PublisherSettings) -> Result<BackendKind> {
    if let Some(kind) = flag {
        return Ok(kind);
    }
    if let Some(kind) = settings.configured_backend()? {
        return Ok(kind);
    }
    let kind = determine_default_backend(settings);
    tracing::info!(
        backend = %kind,
        cluster = is_cluster_environment(settings),
        "No backend given, using environment default"
    );
    Ok(kind)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Version => {
            println!("herald {}", env!("CARGO_PKG_VERSION"));
            println!("herald-core {}", herald_core::VERSION);
        }
        Commands::Detect => {
            let settings = PublisherSettings::load()?;
            println!("cluster environment: {}", is_cluster_environment(&settings));
            println!("default backend: {}", determine_default_backend(&settings));
            if let Some(kind) = settings.configured_backend()? {
                println!("configured backend: {}", kind);
            }
        }
        Commands::Publish {
            topic,
            message,
            backend,
            pubsub_name,
        } => {
            let settings = PublisherSettings::load()?;
            let kind = resolve_backend(backend, &settings)?;

            let mut options = ClientOptions::from_settings(&settings);
            if let Some(name) = pubsub_name {
                options.pubsub_name = name;
            }

            let publisher = create_client(Some(kind), &settings, options).await?;
            let receipt = publisher
                .publish(&topic, &message)
                .await
                .with_context(|| format!("publishing to {} via {}", topic, kind))?;

            println!("{}", serde_json::to_string_pretty(&receipt)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_wins() {
        let settings = PublisherSettings {
            publisher_backend: Some("aws_sns".to_string()),
            ..Default::default()
        };
        let kind = resolve_backend(Some(BackendKind::SidecarBroker), &settings).unwrap();
        assert_eq!(kind, BackendKind::SidecarBroker);
    }

    #[test]
    fn test_configured_backend_before_probe() {
        let settings = PublisherSettings {
            publisher_backend: Some("aws_sns".to_string()),
            kubernetes_service_host: Some("10.152.183.1".to_string()),
            kubernetes_service_port: Some("443".to_string()),
            ..Default::default()
        };
        let kind = resolve_backend(None, &settings).unwrap();
        assert_eq!(kind, BackendKind::CloudNotification);
    }

    #[test]
    fn test_probe_is_last_resort() {
        let settings = PublisherSettings {
            kubernetes_service_host: Some("10.152.183.1".to_string()),
            kubernetes_service_port: Some("443".to_string()),
            ..Default::default()
        };
        assert_eq!(
            resolve_backend(None, &settings).unwrap(),
            BackendKind::SidecarBroker
        );
    }

    #[test]
    fn test_unknown_configured_backend_is_an_error() {
        let settings = PublisherSettings {
            publisher_backend: Some("kafka".to_string()),
            ..Default::default()
        };
        assert!(resolve_backend(None, &settings).is_err());
    }

    #[test]
    fn test_cli_parses_backend_names() {
        let cli = Cli::try_parse_from(["herald", "publish", "orders", "{}", "--backend", "dapr"])
            .unwrap();
        match cli.command {
            Commands::Publish { backend, .. } => assert_eq!(backend, Some(BackendKind::SidecarBroker)),
            _ => panic!("expected publish command"),
        }

        assert!(Cli::try_parse_from(["herald", "publish", "orders", "{}", "-b", "kafka"]).is_err());
    }
}
