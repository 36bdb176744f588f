//! Configuration types for Herald

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;
use crate::publisher::BackendKind;

/// Port LocalStack serves every AWS service on
pub const LOCALSTACK_PORT: u16 = 4566;

/// Region used against a local endpoint when none is configured
pub const LOCAL_DEFAULT_REGION: &str = "us-east-1";

/// Dapr sidecar HTTP port when `DAPR_HTTP_PORT` is unset
pub const DEFAULT_DAPR_HTTP_PORT: u16 = 3500;

/// Process variables read without a prefix
const RAW_ENV_KEYS: &[&str] = &[
    "localstack_hostname",
    "kubernetes_service_host",
    "kubernetes_service_port",
    "dapr_http_endpoint",
    "dapr_http_port",
    "dapr_api_token",
    "aws_region",
];

/// Deployment settings the probe and factory work from.
///
/// Every field is optional; an absent value is a valid state, not an error.
/// Empty strings are treated the same as absent values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublisherSettings {
    /// Host of a LocalStack instance to publish SNS messages to
    #[serde(default, deserialize_with = "lenient_string")]
    pub localstack_hostname: Option<String>,

    /// Injected by Kubernetes into every pod
    #[serde(default, deserialize_with = "lenient_string")]
    pub kubernetes_service_host: Option<String>,

    /// Injected by Kubernetes into every pod
    #[serde(default, deserialize_with = "lenient_string")]
    pub kubernetes_service_port: Option<String>,

    /// Full sidecar HTTP endpoint, takes precedence over the port
    #[serde(default, deserialize_with = "lenient_string")]
    pub dapr_http_endpoint: Option<String>,

    /// Sidecar HTTP port on localhost
    #[serde(default, deserialize_with = "lenient_string")]
    pub dapr_http_port: Option<String>,

    /// Token sent as `dapr-api-token` when the sidecar requires one
    #[serde(default, deserialize_with = "lenient_string", skip_serializing)]
    pub dapr_api_token: Option<String>,

    /// Region override for the SNS client
    #[serde(default, deserialize_with = "lenient_string")]
    pub aws_region: Option<String>,

    /// Configured backend selector (`aws_sns` or `dapr`)
    #[serde(default, deserialize_with = "lenient_string")]
    pub publisher_backend: Option<String>,

    /// Configured Dapr pub/sub component name
    #[serde(default, deserialize_with = "lenient_string")]
    pub pubsub_name: Option<String>,
}

impl PublisherSettings {
    /// Load settings from files and environment variables.
    ///
    /// Loads in this order:
    /// 1. Defaults (everything absent)
    /// 2. `herald.toml`, searched for in the working directory and then each
    ///    parent directory
    /// 3. The file named by `HERALD_CONFIG_PATH`
    /// 4. Raw process variables (`KUBERNETES_SERVICE_HOST`, `DAPR_HTTP_PORT`, ...)
    /// 5. `HERALD_`-prefixed variables
    ///
    /// Nothing is cached; every call reads the current state.
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file cannot be parsed.
    pub fn load() -> Result<Self> {
        use figment::{
            Figment,
            providers::{Env, Format, Toml},
        };

        let mut figment = Figment::new().merge(Toml::file("herald.toml"));

        if let Ok(path) = std::env::var("HERALD_CONFIG_PATH") {
            figment = figment.merge(Toml::file(path));
        }

        let settings: PublisherSettings = figment
            .merge(Env::raw().only(RAW_ENV_KEYS))
            .merge(Env::prefixed("HERALD_").ignore(&["config_path"]))
            .extract()?;

        Ok(settings)
    }

    /// Load settings from the process environment only.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable holds a value that cannot be read.
    pub fn from_env() -> Result<Self> {
        use figment::{Figment, providers::Env};

        let settings: PublisherSettings = Figment::new()
            .merge(Env::raw().only(RAW_ENV_KEYS))
            .merge(Env::prefixed("HERALD_").ignore(&["config_path"]))
            .extract()?;

        Ok(settings)
    }

    /// Load settings from a specific TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        use figment::{
            Figment,
            providers::{Format, Toml},
        };

        let settings: PublisherSettings = Figment::new()
            .merge(Toml::file(path.as_ref()))
            .extract()?;

        Ok(settings)
    }

    /// Endpoint of the local SNS stand-in, if one is configured
    pub fn localstack_endpoint(&self) -> Option<String> {
        non_empty(&self.localstack_hostname)
            .map(|host| format!("http://{}:{}", host, LOCALSTACK_PORT))
    }

    /// Base URL of the Dapr sidecar's HTTP API
    pub fn sidecar_endpoint(&self) -> String {
        if let Some(endpoint) = non_empty(&self.dapr_http_endpoint) {
            return endpoint.trim_end_matches('/').to_string();
        }

        match non_empty(&self.dapr_http_port) {
            Some(port) => format!("http://127.0.0.1:{}", port),
            None => format!("http://127.0.0.1:{}", DEFAULT_DAPR_HTTP_PORT),
        }
    }

    /// Configured backend selector, parsed
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedBackend` when the configured name is not a known backend.
    pub fn configured_backend(&self) -> Result<Option<BackendKind>> {
        match non_empty(&self.publisher_backend) {
            Some(name) => Ok(Some(name.parse::<BackendKind>()?)),
            None => Ok(None),
        }
    }
}

/// Value of an optional setting, with empty strings treated as absent
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Accept numbers and booleans as text; environment providers type-guess values.
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Unsigned(u64),
        Signed(i64),
        Float(f64),
        Flag(bool),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Unsigned(n) => n.to_string(),
        Raw::Signed(n) => n.to_string(),
        Raw::Float(n) => n.to_string(),
        Raw::Flag(b) => b.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults_are_all_absent() {
        let settings = PublisherSettings::default();
        assert!(settings.localstack_endpoint().is_none());
        assert_eq!(settings.sidecar_endpoint(), "http://127.0.0.1:3500");
        assert!(settings.configured_backend().unwrap().is_none());
    }

    #[test]
    fn test_localstack_endpoint_uses_fixed_port() {
        let settings = PublisherSettings {
            localstack_hostname: Some("localstack".to_string()),
            ..Default::default()
        };
        assert_eq!(
            settings.localstack_endpoint().as_deref(),
            Some("http://localstack:4566")
        );

        let empty = PublisherSettings {
            localstack_hostname: Some(String::new()),
            ..Default::default()
        };
        assert!(empty.localstack_endpoint().is_none());
    }

    #[test]
    fn test_sidecar_endpoint_precedence() {
        let port_only = PublisherSettings {
            dapr_http_port: Some("3601".to_string()),
            ..Default::default()
        };
        assert_eq!(port_only.sidecar_endpoint(), "http://127.0.0.1:3601");

        let both = PublisherSettings {
            dapr_http_endpoint: Some("http://dapr.local:3500/".to_string()),
            dapr_http_port: Some("3601".to_string()),
            ..Default::default()
        };
        assert_eq!(both.sidecar_endpoint(), "http://dapr.local:3500");
    }

    #[test]
    fn test_configured_backend_rejects_unknown_name() {
        let settings = PublisherSettings {
            publisher_backend: Some("kafka".to_string()),
            ..Default::default()
        };
        let err = settings.configured_backend().unwrap_err();
        assert!(err.to_string().contains("kafka"));
    }

    #[test]
    fn test_from_env_reads_numeric_values_as_text() {
        Jail::expect_with(|jail| {
            jail.set_env("KUBERNETES_SERVICE_HOST", "10.152.183.1");
            jail.set_env("KUBERNETES_SERVICE_PORT", "443");
            jail.set_env("DAPR_HTTP_PORT", "3601");
            jail.set_env("HERALD_PUBLISHER_BACKEND", "dapr");
            jail.set_env("HERALD_PUBSUB_NAME", "orders");

            let settings = PublisherSettings::from_env().map_err(|e| e.to_string())?;
            assert_eq!(settings.kubernetes_service_host.as_deref(), Some("10.152.183.1"));
            assert_eq!(settings.kubernetes_service_port.as_deref(), Some("443"));
            assert_eq!(settings.sidecar_endpoint(), "http://127.0.0.1:3601");
            assert_eq!(settings.pubsub_name.as_deref(), Some("orders"));
            assert_eq!(
                settings.configured_backend().map_err(|e| e.to_string())?,
                Some(BackendKind::SidecarBroker)
            );
            Ok(())
        });
    }

    #[test]
    fn test_load_layers_file_under_environment() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "herald.toml",
                r#"
                    localstack_hostname = "from-file"
                    pubsub_name = "file-pubsub"
                "#,
            )?;
            jail.set_env("LOCALSTACK_HOSTNAME", "from-env");

            let settings = PublisherSettings::load().map_err(|e| e.to_string())?;
            assert_eq!(settings.localstack_hostname.as_deref(), Some("from-env"));
            assert_eq!(settings.pubsub_name.as_deref(), Some("file-pubsub"));
            Ok(())
        });
    }

    #[test]
    fn test_load_finds_file_in_parent_directory() {
        Jail::expect_with(|jail| {
            jail.create_file("herald.toml", r#"pubsub_name = "parent-pubsub""#)?;
            let nested = jail.directory().join("services").join("orders");
            std::fs::create_dir_all(&nested).map_err(|e| e.to_string())?;
            std::env::set_current_dir(&nested).map_err(|e| e.to_string())?;

            let settings = PublisherSettings::load().map_err(|e| e.to_string())?;
            assert_eq!(settings.pubsub_name.as_deref(), Some("parent-pubsub"));
            Ok(())
        });
    }

    #[test]
    fn test_from_file_reads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("herald.toml");
        std::fs::write(
            &path,
            "publisher_backend = \"aws_sns\"\nkubernetes_service_port = 443\n",
        )
        .unwrap();

        let settings = PublisherSettings::from_file(&path).unwrap();
        assert_eq!(settings.kubernetes_service_port.as_deref(), Some("443"));
        assert_eq!(
            settings.configured_backend().unwrap(),
            Some(BackendKind::CloudNotification)
        );
    }

    #[test]
    fn test_from_file_invalid_toml_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("herald.toml");
        std::fs::write(&path, "publisher_backend = [unterminated").unwrap();

        let err = PublisherSettings::from_file(&path).unwrap_err();
        assert!(matches!(err, crate::error::HeraldError::Configuration(_)));
    }
}
