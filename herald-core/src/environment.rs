//! Deployment environment detection
//!
//! Kubernetes injects `KUBERNETES_SERVICE_HOST` and `KUBERNETES_SERVICE_PORT`
//! into every pod. When both are present the process is assumed to run next to
//! a Dapr sidecar; anywhere else messages go to SNS.

use crate::config::{PublisherSettings, non_empty};
use crate::publisher::BackendKind;

/// Whether the settings describe a process running inside a cluster.
///
/// True only if both the cluster-service host and port are present and non-empty.
pub fn is_cluster_environment(settings: &PublisherSettings) -> bool {
    non_empty(&settings.kubernetes_service_host).is_some()
        && non_empty(&settings.kubernetes_service_port).is_some()
}

/// Backend to use when the caller has not chosen one.
pub fn determine_default_backend(settings: &PublisherSettings) -> BackendKind {
    let kind = if is_cluster_environment(settings) {
        BackendKind::SidecarBroker
    } else {
        BackendKind::CloudNotification
    };

    tracing::debug!(backend = %kind, "Determined default publisher backend");
    kind
}
