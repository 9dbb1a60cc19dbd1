//! Controller-specific error types.
//!
//! This module defines error types specific to the workload watch controller
//! that are not covered by upstream library errors.

use thiserror::Error;
use kube::Error as KubeError;
use webhook_client::WebhookError;

/// Errors that can occur in the workload watch controller.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Kubernetes API error
    #[error("Kubernetes error: {0}")]
    Kube(#[from] KubeError),

    /// Webhook client error
    #[error("Webhook error: {0}")]
    Webhook(#[from] WebhookError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Event for a resource kind outside Deployment/DaemonSet/StatefulSet/CronJob
    #[error("Unknown resource kind: {0}")]
    UnknownKind(String),

    /// Event whose object cannot be identified
    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    /// Resource watch failed
    #[error("Resource watch failed: {0}")]
    Watch(String),
}
