//! Webhook client errors

use thiserror::Error;

/// Errors that can occur when delivering a webhook message
#[derive(Debug, Error)]
pub enum WebhookError {
    /// HTTP transport error (connection refused, timeout, TLS, ...)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-2xx status
    #[error("Webhook returned status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, possibly empty
        body: String,
    },

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The configured webhook URL is not a valid absolute URL
    #[error("Invalid webhook URL: {0}")]
    InvalidUrl(String),
}
