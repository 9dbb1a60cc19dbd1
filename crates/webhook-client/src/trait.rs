//! WebhookSink trait for mocking
//!
//! The concrete `WebhookClient` implements this trait, and tests can use
//! `MockWebhookClient` instead of a live endpoint.

use crate::error::WebhookError;
use crate::models::WebhookMessage;

/// Destination for formatted notifications.
///
/// All async methods must be `Send` to work with Tokio's runtime.
#[async_trait::async_trait]
pub trait WebhookSink: Send + Sync {
    /// Deliver one message. A non-2xx answer is an error.
    async fn post(&self, message: &WebhookMessage) -> Result<(), WebhookError>;
}
