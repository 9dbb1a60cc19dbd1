//! Incoming Webhook Client
//!
//! A small client for posting change notifications to an incoming webhook
//! that accepts the Slack attachment payload format.
//!
//! # Example
//!
//! ```no_run
//! use webhook_client::{Attachment, WebhookClient, WebhookMessage, WebhookSink};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = WebhookClient::new("https://hooks.slack.com/services/T000/B000/XXXX")?;
//!
//! let message = WebhookMessage::single(Attachment::new(
//!     "ADDED Deployment/api",
//!     "```+replicas: 3```",
//!     "#7CD197",
//! ));
//! client.post(&message).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod models;
#[path = "trait.rs"]
pub mod sink_trait;
#[cfg(feature = "test-util")]
pub mod mock;

pub use client::WebhookClient;
pub use error::WebhookError;
pub use models::*;
pub use sink_trait::WebhookSink;
#[cfg(feature = "test-util")]
pub use mock::MockWebhookClient;
