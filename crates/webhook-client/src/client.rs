//! Webhook HTTP client
//!
//! Posts `WebhookMessage` payloads as JSON to a single incoming-webhook URL.
//! Delivery is best effort: there is no retry, the caller decides what to do
//! with a failed post.

use crate::error::WebhookError;
use crate::models::WebhookMessage;
use crate::sink_trait::WebhookSink;
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::debug;

/// Incoming-webhook client
#[derive(Debug, Clone)]
pub struct WebhookClient {
    client: Client,
    url: Url,
}

impl WebhookClient {
    /// Create a new webhook client
    ///
    /// # Arguments
    /// * `url` - Absolute webhook URL (e.g., "https://hooks.slack.com/services/...")
    pub fn new(url: impl AsRef<str>) -> Result<Self, WebhookError> {
        let url = Url::parse(url.as_ref())
            .map_err(|e| WebhookError::InvalidUrl(format!("{}: {}", url.as_ref(), e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(WebhookError::InvalidUrl(format!(
                "unsupported scheme '{}'",
                url.scheme()
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self { client, url })
    }

    /// Get the webhook URL
    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait::async_trait]
impl WebhookSink for WebhookClient {
    async fn post(&self, message: &WebhookMessage) -> Result<(), WebhookError> {
        let body = serde_json::to_vec(message)?;
        debug!("Posting webhook message ({} bytes)", body.len());

        let response = self.client
            .post(self.url.clone())
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WebhookError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_accepts_https_url() {
        let client = WebhookClient::new("https://hooks.example.com/services/T0/B0/abc").unwrap();
        assert_eq!(client.url().host_str(), Some("hooks.example.com"));
    }

    #[test]
    fn test_new_rejects_relative_url() {
        let err = WebhookClient::new("/services/T0/B0/abc").unwrap_err();
        assert!(matches!(err, WebhookError::InvalidUrl(_)));
    }

    #[test]
    fn test_new_rejects_non_http_scheme() {
        let err = WebhookClient::new("ftp://hooks.example.com/x").unwrap_err();
        assert!(matches!(err, WebhookError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn test_post_to_unreachable_endpoint_is_http_error() {
        // Bind then drop a listener to get a port nothing is listening on
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let client = WebhookClient::new(format!("http://127.0.0.1:{}/hook", port)).unwrap();
        let message = WebhookMessage::single(crate::models::Attachment::new("t", "x", "#ff0000"));

        let err = client.post(&message).await.unwrap_err();
        assert!(matches!(err, WebhookError::Http(_)));
    }
}
