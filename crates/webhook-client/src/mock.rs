//! Mock WebhookClient for unit testing
//!
//! Records every message it is asked to deliver and can be switched into a
//! failing mode to exercise delivery-error paths.

use crate::error::WebhookError;
use crate::models::WebhookMessage;
use crate::sink_trait::WebhookSink;
use std::sync::{Arc, Mutex};

/// Mock webhook sink for testing
///
/// Clones share the same recorded state, so a test can keep one handle and
/// give another to the code under test.
#[derive(Debug, Clone, Default)]
pub struct MockWebhookClient {
    messages: Arc<Mutex<Vec<WebhookMessage>>>,
    fail_with_status: Arc<Mutex<Option<u16>>>,
}

impl MockWebhookClient {
    /// Create a new mock that accepts every message
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following `post` fail with the given HTTP status
    pub fn fail_with_status(&self, status: u16) {
        *self.fail_with_status.lock().unwrap() = Some(status);
    }

    /// All messages posted so far, including ones that were answered with a failure
    pub fn messages(&self) -> Vec<WebhookMessage> {
        self.messages.lock().unwrap().clone()
    }

    /// Number of messages posted so far
    pub fn post_count(&self) -> usize {
        self.messages.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl WebhookSink for MockWebhookClient {
    async fn post(&self, message: &WebhookMessage) -> Result<(), WebhookError> {
        self.messages.lock().unwrap().push(message.clone());

        match *self.fail_with_status.lock().unwrap() {
            Some(status) => Err(WebhookError::Status {
                status,
                body: "mock failure".to_string(),
            }),
            None => Ok(()),
        }
    }
}
