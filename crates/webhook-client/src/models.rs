//! Webhook payload models
//!
//! These models match the Slack incoming-webhook attachment format:
//! `{"attachments":[{"fallback","title","text","color"}]}`.
//! See: https://api.slack.com/docs/message-attachments

use serde::{Deserialize, Serialize};

/// Top-level webhook payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookMessage {
    pub attachments: Vec<Attachment>,
}

impl WebhookMessage {
    /// Message carrying exactly one attachment
    pub fn single(attachment: Attachment) -> Self {
        Self {
            attachments: vec![attachment],
        }
    }
}

/// One message attachment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Plain-text summary shown by clients that cannot render attachments
    pub fallback: String,
    pub title: String,
    pub text: String,
    /// Hex color of the attachment bar, e.g. "#ff0000"
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    /// Unix timestamp in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ts: Option<i64>,
}

impl Attachment {
    /// Create an attachment whose fallback text is its title
    pub fn new(title: impl Into<String>, text: impl Into<String>, color: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            fallback: title.clone(),
            title,
            text: text.into(),
            color: color.into(),
            footer: None,
            ts: None,
        }
    }

    /// Set the footer line
    #[must_use]
    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    /// Set the message timestamp
    #[must_use]
    pub fn with_ts(mut self, ts: i64) -> Self {
        self.ts = Some(ts);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_shape() {
        let message = WebhookMessage::single(Attachment::new(
            "DELETED StatefulSet/db",
            "```-replicas: 1```",
            "#ff0000",
        ));
        let value = serde_json::to_value(&message).unwrap();

        let attachment = &value["attachments"][0];
        assert_eq!(attachment["fallback"], "DELETED StatefulSet/db");
        assert_eq!(attachment["title"], "DELETED StatefulSet/db");
        assert_eq!(attachment["text"], "```-replicas: 1```");
        assert_eq!(attachment["color"], "#ff0000");
        // Optional fields are omitted entirely when unset
        assert!(attachment.get("footer").is_none());
        assert!(attachment.get("ts").is_none());
    }

    #[test]
    fn test_footer_and_ts_serialized_when_set() {
        let attachment = Attachment::new("t", "x", "#ff9900")
            .with_footer("prod-eu-1")
            .with_ts(1_700_000_000);
        let value = serde_json::to_value(&attachment).unwrap();

        assert_eq!(value["footer"], "prod-eu-1");
        assert_eq!(value["ts"], 1_700_000_000);
    }
}
