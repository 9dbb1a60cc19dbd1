//! Notification formatting and dispatch.
//!
//! Delivery is best effort. A failed post is logged and dropped; it never
//! reaches the detector loop.

use crate::event::{Action, WorkloadKind};
use std::collections::HashSet;
use tracing::{debug, error, info};
use webhook_client::{Attachment, WebhookMessage, WebhookSink};

/// Slack rejects attachment text over 4000 characters; leave room for the
/// code fence.
const MAX_DIFF_CHARS: usize = 3994;

/// A detected change, ready to be reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub action: Action,
    pub kind: WorkloadKind,
    pub name: String,
    /// Position of the triggering event in the detector's input, starting at 1
    pub event_count: u64,
    pub diff: String,
}

impl Notification {
    /// `"{ACTION} {Kind}/{name}"`
    pub fn title(&self) -> String {
        format!("{} {}/{}", self.action, self.kind, self.name)
    }
}

/// Attachment bar color for an action.
pub fn action_color(action: Action) -> &'static str {
    match action {
        Action::Added => "#7CD197",
        Action::Deleted => "#ff0000",
        Action::Modified => "#ff9900",
    }
}

fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Formats notifications and posts them to a `WebhookSink`.
#[derive(Debug)]
pub struct Notifier<S> {
    sink: S,
    cluster_name: Option<String>,
    ignored_actions: HashSet<Action>,
}

impl<S: WebhookSink> Notifier<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            cluster_name: None,
            ignored_actions: HashSet::new(),
        }
    }

    /// Add the cluster name as the attachment footer.
    #[must_use]
    pub fn with_cluster_name(mut self, cluster_name: Option<String>) -> Self {
        self.cluster_name = cluster_name;
        self
    }

    /// Drop notifications for these actions instead of posting them.
    #[must_use]
    pub fn with_ignored_actions(mut self, actions: impl IntoIterator<Item = Action>) -> Self {
        self.ignored_actions = actions.into_iter().collect();
        self
    }

    /// Build the webhook payload for `notification`.
    pub fn message(&self, notification: &Notification) -> WebhookMessage {
        let title = notification.title();
        let text = format!("```{}```", truncate_chars(&notification.diff, MAX_DIFF_CHARS));

        let mut attachment = Attachment::new(title, text, action_color(notification.action))
            .with_ts(chrono::Utc::now().timestamp());
        if let Some(cluster_name) = &self.cluster_name {
            attachment = attachment.with_footer(cluster_name.clone());
        }

        WebhookMessage::single(attachment)
    }

    /// Post `notification` to the sink. Failures are logged, never returned.
    pub async fn notify(&self, notification: &Notification) {
        if self.ignored_actions.contains(&notification.action) {
            debug!(
                "Ignoring {} (event #{}): {} notifications are disabled",
                notification.title(),
                notification.event_count,
                notification.action
            );
            return;
        }

        info!("{} (event #{})", notification.title(), notification.event_count);
        debug!("Diff for {}:\n{}", notification.title(), notification.diff);

        let message = self.message(notification);
        if let Err(e) = self.sink.post(&message).await {
            error!(
                "Failed to deliver notification for {} (event #{}): {}",
                notification.title(),
                notification.event_count,
                e
            );
        }
    }
}
