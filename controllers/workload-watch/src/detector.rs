//! Change detection.
//!
//! The `ChangeDetector` is the single consumer of the shared event channel.
//! It owns the last-seen canonical form of every workload identity and
//! decides, one event at a time, whether an event is a change worth
//! reporting.
//!
//! Decision table once the sync gate is open:
//! - `Added`: diff of the event's canonical form against nothing.
//! - `Deleted`: diff of nothing against the event's canonical form (all
//!   lines removed). The payload of the delete event is used, not the
//!   stored form.
//! - `Modified`: diff against the stored form; nothing if the identity was
//!   never seen or the forms are equal.
//!
//! Before the gate opens nothing is reported. Storage is updated for every
//! accepted event and entries are never removed.

use crate::diff::compact_diff;
use crate::error::ControllerError;
use crate::event::{Action, RawEvent, ResourceEvent};
use crate::notifier::{Notification, Notifier};
use crate::sync_gate::SyncGate;
use std::collections::HashMap;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, error, info, warn};
use webhook_client::WebhookSink;

/// Stateful consumer of workload events.
#[derive(Debug)]
pub struct ChangeDetector<S> {
    /// identity -> last canonical form
    storage: HashMap<String, String>,
    event_count: u64,
    gate: SyncGate,
    notifier: Notifier<S>,
}

impl<S: WebhookSink> ChangeDetector<S> {
    pub fn new(gate: SyncGate, notifier: Notifier<S>) -> Self {
        Self {
            storage: HashMap::new(),
            event_count: 0,
            gate,
            notifier,
        }
    }

    /// Number of events received so far, including rejected ones.
    pub fn event_count(&self) -> u64 {
        self.event_count
    }

    /// Last canonical form stored for `identity`.
    #[allow(dead_code)] // Inspection helper, used by tests
    pub fn stored(&self, identity: &str) -> Option<&str> {
        self.storage.get(identity).map(String::as_str)
    }

    /// Number of distinct identities seen.
    pub fn tracked(&self) -> usize {
        self.storage.len()
    }

    /// Decide whether `raw` should be reported and record its canonical form.
    ///
    /// Rejected events (unknown kind, missing name) leave storage untouched.
    pub fn evaluate(&mut self, raw: RawEvent) -> Result<Option<Notification>, ControllerError> {
        self.event_count += 1;

        let event = ResourceEvent::try_from(raw)?;
        let identity = event.identity();

        let diff = if self.gate.is_synced() {
            match event.action {
                Action::Added => Some(compact_diff("", &event.canonical)),
                Action::Deleted => Some(compact_diff(&event.canonical, "")),
                Action::Modified => self
                    .storage
                    .get(&identity)
                    .filter(|stored| **stored != event.canonical)
                    .map(|stored| compact_diff(stored, &event.canonical)),
            }
        } else {
            debug!("Not synced yet, suppressing {} {}", event.action, identity);
            None
        };

        let notification = diff.filter(|diff| !diff.is_empty()).map(|diff| Notification {
            action: event.action,
            kind: event.kind,
            name: event.name,
            event_count: self.event_count,
            diff,
        });

        self.storage.insert(identity, event.canonical);
        Ok(notification)
    }

    /// Process one event end to end. Never fails; problems are logged.
    pub async fn handle(&mut self, raw: RawEvent) {
        let action = raw.action;
        match self.evaluate(raw) {
            Ok(Some(notification)) => self.notifier.notify(&notification).await,
            Ok(None) => {}
            Err(ControllerError::UnknownKind(kind)) => {
                warn!("Unknown resource kind {} (event #{}), skipping", kind, self.event_count);
            }
            Err(e) => {
                error!("Failed to process {} event #{}: {}", action, self.event_count, e);
            }
        }
    }

    /// Drain `events` in arrival order until every producer has gone away.
    pub async fn run(mut self, mut events: UnboundedReceiver<RawEvent>) -> Result<(), ControllerError> {
        info!("Change detector started");

        while let Some(raw) = events.recv().await {
            self.handle(raw).await;
        }

        warn!(
            "Event channel closed after {} events ({} workloads tracked)",
            self.event_count(),
            self.tracked()
        );
        Ok(())
    }
}
