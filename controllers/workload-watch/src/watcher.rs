//! Kubernetes resource watchers.
//!
//! A `Watcher` is bound to one workload kind. It pulls events from its
//! Source and pushes them onto the channel shared with the change detector.
//! The channel is unbounded: producers never wait for the detector, at the
//! cost of memory if the detector falls behind.

use crate::error::ControllerError;
use crate::event::{RawEvent, WorkloadKind};
use futures::{Stream, TryStreamExt};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

/// Forwards events for one kind to the change detector.
#[derive(Debug, Clone)]
pub struct Watcher {
    kind: WorkloadKind,
    events: UnboundedSender<RawEvent>,
}

impl Watcher {
    /// Creates a new watcher instance.
    pub fn new(kind: WorkloadKind, events: UnboundedSender<RawEvent>) -> Self {
        Self { kind, events }
    }

    pub fn kind(&self) -> WorkloadKind {
        self.kind
    }

    /// Forward every event from `source` until it ends.
    ///
    /// A Source error ends this watcher and is returned. The other watchers
    /// are unaffected.
    pub async fn watch<S>(&self, source: S) -> Result<(), ControllerError>
    where
        S: Stream<Item = Result<RawEvent, ControllerError>>,
    {
        info!("Starting {} watcher", self.kind);

        let mut source = Box::pin(source);
        while let Some(event) = source.try_next().await
            .map_err(|e| ControllerError::Watch(format!("{} source failed: {}", self.kind, e)))?
        {
            debug!(
                "{} {} {}",
                event.action,
                self.kind,
                event.object.metadata.name.as_deref().unwrap_or("<unknown>")
            );

            self.events.send(event)
                .map_err(|_| ControllerError::Watch(format!(
                    "{} watcher: change detector is gone",
                    self.kind
                )))?;
        }

        warn!("{} source ended", self.kind);
        Ok(())
    }
}
