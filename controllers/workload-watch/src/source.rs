//! Kubernetes event Sources.
//!
//! A Source turns one `kube_runtime::watcher` stream into `RawEvent`s. The
//! watcher only reports "applied" and "deleted", so the Source remembers
//! which objects it has seen to tell `Added` from `Modified`. The initial
//! list comes out as a burst of `Added` events, one per existing object.
//!
//! Seen keys are not pruned on a re-list. An object deleted during a watch
//! gap and recreated under the same name before the re-list is reported as
//! `Modified`, not `Added`; the detector then diffs it against the last
//! form it stored.

use crate::backoff::FibonacciBackoff;
use crate::error::ControllerError;
use crate::event::{Action, RawEvent, RawObject};
use futures::{Stream, StreamExt, future};
use kube::{Api, Resource, ResourceExt};
use kube_runtime::{WatchStreamExt, watcher};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::fmt::Debug;
use tracing::{debug, warn};

/// Maps watcher events to actions for one Source.
#[derive(Debug, Default)]
pub struct ActionTracker {
    /// `namespace/name` of every object currently known to exist
    seen: HashSet<String>,
}

impl ActionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Translate one watcher event. `Init` and `InitDone` carry no object.
    pub fn translate<K>(&mut self, event: watcher::Event<K>) -> Option<RawEvent>
    where
        K: Resource<DynamicType = ()> + Serialize,
    {
        match event {
            watcher::Event::InitApply(obj) | watcher::Event::Apply(obj) => {
                let action = if self.seen.insert(key(&obj)) {
                    Action::Added
                } else {
                    Action::Modified
                };
                Some(RawEvent::new(action, RawObject::from_resource(&obj)))
            }
            watcher::Event::Delete(obj) => {
                self.seen.remove(&key(&obj));
                Some(RawEvent::new(Action::Deleted, RawObject::from_resource(&obj)))
            }
            watcher::Event::Init => {
                debug!("{} list started", K::kind(&()));
                None
            }
            watcher::Event::InitDone => {
                debug!("{} list complete ({} objects)", K::kind(&()), self.seen.len());
                None
            }
        }
    }
}

fn key<K: Resource>(obj: &K) -> String {
    format!("{}/{}", obj.namespace().unwrap_or_default(), obj.name_any())
}

/// Endless stream of change events for every object behind `api`.
///
/// Watch errors are retried with a Fibonacci backoff and logged; they never
/// end the stream.
pub fn workload_events<K>(api: Api<K>) -> impl Stream<Item = Result<RawEvent, ControllerError>> + Send
where
    K: Resource<DynamicType = ()> + Serialize + DeserializeOwned + Clone + Debug + Send + 'static,
{
    let mut tracker = ActionTracker::new();

    watcher(api, watcher::Config::default())
        .backoff(FibonacciBackoff::new(1, 60))
        .filter_map(move |result| {
            let event = match result {
                Ok(event) => tracker.translate(event).map(Ok),
                Err(e) => {
                    warn!("{} watch error, retrying: {}", K::kind(&()), e);
                    None
                }
            };
            future::ready(event)
        })
}
