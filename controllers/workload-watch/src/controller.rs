//! Main controller implementation.
//!
//! This module contains the `Controller` struct that wires the pipeline
//! together: four watchers (one per workload kind) feeding one unbounded
//! channel, the sync gate timer, and the change detector draining the
//! channel.

use crate::config::Config;
use crate::detector::ChangeDetector;
use crate::error::ControllerError;
use crate::event::{RawEvent, WorkloadKind};
use crate::notifier::Notifier;
use crate::source::workload_events;
use crate::sync_gate::SyncGate;
use crate::watcher::Watcher;
use k8s_openapi::NamespaceResourceScope;
use k8s_openapi::api::apps::v1::{DaemonSet, Deployment, StatefulSet};
use k8s_openapi::api::batch::v1::CronJob;
use kube::{Api, Client, Resource};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::{JoinError, JoinHandle};
use tracing::{info, warn};
use webhook_client::WebhookClient;

type TaskHandle = JoinHandle<Result<(), ControllerError>>;

/// Main controller for workload change notifications.
pub struct Controller {
    deployment_watcher: TaskHandle,
    statefulset_watcher: TaskHandle,
    daemonset_watcher: TaskHandle,
    cronjob_watcher: TaskHandle,
    sync_gate: JoinHandle<()>,
    detector: TaskHandle,
}

impl Controller {
    /// Creates a new controller instance and starts all of its tasks.
    pub async fn new(config: Config) -> Result<Self, ControllerError> {
        info!("Initializing workload watch controller");

        // Create Kubernetes client
        let kube_client = Client::try_default().await?;

        // Create webhook client
        let webhook = WebhookClient::new(&config.webhook_url)?;
        info!(
            "Posting notifications to {}",
            webhook.url().host_str().unwrap_or("<no host>")
        );

        let notifier = Notifier::new(webhook)
            .with_cluster_name(config.cluster_name.clone())
            .with_ignored_actions(config.ignored_actions.iter().copied());

        let gate = SyncGate::new();
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        // Consumer first so nothing waits on an unread channel
        let detector = {
            let detector = ChangeDetector::new(gate.clone(), notifier);
            tokio::spawn(async move { detector.run(events_rx).await })
        };

        let sync_gate = {
            let warmup = config.warmup;
            tokio::spawn(async move { gate.run(warmup).await })
        };

        let ns = config.namespace.as_deref();
        let deployment_watcher = spawn_watcher(
            WorkloadKind::Deployment,
            api::<Deployment>(&kube_client, ns),
            events_tx.clone(),
        );
        let statefulset_watcher = spawn_watcher(
            WorkloadKind::StatefulSet,
            api::<StatefulSet>(&kube_client, ns),
            events_tx.clone(),
        );
        let daemonset_watcher = spawn_watcher(
            WorkloadKind::DaemonSet,
            api::<DaemonSet>(&kube_client, ns),
            events_tx.clone(),
        );
        let cronjob_watcher = spawn_watcher(
            WorkloadKind::CronJob,
            api::<CronJob>(&kube_client, ns),
            events_tx,
        );

        Ok(Self {
            deployment_watcher,
            statefulset_watcher,
            daemonset_watcher,
            cronjob_watcher,
            sync_gate,
            detector,
        })
    }

    /// Runs the controller until one of its long-running tasks exits.
    pub async fn run(mut self) -> Result<(), ControllerError> {
        info!("Workload watch controller running");

        // The sync gate finishes once the warm-up window is over; every
        // other task should run forever.
        let mut gate_done = false;
        loop {
            tokio::select! {
                result = &mut self.sync_gate, if !gate_done => {
                    result.map_err(|e| ControllerError::Watch(format!("Sync gate panicked: {}", e)))?;
                    gate_done = true;
                }
                result = &mut self.deployment_watcher => {
                    return task_exit("Deployment watcher", result);
                }
                result = &mut self.statefulset_watcher => {
                    return task_exit("StatefulSet watcher", result);
                }
                result = &mut self.daemonset_watcher => {
                    return task_exit("DaemonSet watcher", result);
                }
                result = &mut self.cronjob_watcher => {
                    return task_exit("CronJob watcher", result);
                }
                result = &mut self.detector => {
                    return task_exit("Change detector", result);
                }
            }
        }
    }
}

/// Api handle scoped to one namespace, or to all namespaces.
fn api<K>(client: &Client, namespace: Option<&str>) -> Api<K>
where
    K: Resource<Scope = NamespaceResourceScope, DynamicType = ()>,
{
    match namespace {
        Some(ns) => Api::namespaced(client.clone(), ns),
        None => Api::all(client.clone()),
    }
}

fn spawn_watcher<K>(kind: WorkloadKind, api: Api<K>, events: UnboundedSender<RawEvent>) -> TaskHandle
where
    K: Resource<DynamicType = ()> + Serialize + DeserializeOwned + Clone + Debug + Send + Sync + 'static,
{
    let watcher = Watcher::new(kind, events);
    info!("Spawning {} watcher", watcher.kind());
    tokio::spawn(async move { watcher.watch(workload_events(api)).await })
}

fn task_exit(
    name: &str,
    result: Result<Result<(), ControllerError>, JoinError>,
) -> Result<(), ControllerError> {
    result
        .map_err(|e| ControllerError::Watch(format!("{} panicked: {}", name, e)))?
        .map_err(|e| ControllerError::Watch(format!("{} error: {}", name, e)))?;

    warn!("{} exited", name);
    Ok(())
}
