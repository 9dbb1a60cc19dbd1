//! Workload Watch Controller
//!
//! Watches Deployments, DaemonSets, StatefulSets and CronJobs across the
//! cluster and posts a compact diff to an incoming webhook whenever one of
//! them is added, removed, or has its spec or stable metadata changed.
//!
//! Volatile metadata (resource version, generation, annotations, managed
//! fields) is stripped before comparison, so routine controller writes do
//! not produce notifications.

mod backoff;
mod canonical;
mod config;
mod controller;
mod detector;
mod diff;
mod error;
mod event;
mod notifier;
mod source;
mod sync_gate;
mod watcher;
#[cfg(test)]
mod test_utils;

use crate::config::Config;
use crate::error::ControllerError;
use controller::Controller;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), ControllerError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // kube and reqwest both pull in rustls; pin the provider before either builds a client
    if rustls::crypto::ring::default_provider().install_default().is_err() {
        warn!("rustls crypto provider was already installed");
    }

    info!("Starting Workload Watch Controller");

    // Load configuration from environment variables
    let config = Config::from_env()?;

    info!("Configuration:");
    info!("  Warm-up: {:?}", config.warmup);
    info!("  Cluster: {}", config.cluster_name.as_deref().unwrap_or("<unnamed>"));
    info!("  Namespace: {}", config.namespace.as_deref().unwrap_or("all namespaces"));
    if !config.ignored_actions.is_empty() {
        info!("  Ignored actions: {:?}", config.ignored_actions);
    }

    // Initialize and run controller
    let controller = Controller::new(config).await?;
    controller.run().await?;

    Ok(())
}
