//! Test utilities for building workload events
//!
//! This module provides helpers for creating test data and setting up test scenarios.

#[cfg(test)]
use crate::event::{Action, RawEvent, RawObject};
#[cfg(test)]
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

/// Helper to create a raw workload object with a `replicas` spec
#[cfg(test)]
pub fn create_test_object(kind: &str, namespace: &str, name: &str, replicas: i32) -> RawObject {
    RawObject {
        kind: kind.to_string(),
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            resource_version: Some("1".to_string()),
            generation: Some(1),
            ..Default::default()
        },
        spec: Some(serde_json::json!({ "replicas": replicas })),
    }
}

/// Helper to create a raw event for a test object
#[cfg(test)]
pub fn create_test_event(
    action: Action,
    kind: &str,
    namespace: &str,
    name: &str,
    replicas: i32,
) -> RawEvent {
    RawEvent::new(action, create_test_object(kind, namespace, name, replicas))
}
