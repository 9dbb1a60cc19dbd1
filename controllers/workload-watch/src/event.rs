//! Event model.
//!
//! A `RawEvent` is what a Source delivers: an action plus the object as the
//! API server sent it. A `ResourceEvent` is the validated, canonicalized form
//! the change detector works on. It is built once per raw event and dropped
//! after processing.

use crate::canonical::canonicalize;
use crate::error::ControllerError;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::Resource;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// The closed set of workload kinds this controller reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkloadKind {
    Deployment,
    DaemonSet,
    StatefulSet,
    CronJob,
}

impl WorkloadKind {
    pub fn as_str(self) -> &'static str {
        match self {
            WorkloadKind::Deployment => "Deployment",
            WorkloadKind::DaemonSet => "DaemonSet",
            WorkloadKind::StatefulSet => "StatefulSet",
            WorkloadKind::CronJob => "CronJob",
        }
    }
}

impl fmt::Display for WorkloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkloadKind {
    type Err = ControllerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Deployment" => Ok(WorkloadKind::Deployment),
            "DaemonSet" => Ok(WorkloadKind::DaemonSet),
            "StatefulSet" => Ok(WorkloadKind::StatefulSet),
            "CronJob" => Ok(WorkloadKind::CronJob),
            other => Err(ControllerError::UnknownKind(other.to_string())),
        }
    }
}

/// What happened to the object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Added,
    Modified,
    Deleted,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Added => "ADDED",
            Action::Modified => "MODIFIED",
            Action::Deleted => "DELETED",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = ControllerError;

    /// Case-insensitive; accepts `added`, `modified`, `deleted`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "added" => Ok(Action::Added),
            "modified" => Ok(Action::Modified),
            "deleted" => Ok(Action::Deleted),
            other => Err(ControllerError::InvalidConfig(format!(
                "unknown action '{}' (expected added, modified or deleted)",
                other
            ))),
        }
    }
}

/// The parts of a workload object the pipeline looks at.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawObject {
    /// Kind as reported by the API server. Not validated here.
    pub kind: String,
    pub metadata: ObjectMeta,
    pub spec: Option<serde_json::Value>,
}

impl RawObject {
    /// Extract kind, metadata and spec from a typed Kubernetes object.
    pub fn from_resource<K>(obj: &K) -> Self
    where
        K: Resource<DynamicType = ()> + Serialize,
    {
        let spec = serde_json::to_value(obj)
            .ok()
            .and_then(|mut value| value.get_mut("spec").map(serde_json::Value::take));

        Self {
            kind: K::kind(&()).into_owned(),
            metadata: obj.meta().clone(),
            spec,
        }
    }
}

/// One change notification as delivered by a Source.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEvent {
    pub action: Action,
    pub object: RawObject,
}

impl RawEvent {
    pub fn new(action: Action, object: RawObject) -> Self {
        Self { action, object }
    }
}

/// A validated event for one of the four workload kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceEvent {
    pub kind: WorkloadKind,
    pub action: Action,
    pub name: String,
    pub namespace: String,
    /// Canonical form of the object carried by this event
    pub canonical: String,
}

impl ResourceEvent {
    /// Identity key: `namespace/kind/name`.
    pub fn identity(&self) -> String {
        format!("{}/{}/{}", self.namespace, self.kind, self.name)
    }
}

impl TryFrom<RawEvent> for ResourceEvent {
    type Error = ControllerError;

    fn try_from(raw: RawEvent) -> Result<Self, Self::Error> {
        let kind: WorkloadKind = raw.object.kind.parse()?;

        let name = match raw.object.metadata.name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => {
                return Err(ControllerError::InvalidEvent(format!(
                    "{} {} event has no metadata.name",
                    raw.action, kind
                )));
            }
        };
        let namespace = raw.object.metadata.namespace.clone().unwrap_or_default();
        let canonical = canonicalize(&raw.object);

        Ok(Self {
            kind,
            action: raw.action,
            name,
            namespace,
            canonical,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
    use serde_json::json;

    fn raw_object(kind: &str, namespace: &str, name: &str) -> RawObject {
        RawObject {
            kind: kind.to_string(),
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some(namespace.to_string()),
                ..Default::default()
            },
            spec: Some(json!({"replicas": 1})),
        }
    }

    #[test]
    fn test_identity_format() {
        let raw = RawEvent::new(Action::Added, raw_object("Deployment", "default", "api"));
        let event = ResourceEvent::try_from(raw).unwrap();
        assert_eq!(event.identity(), "default/Deployment/api");
    }

    #[test]
    fn test_same_name_different_kind_is_different_identity() {
        let deploy = ResourceEvent::try_from(RawEvent::new(
            Action::Added,
            raw_object("Deployment", "default", "api"),
        ))
        .unwrap();
        let sts = ResourceEvent::try_from(RawEvent::new(
            Action::Added,
            raw_object("StatefulSet", "default", "api"),
        ))
        .unwrap();
        assert_ne!(deploy.identity(), sts.identity());
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let raw = RawEvent::new(Action::Added, raw_object("Job", "default", "migrate"));
        let err = ResourceEvent::try_from(raw).unwrap_err();
        assert!(matches!(err, ControllerError::UnknownKind(ref kind) if kind == "Job"));
    }

    #[test]
    fn test_missing_name_is_invalid_event() {
        let mut object = raw_object("CronJob", "default", "x");
        object.metadata.name = None;
        let err = ResourceEvent::try_from(RawEvent::new(Action::Modified, object)).unwrap_err();
        assert!(matches!(err, ControllerError::InvalidEvent(_)));
    }

    #[test]
    fn test_missing_namespace_tolerated() {
        let mut object = raw_object("DaemonSet", "ignored", "node-exporter");
        object.metadata.namespace = None;
        let event = ResourceEvent::try_from(RawEvent::new(Action::Added, object)).unwrap();
        assert_eq!(event.identity(), "/DaemonSet/node-exporter");
    }

    #[test]
    fn test_action_parse_case_insensitive() {
        assert_eq!("Added".parse::<Action>().unwrap(), Action::Added);
        assert_eq!(" DELETED ".parse::<Action>().unwrap(), Action::Deleted);
        assert!("update".parse::<Action>().is_err());
    }

    #[test]
    fn test_raw_object_from_typed_deployment() {
        let deployment = Deployment {
            metadata: ObjectMeta {
                name: Some("api".to_string()),
                namespace: Some("default".to_string()),
                ..Default::default()
            },
            spec: Some(DeploymentSpec {
                replicas: Some(3),
                ..Default::default()
            }),
            status: None,
        };

        let raw = RawObject::from_resource(&deployment);
        assert_eq!(raw.kind, "Deployment");
        assert_eq!(raw.metadata.name.as_deref(), Some("api"));
        assert_eq!(raw.spec.unwrap()["replicas"], 3);
    }
}
