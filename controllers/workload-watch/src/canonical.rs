//! Canonical form of a workload object.
//!
//! The canonical form is the text that gets stored and diffed: metadata with
//! the fields that change on every write removed, then the spec, both as
//! YAML so a line-level diff lines up with individual fields.

use crate::event::RawObject;
use serde::Serialize;

/// Render `obj` as `"<metadata yaml>\n<spec yaml>"`.
///
/// `annotations`, `resourceVersion`, `generation` and `managedFields` are
/// dropped. Absent values render as empty text; this never fails.
pub fn canonicalize(obj: &RawObject) -> String {
    let mut meta = obj.metadata.clone();
    meta.annotations = None;
    meta.resource_version = None;
    meta.generation = None;
    meta.managed_fields = None;

    let meta = to_yaml(&meta);
    let spec = obj.spec.as_ref().map(to_yaml).unwrap_or_default();

    format!("{}\n{}", meta.trim_end(), spec.trim_end())
}

fn to_yaml<T: Serialize>(value: &T) -> String {
    serde_yaml::to_string(value).unwrap_or_default()
}
