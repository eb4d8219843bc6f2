//! [`DocValue`] — the loosely-typed document tree.
//!
//! Source documents come from collections written by several generations of
//! the application and are not guaranteed to match any single schema. A
//! document is therefore modelled as an open tree of scalars, sequences, and
//! mappings; the resolution engine recovers canonical attributes from it by
//! ordered candidate search rather than by deserialising into a fixed shape.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One node of a schema-loose document.
///
/// The serde representation is untagged, so arbitrary JSON round-trips
/// through `DocValue` unchanged — with one deliberate exception: a JSON
/// string in RFC 3339 form deserialises as [`DocValue::Timestamp`]. That is
/// how store-native timestamps survive being persisted as JSON text.
///
/// Variant order matters: serde tries untagged variants top to bottom, so
/// `Int` must precede `Float` and `Timestamp` must precede `Text`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocValue {
  Null,
  Bool(bool),
  Int(i64),
  Float(f64),
  Timestamp(DateTime<Utc>),
  Text(String),
  Array(Vec<DocValue>),
  Map(BTreeMap<String, DocValue>),
}

impl DocValue {
  /// Look up a top-level field. `None` for non-map values.
  pub fn field(&self, name: &str) -> Option<&DocValue> {
    match self {
      DocValue::Map(entries) => entries.get(name),
      _ => None,
    }
  }
}
