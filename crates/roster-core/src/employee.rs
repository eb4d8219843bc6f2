//! The canonical employee record and its creation/update input.
//!
//! An [`Employee`] is the single normalized representation exposed by the
//! resolution layer, independent of which underlying collection or schema
//! shape it was read from. It is never stored in this form — always derived.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Display placeholder when no source field yields a name.
pub const NAME_PLACEHOLDER: &str = "Sem nome";

/// Placeholder for required display fields the fallback cannot resolve.
pub const FIELD_SENTINEL: &str = "--";

/// The canonical employee record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
  /// Store-assigned identifier, stable for the lifetime of the record.
  pub id:              String,
  /// Never empty; [`NAME_PLACEHOLDER`] when no source field yields a value.
  pub full_name:       String,
  pub registration_id: String,
  pub role:            String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub photo_url:       Option<String>,
  pub created_at:      Option<DateTime<Utc>>,
  pub updated_at:      Option<DateTime<Utc>>,
}

/// Input to `create` and `update`. Fields are normalized (trimmed) by the
/// engine; `name`, `registration`, and `role` must be non-empty afterwards.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployee {
  pub name:         String,
  pub registration: String,
  pub role:         String,
  #[serde(default)]
  pub photo_url:    Option<String>,
}
