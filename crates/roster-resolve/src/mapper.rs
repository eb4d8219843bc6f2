//! Canonical record mapping.
//!
//! Turns one raw document (any shape) plus its identifier into a canonical
//! [`Employee`]. Each attribute is recovered through a declarative ordered
//! candidate list, so the priority order stays auditable in one place.
//! Mapping is pure: the same document always yields the same record.

use chrono::{DateTime, Utc};
use roster_core::{
  DocValue,
  employee::{Employee, NAME_PLACEHOLDER},
};

use crate::extract::{extract_string, pick_first_non_empty, value_at_path};

// ─── Candidate lists ─────────────────────────────────────────────────────────

const NAME_FIELDS: &[&str] =
  &["nome", "name", "fullName", "nomeCompleto", "displayName"];

const REGISTRATION_FIELDS: &[&str] =
  &["matricula", "registration", "registro", "codigo"];

/// Direct role fields, tried strictly before [`ROLE_PATHS`].
const ROLE_FIELDS: &[&str] = &["funcao", "role", "cargo", "position", "perfil"];

/// Dotted paths reaching into nested role/profile/permission structures.
const ROLE_PATHS: &[&str] = &[
  "funcao.nome",
  "funcao.descricao",
  "cargo.nome",
  "role.name",
  "perfil.funcao",
  "permissoes.funcao",
  "acesso.nivel",
  "claims.role",
];

const PHOTO_FIELDS: &[&str] = &[
  "fotoUrl", "foto", "photoUrl", "photoURL", "avatar", "avatarUrl", "imagem",
];

const CREATED_FIELDS: &[&str] = &["createdAt", "criadoEm", "created_at"];
const UPDATED_FIELDS: &[&str] = &["updatedAt", "atualizadoEm", "updated_at"];

// ─── Mapping ─────────────────────────────────────────────────────────────────

/// Produce the canonical record for `doc` under identifier `id`.
pub fn map_record(id: &str, doc: &DocValue) -> Employee {
  let name = pick_first_non_empty(candidates(doc, NAME_FIELDS));
  let full_name = if name.is_empty() { NAME_PLACEHOLDER.to_owned() } else { name };

  let photo = pick_first_non_empty(candidates(doc, PHOTO_FIELDS));
  let photo_url = if photo.is_empty() { None } else { Some(photo) };

  Employee {
    id: id.to_owned(),
    full_name,
    registration_id: registration_of(doc),
    role: role_of(doc),
    photo_url,
    created_at: timestamp_of(doc, CREATED_FIELDS),
    updated_at: timestamp_of(doc, UPDATED_FIELDS),
  }
}

/// Registration recovery; may legitimately be empty.
pub fn registration_of(doc: &DocValue) -> String {
  pick_first_non_empty(candidates(doc, REGISTRATION_FIELDS))
}

/// Role recovery: direct fields first (deep extraction), then dotted paths.
/// Stops at the first non-empty result.
pub fn role_of(doc: &DocValue) -> String {
  for name in ROLE_FIELDS {
    if let Some(value) = doc.field(name) {
      let found = extract_string(value);
      if !found.is_empty() {
        return found;
      }
    }
  }
  for path in ROLE_PATHS {
    if let Some(value) = value_at_path(doc, path) {
      let found = extract_string(value);
      if !found.is_empty() {
        return found;
      }
    }
  }
  String::new()
}

fn candidates<'a>(
  doc: &'a DocValue,
  names: &'a [&str],
) -> impl Iterator<Item = &'a DocValue> {
  names.iter().filter_map(move |name| doc.field(name))
}

/// First candidate field carrying a store-native timestamp, or a text value
/// in RFC 3339 form. Missing and malformed values are null, never an error.
fn timestamp_of(doc: &DocValue, names: &[&str]) -> Option<DateTime<Utc>> {
  names.iter().find_map(|name| doc.field(name).and_then(timestamp_value))
}

fn timestamp_value(value: &DocValue) -> Option<DateTime<Utc>> {
  match value {
    DocValue::Timestamp(at) => Some(*at),
    DocValue::Text(text) => DateTime::parse_from_rfc3339(text.trim())
      .ok()
      .map(|parsed| parsed.with_timezone(&Utc)),
    _ => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn doc(json: &str) -> DocValue {
    serde_json::from_str(json).expect("test document")
  }

  #[test]
  fn modern_shape_maps_directly() {
    let record = map_record(
      "f1",
      &doc(
        r#"{
          "nome": "Ana Souza",
          "matricula": "12345",
          "funcao": "fiscal",
          "fotoUrl": "https://cdn.example/ana.jpg",
          "createdAt": "2024-03-01T12:00:00Z",
          "updatedAt": "2024-03-02T09:30:00Z"
        }"#,
      ),
    );
    assert_eq!(record.id, "f1");
    assert_eq!(record.full_name, "Ana Souza");
    assert_eq!(record.registration_id, "12345");
    assert_eq!(record.role, "fiscal");
    assert_eq!(record.photo_url.as_deref(), Some("https://cdn.example/ana.jpg"));
    assert!(record.created_at.is_some());
    assert!(record.updated_at.is_some());
  }

  #[test]
  fn legacy_english_shape_maps_too() {
    let record = map_record(
      "f2",
      &doc(r#"{"name": "Bia Lima", "registration": 9876, "role": "supervisor"}"#),
    );
    assert_eq!(record.full_name, "Bia Lima");
    assert_eq!(record.registration_id, "9876");
    assert_eq!(record.role, "supervisor");
    assert_eq!(record.photo_url, None);
    assert_eq!(record.created_at, None);
  }

  #[test]
  fn direct_role_field_beats_nested_path() {
    let record = map_record(
      "f3",
      &doc(r#"{"cargo": "encarregado", "permissoes": {"funcao": "fiscal"}}"#),
    );
    assert_eq!(record.role, "encarregado");
  }

  #[test]
  fn nested_role_path_is_reached_when_direct_fields_are_empty() {
    let record = map_record(
      "f4",
      &doc(r#"{"nome": "Caio", "permissoes": {"funcao": "fiscal"}}"#),
    );
    assert_eq!(record.role, "fiscal");
  }

  #[test]
  fn flags_object_role() {
    let record = map_record(
      "f5",
      &doc(r#"{"nome": "Davi", "funcao": {"fiscal": true, "admin": false}}"#),
    );
    assert_eq!(record.role, "fiscal");
  }

  #[test]
  fn missing_name_gets_placeholder() {
    let record = map_record("f6", &doc(r#"{"matricula": "1"}"#));
    assert_eq!(record.full_name, NAME_PLACEHOLDER);
  }

  #[test]
  fn empty_photo_is_absent_not_empty() {
    let record = map_record("f7", &doc(r#"{"nome": "Eva", "fotoUrl": "  "}"#));
    assert_eq!(record.photo_url, None);
  }

  #[test]
  fn malformed_timestamp_is_null() {
    let record =
      map_record("f8", &doc(r#"{"nome": "Gil", "createdAt": "yesterday"}"#));
    assert_eq!(record.created_at, None);
  }

  #[test]
  fn mapping_is_idempotent() {
    let raw = doc(r#"{"nome": "Ana", "funcao": {"fiscal": true}, "matricula": 7}"#);
    assert_eq!(map_record("f9", &raw), map_record("f9", &raw));
  }
}
