//! Field extraction heuristics.
//!
//! Total functions that coerce an arbitrary [`DocValue`] into a canonical
//! scalar string. Absence is always the empty string (or `None` for path
//! lookups); no input can cause a failure.

use roster_core::DocValue;

/// Keys tried first when extracting from a mapping, in priority order.
/// Name-like keys before role-like keys before label/value keys.
const PREFERRED_KEYS: &[&str] = &[
  "nome", "name", "funcao", "role", "cargo", "label", "descricao", "titulo",
  "valor", "value",
];

/// Coerce `value` into a scalar string.
///
/// - Text is trimmed and returned as-is.
/// - Finite numerics render in decimal form.
/// - `true` maps to the literal `"true"`; `false` to the empty string.
/// - Sequences yield the first element that extracts non-empty.
/// - Mappings are searched in this order: the [`PREFERRED_KEYS`] (each
///   recursively extracted), then the first remaining pair whose value is
///   boolean `true` — the key name is the value (the flags-object encoding of
///   a role, e.g. `{"fiscal": true}` → `"fiscal"`), then the first remaining
///   value that recursively extracts non-empty.
/// - Everything else (null, timestamps, non-finite floats, exhausted
///   searches) yields the empty string.
pub fn extract_string(value: &DocValue) -> String {
  match value {
    DocValue::Text(text) => text.trim().to_owned(),
    DocValue::Int(number) => number.to_string(),
    DocValue::Float(number) if number.is_finite() => number.to_string(),
    DocValue::Bool(true) => "true".to_owned(),
    DocValue::Array(items) => items
      .iter()
      .map(extract_string)
      .find(|found| !found.is_empty())
      .unwrap_or_default(),
    DocValue::Map(entries) => {
      for key in PREFERRED_KEYS {
        if let Some(preferred) = entries.get(*key) {
          let found = extract_string(preferred);
          if !found.is_empty() {
            return found;
          }
        }
      }
      for (key, entry) in entries {
        if PREFERRED_KEYS.contains(&key.as_str()) {
          continue;
        }
        if matches!(entry, DocValue::Bool(true)) {
          return key.clone();
        }
      }
      for (key, entry) in entries {
        if PREFERRED_KEYS.contains(&key.as_str()) {
          continue;
        }
        let found = extract_string(entry);
        if !found.is_empty() {
          return found;
        }
      }
      String::new()
    }
    _ => String::new(),
  }
}

/// Shallow normalization: trim text, render finite numerics, everything else
/// is empty. No recursion — structured values do not count.
fn scalar_string(value: &DocValue) -> String {
  match value {
    DocValue::Text(text) => text.trim().to_owned(),
    DocValue::Int(number) => number.to_string(),
    DocValue::Float(number) if number.is_finite() => number.to_string(),
    _ => String::new(),
  }
}

/// First value in `values` that normalizes to a non-empty scalar string.
pub fn pick_first_non_empty<'a, I>(values: I) -> String
where
  I: IntoIterator<Item = &'a DocValue>,
{
  values
    .into_iter()
    .map(scalar_string)
    .find(|found| !found.is_empty())
    .unwrap_or_default()
}

/// Resolve a dot-separated path into nested structures.
///
/// Numeric segments index into sequences. Any traversal through an absent
/// intermediate yields `None`; never an error.
pub fn value_at_path<'a>(root: &'a DocValue, path: &str) -> Option<&'a DocValue> {
  let mut current = root;
  for segment in path.split('.') {
    current = match current {
      DocValue::Map(entries) => entries.get(segment)?,
      DocValue::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
      _ => return None,
    };
  }
  Some(current)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn doc(json: &str) -> DocValue {
    serde_json::from_str(json).expect("test document")
  }

  // ── extract_string ──────────────────────────────────────────────────────

  #[test]
  fn text_is_trimmed() {
    assert_eq!(extract_string(&doc(r#"  "fiscal "  "#)), "fiscal");
  }

  #[test]
  fn numbers_render_decimal() {
    assert_eq!(extract_string(&DocValue::Int(1234)), "1234");
    assert_eq!(extract_string(&DocValue::Float(2.5)), "2.5");
    assert_eq!(extract_string(&DocValue::Float(f64::NAN)), "");
  }

  #[test]
  fn booleans() {
    assert_eq!(extract_string(&DocValue::Bool(true)), "true");
    assert_eq!(extract_string(&DocValue::Bool(false)), "");
  }

  #[test]
  fn array_yields_first_non_empty_element() {
    assert_eq!(extract_string(&doc(r#"["", "  ", "fiscal", "admin"]"#)), "fiscal");
    assert_eq!(extract_string(&doc(r#"[null, false]"#)), "");
  }

  #[test]
  fn preferred_keys_win_over_incidental_order() {
    // "aaa" sorts before "nome" but preferred keys are searched first.
    assert_eq!(
      extract_string(&doc(r#"{"aaa": "wrong", "nome": "Ana"}"#)),
      "Ana"
    );
  }

  #[test]
  fn flags_object_names_the_role_in_the_key() {
    assert_eq!(
      extract_string(&doc(r#"{"fiscal": true, "admin": false}"#)),
      "fiscal"
    );
  }

  #[test]
  fn nested_role_object() {
    assert_eq!(
      extract_string(&doc(r#"{"role": {"name": "supervisor"}}"#)),
      "supervisor"
    );
  }

  #[test]
  fn remaining_values_searched_last() {
    assert_eq!(extract_string(&doc(r#"{"xyz": "encarregado"}"#)), "encarregado");
  }

  #[test]
  fn empty_everything_yields_empty() {
    assert_eq!(extract_string(&doc(r#"{}"#)), "");
    assert_eq!(extract_string(&doc(r#"{"a": null, "b": false, "c": ""}"#)), "");
    assert_eq!(extract_string(&DocValue::Null), "");
  }

  // ── pick_first_non_empty ────────────────────────────────────────────────

  #[test]
  fn pick_is_shallow() {
    let structured = doc(r#"{"nome": "Ana"}"#);
    let scalar = DocValue::Text("Bia".into());
    // The structured value would extract to "Ana" recursively, but picking
    // normalizes shallowly and skips it.
    assert_eq!(pick_first_non_empty([&structured, &scalar]), "Bia");
  }

  #[test]
  fn pick_stringifies_numbers() {
    let number = DocValue::Int(42);
    assert_eq!(pick_first_non_empty([&DocValue::Null, &number]), "42");
  }

  #[test]
  fn pick_empty_input_yields_empty() {
    assert_eq!(pick_first_non_empty(std::iter::empty::<&DocValue>()), "");
  }

  // ── value_at_path ───────────────────────────────────────────────────────

  #[test]
  fn path_indexes_into_sequences() {
    let root = doc(r#"{"a": [{"b": 1}, {"b": 2}]}"#);
    assert_eq!(value_at_path(&root, "a.1.b"), Some(&DocValue::Int(2)));
  }

  #[test]
  fn path_misses_are_absent_not_errors() {
    let root = doc(r#"{}"#);
    assert_eq!(value_at_path(&root, "x.y"), None);

    let sequence = doc(r#"{"a": [1, 2]}"#);
    assert_eq!(value_at_path(&sequence, "a.nope"), None);
    assert_eq!(value_at_path(&sequence, "a.7"), None);
    assert_eq!(value_at_path(&sequence, "a.0.deeper"), None);
  }
}
