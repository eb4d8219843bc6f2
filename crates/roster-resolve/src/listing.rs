//! The listing pipeline: scan every candidate collection, merge by id, sort,
//! and fall back to the identity provider when the store has nothing.

use std::{cmp::Ordering, collections::HashMap};

use roster_core::{
  Result,
  employee::{Employee, FIELD_SENTINEL, NAME_PLACEHOLDER},
  provider::{IdentityProvider, ProviderUser},
  store::{DocQuery, Document, DocumentStore, StoreError},
};

use crate::{
  directory::EmployeeDirectory,
  mapper::{map_record, registration_of, role_of},
};

/// Collection consulted for per-user role lookups during the provider
/// fallback, keyed by lowercased email.
const USERS_COLLECTION: &str = "usuarios";

/// Document field ordering scans by.
const CREATED_FIELD: &str = "createdAt";

impl<S, P> EmployeeDirectory<S, P>
where
  S: DocumentStore,
  P: IdentityProvider,
{
  /// The merged, sorted canonical listing.
  ///
  /// Collections are merged in the fixed read-candidate order, so for an id
  /// present in more than one collection the later-probed collection wins —
  /// the candidate order IS the precedence order. Store failures propagate;
  /// only the provider fallback degrades silently (to an empty list).
  pub async fn list(&self) -> Result<Vec<Employee>> {
    let mut merged: HashMap<String, Employee> = HashMap::new();

    for collection in self.routes().read_candidates() {
      for doc in self.scan_collection(collection).await? {
        self.routes().remember(&doc.id, collection);
        merged.insert(doc.id.clone(), map_record(&doc.id, &doc.fields));
      }
    }

    if merged.is_empty() {
      return Ok(self.provider_fallback().await);
    }

    let mut records: Vec<Employee> = merged.into_values().collect();
    records.sort_by(compare_records);
    Ok(records)
  }

  /// One collection scan, newest first. A backend that cannot order without
  /// a missing index gets a single unordered retry; any other failure ends
  /// the whole listing.
  async fn scan_collection(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
    match self
      .store()
      .scan(collection, &DocQuery::newest_first(CREATED_FIELD))
      .await
    {
      Ok(docs) => Ok(docs),
      Err(StoreError::MissingIndex { .. }) => {
        tracing::debug!(%collection, "ordered scan lacks an index, retrying unordered");
        self.store().scan(collection, &DocQuery::unordered()).await
      }
      Err(error) => {
        tracing::error!(%collection, %error, "collection scan failed");
        Err(error)
      }
    }
  }

  // ─── Identity-provider fallback ───────────────────────────────────────

  /// Enumerate provider users when no collection holds any employee data.
  /// A provider failure is swallowed: the listing contract is best-effort
  /// visibility, so the result is an empty list rather than an error.
  async fn provider_fallback(&self) -> Vec<Employee> {
    let users = match self.provider().list_users().await {
      Ok(users) => users,
      Err(error) => {
        tracing::warn!(%error, "identity provider listing failed, returning empty list");
        return Vec::new();
      }
    };

    let mut records = Vec::with_capacity(users.len());
    for user in users {
      records.push(self.enrich_user(user).await);
    }
    records.sort_by(compare_records);
    records
  }

  /// Best-effort canonical record for one provider user: role and
  /// registration from the `usuarios` document keyed by lowercased email,
  /// then provider custom attributes, then the sentinel.
  async fn enrich_user(&self, user: ProviderUser) -> Employee {
    let stored = match &user.email {
      Some(email) => self
        .store()
        .get(USERS_COLLECTION, &email.to_lowercase())
        .await
        .ok()
        .flatten(),
      None => None,
    };

    let stored_role = stored
      .as_ref()
      .map(|doc| role_of(&doc.fields))
      .unwrap_or_default();
    let role = first_non_empty([
      stored_role,
      attribute(&user, "funcao"),
      attribute(&user, "role"),
    ])
    .unwrap_or_else(|| FIELD_SENTINEL.to_owned());

    let registration = stored
      .as_ref()
      .map(|doc| registration_of(&doc.fields))
      .filter(|found| !found.is_empty())
      .unwrap_or_else(|| FIELD_SENTINEL.to_owned());

    let full_name = first_non_empty([
      user.display_name.clone().unwrap_or_default(),
      user.email.clone().unwrap_or_default(),
    ])
    .unwrap_or_else(|| NAME_PLACEHOLDER.to_owned());

    Employee {
      id:              user.uid,
      full_name,
      registration_id: registration,
      role,
      photo_url:       user.photo_url.filter(|url| !url.trim().is_empty()),
      created_at:      user.created_at,
      updated_at:      user.last_sign_in_at,
    }
  }
}

fn attribute(user: &ProviderUser, key: &str) -> String {
  user
    .custom_attributes
    .get(key)
    .map(|value| value.trim().to_owned())
    .unwrap_or_default()
}

fn first_non_empty<I>(values: I) -> Option<String>
where
  I: IntoIterator<Item = String>,
{
  values
    .into_iter()
    .map(|value| value.trim().to_owned())
    .find(|value| !value.is_empty())
}

// ─── Ordering ────────────────────────────────────────────────────────────────

/// Newest `created_at` first; records without a usable timestamp sort after
/// every record with one; two timestamp-less records order by name,
/// case-insensitively, with a raw comparison as the final tiebreak.
pub(crate) fn compare_records(a: &Employee, b: &Employee) -> Ordering {
  match (a.created_at, b.created_at) {
    (Some(left), Some(right)) => right.cmp(&left),
    (Some(_), None) => Ordering::Less,
    (None, Some(_)) => Ordering::Greater,
    (None, None) => a
      .full_name
      .to_lowercase()
      .cmp(&b.full_name.to_lowercase())
      .then_with(|| a.full_name.cmp(&b.full_name)),
  }
}
