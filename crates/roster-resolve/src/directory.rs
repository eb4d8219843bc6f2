//! [`EmployeeDirectory`] — the long-lived resolution component.
//!
//! Owns the store handle, the identity-provider handle, and the
//! [`CollectionRoutes`] state. Every exposed operation runs its own sequence
//! of store calls; there is no cross-request locking. The listing pipeline
//! lives in the sibling `listing` module.

use std::{collections::BTreeMap, sync::Arc};

use chrono::{DateTime, Utc};
use roster_core::{
  DocValue, Error, Result,
  employee::{Employee, NewEmployee},
  provider::IdentityProvider,
  store::{DocQuery, DocumentStore, StoreError},
};

use crate::{mapper::map_record, routes::CollectionRoutes};

/// A raw document together with the collection it was found in.
pub(crate) struct Located {
  pub collection: String,
  pub fields:     DocValue,
}

pub struct EmployeeDirectory<S, P> {
  store:    Arc<S>,
  provider: Arc<P>,
  routes:   CollectionRoutes,
}

impl<S, P> EmployeeDirectory<S, P>
where
  S: DocumentStore,
  P: IdentityProvider,
{
  pub fn new(store: Arc<S>, provider: Arc<P>, routes: CollectionRoutes) -> Self {
    Self { store, provider, routes }
  }

  pub(crate) fn store(&self) -> &S { &self.store }

  pub(crate) fn provider(&self) -> &P { &self.provider }

  pub fn routes(&self) -> &CollectionRoutes { &self.routes }

  // ─── Record Locator ───────────────────────────────────────────────────

  /// Find the raw document for `id`.
  ///
  /// The cached collection is tried first; a cached hint that no longer
  /// holds the document is evicted and the full probe runs anyway. `Ok(None)`
  /// means the id exists in no candidate collection — a normal outcome,
  /// distinct from a store failure.
  pub(crate) async fn locate(&self, id: &str) -> Result<Option<Located>, StoreError> {
    if let Some(collection) = self.routes.cached(id) {
      match self.store.get(&collection, id).await? {
        Some(doc) => {
          self.routes.confirm(id, &collection);
          return Ok(Some(Located { collection, fields: doc.fields }));
        }
        None => {
          tracing::debug!(id, %collection, "evicting stale collection cache entry");
          self.routes.forget(id);
        }
      }
    }

    for collection in self.routes.read_candidates() {
      if let Some(doc) = self.store.get(collection, id).await? {
        self.routes.remember(id, collection);
        return Ok(Some(Located {
          collection: collection.clone(),
          fields:     doc.fields,
        }));
      }
    }

    Ok(None)
  }

  // ─── Write-Target Selector ────────────────────────────────────────────

  /// The collection all new records are written to. Resolved once per
  /// process: the first write candidate with any existing content wins; a
  /// completely empty store adopts the first configured candidate.
  pub(crate) async fn resolve_write_collection(&self) -> Result<String, StoreError> {
    if let Some(collection) = self.routes.write_target() {
      return Ok(collection);
    }

    let probe = DocQuery::unordered().with_limit(1);
    for collection in self.routes.write_candidates() {
      if !self.store.scan(collection, &probe).await?.is_empty() {
        tracing::debug!(%collection, "write collection resolved by probe");
        self.routes.set_write_target(collection);
        return Ok(collection.clone());
      }
    }

    // Brand-new store: nothing has content yet. Adopt the first candidate so
    // creation can make forward progress.
    let first = self.routes.write_candidates()[0].clone();
    self.routes.set_write_target(&first);
    Ok(first)
  }

  // ─── Create / update / delete ─────────────────────────────────────────

  pub async fn create(&self, input: NewEmployee) -> Result<Employee> {
    let input = validated(input)?;
    let collection = self.resolve_write_collection().await?;

    let doc = self
      .store
      .add(&collection, write_fields(&input, Utc::now(), true))
      .await?;
    self.routes.remember(&doc.id, &collection);

    tracing::info!(id = %doc.id, %collection, "employee created");
    Ok(map_record(&doc.id, &doc.fields))
  }

  pub async fn update(&self, id: &str, input: NewEmployee) -> Result<Employee> {
    let input = validated(input)?;
    let located = self
      .locate(id)
      .await?
      .ok_or_else(|| Error::NotFound(id.to_owned()))?;

    self
      .store
      .update(&located.collection, id, write_fields(&input, Utc::now(), false))
      .await?;

    // Read back the merged document so the response reflects what is stored.
    let doc = self
      .store
      .get(&located.collection, id)
      .await?
      .ok_or_else(|| StoreError::Missing {
        collection: located.collection.clone(),
        id:         id.to_owned(),
      })?;

    tracing::info!(id, collection = %located.collection, "employee updated");
    Ok(map_record(id, &doc.fields))
  }

  pub async fn delete(&self, id: &str) -> Result<()> {
    let located = self
      .locate(id)
      .await?
      .ok_or_else(|| Error::NotFound(id.to_owned()))?;

    self.store.delete(&located.collection, id).await?;
    self.routes.forget(id);

    tracing::info!(id, collection = %located.collection, "employee deleted");
    Ok(())
  }
}

// ─── Input validation and write shape ────────────────────────────────────────

/// Trim every input field; `name`, `registration`, and `role` must survive.
fn validated(input: NewEmployee) -> Result<NewEmployee> {
  let name = input.name.trim().to_owned();
  if name.is_empty() {
    return Err(Error::Validation { field: "name" });
  }

  let registration = input.registration.trim().to_owned();
  if registration.is_empty() {
    return Err(Error::Validation { field: "registration" });
  }

  let role = input.role.trim().to_owned();
  if role.is_empty() {
    return Err(Error::Validation { field: "role" });
  }

  let photo_url = input
    .photo_url
    .map(|photo| photo.trim().to_owned())
    .filter(|photo| !photo.is_empty());

  Ok(NewEmployee { name, registration, role, photo_url })
}

/// The document shape this service writes: the current app schema. Legacy
/// collections may hold anything; the mapper recovers both.
fn write_fields(input: &NewEmployee, now: DateTime<Utc>, creating: bool) -> DocValue {
  let mut fields = BTreeMap::new();
  fields.insert("nome".to_owned(), DocValue::Text(input.name.clone()));
  fields.insert("matricula".to_owned(), DocValue::Text(input.registration.clone()));
  fields.insert("funcao".to_owned(), DocValue::Text(input.role.clone()));
  if let Some(photo) = &input.photo_url {
    fields.insert("fotoUrl".to_owned(), DocValue::Text(photo.clone()));
  }
  if creating {
    fields.insert("createdAt".to_owned(), DocValue::Timestamp(now));
  }
  fields.insert("updatedAt".to_owned(), DocValue::Timestamp(now));
  DocValue::Map(fields)
}
