//! The `DocumentStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `roster-store-sqlite`).
//! Higher layers (`roster-resolve`, `roster-api`) depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use thiserror::Error;

use crate::value::DocValue;

// ─── Errors ──────────────────────────────────────────────────────────────────

/// A failure surfaced by a [`DocumentStore`] backend.
///
/// `MissingIndex` is special-cased by the listing pipeline (an ordered scan is
/// retried once without ordering); every other variant propagates.
#[derive(Debug, Error)]
pub enum StoreError {
  /// The backend requires a per-field index to order this scan and none
  /// exists. Never user-visible.
  #[error("collection {collection:?} has no index for ordering by {field:?}")]
  MissingIndex { collection: String, field: String },

  /// An update addressed a document that no longer exists.
  #[error("document {id:?} does not exist in collection {collection:?}")]
  Missing { collection: String, id: String },

  /// A stored document body could not be decoded.
  #[error("stored document is corrupt: {0}")]
  Corrupt(String),

  #[error("document store unavailable: {0}")]
  Unavailable(String),
}

// ─── Query types ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
  Ascending,
  Descending,
}

/// Ordering requested for a collection scan.
#[derive(Debug, Clone)]
pub struct OrderBy {
  pub field:     String,
  pub direction: Direction,
}

/// Parameters for [`DocumentStore::scan`].
#[derive(Debug, Clone, Default)]
pub struct DocQuery {
  pub order_by: Option<OrderBy>,
  pub limit:    Option<usize>,
}

impl DocQuery {
  /// Every document, in backend order.
  pub fn unordered() -> Self { Self::default() }

  /// Every document, newest value of `field` first.
  pub fn newest_first(field: &str) -> Self {
    Self {
      order_by: Some(OrderBy {
        field:     field.to_owned(),
        direction: Direction::Descending,
      }),
      limit:    None,
    }
  }

  pub fn with_limit(mut self, limit: usize) -> Self {
    self.limit = Some(limit);
    self
  }
}

// ─── Document ────────────────────────────────────────────────────────────────

/// A document read from a collection: its store-assigned identifier plus the
/// raw field tree.
#[derive(Debug, Clone)]
pub struct Document {
  pub id:     String,
  pub fields: DocValue,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a schema-loose document store.
///
/// Collections are addressed by name and need not exist before use. Point
/// lookups surface existence as `Option`; `NotFound` is a normal outcome, not
/// an error. All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait DocumentStore: Send + Sync {
  /// Point lookup by id. `Ok(None)` if the document does not exist.
  fn get<'a>(
    &'a self,
    collection: &'a str,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<Document>, StoreError>> + Send + 'a;

  /// Persist a new document and return it with its store-assigned id.
  fn add<'a>(
    &'a self,
    collection: &'a str,
    fields: DocValue,
  ) -> impl Future<Output = Result<Document, StoreError>> + Send + 'a;

  /// Create or replace a document under a caller-chosen id.
  ///
  /// Used by collaborators that key documents externally (e.g. the `usuarios`
  /// collection keyed by lowercased email).
  fn put<'a>(
    &'a self,
    collection: &'a str,
    id: &'a str,
    fields: DocValue,
  ) -> impl Future<Output = Result<(), StoreError>> + Send + 'a;

  /// Merge `fields` into an existing document, top-level key by key.
  /// Fails with [`StoreError::Missing`] if the document does not exist.
  fn update<'a>(
    &'a self,
    collection: &'a str,
    id: &'a str,
    fields: DocValue,
  ) -> impl Future<Output = Result<(), StoreError>> + Send + 'a;

  /// Remove a document. Deleting an absent document is a no-op.
  fn delete<'a>(
    &'a self,
    collection: &'a str,
    id: &'a str,
  ) -> impl Future<Output = Result<(), StoreError>> + Send + 'a;

  /// Collection scan with optional ordering and limit.
  ///
  /// A backend that needs a per-field index for the requested ordering
  /// reports [`StoreError::MissingIndex`] rather than silently reordering.
  fn scan<'a>(
    &'a self,
    collection: &'a str,
    query: &'a DocQuery,
  ) -> impl Future<Output = Result<Vec<Document>, StoreError>> + Send + 'a;
}
