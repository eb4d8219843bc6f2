//! Error types for `roster-core`.

use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum Error {
  /// A required input field was empty after normalization.
  #[error("required field is empty: {field}")]
  Validation { field: &'static str },

  /// The identifier is not present in any candidate collection.
  #[error("employee not found: {0}")]
  NotFound(String),

  #[error("store error: {0}")]
  Store(#[from] StoreError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
