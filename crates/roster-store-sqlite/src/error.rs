//! Error type for `roster-store-sqlite`.
//!
//! Covers opening and schema initialisation only; trait operations report
//! through [`roster_core::store::StoreError`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
