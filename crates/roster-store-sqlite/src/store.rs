//! [`SqliteStore`] — the SQLite implementation of [`DocumentStore`].

use std::{future::Future, path::Path};

use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use roster_core::{
  DocValue,
  store::{Direction, DocQuery, Document, DocumentStore, StoreError},
};

use crate::{Result, schema::SCHEMA};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A document store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. Ordered
/// scans use `json_extract`, which SQLite evaluates without per-field
/// indexes, so this backend never reports [`StoreError::MissingIndex`].
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn read_body(
    &self,
    collection: &str,
    id: &str,
  ) -> Result<Option<String>, StoreError> {
    let collection = collection.to_owned();
    let id = id.to_owned();
    self
      .conn
      .call(move |conn| {
        let body = conn
          .query_row(
            "SELECT body FROM documents WHERE collection = ?1 AND doc_id = ?2",
            rusqlite::params![collection, id],
            |row| row.get(0),
          )
          .optional()?;
        Ok(body)
      })
      .await
      .map_err(unavailable)
  }

  async fn write_body(
    &self,
    collection: &str,
    id: &str,
    body: String,
  ) -> Result<(), StoreError> {
    let collection = collection.to_owned();
    let id = id.to_owned();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO documents (collection, doc_id, body) VALUES (?1, ?2, ?3)
           ON CONFLICT (collection, doc_id) DO UPDATE SET body = excluded.body",
          rusqlite::params![collection, id, body],
        )?;
        Ok(())
      })
      .await
      .map_err(unavailable)
  }
}

// ─── Encoding helpers ────────────────────────────────────────────────────────

fn unavailable(error: tokio_rusqlite::Error) -> StoreError {
  StoreError::Unavailable(error.to_string())
}

fn encode(fields: &DocValue) -> Result<String, StoreError> {
  serde_json::to_string(fields).map_err(|error| StoreError::Corrupt(error.to_string()))
}

fn decode(body: &str) -> Result<DocValue, StoreError> {
  serde_json::from_str(body).map_err(|error| StoreError::Corrupt(error.to_string()))
}

/// Top-level merge: `changes` keys overwrite `base` keys. A document whose
/// stored body is not a mapping is replaced outright.
fn merge_fields(base: DocValue, changes: DocValue) -> DocValue {
  match (base, changes) {
    (DocValue::Map(mut merged), DocValue::Map(changes)) => {
      for (key, value) in changes {
        merged.insert(key, value);
      }
      DocValue::Map(merged)
    }
    (_, changes) => changes,
  }
}

// ─── Trait implementation ────────────────────────────────────────────────────

impl DocumentStore for SqliteStore {
  fn get<'a>(
    &'a self,
    collection: &'a str,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<Document>, StoreError>> + Send + 'a {
    async move {
      match self.read_body(collection, id).await? {
        Some(body) => Ok(Some(Document {
          id:     id.to_owned(),
          fields: decode(&body)?,
        })),
        None => Ok(None),
      }
    }
  }

  fn add<'a>(
    &'a self,
    collection: &'a str,
    fields: DocValue,
  ) -> impl Future<Output = Result<Document, StoreError>> + Send + 'a {
    async move {
      let id = Uuid::new_v4().to_string();
      self.write_body(collection, &id, encode(&fields)?).await?;
      Ok(Document { id, fields })
    }
  }

  fn put<'a>(
    &'a self,
    collection: &'a str,
    id: &'a str,
    fields: DocValue,
  ) -> impl Future<Output = Result<(), StoreError>> + Send + 'a {
    async move { self.write_body(collection, id, encode(&fields)?).await }
  }

  fn update<'a>(
    &'a self,
    collection: &'a str,
    id: &'a str,
    fields: DocValue,
  ) -> impl Future<Output = Result<(), StoreError>> + Send + 'a {
    async move {
      let existing = self.read_body(collection, id).await?.ok_or_else(|| {
        StoreError::Missing {
          collection: collection.to_owned(),
          id:         id.to_owned(),
        }
      })?;

      let merged = merge_fields(decode(&existing)?, fields);
      self.write_body(collection, id, encode(&merged)?).await
    }
  }

  fn delete<'a>(
    &'a self,
    collection: &'a str,
    id: &'a str,
  ) -> impl Future<Output = Result<(), StoreError>> + Send + 'a {
    async move {
      let collection = collection.to_owned();
      let id = id.to_owned();
      self
        .conn
        .call(move |conn| {
          conn.execute(
            "DELETE FROM documents WHERE collection = ?1 AND doc_id = ?2",
            rusqlite::params![collection, id],
          )?;
          Ok(())
        })
        .await
        .map_err(unavailable)
    }
  }

  fn scan<'a>(
    &'a self,
    collection: &'a str,
    query: &'a DocQuery,
  ) -> impl Future<Output = Result<Vec<Document>, StoreError>> + Send + 'a {
    async move {
      let collection = collection.to_owned();
      let order = query.order_by.clone();
      let limit = query.limit.map(|n| n as i64).unwrap_or(-1);

      let rows: Vec<(String, String)> = self
        .conn
        .call(move |conn| {
          let mut sql =
            String::from("SELECT doc_id, body FROM documents WHERE collection = :collection");
          if let Some(order) = &order {
            sql.push_str(" ORDER BY json_extract(body, '$.' || :field)");
            sql.push_str(match order.direction {
              Direction::Ascending => " ASC",
              Direction::Descending => " DESC",
            });
          }
          sql.push_str(" LIMIT :limit");

          let mut statement = conn.prepare(&sql)?;
          let mapped = if let Some(order) = &order {
            statement.query_map(
              rusqlite::named_params! {
                ":collection": collection,
                ":field": order.field,
                ":limit": limit,
              },
              |row| Ok((row.get(0)?, row.get(1)?)),
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?
          } else {
            statement.query_map(
              rusqlite::named_params! {
                ":collection": collection,
                ":limit": limit,
              },
              |row| Ok((row.get(0)?, row.get(1)?)),
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?
          };
          Ok(mapped)
        })
        .await
        .map_err(unavailable)?;

      rows
        .into_iter()
        .map(|(id, body)| {
          Ok(Document { id, fields: decode(&body)? })
        })
        .collect()
    }
  }
}
