//! [`FileDirectory`] — an identity provider backed by a JSON users export.
//!
//! The file is the provider's own dump format (one array of user objects
//! with `uid`/`displayName`/`email`/`photoURL`/`customAttributes`/
//! `creationTime`/`lastSignInTime`), read once at startup.

use std::{collections::BTreeMap, future::Future, path::Path};

use chrono::{DateTime, Utc};
use roster_core::provider::{IdentityProvider, ProviderError, ProviderUser};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
  #[error("cannot read users file: {0}")]
  Io(#[from] std::io::Error),

  #[error("users file is not valid JSON: {0}")]
  Json(#[from] serde_json::Error),
}

/// One user object in the export file.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawUser {
  uid:               String,
  #[serde(default)]
  display_name:      Option<String>,
  #[serde(default)]
  email:             Option<String>,
  #[serde(default, rename = "photoURL")]
  photo_url:         Option<String>,
  #[serde(default)]
  custom_attributes: BTreeMap<String, String>,
  #[serde(default)]
  creation_time:     Option<DateTime<Utc>>,
  #[serde(default)]
  last_sign_in_time: Option<DateTime<Utc>>,
}

impl From<RawUser> for ProviderUser {
  fn from(raw: RawUser) -> Self {
    ProviderUser {
      uid:               raw.uid,
      display_name:      raw.display_name,
      email:             raw.email,
      photo_url:         raw.photo_url,
      custom_attributes: raw.custom_attributes,
      created_at:        raw.creation_time,
      last_sign_in_at:   raw.last_sign_in_time,
    }
  }
}

/// Identity provider serving a fixed user list loaded from disk.
pub struct FileDirectory {
  users: Vec<ProviderUser>,
}

impl FileDirectory {
  /// A directory with no users — the fallback then yields an empty listing.
  pub fn empty() -> Self {
    Self { users: Vec::new() }
  }

  pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
    let text = std::fs::read_to_string(path)?;
    let raw: Vec<RawUser> = serde_json::from_str(&text)?;
    Ok(Self {
      users: raw.into_iter().map(ProviderUser::from).collect(),
    })
  }

  pub fn len(&self) -> usize { self.users.len() }

  pub fn is_empty(&self) -> bool { self.users.is_empty() }
}

impl IdentityProvider for FileDirectory {
  fn list_users(
    &self,
  ) -> impl Future<Output = Result<Vec<ProviderUser>, ProviderError>> + Send + '_ {
    async move { Ok(self.users.clone()) }
  }
}
