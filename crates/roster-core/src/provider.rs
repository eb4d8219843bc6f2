//! The `IdentityProvider` trait — the external user-directory collaborator.
//!
//! Consulted only by the listing fallback, when no candidate collection holds
//! any employee document at all.

use std::{collections::BTreeMap, future::Future};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
  #[error("identity provider unavailable: {0}")]
  Unavailable(String),
}

/// A user as reported by the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderUser {
  pub uid:               String,
  pub display_name:      Option<String>,
  pub email:             Option<String>,
  pub photo_url:         Option<String>,
  /// Provider-side custom attributes (e.g. a `funcao` or `role` claim).
  pub custom_attributes: BTreeMap<String, String>,
  pub created_at:        Option<DateTime<Utc>>,
  pub last_sign_in_at:   Option<DateTime<Utc>>,
}

/// Abstraction over the identity provider's user listing.
pub trait IdentityProvider: Send + Sync {
  /// Enumerate every registered user.
  fn list_users(
    &self,
  ) -> impl Future<Output = Result<Vec<ProviderUser>, ProviderError>> + Send + '_;
}
