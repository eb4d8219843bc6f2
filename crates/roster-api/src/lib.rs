//! JSON REST API for the roster service.
//!
//! Exposes an axum [`Router`] backed by an
//! [`EmployeeDirectory`](roster_resolve::EmployeeDirectory) over any
//! [`DocumentStore`](roster_core::store::DocumentStore) and
//! [`IdentityProvider`](roster_core::provider::IdentityProvider).
//! Auth, TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", roster_api::api_router(directory.clone()))
//! ```

pub mod employees;
pub mod error;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, put},
};
use roster_core::{provider::IdentityProvider, store::DocumentStore};
use roster_resolve::EmployeeDirectory;

pub use error::ApiError;

/// Build a fully-materialised API router for `directory`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, P>(directory: Arc<EmployeeDirectory<S, P>>) -> Router<()>
where
  S: DocumentStore + 'static,
  P: IdentityProvider + 'static,
{
  Router::new()
    .route(
      "/employees",
      get(employees::list::<S, P>).post(employees::create::<S, P>),
    )
    .route(
      "/employees/{id}",
      put(employees::update::<S, P>).delete(employees::delete::<S, P>),
    )
    .with_state(directory)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use std::future::Future;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use roster_core::provider::{ProviderError, ProviderUser};
  use roster_resolve::CollectionRoutes;
  use roster_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  /// Identity provider with nobody in it; the fallback is exercised in
  /// roster-resolve's tests.
  struct NullProvider;

  impl IdentityProvider for NullProvider {
    fn list_users(
      &self,
    ) -> impl Future<Output = Result<Vec<ProviderUser>, ProviderError>> + Send + '_
    {
      async move { Ok(Vec::new()) }
    }
  }

  async fn router() -> Router<()> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let directory = EmployeeDirectory::new(
      Arc::new(store),
      Arc::new(NullProvider),
      CollectionRoutes::default(),
    );
    api_router(Arc::new(directory))
  }

  async fn send(
    app: Router<()>,
    method: &str,
    uri: &str,
    body: Option<&str>,
  ) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
    }
    let request = builder
      .body(Body::from(body.unwrap_or_default().to_owned()))
      .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
      .await
      .unwrap();
    let json = if bytes.is_empty() {
      serde_json::Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
  }

  #[tokio::test]
  async fn create_returns_201_with_the_canonical_record() {
    let app = router().await;
    let (status, body) = send(
      app,
      "POST",
      "/employees",
      Some(r#"{"name": "Ana Souza", "registration": "12345", "role": "fiscal"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["fullName"], "Ana Souza");
    assert_eq!(body["registrationId"], "12345");
    assert_eq!(body["role"], "fiscal");
    assert!(body["createdAt"].is_string());
    assert!(body["id"].is_string());
  }

  #[tokio::test]
  async fn create_with_empty_role_returns_400() {
    let app = router().await;
    let (status, body) = send(
      app,
      "POST",
      "/employees",
      Some(r#"{"name": "Ana", "registration": "1", "role": "  "}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("role"), "body: {body}");
  }

  #[tokio::test]
  async fn list_includes_created_records() {
    let app = router().await;
    send(
      app.clone(),
      "POST",
      "/employees",
      Some(r#"{"name": "Ana", "registration": "1", "role": "fiscal"}"#),
    )
    .await;

    let (status, body) = send(app, "GET", "/employees", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["fullName"], "Ana");
  }

  #[tokio::test]
  async fn list_on_empty_service_is_an_empty_array() {
    let app = router().await;
    let (status, body) = send(app, "GET", "/employees", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!([]));
  }

  #[tokio::test]
  async fn update_unknown_id_returns_404() {
    let app = router().await;
    let (status, _) = send(
      app,
      "PUT",
      "/employees/missing",
      Some(r#"{"name": "Ana", "registration": "1", "role": "fiscal"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn update_changes_the_record() {
    let app = router().await;
    let (_, created) = send(
      app.clone(),
      "POST",
      "/employees",
      Some(r#"{"name": "Ana", "registration": "1", "role": "fiscal"}"#),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let (status, body) = send(
      app,
      "PUT",
      &format!("/employees/{id}"),
      Some(r#"{"name": "Ana Souza", "registration": "1", "role": "supervisora"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fullName"], "Ana Souza");
    assert_eq!(body["role"], "supervisora");
  }

  #[tokio::test]
  async fn delete_returns_204_then_404() {
    let app = router().await;
    let (_, created) = send(
      app.clone(),
      "POST",
      "/employees",
      Some(r#"{"name": "Ana", "registration": "1", "role": "fiscal"}"#),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let (status, _) = send(app.clone(), "DELETE", &format!("/employees/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(app, "DELETE", &format!("/employees/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }
}
