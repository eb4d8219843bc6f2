//! Handlers for `/employees` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/employees` | Merged canonical listing |
//! | `POST`   | `/employees` | Body: `{"name","registration","role","photoUrl"?}` |
//! | `PUT`    | `/employees/:id` | 404 if the id resolves nowhere |
//! | `DELETE` | `/employees/:id` | 404 if the id resolves nowhere |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use roster_core::{
  employee::{Employee, NewEmployee},
  provider::IdentityProvider,
  store::DocumentStore,
};
use roster_resolve::EmployeeDirectory;

use crate::error::ApiError;

/// `GET /employees`
pub async fn list<S, P>(
  State(directory): State<Arc<EmployeeDirectory<S, P>>>,
) -> Result<Json<Vec<Employee>>, ApiError>
where
  S: DocumentStore + 'static,
  P: IdentityProvider + 'static,
{
  Ok(Json(directory.list().await?))
}

/// `POST /employees`
pub async fn create<S, P>(
  State(directory): State<Arc<EmployeeDirectory<S, P>>>,
  Json(body): Json<NewEmployee>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DocumentStore + 'static,
  P: IdentityProvider + 'static,
{
  let employee = directory.create(body).await?;
  Ok((StatusCode::CREATED, Json(employee)))
}

/// `PUT /employees/:id`
pub async fn update<S, P>(
  State(directory): State<Arc<EmployeeDirectory<S, P>>>,
  Path(id): Path<String>,
  Json(body): Json<NewEmployee>,
) -> Result<Json<Employee>, ApiError>
where
  S: DocumentStore + 'static,
  P: IdentityProvider + 'static,
{
  Ok(Json(directory.update(&id, body).await?))
}

/// `DELETE /employees/:id`
pub async fn delete<S, P>(
  State(directory): State<Arc<EmployeeDirectory<S, P>>>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError>
where
  S: DocumentStore + 'static,
  P: IdentityProvider + 'static,
{
  directory.delete(&id).await?;
  Ok(StatusCode::NO_CONTENT)
}
