//! Server error type, the response envelope, and the `IntoResponse`
//! implementation mapping the failure taxonomy onto HTTP statuses.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use campus_core::ErrorKind;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("credential is missing")]
  MissingCredential,

  #[error("session has expired")]
  SessionExpired,

  #[error("invalid credential")]
  InvalidCredential,

  #[error("invalid email or password")]
  InvalidLogin,

  #[error("{0} is required")]
  MissingField(&'static str),

  #[error("{0}")]
  Forbidden(&'static str),

  #[error("{0}")]
  Domain(campus_core::Error),
}

/// Fold a store error into the domain taxonomy.
pub fn store_err<E: Into<campus_core::Error>>(e: E) -> Error {
  Error::Domain(e.into())
}

// ─── Envelope ────────────────────────────────────────────────────────────────

/// Every response body carries this shape: the HTTP status mirrored, an
/// optional error string, and a results payload that is null on failure.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
  pub status:  u16,
  pub errors:  Option<String>,
  pub results: Option<T>,
}

impl<T: Serialize> Envelope<T> {
  pub fn ok(results: T) -> (StatusCode, Json<Self>) {
    (
      StatusCode::OK,
      Json(Self { status: 200, errors: None, results: Some(results) }),
    )
  }

  pub fn created(results: T) -> (StatusCode, Json<Self>) {
    (
      StatusCode::CREATED,
      Json(Self { status: 201, errors: None, results: Some(results) }),
    )
  }
}

fn failure(status: StatusCode, message: String) -> Response {
  let body = Envelope::<()> {
    status:  status.as_u16(),
    errors:  Some(message),
    results: None,
  };
  (status, Json(body)).into_response()
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let status = match &self {
      Error::MissingCredential
      | Error::SessionExpired
      | Error::InvalidCredential
      | Error::InvalidLogin => StatusCode::UNAUTHORIZED,

      Error::Forbidden(_) => StatusCode::FORBIDDEN,

      Error::MissingField(_) => StatusCode::BAD_REQUEST,

      Error::Domain(e) => match e.kind() {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Invalid => StatusCode::BAD_REQUEST,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
      },
    };

    if status == StatusCode::INTERNAL_SERVER_ERROR {
      tracing::error!(error = %self, "request failed");
    }

    failure(status, self.to_string())
  }
}
