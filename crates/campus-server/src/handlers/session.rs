//! Login: verify credentials, resolve the caller's role, issue a session
//! credential.

use axum::{Json, extract::State, response::IntoResponse};
use campus_core::{access::IdentityClaim, store::RegistryStore};
use serde::Deserialize;

use crate::{
  AppState, auth,
  error::{Envelope, Error, store_err},
};

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub email:    Option<String>,
  pub password: Option<String>,
}

/// `POST /auth/login` — returns the signed credential as the results
/// payload. No last-login tracking; issuing the credential is the only
/// side effect.
pub async fn login<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<LoginBody>,
) -> Result<impl IntoResponse, Error>
where
  S: RegistryStore + Clone + Send + Sync + 'static,
  S::Error: Into<campus_core::Error>,
{
  let email = body
    .email
    .filter(|e| !e.is_empty())
    .ok_or(Error::MissingField("email"))?;
  let password = body
    .password
    .filter(|p| !p.is_empty())
    .ok_or(Error::MissingField("password"))?;

  let creds = state
    .store
    .find_credentials(&email)
    .await
    .map_err(store_err)?
    .ok_or(Error::InvalidLogin)?;

  if !auth::verify_password(&password, &creds.password_hash) {
    return Err(Error::InvalidLogin);
  }

  // Role precedence: student, then instructor, then staff.
  let role = state
    .store
    .resolve_role(creds.person_id)
    .await
    .map_err(store_err)?;

  let claim = IdentityClaim {
    person_id: creds.person_id,
    name:      creds.name,
    email:     creds.email,
    role,
  };
  let token = state.sessions.issue(&claim)?;

  tracing::info!(person_id = claim.person_id, role = role.as_str(), "login");
  Ok(Envelope::ok(token))
}
