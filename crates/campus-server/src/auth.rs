//! Session credentials and password handling.
//!
//! A credential is an HS256-signed assertion of {person id, name, email,
//! role} with a fixed 24-hour lifetime. There is no refresh and no
//! revocation list: a credential is valid until it expires. Passwords are
//! stored as argon2 PHC strings and verified here at login.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::{extract::FromRequestParts, http::request::Parts};
use campus_core::{
  access::{IdentityClaim, Role},
  person::PersonId,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{
  DecodingKey, EncodingKey, Header, Validation, decode, encode,
  errors::ErrorKind,
};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};

use crate::{AppState, error::Error};
use campus_core::store::RegistryStore;

/// Fixed validity window, set at issue time.
pub const SESSION_TTL_HOURS: i64 = 24;

// ─── Passwords ───────────────────────────────────────────────────────────────

/// Hash a password into an argon2 PHC string for storage.
pub fn hash_password(password: &str) -> Result<String, Error> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| {
      Error::Domain(campus_core::Error::Internal(format!("argon2 error: {e}")))
    })
}

/// Verify a password against a stored PHC string. An unparseable hash
/// counts as a failed verification, never as a server error.
pub fn verify_password(password: &str, phc: &str) -> bool {
  PasswordHash::new(phc)
    .map(|parsed| {
      Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
    })
    .unwrap_or(false)
}

// ─── Session credentials ─────────────────────────────────────────────────────

/// The signed payload of a session credential.
#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
  sub:   PersonId,
  name:  String,
  email: String,
  role:  Role,
  exp:   usize,
}

/// The process-wide signing key pair; read-only after startup.
pub struct SessionKey {
  encoding: EncodingKey,
  decoding: DecodingKey,
}

impl SessionKey {
  pub fn new(secret: &str) -> Self {
    Self {
      encoding: EncodingKey::from_secret(secret.as_bytes()),
      decoding: DecodingKey::from_secret(secret.as_bytes()),
    }
  }

  /// Issue a credential for an authenticated caller.
  pub fn issue(&self, claim: &IdentityClaim) -> Result<String, Error> {
    let exp = (Utc::now() + Duration::hours(SESSION_TTL_HOURS)).timestamp() as usize;
    let claims = SessionClaims {
      sub:   claim.person_id,
      name:  claim.name.clone(),
      email: claim.email.clone(),
      role:  claim.role,
      exp,
    };
    encode(&Header::default(), &claims, &self.encoding).map_err(|e| {
      Error::Domain(campus_core::Error::Internal(format!("token error: {e}")))
    })
  }

  /// Verify signature and expiry, reconstructing the caller's claim.
  pub fn verify(&self, token: &str) -> Result<IdentityClaim, Error> {
    let data = decode::<SessionClaims>(token, &self.decoding, &Validation::default())
      .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => Error::SessionExpired,
        _ => Error::InvalidCredential,
      })?;

    Ok(IdentityClaim {
      person_id: data.claims.sub,
      name:      data.claims.name,
      email:     data.claims.email,
      role:      data.claims.role,
    })
  }
}

// ─── Extractor ───────────────────────────────────────────────────────────────

/// Present in a handler's signature means the request carried a valid
/// session credential. The inner claim is passed on to the workflow as an
/// explicit value.
pub struct Session(pub IdentityClaim);

impl<S> FromRequestParts<AppState<S>> for Session
where
  S: RegistryStore + Clone + Send + Sync + 'static,
{
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let header = parts
      .headers
      .get(axum::http::header::AUTHORIZATION)
      .and_then(|v| v.to_str().ok())
      .ok_or(Error::MissingCredential)?;

    // Tolerate a bare token with no scheme marker.
    let token = header.strip_prefix("Bearer ").unwrap_or(header);

    Ok(Session(state.sessions.verify(token)?))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn claim() -> IdentityClaim {
    IdentityClaim {
      person_id: 7,
      name:      "Alice".into(),
      email:     "alice@example.com".into(),
      role:      Role::Student,
    }
  }

  #[test]
  fn issue_and_verify_round_trip() {
    let key = SessionKey::new("test-secret");
    let token = key.issue(&claim()).unwrap();
    let out = key.verify(&token).unwrap();

    assert_eq!(out.person_id, 7);
    assert_eq!(out.role, Role::Student);
    assert_eq!(out.email, "alice@example.com");
  }

  #[test]
  fn wrong_secret_is_invalid() {
    let token = SessionKey::new("one-secret").issue(&claim()).unwrap();
    let err = SessionKey::new("other-secret").verify(&token).unwrap_err();
    assert!(matches!(err, Error::InvalidCredential));
  }

  #[test]
  fn garbage_token_is_invalid() {
    let key = SessionKey::new("test-secret");
    assert!(matches!(
      key.verify("not-a-token").unwrap_err(),
      Error::InvalidCredential
    ));
  }

  #[test]
  fn password_hash_verifies_and_rejects() {
    let hash = hash_password("hunter2").unwrap();
    assert!(verify_password("hunter2", &hash));
    assert!(!verify_password("wrong", &hash));
    assert!(!verify_password("hunter2", "not-a-phc-string"));
  }
}
