//! HTTP layer for the Campus records backend.
//!
//! Exposes an axum [`Router`] over any [`RegistryStore`]. Requests carry a
//! bearer session credential (issued by `/auth/login`); the authorization
//! gate runs in each handler before any store call.

pub mod auth;
pub mod error;
pub mod handlers;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{delete, get, post, put},
};
use campus_core::store::RegistryStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::SessionKey;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:           String,
  pub port:           u16,
  pub store_path:     PathBuf,
  /// Shared secret for signing session credentials.
  pub session_secret: String,
}

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: RegistryStore> {
  pub store:    Arc<S>,
  pub config:   Arc<ServerConfig>,
  pub sessions: Arc<SessionKey>,
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the records API.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: RegistryStore + Clone + Send + Sync + 'static,
  S::Error: Into<campus_core::Error>,
{
  use handlers::*;

  Router::new()
    // Persons (open)
    .route("/persons", post(persons::create::<S>).get(persons::list::<S>))
    // Sessions
    .route("/auth/login", post(session::login::<S>))
    // Role registration (staff)
    .route("/register/student", post(registration::student::<S>))
    .route("/register/staff", post(registration::staff::<S>))
    .route("/register/instructor", post(registration::instructor::<S>))
    // Catalog (staff)
    .route("/catalog/departments", post(catalog::create_department::<S>))
    .route("/catalog/majors", post(catalog::create_major::<S>))
    .route("/catalog/courses", post(catalog::create_course::<S>))
    .route("/catalog/editions", post(catalog::create_edition::<S>))
    .route("/catalog/classes", post(catalog::create_class::<S>))
    .route("/catalog/activities", post(catalog::create_activity::<S>))
    // Enrollment workflows
    .route(
      "/students/{student_id}/major/{major_id}",
      put(enrollment::enroll_degree::<S>),
    )
    .route(
      "/students/{student_id}/major",
      delete(enrollment::unenroll_degree::<S>),
    )
    .route(
      "/editions/{edition_id}/enrollment",
      post(enrollment::enroll_edition::<S>),
    )
    .route(
      "/activities/{activity_id}/enrollment",
      post(enrollment::enroll_activity::<S>),
    )
    // Grading
    .route("/editions/{edition_id}/grades", post(grades::submit::<S>))
    // Student views (staff or self)
    .route("/students/{student_id}/courses", get(students::details::<S>))
    .route(
      "/students/{student_id}/financial-status",
      get(students::financial_status::<S>),
    )
    // Lifecycle
    .route("/persons/{person_id}", delete(lifecycle::delete::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ───────────────────────────────────────────────────────
