//! Grade submission — coordinator-gated, all-or-nothing.

use axum::{
  Json,
  extract::{Path, State},
  response::IntoResponse,
};
use campus_core::{
  academics::EditionId,
  access::{Operation, allowed},
  grading::GradeEntry,
  store::RegistryStore,
};
use serde::Deserialize;

use crate::{
  AppState,
  auth::Session,
  error::{Envelope, Error, store_err},
};

#[derive(Debug, Deserialize)]
pub struct SubmitGradesBody {
  pub period: Option<String>,
  pub grades: Option<Vec<GradeEntry>>,
}

/// `POST /editions/{edition_id}/grades` — only the edition's coordinating
/// instructor may submit. The identity check runs against edition data
/// before any write.
pub async fn submit<S>(
  State(state): State<AppState<S>>,
  Session(claim): Session,
  Path(edition_id): Path<EditionId>,
  Json(body): Json<SubmitGradesBody>,
) -> Result<impl IntoResponse, Error>
where
  S: RegistryStore + Clone + Send + Sync + 'static,
  S::Error: Into<campus_core::Error>,
{
  if !allowed(Operation::SubmitGrades, &claim, None) {
    return Err(Error::Forbidden("only instructors can submit grades"));
  }
  let period = body
    .period
    .filter(|p| !p.is_empty())
    .ok_or(Error::MissingField("period"))?;
  let grades = body
    .grades
    .filter(|g| !g.is_empty())
    .ok_or(Error::MissingField("grades"))?;

  let edition = state
    .store
    .get_edition(edition_id)
    .await
    .map_err(store_err)?
    .ok_or(Error::Domain(campus_core::Error::EditionNotFound(edition_id)))?;
  if edition.coordinator_id != Some(claim.person_id) {
    return Err(Error::Forbidden("you are not the coordinator of this course edition"));
  }

  let submission = state
    .store
    .submit_grades(edition_id, period, grades)
    .await
    .map_err(store_err)?;

  tracing::info!(
    edition_id,
    entries = submission.grades.len(),
    "grades submitted"
  );
  Ok(Envelope::ok(submission))
}
