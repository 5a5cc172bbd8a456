//! Enrollment workflows: degree (staff-initiated), course edition and
//! activity (student self-service).

use axum::{
  Json,
  extract::{Path, State},
  response::IntoResponse,
};
use campus_core::{
  academics::{ActivityId, ClassId, EditionId, MajorId},
  access::{Operation, allowed},
  person::PersonId,
  store::RegistryStore,
};
use serde::Deserialize;

use crate::{
  AppState,
  auth::Session,
  error::{Envelope, Error, store_err},
};

/// `PUT /students/{student_id}/major/{major_id}`
pub async fn enroll_degree<S>(
  State(state): State<AppState<S>>,
  Session(claim): Session,
  Path((student_id, major_id)): Path<(PersonId, MajorId)>,
) -> Result<impl IntoResponse, Error>
where
  S: RegistryStore + Clone + Send + Sync + 'static,
  S::Error: Into<campus_core::Error>,
{
  if !allowed(Operation::EnrollMajor, &claim, None) {
    return Err(Error::Forbidden("only staff members can enroll students in majors"));
  }

  let receipt = state
    .store
    .enroll_major(student_id, major_id)
    .await
    .map_err(store_err)?;

  tracing::info!(student_id, major_id, "degree enrollment");
  Ok(Envelope::ok(receipt))
}

/// `DELETE /students/{student_id}/major`
pub async fn unenroll_degree<S>(
  State(state): State<AppState<S>>,
  Session(claim): Session,
  Path(student_id): Path<PersonId>,
) -> Result<impl IntoResponse, Error>
where
  S: RegistryStore + Clone + Send + Sync + 'static,
  S::Error: Into<campus_core::Error>,
{
  if !allowed(Operation::UnenrollMajor, &claim, None) {
    return Err(Error::Forbidden("only staff members can unenroll students from majors"));
  }

  let receipt = state
    .store
    .unenroll_major(student_id)
    .await
    .map_err(store_err)?;
  Ok(Envelope::ok(receipt))
}

#[derive(Debug, Deserialize)]
pub struct EnrollEditionBody {
  pub classes: Option<Vec<ClassId>>,
}

/// `POST /editions/{edition_id}/enrollment` — the enrolled student is the
/// caller; at least one class id is required.
pub async fn enroll_edition<S>(
  State(state): State<AppState<S>>,
  Session(claim): Session,
  Path(edition_id): Path<EditionId>,
  Json(body): Json<EnrollEditionBody>,
) -> Result<impl IntoResponse, Error>
where
  S: RegistryStore + Clone + Send + Sync + 'static,
  S::Error: Into<campus_core::Error>,
{
  if !allowed(Operation::EnrollEdition, &claim, None) {
    return Err(Error::Forbidden("only students can enroll in course editions"));
  }
  let classes = body
    .classes
    .filter(|c| !c.is_empty())
    .ok_or(Error::MissingField("classes"))?;

  let receipt = state
    .store
    .enroll_edition(claim.person_id, edition_id, classes)
    .await
    .map_err(store_err)?;

  tracing::info!(student_id = claim.person_id, edition_id, "edition enrollment");
  Ok(Envelope::ok(receipt))
}

/// `POST /activities/{activity_id}/enrollment` — the enrolled student is
/// the caller.
pub async fn enroll_activity<S>(
  State(state): State<AppState<S>>,
  Session(claim): Session,
  Path(activity_id): Path<ActivityId>,
) -> Result<impl IntoResponse, Error>
where
  S: RegistryStore + Clone + Send + Sync + 'static,
  S::Error: Into<campus_core::Error>,
{
  if !allowed(Operation::EnrollActivity, &claim, None) {
    return Err(Error::Forbidden("only students can enroll in activities"));
  }

  let receipt = state
    .store
    .enroll_activity(claim.person_id, activity_id)
    .await
    .map_err(store_err)?;
  Ok(Envelope::ok(receipt))
}
