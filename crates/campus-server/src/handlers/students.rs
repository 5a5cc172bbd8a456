//! Student views: course history and financial status. Staff or the
//! student themselves.

use axum::{
  extract::{Path, State},
  response::IntoResponse,
};
use campus_core::{
  access::{Operation, allowed},
  person::PersonId,
  store::RegistryStore,
};

use crate::{
  AppState,
  auth::Session,
  error::{Envelope, Error, store_err},
};

/// `GET /students/{student_id}/courses`
pub async fn details<S>(
  State(state): State<AppState<S>>,
  Session(claim): Session,
  Path(student_id): Path<PersonId>,
) -> Result<impl IntoResponse, Error>
where
  S: RegistryStore + Clone + Send + Sync + 'static,
  S::Error: Into<campus_core::Error>,
{
  if !allowed(Operation::ViewStudentDetails, &claim, Some(student_id)) {
    return Err(Error::Forbidden(
      "only staff or the student themselves can access this information",
    ));
  }

  let details = state
    .store
    .student_details(student_id)
    .await
    .map_err(store_err)?;
  Ok(Envelope::ok(details))
}

/// `GET /students/{student_id}/financial-status`
pub async fn financial_status<S>(
  State(state): State<AppState<S>>,
  Session(claim): Session,
  Path(student_id): Path<PersonId>,
) -> Result<impl IntoResponse, Error>
where
  S: RegistryStore + Clone + Send + Sync + 'static,
  S::Error: Into<campus_core::Error>,
{
  if !allowed(Operation::ViewFinancialStatus, &claim, Some(student_id)) {
    return Err(Error::Forbidden(
      "only staff or the student themselves can access this information",
    ));
  }

  let status = state
    .store
    .financial_status(student_id)
    .await
    .map_err(store_err)?;
  Ok(Envelope::ok(status))
}
