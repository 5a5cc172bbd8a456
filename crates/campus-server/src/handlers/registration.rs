//! Staff-gated role registration: students, staff, instructors.

use axum::{Json, extract::State, response::IntoResponse};
use campus_core::{
  academics::MajorId,
  access::{Operation, allowed},
  person::{DepartmentId, PersonId},
  store::RegistryStore,
};
use serde::Deserialize;

use crate::{
  AppState,
  auth::Session,
  error::{Envelope, Error, store_err},
};

#[derive(Debug, Deserialize)]
pub struct RegisterStudentBody {
  pub person_id: Option<PersonId>,
  pub mean:      Option<f64>,
  pub major_id:  Option<MajorId>,
}

/// `POST /register/student`
pub async fn student<S>(
  State(state): State<AppState<S>>,
  Session(claim): Session,
  Json(body): Json<RegisterStudentBody>,
) -> Result<impl IntoResponse, Error>
where
  S: RegistryStore + Clone + Send + Sync + 'static,
  S::Error: Into<campus_core::Error>,
{
  if !allowed(Operation::RegisterStudent, &claim, None) {
    return Err(Error::Forbidden("only staff members can register new students"));
  }
  let person_id = body.person_id.ok_or(Error::MissingField("person_id"))?;

  let student = state
    .store
    .register_student(person_id, body.mean.unwrap_or(0.0), body.major_id)
    .await
    .map_err(store_err)?;
  Ok(Envelope::ok(student))
}

#[derive(Debug, Deserialize)]
pub struct RegisterStaffBody {
  pub person_id: Option<PersonId>,
  pub salary:    Option<f64>,
}

/// `POST /register/staff`
pub async fn staff<S>(
  State(state): State<AppState<S>>,
  Session(claim): Session,
  Json(body): Json<RegisterStaffBody>,
) -> Result<impl IntoResponse, Error>
where
  S: RegistryStore + Clone + Send + Sync + 'static,
  S::Error: Into<campus_core::Error>,
{
  if !allowed(Operation::RegisterStaff, &claim, None) {
    return Err(Error::Forbidden("only staff members can register new staff"));
  }
  let person_id = body.person_id.ok_or(Error::MissingField("person_id"))?;

  let member = state
    .store
    .register_staff(person_id, body.salary.unwrap_or(0.0))
    .await
    .map_err(store_err)?;
  Ok(Envelope::ok(member))
}

#[derive(Debug, Deserialize)]
pub struct RegisterInstructorBody {
  pub person_id:     Option<PersonId>,
  pub salary:        Option<f64>,
  pub department_id: Option<DepartmentId>,
}

/// `POST /register/instructor`
pub async fn instructor<S>(
  State(state): State<AppState<S>>,
  Session(claim): Session,
  Json(body): Json<RegisterInstructorBody>,
) -> Result<impl IntoResponse, Error>
where
  S: RegistryStore + Clone + Send + Sync + 'static,
  S::Error: Into<campus_core::Error>,
{
  if !allowed(Operation::RegisterInstructor, &claim, None) {
    return Err(Error::Forbidden("only staff members can register new instructors"));
  }
  let person_id = body.person_id.ok_or(Error::MissingField("person_id"))?;

  let record = state
    .store
    .register_instructor(person_id, body.salary.unwrap_or(0.0), body.department_id)
    .await
    .map_err(store_err)?;
  Ok(Envelope::ok(record))
}
