//! Staff-gated catalog administration: departments, majors, courses,
//! editions, classes, activities.

use axum::{Json, extract::State, response::IntoResponse};
use campus_core::{
  academics::{CourseId, EditionId},
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

fn gate(claim: &campus_core::access::IdentityClaim) -> Result<(), Error> {
  if !allowed(Operation::ManageCatalog, claim, None) {
    return Err(Error::Forbidden("only staff members can manage the catalog"));
  }
  Ok(())
}

#[derive(Debug, Deserialize)]
pub struct NamedBody {
  pub name: Option<String>,
}

impl NamedBody {
  fn name(self) -> Result<String, Error> {
    self.name.filter(|n| !n.is_empty()).ok_or(Error::MissingField("name"))
  }
}

/// `POST /catalog/departments`
pub async fn create_department<S>(
  State(state): State<AppState<S>>,
  Session(claim): Session,
  Json(body): Json<NamedBody>,
) -> Result<impl IntoResponse, Error>
where
  S: RegistryStore + Clone + Send + Sync + 'static,
  S::Error: Into<campus_core::Error>,
{
  gate(&claim)?;
  let dept = state
    .store
    .add_department(body.name()?)
    .await
    .map_err(store_err)?;
  Ok(Envelope::created(dept))
}

/// `POST /catalog/majors`
pub async fn create_major<S>(
  State(state): State<AppState<S>>,
  Session(claim): Session,
  Json(body): Json<NamedBody>,
) -> Result<impl IntoResponse, Error>
where
  S: RegistryStore + Clone + Send + Sync + 'static,
  S::Error: Into<campus_core::Error>,
{
  gate(&claim)?;
  let major = state.store.add_major(body.name()?).await.map_err(store_err)?;
  Ok(Envelope::created(major))
}

/// `POST /catalog/courses`
pub async fn create_course<S>(
  State(state): State<AppState<S>>,
  Session(claim): Session,
  Json(body): Json<NamedBody>,
) -> Result<impl IntoResponse, Error>
where
  S: RegistryStore + Clone + Send + Sync + 'static,
  S::Error: Into<campus_core::Error>,
{
  gate(&claim)?;
  let course = state.store.add_course(body.name()?).await.map_err(store_err)?;
  Ok(Envelope::created(course))
}

#[derive(Debug, Deserialize)]
pub struct CreateEditionBody {
  pub course_id:      Option<CourseId>,
  pub capacity:       Option<i64>,
  pub coordinator_id: Option<PersonId>,
}

/// `POST /catalog/editions`
pub async fn create_edition<S>(
  State(state): State<AppState<S>>,
  Session(claim): Session,
  Json(body): Json<CreateEditionBody>,
) -> Result<impl IntoResponse, Error>
where
  S: RegistryStore + Clone + Send + Sync + 'static,
  S::Error: Into<campus_core::Error>,
{
  gate(&claim)?;
  let course_id = body.course_id.ok_or(Error::MissingField("course_id"))?;
  let capacity = body.capacity.ok_or(Error::MissingField("capacity"))?;

  let edition = state
    .store
    .add_edition(course_id, capacity, body.coordinator_id)
    .await
    .map_err(store_err)?;
  Ok(Envelope::created(edition))
}

#[derive(Debug, Deserialize)]
pub struct CreateClassBody {
  pub edition_id: Option<EditionId>,
  pub name:       Option<String>,
}

/// `POST /catalog/classes`
pub async fn create_class<S>(
  State(state): State<AppState<S>>,
  Session(claim): Session,
  Json(body): Json<CreateClassBody>,
) -> Result<impl IntoResponse, Error>
where
  S: RegistryStore + Clone + Send + Sync + 'static,
  S::Error: Into<campus_core::Error>,
{
  gate(&claim)?;
  let edition_id = body.edition_id.ok_or(Error::MissingField("edition_id"))?;
  let name = body.name.filter(|n| !n.is_empty()).ok_or(Error::MissingField("name"))?;

  let class = state
    .store
    .add_class(edition_id, name)
    .await
    .map_err(store_err)?;
  Ok(Envelope::created(class))
}

#[derive(Debug, Deserialize)]
pub struct CreateActivityBody {
  pub name: Option<String>,
  pub fee:  Option<f64>,
}

/// `POST /catalog/activities`
pub async fn create_activity<S>(
  State(state): State<AppState<S>>,
  Session(claim): Session,
  Json(body): Json<CreateActivityBody>,
) -> Result<impl IntoResponse, Error>
where
  S: RegistryStore + Clone + Send + Sync + 'static,
  S::Error: Into<campus_core::Error>,
{
  gate(&claim)?;
  let name = body.name.filter(|n| !n.is_empty()).ok_or(Error::MissingField("name"))?;

  let activity = state
    .store
    .add_activity(name, body.fee.unwrap_or(0.0))
    .await
    .map_err(store_err)?;
  Ok(Envelope::created(activity))
}
