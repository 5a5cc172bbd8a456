//! Handlers for `/persons`: open registration and the person list.

use axum::{
  Json,
  extract::State,
  response::IntoResponse,
};
use campus_core::{person::NewPerson, store::RegistryStore};
use serde::{Deserialize, Serialize};

use crate::{
  AppState, auth,
  error::{Envelope, Error, store_err},
};

#[derive(Debug, Deserialize)]
pub struct CreatePersonBody {
  pub name:     Option<String>,
  pub age:      Option<i64>,
  pub gender:   Option<String>,
  pub nif:      Option<String>,
  pub email:    Option<String>,
  pub address:  Option<String>,
  pub phone:    Option<String>,
  pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatedPerson {
  pub person_id: i64,
}

/// `POST /persons` — open registration; the password is hashed before it
/// reaches the store.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<CreatePersonBody>,
) -> Result<impl IntoResponse, Error>
where
  S: RegistryStore + Clone + Send + Sync + 'static,
  S::Error: Into<campus_core::Error>,
{
  let name = body.name.ok_or(Error::MissingField("name"))?;
  let age = body.age.ok_or(Error::MissingField("age"))?;
  let gender = body.gender.ok_or(Error::MissingField("gender"))?;
  let nif = body.nif.ok_or(Error::MissingField("nif"))?;
  let address = body.address.ok_or(Error::MissingField("address"))?;
  let phone = body.phone.ok_or(Error::MissingField("phone"))?;
  let password = body
    .password
    .filter(|p| !p.is_empty())
    .ok_or(Error::MissingField("password"))?;

  let password_hash = auth::hash_password(&password)?;

  let person_id = state
    .store
    .create_person(NewPerson {
      name,
      age,
      gender,
      nif,
      email: body.email,
      address,
      phone,
      password_hash,
    })
    .await
    .map_err(store_err)?;

  tracing::info!(person_id, "person created");
  Ok(Envelope::created(CreatedPerson { person_id }))
}

/// `GET /persons` — the full person list, ordered by id.
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<impl IntoResponse, Error>
where
  S: RegistryStore + Clone + Send + Sync + 'static,
  S::Error: Into<campus_core::Error>,
{
  let persons = state.store.list_persons().await.map_err(store_err)?;
  Ok(Envelope::ok(persons))
}
