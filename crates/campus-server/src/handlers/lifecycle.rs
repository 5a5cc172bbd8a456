//! Person deletion — staff-gated, cascades across every referencing table.

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

/// `DELETE /persons/{person_id}`
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  Session(claim): Session,
  Path(person_id): Path<PersonId>,
) -> Result<impl IntoResponse, Error>
where
  S: RegistryStore + Clone + Send + Sync + 'static,
  S::Error: Into<campus_core::Error>,
{
  if !allowed(Operation::DeletePerson, &claim, None) {
    return Err(Error::Forbidden("only staff members can delete persons"));
  }

  state
    .store
    .delete_person(person_id)
    .await
    .map_err(store_err)?;

  tracing::info!(person_id, "person deleted");
  Ok(Envelope::ok(()))
}
