//! Person — the identity record every role membership hangs off.
//!
//! A person is created once and never duplicated; the national id (`nif`)
//! functions as a natural key. Role memberships (student, instructor, staff)
//! are 1:1 extensions keyed by person id.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type PersonId = i64;
pub type DepartmentId = i64;

/// An identity record. The login secret is stored separately as a hash and
/// never leaves the store through this type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
  pub person_id: PersonId,
  pub name:      String,
  pub age:       i64,
  pub gender:    String,
  /// National id; functions as a natural key.
  pub nif:       String,
  pub email:     Option<String>,
  pub address:   String,
  pub phone:     String,
}

/// Input to [`crate::store::RegistryStore::create_person`].
/// The password has already been hashed by the caller; the store never sees
/// the cleartext secret.
#[derive(Debug, Clone)]
pub struct NewPerson {
  pub name:          String,
  pub age:           i64,
  pub gender:        String,
  pub nif:           String,
  pub email:         Option<String>,
  pub address:       String,
  pub phone:         String,
  pub password_hash: String,
}

/// A person's stored login material, fetched for credential verification.
#[derive(Debug, Clone)]
pub struct StoredCredentials {
  pub person_id:     PersonId,
  pub name:          String,
  pub email:         String,
  pub password_hash: String,
}

// ─── Role memberships ────────────────────────────────────────────────────────

/// Student membership row. `mean` is the running average of the student's
/// results, recomputed by the grading workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
  pub person_id:      PersonId,
  pub enrolment_date: NaiveDate,
  pub mean:           f64,
}

/// Staff membership row (a worker with no teaching duties).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffMember {
  pub person_id:       PersonId,
  pub salary:          f64,
  pub started_working: NaiveDate,
}

/// Instructor membership row, owned by a department.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instructor {
  pub person_id:       PersonId,
  pub salary:          f64,
  pub started_working: NaiveDate,
  pub department_id:   DepartmentId,
}
