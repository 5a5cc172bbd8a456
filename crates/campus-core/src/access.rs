//! Roles, identity claims, and the authorization predicate.
//!
//! A caller's role is resolved once at login by an ordered table probe
//! (student, then instructor, then staff) and carried in the session
//! credential from then on. Workflows receive the resulting
//! [`IdentityClaim`] as an explicit value; nothing here is ambient state.

use serde::{Deserialize, Serialize};

use crate::person::PersonId;

/// The role a person acts under. When a person holds more than one
/// membership the fixed precedence student > instructor > staff decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  Student,
  Instructor,
  Staff,
  Unknown,
}

impl Role {
  pub fn as_str(&self) -> &'static str {
    match self {
      Role::Student => "student",
      Role::Instructor => "instructor",
      Role::Staff => "staff",
      Role::Unknown => "unknown",
    }
  }
}

/// The authenticated caller, reconstructed from a verified session
/// credential. Lives for one request; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityClaim {
  pub person_id: PersonId,
  pub name:      String,
  pub email:     String,
  pub role:      Role,
}

/// The operations the authorization gate knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
  RegisterStudent,
  RegisterStaff,
  RegisterInstructor,
  ManageCatalog,
  EnrollMajor,
  UnenrollMajor,
  EnrollEdition,
  EnrollActivity,
  SubmitGrades,
  ViewStudentDetails,
  ViewFinancialStatus,
  DeletePerson,
}

/// The authorization gate: must pass before any workflow runs.
///
/// Two shapes exist: role-exact operations, and role-or-self operations
/// where staff OR the owner of the resource may proceed. Grading carries an
/// additional data-dependent check (the caller must coordinate the edition)
/// performed by the HTTP layer after this gate.
pub fn allowed(
  op:             Operation,
  claim:          &IdentityClaim,
  resource_owner: Option<PersonId>,
) -> bool {
  use Operation::*;

  match op {
    RegisterStudent | RegisterStaff | RegisterInstructor | ManageCatalog
    | EnrollMajor | UnenrollMajor | DeletePerson => claim.role == Role::Staff,

    EnrollEdition | EnrollActivity => claim.role == Role::Student,

    SubmitGrades => claim.role == Role::Instructor,

    ViewStudentDetails | ViewFinancialStatus => {
      claim.role == Role::Staff || Some(claim.person_id) == resource_owner
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn claim(role: Role, person_id: PersonId) -> IdentityClaim {
    IdentityClaim {
      person_id,
      name: "Test Person".into(),
      email: "test@example.com".into(),
      role,
    }
  }

  #[test]
  fn staff_only_operations() {
    let staff = claim(Role::Staff, 1);
    let student = claim(Role::Student, 2);

    for op in [
      Operation::RegisterStudent,
      Operation::RegisterStaff,
      Operation::RegisterInstructor,
      Operation::EnrollMajor,
      Operation::UnenrollMajor,
      Operation::DeletePerson,
      Operation::ManageCatalog,
    ] {
      assert!(allowed(op, &staff, None));
      assert!(!allowed(op, &student, None));
    }
  }

  #[test]
  fn student_only_operations() {
    let student = claim(Role::Student, 2);
    let staff = claim(Role::Staff, 1);

    assert!(allowed(Operation::EnrollEdition, &student, None));
    assert!(allowed(Operation::EnrollActivity, &student, None));
    assert!(!allowed(Operation::EnrollEdition, &staff, None));
    assert!(!allowed(Operation::EnrollActivity, &staff, None));
  }

  #[test]
  fn grading_requires_instructor_role() {
    assert!(allowed(Operation::SubmitGrades, &claim(Role::Instructor, 3), None));
    assert!(!allowed(Operation::SubmitGrades, &claim(Role::Staff, 1), None));
    assert!(!allowed(Operation::SubmitGrades, &claim(Role::Unknown, 9), None));
  }

  #[test]
  fn role_or_self_allows_owner() {
    let student = claim(Role::Student, 7);
    assert!(allowed(Operation::ViewStudentDetails, &student, Some(7)));
    assert!(!allowed(Operation::ViewStudentDetails, &student, Some(8)));
    assert!(allowed(Operation::ViewFinancialStatus, &claim(Role::Staff, 1), Some(7)));
  }

  #[test]
  fn unknown_role_is_denied_everywhere() {
    let nobody = claim(Role::Unknown, 5);
    assert!(!allowed(Operation::EnrollMajor, &nobody, None));
    assert!(!allowed(Operation::EnrollEdition, &nobody, None));
    // Self-service views still work for the owner regardless of role.
    assert!(allowed(Operation::ViewFinancialStatus, &nobody, Some(5)));
  }
}
