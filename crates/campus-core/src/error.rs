//! Error types for `campus-core`.

use thiserror::Error;

use crate::{
  academics::{ActivityId, ClassId, CourseId, EditionId, MajorId},
  person::PersonId,
};

/// The failure taxonomy a domain error belongs to. The HTTP layer maps each
/// kind to a status code; the store never needs to know about HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// A referenced entity does not exist.
  NotFound,
  /// The current state already satisfies (or forbids) the precondition.
  Conflict,
  /// Malformed input or a business-rule violation.
  Invalid,
  /// Unexpected store failure; the enclosing atomic unit was rolled back.
  Internal,
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("person {0} not found")]
  PersonNotFound(PersonId),

  #[error("student {0} not found")]
  StudentNotFound(PersonId),

  #[error("major {0} not found")]
  MajorNotFound(MajorId),

  #[error("course {0} not found")]
  CourseNotFound(CourseId),

  #[error("course edition {0} not found")]
  EditionNotFound(EditionId),

  #[error("activity {0} not found")]
  ActivityNotFound(ActivityId),

  #[error("person {0} is already a student")]
  AlreadyStudent(PersonId),

  #[error("person {0} is already a staff member")]
  AlreadyStaff(PersonId),

  #[error("person {0} is already an instructor")]
  AlreadyInstructor(PersonId),

  #[error("no department available")]
  NoDepartmentAvailable,

  /// The student already holds an active major; unenrollment comes first.
  #[error("student {student_id} already holds an active major: {major_name}; unenroll first")]
  ActiveMajorHeld {
    student_id: PersonId,
    major_name: String,
  },

  #[error("student {0} is not enrolled in any major")]
  NotEnrolledInMajor(PersonId),

  #[error("student {student_id} is already enrolled in course: {course_name}")]
  AlreadyInCourse {
    student_id:  PersonId,
    course_name: String,
  },

  #[error("course edition {edition_id} is at maximum capacity ({capacity})")]
  EditionFull {
    edition_id: EditionId,
    capacity:   i64,
  },

  #[error("class ids {0:?} do not belong to this edition")]
  UnknownClasses(Vec<ClassId>),

  #[error("student {student_id} is already enrolled in activity: {activity_name}")]
  AlreadyInActivity {
    student_id:    PersonId,
    activity_name: String,
  },

  /// One bad score rejects the whole batch; no partial application.
  #[error("scores must be between 0 and 20, got: {0:?}")]
  ScoresOutOfRange(Vec<(PersonId, f64)>),

  #[error("students {0:?} are not enrolled in this course edition")]
  NotEnrolledInEdition(Vec<PersonId>),

  #[error("student {0} has no major or activity records")]
  NoFinancialRecords(PersonId),

  #[error("store error: {0}")]
  Internal(String),
}

impl Error {
  /// Where this error falls in the failure taxonomy.
  pub fn kind(&self) -> ErrorKind {
    match self {
      Error::PersonNotFound(_)
      | Error::StudentNotFound(_)
      | Error::MajorNotFound(_)
      | Error::CourseNotFound(_)
      | Error::EditionNotFound(_)
      | Error::ActivityNotFound(_)
      | Error::NoFinancialRecords(_) => ErrorKind::NotFound,

      Error::ActiveMajorHeld { .. } => ErrorKind::Conflict,

      Error::AlreadyStudent(_)
      | Error::AlreadyStaff(_)
      | Error::AlreadyInstructor(_)
      | Error::NoDepartmentAvailable
      | Error::NotEnrolledInMajor(_)
      | Error::AlreadyInCourse { .. }
      | Error::EditionFull { .. }
      | Error::UnknownClasses(_)
      | Error::AlreadyInActivity { .. }
      | Error::ScoresOutOfRange(_)
      | Error::NotEnrolledInEdition(_) => ErrorKind::Invalid,

      Error::Internal(_) => ErrorKind::Internal,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
