//! Enrollment records and the receipts returned by the write workflows.
//!
//! A degree enrollment is paired 1:1 with a fresh fees account; unenrolling
//! flips the status to inactive and keeps both rows. Course-edition and
//! activity enrollments are unique per pair and never updated in place.

use serde::{Deserialize, Serialize};

use crate::{
  academics::{ActivityId, ClassId, CourseId, EditionId, MajorId},
  person::PersonId,
};

pub type FeesAccountId = i64;

/// Status of a degree enrollment. At most one `Active` row may exist per
/// student at any instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
  Active,
  Inactive,
}

/// Payment state of a fee obligation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeStatus {
  Pending,
  Paid,
}

// ─── Workflow receipts ───────────────────────────────────────────────────────

/// Returned by a successful degree enrollment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DegreeEnrollment {
  pub student_id:      PersonId,
  pub major_id:        MajorId,
  pub major_name:      String,
  pub fees:            f64,
  pub fees_account_id: FeesAccountId,
}

/// Returned by a successful degree unenrollment. The fees account survives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DegreeWithdrawal {
  pub student_id: PersonId,
  pub major_id:   MajorId,
  pub major_name: String,
}

/// Returned by a successful course-edition enrollment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditionEnrollment {
  pub student_id:  PersonId,
  pub edition_id:  EditionId,
  pub course_id:   CourseId,
  pub course_name: String,
  /// Classes the student was signed into, one attendance row each.
  pub classes:     Vec<ClassId>,
}

/// The fee obligation created alongside an activity enrollment, when the
/// activity charges one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityFee {
  pub fees:            f64,
  pub status:          FeeStatus,
  pub fees_account_id: FeesAccountId,
}

/// Returned by a successful activity enrollment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEnrollment {
  pub student_id:    PersonId,
  pub activity_id:   ActivityId,
  pub activity_name: String,
  pub fee:           Option<ActivityFee>,
}

/// One line of a student's course history, as shown by the detail view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseEnrollmentDetail {
  pub edition_id:  EditionId,
  pub course_name: String,
}
