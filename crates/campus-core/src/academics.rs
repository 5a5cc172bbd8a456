//! Catalog entities: departments, majors, courses, editions, classes, and
//! extracurricular activities.

use serde::{Deserialize, Serialize};

use crate::person::{DepartmentId, PersonId};

pub type MajorId = i64;
pub type CourseId = i64;
pub type EditionId = i64;
pub type ClassId = i64;
pub type ActivityId = i64;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Department {
  pub department_id: DepartmentId,
  pub name:          String,
}

/// A degree program students enroll in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Major {
  pub major_id: MajorId,
  pub name:     String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
  pub course_id: CourseId,
  pub name:      String,
}

/// One scheduled offering of a course, with a seat ceiling and an optional
/// coordinating instructor. Only the coordinator may submit grades.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseEdition {
  pub edition_id:     EditionId,
  pub course_id:      CourseId,
  pub course_name:    String,
  pub capacity:       i64,
  pub coordinator_id: Option<PersonId>,
}

/// A teaching unit inside an edition; attendance is tracked per class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseClass {
  pub class_id:   ClassId,
  pub edition_id: EditionId,
  pub name:       String,
}

/// An extracurricular activity. A zero fee means joining is free and no
/// fee obligation is recorded on enrollment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
  pub activity_id: ActivityId,
  pub name:        String,
  pub fee:         f64,
}
