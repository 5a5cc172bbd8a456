//! The `RegistryStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `campus-store-sqlite`). The HTTP layer depends on this abstraction, not
//! on any concrete backend. Write workflows are atomic units: a backend
//! must commit all statements of one method together or roll all of them
//! back.
//!
//! All methods return `Send` futures so the trait can be used in
//! multi-threaded async runtimes (e.g. tokio with `axum`).

use std::future::Future;

use crate::{
  academics::{
    Activity, ActivityId, ClassId, Course, CourseClass, CourseEdition,
    CourseId, Department, EditionId, Major, MajorId,
  },
  access::Role,
  enrollment::{
    ActivityEnrollment, CourseEnrollmentDetail, DegreeEnrollment,
    DegreeWithdrawal, EditionEnrollment,
  },
  finance::FinancialStatus,
  grading::{GradeEntry, GradeSubmission},
  person::{
    DepartmentId, Instructor, NewPerson, Person, PersonId, StaffMember,
    StoredCredentials, Student,
  },
};

/// Abstraction over the relational registry backend.
pub trait RegistryStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Persons ───────────────────────────────────────────────────────────

  /// Create a person and return the generated id.
  fn create_person(
    &self,
    input: NewPerson,
  ) -> impl Future<Output = Result<PersonId, Self::Error>> + Send + '_;

  /// Retrieve a person by id. Returns `None` if not found.
  fn get_person(
    &self,
    id: PersonId,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// List all persons, ordered by id.
  fn list_persons(
    &self,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// Look up the stored login material for an email address.
  fn find_credentials<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<StoredCredentials>, Self::Error>>
  + Send
  + 'a;

  /// Resolve a person's role by the ordered membership probe:
  /// student, then instructor, then staff, else [`Role::Unknown`].
  fn resolve_role(
    &self,
    id: PersonId,
  ) -> impl Future<Output = Result<Role, Self::Error>> + Send + '_;

  // ── Role registration ─────────────────────────────────────────────────

  /// Make a person a student. The enrolment date is set by the store.
  /// When `major_id` is given, a fees account and an active major
  /// enrollment are created in the same atomic unit.
  fn register_student(
    &self,
    person_id: PersonId,
    mean: f64,
    major_id: Option<MajorId>,
  ) -> impl Future<Output = Result<Student, Self::Error>> + Send + '_;

  /// Make a person a staff member (worker + staff rows).
  fn register_staff(
    &self,
    person_id: PersonId,
    salary: f64,
  ) -> impl Future<Output = Result<StaffMember, Self::Error>> + Send + '_;

  /// Make a person an instructor (worker + instructor rows). With no
  /// department given, the first available one is used.
  fn register_instructor(
    &self,
    person_id: PersonId,
    salary: f64,
    department_id: Option<DepartmentId>,
  ) -> impl Future<Output = Result<Instructor, Self::Error>> + Send + '_;

  // ── Catalog ───────────────────────────────────────────────────────────

  fn add_department(
    &self,
    name: String,
  ) -> impl Future<Output = Result<Department, Self::Error>> + Send + '_;

  fn add_major(
    &self,
    name: String,
  ) -> impl Future<Output = Result<Major, Self::Error>> + Send + '_;

  fn add_course(
    &self,
    name: String,
  ) -> impl Future<Output = Result<Course, Self::Error>> + Send + '_;

  fn add_edition(
    &self,
    course_id: CourseId,
    capacity: i64,
    coordinator_id: Option<PersonId>,
  ) -> impl Future<Output = Result<CourseEdition, Self::Error>> + Send + '_;

  fn add_class(
    &self,
    edition_id: EditionId,
    name: String,
  ) -> impl Future<Output = Result<CourseClass, Self::Error>> + Send + '_;

  fn add_activity(
    &self,
    name: String,
    fee: f64,
  ) -> impl Future<Output = Result<Activity, Self::Error>> + Send + '_;

  /// Retrieve an edition (with its course name and coordinator).
  /// The grading workflow uses this to check coordinator identity before
  /// any write.
  fn get_edition(
    &self,
    id: EditionId,
  ) -> impl Future<Output = Result<Option<CourseEdition>, Self::Error>> + Send + '_;

  /// Retrieve a student membership row. Returns `None` for non-students.
  fn get_student(
    &self,
    id: PersonId,
  ) -> impl Future<Output = Result<Option<Student>, Self::Error>> + Send + '_;

  // ── Enrollment workflows ──────────────────────────────────────────────

  /// Enroll a student in a major. Fails if an active major is already
  /// held. Always creates a fresh fees account and enrollment row; prior
  /// inactive rows are history and are never reused.
  fn enroll_major(
    &self,
    student_id: PersonId,
    major_id: MajorId,
  ) -> impl Future<Output = Result<DegreeEnrollment, Self::Error>> + Send + '_;

  /// Flip the student's active major enrollment to inactive. The fees
  /// account keeps its balance.
  fn unenroll_major(
    &self,
    student_id: PersonId,
  ) -> impl Future<Output = Result<DegreeWithdrawal, Self::Error>> + Send + '_;

  /// Enroll a student in a course edition and sign them into `classes`.
  /// Enforces course-level uniqueness and the edition's seat ceiling.
  fn enroll_edition(
    &self,
    student_id: PersonId,
    edition_id: EditionId,
    classes: Vec<ClassId>,
  ) -> impl Future<Output = Result<EditionEnrollment, Self::Error>> + Send + '_;

  /// Enroll a student in an activity; records a fee obligation (with a
  /// fresh fees account) when the activity charges one.
  fn enroll_activity(
    &self,
    student_id: PersonId,
    activity_id: ActivityId,
  ) -> impl Future<Output = Result<ActivityEnrollment, Self::Error>> + Send + '_;

  // ── Grading ───────────────────────────────────────────────────────────

  /// Apply a grade batch to an edition: validate every score and every
  /// student, upsert result rows, and recompute each affected student's
  /// mean. All-or-nothing.
  fn submit_grades(
    &self,
    edition_id: EditionId,
    period: String,
    grades: Vec<GradeEntry>,
  ) -> impl Future<Output = Result<GradeSubmission, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// A student's course history.
  fn student_details(
    &self,
    student_id: PersonId,
  ) -> impl Future<Output = Result<Vec<CourseEnrollmentDetail>, Self::Error>>
  + Send
  + '_;

  /// A student's tuition and activity balances. Fails when the student
  /// has no major and no activity records at all.
  fn financial_status(
    &self,
    student_id: PersonId,
  ) -> impl Future<Output = Result<FinancialStatus, Self::Error>> + Send + '_;

  // ── Lifecycle ─────────────────────────────────────────────────────────

  /// Delete a person and every row referencing them, children before
  /// parents, as one atomic unit.
  fn delete_person(
    &self,
    person_id: PersonId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
