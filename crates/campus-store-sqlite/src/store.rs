//! [`SqliteStore`] — the SQLite implementation of [`RegistryStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use campus_core::{
  Error as CoreError,
  academics::{
    Activity, ActivityId, ClassId, Course, CourseClass, CourseEdition,
    CourseId, Department, EditionId, Major, MajorId,
  },
  access::Role,
  enrollment::{
    ActivityEnrollment, ActivityFee, CourseEnrollmentDetail, DegreeEnrollment,
    DegreeWithdrawal, EditionEnrollment, EnrollmentStatus, FeeStatus,
  },
  finance::{FeeLine, FinancialStatus},
  grading::{
    self, GradeAction, GradeEntry, GradeOutcome, GradeSubmission,
  },
  person::{
    DepartmentId, Instructor, NewPerson, Person, PersonId, StaffMember,
    StoredCredentials, Student,
  },
  store::RegistryStore,
};

use crate::{
  Error, Result,
  encode::{RawStudent, encode_date, encode_enrollment_status, encode_fee_status},
  error::domain,
  schema::SCHEMA,
};

/// Tuition recorded on every fresh degree enrollment.
const DEFAULT_TUITION: f64 = 5000.00;

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Campus registry backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. All access
/// funnels through one connection thread, so workflows execute serially;
/// each workflow additionally runs in its own transaction.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── In-transaction helpers ──────────────────────────────────────────────────

fn person_exists(conn: &rusqlite::Connection, id: PersonId) -> rusqlite::Result<bool> {
  conn
    .query_row(
      "SELECT 1 FROM person WHERE person_id = ?1",
      rusqlite::params![id],
      |_| Ok(true),
    )
    .optional()
    .map(|r| r.unwrap_or(false))
}

fn student_exists(conn: &rusqlite::Connection, id: PersonId) -> rusqlite::Result<bool> {
  conn
    .query_row(
      "SELECT 1 FROM student WHERE person_id = ?1",
      rusqlite::params![id],
      |_| Ok(true),
    )
    .optional()
    .map(|r| r.unwrap_or(false))
}

fn membership_exists(
  conn: &rusqlite::Connection,
  table: &str,
  id: PersonId,
) -> rusqlite::Result<bool> {
  conn
    .query_row(
      &format!("SELECT 1 FROM {table} WHERE person_id = ?1"),
      rusqlite::params![id],
      |_| Ok(true),
    )
    .optional()
    .map(|r| r.unwrap_or(false))
}

/// The ordered membership probe: student, then instructor, then staff.
fn probe_role(conn: &rusqlite::Connection, id: PersonId) -> rusqlite::Result<Role> {
  if membership_exists(conn, "student", id)? {
    return Ok(Role::Student);
  }
  if membership_exists(conn, "instructor", id)? {
    return Ok(Role::Instructor);
  }
  if membership_exists(conn, "staff", id)? {
    return Ok(Role::Staff);
  }
  Ok(Role::Unknown)
}

fn fetch_edition(
  conn: &rusqlite::Connection,
  id: EditionId,
) -> rusqlite::Result<Option<CourseEdition>> {
  conn
    .query_row(
      "SELECT e.edition_id, e.course_id, c.name, e.capacity, e.coordinator_id
       FROM edition e
       JOIN course c ON c.course_id = e.course_id
       WHERE e.edition_id = ?1",
      rusqlite::params![id],
      |row| {
        Ok(CourseEdition {
          edition_id:     row.get(0)?,
          course_id:      row.get(1)?,
          course_name:    row.get(2)?,
          capacity:       row.get(3)?,
          coordinator_id: row.get(4)?,
        })
      },
    )
    .optional()
}

/// Create a fresh fees account and return its id.
fn create_fees_account(conn: &rusqlite::Connection) -> rusqlite::Result<i64> {
  conn.execute("INSERT INTO fees_account (paid_total) VALUES (0)", [])?;
  Ok(conn.last_insert_rowid())
}

fn person_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Person> {
  Ok(Person {
    person_id: row.get(0)?,
    name:      row.get(1)?,
    age:       row.get(2)?,
    gender:    row.get(3)?,
    nif:       row.get(4)?,
    email:     row.get(5)?,
    address:   row.get(6)?,
    phone:     row.get(7)?,
  })
}

const PERSON_COLUMNS: &str =
  "person_id, name, age, gender, nif, email, address, phone";

// ─── RegistryStore impl ──────────────────────────────────────────────────────

impl RegistryStore for SqliteStore {
  type Error = Error;

  // ── Persons ───────────────────────────────────────────────────────────────

  async fn create_person(&self, input: NewPerson) -> Result<PersonId> {
    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO person (name, age, gender, nif, email, address, phone, password_hash)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            input.name,
            input.age,
            input.gender,
            input.nif,
            input.email,
            input.address,
            input.phone,
            input.password_hash,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;
    Ok(id)
  }

  async fn get_person(&self, id: PersonId) -> Result<Option<Person>> {
    let person = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {PERSON_COLUMNS} FROM person WHERE person_id = ?1"),
              rusqlite::params![id],
              person_from_row,
            )
            .optional()?,
        )
      })
      .await?;
    Ok(person)
  }

  async fn list_persons(&self) -> Result<Vec<Person>> {
    let persons = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PERSON_COLUMNS} FROM person ORDER BY person_id"
        ))?;
        let rows = stmt
          .query_map([], person_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(persons)
  }

  async fn find_credentials(&self, email: &str) -> Result<Option<StoredCredentials>> {
    let email = email.to_owned();
    let creds = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT person_id, name, email, password_hash
               FROM person WHERE email = ?1",
              rusqlite::params![email],
              |row| {
                Ok(StoredCredentials {
                  person_id:     row.get(0)?,
                  name:          row.get(1)?,
                  email:         row.get(2)?,
                  password_hash: row.get(3)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;
    Ok(creds)
  }

  async fn resolve_role(&self, id: PersonId) -> Result<Role> {
    let role = self.conn.call(move |conn| Ok(probe_role(conn, id)?)).await?;
    Ok(role)
  }

  // ── Role registration ─────────────────────────────────────────────────────

  async fn register_student(
    &self,
    person_id: PersonId,
    mean: f64,
    major_id: Option<MajorId>,
  ) -> Result<Student> {
    let today = Utc::now().date_naive();
    let date_str = encode_date(today);

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        if !person_exists(&tx, person_id)? {
          return Err(domain(CoreError::PersonNotFound(person_id)));
        }
        if student_exists(&tx, person_id)? {
          return Err(domain(CoreError::AlreadyStudent(person_id)));
        }

        tx.execute(
          "INSERT INTO student (person_id, enrolment_date, mean) VALUES (?1, ?2, ?3)",
          rusqlite::params![person_id, date_str, mean],
        )?;

        if let Some(major_id) = major_id {
          let major: Option<String> = tx
            .query_row(
              "SELECT name FROM major WHERE major_id = ?1",
              rusqlite::params![major_id],
              |row| row.get(0),
            )
            .optional()?;
          if major.is_none() {
            return Err(domain(CoreError::MajorNotFound(major_id)));
          }

          let account_id = create_fees_account(&tx)?;
          tx.execute(
            "INSERT INTO major_enrollment (student_id, major_id, fees, status, account_id)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
              person_id,
              major_id,
              DEFAULT_TUITION,
              encode_enrollment_status(EnrollmentStatus::Active),
              account_id,
            ],
          )?;
        }

        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(Student { person_id, enrolment_date: today, mean })
  }

  async fn register_staff(&self, person_id: PersonId, salary: f64) -> Result<StaffMember> {
    let today = Utc::now().date_naive();
    let date_str = encode_date(today);

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        if !person_exists(&tx, person_id)? {
          return Err(domain(CoreError::PersonNotFound(person_id)));
        }
        if membership_exists(&tx, "staff", person_id)? {
          return Err(domain(CoreError::AlreadyStaff(person_id)));
        }

        // The worker row may already exist if the person is an instructor.
        tx.execute(
          "INSERT OR IGNORE INTO worker (person_id, salary, started_working)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![person_id, salary, date_str],
        )?;
        tx.execute(
          "INSERT INTO staff (person_id) VALUES (?1)",
          rusqlite::params![person_id],
        )?;

        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(StaffMember { person_id, salary, started_working: today })
  }

  async fn register_instructor(
    &self,
    person_id: PersonId,
    salary: f64,
    department_id: Option<DepartmentId>,
  ) -> Result<Instructor> {
    let today = Utc::now().date_naive();
    let date_str = encode_date(today);

    let department_id = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        if !person_exists(&tx, person_id)? {
          return Err(domain(CoreError::PersonNotFound(person_id)));
        }
        if membership_exists(&tx, "instructor", person_id)? {
          return Err(domain(CoreError::AlreadyInstructor(person_id)));
        }

        // With no department given, fall back to the first available one.
        let department_id = match department_id {
          Some(id) => id,
          None => tx
            .query_row(
              "SELECT department_id FROM department ORDER BY department_id LIMIT 1",
              [],
              |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| domain(CoreError::NoDepartmentAvailable))?,
        };

        tx.execute(
          "INSERT OR IGNORE INTO worker (person_id, salary, started_working)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![person_id, salary, date_str],
        )?;
        tx.execute(
          "INSERT INTO instructor (person_id, department_id) VALUES (?1, ?2)",
          rusqlite::params![person_id, department_id],
        )?;

        tx.commit()?;
        Ok(department_id)
      })
      .await?;

    Ok(Instructor {
      person_id,
      salary,
      started_working: today,
      department_id,
    })
  }

  // ── Catalog ───────────────────────────────────────────────────────────────

  async fn add_department(&self, name: String) -> Result<Department> {
    let stored_name = name.clone();
    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO department (name) VALUES (?1)",
          rusqlite::params![stored_name],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;
    Ok(Department { department_id: id, name })
  }

  async fn add_major(&self, name: String) -> Result<Major> {
    let stored_name = name.clone();
    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO major (name) VALUES (?1)",
          rusqlite::params![stored_name],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;
    Ok(Major { major_id: id, name })
  }

  async fn add_course(&self, name: String) -> Result<Course> {
    let stored_name = name.clone();
    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO course (name) VALUES (?1)",
          rusqlite::params![stored_name],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;
    Ok(Course { course_id: id, name })
  }

  async fn add_edition(
    &self,
    course_id: CourseId,
    capacity: i64,
    coordinator_id: Option<PersonId>,
  ) -> Result<CourseEdition> {
    let edition = self
      .conn
      .call(move |conn| {
        let course_name: Option<String> = conn
          .query_row(
            "SELECT name FROM course WHERE course_id = ?1",
            rusqlite::params![course_id],
            |row| row.get(0),
          )
          .optional()?;
        let course_name = course_name
          .ok_or_else(|| domain(CoreError::CourseNotFound(course_id)))?;

        conn.execute(
          "INSERT INTO edition (course_id, capacity, coordinator_id)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![course_id, capacity, coordinator_id],
        )?;

        Ok(CourseEdition {
          edition_id: conn.last_insert_rowid(),
          course_id,
          course_name,
          capacity,
          coordinator_id,
        })
      })
      .await?;
    Ok(edition)
  }

  async fn add_class(&self, edition_id: EditionId, name: String) -> Result<CourseClass> {
    let stored_name = name.clone();
    let id = self
      .conn
      .call(move |conn| {
        if fetch_edition(conn, edition_id)?.is_none() {
          return Err(domain(CoreError::EditionNotFound(edition_id)));
        }
        conn.execute(
          "INSERT INTO class (edition_id, name) VALUES (?1, ?2)",
          rusqlite::params![edition_id, stored_name],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;
    Ok(CourseClass { class_id: id, edition_id, name })
  }

  async fn add_activity(&self, name: String, fee: f64) -> Result<Activity> {
    let stored_name = name.clone();
    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO activity (name, fee) VALUES (?1, ?2)",
          rusqlite::params![stored_name, fee],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;
    Ok(Activity { activity_id: id, name, fee })
  }

  async fn get_edition(&self, id: EditionId) -> Result<Option<CourseEdition>> {
    let edition = self
      .conn
      .call(move |conn| Ok(fetch_edition(conn, id)?))
      .await?;
    Ok(edition)
  }

  async fn get_student(&self, id: PersonId) -> Result<Option<Student>> {
    let raw: Option<RawStudent> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT person_id, enrolment_date, mean FROM student WHERE person_id = ?1",
              rusqlite::params![id],
              |row| {
                Ok(RawStudent {
                  person_id:      row.get(0)?,
                  enrolment_date: row.get(1)?,
                  mean:           row.get(2)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawStudent::into_student).transpose()
  }

  // ── Enrollment workflows ──────────────────────────────────────────────────

  async fn enroll_major(
    &self,
    student_id: PersonId,
    major_id: MajorId,
  ) -> Result<DegreeEnrollment> {
    let enrollment = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        if !student_exists(&tx, student_id)? {
          return Err(domain(CoreError::StudentNotFound(student_id)));
        }

        let major_name: Option<String> = tx
          .query_row(
            "SELECT name FROM major WHERE major_id = ?1",
            rusqlite::params![major_id],
            |row| row.get(0),
          )
          .optional()?;
        let major_name =
          major_name.ok_or_else(|| domain(CoreError::MajorNotFound(major_id)))?;

        // An active enrollment blocks; unenrollment is required first.
        let held: Option<String> = tx
          .query_row(
            "SELECT m.name
             FROM major_enrollment me
             JOIN major m ON m.major_id = me.major_id
             WHERE me.student_id = ?1 AND me.status = 'active'",
            rusqlite::params![student_id],
            |row| row.get(0),
          )
          .optional()?;
        if let Some(held_name) = held {
          return Err(domain(CoreError::ActiveMajorHeld {
            student_id,
            major_name: held_name,
          }));
        }

        // Always a fresh account and a fresh row; inactive rows are history.
        let account_id = create_fees_account(&tx)?;
        tx.execute(
          "INSERT INTO major_enrollment (student_id, major_id, fees, status, account_id)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![
            student_id,
            major_id,
            DEFAULT_TUITION,
            encode_enrollment_status(EnrollmentStatus::Active),
            account_id,
          ],
        )?;

        tx.commit()?;
        Ok(DegreeEnrollment {
          student_id,
          major_id,
          major_name,
          fees: DEFAULT_TUITION,
          fees_account_id: account_id,
        })
      })
      .await?;
    Ok(enrollment)
  }

  async fn unenroll_major(&self, student_id: PersonId) -> Result<DegreeWithdrawal> {
    let withdrawal = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        if !student_exists(&tx, student_id)? {
          return Err(domain(CoreError::StudentNotFound(student_id)));
        }

        let current: Option<(i64, MajorId, String)> = tx
          .query_row(
            "SELECT me.enrollment_id, me.major_id, m.name
             FROM major_enrollment me
             JOIN major m ON m.major_id = me.major_id
             WHERE me.student_id = ?1 AND me.status = 'active'",
            rusqlite::params![student_id],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
          )
          .optional()?;
        let (enrollment_id, major_id, major_name) = current
          .ok_or_else(|| domain(CoreError::NotEnrolledInMajor(student_id)))?;

        // The fees account keeps its balance; nothing is deleted.
        tx.execute(
          "UPDATE major_enrollment SET status = ?1 WHERE enrollment_id = ?2",
          rusqlite::params![
            encode_enrollment_status(EnrollmentStatus::Inactive),
            enrollment_id,
          ],
        )?;

        tx.commit()?;
        Ok(DegreeWithdrawal { student_id, major_id, major_name })
      })
      .await?;
    Ok(withdrawal)
  }

  async fn enroll_edition(
    &self,
    student_id: PersonId,
    edition_id: EditionId,
    classes: Vec<ClassId>,
  ) -> Result<EditionEnrollment> {
    // A class listed twice is one sign-up.
    let mut classes = classes;
    classes.sort_unstable();
    classes.dedup();

    let enrollment = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        if !student_exists(&tx, student_id)? {
          return Err(domain(CoreError::StudentNotFound(student_id)));
        }

        let edition = fetch_edition(&tx, edition_id)?
          .ok_or_else(|| domain(CoreError::EditionNotFound(edition_id)))?;

        let already: Option<i64> = tx
          .query_row(
            "SELECT 1 FROM course_enrollment
             WHERE student_id = ?1 AND course_id = ?2",
            rusqlite::params![student_id, edition.course_id],
            |row| row.get(0),
          )
          .optional()?;
        if already.is_some() {
          return Err(domain(CoreError::AlreadyInCourse {
            student_id,
            course_name: edition.course_name,
          }));
        }

        let seated: i64 = tx.query_row(
          "SELECT COUNT(*) FROM course_enrollment WHERE course_id = ?1",
          rusqlite::params![edition.course_id],
          |row| row.get(0),
        )?;
        if seated >= edition.capacity {
          return Err(domain(CoreError::EditionFull {
            edition_id,
            capacity: edition.capacity,
          }));
        }

        // Every supplied class must belong to this edition.
        let mut unknown = Vec::new();
        for &class_id in &classes {
          let found: Option<i64> = tx
            .query_row(
              "SELECT 1 FROM class WHERE class_id = ?1 AND edition_id = ?2",
              rusqlite::params![class_id, edition_id],
              |row| row.get(0),
            )
            .optional()?;
          if found.is_none() {
            unknown.push(class_id);
          }
        }
        if !unknown.is_empty() {
          return Err(domain(CoreError::UnknownClasses(unknown)));
        }

        tx.execute(
          "INSERT INTO course_enrollment (student_id, course_id, edition_id)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![student_id, edition.course_id, edition_id],
        )?;
        for &class_id in &classes {
          tx.execute(
            "INSERT INTO attendance (student_id, class_id, present) VALUES (?1, ?2, 0)",
            rusqlite::params![student_id, class_id],
          )?;
        }

        tx.commit()?;
        Ok(EditionEnrollment {
          student_id,
          edition_id,
          course_id: edition.course_id,
          course_name: edition.course_name,
          classes,
        })
      })
      .await?;
    Ok(enrollment)
  }

  async fn enroll_activity(
    &self,
    student_id: PersonId,
    activity_id: ActivityId,
  ) -> Result<ActivityEnrollment> {
    let enrollment = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        if !student_exists(&tx, student_id)? {
          return Err(domain(CoreError::StudentNotFound(student_id)));
        }

        let activity: Option<(String, f64)> = tx
          .query_row(
            "SELECT name, fee FROM activity WHERE activity_id = ?1",
            rusqlite::params![activity_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
          )
          .optional()?;
        let (activity_name, fee) = activity
          .ok_or_else(|| domain(CoreError::ActivityNotFound(activity_id)))?;

        let already: Option<i64> = tx
          .query_row(
            "SELECT 1 FROM activity_enrollment
             WHERE student_id = ?1 AND activity_id = ?2",
            rusqlite::params![student_id, activity_id],
            |row| row.get(0),
          )
          .optional()?;
        if already.is_some() {
          return Err(domain(CoreError::AlreadyInActivity {
            student_id,
            activity_name,
          }));
        }

        tx.execute(
          "INSERT INTO activity_enrollment (student_id, activity_id) VALUES (?1, ?2)",
          rusqlite::params![student_id, activity_id],
        )?;

        // A free activity records no obligation.
        let fee_receipt = if fee > 0.0 {
          let account_id = create_fees_account(&tx)?;
          tx.execute(
            "INSERT INTO activity_fee (student_id, activity_id, fees, status, account_id)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
              student_id,
              activity_id,
              fee,
              encode_fee_status(FeeStatus::Pending),
              account_id,
            ],
          )?;
          Some(ActivityFee {
            fees: fee,
            status: FeeStatus::Pending,
            fees_account_id: account_id,
          })
        } else {
          None
        };

        tx.commit()?;
        Ok(ActivityEnrollment {
          student_id,
          activity_id,
          activity_name,
          fee: fee_receipt,
        })
      })
      .await?;
    Ok(enrollment)
  }

  // ── Grading ───────────────────────────────────────────────────────────────

  async fn submit_grades(
    &self,
    edition_id: EditionId,
    period: String,
    grades: Vec<GradeEntry>,
  ) -> Result<GradeSubmission> {
    let submission = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let edition = fetch_edition(&tx, edition_id)?
          .ok_or_else(|| domain(CoreError::EditionNotFound(edition_id)))?;

        // One bad entry rejects the whole batch.
        let bad = grading::out_of_range(&grades);
        if !bad.is_empty() {
          return Err(domain(CoreError::ScoresOutOfRange(bad)));
        }

        let mut missing = Vec::new();
        for entry in &grades {
          let enrolled: Option<i64> = tx
            .query_row(
              "SELECT 1 FROM course_enrollment
               WHERE student_id = ?1 AND course_id = ?2",
              rusqlite::params![entry.student_id, edition.course_id],
              |row| row.get(0),
            )
            .optional()?;
          if enrolled.is_none() {
            missing.push(entry.student_id);
          }
        }
        if !missing.is_empty() {
          return Err(domain(CoreError::NotEnrolledInEdition(missing)));
        }

        let mut outcomes = Vec::with_capacity(grades.len());
        for entry in &grades {
          let existing: Option<i64> = tx
            .query_row(
              "SELECT result_id FROM result
               WHERE student_id = ?1 AND edition_id = ?2",
              rusqlite::params![entry.student_id, edition_id],
              |row| row.get(0),
            )
            .optional()?;

          let (result_id, action) = match existing {
            Some(result_id) => {
              tx.execute(
                "UPDATE result SET score = ?1 WHERE result_id = ?2",
                rusqlite::params![entry.score, result_id],
              )?;
              (result_id, GradeAction::Updated)
            }
            None => {
              tx.execute(
                "INSERT INTO result (student_id, edition_id, score) VALUES (?1, ?2, ?3)",
                rusqlite::params![entry.student_id, edition_id, entry.score],
              )?;
              (tx.last_insert_rowid(), GradeAction::Inserted)
            }
          };

          outcomes.push(GradeOutcome {
            student_id: entry.student_id,
            score: entry.score,
            result_id,
            action,
          });
        }

        // Recompute each affected student's running mean.
        for entry in &grades {
          tx.execute(
            "UPDATE student
             SET mean = (SELECT AVG(score) FROM result WHERE student_id = ?1)
             WHERE person_id = ?1",
            rusqlite::params![entry.student_id],
          )?;
        }

        tx.commit()?;
        Ok(GradeSubmission {
          edition_id,
          course_name: edition.course_name,
          period,
          grades: outcomes,
        })
      })
      .await?;
    Ok(submission)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn student_details(
    &self,
    student_id: PersonId,
  ) -> Result<Vec<CourseEnrollmentDetail>> {
    let details = self
      .conn
      .call(move |conn| {
        if !student_exists(conn, student_id)? {
          return Err(domain(CoreError::StudentNotFound(student_id)));
        }

        let mut stmt = conn.prepare(
          "SELECT ce.edition_id, c.name
           FROM course_enrollment ce
           JOIN course c ON c.course_id = ce.course_id
           WHERE ce.student_id = ?1
           ORDER BY ce.edition_id DESC, c.name",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![student_id], |row| {
            Ok(CourseEnrollmentDetail {
              edition_id:  row.get(0)?,
              course_name: row.get(1)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(details)
  }

  async fn financial_status(&self, student_id: PersonId) -> Result<FinancialStatus> {
    let status = self
      .conn
      .call(move |conn| {
        let has_major: Option<i64> = conn
          .query_row(
            "SELECT 1 FROM major_enrollment WHERE student_id = ?1 LIMIT 1",
            rusqlite::params![student_id],
            |row| row.get(0),
          )
          .optional()?;
        let has_activity: Option<i64> = conn
          .query_row(
            "SELECT 1 FROM activity_enrollment WHERE student_id = ?1 LIMIT 1",
            rusqlite::params![student_id],
            |row| row.get(0),
          )
          .optional()?;
        if has_major.is_none() && has_activity.is_none() {
          return Err(domain(CoreError::NoFinancialRecords(student_id)));
        }

        let mut stmt = conn.prepare(
          "SELECT m.name, me.fees, fa.paid_total, me.status
           FROM major_enrollment me
           JOIN major m ON m.major_id = me.major_id
           JOIN fees_account fa ON fa.account_id = me.account_id
           WHERE me.student_id = ?1
           ORDER BY me.enrollment_id",
        )?;
        let majors = stmt
          .query_map(rusqlite::params![student_id], |row| {
            Ok(FeeLine::new(row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = conn.prepare(
          "SELECT a.name, af.fees, fa.paid_total, af.status
           FROM activity_fee af
           JOIN activity a ON a.activity_id = af.activity_id
           JOIN fees_account fa ON fa.account_id = af.account_id
           WHERE af.student_id = ?1
           ORDER BY af.activity_id",
        )?;
        let activities = stmt
          .query_map(rusqlite::params![student_id], |row| {
            Ok(FeeLine::new(row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(FinancialStatus::assemble(majors, activities))
      })
      .await?;
    Ok(status)
  }

  // ── Lifecycle ─────────────────────────────────────────────────────────────

  async fn delete_person(&self, person_id: PersonId) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        if !person_exists(&tx, person_id)? {
          return Err(domain(CoreError::PersonNotFound(person_id)));
        }

        // Children before parents. The full ordered list runs regardless
        // of the role probe's answer so that a person holding more than
        // one membership (the schema cannot rule it out) leaves no
        // orphan rows behind.
        tx.execute(
          "DELETE FROM attendance WHERE student_id = ?1",
          rusqlite::params![person_id],
        )?;
        tx.execute(
          "DELETE FROM result WHERE student_id = ?1",
          rusqlite::params![person_id],
        )?;
        tx.execute(
          "DELETE FROM course_enrollment WHERE student_id = ?1",
          rusqlite::params![person_id],
        )?;

        // Fee obligations and their accounts.
        let mut account_ids: Vec<i64> = Vec::new();
        {
          let mut stmt = tx.prepare(
            "SELECT account_id FROM activity_fee WHERE student_id = ?1",
          )?;
          account_ids.extend(
            stmt
              .query_map(rusqlite::params![person_id], |row| row.get::<_, i64>(0))?
              .collect::<rusqlite::Result<Vec<_>>>()?,
          );
          let mut stmt = tx.prepare(
            "SELECT account_id FROM major_enrollment WHERE student_id = ?1",
          )?;
          account_ids.extend(
            stmt
              .query_map(rusqlite::params![person_id], |row| row.get::<_, i64>(0))?
              .collect::<rusqlite::Result<Vec<_>>>()?,
          );
        }
        tx.execute(
          "DELETE FROM activity_fee WHERE student_id = ?1",
          rusqlite::params![person_id],
        )?;
        tx.execute(
          "DELETE FROM activity_enrollment WHERE student_id = ?1",
          rusqlite::params![person_id],
        )?;
        tx.execute(
          "DELETE FROM major_enrollment WHERE student_id = ?1",
          rusqlite::params![person_id],
        )?;
        for account_id in account_ids {
          tx.execute(
            "DELETE FROM fees_account WHERE account_id = ?1",
            rusqlite::params![account_id],
          )?;
        }

        tx.execute(
          "DELETE FROM student WHERE person_id = ?1",
          rusqlite::params![person_id],
        )?;

        // Worker side: coordinated editions keep running, uncoordinated.
        tx.execute(
          "UPDATE edition SET coordinator_id = NULL WHERE coordinator_id = ?1",
          rusqlite::params![person_id],
        )?;
        tx.execute(
          "DELETE FROM class_assistant WHERE instructor_id = ?1",
          rusqlite::params![person_id],
        )?;
        tx.execute(
          "DELETE FROM instructor WHERE person_id = ?1",
          rusqlite::params![person_id],
        )?;
        tx.execute(
          "DELETE FROM staff WHERE person_id = ?1",
          rusqlite::params![person_id],
        )?;
        tx.execute(
          "DELETE FROM worker WHERE person_id = ?1",
          rusqlite::params![person_id],
        )?;

        tx.execute(
          "DELETE FROM person WHERE person_id = ?1",
          rusqlite::params![person_id],
        )?;

        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
