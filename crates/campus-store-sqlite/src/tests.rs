//! Integration tests for `SqliteStore` against an in-memory database.

use campus_core::{
  Error as CoreError,
  academics::CourseEdition,
  access::Role,
  enrollment::{EnrollmentStatus, FeeStatus},
  grading::{GradeAction, GradeEntry},
  person::{NewPerson, PersonId},
  store::RegistryStore,
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn new_person(name: &str, email: &str) -> NewPerson {
  NewPerson {
    name:          name.into(),
    age:           20,
    gender:        "F".into(),
    nif:           format!("nif-{email}"),
    email:         Some(email.into()),
    address:       "Coimbra".into(),
    phone:         "912345678".into(),
    password_hash: "$argon2id$stub".into(),
  }
}

async fn seed_student(s: &SqliteStore, name: &str, email: &str) -> PersonId {
  let id = s.create_person(new_person(name, email)).await.unwrap();
  s.register_student(id, 0.0, None).await.unwrap();
  id
}

async fn seed_edition(s: &SqliteStore, course: &str, capacity: i64) -> CourseEdition {
  let course = s.add_course(course.into()).await.unwrap();
  s.add_edition(course.course_id, capacity, None).await.unwrap()
}

fn domain(err: Error) -> CoreError {
  match err {
    Error::Domain(e) => e,
    other => panic!("expected a domain error, got: {other}"),
  }
}

// ─── Persons ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_person() {
  let s = store().await;

  let id = s.create_person(new_person("Alice", "alice@example.com")).await.unwrap();
  let person = s.get_person(id).await.unwrap().expect("person");

  assert_eq!(person.person_id, id);
  assert_eq!(person.name, "Alice");
  assert_eq!(person.email.as_deref(), Some("alice@example.com"));
  assert_eq!(person.nif, "nif-alice@example.com");
  assert_eq!(person.address, "Coimbra");
  assert_eq!(person.phone, "912345678");
}

#[tokio::test]
async fn list_persons_returns_all_in_id_order() {
  let s = store().await;
  let a = s.create_person(new_person("A", "a@example.com")).await.unwrap();
  let b = s.create_person(new_person("B", "b@example.com")).await.unwrap();

  let all = s.list_persons().await.unwrap();
  assert_eq!(all.len(), 2);
  assert_eq!(all[0].person_id, a);
  assert_eq!(all[1].person_id, b);
}

#[tokio::test]
async fn find_credentials_by_email() {
  let s = store().await;
  let id = s.create_person(new_person("Alice", "alice@example.com")).await.unwrap();

  let creds = s
    .find_credentials("alice@example.com")
    .await
    .unwrap()
    .expect("credentials");
  assert_eq!(creds.person_id, id);
  assert_eq!(creds.password_hash, "$argon2id$stub");

  assert!(s.find_credentials("nobody@example.com").await.unwrap().is_none());
}

// ─── Role resolution ─────────────────────────────────────────────────────────

#[tokio::test]
async fn role_probe_precedence() {
  let s = store().await;

  let nobody = s.create_person(new_person("N", "n@example.com")).await.unwrap();
  assert_eq!(s.resolve_role(nobody).await.unwrap(), Role::Unknown);

  let staff = s.create_person(new_person("S", "s@example.com")).await.unwrap();
  s.register_staff(staff, 1200.0).await.unwrap();
  assert_eq!(s.resolve_role(staff).await.unwrap(), Role::Staff);

  let dept = s.add_department("Informatics".into()).await.unwrap();
  let lecturer = s.create_person(new_person("T", "t@example.com")).await.unwrap();
  s.register_instructor(lecturer, 2000.0, Some(dept.department_id))
    .await
    .unwrap();
  assert_eq!(s.resolve_role(lecturer).await.unwrap(), Role::Instructor);

  // Student membership wins over any worker membership.
  s.register_student(lecturer, 0.0, None).await.unwrap();
  assert_eq!(s.resolve_role(lecturer).await.unwrap(), Role::Student);
}

#[tokio::test]
async fn register_student_twice_errors() {
  let s = store().await;
  let id = seed_student(&s, "Alice", "alice@example.com").await;

  let err = s.register_student(id, 0.0, None).await.unwrap_err();
  assert!(matches!(domain(err), CoreError::AlreadyStudent(p) if p == id));
}

#[tokio::test]
async fn register_student_with_major_creates_active_enrollment() {
  let s = store().await;
  let major = s.add_major("Physics".into()).await.unwrap();
  let id = s.create_person(new_person("Alice", "alice@example.com")).await.unwrap();

  s.register_student(id, 0.0, Some(major.major_id)).await.unwrap();

  let status = s.financial_status(id).await.unwrap();
  assert_eq!(status.majors.len(), 1);
  assert_eq!(status.majors[0].name, "Physics");
  assert_eq!(status.majors[0].fees, 5000.0);
  assert_eq!(status.majors[0].status, "active");
}

#[tokio::test]
async fn register_instructor_requires_a_department() {
  let s = store().await;
  let id = s.create_person(new_person("T", "t@example.com")).await.unwrap();

  let err = s.register_instructor(id, 2000.0, None).await.unwrap_err();
  assert!(matches!(domain(err), CoreError::NoDepartmentAvailable));

  let dept = s.add_department("Informatics".into()).await.unwrap();
  let record = s.register_instructor(id, 2000.0, None).await.unwrap();
  assert_eq!(record.department_id, dept.department_id);
}

// ─── Degree enrollment ───────────────────────────────────────────────────────

#[tokio::test]
async fn enroll_major_creates_account_and_active_row() {
  let s = store().await;
  let sid = seed_student(&s, "Alice", "alice@example.com").await;
  let major = s.add_major("Physics".into()).await.unwrap();

  let receipt = s.enroll_major(sid, major.major_id).await.unwrap();
  assert_eq!(receipt.major_name, "Physics");
  assert_eq!(receipt.fees, 5000.0);

  let status = s.financial_status(sid).await.unwrap();
  assert_eq!(status.majors.len(), 1);
  assert_eq!(status.majors[0].status, "active");
  assert_eq!(status.majors[0].pending, 5000.0);
}

#[tokio::test]
async fn enroll_major_while_active_conflicts_and_names_held_major() {
  let s = store().await;
  let sid = seed_student(&s, "Alice", "alice@example.com").await;
  let physics = s.add_major("Physics".into()).await.unwrap();
  let maths = s.add_major("Maths".into()).await.unwrap();

  s.enroll_major(sid, physics.major_id).await.unwrap();

  let err = s.enroll_major(sid, maths.major_id).await.unwrap_err();
  match domain(err) {
    CoreError::ActiveMajorHeld { student_id, major_name } => {
      assert_eq!(student_id, sid);
      assert_eq!(major_name, "Physics");
    }
    other => panic!("expected ActiveMajorHeld, got: {other}"),
  }

  // No second enrollment row was created.
  let status = s.financial_status(sid).await.unwrap();
  assert_eq!(status.majors.len(), 1);
}

#[tokio::test]
async fn reenrolling_after_unenroll_creates_a_fresh_row() {
  let s = store().await;
  let sid = seed_student(&s, "Alice", "alice@example.com").await;
  let physics = s.add_major("Physics".into()).await.unwrap();
  let maths = s.add_major("Maths".into()).await.unwrap();

  s.enroll_major(sid, physics.major_id).await.unwrap();
  s.unenroll_major(sid).await.unwrap();
  s.enroll_major(sid, maths.major_id).await.unwrap();

  // History is preserved: two rows, exactly one active.
  let status = s.financial_status(sid).await.unwrap();
  assert_eq!(status.majors.len(), 2);
  let active: Vec<_> =
    status.majors.iter().filter(|l| l.status == "active").collect();
  assert_eq!(active.len(), 1);
  assert_eq!(active[0].name, "Maths");
}

#[tokio::test]
async fn unenroll_without_active_major_errors() {
  let s = store().await;
  let sid = seed_student(&s, "Alice", "alice@example.com").await;

  let err = s.unenroll_major(sid).await.unwrap_err();
  assert!(matches!(domain(err), CoreError::NotEnrolledInMajor(p) if p == sid));
}

#[tokio::test]
async fn enroll_major_unknown_student_or_major_is_not_found() {
  let s = store().await;
  let sid = seed_student(&s, "Alice", "alice@example.com").await;

  let err = s.enroll_major(999, 1).await.unwrap_err();
  assert!(matches!(domain(err), CoreError::StudentNotFound(999)));

  let err = s.enroll_major(sid, 999).await.unwrap_err();
  assert!(matches!(domain(err), CoreError::MajorNotFound(999)));
}

// ─── Course-edition enrollment ───────────────────────────────────────────────

#[tokio::test]
async fn enroll_edition_with_classes() {
  let s = store().await;
  let sid = seed_student(&s, "Alice", "alice@example.com").await;
  let edition = seed_edition(&s, "Databases", 30).await;
  let c1 = s.add_class(edition.edition_id, "T1".into()).await.unwrap();
  let c2 = s.add_class(edition.edition_id, "PL1".into()).await.unwrap();

  let receipt = s
    .enroll_edition(sid, edition.edition_id, vec![c1.class_id, c2.class_id])
    .await
    .unwrap();
  assert_eq!(receipt.course_name, "Databases");
  assert_eq!(receipt.classes, vec![c1.class_id, c2.class_id]);

  let details = s.student_details(sid).await.unwrap();
  assert_eq!(details.len(), 1);
  assert_eq!(details[0].edition_id, edition.edition_id);
}

#[tokio::test]
async fn enroll_edition_twice_in_same_course_errors() {
  let s = store().await;
  let sid = seed_student(&s, "Alice", "alice@example.com").await;
  let edition = seed_edition(&s, "Databases", 30).await;

  s.enroll_edition(sid, edition.edition_id, vec![]).await.unwrap();

  // A second edition of the same course is still the same course.
  let second = s
    .add_edition(edition.course_id, 30, None)
    .await
    .unwrap();
  let err = s.enroll_edition(sid, second.edition_id, vec![]).await.unwrap_err();
  assert!(matches!(
    domain(err),
    CoreError::AlreadyInCourse { course_name, .. } if course_name == "Databases"
  ));
}

#[tokio::test]
async fn enroll_edition_respects_capacity() {
  let s = store().await;
  let a = seed_student(&s, "A", "a@example.com").await;
  let b = seed_student(&s, "B", "b@example.com").await;
  let edition = seed_edition(&s, "Databases", 1).await;

  s.enroll_edition(a, edition.edition_id, vec![]).await.unwrap();

  let err = s.enroll_edition(b, edition.edition_id, vec![]).await.unwrap_err();
  assert!(matches!(
    domain(err),
    CoreError::EditionFull { capacity: 1, .. }
  ));
}

#[tokio::test]
async fn enroll_edition_rejects_classes_of_other_editions() {
  let s = store().await;
  let sid = seed_student(&s, "Alice", "alice@example.com").await;
  let databases = seed_edition(&s, "Databases", 30).await;
  let networks = seed_edition(&s, "Networks", 30).await;
  let foreign = s.add_class(networks.edition_id, "T1".into()).await.unwrap();

  let err = s
    .enroll_edition(sid, databases.edition_id, vec![foreign.class_id, 999])
    .await
    .unwrap_err();
  match domain(err) {
    CoreError::UnknownClasses(ids) => {
      assert_eq!(ids, vec![foreign.class_id, 999]);
    }
    other => panic!("expected UnknownClasses, got: {other}"),
  }

  // The rejected batch enrolled nothing.
  assert!(s.student_details(sid).await.unwrap().is_empty());
}

// ─── Activity enrollment ─────────────────────────────────────────────────────

#[tokio::test]
async fn enroll_activity_with_fee_creates_obligation() {
  let s = store().await;
  let sid = seed_student(&s, "Alice", "alice@example.com").await;
  let chess = s.add_activity("Chess".into(), 50.0).await.unwrap();

  let receipt = s.enroll_activity(sid, chess.activity_id).await.unwrap();
  let fee = receipt.fee.expect("fee obligation");
  assert_eq!(fee.fees, 50.0);
  assert_eq!(fee.status, FeeStatus::Pending);

  let status = s.financial_status(sid).await.unwrap();
  assert_eq!(status.activities.len(), 1);
  assert_eq!(status.activities[0].pending, 50.0);
}

#[tokio::test]
async fn enroll_free_activity_records_no_obligation() {
  let s = store().await;
  let sid = seed_student(&s, "Alice", "alice@example.com").await;
  let walks = s.add_activity("Hiking".into(), 0.0).await.unwrap();

  let receipt = s.enroll_activity(sid, walks.activity_id).await.unwrap();
  assert!(receipt.fee.is_none());

  // Enrolled, but nothing owed.
  let status = s.financial_status(sid).await.unwrap();
  assert!(status.activities.is_empty());
  assert_eq!(status.overall_summary.total_pending, 0.0);
}

#[tokio::test]
async fn enroll_activity_twice_errors() {
  let s = store().await;
  let sid = seed_student(&s, "Alice", "alice@example.com").await;
  let chess = s.add_activity("Chess".into(), 50.0).await.unwrap();

  s.enroll_activity(sid, chess.activity_id).await.unwrap();
  let err = s.enroll_activity(sid, chess.activity_id).await.unwrap_err();
  assert!(matches!(
    domain(err),
    CoreError::AlreadyInActivity { activity_name, .. } if activity_name == "Chess"
  ));
}

// ─── Grading ─────────────────────────────────────────────────────────────────

async fn seeded_edition_with_students(
  s: &SqliteStore,
) -> (CourseEdition, PersonId, PersonId) {
  let a = seed_student(s, "A", "a@example.com").await;
  let b = seed_student(s, "B", "b@example.com").await;
  let edition = seed_edition(s, "Databases", 30).await;
  s.enroll_edition(a, edition.edition_id, vec![]).await.unwrap();
  s.enroll_edition(b, edition.edition_id, vec![]).await.unwrap();
  (edition, a, b)
}

fn grade(student_id: PersonId, score: f64) -> GradeEntry {
  GradeEntry { student_id, score }
}

#[tokio::test]
async fn submit_grades_inserts_then_updates() {
  let s = store().await;
  let (edition, a, _) = seeded_edition_with_students(&s).await;

  let first = s
    .submit_grades(edition.edition_id, "S1".into(), vec![grade(a, 14.0)])
    .await
    .unwrap();
  assert_eq!(first.grades.len(), 1);
  assert_eq!(first.grades[0].action, GradeAction::Inserted);

  // Same pair again: exactly one row, action flips to updated.
  let second = s
    .submit_grades(edition.edition_id, "S1".into(), vec![grade(a, 14.0)])
    .await
    .unwrap();
  assert_eq!(second.grades[0].action, GradeAction::Updated);
  assert_eq!(second.grades[0].result_id, first.grades[0].result_id);

  let student = s.get_student(a).await.unwrap().unwrap();
  assert_eq!(student.mean, 14.0);
}

#[tokio::test]
async fn mean_is_the_average_over_all_results() {
  let s = store().await;
  let (databases, a, _) = seeded_edition_with_students(&s).await;
  let networks = seed_edition(&s, "Networks", 30).await;
  s.enroll_edition(a, networks.edition_id, vec![]).await.unwrap();

  s.submit_grades(databases.edition_id, "S1".into(), vec![grade(a, 10.0)])
    .await
    .unwrap();
  s.submit_grades(networks.edition_id, "S1".into(), vec![grade(a, 16.0)])
    .await
    .unwrap();

  let student = s.get_student(a).await.unwrap().unwrap();
  assert_eq!(student.mean, 13.0);

  // Overwriting one grade recomputes over the full result set.
  s.submit_grades(databases.edition_id, "S2".into(), vec![grade(a, 12.0)])
    .await
    .unwrap();
  let student = s.get_student(a).await.unwrap().unwrap();
  assert_eq!(student.mean, 14.0);
}

#[tokio::test]
async fn boundary_scores_are_accepted() {
  let s = store().await;
  let (edition, a, b) = seeded_edition_with_students(&s).await;

  let receipt = s
    .submit_grades(
      edition.edition_id,
      "S1".into(),
      vec![grade(a, 0.0), grade(b, 20.0)],
    )
    .await
    .unwrap();
  assert_eq!(receipt.grades.len(), 2);
}

#[tokio::test]
async fn out_of_range_score_rejects_the_whole_batch() {
  let s = store().await;
  let (edition, a, b) = seeded_edition_with_students(&s).await;

  for bad in [-0.1, 20.1] {
    let err = s
      .submit_grades(
        edition.edition_id,
        "S1".into(),
        vec![grade(a, 15.0), grade(b, bad)],
      )
      .await
      .unwrap_err();
    assert!(matches!(domain(err), CoreError::ScoresOutOfRange(_)));
  }

  // Nothing was applied, not even the valid entry.
  let student = s.get_student(a).await.unwrap().unwrap();
  assert_eq!(student.mean, 0.0);
}

#[tokio::test]
async fn grades_for_unenrolled_students_reject_the_whole_batch() {
  let s = store().await;
  let (edition, a, _) = seeded_edition_with_students(&s).await;
  let outsider = seed_student(&s, "X", "x@example.com").await;

  let err = s
    .submit_grades(
      edition.edition_id,
      "S1".into(),
      vec![grade(a, 15.0), grade(outsider, 12.0)],
    )
    .await
    .unwrap_err();
  assert!(matches!(
    domain(err),
    CoreError::NotEnrolledInEdition(ids) if ids == vec![outsider]
  ));

  let student = s.get_student(a).await.unwrap().unwrap();
  assert_eq!(student.mean, 0.0);
}

// ─── Financial status ────────────────────────────────────────────────────────

#[tokio::test]
async fn financial_status_without_any_records_is_not_found() {
  let s = store().await;
  let sid = seed_student(&s, "Alice", "alice@example.com").await;

  let err = s.financial_status(sid).await.unwrap_err();
  assert!(matches!(domain(err), CoreError::NoFinancialRecords(p) if p == sid));
}

#[tokio::test]
async fn financial_status_aggregates_majors_and_activities() {
  let s = store().await;
  let sid = seed_student(&s, "Alice", "alice@example.com").await;
  let major = s.add_major("Physics".into()).await.unwrap();
  let chess = s.add_activity("Chess".into(), 50.0).await.unwrap();

  s.enroll_major(sid, major.major_id).await.unwrap();
  s.enroll_activity(sid, chess.activity_id).await.unwrap();

  let status = s.financial_status(sid).await.unwrap();
  assert_eq!(status.majors_summary.total_fees, 5000.0);
  assert_eq!(status.activities_summary.total_fees, 50.0);
  assert_eq!(status.overall_summary.total_fees, 5050.0);
  assert_eq!(status.overall_summary.total_paid, 0.0);
  assert_eq!(status.overall_summary.total_pending, 5050.0);
}

// ─── Person deletion ─────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_student_cascades_everything() {
  let s = store().await;
  let sid = seed_student(&s, "Alice", "alice@example.com").await;
  let major = s.add_major("Physics".into()).await.unwrap();
  let edition = seed_edition(&s, "Databases", 30).await;
  let class = s.add_class(edition.edition_id, "T1".into()).await.unwrap();

  s.enroll_major(sid, major.major_id).await.unwrap();
  s.enroll_edition(sid, edition.edition_id, vec![class.class_id])
    .await
    .unwrap();
  s.submit_grades(edition.edition_id, "S1".into(), vec![grade(sid, 18.0)])
    .await
    .unwrap();
  s.submit_grades(edition.edition_id, "S2".into(), vec![grade(sid, 12.0)])
    .await
    .unwrap();

  s.delete_person(sid).await.unwrap();

  assert!(s.get_person(sid).await.unwrap().is_none());
  assert!(s.get_student(sid).await.unwrap().is_none());
  let err = s.financial_status(sid).await.unwrap_err();
  assert!(matches!(domain(err), CoreError::NoFinancialRecords(_)));
  let err = s.student_details(sid).await.unwrap_err();
  assert!(matches!(domain(err), CoreError::StudentNotFound(_)));

  // The seat opened up again.
  assert_eq!(s.resolve_role(sid).await.unwrap(), Role::Unknown);
}

#[tokio::test]
async fn delete_coordinator_detaches_their_editions() {
  let s = store().await;
  let dept = s.add_department("Informatics".into()).await.unwrap();
  let tid = s.create_person(new_person("T", "t@example.com")).await.unwrap();
  s.register_instructor(tid, 2000.0, Some(dept.department_id))
    .await
    .unwrap();

  let course = s.add_course("Databases".into()).await.unwrap();
  let edition = s.add_edition(course.course_id, 30, Some(tid)).await.unwrap();
  assert_eq!(edition.coordinator_id, Some(tid));

  s.delete_person(tid).await.unwrap();

  let detached = s.get_edition(edition.edition_id).await.unwrap().unwrap();
  assert_eq!(detached.coordinator_id, None);
  assert!(s.get_person(tid).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_unknown_person_is_not_found() {
  let s = store().await;
  let err = s.delete_person(404).await.unwrap_err();
  assert!(matches!(domain(err), CoreError::PersonNotFound(404)));
}

// ─── Status literals ─────────────────────────────────────────────────────────

#[test]
fn status_literals_match_the_schema() {
  use crate::encode::{encode_enrollment_status, encode_fee_status};

  assert_eq!(encode_enrollment_status(EnrollmentStatus::Active), "active");
  assert_eq!(encode_enrollment_status(EnrollmentStatus::Inactive), "inactive");
  assert_eq!(encode_fee_status(FeeStatus::Pending), "pending");
  assert_eq!(encode_fee_status(FeeStatus::Paid), "paid");
}
