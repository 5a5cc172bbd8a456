//! SQL schema for the Campus SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Uniqueness rules the workflows rely on are also declared here: one
/// active major per student (partial unique index), one enrollment per
/// (student, course), one result per (student, edition). The workflows
/// check first and report the domain error; the indexes close the window
/// a concurrent writer would otherwise have.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS person (
    person_id     INTEGER PRIMARY KEY,
    name          TEXT NOT NULL,
    age           INTEGER NOT NULL,
    gender        TEXT NOT NULL,
    nif           TEXT NOT NULL,    -- national id; natural key, not enforced
    email         TEXT UNIQUE,
    address       TEXT NOT NULL,
    phone         TEXT NOT NULL,
    password_hash TEXT NOT NULL     -- argon2 PHC string
);

-- Role memberships: 1:1 extensions of person.
CREATE TABLE IF NOT EXISTS student (
    person_id      INTEGER PRIMARY KEY REFERENCES person(person_id),
    enrolment_date TEXT NOT NULL,   -- ISO 8601 date
    mean           REAL NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS worker (
    person_id       INTEGER PRIMARY KEY REFERENCES person(person_id),
    salary          REAL NOT NULL,
    started_working TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS department (
    department_id INTEGER PRIMARY KEY,
    name          TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS instructor (
    person_id     INTEGER PRIMARY KEY REFERENCES worker(person_id),
    department_id INTEGER NOT NULL REFERENCES department(department_id)
);

CREATE TABLE IF NOT EXISTS staff (
    person_id INTEGER PRIMARY KEY REFERENCES worker(person_id)
);

CREATE TABLE IF NOT EXISTS major (
    major_id INTEGER PRIMARY KEY,
    name     TEXT NOT NULL
);

-- Monotonic paid-amount ledger; one account per fee obligation, never
-- shared across enrollments.
CREATE TABLE IF NOT EXISTS fees_account (
    account_id INTEGER PRIMARY KEY,
    paid_total REAL NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS major_enrollment (
    enrollment_id INTEGER PRIMARY KEY,
    student_id    INTEGER NOT NULL REFERENCES student(person_id),
    major_id      INTEGER NOT NULL REFERENCES major(major_id),
    fees          REAL NOT NULL,
    status        TEXT NOT NULL,   -- 'active' | 'inactive'
    account_id    INTEGER NOT NULL REFERENCES fees_account(account_id)
);

CREATE TABLE IF NOT EXISTS course (
    course_id INTEGER PRIMARY KEY,
    name      TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS edition (
    edition_id     INTEGER PRIMARY KEY,
    course_id      INTEGER NOT NULL REFERENCES course(course_id),
    capacity       INTEGER NOT NULL,
    coordinator_id INTEGER REFERENCES instructor(person_id)
);

CREATE TABLE IF NOT EXISTS class (
    class_id   INTEGER PRIMARY KEY,
    edition_id INTEGER NOT NULL REFERENCES edition(edition_id),
    name       TEXT NOT NULL
);

-- Uniqueness is by course identity, not edition identity.
CREATE TABLE IF NOT EXISTS course_enrollment (
    student_id INTEGER NOT NULL REFERENCES student(person_id),
    course_id  INTEGER NOT NULL REFERENCES course(course_id),
    edition_id INTEGER NOT NULL REFERENCES edition(edition_id),
    UNIQUE (student_id, course_id)
);

CREATE TABLE IF NOT EXISTS attendance (
    student_id INTEGER NOT NULL REFERENCES student(person_id),
    class_id   INTEGER NOT NULL REFERENCES class(class_id),
    present    INTEGER NOT NULL DEFAULT 0,
    UNIQUE (student_id, class_id)
);

CREATE TABLE IF NOT EXISTS activity (
    activity_id INTEGER PRIMARY KEY,
    name        TEXT NOT NULL,
    fee         REAL NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS activity_enrollment (
    student_id  INTEGER NOT NULL REFERENCES student(person_id),
    activity_id INTEGER NOT NULL REFERENCES activity(activity_id),
    UNIQUE (student_id, activity_id)
);

CREATE TABLE IF NOT EXISTS activity_fee (
    student_id  INTEGER NOT NULL REFERENCES student(person_id),
    activity_id INTEGER NOT NULL REFERENCES activity(activity_id),
    fees        REAL NOT NULL,
    status      TEXT NOT NULL,   -- 'pending' | 'paid'
    account_id  INTEGER NOT NULL REFERENCES fees_account(account_id),
    UNIQUE (student_id, activity_id)
);

-- Later submissions overwrite; never a second row per pair.
CREATE TABLE IF NOT EXISTS result (
    result_id  INTEGER PRIMARY KEY,
    student_id INTEGER NOT NULL REFERENCES student(person_id),
    edition_id INTEGER NOT NULL REFERENCES edition(edition_id),
    score      REAL NOT NULL,
    UNIQUE (student_id, edition_id)
);

CREATE TABLE IF NOT EXISTS class_assistant (
    instructor_id INTEGER NOT NULL REFERENCES instructor(person_id),
    class_id      INTEGER NOT NULL REFERENCES class(class_id),
    UNIQUE (instructor_id, class_id)
);

-- At most one active major per student.
CREATE UNIQUE INDEX IF NOT EXISTS major_enrollment_active_idx
    ON major_enrollment(student_id) WHERE status = 'active';

CREATE INDEX IF NOT EXISTS major_enrollment_student_idx
    ON major_enrollment(student_id);
CREATE INDEX IF NOT EXISTS course_enrollment_course_idx
    ON course_enrollment(course_id);
CREATE INDEX IF NOT EXISTS result_student_idx ON result(student_id);

PRAGMA user_version = 1;
";
