//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! Dates are stored as ISO 8601 date strings; statuses as the lowercase
//! literals declared in the schema comments.

use campus_core::enrollment::{EnrollmentStatus, FeeStatus};
use chrono::NaiveDate;

use crate::{Error, Result};

// ─── Dates ───────────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── EnrollmentStatus ────────────────────────────────────────────────────────

pub fn encode_enrollment_status(s: EnrollmentStatus) -> &'static str {
  match s {
    EnrollmentStatus::Active => "active",
    EnrollmentStatus::Inactive => "inactive",
  }
}

// ─── FeeStatus ───────────────────────────────────────────────────────────────

pub fn encode_fee_status(s: FeeStatus) -> &'static str {
  match s {
    FeeStatus::Pending => "pending",
    FeeStatus::Paid => "paid",
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `student` row.
pub struct RawStudent {
  pub person_id:      i64,
  pub enrolment_date: String,
  pub mean:           f64,
}

impl RawStudent {
  pub fn into_student(self) -> Result<campus_core::person::Student> {
    Ok(campus_core::person::Student {
      person_id:      self.person_id,
      enrolment_date: decode_date(&self.enrolment_date)?,
      mean:           self.mean,
    })
  }
}
