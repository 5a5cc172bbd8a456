//! Grade batches and their validation.
//!
//! Scores live in [0, 20]. A batch is all-or-nothing: one out-of-range
//! score or one student outside the edition rejects every entry.

use serde::{Deserialize, Serialize};

use crate::{academics::EditionId, person::PersonId};

pub const SCORE_MIN: f64 = 0.0;
pub const SCORE_MAX: f64 = 20.0;

/// One (student, score) pair submitted by the coordinator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GradeEntry {
  pub student_id: PersonId,
  pub score:      f64,
}

/// Return the entries whose score falls outside [0, 20]. An empty result
/// means the batch passes range validation.
pub fn out_of_range(entries: &[GradeEntry]) -> Vec<(PersonId, f64)> {
  entries
    .iter()
    .filter(|e| !(SCORE_MIN..=SCORE_MAX).contains(&e.score))
    .map(|e| (e.student_id, e.score))
    .collect()
}

/// Whether an entry created a new result row or overwrote an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradeAction {
  Inserted,
  Updated,
}

/// Per-entry outcome of a grade batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeOutcome {
  pub student_id: PersonId,
  pub score:      f64,
  pub result_id:  i64,
  pub action:     GradeAction,
}

/// The receipt for a fully-applied grade batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeSubmission {
  pub edition_id:  EditionId,
  pub course_name: String,
  pub period:      String,
  pub grades:      Vec<GradeOutcome>,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn entry(student_id: PersonId, score: f64) -> GradeEntry {
    GradeEntry { student_id, score }
  }

  #[test]
  fn boundary_scores_are_accepted() {
    let entries = [entry(1, 0.0), entry(2, 20.0), entry(3, 9.5)];
    assert!(out_of_range(&entries).is_empty());
  }

  #[test]
  fn scores_past_either_boundary_are_rejected() {
    let entries = [entry(1, -0.1), entry(2, 20.1), entry(3, 10.0)];
    let bad = out_of_range(&entries);
    assert_eq!(bad, vec![(1, -0.1), (2, 20.1)]);
  }

  #[test]
  fn empty_batch_has_no_offenders() {
    assert!(out_of_range(&[]).is_empty());
  }
}
