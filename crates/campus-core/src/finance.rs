//! Financial status — the computed read model for a student's balances.
//!
//! Never stored, always derived: the store supplies raw (fees, paid) lines
//! and the fold below computes pending amounts and the three summaries.

use serde::{Deserialize, Serialize};

/// One fee obligation (a major's tuition or an activity's fee) with the
/// amount paid against it so far.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeLine {
  pub name:    String,
  pub fees:    f64,
  pub paid:    f64,
  pub pending: f64,
  pub status:  String,
}

impl FeeLine {
  pub fn new(name: String, fees: f64, paid: f64, status: String) -> Self {
    Self { name, fees, paid, pending: fees - paid, status }
  }
}

/// Totals over a set of fee lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeSummary {
  pub total_fees:    f64,
  pub total_paid:    f64,
  pub total_pending: f64,
}

impl FeeSummary {
  pub fn of(lines: &[FeeLine]) -> Self {
    let total_fees: f64 = lines.iter().map(|l| l.fees).sum();
    let total_paid: f64 = lines.iter().map(|l| l.paid).sum();
    Self {
      total_fees,
      total_paid,
      total_pending: total_fees - total_paid,
    }
  }
}

/// A student's full financial picture: per-major and per-activity lines
/// plus the majors, activities, and overall summaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialStatus {
  pub majors:             Vec<FeeLine>,
  pub majors_summary:     FeeSummary,
  pub activities:         Vec<FeeLine>,
  pub activities_summary: FeeSummary,
  pub overall_summary:    FeeSummary,
}

impl FinancialStatus {
  /// Fold raw lines into the full status. Callers are responsible for the
  /// no-records-at-all case (a `NotFound`, decided before assembly).
  pub fn assemble(majors: Vec<FeeLine>, activities: Vec<FeeLine>) -> Self {
    let majors_summary = FeeSummary::of(&majors);
    let activities_summary = FeeSummary::of(&activities);
    let overall_summary = FeeSummary {
      total_fees:    majors_summary.total_fees + activities_summary.total_fees,
      total_paid:    majors_summary.total_paid + activities_summary.total_paid,
      total_pending: majors_summary.total_pending
        + activities_summary.total_pending,
    };
    Self {
      majors,
      majors_summary,
      activities,
      activities_summary,
      overall_summary,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn pending_is_fees_minus_paid() {
    let line = FeeLine::new("Physics".into(), 5000.0, 1250.0, "active".into());
    assert_eq!(line.pending, 3750.0);
  }

  #[test]
  fn summaries_add_up() {
    let majors = vec![
      FeeLine::new("Physics".into(), 5000.0, 2000.0, "inactive".into()),
      FeeLine::new("Maths".into(), 5000.0, 0.0, "active".into()),
    ];
    let activities = vec![FeeLine::new("Chess".into(), 50.0, 50.0, "paid".into())];

    let status = FinancialStatus::assemble(majors, activities);

    assert_eq!(status.majors_summary.total_fees, 10000.0);
    assert_eq!(status.majors_summary.total_paid, 2000.0);
    assert_eq!(status.majors_summary.total_pending, 8000.0);
    assert_eq!(status.activities_summary.total_pending, 0.0);
    assert_eq!(status.overall_summary.total_fees, 10050.0);
    assert_eq!(status.overall_summary.total_paid, 2050.0);
    assert_eq!(status.overall_summary.total_pending, 8000.0);
  }

  #[test]
  fn empty_sides_produce_zero_summaries() {
    let status = FinancialStatus::assemble(vec![], vec![]);
    assert_eq!(status.overall_summary.total_fees, 0.0);
    assert_eq!(status.overall_summary.total_pending, 0.0);
  }
}
