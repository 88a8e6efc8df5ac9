use serde::Serialize;
use strum_macros::Display;

use crate::model::{AttendanceRecord, AttendanceStatus};

/// Scores at or above this are reported as "Good".
pub const GOOD_THRESHOLD: f64 = 7.0;

const SCALE: f64 = 10.0;

/// Attendance-derived scores for one staff member over one period, each in
/// `[0, 10]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub attendance: f64,
    pub punctuality: f64,
    pub overall: f64,
    /// Number of attendance records the scores were computed from.
    pub days: usize,
}

impl ScoreBreakdown {
    pub const EMPTY: ScoreBreakdown = ScoreBreakdown {
        attendance: 0.0,
        punctuality: 0.0,
        overall: 0.0,
        days: 0,
    };

    pub fn is_empty(&self) -> bool {
        self.days == 0
    }
}

/// Scores a period's attendance records.
///
/// * attendance = share of records marked present, scaled to 10
/// * punctuality = share of records not marked late, scaled to 10
/// * overall = mean of the two
///
/// An empty slice scores 0.0 across the board. Absences count as punctual;
/// they only lower the attendance share.
pub fn score_attendance(records: &[AttendanceRecord]) -> ScoreBreakdown {
    if records.is_empty() {
        return ScoreBreakdown::EMPTY;
    }

    let total = records.len() as f64;
    let present = records
        .iter()
        .filter(|r| r.status == AttendanceStatus::Present)
        .count() as f64;
    let on_time = records
        .iter()
        .filter(|r| r.status != AttendanceStatus::Late)
        .count() as f64;

    let attendance = present / total * SCALE;
    let punctuality = on_time / total * SCALE;

    ScoreBreakdown {
        attendance,
        punctuality,
        overall: (attendance + punctuality) / 2.0,
        days: records.len(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
pub enum PerformanceStatus {
    #[serde(rename = "Good")]
    #[strum(serialize = "Good")]
    Good,
    #[serde(rename = "Needs Improvement")]
    #[strum(serialize = "Needs Improvement")]
    NeedsImprovement,
}

pub fn classify(score: f64) -> PerformanceStatus {
    if score >= GOOD_THRESHOLD {
        PerformanceStatus::Good
    } else {
        PerformanceStatus::NeedsImprovement
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CheckInMethod;
    use chrono::{NaiveDate, NaiveDateTime};
    use proptest::prelude::*;

    fn created_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 4, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn records(statuses: &[AttendanceStatus]) -> Vec<AttendanceRecord> {
        statuses
            .iter()
            .enumerate()
            .map(|(i, status)| AttendanceRecord {
                id: i as u64 + 1,
                staff_id: 1,
                date: NaiveDate::from_ymd_opt(2024, 3, i as u32 + 1).unwrap(),
                check_in: None,
                check_out: None,
                method: CheckInMethod::Manual,
                status: *status,
                created_at: created_at(),
            })
            .collect()
    }

    #[test]
    fn empty_period_scores_zero() {
        let breakdown = score_attendance(&[]);
        assert_eq!(breakdown, ScoreBreakdown::EMPTY);
        assert_eq!(breakdown.overall, 0.0);
        assert!(breakdown.is_empty());
    }

    #[test]
    fn all_present_scores_ten() {
        let breakdown = score_attendance(&records(&[AttendanceStatus::Present; 20]));
        assert_eq!(breakdown.attendance, 10.0);
        assert_eq!(breakdown.punctuality, 10.0);
        assert_eq!(breakdown.overall, 10.0);
    }

    #[test]
    fn one_absence_in_ten_scores_nine_and_a_half() {
        let mut statuses = vec![AttendanceStatus::Present; 9];
        statuses.push(AttendanceStatus::Absent);

        let breakdown = score_attendance(&records(&statuses));

        assert_eq!(breakdown.attendance, 9.0);
        assert_eq!(breakdown.punctuality, 10.0);
        assert_eq!(breakdown.overall, 9.5);
        assert_eq!(breakdown.days, 10);
    }

    #[test]
    fn late_days_lower_both_scores() {
        let breakdown = score_attendance(&records(&[
            AttendanceStatus::Present,
            AttendanceStatus::Late,
            AttendanceStatus::Late,
            AttendanceStatus::Present,
        ]));
        assert_eq!(breakdown.attendance, 5.0);
        assert_eq!(breakdown.punctuality, 5.0);
        assert_eq!(breakdown.overall, 5.0);
    }

    #[test]
    fn classification_boundary_is_inclusive() {
        assert_eq!(classify(7.0), PerformanceStatus::Good);
        assert_eq!(classify(6.999), PerformanceStatus::NeedsImprovement);
        assert_eq!(classify(0.0), PerformanceStatus::NeedsImprovement);
    }

    #[test]
    fn status_renders_report_labels() {
        assert_eq!(PerformanceStatus::Good.to_string(), "Good");
        assert_eq!(
            PerformanceStatus::NeedsImprovement.to_string(),
            "Needs Improvement"
        );
        assert_eq!(
            serde_json::to_value(PerformanceStatus::NeedsImprovement).unwrap(),
            serde_json::json!("Needs Improvement")
        );
    }

    fn status_strategy() -> impl Strategy<Value = AttendanceStatus> {
        prop_oneof![
            Just(AttendanceStatus::Present),
            Just(AttendanceStatus::Absent),
            Just(AttendanceStatus::Late),
        ]
    }

    proptest! {
        #[test]
        fn score_matches_closed_form(statuses in prop::collection::vec(status_strategy(), 1..28)) {
            let n = statuses.len() as f64;
            let p = statuses.iter().filter(|s| **s == AttendanceStatus::Present).count() as f64;
            let t = statuses.iter().filter(|s| **s != AttendanceStatus::Late).count() as f64;

            let breakdown = score_attendance(&records(&statuses));

            let expected = ((p / n * 10.0) + (t / n * 10.0)) / 2.0;
            prop_assert!((breakdown.overall - expected).abs() < 1e-9);
            prop_assert!((0.0..=10.0).contains(&breakdown.overall));
            prop_assert!((0.0..=10.0).contains(&breakdown.attendance));
            prop_assert!((0.0..=10.0).contains(&breakdown.punctuality));
        }
    }
}
