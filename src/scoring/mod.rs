//! Performance scoring and salary derivation.
//!
//! [`score`] and [`salary`] are pure arithmetic over already-loaded records.
//! [`engine`] runs them against a [`ScoringStore`](crate::store::ScoringStore)
//! for whole periods.

pub mod engine;
pub mod salary;
pub mod score;

pub use engine::{ReportRow, SalaryRunSummary, ScoringEngine};
pub use salary::{derive_salary, SalaryBreakdown, SalaryPolicy};
pub use score::{classify, score_attendance, PerformanceStatus, ScoreBreakdown};
