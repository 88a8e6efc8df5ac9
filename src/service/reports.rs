use chrono::NaiveDate;

use crate::auth::Actor;
use crate::error::AppResult;
use crate::model::{AttendanceRecord, NewPerformance, Period};
use crate::scoring::{ReportRow, ScoringEngine};
use crate::store::{AttendanceRepository, ScoringStore};

pub async fn performance_report<S: ScoringStore>(
    engine: &ScoringEngine<S>,
    actor: Actor,
    period: Period,
) -> AppResult<Vec<ReportRow>> {
    actor.require_management("view performance reports")?;
    engine.generate_performance_report(period).await
}

pub async fn record_performance<S: ScoringStore>(
    engine: &ScoringEngine<S>,
    actor: Actor,
    period: Period,
) -> AppResult<Vec<NewPerformance>> {
    actor.require_school_admin("record performance")?;
    engine.record_performance(period).await
}

/// Attendance records dated between `start` and `end`, both inclusive.
pub async fn attendance_report<S: AttendanceRepository>(
    store: &S,
    actor: Actor,
    start: NaiveDate,
    end: NaiveDate,
) -> AppResult<Vec<AttendanceRecord>> {
    actor.require_management("view attendance reports")?;
    Ok(store.attendance_between(start, end).await?)
}
