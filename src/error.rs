//! Error types shared by the scoring engine and the services.
//!
//! An empty attendance period and an already-calculated salary period are not
//! errors: the first scores 0.0 and the second is skipped.

use chrono::NaiveDate;
use thiserror::Error;

use crate::model::{Period, ProcurementStatus, Role, StaffId};
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    /// Month outside 1..=12 or a year outside the supported range.
    #[error("Invalid period: month {month}, year {year}")]
    InvalidPeriod { month: u32, year: i32 },

    /// Concurrent runs kept inserting records for the same period.
    #[error("Salary run for {period} conflicted with another writer after {attempts} attempts")]
    PeriodConflict { period: Period, attempts: u32 },

    #[error("Access denied: {role} may not {action}")]
    AccessDenied { action: &'static str, role: Role },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u64 },

    #[error("Already checked in today")]
    AlreadyCheckedIn,

    #[error("No check-in record found for today")]
    NotCheckedIn,

    #[error("Already checked out today")]
    AlreadyCheckedOut,

    #[error("Attendance for staff {staff_id} on {date} already recorded")]
    AttendanceExists { staff_id: StaffId, date: NaiveDate },

    #[error("Salary {id} is already paid")]
    AlreadyPaid { id: u64 },

    #[error("Invalid procurement request: {message}")]
    InvalidProcurement { message: String },

    #[error("Invalid notification: {message}")]
    InvalidNotification { message: String },

    #[error("Notification {id} was already sent")]
    AlreadySent { id: u64 },

    #[error("Invalid timetable entry: {message}")]
    InvalidTimetable { message: String },

    #[error("Procurement cannot move from {from} to {to}")]
    InvalidTransition {
        from: ProcurementStatus,
        to: ProcurementStatus,
    },

    /// The store rejected a read or write. Batches are rolled back before this
    /// reaches the caller.
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type AppResult<T> = Result<T, AppError>;
