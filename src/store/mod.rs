//! Persistence seams.
//!
//! The scoring engine and the services only talk to these traits. `MySqlStore`
//! backs them with sqlx, `MemoryStore` keeps everything in process and enforces
//! the same unique keys.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::model::{
    AttendanceRecord, AttendanceStatus, CheckInMethod, CreateProcurement, NewAttendance,
    NewNotification, NewPerformance, NewSalary, NewStaff, NewTimetableEntry, Notification,
    PerformanceRecord, Period, ProcurementRequest, ProcurementStatus, Role, SalaryRecord,
    SalaryTotals, StaffId, StaffMember, TimetableEntry,
};

pub mod memory;
pub mod mysql;

pub use memory::MemoryStore;
pub use mysql::MySqlStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique key rejected the write.
    #[error("Duplicate {entity}: {key}")]
    Duplicate { entity: &'static str, key: String },

    /// A stored value could not be mapped back onto its domain type.
    #[error("Unexpected value {value:?} in column {column}")]
    Corrupt { column: &'static str, value: String },

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait StaffRepository: Send + Sync {
    async fn create_staff(&self, new: NewStaff) -> StoreResult<StaffMember>;

    async fn find_staff(&self, id: StaffId) -> StoreResult<Option<StaffMember>>;

    /// Staff holding any of `roles`, in insertion order.
    async fn list_staff_by_roles(&self, roles: &[Role]) -> StoreResult<Vec<StaffMember>>;

    async fn count_staff_by_role(&self, role: Role) -> StoreResult<i64>;
}

#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    /// Records of one staff member dated inside `period`, oldest first.
    async fn attendance_for_period(
        &self,
        staff_id: StaffId,
        period: Period,
    ) -> StoreResult<Vec<AttendanceRecord>>;

    async fn attendance_on(
        &self,
        staff_id: StaffId,
        date: NaiveDate,
    ) -> StoreResult<Option<AttendanceRecord>>;

    /// All records with `start <= date <= end`, ordered by date then id.
    async fn attendance_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> StoreResult<Vec<AttendanceRecord>>;

    async fn count_attendance_on(&self, date: NaiveDate) -> StoreResult<i64>;

    /// Fails with `Duplicate` when the staff member already has a record that day.
    async fn insert_attendance(&self, new: NewAttendance) -> StoreResult<AttendanceRecord>;

    /// Sets the check-in of a record that has none yet. Returns false if the
    /// record was already checked in (or does not exist).
    async fn set_check_in(
        &self,
        id: u64,
        at: NaiveDateTime,
        method: CheckInMethod,
        status: AttendanceStatus,
    ) -> StoreResult<bool>;

    /// Sets the check-out of a checked-in record that has none yet.
    async fn set_check_out(&self, id: u64, at: NaiveDateTime) -> StoreResult<bool>;
}

#[async_trait]
pub trait PerformanceRepository: Send + Sync {
    /// Inserts or replaces the scores of every entry, keyed by (staff, period),
    /// as one unit of work.
    async fn upsert_performance_batch(&self, batch: &[NewPerformance]) -> StoreResult<()>;

    async fn performance_for_period(&self, period: Period) -> StoreResult<Vec<PerformanceRecord>>;
}

#[async_trait]
pub trait SalaryRepository: Send + Sync {
    /// Staff members that already have a salary record for `period`.
    async fn salaried_staff_ids(&self, period: Period) -> StoreResult<HashSet<StaffId>>;

    /// Inserts the whole batch or nothing. A record that already exists for
    /// (staff, period) fails the batch with `Duplicate`.
    async fn insert_salary_batch(&self, batch: &[NewSalary]) -> StoreResult<u64>;

    async fn salaries_for_period(&self, period: Period) -> StoreResult<Vec<SalaryRecord>>;

    async fn find_salary(&self, id: u64) -> StoreResult<Option<SalaryRecord>>;

    /// Flags an unpaid record as paid. Returns false if it was already paid.
    async fn mark_salary_paid(&self, id: u64, at: NaiveDateTime) -> StoreResult<bool>;

    async fn salary_totals(&self, period: Period) -> StoreResult<SalaryTotals>;
}

#[async_trait]
pub trait ProcurementRepository: Send + Sync {
    async fn insert_procurement(
        &self,
        request: &CreateProcurement,
        total_amount: Decimal,
        requested_by: StaffId,
    ) -> StoreResult<ProcurementRequest>;

    async fn list_procurements(&self) -> StoreResult<Vec<ProcurementRequest>>;

    async fn find_procurement(&self, id: u64) -> StoreResult<Option<ProcurementRequest>>;

    /// Moves a request from `from` to `to`. Returns false when the stored
    /// status was no longer `from`.
    async fn update_procurement_status(
        &self,
        id: u64,
        from: ProcurementStatus,
        to: ProcurementStatus,
        approved_by: Option<StaffId>,
    ) -> StoreResult<bool>;
}

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Stores an unsent notification.
    async fn insert_notification(&self, new: &NewNotification) -> StoreResult<Notification>;

    /// Notifications addressed to `recipient`, newest first.
    async fn notifications_for(&self, recipient: StaffId) -> StoreResult<Vec<Notification>>;

    async fn find_notification(&self, id: u64) -> StoreResult<Option<Notification>>;

    /// Flags an unsent notification as sent. Returns false if it already was.
    async fn mark_notification_sent(&self, id: u64, at: NaiveDateTime) -> StoreResult<bool>;
}

#[async_trait]
pub trait TimetableRepository: Send + Sync {
    async fn insert_timetable_entry(&self, new: &NewTimetableEntry) -> StoreResult<TimetableEntry>;

    /// A teacher's weekly slots ordered by weekday (Monday first), then start time.
    async fn timetable_for(&self, teacher_id: StaffId) -> StoreResult<Vec<TimetableEntry>>;
}

/// Everything the scoring engine reads and writes.
pub trait ScoringStore:
    StaffRepository + AttendanceRepository + PerformanceRepository + SalaryRepository
{
}

impl<T> ScoringStore for T where
    T: StaffRepository + AttendanceRepository + PerformanceRepository + SalaryRepository
{
}

/// The full application store.
pub trait Store:
    ScoringStore + ProcurementRepository + NotificationRepository + TimetableRepository
{
}

impl<T> Store for T where
    T: ScoringStore + ProcurementRepository + NotificationRepository + TimetableRepository
{
}
