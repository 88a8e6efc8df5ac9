use std::collections::HashSet;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use futures::TryStreamExt;
use rust_decimal::Decimal;
use sqlx::{FromRow, MySql, MySqlPool, QueryBuilder};

use super::{
    AttendanceRepository, NotificationRepository, PerformanceRepository, ProcurementRepository,
    SalaryRepository, StaffRepository, StoreError, StoreResult, TimetableRepository,
};
use crate::model::timetable::weekday_from_index;
use crate::model::{
    AttendanceRecord, AttendanceStatus, CheckInMethod, CreateProcurement, NewAttendance,
    NewNotification, NewPerformance, NewSalary, NewStaff, NewTimetableEntry, Notification,
    PerformanceRecord, Period, ProcurementRequest, ProcurementStatus, Role, SalaryRecord,
    SalaryTotals, StaffId, StaffMember, TimetableEntry,
};

const STAFF_COLUMNS: &str =
    "id, username, full_name, email, phone, role, base_salary, is_active, created_at";
const ATTENDANCE_COLUMNS: &str =
    "id, staff_id, date, check_in, check_out, method, status, created_at";
const SALARY_COLUMNS: &str = "id, staff_id, month, year, base_salary, attendance_bonus, \
     performance_bonus, total_salary, paid, paid_at, created_at";
const PROCUREMENT_COLUMNS: &str = "id, item_name, description, quantity, unit_price, \
     total_amount, supplier, requested_by, approved_by, status, created_at";
const NOTIFICATION_COLUMNS: &str =
    "id, recipient_id, title, message, kind, sent, sent_at, created_at";
const TIMETABLE_COLUMNS: &str =
    "id, teacher_id, subject, day_of_week, start_time, end_time, room, class_name";

/// sqlx-backed store. Cloning shares the pool.
#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

/// Maps a unique-key violation onto `StoreError::Duplicate`.
fn duplicate_or_db(e: sqlx::Error, entity: &'static str, key: impl FnOnce() -> String) -> StoreError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return StoreError::Duplicate { entity, key: key() };
        }
    }
    StoreError::Database(e)
}

fn parse_column<T: FromStr>(column: &'static str, value: String) -> StoreResult<T> {
    value
        .parse()
        .map_err(|_| StoreError::Corrupt { column, value })
}

#[derive(FromRow)]
struct StaffRow {
    id: u64,
    username: String,
    full_name: String,
    email: String,
    phone: Option<String>,
    role: String,
    base_salary: Option<Decimal>,
    is_active: bool,
    created_at: NaiveDateTime,
}

impl TryFrom<StaffRow> for StaffMember {
    type Error = StoreError;

    fn try_from(row: StaffRow) -> StoreResult<Self> {
        Ok(StaffMember {
            id: row.id,
            username: row.username,
            full_name: row.full_name,
            email: row.email,
            phone: row.phone,
            role: parse_column("role", row.role)?,
            base_salary: row.base_salary,
            is_active: row.is_active,
            created_at: row.created_at,
        })
    }
}

#[derive(FromRow)]
struct AttendanceRow {
    id: u64,
    staff_id: u64,
    date: NaiveDate,
    check_in: Option<NaiveDateTime>,
    check_out: Option<NaiveDateTime>,
    method: String,
    status: String,
    created_at: NaiveDateTime,
}

impl TryFrom<AttendanceRow> for AttendanceRecord {
    type Error = StoreError;

    fn try_from(row: AttendanceRow) -> StoreResult<Self> {
        Ok(AttendanceRecord {
            id: row.id,
            staff_id: row.staff_id,
            date: row.date,
            check_in: row.check_in,
            check_out: row.check_out,
            method: parse_column("method", row.method)?,
            status: parse_column("status", row.status)?,
            created_at: row.created_at,
        })
    }
}

#[derive(FromRow)]
struct PerformanceRow {
    id: u64,
    staff_id: u64,
    month: u32,
    year: i32,
    attendance_score: f64,
    punctuality_score: f64,
    overall_score: f64,
    remarks: Option<String>,
    created_at: NaiveDateTime,
}

impl From<PerformanceRow> for PerformanceRecord {
    fn from(row: PerformanceRow) -> Self {
        PerformanceRecord {
            id: row.id,
            staff_id: row.staff_id,
            month: row.month,
            year: row.year,
            attendance_score: row.attendance_score,
            punctuality_score: row.punctuality_score,
            overall_score: row.overall_score,
            remarks: row.remarks,
            created_at: row.created_at,
        }
    }
}

#[derive(FromRow)]
struct SalaryRow {
    id: u64,
    staff_id: u64,
    month: u32,
    year: i32,
    base_salary: Decimal,
    attendance_bonus: Decimal,
    performance_bonus: Decimal,
    total_salary: Decimal,
    paid: bool,
    paid_at: Option<NaiveDateTime>,
    created_at: NaiveDateTime,
}

impl From<SalaryRow> for SalaryRecord {
    fn from(row: SalaryRow) -> Self {
        SalaryRecord {
            id: row.id,
            staff_id: row.staff_id,
            month: row.month,
            year: row.year,
            base_salary: row.base_salary,
            attendance_bonus: row.attendance_bonus,
            performance_bonus: row.performance_bonus,
            total_salary: row.total_salary,
            paid: row.paid,
            paid_at: row.paid_at,
            created_at: row.created_at,
        }
    }
}

#[derive(FromRow)]
struct ProcurementRow {
    id: u64,
    item_name: String,
    description: Option<String>,
    quantity: u32,
    unit_price: Decimal,
    total_amount: Decimal,
    supplier: Option<String>,
    requested_by: u64,
    approved_by: Option<u64>,
    status: String,
    created_at: NaiveDateTime,
}

impl TryFrom<ProcurementRow> for ProcurementRequest {
    type Error = StoreError;

    fn try_from(row: ProcurementRow) -> StoreResult<Self> {
        Ok(ProcurementRequest {
            id: row.id,
            item_name: row.item_name,
            description: row.description,
            quantity: row.quantity,
            unit_price: row.unit_price,
            total_amount: row.total_amount,
            supplier: row.supplier,
            requested_by: row.requested_by,
            approved_by: row.approved_by,
            status: parse_column("status", row.status)?,
            created_at: row.created_at,
        })
    }
}

#[derive(FromRow)]
struct NotificationRow {
    id: u64,
    recipient_id: u64,
    title: String,
    message: String,
    kind: String,
    sent: bool,
    sent_at: Option<NaiveDateTime>,
    created_at: NaiveDateTime,
}

impl TryFrom<NotificationRow> for Notification {
    type Error = StoreError;

    fn try_from(row: NotificationRow) -> StoreResult<Self> {
        Ok(Notification {
            id: row.id,
            recipient_id: row.recipient_id,
            title: row.title,
            message: row.message,
            kind: parse_column("kind", row.kind)?,
            sent: row.sent,
            sent_at: row.sent_at,
            created_at: row.created_at,
        })
    }
}

#[derive(FromRow)]
struct TimetableRow {
    id: u64,
    teacher_id: u64,
    subject: String,
    day_of_week: u8,
    start_time: NaiveTime,
    end_time: NaiveTime,
    room: Option<String>,
    class_name: Option<String>,
}

impl TryFrom<TimetableRow> for TimetableEntry {
    type Error = StoreError;

    fn try_from(row: TimetableRow) -> StoreResult<Self> {
        let day_of_week = weekday_from_index(row.day_of_week).ok_or(StoreError::Corrupt {
            column: "day_of_week",
            value: row.day_of_week.to_string(),
        })?;

        Ok(TimetableEntry {
            id: row.id,
            teacher_id: row.teacher_id,
            subject: row.subject,
            day_of_week,
            start_time: row.start_time,
            end_time: row.end_time,
            room: row.room,
            class_name: row.class_name,
        })
    }
}

#[async_trait]
impl StaffRepository for MySqlStore {
    async fn create_staff(&self, new: NewStaff) -> StoreResult<StaffMember> {
        let result = sqlx::query(
            r#"
            INSERT INTO staff (username, full_name, email, phone, role, base_salary)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&new.username)
        .bind(&new.full_name)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(new.role.as_ref())
        .bind(new.base_salary)
        .execute(&self.pool)
        .await
        .map_err(|e| duplicate_or_db(e, "staff", || new.username.clone()))?;

        let id = result.last_insert_id();
        self.find_staff(id)
            .await?
            .ok_or(StoreError::Database(sqlx::Error::RowNotFound))
    }

    async fn find_staff(&self, id: StaffId) -> StoreResult<Option<StaffMember>> {
        let row = sqlx::query_as::<_, StaffRow>(&format!(
            "SELECT {STAFF_COLUMNS} FROM staff WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(StaffMember::try_from).transpose()
    }

    async fn list_staff_by_roles(&self, roles: &[Role]) -> StoreResult<Vec<StaffMember>> {
        if roles.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder =
            QueryBuilder::<MySql>::new(format!("SELECT {STAFF_COLUMNS} FROM staff WHERE role IN ("));
        let mut separated = builder.separated(", ");
        for role in roles {
            separated.push_bind(role.to_string());
        }
        separated.push_unseparated(") ORDER BY id");

        let mut rows = builder.build_query_as::<StaffRow>().fetch(&self.pool);
        let mut staff = Vec::new();
        while let Some(row) = rows.try_next().await? {
            staff.push(StaffMember::try_from(row)?);
        }
        Ok(staff)
    }

    async fn count_staff_by_role(&self, role: Role) -> StoreResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM staff WHERE role = ?")
            .bind(role.as_ref())
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl AttendanceRepository for MySqlStore {
    async fn attendance_for_period(
        &self,
        staff_id: StaffId,
        period: Period,
    ) -> StoreResult<Vec<AttendanceRecord>> {
        let rows = sqlx::query_as::<_, AttendanceRow>(&format!(
            r#"
            SELECT {ATTENDANCE_COLUMNS}
            FROM attendance
            WHERE staff_id = ? AND date >= ? AND date < ?
            ORDER BY date, id
            "#
        ))
        .bind(staff_id)
        .bind(period.start())
        .bind(period.end())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(AttendanceRecord::try_from).collect()
    }

    async fn attendance_on(
        &self,
        staff_id: StaffId,
        date: NaiveDate,
    ) -> StoreResult<Option<AttendanceRecord>> {
        let row = sqlx::query_as::<_, AttendanceRow>(&format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance WHERE staff_id = ? AND date = ?"
        ))
        .bind(staff_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        row.map(AttendanceRecord::try_from).transpose()
    }

    async fn attendance_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> StoreResult<Vec<AttendanceRecord>> {
        let rows = sqlx::query_as::<_, AttendanceRow>(&format!(
            r#"
            SELECT {ATTENDANCE_COLUMNS}
            FROM attendance
            WHERE date >= ? AND date <= ?
            ORDER BY date, id
            "#
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(AttendanceRecord::try_from).collect()
    }

    async fn count_attendance_on(&self, date: NaiveDate) -> StoreResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM attendance WHERE date = ?")
            .bind(date)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn insert_attendance(&self, new: NewAttendance) -> StoreResult<AttendanceRecord> {
        let result = sqlx::query(
            r#"
            INSERT INTO attendance (staff_id, date, check_in, method, status)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(new.staff_id)
        .bind(new.date)
        .bind(new.check_in)
        .bind(new.method.as_ref())
        .bind(new.status.as_ref())
        .execute(&self.pool)
        .await
        .map_err(|e| duplicate_or_db(e, "attendance", || format!("{}/{}", new.staff_id, new.date)))?;

        let row = sqlx::query_as::<_, AttendanceRow>(&format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance WHERE id = ?"
        ))
        .bind(result.last_insert_id())
        .fetch_one(&self.pool)
        .await?;

        AttendanceRecord::try_from(row)
    }

    async fn set_check_in(
        &self,
        id: u64,
        at: NaiveDateTime,
        method: CheckInMethod,
        status: AttendanceStatus,
    ) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE attendance
            SET check_in = ?, method = ?, status = ?
            WHERE id = ?
            AND check_in IS NULL
            "#,
        )
        .bind(at)
        .bind(method.as_ref())
        .bind(status.as_ref())
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_check_out(&self, id: u64, at: NaiveDateTime) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE attendance
            SET check_out = ?
            WHERE id = ?
            AND check_in IS NOT NULL
            AND check_out IS NULL
            "#,
        )
        .bind(at)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl PerformanceRepository for MySqlStore {
    async fn upsert_performance_batch(&self, batch: &[NewPerformance]) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        for entry in batch {
            sqlx::query(
                r#"
                INSERT INTO performance
                (staff_id, month, year, attendance_score, punctuality_score, overall_score, remarks)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                ON DUPLICATE KEY UPDATE
                    attendance_score = VALUES(attendance_score),
                    punctuality_score = VALUES(punctuality_score),
                    overall_score = VALUES(overall_score),
                    remarks = VALUES(remarks)
                "#,
            )
            .bind(entry.staff_id)
            .bind(entry.period.month())
            .bind(entry.period.year())
            .bind(entry.attendance_score)
            .bind(entry.punctuality_score)
            .bind(entry.overall_score)
            .bind(&entry.remarks)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn performance_for_period(&self, period: Period) -> StoreResult<Vec<PerformanceRecord>> {
        let rows = sqlx::query_as::<_, PerformanceRow>(
            r#"
            SELECT id, staff_id, month, year, attendance_score, punctuality_score,
                   overall_score, remarks, created_at
            FROM performance
            WHERE month = ? AND year = ?
            ORDER BY staff_id
            "#,
        )
        .bind(period.month())
        .bind(period.year())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(PerformanceRecord::from).collect())
    }
}

#[async_trait]
impl SalaryRepository for MySqlStore {
    async fn salaried_staff_ids(&self, period: Period) -> StoreResult<HashSet<StaffId>> {
        let ids = sqlx::query_scalar::<_, u64>(
            "SELECT staff_id FROM salaries WHERE month = ? AND year = ?",
        )
        .bind(period.month())
        .bind(period.year())
        .fetch_all(&self.pool)
        .await?;

        Ok(ids.into_iter().collect())
    }

    async fn insert_salary_batch(&self, batch: &[NewSalary]) -> StoreResult<u64> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;

        for salary in batch {
            // dropping `tx` on the error path rolls the whole batch back
            let result = sqlx::query(
                r#"
                INSERT INTO salaries
                (staff_id, month, year, base_salary, attendance_bonus, performance_bonus, total_salary, paid)
                VALUES (?, ?, ?, ?, ?, ?, ?, FALSE)
                "#,
            )
            .bind(salary.staff_id)
            .bind(salary.period.month())
            .bind(salary.period.year())
            .bind(salary.base_salary)
            .bind(salary.attendance_bonus)
            .bind(salary.performance_bonus)
            .bind(salary.total_salary)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                duplicate_or_db(e, "salary", || format!("{}/{}", salary.staff_id, salary.period))
            })?;

            inserted += result.rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }

    async fn salaries_for_period(&self, period: Period) -> StoreResult<Vec<SalaryRecord>> {
        let rows = sqlx::query_as::<_, SalaryRow>(&format!(
            "SELECT {SALARY_COLUMNS} FROM salaries WHERE month = ? AND year = ? ORDER BY id"
        ))
        .bind(period.month())
        .bind(period.year())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(SalaryRecord::from).collect())
    }

    async fn find_salary(&self, id: u64) -> StoreResult<Option<SalaryRecord>> {
        let row = sqlx::query_as::<_, SalaryRow>(&format!(
            "SELECT {SALARY_COLUMNS} FROM salaries WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(SalaryRecord::from))
    }

    async fn mark_salary_paid(&self, id: u64, at: NaiveDateTime) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE salaries
            SET paid = TRUE, paid_at = ?
            WHERE id = ?
            AND paid = FALSE
            "#,
        )
        .bind(at)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn salary_totals(&self, period: Period) -> StoreResult<SalaryTotals> {
        let pending = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM salaries WHERE month = ? AND year = ? AND paid = FALSE",
        )
        .bind(period.month())
        .bind(period.year())
        .fetch_one(&self.pool)
        .await?;

        let total_budget = sqlx::query_scalar::<_, Option<Decimal>>(
            "SELECT SUM(total_salary) FROM salaries WHERE month = ? AND year = ?",
        )
        .bind(period.month())
        .bind(period.year())
        .fetch_one(&self.pool)
        .await?;

        Ok(SalaryTotals {
            pending,
            total_budget: total_budget.unwrap_or_default(),
        })
    }
}

#[async_trait]
impl ProcurementRepository for MySqlStore {
    async fn insert_procurement(
        &self,
        request: &CreateProcurement,
        total_amount: Decimal,
        requested_by: StaffId,
    ) -> StoreResult<ProcurementRequest> {
        let result = sqlx::query(
            r#"
            INSERT INTO procurement
            (item_name, description, quantity, unit_price, total_amount, supplier, requested_by, status)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&request.item_name)
        .bind(&request.description)
        .bind(request.quantity)
        .bind(request.unit_price)
        .bind(total_amount)
        .bind(&request.supplier)
        .bind(requested_by)
        .bind(ProcurementStatus::Pending.as_ref())
        .execute(&self.pool)
        .await?;

        self.find_procurement(result.last_insert_id())
            .await?
            .ok_or(StoreError::Database(sqlx::Error::RowNotFound))
    }

    async fn list_procurements(&self) -> StoreResult<Vec<ProcurementRequest>> {
        let rows = sqlx::query_as::<_, ProcurementRow>(&format!(
            "SELECT {PROCUREMENT_COLUMNS} FROM procurement ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ProcurementRequest::try_from).collect()
    }

    async fn find_procurement(&self, id: u64) -> StoreResult<Option<ProcurementRequest>> {
        let row = sqlx::query_as::<_, ProcurementRow>(&format!(
            "SELECT {PROCUREMENT_COLUMNS} FROM procurement WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ProcurementRequest::try_from).transpose()
    }

    async fn update_procurement_status(
        &self,
        id: u64,
        from: ProcurementStatus,
        to: ProcurementStatus,
        approved_by: Option<StaffId>,
    ) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE procurement
            SET status = ?, approved_by = COALESCE(?, approved_by)
            WHERE id = ?
            AND status = ?
            "#,
        )
        .bind(to.as_ref())
        .bind(approved_by)
        .bind(id)
        .bind(from.as_ref())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl NotificationRepository for MySqlStore {
    async fn insert_notification(&self, new: &NewNotification) -> StoreResult<Notification> {
        let result = sqlx::query(
            r#"
            INSERT INTO notifications (recipient_id, title, message, kind, sent)
            VALUES (?, ?, ?, ?, FALSE)
            "#,
        )
        .bind(new.recipient_id)
        .bind(&new.title)
        .bind(&new.message)
        .bind(new.kind.as_ref())
        .execute(&self.pool)
        .await?;

        self.find_notification(result.last_insert_id())
            .await?
            .ok_or(StoreError::Database(sqlx::Error::RowNotFound))
    }

    async fn notifications_for(&self, recipient: StaffId) -> StoreResult<Vec<Notification>> {
        let rows = sqlx::query_as::<_, NotificationRow>(&format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE recipient_id = ? ORDER BY id DESC"
        ))
        .bind(recipient)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Notification::try_from).collect()
    }

    async fn find_notification(&self, id: u64) -> StoreResult<Option<Notification>> {
        let row = sqlx::query_as::<_, NotificationRow>(&format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Notification::try_from).transpose()
    }

    async fn mark_notification_sent(&self, id: u64, at: NaiveDateTime) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE notifications
            SET sent = TRUE, sent_at = ?
            WHERE id = ?
            AND sent = FALSE
            "#,
        )
        .bind(at)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl TimetableRepository for MySqlStore {
    async fn insert_timetable_entry(&self, new: &NewTimetableEntry) -> StoreResult<TimetableEntry> {
        let day = new.day_of_week.num_days_from_monday() as u8;
        let result = sqlx::query(
            r#"
            INSERT INTO timetable
            (teacher_id, subject, day_of_week, start_time, end_time, room, class_name)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(new.teacher_id)
        .bind(&new.subject)
        .bind(day)
        .bind(new.start_time)
        .bind(new.end_time)
        .bind(&new.room)
        .bind(&new.class_name)
        .execute(&self.pool)
        .await?;

        let row = sqlx::query_as::<_, TimetableRow>(&format!(
            "SELECT {TIMETABLE_COLUMNS} FROM timetable WHERE id = ?"
        ))
        .bind(result.last_insert_id())
        .fetch_one(&self.pool)
        .await?;

        TimetableEntry::try_from(row)
    }

    async fn timetable_for(&self, teacher_id: StaffId) -> StoreResult<Vec<TimetableEntry>> {
        let rows = sqlx::query_as::<_, TimetableRow>(&format!(
            r#"
            SELECT {TIMETABLE_COLUMNS}
            FROM timetable
            WHERE teacher_id = ?
            ORDER BY day_of_week, start_time, id
            "#
        ))
        .bind(teacher_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TimetableEntry::try_from).collect()
    }
}
