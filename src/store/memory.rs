use std::collections::HashSet;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;

use super::{
    AttendanceRepository, NotificationRepository, PerformanceRepository, ProcurementRepository,
    SalaryRepository, StaffRepository, StoreError, StoreResult, TimetableRepository,
};
use crate::model::{
    AttendanceRecord, AttendanceStatus, CheckInMethod, CreateProcurement, NewAttendance,
    NewNotification, NewPerformance, NewSalary, NewStaff, NewTimetableEntry, Notification,
    PerformanceRecord, Period, ProcurementRequest, ProcurementStatus, Role, SalaryRecord,
    SalaryTotals, StaffId, StaffMember, TimetableEntry,
};

#[derive(Default)]
struct Tables {
    staff: Vec<StaffMember>,
    attendance: Vec<AttendanceRecord>,
    performance: Vec<PerformanceRecord>,
    salaries: Vec<SalaryRecord>,
    procurement: Vec<ProcurementRequest>,
    notifications: Vec<Notification>,
    timetable: Vec<TimetableEntry>,
    next_id: u64,
}

impl Tables {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-process store with the same unique keys as the MySQL schema.
///
/// Rows keep insertion order, ids are assigned from one shared counter.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // writers validate before mutating, so a poisoned table is still consistent
    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Inserts an attendance row as-is, timestamps included. Meant for
    /// seeding history.
    pub fn seed_attendance(&self, record: NewAttendance) -> StoreResult<AttendanceRecord> {
        let mut tables = self.write();
        insert_attendance_row(&mut tables, record)
    }

    pub fn salary_count(&self) -> usize {
        self.read().salaries.len()
    }

    pub fn all_salaries(&self) -> Vec<SalaryRecord> {
        self.read().salaries.clone()
    }
}

fn insert_attendance_row(tables: &mut Tables, new: NewAttendance) -> StoreResult<AttendanceRecord> {
    if tables
        .attendance
        .iter()
        .any(|a| a.staff_id == new.staff_id && a.date == new.date)
    {
        return Err(StoreError::Duplicate {
            entity: "attendance",
            key: format!("{}/{}", new.staff_id, new.date),
        });
    }

    let record = AttendanceRecord {
        id: tables.next_id(),
        staff_id: new.staff_id,
        date: new.date,
        check_in: new.check_in,
        check_out: None,
        method: new.method,
        status: new.status,
        created_at: now(),
    };
    tables.attendance.push(record.clone());
    Ok(record)
}

#[async_trait]
impl StaffRepository for MemoryStore {
    async fn create_staff(&self, new: NewStaff) -> StoreResult<StaffMember> {
        let mut tables = self.write();
        if tables
            .staff
            .iter()
            .any(|s| s.username == new.username || s.email == new.email)
        {
            return Err(StoreError::Duplicate {
                entity: "staff",
                key: new.username,
            });
        }

        let member = StaffMember {
            id: tables.next_id(),
            username: new.username,
            full_name: new.full_name,
            email: new.email,
            phone: new.phone,
            role: new.role,
            base_salary: new.base_salary,
            is_active: true,
            created_at: now(),
        };
        tables.staff.push(member.clone());
        Ok(member)
    }

    async fn find_staff(&self, id: StaffId) -> StoreResult<Option<StaffMember>> {
        Ok(self.read().staff.iter().find(|s| s.id == id).cloned())
    }

    async fn list_staff_by_roles(&self, roles: &[Role]) -> StoreResult<Vec<StaffMember>> {
        Ok(self
            .read()
            .staff
            .iter()
            .filter(|s| roles.contains(&s.role))
            .cloned()
            .collect())
    }

    async fn count_staff_by_role(&self, role: Role) -> StoreResult<i64> {
        Ok(self.read().staff.iter().filter(|s| s.role == role).count() as i64)
    }
}

#[async_trait]
impl AttendanceRepository for MemoryStore {
    async fn attendance_for_period(
        &self,
        staff_id: StaffId,
        period: Period,
    ) -> StoreResult<Vec<AttendanceRecord>> {
        let mut records: Vec<_> = self
            .read()
            .attendance
            .iter()
            .filter(|a| a.staff_id == staff_id && period.contains(a.date))
            .cloned()
            .collect();
        records.sort_by_key(|a| (a.date, a.id));
        Ok(records)
    }

    async fn attendance_on(
        &self,
        staff_id: StaffId,
        date: NaiveDate,
    ) -> StoreResult<Option<AttendanceRecord>> {
        Ok(self
            .read()
            .attendance
            .iter()
            .find(|a| a.staff_id == staff_id && a.date == date)
            .cloned())
    }

    async fn attendance_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> StoreResult<Vec<AttendanceRecord>> {
        let mut records: Vec<_> = self
            .read()
            .attendance
            .iter()
            .filter(|a| a.date >= start && a.date <= end)
            .cloned()
            .collect();
        records.sort_by_key(|a| (a.date, a.id));
        Ok(records)
    }

    async fn count_attendance_on(&self, date: NaiveDate) -> StoreResult<i64> {
        Ok(self.read().attendance.iter().filter(|a| a.date == date).count() as i64)
    }

    async fn insert_attendance(&self, new: NewAttendance) -> StoreResult<AttendanceRecord> {
        let mut tables = self.write();
        insert_attendance_row(&mut tables, new)
    }

    async fn set_check_in(
        &self,
        id: u64,
        at: NaiveDateTime,
        method: CheckInMethod,
        status: AttendanceStatus,
    ) -> StoreResult<bool> {
        let mut tables = self.write();
        match tables
            .attendance
            .iter_mut()
            .find(|a| a.id == id && a.check_in.is_none())
        {
            Some(record) => {
                record.check_in = Some(at);
                record.method = method;
                record.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_check_out(&self, id: u64, at: NaiveDateTime) -> StoreResult<bool> {
        let mut tables = self.write();
        match tables
            .attendance
            .iter_mut()
            .find(|a| a.id == id && a.check_in.is_some() && a.check_out.is_none())
        {
            Some(record) => {
                record.check_out = Some(at);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl PerformanceRepository for MemoryStore {
    async fn upsert_performance_batch(&self, batch: &[NewPerformance]) -> StoreResult<()> {
        let mut tables = self.write();
        for entry in batch {
            let (month, year) = (entry.period.month(), entry.period.year());
            let existing = tables
                .performance
                .iter()
                .position(|p| p.staff_id == entry.staff_id && p.month == month && p.year == year);

            match existing {
                Some(index) => {
                    let record = &mut tables.performance[index];
                    record.attendance_score = entry.attendance_score;
                    record.punctuality_score = entry.punctuality_score;
                    record.overall_score = entry.overall_score;
                    record.remarks = entry.remarks.clone();
                }
                None => {
                    let record = PerformanceRecord {
                        id: tables.next_id(),
                        staff_id: entry.staff_id,
                        month,
                        year,
                        attendance_score: entry.attendance_score,
                        punctuality_score: entry.punctuality_score,
                        overall_score: entry.overall_score,
                        remarks: entry.remarks.clone(),
                        created_at: now(),
                    };
                    tables.performance.push(record);
                }
            }
        }
        Ok(())
    }

    async fn performance_for_period(&self, period: Period) -> StoreResult<Vec<PerformanceRecord>> {
        let mut records: Vec<_> = self
            .read()
            .performance
            .iter()
            .filter(|p| p.month == period.month() && p.year == period.year())
            .cloned()
            .collect();
        records.sort_by_key(|p| p.staff_id);
        Ok(records)
    }
}

fn in_period(record: &SalaryRecord, period: Period) -> bool {
    record.month == period.month() && record.year == period.year()
}

#[async_trait]
impl SalaryRepository for MemoryStore {
    async fn salaried_staff_ids(&self, period: Period) -> StoreResult<HashSet<StaffId>> {
        Ok(self
            .read()
            .salaries
            .iter()
            .filter(|s| in_period(s, period))
            .map(|s| s.staff_id)
            .collect())
    }

    async fn insert_salary_batch(&self, batch: &[NewSalary]) -> StoreResult<u64> {
        let mut tables = self.write();

        // validate the whole batch before touching the table
        let mut seen = HashSet::new();
        for salary in batch {
            let taken = tables
                .salaries
                .iter()
                .any(|s| s.staff_id == salary.staff_id && in_period(s, salary.period));
            if taken || !seen.insert((salary.staff_id, salary.period)) {
                return Err(StoreError::Duplicate {
                    entity: "salary",
                    key: format!("{}/{}", salary.staff_id, salary.period),
                });
            }
        }

        for salary in batch {
            let record = SalaryRecord {
                id: tables.next_id(),
                staff_id: salary.staff_id,
                month: salary.period.month(),
                year: salary.period.year(),
                base_salary: salary.base_salary,
                attendance_bonus: salary.attendance_bonus,
                performance_bonus: salary.performance_bonus,
                total_salary: salary.total_salary,
                paid: false,
                paid_at: None,
                created_at: now(),
            };
            tables.salaries.push(record);
        }
        Ok(batch.len() as u64)
    }

    async fn salaries_for_period(&self, period: Period) -> StoreResult<Vec<SalaryRecord>> {
        Ok(self
            .read()
            .salaries
            .iter()
            .filter(|s| in_period(s, period))
            .cloned()
            .collect())
    }

    async fn find_salary(&self, id: u64) -> StoreResult<Option<SalaryRecord>> {
        Ok(self.read().salaries.iter().find(|s| s.id == id).cloned())
    }

    async fn mark_salary_paid(&self, id: u64, at: NaiveDateTime) -> StoreResult<bool> {
        let mut tables = self.write();
        match tables.salaries.iter_mut().find(|s| s.id == id && !s.paid) {
            Some(record) => {
                record.paid = true;
                record.paid_at = Some(at);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn salary_totals(&self, period: Period) -> StoreResult<SalaryTotals> {
        let tables = self.read();
        let in_scope = tables.salaries.iter().filter(|s| in_period(s, period));
        let (pending, total_budget) =
            in_scope.fold((0i64, Decimal::ZERO), |(pending, total), s| {
                (pending + i64::from(!s.paid), total + s.total_salary)
            });
        Ok(SalaryTotals {
            pending,
            total_budget,
        })
    }
}

#[async_trait]
impl ProcurementRepository for MemoryStore {
    async fn insert_procurement(
        &self,
        request: &CreateProcurement,
        total_amount: Decimal,
        requested_by: StaffId,
    ) -> StoreResult<ProcurementRequest> {
        let mut tables = self.write();
        let record = ProcurementRequest {
            id: tables.next_id(),
            item_name: request.item_name.clone(),
            description: request.description.clone(),
            quantity: request.quantity,
            unit_price: request.unit_price,
            total_amount,
            supplier: request.supplier.clone(),
            requested_by,
            approved_by: None,
            status: ProcurementStatus::Pending,
            created_at: now(),
        };
        tables.procurement.push(record.clone());
        Ok(record)
    }

    async fn list_procurements(&self) -> StoreResult<Vec<ProcurementRequest>> {
        Ok(self.read().procurement.clone())
    }

    async fn find_procurement(&self, id: u64) -> StoreResult<Option<ProcurementRequest>> {
        Ok(self.read().procurement.iter().find(|p| p.id == id).cloned())
    }

    async fn update_procurement_status(
        &self,
        id: u64,
        from: ProcurementStatus,
        to: ProcurementStatus,
        approved_by: Option<StaffId>,
    ) -> StoreResult<bool> {
        let mut tables = self.write();
        match tables
            .procurement
            .iter_mut()
            .find(|p| p.id == id && p.status == from)
        {
            Some(record) => {
                record.status = to;
                if approved_by.is_some() {
                    record.approved_by = approved_by;
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl NotificationRepository for MemoryStore {
    async fn insert_notification(&self, new: &NewNotification) -> StoreResult<Notification> {
        let mut tables = self.write();
        let notification = Notification {
            id: tables.next_id(),
            recipient_id: new.recipient_id,
            title: new.title.clone(),
            message: new.message.clone(),
            kind: new.kind,
            sent: false,
            sent_at: None,
            created_at: now(),
        };
        tables.notifications.push(notification.clone());
        Ok(notification)
    }

    async fn notifications_for(&self, recipient: StaffId) -> StoreResult<Vec<Notification>> {
        // ids grow with insertion, so reverse id order is newest first
        let mut inbox: Vec<_> = self
            .read()
            .notifications
            .iter()
            .filter(|n| n.recipient_id == recipient)
            .cloned()
            .collect();
        inbox.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(inbox)
    }

    async fn find_notification(&self, id: u64) -> StoreResult<Option<Notification>> {
        Ok(self.read().notifications.iter().find(|n| n.id == id).cloned())
    }

    async fn mark_notification_sent(&self, id: u64, at: NaiveDateTime) -> StoreResult<bool> {
        let mut tables = self.write();
        match tables.notifications.iter_mut().find(|n| n.id == id && !n.sent) {
            Some(notification) => {
                notification.sent = true;
                notification.sent_at = Some(at);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl TimetableRepository for MemoryStore {
    async fn insert_timetable_entry(&self, new: &NewTimetableEntry) -> StoreResult<TimetableEntry> {
        let mut tables = self.write();
        let entry = TimetableEntry {
            id: tables.next_id(),
            teacher_id: new.teacher_id,
            subject: new.subject.clone(),
            day_of_week: new.day_of_week,
            start_time: new.start_time,
            end_time: new.end_time,
            room: new.room.clone(),
            class_name: new.class_name.clone(),
        };
        tables.timetable.push(entry.clone());
        Ok(entry)
    }

    async fn timetable_for(&self, teacher_id: StaffId) -> StoreResult<Vec<TimetableEntry>> {
        let mut slots: Vec<_> = self
            .read()
            .timetable
            .iter()
            .filter(|t| t.teacher_id == teacher_id)
            .cloned()
            .collect();
        slots.sort_by_key(|t| (t.day_of_week.num_days_from_monday(), t.start_time, t.id));
        Ok(slots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn period() -> Period {
        Period::new(3, 2024).unwrap()
    }

    fn salary(staff_id: StaffId) -> NewSalary {
        NewSalary {
            staff_id,
            period: period(),
            base_salary: dec("50000"),
            attendance_bonus: Decimal::ZERO,
            performance_bonus: Decimal::ZERO,
            total_salary: dec("50000"),
        }
    }

    #[tokio::test]
    async fn salary_batch_is_all_or_nothing() {
        let store = MemoryStore::new();
        store.insert_salary_batch(&[salary(2)]).await.unwrap();

        let result = store.insert_salary_batch(&[salary(1), salary(2)]).await;

        assert!(matches!(result, Err(StoreError::Duplicate { entity: "salary", .. })));
        assert_eq!(store.salary_count(), 1);
        let ids = store.salaried_staff_ids(period()).await.unwrap();
        assert!(!ids.contains(&1));
    }

    #[tokio::test]
    async fn duplicate_within_one_batch_is_rejected() {
        let store = MemoryStore::new();
        let result = store.insert_salary_batch(&[salary(1), salary(1)]).await;
        assert!(result.is_err());
        assert_eq!(store.salary_count(), 0);
    }

    #[tokio::test]
    async fn attendance_is_unique_per_day() {
        let store = MemoryStore::new();
        let day = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let new = || NewAttendance {
            staff_id: 7,
            date: day,
            check_in: None,
            method: CheckInMethod::Manual,
            status: AttendanceStatus::Absent,
        };

        store.insert_attendance(new()).await.unwrap();
        let second = store.insert_attendance(new()).await;

        assert!(matches!(second, Err(StoreError::Duplicate { entity: "attendance", .. })));
        assert_eq!(store.count_attendance_on(day).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn upsert_replaces_existing_scores() {
        let store = MemoryStore::new();
        let mut entry = NewPerformance {
            staff_id: 1,
            period: period(),
            attendance_score: 5.0,
            punctuality_score: 5.0,
            overall_score: 5.0,
            remarks: None,
        };
        store.upsert_performance_batch(&[entry.clone()]).await.unwrap();
        entry.overall_score = 9.0;
        store.upsert_performance_batch(&[entry]).await.unwrap();

        let records = store.performance_for_period(period()).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].overall_score, 9.0);
    }

    #[tokio::test]
    async fn notifications_are_marked_sent_once() {
        let store = MemoryStore::new();
        let new = NewNotification {
            recipient_id: 3,
            title: "Staff meeting".to_string(),
            message: "Friday 14:00 in the hall".to_string(),
            kind: Default::default(),
        };
        let first = store.insert_notification(&new).await.unwrap();
        let second = store.insert_notification(&new).await.unwrap();
        assert!(!first.sent);

        let at = NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        assert!(store.mark_notification_sent(first.id, at).await.unwrap());
        assert!(!store.mark_notification_sent(first.id, at).await.unwrap());

        let inbox = store.notifications_for(3).await.unwrap();
        let ids: Vec<u64> = inbox.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
        assert_eq!(inbox[1].sent_at, Some(at));
        assert!(store.notifications_for(4).await.unwrap().is_empty());
    }
}
