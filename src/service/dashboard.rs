use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::auth::Actor;
use crate::error::AppResult;
use crate::model::{
    AttendanceRecord, AttendanceStatus, Period, Role, SalaryTotals, StaffId, TimetableEntry,
};
use crate::store::{AttendanceRepository, SalaryRepository, StaffRepository, TimetableRepository};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminSummary {
    pub total_teachers: i64,
    pub total_students: i64,
    pub today_attendance: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeacherSummary {
    pub staff_id: StaffId,
    pub today: Option<AttendanceRecord>,
    /// Weekly lesson slots, Monday first.
    pub timetable: Vec<TimetableEntry>,
}

/// One line of the live "who is in today" list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TodayAttendanceRow {
    pub name: String,
    pub role: Role,
    pub time_in: Option<String>,
    pub time_out: Option<String>,
    pub status: AttendanceStatus,
}

fn clock(at: Option<NaiveDateTime>) -> Option<String> {
    at.map(|t| t.format("%H:%M").to_string())
}

pub async fn admin_summary<S: StaffRepository + AttendanceRepository>(
    store: &S,
    actor: Actor,
    today: NaiveDate,
) -> AppResult<AdminSummary> {
    actor.require_school_admin("view the admin dashboard")?;

    Ok(AdminSummary {
        total_teachers: store.count_staff_by_role(Role::Teacher).await?,
        total_students: store.count_staff_by_role(Role::Student).await?,
        today_attendance: store.count_attendance_on(today).await?,
    })
}

pub async fn teacher_summary<S: AttendanceRepository + TimetableRepository>(
    store: &S,
    actor: Actor,
    today: NaiveDate,
) -> AppResult<TeacherSummary> {
    actor.require_role(Role::Teacher, "view the teacher dashboard")?;

    Ok(TeacherSummary {
        staff_id: actor.staff_id,
        today: store.attendance_on(actor.staff_id, today).await?,
        timetable: store.timetable_for(actor.staff_id).await?,
    })
}

/// Pending salary count and salary budget for `period`.
pub async fn bursar_summary<S: SalaryRepository>(
    store: &S,
    actor: Actor,
    period: Period,
) -> AppResult<SalaryTotals> {
    actor.require_bursar("view the bursar dashboard")?;
    Ok(store.salary_totals(period).await?)
}

pub async fn today_attendance<S: StaffRepository + AttendanceRepository>(
    store: &S,
    actor: Actor,
    today: NaiveDate,
) -> AppResult<Vec<TodayAttendanceRow>> {
    actor.require_staff("view today's attendance")?;

    let records = store.attendance_between(today, today).await?;
    let mut rows = Vec::with_capacity(records.len());
    for record in records {
        // skip rows whose staff member has been removed
        let Some(member) = store.find_staff(record.staff_id).await? else {
            continue;
        };
        rows.push(TodayAttendanceRow {
            name: member.full_name,
            role: member.role,
            time_in: clock(record.check_in),
            time_out: clock(record.check_out),
            status: record.status,
        });
    }
    Ok(rows)
}
