use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tracing::{error, info};

use crate::auth::Actor;
use crate::error::{AppError, AppResult};
use crate::model::{AttendanceRecord, AttendanceStatus, CheckInMethod, NewAttendance, StaffId};
use crate::store::{AttendanceRepository, StaffRepository, StoreError};

/// Present when checking in at or before `late_after`, late otherwise.
pub fn status_for(check_in: NaiveDateTime, late_after: NaiveTime) -> AttendanceStatus {
    if check_in.time() > late_after {
        AttendanceStatus::Late
    } else {
        AttendanceStatus::Present
    }
}

async fn reload<S: AttendanceRepository>(
    store: &S,
    staff_id: StaffId,
    date: NaiveDate,
) -> AppResult<AttendanceRecord> {
    store
        .attendance_on(staff_id, date)
        .await?
        .ok_or(AppError::NotFound {
            entity: "attendance for staff",
            id: staff_id,
        })
}

/// Check-in for the acting staff member.
///
/// Fills in a record created earlier the same day without a check-in (for
/// example a recorded absence), otherwise inserts a new one.
pub async fn check_in<S: AttendanceRepository>(
    store: &S,
    actor: Actor,
    method: CheckInMethod,
    now: NaiveDateTime,
    late_after: NaiveTime,
) -> AppResult<AttendanceRecord> {
    actor.require_staff("check in")?;

    let staff_id = actor.staff_id;
    let today = now.date();
    let status = status_for(now, late_after);

    match store.attendance_on(staff_id, today).await? {
        Some(existing) if existing.check_in.is_some() => Err(AppError::AlreadyCheckedIn),
        Some(existing) => {
            if !store.set_check_in(existing.id, now, method, status).await? {
                return Err(AppError::AlreadyCheckedIn);
            }
            info!(staff_id, %status, "Checked in over existing record");
            reload(store, staff_id, today).await
        }
        None => {
            let new = NewAttendance {
                staff_id,
                date: today,
                check_in: Some(now),
                method,
                status,
            };
            match store.insert_attendance(new).await {
                Ok(record) => {
                    info!(staff_id, %status, "Checked in");
                    Ok(record)
                }
                // a concurrent check-in won the unique key
                Err(StoreError::Duplicate { .. }) => Err(AppError::AlreadyCheckedIn),
                Err(e) => {
                    error!(error = %e, staff_id, "Check-in failed");
                    Err(e.into())
                }
            }
        }
    }
}

pub async fn check_out<S: AttendanceRepository>(
    store: &S,
    actor: Actor,
    now: NaiveDateTime,
) -> AppResult<AttendanceRecord> {
    actor.require_staff("check out")?;

    let staff_id = actor.staff_id;
    let today = now.date();

    let record = store
        .attendance_on(staff_id, today)
        .await?
        .filter(|r| r.check_in.is_some())
        .ok_or(AppError::NotCheckedIn)?;

    if record.check_out.is_some() || !store.set_check_out(record.id, now).await? {
        return Err(AppError::AlreadyCheckedOut);
    }

    info!(staff_id, "Checked out");
    reload(store, staff_id, today).await
}

/// Records an absence for a staff member who never checked in.
pub async fn record_absence<S: AttendanceRepository + StaffRepository>(
    store: &S,
    actor: Actor,
    staff_id: StaffId,
    date: NaiveDate,
) -> AppResult<AttendanceRecord> {
    actor.require_school_admin("record absences")?;

    if store.find_staff(staff_id).await?.is_none() {
        return Err(AppError::NotFound {
            entity: "staff",
            id: staff_id,
        });
    }

    let new = NewAttendance {
        staff_id,
        date,
        check_in: None,
        method: CheckInMethod::Manual,
        status: AttendanceStatus::Absent,
    };

    match store.insert_attendance(new).await {
        Ok(record) => {
            info!(staff_id, %date, recorded_by = actor.staff_id, "Absence recorded");
            Ok(record)
        }
        Err(StoreError::Duplicate { .. }) => Err(AppError::AttendanceExists { staff_id, date }),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn on_the_dot_is_present() {
        let cutoff = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
        assert_eq!(status_for(at(7, 30), cutoff), AttendanceStatus::Present);
        assert_eq!(status_for(at(8, 0), cutoff), AttendanceStatus::Present);
        assert_eq!(status_for(at(8, 1), cutoff), AttendanceStatus::Late);
    }

    #[tokio::test]
    async fn missing_record_is_reported_against_the_staff_member() {
        let store = MemoryStore::new();
        let err = reload(&store, 7, at(9, 0).date()).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::NotFound {
                entity: "attendance for staff",
                id: 7
            }
        ));
        assert_eq!(err.to_string(), "attendance for staff 7 not found");
    }
}
