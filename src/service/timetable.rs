use tracing::info;

use crate::auth::Actor;
use crate::error::{AppError, AppResult};
use crate::model::{NewTimetableEntry, Role, TimetableEntry};
use crate::store::{StaffRepository, TimetableRepository};

fn validate(new: &NewTimetableEntry) -> AppResult<()> {
    let invalid = |message: &str| AppError::InvalidTimetable {
        message: message.to_string(),
    };

    if new.subject.trim().is_empty() {
        return Err(invalid("subject must not be empty"));
    }
    if new.start_time >= new.end_time {
        return Err(invalid("lesson must end after it starts"));
    }
    Ok(())
}

/// Adds a weekly lesson slot to a teacher's timetable.
pub async fn add_timetable_entry<S: TimetableRepository + StaffRepository>(
    store: &S,
    actor: Actor,
    new: NewTimetableEntry,
) -> AppResult<TimetableEntry> {
    actor.require_school_admin("edit timetables")?;
    validate(&new)?;

    match store.find_staff(new.teacher_id).await? {
        Some(member) if member.role == Role::Teacher => {}
        Some(_) => {
            return Err(AppError::InvalidTimetable {
                message: format!("staff {} is not a teacher", new.teacher_id),
            });
        }
        None => {
            return Err(AppError::NotFound {
                entity: "staff",
                id: new.teacher_id,
            });
        }
    }

    let entry = store.insert_timetable_entry(&new).await?;
    info!(
        entry_id = entry.id,
        teacher_id = entry.teacher_id,
        day = %entry.day_of_week,
        "Timetable entry added"
    );
    Ok(entry)
}
