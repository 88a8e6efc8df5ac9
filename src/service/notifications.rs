use chrono::NaiveDateTime;
use tracing::info;

use crate::auth::Actor;
use crate::error::{AppError, AppResult};
use crate::model::{NewNotification, Notification};
use crate::store::{NotificationRepository, StaffRepository};

const MAX_TITLE_CHARS: usize = 100;

fn validate(new: &NewNotification) -> AppResult<()> {
    let invalid = |message: &str| AppError::InvalidNotification {
        message: message.to_string(),
    };

    let title = new.title.trim();
    if title.is_empty() {
        return Err(invalid("title must not be empty"));
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(invalid("title must be at most 100 characters"));
    }
    if new.message.trim().is_empty() {
        return Err(invalid("message must not be empty"));
    }
    Ok(())
}

/// Queues a notification for a staff member or student. The record starts
/// unsent; a delivery worker reports back through [`mark_notification_sent`].
pub async fn create_notification<S: NotificationRepository + StaffRepository>(
    store: &S,
    actor: Actor,
    new: NewNotification,
) -> AppResult<Notification> {
    actor.require_school_admin("send notifications")?;
    validate(&new)?;

    if store.find_staff(new.recipient_id).await?.is_none() {
        return Err(AppError::NotFound {
            entity: "staff",
            id: new.recipient_id,
        });
    }

    let notification = store.insert_notification(&new).await?;
    info!(
        notification_id = notification.id,
        recipient_id = new.recipient_id,
        kind = %new.kind,
        sent_by = actor.staff_id,
        "Notification queued"
    );
    Ok(notification)
}

/// The acting user's own notifications, newest first.
pub async fn list_notifications<S: NotificationRepository>(
    store: &S,
    actor: Actor,
) -> AppResult<Vec<Notification>> {
    Ok(store.notifications_for(actor.staff_id).await?)
}

pub async fn mark_notification_sent<S: NotificationRepository>(
    store: &S,
    actor: Actor,
    id: u64,
    at: NaiveDateTime,
) -> AppResult<Notification> {
    actor.require_school_admin("record notification delivery")?;

    let not_found = || AppError::NotFound {
        entity: "notification",
        id,
    };

    let current = store.find_notification(id).await?.ok_or_else(not_found)?;
    if current.sent || !store.mark_notification_sent(id, at).await? {
        return Err(AppError::AlreadySent { id });
    }

    info!(notification_id = id, kind = %current.kind, "Notification delivered");
    store.find_notification(id).await?.ok_or_else(not_found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NotificationKind;

    fn notification(title: &str, message: &str) -> NewNotification {
        NewNotification {
            recipient_id: 1,
            title: title.to_string(),
            message: message.to_string(),
            kind: NotificationKind::Email,
        }
    }

    #[test]
    fn requires_title_and_message() {
        assert!(validate(&notification("Exam timetable", "Published today")).is_ok());
        assert!(validate(&notification(" ", "Published today")).is_err());
        assert!(validate(&notification("Exam timetable", "")).is_err());
    }

    #[test]
    fn caps_title_length() {
        let long = "x".repeat(101);
        let err = validate(&notification(&long, "body")).unwrap_err();
        assert!(err.to_string().contains("at most 100"));
        assert!(validate(&notification(&"x".repeat(100), "body")).is_ok());
    }
}
