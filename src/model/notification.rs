use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use super::staff::StaffId;

/// Delivery channel. Delivery itself happens outside this crate; the record
/// only tracks whether it went out.
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    Eq,
    PartialEq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NotificationKind {
    Email,
    Sms,
    #[default]
    System,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: u64,
    pub recipient_id: StaffId,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub sent: bool,
    pub sent_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewNotification {
    pub recipient_id: StaffId,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub kind: NotificationKind,
}
