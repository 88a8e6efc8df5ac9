use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use super::staff::StaffId;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
}

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CheckInMethod {
    Face,
    Fingerprint,
    Manual,
}

/// One row per staff member per calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: u64,
    pub staff_id: StaffId,
    pub date: NaiveDate,
    pub check_in: Option<NaiveDateTime>,
    pub check_out: Option<NaiveDateTime>,
    pub method: CheckInMethod,
    pub status: AttendanceStatus,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct NewAttendance {
    pub staff_id: StaffId,
    pub date: NaiveDate,
    pub check_in: Option<NaiveDateTime>,
    pub method: CheckInMethod,
    pub status: AttendanceStatus,
}
