use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use super::staff::StaffId;

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Inverse of `Weekday::num_days_from_monday`.
pub fn weekday_from_index(index: u8) -> Option<Weekday> {
    WEEK.get(usize::from(index)).copied()
}

/// One weekly lesson slot of a teacher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimetableEntry {
    pub id: u64,
    pub teacher_id: StaffId,
    pub subject: String,
    pub day_of_week: Weekday,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub room: Option<String>,
    pub class_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTimetableEntry {
    pub teacher_id: StaffId,
    pub subject: String,
    pub day_of_week: Weekday,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub room: Option<String>,
    pub class_name: Option<String>,
}
