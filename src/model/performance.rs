use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{period::Period, staff::StaffId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRecord {
    pub id: u64,
    pub staff_id: StaffId,
    pub month: u32,
    pub year: i32,
    pub attendance_score: f64,
    pub punctuality_score: f64,
    pub overall_score: f64,
    pub remarks: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Upsert payload keyed by (staff_id, period).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPerformance {
    pub staff_id: StaffId,
    pub period: Period,
    pub attendance_score: f64,
    pub punctuality_score: f64,
    pub overall_score: f64,
    pub remarks: Option<String>,
}
