use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{period::Period, staff::StaffId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryRecord {
    pub id: u64,
    pub staff_id: StaffId,
    pub month: u32,
    pub year: i32,
    pub base_salary: Decimal,
    pub attendance_bonus: Decimal,
    pub performance_bonus: Decimal,
    pub total_salary: Decimal,
    pub paid: bool,
    pub paid_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

/// A salary computed by a run but not yet persisted. Always unpaid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewSalary {
    pub staff_id: StaffId,
    pub period: Period,
    pub base_salary: Decimal,
    pub attendance_bonus: Decimal,
    pub performance_bonus: Decimal,
    pub total_salary: Decimal,
}

/// Aggregate figures for the bursar dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalaryTotals {
    pub pending: i64,
    pub total_budget: Decimal,
}
