use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use super::staff::StaffId;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProcurementStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
}

impl ProcurementStatus {
    pub fn can_move_to(&self, next: ProcurementStatus) -> bool {
        use ProcurementStatus::*;
        matches!(
            (self, next),
            (Pending, Approved) | (Pending, Rejected) | (Approved, Completed)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcurementRequest {
    pub id: u64,
    pub item_name: String,
    pub description: Option<String>,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub total_amount: Decimal,
    pub supplier: Option<String>,
    pub requested_by: StaffId,
    pub approved_by: Option<StaffId>,
    pub status: ProcurementStatus,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProcurement {
    pub item_name: String,
    pub description: Option<String>,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub supplier: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::ProcurementStatus::*;

    #[test]
    fn pending_can_be_approved_or_rejected() {
        assert!(Pending.can_move_to(Approved));
        assert!(Pending.can_move_to(Rejected));
        assert!(!Pending.can_move_to(Completed));
    }

    #[test]
    fn only_approved_requests_complete() {
        assert!(Approved.can_move_to(Completed));
        assert!(!Rejected.can_move_to(Completed));
        assert!(!Completed.can_move_to(Pending));
        assert!(!Approved.can_move_to(Approved));
    }
}
