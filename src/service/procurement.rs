use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::auth::Actor;
use crate::error::{AppError, AppResult};
use crate::model::{CreateProcurement, ProcurementRequest, ProcurementStatus, StaffId};
use crate::store::ProcurementRepository;

/// Money columns hold cents.
const PRICE_SCALE: u32 = 2;

fn invalid<T>(message: &str) -> AppResult<T> {
    Err(AppError::InvalidProcurement {
        message: message.to_string(),
    })
}

fn validate(request: &CreateProcurement) -> AppResult<()> {
    if request.item_name.trim().is_empty() {
        return invalid("item name must not be empty");
    }
    if request.quantity == 0 {
        return invalid("quantity must be at least 1");
    }
    if request.unit_price.is_sign_negative() {
        return invalid("unit price must not be negative");
    }
    if request.unit_price.scale() > PRICE_SCALE {
        return invalid("unit price must not have more than two decimal places");
    }
    Ok(())
}

/// Quantity times unit price, failing instead of overflowing.
fn total_amount(request: &CreateProcurement) -> AppResult<Decimal> {
    match Decimal::from(request.quantity).checked_mul(request.unit_price) {
        Some(total) => Ok(total),
        None => invalid("total amount overflows"),
    }
}

pub async fn create_procurement<S: ProcurementRepository>(
    store: &S,
    actor: Actor,
    request: CreateProcurement,
) -> AppResult<ProcurementRequest> {
    actor.require_staff("request procurement")?;
    validate(&request)?;

    let total = total_amount(&request)?;
    let created = store
        .insert_procurement(&request, total, actor.staff_id)
        .await?;

    info!(
        procurement_id = created.id,
        requested_by = actor.staff_id,
        total = %total,
        "Procurement requested"
    );
    Ok(created)
}

pub async fn list_procurements<S: ProcurementRepository>(
    store: &S,
    actor: Actor,
) -> AppResult<Vec<ProcurementRequest>> {
    actor.require_management("view procurement")?;
    Ok(store.list_procurements().await?)
}

pub async fn approve_procurement<S: ProcurementRepository>(
    store: &S,
    actor: Actor,
    id: u64,
) -> AppResult<ProcurementRequest> {
    actor.require_school_admin("approve procurement")?;
    transition(store, id, ProcurementStatus::Approved, Some(actor.staff_id)).await
}

pub async fn reject_procurement<S: ProcurementRepository>(
    store: &S,
    actor: Actor,
    id: u64,
) -> AppResult<ProcurementRequest> {
    actor.require_school_admin("reject procurement")?;
    transition(store, id, ProcurementStatus::Rejected, None).await
}

pub async fn complete_procurement<S: ProcurementRepository>(
    store: &S,
    actor: Actor,
    id: u64,
) -> AppResult<ProcurementRequest> {
    actor.require_bursar("complete procurement")?;
    transition(store, id, ProcurementStatus::Completed, None).await
}

async fn find<S: ProcurementRepository>(store: &S, id: u64) -> AppResult<ProcurementRequest> {
    store
        .find_procurement(id)
        .await?
        .ok_or(AppError::NotFound {
            entity: "procurement",
            id,
        })
}

async fn transition<S: ProcurementRepository>(
    store: &S,
    id: u64,
    to: ProcurementStatus,
    approved_by: Option<StaffId>,
) -> AppResult<ProcurementRequest> {
    let current = find(store, id).await?;
    if !current.status.can_move_to(to) {
        return Err(AppError::InvalidTransition {
            from: current.status,
            to,
        });
    }

    if !store
        .update_procurement_status(id, current.status, to, approved_by)
        .await?
    {
        let latest = find(store, id).await?;
        warn!(procurement_id = id, status = %latest.status, "Procurement changed concurrently");
        return Err(AppError::InvalidTransition {
            from: latest.status,
            to,
        });
    }

    info!(procurement_id = id, from = %current.status, to = %to, "Procurement status changed");
    find(store, id).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(quantity: u32, unit_price: Decimal) -> CreateProcurement {
        CreateProcurement {
            item_name: "Whiteboard markers".to_string(),
            description: None,
            quantity,
            unit_price,
            supplier: Some("Stationers Ltd".to_string()),
        }
    }

    #[test]
    fn rejects_zero_quantity() {
        let err = validate(&request(0, Decimal::ONE)).unwrap_err();
        assert!(err.to_string().contains("quantity"));
    }

    #[test]
    fn rejects_negative_price() {
        assert!(validate(&request(3, Decimal::new(-1, 0))).is_err());
    }

    #[test]
    fn rejects_blank_item_name() {
        let mut req = request(1, Decimal::ONE);
        req.item_name = "   ".to_string();
        assert!(validate(&req).is_err());
    }

    #[test]
    fn accepts_free_items() {
        assert!(validate(&request(5, Decimal::ZERO)).is_ok());
    }

    #[test]
    fn rejects_sub_cent_prices() {
        let err = validate(&request(2, Decimal::new(1_999, 3))).unwrap_err();
        assert!(err.to_string().contains("decimal places"));
        assert!(validate(&request(2, Decimal::new(1_999, 2))).is_ok());
    }

    #[test]
    fn total_is_quantity_times_price() {
        let total = total_amount(&request(12, Decimal::new(145_050, 2))).unwrap();
        assert_eq!(total, Decimal::new(1_740_600, 2));
    }

    #[test]
    fn overflowing_total_is_rejected() {
        let err = total_amount(&request(1_000_000, Decimal::MAX)).unwrap_err();
        assert!(matches!(
            err,
            AppError::InvalidProcurement { ref message } if message == "total amount overflows"
        ));
    }
}
