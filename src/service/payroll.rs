use chrono::NaiveDateTime;
use tracing::info;

use crate::auth::Actor;
use crate::error::{AppError, AppResult};
use crate::model::{Period, SalaryRecord};
use crate::scoring::{SalaryRunSummary, ScoringEngine};
use crate::store::{SalaryRepository, ScoringStore};

pub async fn calculate_salaries<S: ScoringStore>(
    engine: &ScoringEngine<S>,
    actor: Actor,
    period: Period,
) -> AppResult<SalaryRunSummary> {
    actor.require_bursar("calculate salaries")?;
    engine.calculate_salaries(period).await
}

pub async fn list_salaries<S: SalaryRepository>(
    store: &S,
    actor: Actor,
    period: Period,
) -> AppResult<Vec<SalaryRecord>> {
    actor.require_bursar("view salaries")?;
    Ok(store.salaries_for_period(period).await?)
}

pub async fn mark_salary_paid<S: SalaryRepository>(
    store: &S,
    actor: Actor,
    salary_id: u64,
    now: NaiveDateTime,
) -> AppResult<SalaryRecord> {
    actor.require_bursar("pay salaries")?;

    let not_found = || AppError::NotFound {
        entity: "salary",
        id: salary_id,
    };

    let current = store.find_salary(salary_id).await?.ok_or_else(not_found)?;
    if current.paid || !store.mark_salary_paid(salary_id, now).await? {
        return Err(AppError::AlreadyPaid { id: salary_id });
    }

    info!(salary_id, staff_id = current.staff_id, total = %current.total_salary, "Salary paid");
    store.find_salary(salary_id).await?.ok_or_else(not_found)
}
