use futures::future::try_join_all;
use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use super::salary::{derive_salary, SalaryPolicy};
use super::score::{classify, score_attendance, PerformanceStatus, ScoreBreakdown};
use crate::error::{AppError, AppResult};
use crate::model::{NewPerformance, NewSalary, Period, Role, StaffId, StaffMember};
use crate::store::{ScoringStore, StoreError};

pub const DEFAULT_CONFLICT_RETRIES: u32 = 3;

const EMPTY_PERIOD_REMARK: &str = "No attendance recorded";

/// One line of the monthly teacher performance report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub staff_id: StaffId,
    pub name: String,
    pub score: f64,
    pub status: PerformanceStatus,
}

/// Outcome of a salary run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalaryRunSummary {
    pub period: Period,
    /// Salaries written by this run.
    pub created: Vec<NewSalary>,
    /// Salaried staff that already had a record for the period.
    pub skipped: usize,
}

/// Stateless scoring over a store. Every call reads what it needs, writes its
/// batch in one unit of work and keeps nothing between calls.
pub struct ScoringEngine<S> {
    store: S,
    policy: SalaryPolicy,
    conflict_retries: u32,
}

impl<S: ScoringStore> ScoringEngine<S> {
    pub fn new(store: S, policy: SalaryPolicy) -> Self {
        Self {
            store,
            policy,
            conflict_retries: DEFAULT_CONFLICT_RETRIES,
        }
    }

    /// How many times a salary run re-reads the period after losing a
    /// unique-key race before giving up.
    pub fn with_conflict_retries(mut self, retries: u32) -> Self {
        self.conflict_retries = retries;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn policy(&self) -> &SalaryPolicy {
        &self.policy
    }

    /// Attendance, punctuality and overall score of one staff member.
    pub async fn score_breakdown(
        &self,
        staff_id: StaffId,
        period: Period,
    ) -> AppResult<ScoreBreakdown> {
        let records = self.store.attendance_for_period(staff_id, period).await?;
        let breakdown = score_attendance(&records);
        debug!(
            staff_id,
            %period,
            days = breakdown.days,
            overall = breakdown.overall,
            "Scored attendance"
        );
        Ok(breakdown)
    }

    /// Overall performance score in `[0, 10]`; 0.0 when the period has no
    /// attendance records.
    pub async fn compute_performance_score(
        &self,
        staff_id: StaffId,
        period: Period,
    ) -> AppResult<f64> {
        Ok(self.score_breakdown(staff_id, period).await?.overall)
    }

    /// One row per teacher, in enrolment order.
    #[instrument(skip(self, period), fields(period = %period))]
    pub async fn generate_performance_report(&self, period: Period) -> AppResult<Vec<ReportRow>> {
        let teachers = self.store.list_staff_by_roles(&[Role::Teacher]).await?;

        let rows = try_join_all(teachers.into_iter().map(|teacher| async move {
            let score = self.compute_performance_score(teacher.id, period).await?;
            Ok::<_, AppError>(ReportRow {
                staff_id: teacher.id,
                name: teacher.full_name,
                score,
                status: classify(score),
            })
        }))
        .await?;

        info!(teachers = rows.len(), "Performance report generated");
        Ok(rows)
    }

    /// Upserts a performance record for every teacher.
    #[instrument(skip(self, period), fields(period = %period))]
    pub async fn record_performance(&self, period: Period) -> AppResult<Vec<NewPerformance>> {
        let teachers = self.store.list_staff_by_roles(&[Role::Teacher]).await?;

        let mut batch = Vec::with_capacity(teachers.len());
        for teacher in &teachers {
            let breakdown = self.score_breakdown(teacher.id, period).await?;
            let remarks = if breakdown.is_empty() {
                EMPTY_PERIOD_REMARK.to_string()
            } else {
                classify(breakdown.overall).to_string()
            };

            batch.push(NewPerformance {
                staff_id: teacher.id,
                period,
                attendance_score: breakdown.attendance,
                punctuality_score: breakdown.punctuality,
                overall_score: breakdown.overall,
                remarks: Some(remarks),
            });
        }

        if let Err(e) = self.store.upsert_performance_batch(&batch).await {
            error!(error = %e, "Failed to store performance records");
            return Err(e.into());
        }

        info!(records = batch.len(), "Performance recorded");
        Ok(batch)
    }

    /// Creates the period's salary record for every salaried staff member that
    /// has none yet.
    ///
    /// Existing records are never touched, so running a period twice is a
    /// no-op. New records are written as one batch; if another writer
    /// inserts a record for the same period first, the batch is rolled back
    /// and the run starts over from the existence check.
    #[instrument(skip(self, period), fields(period = %period, run_id = %Uuid::new_v4()))]
    pub async fn calculate_salaries(&self, period: Period) -> AppResult<SalaryRunSummary> {
        let attempts = self.conflict_retries + 1;

        for attempt in 1..=attempts {
            let (created, skipped) = self.draft_salaries(period).await?;

            if created.is_empty() {
                info!(skipped, "Salaries already calculated for period");
                return Ok(SalaryRunSummary {
                    period,
                    created,
                    skipped,
                });
            }

            match self.store.insert_salary_batch(&created).await {
                Ok(inserted) => {
                    info!(inserted, skipped, attempt, "Salary run committed");
                    return Ok(SalaryRunSummary {
                        period,
                        created,
                        skipped,
                    });
                }
                Err(StoreError::Duplicate { key, .. }) => {
                    warn!(attempt, key = %key, "Salary batch lost a race, retrying");
                }
                Err(e) => {
                    error!(error = %e, "Salary run failed, nothing written");
                    return Err(e.into());
                }
            }
        }

        error!(attempts, "Salary run gave up after repeated conflicts");
        Err(AppError::PeriodConflict { period, attempts })
    }

    async fn draft_salaries(&self, period: Period) -> AppResult<(Vec<NewSalary>, usize)> {
        let staff = self.store.list_staff_by_roles(&Role::SALARIED).await?;
        let existing = self.store.salaried_staff_ids(period).await?;

        let mut drafts = Vec::new();
        let mut skipped = 0;
        for member in &staff {
            if existing.contains(&member.id) {
                skipped += 1;
                continue;
            }
            drafts.push(self.draft_salary(member, period).await?);
        }
        Ok((drafts, skipped))
    }

    async fn draft_salary(&self, member: &StaffMember, period: Period) -> AppResult<NewSalary> {
        let score = self.compute_performance_score(member.id, period).await?;
        let base = member.base_salary.unwrap_or(self.policy.default_base);
        let salary = derive_salary(base, score, &self.policy);

        debug!(staff_id = member.id, score, total = %salary.total, "Drafted salary");

        Ok(NewSalary {
            staff_id: member.id,
            period,
            base_salary: salary.base,
            attendance_bonus: salary.attendance_bonus,
            performance_bonus: salary.performance_bonus,
            total_salary: salary.total,
        })
    }
}
