//! Externally triggered batch jobs.
//!
//! A cron entry or CI schedule runs the `staffd` binary with a job name and,
//! optionally, an explicit period:
//!
//! ```text
//! staffd calculate-salaries --month 3 --year 2024
//! staffd performance-report
//! staffd record-performance --month 2
//! staffd migrate
//! ```
//!
//! Omitted period parts default to the current month.

use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use strum_macros::Display;

use crate::error::AppResult;
use crate::model::Period;
use crate::scoring::ScoringEngine;
use crate::store::ScoringStore;

#[derive(Debug, Parser)]
#[command(name = "staffd")]
#[command(about = "School staff scoring and payroll jobs")]
#[command(
    after_help = "Environment:\n  DATABASE_URL              MySQL connection string\n  DEFAULT_BASE_SALARY       Base pay for staff without one (50000)\n  SALARY_CONFLICT_RETRIES   Retries after a lost salary race (3)\n  LOG_DIR / LOG_LEVEL       Rolling log location and verbosity"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Create missing salary records for the period.
    CalculateSalaries(PeriodArgs),
    /// Print the teacher performance report as JSON.
    PerformanceReport(PeriodArgs),
    /// Store a performance record for every teacher.
    RecordPerformance(PeriodArgs),
    /// Apply the embedded schema migrations.
    Migrate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Args)]
pub struct PeriodArgs {
    /// Month 1-12; defaults to the current month.
    #[arg(long)]
    pub month: Option<u32>,
    /// Four-digit year; defaults to the current year.
    #[arg(long)]
    pub year: Option<i32>,
}

impl PeriodArgs {
    pub fn resolve(&self, today: NaiveDate) -> AppResult<Period> {
        Period::new(
            self.month.unwrap_or(today.month()),
            self.year.unwrap_or(today.year()),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ScoringJob {
    CalculateSalaries,
    PerformanceReport,
    RecordPerformance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Job {
    Migrate,
    Scoring { kind: ScoringJob, period: Period },
}

impl Cli {
    /// Resolves the command into a job. `today` supplies the default period.
    pub fn into_job(self, today: NaiveDate) -> AppResult<Job> {
        let (kind, args) = match self.command {
            Command::Migrate => return Ok(Job::Migrate),
            Command::CalculateSalaries(args) => (ScoringJob::CalculateSalaries, args),
            Command::PerformanceReport(args) => (ScoringJob::PerformanceReport, args),
            Command::RecordPerformance(args) => (ScoringJob::RecordPerformance, args),
        };
        Ok(Job::Scoring {
            kind,
            period: args.resolve(today)?,
        })
    }
}

/// Runs one scoring job and returns its result as JSON for the caller to
/// print or hand to an exporter.
pub async fn run<S: ScoringStore>(
    engine: &ScoringEngine<S>,
    kind: ScoringJob,
    period: Period,
) -> Result<Value> {
    let output = match kind {
        ScoringJob::CalculateSalaries => {
            serde_json::to_value(engine.calculate_salaries(period).await?)?
        }
        ScoringJob::PerformanceReport => {
            serde_json::to_value(engine.generate_performance_report(period).await?)?
        }
        ScoringJob::RecordPerformance => {
            serde_json::to_value(engine.record_performance(period).await?)?
        }
    };
    Ok(output)
}
