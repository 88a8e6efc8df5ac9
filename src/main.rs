use anyhow::Context;
use chrono::Local;
use clap::Parser;
use tracing::{error, info};
use tracing_appender::rolling;

use staffd::config::Config;
use staffd::db::{init_db, run_migrations};
use staffd::jobs::{self, Cli, Job};
use staffd::scoring::{SalaryPolicy, ScoringEngine};
use staffd::store::MySqlStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "staffd.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(config.log_level)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    let job = cli.into_job(Local::now().date_naive())?;
    info!(?job, "Job starting");

    if let Err(e) = run(&config, job).await {
        error!(error = %format!("{e:#}"), "Job failed");
        return Err(e);
    }

    info!("Job finished");
    Ok(())
}

async fn run(config: &Config, job: Job) -> anyhow::Result<()> {
    let pool = init_db(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    if config.run_migrations || job == Job::Migrate {
        run_migrations(&pool)
            .await
            .context("Failed to apply migrations")?;
    }

    if let Job::Scoring { kind, period } = job {
        let policy = SalaryPolicy::default().with_default_base(config.default_base_salary);
        let engine = ScoringEngine::new(MySqlStore::new(pool), policy)
            .with_conflict_retries(config.salary_conflict_retries);

        let output = jobs::run(&engine, kind, period)
            .await
            .with_context(|| format!("{kind} for {period} failed"))?;
        println!("{}", serde_json::to_string_pretty(&output)?);
    }

    Ok(())
}
