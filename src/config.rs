use std::env;
use std::str::FromStr;

use chrono::NaiveTime;
use dotenvy::dotenv;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::Level;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has invalid value {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,

    // Payroll
    pub default_base_salary: Decimal,
    pub salary_conflict_retries: u32,

    // Attendance
    pub late_after: NaiveTime, // check-ins after this are marked late

    // Logging
    pub log_dir: String,
    pub log_level: Level,

    pub run_migrations: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process
    /// environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let late_after = get("LATE_AFTER", "08:00");

        Ok(Self {
            database_url: lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
            default_base_salary: parsed("DEFAULT_BASE_SALARY", get("DEFAULT_BASE_SALARY", "50000"))?,
            salary_conflict_retries: parsed(
                "SALARY_CONFLICT_RETRIES",
                get("SALARY_CONFLICT_RETRIES", "3"),
            )?,
            late_after: NaiveTime::parse_from_str(late_after.trim(), "%H:%M").map_err(|_| {
                ConfigError::Invalid {
                    key: "LATE_AFTER",
                    value: late_after.clone(),
                }
            })?,
            log_dir: get("LOG_DIR", "logs"),
            log_level: parsed("LOG_LEVEL", get("LOG_LEVEL", "debug"))?,
            run_migrations: parsed("RUN_MIGRATIONS", get("RUN_MIGRATIONS", "false"))?,
        })
    }
}

fn parsed<T: FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { key, value })
}
