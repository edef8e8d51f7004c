use std::env;

use crate::engine::distance::check_bounds;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub log_format: LogFormat,
    pub min_distance_km: f64,
    pub max_distance_km: f64,
    pub conflict_retries: u32,
    pub scenario_path: String,
    pub print_metrics: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Compact,
            min_distance_km: 1.0,
            max_distance_km: 20.0,
            conflict_retries: 1,
            scenario_path: "scenarios/walt.json".to_string(),
            print_metrics: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let _ = dotenvy::dotenv();
        let defaults = Self::default();

        let config = Self {
            log_level: env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            log_format: parse_log_format(env::var("LOG_FORMAT").ok().as_deref())?,
            min_distance_km: parse_or_default("MIN_DISTANCE_KM", defaults.min_distance_km)?,
            max_distance_km: parse_or_default("MAX_DISTANCE_KM", defaults.max_distance_km)?,
            conflict_retries: parse_or_default("CONFLICT_RETRIES", defaults.conflict_retries)?,
            scenario_path: env::var("SCENARIO_PATH").unwrap_or(defaults.scenario_path),
            print_metrics: parse_or_default("PRINT_METRICS", defaults.print_metrics)?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        check_bounds(self.min_distance_km, self.max_distance_km)
    }
}

fn parse_log_format(raw: Option<&str>) -> Result<LogFormat, AppError> {
    match raw.map(str::trim) {
        None | Some("") | Some("compact") => Ok(LogFormat::Compact),
        Some("json") => Ok(LogFormat::Json),
        Some(other) => Err(AppError::Internal(format!(
            "invalid LOG_FORMAT: {other}, expected compact/json"
        ))),
    }
}

fn parse_or_default<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|err| AppError::Internal(format!("invalid {key}: {err}"))),
        Err(_) => Ok(default),
    }
}
