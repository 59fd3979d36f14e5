use std::env;
use std::fmt;

use crate::eligibility::{Postcode, PostcodeError};
use crate::listings::DEFAULT_WINDOW_DAYS;

/// Default pagination bound per (postcode, pack) query; debug workflows
/// override it down to 1.
const DEFAULT_MAX_PAGES: u32 = 5;

/// Top-level configuration for the monitor.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub run: RunConfig,
    pub telemetry: TelemetryConfig,
}

/// Settings controlling one fetch run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub window_days: u32,
    pub max_pages: u32,
    pub limit_poas: Vec<Postcode>,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let window_days = match env::var("JOBS_WINDOW_DAYS") {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|_| ConfigError::InvalidWindowDays)?,
            Err(_) => DEFAULT_WINDOW_DAYS,
        };

        let max_pages = match env::var("MAX_PAGES") {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|_| ConfigError::InvalidMaxPages)?,
            Err(_) => DEFAULT_MAX_PAGES,
        };

        let limit_poas = match env::var("LIMIT_POAS") {
            Ok(raw) => parse_poa_list(&raw)?,
            Err(_) => Vec::new(),
        };

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            run: RunConfig {
                window_days,
                max_pages,
                limit_poas,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Parses a comma-separated postal area allowlist ("0870, 4825"),
/// ignoring blank entries.
pub fn parse_poa_list(raw: &str) -> Result<Vec<Postcode>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| Postcode::parse(entry).map_err(|source| ConfigError::InvalidPoa { source }))
        .collect()
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidWindowDays,
    InvalidMaxPages,
    InvalidPoa { source: PostcodeError },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidWindowDays => {
                write!(f, "JOBS_WINDOW_DAYS must be a whole number of days")
            }
            ConfigError::InvalidMaxPages => write!(f, "MAX_PAGES must be a whole number of pages"),
            ConfigError::InvalidPoa { source } => {
                write!(f, "LIMIT_POAS contains an invalid entry: {source}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPoa { source } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("JOBS_WINDOW_DAYS");
        env::remove_var("MAX_PAGES");
        env::remove_var("LIMIT_POAS");
        env::remove_var("APP_LOG_LEVEL");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.run.window_days, DEFAULT_WINDOW_DAYS);
        assert_eq!(config.run.max_pages, DEFAULT_MAX_PAGES);
        assert!(config.run.limit_poas.is_empty());
        assert_eq!(config.telemetry.log_level, "info");
    }

    #[test]
    fn limit_poas_are_parsed_and_canonicalised() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("LIMIT_POAS", "870, 4825,,  ");
        let config = AppConfig::load().expect("config loads");
        let poas: Vec<&str> = config
            .run
            .limit_poas
            .iter()
            .map(Postcode::as_str)
            .collect();
        assert_eq!(poas, vec!["0870", "4825"]);
        reset_env();
    }

    #[test]
    fn malformed_window_is_rejected() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("JOBS_WINDOW_DAYS", "ten");
        let err = AppConfig::load().expect_err("invalid window");
        assert!(matches!(err, ConfigError::InvalidWindowDays));
        reset_env();
    }
}
