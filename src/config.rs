use std::env;
use std::time::Duration;
use thiserror::Error;

use crate::price::RetryPolicy;
use crate::projection::{DEFAULT_HORIZON_EPOCHS, INITIAL_RESERVE};
use crate::FeeModel;

/// Runtime settings for the simulators and the CLI.
#[derive(Debug, Clone, PartialEq)]
pub struct CompassConfig {
    pub log_level: String,
    pub projection: ProjectionConfig,
    pub price: PriceConfig,
}

/// Defaults for reserve projections.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionConfig {
    pub horizon_epochs: u32,
    pub initial_reserve: f64,
    pub fee_model: FeeModel,
}

/// Retry settings for live price lookups.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceConfig {
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl PriceConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            base_delay: self.retry_delay,
            ..RetryPolicy::default()
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{key} must be {expected}, got {value:?}")]
    Invalid {
        key: &'static str,
        expected: &'static str,
        value: String,
    },
}

impl CompassConfig {
    /// Loads settings from the environment, after reading `.env` if present.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let log_level = env::var("COMPASS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let horizon_epochs = parse_var(
            "COMPASS_HORIZON_EPOCHS",
            "a non-negative integer",
            DEFAULT_HORIZON_EPOCHS,
            |v| v.parse::<u32>().ok(),
        )?;
        let initial_reserve = parse_var(
            "COMPASS_INITIAL_RESERVE",
            "a non-negative number",
            INITIAL_RESERVE,
            |v| v.parse::<f64>().ok().filter(|r| r.is_finite() && *r >= 0.0),
        )?;
        let fee_model = parse_var(
            "COMPASS_FEE_MODEL",
            "`fractional` or `flat`",
            FeeModel::default(),
            |v| v.parse::<FeeModel>().ok(),
        )?;
        let max_retries = parse_var(
            "COMPASS_PRICE_RETRIES",
            "a non-negative integer",
            3,
            |v| v.parse::<u32>().ok(),
        )?;
        let retry_delay_ms = parse_var(
            "COMPASS_PRICE_RETRY_DELAY_MS",
            "a delay in milliseconds",
            500,
            |v| v.parse::<u64>().ok(),
        )?;

        Ok(Self {
            log_level,
            projection: ProjectionConfig {
                horizon_epochs,
                initial_reserve,
                fee_model,
            },
            price: PriceConfig {
                max_retries,
                retry_delay: Duration::from_millis(retry_delay_ms),
            },
        })
    }
}

fn parse_var<T>(
    key: &'static str,
    expected: &'static str,
    default: T,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => parse(value.trim()).ok_or(ConfigError::Invalid {
            key,
            expected,
            value,
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "COMPASS_LOG_LEVEL",
            "COMPASS_HORIZON_EPOCHS",
            "COMPASS_INITIAL_RESERVE",
            "COMPASS_FEE_MODEL",
            "COMPASS_PRICE_RETRIES",
            "COMPASS_PRICE_RETRY_DELAY_MS",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = CompassConfig::load().expect("config loads with defaults");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.projection.horizon_epochs, 365);
        assert_eq!(config.projection.initial_reserve, 14_000_000_000.0);
        assert_eq!(config.projection.fee_model, FeeModel::Fractional);
        assert_eq!(config.price.max_retries, 3);
        assert_eq!(config.price.retry_delay, Duration::from_millis(500));
    }

    #[test]
    fn reads_overrides() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("COMPASS_HORIZON_EPOCHS", "73");
        env::set_var("COMPASS_FEE_MODEL", "Flat");
        let config = CompassConfig::load().expect("config loads");
        reset_env();
        assert_eq!(config.projection.horizon_epochs, 73);
        assert_eq!(config.projection.fee_model, FeeModel::Flat);
    }

    #[test]
    fn rejects_invalid_values() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("COMPASS_INITIAL_RESERVE", "-5");
        let err = CompassConfig::load().expect_err("negative reserve rejected");
        reset_env();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "COMPASS_INITIAL_RESERVE",
                ..
            }
        ));
    }
}
