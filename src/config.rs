//! Runtime configuration loaded from environment variables.
//!
//! | Variable                     | Default |
//! |------------------------------|---------|
//! | `STOCKCAST_PORT`             | 3000    |
//! | `STOCKCAST_FORECAST_PERIODS` | 12      |
//! | `STOCKCAST_HISTORY_MONTHS`   | 24      |
//! | `STOCKCAST_SEED_CATALOG`     | true    |
//!
//! A value that is missing or fails to parse falls back to its default.

use std::env;
use std::str::FromStr;

/// Default port if not specified via environment variable.
pub const DEFAULT_PORT: u16 = 3000;

/// Default number of future periods when a request does not ask for one.
pub const DEFAULT_FORECAST_PERIODS: usize = 12;

/// Months of synthetic sales history generated per product.
pub const DEFAULT_HISTORY_MONTHS: usize = 24;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub forecast_periods: usize,
    pub history_months: usize,
    /// Start with the demo catalog instead of an empty store.
    pub seed_catalog: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            forecast_periods: DEFAULT_FORECAST_PERIODS,
            history_months: DEFAULT_HISTORY_MONTHS,
            seed_catalog: true,
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            port: parse_or(&lookup, "STOCKCAST_PORT", defaults.port),
            forecast_periods: parse_or(
                &lookup,
                "STOCKCAST_FORECAST_PERIODS",
                defaults.forecast_periods,
            ),
            history_months: parse_or(&lookup, "STOCKCAST_HISTORY_MONTHS", defaults.history_months),
            seed_catalog: parse_or(&lookup, "STOCKCAST_SEED_CATALOG", defaults.seed_catalog),
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(key)
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config, Config::default());
        assert_eq!(config.port, 3000);
        assert_eq!(config.forecast_periods, 12);
        assert_eq!(config.history_months, 24);
        assert!(config.seed_catalog);
    }

    #[test]
    fn test_overrides_and_bad_values() {
        let vars: HashMap<&str, &str> = [
            ("STOCKCAST_PORT", "8080"),
            ("STOCKCAST_FORECAST_PERIODS", "six"),
            ("STOCKCAST_HISTORY_MONTHS", " 36 "),
            ("STOCKCAST_SEED_CATALOG", "false"),
        ]
        .into_iter()
        .collect();

        let config = Config::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.port, 8080);
        // Unparseable value keeps the default
        assert_eq!(config.forecast_periods, 12);
        assert_eq!(config.history_months, 36);
        assert!(!config.seed_catalog);
    }
}
