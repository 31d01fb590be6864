//! Runtime settings for the binaries, read from environment variables
//!
//! The engine never reads the environment; binaries build an
//! [`EngineConfig`] and use it to construct the engine, rate provider and
//! cache.

use crate::aggregation::AggregationPolicy;
use crate::assumptions::loader::DEFAULT_ASSUMPTIONS_PATH;
use crate::assumptions::Assumptions;
use crate::engine::CalculationEngine;
use crate::error::ConfigurationError;
use crate::rates::{ConfiguredRateProvider, RateOverrides};
use chrono::{DateTime, Duration, Utc};
use std::path::PathBuf;

pub const ENV_ASSUMPTIONS_PATH: &str = "ASSUMPTIONS_PATH";
pub const ENV_AGGREGATION_POLICY: &str = "AGGREGATION_POLICY";
pub const ENV_CACHE_TTL_SECONDS: &str = "CACHE_TTL_SECONDS";
pub const ENV_RATE_ABI_BASE: &str = "RATE_ABI_BASE";
pub const ENV_RATE_BOE_BASE: &str = "RATE_BOE_BASE";
pub const ENV_RATE_INFLATION: &str = "RATE_INFLATION";

/// Default result cache lifetime
pub const DEFAULT_CACHE_TTL_SECONDS: i64 = 3600;

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Directory of assumption CSVs; None uses the built-in reference tables
    pub assumptions_path: Option<PathBuf>,
    pub aggregation_policy: AggregationPolicy,
    /// 0 disables the cache
    pub cache_ttl_seconds: i64,
    pub rate_overrides: RateOverrides,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            assumptions_path: None,
            aggregation_policy: AggregationPolicy::Median,
            cache_ttl_seconds: DEFAULT_CACHE_TTL_SECONDS,
            rate_overrides: RateOverrides::default(),
        }
    }
}

fn invalid(name: &str, value: &str, reason: impl Into<String>) -> ConfigurationError {
    ConfigurationError::InvalidSetting {
        name: name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

fn parse_rate(name: &str, raw: Option<String>) -> Result<Option<f64>, ConfigurationError> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    let rate: f64 = raw
        .trim()
        .parse()
        .map_err(|_| invalid(name, &raw, "not a number"))?;

    if !rate.is_finite() || !(0.0..1.0).contains(&rate) {
        return Err(invalid(name, &raw, "rate must be in [0, 1)"));
    }

    Ok(Some(rate))
}

impl EngineConfig {
    /// Read settings from the process environment
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through an arbitrary lookup (environment, map, ...)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let assumptions_path = lookup(ENV_ASSUMPTIONS_PATH)
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let aggregation_policy = match lookup(ENV_AGGREGATION_POLICY) {
            Some(raw) => raw
                .parse::<AggregationPolicy>()
                .map_err(|reason| invalid(ENV_AGGREGATION_POLICY, &raw, reason))?,
            None => defaults.aggregation_policy,
        };

        let cache_ttl_seconds = match lookup(ENV_CACHE_TTL_SECONDS) {
            Some(raw) => {
                let seconds: i64 = raw
                    .trim()
                    .parse()
                    .map_err(|_| invalid(ENV_CACHE_TTL_SECONDS, &raw, "not an integer"))?;
                if seconds < 0 {
                    return Err(invalid(ENV_CACHE_TTL_SECONDS, &raw, "must not be negative"));
                }
                seconds
            }
            None => defaults.cache_ttl_seconds,
        };

        let rate_overrides = RateOverrides {
            abi_base_rate: parse_rate(ENV_RATE_ABI_BASE, lookup(ENV_RATE_ABI_BASE))?,
            base_interest_rate: parse_rate(ENV_RATE_BOE_BASE, lookup(ENV_RATE_BOE_BASE))?,
            inflation_rate: parse_rate(ENV_RATE_INFLATION, lookup(ENV_RATE_INFLATION))?,
        };

        Ok(Self {
            assumptions_path,
            aggregation_policy,
            cache_ttl_seconds,
            rate_overrides,
        })
    }

    /// Cache lifetime, or None when caching is disabled
    pub fn cache_ttl(&self) -> Option<Duration> {
        (self.cache_ttl_seconds > 0).then(|| Duration::seconds(self.cache_ttl_seconds))
    }

    /// Load assumptions and build the engine
    pub fn build_engine(&self) -> Result<CalculationEngine, ConfigurationError> {
        let assumptions = match &self.assumptions_path {
            Some(path) => Assumptions::from_csv_path(path)?,
            None => Assumptions::default_pricing(),
        };
        Ok(CalculationEngine::with_assumptions(assumptions).with_policy(self.aggregation_policy))
    }

    /// Rate provider reporting `as_of` as its last update
    pub fn rate_provider(&self, as_of: DateTime<Utc>) -> ConfiguredRateProvider {
        ConfiguredRateProvider::new(self.rate_overrides, as_of)
    }

    /// Directory the CLI shows when none is configured
    pub fn assumptions_dir(&self) -> PathBuf {
        self.assumptions_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ASSUMPTIONS_PATH))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = EngineConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.cache_ttl(), Some(Duration::seconds(3600)));
    }

    #[test]
    fn test_reads_every_setting() {
        let config = EngineConfig::from_lookup(lookup(&[
            (ENV_ASSUMPTIONS_PATH, "data/assumptions"),
            (ENV_AGGREGATION_POLICY, "weighted"),
            (ENV_CACHE_TTL_SECONDS, "0"),
            (ENV_RATE_ABI_BASE, "0.0015"),
            (ENV_RATE_INFLATION, " 0.03 "),
        ]))
        .unwrap();

        assert_eq!(config.assumptions_path, Some(PathBuf::from("data/assumptions")));
        assert_eq!(config.aggregation_policy, AggregationPolicy::Weighted);
        assert_eq!(config.cache_ttl(), None);
        assert_eq!(config.rate_overrides.abi_base_rate, Some(0.0015));
        assert_eq!(config.rate_overrides.inflation_rate, Some(0.03));
        assert_eq!(config.rate_overrides.base_interest_rate, None);
    }

    #[test]
    fn test_bad_values_name_the_setting() {
        let err = EngineConfig::from_lookup(lookup(&[(ENV_AGGREGATION_POLICY, "mode")])).unwrap_err();
        assert!(err.to_string().contains(ENV_AGGREGATION_POLICY));

        let err = EngineConfig::from_lookup(lookup(&[(ENV_RATE_ABI_BASE, "1.5")])).unwrap_err();
        assert!(err.to_string().contains(ENV_RATE_ABI_BASE));

        assert!(EngineConfig::from_lookup(lookup(&[(ENV_CACHE_TTL_SECONDS, "-1")])).is_err());
    }

    #[test]
    fn test_build_engine_from_shipped_tables() {
        let config = EngineConfig {
            assumptions_path: Some(PathBuf::from(DEFAULT_ASSUMPTIONS_PATH)),
            aggregation_policy: AggregationPolicy::Weighted,
            ..EngineConfig::default()
        };
        let engine = config.build_engine().unwrap();
        assert_eq!(engine.policy(), AggregationPolicy::Weighted);
    }
}
