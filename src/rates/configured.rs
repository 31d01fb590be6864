//! Rates overridden from configuration, falling back to the static values

use super::{rate_label, DataSources, RateProvider, RateSources, StaticRateProvider};
use crate::profile::Gender;
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};

/// Optional overrides for each scalar rate
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateOverrides {
    pub abi_base_rate: Option<f64>,
    pub base_interest_rate: Option<f64>,
    pub inflation_rate: Option<f64>,
}

impl RateOverrides {
    pub fn is_empty(&self) -> bool {
        self.abi_base_rate.is_none()
            && self.base_interest_rate.is_none()
            && self.inflation_rate.is_none()
    }
}

/// Configured rates with per-rate static fallback
#[derive(Debug, Clone)]
pub struct ConfiguredRateProvider {
    overrides: RateOverrides,
    fallback: StaticRateProvider,
}

impl ConfiguredRateProvider {
    pub fn new(overrides: RateOverrides, as_of: DateTime<Utc>) -> Self {
        if overrides.is_empty() {
            info!("no rate overrides configured; using static fallback rates");
        }
        Self {
            overrides,
            fallback: StaticRateProvider::new(as_of),
        }
    }

    pub fn overrides(&self) -> &RateOverrides {
        &self.overrides
    }
}

fn label(configured: Option<f64>, fallback: f64) -> String {
    match configured {
        Some(rate) => rate_label("Configured", rate),
        None => rate_label("Static", fallback),
    }
}

impl RateProvider for ConfiguredRateProvider {
    fn base_market_rate(&self) -> f64 {
        self.overrides
            .abi_base_rate
            .unwrap_or_else(|| self.fallback.base_market_rate())
    }

    fn base_interest_rate(&self) -> f64 {
        self.overrides
            .base_interest_rate
            .unwrap_or_else(|| self.fallback.base_interest_rate())
    }

    fn inflation_rate(&self) -> f64 {
        self.overrides
            .inflation_rate
            .unwrap_or_else(|| self.fallback.inflation_rate())
    }

    fn mortality_rate(&self, age: u8, gender: Gender) -> f64 {
        self.fallback.mortality_rate(age, gender)
    }

    fn data_sources(&self) -> DataSources {
        let fallback = self.fallback.data_sources();
        DataSources {
            real_time_enabled: false,
            last_updated: fallback.last_updated,
            sources: RateSources {
                base_rate: label(self.overrides.base_interest_rate, self.fallback.base_interest_rate()),
                inflation: label(self.overrides.inflation_rate, self.fallback.inflation_rate()),
                abi_rate: label(self.overrides.abi_base_rate, self.fallback.base_market_rate()),
                mortality: fallback.sources.mortality,
            },
        }
    }
}
