//! Market, economic and mortality rates consumed by the premium pipeline
//!
//! The engine only sees the [`RateProvider`] trait. Providers absorb their
//! own failures into fallback values, so every call returns a plain rate.

mod configured;
mod static_provider;

pub use configured::{ConfiguredRateProvider, RateOverrides};
pub use static_provider::{
    StaticRateProvider, FALLBACK_ABI_BASE_RATE, FALLBACK_BASE_INTEREST_RATE,
    FALLBACK_INFLATION_RATE,
};

use crate::profile::{Gender, Profile};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Source of external rates
pub trait RateProvider: Send + Sync {
    /// Premium per unit of cover (ABI base rate)
    fn base_market_rate(&self) -> f64;

    /// Bank base interest rate
    fn base_interest_rate(&self) -> f64;

    fn inflation_rate(&self) -> f64;

    /// Multiplicative mortality adjustment for an age and gender
    fn mortality_rate(&self, age: u8, gender: Gender) -> f64;

    /// Provenance of each rate, for the result payload
    fn data_sources(&self) -> DataSources;
}

/// Provenance label for each rate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateSources {
    pub base_rate: String,
    pub inflation: String,
    pub abi_rate: String,
    pub mortality: String,
}

/// Where the rates behind a result came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSources {
    pub real_time_enabled: bool,
    pub last_updated: DateTime<Utc>,
    pub sources: RateSources,
}

/// Rates fetched once for a single calculation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateSnapshot {
    pub base_market_rate: f64,
    pub base_interest_rate: f64,
    pub inflation_rate: f64,
    pub mortality_rate: f64,
}

impl RateSnapshot {
    /// Call the provider once per rate for this profile
    pub fn fetch(provider: &dyn RateProvider, profile: &Profile) -> Self {
        Self {
            base_market_rate: provider.base_market_rate(),
            base_interest_rate: provider.base_interest_rate(),
            inflation_rate: provider.inflation_rate(),
            mortality_rate: provider.mortality_rate(profile.age, profile.gender),
        }
    }
}

/// Format a rate as a percentage label, e.g. "Static (0.12%)"
pub(crate) fn rate_label(kind: &str, rate: f64) -> String {
    let percent = rate * 100.0;
    let tenths = percent * 10.0;
    if (tenths - tenths.round()).abs() < 1e-9 {
        format!("{} ({:.1}%)", kind, percent)
    } else {
        format!("{} ({}%)", kind, trim_float(percent))
    }
}

fn trim_float(value: f64) -> String {
    let text = format!("{:.6}", value);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::sample_profile;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProvider {
        calls: AtomicUsize,
    }

    impl RateProvider for CountingProvider {
        fn base_market_rate(&self) -> f64 {
            self.calls.fetch_add(1, Ordering::SeqCst);
            0.001
        }
        fn base_interest_rate(&self) -> f64 {
            self.calls.fetch_add(1, Ordering::SeqCst);
            0.05
        }
        fn inflation_rate(&self) -> f64 {
            self.calls.fetch_add(1, Ordering::SeqCst);
            0.02
        }
        fn mortality_rate(&self, _age: u8, _gender: Gender) -> f64 {
            self.calls.fetch_add(1, Ordering::SeqCst);
            1.0
        }
        fn data_sources(&self) -> DataSources {
            StaticRateProvider::default().data_sources()
        }
    }

    #[test]
    fn test_snapshot_calls_each_rate_once() {
        let provider = CountingProvider { calls: AtomicUsize::new(0) };
        let snapshot = RateSnapshot::fetch(&provider, &sample_profile());

        assert_eq!(provider.calls.load(Ordering::SeqCst), 4);
        assert_eq!(snapshot.base_market_rate, 0.001);
        assert_eq!(snapshot.mortality_rate, 1.0);
    }

    #[test]
    fn test_rate_labels() {
        assert_eq!(rate_label("Static", 0.05), "Static (5.0%)");
        assert_eq!(rate_label("Static", 0.04), "Static (4.0%)");
        assert_eq!(rate_label("Static", 0.0012), "Static (0.12%)");
    }
}
