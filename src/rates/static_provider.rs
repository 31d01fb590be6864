//! Fallback rates used when no live data source is configured

use super::{rate_label, DataSources, RateProvider, RateSources};
use crate::profile::Gender;
use chrono::{DateTime, Utc};

pub const FALLBACK_BASE_INTEREST_RATE: f64 = 0.05;
pub const FALLBACK_INFLATION_RATE: f64 = 0.04;
pub const FALLBACK_ABI_BASE_RATE: f64 = 0.0012;

/// Mortality adjustment loadings
const OVER_50_LOADING: f64 = 1.2;
const OVER_65_LOADING: f64 = 1.5;
const MALE_LOADING: f64 = 1.1;

/// Static fallbacks with a calculated mortality adjustment
#[derive(Debug, Clone)]
pub struct StaticRateProvider {
    as_of: DateTime<Utc>,
}

impl StaticRateProvider {
    /// Provider whose data sources report `as_of` as the last update
    pub fn new(as_of: DateTime<Utc>) -> Self {
        Self { as_of }
    }

    pub fn as_of(&self) -> DateTime<Utc> {
        self.as_of
    }

    /// 1.0, loaded ×1.2 above 50, ×1.5 above 65, ×1.1 for men
    pub fn calculated_mortality(age: u8, gender: Gender) -> f64 {
        let mut rate = 1.0;
        if age > 50 {
            rate *= OVER_50_LOADING;
        }
        if age > 65 {
            rate *= OVER_65_LOADING;
        }
        if gender == Gender::Male {
            rate *= MALE_LOADING;
        }
        rate
    }
}

impl Default for StaticRateProvider {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl RateProvider for StaticRateProvider {
    fn base_market_rate(&self) -> f64 {
        FALLBACK_ABI_BASE_RATE
    }

    fn base_interest_rate(&self) -> f64 {
        FALLBACK_BASE_INTEREST_RATE
    }

    fn inflation_rate(&self) -> f64 {
        FALLBACK_INFLATION_RATE
    }

    fn mortality_rate(&self, age: u8, gender: Gender) -> f64 {
        Self::calculated_mortality(age, gender)
    }

    fn data_sources(&self) -> DataSources {
        DataSources {
            real_time_enabled: false,
            last_updated: self.as_of,
            sources: RateSources {
                base_rate: rate_label("Static", FALLBACK_BASE_INTEREST_RATE),
                inflation: rate_label("Static", FALLBACK_INFLATION_RATE),
                abi_rate: rate_label("Static", FALLBACK_ABI_BASE_RATE),
                mortality: "Calculated".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::TimeZone;

    #[test]
    fn test_fallback_rates() {
        let provider = StaticRateProvider::default();
        assert_eq!(provider.base_market_rate(), 0.0012);
        assert_eq!(provider.base_interest_rate(), 0.05);
        assert_eq!(provider.inflation_rate(), 0.04);
    }

    #[test]
    fn test_calculated_mortality() {
        assert_eq!(StaticRateProvider::calculated_mortality(40, Gender::Female), 1.0);
        assert_relative_eq!(StaticRateProvider::calculated_mortality(40, Gender::Male), 1.1);
        assert_relative_eq!(StaticRateProvider::calculated_mortality(51, Gender::Female), 1.2);
        assert_relative_eq!(StaticRateProvider::calculated_mortality(70, Gender::Male), 1.2 * 1.5 * 1.1);
        // boundaries are exclusive
        assert_eq!(StaticRateProvider::calculated_mortality(50, Gender::Female), 1.0);
    }

    #[test]
    fn test_data_sources_report_static() {
        let as_of = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let sources = StaticRateProvider::new(as_of).data_sources();

        assert!(!sources.real_time_enabled);
        assert_eq!(sources.last_updated, as_of);
        assert_eq!(sources.sources.abi_rate, "Static (0.12%)");
        assert_eq!(sources.sources.mortality, "Calculated");
    }
}
