//! Typed assumption tables for the coverage methods, premium pipeline and aggregation

mod methods;
mod premium;
mod tables;
pub mod loader;

pub use methods::{
    AssetOffsetAssumptions, DimeAssumptions, HumanLifeValueAssumptions,
    IncomeReplacementAssumptions, NeedsAnalysisAssumptions, DEFAULT_INCOME_YEARS,
};
pub use premium::{AggregationAssumptions, MethodWeights, PremiumAssumptions};
pub use tables::{AgeBand, AgeBandTable, TermTable};
pub use loader::LoadedAssumptions;

use crate::error::ConfigurationError;
use log::info;
use serde::Serialize;
use std::path::Path;

/// Container for every assumption used by a calculation
#[derive(Debug, Clone, Serialize)]
pub struct Assumptions {
    pub income_replacement: IncomeReplacementAssumptions,
    pub dime: DimeAssumptions,
    pub needs_analysis: NeedsAnalysisAssumptions,
    pub human_life_value: HumanLifeValueAssumptions,
    pub asset_offset: AssetOffsetAssumptions,
    pub premium: PremiumAssumptions,
    pub aggregation: AggregationAssumptions,
}

impl Assumptions {
    /// Reference formula set
    pub fn default_pricing() -> Self {
        Self {
            income_replacement: IncomeReplacementAssumptions::default(),
            dime: DimeAssumptions::default(),
            needs_analysis: NeedsAnalysisAssumptions::default(),
            human_life_value: HumanLifeValueAssumptions::default(),
            asset_offset: AssetOffsetAssumptions::default(),
            premium: PremiumAssumptions::default(),
            aggregation: AggregationAssumptions::default(),
        }
    }

    /// Load assumptions from CSV files in the default location (data/assumptions/)
    pub fn from_csv() -> Result<Self, ConfigurationError> {
        Self::from_csv_path(Path::new(loader::DEFAULT_ASSUMPTIONS_PATH))
    }

    /// Load assumptions from CSV files in a specific directory
    pub fn from_csv_path(path: &Path) -> Result<Self, ConfigurationError> {
        let loaded = LoadedAssumptions::load_from(path)?;
        let assumptions = Self::from_loaded(&loaded)?;
        info!("loaded assumption tables from {}", path.display());
        Ok(assumptions)
    }

    /// Build and validate typed tables from raw rows
    pub fn from_loaded(loaded: &LoadedAssumptions) -> Result<Self, ConfigurationError> {
        Ok(Self {
            income_replacement: IncomeReplacementAssumptions::from_loaded(loaded)?,
            dime: DimeAssumptions::from_loaded(loaded)?,
            needs_analysis: NeedsAnalysisAssumptions::default(),
            human_life_value: HumanLifeValueAssumptions::from_loaded(loaded)?,
            asset_offset: AssetOffsetAssumptions::from_loaded(loaded)?,
            premium: PremiumAssumptions::from_loaded(loaded)?,
            aggregation: AggregationAssumptions::from_loaded(loaded)?,
        })
    }
}

impl Default for Assumptions {
    fn default() -> Self {
        Self::default_pricing()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::methods::MethodName;
    use crate::profile::CoveragePeriod;

    #[test]
    fn test_shipped_tables_match_reference() {
        let loaded = Assumptions::from_csv().expect("shipped tables load");
        let reference = Assumptions::default_pricing();

        for period in CoveragePeriod::ALL {
            assert_eq!(
                loaded.income_replacement.base_multiplier.get(period),
                reference.income_replacement.base_multiplier.get(period)
            );
            assert_eq!(
                loaded.dime.income_years.get(period),
                reference.dime.income_years.get(period)
            );
            assert_eq!(
                loaded.premium.term_factors.get(period),
                reference.premium.term_factors.get(period)
            );
        }

        for age in [18, 29, 30, 45, 59, 60, 80] {
            assert_eq!(
                loaded.premium.age_bands.factor(age),
                reference.premium.age_bands.factor(age)
            );
        }

        for method in MethodName::ALL {
            assert_eq!(
                loaded.aggregation.weights.weight(method),
                reference.aggregation.weights.weight(method)
            );
        }

        assert_eq!(loaded.premium.female_factor, reference.premium.female_factor);
        assert_eq!(loaded.premium.smoker_factor, reference.premium.smoker_factor);
        assert_eq!(loaded.aggregation.floor_coverage, 100_000.0);
        assert_eq!(loaded.human_life_value.discount_rate, 0.03);
        assert_eq!(loaded.asset_offset.savings_weight, 0.7);
    }

    #[test]
    fn test_incomplete_term_table_rejected() {
        let mut loaded = LoadedAssumptions::load_default().unwrap();
        loaded.term_tables.retain(|row| row.period != CoveragePeriod::WholeOfLife);

        let err = Assumptions::from_loaded(&loaded).unwrap_err();
        assert!(matches!(err, ConfigurationError::MissingTableEntry { .. }));
    }

    #[test]
    fn test_age_bands_need_base_row() {
        let mut loaded = LoadedAssumptions::load_default().unwrap();
        loaded.age_bands.remove(0);

        assert!(Assumptions::from_loaded(&loaded).is_err());
    }

    #[test]
    fn test_missing_weight_rejected() {
        let mut loaded = LoadedAssumptions::load_default().unwrap();
        loaded.method_weights.retain(|row| row.method != MethodName::Dime);

        let err = Assumptions::from_loaded(&loaded).unwrap_err();
        assert!(err.to_string().contains("dime"));
    }
}
