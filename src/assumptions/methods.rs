//! Per-method assumptions for the four coverage calculators

use super::loader::LoadedAssumptions;
use super::tables::TermTable;
use crate::error::ConfigurationError;
use serde::Serialize;

/// Income multiple (years of income) by coverage period
pub const DEFAULT_INCOME_YEARS: TermTable<i32> = TermTable::new([8, 10, 12, 15, 18, 25]);

/// Income Replacement: annual income times an adjusted multiplier
#[derive(Debug, Clone, Serialize)]
pub struct IncomeReplacementAssumptions {
    /// Base multiplier by coverage period
    pub base_multiplier: TermTable<i32>,

    /// Ages strictly below this get `young_adjustment`
    pub young_age_below: u8,
    pub young_adjustment: i32,

    /// Ages strictly above this get `older_adjustment`
    pub older_age_above: u8,
    pub older_adjustment: i32,

    /// More dependents than this get `many_dependents_adjustment`
    pub many_dependents_above: u8,
    pub many_dependents_adjustment: i32,

    /// Applied when there are no dependents
    pub no_dependents_adjustment: i32,

    pub min_multiplier: i32,
    pub max_multiplier: i32,
}

impl IncomeReplacementAssumptions {
    /// Reference adjustments with multipliers from term_tables.csv
    pub fn from_loaded(loaded: &LoadedAssumptions) -> Result<Self, ConfigurationError> {
        let entries = loaded.term_column(|row| row.income_multiplier);
        Ok(Self {
            base_multiplier: TermTable::from_entries("term_tables", &entries)?,
            ..Self::default()
        })
    }
}

impl Default for IncomeReplacementAssumptions {
    fn default() -> Self {
        Self {
            base_multiplier: DEFAULT_INCOME_YEARS,
            young_age_below: 35,
            young_adjustment: 1,
            older_age_above: 55,
            older_adjustment: -1,
            many_dependents_above: 2,
            many_dependents_adjustment: 1,
            no_dependents_adjustment: -1,
            min_multiplier: 5,
            max_multiplier: 30,
        }
    }
}

/// DIME: debts + years of income + education
#[derive(Debug, Clone, Serialize)]
pub struct DimeAssumptions {
    pub income_years: TermTable<i32>,
}

impl DimeAssumptions {
    pub fn from_loaded(loaded: &LoadedAssumptions) -> Result<Self, ConfigurationError> {
        let entries = loaded.term_column(|row| row.dime_income_years);
        Ok(Self {
            income_years: TermTable::from_entries("term_tables", &entries)?,
        })
    }
}

impl Default for DimeAssumptions {
    fn default() -> Self {
        Self {
            income_years: DEFAULT_INCOME_YEARS,
        }
    }
}

/// Needs Analysis: living costs over a support period plus immediate needs
#[derive(Debug, Clone, Serialize)]
pub struct NeedsAnalysisAssumptions {
    /// Without dependents, support runs to this age
    pub retirement_age: u32,
    /// Minimum support years without dependents
    pub min_years_no_dependents: u32,

    /// With dependents, support runs until this age
    pub independence_age: u32,
    /// Minimum support years with dependents
    pub min_years_with_dependents: u32,

    /// Months of expenses held for immediate needs
    pub emergency_months: f64,
}

impl Default for NeedsAnalysisAssumptions {
    fn default() -> Self {
        Self {
            retirement_age: 65,
            min_years_no_dependents: 5,
            independence_age: 55,
            min_years_with_dependents: 10,
            emergency_months: 6.0,
        }
    }
}

/// Human Life Value: present value of future earnings
#[derive(Debug, Clone, Serialize)]
pub struct HumanLifeValueAssumptions {
    /// Whole-of-life policies count working years up to this age
    pub retirement_age: u32,
    pub discount_rate: f64,
}

impl HumanLifeValueAssumptions {
    pub fn from_loaded(loaded: &LoadedAssumptions) -> Result<Self, ConfigurationError> {
        Ok(Self {
            discount_rate: loaded.risk_factor("method", "discount_rate")?,
            ..Self::default()
        })
    }
}

impl Default for HumanLifeValueAssumptions {
    fn default() -> Self {
        Self {
            retirement_age: 65,
            discount_rate: 0.03,
        }
    }
}

/// Existing assets credited against every method's raw amount
#[derive(Debug, Clone, Serialize)]
pub struct AssetOffsetAssumptions {
    /// Share of savings counted as available to dependents
    pub savings_weight: f64,
}

impl AssetOffsetAssumptions {
    pub fn from_loaded(loaded: &LoadedAssumptions) -> Result<Self, ConfigurationError> {
        let savings_weight = loaded.risk_factor("method", "savings_weight")?;
        if savings_weight > 1.0 {
            return Err(ConfigurationError::InvalidTable {
                table: "risk_factors",
                reason: format!("method/savings_weight {} exceeds 1.0", savings_weight),
            });
        }
        Ok(Self { savings_weight })
    }
}

impl Default for AssetOffsetAssumptions {
    fn default() -> Self {
        Self { savings_weight: 0.7 }
    }
}
