//! Premium rating factors and coverage aggregation settings

use super::loader::LoadedAssumptions;
use super::tables::{AgeBand, AgeBandTable, TermTable};
use crate::error::ConfigurationError;
use crate::methods::MethodName;
use crate::profile::{Gender, SmokingStatus};
use serde::Serialize;

/// Multiplicative rating factors for the premium pipeline
#[derive(Debug, Clone, Serialize)]
pub struct PremiumAssumptions {
    /// Age band factor, later scaled by the provider's mortality adjustment
    pub age_bands: AgeBandTable,

    pub male_factor: f64,
    pub female_factor: f64,

    pub non_smoker_factor: f64,
    pub smoker_factor: f64,
    pub ex_smoker_factor: f64,

    /// Policy-type factor; whole of life sits in the last slot
    pub term_factors: TermTable<f64>,

    pub inflation_protection_factor: f64,
}

impl PremiumAssumptions {
    /// Build from premium_age_bands.csv, risk_factors.csv and the term factor column
    pub fn from_loaded(loaded: &LoadedAssumptions) -> Result<Self, ConfigurationError> {
        let (base, rest) = match loaded.age_bands.split_first() {
            Some((base, rest)) if base.min_age == 0 => (base, rest),
            _ => {
                return Err(ConfigurationError::InvalidTable {
                    table: "premium_age_bands",
                    reason: "first row must start at min_age 0".to_string(),
                })
            }
        };
        let bands = rest
            .iter()
            .map(|row| AgeBand {
                min_age: row.min_age,
                factor: row.factor,
            })
            .collect();

        let term_factors = loaded.term_column(|row| row.premium_term_factor);

        Ok(Self {
            age_bands: AgeBandTable::new(base.factor, bands)?,
            male_factor: loaded.risk_factor("gender", Gender::Male.as_str())?,
            female_factor: loaded.risk_factor("gender", Gender::Female.as_str())?,
            non_smoker_factor: loaded.risk_factor("smoking", SmokingStatus::NonSmoker.as_str())?,
            smoker_factor: loaded.risk_factor("smoking", SmokingStatus::Smoker.as_str())?,
            ex_smoker_factor: loaded.risk_factor("smoking", SmokingStatus::ExSmoker.as_str())?,
            term_factors: TermTable::from_entries("term_tables", &term_factors)?,
            inflation_protection_factor: loaded.risk_factor("inflation_protection", "yes")?,
        })
    }

    pub fn gender_factor(&self, gender: Gender) -> f64 {
        match gender {
            Gender::Male => self.male_factor,
            Gender::Female => self.female_factor,
        }
    }

    pub fn smoking_factor(&self, status: SmokingStatus) -> f64 {
        match status {
            SmokingStatus::NonSmoker => self.non_smoker_factor,
            SmokingStatus::Smoker => self.smoker_factor,
            SmokingStatus::ExSmoker => self.ex_smoker_factor,
        }
    }

    pub fn inflation_factor(&self, inflation_protection: bool) -> f64 {
        if inflation_protection {
            self.inflation_protection_factor
        } else {
            1.0
        }
    }

    /// Reference age bands: <30, 30-39, 40-49, 50-59, 60+
    pub fn default_age_bands() -> AgeBandTable {
        AgeBandTable::new(
            0.75,
            vec![
                AgeBand { min_age: 30, factor: 1.0 },
                AgeBand { min_age: 40, factor: 1.4 },
                AgeBand { min_age: 50, factor: 2.2 },
                AgeBand { min_age: 60, factor: 3.5 },
            ],
        )
        .unwrap_or_else(|_| unreachable!("reference age bands are ascending and positive"))
    }
}

impl Default for PremiumAssumptions {
    fn default() -> Self {
        Self {
            age_bands: Self::default_age_bands(),
            male_factor: 1.0,
            female_factor: 0.88,
            non_smoker_factor: 1.0,
            smoker_factor: 1.8,
            ex_smoker_factor: 1.15,
            term_factors: TermTable::new([0.65, 0.75, 0.85, 0.95, 1.0, 2.8]),
            inflation_protection_factor: 1.20,
        }
    }
}

/// Relative weights for the weighted-mean aggregation policy
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MethodWeights {
    pub income_replacement: f64,
    pub dime: f64,
    pub needs_analysis: f64,
    pub human_life_value: f64,
}

impl MethodWeights {
    /// Every method needs exactly one weight; at least one must be positive
    pub fn from_loaded(loaded: &LoadedAssumptions) -> Result<Self, ConfigurationError> {
        let mut slots: [Option<f64>; 4] = [None; 4];

        for (i, row) in loaded.method_weights.iter().enumerate() {
            if !row.weight.is_finite() || row.weight < 0.0 {
                return Err(ConfigurationError::MalformedRow {
                    table: "method_weights",
                    row: i + 1,
                    reason: format!("weight for {} must be non-negative", row.method),
                });
            }
            let slot = &mut slots[row.method.index()];
            if slot.replace(row.weight).is_some() {
                return Err(ConfigurationError::InvalidTable {
                    table: "method_weights",
                    reason: format!("duplicate weight for {}", row.method),
                });
            }
        }

        let weight = |method: MethodName| {
            slots[method.index()].ok_or_else(|| ConfigurationError::MissingTableEntry {
                table: "method_weights",
                key: method.to_string(),
            })
        };

        let weights = Self {
            income_replacement: weight(MethodName::IncomeReplacement)?,
            dime: weight(MethodName::Dime)?,
            needs_analysis: weight(MethodName::NeedsAnalysis)?,
            human_life_value: weight(MethodName::HumanLifeValue)?,
        };

        if MethodName::ALL.iter().all(|&m| weights.weight(m) == 0.0) {
            return Err(ConfigurationError::InvalidTable {
                table: "method_weights",
                reason: "all weights are zero".to_string(),
            });
        }

        Ok(weights)
    }

    pub fn weight(&self, method: MethodName) -> f64 {
        match method {
            MethodName::IncomeReplacement => self.income_replacement,
            MethodName::Dime => self.dime,
            MethodName::NeedsAnalysis => self.needs_analysis,
            MethodName::HumanLifeValue => self.human_life_value,
        }
    }
}

impl Default for MethodWeights {
    fn default() -> Self {
        Self {
            income_replacement: 0.30,
            dime: 0.25,
            needs_analysis: 0.25,
            human_life_value: 0.20,
        }
    }
}

/// Settings shared by both aggregation policies
#[derive(Debug, Clone, Serialize)]
pub struct AggregationAssumptions {
    /// Recommended coverage when no method yields a positive amount
    pub floor_coverage: f64,

    /// Coverage uplift applied when inflation protection is selected
    pub inflation_uplift: f64,

    pub weights: MethodWeights,
}

impl AggregationAssumptions {
    pub fn from_loaded(loaded: &LoadedAssumptions) -> Result<Self, ConfigurationError> {
        Ok(Self {
            floor_coverage: loaded.risk_factor("aggregation", "floor_coverage")?,
            inflation_uplift: loaded.risk_factor("aggregation", "inflation_uplift")?,
            weights: MethodWeights::from_loaded(loaded)?,
        })
    }
}

impl Default for AggregationAssumptions {
    fn default() -> Self {
        Self {
            floor_coverage: 100_000.0,
            inflation_uplift: 1.10,
            weights: MethodWeights::default(),
        }
    }
}
