//! Profile data structures for a single needs calculation

use crate::error::{ValidationError, ValidationErrors};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Youngest insurable age
pub const MIN_AGE: u8 = 18;
/// Oldest insurable age
pub const MAX_AGE: u8 = 80;
/// Maximum number of dependents accepted
pub const MAX_DEPENDENTS: u8 = 10;
/// Funeral cost assumed when none is supplied
pub const DEFAULT_FUNERAL_COSTS: f64 = 4000.0;

/// Gender of the insured person
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl FromStr for Gender {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            other => Err(ValidationError::InvalidChoice {
                field: "gender",
                value: other.to_string(),
                allowed: "male, female",
            }),
        }
    }
}

/// Smoking status of the insured person
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SmokingStatus {
    NonSmoker,
    Smoker,
    ExSmoker,
}

impl SmokingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SmokingStatus::NonSmoker => "non-smoker",
            SmokingStatus::Smoker => "smoker",
            SmokingStatus::ExSmoker => "ex-smoker",
        }
    }

    pub fn is_smoker(&self) -> bool {
        matches!(self, SmokingStatus::Smoker)
    }
}

impl FromStr for SmokingStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "non-smoker" => Ok(SmokingStatus::NonSmoker),
            "smoker" => Ok(SmokingStatus::Smoker),
            "ex-smoker" => Ok(SmokingStatus::ExSmoker),
            other => Err(ValidationError::InvalidChoice {
                field: "smoking",
                value: other.to_string(),
                allowed: "non-smoker, smoker, ex-smoker",
            }),
        }
    }
}

/// Selected policy term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CoveragePeriod {
    #[serde(rename = "10")]
    Years10,
    #[serde(rename = "15")]
    Years15,
    #[serde(rename = "20")]
    Years20,
    #[serde(rename = "25")]
    Years25,
    #[serde(rename = "30")]
    Years30,
    #[serde(rename = "whole")]
    WholeOfLife,
}

impl CoveragePeriod {
    /// All periods in table order
    pub const ALL: [CoveragePeriod; 6] = [
        CoveragePeriod::Years10,
        CoveragePeriod::Years15,
        CoveragePeriod::Years20,
        CoveragePeriod::Years25,
        CoveragePeriod::Years30,
        CoveragePeriod::WholeOfLife,
    ];

    /// Term length in years, None for whole of life
    pub fn years(&self) -> Option<u32> {
        match self {
            CoveragePeriod::Years10 => Some(10),
            CoveragePeriod::Years15 => Some(15),
            CoveragePeriod::Years20 => Some(20),
            CoveragePeriod::Years25 => Some(25),
            CoveragePeriod::Years30 => Some(30),
            CoveragePeriod::WholeOfLife => None,
        }
    }

    pub fn is_whole_of_life(&self) -> bool {
        matches!(self, CoveragePeriod::WholeOfLife)
    }

    /// Position within [`CoveragePeriod::ALL`]
    pub fn index(&self) -> usize {
        match self {
            CoveragePeriod::Years10 => 0,
            CoveragePeriod::Years15 => 1,
            CoveragePeriod::Years20 => 2,
            CoveragePeriod::Years25 => 3,
            CoveragePeriod::Years30 => 4,
            CoveragePeriod::WholeOfLife => 5,
        }
    }

    /// Wire literal ("10" ... "30", "whole")
    pub fn as_str(&self) -> &'static str {
        match self {
            CoveragePeriod::Years10 => "10",
            CoveragePeriod::Years15 => "15",
            CoveragePeriod::Years20 => "20",
            CoveragePeriod::Years25 => "25",
            CoveragePeriod::Years30 => "30",
            CoveragePeriod::WholeOfLife => "whole",
        }
    }

    /// Product label, e.g. "20-Year Term" or "Whole Life"
    pub fn product_label(&self) -> String {
        match self.years() {
            Some(years) => format!("{}-Year Term", years),
            None => "Whole Life".to_string(),
        }
    }
}

impl fmt::Display for CoveragePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CoveragePeriod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CoveragePeriod::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidChoice {
                field: "coveragePeriod",
                value: s.to_string(),
                allowed: "10, 15, 20, 25, 30, whole",
            })
    }
}

/// The insured person and their finances
///
/// Created fresh per calculation and never mutated by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub age: u8,
    pub gender: Gender,
    pub smoking_status: SmokingStatus,

    /// Gross annual income
    pub annual_income: f64,

    /// Household living costs per month
    pub monthly_expenses: f64,

    pub existing_coverage: f64,
    pub savings: f64,
    pub funeral_costs: f64,
    pub education_fund: f64,

    /// Mortgage plus all other outstanding debts
    pub total_debts: f64,

    pub dependents: u8,
    pub coverage_period: CoveragePeriod,
    pub inflation_protection: bool,
}

impl Profile {
    /// Check field bounds; every violation is reported, not just the first
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut violations = Vec::new();

        if !(MIN_AGE..=MAX_AGE).contains(&self.age) {
            violations.push(ValidationError::OutOfRange {
                field: "age",
                value: self.age as i64,
                min: MIN_AGE as i64,
                max: MAX_AGE as i64,
            });
        }

        if self.dependents > MAX_DEPENDENTS {
            violations.push(ValidationError::OutOfRange {
                field: "dependents",
                value: self.dependents as i64,
                min: 0,
                max: MAX_DEPENDENTS as i64,
            });
        }

        for (field, value) in self.currency_fields() {
            if !value.is_finite() || value < 0.0 {
                violations.push(ValidationError::NegativeAmount { field, value });
            }
        }

        ValidationErrors::new(violations).into_result()
    }

    fn currency_fields(&self) -> [(&'static str, f64); 7] {
        [
            ("annualIncome", self.annual_income),
            ("monthlyExpenses", self.monthly_expenses),
            ("existingCoverage", self.existing_coverage),
            ("savings", self.savings),
            ("funeralCosts", self.funeral_costs),
            ("educationFund", self.education_fund),
            ("totalDebts", self.total_debts),
        ]
    }

    /// Mortgage share of total debts under the old two-field input
    #[deprecated(note = "profiles carry a single total_debts figure; the 70/30 split is an approximation")]
    pub fn legacy_mortgage(&self) -> f64 {
        self.total_debts * 0.7
    }

    /// Non-mortgage share of total debts under the old two-field input
    #[deprecated(note = "profiles carry a single total_debts figure; the 70/30 split is an approximation")]
    pub fn legacy_other_debts(&self) -> f64 {
        self.total_debts * 0.3
    }
}

/// Reference profile shared by unit tests across modules
#[cfg(test)]
pub(crate) fn sample_profile() -> Profile {
    Profile {
        age: 40,
        gender: Gender::Male,
        smoking_status: SmokingStatus::NonSmoker,
        annual_income: 50_000.0,
        monthly_expenses: 2_500.0,
        existing_coverage: 0.0,
        savings: 0.0,
        funeral_costs: DEFAULT_FUNERAL_COSTS,
        education_fund: 0.0,
        total_debts: 0.0,
        dependents: 1,
        coverage_period: CoveragePeriod::Years20,
        inflation_protection: false,
    }
}
