//! Coverage estimation methods
//!
//! Each method is a pure function of the profile and its assumption record.
//! The numeric results live in per-method structs; the formula and
//! explanation strings in [`MethodResult`] are rendered from them by
//! [`crate::narrative`].

pub mod dime;
pub mod human_life_value;
pub mod income_replacement;
pub mod needs_analysis;
pub mod present_value;

pub use dime::Dime;
pub use human_life_value::HumanLifeValue;
pub use income_replacement::IncomeReplacement;
pub use needs_analysis::NeedsAnalysis;
pub use present_value::{annuity_factor, present_value};

use crate::assumptions::{AssetOffsetAssumptions, Assumptions};
use crate::narrative;
use crate::profile::Profile;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The four estimation methods, keyed by their wire names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MethodName {
    #[serde(rename = "incomeReplacement")]
    IncomeReplacement,
    #[serde(rename = "dime")]
    Dime,
    #[serde(rename = "needsBased")]
    NeedsAnalysis,
    #[serde(rename = "humanLifeValue")]
    HumanLifeValue,
}

impl MethodName {
    pub const ALL: [MethodName; 4] = [
        MethodName::IncomeReplacement,
        MethodName::Dime,
        MethodName::NeedsAnalysis,
        MethodName::HumanLifeValue,
    ];

    pub fn index(&self) -> usize {
        match self {
            MethodName::IncomeReplacement => 0,
            MethodName::Dime => 1,
            MethodName::NeedsAnalysis => 2,
            MethodName::HumanLifeValue => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MethodName::IncomeReplacement => "incomeReplacement",
            MethodName::Dime => "dime",
            MethodName::NeedsAnalysis => "needsBased",
            MethodName::HumanLifeValue => "humanLifeValue",
        }
    }

    /// Display name used in narratives
    pub fn title(&self) -> &'static str {
        match self {
            MethodName::IncomeReplacement => "Income Replacement",
            MethodName::Dime => "DIME",
            MethodName::NeedsAnalysis => "Needs Analysis",
            MethodName::HumanLifeValue => "Human Life Value",
        }
    }
}

impl fmt::Display for MethodName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Numeric output of one method before the asset offset
#[derive(Debug, Clone, PartialEq)]
pub enum MethodCalculation {
    IncomeReplacement(IncomeReplacement),
    Dime(Dime),
    NeedsAnalysis(NeedsAnalysis),
    HumanLifeValue(HumanLifeValue),
}

impl MethodCalculation {
    pub fn name(&self) -> MethodName {
        match self {
            MethodCalculation::IncomeReplacement(_) => MethodName::IncomeReplacement,
            MethodCalculation::Dime(_) => MethodName::Dime,
            MethodCalculation::NeedsAnalysis(_) => MethodName::NeedsAnalysis,
            MethodCalculation::HumanLifeValue(_) => MethodName::HumanLifeValue,
        }
    }

    /// Raw amount before existing assets are credited
    pub fn amount(&self) -> f64 {
        match self {
            MethodCalculation::IncomeReplacement(r) => r.amount,
            MethodCalculation::Dime(r) => r.amount,
            MethodCalculation::NeedsAnalysis(r) => r.amount,
            MethodCalculation::HumanLifeValue(r) => r.amount,
        }
    }

    /// Named contributors to the amount
    pub fn breakdown(&self) -> BTreeMap<String, f64> {
        let entries: Vec<(&str, f64)> = match self {
            MethodCalculation::IncomeReplacement(r) => vec![
                ("annualIncome", r.annual_income),
                ("baseMultiplier", r.base_multiplier as f64),
                ("ageAdjustment", r.age_adjustment as f64),
                ("dependentsAdjustment", r.dependents_adjustment as f64),
                ("multiplier", r.multiplier as f64),
                ("totalCoverage", r.amount),
            ],
            MethodCalculation::Dime(r) => vec![
                ("totalDebts", r.total_debts),
                ("incomeYears", r.income_years as f64),
                ("income", r.income_needs),
                ("education", r.education_fund),
                ("total", r.amount),
            ],
            MethodCalculation::NeedsAnalysis(r) => vec![
                ("yearsOfSupport", r.years_of_support as f64),
                ("livingExpenses", r.living_expenses),
                ("immediateNeeds", r.immediate_needs),
                ("totalDebts", r.total_debts),
                ("education", r.education_fund),
                ("total", r.amount),
            ],
            MethodCalculation::HumanLifeValue(r) => vec![
                ("netAnnualIncome", r.annual_income),
                ("workingYears", r.working_years as f64),
                ("discountRate", r.discount_rate),
                ("presentValue", r.present_value),
            ],
        };

        entries
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect()
    }
}

/// Run one method, selected by name
pub fn calculate(method: MethodName, profile: &Profile, assumptions: &Assumptions) -> MethodCalculation {
    match method {
        MethodName::IncomeReplacement => MethodCalculation::IncomeReplacement(
            income_replacement::calculate(profile, &assumptions.income_replacement),
        ),
        MethodName::Dime => MethodCalculation::Dime(dime::calculate(profile, &assumptions.dime)),
        MethodName::NeedsAnalysis => MethodCalculation::NeedsAnalysis(needs_analysis::calculate(
            profile,
            &assumptions.needs_analysis,
        )),
        MethodName::HumanLifeValue => MethodCalculation::HumanLifeValue(
            human_life_value::calculate(profile, &assumptions.human_life_value),
        ),
    }
}

/// Existing cover and weighted savings, credited against every method
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetOffset {
    pub existing_coverage: f64,
    pub savings_credit: f64,
    pub savings_weight: f64,
    pub total: f64,
}

impl AssetOffset {
    pub fn new(profile: &Profile, assumptions: &AssetOffsetAssumptions) -> Self {
        let savings_credit = profile.savings * assumptions.savings_weight;
        Self {
            existing_coverage: profile.existing_coverage,
            savings_credit,
            savings_weight: assumptions.savings_weight,
            total: profile.existing_coverage + savings_credit,
        }
    }

    /// Amount net of the offset, floored at zero
    pub fn apply(&self, amount: f64) -> f64 {
        (amount - self.total).max(0.0)
    }
}

/// Published result of one method
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodResult {
    pub amount: f64,
    pub adjusted_amount: f64,
    pub formula: String,
    pub explanation: String,
    pub breakdown: BTreeMap<String, f64>,
}

impl MethodResult {
    pub fn new(calculation: &MethodCalculation, offset: &AssetOffset) -> Self {
        Self {
            amount: calculation.amount(),
            adjusted_amount: offset.apply(calculation.amount()),
            formula: narrative::method_formula(calculation),
            explanation: narrative::method_explanation(calculation, offset),
            breakdown: calculation.breakdown(),
        }
    }
}

/// Run all four methods and credit existing assets against each
pub fn calculate_all(profile: &Profile, assumptions: &Assumptions) -> BTreeMap<MethodName, MethodResult> {
    let offset = AssetOffset::new(profile, &assumptions.asset_offset);

    MethodName::ALL
        .iter()
        .map(|&method| {
            let calculation = calculate(method, profile, assumptions);
            (method, MethodResult::new(&calculation, &offset))
        })
        .collect()
}
