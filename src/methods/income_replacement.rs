//! Income Replacement: annual income times an adjusted years-of-income multiplier

use crate::assumptions::IncomeReplacementAssumptions;
use crate::profile::Profile;
use serde::Serialize;

/// Numeric result of the Income Replacement method
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeReplacement {
    pub annual_income: f64,
    pub base_multiplier: i32,
    pub age_adjustment: i32,
    pub dependents_adjustment: i32,
    /// Base plus adjustments, clamped
    pub multiplier: i32,
    pub amount: f64,
}

pub fn calculate(profile: &Profile, assumptions: &IncomeReplacementAssumptions) -> IncomeReplacement {
    let base_multiplier = assumptions.base_multiplier.get(profile.coverage_period);

    let age_adjustment = if profile.age < assumptions.young_age_below {
        assumptions.young_adjustment
    } else if profile.age > assumptions.older_age_above {
        assumptions.older_adjustment
    } else {
        0
    };

    let dependents_adjustment = if profile.dependents > assumptions.many_dependents_above {
        assumptions.many_dependents_adjustment
    } else if profile.dependents == 0 {
        assumptions.no_dependents_adjustment
    } else {
        0
    };

    let multiplier = (base_multiplier + age_adjustment + dependents_adjustment)
        .clamp(assumptions.min_multiplier, assumptions.max_multiplier);

    IncomeReplacement {
        annual_income: profile.annual_income,
        base_multiplier,
        age_adjustment,
        dependents_adjustment,
        multiplier,
        amount: profile.annual_income * multiplier as f64,
    }
}
