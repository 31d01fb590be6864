//! Needs Analysis: living costs over a support period plus immediate and fixed obligations

use crate::assumptions::NeedsAnalysisAssumptions;
use crate::profile::Profile;
use serde::Serialize;

/// Numeric result of the Needs Analysis method
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NeedsAnalysis {
    pub monthly_expenses: f64,
    pub years_of_support: u32,
    /// 12 × monthly expenses × years of support
    pub living_expenses: f64,
    pub funeral_costs: f64,
    pub emergency_fund: f64,
    /// Funeral costs plus the emergency fund
    pub immediate_needs: f64,
    pub total_debts: f64,
    pub education_fund: f64,
    pub amount: f64,
}

/// Years of household support, capped at the term for fixed-term policies
pub fn years_of_support(profile: &Profile, assumptions: &NeedsAnalysisAssumptions) -> u32 {
    let age = profile.age as u32;

    let years = if profile.dependents == 0 {
        assumptions
            .retirement_age
            .saturating_sub(age)
            .max(assumptions.min_years_no_dependents)
    } else {
        assumptions
            .independence_age
            .saturating_sub(age)
            .max(assumptions.min_years_with_dependents)
    };

    match profile.coverage_period.years() {
        Some(term) => years.min(term),
        None => years,
    }
}

pub fn calculate(profile: &Profile, assumptions: &NeedsAnalysisAssumptions) -> NeedsAnalysis {
    let years = years_of_support(profile, assumptions);
    let living_expenses = profile.monthly_expenses * 12.0 * years as f64;
    let emergency_fund = profile.monthly_expenses * assumptions.emergency_months;
    let immediate_needs = profile.funeral_costs + emergency_fund;

    NeedsAnalysis {
        monthly_expenses: profile.monthly_expenses,
        years_of_support: years,
        living_expenses,
        funeral_costs: profile.funeral_costs,
        emergency_fund,
        immediate_needs,
        total_debts: profile.total_debts,
        education_fund: profile.education_fund,
        amount: living_expenses + immediate_needs + profile.total_debts + profile.education_fund,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{sample_profile, CoveragePeriod};

    #[test]
    fn test_reference_profile() {
        // Age 40 with a dependent: max(55 - 40, 10) = 15, under the 20-year term
        let result = calculate(&sample_profile(), &NeedsAnalysisAssumptions::default());

        assert_eq!(result.years_of_support, 15);
        assert_eq!(result.living_expenses, 450_000.0);
        assert_eq!(result.immediate_needs, 19_000.0);
        assert_eq!(result.amount, 469_000.0);
    }

    #[test]
    fn test_support_years_rules() {
        let assumptions = NeedsAnalysisAssumptions::default();
        let mut profile = sample_profile();

        profile.dependents = 0;
        profile.age = 62;
        profile.coverage_period = CoveragePeriod::WholeOfLife;
        assert_eq!(years_of_support(&profile, &assumptions), 5);

        profile.age = 30;
        assert_eq!(years_of_support(&profile, &assumptions), 35);

        profile.coverage_period = CoveragePeriod::Years10;
        assert_eq!(years_of_support(&profile, &assumptions), 10);

        profile.dependents = 2;
        profile.age = 60;
        profile.coverage_period = CoveragePeriod::Years30;
        assert_eq!(years_of_support(&profile, &assumptions), 10);
    }

    #[test]
    fn test_whole_of_life_is_uncapped() {
        let mut profile = sample_profile();
        profile.age = 20;
        profile.coverage_period = CoveragePeriod::WholeOfLife;

        let result = calculate(&profile, &NeedsAnalysisAssumptions::default());
        assert_eq!(result.years_of_support, 35);
    }
}
