//! DIME: debts, years of income, and education

use crate::assumptions::DimeAssumptions;
use crate::profile::Profile;
use serde::Serialize;

/// Numeric result of the DIME method
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dime {
    pub total_debts: f64,
    pub annual_income: f64,
    pub income_years: i32,
    pub income_needs: f64,
    pub education_fund: f64,
    pub amount: f64,
}

pub fn calculate(profile: &Profile, assumptions: &DimeAssumptions) -> Dime {
    let income_years = assumptions.income_years.get(profile.coverage_period);
    let income_needs = profile.annual_income * income_years as f64;

    Dime {
        total_debts: profile.total_debts,
        annual_income: profile.annual_income,
        income_years,
        income_needs,
        education_fund: profile.education_fund,
        amount: profile.total_debts + income_needs + profile.education_fund,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{sample_profile, CoveragePeriod};

    #[test]
    fn test_sums_obligations() {
        let mut profile = sample_profile();
        profile.total_debts = 150_000.0;
        profile.education_fund = 40_000.0;
        profile.coverage_period = CoveragePeriod::Years25;

        let result = calculate(&profile, &DimeAssumptions::default());
        assert_eq!(result.income_years, 15);
        assert_eq!(result.income_needs, 750_000.0);
        assert_eq!(result.amount, 940_000.0);
    }

    #[test]
    fn test_whole_of_life_years() {
        let mut profile = sample_profile();
        profile.coverage_period = CoveragePeriod::WholeOfLife;

        let result = calculate(&profile, &DimeAssumptions::default());
        assert_eq!(result.income_years, 25);
        assert_eq!(result.amount, 1_250_000.0);
    }
}
