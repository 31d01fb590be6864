//! Human Life Value: present value of future earnings

use super::present_value::present_value;
use crate::assumptions::HumanLifeValueAssumptions;
use crate::profile::Profile;
use serde::Serialize;

/// Numeric result of the Human Life Value method
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HumanLifeValue {
    pub annual_income: f64,
    pub working_years: u32,
    pub discount_rate: f64,
    /// Equal to `amount`; kept for the breakdown
    pub present_value: f64,
    pub amount: f64,
}

/// Term length for fixed terms; years to retirement for whole of life
pub fn working_years(profile: &Profile, assumptions: &HumanLifeValueAssumptions) -> u32 {
    match profile.coverage_period.years() {
        Some(term) => term,
        None => assumptions.retirement_age.saturating_sub(profile.age as u32),
    }
}

pub fn calculate(profile: &Profile, assumptions: &HumanLifeValueAssumptions) -> HumanLifeValue {
    let years = working_years(profile, assumptions);
    let pv = present_value(profile.annual_income, years, assumptions.discount_rate);

    HumanLifeValue {
        annual_income: profile.annual_income,
        working_years: years,
        discount_rate: assumptions.discount_rate,
        present_value: pv,
        amount: pv,
    }
}
