//! Six-stage multiplicative premium pipeline
//!
//! Stages run in a fixed order, each scaling the previous running total:
//! base market rate, age (× mortality adjustment), gender, smoking,
//! policy term and inflation protection.

use crate::assumptions::PremiumAssumptions;
use crate::narrative;
use crate::profile::Profile;
use crate::rates::RateSnapshot;
use log::debug;
use serde::Serialize;

/// Pipeline stages in application order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PremiumStage {
    BaseRate,
    Age,
    Gender,
    Smoking,
    PolicyTerm,
    InflationProtection,
}

impl PremiumStage {
    pub const ALL: [PremiumStage; 6] = [
        PremiumStage::BaseRate,
        PremiumStage::Age,
        PremiumStage::Gender,
        PremiumStage::Smoking,
        PremiumStage::PolicyTerm,
        PremiumStage::InflationProtection,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PremiumStage::BaseRate => "Base premium",
            PremiumStage::Age => "Age factor",
            PremiumStage::Gender => "Gender factor",
            PremiumStage::Smoking => "Smoking factor",
            PremiumStage::PolicyTerm => "Policy term factor",
            PremiumStage::InflationProtection => "Inflation protection",
        }
    }
}

/// One applied stage
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PremiumStep {
    pub stage: PremiumStage,
    pub factor: f64,
    /// Running total after this stage
    pub running_total: f64,
}

/// Premium estimate with every intermediate value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PremiumResult {
    pub monthly: f64,
    pub annual: f64,
    pub explanation: String,
    pub steps: Vec<PremiumStep>,
}

/// Factor applied at each stage for this profile and rate snapshot
pub fn stage_factor(
    stage: PremiumStage,
    profile: &Profile,
    rates: &RateSnapshot,
    assumptions: &PremiumAssumptions,
) -> f64 {
    match stage {
        PremiumStage::BaseRate => rates.base_market_rate,
        PremiumStage::Age => assumptions.age_bands.factor(profile.age) * rates.mortality_rate,
        PremiumStage::Gender => assumptions.gender_factor(profile.gender),
        PremiumStage::Smoking => assumptions.smoking_factor(profile.smoking_status),
        PremiumStage::PolicyTerm => assumptions.term_factors.get(profile.coverage_period),
        PremiumStage::InflationProtection => {
            assumptions.inflation_factor(profile.inflation_protection)
        }
    }
}

/// Run all six stages over the recommended coverage
pub fn calculate(
    coverage: f64,
    profile: &Profile,
    rates: &RateSnapshot,
    assumptions: &PremiumAssumptions,
) -> PremiumResult {
    let mut running_total = coverage;
    let mut steps = Vec::with_capacity(PremiumStage::ALL.len());

    for stage in PremiumStage::ALL {
        let factor = stage_factor(stage, profile, rates, assumptions);
        running_total *= factor;
        debug!("premium {:?}: x{:.4} -> {:.2}", stage, factor, running_total);
        steps.push(PremiumStep {
            stage,
            factor,
            running_total,
        });
    }

    let annual = running_total.round().max(0.0);
    let monthly = (annual / 12.0).round();

    let mut result = PremiumResult {
        monthly,
        annual,
        explanation: String::new(),
        steps,
    };
    result.explanation = narrative::premium_explanation(coverage, profile, &result, assumptions);
    result
}
