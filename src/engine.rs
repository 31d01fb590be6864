//! Calculation engine: profile in, coverage, premium and guidance out
//!
//! Holds the assumption tables and aggregation policy, both fixed at
//! construction. Every call is independent, so one engine can serve any
//! number of threads.

use crate::aggregation::{self, Aggregation, AggregationPolicy};
use crate::assumptions::Assumptions;
use crate::error::{ConfigurationError, EngineError};
use crate::methods::{self, MethodName, MethodResult};
use crate::narrative;
use crate::premium::{self, PremiumResult};
use crate::profile::{Profile, ProfileRequest};
use crate::rates::{DataSources, RateProvider, RateSnapshot};
use crate::recommendations::{self, Recommendation};
use log::{debug, info};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Everything produced for one profile
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub recommended_coverage: f64,
    pub explanation: String,
    pub premium_estimate: PremiumResult,
    pub calculations: BTreeMap<MethodName, MethodResult>,
    pub recommendations: Vec<Recommendation>,
    pub data_sources: DataSources,
    pub aggregation: Aggregation,
    pub rates: RateSnapshot,
}

/// Pre-loaded engine for single and batch calculations
#[derive(Debug, Clone)]
pub struct CalculationEngine {
    assumptions: Assumptions,
    policy: AggregationPolicy,
}

impl CalculationEngine {
    /// Engine with the reference assumptions and median aggregation
    pub fn new() -> Self {
        Self::with_assumptions(Assumptions::default_pricing())
    }

    /// Engine with assumptions loaded from data/assumptions/
    pub fn from_csv() -> Result<Self, ConfigurationError> {
        Ok(Self::with_assumptions(Assumptions::from_csv()?))
    }

    /// Engine with assumptions loaded from a specific directory
    pub fn from_csv_path(path: &Path) -> Result<Self, ConfigurationError> {
        Ok(Self::with_assumptions(Assumptions::from_csv_path(path)?))
    }

    pub fn with_assumptions(assumptions: Assumptions) -> Self {
        Self {
            assumptions,
            policy: AggregationPolicy::default(),
        }
    }

    /// Switch the aggregation policy
    pub fn with_policy(mut self, policy: AggregationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.assumptions
    }

    pub fn policy(&self) -> AggregationPolicy {
        self.policy
    }

    /// Validate the profile, then run methods, aggregation, premium and recommendations
    ///
    /// Rates are fetched from `rates` once, before any stage runs.
    pub fn calculate(
        &self,
        profile: &Profile,
        rates: &dyn RateProvider,
    ) -> Result<CalculationResult, EngineError> {
        profile.validate()?;

        let snapshot = RateSnapshot::fetch(rates, profile);
        let calculations = methods::calculate_all(profile, &self.assumptions);
        for (method, result) in &calculations {
            debug!(
                "{}: amount {:.2}, adjusted {:.2}",
                method, result.amount, result.adjusted_amount
            );
        }

        let aggregation = aggregation::aggregate(
            &calculations,
            profile.inflation_protection,
            self.policy,
            &self.assumptions.aggregation,
        );
        let recommended_coverage = aggregation.recommended_coverage;

        let premium_estimate = premium::calculate(
            recommended_coverage,
            profile,
            &snapshot,
            &self.assumptions.premium,
        );

        let recommendations = recommendations::generate(profile, recommended_coverage, &premium_estimate);
        let explanation = narrative::coverage_explanation(&calculations, &aggregation);

        debug!(
            "recommended coverage {:.2}, annual premium {:.0}",
            recommended_coverage, premium_estimate.annual
        );

        Ok(CalculationResult {
            recommended_coverage,
            explanation,
            premium_estimate,
            calculations,
            recommendations,
            data_sources: rates.data_sources(),
            aggregation,
            rates: snapshot,
        })
    }

    /// Validate a wire request and calculate it
    pub fn calculate_request(
        &self,
        request: &ProfileRequest,
        rates: &dyn RateProvider,
    ) -> Result<CalculationResult, EngineError> {
        let profile = request.into_profile()?;
        self.calculate(&profile, rates)
    }

    /// Calculate many requests in parallel; results keep input order
    pub fn calculate_batch(
        &self,
        requests: &[ProfileRequest],
        rates: &dyn RateProvider,
    ) -> Vec<Result<CalculationResult, EngineError>> {
        let results: Vec<_> = requests
            .par_iter()
            .map(|request| self.calculate_request(request, rates))
            .collect();

        let failed = results.iter().filter(|r| r.is_err()).count();
        info!(
            "batch of {} profiles complete ({} rejected)",
            results.len(),
            failed
        );
        results
    }
}

impl Default for CalculationEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::AggregationBranch;
    use crate::premium::PremiumStage;
    use crate::profile::{sample_profile, CoveragePeriod, Gender, SmokingStatus};
    use crate::rates::StaticRateProvider;
    use approx::assert_relative_eq;
    use chrono::{TimeZone, Utc};

    /// Reference rates: ABI 0.0012, no mortality loading
    struct FixedRates;

    impl RateProvider for FixedRates {
        fn base_market_rate(&self) -> f64 {
            0.0012
        }
        fn base_interest_rate(&self) -> f64 {
            0.05
        }
        fn inflation_rate(&self) -> f64 {
            0.04
        }
        fn mortality_rate(&self, _age: u8, _gender: Gender) -> f64 {
            1.0
        }
        fn data_sources(&self) -> DataSources {
            let as_of = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
            StaticRateProvider::new(as_of).data_sources()
        }
    }

    #[test]
    fn test_reference_profile() {
        let engine = CalculationEngine::new();
        let result = engine.calculate(&sample_profile(), &FixedRates).unwrap();

        // 600,000 / 600,000 / 469,000 / 743,874
        assert_eq!(result.calculations[&MethodName::IncomeReplacement].adjusted_amount, 600_000.0);
        assert_eq!(result.calculations[&MethodName::Dime].adjusted_amount, 600_000.0);
        assert_eq!(result.calculations[&MethodName::NeedsAnalysis].adjusted_amount, 469_000.0);
        assert_eq!(result.calculations[&MethodName::HumanLifeValue].adjusted_amount, 743_874.0);

        assert_eq!(result.aggregation.branch, AggregationBranch::MedianEven);
        assert_eq!(result.recommended_coverage, 600_000.0);

        // 600,000 × 0.0012 × 1.4 × 0.85
        let expected = 600_000.0 * 0.0012 * 1.4 * 1.0 * 1.0 * 0.85 * 1.0;
        assert_eq!(result.premium_estimate.annual, f64::round(expected));
        assert_eq!(result.premium_estimate.monthly, (f64::round(expected) / 12.0).round());
    }

    #[test]
    fn test_coverage_always_positive() {
        let engine = CalculationEngine::new();

        for age in [18u8, 34, 35, 55, 56, 65, 80] {
            for period in CoveragePeriod::ALL {
                for income in [0.0, 25_000.0, 150_000.0] {
                    let mut profile = sample_profile();
                    profile.age = age;
                    profile.coverage_period = period;
                    profile.annual_income = income;
                    profile.monthly_expenses = 0.0;
                    profile.funeral_costs = 0.0;
                    profile.existing_coverage = 2_000_000.0;

                    let result = engine.calculate(&profile, &FixedRates).unwrap();
                    assert!(result.recommended_coverage > 0.0, "age {} {:?}", age, period);
                }
            }
        }
    }

    #[test]
    fn test_floor_when_assets_exceed_needs() {
        let mut profile = sample_profile();
        profile.existing_coverage = 5_000_000.0;

        let result = CalculationEngine::new().calculate(&profile, &FixedRates).unwrap();
        assert_eq!(result.aggregation.branch, AggregationBranch::Floor);
        assert_eq!(result.recommended_coverage, 100_000.0);
    }

    #[test]
    fn test_income_monotonicity() {
        let engine = CalculationEngine::new();
        let mut lower = sample_profile();
        lower.annual_income = 40_000.0;
        let mut higher = lower.clone();
        higher.annual_income = 40_001.0;

        let lo = engine.calculate(&lower, &FixedRates).unwrap();
        let hi = engine.calculate(&higher, &FixedRates).unwrap();

        for method in [MethodName::IncomeReplacement, MethodName::HumanLifeValue] {
            assert!(hi.calculations[&method].amount > lo.calculations[&method].amount);
        }
    }

    #[test]
    fn test_inflation_protection_uplift() {
        let engine = CalculationEngine::new();
        let level = sample_profile();
        let mut indexed = level.clone();
        indexed.inflation_protection = true;

        let level_result = engine.calculate(&level, &FixedRates).unwrap();
        let indexed_result = engine.calculate(&indexed, &FixedRates).unwrap();

        assert_eq!(
            indexed_result.recommended_coverage,
            level_result.recommended_coverage * 1.10
        );
        assert_eq!(indexed_result.premium_estimate.steps[5].factor, 1.20);
    }

    #[test]
    fn test_idempotent() {
        let engine = CalculationEngine::new();
        let rates = StaticRateProvider::default();
        let mut profile = sample_profile();
        profile.smoking_status = SmokingStatus::Smoker;
        profile.total_debts = 250_000.0;

        let first = engine.calculate(&profile, &rates).unwrap();
        let second = engine.calculate(&profile, &rates).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_premium_starts_from_recommended_coverage() {
        let result = CalculationEngine::new()
            .calculate(&sample_profile(), &StaticRateProvider::default())
            .unwrap();

        let first = &result.premium_estimate.steps[0];
        assert_eq!(first.stage, PremiumStage::BaseRate);
        assert_relative_eq!(first.running_total, result.recommended_coverage * 0.0012);
        // static mortality loads men by 10%
        assert_relative_eq!(result.premium_estimate.steps[1].factor, 1.4 * 1.1);
    }

    #[test]
    fn test_invalid_profile_rejected_before_calculation() {
        let mut profile = sample_profile();
        profile.age = 17;

        match CalculationEngine::new().calculate(&profile, &FixedRates) {
            Err(EngineError::Validation(errors)) => assert!(errors.contains_field("age")),
            other => panic!("expected validation error, got {:?}", other.map(|r| r.recommended_coverage)),
        }
    }

    #[test]
    fn test_weighted_policy() {
        let engine = CalculationEngine::new().with_policy(AggregationPolicy::Weighted);
        let result = engine.calculate(&sample_profile(), &FixedRates).unwrap();

        let expected = (0.30 * 600_000.0 + 0.25 * 600_000.0 + 0.25 * 469_000.0 + 0.20 * 743_874.0) / 1.0;
        assert_eq!(result.aggregation.branch, AggregationBranch::WeightedMean);
        assert_relative_eq!(result.recommended_coverage, expected, epsilon = 1e-6);
    }

    #[test]
    fn test_batch_keeps_order_and_reports_rejections() {
        let engine = CalculationEngine::new();
        let good = ProfileRequest {
            age: Some(45),
            gender: Some("female".to_string()),
            smoking: Some("ex-smoker".to_string()),
            annual_income: Some(60_000.0),
            monthly_expenses: Some(2_000.0),
            coverage_period: Some("25".to_string()),
            ..ProfileRequest::default()
        };
        let bad = ProfileRequest {
            age: Some(90),
            ..good.clone()
        };

        let results = engine.calculate_batch(&[good.clone(), bad, good], &FixedRates);
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        assert_eq!(
            results[0].as_ref().unwrap(),
            results[2].as_ref().unwrap()
        );
    }

    #[test]
    fn test_output_shape() {
        let result = CalculationEngine::new().calculate(&sample_profile(), &FixedRates).unwrap();
        let json = serde_json::to_value(&result).unwrap();

        assert!(json["recommendedCoverage"].is_number());
        assert!(json["premiumEstimate"]["monthly"].is_number());
        assert!(json["premiumEstimate"]["explanation"].is_string());
        assert!(json["calculations"]["needsBased"]["adjustedAmount"].is_number());
        assert!(json["calculations"]["humanLifeValue"]["breakdown"]["presentValue"].is_number());
        assert!(json["dataSources"]["sources"]["abiRate"].is_string());
        assert!(json["recommendations"][0]["title"].is_string());
    }
}
