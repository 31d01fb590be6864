//! Combine the four adjusted method amounts into one recommended coverage

use crate::assumptions::AggregationAssumptions;
use crate::methods::{MethodName, MethodResult};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// How method amounts are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationPolicy {
    #[default]
    Median,
    Weighted,
}

impl FromStr for AggregationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "median" => Ok(AggregationPolicy::Median),
            "weighted" => Ok(AggregationPolicy::Weighted),
            other => Err(format!("unknown aggregation policy '{}' (expected median or weighted)", other)),
        }
    }
}

/// Which rule produced the combined figure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AggregationBranch {
    /// No positive amounts; the floor coverage was used
    Floor,
    /// Mean of the two middle values
    MedianEven,
    /// The single middle value
    MedianOdd,
    WeightedMean,
}

/// Recommended coverage and how it was reached
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregation {
    pub policy: AggregationPolicy,
    pub branch: AggregationBranch,
    /// Positive adjusted amounts, ascending
    pub sorted_amounts: Vec<f64>,
    /// Combined figure before the inflation uplift
    pub base_coverage: f64,
    /// 1.0 unless inflation protection was selected
    pub inflation_uplift: f64,
    pub recommended_coverage: f64,
}

/// Median of an ascending slice; None when empty
pub fn median(sorted: &[f64]) -> Option<(f64, AggregationBranch)> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }

    let mid = n / 2;
    if n % 2 == 0 {
        Some(((sorted[mid - 1] + sorted[mid]) / 2.0, AggregationBranch::MedianEven))
    } else {
        Some((sorted[mid], AggregationBranch::MedianOdd))
    }
}

/// Weighted mean over the methods present, weights renormalized to those methods
pub fn weighted_mean(
    amounts: &[(MethodName, f64)],
    assumptions: &AggregationAssumptions,
) -> Option<f64> {
    let total_weight: f64 = amounts
        .iter()
        .map(|&(method, _)| assumptions.weights.weight(method))
        .sum();

    if amounts.is_empty() || total_weight <= 0.0 {
        return None;
    }

    let weighted: f64 = amounts
        .iter()
        .map(|&(method, amount)| assumptions.weights.weight(method) * amount)
        .sum();

    Some(weighted / total_weight)
}

/// Aggregate adjusted amounts under the given policy
pub fn aggregate(
    methods: &BTreeMap<MethodName, MethodResult>,
    inflation_protection: bool,
    policy: AggregationPolicy,
    assumptions: &AggregationAssumptions,
) -> Aggregation {
    let present: Vec<(MethodName, f64)> = methods
        .iter()
        .map(|(&method, result)| (method, result.adjusted_amount))
        .filter(|&(_, amount)| amount.is_finite() && amount > 0.0)
        .collect();

    let mut sorted_amounts: Vec<f64> = present.iter().map(|&(_, amount)| amount).collect();
    sorted_amounts.sort_by(|a, b| a.total_cmp(b));

    let combined = match policy {
        AggregationPolicy::Median => median(&sorted_amounts),
        AggregationPolicy::Weighted => {
            weighted_mean(&present, assumptions).map(|mean| (mean, AggregationBranch::WeightedMean))
        }
    };

    let (base_coverage, branch) = combined.unwrap_or((assumptions.floor_coverage, AggregationBranch::Floor));

    let inflation_uplift = if inflation_protection {
        assumptions.inflation_uplift
    } else {
        1.0
    };

    debug!(
        "aggregation {:?}/{:?} over {} amounts: {:.2} x {:.2}",
        policy,
        branch,
        sorted_amounts.len(),
        base_coverage,
        inflation_uplift
    );

    Aggregation {
        policy,
        branch,
        sorted_amounts,
        base_coverage,
        inflation_uplift,
        recommended_coverage: base_coverage * inflation_uplift,
    }
}
