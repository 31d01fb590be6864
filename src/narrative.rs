//! Human-readable text rendered from numeric results
//!
//! Nothing here feeds back into a calculation. Tests on amounts should
//! read the numeric fields, not parse these strings.

use crate::aggregation::{Aggregation, AggregationBranch, AggregationPolicy};
use crate::assumptions::PremiumAssumptions;
use crate::methods::{AssetOffset, MethodCalculation, MethodName, MethodResult};
use crate::premium::{PremiumResult, PremiumStage};
use crate::profile::{Gender, Profile, SmokingStatus};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Whole-unit sterling amount with thousands separators, e.g. "£1,250,000"
pub fn format_currency(amount: f64) -> String {
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}£{}", sign, grouped)
}

fn percent(rate: f64) -> String {
    let text = format!("{:.2}", rate * 100.0);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    format!("{}%", text)
}

/// One-line formula for a method
pub fn method_formula(calculation: &MethodCalculation) -> String {
    match calculation {
        MethodCalculation::IncomeReplacement(r) => format!(
            "{} × {} years = {}",
            format_currency(r.annual_income),
            r.multiplier,
            format_currency(r.amount)
        ),
        MethodCalculation::Dime(r) => format!(
            "{} + {} + {} = {}",
            format_currency(r.total_debts),
            format_currency(r.income_needs),
            format_currency(r.education_fund),
            format_currency(r.amount)
        ),
        MethodCalculation::NeedsAnalysis(r) => format!(
            "({} × 12 × {}) + {} + {} + {} = {}",
            format_currency(r.monthly_expenses),
            r.years_of_support,
            format_currency(r.immediate_needs),
            format_currency(r.total_debts),
            format_currency(r.education_fund),
            format_currency(r.amount)
        ),
        MethodCalculation::HumanLifeValue(r) => format!(
            "PV of {} over {} years at {} discount = {}",
            format_currency(r.annual_income),
            r.working_years,
            percent(r.discount_rate),
            format_currency(r.amount)
        ),
    }
}

fn signed(adjustment: i32) -> String {
    if adjustment > 0 {
        format!("+{}", adjustment)
    } else {
        adjustment.to_string()
    }
}

/// Multi-line explanation for a method, ending with the asset offset
pub fn method_explanation(calculation: &MethodCalculation, offset: &AssetOffset) -> String {
    let mut text = String::new();

    match calculation {
        MethodCalculation::IncomeReplacement(r) => {
            let mut adjustments = Vec::new();
            if r.age_adjustment != 0 {
                adjustments.push(format!("{} (age)", signed(r.age_adjustment)));
            }
            if r.dependents_adjustment != 0 {
                adjustments.push(format!("{} (dependents)", signed(r.dependents_adjustment)));
            }
            let adjustments = if adjustments.is_empty() {
                "none".to_string()
            } else {
                adjustments.join(", ")
            };

            let _ = write!(
                text,
                "Income Replacement covers a multiple of your annual income.\n\
                 Base multiplier for this term: {} years. Adjustments: {}.\n\
                 Your household keeps its income for {} years.",
                r.base_multiplier, adjustments, r.multiplier
            );
        }
        MethodCalculation::Dime(r) => {
            let _ = write!(
                text,
                "DIME adds up your major obligations:\n\
                 • Debts: {} (mortgage, loans and credit)\n\
                 • Income: {} ({} years of {})\n\
                 • Education: {}",
                format_currency(r.total_debts),
                format_currency(r.income_needs),
                r.income_years,
                format_currency(r.annual_income),
                format_currency(r.education_fund)
            );
        }
        MethodCalculation::NeedsAnalysis(r) => {
            let _ = write!(
                text,
                "Needs Analysis costs out your household's requirements:\n\
                 • Living expenses: {}/month × 12 × {} years = {}\n\
                 • Immediate needs: {} funeral costs + {} emergency fund = {}\n\
                 • Debts: {}\n\
                 • Education: {}",
                format_currency(r.monthly_expenses),
                r.years_of_support,
                format_currency(r.living_expenses),
                format_currency(r.funeral_costs),
                format_currency(r.emergency_fund),
                format_currency(r.immediate_needs),
                format_currency(r.total_debts),
                format_currency(r.education_fund)
            );
        }
        MethodCalculation::HumanLifeValue(r) => {
            let _ = write!(
                text,
                "Human Life Value is the present value of your future earnings:\n\
                 • Annual income: {}\n\
                 • Years of earnings counted: {}\n\
                 • Discount rate: {}\n\
                 • PV = Σ income ÷ (1 + rate)^n for n = 1 to {}",
                format_currency(r.annual_income),
                r.working_years,
                percent(r.discount_rate),
                r.working_years
            );
        }
    }

    let _ = write!(
        text,
        "\n\nAdjustment: existing cover {} + {} of savings ({}) = {} credited",
        format_currency(offset.existing_coverage),
        percent(offset.savings_weight),
        format_currency(offset.savings_credit),
        format_currency(offset.total)
    );

    text
}

/// Derivation of the recommended coverage
pub fn coverage_explanation(
    methods: &BTreeMap<MethodName, MethodResult>,
    aggregation: &Aggregation,
) -> String {
    let mut text = String::new();

    let _ = writeln!(
        text,
        "Recommended coverage: {}\n",
        format_currency(aggregation.recommended_coverage)
    );
    let _ = writeln!(text, "Method results after existing assets:");
    for (method, result) in methods {
        let _ = writeln!(
            text,
            "• {}: {}",
            method.title(),
            format_currency(result.adjusted_amount)
        );
    }

    let values: Vec<String> = aggregation
        .sorted_amounts
        .iter()
        .map(|&v| format_currency(v))
        .collect();
    let n = aggregation.sorted_amounts.len();

    let _ = writeln!(text);
    match aggregation.branch {
        AggregationBranch::Floor => {
            let _ = writeln!(
                text,
                "No method produced a positive amount, so the minimum of {} applies.",
                format_currency(aggregation.base_coverage)
            );
        }
        AggregationBranch::MedianEven => {
            let mid = n / 2;
            let _ = writeln!(text, "Step 1: sort the positive amounts: [{}]", values.join(", "));
            let _ = writeln!(
                text,
                "Step 2: with {} values the median is the mean of values {} and {}: ({} + {}) ÷ 2 = {}",
                n,
                mid,
                mid + 1,
                values[mid - 1],
                values[mid],
                format_currency(aggregation.base_coverage)
            );
        }
        AggregationBranch::MedianOdd => {
            let mid = n / 2;
            let _ = writeln!(text, "Step 1: sort the positive amounts: [{}]", values.join(", "));
            let _ = writeln!(
                text,
                "Step 2: with {} values the median is value {}: {}",
                n,
                mid + 1,
                format_currency(aggregation.base_coverage)
            );
        }
        AggregationBranch::WeightedMean => {
            let _ = writeln!(
                text,
                "Step 1: weight the {} positive amounts, renormalizing over the methods present",
                n
            );
            let _ = writeln!(
                text,
                "Step 2: weighted mean = {}",
                format_currency(aggregation.base_coverage)
            );
        }
    }

    if aggregation.inflation_uplift != 1.0 {
        let _ = writeln!(
            text,
            "Step 3: inflation protection: {} × {:.2} = {}",
            format_currency(aggregation.base_coverage),
            aggregation.inflation_uplift,
            format_currency(aggregation.recommended_coverage)
        );
    } else {
        let _ = writeln!(
            text,
            "Step 3: level cover, no inflation adjustment: {}",
            format_currency(aggregation.recommended_coverage)
        );
    }

    if aggregation.policy == AggregationPolicy::Median {
        let _ = write!(
            text,
            "\nThe median keeps one outlying method from dominating the recommendation."
        );
    }

    text.trim_end().to_string()
}

fn gender_label(gender: Gender) -> &'static str {
    match gender {
        Gender::Male => "Male",
        Gender::Female => "Female",
    }
}

fn smoking_label(status: SmokingStatus) -> &'static str {
    match status {
        SmokingStatus::NonSmoker => "Non-smoker",
        SmokingStatus::Smoker => "Smoker",
        SmokingStatus::ExSmoker => "Ex-smoker",
    }
}

/// Step-by-step premium derivation
pub fn premium_explanation(
    coverage: f64,
    profile: &Profile,
    premium: &PremiumResult,
    assumptions: &PremiumAssumptions,
) -> String {
    let mut text = String::new();
    let mut previous = coverage;

    for (i, step) in premium.steps.iter().enumerate() {
        let detail = match step.stage {
            PremiumStage::BaseRate => format!(
                "coverage {} at {} market rate",
                format_currency(coverage),
                percent(step.factor)
            ),
            PremiumStage::Age => format!(
                "age {} ({}), band factor {:.2} × mortality adjustment",
                profile.age,
                assumptions.age_bands.label(profile.age),
                assumptions.age_bands.factor(profile.age)
            ),
            PremiumStage::Gender => gender_label(profile.gender).to_string(),
            PremiumStage::Smoking => smoking_label(profile.smoking_status).to_string(),
            PremiumStage::PolicyTerm => profile.coverage_period.product_label(),
            PremiumStage::InflationProtection if profile.inflation_protection => "selected".to_string(),
            PremiumStage::InflationProtection => "not selected".to_string(),
        };

        let _ = writeln!(
            text,
            "{}. {} ({}): {} × {:.4} = {}",
            i + 1,
            step.stage.label(),
            detail,
            format_currency(previous),
            step.factor,
            format_currency(step.running_total)
        );
        previous = step.running_total;
    }

    let _ = write!(
        text,
        "\nAnnual premium: {}\nMonthly premium: {} (annual ÷ 12)",
        format_currency(premium.annual),
        format_currency(premium.monthly)
    );

    text
}
