//! Rule-based guidance attached to every result
//!
//! Rules are evaluated in a fixed order and read only the profile and the
//! computed amounts, so the same inputs always give the same list.

use crate::narrative::format_currency;
use crate::premium::PremiumResult;
use crate::profile::{Profile, SmokingStatus};
use serde::Serialize;

/// Debt share of recommended coverage above which mortgage guidance is given
pub const DEBT_SHARE_THRESHOLD: f64 = 0.40;
/// Below this age the early-career guidance applies
pub const YOUNG_AGE_BELOW: u8 = 35;
/// Above this age the pre-retirement guidance applies
pub const PRE_RETIREMENT_AGE_ABOVE: u8 = 50;
pub const HIGH_NET_WORTH_COVERAGE: f64 = 1_000_000.0;
/// Annual premium share of income above which budget options are suggested
pub const BUDGET_INCOME_SHARE: f64 = 0.05;

/// Which rule produced an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecommendationKind {
    PrimaryProduct,
    FamilyProtection,
    MortgageProtection,
    EarlyCareer,
    PreRetirement,
    HighNetWorth,
    Budget,
    SmokingCessation,
    NextSteps,
}

/// One guidance entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    #[serde(skip)]
    pub kind: RecommendationKind,
    pub title: String,
    pub description: String,
}

impl Recommendation {
    fn new(kind: RecommendationKind, title: &str, description: String) -> Self {
        Self {
            kind,
            title: title.to_string(),
            description,
        }
    }
}

/// Evaluate every rule in order
pub fn generate(profile: &Profile, recommended_coverage: f64, premium: &PremiumResult) -> Vec<Recommendation> {
    let mut recommendations = vec![primary_product(profile, recommended_coverage, premium)];

    if profile.dependents > 0 {
        recommendations.push(Recommendation::new(
            RecommendationKind::FamilyProtection,
            "Family Protection Package",
            "Consider adding to your main policy:\n\
             • Family Income Benefit: a monthly income instead of a single lump sum\n\
             • Children's cover: an additional sum for each child\n\
             • Waiver of Premium: keeps the policy in force if you cannot work\n\
             • Joint Life cover: protects you and your partner under one policy"
                .to_string(),
        ));
    }

    if profile.total_debts > 0.0 && recommended_coverage > 0.0 {
        let share = profile.total_debts / recommended_coverage;
        if share > DEBT_SHARE_THRESHOLD {
            recommendations.push(Recommendation::new(
                RecommendationKind::MortgageProtection,
                "Mortgage Protection Strategy",
                format!(
                    "Your debts ({}) are {:.0}% of your recommended cover. Consider:\n\
                     • Decreasing term cover that falls with the mortgage balance\n\
                     • Level term cover for family needs on top of the debt\n\
                     • Splitting the two so each policy matches its purpose",
                    format_currency(profile.total_debts),
                    share * 100.0
                ),
            ));
        }
    }

    if profile.age < YOUNG_AGE_BELOW {
        recommendations.push(Recommendation::new(
            RecommendationKind::EarlyCareer,
            "Early Career Strategy",
            "A good time to lock in long-term protection:\n\
             • Long level terms keep today's lower rates\n\
             • Convertible term lets you move to permanent cover later\n\
             • Guaranteed insurability options let cover grow with income"
                .to_string(),
        ));
    } else if profile.age > PRE_RETIREMENT_AGE_ABOVE {
        recommendations.push(Recommendation::new(
            RecommendationKind::PreRetirement,
            "Pre-Retirement Focus",
            "Match cover to the years before your pension starts:\n\
             • Shorter terms (10 to 15 years) for remaining debts\n\
             • Whole of life cover if estate planning matters to you\n\
             • Critical illness cover becomes more valuable at this age\n\
             • Review employer death-in-service benefits before retiring"
                .to_string(),
        ));
    }

    if recommended_coverage > HIGH_NET_WORTH_COVERAGE {
        recommendations.push(Recommendation::new(
            RecommendationKind::HighNetWorth,
            "High Net Worth Strategy",
            format!(
                "With {} of cover needed, consider:\n\
                 • Splitting cover across more than one insurer\n\
                 • Writing the policy in trust to keep the payout outside your estate\n\
                 • Key person cover if you own a business",
                format_currency(recommended_coverage)
            ),
        ));
    }

    if premium.annual > profile.annual_income * BUDGET_INCOME_SHARE {
        recommendations.push(Recommendation::new(
            RecommendationKind::Budget,
            "Budget-Friendly Options",
            format!(
                "Your estimated premium of {} a year is more than {:.0}% of your income. Options:\n\
                 • Term cover costs far less than whole of life\n\
                 • Paying annually is often cheaper than monthly\n\
                 • Employer group schemes can cover a multiple of salary\n\
                 • Several smaller policies with staggered end dates",
                format_currency(premium.annual),
                BUDGET_INCOME_SHARE * 100.0
            ),
        ));
    }

    if profile.smoking_status == SmokingStatus::Smoker {
        recommendations.push(Recommendation::new(
            RecommendationKind::SmokingCessation,
            "Smoking Cessation Benefits",
            "Smoking is the largest single loading on your premium:\n\
             • Insurers usually offer non-smoker rates after 12 months smoke-free\n\
             • You can ask for a re-rate once you qualify\n\
             • Free stop-smoking services are widely available"
                .to_string(),
        ));
    }

    recommendations.push(next_steps());
    recommendations
}

fn primary_product(profile: &Profile, recommended_coverage: f64, premium: &PremiumResult) -> Recommendation {
    let mut features = Vec::new();
    if profile.age < 40 {
        features.push("• Guaranteed level premiums for the whole term");
        features.push("• Option to convert to permanent cover without new medical evidence");
    }
    if profile.dependents > 0 {
        features.push("• Terminal illness benefit paid early on diagnosis");
    }
    if profile.inflation_protection {
        features.push("• Index-linked cover that rises with inflation each year");
    }
    if profile.total_debts > 0.0 {
        features.push("• Sum assured that clears outstanding debts");
    }
    if features.is_empty() {
        features.push("• Level cover with a fixed premium");
    }

    let term = match profile.coverage_period.years() {
        Some(years) => format!("{} years", years),
        None => "life".to_string(),
    };

    let mut description = format!(
        "{} Life Insurance with {} cover\n\nKey features:\n{}\n\nEstimated premium: {} per month ({} per year)",
        profile.coverage_period.product_label(),
        format_currency(recommended_coverage),
        features.join("\n"),
        format_currency(premium.monthly),
        format_currency(premium.annual)
    );
    if profile.dependents > 0 {
        description.push_str(&format!(
            "\nProtects {} dependent(s) for {}",
            profile.dependents, term
        ));
    }

    Recommendation::new(
        RecommendationKind::PrimaryProduct,
        "Recommended Primary Product",
        description,
    )
}

fn next_steps() -> Recommendation {
    Recommendation::new(
        RecommendationKind::NextSteps,
        "Next Steps",
        "1. Get quotes from several insurers for this cover amount\n\
         2. Complete the health questionnaire; larger sums may need a medical\n\
         3. Choose beneficiaries and whether to write the policy in trust\n\
         4. Review your cover after major life events"
            .to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::sample_profile;

    fn premium(annual: f64) -> PremiumResult {
        PremiumResult {
            monthly: (annual / 12.0).round(),
            annual,
            explanation: String::new(),
            steps: Vec::new(),
        }
    }

    fn kinds(recommendations: &[Recommendation]) -> Vec<RecommendationKind> {
        recommendations.iter().map(|r| r.kind).collect()
    }

    #[test]
    fn test_reference_profile_rules() {
        let recommendations = generate(&sample_profile(), 500_000.0, &premium(600.0));

        assert_eq!(
            kinds(&recommendations),
            vec![
                RecommendationKind::PrimaryProduct,
                RecommendationKind::FamilyProtection,
                RecommendationKind::NextSteps,
            ]
        );
        assert!(recommendations[0].description.contains("20-Year Term"));
        assert!(recommendations[0].description.contains("£500,000"));
    }

    #[test]
    fn test_every_conditional_rule_fires_in_order() {
        let mut profile = sample_profile();
        profile.age = 30;
        profile.total_debts = 600_000.0;
        profile.smoking_status = SmokingStatus::Smoker;

        let recommendations = generate(&profile, 1_200_000.0, &premium(3_000.0));
        assert_eq!(
            kinds(&recommendations),
            vec![
                RecommendationKind::PrimaryProduct,
                RecommendationKind::FamilyProtection,
                RecommendationKind::MortgageProtection,
                RecommendationKind::EarlyCareer,
                RecommendationKind::HighNetWorth,
                RecommendationKind::Budget,
                RecommendationKind::SmokingCessation,
                RecommendationKind::NextSteps,
            ]
        );
        assert!(recommendations[2].description.contains("50%"));
    }

    #[test]
    fn test_thresholds_are_exclusive() {
        let mut profile = sample_profile();
        profile.age = 50;
        profile.dependents = 0;
        profile.total_debts = 40_000.0;

        // debts exactly 40%, premium exactly 5% of income
        let recommendations = generate(&profile, 100_000.0, &premium(2_500.0));
        assert_eq!(
            kinds(&recommendations),
            vec![RecommendationKind::PrimaryProduct, RecommendationKind::NextSteps]
        );

        profile.age = 51;
        let recommendations = generate(&profile, 100_000.0, &premium(2_500.0));
        assert!(kinds(&recommendations).contains(&RecommendationKind::PreRetirement));
    }

    #[test]
    fn test_deterministic() {
        let profile = sample_profile();
        assert_eq!(
            generate(&profile, 450_000.0, &premium(700.0)),
            generate(&profile, 450_000.0, &premium(700.0))
        );
    }

    #[test]
    fn test_wire_shape_has_title_and_description_only() {
        let json = serde_json::to_value(next_steps()).unwrap();
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["description", "title"]);
    }
}
