//! Wire-level calculation request and its conversion into a validated [`Profile`]

use super::data::{
    CoveragePeriod, Gender, Profile, SmokingStatus, DEFAULT_FUNERAL_COSTS, MAX_AGE,
    MAX_DEPENDENTS, MIN_AGE,
};
use crate::error::{ValidationError, ValidationErrors};
use log::warn;
use serde::{Deserialize, Deserializer, Serialize};

fn default_funeral_costs() -> f64 {
    DEFAULT_FUNERAL_COSTS
}

fn default_inflation_protection() -> String {
    "no".to_string()
}

/// Null or an empty CSV cell reads as the type's default
fn blank_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn blank_as_default_funeral_costs<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(DEFAULT_FUNERAL_COSTS))
}

fn blank_as_default_inflation_protection<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(default_inflation_protection))
}

/// Calculation request as received from callers
///
/// Enumerations stay as raw strings so a bad literal is reported as a
/// field violation instead of a deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRequest {
    #[serde(default)]
    pub age: Option<i64>,

    #[serde(default)]
    pub gender: Option<String>,

    #[serde(default)]
    pub smoking: Option<String>,

    #[serde(default)]
    pub annual_income: Option<f64>,

    #[serde(default)]
    pub monthly_expenses: Option<f64>,

    #[serde(default, deserialize_with = "blank_as_default")]
    pub existing_coverage: f64,

    #[serde(default, deserialize_with = "blank_as_default")]
    pub savings: f64,

    /// Canonical debt figure; takes precedence over the legacy split
    #[serde(default)]
    pub total_debts: Option<f64>,

    /// Legacy: mortgage balance, summed with `other_debts` when `total_debts` is absent
    #[serde(default)]
    pub mortgage: Option<f64>,

    /// Legacy: non-mortgage debts
    #[serde(default)]
    pub other_debts: Option<f64>,

    /// Legacy: accepted for compatibility, not used by any method
    #[serde(default)]
    pub spouse_income: Option<f64>,

    #[serde(default = "default_funeral_costs", deserialize_with = "blank_as_default_funeral_costs")]
    pub funeral_costs: f64,

    #[serde(default, deserialize_with = "blank_as_default")]
    pub dependents: i64,

    #[serde(default, deserialize_with = "blank_as_default")]
    pub education_fund: f64,

    #[serde(default)]
    pub coverage_period: Option<String>,

    /// "yes" or "no"
    #[serde(
        default = "default_inflation_protection",
        deserialize_with = "blank_as_default_inflation_protection"
    )]
    pub inflation_protection: String,
}

impl Default for ProfileRequest {
    fn default() -> Self {
        Self {
            age: None,
            gender: None,
            smoking: None,
            annual_income: None,
            monthly_expenses: None,
            existing_coverage: 0.0,
            savings: 0.0,
            total_debts: None,
            mortgage: None,
            other_debts: None,
            spouse_income: None,
            funeral_costs: DEFAULT_FUNERAL_COSTS,
            dependents: 0,
            education_fund: 0.0,
            coverage_period: None,
            inflation_protection: default_inflation_protection(),
        }
    }
}

impl ProfileRequest {
    /// Validate every field and build the canonical profile
    pub fn into_profile(&self) -> Result<Profile, ValidationErrors> {
        let mut violations = Vec::new();

        let age = match self.age {
            None => {
                violations.push(ValidationError::Missing { field: "age" });
                None
            }
            Some(age) => checked_range("age", age, MIN_AGE, MAX_AGE, &mut violations),
        };

        let dependents = checked_range("dependents", self.dependents, 0, MAX_DEPENDENTS, &mut violations);

        let gender = parse_required::<Gender>("gender", self.gender.as_deref(), &mut violations);
        let smoking_status =
            parse_required::<SmokingStatus>("smoking", self.smoking.as_deref(), &mut violations);
        let coverage_period = parse_required::<CoveragePeriod>(
            "coveragePeriod",
            self.coverage_period.as_deref(),
            &mut violations,
        );

        let inflation_protection = match self.inflation_protection.as_str() {
            "yes" => Some(true),
            "no" => Some(false),
            other => {
                violations.push(ValidationError::InvalidChoice {
                    field: "inflationProtection",
                    value: other.to_string(),
                    allowed: "yes, no",
                });
                None
            }
        };

        let annual_income = required_amount("annualIncome", self.annual_income, &mut violations);
        let monthly_expenses =
            required_amount("monthlyExpenses", self.monthly_expenses, &mut violations);
        let existing_coverage = amount("existingCoverage", self.existing_coverage, &mut violations);
        let savings = amount("savings", self.savings, &mut violations);
        let funeral_costs = amount("funeralCosts", self.funeral_costs, &mut violations);
        let education_fund = amount("educationFund", self.education_fund, &mut violations);
        let total_debts = self.resolve_total_debts(&mut violations);

        if self.spouse_income.is_some() {
            warn!("spouseIncome is a deprecated field and is ignored by all methods");
        }

        match (age, dependents, gender, smoking_status, coverage_period, inflation_protection) {
            (Some(age), Some(dependents), Some(gender), Some(smoking_status), Some(coverage_period), Some(inflation_protection))
                if violations.is_empty() =>
            {
                Ok(Profile {
                    age,
                    gender,
                    smoking_status,
                    annual_income,
                    monthly_expenses,
                    existing_coverage,
                    savings,
                    funeral_costs,
                    education_fund,
                    total_debts,
                    dependents,
                    coverage_period,
                    inflation_protection,
                })
            }
            _ => Err(ValidationErrors::new(violations)),
        }
    }

    /// totalDebts if present, otherwise the legacy mortgage + otherDebts pair
    fn resolve_total_debts(&self, violations: &mut Vec<ValidationError>) -> f64 {
        let legacy_supplied = self.mortgage.is_some() || self.other_debts.is_some();

        match self.total_debts {
            Some(total) => {
                if legacy_supplied {
                    warn!("both totalDebts and mortgage/otherDebts supplied; using totalDebts");
                }
                amount("totalDebts", total, violations)
            }
            None if legacy_supplied => {
                warn!("mortgage/otherDebts are deprecated; mapping their sum to totalDebts");
                let mortgage = amount("mortgage", self.mortgage.unwrap_or(0.0), violations);
                let other = amount("otherDebts", self.other_debts.unwrap_or(0.0), violations);
                mortgage + other
            }
            None => 0.0,
        }
    }
}

fn checked_range(
    field: &'static str,
    value: i64,
    min: u8,
    max: u8,
    violations: &mut Vec<ValidationError>,
) -> Option<u8> {
    if value < min as i64 || value > max as i64 {
        violations.push(ValidationError::OutOfRange {
            field,
            value,
            min: min as i64,
            max: max as i64,
        });
        return None;
    }
    Some(value as u8)
}

fn parse_required<T>(
    field: &'static str,
    raw: Option<&str>,
    violations: &mut Vec<ValidationError>,
) -> Option<T>
where
    T: std::str::FromStr<Err = ValidationError>,
{
    match raw {
        None => {
            violations.push(ValidationError::Missing { field });
            None
        }
        Some(raw) => match raw.parse::<T>() {
            Ok(value) => Some(value),
            Err(err) => {
                violations.push(err);
                None
            }
        },
    }
}

fn amount(field: &'static str, value: f64, violations: &mut Vec<ValidationError>) -> f64 {
    if !value.is_finite() || value < 0.0 {
        violations.push(ValidationError::NegativeAmount { field, value });
        return 0.0;
    }
    value
}

fn required_amount(
    field: &'static str,
    value: Option<f64>,
    violations: &mut Vec<ValidationError>,
) -> f64 {
    match value {
        Some(value) => amount(field, value, violations),
        None => {
            violations.push(ValidationError::Missing { field });
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_json(extra: &str) -> ProfileRequest {
        let json = format!(
            r#"{{"age": 35, "gender": "male", "smoking": "non-smoker",
                "annualIncome": 50000, "monthlyExpenses": 2500,
                "coveragePeriod": "20"{}}}"#,
            extra
        );
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn test_defaults_applied() {
        let profile = request_json("").into_profile().unwrap();

        assert_eq!(profile.age, 35);
        assert_eq!(profile.funeral_costs, 4000.0);
        assert_eq!(profile.dependents, 0);
        assert_eq!(profile.total_debts, 0.0);
        assert!(!profile.inflation_protection);
        assert_eq!(profile.coverage_period, CoveragePeriod::Years20);
    }

    #[test]
    fn test_missing_required_fields() {
        let request: ProfileRequest = serde_json::from_str("{}").unwrap();
        let errors = request.into_profile().unwrap_err();

        for field in ["age", "gender", "smoking", "annualIncome", "monthlyExpenses", "coveragePeriod"] {
            assert!(errors.contains_field(field), "expected violation for {}", field);
        }
    }

    #[test]
    fn test_out_of_range_and_bad_literals() {
        let request = request_json(r#", "dependents": 11, "inflationProtection": "maybe""#);
        let mut request = request;
        request.age = Some(17);
        request.coverage_period = Some("12".to_string());

        let errors = request.into_profile().unwrap_err();
        assert!(errors.contains_field("age"));
        assert!(errors.contains_field("dependents"));
        assert!(errors.contains_field("coveragePeriod"));
        assert!(errors.contains_field("inflationProtection"));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let errors = request_json(r#", "savings": -5"#).into_profile().unwrap_err();
        assert_eq!(
            errors.violations,
            vec![ValidationError::NegativeAmount { field: "savings", value: -5.0 }]
        );
    }

    #[test]
    fn test_legacy_debts_are_summed() {
        let profile = request_json(r#", "mortgage": 200000, "otherDebts": 15000, "spouseIncome": 30000"#)
            .into_profile()
            .unwrap();
        assert_eq!(profile.total_debts, 215_000.0);
    }

    #[test]
    fn test_total_debts_wins_over_legacy() {
        let profile = request_json(r#", "totalDebts": 50000, "mortgage": 200000"#)
            .into_profile()
            .unwrap();
        assert_eq!(profile.total_debts, 50_000.0);
    }

    #[test]
    fn test_null_optional_fields_take_defaults() {
        let profile = request_json(
            r#", "savings": null, "funeralCosts": null, "dependents": null, "inflationProtection": """#,
        )
        .into_profile()
        .unwrap();

        assert_eq!(profile.savings, 0.0);
        assert_eq!(profile.funeral_costs, 4000.0);
        assert_eq!(profile.dependents, 0);
        assert!(!profile.inflation_protection);
    }

    #[test]
    fn test_inflation_protection_yes() {
        let profile = request_json(r#", "inflationProtection": "yes""#).into_profile().unwrap();
        assert!(profile.inflation_protection);
    }
}
