//! CSV-based assumption loader
//!
//! Loads pricing and method tables from CSV files in data/assumptions/.
//! Rows are read as-is here; completeness checks happen when the typed
//! tables are built from a [`LoadedAssumptions`].

use crate::error::ConfigurationError;
use crate::methods::MethodName;
use crate::profile::CoveragePeriod;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// Default path to assumptions directory
pub const DEFAULT_ASSUMPTIONS_PATH: &str = "data/assumptions";

pub const TERM_TABLES_FILE: &str = "term_tables.csv";
pub const AGE_BANDS_FILE: &str = "premium_age_bands.csv";
pub const RISK_FACTORS_FILE: &str = "risk_factors.csv";
pub const METHOD_WEIGHTS_FILE: &str = "method_weights.csv";

/// One row of term_tables.csv
#[derive(Debug, Clone, Deserialize)]
pub struct TermRow {
    pub period: CoveragePeriod,
    pub income_multiplier: i32,
    pub dime_income_years: i32,
    pub premium_term_factor: f64,
}

/// One row of premium_age_bands.csv
#[derive(Debug, Clone, Deserialize)]
pub struct AgeBandRow {
    pub min_age: u8,
    pub factor: f64,
}

#[derive(Debug, Clone, Deserialize)]
struct RiskFactorRow {
    category: String,
    key: String,
    value: f64,
}

/// One row of method_weights.csv
#[derive(Debug, Clone, Deserialize)]
pub struct WeightRow {
    pub method: MethodName,
    pub weight: f64,
}

fn read_rows<T: DeserializeOwned>(
    dir: &Path,
    file: &str,
    table: &'static str,
) -> Result<Vec<T>, ConfigurationError> {
    let path = dir.join(file);
    let handle = File::open(&path).map_err(|source| ConfigurationError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let mut reader = csv::Reader::from_reader(handle);

    let mut rows = Vec::new();
    for (i, result) in reader.deserialize().enumerate() {
        let row: T = result.map_err(|e| ConfigurationError::MalformedRow {
            table,
            row: i + 1,
            reason: e.to_string(),
        })?;
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(ConfigurationError::InvalidTable {
            table,
            reason: format!("{} has no rows", path.display()),
        });
    }

    Ok(rows)
}

/// Load per-period multipliers and term factors
pub fn load_term_tables(dir: &Path) -> Result<Vec<TermRow>, ConfigurationError> {
    read_rows(dir, TERM_TABLES_FILE, "term_tables")
}

/// Load premium age bands; the first row (min_age 0) is the base factor
pub fn load_age_bands(dir: &Path) -> Result<Vec<AgeBandRow>, ConfigurationError> {
    read_rows(dir, AGE_BANDS_FILE, "premium_age_bands")
}

/// Load scalar factors keyed by (category, key)
pub fn load_risk_factors(dir: &Path) -> Result<HashMap<(String, String), f64>, ConfigurationError> {
    let rows: Vec<RiskFactorRow> = read_rows(dir, RISK_FACTORS_FILE, "risk_factors")?;

    let mut factors = HashMap::new();
    for (i, row) in rows.into_iter().enumerate() {
        if !row.value.is_finite() || row.value < 0.0 {
            return Err(ConfigurationError::MalformedRow {
                table: "risk_factors",
                row: i + 1,
                reason: format!("{}/{} must be a non-negative number", row.category, row.key),
            });
        }
        if factors.insert((row.category.clone(), row.key.clone()), row.value).is_some() {
            return Err(ConfigurationError::InvalidTable {
                table: "risk_factors",
                reason: format!("duplicate entry {}/{}", row.category, row.key),
            });
        }
    }

    Ok(factors)
}

/// Load weighted-mean aggregation weights
pub fn load_method_weights(dir: &Path) -> Result<Vec<WeightRow>, ConfigurationError> {
    read_rows(dir, METHOD_WEIGHTS_FILE, "method_weights")
}

/// Raw rows of every assumption table
#[derive(Debug, Clone)]
pub struct LoadedAssumptions {
    pub term_tables: Vec<TermRow>,
    pub age_bands: Vec<AgeBandRow>,
    pub risk_factors: HashMap<(String, String), f64>,
    pub method_weights: Vec<WeightRow>,
}

impl LoadedAssumptions {
    /// Load all assumptions from the default path
    pub fn load_default() -> Result<Self, ConfigurationError> {
        Self::load_from(Path::new(DEFAULT_ASSUMPTIONS_PATH))
    }

    /// Load all assumptions from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigurationError> {
        Ok(Self {
            term_tables: load_term_tables(path)?,
            age_bands: load_age_bands(path)?,
            risk_factors: load_risk_factors(path)?,
            method_weights: load_method_weights(path)?,
        })
    }

    /// Required scalar from risk_factors.csv
    pub fn risk_factor(&self, category: &str, key: &str) -> Result<f64, ConfigurationError> {
        self.risk_factors
            .get(&(category.to_string(), key.to_string()))
            .copied()
            .ok_or_else(|| ConfigurationError::MissingTableEntry {
                table: "risk_factors",
                key: format!("{}/{}", category, key),
            })
    }

    /// (period, value) pairs for one column of term_tables.csv
    pub fn term_column<T: Copy>(&self, column: impl Fn(&TermRow) -> T) -> Vec<(CoveragePeriod, T)> {
        self.term_tables
            .iter()
            .map(|row| (row.period, column(row)))
            .collect()
    }
}
