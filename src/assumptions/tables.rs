//! Lookup tables keyed by coverage period and attained age
//!
//! Both tables are total once built: every coverage period has an entry and
//! every age maps to a band, so lookups during a calculation cannot fail.
//! Completeness is checked when a table is built from loaded rows.

use crate::error::ConfigurationError;
use crate::profile::CoveragePeriod;
use serde::{Deserialize, Serialize};

/// One value per coverage period
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TermTable<T: Copy> {
    values: [T; 6],
}

impl<T: Copy> TermTable<T> {
    /// Build from values in [`CoveragePeriod::ALL`] order (10, 15, 20, 25, 30, whole)
    pub const fn new(values: [T; 6]) -> Self {
        Self { values }
    }

    /// Build from loaded (period, value) rows; every period must appear exactly once
    pub fn from_entries(
        table: &'static str,
        entries: &[(CoveragePeriod, T)],
    ) -> Result<Self, ConfigurationError> {
        let mut slots: [Option<T>; 6] = [None; 6];

        for &(period, value) in entries {
            let slot = &mut slots[period.index()];
            if slot.is_some() {
                return Err(ConfigurationError::InvalidTable {
                    table,
                    reason: format!("duplicate entry for period {}", period),
                });
            }
            *slot = Some(value);
        }

        let mut values = Vec::with_capacity(6);
        for period in CoveragePeriod::ALL {
            match slots[period.index()] {
                Some(value) => values.push(value),
                None => {
                    return Err(ConfigurationError::MissingTableEntry {
                        table,
                        key: period.to_string(),
                    })
                }
            }
        }

        let values: [T; 6] = values.try_into().map_err(|_| ConfigurationError::InvalidTable {
            table,
            reason: "expected six coverage periods".to_string(),
        })?;
        Ok(Self { values })
    }

    /// Value for a coverage period
    pub fn get(&self, period: CoveragePeriod) -> T {
        self.values[period.index()]
    }

    /// (period, value) pairs in table order
    pub fn entries(&self) -> impl Iterator<Item = (CoveragePeriod, T)> + '_ {
        CoveragePeriod::ALL.iter().map(move |&p| (p, self.get(p)))
    }
}

/// A band starting at `min_age` (inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgeBand {
    pub min_age: u8,
    pub factor: f64,
}

/// Age-banded factor table
///
/// `base_factor` applies below the first band's `min_age`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeBandTable {
    base_factor: f64,
    bands: Vec<AgeBand>,
}

impl AgeBandTable {
    /// Build from a base factor plus ascending bands
    pub fn new(base_factor: f64, bands: Vec<AgeBand>) -> Result<Self, ConfigurationError> {
        if !base_factor.is_finite() || base_factor <= 0.0 {
            return Err(ConfigurationError::InvalidTable {
                table: "premium_age_bands",
                reason: format!("base factor {} must be positive", base_factor),
            });
        }

        for pair in bands.windows(2) {
            if pair[1].min_age <= pair[0].min_age {
                return Err(ConfigurationError::InvalidTable {
                    table: "premium_age_bands",
                    reason: format!(
                        "bands must be strictly ascending ({} then {})",
                        pair[0].min_age, pair[1].min_age
                    ),
                });
            }
        }

        if let Some(band) = bands.iter().find(|b| !b.factor.is_finite() || b.factor <= 0.0) {
            return Err(ConfigurationError::InvalidTable {
                table: "premium_age_bands",
                reason: format!("factor for age {} must be positive", band.min_age),
            });
        }

        Ok(Self { base_factor, bands })
    }

    /// Factor for an attained age
    pub fn factor(&self, age: u8) -> f64 {
        self.position(age)
            .map_or(self.base_factor, |i| self.bands[i].factor)
    }

    /// Human-readable band containing `age`, e.g. "under 30", "40-49", "60+"
    pub fn label(&self, age: u8) -> String {
        match self.position(age) {
            None => match self.bands.first() {
                Some(first) => format!("under {}", first.min_age),
                None => "all ages".to_string(),
            },
            Some(i) => {
                let start = self.bands[i].min_age;
                match self.bands.get(i + 1) {
                    Some(next) => format!("{}-{}", start, next.min_age.saturating_sub(1)),
                    None => format!("{}+", start),
                }
            }
        }
    }

    pub fn base_factor(&self) -> f64 {
        self.base_factor
    }

    pub fn bands(&self) -> &[AgeBand] {
        &self.bands
    }

    fn position(&self, age: u8) -> Option<usize> {
        self.bands.iter().rposition(|b| age >= b.min_age)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_table_lookup() {
        let table = TermTable::new([8, 10, 12, 15, 18, 25]);
        assert_eq!(table.get(CoveragePeriod::Years10), 8);
        assert_eq!(table.get(CoveragePeriod::WholeOfLife), 25);
        assert_eq!(table.entries().count(), 6);
    }

    #[test]
    fn test_term_table_missing_entry() {
        let entries = [
            (CoveragePeriod::Years10, 1.0),
            (CoveragePeriod::Years15, 1.0),
            (CoveragePeriod::Years20, 1.0),
            (CoveragePeriod::Years25, 1.0),
            (CoveragePeriod::Years30, 1.0),
        ];
        let err = TermTable::from_entries("term_tables", &entries).unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::MissingTableEntry { key, .. } if key == "whole"
        ));
    }

    #[test]
    fn test_term_table_duplicate_entry() {
        let entries = [(CoveragePeriod::Years10, 1), (CoveragePeriod::Years10, 2)];
        assert!(TermTable::from_entries("term_tables", &entries).is_err());
    }

    #[test]
    fn test_age_band_boundaries() {
        let table = AgeBandTable::new(
            0.75,
            vec![
                AgeBand { min_age: 30, factor: 1.0 },
                AgeBand { min_age: 40, factor: 1.4 },
                AgeBand { min_age: 50, factor: 2.2 },
                AgeBand { min_age: 60, factor: 3.5 },
            ],
        )
        .unwrap();

        assert_eq!(table.factor(18), 0.75);
        assert_eq!(table.factor(29), 0.75);
        assert_eq!(table.factor(30), 1.0);
        assert_eq!(table.factor(49), 1.4);
        assert_eq!(table.factor(50), 2.2);
        assert_eq!(table.factor(80), 3.5);
        assert_eq!(table.label(25), "under 30");
        assert_eq!(table.label(45), "40-49");
        assert_eq!(table.label(72), "60+");
    }

    #[test]
    fn test_age_bands_must_ascend() {
        let bands = vec![
            AgeBand { min_age: 40, factor: 1.4 },
            AgeBand { min_age: 30, factor: 1.0 },
        ];
        assert!(AgeBandTable::new(0.75, bands).is_err());
    }
}
