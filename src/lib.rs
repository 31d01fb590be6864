//! Coverage Engine - Life insurance needs and premium calculation
//!
//! This library provides:
//! - Four coverage estimation methods (Income Replacement, DIME, Needs Analysis, Human Life Value)
//! - Median or weighted-mean aggregation into one recommended coverage
//! - A six-stage multiplicative premium pipeline driven by a pluggable rate provider
//! - Deterministic, rule-based recommendations and explanation text
//! - CSV-loaded assumption tables, a TTL result cache and parallel batch runs

pub mod aggregation;
pub mod assumptions;
pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod methods;
pub mod narrative;
pub mod premium;
pub mod profile;
pub mod rates;
pub mod recommendations;

// Re-export commonly used types
pub use aggregation::{Aggregation, AggregationPolicy};
pub use assumptions::Assumptions;
pub use cache::CalculationCache;
pub use config::EngineConfig;
pub use engine::{CalculationEngine, CalculationResult};
pub use error::{ConfigurationError, EngineError, ValidationError, ValidationErrors};
pub use methods::{MethodName, MethodResult};
pub use premium::PremiumResult;
pub use profile::{CoveragePeriod, Gender, Profile, ProfileRequest, SmokingStatus};
pub use rates::{ConfiguredRateProvider, RateProvider, StaticRateProvider};
pub use recommendations::Recommendation;
