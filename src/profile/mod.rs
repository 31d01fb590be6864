//! Profile data structures, request validation and CSV loading

mod data;
mod request;
pub mod loader;

pub use data::{
    CoveragePeriod, Gender, Profile, SmokingStatus, DEFAULT_FUNERAL_COSTS, MAX_AGE,
    MAX_DEPENDENTS, MIN_AGE,
};
pub use request::ProfileRequest;
pub use loader::{load_requests, load_requests_from_reader};

#[cfg(test)]
pub(crate) use data::sample_profile;
