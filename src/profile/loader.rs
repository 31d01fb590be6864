//! Load calculation requests from CSV for batch runs
//!
//! Column headers use the same camelCase names as the JSON request
//! (`age`, `gender`, `smoking`, `annualIncome`, ...). Optional columns may be
//! omitted entirely; empty cells in optional columns are read as absent.

use super::ProfileRequest;
use csv::Reader;
use std::error::Error;
use std::path::Path;

/// Load all requests from a CSV file
pub fn load_requests<P: AsRef<Path>>(path: P) -> Result<Vec<ProfileRequest>, Box<dyn Error>> {
    let reader = Reader::from_path(path)?;
    collect_requests(reader)
}

/// Load requests from any reader (e.g., string buffer, network stream)
pub fn load_requests_from_reader<R: std::io::Read>(
    reader: R,
) -> Result<Vec<ProfileRequest>, Box<dyn Error>> {
    collect_requests(Reader::from_reader(reader))
}

fn collect_requests<R: std::io::Read>(
    mut reader: Reader<R>,
) -> Result<Vec<ProfileRequest>, Box<dyn Error>> {
    let mut requests = Vec::new();

    for (row, result) in reader.deserialize().enumerate() {
        let request: ProfileRequest =
            result.map_err(|e| format!("profile row {}: {}", row + 1, e))?;
        requests.push(request);
    }

    Ok(requests)
}
