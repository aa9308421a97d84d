//! JSON persistence of scaling results.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use stg_core::{ErrorInfo, StgError};

use crate::points::ScalingSeries;

/// Persisted form of a sorted scaling series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillAvailability {
    /// State counts in ascending order.
    #[serde(rename = "STG Sizes")]
    pub stg_sizes: Vec<usize>,
    /// Skills available per state, parallel to `stg_sizes`.
    #[serde(rename = "Available Skills")]
    pub available_skills: Vec<f64>,
}

impl From<&ScalingSeries> for SkillAvailability {
    fn from(series: &ScalingSeries) -> Self {
        let (stg_sizes, available_skills) = series.unzip();
        Self {
            stg_sizes,
            available_skills,
        }
    }
}

/// Serialises the results document to pretty JSON.
pub fn to_json(results: &SkillAvailability) -> Result<String, StgError> {
    serde_json::to_string_pretty(results)
        .map_err(|err| StgError::Serde(ErrorInfo::new("results-serialize", err.to_string())))
}

/// Restores a results document from JSON.
pub fn from_json(json: &str) -> Result<SkillAvailability, StgError> {
    let results: SkillAvailability = serde_json::from_str(json).map_err(|err| {
        StgError::Deserialization(ErrorInfo::new("results-deserialize", err.to_string()))
    })?;
    if results.stg_sizes.len() != results.available_skills.len() {
        return Err(StgError::Deserialization(
            ErrorInfo::new("results-length", "result arrays have different lengths")
                .with_context("sizes", results.stg_sizes.len().to_string())
                .with_context("skills", results.available_skills.len().to_string()),
        ));
    }
    Ok(results)
}

/// Writes the results document to `path`.
pub fn write_results(path: &Path, results: &SkillAvailability) -> Result<(), StgError> {
    let json = to_json(results)?;
    fs::write(path, json).map_err(|err| StgError::io("write-results", &err, path))
}

/// Reads a results document from `path`.
pub fn read_results(path: &Path) -> Result<SkillAvailability, StgError> {
    let json = fs::read_to_string(path).map_err(|err| StgError::io("read-results", &err, path))?;
    from_json(&json)
}
