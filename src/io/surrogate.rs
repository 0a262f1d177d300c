//! Read/write surrogate JSON files.
//!
//! Surrogate JSON is the "portable" representation of a fit:
//! - parameters, basis kind, and the multi-indices
//! - coefficients (enough to re-evaluate the polynomial elsewhere)
//! - moments, fit diagnostics, and first-order/total Sobol indices
//!
//! The schema is defined by `domain::SurrogateFile`.

use std::fs::File;
use std::path::Path;

use chrono::Utc;

use crate::domain::{SobolEntry, SurrogateFile};
use crate::error::AppError;
use crate::fit::FittedSurrogate;

/// Build the serializable view of a fitted surrogate.
pub fn surrogate_file(surrogate: &FittedSurrogate) -> Result<SurrogateFile, AppError> {
    let names = surrogate.parameters().names();
    let first = surrogate.sobol(1)?;
    let first_order = first
        .raw
        .iter()
        .map(|(dims, &raw)| SobolEntry {
            dims: dims.clone(),
            names: dims.iter().map(|&d| names[d].to_string()).collect(),
            raw,
            normalized: first.normalized_of(dims),
        })
        .collect();

    Ok(SurrogateFile {
        tool: "psobol".to_string(),
        generated_at: Utc::now(),
        parameters: surrogate.parameters().iter().cloned().collect(),
        basis: surrogate.basis().kind(),
        strategy: surrogate.strategy(),
        multi_indices: surrogate.basis().elements().to_vec(),
        coefficients: surrogate.coefficients().to_vec(),
        statistics: surrogate.statistics(),
        quality: surrogate.quality().clone(),
        first_order,
        total_order: surrogate.total_sobol(),
    })
}

/// Write a surrogate JSON file.
pub fn write_surrogate_json(path: &Path, surrogate: &FittedSurrogate) -> Result<(), AppError> {
    let doc = surrogate_file(surrogate)?;
    let file = File::create(path).map_err(|e| {
        AppError::io(format!("Failed to create surrogate JSON '{}': {e}", path.display()))
    })?;

    serde_json::to_writer_pretty(file, &doc)
        .map_err(|e| AppError::io(format!("Failed to write surrogate JSON: {e}")))?;

    Ok(())
}

/// Read a surrogate JSON file.
pub fn read_surrogate_json(path: &Path) -> Result<SurrogateFile, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::io(format!("Failed to open surrogate JSON '{}': {e}", path.display()))
    })?;
    let doc: SurrogateFile = serde_json::from_reader(file)
        .map_err(|e| AppError::io(format!("Invalid surrogate JSON: {e}")))?;
    Ok(doc)
}
