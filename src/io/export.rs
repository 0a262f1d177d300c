//! Export Sobol tables to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::SobolIndices;
use crate::error::AppError;

/// Write one row per dimension subset, across all given orders.
pub fn write_sobol_csv(path: &Path, names: &[&str], tables: &[&SobolIndices]) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create export CSV '{}': {e}", path.display())))?;

    writeln!(file, "order,dims,names,raw,normalized")
        .map_err(|e| AppError::io(format!("Failed to write export CSV header: {e}")))?;

    for table in tables {
        for (dims, &raw) in &table.raw {
            let idx: Vec<String> = dims.iter().map(|d| d.to_string()).collect();
            let labels: Vec<&str> = dims
                .iter()
                .map(|&d| names.get(d).copied().unwrap_or("?"))
                .collect();
            writeln!(
                file,
                "{},{},{},{:.10e},{:.10}",
                table.order,
                idx.join(" "),
                labels.join(" "),
                raw,
                table.normalized_of(dims),
            )
            .map_err(|e| AppError::io(format!("Failed to write export CSV row: {e}")))?;
        }
    }

    Ok(())
}
