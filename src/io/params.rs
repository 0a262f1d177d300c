//! Load a parameter set from JSON.
//!
//! The file is a list of parameters in model-argument order:
//!
//! ```json
//! [
//!   { "name": "M", "distribution": { "kind": "uniform", "lower": 30.0, "upper": 60.0 }, "order": 3 },
//!   ...
//! ]
//! ```

use std::fs::File;
use std::path::Path;

use crate::domain::{Parameter, ParameterSet};
use crate::error::AppError;

/// Read and validate a parameter JSON file.
///
/// `expected_dim` is the model's input arity; a mismatch is a configuration error.
pub fn read_parameters_json(path: &Path, expected_dim: usize) -> Result<ParameterSet, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::io(format!("Failed to open parameter JSON '{}': {e}", path.display()))
    })?;
    let params: Vec<Parameter> = serde_json::from_reader(file).map_err(|e| {
        AppError::configuration(format!("Invalid parameter JSON '{}': {e}", path.display()))
    })?;

    if params.len() != expected_dim {
        return Err(AppError::configuration(format!(
            "Parameter JSON '{}' lists {} parameters; the model takes {expected_dim}.",
            path.display(),
            params.len()
        )));
    }

    ParameterSet::new(params)
}
