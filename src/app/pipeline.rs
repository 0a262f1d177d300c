//! The analysis pipeline, independent of presentation.
//!
//! parameters -> basis -> fitter -> fit(piston) -> statistics -> Sobol indices
//!
//! The CLI only prints and exports what this returns.

use crate::domain::{AnalysisConfig, ParameterSet, SobolIndices, Statistics, Validation};
use crate::error::AppError;
use crate::fit::{Basis, FittedSurrogate, Polyreg, validate_surrogate};
use crate::models::{PISTON_DIM, PISTON_ORDER, PISTON_REFERENCE_FIRST_ORDER, piston, piston_parameters};
use crate::report::{ReferenceRow, compare_with_reference};

/// All computed outputs of a single `psobol analyze` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub surrogate: FittedSurrogate,
    pub statistics: Statistics,
    pub first_order: SobolIndices,
    /// Present when `sobol_order > 1`.
    pub higher_order: Option<SobolIndices>,
    pub total_order: Vec<f64>,
    pub validation: Option<Validation>,
    /// Literature comparison; only for the default piston parameters.
    pub reference: Option<Vec<ReferenceRow>>,
}

/// Resolve the parameter set for a run.
pub fn resolve_parameters(config: &AnalysisConfig) -> Result<ParameterSet, AppError> {
    let params = match &config.params_path {
        Some(path) => crate::io::read_parameters_json(path, PISTON_DIM)?,
        None => piston_parameters(PISTON_ORDER)?,
    };
    Ok(match config.order {
        Some(order) => params.with_order(order),
        None => params,
    })
}

/// Execute the full analysis and return the computed outputs.
pub fn run_analysis(config: &AnalysisConfig) -> Result<RunOutput, AppError> {
    // 1) Parameters and basis.
    let parameters = resolve_parameters(config)?;
    let basis = Basis::new(config.basis, &parameters)?;
    tracing::info!(
        dims = parameters.len(),
        basis = config.basis.display_name(),
        cardinality = basis.cardinality(),
        "basis constructed"
    );
    if config.sobol_order == 0 || config.sobol_order > parameters.len() {
        return Err(AppError::configuration(format!(
            "Sobol order must be between 1 and {} (got {}).",
            parameters.len(),
            config.sobol_order
        )));
    }

    // 2) Fit.
    let fitter = Polyreg::new(parameters, basis, config.strategy, config.oversampling)?;
    let surrogate = fitter.fit(piston)?;

    // 3) Moments and indices.
    let statistics = surrogate.statistics();
    let first_order = surrogate.sobol(1)?;
    let higher_order = if config.sobol_order > 1 {
        Some(surrogate.sobol(config.sobol_order)?)
    } else {
        None
    };
    let total_order = surrogate.total_sobol();

    let raw_sum: f64 = first_order.raw.values().sum();
    if raw_sum > statistics.variance * (1.0 + 1e-9) {
        tracing::warn!(raw_sum, variance = statistics.variance, "first-order sum exceeds variance");
    }

    // 4) Optional hold-out check.
    let validation = if config.validate_points > 0 {
        Some(validate_surrogate(
            &surrogate,
            piston,
            config.validate_points,
            config.validate_seed,
        )?)
    } else {
        None
    };

    let reference = config.params_path.is_none().then(|| {
        compare_with_reference(
            &surrogate.parameters().names(),
            &first_order.per_dimension_raw(),
            &PISTON_REFERENCE_FIRST_ORDER,
        )
    });

    Ok(RunOutput {
        surrogate,
        statistics,
        first_order,
        higher_order,
        total_order,
        validation,
        reference,
    })
}
