//! Least-squares polynomial-chaos fitting.
//!
//! Given:
//! - a parameter set (uniform inputs)
//! - a multi-index basis
//! - a design strategy and an oversampling factor
//!
//! we:
//! - choose `ceil(oversampling × cardinality)` design points
//! - evaluate the model at each of them
//! - solve the row-weighted least-squares problem for the coefficients
//!
//! and return a `FittedSurrogate`. Fitting is a pure function of its inputs;
//! running it twice gives identical coefficients.

use nalgebra::{DMatrix, DVector};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Uniform;

use crate::domain::{
    DesignMatrix, FitQuality, ParameterSet, SamplingStrategy, SobolIndices, Statistics, Validation,
};
use crate::error::AppError;
use crate::fit::design::{
    Candidates, MAX_DESIGN_POINTS, check_dense_size, random_points, tensor_grid, tensor_grid_size,
};
use crate::fit::index_set::Basis;
use crate::fit::selection::select_rows_qr;
use crate::math::{
    f_statistic, r_squared, residual_sum_of_squares, solve_least_squares, t_statistics,
};

/// Configured regression fitter.
#[derive(Debug, Clone)]
pub struct Polyreg {
    parameters: ParameterSet,
    basis: Basis,
    strategy: SamplingStrategy,
    oversampling: f64,
}

impl Polyreg {
    pub fn new(
        parameters: ParameterSet,
        basis: Basis,
        strategy: SamplingStrategy,
        oversampling: f64,
    ) -> Result<Self, AppError> {
        if basis.dimensions() != parameters.len() {
            return Err(AppError::configuration(format!(
                "Basis has {} dimensions but there are {} parameters.",
                basis.dimensions(),
                parameters.len()
            )));
        }
        if !(oversampling.is_finite() && oversampling > 0.0) {
            return Err(AppError::configuration(format!(
                "Oversampling factor must be finite and > 0 (got {oversampling})."
            )));
        }
        Ok(Self {
            parameters,
            basis,
            strategy,
            oversampling,
        })
    }

    pub fn parameters(&self) -> &ParameterSet {
        &self.parameters
    }

    pub fn basis(&self) -> &Basis {
        &self.basis
    }

    pub fn strategy(&self) -> SamplingStrategy {
        self.strategy
    }

    /// Number of design points the strategy will request.
    ///
    /// Fails when `ceil(oversampling × cardinality)` exceeds [`MAX_DESIGN_POINTS`].
    pub fn design_size(&self) -> Result<usize, AppError> {
        let n = (self.oversampling * self.basis.cardinality() as f64).ceil();
        if !(n <= MAX_DESIGN_POINTS as f64) {
            return Err(AppError::configuration(format!(
                "Oversampling {} x {} terms requests more than {MAX_DESIGN_POINTS} design points.",
                self.oversampling,
                self.basis.cardinality()
            )));
        }
        Ok((n as usize).max(1))
    }

    /// Choose design points (standard coordinates) without evaluating the model.
    pub fn select_design(&self) -> Result<Candidates, AppError> {
        let p = self.basis.cardinality();
        match self.strategy {
            SamplingStrategy::TensorGrid => {
                check_dense_size(self.grid_size()?, p, "Tensor-grid least-squares system")?;
                tensor_grid(&self.parameters)
            }
            SamplingStrategy::Random { seed } => {
                let count = self.design_size()?;
                check_dense_size(count, p, "Random-design least-squares system")?;
                random_points(self.parameters.len(), count, seed)
            }
            SamplingStrategy::QrSubsample => {
                let count = self.design_size()?;
                let candidates = self.grid_size()?;
                if count > candidates {
                    return Err(AppError::configuration(format!(
                        "Requested {count} design points but the candidate grid has only {candidates}."
                    )));
                }
                check_dense_size(candidates, p, "QR candidate matrix")?;

                let grid = tensor_grid(&self.parameters)?;
                let a_t = weighted_design_transposed(&self.basis, &grid);
                let rows = select_rows_qr(&a_t, count);
                tracing::debug!(
                    candidates = grid.len(),
                    selected = rows.len(),
                    "QR subsampling complete"
                );
                Ok(grid.subset(&rows))
            }
            SamplingStrategy::Supplied => Err(AppError::configuration(
                "A supplied design has no points to select; use `fit_data`.",
            )),
        }
    }

    fn grid_size(&self) -> Result<usize, AppError> {
        tensor_grid_size(&self.parameters)
            .filter(|&n| n <= MAX_DESIGN_POINTS)
            .ok_or_else(|| {
                AppError::configuration(format!(
                    "Tensor grid would exceed {MAX_DESIGN_POINTS} points; lower the orders."
                ))
            })
    }

    /// Evaluate `model` on the selected design and fit the coefficients.
    pub fn fit<F>(&self, mut model: F) -> Result<FittedSurrogate, AppError>
    where
        F: FnMut(&[f64]) -> Result<f64, AppError>,
    {
        let design = self.select_design()?;
        let p = self.basis.cardinality();
        let n = design.len();
        tracing::info!(
            strategy = self.strategy.display_name(),
            points = n,
            terms = p,
            "fitting polynomial surrogate"
        );
        if n < p {
            return Err(AppError::underdetermined(format!(
                "{n} design points cannot determine {p} basis coefficients \
                 (increase the oversampling factor)."
            )));
        }

        let mut points = Vec::with_capacity(n);
        let mut outputs = Vec::with_capacity(n);
        for (i, z) in design.points.iter().enumerate() {
            let x = self.parameters.from_standard(z);
            let y = model(&x).map_err(|e| {
                AppError::new(e.kind(), format!("Model evaluation failed at design point {i}: {e}"))
            })?;
            points.push(x);
            outputs.push(y);
        }

        self.regress(&design.points, design.weights, points, outputs, self.strategy)
    }

    /// Fit the coefficients to caller-supplied training data.
    ///
    /// `points` are physical coordinates, one row per observation; every row
    /// gets the same weight. The configured strategy is not used.
    pub fn fit_data(
        &self,
        points: &[Vec<f64>],
        outputs: &[f64],
    ) -> Result<FittedSurrogate, AppError> {
        let d = self.parameters.len();
        let p = self.basis.cardinality();
        let n = points.len();
        if n != outputs.len() {
            return Err(AppError::configuration(format!(
                "Training data has {n} points but {} outputs.",
                outputs.len()
            )));
        }
        if let Some(bad) = points.iter().position(|x| x.len() != d) {
            return Err(AppError::configuration(format!(
                "Training point {bad} has {} coordinates; expected {d}.",
                points[bad].len()
            )));
        }
        if n < p {
            return Err(AppError::underdetermined(format!(
                "{n} training points cannot determine {p} basis coefficients."
            )));
        }
        tracing::info!(points = n, terms = p, "fitting polynomial surrogate to supplied data");

        let standard: Vec<Vec<f64>> =
            points.iter().map(|x| self.parameters.to_standard(x)).collect();
        let weights = vec![1.0 / n as f64; n];
        self.regress(
            &standard,
            weights,
            points.to_vec(),
            outputs.to_vec(),
            SamplingStrategy::Supplied,
        )
    }

    /// Row-weighted least squares on a fixed design.
    fn regress(
        &self,
        standard: &[Vec<f64>],
        weights: Vec<f64>,
        points: Vec<Vec<f64>>,
        outputs: Vec<f64>,
        strategy: SamplingStrategy,
    ) -> Result<FittedSurrogate, AppError> {
        let p = self.basis.cardinality();
        let n = standard.len();
        check_dense_size(n, p, "Least-squares system")?;

        // Scale rows by sqrt(w_i) and solve an ordinary least squares problem.
        let a = weighted_design(&self.basis, standard, &weights);
        let b = DVector::from_iterator(
            n,
            outputs.iter().zip(weights.iter()).map(|(y, w)| y * w.sqrt()),
        );

        let ls = solve_least_squares(&a, &b)?;
        let quality = FitQuality {
            n_points: n,
            n_terms: p,
            condition_number: ls.condition_number,
            rss: residual_sum_of_squares(&a, &ls.coefficients, &b),
            r_squared: r_squared(&a, &ls.coefficients, &b),
            t_stats: t_statistics(&a, &ls.coefficients, &b),
        };
        tracing::debug!(
            condition_number = quality.condition_number,
            r_squared = quality.r_squared,
            "least-squares solve complete"
        );

        Ok(FittedSurrogate {
            parameters: self.parameters.clone(),
            basis: self.basis.clone(),
            strategy,
            coefficients: ls.coefficients.iter().copied().collect(),
            design: DesignMatrix {
                points,
                weights,
                outputs,
            },
            quality,
        })
    }
}

/// Weighted design matrix: row `i` is `sqrt(w_i) · ψ(z_i)`.
fn weighted_design(basis: &Basis, standard: &[Vec<f64>], weights: &[f64]) -> DMatrix<f64> {
    let p = basis.cardinality();
    let mut a = DMatrix::<f64>::zeros(standard.len(), p);
    let mut row = vec![0.0; p];
    for (i, (z, w)) in standard.iter().zip(weights.iter()).enumerate() {
        basis.fill_row(z, &mut row);
        let sw = w.sqrt();
        for (j, v) in row.iter().enumerate() {
            a[(i, j)] = v * sw;
        }
    }
    a
}

/// Nested-model F statistic between two surrogates fitted on the same design.
///
/// The surrogate with fewer terms is taken as the reduced model. Returns
/// `None` when the designs differ, the bases have the same size, or the
/// F value is undefined (see [`f_statistic`]).
pub fn nested_f_statistic(a: &FittedSurrogate, b: &FittedSurrogate) -> Option<f64> {
    let (da, db) = (a.design(), b.design());
    if da.points != db.points || da.weights != db.weights || da.outputs != db.outputs {
        return None;
    }
    let standard: Vec<Vec<f64>> =
        da.points.iter().map(|x| a.parameters().to_standard(x)).collect();
    let y = DVector::from_iterator(
        da.len(),
        da.outputs.iter().zip(da.weights.iter()).map(|(y, w)| y * w.sqrt()),
    );
    let design_a = weighted_design(a.basis(), &standard, &da.weights);
    let design_b = weighted_design(b.basis(), &standard, &da.weights);
    let coef_a = DVector::from_column_slice(a.coefficients());
    let coef_b = DVector::from_column_slice(b.coefficients());
    f_statistic((&design_a, &coef_a), (&design_b, &coef_b), &y)
}

/// Weighted design matrix, transposed: column `i` is `sqrt(w_i) · ψ(z_i)`.
fn weighted_design_transposed(basis: &Basis, candidates: &Candidates) -> DMatrix<f64> {
    let p = basis.cardinality();
    let mut a_t = DMatrix::<f64>::zeros(p, candidates.len());
    let mut row = vec![0.0; p];
    for (i, (z, w)) in candidates
        .points
        .iter()
        .zip(candidates.weights.iter())
        .enumerate()
    {
        basis.fill_row(z, &mut row);
        let sw = w.sqrt();
        for v in &mut row {
            *v *= sw;
        }
        a_t.column_mut(i).copy_from_slice(&row);
    }
    a_t
}

/// Polynomial surrogate produced by [`Polyreg::fit`].
#[derive(Debug, Clone)]
pub struct FittedSurrogate {
    parameters: ParameterSet,
    basis: Basis,
    strategy: SamplingStrategy,
    coefficients: Vec<f64>,
    design: DesignMatrix,
    quality: FitQuality,
}

impl FittedSurrogate {
    pub fn parameters(&self) -> &ParameterSet {
        &self.parameters
    }

    pub fn basis(&self) -> &Basis {
        &self.basis
    }

    pub fn strategy(&self) -> SamplingStrategy {
        self.strategy
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn design(&self) -> &DesignMatrix {
        &self.design
    }

    pub fn quality(&self) -> &FitQuality {
        &self.quality
    }

    /// Evaluate the surrogate at a physical point.
    pub fn predict(&self, x: &[f64]) -> Result<f64, AppError> {
        if x.len() != self.parameters.len() {
            return Err(AppError::domain(format!(
                "Surrogate expects {} inputs, got {}.",
                self.parameters.len(),
                x.len()
            )));
        }
        let z = self.parameters.to_standard(x);
        let row = self.basis.evaluate(&z);
        Ok(row
            .iter()
            .zip(self.coefficients.iter())
            .map(|(psi, c)| psi * c)
            .sum())
    }

    /// Mean, variance, and standard deviation of the surrogate.
    pub fn statistics(&self) -> Statistics {
        crate::sensitivity::statistics(&self.coefficients)
    }

    /// Sobol indices of the given interaction order.
    pub fn sobol(&self, order: usize) -> Result<SobolIndices, AppError> {
        crate::sensitivity::sobol_indices(&self.basis, &self.coefficients, order)
    }

    /// Normalized total-effect index per dimension.
    pub fn total_sobol(&self) -> Vec<f64> {
        crate::sensitivity::total_sobol(&self.basis, &self.coefficients)
    }
}

/// Compare surrogate and model on `n` seeded random points.
pub fn validate_surrogate<F>(
    surrogate: &FittedSurrogate,
    mut model: F,
    n: usize,
    seed: u64,
) -> Result<Validation, AppError>
where
    F: FnMut(&[f64]) -> Result<f64, AppError>,
{
    if n == 0 {
        return Err(AppError::configuration("Validation needs at least one point."));
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let samplers: Vec<Uniform<f64>> = surrogate
        .parameters()
        .iter()
        .map(|p| Uniform::new_inclusive(p.distribution.lower(), p.distribution.upper()))
        .collect();

    let mut sse = 0.0;
    let mut max_abs_error: f64 = 0.0;
    for _ in 0..n {
        let x: Vec<f64> = samplers.iter().map(|u| rng.sample(u)).collect();
        let err = surrogate.predict(&x)? - model(&x)?;
        sse += err * err;
        max_abs_error = max_abs_error.max(err.abs());
    }

    Ok(Validation {
        n_points: n,
        rmse: (sse / n as f64).sqrt(),
        max_abs_error,
    })
}
