//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting
//! - loaded from a parameter JSON file
//! - exported to JSON/CSV after a run

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Probability distribution of a single input.
///
/// Only bounded uniform inputs are supported; the matching orthonormal family is
/// Legendre on `[-1, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Distribution {
    Uniform { lower: f64, upper: f64 },
}

impl Distribution {
    pub fn lower(&self) -> f64 {
        match *self {
            Distribution::Uniform { lower, .. } => lower,
        }
    }

    pub fn upper(&self) -> f64 {
        match *self {
            Distribution::Uniform { upper, .. } => upper,
        }
    }

    /// Map a physical value onto the standard interval `[-1, 1]`.
    pub fn to_standard(&self, x: f64) -> f64 {
        let (a, b) = (self.lower(), self.upper());
        2.0 * (x - a) / (b - a) - 1.0
    }

    /// Map a point of `[-1, 1]` back to physical coordinates.
    pub fn from_standard(&self, z: f64) -> f64 {
        let (a, b) = (self.lower(), self.upper());
        a + 0.5 * (z + 1.0) * (b - a)
    }

    fn validate(&self, name: &str) -> Result<(), AppError> {
        let (a, b) = (self.lower(), self.upper());
        if !(a.is_finite() && b.is_finite()) {
            return Err(AppError::configuration(format!(
                "Parameter '{name}': bounds must be finite (got [{a}, {b}])."
            )));
        }
        if a >= b {
            return Err(AppError::configuration(format!(
                "Parameter '{name}': lower bound {a} must be < upper bound {b}."
            )));
        }
        Ok(())
    }
}

/// One uncertain model input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub distribution: Distribution,
    /// Maximum polynomial degree in this dimension.
    pub order: usize,
}

impl Parameter {
    /// Uniform parameter on `[lower, upper]`.
    pub fn uniform(
        name: impl Into<String>,
        lower: f64,
        upper: f64,
        order: usize,
    ) -> Result<Self, AppError> {
        let p = Self {
            name: name.into(),
            distribution: Distribution::Uniform { lower, upper },
            order,
        };
        p.distribution.validate(&p.name)?;
        Ok(p)
    }
}

/// Ordered list of parameters, matching the model's argument order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ParameterSet {
    params: Vec<Parameter>,
}

impl ParameterSet {
    pub fn new(params: Vec<Parameter>) -> Result<Self, AppError> {
        if params.is_empty() {
            return Err(AppError::configuration("Parameter set is empty."));
        }
        for p in &params {
            p.distribution.validate(&p.name)?;
        }
        Ok(Self { params })
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Parameter> {
        self.params.iter()
    }

    pub fn get(&self, i: usize) -> Option<&Parameter> {
        self.params.get(i)
    }

    pub fn orders(&self) -> Vec<usize> {
        self.params.iter().map(|p| p.order).collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.params.iter().map(|p| p.name.as_str()).collect()
    }

    /// Replace every parameter's order.
    pub fn with_order(&self, order: usize) -> Self {
        let params = self
            .params
            .iter()
            .map(|p| Parameter { order, ..p.clone() })
            .collect();
        Self { params }
    }

    /// Map a physical point onto `[-1, 1]^d`.
    pub fn to_standard(&self, x: &[f64]) -> Vec<f64> {
        self.params
            .iter()
            .zip(x.iter())
            .map(|(p, &v)| p.distribution.to_standard(v))
            .collect()
    }

    /// Map a standard point back to physical coordinates.
    pub fn from_standard(&self, z: &[f64]) -> Vec<f64> {
        self.params
            .iter()
            .zip(z.iter())
            .map(|(p, &v)| p.distribution.from_standard(v))
            .collect()
    }
}

impl<'a> IntoIterator for &'a ParameterSet {
    type Item = &'a Parameter;
    type IntoIter = std::slice::Iter<'a, Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.iter()
    }
}

/// Which multi-index set to use (CLI selector).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BasisSpec {
    /// Sum of degrees bounded by the maximum order.
    Total,
    /// Every degree bounded by its own parameter order.
    Tensor,
    /// Hyperbolic cross, controlled by `--q`.
    Hyperbolic,
}

/// Concrete multi-index rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BasisKind {
    TotalOrder,
    TensorGrid,
    /// Keep indices with `(Σ i_k^q)^(1/q) <= p`, `0 < q <= 1`.
    Hyperbolic { q: f64 },
}

impl BasisKind {
    pub fn display_name(self) -> &'static str {
        match self {
            BasisKind::TotalOrder => "total order",
            BasisKind::TensorGrid => "tensor grid",
            BasisKind::Hyperbolic { .. } => "hyperbolic",
        }
    }
}

/// Design selection strategy (CLI selector).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StrategySpec {
    /// Greedy QR subsampling of the Gauss–Legendre tensor grid.
    Qr,
    /// Seeded random draws from the parameter distributions.
    Random,
    /// The full Gauss–Legendre tensor grid.
    Tensor,
}

/// Concrete design selection strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SamplingStrategy {
    QrSubsample,
    Random { seed: u64 },
    TensorGrid,
    /// Points and outputs given by the caller (`Polyreg::fit_data`).
    Supplied,
}

impl SamplingStrategy {
    pub fn from_spec(spec: StrategySpec, seed: u64) -> Self {
        match spec {
            StrategySpec::Qr => SamplingStrategy::QrSubsample,
            StrategySpec::Random => SamplingStrategy::Random { seed },
            StrategySpec::Tensor => SamplingStrategy::TensorGrid,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            SamplingStrategy::QrSubsample => "QR subsampling",
            SamplingStrategy::Random { .. } => "random",
            SamplingStrategy::TensorGrid => "tensor grid",
            SamplingStrategy::Supplied => "supplied data",
        }
    }
}

/// Points at which the model was evaluated, with their quadrature weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignMatrix {
    /// Physical coordinates, one row per point.
    pub points: Vec<Vec<f64>>,
    /// Row weights (sum to one).
    pub weights: Vec<f64>,
    /// Model outputs at `points`.
    pub outputs: Vec<f64>,
}

impl DesignMatrix {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Fit quality diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitQuality {
    pub n_points: usize,
    pub n_terms: usize,
    /// Condition number of the weighted design matrix.
    pub condition_number: f64,
    /// Weighted residual sum of squares.
    pub rss: f64,
    /// Coefficient of determination on the design points.
    pub r_squared: f64,
    /// Per-coefficient t statistics; `None` for an exactly determined system.
    /// A coefficient with zero standard error has no finite statistic.
    pub t_stats: Option<Vec<Option<f64>>>,
}

/// Moments of the surrogate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub mean: f64,
    pub variance: f64,
    pub std_dev: f64,
}

/// Hold-out comparison between surrogate and model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Validation {
    pub n_points: usize,
    pub rmse: f64,
    pub max_abs_error: f64,
}

/// Sobol contributions of a single interaction order.
///
/// Keys are sorted dimension subsets of size `order`; values are raw
/// (unnormalized) variance contributions.
#[derive(Debug, Clone, PartialEq)]
pub struct SobolIndices {
    pub order: usize,
    pub variance: f64,
    pub raw: BTreeMap<Vec<usize>, f64>,
}

impl SobolIndices {
    /// Raw variance contribution of a subset (zero if absent).
    pub fn raw_of(&self, dims: &[usize]) -> f64 {
        self.raw.get(dims).copied().unwrap_or(0.0)
    }

    /// Contribution normalized by total variance.
    ///
    /// A constant surrogate has no variance to attribute; every index is zero.
    pub fn normalized_of(&self, dims: &[usize]) -> f64 {
        if self.variance > 0.0 {
            self.raw_of(dims) / self.variance
        } else {
            0.0
        }
    }

    pub fn normalized(&self) -> BTreeMap<Vec<usize>, f64> {
        self.raw
            .keys()
            .map(|k| (k.clone(), self.normalized_of(k)))
            .collect()
    }

    /// For first-order indices: raw contribution per dimension, in order.
    pub fn per_dimension_raw(&self) -> Vec<f64> {
        self.raw
            .iter()
            .filter(|(k, _)| k.len() == 1)
            .map(|(_, &v)| v)
            .collect()
    }

    pub fn per_dimension_normalized(&self) -> Vec<f64> {
        self.raw
            .iter()
            .filter(|(k, _)| k.len() == 1)
            .map(|(k, _)| self.normalized_of(k))
            .collect()
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Optional JSON file overriding the default piston parameters.
    pub params_path: Option<PathBuf>,
    /// Overrides every parameter's polynomial order when set.
    pub order: Option<usize>,
    pub basis: BasisKind,
    pub strategy: SamplingStrategy,
    pub oversampling: f64,
    pub sobol_order: usize,
    /// Number of random hold-out points (0 disables validation).
    pub validate_points: usize,
    pub validate_seed: u64,

    pub plot: bool,
    pub plot_width: usize,

    pub export_json: Option<PathBuf>,
    pub export_csv: Option<PathBuf>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            params_path: None,
            order: None,
            basis: BasisKind::TotalOrder,
            strategy: SamplingStrategy::QrSubsample,
            oversampling: 1.0,
            sobol_order: 1,
            validate_points: 0,
            validate_seed: 7,
            plot: false,
            plot_width: 50,
            export_json: None,
            export_csv: None,
        }
    }
}

/// One row of an exported Sobol table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SobolEntry {
    pub dims: Vec<usize>,
    pub names: Vec<String>,
    pub raw: f64,
    pub normalized: f64,
}

/// A saved surrogate file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurrogateFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub parameters: Vec<Parameter>,
    pub basis: BasisKind,
    pub strategy: SamplingStrategy,
    pub multi_indices: Vec<Vec<usize>>,
    pub coefficients: Vec<f64>,
    pub statistics: Statistics,
    pub quality: FitQuality,
    pub first_order: Vec<SobolEntry>,
    pub total_order: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_rejects_inverted_bounds() {
        let err = Parameter::uniform("M", 60.0, 30.0, 3).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Configuration);
        assert!(Parameter::uniform("M", 30.0, 30.0, 3).is_err());
        assert!(Parameter::uniform("M", f64::NAN, 30.0, 3).is_err());
    }

    #[test]
    fn standard_mapping_round_trips_endpoints() {
        let p = Parameter::uniform("k", 1000.0, 5000.0, 3).unwrap();
        assert!((p.distribution.to_standard(1000.0) + 1.0).abs() < 1e-12);
        assert!((p.distribution.to_standard(5000.0) - 1.0).abs() < 1e-12);
        assert!((p.distribution.from_standard(0.0) - 3000.0).abs() < 1e-9);
    }

    #[test]
    fn empty_parameter_set_is_rejected() {
        assert!(ParameterSet::new(Vec::new()).is_err());
    }

    #[test]
    fn normalized_sobol_handles_zero_variance() {
        let mut raw = BTreeMap::new();
        raw.insert(vec![0], 0.0);
        let s = SobolIndices {
            order: 1,
            variance: 0.0,
            raw,
        };
        assert_eq!(s.normalized_of(&[0]), 0.0);
    }
}
