//! Candidate design points.
//!
//! Points are produced in standard coordinates (`[-1, 1]^d`) together with
//! probability weights that sum to one:
//!
//! - tensor grid: the product of per-dimension Gauss–Legendre rules with
//!   `order + 1` nodes, enumerated with the last dimension varying fastest
//! - random: independent uniform draws from a seeded `StdRng`, equal weights
//!
//! Both are deterministic given their inputs.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Uniform;

use crate::domain::ParameterSet;
use crate::error::AppError;
use crate::math::gauss_legendre;

/// Upper bound on the number of design or candidate points.
pub const MAX_DESIGN_POINTS: usize = 1 << 20;

/// Upper bound on `points × basis terms` for any dense matrix we build
/// (the QR candidate matrix and the least-squares system).
pub const MAX_DESIGN_ENTRIES: usize = 1 << 25;

/// Reject a dense `rows × terms` matrix before allocating it.
pub fn check_dense_size(rows: usize, terms: usize, what: &str) -> Result<(), AppError> {
    match rows.checked_mul(terms) {
        Some(entries) if entries <= MAX_DESIGN_ENTRIES => Ok(()),
        _ => Err(AppError::configuration(format!(
            "{what} would need {rows} x {terms} entries (limit {MAX_DESIGN_ENTRIES}); \
             lower the orders or the oversampling factor."
        ))),
    }
}

/// Points (standard coordinates) and their weights.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidates {
    pub points: Vec<Vec<f64>>,
    pub weights: Vec<f64>,
}

impl Candidates {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Keep the given rows, renormalizing their weights.
    pub fn subset(&self, rows: &[usize]) -> Candidates {
        let points: Vec<Vec<f64>> = rows.iter().map(|&i| self.points[i].clone()).collect();
        let raw: Vec<f64> = rows.iter().map(|&i| self.weights[i]).collect();
        let total: f64 = raw.iter().sum();
        let weights = if total > 0.0 {
            raw.iter().map(|w| w / total).collect()
        } else {
            vec![1.0 / rows.len().max(1) as f64; rows.len()]
        };
        Candidates { points, weights }
    }
}

/// Number of points in the Gauss–Legendre tensor grid for `parameters`.
pub fn tensor_grid_size(parameters: &ParameterSet) -> Option<usize> {
    parameters
        .iter()
        .try_fold(1usize, |acc, p| acc.checked_mul(p.order.checked_add(1)?))
}

/// Full Gauss–Legendre tensor grid.
pub fn tensor_grid(parameters: &ParameterSet) -> Result<Candidates, AppError> {
    let size = tensor_grid_size(parameters)
        .filter(|&n| n <= MAX_DESIGN_POINTS)
        .ok_or_else(|| {
            AppError::configuration(format!(
                "Tensor grid would exceed {MAX_DESIGN_POINTS} points; lower the orders."
            ))
        })?;

    let rules = parameters
        .iter()
        .map(|p| gauss_legendre(p.order + 1))
        .collect::<Result<Vec<_>, _>>()?;

    let d = rules.len();
    let mut points = Vec::with_capacity(size);
    let mut weights = Vec::with_capacity(size);
    let mut idx = vec![0usize; d];

    for _ in 0..size {
        points.push((0..d).map(|k| rules[k].0[idx[k]]).collect());
        weights.push((0..d).map(|k| rules[k].1[idx[k]]).product());

        // Odometer increment, last dimension fastest.
        for k in (0..d).rev() {
            idx[k] += 1;
            if idx[k] < rules[k].0.len() {
                break;
            }
            idx[k] = 0;
        }
    }

    Ok(Candidates { points, weights })
}

/// `n` independent uniform points, reproducible from `seed`.
pub fn random_points(dims: usize, n: usize, seed: u64) -> Result<Candidates, AppError> {
    if n == 0 {
        return Err(AppError::configuration("Random design needs at least one point."));
    }
    if n > MAX_DESIGN_POINTS {
        return Err(AppError::configuration(format!(
            "Random design of {n} points exceeds the limit of {MAX_DESIGN_POINTS}."
        )));
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let unit = Uniform::new_inclusive(-1.0, 1.0);

    let points = (0..n)
        .map(|_| (0..dims).map(|_| rng.sample(unit)).collect())
        .collect();

    Ok(Candidates {
        points,
        weights: vec![1.0 / n as f64; n],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PISTON_ORDER, piston_parameters};

    #[test]
    fn piston_tensor_grid_has_4_pow_7_points() {
        let params = piston_parameters(PISTON_ORDER).unwrap();
        assert_eq!(tensor_grid_size(&params), Some(16384));
        let grid = tensor_grid(&params).unwrap();
        assert_eq!(grid.len(), 16384);
        let total: f64 = grid.weights.iter().sum();
        assert!((total - 1.0).abs() < 1e-12);
        assert!(grid.points.iter().flatten().all(|z| z.abs() < 1.0));
    }

    #[test]
    fn tensor_grid_varies_last_dimension_fastest() {
        let params = piston_parameters(1).unwrap();
        let grid = tensor_grid(&params).unwrap();
        assert_eq!(grid.points[0][..6], grid.points[1][..6]);
        assert_ne!(grid.points[0][6], grid.points[1][6]);
    }

    #[test]
    fn oversized_grid_is_a_configuration_error() {
        let params = piston_parameters(19).unwrap();
        let err = tensor_grid(&params).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Configuration);
    }

    #[test]
    fn random_points_are_seeded() {
        let a = random_points(7, 50, 11).unwrap();
        let b = random_points(7, 50, 11).unwrap();
        let c = random_points(7, 50, 12).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.points.iter().flatten().all(|z| (-1.0..=1.0).contains(z)));
    }

    #[test]
    fn random_design_size_is_capped() {
        let err = random_points(7, usize::MAX, 1).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Configuration);
        assert!(random_points(7, MAX_DESIGN_POINTS + 1, 1).is_err());
    }

    #[test]
    fn dense_size_check_rejects_large_and_overflowing_products() {
        assert!(check_dense_size(16384, 120, "QR candidate matrix").is_ok());
        let err = check_dense_size(823_543, 1716, "QR candidate matrix").unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Configuration);
        assert!(err.message().contains("QR candidate matrix"));
        assert!(check_dense_size(usize::MAX, 2, "least-squares system").is_err());
    }

    #[test]
    fn subset_renormalizes_weights() {
        let params = piston_parameters(1).unwrap();
        let grid = tensor_grid(&params).unwrap();
        let sub = grid.subset(&[0, 5, 9]);
        assert_eq!(sub.len(), 3);
        assert!((sub.weights.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert_eq!(sub.points[1], grid.points[5]);
    }
}
