//! Gauss–Legendre quadrature via the Golub–Welsch algorithm.
//!
//! The nodes are the eigenvalues of the symmetric tridiagonal Jacobi matrix of
//! the Legendre recurrence (off-diagonal `β_k = k / sqrt(4k² - 1)`); the weight
//! of each node is the squared first component of its normalized eigenvector.
//!
//! Weights are returned for the uniform probability density on `[-1, 1]`, so
//! they sum to one.

use nalgebra::{DMatrix, SymmetricEigen};

use crate::error::AppError;

/// `n`-point Gauss–Legendre rule, nodes ascending.
pub fn gauss_legendre(n: usize) -> Result<(Vec<f64>, Vec<f64>), AppError> {
    if n == 0 {
        return Err(AppError::configuration("Quadrature needs at least one point."));
    }
    if n == 1 {
        return Ok((vec![0.0], vec![1.0]));
    }

    let mut jacobi = DMatrix::<f64>::zeros(n, n);
    for k in 1..n {
        let kf = k as f64;
        let beta = kf / (4.0 * kf * kf - 1.0).sqrt();
        jacobi[(k - 1, k)] = beta;
        jacobi[(k, k - 1)] = beta;
    }

    let eig = SymmetricEigen::new(jacobi);
    let mut rule: Vec<(f64, f64)> = (0..n)
        .map(|i| {
            let v0 = eig.eigenvectors[(0, i)];
            (eig.eigenvalues[i], v0 * v0)
        })
        .collect();
    rule.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    // Symmetrize to remove eigen-solver noise; the rule is exactly symmetric.
    let mut nodes: Vec<f64> = rule.iter().map(|r| r.0).collect();
    let mut weights: Vec<f64> = rule.iter().map(|r| r.1).collect();
    for i in 0..n / 2 {
        let j = n - 1 - i;
        let x = 0.5 * (nodes[j] - nodes[i]);
        nodes[i] = -x;
        nodes[j] = x;
        let w = 0.5 * (weights[i] + weights[j]);
        weights[i] = w;
        weights[j] = w;
    }
    if n % 2 == 1 {
        nodes[n / 2] = 0.0;
    }

    let total: f64 = weights.iter().sum();
    if !(total.is_finite() && total > 0.0) {
        return Err(AppError::configuration("Gauss–Legendre weights are degenerate."));
    }
    for w in &mut weights {
        *w /= total;
    }

    Ok((nodes, weights))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_point_rule_matches_closed_form() {
        let (x, w) = gauss_legendre(4).unwrap();
        let inner = (3.0 / 7.0 - 2.0 / 7.0 * (6.0f64 / 5.0).sqrt()).sqrt();
        let outer = (3.0 / 7.0 + 2.0 / 7.0 * (6.0f64 / 5.0).sqrt()).sqrt();
        assert!((x[0] + outer).abs() < 1e-12);
        assert!((x[1] + inner).abs() < 1e-12);
        assert!((x[2] - inner).abs() < 1e-12);
        assert!((x[3] - outer).abs() < 1e-12);

        let w_inner = (18.0 + 30f64.sqrt()) / 72.0;
        let w_outer = (18.0 - 30f64.sqrt()) / 72.0;
        assert!((w[0] - w_outer).abs() < 1e-12);
        assert!((w[1] - w_inner).abs() < 1e-12);
    }

    #[test]
    fn integrates_polynomials_exactly() {
        // n points are exact up to degree 2n-1. E[z^6] = 1/7 under U(-1, 1).
        let (x, w) = gauss_legendre(4).unwrap();
        let m6: f64 = x.iter().zip(w.iter()).map(|(xi, wi)| wi * xi.powi(6)).sum();
        assert!((m6 - 1.0 / 7.0).abs() < 1e-12);
        let m5: f64 = x.iter().zip(w.iter()).map(|(xi, wi)| wi * xi.powi(5)).sum();
        assert!(m5.abs() < 1e-12);
    }

    #[test]
    fn single_point_rule_is_the_midpoint() {
        let (x, w) = gauss_legendre(1).unwrap();
        assert_eq!(x, vec![0.0]);
        assert_eq!(w, vec![1.0]);
        assert!(gauss_legendre(0).is_err());
    }
}
