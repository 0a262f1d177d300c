//! Moments and Sobol indices of an orthonormal polynomial expansion.
//!
//! For `f ≈ Σ_j c_j Ψ_j` with an orthonormal basis and `Ψ_0 = 1`:
//!
//! - mean `= c_0`
//! - variance `= Σ_{j≥1} c_j²`
//! - the variance share of an input subset `u` is the sum of `c_j²` over terms
//!   whose non-zero degrees sit exactly on `u`
//!
//! so every index falls out of the coefficients without further sampling.

use std::collections::BTreeMap;

use crate::domain::{SobolIndices, Statistics};
use crate::error::AppError;
use crate::fit::Basis;

/// Mean, variance, and standard deviation from expansion coefficients.
pub fn statistics(coefficients: &[f64]) -> Statistics {
    let mean = coefficients.first().copied().unwrap_or(0.0);
    // `fold` from +0.0: an empty `sum` of floats is -0.0.
    let variance = coefficients.iter().skip(1).fold(0.0, |acc, c| acc + c * c);
    Statistics {
        mean,
        variance,
        std_dev: variance.sqrt(),
    }
}

/// Sobol contributions of every `order`-subset of dimensions.
///
/// All `C(d, order)` subsets are present in the result, zero when no basis term
/// touches them.
pub fn sobol_indices(
    basis: &Basis,
    coefficients: &[f64],
    order: usize,
) -> Result<SobolIndices, AppError> {
    let d = basis.dimensions();
    if order == 0 || order > d {
        return Err(AppError::configuration(format!(
            "Sobol order must be between 1 and {d} (got {order})."
        )));
    }
    if coefficients.len() != basis.cardinality() {
        return Err(AppError::configuration(format!(
            "{} coefficients for a basis of {} terms.",
            coefficients.len(),
            basis.cardinality()
        )));
    }

    let mut raw: BTreeMap<Vec<usize>, f64> =
        combinations(d, order).into_iter().map(|c| (c, 0.0)).collect();

    for (element, c) in basis.elements().iter().zip(coefficients.iter()) {
        let active: Vec<usize> = element
            .iter()
            .enumerate()
            .filter(|(_, deg)| **deg > 0)
            .map(|(k, _)| k)
            .collect();
        if active.len() == order {
            if let Some(slot) = raw.get_mut(&active) {
                *slot += c * c;
            }
        }
    }

    Ok(SobolIndices {
        order,
        variance: statistics(coefficients).variance,
        raw,
    })
}

/// Normalized total-effect index per dimension.
///
/// Interactions count towards every dimension they involve, so these can sum
/// to more than one.
pub fn total_sobol(basis: &Basis, coefficients: &[f64]) -> Vec<f64> {
    let d = basis.dimensions();
    let variance = statistics(coefficients).variance;
    let mut totals = vec![0.0; d];
    for (element, c) in basis.elements().iter().zip(coefficients.iter()) {
        for (k, &deg) in element.iter().enumerate() {
            if deg > 0 {
                totals[k] += c * c;
            }
        }
    }
    if variance > 0.0 {
        for t in &mut totals {
            *t /= variance;
        }
    }
    totals
}

/// All `k`-subsets of `0..n`, lexicographic.
pub fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    if k > n {
        return out;
    }
    let mut current: Vec<usize> = (0..k).collect();
    loop {
        out.push(current.clone());
        // Rightmost position that can still advance.
        let Some(i) = (0..k).rev().find(|&i| current[i] < n - k + i) else {
            break;
        };
        current[i] += 1;
        for j in i + 1..k {
            current[j] = current[j - 1] + 1;
        }
    }
    out
}
