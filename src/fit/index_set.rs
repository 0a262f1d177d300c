//! Multivariate polynomial basis (multi-index sets).
//!
//! A basis term is a multi-index `(i_1, …, i_d)`; its value at a standard point
//! `z` is `Π_k ψ_{i_k}(z_k)` with `ψ` the orthonormal Legendre polynomials.
//!
//! Supported index rules (each degree is also capped by its parameter's order):
//!
//! - total order: `Σ i_k <= p`
//! - tensor grid: no joint constraint
//! - hyperbolic cross: `(Σ i_k^q)^(1/q) <= p`, `0 < q <= 1`
//!
//! with `p` the largest parameter order. Elements are stored constant term
//! first, then grouped by total degree, lexicographic inside a degree.

use crate::domain::{BasisKind, ParameterSet};
use crate::error::AppError;
use crate::math::legendre_orthonormal_into;

/// Slack for the hyperbolic `q`-norm comparison.
const Q_NORM_EPS: f64 = 1e-9;

/// Largest index set we are willing to enumerate.
///
/// Checked against an upper bound before enumeration, so a hyperbolic set can
/// be rejected even though its own size would fit.
pub const MAX_BASIS_TERMS: usize = 1 << 14;

#[derive(Debug, Clone, PartialEq)]
pub struct Basis {
    kind: BasisKind,
    orders: Vec<usize>,
    elements: Vec<Vec<usize>>,
}

impl Basis {
    /// Build the index set for `parameters` (one dimension per parameter).
    pub fn new(kind: BasisKind, parameters: &ParameterSet) -> Result<Self, AppError> {
        Self::from_orders(kind, &parameters.orders())
    }

    pub fn from_orders(kind: BasisKind, orders: &[usize]) -> Result<Self, AppError> {
        if orders.is_empty() {
            return Err(AppError::configuration("Basis needs at least one dimension."));
        }
        if let BasisKind::Hyperbolic { q } = kind {
            if !(q.is_finite() && q > 0.0 && q <= 1.0) {
                return Err(AppError::configuration(format!(
                    "Hyperbolic basis needs 0 < q <= 1 (got {q})."
                )));
            }
        }

        let max_order = orders.iter().copied().max().unwrap_or(0);
        let bound = cardinality_bound(kind, orders, max_order);
        if bound > MAX_BASIS_TERMS {
            return Err(AppError::configuration(format!(
                "Basis would have up to {bound} terms (limit {MAX_BASIS_TERMS}); lower the orders."
            )));
        }

        let mut elements = Vec::new();
        let mut current = vec![0usize; orders.len()];
        enumerate(kind, orders, max_order, 0, &mut current, &mut elements);
        // Stable: lexicographic order survives inside each total degree.
        elements.sort_by_key(|e| e.iter().sum::<usize>());

        Ok(Self {
            kind,
            orders: orders.to_vec(),
            elements,
        })
    }

    pub fn kind(&self) -> BasisKind {
        self.kind
    }

    pub fn dimensions(&self) -> usize {
        self.orders.len()
    }

    pub fn orders(&self) -> &[usize] {
        &self.orders
    }

    /// Number of basis terms.
    pub fn cardinality(&self) -> usize {
        self.elements.len()
    }

    pub fn elements(&self) -> &[Vec<usize>] {
        &self.elements
    }

    /// Evaluate every basis term at a standard point `z ∈ [-1, 1]^d`.
    ///
    /// # Panics
    /// Panics if `z` or `out` are shorter than `dimensions()` / `cardinality()`.
    pub fn fill_row(&self, z: &[f64], out: &mut [f64]) {
        let d = self.dimensions();
        let univariate: Vec<Vec<f64>> = (0..d)
            .map(|k| {
                let mut vals = vec![0.0; self.orders[k] + 1];
                legendre_orthonormal_into(z[k], &mut vals);
                vals
            })
            .collect();

        for (slot, element) in out.iter_mut().zip(self.elements.iter()) {
            *slot = element
                .iter()
                .enumerate()
                .map(|(k, &deg)| univariate[k][deg])
                .product();
        }
    }

    pub fn evaluate(&self, z: &[f64]) -> Vec<f64> {
        let mut out = vec![0.0; self.cardinality()];
        self.fill_row(z, &mut out);
        out
    }
}

/// Upper bound on the number of admitted multi-indices; saturates at `usize::MAX`.
fn cardinality_bound(kind: BasisKind, orders: &[usize], max_order: usize) -> usize {
    let tensor = orders
        .iter()
        .try_fold(1usize, |acc, &o| acc.checked_mul(o.checked_add(1)?))
        .unwrap_or(usize::MAX);
    match kind {
        BasisKind::TensorGrid => tensor,
        BasisKind::TotalOrder | BasisKind::Hyperbolic { .. } => {
            tensor.min(total_order_cardinality(max_order, orders.len()))
        }
    }
}

fn admits(kind: BasisKind, partial: &[usize], max_order: usize) -> bool {
    match kind {
        BasisKind::TensorGrid => true,
        BasisKind::TotalOrder => partial.iter().sum::<usize>() <= max_order,
        BasisKind::Hyperbolic { q } => {
            let norm: f64 = partial.iter().map(|&i| (i as f64).powf(q)).sum();
            norm <= (max_order as f64).powf(q) + Q_NORM_EPS
        }
    }
}

fn enumerate(
    kind: BasisKind,
    orders: &[usize],
    max_order: usize,
    dim: usize,
    current: &mut Vec<usize>,
    out: &mut Vec<Vec<usize>>,
) {
    if dim == orders.len() {
        out.push(current.clone());
        return;
    }
    for deg in 0..=orders[dim] {
        current[dim] = deg;
        // Every rule is monotone in each degree, so the first rejection ends the loop.
        if !admits(kind, &current[..=dim], max_order) {
            break;
        }
        enumerate(kind, orders, max_order, dim + 1, current, out);
    }
    current[dim] = 0;
}

/// Number of total-order multi-indices in `dims` dimensions: `C(order + dims, dims)`.
///
/// Saturates at `usize::MAX`.
pub fn total_order_cardinality(order: usize, dims: usize) -> usize {
    let k = order.min(dims) as u128;
    let n = order as u128 + dims as u128;
    let mut acc: u128 = 1;
    for i in 0..k {
        // acc = C(n, i), so the division is exact.
        acc = match acc.checked_mul(n - i) {
            Some(v) => v / (i + 1),
            None => return usize::MAX,
        };
    }
    usize::try_from(acc).unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn piston_total_order_has_120_terms() {
        let basis = Basis::from_orders(BasisKind::TotalOrder, &[3; 7]).unwrap();
        assert_eq!(basis.cardinality(), 120);
        assert_eq!(total_order_cardinality(3, 7), 120);
    }

    #[test]
    fn oversized_bases_are_rejected_before_enumeration() {
        use crate::error::ErrorKind;

        let err = Basis::from_orders(BasisKind::TotalOrder, &[100; 7]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        let err = Basis::from_orders(BasisKind::TensorGrid, &[4; 7]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        let err = Basis::from_orders(BasisKind::TotalOrder, &[usize::MAX; 3]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);

        // Order 6 over 7 inputs is still a modest basis.
        let ok = Basis::from_orders(BasisKind::TotalOrder, &[6; 7]).unwrap();
        assert_eq!(ok.cardinality(), 1716);
    }

    #[test]
    fn cardinality_saturates_instead_of_overflowing() {
        assert_eq!(total_order_cardinality(usize::MAX, 7), usize::MAX);
        assert_eq!(total_order_cardinality(0, 7), 1);
        assert_eq!(total_order_cardinality(100, 7), 26_075_972_546);
    }

    #[test]
    fn constant_term_comes_first_then_by_degree() {
        let basis = Basis::from_orders(BasisKind::TotalOrder, &[2, 2]).unwrap();
        let e = basis.elements();
        assert_eq!(e[0], vec![0, 0]);
        assert_eq!(e[1], vec![0, 1]);
        assert_eq!(e[2], vec![1, 0]);
        let degrees: Vec<usize> = e.iter().map(|m| m.iter().sum()).collect();
        assert!(degrees.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(basis.cardinality(), 6);
    }

    #[test]
    fn tensor_grid_is_the_full_product() {
        let basis = Basis::from_orders(BasisKind::TensorGrid, &[3, 1, 2]).unwrap();
        assert_eq!(basis.cardinality(), 4 * 2 * 3);
    }

    #[test]
    fn hyperbolic_is_between_axes_and_total_order() {
        let total = Basis::from_orders(BasisKind::TotalOrder, &[4; 3]).unwrap();
        let hyper = Basis::from_orders(BasisKind::Hyperbolic { q: 0.5 }, &[4; 3]).unwrap();
        assert!(hyper.cardinality() < total.cardinality());
        // All pure (single-dimension) terms are always kept.
        for k in 0..3 {
            let mut pure = vec![0; 3];
            pure[k] = 4;
            assert!(hyper.elements().contains(&pure));
        }
        // q = 1 is total order.
        let q1 = Basis::from_orders(BasisKind::Hyperbolic { q: 1.0 }, &[4; 3]).unwrap();
        assert_eq!(q1.cardinality(), total.cardinality());
    }

    #[test]
    fn invalid_hyperbolic_q_is_rejected() {
        assert!(Basis::from_orders(BasisKind::Hyperbolic { q: 0.0 }, &[2, 2]).is_err());
        assert!(Basis::from_orders(BasisKind::Hyperbolic { q: 1.5 }, &[2, 2]).is_err());
        assert!(Basis::from_orders(BasisKind::TotalOrder, &[]).is_err());
    }

    #[test]
    fn per_dimension_orders_cap_total_order() {
        let basis = Basis::from_orders(BasisKind::TotalOrder, &[3, 1]).unwrap();
        assert!(basis.elements().iter().all(|e| e[1] <= 1));
        // (0,0) (0,1) (1,0) (1,1) (2,0) (2,1) (3,0)
        assert_eq!(basis.cardinality(), 7);
    }

    #[test]
    fn row_evaluation_is_a_product_of_univariates() {
        let basis = Basis::from_orders(BasisKind::TotalOrder, &[2, 2]).unwrap();
        let z = [0.2, -0.7];
        let row = basis.evaluate(&z);
        assert!((row[0] - 1.0).abs() < 1e-14);
        // (1, 1) term.
        let idx = basis.elements().iter().position(|e| e == &vec![1, 1]).unwrap();
        let expected = 3f64.sqrt() * 0.2 * 3f64.sqrt() * -0.7;
        assert!((row[idx] - expected).abs() < 1e-12);
    }
}
