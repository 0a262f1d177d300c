//! Greedy row selection (QR subsampling).
//!
//! Given the weighted design matrix of a large candidate set, pick a small set
//! of well-conditioned rows. This is column-pivoted QR applied to `Aᵀ`,
//! written as pivoted Gram–Schmidt:
//!
//! 1. pivot on the candidate with the largest residual norm
//! 2. orthonormalize it against the rows already picked
//! 3. deflate every remaining candidate's residual norm by its projection
//!
//! Once the column space is exhausted (as many picks as basis terms, or all
//! residuals numerically zero), further picks fall back to the largest original
//! row norm. Ties always go to the lowest candidate index, so the selection is
//! deterministic.

use nalgebra::{DMatrix, DVector};

/// Residual norms below this fraction of the largest row norm count as exhausted.
const DEFLATION_RTOL: f64 = 1e-20;

/// Select `count` candidate rows.
///
/// `a_t` is the transposed design matrix: one **column** per candidate
/// (`cardinality × candidates`), so that each candidate is contiguous.
pub fn select_rows_qr(a_t: &DMatrix<f64>, count: usize) -> Vec<usize> {
    let (m, n) = a_t.shape();
    let count = count.min(n);

    let original: Vec<f64> = (0..n).map(|i| a_t.column(i).norm_squared()).collect();
    let mut residual = original.clone();
    let floor = DEFLATION_RTOL * original.iter().copied().fold(0.0, f64::max);

    let mut used = vec![false; n];
    let mut basis: Vec<DVector<f64>> = Vec::with_capacity(m.min(count));
    let mut selected = Vec::with_capacity(count);

    while selected.len() < count {
        let deflating = basis.len() < m;
        let pivot = if deflating {
            argmax_unused(&residual, &used).filter(|&i| residual[i] > floor)
        } else {
            None
        };
        let (pivot, orthogonalize) = match pivot {
            Some(i) => (i, true),
            None => match argmax_unused(&original, &used) {
                Some(i) => (i, false),
                None => break,
            },
        };

        used[pivot] = true;
        selected.push(pivot);
        if !orthogonalize {
            continue;
        }

        let mut v = a_t.column(pivot).clone_owned();
        for q in &basis {
            let d = q.dot(&v);
            v -= q * d;
        }
        let norm = v.norm();
        if !(norm > 0.0 && norm.is_finite()) {
            continue;
        }
        v /= norm;

        for i in 0..n {
            if !used[i] {
                let d = v.dot(&a_t.column(i));
                residual[i] -= d * d;
            }
        }
        basis.push(v);
    }

    selected
}

fn argmax_unused(values: &[f64], used: &[bool]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, &v) in values.iter().enumerate() {
        if used[i] {
            continue;
        }
        match best {
            Some(b) if v <= values[b] => {}
            _ => best = Some(i),
        }
    }
    best
}
