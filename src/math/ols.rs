//! Weighted least squares solver.
//!
//! The coefficient fit is a linear regression of the form:
//!
//! ```text
//! minimize Σ w_i (y_i - a_i^T c)^2
//! ```
//!
//! where `a_i` holds the basis polynomials evaluated at design point `i`.
//!
//! Implementation choices:
//! - Callers scale rows by `sqrt(w_i)`; this module only sees the ordinary
//!   problem `A c ≈ b`.
//! - We use SVD so tall and square systems go through the same path, and so the
//!   numerical rank and condition number fall out for free.
//! - A rank-deficient system is an error, never a minimum-norm guess.

use nalgebra::{DMatrix, DVector};

use crate::error::AppError;

/// Singular values below `RANK_RTOL * σ_max` count as zero.
const RANK_RTOL: f64 = 1e-10;

/// Least-squares solution plus the diagnostics derived from the SVD.
#[derive(Debug, Clone)]
pub struct LeastSquares {
    pub coefficients: DVector<f64>,
    /// `σ_max / σ_min`.
    pub condition_number: f64,
    pub rank: usize,
}

/// Solve `A c ≈ b` using SVD.
///
/// Fails with an underdetermined-system error if `A` has fewer rows than
/// columns or is numerically rank deficient.
pub fn solve_least_squares(a: &DMatrix<f64>, b: &DVector<f64>) -> Result<LeastSquares, AppError> {
    let (rows, cols) = a.shape();
    if cols == 0 {
        return Err(AppError::configuration("Least squares with an empty basis."));
    }
    if rows != b.len() {
        return Err(AppError::configuration(format!(
            "Design matrix has {rows} rows but {} observations.",
            b.len()
        )));
    }
    if rows < cols {
        return Err(AppError::underdetermined(format!(
            "{rows} design points cannot determine {cols} coefficients."
        )));
    }
    if a.iter().chain(b.iter()).any(|v| !v.is_finite()) {
        return Err(AppError::domain("Non-finite entry in least-squares system."));
    }

    let svd = a.clone().svd(true, true);
    let sigma_max = svd.singular_values.max();
    let sigma_min = svd.singular_values.min();
    let tol = RANK_RTOL * sigma_max;
    let rank = svd.rank(tol);
    if sigma_max <= 0.0 || rank < cols {
        return Err(AppError::underdetermined(format!(
            "Design matrix is rank deficient (rank {rank} < {cols} coefficients)."
        )));
    }

    let coefficients = svd
        .solve(b, tol)
        .map_err(|e| AppError::underdetermined(format!("Least-squares solve failed: {e}")))?;
    if coefficients.iter().any(|v| !v.is_finite()) {
        return Err(AppError::underdetermined(
            "Least-squares solve produced non-finite coefficients.",
        ));
    }

    Ok(LeastSquares {
        coefficients,
        condition_number: sigma_max / sigma_min,
        rank,
    })
}

/// Residual sum of squares `‖A c - b‖²`.
pub fn residual_sum_of_squares(a: &DMatrix<f64>, c: &DVector<f64>, b: &DVector<f64>) -> f64 {
    (a * c - b).norm_squared()
}

/// Coefficient of determination `1 - RSS / TSS`.
///
/// A constant response has no spread to explain; an exact fit of it scores 1.
pub fn r_squared(a: &DMatrix<f64>, c: &DVector<f64>, b: &DVector<f64>) -> f64 {
    let n = b.len().max(1) as f64;
    let mean = b.sum() / n;
    let tss: f64 = b.iter().map(|v| (v - mean) * (v - mean)).sum();
    let rss = residual_sum_of_squares(a, c, b);
    if tss <= f64::EPSILON * n {
        return if rss <= f64::EPSILON * n { 1.0 } else { 0.0 };
    }
    1.0 - rss / tss
}

/// Per-coefficient t statistics `c_j / se_j`.
///
/// Returns `None` when the system is square (no residual degrees of freedom)
/// or `AᵀA` cannot be inverted. A coefficient whose standard error is zero
/// (exact fit) gets `None` rather than an infinite statistic.
pub fn t_statistics(
    a: &DMatrix<f64>,
    c: &DVector<f64>,
    b: &DVector<f64>,
) -> Option<Vec<Option<f64>>> {
    let (n, p) = a.shape();
    if n <= p {
        return None;
    }
    let rse = residual_sum_of_squares(a, c, b) / (n - p) as f64;
    let inv = (a.transpose() * a).try_inverse()?;
    let t = (0..p)
        .map(|j| {
            let se = (rse * inv[(j, j)]).sqrt();
            let t = c[j] / se;
            (se > 0.0 && t.is_finite()).then_some(t)
        })
        .collect();
    Some(t)
}

/// F statistic comparing a reduced model against a fuller one on the same rows.
///
/// ```text
/// F = (RSS_0 - RSS_1) (n - p_1) / (RSS_1 (p_1 - p_0))
/// ```
///
/// Either argument may be the reduced model; the one with fewer columns is.
/// Returns `None` when both have the same number of columns, the row counts
/// disagree, the full model leaves no residual degrees of freedom, or it fits
/// exactly (`RSS_1 = 0`).
pub fn f_statistic(
    first: (&DMatrix<f64>, &DVector<f64>),
    second: (&DMatrix<f64>, &DVector<f64>),
    b: &DVector<f64>,
) -> Option<f64> {
    let (reduced, full) = match first.0.ncols().cmp(&second.0.ncols()) {
        std::cmp::Ordering::Less => (first, second),
        std::cmp::Ordering::Greater => (second, first),
        std::cmp::Ordering::Equal => return None,
    };
    let n = b.len();
    if reduced.0.nrows() != n || full.0.nrows() != n {
        return None;
    }
    let (p0, p1) = (reduced.0.ncols(), full.0.ncols());
    if n <= p1 {
        return None;
    }

    let rss0 = residual_sum_of_squares(reduced.0, reduced.1, b);
    let rss1 = residual_sum_of_squares(full.0, full.1, b);
    if !(rss1 > 0.0) {
        return None;
    }
    let f = (rss0 - rss1) * (n - p1) as f64 / (rss1 * (p1 - p0) as f64);
    f.is_finite().then_some(f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let ls = solve_least_squares(&x, &y).unwrap();
        assert!((ls.coefficients[0] - 2.0).abs() < 1e-10);
        assert!((ls.coefficients[1] - 3.0).abs() < 1e-10);
        assert_eq!(ls.rank, 2);
        assert!(ls.condition_number >= 1.0);
        assert!((r_squared(&x, &ls.coefficients, &y) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn wide_system_is_underdetermined() {
        let x = DMatrix::from_row_slice(1, 2, &[1.0, 2.0]);
        let y = DVector::from_row_slice(&[1.0]);
        let err = solve_least_squares(&x, &y).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnderdeterminedSystem);
    }

    #[test]
    fn collinear_columns_are_rank_deficient() {
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 2.0, 2.0, 4.0, 3.0, 6.0]);
        let y = DVector::from_row_slice(&[1.0, 2.0, 3.0]);
        let err = solve_least_squares(&x, &y).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnderdeterminedSystem);
    }

    #[test]
    fn t_statistics_need_residual_degrees_of_freedom() {
        let x = DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 1.0, 1.0]);
        let y = DVector::from_row_slice(&[1.0, 2.0]);
        let ls = solve_least_squares(&x, &y).unwrap();
        assert!(t_statistics(&x, &ls.coefficients, &y).is_none());

        let x = DMatrix::from_row_slice(4, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0, 1.0, 3.0]);
        let y = DVector::from_row_slice(&[0.1, 1.0, 2.1, 2.9]);
        let ls = solve_least_squares(&x, &y).unwrap();
        let t = t_statistics(&x, &ls.coefficients, &y).unwrap();
        assert_eq!(t.len(), 2);
        // The slope is strongly significant.
        assert!(t[1].unwrap() > 10.0);
    }

    #[test]
    fn zero_standard_error_has_no_t_statistic() {
        // c reproduces b exactly, so the residual variance is zero.
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
        let y = DVector::from_row_slice(&[1.0, 2.0, 0.0]);
        let c = DVector::from_row_slice(&[1.0, 2.0]);
        let t = t_statistics(&x, &c, &y).unwrap();
        assert_eq!(t, vec![None, None]);

        // Missing entries survive a JSON round trip as `null`.
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, "[null,null]");
        let back: Vec<Option<f64>> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn f_statistic_for_intercept_versus_line() {
        // y on x = 0..4: intercept-only RSS = 10, line RSS = 3.6.
        let y = DVector::from_row_slice(&[1.0, 3.0, 2.0, 5.0, 4.0]);
        let ones = DMatrix::from_element(5, 1, 1.0);
        let line = DMatrix::from_row_slice(
            5,
            2,
            &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0, 1.0, 3.0, 1.0, 4.0],
        );
        let c0 = solve_least_squares(&ones, &y).unwrap().coefficients;
        let c1 = solve_least_squares(&line, &y).unwrap().coefficients;
        assert!((c0[0] - 3.0).abs() < 1e-12);
        assert!((c1[1] - 0.8).abs() < 1e-12);

        let expected = 6.4 * 3.0 / 3.6;
        let f = f_statistic((&ones, &c0), (&line, &c1), &y).unwrap();
        assert!((f - expected).abs() < 1e-9, "F = {f}");
        // Argument order does not matter.
        let swapped = f_statistic((&line, &c1), (&ones, &c0), &y).unwrap();
        assert!((swapped - f).abs() < 1e-12);
        // Same-size models are not nested.
        assert!(f_statistic((&line, &c1), (&line, &c1), &y).is_none());
    }
}
