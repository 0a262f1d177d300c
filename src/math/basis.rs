//! Orthonormal Legendre polynomials.
//!
//! For a uniform input mapped to `z ∈ [-1, 1]` (density `1/2`) the orthonormal
//! family is
//!
//! - `ψ_n(z) = sqrt(2n + 1) · P_n(z)`
//!
//! where `P_n` is the classical Legendre polynomial, generated by the three-term
//! recurrence `(n + 1) P_{n+1} = (2n + 1) z P_n - n P_{n-1}`.
//!
//! With this normalization `E[ψ_i ψ_j] = δ_ij`, so the mean of an expansion is
//! its constant coefficient and its variance the sum of the other squared
//! coefficients.

/// Fill `out[n] = ψ_n(z)` for `n = 0..out.len()`.
pub fn legendre_orthonormal_into(z: f64, out: &mut [f64]) {
    if out.is_empty() {
        return;
    }
    out[0] = 1.0;
    if out.len() == 1 {
        return;
    }
    out[1] = z;
    for n in 1..out.len() - 1 {
        let nf = n as f64;
        out[n + 1] = ((2.0 * nf + 1.0) * z * out[n] - nf * out[n - 1]) / (nf + 1.0);
    }
    for (n, v) in out.iter_mut().enumerate() {
        *v *= (2.0 * n as f64 + 1.0).sqrt();
    }
}

/// Orthonormal Legendre values `ψ_0..=ψ_max_degree` at `z`.
pub fn legendre_orthonormal(z: f64, max_degree: usize) -> Vec<f64> {
    let mut out = vec![0.0; max_degree + 1];
    legendre_orthonormal_into(z, &mut out);
    out
}
