//! Mathematical utilities: orthonormal polynomials, quadrature, and least squares.

pub mod basis;
pub mod ols;
pub mod quadrature;

pub use basis::*;
pub use ols::*;
pub use quadrature::*;
