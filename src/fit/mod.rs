//! Surrogate fitting orchestration.
//!
//! Responsibilities:
//!
//! - build the multi-index basis
//! - generate candidate design points (Gauss–Legendre grid or random)
//! - subsample well-conditioned rows (greedy QR)
//! - evaluate the model and solve the least-squares problem

pub mod design;
pub mod fitter;
pub mod index_set;
pub mod selection;

pub use design::*;
pub use fitter::*;
pub use index_set::*;
pub use selection::*;
