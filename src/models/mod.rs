//! Deterministic models to analyze.
//!
//! Models are implemented as small, pure functions so that fitting code can stay
//! generic: anything of shape `Fn(&[f64]) -> Result<f64, AppError>` can be fitted.

pub mod piston;

pub use piston::*;
