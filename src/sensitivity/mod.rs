//! Variance-based sensitivity analysis of a fitted surrogate.

pub mod sobol;

pub use sobol::*;
