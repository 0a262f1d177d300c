//! Input/output helpers.
//!
//! - parameter JSON loading + validation (`params`)
//! - Sobol table export (CSV) (`export`)
//! - surrogate JSON read/write (`surrogate`)

pub mod export;
pub mod params;
pub mod surrogate;

pub use export::*;
pub use params::*;
pub use surrogate::*;
