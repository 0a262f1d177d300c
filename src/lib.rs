//! `piston-sobol` library crate.
//!
//! The binary (`psobol`) is a thin wrapper around [`app::run`]. Everything else
//! lives here so it can be tested directly:
//!
//! - [`models`]: the piston cycle-time function and its input bounds
//! - [`fit`]: multi-index bases, design selection and the least-squares fitter
//! - [`sensitivity`]: moments and Sobol indices from chaos coefficients
//! - [`io`], [`report`], [`plot`]: exports and terminal output

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod logging;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
pub mod sensitivity;
