//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - uncertain inputs (`Distribution`, `Parameter`, `ParameterSet`)
//! - basis and design selectors (`BasisKind`, `SamplingStrategy`)
//! - fit outputs (`FitQuality`, `Statistics`, `SobolIndices`, `SurrogateFile`)

pub mod types;

pub use types::*;
