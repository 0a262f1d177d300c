//! Reporting utilities: reference comparison and formatted terminal output.

pub mod format;

pub use format::*;

/// One row of the literature comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceRow {
    pub name: String,
    /// `100 × raw first-order contribution` from this run.
    pub computed: f64,
    /// Published value on the same scale.
    pub reference: f64,
}

/// Pair computed first-order contributions with published ones.
///
/// Both sides are on the `index × variance × 10²` scale.
pub fn compare_with_reference(names: &[&str], raw_first_order: &[f64], reference: &[f64]) -> Vec<ReferenceRow> {
    names
        .iter()
        .zip(raw_first_order.iter())
        .zip(reference.iter())
        .map(|((name, &raw), &reference)| ReferenceRow {
            name: name.to_string(),
            computed: 100.0 * raw,
            reference,
        })
        .collect()
}
