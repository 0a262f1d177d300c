//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized (important for snapshot tests)

use crate::domain::{AnalysisConfig, FitQuality, SobolIndices, Statistics, Validation};
use crate::fit::FittedSurrogate;
use crate::report::ReferenceRow;

/// Format the run summary (configuration + fit diagnostics + moments).
pub fn format_run_summary(surrogate: &FittedSurrogate, stats: &Statistics, config: &AnalysisConfig) -> String {
    let mut out = String::new();
    let basis = surrogate.basis();

    out.push_str("=== psobol - polynomial-chaos Sobol analysis (piston model) ===\n");
    out.push_str(&format!(
        "Parameters: d={} | orders={}\n",
        surrogate.parameters().len(),
        fmt_usizes(basis.orders())
    ));
    out.push_str(&format!(
        "Basis: {} | cardinality={}\n",
        basis.kind().display_name(),
        basis.cardinality()
    ));
    out.push_str(&format!(
        "Design: {} | oversampling={:.2} | points={}\n",
        surrogate.strategy().display_name(),
        config.oversampling,
        surrogate.design().len()
    ));
    out.push_str(&format_quality(surrogate.quality()));
    out.push_str(&format!(
        "Moments: mean={:.6} variance={:.6e} std={:.6}\n",
        stats.mean, stats.variance, stats.std_dev
    ));

    out
}

fn format_quality(q: &FitQuality) -> String {
    let fit_kind = if q.n_points == q.n_terms { "exact" } else { "least squares" };
    format!(
        "Fit: {fit_kind} | cond={:.3e} | R^2={:.6} | RSS={:.3e}\n",
        q.condition_number, q.r_squared, q.rss
    )
}

/// Format first-order indices, optionally next to literature values.
pub fn format_first_order(
    names: &[&str],
    first: &SobolIndices,
    total: &[f64],
    reference: Option<&[ReferenceRow]>,
) -> String {
    let mut out = String::new();
    out.push_str("First-order Sobol indices:\n");

    match reference {
        Some(_) => out.push_str(&format!(
            "{:<6} {:>10} {:>10} {:>14} {:>14}\n",
            "input", "S_i", "S_Ti", "100*S_i*Var", "reference"
        )),
        None => out.push_str(&format!(
            "{:<6} {:>10} {:>10} {:>14}\n",
            "input", "S_i", "S_Ti", "100*S_i*Var"
        )),
    }

    for (k, name) in names.iter().enumerate() {
        let raw = first.raw_of(&[k]);
        let line = format!(
            "{:<6} {:>10.5} {:>10.5} {:>14.4}",
            truncate(name, 6),
            first.normalized_of(&[k]),
            total.get(k).copied().unwrap_or(f64::NAN),
            100.0 * raw,
        );
        out.push_str(&line);
        if let Some(row) = reference.and_then(|r| r.get(k)) {
            out.push_str(&format!(" {:>14.3}", row.reference));
        }
        out.push('\n');
    }

    let sum: f64 = first.per_dimension_normalized().iter().sum();
    out.push_str(&format!("Sum of first-order indices: {sum:.5}\n"));
    out
}

/// Format interaction indices of order >= 2, largest first.
pub fn format_interactions(names: &[&str], table: &SobolIndices, top: usize) -> String {
    let mut rows: Vec<(&Vec<usize>, f64)> = table
        .raw
        .keys()
        .map(|k| (k, table.normalized_of(k)))
        .collect();
    rows.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let mut out = String::new();
    out.push_str(&format!("Order-{} Sobol indices (top {top}):\n", table.order));
    for (dims, value) in rows.into_iter().take(top) {
        let label: Vec<&str> = dims.iter().map(|&d| names.get(d).copied().unwrap_or("?")).collect();
        out.push_str(&format!("{:<20} {:>10.5}\n", label.join("-"), value));
    }
    out
}

pub fn format_validation(v: &Validation) -> String {
    format!(
        "Hold-out validation: n={} | RMSE={:.3e} | max|err|={:.3e}\n",
        v.n_points, v.rmse, v.max_abs_error
    )
}

fn fmt_usizes(v: &[usize]) -> String {
    let parts: Vec<String> = v.iter().map(|x| x.to_string()).collect();
    format!("[{}]", parts.join(", "))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn first_order() -> SobolIndices {
        let mut raw = BTreeMap::new();
        raw.insert(vec![0], 0.006);
        raw.insert(vec![1], 0.002);
        SobolIndices {
            order: 1,
            variance: 0.01,
            raw,
        }
    }

    #[test]
    fn first_order_table_lists_every_input() {
        let txt = format_first_order(&["M", "S"], &first_order(), &[0.7, 0.3], None);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[2].starts_with("M "));
        assert!(lines[2].contains("0.60000"));
        assert!(lines[2].ends_with("0.6000"));
        assert!(lines[4].contains("0.80000"));
    }

    #[test]
    fn reference_column_is_appended() {
        let refs = crate::report::compare_with_reference(&["M", "S"], &[0.006, 0.002], &[0.073, 1.088]);
        assert!((refs[0].computed - 0.6).abs() < 1e-12);
        let txt = format_first_order(&["M", "S"], &first_order(), &[0.7, 0.3], Some(&refs));
        assert!(txt.contains("reference"));
        assert!(txt.lines().nth(3).unwrap().ends_with("1.088"));
    }

    #[test]
    fn interactions_sorted_largest_first() {
        let mut raw = BTreeMap::new();
        raw.insert(vec![0, 1], 0.001);
        raw.insert(vec![0, 2], 0.004);
        raw.insert(vec![1, 2], 0.0);
        let table = SobolIndices {
            order: 2,
            variance: 0.01,
            raw,
        };
        let txt = format_interactions(&["M", "S", "V0"], &table, 2);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("M-V0"));
        assert!(lines[2].starts_with("M-S"));
    }

    #[test]
    fn truncate_marks_long_names() {
        assert_eq!(truncate("abcdefgh", 6), "abcde.");
        assert_eq!(truncate("abc", 6), "abc");
    }
}
