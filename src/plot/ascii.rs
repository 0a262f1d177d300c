//! ASCII bar charts for terminal output.
//!
//! This is intentionally "dumb" (fixed-width bars), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Each row is `label |#####      | value`; bar lengths are proportional to the
//! value relative to the largest one. Negative values draw an empty bar.

/// Render a horizontal bar chart of `(label, value)` pairs.
pub fn render_bars(title: &str, rows: &[(String, f64)], width: usize) -> String {
    let width = width.max(10);
    let label_w = rows.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
    let max = rows
        .iter()
        .map(|(_, v)| *v)
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);

    let mut out = String::new();
    out.push_str(title);
    out.push('\n');

    for (label, value) in rows {
        let n = bar_len(*value, max, width);
        let bar: String = std::iter::repeat_n('#', n)
            .chain(std::iter::repeat_n(' ', width - n))
            .collect();
        out.push_str(&format!("{label:<label_w$} |{bar}| {value:.4}\n"));
    }

    out
}

/// Bar chart of normalized first-order Sobol indices.
pub fn render_sobol_bars(names: &[&str], normalized: &[f64], width: usize) -> String {
    let rows: Vec<(String, f64)> = names
        .iter()
        .zip(normalized.iter())
        .map(|(n, &v)| (n.to_string(), v))
        .collect();
    render_bars("First-order Sobol indices (share of variance):", &rows, width)
}

fn bar_len(value: f64, max: f64, width: usize) -> usize {
    if !(value.is_finite() && value > 0.0 && max > 0.0) {
        return 0;
    }
    let u = (value / max).clamp(0.0, 1.0);
    (u * width as f64).round() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bars_golden_snapshot_small() {
        let txt = render_sobol_bars(&["M", "S", "Ta"], &[0.25, 0.5, -0.01], 10);
        let expected = concat!(
            "First-order Sobol indices (share of variance):\n",
            "M  |#####     | 0.2500\n",
            "S  |##########| 0.5000\n",
            "Ta |          | -0.0100\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn all_zero_values_draw_empty_bars() {
        let txt = render_bars("t", &[("a".to_string(), 0.0)], 10);
        assert!(txt.contains("|          |"));
    }
}
