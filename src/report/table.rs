use std::collections::BTreeMap;

use crate::report::duration::{format_rounded, format_timespan};

// ============================================================================
// Summary table — grouped rows plus synthetic Sum / Percent rows
// ============================================================================

pub const SUM_LABEL: &str = "Sum";
pub const PERCENT_LABEL: &str = "Percent";

/// A fully stringified labeled grid, ready for rendering. The first
/// column is the device-serial label; the last two rows are the
/// synthetic Sum and Percent rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SummaryTable {
    /// Build the table from per-run rows.
    ///
    /// Rows sharing a device serial are summed into one row (sorted by
    /// serial). The Percent row divides every column sum by the single
    /// largest column sum of the whole table — not per column. That
    /// global-max normalization is what the published reports have
    /// always shown, so it is kept as-is.
    pub fn build(
        label_column: &str,
        metric_columns: &[&str],
        rows: &[(String, Vec<f64>)],
        format_durations: bool,
    ) -> SummaryTable {
        let width = metric_columns.len();

        // Group by serial, summing each column
        let mut grouped: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for (serial, values) in rows {
            let entry = grouped.entry(serial.clone()).or_insert_with(|| vec![0.0; width]);
            for (slot, value) in entry.iter_mut().zip(values) {
                *slot += value;
            }
        }

        // Column-wise sums over the grouped rows
        let mut sums = vec![0.0; width];
        for values in grouped.values() {
            for (slot, value) in sums.iter_mut().zip(values) {
                *slot += value;
            }
        }

        let max_sum = sums.iter().copied().fold(f64::MIN, f64::max);

        let format_cell = |value: f64| -> String {
            if format_durations {
                format_duration_cell(value)
            } else {
                format_number_cell(value)
            }
        };

        let mut out_rows: Vec<Vec<String>> = Vec::new();
        for (serial, values) in &grouped {
            let mut row = vec![serial.clone()];
            row.extend(values.iter().map(|v| format_cell(*v)));
            out_rows.push(row);
        }

        let mut sum_row = vec![SUM_LABEL.to_string()];
        sum_row.extend(sums.iter().map(|v| format_cell(*v)));
        out_rows.push(sum_row);

        let mut percent_row = vec![PERCENT_LABEL.to_string()];
        percent_row.extend(sums.iter().map(|v| {
            let percent = if max_sum == 0.0 { 0.0 } else { v / max_sum * 100.0 };
            format!("{} %", format_rounded(percent))
        }));
        out_rows.push(percent_row);

        let mut columns = vec![label_column.to_string()];
        columns.extend(metric_columns.iter().map(|c| c.to_string()));

        SummaryTable { columns, rows: out_rows }
    }
}

/// Duration cells truncate to whole seconds. Negative test_time from
/// inconsistent upstream data keeps its sign.
fn format_duration_cell(value: f64) -> String {
    let seconds = value as i64;
    if seconds < 0 {
        format!("-{}", format_timespan(seconds.unsigned_abs()))
    } else {
        format_timespan(seconds as u64)
    }
}

/// Whole numbers print without a decimal point; anything fractional
/// keeps two rounded decimals.
fn format_number_cell(value: f64) -> String {
    if (value - value.trunc()).abs() < 1e-9 {
        format!("{}", value as i64)
    } else {
        format_rounded(value)
    }
}
