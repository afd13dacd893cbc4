use super::model::Dataset;

// ---------------------------------------------------------------------------
// Per-column summary statistics
// ---------------------------------------------------------------------------

/// Min / sample standard deviation / max for one column over the filtered
/// window. `std` is NaN below two data points; all three are NaN when the
/// column has no values in the window.
#[derive(Debug, Clone)]
pub struct StatsRow {
    pub column: String,
    pub min: f64,
    pub std: f64,
    pub max: f64,
}

/// One [`StatsRow`] per entry of `columns` that exists in the dataset, in
/// the given (selection) order. Unknown column names are skipped.
pub fn column_stats(dataset: &Dataset, columns: &[String]) -> Vec<StatsRow> {
    columns
        .iter()
        .filter(|c| dataset.columns.contains(*c))
        .map(|c| {
            let values = dataset.column_values(c);
            StatsRow {
                column: c.clone(),
                min: fold_min(&values),
                std: sample_std(&values),
                max: fold_max(&values),
            }
        })
        .collect()
}

fn fold_min(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().copied().fold(f64::INFINITY, f64::min)
}

fn fold_max(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

/// Sample standard deviation (N−1 denominator); NaN for fewer than two
/// points, matching pandas' `Series.std()`.
pub fn sample_std(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return f64::NAN;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    var.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Cell, RawTable};

    fn dataset(values: &[(&str, f64)]) -> Dataset {
        let rows = values
            .iter()
            .map(|(d, v)| vec![Cell::Text((*d).into()), Cell::Number(*v)])
            .collect();
        Dataset::from_tables(&[RawTable {
            name: "t.csv".into(),
            columns: vec!["Date".into(), "A".into()],
            rows,
        }])
        .unwrap()
    }

    #[test]
    fn worked_example_from_two_points() {
        // A = {10, 20}: min 10, max 20, sample std ≈ 7.071.
        let ds = dataset(&[("2024-01-01", 10.0), ("2024-01-02", 20.0)]);
        let stats = column_stats(&ds, &["A".to_string()]);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].min, 10.0);
        assert_eq!(stats[0].max, 20.0);
        assert!((stats[0].std - 7.0710678).abs() < 1e-6);
    }

    #[test]
    fn single_point_has_nan_std() {
        let ds = dataset(&[("2024-01-01", 10.0)]);
        let stats = column_stats(&ds, &["A".to_string()]);
        assert_eq!(stats[0].min, 10.0);
        assert_eq!(stats[0].max, 10.0);
        assert!(stats[0].std.is_nan());
    }

    #[test]
    fn empty_column_is_all_nan_but_still_reported() {
        let ds = dataset(&[]);
        let stats = column_stats(&ds, &["A".to_string()]);
        assert_eq!(stats.len(), 1);
        assert!(stats[0].min.is_nan());
        assert!(stats[0].std.is_nan());
        assert!(stats[0].max.is_nan());
    }

    #[test]
    fn unknown_columns_are_skipped_and_order_is_selection_order() {
        let ds = dataset(&[("2024-01-01", 1.0), ("2024-01-02", 2.0)]);
        let stats = column_stats(&ds, &["Ghost".to_string(), "A".to_string()]);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].column, "A");
    }
}
