//! Dataset Summary Module
//! Row/column counts and descriptive statistics for every numeric column.

use polars::prelude::*;
use serde::Serialize;
use std::fmt::Write as _;

use crate::data::loader::numeric_column_names;

/// Descriptive statistics for one numeric column.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub p25: f64,
    pub median: f64,
    pub p75: f64,
    pub max: f64,
}

/// Shape and per-column statistics of a loaded table.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub rows: usize,
    pub columns: usize,
    pub numeric: Vec<ColumnSummary>,
}

impl DatasetSummary {
    /// Fixed-width text table for terminal output.
    pub fn render_table(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:<38} {:>7} {:>11} {:>11} {:>11} {:>11} {:>11} {:>11} {:>11}",
            "Column", "Count", "Mean", "Std", "Min", "P25", "Median", "P75", "Max"
        );
        for col in &self.numeric {
            let _ = writeln!(
                out,
                "{:<38} {:>7} {:>11.2} {:>11.2} {:>11.2} {:>11.2} {:>11.2} {:>11.2} {:>11.2}",
                col.name, col.count, col.mean, col.std, col.min, col.p25, col.median, col.p75,
                col.max
            );
        }
        out
    }
}

/// Compute the summary of every numeric column.
pub fn describe(df: &DataFrame) -> PolarsResult<DatasetSummary> {
    let mut numeric = Vec::new();

    for name in numeric_column_names(df) {
        let values: Vec<f64> = df
            .column(&name)?
            .cast(&DataType::Float64)?
            .f64()?
            .into_iter()
            .flatten()
            .collect();
        numeric.push(summarize_column(name, &values));
    }

    Ok(DatasetSummary {
        rows: df.height(),
        columns: df.width(),
        numeric,
    })
}

fn summarize_column(name: String, values: &[f64]) -> ColumnSummary {
    let n = values.len();
    if n == 0 {
        return ColumnSummary {
            name,
            count: 0,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            p25: f64::NAN,
            median: f64::NAN,
            p75: f64::NAN,
            max: f64::NAN,
        };
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mean = values.iter().sum::<f64>() / n as f64;
    let variance = if n > 1 {
        values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
    } else {
        0.0
    };

    ColumnSummary {
        name,
        count: n,
        mean,
        std: variance.sqrt(),
        min: sorted[0],
        p25: percentile(&sorted, 25.0),
        median: percentile(&sorted, 50.0),
        p75: percentile(&sorted, 75.0),
        max: sorted[n - 1],
    }
}

/// Percentile by linear interpolation over a sorted slice.
fn percentile(sorted_values: &[f64], p: f64) -> f64 {
    let n = sorted_values.len();
    if n == 0 {
        return f64::NAN;
    }
    if n == 1 {
        return sorted_values[0];
    }

    let rank = (p / 100.0) * (n - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = (rank.ceil() as usize).min(n - 1);
    let frac = rank - lower as f64;

    if lower == upper {
        sorted_values[lower]
    } else {
        sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
    }
}
