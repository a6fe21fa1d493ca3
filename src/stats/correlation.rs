//! Correlation Module
//! Pairwise Pearson correlations with two-tailed significance.

use statrs::distribution::{ContinuousCDF, StudentsT};

/// Significance threshold for correlation p-values
pub const SIGNIFICANCE_THRESHOLD: f64 = 0.05;

/// One named column of observations.
#[derive(Debug, Clone)]
pub struct LabeledSeries {
    pub label: String,
    pub values: Vec<f64>,
}

impl LabeledSeries {
    pub fn new(label: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            values,
        }
    }
}

/// Square Pearson correlation matrix over a set of columns.
///
/// `r[i][j]` is the correlation between columns i and j; `p[i][j]` the
/// two-tailed significance. A constant column correlates with nothing, its
/// cells (diagonal included) are NaN.
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    pub labels: Vec<String>,
    pub r: Vec<Vec<f64>>,
    pub p: Vec<Vec<f64>>,
    pub n: usize,
}

impl CorrelationMatrix {
    pub fn size(&self) -> usize {
        self.labels.len()
    }

    pub fn significant(&self, i: usize, j: usize) -> bool {
        self.p[i][j] <= SIGNIFICANCE_THRESHOLD
    }

    /// Index pairs of the upper triangle, row-major. One entry per distinct
    /// column pair, for text reports of r and p.
    pub fn upper_pairs(&self) -> Vec<(usize, usize)> {
        let k = self.size();
        let mut pairs = Vec::with_capacity(k.saturating_sub(1) * k / 2);
        for i in 0..k {
            for j in (i + 1)..k {
                pairs.push((i, j));
            }
        }
        pairs
    }
}

/// Compute the pairwise correlation matrix for the given columns.
///
/// Columns are truncated to the shortest length before pairing.
pub fn correlation_matrix(series: &[LabeledSeries]) -> CorrelationMatrix {
    let n = series.iter().map(|s| s.values.len()).min().unwrap_or(0);
    let k = series.len();

    let mut r = vec![vec![f64::NAN; k]; k];
    let mut p = vec![vec![f64::NAN; k]; k];

    for i in 0..k {
        for j in 0..k {
            let rij = pearson(&series[i].values[..n], &series[j].values[..n]);
            r[i][j] = rij;
            p[i][j] = two_tailed_p(rij, n);
        }
    }

    CorrelationMatrix {
        labels: series.iter().map(|s| s.label.clone()).collect(),
        r,
        p,
        n,
    }
}

/// Pearson's r between two equal-length slices.
///
/// NaN when fewer than two observations or either slice is constant.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n < 2 {
        return f64::NAN;
    }

    let n_f = n as f64;
    let mean_x = x[..n].iter().sum::<f64>() / n_f;
    let mean_y = y[..n].iter().sum::<f64>() / n_f;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (&xi, &yi) in x[..n].iter().zip(y[..n].iter()) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }

    cov / (var_x * var_y).sqrt()
}

/// Two-tailed p-value for a Pearson r at sample size `n`, via the Student-t
/// transform with n - 2 degrees of freedom.
fn two_tailed_p(r: f64, n: usize) -> f64 {
    if !r.is_finite() || n < 3 {
        return f64::NAN;
    }

    let df = (n - 2) as f64;
    let denom = 1.0 - r * r;
    if denom <= 0.0 {
        // |r| of exactly 1: the t statistic diverges.
        return 0.0;
    }

    let t = r.abs() * (df / denom).sqrt();
    if let Ok(dist) = StudentsT::new(0.0, 1.0, df) {
        2.0 * (1.0 - dist.cdf(t))
    } else {
        f64::NAN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn three_columns() -> Vec<LabeledSeries> {
        vec![
            LabeledSeries::new("Area", vec![1.0, 2.0, 3.0, 4.0, 5.0]),
            LabeledSeries::new("Yield", vec![2.0, 4.0, 6.0, 8.0, 10.0]),
            LabeledSeries::new("Production", vec![5.0, 1.0, 4.0, 2.0, 3.0]),
        ]
    }

    #[test]
    fn matrix_is_symmetric_with_unit_diagonal() {
        let m = correlation_matrix(&three_columns());
        assert_eq!(m.size(), 3);
        for i in 0..3 {
            assert!(approx(m.r[i][i], 1.0));
            for j in 0..3 {
                assert!(approx(m.r[i][j], m.r[j][i]));
            }
        }
    }

    #[test]
    fn perfectly_linear_columns_give_unit_r() {
        let m = correlation_matrix(&three_columns());
        assert!(approx(m.r[0][1], 1.0));
        assert!(approx(m.p[0][1], 0.0));
    }

    #[test]
    fn negative_slope_gives_negative_one() {
        let r = pearson(&[1.0, 2.0, 3.0], &[30.0, 20.0, 10.0]);
        assert!(approx(r, -1.0));
    }

    #[test]
    fn constant_column_yields_nan_everywhere() {
        let series = vec![
            LabeledSeries::new("Flat", vec![7.0, 7.0, 7.0]),
            LabeledSeries::new("Varies", vec![1.0, 2.0, 3.0]),
        ];
        let m = correlation_matrix(&series);
        assert!(m.r[0][0].is_nan());
        assert!(m.r[0][1].is_nan());
        assert!(m.r[1][0].is_nan());
        assert!(approx(m.r[1][1], 1.0));
    }

    #[test]
    fn strong_correlation_is_significant() {
        let x: Vec<f64> = (0..12).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| 3.0 * v + if v % 2.0 == 0.0 { 0.1 } else { -0.1 }).collect();
        let m = correlation_matrix(&[
            LabeledSeries::new("x", x),
            LabeledSeries::new("y", y),
        ]);
        assert!(m.r[0][1] > 0.99);
        assert!(m.significant(0, 1));
    }

    #[test]
    fn upper_pairs_cover_each_combination_once() {
        let m = correlation_matrix(&three_columns());
        assert_eq!(m.upper_pairs(), vec![(0, 1), (0, 2), (1, 2)]);
    }

    #[test]
    fn tiny_samples_have_no_p_value() {
        let m = correlation_matrix(&[
            LabeledSeries::new("x", vec![1.0, 2.0]),
            LabeledSeries::new("y", vec![2.0, 1.0]),
        ]);
        assert!(approx(m.r[0][1], -1.0));
        assert!(m.p[0][1].is_nan());
    }
}
