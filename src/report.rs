//! Report Module
//! Runs the full analysis pass over a loaded table and assembles the fixed
//! chart sequence. Each chart builds independently so a failure in one
//! leaves the others intact.

use polars::prelude::*;
use thiserror::Error;
use tracing::debug;

use crate::charts::figure::{
    ChartFigure, CorrelationChart, CropSeries, HeatmapChart, RankedBarChart, ScatterPairChart,
    ScatterPanel, StackedAreaChart, TrendChart,
};
use crate::data::{
    column_name, fill_missing_with_zero, resolve, resolved_names, Crop, Metric, DISTRICT_COLUMN,
    STATE_COLUMN, YEAR_COLUMN,
};
use crate::stats::aggregator::{
    groupwise_mean, groupwise_sum_top, yearly_mean, yearly_sum, AggregateError,
};
use crate::stats::correlation::{correlation_matrix, LabeledSeries};
use crate::stats::summary::{describe, DatasetSummary};

/// Tunable knobs of one analysis pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// Crop driving the state ranking, scatter, correlation and district
    /// charts.
    pub focus_crop: Crop,
    pub top_states: usize,
    pub top_districts: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            focus_crop: Crop::Rice,
            top_states: 10,
            top_districts: 5,
        }
    }
}

/// Why a single chart could not be built.
#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Required column '{0}' is missing from the table")]
    MissingColumn(String),
    #[error("Column '{0}' contains non-numeric data")]
    NonNumericData(String),
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// Everything one pipeline pass produces.
pub struct AnalysisReport {
    pub summary: DatasetSummary,
    /// Chart outcomes in display order; a failed chart keeps its slot.
    pub charts: Vec<Result<ChartFigure, ChartError>>,
}

impl AnalysisReport {
    pub fn chart_count(&self) -> usize {
        self.charts.len()
    }

    pub fn failed_count(&self) -> usize {
        self.charts.iter().filter(|c| c.is_err()).count()
    }
}

/// Display name of each slot in the fixed chart order. Failed slots have
/// no figure to take a title from, so the name lives here.
pub fn chart_slot_name(index: usize) -> &'static str {
    match index {
        0 => "Crop yield trends",
        1 => "Top state yield heatmap",
        2 => "Cultivated area by year",
        3 => "Area and production vs yield",
        4 => "Correlation matrix",
        5 => "Top districts by area",
        _ => "Chart",
    }
}

/// Run the whole pipeline over a loaded table.
///
/// The table is zero-filled first; every aggregation below sees the cleaned
/// copy. Chart failures are collected per slot, not propagated.
pub fn analyze(df: &DataFrame, options: &AnalysisOptions) -> PolarsResult<AnalysisReport> {
    let cleaned = fill_missing_with_zero(df)?;
    debug!(
        rows = cleaned.height(),
        columns = cleaned.width(),
        focus = %options.focus_crop,
        "table cleaned, building charts"
    );

    let summary = describe(&cleaned)?;

    let charts = vec![
        build_yield_trends(&cleaned),
        build_state_heatmap(&cleaned, options),
        build_cultivated_area(&cleaned),
        build_scatter_pairs(&cleaned, options),
        build_correlation(&cleaned, options),
        build_top_districts(&cleaned, options),
    ];

    Ok(AnalysisReport { summary, charts })
}

/// Chart 1: mean yield of every resolved crop per year.
fn build_yield_trends(df: &DataFrame) -> Result<ChartFigure, ChartError> {
    let resolved = resolve(df, Metric::Yield);
    if resolved.is_empty() {
        return Ok(ChartFigure::YieldTrends(TrendChart {
            title: "Crop Yield Trends Over Time".to_string(),
            x_labels: Vec::new(),
            y_label: format!("Average Yield ({})", Metric::Yield.unit()),
            series: Vec::new(),
        }));
    }
    let means = yearly_mean(df, &resolved_names(&resolved))?;

    let x_labels = label_values(&means, YEAR_COLUMN)?;
    let series = resolved
        .iter()
        .map(|rc| {
            Ok(CropSeries {
                label: rc.crop.label().to_string(),
                values: numeric_values(&means, &rc.name)?,
            })
        })
        .collect::<Result<Vec<_>, ChartError>>()?;

    Ok(ChartFigure::YieldTrends(TrendChart {
        title: "Crop Yield Trends Over Time".to_string(),
        x_labels,
        y_label: format!("Average Yield ({})", Metric::Yield.unit()),
        series,
    }))
}

/// Chart 2: per-state mean yields, ranked by the focus crop, transposed so
/// crops are rows and the ranked states are columns.
fn build_state_heatmap(
    df: &DataFrame,
    options: &AnalysisOptions,
) -> Result<ChartFigure, ChartError> {
    let resolved = resolve(df, Metric::Yield);
    let names = resolved_names(&resolved);
    let sort_column = column_name(options.focus_crop, Metric::Yield);
    if !names.iter().any(|n| n == &sort_column) {
        return Err(ChartError::MissingColumn(sort_column));
    }

    let top = groupwise_mean(df, &names, &[STATE_COLUMN], &sort_column, options.top_states)?;

    let col_labels = label_values(&top, STATE_COLUMN)?;
    let mut row_labels = Vec::with_capacity(resolved.len());
    let mut values = Vec::with_capacity(resolved.len());
    for rc in &resolved {
        row_labels.push(rc.crop.label().to_string());
        values.push(numeric_values(&top, &rc.name)?);
    }

    Ok(ChartFigure::StateYieldHeatmap(HeatmapChart {
        title: format!(
            "Top {} States by {} Yield and Other Crop Yields",
            options.top_states, options.focus_crop
        ),
        row_labels,
        col_labels,
        values,
    }))
}

/// Chart 3: total cultivated area per year, stacked per crop.
fn build_cultivated_area(df: &DataFrame) -> Result<ChartFigure, ChartError> {
    let resolved = resolve(df, Metric::Area);
    if resolved.is_empty() {
        return Ok(ChartFigure::CultivatedArea(StackedAreaChart {
            title: "Total Area Under Cultivation Over Years".to_string(),
            x_labels: Vec::new(),
            y_label: format!("Total Area ({})", Metric::Area.unit()),
            series: Vec::new(),
        }));
    }
    let sums = yearly_sum(df, &resolved_names(&resolved))?;

    let x_labels = label_values(&sums, YEAR_COLUMN)?;
    let series = resolved
        .iter()
        .map(|rc| {
            Ok(CropSeries {
                label: rc.crop.label().to_string(),
                values: numeric_values(&sums, &rc.name)?,
            })
        })
        .collect::<Result<Vec<_>, ChartError>>()?;

    Ok(ChartFigure::CultivatedArea(StackedAreaChart {
        title: "Total Area Under Cultivation Over Years".to_string(),
        x_labels,
        y_label: format!("Total Area ({})", Metric::Area.unit()),
        series,
    }))
}

/// Chart 4: raw observations of the focus crop, area vs yield next to
/// production vs yield.
fn build_scatter_pairs(
    df: &DataFrame,
    options: &AnalysisOptions,
) -> Result<ChartFigure, ChartError> {
    let crop = options.focus_crop;
    let area_col = column_name(crop, Metric::Area);
    let yield_col = column_name(crop, Metric::Yield);
    let prod_col = column_name(crop, Metric::Production);

    let area = numeric_values(df, &area_col)?;
    let yields = numeric_values(df, &yield_col)?;
    let production = numeric_values(df, &prod_col)?;

    let left = ScatterPanel {
        title: format!("{}: Area vs Yield", crop),
        x_label: area_col,
        y_label: yield_col.clone(),
        points: area
            .iter()
            .zip(yields.iter())
            .map(|(&x, &y)| [x, y])
            .collect(),
    };
    let right = ScatterPanel {
        title: format!("{}: Production vs Yield", crop),
        x_label: prod_col,
        y_label: yield_col,
        points: production
            .iter()
            .zip(yields.iter())
            .map(|(&x, &y)| [x, y])
            .collect(),
    };

    Ok(ChartFigure::ScatterPairs(ScatterPairChart {
        title: format!("{}: Area and Production vs Yield", crop),
        left,
        right,
    }))
}

/// Chart 5: Pearson correlations between the focus crop's three metrics.
fn build_correlation(
    df: &DataFrame,
    options: &AnalysisOptions,
) -> Result<ChartFigure, ChartError> {
    let crop = options.focus_crop;
    let series = vec![
        LabeledSeries::new(
            "Area",
            numeric_values(df, &column_name(crop, Metric::Area))?,
        ),
        LabeledSeries::new(
            "Yield",
            numeric_values(df, &column_name(crop, Metric::Yield))?,
        ),
        LabeledSeries::new(
            "Production",
            numeric_values(df, &column_name(crop, Metric::Production))?,
        ),
    ];

    Ok(ChartFigure::CorrelationMatrix(CorrelationChart {
        title: format!("{}: Correlation Matrix", crop),
        matrix: correlation_matrix(&series),
    }))
}

/// Chart 6: districts with the largest total focus-crop area. Districts are
/// keyed by state and district together; a district name recurring in two
/// states stays two bars.
fn build_top_districts(
    df: &DataFrame,
    options: &AnalysisOptions,
) -> Result<ChartFigure, ChartError> {
    let crop = options.focus_crop;
    let area_col = column_name(crop, Metric::Area);
    if df.column(&area_col).is_err() {
        return Err(ChartError::MissingColumn(area_col));
    }

    let top = groupwise_sum_top(
        df,
        &area_col,
        &[STATE_COLUMN, DISTRICT_COLUMN],
        options.top_districts,
    )?;

    let states = label_values(&top, STATE_COLUMN)?;
    let districts = label_values(&top, DISTRICT_COLUMN)?;
    let labels = districts
        .iter()
        .zip(states.iter())
        .map(|(d, s)| format!("{} ({})", d, s))
        .collect();

    Ok(ChartFigure::TopDistricts(RankedBarChart {
        title: format!(
            "Top {} Districts with Highest {} Area",
            options.top_districts, crop
        ),
        y_label: format!("Total Area ({})", Metric::Area.unit()),
        labels,
        values: numeric_values(&top, &area_col)?,
    }))
}

/// Row labels of a column, in row order.
fn label_values(df: &DataFrame, name: &str) -> Result<Vec<String>, ChartError> {
    let column = df
        .column(name)
        .map_err(|_| ChartError::MissingColumn(name.to_string()))?;
    let series = column.as_materialized_series();

    let mut labels = Vec::with_capacity(series.len());
    for i in 0..series.len() {
        let val = series.get(i)?;
        labels.push(val.to_string().trim_matches('"').to_string());
    }
    Ok(labels)
}

/// A column as f64 values.
///
/// A cast that introduces nulls the cleaned column did not have means the
/// column holds non-numeric text, which fails the chart rather than
/// plotting garbage zeros.
fn numeric_values(df: &DataFrame, name: &str) -> Result<Vec<f64>, ChartError> {
    let column = df
        .column(name)
        .map_err(|_| ChartError::MissingColumn(name.to_string()))?;

    let nulls_before = column.null_count();
    let cast = column.cast(&DataType::Float64)?;
    if cast.null_count() > nulls_before {
        return Err(ChartError::NonNumericData(name.to_string()));
    }

    Ok(cast.f64()?.into_iter().map(|v| v.unwrap_or(0.0)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataFrame {
        df!(
            "Year" => [1966i64, 1966, 1967, 1967],
            "State Name" => ["Bihar", "Punjab", "Bihar", "Punjab"],
            "Dist Name" => ["Patna", "Amritsar", "Patna", "Amritsar"],
            "RICE AREA (1000 ha)" => [10.0f64, 20.0, 12.0, 22.0],
            "RICE YIELD (Kg per ha)" => [800.0f64, 1600.0, 900.0, 1700.0],
            "RICE PRODUCTION (1000 tons)" => [8.0f64, 32.0, 10.8, 37.4],
            "WHEAT YIELD (Kg per ha)" => [500.0f64, 1100.0, 550.0, 1150.0],
        )
        .unwrap()
    }

    #[test]
    fn charts_come_out_in_fixed_order() {
        let report = analyze(&sample(), &AnalysisOptions::default()).unwrap();
        assert_eq!(report.chart_count(), 6);

        let figures: Vec<&ChartFigure> =
            report.charts.iter().map(|c| c.as_ref().unwrap()).collect();
        assert!(matches!(figures[0], ChartFigure::YieldTrends(_)));
        assert!(matches!(figures[1], ChartFigure::StateYieldHeatmap(_)));
        assert!(matches!(figures[2], ChartFigure::CultivatedArea(_)));
        assert!(matches!(figures[3], ChartFigure::ScatterPairs(_)));
        assert!(matches!(figures[4], ChartFigure::CorrelationMatrix(_)));
        assert!(matches!(figures[5], ChartFigure::TopDistricts(_)));
    }

    #[test]
    fn yield_trend_series_hold_yearly_means() {
        let report = analyze(&sample(), &AnalysisOptions::default()).unwrap();
        let ChartFigure::YieldTrends(trend) = report.charts[0].as_ref().unwrap() else {
            panic!("wrong figure in slot 0");
        };

        assert_eq!(trend.x_labels, vec!["1966", "1967"]);
        assert_eq!(trend.series.len(), 2);
        assert_eq!(trend.series[0].label, "RICE");
        assert_eq!(trend.series[0].values, vec![1200.0, 1300.0]);
        assert_eq!(trend.series[1].label, "WHEAT");
        assert_eq!(trend.series[1].values, vec![800.0, 850.0]);
    }

    #[test]
    fn state_heatmap_ranks_states_by_focus_yield() {
        let report = analyze(&sample(), &AnalysisOptions::default()).unwrap();
        let ChartFigure::StateYieldHeatmap(heatmap) = report.charts[1].as_ref().unwrap() else {
            panic!("wrong figure in slot 1");
        };

        assert_eq!(heatmap.col_labels, vec!["Punjab", "Bihar"]);
        assert_eq!(heatmap.row_labels, vec!["RICE", "WHEAT"]);
        assert_eq!(heatmap.values[0], vec![1650.0, 850.0]);
        assert_eq!(heatmap.values[1], vec![1125.0, 525.0]);
    }

    #[test]
    fn cultivated_area_sums_by_year() {
        let report = analyze(&sample(), &AnalysisOptions::default()).unwrap();
        let ChartFigure::CultivatedArea(stacked) = report.charts[2].as_ref().unwrap() else {
            panic!("wrong figure in slot 2");
        };

        assert_eq!(stacked.series.len(), 1);
        assert_eq!(stacked.series[0].label, "RICE");
        assert_eq!(stacked.series[0].values, vec![30.0, 34.0]);
    }

    #[test]
    fn scatter_panels_pair_raw_observations() {
        let report = analyze(&sample(), &AnalysisOptions::default()).unwrap();
        let ChartFigure::ScatterPairs(pair) = report.charts[3].as_ref().unwrap() else {
            panic!("wrong figure in slot 3");
        };

        assert_eq!(pair.left.title, "RICE: Area vs Yield");
        assert_eq!(pair.left.points.len(), 4);
        assert_eq!(pair.left.points[0], [10.0, 800.0]);
        assert_eq!(pair.right.title, "RICE: Production vs Yield");
        assert_eq!(pair.right.points[1], [32.0, 1600.0]);
    }

    #[test]
    fn correlation_chart_is_three_by_three() {
        let report = analyze(&sample(), &AnalysisOptions::default()).unwrap();
        let ChartFigure::CorrelationMatrix(corr) = report.charts[4].as_ref().unwrap() else {
            panic!("wrong figure in slot 4");
        };

        assert_eq!(corr.matrix.labels, vec!["Area", "Yield", "Production"]);
        assert_eq!(corr.matrix.size(), 3);
        assert!(corr.matrix.r[0][1] > 0.9);
        assert!((corr.matrix.r[1][1] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn district_bars_rank_by_total_area() {
        let report = analyze(&sample(), &AnalysisOptions::default()).unwrap();
        let ChartFigure::TopDistricts(bars) = report.charts[5].as_ref().unwrap() else {
            panic!("wrong figure in slot 5");
        };

        assert_eq!(bars.labels, vec!["Amritsar (Punjab)", "Patna (Bihar)"]);
        assert_eq!(bars.values, vec![42.0, 22.0]);
    }

    #[test]
    fn missing_focus_crop_fails_only_its_charts() {
        let df = df!(
            "Year" => [1966i64, 1967],
            "State Name" => ["Bihar", "Bihar"],
            "Dist Name" => ["Patna", "Patna"],
            "WHEAT YIELD (Kg per ha)" => [500.0f64, 560.0],
        )
        .unwrap();

        let report = analyze(&df, &AnalysisOptions::default()).unwrap();
        assert!(report.charts[0].is_ok());
        assert!(matches!(
            report.charts[1],
            Err(ChartError::MissingColumn(_))
        ));
        assert!(report.charts[2].is_ok());
        assert!(matches!(
            report.charts[3],
            Err(ChartError::MissingColumn(_))
        ));
        assert!(matches!(
            report.charts[4],
            Err(ChartError::MissingColumn(_))
        ));
        assert!(matches!(
            report.charts[5],
            Err(ChartError::MissingColumn(_))
        ));
        assert_eq!(report.failed_count(), 4);
    }

    #[test]
    fn focus_crop_follows_options() {
        let df = df!(
            "Year" => [1966i64, 1967],
            "State Name" => ["Bihar", "Bihar"],
            "Dist Name" => ["Patna", "Patna"],
            "WHEAT AREA (1000 ha)" => [5.0f64, 6.0],
            "WHEAT YIELD (Kg per ha)" => [500.0f64, 560.0],
            "WHEAT PRODUCTION (1000 tons)" => [2.5f64, 3.4],
        )
        .unwrap();

        let options = AnalysisOptions {
            focus_crop: Crop::Wheat,
            ..AnalysisOptions::default()
        };
        let report = analyze(&df, &options).unwrap();
        assert_eq!(report.failed_count(), 0);

        let ChartFigure::CorrelationMatrix(corr) = report.charts[4].as_ref().unwrap() else {
            panic!("wrong figure in slot 4");
        };
        assert_eq!(corr.title, "WHEAT: Correlation Matrix");
    }

    #[test]
    fn analysis_zero_fills_before_averaging() {
        let df = df!(
            "Year" => [1966i64, 1966],
            "State Name" => ["Bihar", "Punjab"],
            "Dist Name" => ["Patna", "Amritsar"],
            "RICE YIELD (Kg per ha)" => [Some(2.0f64), None],
        )
        .unwrap();

        let report = analyze(&df, &AnalysisOptions::default()).unwrap();
        let ChartFigure::YieldTrends(trend) = report.charts[0].as_ref().unwrap() else {
            panic!("wrong figure in slot 0");
        };
        assert_eq!(trend.series[0].values, vec![1.0]);
    }

    #[test]
    fn text_in_a_metric_column_is_rejected_per_chart() {
        let df = df!(
            "Year" => [1966i64, 1967],
            "State Name" => ["Bihar", "Bihar"],
            "Dist Name" => ["Patna", "Patna"],
            "RICE AREA (1000 ha)" => ["lots", "some"],
            "RICE YIELD (Kg per ha)" => [800.0f64, 900.0],
            "RICE PRODUCTION (1000 tons)" => [8.0f64, 10.8],
        )
        .unwrap();

        let report = analyze(&df, &AnalysisOptions::default()).unwrap();
        assert!(report.charts[0].is_ok());
        assert!(matches!(
            report.charts[3],
            Err(ChartError::NonNumericData(_))
        ));
        assert!(matches!(
            report.charts[4],
            Err(ChartError::NonNumericData(_))
        ));
    }

    #[test]
    fn numeric_text_columns_still_plot() {
        let df = df!(
            "Year" => [1966i64, 1967],
            "State Name" => ["Bihar", "Bihar"],
            "Dist Name" => ["Patna", "Patna"],
            "RICE AREA (1000 ha)" => ["10.5", "12.0"],
            "RICE YIELD (Kg per ha)" => [800.0f64, 900.0],
            "RICE PRODUCTION (1000 tons)" => [8.0f64, 10.8],
        )
        .unwrap();

        let report = analyze(&df, &AnalysisOptions::default()).unwrap();
        let ChartFigure::ScatterPairs(pair) = report.charts[3].as_ref().unwrap() else {
            panic!("wrong figure in slot 3");
        };
        assert_eq!(pair.left.points[0], [10.5, 800.0]);
    }
}
