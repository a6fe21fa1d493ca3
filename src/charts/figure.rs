//! Chart Figure Module
//! Renderer-agnostic chart data built by the analysis pass and consumed by
//! both the interactive and the PNG renderers.

use crate::stats::CorrelationMatrix;

/// Series color palette, shared by both renderers.
pub const SERIES_PALETTE: [(u8, u8, u8); 10] = [
    (231, 76, 60),  // Red
    (46, 204, 113), // Green
    (155, 89, 182), // Purple
    (243, 156, 18), // Orange
    (26, 188, 156), // Teal
    (233, 30, 99),  // Pink
    (0, 188, 212),  // Cyan
    (255, 87, 34),  // Deep Orange
    (121, 85, 72),  // Brown
    (96, 125, 139), // Blue Grey
];

/// Color for the n-th series of a chart.
pub fn series_color(index: usize) -> (u8, u8, u8) {
    SERIES_PALETTE[index % SERIES_PALETTE.len()]
}

/// One named line or band of per-x values.
#[derive(Debug, Clone)]
pub struct CropSeries {
    pub label: String,
    pub values: Vec<f64>,
}

/// Multi-series line chart over an ordered x axis.
#[derive(Debug, Clone)]
pub struct TrendChart {
    pub title: String,
    pub x_labels: Vec<String>,
    pub y_label: String,
    pub series: Vec<CropSeries>,
}

/// Stacked band chart over an ordered x axis. Bands stack in series order.
#[derive(Debug, Clone)]
pub struct StackedAreaChart {
    pub title: String,
    pub x_labels: Vec<String>,
    pub y_label: String,
    pub series: Vec<CropSeries>,
}

/// Annotated grid of values.
#[derive(Debug, Clone)]
pub struct HeatmapChart {
    pub title: String,
    pub row_labels: Vec<String>,
    pub col_labels: Vec<String>,
    /// Row-major, `values[row][col]`.
    pub values: Vec<Vec<f64>>,
}

impl HeatmapChart {
    /// Finite min and max of the grid, for color scaling.
    pub fn value_range(&self) -> (f64, f64) {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for row in &self.values {
            for &v in row {
                if v.is_finite() {
                    min = min.min(v);
                    max = max.max(v);
                }
            }
        }
        if min > max {
            (0.0, 1.0)
        } else {
            (min, max)
        }
    }
}

/// One scatter panel of raw observations.
#[derive(Debug, Clone)]
pub struct ScatterPanel {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<[f64; 2]>,
}

/// Two scatter panels shown side by side.
#[derive(Debug, Clone)]
pub struct ScatterPairChart {
    pub title: String,
    pub left: ScatterPanel,
    pub right: ScatterPanel,
}

/// Correlation matrix heatmap for one crop's metrics.
#[derive(Debug, Clone)]
pub struct CorrelationChart {
    pub title: String,
    pub matrix: CorrelationMatrix,
}

/// Ranked horizontal categories with one value each.
#[derive(Debug, Clone)]
pub struct RankedBarChart {
    pub title: String,
    pub y_label: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

/// Every chart the pipeline produces, in its fixed display order.
#[derive(Debug, Clone)]
pub enum ChartFigure {
    YieldTrends(TrendChart),
    StateYieldHeatmap(HeatmapChart),
    CultivatedArea(StackedAreaChart),
    ScatterPairs(ScatterPairChart),
    CorrelationMatrix(CorrelationChart),
    TopDistricts(RankedBarChart),
}

impl ChartFigure {
    pub fn title(&self) -> &str {
        match self {
            ChartFigure::YieldTrends(c) => &c.title,
            ChartFigure::StateYieldHeatmap(c) => &c.title,
            ChartFigure::CultivatedArea(c) => &c.title,
            ChartFigure::ScatterPairs(c) => &c.title,
            ChartFigure::CorrelationMatrix(c) => &c.title,
            ChartFigure::TopDistricts(c) => &c.title,
        }
    }

    /// Stable file-name stem for the PNG renderer.
    pub fn slug(&self) -> &'static str {
        match self {
            ChartFigure::YieldTrends(_) => "yield_trends",
            ChartFigure::StateYieldHeatmap(_) => "top_states_yield",
            ChartFigure::CultivatedArea(_) => "cultivated_area",
            ChartFigure::ScatterPairs(_) => "scatter_pairs",
            ChartFigure::CorrelationMatrix(_) => "correlation_matrix",
            ChartFigure::TopDistricts(_) => "top_districts",
        }
    }
}

/// Sequential ramp for value heatmaps, light yellow through green to deep
/// blue. `t` in [0, 1].
pub fn sequential_color(t: f64) -> (u8, u8, u8) {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        lerp((255, 255, 217), (127, 205, 187), t * 2.0)
    } else {
        lerp((127, 205, 187), (34, 94, 168), (t - 0.5) * 2.0)
    }
}

/// Diverging ramp for correlation heatmaps, blue through white to red.
/// `t` in [-1, 1]; NaN maps to grey.
pub fn diverging_color(t: f64) -> (u8, u8, u8) {
    if t.is_nan() {
        return (160, 160, 160);
    }
    let t = t.clamp(-1.0, 1.0);
    if t < 0.0 {
        lerp((59, 76, 192), (240, 240, 240), t + 1.0)
    } else {
        lerp((240, 240, 240), (180, 4, 38), t)
    }
}

fn lerp(a: (u8, u8, u8), b: (u8, u8, u8), t: f64) -> (u8, u8, u8) {
    let t = t.clamp(0.0, 1.0);
    let ch = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
    (ch(a.0, b.0), ch(a.1, b.1), ch(a.2, b.2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_wraps_around() {
        assert_eq!(series_color(0), SERIES_PALETTE[0]);
        assert_eq!(series_color(10), SERIES_PALETTE[0]);
        assert_eq!(series_color(13), SERIES_PALETTE[3]);
    }

    #[test]
    fn heatmap_range_ignores_nan() {
        let chart = HeatmapChart {
            title: String::new(),
            row_labels: vec![],
            col_labels: vec![],
            values: vec![vec![1.0, f64::NAN], vec![5.0, 3.0]],
        };
        assert_eq!(chart.value_range(), (1.0, 5.0));
    }

    #[test]
    fn heatmap_range_defaults_when_empty() {
        let chart = HeatmapChart {
            title: String::new(),
            row_labels: vec![],
            col_labels: vec![],
            values: vec![],
        };
        assert_eq!(chart.value_range(), (0.0, 1.0));
    }

    #[test]
    fn color_ramps_hit_their_endpoints() {
        assert_eq!(sequential_color(0.0), (255, 255, 217));
        assert_eq!(sequential_color(1.0), (34, 94, 168));
        assert_eq!(diverging_color(-1.0), (59, 76, 192));
        assert_eq!(diverging_color(1.0), (180, 4, 38));
        assert_eq!(diverging_color(f64::NAN), (160, 160, 160));
    }
}
