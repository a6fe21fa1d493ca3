//! Charts module - figure models and their two renderers

pub mod figure;
mod plotter;
mod renderer;

pub use figure::{
    series_color, ChartFigure, CorrelationChart, CropSeries, HeatmapChart, RankedBarChart,
    ScatterPairChart, ScatterPanel, StackedAreaChart, TrendChart,
};
pub use plotter::ChartPlotter;
pub use renderer::{chart_file_name, StaticChartRenderer, PNG_SIZE};
