//! Chart Plotter Module
//! Draws the analysis figures interactively with egui_plot.

use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoint, PlotPoints, Points, Polygon, Text};

use crate::charts::figure::{
    diverging_color, sequential_color, series_color, ChartFigure, CorrelationChart, HeatmapChart,
    RankedBarChart, ScatterPairChart, ScatterPanel, StackedAreaChart, TrendChart,
};

/// Plot height inside a chart card.
const PLOT_HEIGHT: f32 = 320.0;

fn to_color32(rgb: (u8, u8, u8)) -> Color32 {
    Color32::from_rgb(rgb.0, rgb.1, rgb.2)
}

/// Black on light cells, white on dark ones.
fn annotation_color(rgb: (u8, u8, u8)) -> Color32 {
    let luminance = 0.299 * rgb.0 as f64 + 0.587 * rgb.1 as f64 + 0.114 * rgb.2 as f64;
    if luminance > 140.0 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}

/// Index-position formatter: marks land on 0..n and read as the n labels.
fn index_formatter(labels: Vec<String>) -> impl Fn(egui_plot::GridMark, &std::ops::RangeInclusive<f64>) -> String {
    move |mark, _range| {
        let idx = mark.value.round() as usize;
        if (mark.value - idx as f64).abs() < 0.3 && idx < labels.len() {
            labels[idx].clone()
        } else {
            String::new()
        }
    }
}

/// Renders analysis figures with egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Draw any figure into the current card.
    pub fn draw_figure(ui: &mut egui::Ui, figure: &ChartFigure) {
        match figure {
            ChartFigure::YieldTrends(chart) => Self::draw_trend(ui, chart),
            ChartFigure::StateYieldHeatmap(chart) => Self::draw_heatmap(ui, chart),
            ChartFigure::CultivatedArea(chart) => Self::draw_stacked_area(ui, chart),
            ChartFigure::ScatterPairs(chart) => Self::draw_scatter_pair(ui, chart),
            ChartFigure::CorrelationMatrix(chart) => Self::draw_correlation(ui, chart),
            ChartFigure::TopDistricts(chart) => Self::draw_ranked_bars(ui, chart),
        }
    }

    fn draw_trend(ui: &mut egui::Ui, chart: &TrendChart) {
        Plot::new(format!("trend_{}", chart.title))
            .height(PLOT_HEIGHT)
            .allow_scroll(false)
            .x_axis_label("Year")
            .y_axis_label(chart.y_label.clone())
            .x_axis_formatter(index_formatter(chart.x_labels.clone()))
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                for (i, series) in chart.series.iter().enumerate() {
                    let points: PlotPoints = series
                        .values
                        .iter()
                        .enumerate()
                        .map(|(x, &y)| [x as f64, y])
                        .collect();
                    plot_ui.line(
                        Line::new(points)
                            .color(to_color32(series_color(i)))
                            .width(2.0)
                            .name(&series.label),
                    );
                }
            });
    }

    fn draw_stacked_area(ui: &mut egui::Ui, chart: &StackedAreaChart) {
        let n = chart.x_labels.len();

        Plot::new(format!("stacked_{}", chart.title))
            .height(PLOT_HEIGHT)
            .allow_scroll(false)
            .x_axis_label("Year")
            .y_axis_label(chart.y_label.clone())
            .x_axis_formatter(index_formatter(chart.x_labels.clone()))
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                let mut base = vec![0.0f64; n];

                for (i, series) in chart.series.iter().enumerate() {
                    let top: Vec<f64> = base
                        .iter()
                        .zip(series.values.iter())
                        .map(|(&b, &v)| b + v)
                        .collect();

                    // Band outline: along the lower edge, back along the upper.
                    let mut outline: Vec<[f64; 2]> = Vec::with_capacity(2 * n);
                    for (x, &b) in base.iter().enumerate() {
                        outline.push([x as f64, b]);
                    }
                    for (x, &t) in top.iter().enumerate().rev() {
                        outline.push([x as f64, t]);
                    }

                    let color = to_color32(series_color(i));
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::from(outline))
                            .fill_color(color.gamma_multiply(0.6))
                            .name(&series.label),
                    );

                    base = top;
                }
            });
    }

    fn draw_heatmap(ui: &mut egui::Ui, chart: &HeatmapChart) {
        let (min, max) = chart.value_range();
        let span = if max > min { max - min } else { 1.0 };
        let n_rows = chart.row_labels.len();

        // Rows are flipped so row 0 sits at the top, reading like a table.
        let row_axis: Vec<String> = chart.row_labels.iter().rev().cloned().collect();

        Plot::new(format!("heatmap_{}", chart.title))
            .height(PLOT_HEIGHT)
            .allow_scroll(false)
            .x_axis_formatter(index_formatter(chart.col_labels.clone()))
            .y_axis_formatter(index_formatter(row_axis))
            .show(ui, |plot_ui| {
                for (r, row) in chart.values.iter().enumerate() {
                    let y = (n_rows - 1 - r) as f64;
                    for (c, &value) in row.iter().enumerate() {
                        let x = c as f64;
                        let t = (value - min) / span;
                        let rgb = if value.is_finite() {
                            sequential_color(t)
                        } else {
                            (160, 160, 160)
                        };

                        plot_ui.polygon(
                            Polygon::new(PlotPoints::from(vec![
                                [x - 0.5, y - 0.5],
                                [x + 0.5, y - 0.5],
                                [x + 0.5, y + 0.5],
                                [x - 0.5, y + 0.5],
                            ]))
                            .fill_color(to_color32(rgb)),
                        );

                        let label = if value.is_finite() {
                            format!("{:.0}", value)
                        } else {
                            "-".to_string()
                        };
                        plot_ui.text(Text::new(
                            PlotPoint::new(x, y),
                            RichText::new(label)
                                .size(11.0)
                                .color(annotation_color(rgb)),
                        ));
                    }
                }
            });
    }

    fn draw_correlation(ui: &mut egui::Ui, chart: &CorrelationChart) {
        let matrix = &chart.matrix;
        let k = matrix.size();
        let row_axis: Vec<String> = matrix.labels.iter().rev().cloned().collect();

        Plot::new(format!("correlation_{}", chart.title))
            .height(PLOT_HEIGHT)
            .allow_scroll(false)
            .x_axis_formatter(index_formatter(matrix.labels.clone()))
            .y_axis_formatter(index_formatter(row_axis))
            .show(ui, |plot_ui| {
                for i in 0..k {
                    let y = (k - 1 - i) as f64;
                    for j in 0..k {
                        let x = j as f64;
                        let r = matrix.r[i][j];
                        let rgb = diverging_color(r);

                        plot_ui.polygon(
                            Polygon::new(PlotPoints::from(vec![
                                [x - 0.5, y - 0.5],
                                [x + 0.5, y - 0.5],
                                [x + 0.5, y + 0.5],
                                [x - 0.5, y + 0.5],
                            ]))
                            .fill_color(to_color32(rgb)),
                        );

                        let label = if r.is_finite() {
                            format!("{:.2}", r)
                        } else {
                            "-".to_string()
                        };
                        plot_ui.text(Text::new(
                            PlotPoint::new(x, y),
                            RichText::new(label)
                                .size(12.0)
                                .color(annotation_color(rgb)),
                        ));
                    }
                }
            });

        // Pairwise significance under the grid; * marks p at or below the
        // threshold.
        ui.add_space(4.0);
        for (i, j) in matrix.upper_pairs() {
            let marker = if matrix.significant(i, j) { " *" } else { "" };
            ui.label(
                RichText::new(format!(
                    "{} / {}: r = {:.3}, p = {:.4}{}",
                    matrix.labels[i], matrix.labels[j], matrix.r[i][j], matrix.p[i][j], marker
                ))
                .size(12.0)
                .monospace(),
            );
        }
    }

    fn draw_scatter_pair(ui: &mut egui::Ui, chart: &ScatterPairChart) {
        ui.columns(2, |columns| {
            Self::draw_scatter_panel(&mut columns[0], &chart.left, 0);
            Self::draw_scatter_panel(&mut columns[1], &chart.right, 1);
        });
    }

    fn draw_scatter_panel(ui: &mut egui::Ui, panel: &ScatterPanel, color_index: usize) {
        ui.label(RichText::new(&panel.title).strong());
        Plot::new(format!("scatter_{}", panel.title))
            .height(PLOT_HEIGHT)
            .allow_scroll(false)
            .x_axis_label(panel.x_label.clone())
            .y_axis_label(panel.y_label.clone())
            .show(ui, |plot_ui| {
                let points: PlotPoints = panel.points.iter().copied().collect();
                plot_ui.points(
                    Points::new(points)
                        .radius(2.0)
                        .color(to_color32(series_color(color_index)).gamma_multiply(0.7)),
                );
            });
    }

    fn draw_ranked_bars(ui: &mut egui::Ui, chart: &RankedBarChart) {
        let bars: Vec<Bar> = chart
            .values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                Bar::new(i as f64, v)
                    .width(0.6)
                    .fill(to_color32(series_color(i)))
                    .name(&chart.labels[i])
            })
            .collect();

        Plot::new(format!("bars_{}", chart.title))
            .height(PLOT_HEIGHT)
            .allow_scroll(false)
            .x_axis_label("District")
            .y_axis_label(chart.y_label.clone())
            .x_axis_formatter(index_formatter(chart.labels.clone()))
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars));
            });
    }
}
