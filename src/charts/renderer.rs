//! Static Chart Renderer Module
//! Writes the analysis figures to PNG files with plotters.

use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;

use crate::charts::figure::{
    diverging_color, sequential_color, series_color, ChartFigure, CorrelationChart, HeatmapChart,
    RankedBarChart, ScatterPairChart, ScatterPanel, StackedAreaChart, TrendChart,
};

/// Output size of every generated PNG.
pub const PNG_SIZE: (u32, u32) = (1280, 720);

fn to_rgb(rgb: (u8, u8, u8)) -> RGBColor {
    RGBColor(rgb.0, rgb.1, rgb.2)
}

/// File name of a chart at its position in the report sequence.
pub fn chart_file_name(index: usize, figure: &ChartFigure) -> String {
    format!("{:02}_{}.png", index + 1, figure.slug())
}

/// Renders analysis figures to PNG files.
pub struct StaticChartRenderer;

impl StaticChartRenderer {
    pub fn render_png(figure: &ChartFigure, path: &Path) -> Result<()> {
        let root = BitMapBackend::new(path, PNG_SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        match figure {
            ChartFigure::YieldTrends(chart) => Self::draw_trend(&root, chart)?,
            ChartFigure::StateYieldHeatmap(chart) => Self::draw_heatmap(&root, chart)?,
            ChartFigure::CultivatedArea(chart) => Self::draw_stacked_area(&root, chart)?,
            ChartFigure::ScatterPairs(chart) => Self::draw_scatter_pair(&root, chart)?,
            ChartFigure::CorrelationMatrix(chart) => Self::draw_correlation(&root, chart)?,
            ChartFigure::TopDistricts(chart) => Self::draw_ranked_bars(&root, chart)?,
        }

        root.present()?;
        Ok(())
    }

    fn draw_trend(root: &DrawingArea<BitMapBackend, Shift>, chart: &TrendChart) -> Result<()> {
        let n = chart.x_labels.len();
        if n == 0 || chart.series.is_empty() {
            return Self::draw_placeholder(root, &chart.title);
        }

        let y_max = padded_max(chart.series.iter().flat_map(|s| s.values.iter().copied()));
        let x_labels = chart.x_labels.clone();

        let mut cc = ChartBuilder::on(root)
            .caption(&chart.title, ("sans-serif", 28).into_font())
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(70)
            .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), 0f64..y_max)?;

        cc.configure_mesh()
            .x_desc("Year")
            .y_desc(chart.y_label.clone())
            .x_labels(n.min(20))
            .x_label_formatter(&move |x| index_label(*x, &x_labels))
            .draw()?;

        for (i, series) in chart.series.iter().enumerate() {
            let color = to_rgb(series_color(i));
            cc.draw_series(LineSeries::new(
                series
                    .values
                    .iter()
                    .enumerate()
                    .map(|(x, &y)| (x as f64, y)),
                color.stroke_width(2),
            ))?
            .label(&series.label)
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });
        }

        cc.configure_series_labels()
            .background_style(WHITE.mix(0.85))
            .border_style(BLACK)
            .draw()?;
        Ok(())
    }

    fn draw_stacked_area(
        root: &DrawingArea<BitMapBackend, Shift>,
        chart: &StackedAreaChart,
    ) -> Result<()> {
        let n = chart.x_labels.len();
        if n == 0 || chart.series.is_empty() {
            return Self::draw_placeholder(root, &chart.title);
        }

        let totals: Vec<f64> = (0..n)
            .map(|x| chart.series.iter().map(|s| s.values[x]).sum())
            .collect();
        let y_max = padded_max(totals.iter().copied());
        let x_labels = chart.x_labels.clone();

        let mut cc = ChartBuilder::on(root)
            .caption(&chart.title, ("sans-serif", 28).into_font())
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(70)
            .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), 0f64..y_max)?;

        cc.configure_mesh()
            .x_desc("Year")
            .y_desc(chart.y_label.clone())
            .x_labels(n.min(20))
            .x_label_formatter(&move |x| index_label(*x, &x_labels))
            .draw()?;

        let mut base = vec![0.0f64; n];
        for (i, series) in chart.series.iter().enumerate() {
            let top: Vec<f64> = base
                .iter()
                .zip(series.values.iter())
                .map(|(&b, &v)| b + v)
                .collect();

            // Band outline: along the lower edge, back along the upper.
            let mut band: Vec<(f64, f64)> = Vec::with_capacity(2 * n);
            for (x, &b) in base.iter().enumerate() {
                band.push((x as f64, b));
            }
            for (x, &t) in top.iter().enumerate().rev() {
                band.push((x as f64, t));
            }

            let color = to_rgb(series_color(i));
            cc.draw_series(std::iter::once(Polygon::new(band, color.mix(0.7).filled())))?
                .label(&series.label)
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 14, y + 5)], color.filled())
                });

            base = top;
        }

        cc.configure_series_labels()
            .background_style(WHITE.mix(0.85))
            .border_style(BLACK)
            .draw()?;
        Ok(())
    }

    fn draw_heatmap(root: &DrawingArea<BitMapBackend, Shift>, chart: &HeatmapChart) -> Result<()> {
        let n_rows = chart.row_labels.len();
        let n_cols = chart.col_labels.len();
        if n_rows == 0 || n_cols == 0 {
            return Self::draw_placeholder(root, &chart.title);
        }

        let (min, max) = chart.value_range();
        let span = if max > min { max - min } else { 1.0 };

        Self::draw_grid(
            root,
            &chart.title,
            &chart.col_labels,
            &chart.row_labels,
            |r, c| {
                let value = chart.values[r][c];
                let fill = if value.is_finite() {
                    sequential_color((value - min) / span)
                } else {
                    (160, 160, 160)
                };
                let label = if value.is_finite() {
                    format!("{:.0}", value)
                } else {
                    "-".to_string()
                };
                (fill, label)
            },
            true,
        )
    }

    fn draw_correlation(
        root: &DrawingArea<BitMapBackend, Shift>,
        chart: &CorrelationChart,
    ) -> Result<()> {
        let matrix = &chart.matrix;
        if matrix.size() == 0 {
            return Self::draw_placeholder(root, &chart.title);
        }

        Self::draw_grid(
            root,
            &chart.title,
            &matrix.labels,
            &matrix.labels,
            |r, c| {
                let value = matrix.r[r][c];
                let label = if value.is_finite() {
                    format!("{:.2}", value)
                } else {
                    "-".to_string()
                };
                (diverging_color(value), label)
            },
            false,
        )
    }

    /// Shared annotated-grid renderer for both heatmaps. Cells sit centered
    /// on integer coordinates with row 0 at the top.
    fn draw_grid(
        root: &DrawingArea<BitMapBackend, Shift>,
        title: &str,
        col_labels: &[String],
        row_labels: &[String],
        cell: impl Fn(usize, usize) -> ((u8, u8, u8), String),
        rotate_x_labels: bool,
    ) -> Result<()> {
        let n_rows = row_labels.len();
        let n_cols = col_labels.len();

        let x_axis: Vec<String> = col_labels.to_vec();
        let y_axis: Vec<String> = row_labels.iter().rev().cloned().collect();

        let x_label_style = if rotate_x_labels {
            TextStyle::from(("sans-serif", 13).into_font()).transform(FontTransform::Rotate90)
        } else {
            TextStyle::from(("sans-serif", 13).into_font())
        };

        let mut cc = ChartBuilder::on(root)
            .caption(title, ("sans-serif", 28).into_font())
            .margin(15)
            .x_label_area_size(if rotate_x_labels { 130 } else { 45 })
            .y_label_area_size(130)
            .build_cartesian_2d(
                -0.5f64..(n_cols as f64 - 0.5),
                -0.5f64..(n_rows as f64 - 0.5),
            )?;

        cc.configure_mesh()
            .disable_x_mesh()
            .disable_y_mesh()
            .x_labels(n_cols)
            .y_labels(n_rows)
            .x_label_style(x_label_style)
            .y_label_style(("sans-serif", 13).into_font())
            .x_label_formatter(&move |x| index_label(*x, &x_axis))
            .y_label_formatter(&move |y| index_label(*y, &y_axis))
            .draw()?;

        for r in 0..n_rows {
            let y = (n_rows - 1 - r) as f64;
            for c in 0..n_cols {
                let x = c as f64;
                let (fill, label) = cell(r, c);

                cc.draw_series(std::iter::once(Rectangle::new(
                    [(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)],
                    to_rgb(fill).filled(),
                )))?;

                let text_color = annotation_rgb(fill);
                let style = TextStyle::from(("sans-serif", 14).into_font())
                    .pos(Pos::new(HPos::Center, VPos::Center))
                    .color(&text_color);
                cc.draw_series(std::iter::once(Text::new(label, (x, y), style)))?;
            }
        }

        Ok(())
    }

    fn draw_scatter_pair(
        root: &DrawingArea<BitMapBackend, Shift>,
        chart: &ScatterPairChart,
    ) -> Result<()> {
        let panels = root.split_evenly((1, 2));
        Self::draw_scatter_panel(&panels[0], &chart.left, 0)?;
        Self::draw_scatter_panel(&panels[1], &chart.right, 1)?;
        Ok(())
    }

    fn draw_scatter_panel(
        area: &DrawingArea<BitMapBackend, Shift>,
        panel: &ScatterPanel,
        color_index: usize,
    ) -> Result<()> {
        let (x_max, y_max) = panel
            .points
            .iter()
            .fold((0.0f64, 0.0f64), |(xm, ym), p| (xm.max(p[0]), ym.max(p[1])));

        let mut cc = ChartBuilder::on(area)
            .caption(&panel.title, ("sans-serif", 24).into_font())
            .margin(15)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(0f64..pad(x_max), 0f64..pad(y_max))?;

        cc.configure_mesh()
            .x_desc(panel.x_label.clone())
            .y_desc(panel.y_label.clone())
            .draw()?;

        let color = to_rgb(series_color(color_index));
        cc.draw_series(
            panel
                .points
                .iter()
                .map(|p| Circle::new((p[0], p[1]), 3, color.mix(0.6).filled())),
        )?;
        Ok(())
    }

    fn draw_ranked_bars(
        root: &DrawingArea<BitMapBackend, Shift>,
        chart: &RankedBarChart,
    ) -> Result<()> {
        let n = chart.labels.len();
        if n == 0 {
            return Self::draw_placeholder(root, &chart.title);
        }

        let y_max = padded_max(chart.values.iter().copied());
        let x_labels = chart.labels.clone();

        let mut cc = ChartBuilder::on(root)
            .caption(&chart.title, ("sans-serif", 28).into_font())
            .margin(15)
            .x_label_area_size(140)
            .y_label_area_size(70)
            .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), 0f64..y_max)?;

        cc.configure_mesh()
            .disable_x_mesh()
            .y_desc(chart.y_label.clone())
            .x_labels(n)
            .x_label_style(
                TextStyle::from(("sans-serif", 13).into_font()).transform(FontTransform::Rotate90),
            )
            .x_label_formatter(&move |x| index_label(*x, &x_labels))
            .draw()?;

        cc.draw_series(chart.values.iter().enumerate().map(|(i, &v)| {
            Rectangle::new(
                [(i as f64 - 0.3, 0.0), (i as f64 + 0.3, v)],
                to_rgb(series_color(i)).mix(0.9).filled(),
            )
        }))?;
        Ok(())
    }

    fn draw_placeholder(root: &DrawingArea<BitMapBackend, Shift>, title: &str) -> Result<()> {
        root.draw_text(
            title,
            &TextStyle::from(("sans-serif", 28).into_font()),
            (40, 40),
        )?;
        root.draw_text(
            "No matching columns in this table",
            &TextStyle::from(("sans-serif", 18).into_font()).color(&RGBColor(120, 120, 120)),
            (40, 90),
        )?;
        Ok(())
    }
}

/// Label for an integer-centered mark, empty off the marks.
fn index_label(value: f64, labels: &[String]) -> String {
    let idx = value.round();
    if (value - idx).abs() > 0.3 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

/// Upper axis bound with a little headroom.
fn pad(max: f64) -> f64 {
    if max.is_finite() && max > 0.0 {
        max * 1.05
    } else {
        1.0
    }
}

fn padded_max(values: impl Iterator<Item = f64>) -> f64 {
    pad(values.fold(0.0f64, f64::max))
}

fn annotation_rgb(rgb: (u8, u8, u8)) -> RGBColor {
    let luminance = 0.299 * rgb.0 as f64 + 0.587 * rgb.1 as f64 + 0.114 * rgb.2 as f64;
    if luminance > 140.0 {
        RGBColor(0, 0, 0)
    } else {
        RGBColor(255, 255, 255)
    }
}
