//! Chart Viewer Widget
//! Right side scrollable panel showing the report charts in their fixed
//! order. A failed chart keeps its slot and renders as an error card.

use crate::charts::ChartPlotter;
use crate::report::{chart_slot_name, AnalysisReport};
use egui::{Color32, RichText, ScrollArea};

const CARD_SPACING: f32 = 15.0;

const OK_BORDER: Color32 = Color32::from_rgb(40, 167, 69);
const ERROR_BORDER: Color32 = Color32::from_rgb(220, 53, 69);

/// Scrollable chart display area, one card per chart slot.
#[derive(Default)]
pub struct ChartViewer {
    report: Option<AnalysisReport>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the previous report
    pub fn clear(&mut self) {
        self.report = None;
    }

    pub fn set_report(&mut self, report: AnalysisReport) {
        self.report = Some(report);
    }

    /// Draw the chart cards in report order
    pub fn show(&mut self, _ctx: &egui::Context, ui: &mut egui::Ui) {
        let Some(report) = &self.report else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("Pick a CSV file to build the dashboard").size(20.0));
            });
            return;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                egui::CollapsingHeader::new(RichText::new("Dataset Summary").size(14.0).strong())
                    .default_open(false)
                    .show(ui, |ui| {
                        ui.monospace(report.summary.render_table());
                    });
                ui.add_space(CARD_SPACING);

                for (index, entry) in report.charts.iter().enumerate() {
                    match entry {
                        Ok(figure) => {
                            egui::Frame::none()
                                .rounding(8.0)
                                .stroke(egui::Stroke::new(1.0, OK_BORDER))
                                .fill(ui.visuals().widgets.noninteractive.bg_fill)
                                .inner_margin(12.0)
                                .show(ui, |ui| {
                                    ui.label(
                                        RichText::new(figure.title()).size(18.0).strong(),
                                    );
                                    ui.add_space(8.0);
                                    ChartPlotter::draw_figure(ui, figure);
                                });
                        }
                        Err(error) => {
                            egui::Frame::none()
                                .rounding(8.0)
                                .stroke(egui::Stroke::new(2.0, ERROR_BORDER))
                                .fill(ui.visuals().widgets.noninteractive.bg_fill)
                                .inner_margin(12.0)
                                .show(ui, |ui| {
                                    ui.label(
                                        RichText::new(format!(
                                            "⚠ {}",
                                            chart_slot_name(index)
                                        ))
                                        .size(18.0)
                                        .strong()
                                        .color(ERROR_BORDER),
                                    );
                                    ui.add_space(4.0);
                                    ui.label(RichText::new(error.to_string()).size(13.0));
                                });
                        }
                    }
                    ui.add_space(CARD_SPACING);
                }
            });
    }
}
