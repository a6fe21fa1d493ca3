//! Control Panel Widget
//! Left side panel with the data source picker and analysis settings.

use crate::data::Crop;
use crate::report::AnalysisOptions;
use egui::{Color32, ComboBox, RichText};
use std::path::PathBuf;

const ACCENT: Color32 = Color32::from_rgb(96, 170, 92);
const ERROR_COLOR: Color32 = Color32::from_rgb(220, 53, 69);
const OK_COLOR: Color32 = Color32::from_rgb(40, 167, 69);

/// User settings for a pipeline run
#[derive(Clone)]
pub struct UserSettings {
    pub csv_path: Option<PathBuf>,
    pub focus_crop: Crop,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            csv_path: None,
            focus_crop: Crop::Rice,
        }
    }
}

/// Left side control panel with file selection and run controls.
pub struct ControlPanel {
    pub settings: UserSettings,
    pub progress: f32,
    pub status: String,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            settings: UserSettings::default(),
            progress: 0.0,
            status: "Ready".to_string(),
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for the next pipeline run
    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            focus_crop: self.settings.focus_crop,
            ..AnalysisOptions::default()
        }
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(RichText::new("🌾 AgriDash").size(22.0).color(ACCENT));
            ui.label(
                RichText::new("District Crop Statistics")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });

        self.section_break(ui);
        self.show_data_source(ui, &mut action);
        self.section_break(ui);
        self.show_settings(ui);
        self.section_break(ui);
        self.show_run_button(ui, &mut action);
        self.section_break(ui);
        self.show_progress(ui);

        action
    }

    fn section_break(&self, ui: &mut egui::Ui) {
        ui.add_space(12.0);
        ui.separator();
        ui.add_space(8.0);
    }

    fn show_data_source(&mut self, ui: &mut egui::Ui, action: &mut ControlPanelAction) {
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    match &self.settings.csv_path {
                        Some(path) => {
                            let name = path
                                .file_name()
                                .map(|n| n.to_string_lossy().to_string())
                                .unwrap_or_else(|| path.display().to_string());
                            ui.label(RichText::new(name).size(12.0).color(Color32::WHITE))
                                .on_hover_text(path.display().to_string());
                        }
                        None => {
                            ui.label(
                                RichText::new("No file selected")
                                    .size(12.0)
                                    .color(Color32::GRAY),
                            );
                        }
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            *action = ControlPanelAction::BrowseCsv;
                        }
                    });
                });
            });

        ui.add_space(4.0);
        ui.label(
            RichText::new("Picking a file runs the full pipeline immediately.")
                .size(11.0)
                .color(Color32::GRAY),
        );
    }

    fn show_settings(&mut self, ui: &mut egui::Ui) {
        ui.label(RichText::new("🔧 Analysis Settings").size(14.0).strong());
        ui.add_space(8.0);

        ui.horizontal(|ui| {
            ui.add_sized([110.0, 20.0], egui::Label::new("Focus Crop:"));
            ComboBox::from_id_salt("focus_crop")
                .width(150.0)
                .selected_text(self.settings.focus_crop.label())
                .show_ui(ui, |ui| {
                    for crop in Crop::ALL {
                        ui.selectable_value(
                            &mut self.settings.focus_crop,
                            crop,
                            crop.label(),
                        );
                    }
                });
        });
        ui.add_space(5.0);
        ui.label(
            RichText::new(
                "Heatmap ranking, scatter pairs and the correlation matrix \
                 follow the focus crop.",
            )
            .size(11.0)
            .color(Color32::GRAY),
        );
    }

    fn show_run_button(&mut self, ui: &mut egui::Ui, action: &mut ControlPanelAction) {
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.settings.csv_path.is_some(), |ui| {
                let button = egui::Button::new(RichText::new("▶ Run Analysis").size(16.0))
                    .min_size(egui::vec2(200.0, 35.0));
                if ui.add(button).clicked() {
                    *action = ControlPanelAction::RunAnalysis;
                }
            });
        });
    }

    fn show_progress(&mut self, ui: &mut egui::Ui) {
        ui.label(RichText::new("📊 Progress").size(14.0).strong());
        ui.add_space(5.0);

        let in_flight = self.progress > 0.0 && self.progress < 100.0;
        ui.add(
            egui::ProgressBar::new(self.progress / 100.0)
                .show_percentage()
                .animate(in_flight),
        );
        ui.add_space(5.0);

        let status_color = if self.status.contains("Error") {
            ERROR_COLOR
        } else if self.status.contains("Complete") {
            OK_COLOR
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));
    }

    /// Set progress and status
    pub fn set_progress(&mut self, progress: f32, status: &str) {
        self.progress = progress;
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    RunAnalysis,
}
