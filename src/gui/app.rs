//! AgriDash Main Application
//! Main window with control panel and chart viewer.

use crate::data::read_csv_path;
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use crate::report::{analyze, AnalysisOptions, AnalysisReport};
use egui::SidePanel;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;
use tracing::info;

/// Pipeline result from the background thread
enum RunResult {
    Progress(f32, String),
    Complete {
        report: Box<AnalysisReport>,
        rows: usize,
        columns: usize,
    },
    Error(String),
}

/// Main application window.
pub struct DashboardApp {
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,

    // Async pipeline run
    run_rx: Option<Receiver<RunResult>>,
    is_running: bool,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self {
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(),
            run_rx: None,
            is_running: false,
        }
    }

    /// Handle CSV file selection. Every selection triggers a full run.
    fn handle_browse_csv(&mut self) {
        if self.is_running {
            return; // A run is already under way
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.control_panel.settings.csv_path = Some(path);
            self.start_run();
        }
    }

    /// Start the pipeline in a background thread. The file is read from
    /// disk again on every run, so edits to it are picked up.
    fn start_run(&mut self) {
        let Some(path) = self.control_panel.settings.csv_path.clone() else {
            self.control_panel.set_progress(0.0, "No file selected");
            return;
        };

        info!(path = %path.display(), "starting analysis run");

        self.chart_viewer.clear();
        self.is_running = true;
        self.control_panel.set_progress(5.0, "Reading CSV file...");

        let options = self.control_panel.analysis_options();
        let (tx, rx) = channel();
        self.run_rx = Some(rx);

        thread::spawn(move || {
            Self::run_pipeline(tx, path, options);
        });
    }

    /// Run the pipeline (called from the background thread)
    fn run_pipeline(tx: Sender<RunResult>, path: PathBuf, options: AnalysisOptions) {
        let df = match read_csv_path(&path) {
            Ok(df) => df,
            Err(e) => {
                let _ = tx.send(RunResult::Error(e.to_string()));
                return;
            }
        };

        let rows = df.height();
        let columns = df.width();
        let _ = tx.send(RunResult::Progress(40.0, "Building charts...".to_string()));

        match analyze(&df, &options) {
            Ok(report) => {
                let _ = tx.send(RunResult::Complete {
                    report: Box::new(report),
                    rows,
                    columns,
                });
            }
            Err(e) => {
                let _ = tx.send(RunResult::Error(e.to_string()));
            }
        }
    }

    /// Drain pending results from the background thread. The receiver is
    /// taken out of `self` while draining and only handed back if the run
    /// has not finished yet.
    fn check_run_results(&mut self) {
        let Some(rx) = self.run_rx.take() else {
            return;
        };

        let mut finished = false;
        while let Ok(result) = rx.try_recv() {
            match result {
                RunResult::Progress(progress, status) => {
                    self.control_panel.set_progress(progress, &status);
                }
                RunResult::Complete {
                    report,
                    rows,
                    columns,
                } => {
                    self.control_panel
                        .set_progress(100.0, &completion_status(&report, rows, columns));
                    self.chart_viewer.set_report(*report);
                    finished = true;
                }
                RunResult::Error(error) => {
                    self.control_panel
                        .set_progress(0.0, &format!("Error: {}", error));
                    finished = true;
                }
            }
        }

        if finished {
            self.is_running = false;
        } else {
            self.run_rx = Some(rx);
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_run_results();

        // Keep polling the channel while a run is under way
        if self.is_running {
            ctx.request_repaint();
        }

        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui) {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::RunAnalysis => {
                            if !self.is_running {
                                self.start_run();
                            }
                        }
                        ControlPanelAction::None => {}
                    }
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ctx, ui);
        });
    }
}

/// Status line for a finished run.
fn completion_status(report: &AnalysisReport, rows: usize, columns: usize) -> String {
    let failed = report.failed_count();
    if failed == 0 {
        format!("Complete! {} rows, {} columns", rows, columns)
    } else {
        format!(
            "Complete! {} rows, {} columns ({} of {} charts failed)",
            rows,
            columns,
            failed,
            report.chart_count()
        )
    }
}
