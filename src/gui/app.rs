//! Assignment Charts Main Application
//! Main window with control panel and chart viewer.

use crate::charts::{ChartData, ChartKind, StaticChartRenderer};
use crate::config::ChartConfig;
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use crate::pipeline::{self, ChartSources};
use egui::SidePanel;
use std::path::PathBuf;
use tracing::{info, warn};

/// Main application window.
pub struct ChartsApp {
    config: ChartConfig,
    sources: ChartSources,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
}

impl ChartsApp {
    /// Create the window state from charts already built at startup.
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: ChartConfig,
        sources: ChartSources,
        charts: Vec<ChartData>,
    ) -> Self {
        let mut app = Self {
            config,
            sources,
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(),
        };
        for chart in charts {
            let kind = chart.kind();
            let path = app.sources.path(kind).to_path_buf();
            app.control_panel
                .set_entry(kind, path, &chart.summary(), false);
            app.chart_viewer.set_chart(chart);
        }
        app
    }

    /// Rebuild one chart from `path`; on failure the previous chart stays visible
    fn rebuild(&mut self, kind: ChartKind, path: PathBuf) {
        match pipeline::build_chart(kind, &path, &self.config) {
            Ok(chart) => {
                let summary = chart.summary();
                self.sources.set_path(kind, path.clone());
                self.control_panel.set_entry(kind, path, &summary, false);
                self.control_panel
                    .set_status(&format!("{} rebuilt", kind.title()));
                self.chart_viewer.set_chart(chart);
            }
            Err(e) => {
                warn!(chart = kind.file_stem(), error = %e, "rebuild failed");
                self.control_panel
                    .set_failure(kind, &path, &e.to_string());
            }
        }
    }

    /// Handle CSV file selection for one chart
    fn handle_browse_csv(&mut self, kind: ChartKind) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.control_panel.selected = kind;
            self.rebuild(kind, path);
        }
    }

    fn handle_reload(&mut self, kind: ChartKind) {
        let path = self.sources.path(kind).to_path_buf();
        self.rebuild(kind, path);
    }

    /// Handle PNG export of the selected chart
    fn handle_export_png(&mut self, kind: ChartKind) {
        let Some(chart) = self.chart_viewer.get_chart(kind) else {
            self.control_panel.set_status("No chart to export");
            return;
        };

        let output_path = match rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name(format!("{}.png", kind.file_stem()))
            .save_file()
        {
            Some(path) => path,
            None => return, // User cancelled
        };

        let (width, height) = StaticChartRenderer::default_size(kind);
        match StaticChartRenderer::render_chart_png(chart, &output_path, width, height) {
            Ok(()) => {
                info!(path = %output_path.display(), "exported chart");
                self.control_panel
                    .set_status(&format!("Exported {}", output_path.display()));
            }
            Err(e) => {
                warn!(error = %e, "export failed");
                self.control_panel
                    .set_status(&format!("Export error: {}", e));
            }
        }
    }
}

impl eframe::App for ChartsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::BrowseCsv(kind) => self.handle_browse_csv(kind),
                        ControlPanelAction::Reload(kind) => self.handle_reload(kind),
                        ControlPanelAction::ExportPng(kind) => self.handle_export_png(kind),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        let selected = self.control_panel.selected;
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui, selected);
        });
    }
}
