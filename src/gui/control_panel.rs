//! Control Panel Widget
//! Left side panel listing the three charts with their source files.

use crate::charts::ChartKind;
use egui::{Color32, RichText};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Source file and last build result for one chart.
#[derive(Debug, Clone, Default)]
pub struct ChartEntry {
    pub path: Option<PathBuf>,
    pub status: String,
    pub is_error: bool,
}

/// Left side control panel with chart selection and file controls.
pub struct ControlPanel {
    pub selected: ChartKind,
    pub entries: HashMap<ChartKind, ChartEntry>,
    pub status: String,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            selected: ChartKind::Bar,
            entries: HashMap::new(),
            status: "Ready".to_string(),
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of (re)building a chart
    pub fn set_entry(&mut self, kind: ChartKind, path: PathBuf, status: &str, is_error: bool) {
        self.entries.insert(
            kind,
            ChartEntry {
                path: Some(path),
                status: status.to_string(),
                is_error,
            },
        );
    }

    /// Record a failed rebuild; the entry keeps the file of the chart still shown
    pub fn set_failure(&mut self, kind: ChartKind, failed: &Path, error: &str) {
        let entry = self.entries.entry(kind).or_default();
        entry.status = format!("Error: {}", error);
        entry.is_error = true;
        self.status = format!("Rebuild from {} failed", failed.display());
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📊 Assignment Charts")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        ui.label(RichText::new("📁 Charts").size(14.0).strong());
        ui.add_space(5.0);

        for kind in ChartKind::ALL {
            let entry = self.entries.get(&kind).cloned().unwrap_or_default();

            egui::Frame::none()
                .fill(ui.visuals().widgets.noninteractive.bg_fill)
                .rounding(5.0)
                .inner_margin(8.0)
                .show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.radio_value(
                        &mut self.selected,
                        kind,
                        RichText::new(kind.title()).size(13.0).strong(),
                    );

                    let file_name = entry
                        .path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());
                    ui.label(RichText::new(file_name).size(12.0));

                    let status_color = if entry.is_error {
                        Color32::from_rgb(220, 53, 69)
                    } else {
                        Color32::GRAY
                    };
                    ui.label(RichText::new(&entry.status).size(11.0).color(status_color));

                    ui.horizontal(|ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseCsv(kind);
                        }
                        if ui.button("🔄 Reload").clicked() {
                            action = ControlPanelAction::Reload(kind);
                        }
                    });
                });
            ui.add_space(6.0);
        }

        ui.add_space(10.0);
        ui.separator();
        ui.add_space(10.0);

        ui.vertical_centered(|ui| {
            let button = egui::Button::new(RichText::new("💾 Export PNG").size(14.0))
                .min_size(egui::vec2(200.0, 32.0));
            if ui.add(button).clicked() {
                action = ControlPanelAction::ExportPng(self.selected);
            }
        });

        ui.add_space(10.0);
        ui.label(RichText::new(&self.status).size(11.0).color(Color32::GRAY));

        action
    }

    /// Set status line
    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv(ChartKind),
    Reload(ChartKind),
    ExportPng(ChartKind),
}
