//! Chart Viewer Widget
//! Central panel showing the selected chart in a titled card.

use crate::charts::{ChartData, ChartKind, ChartPlotter};
use egui::RichText;
use std::collections::HashMap;

/// Holds the built charts, keyed by kind.
#[derive(Default)]
pub struct ChartViewer {
    pub charts: HashMap<ChartKind, ChartData>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the chart of the same kind
    pub fn set_chart(&mut self, chart: ChartData) {
        self.charts.insert(chart.kind(), chart);
    }

    pub fn get_chart(&self, kind: ChartKind) -> Option<&ChartData> {
        self.charts.get(&kind)
    }

    /// Draw the selected chart filling the available space
    pub fn show(&self, ui: &mut egui::Ui, selected: ChartKind) {
        let Some(chart) = self.charts.get(&selected) else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        egui::Frame::none()
            .rounding(8.0)
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(selected.title()).size(18.0).strong());
                    ui.label(RichText::new(chart.summary()).size(12.0).weak());
                });
                ui.add_space(8.0);
                ChartPlotter::draw(ui, chart);
            });
    }
}
