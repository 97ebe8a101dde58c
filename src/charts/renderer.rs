//! Static Chart Renderer
//! Writes the bar, Sankey and network charts to PNG with plotters.
//!
//! Colors, annotations and the Sankey geometry match the interactive viewer:
//! 1. Bar: red "No" segment, blue "Yes" segment stacked after it, white counts
//! 2. Sankey: gray translucent bands between node bars, names beside nodes
//! 3. Network: gray edges, group-colored markers with names underneath

use crate::charts::SankeyLayout;
use crate::charts::plotter::{ChartData, ChartKind};
use crate::config::Rgba;
use crate::data::{Answer, BarChartData, NetworkData, NodeGroup, SankeyData, Tier};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

// Colors
const NO_RED: RGBColor = RGBColor(255, 0, 0);
const YES_BLUE: RGBColor = RGBColor(0, 0, 255);
const NODE_BLUE: RGBColor = RGBColor(31, 119, 180);
const GREEN_NODE: RGBColor = RGBColor(0, 128, 0);
const GOLD_NODE: RGBColor = RGBColor(255, 215, 0);
const GRAY_NODE: RGBColor = RGBColor(128, 128, 128);
const EDGE_GRAY: RGBColor = RGBColor(136, 136, 136);

const FONT: &str = "sans-serif";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing failed: {0}")]
    Drawing(String),
    #[error("Cannot write images: {0}")]
    Io(#[from] std::io::Error),
}

fn draw_err<E: std::error::Error + Send + Sync>(err: DrawingAreaErrorKind<E>) -> RenderError {
    RenderError::Drawing(err.to_string())
}

fn group_color(group: NodeGroup) -> RGBColor {
    match group {
        NodeGroup::Inner => YES_BLUE,
        NodeGroup::FirstOuter => GREEN_NODE,
        NodeGroup::SecondOuter => GOLD_NODE,
        NodeGroup::Unclassified => GRAY_NODE,
    }
}

fn link_style(color: Rgba) -> RGBAColor {
    RGBColor(color.r, color.g, color.b).mix(color.a as f64)
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render one chart to a PNG file
    pub fn render_chart_png(
        chart: &ChartData,
        path: &Path,
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
        Self::render_on(&root, chart)?;
        root.present().map_err(draw_err)?;
        Ok(())
    }

    /// Draw a chart on any plotters backend
    pub fn render_on<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        chart: &ChartData,
    ) -> Result<(), RenderError> {
        root.fill(&WHITE).map_err(draw_err)?;
        match chart {
            ChartData::Bar(data) => Self::draw_bar_chart(root, data),
            ChartData::Sankey(data, layout) => Self::draw_sankey(root, data, layout),
            ChartData::Network(data) => Self::draw_network(root, data),
        }
    }

    /// Write every chart as `<dir>/<kind>.png` and return the written paths
    pub fn export_charts_as_png(
        charts: &[ChartData],
        dir: &Path,
    ) -> Result<Vec<PathBuf>, RenderError> {
        fs::create_dir_all(dir)?;

        let mut paths = Vec::with_capacity(charts.len());
        for chart in charts {
            let path = dir.join(format!("{}.png", chart.kind().file_stem()));
            let (width, height) = Self::default_size(chart.kind());
            Self::render_chart_png(chart, &path, width, height)?;
            info!(path = %path.display(), "exported chart");
            paths.push(path);
        }
        Ok(paths)
    }

    pub fn default_size(kind: ChartKind) -> (u32, u32) {
        match kind {
            ChartKind::Bar => (1000, 700),
            ChartKind::Sankey => (1200, 800),
            ChartKind::Network => (900, 900),
        }
    }

    fn draw_bar_chart<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        data: &BarChartData,
    ) -> Result<(), RenderError> {
        let rows = data.labels.len().max(1);
        let x_max = data.max_total().max(1) as f64 * 1.05;

        let mut chart = ChartBuilder::on(root)
            .caption(BarChartData::TITLE, (FONT, 24))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(90)
            .build_cartesian_2d(0f64..x_max, -0.5f64..(rows as f64 - 0.5))
            .map_err(draw_err)?;

        let labels = &data.labels;
        let label_for = |v: &f64| {
            let idx = v.round();
            if idx >= 0.0 && (idx - v).abs() < 1e-6 {
                labels.get(idx as usize).cloned().unwrap_or_default()
            } else {
                String::new()
            }
        };
        chart
            .configure_mesh()
            .disable_y_mesh()
            .x_desc("Count")
            .y_desc("Label")
            .y_labels(rows)
            .y_label_formatter(&label_for)
            .draw()
            .map_err(draw_err)?;

        chart
            .draw_series(data.no_counts.iter().enumerate().map(|(i, &no)| {
                let y = i as f64;
                Rectangle::new([(0.0, y - 0.35), (no as f64, y + 0.35)], NO_RED.filled())
            }))
            .map_err(draw_err)?
            .label(Answer::No.as_str())
            .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], NO_RED.filled()));

        chart
            .draw_series(
                data.no_counts
                    .iter()
                    .zip(&data.yes_counts)
                    .enumerate()
                    .map(|(i, (&no, &yes))| {
                        let y = i as f64;
                        Rectangle::new(
                            [(no as f64, y - 0.35), ((no + yes) as f64, y + 0.35)],
                            YES_BLUE.filled(),
                        )
                    }),
            )
            .map_err(draw_err)?
            .label(Answer::Yes.as_str())
            .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], YES_BLUE.filled()));

        let note_style = (FONT, 16)
            .into_font()
            .color(&WHITE)
            .pos(Pos::new(HPos::Center, VPos::Center));
        chart
            .draw_series(data.annotations().into_iter().map(|note| {
                Text::new(note.text, (note.x, note.row as f64), note_style.clone())
            }))
            .map_err(draw_err)?;

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(draw_err)?;

        Ok(())
    }

    fn draw_sankey<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        data: &SankeyData,
        layout: &SankeyLayout,
    ) -> Result<(), RenderError> {
        let mut chart = ChartBuilder::on(root)
            .caption(SankeyData::TITLE, (FONT, 24))
            .margin(20)
            .build_cartesian_2d(-0.12f64..1.12, -0.02f64..1.02)
            .map_err(draw_err)?;

        let band_style = link_style(data.link_color).filled();
        chart
            .draw_series(layout.bands.iter().map(|band| {
                let points: Vec<(f64, f64)> = band.outline.iter().map(|&[x, y]| (x, y)).collect();
                Polygon::new(points, band_style)
            }))
            .map_err(draw_err)?;

        chart
            .draw_series(layout.nodes.iter().map(|rect| {
                Rectangle::new([(rect.x0, rect.y0), (rect.x1, rect.y1)], NODE_BLUE.filled())
            }))
            .map_err(draw_err)?;
        chart
            .draw_series(layout.nodes.iter().map(|rect| {
                Rectangle::new(
                    [(rect.x0, rect.y0), (rect.x1, rect.y1)],
                    BLACK.stroke_width(1),
                )
            }))
            .map_err(draw_err)?;

        let label_font = (FONT, 13).into_font().color(&BLACK);
        chart
            .draw_series(data.nodes.iter().zip(&layout.nodes).map(|(node, rect)| {
                let (x, hpos) = match node.tier {
                    Tier::Target => (rect.x0 - 0.01, HPos::Right),
                    Tier::Source | Tier::Label => (rect.x1 + 0.01, HPos::Left),
                };
                Text::new(
                    node.name.clone(),
                    (x, rect.center_y()),
                    label_font.clone().pos(Pos::new(hpos, VPos::Center)),
                )
            }))
            .map_err(draw_err)?;

        Ok(())
    }

    fn draw_network<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        data: &NetworkData,
    ) -> Result<(), RenderError> {
        let extent = data
            .nodes
            .iter()
            .map(|n| n.x.abs().max(n.y.abs()))
            .fold(1.0f64, f64::max)
            + 0.6;

        let mut chart = ChartBuilder::on(root)
            .margin(10)
            .build_cartesian_2d(-extent..extent, -extent..extent)
            .map_err(draw_err)?;

        chart
            .draw_series(data.edges.iter().map(|edge| {
                let a = &data.nodes[edge.a];
                let b = &data.nodes[edge.b];
                PathElement::new(vec![(a.x, a.y), (b.x, b.y)], EDGE_GRAY.stroke_width(1))
            }))
            .map_err(draw_err)?;

        let name_font = (FONT, 14)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Top));
        chart
            .draw_series(data.nodes.iter().map(|node| {
                EmptyElement::at((node.x, node.y))
                    + Circle::new((0, 0), 15, group_color(node.group).filled())
                    + Circle::new((0, 0), 15, BLACK.stroke_width(1))
                    + Text::new(node.name.clone(), (0, 18), name_font.clone())
            }))
            .map_err(draw_err)?;

        Ok(())
    }
}
