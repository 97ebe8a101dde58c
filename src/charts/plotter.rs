//! Chart Plotter Module
//! Creates interactive visualizations using egui_plot.

use crate::charts::SankeyLayout;
use crate::config::Rgba;
use crate::data::{Answer, BarChartData, NetworkData, NodeGroup, SankeyData, Tier};
use egui::{Align2, Color32, RichText, Stroke};
use egui_plot::{
    Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoint, PlotPoints, Points, Polygon, Text,
};

pub const NO_COLOR: Color32 = Color32::from_rgb(255, 0, 0); // Red
pub const YES_COLOR: Color32 = Color32::from_rgb(0, 0, 255); // Blue
pub const ANNOTATION_COLOR: Color32 = Color32::WHITE;

pub const INNER_COLOR: Color32 = Color32::from_rgb(0, 0, 255); // Blue
pub const FIRST_OUTER_COLOR: Color32 = Color32::from_rgb(0, 128, 0); // Green
pub const SECOND_OUTER_COLOR: Color32 = Color32::from_rgb(255, 215, 0); // Gold
pub const UNCLASSIFIED_COLOR: Color32 = Color32::from_rgb(128, 128, 128); // Gray
pub const EDGE_COLOR: Color32 = Color32::from_rgb(136, 136, 136); // #888

/// Sankey node fill
pub const NODE_COLOR: Color32 = Color32::from_rgb(31, 119, 180);

/// The three chart kinds, in startup order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Bar,
    Sankey,
    Network,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [ChartKind::Bar, ChartKind::Sankey, ChartKind::Network];

    pub fn title(self) -> &'static str {
        match self {
            ChartKind::Bar => BarChartData::TITLE,
            ChartKind::Sankey => SankeyData::TITLE,
            ChartKind::Network => "Network Graph",
        }
    }

    /// Base name for exported images.
    pub fn file_stem(self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::Sankey => "sankey",
            ChartKind::Network => "network",
        }
    }
}

/// A built chart ready to draw.
#[derive(Debug, Clone)]
pub enum ChartData {
    Bar(BarChartData),
    Sankey(SankeyData, SankeyLayout),
    Network(NetworkData),
}

impl ChartData {
    pub fn sankey(data: SankeyData) -> Self {
        let layout = SankeyLayout::compute(&data);
        ChartData::Sankey(data, layout)
    }

    pub fn kind(&self) -> ChartKind {
        match self {
            ChartData::Bar(_) => ChartKind::Bar,
            ChartData::Sankey(..) => ChartKind::Sankey,
            ChartData::Network(_) => ChartKind::Network,
        }
    }

    /// One-line description for status displays.
    pub fn summary(&self) -> String {
        match self {
            ChartData::Bar(bar) if bar.is_empty() => "no rows".to_string(),
            ChartData::Bar(bar) => format!("{} labels", bar.labels.len()),
            ChartData::Sankey(sankey, _) => {
                format!("{} nodes, {} links", sankey.nodes.len(), sankey.links.len())
            }
            ChartData::Network(net) => {
                format!("{} nodes, {} edges", net.nodes.len(), net.edges.len())
            }
        }
    }
}

pub fn to_color32(color: Rgba) -> Color32 {
    let alpha = (color.a.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, alpha)
}

/// Creates the three chart types using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn get_group_color(group: NodeGroup) -> Color32 {
        match group {
            NodeGroup::Inner => INNER_COLOR,
            NodeGroup::FirstOuter => FIRST_OUTER_COLOR,
            NodeGroup::SecondOuter => SECOND_OUTER_COLOR,
            NodeGroup::Unclassified => UNCLASSIFIED_COLOR,
        }
    }

    pub fn draw(ui: &mut egui::Ui, chart: &ChartData) {
        match chart {
            ChartData::Bar(data) => Self::draw_bar_chart(ui, data),
            ChartData::Sankey(data, layout) => Self::draw_sankey(ui, data, layout),
            ChartData::Network(data) => Self::draw_network(ui, data),
        }
    }

    /// Draw stacked horizontal bars with centered count annotations
    /// Y-axis: labels, X-axis: count
    pub fn draw_bar_chart(ui: &mut egui::Ui, data: &BarChartData) {
        let labels = data.labels.clone();
        let label_count = labels.len();

        let no_bars: Vec<Bar> = data
            .no_counts
            .iter()
            .enumerate()
            .map(|(i, &count)| Bar::new(i as f64, count as f64).name(&data.labels[i]))
            .collect();
        let yes_bars: Vec<Bar> = data
            .yes_counts
            .iter()
            .enumerate()
            .map(|(i, &count)| Bar::new(i as f64, count as f64).name(&data.labels[i]))
            .collect();

        let no_chart = BarChart::new(no_bars)
            .horizontal()
            .width(0.7)
            .color(NO_COLOR)
            .name(Answer::No.as_str());
        let yes_chart = BarChart::new(yes_bars)
            .horizontal()
            .width(0.7)
            .color(YES_COLOR)
            .name(Answer::Yes.as_str())
            .stack_on(&[&no_chart]);

        Plot::new("bar_chart")
            .legend(Legend::default())
            .x_axis_label("Count")
            .y_axis_label("Label")
            .include_x(0.0)
            .include_x(data.max_total().max(1) as f64)
            .include_y(-0.5)
            .include_y(label_count as f64 - 0.5)
            .allow_scroll(false)
            // One tick per bar
            .y_grid_spacer(move |_input| {
                (0..label_count)
                    .map(|i| GridMark {
                        value: i as f64,
                        step_size: 1.0,
                    })
                    .collect()
            })
            .y_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if idx >= 0.0 && (idx - mark.value).abs() < 1e-6 {
                    labels.get(idx as usize).cloned().unwrap_or_default()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(no_chart);
                plot_ui.bar_chart(yes_chart);

                for note in data.annotations() {
                    plot_ui.text(
                        Text::new(
                            PlotPoint::new(note.x, note.row as f64),
                            RichText::new(note.text).strong(),
                        )
                        .color(ANNOTATION_COLOR),
                    );
                }
            });
    }

    /// Draw Sankey nodes as bars and links as translucent bands
    pub fn draw_sankey(ui: &mut egui::Ui, data: &SankeyData, layout: &SankeyLayout) {
        let link_color = to_color32(data.link_color);

        Plot::new("sankey")
            .show_axes(false)
            .show_grid(false)
            .show_x(false)
            .show_y(false)
            .include_x(-0.1)
            .include_x(1.1)
            .include_y(0.0)
            .include_y(1.0)
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                // Polygon fills are convex only, so bands go in as quads
                for band in &layout.bands {
                    for quad in band.pieces() {
                        plot_ui.polygon(
                            Polygon::new(PlotPoints::from(quad.to_vec()))
                                .fill_color(link_color)
                                .stroke(Stroke::NONE),
                        );
                    }
                }

                for (node, rect) in data.nodes.iter().zip(&layout.nodes) {
                    // Categories without flow get a name but no bar
                    if rect.height() > 0.0 {
                        let corners = vec![
                            [rect.x0, rect.y0],
                            [rect.x1, rect.y0],
                            [rect.x1, rect.y1],
                            [rect.x0, rect.y1],
                        ];
                        plot_ui.polygon(
                            Polygon::new(PlotPoints::from(corners))
                                .fill_color(NODE_COLOR)
                                .stroke(Stroke::new(0.5, Color32::BLACK))
                                .name(&node.name),
                        );
                    }

                    // Labels sit outside the diagram for the last tier
                    let (x, anchor) = match node.tier {
                        Tier::Target => (rect.x0 - 0.01, Align2::RIGHT_CENTER),
                        Tier::Source | Tier::Label => (rect.x1 + 0.01, Align2::LEFT_CENTER),
                    };
                    plot_ui.text(
                        Text::new(
                            PlotPoint::new(x, rect.center_y()),
                            RichText::new(&node.name).size(10.0),
                        )
                        .anchor(anchor),
                    );
                }
            });
    }

    /// Draw nodes on their rings with unweighted edges
    pub fn draw_network(ui: &mut egui::Ui, data: &NetworkData) {
        Plot::new("network")
            .data_aspect(1.0)
            .show_axes(false)
            .show_grid(false)
            .show_x(false)
            .show_y(false)
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                for edge in &data.edges {
                    let a = &data.nodes[edge.a];
                    let b = &data.nodes[edge.b];
                    plot_ui.line(
                        Line::new(PlotPoints::from(vec![[a.x, a.y], [b.x, b.y]]))
                            .color(EDGE_COLOR)
                            .width(1.0),
                    );
                }

                for node in &data.nodes {
                    let color = Self::get_group_color(node.group);
                    plot_ui.points(
                        Points::new(PlotPoints::from(vec![[node.x, node.y]]))
                            .radius(12.0)
                            .filled(true)
                            .color(color)
                            .name(&node.name),
                    );
                    plot_ui.text(
                        Text::new(
                            PlotPoint::new(node.x, node.y - 0.2),
                            RichText::new(&node.name).size(11.0),
                        )
                        .anchor(Align2::CENTER_TOP),
                    );
                }
            });
    }
}
