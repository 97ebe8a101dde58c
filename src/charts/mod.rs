//! Charts module - Chart geometry and rendering

mod layout;
mod plotter;
mod renderer;

pub use layout::SankeyLayout;
pub use plotter::{ChartData, ChartKind, ChartPlotter};
pub use renderer::StaticChartRenderer;
