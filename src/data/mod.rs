//! Data module - CSV loading and chart data builders

mod bar;
mod loader;
mod network;
mod processor;
mod sankey;

pub use bar::{Answer, BarChartBuilder, BarChartData};
pub use loader::{DataLoader, LoaderError};
pub use network::{NetworkData, NetworkLayoutBuilder, NodeGroup};
pub use processor::BuildError;
pub use sankey::{SankeyBuilder, SankeyData, Tier};
