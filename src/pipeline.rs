//! Chart Pipeline
//! Loads a chart's CSV and runs the matching builder.

use crate::charts::{ChartData, ChartKind};
use crate::config::{self, ChartConfig};
use crate::data::{
    BarChartBuilder, BuildError, DataLoader, NetworkLayoutBuilder, SankeyBuilder,
};
use polars::prelude::DataFrame;
use std::path::{Path, PathBuf};
use tracing::info;

/// Input file for each chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSources {
    pub bar: PathBuf,
    pub sankey: PathBuf,
    pub network: PathBuf,
}

impl Default for ChartSources {
    fn default() -> Self {
        Self {
            bar: PathBuf::from(config::BAR_CSV),
            sankey: PathBuf::from(config::SANKEY_CSV),
            network: PathBuf::from(config::NETWORK_CSV),
        }
    }
}

impl ChartSources {
    pub fn path(&self, kind: ChartKind) -> &Path {
        match kind {
            ChartKind::Bar => &self.bar,
            ChartKind::Sankey => &self.sankey,
            ChartKind::Network => &self.network,
        }
    }

    pub fn set_path(&mut self, kind: ChartKind, path: PathBuf) {
        match kind {
            ChartKind::Bar => self.bar = path,
            ChartKind::Sankey => self.sankey = path,
            ChartKind::Network => self.network = path,
        }
    }
}

/// Run the builder for `kind` over an already loaded table.
pub fn build_from_frame(
    kind: ChartKind,
    df: &DataFrame,
    config: &ChartConfig,
) -> Result<ChartData, BuildError> {
    let chart = match kind {
        ChartKind::Bar => ChartData::Bar(BarChartBuilder::build(df, &config.bar)?),
        ChartKind::Sankey => ChartData::sankey(SankeyBuilder::build(df, &config.sankey)?),
        ChartKind::Network => ChartData::Network(NetworkLayoutBuilder::build(df, &config.network)?),
    };
    Ok(chart)
}

/// Read `path` and build one chart.
pub fn build_chart(
    kind: ChartKind,
    path: &Path,
    config: &ChartConfig,
) -> Result<ChartData, BuildError> {
    let mut loader = DataLoader::new();
    let df = loader.load_csv(path)?;
    let chart = build_from_frame(kind, df, config)?;
    info!(
        chart = kind.file_stem(),
        rows = loader.get_row_count(),
        summary = %chart.summary(),
        "chart ready"
    );
    Ok(chart)
}

/// Build bar, Sankey and network charts in that order; the first failure stops the sequence.
pub fn build_all(
    sources: &ChartSources,
    config: &ChartConfig,
) -> Result<Vec<ChartData>, (ChartKind, BuildError)> {
    ChartKind::ALL
        .iter()
        .map(|&kind| build_chart(kind, sources.path(kind), config).map_err(|e| (kind, e)))
        .collect()
}
