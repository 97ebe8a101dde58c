//! Assignment Charts - bar, Sankey and network charts from CSV data
//!
//! Builds all three charts at startup, then shows them in an interactive viewer.

mod charts;
mod config;
mod data;
mod gui;
mod pipeline;

use anyhow::{anyhow, Context, Result};
use charts::StaticChartRenderer;
use clap::Parser;
use config::ChartConfig;
use eframe::egui;
use gui::ChartsApp;
use pipeline::ChartSources;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "assignment_charts", version, about)]
struct Cli {
    /// Bar chart input (LABEL, COUNT)
    #[arg(long, default_value = config::BAR_CSV)]
    bar: PathBuf,

    /// Sankey input (source categories, LABEL, target categories)
    #[arg(long, default_value = config::SANKEY_CSV)]
    sankey: PathBuf,

    /// Network input (LABELS plus one column per node)
    #[arg(long, default_value = config::NETWORK_CSV)]
    network: PathBuf,

    /// JSON file overriding column names and category lists
    #[arg(long)]
    config: Option<PathBuf>,

    /// Also write bar.png, sankey.png and network.png into this directory
    #[arg(long)]
    export: Option<PathBuf>,

    /// Do not open the interactive viewer
    #[arg(long)]
    no_viewer: bool,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ChartConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ChartConfig::default(),
    };

    let sources = ChartSources {
        bar: cli.bar,
        sankey: cli.sankey,
        network: cli.network,
    };

    let charts = pipeline::build_all(&sources, &config).map_err(|(kind, err)| {
        anyhow!(err).context(format!(
            "building {} from {}",
            kind.title(),
            sources.path(kind).display()
        ))
    })?;

    if let Some(dir) = &cli.export {
        let written = StaticChartRenderer::export_charts_as_png(&charts, dir)
            .with_context(|| format!("exporting charts to {}", dir.display()))?;
        info!(count = written.len(), dir = %dir.display(), "charts exported");
    }

    if cli.no_viewer {
        return Ok(());
    }

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 800.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("Assignment Charts"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Assignment Charts",
        options,
        Box::new(move |cc| Ok(Box::new(ChartsApp::new(cc, config, sources, charts)))),
    )
    .map_err(|e| anyhow!("viewer failed: {e}"))
}
