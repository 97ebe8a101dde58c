//! Chart Configuration Module
//! Fixed column names and category lists for the three charts.
//!
//! Defaults match the assignment datasets. A JSON file can override any
//! section; missing keys fall back to the defaults below.

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default input file names.
pub const BAR_CSV: &str = "bar_assignment.csv";
pub const SANKEY_CSV: &str = "sankey_assignment.csv";
pub const NETWORK_CSV: &str = "networks_assignment.csv";

/// Sankey source tier columns.
pub const SOURCE_CATEGORIES: [&str; 8] = ["PS", "OMP", "CNP", "NRP", "NMCCC", "PEC", "NCDM", "RGS"];

/// Sankey target tier columns.
pub const TARGET_CATEGORIES: [&str; 3] = ["Reg", "Aca", "Oth"];

/// Network nodes placed on the inner pentagon.
pub const INNER_NODES: [&str; 5] = ["D", "F", "I", "N", "S"];

/// First outer group (green).
pub const FIRST_OUTER_NODES: [&str; 12] = [
    "BIH", "GEO", "ISR", "MNE", "SRB", "CHE", "TUR", "UKR", "GBR", "AUS", "HKG", "ASU",
];

/// Second outer group (gold).
pub const SECOND_OUTER_NODES: [&str; 20] = [
    "AUT", "BEL", "BGR", "HRV", "CZE", "EST", "FRA", "DEU", "GRC", "HUN", "IRL", "ITA", "LVA",
    "LUX", "NLD", "PRT", "ROU", "SVK", "SVN", "ESP",
];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// RGBA color with alpha in 0.0..=1.0, written as `[r, g, b, a]` in JSON.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(from = "(u8, u8, u8, f32)")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

impl From<(u8, u8, u8, f32)> for Rgba {
    fn from((r, g, b, a): (u8, u8, u8, f32)) -> Self {
        Self::new(r, g, b, a)
    }
}

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BarConfig {
    pub label_column: String,
    pub count_column: String,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            label_column: "LABEL".to_string(),
            count_column: "COUNT".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SankeyConfig {
    pub source_categories: Vec<String>,
    pub label_column: String,
    pub target_categories: Vec<String>,
    pub link_color: Rgba,
}

impl Default for SankeyConfig {
    fn default() -> Self {
        Self {
            source_categories: owned(&SOURCE_CATEGORIES),
            label_column: "LABEL".to_string(),
            target_categories: owned(&TARGET_CATEGORIES),
            link_color: Rgba::new(150, 150, 150, 0.3),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub label_column: String,
    pub inner_nodes: Vec<String>,
    pub first_outer: Vec<String>,
    pub second_outer: Vec<String>,
    pub inner_radius: f64,
    pub outer_radius: f64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            label_column: "LABELS".to_string(),
            inner_nodes: owned(&INNER_NODES),
            first_outer: owned(&FIRST_OUTER_NODES),
            second_outer: owned(&SECOND_OUTER_NODES),
            inner_radius: 1.0,
            outer_radius: 3.0,
        }
    }
}

impl NetworkConfig {
    /// Outer ring placement order: first group, then second group.
    pub fn outer_nodes(&self) -> Vec<String> {
        self.first_outer
            .iter()
            .chain(self.second_outer.iter())
            .cloned()
            .collect()
    }
}

/// Settings for all three charts.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub bar: BarConfig,
    pub sankey: SankeyConfig,
    pub network: NetworkConfig,
}

impl ChartConfig {
    /// Load and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: ChartConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configs the builders cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sankey.source_categories.is_empty() || self.sankey.target_categories.is_empty() {
            return Err(ConfigError::Invalid(
                "sankey needs at least one source and one target category".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.sankey.link_color.a) {
            return Err(ConfigError::Invalid(format!(
                "link alpha {} outside 0..=1",
                self.sankey.link_color.a
            )));
        }

        let network = &self.network;
        if network.inner_nodes.is_empty() {
            return Err(ConfigError::Invalid("network inner set is empty".to_string()));
        }
        if network.inner_radius <= 0.0 || network.outer_radius <= 0.0 {
            return Err(ConfigError::Invalid("network radii must be positive".to_string()));
        }

        // Group lists must be disjoint, otherwise a node has two positions
        let mut seen: HashMap<&str, &str> = HashMap::new();
        let groups = [
            ("inner", &network.inner_nodes),
            ("first outer", &network.first_outer),
            ("second outer", &network.second_outer),
        ];
        for (group, names) in groups {
            for name in names.iter() {
                if let Some(previous) = seen.insert(name.as_str(), group) {
                    return Err(ConfigError::Invalid(format!(
                        "node '{}' listed in both {} and {} groups",
                        name, previous, group
                    )));
                }
            }
        }

        Ok(())
    }
}
