//! Network Layout Builder
//! Places group members on two concentric rings and turns positive cells into edges.

use super::processor::{require_columns, BuildError, RowCursor};
use crate::config::NetworkConfig;
use polars::prelude::*;
use std::collections::HashMap;
use std::f64::consts::PI;
use tracing::{debug, warn};

/// Group membership, which decides the node color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeGroup {
    Inner,
    FirstOuter,
    SecondOuter,
    Unclassified,
}

impl NodeGroup {
    pub fn classify(name: &str, config: &NetworkConfig) -> Self {
        let contains = |list: &[String]| list.iter().any(|n| n == name);
        if contains(&config.inner_nodes) {
            NodeGroup::Inner
        } else if contains(&config.first_outer) {
            NodeGroup::FirstOuter
        } else if contains(&config.second_outer) {
            NodeGroup::SecondOuter
        } else {
            NodeGroup::Unclassified
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NetworkNode {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub group: NodeGroup,
}

/// Undirected, unweighted edge between two entries of `NetworkData::nodes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkEdge {
    pub a: usize,
    pub b: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NetworkData {
    pub nodes: Vec<NetworkNode>,
    pub edges: Vec<NetworkEdge>,
}

#[cfg(test)]
impl NetworkData {
    pub fn node(&self, name: &str) -> Option<&NetworkNode> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Edge endpoints as name pairs, in edge order.
    pub fn edge_names(&self) -> Vec<(&str, &str)> {
        self.edges
            .iter()
            .map(|e| (self.nodes[e.a].name.as_str(), self.nodes[e.b].name.as_str()))
            .collect()
    }
}

/// Evenly spaced points on a circle around the origin, starting at angle 0.
pub fn ring_positions(names: &[String], radius: f64) -> Vec<(String, f64, f64)> {
    let n = names.len() as f64;
    names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let angle = 2.0 * PI * i as f64 / n;
            (name.clone(), radius * angle.cos(), radius * angle.sin())
        })
        .collect()
}

pub struct NetworkLayoutBuilder;

impl NetworkLayoutBuilder {
    /// Position map for every node of the inner and outer groups.
    pub fn positions(config: &NetworkConfig) -> HashMap<String, (f64, f64)> {
        ring_positions(&config.inner_nodes, config.inner_radius)
            .into_iter()
            .chain(ring_positions(&config.outer_nodes(), config.outer_radius))
            .map(|(name, x, y)| (name, (x, y)))
            .collect()
    }

    pub fn build(df: &DataFrame, config: &NetworkConfig) -> Result<NetworkData, BuildError> {
        require_columns(df, &[config.label_column.as_str()])?;

        let node_columns: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .filter(|name| *name != config.label_column)
            .collect();
        let cursor = RowCursor::new(df, &config.label_column, &node_columns)?;
        if cursor.is_empty() {
            warn!("network table has no rows; no edges are drawn");
        }
        let positions = Self::positions(config);

        // Column nodes first, then row labels that are not also columns
        let mut names: Vec<&str> = node_columns.iter().map(String::as_str).collect();
        for label in cursor.labels() {
            if !names.contains(&label.as_str()) {
                names.push(label.as_str());
            }
        }

        let mut nodes = Vec::with_capacity(names.len());
        let mut index: HashMap<String, usize> = HashMap::with_capacity(names.len());
        for name in names {
            let &(x, y) = positions.get(name).ok_or_else(|| {
                BuildError::MissingNode(format!("'{}' has no layout position", name))
            })?;
            index.insert(name.to_string(), nodes.len());
            nodes.push(NetworkNode {
                name: name.to_string(),
                x,
                y,
                group: NodeGroup::classify(name, config),
            });
        }

        let mut edges = Vec::new();
        for row in cursor.rows() {
            for (col, target) in cursor.columns().iter().enumerate() {
                if row.positive(col).is_none() {
                    continue;
                }
                let lookup = |name: &str| {
                    index.get(name).copied().ok_or_else(|| {
                        BuildError::MissingNode(format!(
                            "edge ({}, {}) references unknown node '{}'",
                            row.label, target, name
                        ))
                    })
                };
                edges.push(NetworkEdge {
                    a: lookup(&row.label)?,
                    b: lookup(target)?,
                });
            }
        }

        debug!(nodes = nodes.len(), edges = edges.len(), "built network");
        Ok(NetworkData { nodes, edges })
    }
}
