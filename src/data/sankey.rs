//! Sankey Builder
//! Expands the wide assignment table into a three-tier node list and link list.

use super::processor::{require_columns, BuildError, RowCursor};
use crate::config::{Rgba, SankeyConfig};
use polars::prelude::*;
use std::collections::HashMap;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Source,
    Label,
    Target,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SankeyNode {
    pub name: String,
    pub tier: Tier,
}

/// Directed flow between two node indices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SankeyLink {
    pub source: usize,
    pub target: usize,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SankeyData {
    /// Sources, then one node per row label, then targets.
    pub nodes: Vec<SankeyNode>,
    pub links: Vec<SankeyLink>,
    pub link_color: Rgba,
}

impl SankeyData {
    pub const TITLE: &'static str = "Sankey Diagram of Assignment Data";

    pub fn node_index(&self, name: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.name == name)
    }

    /// Sum of link values leaving a node.
    pub fn outflow(&self, node: usize) -> f64 {
        self.links
            .iter()
            .filter(|l| l.source == node)
            .map(|l| l.value)
            .sum()
    }

    /// Sum of link values entering a node.
    pub fn inflow(&self, node: usize) -> f64 {
        self.links
            .iter()
            .filter(|l| l.target == node)
            .map(|l| l.value)
            .sum()
    }
}

pub struct SankeyBuilder;

impl SankeyBuilder {
    pub fn build(df: &DataFrame, config: &SankeyConfig) -> Result<SankeyData, BuildError> {
        require_columns(df, &config.source_categories)?;
        require_columns(df, &[config.label_column.as_str()])?;
        require_columns(df, &config.target_categories)?;

        let sources = RowCursor::new(df, &config.label_column, &config.source_categories)?;
        let targets = RowCursor::new(df, &config.label_column, &config.target_categories)?;
        if sources.is_empty() {
            warn!("sankey table has no rows; only category nodes are drawn");
        }

        let mut nodes: Vec<SankeyNode> = Vec::new();
        nodes.extend(config.source_categories.iter().map(|name| SankeyNode {
            name: name.clone(),
            tier: Tier::Source,
        }));
        nodes.extend(sources.labels().iter().map(|name| SankeyNode {
            name: name.clone(),
            tier: Tier::Label,
        }));
        nodes.extend(config.target_categories.iter().map(|name| SankeyNode {
            name: name.clone(),
            tier: Tier::Target,
        }));

        // Every node name must map to exactly one index
        let mut index: HashMap<&str, usize> = HashMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            if let Some(prev) = index.insert(node.name.as_str(), i) {
                return Err(BuildError::DataFormat(format!(
                    "node '{}' appears more than once (positions {} and {})",
                    node.name, prev, i
                )));
            }
        }

        let first_label = config.source_categories.len();
        let first_target = first_label + sources.len();
        let mut links = Vec::new();

        for (col, _) in config.source_categories.iter().enumerate() {
            for (row, record) in sources.rows().enumerate() {
                if let Some(value) = record.positive(col) {
                    links.push(SankeyLink {
                        source: col,
                        target: first_label + row,
                        value,
                    });
                }
            }
        }

        for (row, record) in targets.rows().enumerate() {
            for (col, _) in config.target_categories.iter().enumerate() {
                if let Some(value) = record.positive(col) {
                    links.push(SankeyLink {
                        source: first_label + row,
                        target: first_target + col,
                        value,
                    });
                }
            }
        }

        debug!(nodes = nodes.len(), links = links.len(), "built sankey");
        Ok(SankeyData {
            nodes,
            links,
            link_color: config.link_color,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> SankeyConfig {
        SankeyConfig {
            source_categories: vec!["PS".to_string(), "OMP".to_string()],
            label_column: "LABEL".to_string(),
            target_categories: vec!["Reg".to_string(), "Aca".to_string(), "Oth".to_string()],
            ..SankeyConfig::default()
        }
    }

    fn sample() -> DataFrame {
        df!(
            "PS" => &[5i64, 0, 2],
            "OMP" => &[0i64, 3, -1],
            "LABEL" => &["X", "Y", "Z"],
            "Reg" => &[5i64, 1, 0],
            "Aca" => &[0i64, 2, 0],
            "Oth" => &[0i64, 0, 2],
        )
        .unwrap()
    }

    #[test]
    fn single_row_example() {
        let df = df!(
            "PS" => &[5i64],
            "OMP" => &[0i64],
            "LABEL" => &["X"],
            "Reg" => &[5i64],
            "Aca" => &[0i64],
            "Oth" => &[0i64],
        )
        .unwrap();
        let data = SankeyBuilder::build(&df, &small_config()).unwrap();

        let ps = data.node_index("PS").unwrap();
        let x = data.node_index("X").unwrap();
        let reg = data.node_index("Reg").unwrap();
        assert_eq!(
            data.links,
            vec![
                SankeyLink { source: ps, target: x, value: 5.0 },
                SankeyLink { source: x, target: reg, value: 5.0 },
            ]
        );
    }

    #[test]
    fn node_list_is_sources_labels_targets() {
        let data = SankeyBuilder::build(&sample(), &small_config()).unwrap();
        let names: Vec<&str> = data.nodes.iter().map(|n| n.name.as_str()).collect();

        assert_eq!(names, vec!["PS", "OMP", "X", "Y", "Z", "Reg", "Aca", "Oth"]);
        assert_eq!(data.nodes[0].tier, Tier::Source);
        assert_eq!(data.nodes[3].tier, Tier::Label);
        assert_eq!(data.nodes[7].tier, Tier::Target);
        for (i, node) in data.nodes.iter().enumerate() {
            assert_eq!(data.node_index(&node.name), Some(i));
        }
    }

    #[test]
    fn source_links_come_first_in_category_order() {
        let data = SankeyBuilder::build(&sample(), &small_config()).unwrap();
        let pairs: Vec<(usize, usize)> = data.links.iter().map(|l| (l.source, l.target)).collect();

        // PS->X, PS->Z, OMP->Y, then X->Reg, Y->Reg, Y->Aca, Z->Oth
        assert_eq!(pairs, vec![(0, 2), (0, 4), (1, 3), (2, 5), (3, 5), (3, 6), (4, 7)]);
    }

    #[test]
    fn no_link_for_non_positive_cells() {
        let data = SankeyBuilder::build(&sample(), &small_config()).unwrap();
        assert!(data.links.iter().all(|l| l.value > 0.0));
        assert!(data.links.iter().all(|l| l.source < data.nodes.len()));
        assert!(data.links.iter().all(|l| l.target < data.nodes.len()));
    }

    #[test]
    fn source_outflow_equals_positive_column_sum() {
        let data = SankeyBuilder::build(&sample(), &small_config()).unwrap();
        assert_eq!(data.outflow(0), 7.0);
        assert_eq!(data.outflow(1), 3.0);
        assert_eq!(data.inflow(data.node_index("Reg").unwrap()), 6.0);
    }

    #[test]
    fn null_cells_are_skipped() {
        let df = df!(
            "PS" => &[None, Some(4.0f64)],
            "OMP" => &[1.0f64, 0.0],
            "LABEL" => &["X", "Y"],
            "Reg" => &[1.0f64, 4.0],
            "Aca" => &[None::<f64>, None],
            "Oth" => &[0.0f64, 0.0],
        )
        .unwrap();
        let data = SankeyBuilder::build(&df, &small_config()).unwrap();
        assert_eq!(data.links.len(), 4);
    }

    #[test]
    fn duplicate_labels_rejected() {
        let df = df!(
            "PS" => &[1i64, 1],
            "OMP" => &[0i64, 0],
            "LABEL" => &["X", "X"],
            "Reg" => &[1i64, 1],
            "Aca" => &[0i64, 0],
            "Oth" => &[0i64, 0],
        )
        .unwrap();
        let err = SankeyBuilder::build(&df, &small_config()).unwrap_err();
        assert!(matches!(err, BuildError::DataFormat(msg) if msg.contains("'X'")));
    }

    #[test]
    fn label_named_like_category_rejected() {
        let df = df!(
            "PS" => &[1i64],
            "OMP" => &[0i64],
            "LABEL" => &["Reg"],
            "Reg" => &[1i64],
            "Aca" => &[0i64],
            "Oth" => &[0i64],
        )
        .unwrap();
        assert!(SankeyBuilder::build(&df, &small_config()).is_err());
    }

    #[test]
    fn missing_target_column_rejected() {
        let df = sample().drop("Oth").unwrap();
        let err = SankeyBuilder::build(&df, &small_config()).unwrap_err();
        assert!(matches!(err, BuildError::DataFormat(msg) if msg.contains("Oth")));
    }

    #[test]
    fn links_carry_configured_color() {
        let data = SankeyBuilder::build(&sample(), &small_config()).unwrap();
        assert_eq!(data.link_color, Rgba::new(150, 150, 150, 0.3));
    }
}
