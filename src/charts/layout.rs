//! Sankey Layout Module
//! Geometry shared by the interactive plot and the static renderer.
//!
//! Coordinates live in a unit box: x from 0 (sources) to 1 (targets), y from
//! 0 (bottom) to 1 (top). Nodes of a tier are stacked top-down; node height is
//! proportional to the larger of in- and outflow. The gap between nodes shrinks
//! for crowded tiers so gaps never take more than half the height.

use crate::data::{SankeyData, Tier};

/// Node bar width as a fraction of the diagram width.
pub const NODE_THICKNESS: f64 = 0.03;
/// Largest vertical gap between stacked nodes as a fraction of the diagram height.
pub const NODE_PAD: f64 = 0.03;
/// Share of the height that gaps of one tier may use at most.
const MAX_PAD_SHARE: f64 = 0.5;
/// Points sampled along each edge of a link band.
const BAND_SAMPLES: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NodeRect {
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
}

impl NodeRect {
    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    pub fn center_y(&self) -> f64 {
        (self.y0 + self.y1) / 2.0
    }
}

/// Link drawn as a band from the right edge of the source node to the left
/// edge of the target node.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkBand {
    pub link: usize,
    /// Closed outline: top edge left to right, then bottom edge right to left.
    pub outline: Vec<[f64; 2]>,
}

impl LinkBand {
    /// The band cut into convex quads, one per pair of neighbouring samples.
    /// Each quad runs top-left, top-right, bottom-right, bottom-left.
    pub fn pieces(&self) -> impl Iterator<Item = [[f64; 2]; 4]> + '_ {
        let last = self.outline.len() - 1;
        (0..BAND_SAMPLES).map(move |s| {
            [
                self.outline[s],
                self.outline[s + 1],
                self.outline[last - s - 1],
                self.outline[last - s],
            ]
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SankeyLayout {
    pub nodes: Vec<NodeRect>,
    pub bands: Vec<LinkBand>,
}

fn tier_column(tier: Tier) -> f64 {
    match tier {
        Tier::Source => 0.0,
        Tier::Label => 0.5,
        Tier::Target => 1.0,
    }
}

/// Gap between `count` stacked nodes.
fn tier_pad(count: usize) -> f64 {
    if count < 2 {
        return 0.0;
    }
    NODE_PAD.min(MAX_PAD_SHARE / (count - 1) as f64)
}

fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

impl SankeyLayout {
    pub fn compute(data: &SankeyData) -> Self {
        let throughput: Vec<f64> = (0..data.nodes.len())
            .map(|i| data.inflow(i).max(data.outflow(i)))
            .collect();

        // One scale for all tiers so equal values have equal heights
        let tiers = [Tier::Source, Tier::Label, Tier::Target];
        let pads = tiers.map(|tier| {
            tier_pad(data.nodes.iter().filter(|n| n.tier == tier).count())
        });
        let mut scale = f64::INFINITY;
        for (tier, pad) in tiers.into_iter().zip(pads) {
            let members: Vec<usize> = (0..data.nodes.len())
                .filter(|&i| data.nodes[i].tier == tier)
                .collect();
            let total: f64 = members.iter().map(|&i| throughput[i]).sum();
            if members.is_empty() || total <= 0.0 {
                continue;
            }
            let room = 1.0 - pad * (members.len() - 1) as f64;
            scale = scale.min(room / total);
        }
        if !scale.is_finite() {
            scale = 0.0;
        }

        let mut nodes = vec![NodeRect::default(); data.nodes.len()];
        for (tier, pad) in tiers.into_iter().zip(pads) {
            let x = tier_column(tier);
            let x0 = (x - NODE_THICKNESS / 2.0).clamp(0.0, 1.0 - NODE_THICKNESS);
            let mut top = 1.0;
            for (i, node) in data.nodes.iter().enumerate() {
                if node.tier != tier {
                    continue;
                }
                let height = throughput[i] * scale;
                nodes[i] = NodeRect {
                    x0,
                    x1: x0 + NODE_THICKNESS,
                    y0: top - height,
                    y1: top,
                };
                top -= height + pad;
            }
        }

        // Links stack from the top of each node in link order
        let mut out_used = vec![0.0; data.nodes.len()];
        let mut in_used = vec![0.0; data.nodes.len()];
        let bands = data
            .links
            .iter()
            .enumerate()
            .map(|(idx, link)| {
                let thickness = link.value * scale;
                let src = nodes[link.source];
                let dst = nodes[link.target];

                let src_top = src.y1 - out_used[link.source];
                let dst_top = dst.y1 - in_used[link.target];
                out_used[link.source] += thickness;
                in_used[link.target] += thickness;

                LinkBand {
                    link: idx,
                    outline: Self::band_outline(src.x1, dst.x0, src_top, dst_top, thickness),
                }
            })
            .collect();

        SankeyLayout { nodes, bands }
    }

    fn band_outline(x0: f64, x1: f64, top0: f64, top1: f64, thickness: f64) -> Vec<[f64; 2]> {
        let top: Vec<[f64; 2]> = (0..=BAND_SAMPLES)
            .map(|s| {
                let t = s as f64 / BAND_SAMPLES as f64;
                [x0 + (x1 - x0) * t, top0 + (top1 - top0) * smoothstep(t)]
            })
            .collect();

        let bottom = top.iter().rev().map(|&[x, y]| [x, y - thickness]);
        top.iter().copied().chain(bottom).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SankeyConfig;
    use crate::data::SankeyBuilder;
    use polars::prelude::*;

    fn sample() -> SankeyData {
        let df = df!(
            "PS" => &[4i64, 2],
            "OMP" => &[0i64, 2],
            "LABEL" => &["X", "Y"],
            "Reg" => &[4i64, 1],
            "Aca" => &[0i64, 3],
        )
        .unwrap();
        let config = SankeyConfig {
            source_categories: vec!["PS".to_string(), "OMP".to_string()],
            target_categories: vec!["Reg".to_string(), "Aca".to_string()],
            ..SankeyConfig::default()
        };
        SankeyBuilder::build(&df, &config).unwrap()
    }

    #[test]
    fn nodes_sit_in_tier_columns() {
        let data = sample();
        let layout = SankeyLayout::compute(&data);

        assert_eq!(layout.nodes.len(), data.nodes.len());
        assert_eq!(layout.nodes[0].x0, 0.0);
        assert!((layout.nodes[2].x0 - (0.5 - NODE_THICKNESS / 2.0)).abs() < 1e-12);
        assert!((layout.nodes[5].x1 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn heights_proportional_to_throughput() {
        let data = sample();
        let layout = SankeyLayout::compute(&data);

        // PS carries 6, OMP carries 2
        let ratio = layout.nodes[0].height() / layout.nodes[1].height();
        assert!((ratio - 3.0).abs() < 1e-9);
        // X and Y both carry 4
        assert!((layout.nodes[2].height() - layout.nodes[3].height()).abs() < 1e-12);
    }

    #[test]
    fn nodes_fit_and_do_not_overlap() {
        let layout = SankeyLayout::compute(&sample());
        for rect in &layout.nodes {
            assert!(rect.y0 >= -1e-9 && rect.y1 <= 1.0 + 1e-9);
        }
        assert!(layout.nodes[1].y1 < layout.nodes[0].y0);
        assert!(layout.nodes[3].y1 < layout.nodes[2].y0);
    }

    #[test]
    fn band_per_link_spanning_its_nodes() {
        let data = sample();
        let layout = SankeyLayout::compute(&data);
        assert_eq!(layout.bands.len(), data.links.len());

        for band in &layout.bands {
            let link = data.links[band.link];
            let first = band.outline.first().unwrap();
            let last_top = band.outline[BAND_SAMPLES];
            assert_eq!(first[0], layout.nodes[link.source].x1);
            assert!((last_top[0] - layout.nodes[link.target].x0).abs() < 1e-12);
            assert_eq!(band.outline.len(), 2 * (BAND_SAMPLES + 1));
        }
    }

    fn crowded(rows: usize) -> SankeyData {
        let labels: Vec<String> = (0..rows).map(|i| format!("L{i}")).collect();
        let ones = vec![1i64; rows];
        let df = df!(
            "PS" => &ones,
            "LABEL" => &labels,
            "Reg" => &ones,
        )
        .unwrap();
        let config = SankeyConfig {
            source_categories: vec!["PS".to_string()],
            target_categories: vec!["Reg".to_string()],
            ..SankeyConfig::default()
        };
        SankeyBuilder::build(&df, &config).unwrap()
    }

    #[test]
    fn crowded_tier_stays_inside_the_box() {
        for rows in [34, 50, 200] {
            let data = crowded(rows);
            let layout = SankeyLayout::compute(&data);

            let labels: Vec<&NodeRect> = data
                .nodes
                .iter()
                .zip(&layout.nodes)
                .filter(|(n, _)| n.tier == Tier::Label)
                .map(|(_, r)| r)
                .collect();
            assert_eq!(labels.len(), rows);
            for rect in &layout.nodes {
                assert!(rect.y0 >= -1e-9, "{rows} rows: y0 = {}", rect.y0);
                assert!(rect.y1 <= 1.0 + 1e-9);
            }
            for pair in labels.windows(2) {
                assert!(pair[1].y1 < pair[0].y0);
            }

            // Bars keep at least half of the height
            let covered: f64 = labels.iter().map(|r| r.height()).sum();
            assert!(covered >= MAX_PAD_SHARE - 1e-9, "{rows} rows: {covered}");
        }
    }

    fn cross(o: [f64; 2], a: [f64; 2], b: [f64; 2]) -> f64 {
        (a[0] - o[0]) * (b[1] - o[1]) - (a[1] - o[1]) * (b[0] - o[0])
    }

    #[test]
    fn band_pieces_are_convex_and_cover_the_outline() {
        let layout = SankeyLayout::compute(&sample());
        for band in &layout.bands {
            let pieces: Vec<[[f64; 2]; 4]> = band.pieces().collect();
            assert_eq!(pieces.len(), BAND_SAMPLES);
            assert_eq!(pieces[0][0], band.outline[0]);
            assert_eq!(pieces[0][3], band.outline[band.outline.len() - 1]);
            assert_eq!(pieces[BAND_SAMPLES - 1][1], band.outline[BAND_SAMPLES]);
            assert_eq!(pieces[BAND_SAMPLES - 1][2], band.outline[BAND_SAMPLES + 1]);

            for quad in &pieces {
                let turns: Vec<f64> = (0..4)
                    .map(|k| cross(quad[k], quad[(k + 1) % 4], quad[(k + 2) % 4]))
                    .collect();
                let all_cw = turns.iter().all(|&c| c <= 1e-15);
                let all_ccw = turns.iter().all(|&c| c >= -1e-15);
                assert!(all_cw || all_ccw, "non-convex piece {quad:?}");
            }
        }
    }

    #[test]
    fn empty_diagram_has_no_geometry() {
        let data = SankeyData {
            nodes: Vec::new(),
            links: Vec::new(),
            link_color: SankeyConfig::default().link_color,
        };
        assert_eq!(SankeyLayout::compute(&data), SankeyLayout::default());
    }
}
