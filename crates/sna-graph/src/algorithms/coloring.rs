//! Welsh–Powell greedy coloring.
//!
//! Vertices are ordered by degree, highest first. Each round takes the
//! first uncolored vertex, gives it a fresh color, and then sweeps the
//! ordered list handing the same color to every uncolored vertex that is
//! not adjacent to anything already holding it. The result is always a
//! proper coloring but may use more colors than the chromatic number.

use super::{AlgorithmParams, AlgorithmResult, GraphAlgorithm};
use crate::graph::SocialGraph;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sna_core::{Result, VertexId};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColoringDetails {
    /// Color index per vertex, listed in processing order.
    pub colors: IndexMap<VertexId, usize>,
    /// Number of distinct colors used.
    pub color_count: usize,
    /// Vertices by descending degree, ties in insertion order.
    pub order: Vec<VertexId>,
}

impl SocialGraph {
    /// Colors the graph so that no two neighbors share a color.
    pub fn welsh_powell(&self) -> ColoringDetails {
        let mut ranked: Vec<(&str, usize)> =
            self.vertex_ids().map(|id| (id, self.degree(id))).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        let order: Vec<&str> = ranked.into_iter().map(|(id, _)| id).collect();

        let mut colors: HashMap<&str, usize> = HashMap::with_capacity(order.len());
        let mut color_count = 0;

        for &seed in &order {
            if colors.contains_key(seed) {
                continue;
            }

            let color = color_count;
            color_count += 1;

            // Neighbors of everything painted `color` so far.
            let mut blocked: HashSet<&str> = HashSet::new();

            // The seed is the first uncolored entry, so the sweep paints it first.
            for &candidate in &order {
                if colors.contains_key(candidate) || blocked.contains(candidate) {
                    continue;
                }
                colors.insert(candidate, color);
                blocked.extend(self.neighbor_ids(candidate));
            }
        }

        ColoringDetails {
            colors: order
                .iter()
                .filter_map(|id| colors.get(id).map(|&c| (id.to_string(), c)))
                .collect(),
            color_count,
            order: order.into_iter().map(String::from).collect(),
        }
    }
}

/// Welsh–Powell coloring. Takes no parameters.
pub struct WelshPowell;

impl GraphAlgorithm for WelshPowell {
    fn name(&self) -> &'static str {
        "WelshPowellColoring"
    }

    fn run(&self, graph: &SocialGraph, _params: &AlgorithmParams) -> Result<AlgorithmResult> {
        Ok(AlgorithmResult::WelshPowellColoring(graph.welsh_powell()))
    }
}
