//! Degree centrality.
//!
//! Degree is counted from the adjacency index, so it always matches the
//! live relationships even when a vertex's `connection_count` was
//! overwritten by an update.

use super::{AlgorithmParams, AlgorithmResult, GraphAlgorithm};
use crate::graph::SocialGraph;
use serde::{Deserialize, Serialize};
use sna_core::{Result, VertexId};

/// How many of the best-connected vertices are reported in `top_k`.
pub const TOP_K: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DegreeEntry {
    pub node_id: VertexId,
    pub degree: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DegreeCentralityDetails {
    /// Every vertex, highest degree first. Equal degrees keep vertex
    /// insertion order.
    pub degrees: Vec<DegreeEntry>,
    /// The first `TOP_K` entries of `degrees`.
    pub top_k: Vec<DegreeEntry>,
}

impl SocialGraph {
    /// Ranks every vertex by its number of live relationships.
    pub fn degree_centrality(&self) -> DegreeCentralityDetails {
        let mut degrees: Vec<DegreeEntry> = self
            .vertex_ids()
            .map(|id| DegreeEntry {
                node_id: id.to_string(),
                degree: self.degree(id),
            })
            .collect();

        // sort_by is stable
        degrees.sort_by(|a, b| b.degree.cmp(&a.degree));

        let top_k = degrees.iter().take(TOP_K).cloned().collect();

        DegreeCentralityDetails { degrees, top_k }
    }
}

/// Degree centrality. Takes no parameters.
pub struct DegreeCentrality;

impl GraphAlgorithm for DegreeCentrality {
    fn name(&self) -> &'static str {
        "DegreeCentrality"
    }

    fn run(&self, graph: &SocialGraph, _params: &AlgorithmParams) -> Result<AlgorithmResult> {
        Ok(AlgorithmResult::DegreeCentrality(graph.degree_centrality()))
    }
}
