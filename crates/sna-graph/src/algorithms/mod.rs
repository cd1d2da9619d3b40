//! The analysis catalogue.
//!
//! Six read-only analyses run against a `SocialGraph`. Each one is exposed
//! twice: as a typed method on the graph (`graph.bfs("1")`) and as a
//! `GraphAlgorithm` implementation that takes the uniform
//! `AlgorithmParams` and returns the tagged `AlgorithmResult` the request
//! layer sends over the wire.

mod centrality;
mod coloring;
mod components;
mod dijkstra;
mod traversal;

pub use centrality::{DegreeCentrality, DegreeCentralityDetails, DegreeEntry, TOP_K};
pub use coloring::{ColoringDetails, WelshPowell};
pub use components::{Component, ComponentsDetails, ConnectedComponents};
pub use dijkstra::{Dijkstra, DijkstraDetails};
pub use traversal::{Bfs, BfsDetails, Dfs, DfsDetails};

use crate::graph::SocialGraph;
use serde::{Deserialize, Serialize};
use sna_core::{GraphError, Result, VertexId};
use std::str::FromStr;

/// A single analysis that can be run against a graph.
pub trait GraphAlgorithm {
    /// The wire name of the analysis.
    fn name(&self) -> &'static str;

    /// Runs the analysis. Parameters an analysis has no use for are ignored.
    fn run(&self, graph: &SocialGraph, params: &AlgorithmParams) -> Result<AlgorithmResult>;
}

/// Inputs shared by every analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AlgorithmParams {
    pub start_node_id: Option<VertexId>,
    pub target_node_id: Option<VertexId>,
}

impl AlgorithmParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameters with a start vertex.
    pub fn from_start(start: impl Into<String>) -> Self {
        Self {
            start_node_id: Some(start.into()),
            target_node_id: None,
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target_node_id = Some(target.into());
        self
    }

    /// The start vertex, or `MissingParameter` when absent or empty.
    pub fn require_start(&self) -> Result<&str> {
        self.start_node_id
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(GraphError::MissingParameter("startNodeId"))
    }
}

/// The closed set of analyses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlgorithmKind {
    #[serde(rename = "BFS")]
    Bfs,
    #[serde(rename = "DFS")]
    Dfs,
    Dijkstra,
    DegreeCentrality,
    ConnectedComponents,
    WelshPowellColoring,
}

impl AlgorithmKind {
    pub const ALL: [AlgorithmKind; 6] = [
        AlgorithmKind::Bfs,
        AlgorithmKind::Dfs,
        AlgorithmKind::Dijkstra,
        AlgorithmKind::DegreeCentrality,
        AlgorithmKind::ConnectedComponents,
        AlgorithmKind::WelshPowellColoring,
    ];

    /// The name used in results.
    pub fn as_str(&self) -> &'static str {
        match self {
            AlgorithmKind::Bfs => "BFS",
            AlgorithmKind::Dfs => "DFS",
            AlgorithmKind::Dijkstra => "Dijkstra",
            AlgorithmKind::DegreeCentrality => "DegreeCentrality",
            AlgorithmKind::ConnectedComponents => "ConnectedComponents",
            AlgorithmKind::WelshPowellColoring => "WelshPowellColoring",
        }
    }

    /// The short kebab-case name used in CLI arguments and RPC methods.
    pub fn slug(&self) -> &'static str {
        match self {
            AlgorithmKind::Bfs => "bfs",
            AlgorithmKind::Dfs => "dfs",
            AlgorithmKind::Dijkstra => "dijkstra",
            AlgorithmKind::DegreeCentrality => "degree-centrality",
            AlgorithmKind::ConnectedComponents => "connected-components",
            AlgorithmKind::WelshPowellColoring => "welsh-powell",
        }
    }

    /// Whether the analysis needs `startNodeId`.
    pub fn needs_start(&self) -> bool {
        matches!(
            self,
            AlgorithmKind::Bfs | AlgorithmKind::Dfs | AlgorithmKind::Dijkstra
        )
    }

    /// The implementation behind this kind.
    pub fn algorithm(&self) -> &'static dyn GraphAlgorithm {
        match self {
            AlgorithmKind::Bfs => &Bfs,
            AlgorithmKind::Dfs => &Dfs,
            AlgorithmKind::Dijkstra => &Dijkstra,
            AlgorithmKind::DegreeCentrality => &DegreeCentrality,
            AlgorithmKind::ConnectedComponents => &ConnectedComponents,
            AlgorithmKind::WelshPowellColoring => &WelshPowell,
        }
    }

    /// Runs this analysis.
    pub fn run(&self, graph: &SocialGraph, params: &AlgorithmParams) -> Result<AlgorithmResult> {
        self.algorithm().run(graph, params)
    }
}

impl std::fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error for an algorithm name that is not in the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown algorithm: {0}")]
pub struct UnknownAlgorithm(pub String);

impl FromStr for AlgorithmKind {
    type Err = UnknownAlgorithm;

    /// Accepts either the result name or the slug, ignoring case.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        AlgorithmKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s) || kind.slug().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownAlgorithm(s.to_string()))
    }
}

/// The outcome of an analysis, tagged by algorithm name.
///
/// Serializes as `{"algorithm": "BFS", "details": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "algorithm", content = "details")]
pub enum AlgorithmResult {
    #[serde(rename = "BFS")]
    Bfs(BfsDetails),
    #[serde(rename = "DFS")]
    Dfs(DfsDetails),
    Dijkstra(DijkstraDetails),
    DegreeCentrality(DegreeCentralityDetails),
    ConnectedComponents(ComponentsDetails),
    WelshPowellColoring(ColoringDetails),
}

impl AlgorithmResult {
    /// Which analysis produced this result.
    pub fn kind(&self) -> AlgorithmKind {
        match self {
            AlgorithmResult::Bfs(_) => AlgorithmKind::Bfs,
            AlgorithmResult::Dfs(_) => AlgorithmKind::Dfs,
            AlgorithmResult::Dijkstra(_) => AlgorithmKind::Dijkstra,
            AlgorithmResult::DegreeCentrality(_) => AlgorithmKind::DegreeCentrality,
            AlgorithmResult::ConnectedComponents(_) => AlgorithmKind::ConnectedComponents,
            AlgorithmResult::WelshPowellColoring(_) => AlgorithmKind::WelshPowellColoring,
        }
    }
}
