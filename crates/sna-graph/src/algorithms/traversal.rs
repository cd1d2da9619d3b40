//! Breadth-first and depth-first traversal.
//!
//! Both walk neighbors in half-edge insertion order and only reach the
//! component containing the start vertex.

use super::{AlgorithmParams, AlgorithmResult, GraphAlgorithm};
use crate::graph::SocialGraph;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sna_core::{Result, VertexId};
use std::collections::{HashSet, VecDeque};

/// Result of a breadth-first traversal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BfsDetails {
    pub start_node_id: VertexId,
    /// Vertex ids in discovery order.
    pub visit_order: Vec<VertexId>,
    /// Hop count from the start. Unreached vertices are absent.
    pub distances: IndexMap<VertexId, usize>,
}

/// Result of a depth-first traversal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DfsDetails {
    pub start_node_id: VertexId,
    /// Vertex ids in pre-order.
    pub visit_order: Vec<VertexId>,
}

impl SocialGraph {
    /// Breadth-first traversal from `start`.
    pub fn bfs(&self, start: &str) -> Result<BfsDetails> {
        let start = self.require(start)?.id.as_str();

        let mut visited: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<(&str, usize)> = VecDeque::new();
        let mut visit_order = Vec::new();
        let mut distances = IndexMap::new();

        visited.insert(start);
        queue.push_back((start, 0));

        while let Some((current, depth)) = queue.pop_front() {
            visit_order.push(current.to_string());
            distances.insert(current.to_string(), depth);

            for neighbor in self.neighbor_ids(current) {
                if visited.insert(neighbor) {
                    queue.push_back((neighbor, depth + 1));
                }
            }
        }

        Ok(BfsDetails {
            start_node_id: start.to_string(),
            visit_order,
            distances,
        })
    }

    /// Depth-first traversal from `start`.
    ///
    /// Uses an explicit stack of (vertex, next neighbor) frames so deep
    /// graphs cannot overflow the call stack, while visiting in exactly the
    /// order a recursive pre-order walk would.
    pub fn dfs(&self, start: &str) -> Result<DfsDetails> {
        let start = self.require(start)?.id.as_str();

        let mut visited: HashSet<&str> = HashSet::new();
        let mut visit_order = vec![start.to_string()];
        let mut stack: Vec<(&str, usize)> = vec![(start, 0)];
        visited.insert(start);

        while let Some((current, cursor)) = stack.last_mut() {
            match self.half_edges(*current).get(*cursor) {
                Some(edge) => {
                    *cursor += 1;
                    let next = edge.to.as_str();
                    if visited.insert(next) {
                        visit_order.push(next.to_string());
                        stack.push((next, 0));
                    }
                }
                None => {
                    stack.pop();
                }
            }
        }

        Ok(DfsDetails {
            start_node_id: start.to_string(),
            visit_order,
        })
    }
}

/// Breadth-first traversal. Requires `startNodeId`.
pub struct Bfs;

impl GraphAlgorithm for Bfs {
    fn name(&self) -> &'static str {
        "BFS"
    }

    fn run(&self, graph: &SocialGraph, params: &AlgorithmParams) -> Result<AlgorithmResult> {
        let start = params.require_start()?;
        Ok(AlgorithmResult::Bfs(graph.bfs(start)?))
    }
}

/// Depth-first traversal. Requires `startNodeId`.
pub struct Dfs;

impl GraphAlgorithm for Dfs {
    fn name(&self) -> &'static str {
        "DFS"
    }

    fn run(&self, graph: &SocialGraph, params: &AlgorithmParams) -> Result<AlgorithmResult> {
        let start = params.require_start()?;
        Ok(AlgorithmResult::Dfs(graph.dfs(start)?))
    }
}
