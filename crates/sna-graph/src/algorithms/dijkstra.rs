//! Single-source shortest paths.
//!
//! Classic Dijkstra over the relationship weights. The next vertex is
//! picked by scanning the unvisited set, which is O(V²) overall; when
//! several vertices share the minimum, the earliest in vertex insertion
//! order wins.

use super::{AlgorithmParams, AlgorithmResult, GraphAlgorithm};
use crate::graph::SocialGraph;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use sna_core::{GraphError, Result, VertexId};

/// Result of a shortest-path run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DijkstraDetails {
    pub start_node_id: VertexId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_node_id: Option<VertexId>,

    /// Shortest distance to every vertex. Unreachable vertices hold
    /// `f64::INFINITY`, written as `null` on the wire.
    #[serde(with = "infinite_as_null")]
    pub distances: IndexMap<VertexId, f64>,

    /// Predecessor on the shortest path; `None` for the start and for
    /// unreachable vertices.
    pub previous: IndexMap<VertexId, Option<VertexId>>,

    /// Start-to-target path, present only when the target was reached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<VertexId>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_distance: Option<f64>,
}

impl DijkstraDetails {
    /// Distance to `id`, `None` if unknown or unreachable.
    pub fn distance_to(&self, id: &str) -> Option<f64> {
        self.distances.get(id).copied().filter(|d| d.is_finite())
    }
}

impl SocialGraph {
    /// Shortest distances from `start`, plus the path to `target` if given.
    pub fn dijkstra(&self, start: &str, target: Option<&str>) -> Result<DijkstraDetails> {
        let start = self.require(start)?.id.as_str();
        let target = match target {
            Some(id) => Some(self.require(id)?.id.as_str()),
            None => None,
        };

        let mut distances: IndexMap<&str, f64> =
            self.vertex_ids().map(|id| (id, f64::INFINITY)).collect();
        let mut previous: IndexMap<&str, Option<&str>> =
            self.vertex_ids().map(|id| (id, None)).collect();
        let mut unvisited: IndexSet<&str> = self.vertex_ids().collect();

        if let Some(d) = distances.get_mut(start) {
            *d = 0.0;
        }

        loop {
            let mut current: Option<(&str, f64)> = None;
            for &id in &unvisited {
                let distance = distances.get(id).copied().unwrap_or(f64::INFINITY);
                if distance < current.map_or(f64::INFINITY, |(_, best)| best) {
                    current = Some((id, distance));
                }
            }

            // Everything left is unreachable.
            let Some((current, base)) = current else {
                break;
            };
            unvisited.shift_remove(current);

            for edge in self.half_edges(current) {
                let next = edge.to.as_str();
                if !unvisited.contains(next) {
                    continue;
                }

                let candidate = base + edge.weight;
                if let Some(known) = distances.get_mut(next) {
                    if candidate < *known {
                        *known = candidate;
                        previous.insert(next, Some(current));
                    }
                }
            }
        }

        let (path, total_distance) = match target {
            Some(target) => {
                let mut path = Vec::new();
                let mut cursor = Some(target);
                while let Some(id) = cursor {
                    path.push(id.to_string());
                    cursor = previous.get(id).copied().flatten();
                }
                path.reverse();

                if path.first().map(String::as_str) == Some(start) {
                    (Some(path), distances.get(target).copied())
                } else {
                    (None, None)
                }
            }
            None => (None, None),
        };

        Ok(DijkstraDetails {
            start_node_id: start.to_string(),
            target_node_id: target.map(String::from),
            distances: distances
                .into_iter()
                .map(|(id, d)| (id.to_string(), d))
                .collect(),
            previous: previous
                .into_iter()
                .map(|(id, prev)| (id.to_string(), prev.map(String::from)))
                .collect(),
            path,
            total_distance,
        })
    }
}

/// Shortest paths. Requires `startNodeId`; uses `targetNodeId` if given.
pub struct Dijkstra;

impl GraphAlgorithm for Dijkstra {
    fn name(&self) -> &'static str {
        "Dijkstra"
    }

    fn run(&self, graph: &SocialGraph, params: &AlgorithmParams) -> Result<AlgorithmResult> {
        let start = params.require_start()?;
        let target = params.target_node_id.as_deref();
        if target == Some("") {
            return Err(GraphError::MissingParameter("targetNodeId"));
        }
        Ok(AlgorithmResult::Dijkstra(graph.dijkstra(start, target)?))
    }
}

/// JSON has no infinity, so unreachable distances travel as `null`.
mod infinite_as_null {
    use indexmap::IndexMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(map: &IndexMap<String, f64>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let wire: IndexMap<&str, Option<f64>> = map
            .iter()
            .map(|(id, d)| (id.as_str(), d.is_finite().then_some(*d)))
            .collect();
        wire.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<IndexMap<String, f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let wire: IndexMap<String, Option<f64>> = IndexMap::deserialize(deserializer)?;
        Ok(wire
            .into_iter()
            .map(|(id, d)| (id, d.unwrap_or(f64::INFINITY)))
            .collect())
    }
}
