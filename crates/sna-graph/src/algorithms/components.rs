//! Connected component decomposition.

use super::{AlgorithmParams, AlgorithmResult, GraphAlgorithm};
use crate::graph::SocialGraph;
use serde::{Deserialize, Serialize};
use sna_core::{Result, VertexId};
use std::collections::{HashSet, VecDeque};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    /// Sequential id, starting at 0 in discovery order.
    pub id: usize,
    /// Members in flood-fill discovery order.
    pub nodes: Vec<VertexId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentsDetails {
    pub components: Vec<Component>,
    pub component_count: usize,
}

impl SocialGraph {
    /// Splits the graph into connected components.
    ///
    /// Vertices are scanned in insertion order; each one not yet assigned
    /// seeds a breadth-first flood fill that becomes the next component.
    pub fn connected_components(&self) -> ComponentsDetails {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut components = Vec::new();

        for seed in self.vertex_ids() {
            if !visited.insert(seed) {
                continue;
            }

            let mut nodes = Vec::new();
            let mut queue = VecDeque::from([seed]);

            while let Some(current) = queue.pop_front() {
                nodes.push(current.to_string());
                for neighbor in self.neighbor_ids(current) {
                    if visited.insert(neighbor) {
                        queue.push_back(neighbor);
                    }
                }
            }

            components.push(Component {
                id: components.len(),
                nodes,
            });
        }

        ComponentsDetails {
            component_count: components.len(),
            components,
        }
    }
}

/// Connected components. Takes no parameters.
pub struct ConnectedComponents;

impl GraphAlgorithm for ConnectedComponents {
    fn name(&self) -> &'static str {
        "ConnectedComponents"
    }

    fn run(&self, graph: &SocialGraph, _params: &AlgorithmParams) -> Result<AlgorithmResult> {
        Ok(AlgorithmResult::ConnectedComponents(
            graph.connected_components(),
        ))
    }
}
