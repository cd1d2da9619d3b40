//! Core graph data structure.
//!
//! `SocialGraph` owns every vertex and relationship and keeps an adjacency
//! index next to them. It's the central data structure that the analyses,
//! the snapshot layer and the server all work with.

use crate::edge::{HalfEdge, Relationship};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sna_core::{similarity_weight, GraphError, Result, Vertex, VertexId, VertexUpdate};
use std::collections::HashMap;

/// The social graph.
///
/// Vertices iterate in insertion order, relationships in the order they
/// were created, and each vertex's neighbors in the order its half-edges
/// were added. The analyses rely on these orders for deterministic output.
#[derive(Debug, Clone, Default)]
pub struct SocialGraph {
    /// Vertices by id, in insertion order.
    vertices: IndexMap<VertexId, Vertex>,

    /// One entry per connected pair.
    relationships: Vec<Relationship>,

    /// Maps each vertex id to its outgoing half-edges.
    adjacency: HashMap<VertexId, Vec<HalfEdge>>,
}

impl SocialGraph {
    /// Creates a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a vertex with an empty adjacency list.
    pub fn add_vertex(&mut self, vertex: Vertex) -> Result<&Vertex> {
        if self.vertices.contains_key(&vertex.id) {
            return Err(GraphError::DuplicateId(vertex.id));
        }

        self.adjacency.insert(vertex.id.clone(), Vec::new());
        let (index, _) = self.vertices.insert_full(vertex.id.clone(), vertex);

        Ok(&self.vertices[index])
    }

    /// Applies a partial update to a vertex, then recomputes every
    /// relationship weight in the graph.
    pub fn update_vertex(&mut self, id: &str, update: &VertexUpdate) -> Result<&Vertex> {
        let index = self
            .vertices
            .get_index_of(id)
            .ok_or_else(|| GraphError::NotFound(id.to_string()))?;

        self.vertices[index].apply(update);
        self.recalculate_weights();

        Ok(&self.vertices[index])
    }

    /// Removes a vertex together with all of its relationships.
    ///
    /// Remaining weights are left as they are.
    pub fn remove_vertex(&mut self, id: &str) -> Result<Vertex> {
        let vertex = self
            .vertices
            .shift_remove(id)
            .ok_or_else(|| GraphError::NotFound(id.to_string()))?;

        self.relationships.retain(|rel| !rel.touches(id));

        if let Some(half_edges) = self.adjacency.remove(id) {
            for half in half_edges {
                if let Some(list) = self.adjacency.get_mut(&half.to) {
                    list.retain(|h| h.to != id);
                }
            }
        }

        Ok(vertex)
    }

    /// Connects two vertices.
    ///
    /// The weight is computed once, from the endpoints' attributes as they
    /// are now. Both endpoints' `connection_count` go up by one.
    pub fn add_relationship(&mut self, from: &str, to: &str) -> Result<&Relationship> {
        if from == to {
            return Err(GraphError::SelfLoop(from.to_string()));
        }

        let a = self
            .vertices
            .get(from)
            .ok_or_else(|| GraphError::EndpointNotFound(from.to_string()))?;
        let b = self
            .vertices
            .get(to)
            .ok_or_else(|| GraphError::EndpointNotFound(to.to_string()))?;

        if self.has_relationship(from, to) {
            return Err(GraphError::DuplicateRelationship {
                from: from.to_string(),
                to: to.to_string(),
            });
        }

        let weight = similarity_weight(a, b);

        let index = self.relationships.len();
        self.relationships.push(Relationship::new(from, to, weight));

        self.adjacency
            .entry(from.to_string())
            .or_default()
            .push(HalfEdge::new(to, weight));
        self.adjacency
            .entry(to.to_string())
            .or_default()
            .push(HalfEdge::new(from, weight));

        for id in [from, to] {
            if let Some(vertex) = self.vertices.get_mut(id) {
                vertex.increment_connections();
            }
        }

        Ok(&self.relationships[index])
    }

    /// Disconnects two vertices, whichever order they are given in.
    ///
    /// Both endpoints' `connection_count` go down by one (never below zero)
    /// even when no relationship existed. Returns whether a relationship
    /// was actually removed.
    pub fn remove_relationship(&mut self, from: &str, to: &str) -> bool {
        let before = self.relationships.len();
        self.relationships.retain(|rel| !rel.connects(from, to));
        let removed = self.relationships.len() != before;

        if let Some(list) = self.adjacency.get_mut(from) {
            list.retain(|h| h.to != to);
        }
        if let Some(list) = self.adjacency.get_mut(to) {
            list.retain(|h| h.to != from);
        }

        for id in [from, to] {
            if let Some(vertex) = self.vertices.get_mut(id) {
                vertex.decrement_connections();
            }
        }

        removed
    }

    /// Recomputes the weight of every relationship and half-edge from the
    /// current vertex attributes.
    pub fn recalculate_weights(&mut self) {
        for rel in &mut self.relationships {
            if let (Some(a), Some(b)) = (self.vertices.get(&rel.from), self.vertices.get(&rel.to)) {
                rel.weight = similarity_weight(a, b);
            }
        }

        for (owner, half_edges) in &mut self.adjacency {
            let Some(a) = self.vertices.get(owner) else {
                continue;
            };
            for half in half_edges.iter_mut() {
                if let Some(b) = self.vertices.get(&half.to) {
                    half.weight = similarity_weight(a, b);
                }
            }
        }
    }

    /// Gets a vertex by id.
    pub fn vertex(&self, id: &str) -> Option<&Vertex> {
        self.vertices.get(id)
    }

    /// Returns true if a vertex with this id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.vertices.contains_key(id)
    }

    /// Looks up a vertex, failing with `NotFound`.
    pub(crate) fn require(&self, id: &str) -> Result<&Vertex> {
        self.vertices
            .get(id)
            .ok_or_else(|| GraphError::NotFound(id.to_string()))
    }

    /// Gets the relationship joining `a` and `b`, in either order.
    pub fn relationship(&self, a: &str, b: &str) -> Option<&Relationship> {
        self.relationships.iter().find(|rel| rel.connects(a, b))
    }

    /// Returns true if `a` and `b` are connected.
    pub fn has_relationship(&self, a: &str, b: &str) -> bool {
        self.half_edges(a).iter().any(|h| h.to == b)
    }

    /// Gets the neighbors of a vertex in half-edge insertion order.
    ///
    /// Unknown ids have no neighbors.
    pub fn neighbors(&self, id: &str) -> Vec<&Vertex> {
        self.half_edges(id)
            .iter()
            .filter_map(|h| self.vertices.get(&h.to))
            .collect()
    }

    /// Iterates over neighbor ids in half-edge insertion order.
    pub fn neighbor_ids<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.half_edges(id).iter().map(|h| h.to.as_str())
    }

    /// The outgoing half-edges of a vertex.
    pub fn half_edges(&self, id: &str) -> &[HalfEdge] {
        self.adjacency.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of live relationships touching a vertex.
    ///
    /// This is computed from the adjacency index and can differ from the
    /// vertex's `connection_count` if that was overwritten.
    pub fn degree(&self, id: &str) -> usize {
        self.half_edges(id).len()
    }

    /// Iterates over all vertices in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.values()
    }

    /// Iterates over all vertex ids in insertion order.
    pub fn vertex_ids(&self) -> impl Iterator<Item = &str> {
        self.vertices.keys().map(String::as_str)
    }

    /// All relationships in creation order.
    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    /// Returns the number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of relationships.
    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    /// Searches for vertices whose name contains the query, ignoring case.
    pub fn search(&self, query: &str) -> Vec<&Vertex> {
        let query_lower = query.to_lowercase();
        self.vertices
            .values()
            .filter(|v| v.name.to_lowercase().contains(&query_lower))
            .collect()
    }

    /// Removes everything.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.relationships.clear();
        self.adjacency.clear();
    }
}

/// Graph statistics for the info endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
    pub vertex_count: usize,
    pub relationship_count: usize,
}

impl SocialGraph {
    /// Returns graph statistics.
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            vertex_count: self.vertex_count(),
            relationship_count: self.relationship_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(id: &str) -> Vertex {
        Vertex::new(id, format!("person-{id}"))
    }

    fn line_graph() -> SocialGraph {
        // 1 - 2 - 3
        let mut graph = SocialGraph::new();
        for id in ["1", "2", "3"] {
            graph.add_vertex(person(id)).unwrap();
        }
        graph.add_relationship("1", "2").unwrap();
        graph.add_relationship("2", "3").unwrap();
        graph
    }

    #[test]
    fn test_add_vertex_rejects_duplicate() {
        let mut graph = SocialGraph::new();
        graph.add_vertex(person("1")).unwrap();

        let err = graph.add_vertex(person("1")).unwrap_err();
        assert_eq!(err, GraphError::DuplicateId("1".into()));
        assert_eq!(graph.vertex_count(), 1);
    }

    #[test]
    fn test_relationship_is_symmetric() {
        let graph = line_graph();

        let of_one: Vec<&str> = graph.neighbor_ids("1").collect();
        let of_two: Vec<&str> = graph.neighbor_ids("2").collect();
        assert_eq!(of_one, vec!["2"]);
        assert_eq!(of_two, vec!["1", "3"]);

        let rel = graph.relationship("2", "1").unwrap();
        assert_eq!(rel.from, "1");
        assert_eq!(rel.to, "2");
    }

    #[test]
    fn test_add_relationship_errors() {
        let mut graph = line_graph();

        assert_eq!(
            graph.add_relationship("1", "1").unwrap_err(),
            GraphError::SelfLoop("1".into())
        );
        assert_eq!(
            graph.add_relationship("1", "404").unwrap_err(),
            GraphError::EndpointNotFound("404".into())
        );
        assert_eq!(
            graph.add_relationship("404", "1").unwrap_err(),
            GraphError::EndpointNotFound("404".into())
        );
        // Same pair, reversed order.
        assert!(matches!(
            graph.add_relationship("2", "1").unwrap_err(),
            GraphError::DuplicateRelationship { .. }
        ));
        assert_eq!(graph.relationship_count(), 2);
    }

    #[test]
    fn test_connection_count_tracks_add_and_remove() {
        let mut graph = line_graph();
        assert_eq!(graph.vertex("2").unwrap().connection_count, 2);

        assert!(graph.remove_relationship("3", "2"));
        assert_eq!(graph.vertex("2").unwrap().connection_count, 1);
        assert_eq!(graph.vertex("3").unwrap().connection_count, 0);
        assert!(graph.neighbor_ids("3").next().is_none());

        // Removing a missing pair still decrements, floored at zero.
        assert!(!graph.remove_relationship("3", "2"));
        assert_eq!(graph.vertex("3").unwrap().connection_count, 0);
        assert_eq!(graph.vertex("2").unwrap().connection_count, 0);
    }

    #[test]
    fn test_weight_uses_attributes_at_creation() {
        let mut graph = SocialGraph::new();
        graph.add_vertex(person("a").with_activity(1.0)).unwrap();
        graph.add_vertex(person("b").with_activity(3.0)).unwrap();

        // dx = 2, counts both 0 -> 1 / 5
        let weight = graph.add_relationship("a", "b").unwrap().weight;
        assert!((weight - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_update_recalculates_every_weight() {
        let mut graph = SocialGraph::new();
        for id in ["a", "b", "c", "d"] {
            graph.add_vertex(person(id)).unwrap();
        }
        graph.add_relationship("a", "b").unwrap();
        graph.add_relationship("c", "d").unwrap();

        let update = VertexUpdate {
            activity: Some(2.0),
            ..Default::default()
        };
        graph.update_vertex("a", &update).unwrap();

        // dx = 2 on a-b; c-d untouched in value but still recomputed.
        let ab = graph.relationship("a", "b").unwrap().weight;
        assert!((ab - 0.2).abs() < 1e-12);
        assert_eq!(graph.relationship("c", "d").unwrap().weight, 1.0);

        // Both half-edges agree with the relationship list.
        assert_eq!(graph.half_edges("a")[0].weight, ab);
        assert_eq!(graph.half_edges("b")[0].weight, ab);
    }

    #[test]
    fn test_update_missing_vertex() {
        let mut graph = SocialGraph::new();
        let err = graph
            .update_vertex("ghost", &VertexUpdate::default())
            .unwrap_err();
        assert_eq!(err, GraphError::NotFound("ghost".into()));
    }

    #[test]
    fn test_overwritten_connection_count_does_not_change_degree() {
        let mut graph = line_graph();
        let update = VertexUpdate {
            connection_count: Some(40),
            ..Default::default()
        };
        graph.update_vertex("1", &update).unwrap();

        assert_eq!(graph.vertex("1").unwrap().connection_count, 40);
        assert_eq!(graph.degree("1"), 1);
        assert_eq!(graph.neighbors("1").len(), 1);
    }

    #[test]
    fn test_remove_vertex_cascades() {
        let mut graph = line_graph();
        let removed = graph.remove_vertex("2").unwrap();

        assert_eq!(removed.id, "2");
        assert_eq!(graph.vertex_count(), 2);
        assert_eq!(graph.relationship_count(), 0);
        assert!(graph.neighbors("1").is_empty());
        assert!(graph.neighbors("3").is_empty());

        assert_eq!(
            graph.remove_vertex("2").unwrap_err(),
            GraphError::NotFound("2".into())
        );
    }

    #[test]
    fn test_remove_vertex_keeps_counts_and_weights() {
        // 1 - 2 - 3 - 4
        let mut graph = SocialGraph::new();
        for (id, activity) in [("1", 1.0), ("2", 2.5), ("3", 4.0), ("4", 0.5)] {
            graph.add_vertex(person(id).with_activity(activity)).unwrap();
        }
        graph.add_relationship("1", "2").unwrap();
        graph.add_relationship("2", "3").unwrap();
        graph.add_relationship("3", "4").unwrap();
        let before = graph.relationship("3", "4").unwrap().weight;

        graph.remove_vertex("2").unwrap();

        // Only relationship removal decrements.
        assert_eq!(graph.vertex("1").unwrap().connection_count, 1);
        assert_eq!(graph.vertex("3").unwrap().connection_count, 2);
        assert_eq!(graph.degree("1"), 0);
        assert_eq!(graph.degree("3"), 1);

        let after = graph.relationship("3", "4").unwrap().weight;
        assert_eq!(after.to_bits(), before.to_bits());
        assert_eq!(graph.half_edges("4")[0].weight.to_bits(), before.to_bits());
    }

    #[test]
    fn test_vertex_order_survives_removal() {
        let mut graph = SocialGraph::new();
        for id in ["d", "a", "c", "b"] {
            graph.add_vertex(person(id)).unwrap();
        }
        graph.remove_vertex("a").unwrap();

        let ids: Vec<&str> = graph.vertex_ids().collect();
        assert_eq!(ids, vec!["d", "c", "b"]);
    }

    #[test]
    fn test_neighbors_in_insertion_order() {
        let mut graph = SocialGraph::new();
        for id in ["hub", "z", "a", "m"] {
            graph.add_vertex(person(id)).unwrap();
        }
        graph.add_relationship("hub", "z").unwrap();
        graph.add_relationship("a", "hub").unwrap();
        graph.add_relationship("hub", "m").unwrap();

        let names: Vec<&str> = graph.neighbors("hub").into_iter().map(|v| v.id.as_str()).collect();
        assert_eq!(names, vec!["z", "a", "m"]);
        assert!(graph.neighbors("nobody").is_empty());
    }

    #[test]
    fn test_search_and_stats() {
        let mut graph = SocialGraph::new();
        graph.add_vertex(Vertex::new("1", "Ada Lovelace")).unwrap();
        graph.add_vertex(Vertex::new("2", "Alan Turing")).unwrap();
        graph.add_vertex(Vertex::new("3", "Grace Hopper")).unwrap();
        graph.add_relationship("1", "2").unwrap();

        let found: Vec<&str> = graph.search("a").into_iter().map(|v| v.id.as_str()).collect();
        assert_eq!(found, vec!["1", "2", "3"]);
        assert_eq!(graph.search("TURING").len(), 1);

        let stats = graph.stats();
        assert_eq!(stats.vertex_count, 3);
        assert_eq!(stats.relationship_count, 1);

        graph.clear();
        assert_eq!(graph.vertex_count(), 0);
        assert_eq!(graph.relationship_count(), 0);
    }
}
