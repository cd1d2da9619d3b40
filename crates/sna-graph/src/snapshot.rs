//! Flat graph snapshots for persistence and export.
//!
//! A snapshot carries vertices and relationship endpoints only. On import
//! the relationships are replayed through `add_relationship`, so weights
//! and connection counts are derived again instead of trusted from disk.

use crate::edge::{Relationship, RelationshipRef};
use crate::graph::SocialGraph;
use serde::{Deserialize, Serialize};
use sna_core::Vertex;

/// A serializable copy of the full graph state.
///
/// Written with the `nodes`/`edges` keys of the persisted file format;
/// `vertices`/`relationships` are accepted when reading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(rename = "nodes", alias = "vertices", default)]
    pub vertices: Vec<Vertex>,

    #[serde(rename = "edges", alias = "relationships", default)]
    pub relationships: Vec<RelationshipRef>,
}

/// What happened during an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub vertices_loaded: usize,
    pub relationships_loaded: usize,
    /// Vertices dropped because their id was already taken.
    pub skipped_vertices: usize,
    /// Relationships dropped for a missing endpoint, a self-loop or a
    /// duplicate pair.
    pub skipped_relationships: usize,
}

impl ImportReport {
    pub fn skipped(&self) -> usize {
        self.skipped_vertices + self.skipped_relationships
    }
}

/// The graph as shown to clients: vertices plus weighted relationships.
#[derive(Debug, Clone, Serialize)]
pub struct GraphView<'a> {
    pub nodes: Vec<&'a Vertex>,
    pub edges: &'a [Relationship],
}

impl SocialGraph {
    /// Copies the graph into a flat snapshot.
    pub fn export_snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            vertices: self.vertices().cloned().collect(),
            relationships: self.relationships().iter().map(RelationshipRef::from).collect(),
        }
    }

    /// Replaces the whole graph with the contents of `snapshot`.
    ///
    /// Best effort: entries that fail validation are skipped and counted
    /// in the returned report rather than aborting the load. Stored
    /// connection counts are reset so that replaying the relationships
    /// re-derives them.
    pub fn import_snapshot(&mut self, snapshot: &GraphSnapshot) -> ImportReport {
        self.clear();
        let mut report = ImportReport::default();

        for vertex in &snapshot.vertices {
            let fresh = vertex.clone().with_connection_count(0);
            match self.add_vertex(fresh) {
                Ok(_) => report.vertices_loaded += 1,
                Err(_) => report.skipped_vertices += 1,
            }
        }

        for rel in &snapshot.relationships {
            match self.add_relationship(&rel.from_id, &rel.to_id) {
                Ok(_) => report.relationships_loaded += 1,
                Err(_) => report.skipped_relationships += 1,
            }
        }

        report
    }

    /// Builds a new graph from a snapshot.
    pub fn from_snapshot(snapshot: &GraphSnapshot) -> (Self, ImportReport) {
        let mut graph = Self::new();
        let report = graph.import_snapshot(snapshot);
        (graph, report)
    }

    /// Borrows the graph in its client-facing shape.
    pub fn view(&self) -> GraphView<'_> {
        GraphView {
            nodes: self.vertices().collect(),
            edges: self.relationships(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SocialGraph {
        let mut graph = SocialGraph::new();
        graph
            .add_vertex(Vertex::new("1", "Ada").with_activity(1.0))
            .unwrap();
        graph
            .add_vertex(Vertex::new("2", "Bob").with_interaction(2.0))
            .unwrap();
        graph.add_vertex(Vertex::new("3", "Cy")).unwrap();
        graph.add_relationship("1", "2").unwrap();
        graph.add_relationship("3", "2").unwrap();
        graph
    }

    #[test]
    fn test_export_preserves_order() {
        let snapshot = sample().export_snapshot();

        let ids: Vec<&str> = snapshot.vertices.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(
            snapshot.relationships,
            vec![RelationshipRef::new("1", "2"), RelationshipRef::new("3", "2")]
        );
    }

    #[test]
    fn test_reimport_rebuilds_same_graph() {
        let original = sample();
        let (restored, report) = SocialGraph::from_snapshot(&original.export_snapshot());

        assert_eq!(report.vertices_loaded, 3);
        assert_eq!(report.relationships_loaded, 2);
        assert_eq!(report.skipped(), 0);

        // Counts are re-derived, not doubled.
        assert_eq!(restored.vertex("2").unwrap().connection_count, 2);
        assert_eq!(restored.vertex("1").unwrap().connection_count, 1);
        assert_eq!(restored.relationship_count(), 2);
        let ids: Vec<&str> = restored.neighbor_ids("2").collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn test_import_skips_invalid_relationships() {
        let snapshot = GraphSnapshot {
            vertices: vec![Vertex::new("a", "A"), Vertex::new("b", "B"), Vertex::new("a", "dup")],
            relationships: vec![
                RelationshipRef::new("a", "b"),
                RelationshipRef::new("b", "a"),
                RelationshipRef::new("a", "ghost"),
                RelationshipRef::new("b", "b"),
            ],
        };

        let mut graph = sample();
        let report = graph.import_snapshot(&snapshot);

        assert_eq!(report.vertices_loaded, 2);
        assert_eq!(report.skipped_vertices, 1);
        assert_eq!(report.relationships_loaded, 1);
        assert_eq!(report.skipped_relationships, 3);

        // Previous contents are gone.
        assert!(graph.vertex("1").is_none());
        assert_eq!(graph.vertex("a").unwrap().name, "A");
        assert_eq!(graph.relationship_count(), 1);
    }

    #[test]
    fn test_reads_persisted_file_layout() {
        let json = r#"{
            "nodes": [
                {"id": "1", "name": "Ada", "activity": 0.5, "interaction": 1, "connectionCount": 7},
                {"id": "2", "name": "Bob", "activity": 0.5, "interaction": 1, "connectionCount": 0}
            ],
            "edges": [{"fromId": "1", "toId": "2"}]
        }"#;

        let snapshot: GraphSnapshot = serde_json::from_str(json).unwrap();
        let (graph, _) = SocialGraph::from_snapshot(&snapshot);

        assert_eq!(graph.vertex("1").unwrap().connection_count, 1);
        assert_eq!(graph.relationship("1", "2").unwrap().weight, 1.0);

        let aliased: GraphSnapshot =
            serde_json::from_str(r#"{"vertices": [{"id": "x", "name": "X"}]}"#).unwrap();
        assert_eq!(aliased.vertices.len(), 1);
        assert!(aliased.relationships.is_empty());
    }

    #[test]
    fn test_view_serializes_weighted_edges() {
        let graph = sample();
        let json = serde_json::to_value(graph.view()).unwrap();

        assert_eq!(json["nodes"].as_array().unwrap().len(), 3);
        assert_eq!(json["edges"][0]["fromId"], "1");
        assert!(json["edges"][0]["weight"].as_f64().unwrap() > 0.0);
    }
}
