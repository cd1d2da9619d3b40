//! SNA Graph - Social graph storage and analysis
//!
//! This crate owns the social graph: vertices, weighted undirected
//! relationships, and an adjacency index that keeps neighbors in the
//! order they were connected. On top of it sit six analyses and a
//! snapshot layer for persistence.
//!
//! # Architecture
//!
//! - `SocialGraph` holds vertices in insertion order plus a half-edge
//!   index per vertex
//! - `algorithms` runs BFS, DFS, Dijkstra, degree centrality, connected
//!   components and Welsh–Powell coloring against a borrowed graph
//! - `store` writes snapshots to a JSON file or a sled database
//!
//! # Example
//!
//! ```no_run
//! use sna_graph::SocialGraph;
//! use sna_core::Vertex;
//!
//! let mut graph = SocialGraph::new();
//! graph.add_vertex(Vertex::new("1", "Ada").with_activity(3.0)).unwrap();
//! graph.add_vertex(Vertex::new("2", "Grace").with_activity(4.0)).unwrap();
//! graph.add_relationship("1", "2").unwrap();
//!
//! let bfs = graph.bfs("1").unwrap();
//! assert_eq!(bfs.visit_order, vec!["1", "2"]);
//! ```

pub mod algorithms;
mod edge;
mod graph;
mod snapshot;
pub mod store;

pub use algorithms::{
    AlgorithmKind, AlgorithmParams, AlgorithmResult, GraphAlgorithm, UnknownAlgorithm,
};
pub use edge::{HalfEdge, Relationship, RelationshipRef};
pub use graph::{GraphStats, SocialGraph};
pub use snapshot::{GraphSnapshot, GraphView, ImportReport};
pub use store::{open_store, JsonFileStore, SledStore, SnapshotStore, StoreBackend, StoreError};
