//! Relationship types for the social graph.
//!
//! A relationship is undirected. The graph keeps one `Relationship` per
//! connected pair in its relationship list and two `HalfEdge`s (one per
//! direction) in the adjacency index.

use serde::{Deserialize, Serialize};
use sna_core::VertexId;

/// An undirected, weighted connection between two people.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    /// The endpoint named first when the relationship was created.
    #[serde(rename = "fromId")]
    pub from: VertexId,

    /// The other endpoint.
    #[serde(rename = "toId")]
    pub to: VertexId,

    /// Similarity weight in `(0, 1]`.
    pub weight: f64,
}

impl Relationship {
    /// Creates a relationship with a precomputed weight.
    pub fn new(from: impl Into<String>, to: impl Into<String>, weight: f64) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            weight,
        }
    }

    /// Returns true if `id` is one of the endpoints.
    pub fn touches(&self, id: &str) -> bool {
        self.from == id || self.to == id
    }

    /// Returns true if this relationship joins `a` and `b`, in either order.
    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.from == a && self.to == b) || (self.from == b && self.to == a)
    }

    /// The endpoint opposite to `id`.
    pub fn other(&self, id: &str) -> Option<&str> {
        if self.from == id {
            Some(&self.to)
        } else if self.to == id {
            Some(&self.from)
        } else {
            None
        }
    }
}

/// One direction of a relationship, stored in the owner's adjacency list.
#[derive(Debug, Clone, PartialEq)]
pub struct HalfEdge {
    /// The neighbor this half-edge points at.
    pub to: VertexId,

    /// Same value as the owning relationship's weight.
    pub weight: f64,
}

impl HalfEdge {
    pub fn new(to: impl Into<String>, weight: f64) -> Self {
        Self {
            to: to.into(),
            weight,
        }
    }
}

/// A relationship as it appears in a snapshot: endpoints only.
///
/// Weights are never persisted, they are re-derived on import.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipRef {
    pub from_id: VertexId,
    pub to_id: VertexId,
}

impl RelationshipRef {
    pub fn new(from_id: impl Into<String>, to_id: impl Into<String>) -> Self {
        Self {
            from_id: from_id.into(),
            to_id: to_id.into(),
        }
    }
}

impl From<&Relationship> for RelationshipRef {
    fn from(rel: &Relationship) -> Self {
        Self::new(rel.from.clone(), rel.to.clone())
    }
}
