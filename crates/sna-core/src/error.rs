//! Error types for graph operations.

use crate::vertex::VertexId;
use thiserror::Error;

/// Everything a graph mutation, query or analysis can fail with.
///
/// Each variant carries the id (or parameter name) that caused it so the
/// request layer can report it without extra context.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Vertex with id {0} already exists")]
    DuplicateId(VertexId),

    #[error("Vertex not found: {0}")]
    NotFound(VertexId),

    #[error("Self-loop relationships are not allowed (vertex {0})")]
    SelfLoop(VertexId),

    #[error("Relationship endpoint not found: {0}")]
    EndpointNotFound(VertexId),

    #[error("Relationship already exists between {from} and {to}")]
    DuplicateRelationship { from: VertexId, to: VertexId },

    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
}

pub type Result<T> = std::result::Result<T, GraphError>;
