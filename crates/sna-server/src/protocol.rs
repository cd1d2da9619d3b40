//! JSON-RPC 2.0 message types and method parameters.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sna_core::{GraphError, VertexId, VertexUpdate};
use sna_graph::StoreError;

/// Invalid JSON was received.
pub const PARSE_ERROR: i32 = -32700;
/// The method does not exist.
pub const METHOD_NOT_FOUND: i32 = -32601;
/// Invalid method parameters.
pub const INVALID_PARAMS: i32 = -32602;
/// A vertex the request names does not exist.
pub const NOT_FOUND: i32 = -32001;
/// The request would duplicate an existing vertex or relationship.
pub const CONFLICT: i32 = -32002;
/// The snapshot store failed.
pub const STORAGE_ERROR: i32 = -32003;

/// An incoming request.
#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    #[serde(default = "default_jsonrpc")]
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

fn default_jsonrpc() -> String {
    "2.0".to_string()
}

/// An outgoing response. Exactly one of `result` and `error` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub jsonrpc: String,
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Response {
    pub fn success(id: Option<Value>, result: impl Serialize) -> Self {
        match serde_json::to_value(result) {
            Ok(value) => Self {
                jsonrpc: "2.0".to_string(),
                id,
                result: Some(value),
                error: None,
            },
            Err(e) => Self::error(id, -32603, format!("Internal error: {}", e)),
        }
    }

    pub fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(RpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }

    pub fn parse_error() -> Self {
        Self::error(None, PARSE_ERROR, "Parse error")
    }

    pub fn method_not_found(id: Option<Value>, method: &str) -> Self {
        Self::error(id, METHOD_NOT_FOUND, format!("Method not found: {}", method))
    }

    pub fn invalid_params(id: Option<Value>, message: impl Into<String>) -> Self {
        Self::error(id, INVALID_PARAMS, message)
    }

    /// Maps a graph failure onto its error code.
    pub fn graph_error(id: Option<Value>, err: &GraphError) -> Self {
        Self::error(id, error_code(err), err.to_string())
    }

    pub fn storage_error(id: Option<Value>, err: &StoreError) -> Self {
        Self::error(id, STORAGE_ERROR, format!("Storage error: {}", err))
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// The JSON-RPC error code reported for a graph failure.
pub fn error_code(err: &GraphError) -> i32 {
    match err {
        GraphError::NotFound(_) | GraphError::EndpointNotFound(_) => NOT_FOUND,
        GraphError::DuplicateId(_) | GraphError::DuplicateRelationship { .. } => CONFLICT,
        GraphError::SelfLoop(_) | GraphError::MissingParameter(_) => INVALID_PARAMS,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Method parameters
// ─────────────────────────────────────────────────────────────────────────────

/// Parameters naming a single vertex.
#[derive(Debug, Clone, Deserialize)]
pub struct VertexIdParams {
    pub id: VertexId,
}

/// Parameters for vertex.update: the id plus any fields to change.
#[derive(Debug, Clone, Deserialize)]
pub struct VertexUpdateParams {
    pub id: VertexId,
    #[serde(flatten)]
    pub update: VertexUpdate,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchParams {
    pub query: String,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    50
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipParams {
    pub from_id: VertexId,
    pub to_id: VertexId,
}

/// Parameters for algorithm.run.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunParams {
    pub algorithm: String,
    #[serde(default)]
    pub start_node_id: Option<VertexId>,
    #[serde(default)]
    pub target_node_id: Option<VertexId>,
}
