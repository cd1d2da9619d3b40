//! Request handlers for protocol methods.
//!
//! Each handler implements one method. Mutations take the graph's write
//! lock, everything else the read lock, so a handler always sees and
//! leaves a consistent graph.

use crate::protocol::{
    RelationshipParams, Response, RunParams, SearchParams, VertexIdParams, VertexUpdateParams,
};
use crate::{SharedGraph, SharedStore};
use serde::Serialize;
use serde_json::{json, Value};
use sna_core::{GraphError, Vertex};
use sna_graph::{AlgorithmKind, AlgorithmParams, SnapshotStore, StoreError};
use tracing::{debug, info, warn};

/// Runs a store call on the blocking thread pool. Both backends do
/// synchronous file I/O.
pub(crate) async fn with_store<T, F>(store: SharedStore, call: F) -> Result<T, StoreError>
where
    T: Send + 'static,
    F: FnOnce(&dyn SnapshotStore) -> Result<T, StoreError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || call(store.as_ref()))
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
}

/// Handles the graph.info method.
pub async fn handle_info(graph: SharedGraph, id: Option<Value>) -> Response {
    let g = graph.read().await;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct InfoResult {
        vertex_count: usize,
        relationship_count: usize,
        version: &'static str,
    }

    Response::success(
        id,
        InfoResult {
            vertex_count: g.vertex_count(),
            relationship_count: g.relationship_count(),
            version: env!("CARGO_PKG_VERSION"),
        },
    )
}

/// Handles the graph.get method.
pub async fn handle_graph_get(graph: SharedGraph, id: Option<Value>) -> Response {
    let g = graph.read().await;
    Response::success(id, g.view())
}

/// Handles the graph.save method.
pub async fn handle_save(graph: SharedGraph, store: SharedStore, id: Option<Value>) -> Response {
    let snapshot = graph.read().await.export_snapshot();
    let (vertices, relationships) = (snapshot.vertices.len(), snapshot.relationships.len());

    match with_store(store, move |s| s.save(&snapshot)).await {
        Ok(()) => {
            info!("Saved {} vertices and {} relationships", vertices, relationships);
            Response::success(id, json!({ "message": "Graph saved." }))
        }
        Err(e) => Response::storage_error(id, &e),
    }
}

/// Handles the graph.load method.
///
/// A store with nothing in it leaves the current graph untouched.
pub async fn handle_load(graph: SharedGraph, store: SharedStore, id: Option<Value>) -> Response {
    let snapshot = match with_store(store.clone(), |s| s.load()).await {
        Ok(snapshot) => snapshot,
        Err(e) => return Response::storage_error(id, &e),
    };

    let mut g = graph.write().await;

    let (message, skipped) = match snapshot {
        Some(snapshot) => {
            let report = g.import_snapshot(&snapshot);
            if report.skipped() > 0 {
                warn!(
                    "Skipped {} vertices and {} relationships while loading",
                    report.skipped_vertices, report.skipped_relationships
                );
            }
            ("Graph loaded.", report.skipped())
        }
        None => {
            debug!("No saved graph at {}", store.location().display());
            ("No saved graph found.", 0)
        }
    };

    let view = g.view();
    Response::success(
        id,
        json!({
            "message": message,
            "skipped": skipped,
            "nodes": view.nodes,
            "edges": view.edges,
        }),
    )
}

/// Handles the vertex.add method.
pub async fn handle_vertex_add(graph: SharedGraph, id: Option<Value>, vertex: Vertex) -> Response {
    let mut g = graph.write().await;
    match g.add_vertex(vertex) {
        Ok(vertex) => Response::success(id, vertex),
        Err(e) => Response::graph_error(id, &e),
    }
}

/// Handles the vertex.get method.
pub async fn handle_vertex_get(
    graph: SharedGraph,
    id: Option<Value>,
    params: VertexIdParams,
) -> Response {
    let g = graph.read().await;

    #[derive(Serialize)]
    struct VertexDetail<'a> {
        #[serde(flatten)]
        vertex: &'a Vertex,
        neighbors: Vec<&'a str>,
    }

    match g.vertex(&params.id) {
        Some(vertex) => Response::success(
            id,
            VertexDetail {
                vertex,
                neighbors: g.neighbor_ids(&params.id).collect(),
            },
        ),
        None => Response::graph_error(id, &GraphError::NotFound(params.id)),
    }
}

/// Handles the vertex.update method.
pub async fn handle_vertex_update(
    graph: SharedGraph,
    id: Option<Value>,
    params: VertexUpdateParams,
) -> Response {
    let mut g = graph.write().await;
    match g.update_vertex(&params.id, &params.update) {
        Ok(vertex) => Response::success(id, vertex),
        Err(e) => Response::graph_error(id, &e),
    }
}

/// Handles the vertex.remove method.
pub async fn handle_vertex_remove(
    graph: SharedGraph,
    id: Option<Value>,
    params: VertexIdParams,
) -> Response {
    let mut g = graph.write().await;
    match g.remove_vertex(&params.id) {
        Ok(vertex) => Response::success(id, json!({ "removed": vertex.id })),
        Err(e) => Response::graph_error(id, &e),
    }
}

/// Handles the vertex.search method.
pub async fn handle_search(graph: SharedGraph, id: Option<Value>, params: SearchParams) -> Response {
    let g = graph.read().await;

    debug!("Search: {}", params.query);

    let mut matches = g.search(&params.query);
    let total = matches.len();
    matches.truncate(params.limit);

    Response::success(id, json!({ "nodes": matches, "total": total }))
}

/// Handles the vertex.neighbors method.
pub async fn handle_neighbors(
    graph: SharedGraph,
    id: Option<Value>,
    params: VertexIdParams,
) -> Response {
    let g = graph.read().await;
    if !g.contains(&params.id) {
        return Response::graph_error(id, &GraphError::NotFound(params.id));
    }
    Response::success(id, json!({ "nodes": g.neighbors(&params.id) }))
}

/// Handles the relationship.add method.
pub async fn handle_relationship_add(
    graph: SharedGraph,
    id: Option<Value>,
    params: RelationshipParams,
) -> Response {
    let mut g = graph.write().await;
    match g.add_relationship(&params.from_id, &params.to_id) {
        Ok(rel) => Response::success(id, rel),
        Err(e) => Response::graph_error(id, &e),
    }
}

/// Handles the relationship.remove method.
pub async fn handle_relationship_remove(
    graph: SharedGraph,
    id: Option<Value>,
    params: RelationshipParams,
) -> Response {
    let mut g = graph.write().await;
    let removed = g.remove_relationship(&params.from_id, &params.to_id);
    Response::success(id, json!({ "removed": removed }))
}

/// Handles the algorithm.run method.
pub async fn handle_algorithm_run(
    graph: SharedGraph,
    id: Option<Value>,
    params: RunParams,
) -> Response {
    let kind: AlgorithmKind = match params.algorithm.parse() {
        Ok(kind) => kind,
        Err(e) => return Response::invalid_params(id, format!("{}", e)),
    };
    let algo_params = AlgorithmParams {
        start_node_id: params.start_node_id,
        target_node_id: params.target_node_id,
    };
    handle_algorithm(graph, id, kind, algo_params).await
}

/// Runs one analysis under the read lock.
pub async fn handle_algorithm(
    graph: SharedGraph,
    id: Option<Value>,
    kind: AlgorithmKind,
    params: AlgorithmParams,
) -> Response {
    let g = graph.read().await;

    debug!("Running {} on {} vertices", kind, g.vertex_count());

    match kind.run(&g, &params) {
        Ok(result) => Response::success(id, result),
        Err(e) => Response::graph_error(id, &e),
    }
}
