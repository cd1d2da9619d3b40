//! WebSocket server implementation.
//!
//! Handles client connections and routes messages to handlers.

use crate::handlers::{
    handle_algorithm, handle_algorithm_run, handle_graph_get, handle_info, handle_load,
    handle_neighbors, handle_relationship_add, handle_relationship_remove, handle_save,
    handle_search, handle_vertex_add, handle_vertex_get, handle_vertex_remove,
    handle_vertex_update, with_store,
};
use crate::protocol::{Request, Response};
use crate::{SharedGraph, SharedStore};
use futures_util::{SinkExt, StreamExt};
use serde::de::DeserializeOwned;
use serde_json::Value;
use sna_graph::{AlgorithmKind, AlgorithmParams, ImportReport, SocialGraph, StoreError};
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::RwLock;
use tokio_tungstenite::{accept_async, tungstenite, tungstenite::Message};
use tracing::{debug, error, info, warn};

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to.
    pub addr: SocketAddr,
    /// Save the graph to the store when the server shuts down.
    pub autosave: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 4000)),
            autosave: true,
        }
    }
}

/// The social graph WebSocket server.
pub struct SnaServer {
    config: ServerConfig,
    graph: SharedGraph,
    store: SharedStore,
}

impl SnaServer {
    /// Creates a new server around a graph and the store it persists to.
    pub fn new(graph: SocialGraph, store: SharedStore, config: ServerConfig) -> Self {
        Self {
            config,
            graph: Arc::new(RwLock::new(graph)),
            store,
        }
    }

    /// Returns a handle to the shared graph for updates.
    pub fn graph(&self) -> SharedGraph {
        self.graph.clone()
    }

    /// Replaces the graph with the stored snapshot, if there is one.
    pub async fn restore(&self) -> Result<Option<ImportReport>, StoreError> {
        let Some(snapshot) = with_store(self.store.clone(), |s| s.load()).await? else {
            info!("No stored graph at {}", self.store.location().display());
            return Ok(None);
        };

        let report = self.graph.write().await.import_snapshot(&snapshot);
        info!(
            "Restored {} vertices and {} relationships",
            report.vertices_loaded, report.relationships_loaded
        );
        if report.skipped() > 0 {
            warn!("Skipped {} invalid snapshot entries", report.skipped());
        }
        Ok(Some(report))
    }

    /// Writes the current graph to the store.
    pub async fn persist(&self) -> Result<(), StoreError> {
        let snapshot = self.graph.read().await.export_snapshot();
        with_store(self.store.clone(), move |s| s.save(&snapshot)).await
    }

    /// Runs the server until Ctrl-C, then autosaves if configured.
    pub async fn run(&self) -> Result<(), ServerError> {
        let listener = TcpListener::bind(&self.config.addr).await?;
        info!("SNA server listening on ws://{}", self.config.addr);

        loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, addr)) => {
                        debug!("New connection from {}", addr);
                        let graph = self.graph.clone();
                        let store = self.store.clone();
                        tokio::spawn(async move {
                            if let Err(e) = handle_connection(stream, addr, graph, store).await {
                                error!("Connection error from {}: {}", addr, e);
                            }
                        });
                    }
                    Err(e) => {
                        error!("Accept error: {}", e);
                    }
                },
                signal = tokio::signal::ctrl_c() => {
                    if let Err(e) = signal {
                        error!("Failed to listen for shutdown signal: {}", e);
                    }
                    break;
                }
            }
        }

        info!("Shutting down");
        if self.config.autosave {
            self.persist().await?;
        }
        Ok(())
    }
}

/// Handles a single WebSocket connection.
async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    graph: SharedGraph,
    store: SharedStore,
) -> Result<(), ServerError> {
    let ws_stream = accept_async(stream).await?;
    info!("WebSocket connection established with {}", addr);

    let (mut write, mut read) = ws_stream.split();

    while let Some(msg) = read.next().await {
        let msg = match msg {
            Ok(m) => m,
            Err(e) => {
                warn!("Message error from {}: {}", addr, e);
                break;
            }
        };

        if msg.is_close() {
            debug!("Client {} disconnected", addr);
            break;
        }

        if msg.is_ping() {
            write.send(Message::Pong(msg.into_data())).await?;
            continue;
        }

        if msg.is_text() {
            let text = msg.to_text().unwrap_or("");
            let response = process_message(text, graph.clone(), store.clone()).await;
            let json = serde_json::to_string(&response)?;
            write.send(Message::Text(json)).await?;
        }
    }

    info!("Connection closed: {}", addr);
    Ok(())
}

/// Reads method parameters. Absent params count as an empty object.
fn parse_params<T: DeserializeOwned>(params: Value) -> Result<T, String> {
    let params = match params {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    serde_json::from_value(params).map_err(|e| e.to_string())
}

/// Processes a JSON-RPC message and returns a response.
pub async fn process_message(text: &str, graph: SharedGraph, store: SharedStore) -> Response {
    let request: Request = match serde_json::from_str(text) {
        Ok(r) => r,
        Err(_) => return Response::parse_error(),
    };

    let id = request.id.clone();
    let method = request.method.as_str();

    debug!("Processing method: {}", method);

    match method {
        "graph.info" => handle_info(graph, id).await,
        "graph.get" => handle_graph_get(graph, id).await,
        "graph.save" => handle_save(graph, store, id).await,
        "graph.load" => handle_load(graph, store, id).await,

        "vertex.add" => match parse_params(request.params) {
            Ok(vertex) => handle_vertex_add(graph, id, vertex).await,
            Err(e) => Response::invalid_params(id, e),
        },

        "vertex.get" => match parse_params(request.params) {
            Ok(params) => handle_vertex_get(graph, id, params).await,
            Err(e) => Response::invalid_params(id, e),
        },

        "vertex.update" => match parse_params(request.params) {
            Ok(params) => handle_vertex_update(graph, id, params).await,
            Err(e) => Response::invalid_params(id, e),
        },

        "vertex.remove" => match parse_params(request.params) {
            Ok(params) => handle_vertex_remove(graph, id, params).await,
            Err(e) => Response::invalid_params(id, e),
        },

        "vertex.search" => match parse_params(request.params) {
            Ok(params) => handle_search(graph, id, params).await,
            Err(e) => Response::invalid_params(id, e),
        },

        "vertex.neighbors" => match parse_params(request.params) {
            Ok(params) => handle_neighbors(graph, id, params).await,
            Err(e) => Response::invalid_params(id, e),
        },

        "relationship.add" => match parse_params(request.params) {
            Ok(params) => handle_relationship_add(graph, id, params).await,
            Err(e) => Response::invalid_params(id, e),
        },

        "relationship.remove" => match parse_params(request.params) {
            Ok(params) => handle_relationship_remove(graph, id, params).await,
            Err(e) => Response::invalid_params(id, e),
        },

        "algorithm.run" => match parse_params(request.params) {
            Ok(params) => handle_algorithm_run(graph, id, params).await,
            Err(e) => Response::invalid_params(id, e),
        },

        // algorithm.bfs, algorithm.degree-centrality, ...
        _ => match method
            .strip_prefix("algorithm.")
            .and_then(|slug| slug.parse::<AlgorithmKind>().ok())
        {
            Some(kind) => match parse_params::<AlgorithmParams>(request.params) {
                Ok(params) => handle_algorithm(graph, id, kind, params).await,
                Err(e) => Response::invalid_params(id, e),
            },
            None => Response::method_not_found(id, method),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sna_graph::{JsonFileStore, SledStore};
    use tempfile::TempDir;

    struct Fixture {
        graph: SharedGraph,
        store: SharedStore,
        _dir: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let store: SharedStore = Arc::new(JsonFileStore::new(dir.path().join("graph.json")));
            Self {
                graph: Arc::new(RwLock::new(SocialGraph::new())),
                store,
                _dir: dir,
            }
        }

        async fn call(&self, method: &str, params: Value) -> Value {
            let text = json!({"jsonrpc": "2.0", "id": 1, "method": method, "params": params})
                .to_string();
            let response = process_message(&text, self.graph.clone(), self.store.clone()).await;
            serde_json::to_value(response).unwrap()
        }

        /// Scenario graph: 1 - 2 - 3.
        async fn seed(&self) {
            for id in ["1", "2", "3"] {
                let v = self
                    .call("vertex.add", json!({"id": id, "name": format!("P{id}")}))
                    .await;
                assert!(v.get("error").is_none(), "{v}");
            }
            self.call("relationship.add", json!({"fromId": "1", "toId": "2"}))
                .await;
            self.call("relationship.add", json!({"fromId": "2", "toId": "3"}))
                .await;
        }
    }

    #[tokio::test]
    async fn test_parse_error() {
        let fx = Fixture::new();
        let resp = process_message("{not json", fx.graph.clone(), fx.store.clone()).await;
        assert_eq!(resp.error.unwrap().code, -32700);
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let fx = Fixture::new();
        let resp = fx.call("graph.explode", Value::Null).await;
        assert_eq!(resp["error"]["code"], -32601);

        let resp = fx.call("algorithm.pagerank", Value::Null).await;
        assert_eq!(resp["error"]["code"], -32601);
    }

    #[tokio::test]
    async fn test_vertex_lifecycle() {
        let fx = Fixture::new();
        fx.seed().await;

        let info = fx.call("graph.info", Value::Null).await;
        assert_eq!(info["result"]["vertexCount"], 3);
        assert_eq!(info["result"]["relationshipCount"], 2);

        let v = fx.call("vertex.get", json!({"id": "2"})).await;
        assert_eq!(v["result"]["name"], "P2");
        assert_eq!(v["result"]["connectionCount"], 2);
        assert_eq!(v["result"]["neighbors"], json!(["1", "3"]));

        let updated = fx
            .call("vertex.update", json!({"id": "2", "activity": 4.0}))
            .await;
        assert_eq!(updated["result"]["activity"], 4.0);
        assert_eq!(updated["result"]["name"], "P2");

        let removed = fx.call("vertex.remove", json!({"id": "2"})).await;
        assert_eq!(removed["result"]["removed"], "2");

        let neighbors = fx.call("vertex.neighbors", json!({"id": "1"})).await;
        assert_eq!(neighbors["result"]["nodes"], json!([]));
    }

    #[tokio::test]
    async fn test_error_codes() {
        let fx = Fixture::new();
        fx.seed().await;

        let dup = fx.call("vertex.add", json!({"id": "1", "name": "again"})).await;
        assert_eq!(dup["error"]["code"], -32002);

        let missing = fx.call("vertex.get", json!({"id": "404"})).await;
        assert_eq!(missing["error"]["code"], -32001);

        let self_loop = fx
            .call("relationship.add", json!({"fromId": "1", "toId": "1"}))
            .await;
        assert_eq!(self_loop["error"]["code"], -32602);

        let dup_rel = fx
            .call("relationship.add", json!({"fromId": "2", "toId": "1"}))
            .await;
        assert_eq!(dup_rel["error"]["code"], -32002);

        let bad_shape = fx.call("vertex.add", json!({"name": "no id"})).await;
        assert_eq!(bad_shape["error"]["code"], -32602);

        let empty_start = fx
            .call("algorithm.run", json!({"algorithm": "BFS", "startNodeId": ""}))
            .await;
        assert_eq!(empty_start["error"]["code"], -32602);
    }

    #[tokio::test]
    async fn test_relationship_remove() {
        let fx = Fixture::new();
        fx.seed().await;

        let resp = fx
            .call("relationship.remove", json!({"fromId": "3", "toId": "2"}))
            .await;
        assert_eq!(resp["result"]["removed"], true);

        let graph = fx.call("graph.get", Value::Null).await;
        assert_eq!(graph["result"]["edges"].as_array().unwrap().len(), 1);
        assert_eq!(graph["result"]["nodes"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_algorithms() {
        let fx = Fixture::new();
        fx.seed().await;

        let bfs = fx
            .call("algorithm.run", json!({"algorithm": "BFS", "startNodeId": "1"}))
            .await;
        assert_eq!(bfs["result"]["algorithm"], "BFS");
        assert_eq!(bfs["result"]["details"]["visitOrder"], json!(["1", "2", "3"]));
        assert_eq!(
            bfs["result"]["details"]["distances"],
            json!({"1": 0, "2": 1, "3": 2})
        );

        let coloring = fx.call("algorithm.welsh-powell", Value::Null).await;
        assert_eq!(coloring["result"]["details"]["colorCount"], 2);

        let components = fx.call("algorithm.connected-components", json!({})).await;
        assert_eq!(components["result"]["details"]["componentCount"], 1);

        let missing = fx.call("algorithm.dfs", Value::Null).await;
        assert_eq!(missing["error"]["code"], -32602);

        let unknown = fx
            .call("algorithm.run", json!({"algorithm": "PageRank"}))
            .await;
        assert_eq!(unknown["error"]["code"], -32602);

        let not_found = fx
            .call("algorithm.dijkstra", json!({"startNodeId": "1", "targetNodeId": "9"}))
            .await;
        assert_eq!(not_found["error"]["code"], -32001);
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let fx = Fixture::new();

        let empty = fx.call("graph.load", Value::Null).await;
        assert_eq!(empty["result"]["message"], "No saved graph found.");

        fx.seed().await;
        let saved = fx.call("graph.save", Value::Null).await;
        assert_eq!(saved["result"]["message"], "Graph saved.");

        fx.call("vertex.remove", json!({"id": "3"})).await;
        assert_eq!(fx.graph.read().await.vertex_count(), 2);

        let loaded = fx.call("graph.load", Value::Null).await;
        assert_eq!(loaded["result"]["message"], "Graph loaded.");
        assert_eq!(loaded["result"]["skipped"], 0);
        assert_eq!(loaded["result"]["nodes"].as_array().unwrap().len(), 3);
        assert_eq!(loaded["result"]["edges"].as_array().unwrap().len(), 2);

        let g = fx.graph.read().await;
        assert_eq!(g.vertex("2").unwrap().connection_count, 2);
    }

    #[tokio::test]
    async fn test_restore_and_persist() {
        let fx = Fixture::new();
        fx.seed().await;

        let server = SnaServer::new(SocialGraph::new(), fx.store.clone(), ServerConfig::default());
        assert!(server.restore().await.unwrap().is_none());

        fx.call("graph.save", Value::Null).await;
        let report = server.restore().await.unwrap().unwrap();
        assert_eq!(report.vertices_loaded, 3);
        assert_eq!(report.relationships_loaded, 2);

        server.graph().write().await.remove_vertex("1").unwrap();
        server.persist().await.unwrap();
        let stored = fx.store.load().unwrap().unwrap();
        assert_eq!(stored.vertices.len(), 2);
    }

    #[tokio::test]
    async fn test_save_and_load_through_sled() {
        let dir = tempfile::tempdir().unwrap();
        let store: SharedStore = Arc::new(SledStore::open(dir.path().join("graph.db")).unwrap());
        let fx = Fixture {
            graph: Arc::new(RwLock::new(SocialGraph::new())),
            store,
            _dir: dir,
        };
        fx.seed().await;

        let saved = fx.call("graph.save", Value::Null).await;
        assert_eq!(saved["result"]["message"], "Graph saved.");

        fx.graph.write().await.clear();
        let loaded = fx.call("graph.load", Value::Null).await;
        assert_eq!(loaded["result"]["nodes"].as_array().unwrap().len(), 3);
        assert_eq!(loaded["result"]["edges"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unwritable_store_reports_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        // The snapshot's parent directory is a regular file.
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();
        let store: SharedStore = Arc::new(JsonFileStore::new(blocker.join("graph.json")));
        let fx = Fixture {
            graph: Arc::new(RwLock::new(SocialGraph::new())),
            store,
            _dir: dir,
        };
        fx.seed().await;

        let saved = fx.call("graph.save", Value::Null).await;
        assert_eq!(saved["error"]["code"], -32003);

        let server = SnaServer::new(SocialGraph::new(), fx.store.clone(), ServerConfig::default());
        assert!(server.persist().await.is_err());
    }
}
