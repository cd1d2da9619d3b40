//! SNA Server - WebSocket JSON-RPC access to the social graph
//!
//! This crate exposes a `SocialGraph` to clients over WebSocket using
//! JSON-RPC 2.0 text frames. Clients can edit vertices and
//! relationships, run any of the six analyses, and save or reload the
//! graph through a snapshot store.
//!
//! The server supports:
//! - Multiple concurrent connections sharing one graph
//! - Mutations serialized behind a write lock, reads in parallel
//! - Loading the stored snapshot at startup and saving it on Ctrl-C

use sna_graph::{SnapshotStore, SocialGraph};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared graph state across connections.
pub type SharedGraph = Arc<RwLock<SocialGraph>>;

/// Shared snapshot store.
pub type SharedStore = Arc<dyn SnapshotStore>;

mod handlers;
pub mod protocol;
mod server;

pub use protocol::{Request, Response, RpcError};
pub use server::{process_message, ServerConfig, ServerError, SnaServer};
