//! SNA Core - The people in the social graph
//!
//! This crate defines the vertex model shared by every other crate,
//! the rule that turns two vertices into a relationship weight, and
//! the error taxonomy returned by graph operations.
//!
//! # Example
//!
//! ```
//! use sna_core::{similarity_weight, Vertex};
//!
//! let ada = Vertex::new("1", "Ada").with_activity(0.8).with_interaction(0.4);
//! let bob = Vertex::new("2", "Bob").with_activity(0.8).with_interaction(0.4);
//!
//! // Identical attributes give the maximum weight.
//! assert_eq!(similarity_weight(&ada, &bob), 1.0);
//! ```

mod error;
mod vertex;
pub mod weight;

pub use error::{GraphError, Result};
pub use vertex::{Vertex, VertexId, VertexUpdate};
pub use weight::similarity_weight;
