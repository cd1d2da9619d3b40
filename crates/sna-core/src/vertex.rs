//! Vertex types for the social graph.
//!
//! A vertex is a person. Its three numeric attributes are what the
//! weight model compares when two people are connected.

use serde::{Deserialize, Serialize};

/// String identifier of a vertex. Unique within a graph, never changes.
pub type VertexId = String;

/// A person in the social graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vertex {
    /// Unique identifier.
    pub id: VertexId,

    /// Display name.
    pub name: String,

    /// How active the person is.
    #[serde(default)]
    pub activity: f64,

    /// How much the person interacts with others.
    #[serde(default)]
    pub interaction: f64,

    /// Number of relationships, maintained by the graph as relationships
    /// come and go. An explicit update may overwrite it.
    #[serde(default)]
    pub connection_count: u32,
}

impl Vertex {
    /// Creates a vertex with all numeric attributes at zero.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            activity: 0.0,
            interaction: 0.0,
            connection_count: 0,
        }
    }

    pub fn with_activity(mut self, activity: f64) -> Self {
        self.activity = activity;
        self
    }

    pub fn with_interaction(mut self, interaction: f64) -> Self {
        self.interaction = interaction;
        self
    }

    pub fn with_connection_count(mut self, connection_count: u32) -> Self {
        self.connection_count = connection_count;
        self
    }

    /// Applies every field present in `update`. The id is never touched.
    pub fn apply(&mut self, update: &VertexUpdate) {
        if let Some(ref name) = update.name {
            self.name = name.clone();
        }
        if let Some(activity) = update.activity {
            self.activity = activity;
        }
        if let Some(interaction) = update.interaction {
            self.interaction = interaction;
        }
        if let Some(count) = update.connection_count {
            self.connection_count = count;
        }
    }

    /// Records one more relationship.
    pub fn increment_connections(&mut self) {
        self.connection_count = self.connection_count.saturating_add(1);
    }

    /// Records one relationship fewer, never going below zero.
    pub fn decrement_connections(&mut self) {
        self.connection_count = self.connection_count.saturating_sub(1);
    }
}

/// A partial update to a vertex. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VertexUpdate {
    pub name: Option<String>,
    pub activity: Option<f64>,
    pub interaction: Option<f64>,
    pub connection_count: Option<u32>,
}

impl VertexUpdate {
    /// Returns true if the update would change nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.activity.is_none()
            && self.interaction.is_none()
            && self.connection_count.is_none()
    }
}
