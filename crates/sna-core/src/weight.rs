//! Relationship weight derivation.
//!
//! Two people who look alike (similar activity, interaction and number of
//! connections) get a weight close to 1. The weight decays towards 0 as
//! they drift apart:
//!
//! ```text
//! weight = 1 / (1 + dx² + dy² + dz²)
//! ```

use crate::vertex::Vertex;

/// Computes the weight of a relationship between `a` and `b`.
///
/// The result is symmetric and lies in `(0, 1]` for finite attributes.
/// Differences large enough to overflow the squared sum clamp to
/// `f64::MIN_POSITIVE` rather than reaching zero.
pub fn similarity_weight(a: &Vertex, b: &Vertex) -> f64 {
    let dx = a.activity - b.activity;
    let dy = a.interaction - b.interaction;
    let dz = f64::from(a.connection_count) - f64::from(b.connection_count);

    (1.0 / (1.0 + dx * dx + dy * dy + dz * dz)).max(f64::MIN_POSITIVE)
}
