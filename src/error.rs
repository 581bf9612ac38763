//! Error types for mesh construction and scene setup.
//!
//! Everything in here is a startup failure. Once a [`World`](crate::world::World)
//! is populated the simulation runs over validated in-memory data and has no
//! recoverable error paths of its own.

use thiserror::Error;

/// A mesh failed to parse or violates its structural invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeshError {
    /// The mesh has no vertices at all.
    #[error("mesh has no vertices")]
    NoVertices,
    /// A face refers to a vertex that does not exist.
    #[error("face {face} refers to vertex {index}, but the mesh only has {vertex_count} vertices")]
    FaceIndexOutOfRange {
        face: usize,
        index: usize,
        vertex_count: usize,
    },
    /// A `v` or `f` record could not be read. `line` is 1-based.
    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: &'static str },
}

/// Fatal configuration problem detected while setting up a simulation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid mesh: {0}")]
    Mesh(#[from] MeshError),
    /// More bodies were requested than the world can hold.
    #[error("world is full (capacity {capacity})")]
    Capacity { capacity: usize },
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        name: &'static str,
        reason: &'static str,
    },
}
