//! # Error Types
//!
//! This module defines the error type shared by the distance graph, the genotype
//! operators, the ecosystem and the model layer. Every failure is a validation
//! failure the caller can react to; none of them is swallowed, except for
//! crossover failures inside a reproduction worker, which are logged and leave
//! the affected child slot empty.
//!
//! ## Examples
//!
//! Matching on a specific failure:
//!
//! ```rust
//! use hamilton::error::HamiltonError;
//! use hamilton::graph::DistanceGraph;
//!
//! let graph = DistanceGraph::new(3);
//! match graph.distance(1, 1) {
//!     Err(HamiltonError::SelfDistance { index }) => assert_eq!(index, 1),
//!     other => panic!("unexpected result: {:?}", other),
//! }
//! ```
//!
//! Using the `OptionExt` trait to convert `Option` to `Result`:
//!
//! ```rust
//! use hamilton::error::{HamiltonError, OptionExt};
//!
//! fn first_vertex(order: &[usize]) -> hamilton::error::Result<usize> {
//!     order.first().copied().ok_or_else_hamilton(|| {
//!         HamiltonError::TooShortCycle(order.len())
//!     })
//! }
//!
//! assert!(first_vertex(&[]).is_err());
//! ```

use thiserror::Error;

/// Represents errors that can occur while building or evolving cycles.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HamiltonError {
    /// A vertex's distance to itself was requested or written.
    #[error("Self distance error: vertex {index} has no distance to itself")]
    SelfDistance { index: usize },

    /// A vertex index does not belong to the graph.
    #[error("Vertex out of range: index {index} in a graph of {count} vertices")]
    VertexOutOfRange { index: usize, count: usize },

    /// An explicit distance matrix was rejected.
    #[error("Invalid distance matrix: {0}")]
    InvalidMatrix(String),

    /// The ecosystem configuration is invalid.
    #[error("Ecosystem construction error: {0}")]
    EcosystemConstruction(String),

    /// Two genotypes of different lengths were combined.
    #[error("Size mismatch: cannot combine cycles of {left} and {right} vertices")]
    SizeMismatch { left: usize, right: usize },

    /// A cycle needs at least three vertices.
    #[error("Too short cycle: {0} vertices, at least 3 are required")]
    TooShortCycle(usize),

    /// A visiting order is not a permutation of `[0, N)`.
    #[error("Invalid permutation: {0}")]
    InvalidPermutation(String),

    /// The reproduction worker pool could not be started.
    #[error("Worker pool error: {0}")]
    WorkerPool(String),

    /// The model was driven in an invalid way.
    #[error("Model error: {0}")]
    Model(String),
}

/// A specialized Result type for cycle operations.
///
/// This type is a convenience wrapper around `std::result::Result` with the error type
/// fixed to `HamiltonError`.
pub type Result<T> = std::result::Result<T, HamiltonError>;

/// Extension trait for Option to convert to Result with a custom error.
pub trait OptionExt<T> {
    /// Converts an `Option<T>` to a `Result<T, HamiltonError>` using
    /// a closure to generate the error.
    fn ok_or_else_hamilton<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> HamiltonError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_else_hamilton<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> HamiltonError,
    {
        self.ok_or_else(err_fn)
    }
}
