//! # Distance Graph
//!
//! The `DistanceGraph` is a complete, symmetric, weighted graph over the vertex indices
//! `[0, N)`. It is built once per solving session, either from planar coordinates or from
//! an explicit distance matrix, and is read-only afterwards. Reproduction workers share it
//! through an `Arc` without locking.
//!
//! A vertex has no distance to itself: asking for one is treated as a bug in the caller
//! and fails with [`HamiltonError::SelfDistance`] instead of returning zero.
//!
//! ## Example
//!
//! ```rust
//! use hamilton::graph::{DistanceGraph, Point};
//!
//! let graph = DistanceGraph::from_points(&[
//!     Point::new(0.0, 0.0),
//!     Point::new(3.0, 0.0),
//!     Point::new(3.0, 4.0),
//! ]);
//!
//! assert_eq!(graph.distance(0, 2).unwrap(), 5.0);
//! // The open path 0 -> 1 -> 2 does not return to 0.
//! assert_eq!(graph.path_length(&[0, 1, 2]).unwrap(), 7.0);
//! assert_eq!(graph.cycle_length(&[0, 1, 2]).unwrap(), 12.0);
//! ```

use crate::error::{HamiltonError, Result};

/// A point on the plane.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance between two points.
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Symmetric distance matrix over `count` vertices.
///
/// With the `serde` feature the graph is written as its rows, unset entries and the
/// diagonal as `null`, and read back through [`DistanceGraph::from_matrix`].
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<Vec<Option<f64>>>", into = "Vec<Vec<Option<f64>>>")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceGraph {
    count: usize,
    /// Row-major `count * count` entries. Unset entries and the diagonal hold `+inf`.
    dist: Vec<f64>,
}

impl DistanceGraph {
    /// Creates a graph of `count` vertices with every distance set to `+inf`.
    pub fn new(count: usize) -> Self {
        Self {
            count,
            dist: vec![f64::INFINITY; count * count],
        }
    }

    /// Creates a graph from planar coordinates.
    ///
    /// Each unordered pair is measured once and mirrored.
    pub fn from_points(points: &[Point]) -> Self {
        let mut graph = Self::new(points.len());
        for i in 0..points.len() {
            for j in 0..i {
                let d = points[i].distance(&points[j]);
                graph.write(i, j, d);
            }
        }
        graph
    }

    /// Creates a graph from an explicit distance matrix.
    ///
    /// The matrix must be square and symmetric, with off-diagonal entries that are
    /// non-negative or `+inf`. The diagonal is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`HamiltonError::InvalidMatrix`] if any of the above does not hold.
    pub fn from_matrix(matrix: Vec<Vec<f64>>) -> Result<Self> {
        let count = matrix.len();
        if let Some((row, values)) = matrix.iter().enumerate().find(|(_, r)| r.len() != count) {
            return Err(HamiltonError::InvalidMatrix(format!(
                "row {} has {} entries, expected {}",
                row,
                values.len(),
                count
            )));
        }

        let mut graph = Self::new(count);
        for i in 0..count {
            for j in 0..i {
                let d = matrix[i][j];
                if d.is_nan() || d < 0.0 {
                    return Err(HamiltonError::InvalidMatrix(format!(
                        "entry ({}, {}) is {}, distances must be non-negative",
                        i, j, d
                    )));
                }
                if d != matrix[j][i] {
                    return Err(HamiltonError::InvalidMatrix(format!(
                        "entries ({}, {}) = {} and ({}, {}) = {} differ",
                        i, j, d, j, i, matrix[j][i]
                    )));
                }
                graph.write(i, j, d);
            }
        }
        Ok(graph)
    }

    /// Returns the number of vertices.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns the distance between two distinct vertices.
    ///
    /// # Errors
    ///
    /// - [`HamiltonError::SelfDistance`] when `i == j`.
    /// - [`HamiltonError::VertexOutOfRange`] when an index is not a vertex of this graph.
    pub fn distance(&self, i: usize, j: usize) -> Result<f64> {
        self.check_pair(i, j)?;
        Ok(self.dist[i * self.count + j])
    }

    /// Sets the distance between two distinct vertices, in both directions.
    ///
    /// # Errors
    ///
    /// Same as [`DistanceGraph::distance`].
    pub fn set_distance(&mut self, i: usize, j: usize, distance: f64) -> Result<()> {
        self.check_pair(i, j)?;
        self.write(i, j, distance);
        Ok(())
    }

    /// Sums the distances between consecutive vertices of `order`.
    ///
    /// No closing edge is added: for a cycle, the edge from the last vertex back to
    /// the first is not counted. Use [`DistanceGraph::cycle_length`] for that.
    pub fn path_length(&self, order: &[usize]) -> Result<f64> {
        order
            .windows(2)
            .try_fold(0.0, |acc, pair| -> Result<f64> {
                Ok(acc + self.distance(pair[0], pair[1])?)
            })
    }

    /// Length of the closed tour visiting `order` and returning to its first vertex.
    pub fn cycle_length(&self, order: &[usize]) -> Result<f64> {
        match (order.first(), order.last()) {
            (Some(&first), Some(&last)) if order.len() > 1 => {
                Ok(self.path_length(order)? + self.distance(last, first)?)
            }
            _ => Ok(0.0),
        }
    }

    fn check_pair(&self, i: usize, j: usize) -> Result<()> {
        for index in [i, j] {
            if index >= self.count {
                return Err(HamiltonError::VertexOutOfRange {
                    index,
                    count: self.count,
                });
            }
        }
        if i == j {
            return Err(HamiltonError::SelfDistance { index: i });
        }
        Ok(())
    }

    fn write(&mut self, i: usize, j: usize, distance: f64) {
        self.dist[i * self.count + j] = distance;
        self.dist[j * self.count + i] = distance;
    }
}

impl TryFrom<Vec<Vec<Option<f64>>>> for DistanceGraph {
    type Error = HamiltonError;

    /// Missing entries stand for unset distances.
    fn try_from(rows: Vec<Vec<Option<f64>>>) -> Result<Self> {
        let matrix = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|entry| entry.unwrap_or(f64::INFINITY))
                    .collect()
            })
            .collect();
        Self::from_matrix(matrix)
    }
}

impl From<DistanceGraph> for Vec<Vec<Option<f64>>> {
    fn from(graph: DistanceGraph) -> Self {
        graph
            .dist
            .chunks(graph.count.max(1))
            .take(graph.count)
            .map(|row| row.iter().map(|&d| Some(d).filter(|d| d.is_finite())).collect())
            .collect()
    }
}
