//! # Model
//!
//! The narrow contract between the evolutionary engine and whatever drives it (a UI, a
//! command line tool, a test). A model is configured with a graph, initial individuals
//! and ecosystem limits, initialized once, and then simulated for a number of
//! generations on a background thread while reporting progress.
//!
//! Everything crossing this boundary uses plain primitives: coordinate slices,
//! distance matrices and visiting orders as `Vec<usize>`.
//!
//! [`Simulation`] is the implementation shipped with the crate.
pub mod simulation;

use std::{sync::Arc, thread::JoinHandle};

use crate::error::Result;

pub use simulation::Simulation;

/// Receives simulation progress.
///
/// `progress_update` is called once per completed generation with the completed
/// fraction of the run, in `[0, 1]`. A value of exactly `1.0` signals that the run is
/// finished and the best individual can be read.
pub trait ProgressListener: Send + Sync {
    fn progress_update(&self, progress: f64);
}

impl<F> ProgressListener for F
where
    F: Fn(f64) + Send + Sync,
{
    fn progress_update(&self, progress: f64) {
        self(progress)
    }
}

/// Orchestration capabilities of the solver.
pub trait Model {
    /// Uses an explicit symmetric distance matrix as the graph.
    fn create_graph(&mut self, matrix: Vec<Vec<f64>>) -> Result<()>;

    /// Uses the Euclidean distances between the points `(xs[i], ys[i])` as the graph.
    fn create_planar_graph(&mut self, xs: &[f64], ys: &[f64]) -> Result<()>;

    /// Adds an initial individual given as a visiting order.
    fn add_parent(&mut self, order: &[usize]) -> Result<()>;

    /// Removes the initial individual at `index` and returns its visiting order.
    fn remove_parent_at(&mut self, index: usize) -> Result<Vec<usize>>;

    /// Visiting order of the initial individual at `index`.
    fn parent_at(&self, index: usize) -> Result<Vec<usize>>;

    /// Number of initial individuals.
    fn parent_count(&self) -> usize;

    fn set_parent_limit(&mut self, limit: usize);

    fn parent_limit(&self) -> usize;

    fn set_child_limit(&mut self, limit: usize);

    fn child_limit(&self) -> usize;

    fn set_mutation_probability(&mut self, probability: f64);

    fn mutation_probability(&self) -> f64;

    /// Builds the ecosystem from the current configuration.
    ///
    /// Fails with a `Model` error if no graph was created yet, and with
    /// `EcosystemConstruction` if the limits are invalid.
    fn initialize(&mut self) -> Result<()>;

    /// Runs `generations` generations on a background thread.
    ///
    /// The returned handle yields the first fatal error of the run, if any.
    fn simulate(
        &mut self,
        generations: usize,
        listener: Arc<dyn ProgressListener>,
    ) -> Result<JoinHandle<Result<()>>>;

    /// Generations completed since the last `initialize`.
    fn generations_passed(&self) -> usize;

    /// Visiting order of the best current parent.
    fn current_best(&self) -> Option<Vec<usize>>;

    /// Visiting orders of the current parents, best first.
    fn current_parents(&self) -> Vec<Vec<usize>>;

    /// Visiting orders of the current children.
    fn current_children(&self) -> Vec<Vec<usize>>;
}
