//! # EcosystemOptions
//!
//! The `EcosystemOptions` struct represents the configuration of an [`Ecosystem`]:
//! how many parents survive each generation, how many children are bred, how likely a
//! child is to mutate, how many worker threads breed in parallel, how tours are measured
//! and whether parents compete with their children for survival.
//!
//! ## Example
//!
//! ```rust
//! use hamilton::ecosystem::{EcosystemOptions, TourMetric};
//!
//! let options = EcosystemOptions::builder()
//!     .parent_capacity(10)
//!     .child_capacity(30)
//!     .mutation_probability(0.1)
//!     .tour_metric(TourMetric::ClosedCycle)
//!     .build();
//!
//! assert!(options.validate().is_ok());
//! assert_eq!(options.get_worker_threads(), 8);
//! ```
//!
//! [`Ecosystem`]: super::Ecosystem

use crate::{
    error::{HamiltonError, Result},
    genotype::Genotype,
    graph::DistanceGraph,
};

/// Number of reproduction threads started for every generation.
pub const DEFAULT_WORKER_THREADS: usize = 8;

/// How the length of an individual's tour is measured.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TourMetric {
    /// Sum of the edges between consecutive vertices of the fenotype, without the edge
    /// from the last vertex back to the first. Individuals are ranked by this length
    /// unless configured otherwise.
    #[default]
    OpenPath,
    /// Length of the closed cycle, including the edge back to the first vertex.
    ClosedCycle,
}

impl TourMetric {
    /// Length of the tour visiting `order`.
    pub fn length(&self, graph: &DistanceGraph, order: &[usize]) -> Result<f64> {
        match self {
            TourMetric::OpenPath => graph.path_length(order),
            TourMetric::ClosedCycle => graph.cycle_length(order),
        }
    }

    /// Fitness of an individual: its negated tour length. Higher is better.
    pub fn fitness(&self, graph: &DistanceGraph, individual: &Genotype) -> Result<f64> {
        Ok(-self.length(graph, &individual.fenotype())?)
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct EcosystemOptions {
    parent_capacity: usize,
    child_capacity: usize,
    mutation_probability: f64,
    worker_threads: usize,
    tour_metric: TourMetric,
    /// Whether the current parents are ranked together with their children.
    elitism: bool,
}

impl EcosystemOptions {
    pub fn new(parent_capacity: usize, child_capacity: usize, mutation_probability: f64) -> Self {
        Self {
            parent_capacity,
            child_capacity,
            mutation_probability,
            ..Self::default()
        }
    }

    /// Checks the options an ecosystem cannot be built from.
    ///
    /// # Errors
    ///
    /// Returns [`HamiltonError::EcosystemConstruction`] if the child capacity is below the
    /// parent capacity, if the mutation probability is outside `[0, 1]`, or if no worker
    /// thread is configured.
    pub fn validate(&self) -> Result<()> {
        if self.child_capacity < self.parent_capacity {
            return Err(HamiltonError::EcosystemConstruction(format!(
                "child capacity {} is below parent capacity {}",
                self.child_capacity, self.parent_capacity
            )));
        }

        if !(0.0..=1.0).contains(&self.mutation_probability) {
            return Err(HamiltonError::EcosystemConstruction(format!(
                "mutation probability {} is outside [0, 1]",
                self.mutation_probability
            )));
        }

        if self.worker_threads == 0 {
            return Err(HamiltonError::EcosystemConstruction(
                "at least one worker thread is required".to_string(),
            ));
        }

        Ok(())
    }

    pub fn get_parent_capacity(&self) -> usize {
        self.parent_capacity
    }

    pub fn get_child_capacity(&self) -> usize {
        self.child_capacity
    }

    pub fn get_mutation_probability(&self) -> f64 {
        self.mutation_probability
    }

    pub fn get_worker_threads(&self) -> usize {
        self.worker_threads
    }

    pub fn get_tour_metric(&self) -> TourMetric {
        self.tour_metric
    }

    pub fn get_elitism(&self) -> bool {
        self.elitism
    }

    pub fn set_parent_capacity(&mut self, parent_capacity: usize) {
        self.parent_capacity = parent_capacity;
    }

    pub fn set_child_capacity(&mut self, child_capacity: usize) {
        self.child_capacity = child_capacity;
    }

    pub fn set_mutation_probability(&mut self, mutation_probability: f64) {
        self.mutation_probability = mutation_probability;
    }

    pub fn set_worker_threads(&mut self, worker_threads: usize) {
        self.worker_threads = worker_threads;
    }

    pub fn set_tour_metric(&mut self, tour_metric: TourMetric) {
        self.tour_metric = tour_metric;
    }

    pub fn set_elitism(&mut self, elitism: bool) {
        self.elitism = elitism;
    }

    /// Returns a builder for creating an `EcosystemOptions` instance.
    pub fn builder() -> EcosystemOptionsBuilder {
        EcosystemOptionsBuilder::default()
    }
}

impl Default for EcosystemOptions {
    fn default() -> Self {
        Self {
            parent_capacity: 20,
            child_capacity: 40,
            mutation_probability: 0.05,
            worker_threads: DEFAULT_WORKER_THREADS,
            tour_metric: TourMetric::OpenPath,
            elitism: false,
        }
    }
}

/// Builder for `EcosystemOptions`.
///
/// Unset values fall back to [`EcosystemOptions::default`].
#[derive(Debug, Clone, Default)]
pub struct EcosystemOptionsBuilder {
    parent_capacity: Option<usize>,
    child_capacity: Option<usize>,
    mutation_probability: Option<f64>,
    worker_threads: Option<usize>,
    tour_metric: Option<TourMetric>,
    elitism: Option<bool>,
}

impl EcosystemOptionsBuilder {
    pub fn parent_capacity(mut self, value: usize) -> Self {
        self.parent_capacity = Some(value);
        self
    }

    pub fn child_capacity(mut self, value: usize) -> Self {
        self.child_capacity = Some(value);
        self
    }

    pub fn mutation_probability(mut self, value: f64) -> Self {
        self.mutation_probability = Some(value);
        self
    }

    pub fn worker_threads(mut self, value: usize) -> Self {
        self.worker_threads = Some(value);
        self
    }

    pub fn tour_metric(mut self, value: TourMetric) -> Self {
        self.tour_metric = Some(value);
        self
    }

    pub fn elitism(mut self, value: bool) -> Self {
        self.elitism = Some(value);
        self
    }

    /// Builds the `EcosystemOptions` instance. Values are checked when the ecosystem is
    /// built, see [`EcosystemOptions::validate`].
    pub fn build(self) -> EcosystemOptions {
        let default = EcosystemOptions::default();
        EcosystemOptions {
            parent_capacity: self.parent_capacity.unwrap_or(default.parent_capacity),
            child_capacity: self.child_capacity.unwrap_or(default.child_capacity),
            mutation_probability: self
                .mutation_probability
                .unwrap_or(default.mutation_probability),
            worker_threads: self.worker_threads.unwrap_or(default.worker_threads),
            tour_metric: self.tour_metric.unwrap_or(default.tour_metric),
            elitism: self.elitism.unwrap_or(default.elitism),
        }
    }
}
