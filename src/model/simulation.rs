use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex, PoisonError,
    },
    thread::{self, JoinHandle},
};

use tracing::{debug, error, info};

use super::{Model, ProgressListener};
use crate::{
    ecosystem::{Ecosystem, EcosystemBuilder, EcosystemOptions},
    error::{HamiltonError, OptionExt, Result},
    genotype::Genotype,
    graph::{DistanceGraph, Point},
    rng::RandomNumberGenerator,
};

/// Thread-backed implementation of [`Model`].
///
/// The ecosystem lives behind a mutex shared with the simulation thread. The thread
/// holds the lock for the duration of one generation, so readers always see a
/// completed generation and receive copies, never the live slots.
///
/// If no initial individual was added, `initialize` seeds the ecosystem with
/// `parent_limit` random cycles.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use hamilton::model::{Model, Simulation};
///
/// let mut simulation = Simulation::new().with_seed(3);
/// simulation
///     .create_planar_graph(&[0.0, 1.0, 1.0, 0.0], &[0.0, 0.0, 1.0, 1.0])
///     .unwrap();
/// simulation.set_parent_limit(10);
/// simulation.set_child_limit(20);
/// simulation.initialize().unwrap();
///
/// let handle = simulation.simulate(5, Arc::new(|_progress: f64| {})).unwrap();
/// handle.join().unwrap().unwrap();
///
/// assert_eq!(simulation.generations_passed(), 5);
/// assert_eq!(simulation.current_best().unwrap().len(), 4);
/// ```
#[derive(Debug, Default)]
pub struct Simulation {
    graph: Option<Arc<DistanceGraph>>,
    first_parents: Vec<Genotype>,
    options: EcosystemOptions,
    seed: Option<u64>,
    ecosystem: Option<Arc<Mutex<Ecosystem>>>,
    generations_passed: Arc<AtomicUsize>,
}

impl Simulation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds every random decision of subsequent runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_options(mut self, options: EcosystemOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &EcosystemOptions {
        &self.options
    }

    pub fn graph(&self) -> Option<&Arc<DistanceGraph>> {
        self.graph.as_ref()
    }

    fn set_graph(&mut self, graph: DistanceGraph) {
        debug!(vertices = graph.count(), "graph replaced");
        self.graph = Some(Arc::new(graph));
        self.ecosystem = None;
    }

    fn with_ecosystem<T>(&self, f: impl FnOnce(&Ecosystem) -> T) -> Option<T> {
        self.ecosystem
            .as_ref()
            .map(|ecosystem| f(&ecosystem.lock().unwrap_or_else(PoisonError::into_inner)))
    }

    fn check_parent_index(&self, index: usize) -> Result<()> {
        if index < self.first_parents.len() {
            Ok(())
        } else {
            Err(HamiltonError::Model(format!(
                "parent index {} out of range for {} parents",
                index,
                self.first_parents.len()
            )))
        }
    }
}

fn fenotypes(slots: Vec<Option<Genotype>>) -> Vec<Vec<usize>> {
    slots
        .into_iter()
        .flatten()
        .map(|individual| individual.fenotype())
        .collect()
}

fn run(
    ecosystem: Arc<Mutex<Ecosystem>>,
    passed: Arc<AtomicUsize>,
    generations: usize,
    listener: Arc<dyn ProgressListener>,
) -> Result<()> {
    info!(generations, "simulation started");

    for done in 1..=generations {
        let outcome = ecosystem
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .next_generation();

        match outcome {
            Ok(report) => {
                passed.fetch_add(1, Ordering::SeqCst);
                debug!(
                    generation = report.generation,
                    best_fitness = ?report.best_fitness,
                    "simulation progress"
                );
                listener.progress_update(done as f64 / generations as f64);
            }
            Err(err) => {
                error!(error = %err, generation = done, "simulation aborted");
                return Err(err);
            }
        }
    }

    if generations == 0 {
        listener.progress_update(1.0);
    }
    info!(generations, "simulation finished");
    Ok(())
}

impl Model for Simulation {
    fn create_graph(&mut self, matrix: Vec<Vec<f64>>) -> Result<()> {
        self.set_graph(DistanceGraph::from_matrix(matrix)?);
        Ok(())
    }

    fn create_planar_graph(&mut self, xs: &[f64], ys: &[f64]) -> Result<()> {
        if xs.len() != ys.len() {
            return Err(HamiltonError::Model(format!(
                "{} x coordinates but {} y coordinates",
                xs.len(),
                ys.len()
            )));
        }

        let points: Vec<Point> = xs.iter().zip(ys).map(|(&x, &y)| Point::new(x, y)).collect();
        self.set_graph(DistanceGraph::from_points(&points));
        Ok(())
    }

    fn add_parent(&mut self, order: &[usize]) -> Result<()> {
        self.first_parents.push(Genotype::from_order(order)?);
        Ok(())
    }

    fn remove_parent_at(&mut self, index: usize) -> Result<Vec<usize>> {
        self.check_parent_index(index)?;
        Ok(self.first_parents.remove(index).fenotype())
    }

    fn parent_at(&self, index: usize) -> Result<Vec<usize>> {
        self.check_parent_index(index)?;
        Ok(self.first_parents[index].fenotype())
    }

    fn parent_count(&self) -> usize {
        self.first_parents.len()
    }

    fn set_parent_limit(&mut self, limit: usize) {
        self.options.set_parent_capacity(limit);
    }

    fn parent_limit(&self) -> usize {
        self.options.get_parent_capacity()
    }

    fn set_child_limit(&mut self, limit: usize) {
        self.options.set_child_capacity(limit);
    }

    fn child_limit(&self) -> usize {
        self.options.get_child_capacity()
    }

    fn set_mutation_probability(&mut self, probability: f64) {
        self.options.set_mutation_probability(probability);
    }

    fn mutation_probability(&self) -> f64 {
        self.options.get_mutation_probability()
    }

    fn initialize(&mut self) -> Result<()> {
        let graph = self.graph.clone().ok_or_else_hamilton(|| {
            HamiltonError::Model("initialize called before a graph was created".to_string())
        })?;
        let mut rng = self
            .seed
            .map(RandomNumberGenerator::from_seed)
            .unwrap_or_default();

        let mut individuals = self.first_parents.clone();
        if individuals.is_empty() {
            for _ in 0..self.options.get_parent_capacity() {
                individuals.push(Genotype::random(graph.count(), &mut rng)?);
            }
        }

        let ecosystem = EcosystemBuilder::new()
            .with_graph(graph)
            .with_options(self.options.clone())
            .with_individuals(individuals)
            .with_rng(rng)
            .build()?;

        self.ecosystem = Some(Arc::new(Mutex::new(ecosystem)));
        self.generations_passed = Arc::new(AtomicUsize::new(0));
        Ok(())
    }

    fn simulate(
        &mut self,
        generations: usize,
        listener: Arc<dyn ProgressListener>,
    ) -> Result<JoinHandle<Result<()>>> {
        let ecosystem = self.ecosystem.clone().ok_or_else_hamilton(|| {
            HamiltonError::Model("simulate called before initialize".to_string())
        })?;
        let passed = Arc::clone(&self.generations_passed);

        thread::Builder::new()
            .name("hamilton-simulation".to_string())
            .spawn(move || run(ecosystem, passed, generations, listener))
            .map_err(|e| HamiltonError::Model(format!("cannot start simulation thread: {}", e)))
    }

    fn generations_passed(&self) -> usize {
        self.generations_passed.load(Ordering::SeqCst)
    }

    fn current_best(&self) -> Option<Vec<usize>> {
        self.with_ecosystem(|ecosystem| ecosystem.best().map(Genotype::fenotype))
            .flatten()
    }

    fn current_parents(&self) -> Vec<Vec<usize>> {
        self.with_ecosystem(|ecosystem| fenotypes(ecosystem.parents_snapshot()))
            .unwrap_or_default()
    }

    fn current_children(&self) -> Vec<Vec<usize>> {
        self.with_ecosystem(|ecosystem| fenotypes(ecosystem.children_snapshot()))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Simulation {
        let mut simulation = Simulation::new().with_seed(17);
        simulation
            .create_planar_graph(&[0.0, 1.0, 1.0, 0.0], &[0.0, 0.0, 1.0, 1.0])
            .unwrap();
        simulation
    }

    #[test]
    fn test_planar_graph_length_mismatch() {
        let mut simulation = Simulation::new();
        let result = simulation.create_planar_graph(&[0.0, 1.0], &[0.0]);
        assert!(matches!(result, Err(HamiltonError::Model(_))));
    }

    #[test]
    fn test_parent_management() {
        let mut simulation = square();
        simulation.add_parent(&[0, 1, 2, 3]).unwrap();
        simulation.add_parent(&[3, 1, 0, 2]).unwrap();
        assert_eq!(simulation.parent_count(), 2);
        assert_eq!(simulation.parent_at(1).unwrap(), vec![3, 1, 0, 2]);

        assert_eq!(simulation.remove_parent_at(0).unwrap(), vec![0, 1, 2, 3]);
        assert_eq!(simulation.parent_count(), 1);
        assert!(simulation.parent_at(1).is_err());

        assert_eq!(
            simulation.add_parent(&[0, 1]),
            Err(HamiltonError::TooShortCycle(2))
        );
    }

    #[test]
    fn test_initialize_without_graph() {
        let mut simulation = Simulation::new();
        simulation.add_parent(&[0, 1, 2]).unwrap();
        assert!(matches!(
            simulation.initialize(),
            Err(HamiltonError::Model(msg)) if msg.contains("graph")
        ));
        assert!(simulation.current_best().is_none());
    }

    #[test]
    fn test_initialize_invalid_limits() {
        let mut simulation = square();
        simulation.set_parent_limit(10);
        simulation.set_child_limit(5);
        assert!(matches!(
            simulation.initialize(),
            Err(HamiltonError::EcosystemConstruction(_))
        ));
    }

    #[test]
    fn test_initialize_with_mismatched_parent() {
        let mut simulation = square();
        simulation.add_parent(&[0, 1, 2, 3, 4]).unwrap();
        assert_eq!(
            simulation.initialize(),
            Err(HamiltonError::SizeMismatch { left: 4, right: 5 })
        );
    }

    #[test]
    fn test_simulate_before_initialize() {
        let mut simulation = square();
        let result = simulation.simulate(3, Arc::new(|_: f64| {}));
        assert!(matches!(result, Err(HamiltonError::Model(_))));
    }

    #[test]
    fn test_progress_reported_per_generation() {
        let mut simulation = square();
        simulation.set_parent_limit(6);
        simulation.set_child_limit(12);
        simulation.initialize().unwrap();

        let progress = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&progress);
        let handle = simulation
            .simulate(
                4,
                Arc::new(move |value: f64| sink.lock().unwrap().push(value)),
            )
            .unwrap();
        handle.join().unwrap().unwrap();

        assert_eq!(*progress.lock().unwrap(), vec![0.25, 0.5, 0.75, 1.0]);
        assert_eq!(simulation.generations_passed(), 4);
        assert_eq!(simulation.current_parents().len(), 6);
        assert!(simulation.current_children().is_empty());
    }

    #[test]
    fn test_zero_generations_completes() {
        let mut simulation = square();
        simulation.initialize().unwrap();

        let progress = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&progress);
        let handle = simulation
            .simulate(0, Arc::new(move |value: f64| sink.lock().unwrap().push(value)))
            .unwrap();
        handle.join().unwrap().unwrap();

        assert_eq!(*progress.lock().unwrap(), vec![1.0]);
        assert_eq!(simulation.generations_passed(), 0);
    }
}
