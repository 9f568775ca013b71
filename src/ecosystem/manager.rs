use std::sync::Arc;

use tracing::debug;

use super::{
    breeding::{breed, distribute, plan_work, WorkItem},
    options::EcosystemOptions,
    ranking::rank_slots,
};
use crate::{
    error::{HamiltonError, Result},
    genotype::Genotype,
    graph::DistanceGraph,
    rng::RandomNumberGenerator,
};

/// Summary of one completed generation.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationReport {
    /// Number of generations completed so far, this one included.
    pub generation: usize,
    /// Children bred in this generation.
    pub offspring: usize,
    /// Crossovers that failed inside a worker.
    pub failures: usize,
    /// Fitness of the best parent of the next generation, if there is one.
    pub best_fitness: Option<f64>,
}

/// The population manager.
///
/// Holds the ranked parents of the current generation and breeds the next one. Parents
/// are always sorted best first with empty slots at the end. Exactly one caller drives
/// the generations; readers on other threads should work on
/// [`Ecosystem::parents_snapshot`] copies.
#[derive(Debug)]
pub struct Ecosystem {
    graph: Arc<DistanceGraph>,
    options: EcosystemOptions,
    parents: Vec<Option<Genotype>>,
    children: Vec<Option<Genotype>>,
    rng: RandomNumberGenerator,
    generation: usize,
}

impl Ecosystem {
    /// Creates an ecosystem whose parents are the best `parent_capacity` individuals.
    ///
    /// Prefer [`EcosystemBuilder`](super::EcosystemBuilder), which also reports a
    /// missing graph.
    ///
    /// # Errors
    ///
    /// - [`HamiltonError::EcosystemConstruction`] if the options are invalid.
    /// - [`HamiltonError::SizeMismatch`] if an individual does not span the graph.
    pub fn new(
        graph: Arc<DistanceGraph>,
        options: EcosystemOptions,
        individuals: Vec<Genotype>,
        rng: RandomNumberGenerator,
    ) -> Result<Self> {
        options.validate()?;

        if let Some(individual) = individuals.iter().find(|i| i.size() != graph.count()) {
            return Err(HamiltonError::SizeMismatch {
                left: graph.count(),
                right: individual.size(),
            });
        }

        let metric = options.get_tour_metric();
        let mut slots: Vec<Option<Genotype>> = individuals.into_iter().map(Some).collect();
        rank_slots(&mut slots, |individual| metric.fitness(&graph, individual))?;
        slots.resize(options.get_parent_capacity(), None);

        debug!(
            vertices = graph.count(),
            parents = slots.iter().flatten().count(),
            parent_capacity = options.get_parent_capacity(),
            child_capacity = options.get_child_capacity(),
            "ecosystem created"
        );

        Ok(Self {
            children: vec![None; options.get_child_capacity()],
            graph,
            options,
            parents: slots,
            rng,
            generation: 0,
        })
    }

    /// Breeds the next generation and replaces the parents with its best individuals.
    ///
    /// Blocks until every worker has finished. Worker-local crossover failures only
    /// leave child slots empty; errors returned here are fatal for the run.
    ///
    /// # Errors
    ///
    /// - [`HamiltonError::WorkerPool`] if the worker threads cannot be started.
    /// - Any error raised while measuring tours during ranking.
    pub fn next_generation(&mut self) -> Result<GenerationReport> {
        let workers = self.options.get_worker_threads();
        let child_capacity = self.options.get_child_capacity();

        let items = plan_work(&self.parents, child_capacity);
        let batches = distribute(&items, workers);
        let rngs = (0..workers).map(|_| self.rng.fork()).collect();

        // Breeding fills the child array in place; it is cleared again whatever happens.
        let children = std::mem::take(&mut self.children);
        let ranked = self.breed_and_rank(batches, rngs, children);
        self.children = vec![None; child_capacity];
        let (mut pool, scores, failures) = ranked?;

        pool.truncate(self.options.get_parent_capacity());
        self.parents = pool;
        self.generation += 1;

        let report = GenerationReport {
            generation: self.generation,
            offspring: items.len() - failures,
            failures,
            best_fitness: scores.first().copied().flatten(),
        };
        debug!(
            generation = report.generation,
            offspring = report.offspring,
            failures = report.failures,
            best_fitness = ?report.best_fitness,
            "generation complete"
        );
        Ok(report)
    }

    /// Breeds into `children` and ranks the result, together with the parents when
    /// elitism is on. Returns the ranked pool, its scores and the failure count.
    fn breed_and_rank(
        &self,
        batches: Vec<Vec<WorkItem>>,
        rngs: Vec<RandomNumberGenerator>,
        children: Vec<Option<Genotype>>,
    ) -> Result<(Vec<Option<Genotype>>, Vec<Option<f64>>, usize)> {
        let outcome = breed(
            &self.parents,
            batches,
            rngs,
            children,
            self.options.get_mutation_probability(),
        )?;

        let mut pool = outcome.children;
        if self.options.get_elitism() {
            pool.extend(self.parents.iter().cloned());
        }

        let graph = &self.graph;
        let metric = self.options.get_tour_metric();
        let scores = rank_slots(&mut pool, |individual| metric.fitness(graph, individual))?;
        Ok((pool, scores, outcome.failures))
    }

    /// Fitness of an individual under this ecosystem's graph and tour metric.
    pub fn fitness_of(&self, individual: &Genotype) -> Result<f64> {
        self.options
            .get_tour_metric()
            .fitness(&self.graph, individual)
    }

    /// Deep copy of the ranked parent slots.
    pub fn parents_snapshot(&self) -> Vec<Option<Genotype>> {
        self.parents.clone()
    }

    /// Deep copy of the child slots.
    ///
    /// Children only live inside [`Ecosystem::next_generation`]: they are ranked into
    /// the parents and the array is cleared before the call returns. Outside a
    /// generation every slot is empty.
    pub fn children_snapshot(&self) -> Vec<Option<Genotype>> {
        self.children.clone()
    }

    /// The best parent, if any slot is occupied.
    pub fn best(&self) -> Option<&Genotype> {
        self.parents.first().and_then(Option::as_ref)
    }

    /// Number of generations completed.
    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn graph(&self) -> &Arc<DistanceGraph> {
        &self.graph
    }

    pub fn options(&self) -> &EcosystemOptions {
        &self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Point;

    fn circle(count: usize) -> Arc<DistanceGraph> {
        let points: Vec<Point> = (0..count)
            .map(|k| {
                let angle = k as f64 * std::f64::consts::TAU / count as f64;
                Point::new(angle.cos(), angle.sin())
            })
            .collect();
        Arc::new(DistanceGraph::from_points(&points))
    }

    fn individuals(count: usize, size: usize, rng: &mut RandomNumberGenerator) -> Vec<Genotype> {
        (0..count)
            .map(|_| Genotype::random(size, rng).unwrap())
            .collect()
    }

    #[test]
    fn test_new_ranks_and_truncates() {
        let mut rng = RandomNumberGenerator::from_seed(1);
        let graph = circle(8);
        let initial = individuals(10, 8, &mut rng);
        let options = EcosystemOptions::new(4, 8, 0.0);
        let ecosystem = Ecosystem::new(graph, options, initial.clone(), rng).unwrap();

        let parents = ecosystem.parents_snapshot();
        assert_eq!(parents.len(), 4);

        let mut all: Vec<f64> = initial
            .iter()
            .map(|i| ecosystem.fitness_of(i).unwrap())
            .collect();
        all.sort_by(|a, b| b.total_cmp(a));

        let kept: Vec<f64> = parents
            .iter()
            .map(|p| ecosystem.fitness_of(p.as_ref().unwrap()).unwrap())
            .collect();
        assert_eq!(kept, all[..4].to_vec());
    }

    #[test]
    fn test_new_pads_missing_parents() {
        let mut rng = RandomNumberGenerator::from_seed(2);
        let initial = individuals(2, 6, &mut rng);
        let ecosystem =
            Ecosystem::new(circle(6), EcosystemOptions::new(5, 5, 0.1), initial, rng).unwrap();

        let parents = ecosystem.parents_snapshot();
        assert_eq!(parents.len(), 5);
        assert_eq!(parents.iter().flatten().count(), 2);
        assert!(parents[2..].iter().all(Option::is_none));
    }

    #[test]
    fn test_new_rejects_size_mismatch() {
        let mut rng = RandomNumberGenerator::from_seed(3);
        let initial = individuals(3, 7, &mut rng);
        let result = Ecosystem::new(circle(6), EcosystemOptions::default(), initial, rng);
        assert_eq!(
            result.unwrap_err(),
            HamiltonError::SizeMismatch { left: 6, right: 7 }
        );
    }

    #[test]
    fn test_next_generation_keeps_parent_count() {
        let mut rng = RandomNumberGenerator::from_seed(4);
        let initial = individuals(12, 10, &mut rng);
        let mut ecosystem =
            Ecosystem::new(circle(10), EcosystemOptions::new(6, 15, 0.2), initial, rng).unwrap();

        for expected in 1..=5 {
            let report = ecosystem.next_generation().unwrap();
            assert_eq!(report.generation, expected);
            assert_eq!(report.offspring, 15);
            assert_eq!(report.failures, 0);
            assert_eq!(ecosystem.parents_snapshot().len(), 6);
            let children = ecosystem.children_snapshot();
            assert_eq!(children.len(), 15);
            assert!(children.iter().all(Option::is_none));
            assert_eq!(
                report.best_fitness,
                Some(ecosystem.fitness_of(ecosystem.best().unwrap()).unwrap())
            );
        }
    }

    #[test]
    fn test_single_parent_breeds_nothing() {
        let mut rng = RandomNumberGenerator::from_seed(5);
        let initial = individuals(1, 5, &mut rng);
        let mut ecosystem =
            Ecosystem::new(circle(5), EcosystemOptions::new(3, 6, 0.0), initial, rng).unwrap();

        let report = ecosystem.next_generation().unwrap();
        assert_eq!(report.offspring, 0);
        assert_eq!(report.best_fitness, None);
        assert!(ecosystem.best().is_none());
    }

    #[test]
    fn test_elitism_never_regresses() {
        let mut rng = RandomNumberGenerator::from_seed(6);
        let initial = individuals(8, 16, &mut rng);
        let options = EcosystemOptions::builder()
            .parent_capacity(8)
            .child_capacity(16)
            .mutation_probability(0.0)
            .elitism(true)
            .build();
        let mut ecosystem = Ecosystem::new(circle(16), options, initial, rng).unwrap();

        let mut best = ecosystem.fitness_of(ecosystem.best().unwrap()).unwrap();
        for _ in 0..20 {
            let report = ecosystem.next_generation().unwrap();
            let next = report.best_fitness.unwrap();
            assert!(next >= best);
            best = next;
        }
    }
}
