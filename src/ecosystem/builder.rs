use std::sync::Arc;

use crate::{
    error::{HamiltonError, OptionExt, Result},
    genotype::Genotype,
    graph::DistanceGraph,
    rng::RandomNumberGenerator,
};

use super::{Ecosystem, EcosystemOptions};

/// Fluent construction of an [`Ecosystem`].
///
/// The graph is mandatory. Options default to [`EcosystemOptions::default`], the random
/// source to an entropy-seeded generator, and the initial individuals to none.
///
/// # Example
///
/// ```rust
/// use hamilton::ecosystem::{EcosystemBuilder, EcosystemOptions};
/// use hamilton::genotype::Genotype;
/// use hamilton::graph::{DistanceGraph, Point};
/// use hamilton::rng::RandomNumberGenerator;
///
/// let graph = DistanceGraph::from_points(&[
///     Point::new(0.0, 0.0),
///     Point::new(1.0, 0.0),
///     Point::new(1.0, 1.0),
///     Point::new(0.0, 1.0),
/// ]);
/// let mut rng = RandomNumberGenerator::from_seed(1);
/// let individuals = (0..6)
///     .map(|_| Genotype::random(4, &mut rng))
///     .collect::<Result<Vec<_>, _>>()
///     .unwrap();
///
/// let mut ecosystem = EcosystemBuilder::new()
///     .with_graph(graph)
///     .with_options(EcosystemOptions::new(6, 12, 0.05))
///     .with_individuals(individuals)
///     .with_rng(rng)
///     .build()
///     .unwrap();
///
/// ecosystem.next_generation().unwrap();
/// assert_eq!(ecosystem.parents_snapshot().len(), 6);
/// ```
#[derive(Debug, Default)]
pub struct EcosystemBuilder {
    graph: Option<Arc<DistanceGraph>>,
    options: Option<EcosystemOptions>,
    individuals: Vec<Genotype>,
    rng: Option<RandomNumberGenerator>,
}

impl EcosystemBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_graph(mut self, graph: impl Into<Arc<DistanceGraph>>) -> Self {
        self.graph = Some(graph.into());
        self
    }

    pub fn with_options(mut self, options: EcosystemOptions) -> Self {
        self.options = Some(options);
        self
    }

    pub fn with_individuals(mut self, individuals: Vec<Genotype>) -> Self {
        self.individuals = individuals;
        self
    }

    pub fn with_rng(mut self, rng: RandomNumberGenerator) -> Self {
        self.rng = Some(rng);
        self
    }

    /// Builds the ecosystem.
    ///
    /// # Errors
    ///
    /// - [`HamiltonError::EcosystemConstruction`] if no graph was given or the options
    ///   are invalid.
    /// - [`HamiltonError::SizeMismatch`] if an individual does not span the graph.
    pub fn build(self) -> Result<Ecosystem> {
        let graph = self.graph.ok_or_else_hamilton(|| {
            HamiltonError::EcosystemConstruction("graph not specified".to_string())
        })?;

        Ecosystem::new(
            graph,
            self.options.unwrap_or_default(),
            self.individuals,
            self.rng.unwrap_or_default(),
        )
    }
}
