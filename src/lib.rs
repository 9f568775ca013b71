pub mod ecosystem;
pub mod error;
pub mod genotype;
pub mod graph;
pub mod model;
pub mod rng;

// Re-export commonly used types for convenience
pub use ecosystem::{Ecosystem, EcosystemBuilder, EcosystemOptions, TourMetric};
pub use error::{HamiltonError, OptionExt, Result};
pub use genotype::{GeneTriple, Genotype};
pub use graph::{DistanceGraph, Point};
pub use rng::RandomNumberGenerator;
