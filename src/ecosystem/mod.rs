//! # Ecosystem
//!
//! The population manager. An [`Ecosystem`] keeps a ranked generation of parents and, on
//! every call to [`Ecosystem::next_generation`], breeds children from ranked parent pairs
//! on a pool of worker threads, ranks them and keeps the best as the next parents.
pub mod breeding;
pub mod builder;
pub mod manager;
pub mod options;
pub mod ranking;

pub use builder::EcosystemBuilder;
pub use manager::{Ecosystem, GenerationReport};
pub use options::{EcosystemOptions, EcosystemOptionsBuilder, TourMetric, DEFAULT_WORKER_THREADS};
