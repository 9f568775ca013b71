//! # Genotype
//!
//! A `Genotype` encodes one candidate Hamiltonian cycle as an array of [`GeneTriple`]s,
//! one per cycle position. The encoding is deliberately redundant: the edge between two
//! consecutive vertices is recorded in both of their triples, so every vertex's
//! predecessor and successor can be read locally. Crossover relies on this to reuse
//! parental edges, and mutation keeps it consistent while swapping vertices.
//!
//! Two invariants hold for every genotype:
//!
//! - the `mid` values, read in position order, are a permutation of `[0, N)`;
//! - `triples[i].end == triples[i + 1].mid` and `triples[i + 1].start == triples[i].mid`,
//!   indices taken modulo `N`.
//!
//! Next to the triples the genotype keeps the position of every vertex, which turns
//! the "find the triple whose `mid` is `v`" lookups into O(1) reads.
//!
//! ## Example
//!
//! ```rust
//! use hamilton::genotype::Genotype;
//!
//! let cycle = Genotype::from_order(&[2, 0, 3, 1]).unwrap();
//! assert_eq!(cycle.fenotype(), vec![2, 0, 3, 1]);
//! assert_eq!(cycle.triple(0).start, 1);
//! assert_eq!(cycle.triple(0).end, 0);
//! ```

mod crossover;
mod gene;

use std::fmt;

pub use gene::GeneTriple;

use crate::{
    error::{HamiltonError, Result},
    rng::RandomNumberGenerator,
};

/// The smallest number of vertices that forms a cycle.
pub const MIN_CYCLE_LEN: usize = 3;

/// One individual of the population: a cycle over `[0, N)`.
///
/// With the `serde` feature a genotype is written as its visiting order and read back
/// through [`Genotype::from_order`], so malformed input is rejected.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<usize>", into = "Vec<usize>")
)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genotype {
    triples: Vec<GeneTriple>,
    /// `positions[v]` is the index of the triple whose `mid` is `v`.
    positions: Vec<usize>,
}

impl Genotype {
    /// Creates a uniformly random cycle over `count` vertices.
    ///
    /// # Errors
    ///
    /// Returns [`HamiltonError::TooShortCycle`] if `count < 3`.
    pub fn random(count: usize, rng: &mut RandomNumberGenerator) -> Result<Self> {
        if count < MIN_CYCLE_LEN {
            return Err(HamiltonError::TooShortCycle(count));
        }

        let mut order: Vec<usize> = (0..count).collect();
        rng.shuffle(&mut order);
        Ok(Self::wrap(&order))
    }

    /// Creates the cycle visiting the vertices in the given order.
    ///
    /// Triple `i` is `(order[i - 1], order[i], order[i + 1])`, indices wrapping around.
    ///
    /// # Errors
    ///
    /// - [`HamiltonError::TooShortCycle`] if `order` has fewer than 3 elements.
    /// - [`HamiltonError::InvalidPermutation`] if `order` is not a permutation of
    ///   `[0, order.len())`.
    pub fn from_order(order: &[usize]) -> Result<Self> {
        let count = order.len();
        if count < MIN_CYCLE_LEN {
            return Err(HamiltonError::TooShortCycle(count));
        }

        let mut seen = vec![false; count];
        for &vertex in order {
            if vertex >= count {
                return Err(HamiltonError::InvalidPermutation(format!(
                    "vertex {} is out of range for a cycle of {} vertices",
                    vertex, count
                )));
            }
            if seen[vertex] {
                return Err(HamiltonError::InvalidPermutation(format!(
                    "vertex {} is visited more than once",
                    vertex
                )));
            }
            seen[vertex] = true;
        }

        Ok(Self::wrap(order))
    }

    /// Builds the sliding, circularly wrapping 3-window over a valid permutation.
    fn wrap(order: &[usize]) -> Self {
        let count = order.len();
        let triples = (0..count)
            .map(|i| {
                GeneTriple::new(
                    order[(i + count - 1) % count],
                    order[i],
                    order[(i + 1) % count],
                )
            })
            .collect();
        Self::from_triples(triples)
    }

    /// Indexes triples that already satisfy both invariants.
    fn from_triples(triples: Vec<GeneTriple>) -> Self {
        let mut positions = vec![0; triples.len()];
        for (position, triple) in triples.iter().enumerate() {
            positions[triple.mid] = position;
        }
        Self { triples, positions }
    }

    /// Swaps the positions of two randomly chosen vertices.
    ///
    /// Both vertices are drawn uniformly; if the draws coincide the second one is moved
    /// to the next vertex id so that the mutation always changes the cycle. The triples
    /// around both positions are rewritten so the encoding stays consistent.
    pub fn mutate(&mut self, rng: &mut RandomNumberGenerator) {
        let count = self.size();
        let a = rng.gen_index(count);
        let mut b = rng.gen_index(count);
        if a == b {
            b = (b + 1) % count;
        }
        self.swap_vertices(a, b);
    }

    fn swap_vertices(&mut self, a: usize, b: usize) {
        let count = self.size();
        let (pa, pb) = (self.positions[a], self.positions[b]);

        self.triples[pa].mid = b;
        self.triples[pb].mid = a;
        self.positions.swap(a, b);

        for position in [pa, pb] {
            let prev = (position + count - 1) % count;
            let next = (position + 1) % count;
            self.triples[prev].end = self.triples[position].mid;
            self.triples[next].start = self.triples[position].mid;
        }
    }

    /// The visiting order encoded by this genotype.
    pub fn fenotype(&self) -> Vec<usize> {
        self.triples.iter().map(|triple| triple.mid).collect()
    }

    /// Number of vertices in the cycle.
    pub fn size(&self) -> usize {
        self.triples.len()
    }

    pub fn triples(&self) -> &[GeneTriple] {
        &self.triples
    }

    /// # Panics
    ///
    /// Panics if `position >= self.size()`.
    pub fn triple(&self, position: usize) -> &GeneTriple {
        &self.triples[position]
    }

    /// Position of `vertex` in the cycle, if it is a vertex of this cycle.
    pub fn position_of(&self, vertex: usize) -> Option<usize> {
        self.positions.get(vertex).copied()
    }

    /// The triple centred on `vertex`.
    fn triple_of(&self, vertex: usize) -> &GeneTriple {
        &self.triples[self.positions[vertex]]
    }

    /// Checks both structural invariants.
    pub fn is_consistent(&self) -> bool {
        let count = self.size();
        let mut seen = vec![false; count];
        for (position, triple) in self.triples.iter().enumerate() {
            let next = &self.triples[(position + 1) % count];
            if triple.mid >= count
                || seen[triple.mid]
                || self.positions[triple.mid] != position
                || triple.end != next.mid
                || next.start != triple.mid
            {
                return false;
            }
            seen[triple.mid] = true;
        }
        true
    }
}

impl fmt::Display for Genotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Cycle of {} vertices:", self.size())?;
        for (i, triple) in self.triples.iter().enumerate() {
            let separator = if (i + 1) % 10 == 0 { "\n" } else { "\t" };
            write!(f, "{}{}", triple, separator)?;
        }
        Ok(())
    }
}

impl TryFrom<Vec<usize>> for Genotype {
    type Error = HamiltonError;

    fn try_from(order: Vec<usize>) -> Result<Self> {
        Self::from_order(&order)
    }
}

impl From<Genotype> for Vec<usize> {
    fn from(genotype: Genotype) -> Self {
        genotype.fenotype()
    }
}
