//! Edge-preserving crossover.
//!
//! The child is grown one triple at a time. Each new triple continues the previous one
//! (`start = prev.mid`, `mid = prev.end`) and only its `end` has to be chosen. Candidates
//! are the neighbours of `mid` in both parents that are not yet part of the child, so
//! the child inherits parental edges wherever it can. An edge present in both parents
//! shows up twice among the candidates and is twice as likely to be picked. When every
//! parental neighbour is taken, a random unused vertex is chosen instead.

use super::{GeneTriple, Genotype};
use crate::{
    error::{HamiltonError, OptionExt, Result},
    rng::RandomNumberGenerator,
};

/// Vertices not yet placed in the child, with O(1) membership, removal and random pick.
struct VertexPool {
    free: Vec<usize>,
    /// `slots[v]` is the index of `v` in `free`, or `None` once `v` is used.
    slots: Vec<Option<usize>>,
}

impl VertexPool {
    fn new(count: usize) -> Self {
        Self {
            free: (0..count).collect(),
            slots: (0..count).map(Some).collect(),
        }
    }

    fn contains(&self, vertex: usize) -> bool {
        self.slots[vertex].is_some()
    }

    fn take(&mut self, vertex: usize) {
        if let Some(slot) = self.slots[vertex].take() {
            self.free.swap_remove(slot);
            if let Some(&moved) = self.free.get(slot) {
                self.slots[moved] = Some(slot);
            }
        }
    }

    fn pick(&self, rng: &mut RandomNumberGenerator) -> Option<usize> {
        if self.free.is_empty() {
            None
        } else {
            Some(self.free[rng.gen_index(self.free.len())])
        }
    }
}

impl Genotype {
    /// Crosses two parents into a new child cycle.
    ///
    /// The child has the parents' length and its fenotype is always a permutation.
    ///
    /// # Errors
    ///
    /// Returns [`HamiltonError::SizeMismatch`] if the parents differ in length.
    ///
    /// # Example
    ///
    /// ```rust
    /// use hamilton::genotype::Genotype;
    /// use hamilton::rng::RandomNumberGenerator;
    ///
    /// let mut rng = RandomNumberGenerator::from_seed(3);
    /// let a = Genotype::random(8, &mut rng).unwrap();
    /// let b = Genotype::random(8, &mut rng).unwrap();
    ///
    /// let child = Genotype::crossover(&a, &b, &mut rng).unwrap();
    /// assert_eq!(child.size(), 8);
    /// assert!(child.is_consistent());
    /// ```
    pub fn crossover(
        first: &Genotype,
        second: &Genotype,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Genotype> {
        if first.size() != second.size() {
            return Err(HamiltonError::SizeMismatch {
                left: first.size(),
                right: second.size(),
            });
        }

        let count = first.size();
        let parents = [first, second];
        let mut pool = VertexPool::new(count);
        let mut child: Vec<GeneTriple> = Vec::with_capacity(count);

        // Two genes from a random triple of one parent, the third from the other parent.
        let donor = rng.gen_index(parents.len());
        let seed = *parents[donor].triple(rng.gen_index(count));
        pool.take(seed.start);
        pool.take(seed.mid);

        let other = parents[1 - donor].triple_of(seed.mid);
        let end = if pool.contains(other.end) {
            other.end
        } else {
            other.start
        };
        pool.take(end);
        child.push(GeneTriple::new(seed.start, seed.mid, end));

        let mut candidates = Vec::with_capacity(4);
        for _ in 1..count - 2 {
            let prev = child[child.len() - 1];
            let mid = prev.end;

            candidates.clear();
            candidates.extend(
                parents
                    .iter()
                    .flat_map(|parent| parent.triple_of(mid).neighbours())
                    .filter(|&vertex| pool.contains(vertex)),
            );

            let end = if candidates.is_empty() {
                pool.pick(rng).ok_or_else_hamilton(|| {
                    HamiltonError::InvalidPermutation(
                        "crossover ran out of unused vertices".to_string(),
                    )
                })?
            } else {
                candidates[rng.gen_index(candidates.len())]
            };
            pool.take(end);
            child.push(GeneTriple::new(prev.mid, mid, end));
        }

        // Completing triples close the cycle back onto the first one.
        let last_built = child[count - 3];
        let penultimate = GeneTriple::new(last_built.mid, last_built.end, child[0].start);
        let last = GeneTriple::new(penultimate.mid, penultimate.end, child[0].mid);
        child.push(penultimate);
        child.push(last);

        Ok(Genotype::from_triples(child))
    }
}
