//! # Breeding
//!
//! Parallel reproduction of one generation. The driver first plans the whole generation
//! as a list of [`WorkItem`]s, deals them round-robin to a fixed number of workers, and
//! only then starts a fresh thread pool. Each worker crosses its pairs, possibly mutates
//! the child and stores it in its target slot. The driver returns once every worker is
//! done; partial generations are never observed.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex, PoisonError,
};

use tracing::warn;

use crate::{
    error::{HamiltonError, Result},
    genotype::Genotype,
    rng::RandomNumberGenerator,
};

/// Cross the parents at ranks `first` and `second` into child slot `slot`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkItem {
    pub first: usize,
    pub second: usize,
    pub slot: usize,
}

/// Children bred for one generation.
#[derive(Debug)]
pub struct BreedOutcome {
    pub children: Vec<Option<Genotype>>,
    /// Work items whose crossover failed; their slots stay empty.
    pub failures: usize,
}

/// Pairs ranked parents, strongest first.
///
/// For increasing `i`, parent `i` is paired with every stronger parent `j < i`. Planning
/// stops at the first pair touching an empty parent slot or once `child_capacity` items
/// are planned. Slots are assigned in planning order.
pub fn plan_work(parents: &[Option<Genotype>], child_capacity: usize) -> Vec<WorkItem> {
    let mut items = Vec::with_capacity(child_capacity);
    if child_capacity == 0 {
        return items;
    }

    'outer: for i in 0..parents.len() {
        for j in 0..i {
            if parents[i].is_none() || parents[j].is_none() {
                break 'outer;
            }

            items.push(WorkItem {
                first: i,
                second: j,
                slot: items.len(),
            });

            if items.len() == child_capacity {
                break 'outer;
            }
        }
    }
    items
}

/// Deals work items round-robin: item `k` goes to worker `k % workers`.
pub fn distribute(items: &[WorkItem], workers: usize) -> Vec<Vec<WorkItem>> {
    let mut batches = vec![Vec::new(); workers];
    for (k, item) in items.iter().enumerate() {
        batches[k % workers].push(*item);
    }
    batches
}

/// Runs one batch per worker on a fresh pool of `rngs.len()` threads, writing every
/// child into its planned slot of `children`.
///
/// `batches` and `rngs` are paired by index. A child mutates when the worker's draw in
/// `[0, 1_000_000)` falls below `mutation_probability * 1_000_000`. Crossover failures
/// are logged and counted, never propagated.
///
/// # Errors
///
/// Returns [`HamiltonError::WorkerPool`] if the thread pool cannot be started.
pub fn breed(
    parents: &[Option<Genotype>],
    batches: Vec<Vec<WorkItem>>,
    rngs: Vec<RandomNumberGenerator>,
    children: Vec<Option<Genotype>>,
    mutation_probability: f64,
) -> Result<BreedOutcome> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(rngs.len())
        .thread_name(|index| format!("hamilton-breeder-{}", index))
        .build()
        .map_err(|e| HamiltonError::WorkerPool(e.to_string()))?;

    let children = Mutex::new(children);
    let failures = AtomicUsize::new(0);

    pool.scope(|scope| {
        for (batch, mut rng) in batches.into_iter().zip(rngs) {
            if batch.is_empty() {
                continue;
            }
            let children = &children;
            let failures = &failures;

            scope.spawn(move |_| {
                for item in batch {
                    let (Some(first), Some(second)) = (&parents[item.first], &parents[item.second])
                    else {
                        continue;
                    };

                    match Genotype::crossover(first, second, &mut rng) {
                        Ok(mut child) => {
                            if rng.gen_bool_per_million(mutation_probability) {
                                child.mutate(&mut rng);
                            }
                            let mut slots = children.lock().unwrap_or_else(PoisonError::into_inner);
                            if let Some(slot) = slots.get_mut(item.slot) {
                                *slot = Some(child);
                            }
                        }
                        Err(err) => {
                            warn!(
                                first = item.first,
                                second = item.second,
                                slot = item.slot,
                                error = %err,
                                "crossover failed, leaving child slot empty"
                            );
                            failures.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                }
            });
        }
    });

    Ok(BreedOutcome {
        children: children.into_inner().unwrap_or_else(PoisonError::into_inner),
        failures: failures.into_inner(),
    })
}
