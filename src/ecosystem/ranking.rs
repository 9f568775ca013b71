//! Fitness ranking of population slots.
//!
//! A slot is either an individual or empty. Empty slots, and individuals whose fitness
//! is NaN, carry no comparable score and always rank after every scored individual,
//! whatever the sign of the scores. Equal scores keep their original order.

use std::cmp::Ordering;

use crate::{error::Result, genotype::Genotype};

/// Orders two optional scores best first, `None` last.
fn compare(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Sorts `slots` by descending fitness, empty slots last, in a stable way.
///
/// Returns the scores in the new slot order. The first error raised by `fitness` aborts
/// the ranking and leaves `slots` untouched.
pub fn rank_slots<F>(slots: &mut Vec<Option<Genotype>>, mut fitness: F) -> Result<Vec<Option<f64>>>
where
    F: FnMut(&Genotype) -> Result<f64>,
{
    let mut scores = Vec::with_capacity(slots.len());
    for slot in slots.iter() {
        let score = match slot {
            Some(individual) => Some(fitness(individual)?).filter(|score| !score.is_nan()),
            None => None,
        };
        scores.push(score);
    }

    let mut ranked: Vec<(Option<f64>, Option<Genotype>)> =
        scores.into_iter().zip(slots.drain(..)).collect();
    ranked.sort_by(|a, b| compare(a.0, b.0));

    let (scores, individuals): (Vec<_>, Vec<_>) = ranked.into_iter().unzip();
    *slots = individuals;
    Ok(scores)
}
