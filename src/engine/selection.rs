//! Shared selection machinery.
//!
//! Every routine takes the run's [`Direction`] and decides "better" through
//! [`compare`] alone, so all algorithms rank agents identically.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"

use super::agent::AsAgent;
use super::problem::Direction;
use rand::Rng;

/// True iff `a` is strictly better than `b`.
pub fn compare<A: AsAgent + ?Sized, B: AsAgent + ?Sized>(
    direction: Direction,
    a: &A,
    b: &B,
) -> bool {
    direction.is_better(a.target(), b.target())
}

/// Index-wise survivor selection.
///
/// `result[i]` is `new[i]` if it is strictly better than `old[i]`, else
/// `old[i]`. Indices are never mixed.
///
/// # Panics
/// Panics if the populations have different lengths.
pub fn greedy_selection<T: AsAgent>(direction: Direction, old: Vec<T>, new: Vec<T>) -> Vec<T> {
    assert_eq!(old.len(), new.len(), "greedy selection needs parallel populations");
    old.into_iter()
        .zip(new)
        .map(|(o, n)| if compare(direction, &n, &o) { n } else { o })
        .collect()
}

/// Index of the best agent; the earliest wins ties.
pub fn best_index<T: AsAgent>(direction: Direction, population: &[T]) -> Option<usize> {
    let mut iter = population.iter().enumerate();
    let (mut best, mut best_agent) = iter.next()?;
    for (i, agent) in iter {
        if compare(direction, agent, best_agent) {
            best = i;
            best_agent = agent;
        }
    }
    Some(best)
}

/// Stable-sorts the population best-first and returns it with a copy of the best.
///
/// # Panics
/// Panics if `population` is empty.
pub fn global_best<T: AsAgent + Clone>(direction: Direction, mut population: Vec<T>) -> (Vec<T>, T) {
    assert!(!population.is_empty(), "population must not be empty");
    sort_population(direction, &mut population);
    let best = population[0].clone();
    (population, best)
}

/// Stable sort, best first.
pub fn sort_population<T: AsAgent>(direction: Direction, population: &mut [T]) {
    population.sort_by(|a, b| direction.ordering(a.target(), b.target()));
}

/// Keeps the best `k` agents, sorted best first.
pub fn sorted_trim<T: AsAgent>(direction: Direction, mut population: Vec<T>, k: usize) -> Vec<T> {
    sort_population(direction, &mut population);
    population.truncate(k);
    population
}

/// Summary of a population's targets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpecialFitness {
    pub total: f64,
    pub best: f64,
    pub worst: f64,
}

/// Total, best and worst target over agents with a finite target.
///
/// Penalized agents are skipped. Returns `None` when no agent is finite.
pub fn special_fitness<T: AsAgent>(direction: Direction, population: &[T]) -> Option<SpecialFitness> {
    let mut targets = population.iter().map(|a| a.target()).filter(|t| t.is_finite());
    let first = targets.next()?;
    let mut summary = SpecialFitness {
        total: first,
        best: first,
        worst: first,
    };
    for t in targets {
        summary.total += t;
        if direction.is_better(t, summary.best) {
            summary.best = t;
        }
        if direction.is_better(summary.worst, t) {
            summary.worst = t;
        }
    }
    Some(summary)
}

/// Uniformly samples an index in `0..n` other than `exclude`.
///
/// # Panics
/// Panics if `n < 2`.
pub fn random_partner<R: Rng>(n: usize, exclude: usize, rng: &mut R) -> usize {
    assert!(n >= 2, "need at least two agents to pick a partner");
    let idx = rng.random_range(0..n - 1);
    if idx >= exclude {
        idx + 1
    } else {
        idx
    }
}
