//! Candidate solutions.

use super::fitness::Fitness;
use serde::{Deserialize, Serialize};

/// One candidate solution: a position in the search box and its fitness.
///
/// An agent only exists once its position has been evaluated, so every
/// comparison sees a real fitness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub position: Vec<f64>,
    pub fitness: Fitness,
}

impl Agent {
    pub fn new(position: Vec<f64>, fitness: Fitness) -> Self {
        Self { position, fitness }
    }

    pub fn target(&self) -> f64 {
        self.fitness.target
    }
}

/// Access to the [`Agent`] inside an algorithm-specific record.
///
/// Lets the shared selection routines work on records that carry extra
/// per-algorithm fields (mean/sigma, weight, ...).
pub trait AsAgent {
    fn agent(&self) -> &Agent;

    fn position(&self) -> &[f64] {
        &self.agent().position
    }

    fn target(&self) -> f64 {
        self.agent().fitness.target
    }
}

impl AsAgent for Agent {
    fn agent(&self) -> &Agent {
        self
    }
}

impl<T: AsAgent + ?Sized> AsAgent for &T {
    fn agent(&self) -> &Agent {
        (**self).agent()
    }
}

/// Component-wise mean of the given positions.
///
/// # Panics
/// Panics if `positions` is empty.
pub fn mean_position<'a, I>(positions: I) -> Vec<f64>
where
    I: IntoIterator<Item = &'a [f64]>,
{
    let mut iter = positions.into_iter();
    let first = iter.next().expect("mean of an empty population");
    let mut sum = first.to_vec();
    let mut count = 1usize;
    for position in iter {
        for (s, x) in sum.iter_mut().zip(position) {
            *s += x;
        }
        count += 1;
    }
    let n = count as f64;
    sum.iter_mut().for_each(|s| *s /= n);
    sum
}

/// Euclidean distance between two positions.
pub fn distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_position() {
        let a = [0.0, 2.0];
        let b = [2.0, 4.0];
        let mean = mean_position([&a[..], &b[..]]);
        assert_eq!(mean, vec![1.0, 3.0]);
    }

    #[test]
    fn test_distance() {
        assert!((distance(&[0.0, 0.0], &[3.0, 4.0]) - 5.0).abs() < 1e-12);
        assert_eq!(distance(&[1.0, 1.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_as_agent_for_agent() {
        let agent = Agent::new(vec![1.0, 2.0], Fitness::single(4.0));
        assert_eq!(AsAgent::target(&agent), 4.0);
        assert_eq!(AsAgent::position(&agent), &[1.0, 2.0]);
    }
}
