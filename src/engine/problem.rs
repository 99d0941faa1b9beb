//! Problem definition: search box, optimization direction, objective.

use super::bounds::Bounds;
use crate::error::{ConfigError, EvaluationError};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Optimization direction.
///
/// All "better than" decisions in the crate go through [`Direction::is_better`]
/// or [`Direction::ordering`], so no algorithm carries its own comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Minimize,
    Maximize,
}

impl Direction {
    /// True iff target `a` is strictly better than target `b`.
    pub fn is_better(self, a: f64, b: f64) -> bool {
        match self {
            Direction::Minimize => a < b,
            Direction::Maximize => a > b,
        }
    }

    /// Total order placing better targets first.
    pub fn ordering(self, a: f64, b: f64) -> Ordering {
        match self {
            Direction::Minimize => a.total_cmp(&b),
            Direction::Maximize => b.total_cmp(&a),
        }
    }

    /// The sentinel target that loses every comparison.
    pub fn worst(self) -> f64 {
        match self {
            Direction::Minimize => f64::INFINITY,
            Direction::Maximize => f64::NEG_INFINITY,
        }
    }

    /// Signed gain of moving from target `old` to target `new`.
    ///
    /// Positive when `new` is better.
    pub fn improvement(self, old: f64, new: f64) -> f64 {
        match self {
            Direction::Minimize => old - new,
            Direction::Maximize => new - old,
        }
    }
}

/// Raw output of an objective function.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectiveValue {
    Single(f64),
    Multi(Vec<f64>),
}

impl From<f64> for ObjectiveValue {
    fn from(value: f64) -> Self {
        ObjectiveValue::Single(value)
    }
}

impl From<Vec<f64>> for ObjectiveValue {
    fn from(values: Vec<f64>) -> Self {
        ObjectiveValue::Multi(values)
    }
}

/// A user-supplied objective function.
///
/// Must be pure: the same position always yields the same value. Closures
/// and fn items of shape `Fn(&[f64]) -> f64` or `Fn(&[f64]) -> Vec<f64>`
/// implement this trait automatically. Implement it by hand when the
/// objective can fail.
///
/// ```
/// use u_swarm::engine::{Objective, ObjectiveValue};
///
/// let sphere = |x: &[f64]| x.iter().map(|v| v * v).sum::<f64>();
/// assert_eq!(sphere.evaluate(&[1.0, 2.0]).unwrap(), ObjectiveValue::Single(5.0));
/// ```
pub trait Objective: Send + Sync {
    fn evaluate(&self, position: &[f64]) -> Result<ObjectiveValue, EvaluationError>;
}

impl<F, R> Objective for F
where
    F: Fn(&[f64]) -> R + Send + Sync,
    R: Into<ObjectiveValue>,
{
    fn evaluate(&self, position: &[f64]) -> Result<ObjectiveValue, EvaluationError> {
        Ok(self(position).into())
    }
}

/// The static description of an optimization problem.
///
/// # Examples
///
/// ```
/// use u_swarm::engine::{Direction, Problem};
///
/// let problem = Problem::new(vec![-10.0; 4], vec![10.0; 4], Direction::Minimize)
///     .unwrap()
///     .with_weights(vec![0.5, 0.5])
///     .unwrap();
/// assert_eq!(problem.n_dims(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct Problem {
    bounds: Bounds,
    direction: Direction,
    weights: Option<Vec<f64>>,
}

impl Problem {
    pub fn new(lb: Vec<f64>, ub: Vec<f64>, direction: Direction) -> Result<Self, ConfigError> {
        Ok(Self {
            bounds: Bounds::new(lb, ub)?,
            direction,
            weights: None,
        })
    }

    /// Sets per-objective weights for multi-objective functions.
    ///
    /// Without weights, every objective counts with weight 1.
    pub fn with_weights(mut self, weights: Vec<f64>) -> Result<Self, ConfigError> {
        if let Some((index, &weight)) = weights
            .iter()
            .enumerate()
            .find(|(_, w)| !w.is_finite() || **w < 0.0)
        {
            return Err(ConfigError::NegativeWeight { index, weight });
        }
        self.weights = Some(weights);
        Ok(self)
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn weights(&self) -> Option<&[f64]> {
        self.weights.as_deref()
    }

    pub fn n_dims(&self) -> usize {
        self.bounds.n_dims()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_better_minimize() {
        assert!(Direction::Minimize.is_better(1.0, 2.0));
        assert!(!Direction::Minimize.is_better(2.0, 1.0));
        assert!(!Direction::Minimize.is_better(1.0, 1.0));
    }

    #[test]
    fn test_is_better_maximize() {
        assert!(Direction::Maximize.is_better(2.0, 1.0));
        assert!(!Direction::Maximize.is_better(1.0, 2.0));
        assert!(!Direction::Maximize.is_better(1.0, 1.0));
    }

    #[test]
    fn test_worst_loses_everything() {
        for direction in [Direction::Minimize, Direction::Maximize] {
            assert!(direction.is_better(1e300, direction.worst()));
            assert!(direction.is_better(-1e300, direction.worst()));
        }
    }

    #[test]
    fn test_ordering_puts_best_first() {
        let mut v = vec![3.0, 1.0, 2.0];
        v.sort_by(|a, b| Direction::Minimize.ordering(*a, *b));
        assert_eq!(v, vec![1.0, 2.0, 3.0]);
        v.sort_by(|a, b| Direction::Maximize.ordering(*a, *b));
        assert_eq!(v, vec![3.0, 2.0, 1.0]);
    }

    #[test]
    fn test_improvement_sign() {
        assert_eq!(Direction::Minimize.improvement(5.0, 3.0), 2.0);
        assert_eq!(Direction::Maximize.improvement(5.0, 3.0), -2.0);
    }

    #[test]
    fn test_closure_objectives() {
        let single = |x: &[f64]| x[0];
        let multi = |x: &[f64]| vec![x[0], x[1]];
        assert_eq!(
            single.evaluate(&[3.0]).unwrap(),
            ObjectiveValue::Single(3.0)
        );
        assert_eq!(
            multi.evaluate(&[1.0, 2.0]).unwrap(),
            ObjectiveValue::Multi(vec![1.0, 2.0])
        );
    }

    #[test]
    fn test_negative_weight_rejected() {
        let problem = Problem::new(vec![0.0], vec![1.0], Direction::Minimize).unwrap();
        let err = problem.with_weights(vec![0.5, -0.1]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::NegativeWeight {
                index: 1,
                weight: -0.1
            }
        );
    }

    #[test]
    fn test_invalid_bounds_rejected() {
        assert!(Problem::new(vec![0.0, 0.0], vec![1.0], Direction::Minimize).is_err());
        assert!(Problem::new(vec![1.0], vec![1.0], Direction::Minimize).is_err());
    }
}
