//! Fitness records and objective evaluation.

use super::agent::Agent;
use super::problem::{Direction, Objective, ObjectiveValue, Problem};
use crate::error::{ConfigError, EvaluationError};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};

/// The evaluated quality of a position.
///
/// `target` is the scalar used for every comparison. `objectives` keeps the
/// raw objective values for diagnostics; it is empty for penalized agents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fitness {
    #[serde(with = "crate::engine::float_serde")]
    pub target: f64,
    #[serde(with = "crate::engine::float_serde::seq")]
    pub objectives: Vec<f64>,
}

impl Fitness {
    pub fn single(target: f64) -> Self {
        Self {
            target,
            objectives: vec![target],
        }
    }

    /// The sentinel assigned to positions whose evaluation failed.
    pub fn penalty(direction: Direction) -> Self {
        Self {
            target: direction.worst(),
            objectives: Vec::new(),
        }
    }

    pub fn is_penalty(&self) -> bool {
        self.target.is_infinite()
    }
}

/// Wraps the user objective for one run.
///
/// Combines multi-objective output into a single target, replaces failed
/// evaluations with [`Fitness::penalty`], and counts every call. The counter
/// is atomic so batch evaluation may run on the rayon pool.
pub struct FitnessEvaluator<'a> {
    objective: &'a dyn Objective,
    direction: Direction,
    weights: Option<&'a [f64]>,
    parallel: bool,
    evaluations: AtomicUsize,
    failures: AtomicUsize,
}

impl<'a> FitnessEvaluator<'a> {
    pub fn new(objective: &'a dyn Objective, problem: &'a Problem) -> Self {
        Self {
            objective,
            direction: problem.direction(),
            weights: problem.weights(),
            parallel: false,
            evaluations: AtomicUsize::new(0),
            failures: AtomicUsize::new(0),
        }
    }

    /// Evaluates batches on the rayon pool. Result order is unchanged.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Starts the evaluation counter at `count` (used when resuming a run).
    pub fn with_count(self, count: usize) -> Self {
        self.evaluations.store(count, Ordering::Relaxed);
        self
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Total objective calls so far.
    pub fn evaluations(&self) -> usize {
        self.evaluations.load(Ordering::Relaxed)
    }

    /// Objective calls that ended in a penalty.
    pub fn failures(&self) -> usize {
        self.failures.load(Ordering::Relaxed)
    }

    /// Evaluates a position, surfacing any failure.
    pub fn try_evaluate(&self, position: &[f64]) -> Result<Fitness, EvaluationError> {
        self.evaluations.fetch_add(1, Ordering::Relaxed);
        let objectives = match self.objective.evaluate(position)? {
            ObjectiveValue::Single(value) => vec![value],
            ObjectiveValue::Multi(values) => values,
        };
        if objectives.is_empty() {
            return Err(EvaluationError::Empty);
        }
        let target = match self.weights {
            Some(weights) => {
                if weights.len() != objectives.len() {
                    return Err(EvaluationError::WeightCount {
                        expected: weights.len(),
                        actual: objectives.len(),
                    });
                }
                weights
                    .iter()
                    .zip(objectives.iter())
                    .map(|(w, o)| w * o)
                    .sum::<f64>()
            }
            None => objectives.iter().sum::<f64>(),
        };
        if !target.is_finite() {
            return Err(EvaluationError::NonFinite(target));
        }
        Ok(Fitness { target, objectives })
    }

    /// Evaluates a position; failures become the penalty fitness.
    pub fn evaluate(&self, position: &[f64]) -> Fitness {
        match self.try_evaluate(position) {
            Ok(fitness) => fitness,
            Err(err) => {
                self.failures.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(error = %err, "objective evaluation failed, assigning penalty fitness");
                Fitness::penalty(self.direction)
            }
        }
    }

    /// Like [`evaluate`](Self::evaluate), but a weight/objective count
    /// mismatch is reported as a configuration error instead of penalized.
    pub(crate) fn evaluate_checked(&self, position: &[f64]) -> Result<Fitness, ConfigError> {
        match self.try_evaluate(position) {
            Ok(fitness) => Ok(fitness),
            Err(EvaluationError::WeightCount { expected, actual }) => {
                Err(ConfigError::WeightCount { expected, actual })
            }
            Err(err) => {
                self.failures.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(error = %err, "objective evaluation failed, assigning penalty fitness");
                Ok(Fitness::penalty(self.direction))
            }
        }
    }

    /// Evaluates many positions, in order.
    pub fn evaluate_population(&self, positions: &[Vec<f64>]) -> Vec<Fitness> {
        if self.parallel {
            positions.par_iter().map(|p| self.evaluate(p)).collect()
        } else {
            positions.iter().map(|p| self.evaluate(p)).collect()
        }
    }

    /// Evaluates many positions and pairs each with its fitness.
    pub fn evaluate_agents(&self, positions: Vec<Vec<f64>>) -> Vec<Agent> {
        let fitness = self.evaluate_population(&positions);
        positions
            .into_iter()
            .zip(fitness)
            .map(|(position, fitness)| Agent::new(position, fitness))
            .collect()
    }

    pub fn evaluate_agent(&self, position: Vec<f64>) -> Agent {
        let fitness = self.evaluate(&position);
        Agent::new(position, fitness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn problem(direction: Direction) -> Problem {
        Problem::new(vec![-10.0; 2], vec![10.0; 2], direction).unwrap()
    }

    struct Failing;

    impl Objective for Failing {
        fn evaluate(&self, position: &[f64]) -> Result<ObjectiveValue, EvaluationError> {
            if position[0] > 0.0 {
                Err(EvaluationError::Failed("infeasible".into()))
            } else {
                Ok(ObjectiveValue::Single(position[0]))
            }
        }
    }

    #[test]
    fn test_weighted_sum_is_exact() {
        let problem = problem(Direction::Minimize)
            .with_weights(vec![0.5, 0.5])
            .unwrap();
        let objective = |x: &[f64]| vec![x[0] * x[0], x[1] * x[1]];
        let evaluator = FitnessEvaluator::new(&objective, &problem);
        for x in [[1.5, -2.25], [3.0, 7.0], [-9.75, 0.125]] {
            let fitness = evaluator.evaluate(&x);
            assert_eq!(fitness.target, 0.5 * (x[0] * x[0]) + 0.5 * (x[1] * x[1]));
            assert_eq!(fitness.objectives, vec![x[0] * x[0], x[1] * x[1]]);
        }
    }

    #[test]
    fn test_unweighted_multi_objective_sums() {
        let problem = problem(Direction::Minimize);
        let objective = |x: &[f64]| vec![x[0], x[1]];
        let evaluator = FitnessEvaluator::new(&objective, &problem);
        assert_eq!(evaluator.evaluate(&[1.0, 2.0]).target, 3.0);
    }

    #[test]
    fn test_counter_increments() {
        let problem = problem(Direction::Minimize);
        let objective = |x: &[f64]| x[0];
        let evaluator = FitnessEvaluator::new(&objective, &problem).with_count(10);
        evaluator.evaluate(&[1.0, 0.0]);
        evaluator.evaluate_population(&[vec![0.0, 0.0], vec![1.0, 1.0]]);
        assert_eq!(evaluator.evaluations(), 13);
    }

    #[test]
    fn test_failure_is_penalized() {
        for direction in [Direction::Minimize, Direction::Maximize] {
            let problem = problem(direction);
            let evaluator = FitnessEvaluator::new(&Failing, &problem);
            let bad = evaluator.evaluate(&[1.0, 0.0]);
            let good = evaluator.evaluate(&[-1.0, 0.0]);
            assert!(bad.is_penalty());
            assert!(direction.is_better(good.target, bad.target));
            assert_eq!(evaluator.failures(), 1);
            assert_eq!(evaluator.evaluations(), 2);
        }
    }

    #[test]
    fn test_try_evaluate_surfaces_failure() {
        let problem = problem(Direction::Minimize);
        let evaluator = FitnessEvaluator::new(&Failing, &problem);
        assert!(matches!(
            evaluator.try_evaluate(&[1.0, 0.0]),
            Err(EvaluationError::Failed(_))
        ));
    }

    #[test]
    fn test_nan_is_penalized() {
        let problem = problem(Direction::Minimize);
        let objective = |_: &[f64]| f64::NAN;
        let evaluator = FitnessEvaluator::new(&objective, &problem);
        assert_eq!(evaluator.evaluate(&[0.0, 0.0]).target, f64::INFINITY);
    }

    #[test]
    fn test_weight_count_mismatch() {
        let problem = problem(Direction::Minimize)
            .with_weights(vec![1.0, 1.0, 1.0])
            .unwrap();
        let objective = |x: &[f64]| vec![x[0], x[1]];
        let evaluator = FitnessEvaluator::new(&objective, &problem);
        assert_eq!(
            evaluator.try_evaluate(&[0.0, 0.0]),
            Err(EvaluationError::WeightCount {
                expected: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn test_parallel_preserves_order() {
        let problem = problem(Direction::Minimize);
        let objective = |x: &[f64]| x[0];
        let evaluator = FitnessEvaluator::new(&objective, &problem).with_parallel(true);
        let positions: Vec<Vec<f64>> = (0..200).map(|i| vec![i as f64, 0.0]).collect();
        let fitness = evaluator.evaluate_population(&positions);
        for (i, f) in fitness.iter().enumerate() {
            assert_eq!(f.target, i as f64);
        }
        assert_eq!(evaluator.evaluations(), 200);
    }
}
