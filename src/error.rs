//! Error types.
//!
//! Configuration problems are the only failures a caller ever sees from a
//! run. Objective failures are reported through [`EvaluationError`] by
//! [`FitnessEvaluator::try_evaluate`](crate::engine::FitnessEvaluator::try_evaluate)
//! and are otherwise absorbed into a penalty fitness.

/// Invalid problem, optimizer or algorithm configuration.
///
/// Always raised before the first epoch runs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("InvalidBounds: lb and ub must have the same length. lb={lb}, ub={ub}")]
    BoundsLength { lb: usize, ub: usize },
    #[error("InvalidBounds: at least one dimension is required")]
    EmptyBounds,
    #[error("InvalidBounds: lb must be smaller than ub. dim={dim}, lb={lb}, ub={ub}")]
    BoundsOrder { dim: usize, lb: f64, ub: f64 },
    #[error("InvalidWeights: weights must be finite and non-negative. index={index}, weight={weight}")]
    NegativeWeight { index: usize, weight: f64 },
    #[error("InvalidWeights: objective returned {actual} values but {expected} weights are configured")]
    WeightCount { expected: usize, actual: usize },
    #[error("InvalidPopulation: {algorithm} requires pop_size >= {min}, got {actual}")]
    PopulationTooSmall {
        algorithm: &'static str,
        min: usize,
        actual: usize,
    },
    #[error("InvalidEpochs: epochs must be at least 1")]
    ZeroEpochs,
    #[error("InvalidTeachers: n_teachers={n_teachers} must be in 1..pop_size={pop_size}")]
    Teachers { n_teachers: usize, pop_size: usize },
    #[error("InvalidTeams: each team needs at least 2 students, got {students_per_team}")]
    TeamTooSmall { students_per_team: usize },
    #[error("InvalidParameter: {name}={value} outside {range}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        range: &'static str,
    },
}

impl ConfigError {
    pub(crate) fn out_of_range(name: &'static str, value: f64, range: &'static str) -> Self {
        Self::OutOfRange { name, value, range }
    }

    pub(crate) fn population(algorithm: &'static str, min: usize, actual: usize) -> Self {
        Self::PopulationTooSmall {
            algorithm,
            min,
            actual,
        }
    }
}

/// A single objective evaluation that could not produce a usable fitness.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvaluationError {
    #[error("ObjectiveFailed: {0}")]
    Failed(String),
    #[error("NonFiniteTarget: objective produced {0}")]
    NonFinite(f64),
    #[error("EmptyObjectives: objective returned no values")]
    Empty,
    #[error("WeightCount: expected {expected} objectives, got {actual}")]
    WeightCount { expected: usize, actual: usize },
}
