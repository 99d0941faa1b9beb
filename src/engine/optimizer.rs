//! The epoch loop shared by every algorithm.
//!
//! [`Optimizer`] owns the run: it samples and evaluates the initial
//! population, hands the population state to the algorithm's [`Evolve`]
//! step once per epoch, keeps the global best as an owned copy, and
//! appends one [`History`] entry per epoch.
//!
//! A run can be split at any epoch boundary: [`Optimizer::initialize`]
//! returns a serializable [`Checkpoint`], [`Optimizer::advance`] runs more
//! epochs on it, and [`Checkpoint::into_result`] closes it.

use super::agent::Agent;
use super::bounds::Bounds;
use super::config::OptimizerConfig;
use super::diagnostics::{CentroidDistance, DiversityMeasure, DiversityRatio, ExplorationPolicy};
use super::fitness::{Fitness, FitnessEvaluator};
use super::history::{EpochRecord, History};
use super::problem::{Direction, Objective, Problem};
use super::selection::{best_index, compare};
use crate::error::ConfigError;
use crate::random::{create_rng, epoch_rng};
use rand::Rng;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::instrument;

/// Everything an [`Evolve`] step may read besides its own state.
pub struct EvolveContext<'a> {
    pub bounds: &'a Bounds,
    pub direction: Direction,
    pub evaluator: &'a FitnessEvaluator<'a>,
    /// Owned copy of the best agent seen so far in the run.
    pub global_best: &'a Agent,
    /// Total epochs configured for the run.
    pub epochs: usize,
    pub pop_size: usize,
}

impl EvolveContext<'_> {
    pub fn n_dims(&self) -> usize {
        self.bounds.n_dims()
    }
}

/// One population-based algorithm.
///
/// `evolve` is a function of the current state, the epoch index and the
/// epoch's RNG: it reads `state` and returns the next one. Draws must
/// follow agent order so a seed fully determines the run. All tunable
/// parameters live in `self` and are fixed at construction time.
pub trait Evolve: Send + Sync {
    /// Population plus any scratch the algorithm carries across epochs.
    type State: Clone + Serialize + DeserializeOwned;

    fn name(&self) -> &'static str;

    /// Checks the algorithm's own parameters against the run configuration.
    fn validate(&self, config: &OptimizerConfig) -> Result<(), ConfigError>;

    /// Builds the initial state from the evaluated initial population.
    fn initialize<R: Rng>(
        &self,
        population: Vec<Agent>,
        ctx: &EvolveContext<'_>,
        rng: &mut R,
    ) -> Self::State;

    /// Produces the next state.
    fn evolve<R: Rng>(
        &self,
        state: &Self::State,
        epoch: usize,
        ctx: &EvolveContext<'_>,
        rng: &mut R,
    ) -> Self::State;

    /// The agents that make up the population in `state`.
    fn population(state: &Self::State) -> Vec<&Agent>;
}

/// A paused run.
///
/// Holds everything needed to continue: the algorithm state, the global
/// best, the next epoch index, the seed and the accumulated history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint<S> {
    pub state: S,
    pub global_best: Agent,
    /// Index of the next epoch to run.
    pub epoch: usize,
    pub seed: u64,
    pub evaluations: usize,
    pub failures: usize,
    pub history: History,
}

impl<S> Checkpoint<S> {
    pub fn into_result(self) -> OptimizationResult<S> {
        OptimizationResult {
            best_position: self.global_best.position,
            best_fitness: self.global_best.fitness,
            epochs: self.epoch,
            evaluations: self.evaluations,
            failures: self.failures,
            seed: self.seed,
            history: self.history,
            final_state: self.state,
        }
    }
}

/// Result of an optimization run.
#[derive(Debug, Clone)]
pub struct OptimizationResult<S> {
    pub best_position: Vec<f64>,
    pub best_fitness: Fitness,
    pub history: History,

    /// Number of epochs executed.
    pub epochs: usize,

    /// Objective evaluations, including the initial population.
    pub evaluations: usize,

    /// Evaluations that failed and were penalized.
    pub failures: usize,

    /// Seed that reproduces this run.
    pub seed: u64,

    pub final_state: S,
}

/// Runs an [`Evolve`] algorithm on a [`Problem`].
///
/// # Usage
///
/// ```
/// use u_swarm::engine::{Direction, Optimizer, OptimizerConfig, Problem};
/// use u_swarm::tlo::Tlo;
///
/// let problem = Problem::new(vec![-10.0; 4], vec![10.0; 4], Direction::Minimize).unwrap();
/// let config = OptimizerConfig::default().with_epochs(20).with_pop_size(20).with_seed(42);
/// let optimizer = Optimizer::new(problem, Tlo::default(), config).unwrap();
///
/// let result = optimizer.run(&|x: &[f64]| x.iter().map(|v| v * v).sum::<f64>()).unwrap();
/// assert_eq!(result.history.len(), 20);
/// ```
pub struct Optimizer<A: Evolve> {
    problem: Problem,
    algorithm: A,
    config: OptimizerConfig,
    diversity: Box<dyn DiversityMeasure>,
    policy: Box<dyn ExplorationPolicy>,
}

impl<A: Evolve> Optimizer<A> {
    /// Validates the run and algorithm configuration.
    pub fn new(problem: Problem, algorithm: A, config: OptimizerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        algorithm.validate(&config)?;
        Ok(Self {
            problem,
            algorithm,
            config,
            diversity: Box::new(CentroidDistance),
            policy: Box::new(DiversityRatio),
        })
    }

    pub fn with_diversity_measure<M: DiversityMeasure + 'static>(mut self, measure: M) -> Self {
        self.diversity = Box::new(measure);
        self
    }

    pub fn with_exploration_policy<P: ExplorationPolicy + 'static>(mut self, policy: P) -> Self {
        self.policy = Box::new(policy);
        self
    }

    pub fn problem(&self) -> &Problem {
        &self.problem
    }

    pub fn algorithm(&self) -> &A {
        &self.algorithm
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Runs all configured epochs.
    ///
    /// Fails only if the objective's output does not match the configured
    /// weights, which is detected on the first evaluation.
    pub fn run<O: Objective>(&self, objective: &O) -> Result<OptimizationResult<A::State>, ConfigError> {
        let checkpoint = self.initialize(objective)?;
        Ok(self
            .advance(objective, checkpoint, self.config.epochs)
            .into_result())
    }

    /// Samples, evaluates and partitions the initial population.
    #[instrument(level = "info", skip(self, objective), fields(algorithm = self.algorithm.name(), pop_size = self.config.pop_size))]
    pub fn initialize<O: Objective>(&self, objective: &O) -> Result<Checkpoint<A::State>, ConfigError> {
        let seed = self.config.seed.unwrap_or_else(rand::random);
        let mut rng = create_rng(seed);
        let evaluator = self.evaluator(objective, 0);
        let bounds = self.problem.bounds();

        let mut positions = (0..self.config.pop_size)
            .map(|_| bounds.sample(&mut rng))
            .collect::<Vec<_>>()
            .into_iter();
        let mut population = Vec::with_capacity(self.config.pop_size);
        if let Some(first) = positions.next() {
            let fitness = evaluator.evaluate_checked(&first)?;
            population.push(Agent::new(first, fitness));
        }
        population.extend(evaluator.evaluate_agents(positions.collect()));

        let direction = self.problem.direction();
        let mut global_best = best_of(direction, &population)
            .cloned()
            .ok_or_else(|| ConfigError::population(self.algorithm.name(), 2, 0))?;

        let state = {
            let ctx = self.context(&evaluator, &global_best);
            self.algorithm.initialize(population, &ctx, &mut rng)
        };
        if let Some(best) = best_of(direction, &A::population(&state)) {
            if compare(direction, *best, &global_best) {
                global_best = (*best).clone();
            }
        }

        tracing::info!(seed, best = global_best.target(), "population initialized");
        Ok(Checkpoint {
            state,
            global_best,
            epoch: 0,
            seed,
            evaluations: evaluator.evaluations(),
            failures: evaluator.failures(),
            history: History::default(),
        })
    }

    /// Runs up to `epochs` more epochs, never past the configured total.
    #[instrument(level = "info", skip(self, objective, checkpoint), fields(algorithm = self.algorithm.name(), from_epoch = checkpoint.epoch))]
    pub fn advance<O: Objective>(
        &self,
        objective: &O,
        mut checkpoint: Checkpoint<A::State>,
        epochs: usize,
    ) -> Checkpoint<A::State> {
        let evaluator = self.evaluator(objective, checkpoint.evaluations);
        let direction = self.problem.direction();
        let stop = checkpoint.epoch.saturating_add(epochs).min(self.config.epochs);

        while checkpoint.epoch < stop {
            let epoch = checkpoint.epoch;
            let started = Instant::now();
            let before = evaluator.evaluations();
            let mut rng = epoch_rng(checkpoint.seed, epoch);

            let next = {
                let ctx = self.context(&evaluator, &checkpoint.global_best);
                self.algorithm.evolve(&checkpoint.state, epoch, &ctx, &mut rng)
            };
            checkpoint.state = next;

            let population = A::population(&checkpoint.state);
            let current_best = match best_of(direction, &population) {
                Some(best) => (*best).clone(),
                None => checkpoint.global_best.clone(),
            };
            if compare(direction, &current_best, &checkpoint.global_best) {
                checkpoint.global_best = current_best.clone();
            }

            let positions: Vec<&[f64]> = population.iter().map(|a| a.position.as_slice()).collect();
            let diversity = self.diversity.measure(&positions, self.problem.bounds());
            let snapshot = self
                .config
                .keep_snapshots
                .then(|| population.iter().map(|a| (*a).clone()).collect());
            let evaluations = evaluator.evaluations() - before;

            tracing::debug!(
                epoch,
                global_best = checkpoint.global_best.target(),
                current_best = current_best.target(),
                diversity,
                evaluations,
                "epoch finished"
            );

            checkpoint.history.record(
                EpochRecord {
                    global_best: checkpoint.global_best.clone(),
                    current_best,
                    epoch_time: started.elapsed().as_secs_f64(),
                    diversity,
                    evaluations,
                    snapshot,
                },
                self.policy.as_ref(),
            );
            checkpoint.epoch += 1;
        }

        checkpoint.evaluations = evaluator.evaluations();
        checkpoint.failures += evaluator.failures();
        checkpoint
    }

    fn evaluator<'a>(&'a self, objective: &'a dyn Objective, count: usize) -> FitnessEvaluator<'a> {
        FitnessEvaluator::new(objective, &self.problem)
            .with_parallel(self.config.parallel)
            .with_count(count)
    }

    fn context<'a>(&'a self, evaluator: &'a FitnessEvaluator<'a>, global_best: &'a Agent) -> EvolveContext<'a> {
        EvolveContext {
            bounds: self.problem.bounds(),
            direction: self.problem.direction(),
            evaluator,
            global_best,
            epochs: self.config.epochs,
            pop_size: self.config.pop_size,
        }
    }
}

fn best_of<'p, T: super::agent::AsAgent>(direction: Direction, population: &'p [T]) -> Option<&'p T> {
    best_index(direction, population).map(|i| &population[i])
}
