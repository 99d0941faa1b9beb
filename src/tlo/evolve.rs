//! Teaching-Learning-based Optimization update rules.

use super::config::{TloConfig, TloVariant};
use crate::engine::selection::{compare, greedy_selection, random_partner};
use crate::engine::{mean_position, Agent, Evolve, EvolveContext, OptimizerConfig};
use crate::error::ConfigError;
use crate::random::unit_vec;
use rand::Rng;

/// Teaching-Learning-based Optimization.
///
/// Each epoch runs a teach phase, where every learner moves toward the
/// global best minus a multiple of the class mean, and a learn phase,
/// where every learner moves toward the better of itself and a random
/// classmate. Both phases clip to the box and keep a move only if it
/// improves the learner. Costs `2 * pop_size` evaluations per epoch.
///
/// # Examples
///
/// ```
/// use u_swarm::engine::{Direction, Optimizer, OptimizerConfig, Problem};
/// use u_swarm::tlo::{Tlo, TloConfig, TloVariant};
///
/// let problem = Problem::new(vec![-5.0; 2], vec![5.0; 2], Direction::Minimize).unwrap();
/// let tlo = Tlo::new(TloConfig::default().with_variant(TloVariant::Original));
/// let config = OptimizerConfig::default().with_epochs(10).with_pop_size(10).with_seed(1);
///
/// let result = Optimizer::new(problem, tlo, config)
///     .unwrap()
///     .run(&|x: &[f64]| x[0].abs() + x[1].abs())
///     .unwrap();
/// assert!(result.best_fitness.target < 5.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Tlo {
    config: TloConfig,
}

impl Tlo {
    pub fn new(config: TloConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TloConfig {
        &self.config
    }

    fn evolve_base<R: Rng>(&self, pop: &[Agent], ctx: &EvolveContext<'_>, rng: &mut R) -> Vec<Agent> {
        let mean = mean_position(pop.iter().map(|a| a.position.as_slice()));
        let taught: Vec<Vec<f64>> = pop
            .iter()
            .map(|agent| {
                let factor = teaching_factor(rng);
                let r = unit_vec(rng, ctx.n_dims());
                ctx.bounds
                    .clip(teach(&agent.position, &ctx.global_best.position, &mean, factor, &r))
            })
            .collect();
        let taught = ctx.evaluator.evaluate_agents(taught);
        let pop_new = greedy_selection(ctx.direction, pop.to_vec(), taught);

        let learned: Vec<Vec<f64>> = (0..pop_new.len())
            .map(|idx| {
                let partner = random_partner(pop_new.len(), idx, rng);
                let r = unit_vec(rng, ctx.n_dims());
                ctx.bounds
                    .clip(learn(ctx, &pop_new[idx], &pop_new[partner], &r))
            })
            .collect();
        let learned = ctx.evaluator.evaluate_agents(learned);
        greedy_selection(ctx.direction, pop_new, learned)
    }

    fn evolve_original<R: Rng>(&self, pop: &[Agent], ctx: &EvolveContext<'_>, rng: &mut R) -> Vec<Agent> {
        let mut pop = pop.to_vec();
        for idx in 0..pop.len() {
            let factor = teaching_factor(rng);
            let mean = mean_position(pop.iter().map(|a| a.position.as_slice()));
            let r = unit_vec(rng, ctx.n_dims());
            let position = ctx
                .bounds
                .clip(teach(&pop[idx].position, &ctx.global_best.position, &mean, factor, &r));
            let candidate = ctx.evaluator.evaluate_agent(position);
            if compare(ctx.direction, &candidate, &pop[idx]) {
                pop[idx] = candidate;
            }

            let partner = random_partner(pop.len(), idx, rng);
            let r = unit_vec(rng, ctx.n_dims());
            let position = ctx.bounds.clip(learn(ctx, &pop[idx], &pop[partner], &r));
            let candidate = ctx.evaluator.evaluate_agent(position);
            if compare(ctx.direction, &candidate, &pop[idx]) {
                pop[idx] = candidate;
            }
        }
        pop
    }
}

impl Evolve for Tlo {
    type State = Vec<Agent>;

    fn name(&self) -> &'static str {
        match self.config.variant {
            TloVariant::Base => "TLO",
            TloVariant::Original => "OriginalTLO",
        }
    }

    fn validate(&self, config: &OptimizerConfig) -> Result<(), ConfigError> {
        self.config.validate(config.pop_size)
    }

    fn initialize<R: Rng>(&self, population: Vec<Agent>, _ctx: &EvolveContext<'_>, _rng: &mut R) -> Vec<Agent> {
        population
    }

    fn evolve<R: Rng>(&self, state: &Vec<Agent>, _epoch: usize, ctx: &EvolveContext<'_>, rng: &mut R) -> Vec<Agent> {
        match self.config.variant {
            TloVariant::Base => self.evolve_base(state, ctx, rng),
            TloVariant::Original => self.evolve_original(state, ctx, rng),
        }
    }

    fn population(state: &Vec<Agent>) -> Vec<&Agent> {
        state.iter().collect()
    }
}

/// 1 or 2 with equal probability.
fn teaching_factor<R: Rng>(rng: &mut R) -> f64 {
    rng.random_range(1..=2u32) as f64
}

/// `x + r * (teacher - factor * mean)`, component-wise.
fn teach(x: &[f64], teacher: &[f64], mean: &[f64], factor: f64, r: &[f64]) -> Vec<f64> {
    x.iter()
        .zip(teacher)
        .zip(mean)
        .zip(r)
        .map(|(((x, t), m), r)| x + r * (t - factor * m))
        .collect()
}

/// Steps from `learner` in the direction pointing from the worse of the
/// pair to the better one.
fn learn(ctx: &EvolveContext<'_>, learner: &Agent, partner: &Agent, r: &[f64]) -> Vec<f64> {
    let toward_self = compare(ctx.direction, learner, partner);
    learner
        .position
        .iter()
        .zip(&partner.position)
        .zip(r)
        .map(|((x, p), r)| if toward_self { x + r * (x - p) } else { x + r * (p - x) })
        .collect()
}
