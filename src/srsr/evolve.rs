//! Swarm Robotics Search And Rescue update rules.

use super::config::SrsrConfig;
use super::types::{Robot, Swarm};
use crate::engine::selection::{compare, sort_population};
use crate::engine::{Agent, Bounds, Evolve, EvolveContext, OptimizerConfig};
use crate::error::ConfigError;
use crate::random::{uniform, uniform_vec};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::StandardNormal;

/// Number of worker robots spawned around the master by local search.
const WORKERS: usize = 5;

/// Swarm Robotics Search And Rescue (SRSR).
///
/// The best robot is the master; every other robot is a slave. Each epoch
/// runs three phases in order:
///
/// 1. **Accumulation**: each robot samples a new position from a normal
///    distribution whose mean blends its position with the master's and
///    whose spread follows the sigma improvement factor (SIF). The SIF is
///    re-tuned from the robot that improved the most.
/// 2. **Exploration**: each robot steps toward or away from the master per
///    dimension, plus a random step scaled by the box width.
/// 3. **Local search** (from the second epoch on): five workers derived
///    from the master's integer and fractional parts replace the worst
///    robots when they beat the second-best one.
///
/// Costs `2 * pop_size` evaluations in the first epoch and
/// `2 * pop_size + 5` afterwards.
///
/// # Examples
///
/// ```
/// use u_swarm::engine::{Direction, Optimizer, OptimizerConfig, Problem};
/// use u_swarm::srsr::Srsr;
///
/// let problem = Problem::new(vec![-10.0; 3], vec![10.0; 3], Direction::Minimize).unwrap();
/// let config = OptimizerConfig::default().with_epochs(20).with_pop_size(10).with_seed(9);
/// let result = Optimizer::new(problem, Srsr::default(), config)
///     .unwrap()
///     .run(&|x: &[f64]| x.iter().map(|v| v * v).sum::<f64>())
///     .unwrap();
/// assert_eq!(result.evaluations, 10 + 20 * 20 + 19 * 5);
/// ```
///
/// # References
///
/// Bakhshipour, Ghadi & Namdari (2017), "Swarm robotics search & rescue: A
/// novel artificial intelligence-inspired optimization approach",
/// *Applied Soft Computing* 57, 708-726
#[derive(Debug, Clone, Default)]
pub struct Srsr {
    config: SrsrConfig,
}

impl Srsr {
    pub fn new(config: SrsrConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SrsrConfig {
        &self.config
    }

    /// Phase 1. Returns the updated robots and the SIF for the next epoch.
    fn accumulate<R: Rng>(
        &self,
        swarm: &Swarm,
        epoch: usize,
        ctx: &EvolveContext<'_>,
        rng: &mut R,
    ) -> (Vec<Robot>, f64) {
        let mu_factor = self.config.mu_factor;
        let sif = if epoch == 0 { self.config.initial_sif } else { swarm.sif };
        let master = swarm.master().agent.position.clone();
        let mut robots = swarm.robots.clone();
        let mut sigma_temp = vec![0.0; robots.len()];

        let master_sigma = rng.random::<f64>();
        let mut positions = Vec::with_capacity(robots.len());
        for (i, robot) in robots.iter_mut().enumerate() {
            if i == 0 {
                let scale = if epoch % 2 == 1 {
                    1.0 - master_sigma
                } else {
                    1.0 + (1.0 - mu_factor) * master_sigma
                };
                robot.mu = master.iter().map(|x| scale * x).collect();
                robot.sigma = vec![master_sigma; master.len()];
                sigma_temp[0] = master_sigma;
            } else {
                let temp = sif * rng.random::<f64>();
                let jitter = rng.random::<f64>().powi(2);
                let x = &robot.agent.position;
                robot.mu = master
                    .iter()
                    .zip(x)
                    .map(|(m, x)| mu_factor * m + (1.0 - mu_factor) * x)
                    .collect();
                robot.sigma = master
                    .iter()
                    .zip(x)
                    .map(|(m, x)| {
                        let diff = m - x;
                        temp * diff.abs() + if diff < 0.05 { jitter } else { 0.0 }
                    })
                    .collect();
                sigma_temp[i] = temp;
            }

            let sample = robot
                .mu
                .iter()
                .zip(&robot.sigma)
                .map(|(m, s)| m + s * rng.sample::<f64, _>(StandardNormal))
                .collect();
            positions.push(ctx.bounds.clip(sample));
        }

        let candidates = ctx.evaluator.evaluate_agents(positions);
        replace_improved(ctx, &mut robots, candidates);

        let best = most_improved(&robots);
        let max_ub = max_of(ctx.bounds.ub());
        let sigma_factor = 1.0 + rng.random::<f64>() * max_of(&ctx.bounds.range());
        let mut next_sif = sigma_factor * sigma_temp[best];
        if next_sif > max_ub {
            next_sif = max_ub * rng.random::<f64>();
        }
        (robots, next_sif)
    }

    /// Phase 2.
    fn explore<R: Rng>(&self, mut robots: Vec<Robot>, epoch: usize, ctx: &EvolveContext<'_>, rng: &mut R) -> Vec<Robot> {
        let decay = if self.config.movement_decay {
            1.0 - epoch as f64 / ctx.epochs as f64
        } else {
            1.0
        };
        let movement = ctx.bounds.range();
        let master = robots[0].agent.position.clone();

        let positions = robots
            .iter()
            .map(|robot| {
                let signs: Vec<f64> = (0..ctx.n_dims())
                    .map(|_| if uniform(rng, -1.0, 1.0) >= 0.0 { 1.0 } else { -1.0 })
                    .collect();
                let r = rng.random::<f64>();
                let step = uniform_vec(rng, ctx.bounds.lb(), ctx.bounds.ub());
                let position = robot
                    .agent
                    .position
                    .iter()
                    .enumerate()
                    .map(|(d, x)| x * r + signs[d] * (master[d] - x) + movement[d] * decay * step[d])
                    .collect();
                ctx.bounds.clip(position)
            })
            .collect();

        let candidates = ctx.evaluator.evaluate_agents(positions);
        replace_improved(ctx, &mut robots, candidates);
        robots
    }

    /// Phase 3.
    fn local_search<R: Rng>(&self, mut robots: Vec<Robot>, ctx: &EvolveContext<'_>, rng: &mut R) -> Vec<Robot> {
        let master = robots[0].agent.position.clone();
        let positions = workers(&master, ctx.bounds, rng)
            .into_iter()
            .map(|w| ctx.bounds.clip(w))
            .collect();
        let candidates = ctx.evaluator.evaluate_agents(positions);

        let n = robots.len();
        for (i, worker) in candidates.into_iter().enumerate() {
            if compare(ctx.direction, &worker, &robots[1]) {
                tracing::trace!(worker = i, target = worker.target(), "worker robot accepted");
                robots[n - 1 - i].agent = worker;
            }
        }
        robots
    }
}

impl Evolve for Srsr {
    type State = Swarm;

    fn name(&self) -> &'static str {
        "SRSR"
    }

    fn validate(&self, config: &OptimizerConfig) -> Result<(), ConfigError> {
        self.config.validate(config.pop_size)
    }

    fn initialize<R: Rng>(&self, population: Vec<Agent>, ctx: &EvolveContext<'_>, _rng: &mut R) -> Swarm {
        let mut robots: Vec<Robot> = population.into_iter().map(Robot::new).collect();
        sort_population(ctx.direction, &mut robots);
        Swarm {
            robots,
            sif: self.config.initial_sif,
        }
    }

    fn evolve<R: Rng>(&self, swarm: &Swarm, epoch: usize, ctx: &EvolveContext<'_>, rng: &mut R) -> Swarm {
        let (robots, sif) = self.accumulate(swarm, epoch, ctx, rng);
        let mut robots = self.explore(robots, epoch, ctx, rng);
        if epoch > 0 {
            robots = self.local_search(robots, ctx, rng);
        }
        sort_population(ctx.direction, &mut robots);
        Swarm { robots, sif }
    }

    fn population(swarm: &Swarm) -> Vec<&Agent> {
        swarm.robots.iter().map(|r| &r.agent).collect()
    }
}

/// Records each robot's gain and keeps strict improvements.
fn replace_improved(ctx: &EvolveContext<'_>, robots: &mut [Robot], candidates: Vec<Agent>) {
    for (robot, candidate) in robots.iter_mut().zip(candidates) {
        robot.improvement = ctx.direction.improvement(robot.agent.target(), candidate.target());
        if compare(ctx.direction, &candidate, &robot.agent) {
            robot.agent = candidate;
        }
    }
}

/// Index of the largest improvement; the earliest wins ties, NaN never wins.
fn most_improved(robots: &[Robot]) -> usize {
    let mut best = 0;
    let mut value = f64::NEG_INFINITY;
    for (i, robot) in robots.iter().enumerate() {
        if robot.improvement > value {
            best = i;
            value = robot.improvement;
        }
    }
    best
}

fn max_of(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

/// Integer part, fractional part and sign of a coordinate.
fn split(x: f64) -> (f64, f64, f64) {
    let abs = x.abs();
    let int = abs.floor();
    let sign = if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    };
    (int, abs - int, sign)
}

/// `(int + frac^(1 / (1 + k))) * sign`
fn root(x: f64, k: u32) -> f64 {
    let (int, frac, sign) = split(x);
    (int + frac.powf(1.0 / (1.0 + k as f64))) * sign
}

/// `(int + frac^(1 + k)) * sign`
fn power(x: f64, k: u32) -> f64 {
    let (int, frac, sign) = split(x);
    (int + frac.powi(1 + k as i32)) * sign
}

fn order<R: Rng>(rng: &mut R) -> u32 {
    rng.random_range(1..=3)
}

/// Puts back the master's value in every dimension where a uniform draw
/// over `[lb, ub]` does not round to zero.
fn revert<R: Rng>(mut worker: Vec<f64>, master: &[f64], bounds: &Bounds, rng: &mut R) -> Vec<f64> {
    for (d, w) in worker.iter_mut().enumerate() {
        if uniform(rng, bounds.lb()[d], bounds.ub()[d]).round() != 0.0 {
            *w = master[d];
        }
    }
    worker
}

/// The five local-search candidates around `master`, unclipped.
fn workers<R: Rng>(master: &[f64], bounds: &Bounds, rng: &mut R) -> Vec<Vec<f64>> {
    let mut workers = Vec::with_capacity(WORKERS);

    let k = order(rng);
    let w = master.iter().map(|&x| root(x, k)).collect();
    workers.push(revert(w, master, bounds, rng));

    let k = order(rng);
    let w = master.iter().map(|&x| power(x, k)).collect();
    workers.push(revert(w, master, bounds, rng));

    let mut dims: Vec<usize> = (0..master.len()).collect();
    dims.shuffle(rng);
    let (roots, powers) = dims.split_at(master.len() / 2);
    let (k_root, k_power) = (order(rng), order(rng));
    let mut w = vec![0.0; master.len()];
    for &d in roots {
        w[d] = root(master[d], k_root);
    }
    for &d in powers {
        w[d] = power(master[d], k_power);
    }
    workers.push(revert(w, master, bounds, rng));

    let w = master
        .iter()
        .map(|&x| {
            let (_, _, sign) = split(x);
            x.abs().ceil() * sign
        })
        .collect();
    workers.push(revert(w, master, bounds, rng));

    let w = master
        .iter()
        .map(|&x| {
            let (int, _, sign) = split(x);
            int * sign
        })
        .collect();
    workers.push(revert(w, master, bounds, rng));

    workers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Checkpoint, Direction, Fitness, FitnessEvaluator, OptimizationResult, Optimizer, Problem};
    use crate::random::create_rng;

    fn sphere(x: &[f64]) -> f64 {
        x.iter().map(|v| v * v).sum()
    }

    fn run(epochs: usize, pop_size: usize, snapshots: bool) -> OptimizationResult<Swarm> {
        let problem = Problem::new(vec![-10.0; 4], vec![10.0; 4], Direction::Minimize).unwrap();
        let config = OptimizerConfig::default()
            .with_epochs(epochs)
            .with_pop_size(pop_size)
            .with_seed(42)
            .with_snapshots(snapshots);
        Optimizer::new(problem, Srsr::default(), config)
            .unwrap()
            .run(&sphere)
            .unwrap()
    }

    #[test]
    fn test_root_and_power() {
        assert!((root(-2.25, 1) + 2.5).abs() < 1e-12);
        assert_eq!(power(-2.25, 1), -2.0625);
        assert_eq!(root(0.0, 2), 0.0);
        assert_eq!(power(3.0, 3), 3.0);
    }

    #[test]
    fn test_workers_stay_near_master() {
        let bounds = Bounds::new(vec![-10.0; 6], vec![10.0; 6]).unwrap();
        let master = [1.5, -2.25, 0.0, 7.75, -0.5, 3.0];
        let mut rng = create_rng(8);
        let workers = workers(&master, &bounds, &mut rng);
        assert_eq!(workers.len(), WORKERS);
        for worker in &workers {
            assert_eq!(worker.len(), master.len());
            for (w, m) in worker.iter().zip(&master) {
                assert!((w - m).abs() <= 1.0, "{w} vs {m}");
            }
        }
    }

    #[test]
    fn test_most_improved_ignores_nan() {
        let mut robots: Vec<Robot> = (0..3)
            .map(|i| Robot::new(Agent::new(vec![0.0], Fitness::single(i as f64))))
            .collect();
        robots[0].improvement = f64::NAN;
        robots[1].improvement = 2.0;
        robots[2].improvement = 1.0;
        assert_eq!(most_improved(&robots), 1);
    }

    #[test]
    fn test_master_mean_alternates_with_epoch_parity() {
        let problem = Problem::new(vec![-10.0; 2], vec![10.0; 2], Direction::Minimize).unwrap();
        let objective = |x: &[f64]| sphere(x);
        let evaluator = FitnessEvaluator::new(&objective, &problem);
        let master = Agent::new(vec![4.0, -2.0], Fitness::single(20.0));
        let robots = (0..6)
            .map(|i| Robot::new(Agent::new(vec![i as f64, 1.0], Fitness::single(30.0 + i as f64))))
            .collect::<Vec<_>>();
        let mut swarm = Swarm { robots, sif: 3.0 };
        swarm.robots[0] = Robot::new(master.clone());
        let ctx = EvolveContext {
            bounds: problem.bounds(),
            direction: Direction::Minimize,
            evaluator: &evaluator,
            global_best: &master,
            epochs: 10,
            pop_size: 6,
        };
        let srsr = Srsr::default();
        let mut rng = create_rng(1);

        let (odd, _) = srsr.accumulate(&swarm, 1, &ctx, &mut rng);
        assert!(odd[0].mu[0] <= 4.0 && odd[0].mu[0] >= 0.0);
        let (even, _) = srsr.accumulate(&swarm, 2, &ctx, &mut rng);
        assert!(even[0].mu[0] >= 4.0);
        assert_eq!(evaluator.evaluations(), 12);
    }

    #[test]
    fn test_evaluation_counts_per_phase() {
        let result = run(6, 10, false);
        assert_eq!(result.history.evaluations[0], 20);
        assert!(result.history.evaluations[1..].iter().all(|&n| n == 25));
        assert_eq!(result.evaluations, 10 + 20 + 5 * 25);
    }

    #[test]
    fn test_swarm_is_sorted_and_constant() {
        let result = run(10, 12, true);
        let swarm = &result.final_state;
        assert_eq!(swarm.robots.len(), 12);
        for pair in swarm.robots.windows(2) {
            assert!(pair[0].agent.target() <= pair[1].agent.target());
        }
        assert!(result.history.snapshots.iter().all(|s| s.len() == 12));
        let bounds = Bounds::new(vec![-10.0; 4], vec![10.0; 4]).unwrap();
        for snapshot in &result.history.snapshots {
            assert!(snapshot.iter().all(|a| bounds.contains(&a.position)));
        }
    }

    #[test]
    fn test_sphere_converges() {
        let result = run(50, 20, false);
        for window in result.history.global_best_fitness.windows(2) {
            assert!(window[1] <= window[0]);
        }
        assert!(result.best_fitness.target < 1.0, "{}", result.best_fitness.target);
    }

    #[test]
    fn test_rejects_small_population() {
        let problem = Problem::new(vec![-1.0; 2], vec![1.0; 2], Direction::Minimize).unwrap();
        let config = OptimizerConfig::default().with_pop_size(5);
        assert!(matches!(
            Optimizer::new(problem, Srsr::default(), config),
            Err(ConfigError::PopulationTooSmall { min: 6, .. })
        ));
    }

    #[test]
    fn test_checkpoint_resume_matches_full_run() {
        let problem = Problem::new(vec![-10.0; 3], vec![10.0; 3], Direction::Minimize).unwrap();
        let config = OptimizerConfig::default()
            .with_epochs(10)
            .with_pop_size(10)
            .with_seed(5);
        let optimizer = Optimizer::new(problem, Srsr::default(), config).unwrap();
        let full = optimizer.run(&sphere).unwrap();

        let checkpoint = optimizer.advance(&sphere, optimizer.initialize(&sphere).unwrap(), 3);
        let json = serde_json::to_string(&checkpoint).unwrap();
        let restored: Checkpoint<Swarm> = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.state, checkpoint.state);
        assert_eq!(restored.state.sif, checkpoint.state.sif);

        let resumed = optimizer.advance(&sphere, restored, 7).into_result();
        assert_eq!(resumed.final_state, full.final_state);
        assert_eq!(resumed.best_position, full.best_position);
        assert_eq!(resumed.evaluations, full.evaluations);
    }
}
