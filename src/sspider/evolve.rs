//! Social Spider Optimization update rules.

use super::config::{Recombination, SocialSpiderConfig};
use super::types::{Colony, Spider};
use crate::engine::selection::{compare, sorted_trim, special_fitness};
use crate::engine::{
    distance, mean_position, Agent, Direction, Evolve, EvolveContext, OptimizerConfig, RepairPolicy,
};
use crate::error::ConfigError;
use crate::random::{uniform, unit_vec};
use rand::Rng;

/// Weight of the worst spider, so no weight is ever zero.
const WEIGHT_FLOOR: f64 = 0.001;

/// Social Spider Optimization (SSpiderO).
///
/// The colony is split once into females and males. Each epoch:
///
/// 1. females are attracted to (or repelled from) the nearest heavier
///    spider and the global best, depending on an epoch-decaying threshold;
/// 2. dominant males (weight at or above the male median) approach the
///    nearest heavier female, the others approach the weighted centroid;
/// 3. dominant males mate with every female inside the mating radius;
/// 4. the best children replace parents index by index where they are
///    better.
///
/// Movement repairs by resampling out-of-range components. Costs
/// `n_females + n_males + children` evaluations per epoch; when no couple
/// forms, `pop_size` random children are drawn instead.
///
/// Survival pairs the sorted children with the parents in colony order
/// rather than by rank, so a good child can lose to a strong parent that
/// happens to share its index.
///
/// All females move against the colony as it stood at the start of the
/// phase, so one female's new position is not seen by the next. Males then
/// move against the moved females with their previous weights.
///
/// # References
///
/// Cuevas, Cienfuegos, Zaldivar & Perez-Cisneros (2013), "A swarm
/// optimization algorithm inspired in the behavior of the social-spider",
/// *Expert Systems with Applications* 40(16), 6374-6384
#[derive(Debug, Clone, Default)]
pub struct SocialSpider {
    config: SocialSpiderConfig,
}

impl SocialSpider {
    pub fn new(config: SocialSpiderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SocialSpiderConfig {
        &self.config
    }

    fn move_females<R: Rng>(&self, colony: &Colony, p_m: f64, ctx: &EvolveContext<'_>, rng: &mut R) -> Vec<Spider> {
        let scale = ctx.bounds.range().iter().sum::<f64>();
        let best = &ctx.global_best.position;
        let best_weight = global_best_weight(colony, ctx);
        let n_dims = ctx.n_dims();

        let positions: Vec<Vec<f64>> = colony
            .females
            .iter()
            .map(|female| {
                let x = &female.agent.position;
                let nearest = nearest_heavier(x, female.weight, colony.spiders(), scale);
                let local = nearest.map(|(spider, dist)| {
                    let vibs = 2.0 * spider.weight * (-(rng.random::<f64>() * dist * dist)).exp();
                    (vibs, &spider.agent.position)
                });
                let dist_best = distance(best, x) / scale;
                let vibb = 2.0 * best_weight * (-(rng.random::<f64>() * dist_best * dist_best)).exp();
                let beta = unit_vec(rng, n_dims);
                let gamma = unit_vec(rng, n_dims);
                let noise = jitter(rng, n_dims, p_m);
                let sign = if rng.random::<f64>() >= p_m { 1.0 } else { -1.0 };

                let position = (0..n_dims)
                    .map(|d| {
                        let toward_local = match local {
                            Some((vibs, xs)) => vibs * (xs[d] - x[d]) * beta[d],
                            None => 0.0,
                        };
                        let toward_best = vibb * (best[d] - x[d]) * gamma[d];
                        x[d] + sign * (toward_local + toward_best) + noise[d]
                    })
                    .collect();
                RepairPolicy::Random.repair(ctx.bounds, position, rng)
            })
            .collect();

        reevaluate(ctx, &colony.females, positions)
    }

    fn move_males<R: Rng>(
        &self,
        colony: &Colony,
        females: &[Spider],
        p_m: f64,
        ctx: &EvolveContext<'_>,
        rng: &mut R,
    ) -> Vec<Spider> {
        let scale = ctx.bounds.range().iter().sum::<f64>();
        let n_dims = ctx.n_dims();
        let median = median(colony.males.iter().map(|s| s.weight));
        let centroid = weighted_centroid(females.iter().chain(colony.males.iter()));

        let positions: Vec<Vec<f64>> = colony
            .males
            .iter()
            .map(|male| {
                let x = &male.agent.position;
                let delta: Vec<f64> = unit_vec(rng, n_dims).into_iter().map(|u| 2.0 * u - 0.5).collect();
                let noise = jitter(rng, n_dims, p_m);

                let position: Vec<f64> = if male.weight >= median {
                    match nearest_heavier(x, male.weight, females.iter(), scale) {
                        Some((female, dist)) => {
                            let vibs = 2.0 * female.weight * (-(rng.random::<f64>() * dist * dist)).exp();
                            (0..n_dims)
                                .map(|d| x[d] + vibs * (female.agent.position[d] - x[d]) * delta[d] + noise[d])
                                .collect()
                        }
                        None => (0..n_dims).map(|d| x[d] + noise[d]).collect(),
                    }
                } else {
                    (0..n_dims)
                        .map(|d| x[d] + delta[d] * (centroid[d] - x[d]) + noise[d])
                        .collect()
                };
                RepairPolicy::Random.repair(ctx.bounds, position, rng)
            })
            .collect();

        reevaluate(ctx, &colony.males, positions)
    }

    /// Children of every dominant male with every female in range.
    fn mate<R: Rng>(&self, colony: &[Spider], n_females: usize, ctx: &EvolveContext<'_>, rng: &mut R) -> Vec<Agent> {
        let (females, males) = colony.split_at(n_females);
        let median = median(males.iter().map(|s| s.weight));
        let radius = colony
            .iter()
            .map(|s| {
                let p = &s.agent.position;
                let hi = p.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                let lo = p.iter().copied().fold(f64::INFINITY, f64::min);
                hi - lo
            })
            .sum::<f64>()
            / (2.0 * ctx.n_dims() as f64);

        let mut children = Vec::new();
        for male in males.iter().filter(|m| m.weight > median) {
            for female in females {
                if distance(&male.agent.position, &female.agent.position) < radius {
                    let (a, b) = recombine(
                        self.config.recombination,
                        &male.agent.position,
                        &female.agent.position,
                        rng,
                    );
                    children.push(ctx.bounds.clip(a));
                    children.push(ctx.bounds.clip(b));
                }
            }
        }

        if children.is_empty() {
            tracing::trace!(radius, "no couple in mating radius, drawing random children");
            children = (0..colony.len()).map(|_| ctx.bounds.sample(rng)).collect();
        }
        ctx.evaluator.evaluate_agents(children)
    }
}

impl Evolve for SocialSpider {
    type State = Colony;

    fn name(&self) -> &'static str {
        "SocialSpider"
    }

    fn validate(&self, config: &OptimizerConfig) -> Result<(), ConfigError> {
        self.config.validate(config.pop_size)
    }

    fn initialize<R: Rng>(&self, population: Vec<Agent>, ctx: &EvolveContext<'_>, rng: &mut R) -> Colony {
        let fp = uniform(rng, self.config.fp_min, self.config.fp_max);
        let n_females = SocialSpiderConfig::n_females(population.len(), fp);
        let mut spiders: Vec<Spider> = population.into_iter().map(Spider::new).collect();
        recalculate_weights(ctx.direction, &mut spiders, rng);
        let males = spiders.split_off(n_females);
        Colony {
            females: spiders,
            males,
            fp,
        }
    }

    fn evolve<R: Rng>(&self, colony: &Colony, epoch: usize, ctx: &EvolveContext<'_>, rng: &mut R) -> Colony {
        let p_m = ctx.epochs.saturating_sub(epoch) as f64 / (ctx.epochs + 1) as f64;

        let females = self.move_females(colony, p_m, ctx, rng);
        let males = self.move_males(colony, &females, p_m, ctx, rng);
        let n_females = females.len();

        let mut spiders: Vec<Spider> = females.into_iter().chain(males).collect();
        recalculate_weights(ctx.direction, &mut spiders, rng);
        let children = self.mate(&spiders, n_females, ctx, rng);
        let mut spiders = survive(ctx.direction, spiders, children);
        recalculate_weights(ctx.direction, &mut spiders, rng);

        let males = spiders.split_off(n_females);
        Colony {
            females: spiders,
            males,
            fp: colony.fp,
        }
    }

    fn population(colony: &Colony) -> Vec<&Agent> {
        colony.spiders().map(|s| &s.agent).collect()
    }
}

/// Normalizes fitness into weights `0.001 + (f - worst) / (best - worst)`.
///
/// Penalized spiders get the floor weight. When every finite target is
/// equal, or none is finite, each spider gets a random weight in
/// `[0.2, 0.8]`.
fn recalculate_weights<R: Rng>(direction: Direction, spiders: &mut [Spider], rng: &mut R) {
    match special_fitness(direction, spiders) {
        Some(summary) if summary.best != summary.worst => {
            let span = summary.best - summary.worst;
            for spider in spiders.iter_mut() {
                let target = spider.agent.target();
                spider.weight = if target.is_finite() {
                    WEIGHT_FLOOR + (target - summary.worst) / span
                } else {
                    WEIGHT_FLOOR
                };
            }
        }
        _ => {
            for spider in spiders.iter_mut() {
                spider.weight = uniform(rng, 0.2, 0.8);
            }
        }
    }
}

/// Weight the global best would have in the current colony.
fn global_best_weight(colony: &Colony, ctx: &EvolveContext<'_>) -> f64 {
    let spiders: Vec<&Spider> = colony.spiders().collect();
    let target = ctx.global_best.target();
    match special_fitness(ctx.direction, &spiders) {
        Some(summary) if summary.best != summary.worst && target.is_finite() => {
            WEIGHT_FLOOR + (target - summary.worst) / (summary.best - summary.worst)
        }
        _ => spiders.iter().map(|s| s.weight).fold(WEIGHT_FLOOR, f64::max),
    }
}

/// Closest spider strictly heavier than `weight`, with its distance
/// normalized by `scale`. Spiders at distance zero are skipped.
fn nearest_heavier<'a, I>(x: &[f64], weight: f64, spiders: I, scale: f64) -> Option<(&'a Spider, f64)>
where
    I: IntoIterator<Item = &'a Spider>,
{
    let mut nearest = None;
    let mut best = f64::INFINITY;
    for spider in spiders {
        if spider.weight > weight {
            let dist = distance(&spider.agent.position, x) / scale;
            if dist < best && dist != 0.0 {
                best = dist;
                nearest = Some(spider);
            }
        }
    }
    nearest.map(|s| (s, best))
}

/// Weight-weighted mean position; the plain mean when all weights are zero.
fn weighted_centroid<'a, I>(spiders: I) -> Vec<f64>
where
    I: IntoIterator<Item = &'a Spider> + Clone,
{
    let total: f64 = spiders.clone().into_iter().map(|s| s.weight).sum();
    if total == 0.0 {
        return mean_position(spiders.into_iter().map(|s| s.agent.position.as_slice()));
    }
    let mut centroid: Vec<f64> = Vec::new();
    for spider in spiders {
        if centroid.is_empty() {
            centroid = vec![0.0; spider.agent.position.len()];
        }
        for (c, x) in centroid.iter_mut().zip(&spider.agent.position) {
            *c += spider.weight * x;
        }
    }
    centroid.iter_mut().for_each(|c| *c /= total);
    centroid
}

/// Median with the mean of the two middle values for even counts.
fn median<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    let mut values: Vec<f64> = values.into_iter().collect();
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let n = values.len();
    if n % 2 == 1 {
        values[n / 2]
    } else {
        0.5 * (values[n / 2 - 1] + values[n / 2])
    }
}

/// `2 * p_m * (U - 0.5)` per dimension.
fn jitter<R: Rng>(rng: &mut R, n: usize, p_m: f64) -> Vec<f64> {
    unit_vec(rng, n).into_iter().map(|u| 2.0 * p_m * (u - 0.5)).collect()
}

/// Evaluates moved positions, keeping each spider's previous weight.
fn reevaluate(ctx: &EvolveContext<'_>, spiders: &[Spider], positions: Vec<Vec<f64>>) -> Vec<Spider> {
    ctx.evaluator
        .evaluate_agents(positions)
        .into_iter()
        .zip(spiders)
        .map(|(agent, old)| Spider {
            agent,
            weight: old.weight,
        })
        .collect()
}

fn recombine<R: Rng>(kind: Recombination, mom: &[f64], dad: &[f64], rng: &mut R) -> (Vec<f64>, Vec<f64>) {
    let n = mom.len();
    match kind {
        Recombination::TwoPoint if n >= 4 => {
            let half = n / 2;
            let start = rng.random_range(1..half);
            let block = start..start + half;
            let pick = |a: &[f64], b: &[f64]| -> Vec<f64> {
                (0..n).map(|d| if block.contains(&d) { b[d] } else { a[d] }).collect()
            };
            (pick(mom, dad), pick(dad, mom))
        }
        Recombination::TwoPoint | Recombination::OnePoint if n >= 2 => {
            let half = n / 2;
            let splice = |a: &[f64], b: &[f64]| -> Vec<f64> { a[..half].iter().chain(&b[half..]).copied().collect() };
            (splice(mom, dad), splice(dad, mom))
        }
        _ => {
            let r = uniform(rng, 0.5, 1.0);
            let blend = |a: &[f64], b: &[f64]| -> Vec<f64> {
                a.iter().zip(b).map(|(x, y)| r * x + (1.0 - r) * y).collect()
            };
            (blend(mom, dad), blend(dad, mom))
        }
    }
}

/// Replaces `colony[i]` with the `i`-th best child when the child is better.
fn survive(direction: Direction, mut colony: Vec<Spider>, children: Vec<Agent>) -> Vec<Spider> {
    let children = sorted_trim(direction, children, colony.len());
    for (spider, child) in colony.iter_mut().zip(children) {
        if compare(direction, &child, spider) {
            *spider = Spider::new(child);
        }
    }
    colony
}
