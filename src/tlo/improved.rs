//! Improved TLO with teams.

use super::config::ItloConfig;
use super::types::Classroom;
use crate::engine::selection::{compare, global_best, greedy_selection, random_partner};
use crate::engine::{mean_position, Agent, Evolve, EvolveContext, OptimizerConfig};
use crate::error::ConfigError;
use rand::Rng;

/// Improved Teaching-Learning-based Optimization (ITLO).
///
/// The class is split into teams, each led by its own teacher. Per epoch:
///
/// 1. every student moves toward its teacher, scaled by a skill ratio, and
///    relative to a random other team's teacher: toward it when the
///    student's own teacher is the better of the two, away from it
///    otherwise;
/// 2. every student learns from a random teammate and is pulled toward its
///    teacher by a random exchange factor in {1, 2};
/// 3. each teacher rejoins its team and the team's best becomes its teacher.
///
/// Both student phases clip to the box and keep improvements only. The run
/// involves `n_teachers * (1 + students_per_team)` agents; see
/// [`ItloConfig`].
#[derive(Debug, Clone, Default)]
pub struct ImprovedTlo {
    config: ItloConfig,
}

impl ImprovedTlo {
    pub fn new(config: ItloConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ItloConfig {
        &self.config
    }

    /// Phase 1: teacher-led moves.
    fn teach<R: Rng>(&self, class: &Classroom, ctx: &EvolveContext<'_>, rng: &mut R) -> Vec<Vec<Agent>> {
        self.teach_positions(class, ctx, rng)
            .into_iter()
            .zip(&class.teams)
            .map(|(positions, team)| {
                let candidates = ctx.evaluator.evaluate_agents(positions);
                greedy_selection(ctx.direction, team.clone(), candidates)
            })
            .collect()
    }

    /// Candidate positions of phase 1, one list per team.
    fn teach_positions<R: Rng>(&self, class: &Classroom, ctx: &EvolveContext<'_>, rng: &mut R) -> Vec<Vec<Vec<f64>>> {
        let n_teachers = class.teachers.len();
        class
            .teams
            .iter()
            .enumerate()
            .map(|(t, team)| {
                let teacher = &class.teachers[t];
                let mean = mean_position(team.iter().map(|a| a.position.as_slice()));
                team.iter()
                    .map(|student| {
                        let factor = skill_ratio(student, teacher);
                        let r = rng.random::<f64>();
                        let mut position: Vec<f64> = student
                            .position
                            .iter()
                            .zip(&teacher.position)
                            .zip(&mean)
                            .map(|((x, tp), m)| x + r * (tp - factor * m))
                            .collect();

                        if n_teachers > 1 {
                            let other = &class.teachers[random_partner(n_teachers, t, rng)];
                            let r = rng.random::<f64>();
                            let toward = compare(ctx.direction, teacher, other);
                            for ((p, x), o) in position.iter_mut().zip(&student.position).zip(&other.position) {
                                *p += if toward { r * (o - x) } else { r * (x - o) };
                            }
                        }
                        ctx.bounds.clip(position)
                    })
                    .collect()
            })
            .collect()
    }

    /// Phase 2: peer learning inside each team.
    fn learn<R: Rng>(
        &self,
        teachers: &[Agent],
        teams: Vec<Vec<Agent>>,
        ctx: &EvolveContext<'_>,
        rng: &mut R,
    ) -> Vec<Vec<Agent>> {
        teams
            .into_iter()
            .zip(teachers)
            .map(|(team, teacher)| {
                let exchange = (1.0 + rng.random::<f64>()).round();
                let positions: Vec<Vec<f64>> = (0..team.len())
                    .map(|s| {
                        let student = &team[s];
                        let peer = &team[random_partner(team.len(), s, rng)];
                        let r1 = rng.random::<f64>();
                        let r2 = rng.random::<f64>();
                        let student_better = compare(ctx.direction, student, peer);
                        let position = student
                            .position
                            .iter()
                            .zip(&peer.position)
                            .zip(&teacher.position)
                            .map(|((x, p), tp)| {
                                if student_better {
                                    x + r1 * (x - p) + r2 * (tp - exchange * p)
                                } else {
                                    x + r1 * (p - x) + r2 * (tp - exchange * x)
                                }
                            })
                            .collect();
                        ctx.bounds.clip(position)
                    })
                    .collect();
                let candidates = ctx.evaluator.evaluate_agents(positions);
                greedy_selection(ctx.direction, team, candidates)
            })
            .collect()
    }
}

impl Evolve for ImprovedTlo {
    type State = Classroom;

    fn name(&self) -> &'static str {
        "ITLO"
    }

    fn validate(&self, config: &OptimizerConfig) -> Result<(), ConfigError> {
        self.config.validate(config.pop_size)
    }

    fn initialize<R: Rng>(&self, population: Vec<Agent>, ctx: &EvolveContext<'_>, rng: &mut R) -> Classroom {
        let students_per_team = self.config.students_per_team(population.len());
        Classroom::classify(
            ctx.direction,
            population,
            self.config.n_teachers,
            students_per_team,
            rng,
        )
    }

    fn evolve<R: Rng>(&self, class: &Classroom, _epoch: usize, ctx: &EvolveContext<'_>, rng: &mut R) -> Classroom {
        let teams = self.teach(class, ctx, rng);
        let teams = self.learn(&class.teachers, teams, ctx, rng);

        let (teachers, teams): (Vec<Agent>, Vec<Vec<Agent>>) = class
            .teachers
            .iter()
            .cloned()
            .zip(teams)
            .map(|(teacher, mut team)| {
                team.push(teacher);
                let (mut sorted, _) = global_best(ctx.direction, team);
                let rest = sorted.split_off(1);
                (sorted.remove(0), rest)
            })
            .unzip();
        Classroom { teachers, teams }
    }

    fn population(class: &Classroom) -> Vec<&Agent> {
        class.agents().collect()
    }
}

/// `student / teacher` target ratio, 1 when it is undefined.
fn skill_ratio(student: &Agent, teacher: &Agent) -> f64 {
    if teacher.target() == 0.0 {
        return 1.0;
    }
    let ratio = student.target() / teacher.target();
    if ratio.is_finite() {
        ratio
    } else {
        1.0
    }
}
