//! Team state for the improved TLO.

use crate::engine::selection::global_best;
use crate::engine::{Agent, Direction};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// The class of an [`ImprovedTlo`](super::ImprovedTlo) run.
///
/// `teams[t]` is led by `teachers[t]`. Every team has the same number of
/// students for the whole run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classroom {
    pub teachers: Vec<Agent>,
    pub teams: Vec<Vec<Agent>>,
}

impl Classroom {
    /// Ranks the population, takes the best `n_teachers` as teachers and
    /// deals the rest into teams of `students_per_team` at random.
    ///
    /// Students beyond `n_teachers * students_per_team` are discarded.
    pub fn classify<R: Rng>(
        direction: Direction,
        population: Vec<Agent>,
        n_teachers: usize,
        students_per_team: usize,
        rng: &mut R,
    ) -> Self {
        let (mut sorted, _) = global_best(direction, population);
        let students = sorted.split_off(n_teachers.min(sorted.len()));
        let teachers = sorted;

        let mut order: Vec<usize> = (0..students.len()).collect();
        order.shuffle(rng);
        let teams = (0..teachers.len())
            .map(|t| {
                order[t * students_per_team..(t + 1) * students_per_team]
                    .iter()
                    .map(|&i| students[i].clone())
                    .collect()
            })
            .collect();
        Self { teachers, teams }
    }

    /// Teachers first, then each team in order.
    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.teachers.iter().chain(self.teams.iter().flatten())
    }

    pub fn len(&self) -> usize {
        self.teachers.len() + self.teams.iter().map(Vec::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Fitness;
    use crate::random::create_rng;

    fn population(n: usize) -> Vec<Agent> {
        (0..n)
            .map(|i| Agent::new(vec![i as f64], Fitness::single(i as f64)))
            .collect()
    }

    #[test]
    fn test_classify_picks_best_as_teachers() {
        let mut rng = create_rng(1);
        let class = Classroom::classify(Direction::Minimize, population(11), 3, 2, &mut rng);
        let teachers: Vec<f64> = class.teachers.iter().map(|a| a.target()).collect();
        assert_eq!(teachers, vec![0.0, 1.0, 2.0]);
        assert!(class.teams.iter().all(|team| team.len() == 2));
        assert_eq!(class.len(), 9);
        assert!(class.teams.iter().flatten().all(|a| a.target() >= 3.0));
    }

    #[test]
    fn test_classify_maximize() {
        let mut rng = create_rng(2);
        let class = Classroom::classify(Direction::Maximize, population(8), 2, 3, &mut rng);
        let teachers: Vec<f64> = class.teachers.iter().map(|a| a.target()).collect();
        assert_eq!(teachers, vec![7.0, 6.0]);
        assert_eq!(class.agents().count(), 8);
    }
}
