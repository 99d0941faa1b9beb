//! Per-epoch run history.

use super::agent::Agent;
use super::diagnostics::ExplorationPolicy;
use serde::{Deserialize, Serialize};

/// Append-only series, one entry per executed epoch.
///
/// Consumed by external charting/reporting: convergence (global and
/// current best), runtime, exploration/exploitation, diversity, and
/// optional population snapshots for trajectory plots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    /// Global-best target after each epoch.
    #[serde(with = "crate::engine::float_serde::seq")]
    pub global_best_fitness: Vec<f64>,
    /// Best target within the population of each epoch.
    #[serde(with = "crate::engine::float_serde::seq")]
    pub current_best_fitness: Vec<f64>,
    /// Wall time of each epoch in seconds.
    pub epoch_time: Vec<f64>,
    pub exploration: Vec<f64>,
    pub exploitation: Vec<f64>,
    pub diversity: Vec<f64>,
    /// Objective evaluations consumed by each epoch.
    pub evaluations: Vec<usize>,
    pub global_best: Vec<Agent>,
    pub current_best: Vec<Agent>,
    /// Full populations, only filled when snapshots are enabled.
    pub snapshots: Vec<Vec<Agent>>,
    max_diversity: f64,
}

/// What one epoch contributes to the history.
#[derive(Debug, Clone)]
pub(crate) struct EpochRecord {
    pub global_best: Agent,
    pub current_best: Agent,
    pub epoch_time: f64,
    pub diversity: f64,
    pub evaluations: usize,
    pub snapshot: Option<Vec<Agent>>,
}

impl History {
    pub fn len(&self) -> usize {
        self.global_best_fitness.len()
    }

    pub fn is_empty(&self) -> bool {
        self.global_best_fitness.is_empty()
    }

    pub(crate) fn record(&mut self, record: EpochRecord, policy: &dyn ExplorationPolicy) {
        self.max_diversity = self.max_diversity.max(record.diversity);
        let (exploration, exploitation) = policy.split(record.diversity, self.max_diversity);

        self.global_best_fitness.push(record.global_best.target());
        self.current_best_fitness.push(record.current_best.target());
        self.epoch_time.push(record.epoch_time);
        self.exploration.push(exploration);
        self.exploitation.push(exploitation);
        self.diversity.push(record.diversity);
        self.evaluations.push(record.evaluations);
        self.global_best.push(record.global_best);
        self.current_best.push(record.current_best);
        if let Some(snapshot) = record.snapshot {
            self.snapshots.push(snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::diagnostics::DiversityRatio;
    use crate::engine::fitness::Fitness;

    fn record(target: f64, diversity: f64) -> EpochRecord {
        let agent = Agent::new(vec![0.0], Fitness::single(target));
        EpochRecord {
            global_best: agent.clone(),
            current_best: agent,
            epoch_time: 0.01,
            diversity,
            evaluations: 10,
            snapshot: None,
        }
    }

    #[test]
    fn test_record_appends_every_series() {
        let mut history = History::default();
        history.record(record(3.0, 0.4), &DiversityRatio);
        history.record(record(2.0, 0.2), &DiversityRatio);

        assert_eq!(history.len(), 2);
        assert_eq!(history.global_best_fitness, vec![3.0, 2.0]);
        assert_eq!(history.exploration, vec![100.0, 50.0]);
        assert_eq!(history.exploitation, vec![0.0, 50.0]);
        assert_eq!(history.evaluations, vec![10, 10]);
        assert!(history.snapshots.is_empty());
    }
}
