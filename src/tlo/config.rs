//! TLO configuration.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Which TLO update schedule to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TloVariant {
    /// Teach the whole population, evaluate the batch, then learn and
    /// evaluate the second batch.
    #[default]
    Base,

    /// Teach then learn one agent at a time, replacing it immediately.
    ///
    /// Later agents see the class mean and partners already updated by
    /// earlier ones.
    Original,
}

/// Configuration for [`Tlo`](super::Tlo).
///
/// ```
/// use u_swarm::tlo::{TloConfig, TloVariant};
///
/// let config = TloConfig::default().with_variant(TloVariant::Original);
/// assert_eq!(config.variant, TloVariant::Original);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TloConfig {
    pub variant: TloVariant,
}

impl TloConfig {
    pub fn with_variant(mut self, variant: TloVariant) -> Self {
        self.variant = variant;
        self
    }

    /// TLO needs a partner distinct from every learner.
    pub fn validate(&self, pop_size: usize) -> Result<(), ConfigError> {
        if pop_size < 2 {
            return Err(ConfigError::population("TLO", 2, pop_size));
        }
        Ok(())
    }
}

/// Configuration for [`ImprovedTlo`](super::ImprovedTlo).
///
/// The class is split into `n_teachers` teams of
/// `(pop_size - n_teachers) / n_teachers` students each. Students that do
/// not fit evenly are left out of every team for the rest of the run.
///
/// ```
/// use u_swarm::tlo::ItloConfig;
///
/// let config = ItloConfig::default();
/// assert_eq!(config.n_teachers, 5);
/// assert_eq!(config.students_per_team(100), 19);
/// assert!(config.validate(100).is_ok());
/// assert!(config.validate(5).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItloConfig {
    /// Number of teams, each led by one teacher.
    pub n_teachers: usize,
}

impl Default for ItloConfig {
    fn default() -> Self {
        Self { n_teachers: 5 }
    }
}

impl ItloConfig {
    pub fn with_n_teachers(mut self, n: usize) -> Self {
        self.n_teachers = n;
        self
    }

    pub fn students_per_team(&self, pop_size: usize) -> usize {
        if self.n_teachers == 0 {
            return 0;
        }
        pop_size.saturating_sub(self.n_teachers) / self.n_teachers
    }

    /// Number of agents that take part in the run.
    pub fn class_size(&self, pop_size: usize) -> usize {
        self.n_teachers * (1 + self.students_per_team(pop_size))
    }

    /// Every student needs an in-team partner, so teams hold at least two.
    pub fn validate(&self, pop_size: usize) -> Result<(), ConfigError> {
        if self.n_teachers == 0 || self.n_teachers >= pop_size {
            return Err(ConfigError::Teachers {
                n_teachers: self.n_teachers,
                pop_size,
            });
        }
        let students_per_team = self.students_per_team(pop_size);
        if students_per_team < 2 {
            return Err(ConfigError::TeamTooSmall { students_per_team });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tlo_default_variant() {
        assert_eq!(TloConfig::default().variant, TloVariant::Base);
    }

    #[test]
    fn test_teams_and_leftovers() {
        let config = ItloConfig::default().with_n_teachers(3);
        assert_eq!(config.students_per_team(20), 5);
        assert_eq!(config.class_size(20), 18);
    }

    #[test]
    fn test_teachers_must_be_fewer_than_population() {
        let config = ItloConfig::default().with_n_teachers(10);
        assert_eq!(
            config.validate(10),
            Err(ConfigError::Teachers {
                n_teachers: 10,
                pop_size: 10
            })
        );
        assert!(ItloConfig::default().with_n_teachers(0).validate(10).is_err());
    }

    #[test]
    fn test_team_too_small() {
        let config = ItloConfig::default().with_n_teachers(4);
        assert_eq!(
            config.validate(10),
            Err(ConfigError::TeamTooSmall {
                students_per_team: 1
            })
        );
        assert!(config.validate(12).is_ok());
    }
}
