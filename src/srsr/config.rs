//! SRSR configuration.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Local search replaces the five worst robots and compares against the
/// second best, so the swarm needs a master, a reference and five slots.
pub(crate) const MIN_POP_SIZE: usize = 6;

/// Configuration for [`Srsr`](super::Srsr).
///
/// Movement pace, sigma factor and sigma limit tune themselves during the
/// run; only the master's dominance is set by the user.
///
/// # Builder Pattern
///
/// ```
/// use u_swarm::srsr::SrsrConfig;
///
/// let config = SrsrConfig::default()
///     .with_mu_factor(0.5)
///     .with_movement_decay(false);
/// assert!(config.validate(20).is_ok());
/// assert!(config.validate(5).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SrsrConfig {
    /// Weight of the master's position in every slave's mean, in (0, 1).
    ///
    /// Preferably 2/3; typical range 0.1-0.9.
    pub mu_factor: f64,

    /// Sigma improvement factor used in the first epoch. Must be positive.
    pub initial_sif: f64,

    /// Shrinks the random exploration step linearly to zero over the run.
    ///
    /// When `false` the step keeps its full size, which mostly produces
    /// moves that get clipped to the box faces.
    pub movement_decay: bool,
}

impl Default for SrsrConfig {
    fn default() -> Self {
        Self {
            mu_factor: 2.0 / 3.0,
            initial_sif: 6.0,
            movement_decay: true,
        }
    }
}

impl SrsrConfig {
    pub fn with_mu_factor(mut self, mu_factor: f64) -> Self {
        self.mu_factor = mu_factor;
        self
    }

    pub fn with_initial_sif(mut self, sif: f64) -> Self {
        self.initial_sif = sif;
        self
    }

    pub fn with_movement_decay(mut self, decay: bool) -> Self {
        self.movement_decay = decay;
        self
    }

    pub fn validate(&self, pop_size: usize) -> Result<(), ConfigError> {
        if pop_size < MIN_POP_SIZE {
            return Err(ConfigError::population("SRSR", MIN_POP_SIZE, pop_size));
        }
        if !(self.mu_factor > 0.0 && self.mu_factor < 1.0) {
            return Err(ConfigError::out_of_range("mu_factor", self.mu_factor, "(0, 1)"));
        }
        if !(self.initial_sif.is_finite() && self.initial_sif > 0.0) {
            return Err(ConfigError::out_of_range("initial_sif", self.initial_sif, "(0, inf)"));
        }
        Ok(())
    }
}
