//! Social Spider configuration.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// How a mating couple produces its two children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Recombination {
    /// `r * male + (1 - r) * female` and its mirror, `r ~ U(0.5, 1)`.
    #[default]
    Arithmetic,

    /// Swaps a middle block of half the dimensions at a random offset.
    ///
    /// Needs at least 4 dimensions; falls back to [`OnePoint`](Self::OnePoint)
    /// otherwise.
    TwoPoint,

    /// Swaps the second half of the dimensions.
    ///
    /// Needs at least 2 dimensions; falls back to
    /// [`Arithmetic`](Self::Arithmetic) otherwise.
    OnePoint,
}

/// Configuration for [`SocialSpider`](super::SocialSpider).
///
/// # Defaults
///
/// ```
/// use u_swarm::sspider::{Recombination, SocialSpiderConfig};
///
/// let config = SocialSpiderConfig::default();
/// assert_eq!((config.fp_min, config.fp_max), (0.65, 0.9));
/// assert_eq!(config.recombination, Recombination::Arithmetic);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_swarm::sspider::{Recombination, SocialSpiderConfig};
///
/// let config = SocialSpiderConfig::default()
///     .with_female_percent(0.5, 0.7)
///     .with_recombination(Recombination::TwoPoint);
/// assert!(config.validate(30).is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialSpiderConfig {
    /// Lower end of the female share drawn once per run.
    pub fp_min: f64,

    /// Upper end of the female share drawn once per run.
    pub fp_max: f64,

    pub recombination: Recombination,
}

impl Default for SocialSpiderConfig {
    fn default() -> Self {
        Self {
            fp_min: 0.65,
            fp_max: 0.9,
            recombination: Recombination::default(),
        }
    }
}

impl SocialSpiderConfig {
    /// Sets the female share range `[fp_min, fp_max]`.
    pub fn with_female_percent(mut self, fp_min: f64, fp_max: f64) -> Self {
        self.fp_min = fp_min;
        self.fp_max = fp_max;
        self
    }

    pub fn with_recombination(mut self, recombination: Recombination) -> Self {
        self.recombination = recombination;
        self
    }

    /// Number of females for a female share `fp`.
    ///
    /// Always leaves at least one spider of each sex.
    pub fn n_females(pop_size: usize, fp: f64) -> usize {
        let n = (pop_size as f64 * fp).round() as usize;
        n.clamp(1, pop_size.saturating_sub(1).max(1))
    }

    pub fn validate(&self, pop_size: usize) -> Result<(), ConfigError> {
        if pop_size < 2 {
            return Err(ConfigError::population("SocialSpider", 2, pop_size));
        }
        for (name, value) in [("fp_min", self.fp_min), ("fp_max", self.fp_max)] {
            if !(value > 0.0 && value < 1.0) {
                return Err(ConfigError::out_of_range(name, value, "(0, 1)"));
            }
        }
        if self.fp_min > self.fp_max {
            return Err(ConfigError::out_of_range("fp_min", self.fp_min, "(0, fp_max]"));
        }
        Ok(())
    }
}
