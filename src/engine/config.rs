//! Run-loop configuration.
//!
//! [`OptimizerConfig`] holds the parameters every algorithm shares.
//! Algorithm-specific parameters live in each algorithm's own config.

use crate::error::ConfigError;

/// Configuration of the epoch loop.
///
/// # Defaults
///
/// ```
/// use u_swarm::engine::OptimizerConfig;
///
/// let config = OptimizerConfig::default();
/// assert_eq!(config.epochs, 1000);
/// assert_eq!(config.pop_size, 100);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_swarm::engine::OptimizerConfig;
///
/// let config = OptimizerConfig::default()
///     .with_epochs(50)
///     .with_pop_size(20)
///     .with_seed(42)
///     .with_snapshots(true);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct OptimizerConfig {
    /// Number of epochs to run. There is no early stop.
    pub epochs: usize,

    /// Number of agents, fixed for the whole run.
    pub pop_size: usize,

    /// Random seed for reproducibility.
    ///
    /// `None` draws a seed once per run; it is reported in the result.
    pub seed: Option<u64>,

    /// Whether to evaluate batches of positions in parallel using rayon.
    ///
    /// Results are identical either way; only wall time changes.
    pub parallel: bool,

    /// Whether to keep a full copy of the population after every epoch.
    pub keep_snapshots: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            epochs: 1000,
            pop_size: 100,
            seed: None,
            parallel: false,
            keep_snapshots: false,
        }
    }
}

impl OptimizerConfig {
    pub fn with_epochs(mut self, n: usize) -> Self {
        self.epochs = n;
        self
    }

    pub fn with_pop_size(mut self, n: usize) -> Self {
        self.pop_size = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_snapshots(mut self, keep: bool) -> Self {
        self.keep_snapshots = keep;
        self
    }

    /// Validates the configuration.
    ///
    /// Algorithms add their own lower bounds on `pop_size` on top of this.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.epochs == 0 {
            return Err(ConfigError::ZeroEpochs);
        }
        if self.pop_size < 2 {
            return Err(ConfigError::population("optimizer", 2, self.pop_size));
        }
        Ok(())
    }
}
