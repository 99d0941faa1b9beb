//! Algorithm-agnostic population engine.
//!
//! Everything the individual algorithms share: the problem definition,
//! bounds and repair, fitness evaluation, the single comparator and the
//! selection routines built on it, run diagnostics, and the epoch loop.
//!
//! # Key Types
//!
//! - [`Problem`]: Bounds, direction and optional objective weights
//! - [`Objective`]: The user function, implemented for closures
//! - [`FitnessEvaluator`]: Weighting, penalties and evaluation counting
//! - [`Optimizer`]: Runs an [`Evolve`] algorithm epoch by epoch
//! - [`Checkpoint`]: A serializable paused run
//! - [`History`]: Per-epoch convergence and diversity series
//!
//! # Submodules
//!
//! - [`selection`]: Greedy, global-best, sorted-trim and partner sampling
//! - [`diagnostics`]: Pluggable diversity and exploration measures

mod agent;
mod bounds;
mod config;
pub mod diagnostics;
mod fitness;
pub(crate) mod float_serde;
mod history;
mod optimizer;
mod problem;
pub mod selection;

pub use agent::{distance, mean_position, Agent, AsAgent};
pub use bounds::{Bounds, RepairPolicy};
pub use config::OptimizerConfig;
pub use fitness::{Fitness, FitnessEvaluator};
pub use history::History;
pub use optimizer::{Checkpoint, Evolve, EvolveContext, OptimizationResult, Optimizer};
pub use problem::{Direction, Objective, ObjectiveValue, Problem};
