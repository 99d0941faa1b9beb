//! Spider records and the colony state.

use crate::engine::{Agent, AsAgent};
use serde::{Deserialize, Serialize};

/// One spider: an agent plus its normalized weight.
///
/// Weights are recomputed from fitness every epoch and are always
/// positive; heavier spiders are better.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spider {
    pub agent: Agent,
    pub weight: f64,
}

impl Spider {
    pub fn new(agent: Agent) -> Self {
        Self { agent, weight: 0.0 }
    }
}

impl AsAgent for Spider {
    fn agent(&self) -> &Agent {
        &self.agent
    }
}

/// The two sub-populations of a Social Spider run.
///
/// The split is decided at initialization and kept for the whole run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Colony {
    pub females: Vec<Spider>,
    pub males: Vec<Spider>,

    /// Female share drawn at initialization.
    pub fp: f64,
}

impl Colony {
    /// Females first, then males.
    pub fn spiders(&self) -> impl Iterator<Item = &Spider> {
        self.females.iter().chain(self.males.iter())
    }

    pub fn len(&self) -> usize {
        self.females.len() + self.males.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
