//! Robot records for SRSR.

use crate::engine::{Agent, AsAgent};
use serde::{Deserialize, Serialize};

/// One robot of the swarm.
///
/// `mu` and `sigma` are the normal distribution the robot sampled from in
/// the last accumulation phase; `improvement` is the gain of its last move
/// (positive when the move improved it).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Robot {
    pub agent: Agent,
    pub mu: Vec<f64>,
    pub sigma: Vec<f64>,
    #[serde(with = "crate::engine::float_serde")]
    pub improvement: f64,
}

impl Robot {
    pub fn new(agent: Agent) -> Self {
        let n = agent.position.len();
        Self {
            agent,
            mu: vec![0.0; n],
            sigma: vec![0.0; n],
            improvement: 0.0,
        }
    }
}

impl AsAgent for Robot {
    fn agent(&self) -> &Agent {
        &self.agent
    }
}

/// Swarm state carried between epochs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Swarm {
    /// Sorted best first; `robots[0]` is the master.
    pub robots: Vec<Robot>,

    /// Sigma improvement factor for the next accumulation phase.
    pub sif: f64,
}

impl Swarm {
    pub fn master(&self) -> &Robot {
        &self.robots[0]
    }
}
