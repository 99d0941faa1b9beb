//! Swarm Robotics Search And Rescue (SRSR).
//!
//! A master robot leads slave robots that sample around it, explore the
//! box, and spawn local-search workers near the master.
//!
//! # Key Types
//!
//! - [`Srsr`]: The algorithm
//! - [`SrsrConfig`]: Master dominance, initial SIF, exploration decay
//! - [`Swarm`]: Robots plus the self-tuned sigma improvement factor

mod config;
mod evolve;
mod types;

pub use config::SrsrConfig;
pub use evolve::Srsr;
pub use types::{Robot, Swarm};
