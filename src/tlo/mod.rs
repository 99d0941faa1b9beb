//! Teaching-Learning-based Optimization (TLO).
//!
//! Learners improve by following a teacher (the best agent) and by
//! learning from each other. No algorithm-specific control parameters
//! beyond the schedule.
//!
//! # Key Types
//!
//! - [`Tlo`]: Classic TLO, batched ([`TloVariant::Base`]) or sequential
//!   ([`TloVariant::Original`])
//! - [`ImprovedTlo`]: Team-based ITLO with one teacher per team
//!
//! # References
//!
//! - Rao, Savsani & Vakharia (2011), "Teaching-learning-based optimization:
//!   A novel method for constrained mechanical design optimization problems",
//!   *Computer-Aided Design* 43(3), 303-315
//! - Rao & Patel (2013), "An improved teaching-learning-based optimization
//!   algorithm for solving unconstrained optimization problems",
//!   *Scientia Iranica* 20(3), 710-720

mod config;
mod evolve;
mod improved;
mod types;

pub use config::{ItloConfig, TloConfig, TloVariant};
pub use evolve::Tlo;
pub use improved::ImprovedTlo;
pub use types::Classroom;
