//! Population-based metaheuristics over bounded continuous search spaces.
//!
//! Every algorithm evolves a fixed-size population of candidate positions
//! toward the optimum of a user objective inside a box `lb <= x <= ub`:
//!
//! - **TLO**: Teaching-Learning-based Optimization, batched or sequential.
//! - **ITLO**: Improved TLO with one teacher per team.
//! - **SRSR**: Swarm Robotics Search And Rescue; a master robot leads
//!   slaves that sample around it, plus local-search workers.
//! - **Social Spider**: Females and males move by web vibrations; dominant
//!   males mate with nearby females.
//!
//! # Architecture
//!
//! The [`engine`] owns everything algorithms share: problem and bounds,
//! fitness evaluation with weighting and penalties, the single comparator
//! and selection routines, diagnostics, history and the epoch loop. Each
//! algorithm only implements [`engine::Evolve`], a step from one population
//! state to the next.
//!
//! ```
//! use u_swarm::engine::{Direction, Optimizer, OptimizerConfig, Problem};
//! use u_swarm::sspider::SocialSpider;
//!
//! let problem = Problem::new(vec![-10.0; 4], vec![10.0; 4], Direction::Minimize).unwrap();
//! let config = OptimizerConfig::default().with_epochs(30).with_pop_size(20).with_seed(7);
//! let optimizer = Optimizer::new(problem, SocialSpider::default(), config).unwrap();
//!
//! let result = optimizer.run(&|x: &[f64]| x.iter().map(|v| v * v).sum::<f64>()).unwrap();
//! assert_eq!(result.history.len(), 30);
//! assert!(result.best_position.iter().all(|x| (-10.0..=10.0).contains(x)));
//! ```
//!
//! Runs are reproducible from [`engine::OptimizerConfig::seed`] and can be
//! paused and resumed at epoch boundaries through [`engine::Checkpoint`].

pub mod engine;
pub mod error;
pub mod random;
pub mod srsr;
pub mod sspider;
pub mod tlo;
