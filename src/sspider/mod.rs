//! Social Spider Optimization (SSpiderO).
//!
//! Spiders on a shared web communicate through vibrations whose strength
//! grows with the sender's weight and fades with distance. Females and
//! males follow different movement rules, and dominant males mate with
//! nearby females.
//!
//! # Key Types
//!
//! - [`SocialSpider`]: The algorithm
//! - [`SocialSpiderConfig`]: Female share range and recombination operator
//! - [`Colony`]: The persistent female/male split

mod config;
mod evolve;
mod types;

pub use config::{Recombination, SocialSpiderConfig};
pub use evolve::SocialSpider;
pub use types::{Colony, Spider};
