//! Population spread diagnostics.
//!
//! Both measures are pluggable: the optimizer holds a boxed
//! [`DiversityMeasure`] and [`ExplorationPolicy`] and applies them to every
//! algorithm the same way.
//!
//! # References
//!
//! - Hussain et al. (2019), "On the exploration and exploitation in popular
//!   swarm-based metaheuristic algorithms", *Neural Computing and Applications*

use super::agent::{distance, mean_position};
use super::bounds::Bounds;

/// Scalar spread of a population.
pub trait DiversityMeasure: Send + Sync {
    fn measure(&self, positions: &[&[f64]], bounds: &Bounds) -> f64;
}

/// Mean Euclidean distance to the centroid, divided by the box diagonal.
///
/// 0 for a collapsed population; at most 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct CentroidDistance;

impl DiversityMeasure for CentroidDistance {
    fn measure(&self, positions: &[&[f64]], bounds: &Bounds) -> f64 {
        if positions.is_empty() {
            return 0.0;
        }
        let centroid = mean_position(positions.iter().copied());
        let mean = positions
            .iter()
            .map(|p| distance(p, &centroid))
            .sum::<f64>()
            / positions.len() as f64;
        mean / bounds.diagonal()
    }
}

/// Splits a diversity reading into exploration and exploitation percentages.
pub trait ExplorationPolicy: Send + Sync {
    /// Returns `(exploration, exploitation)` given this epoch's diversity and
    /// the largest diversity seen so far in the run.
    fn split(&self, diversity: f64, max_diversity: f64) -> (f64, f64);
}

/// `exploration = 100 * div / max_div`, `exploitation = 100 - exploration`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiversityRatio;

impl ExplorationPolicy for DiversityRatio {
    fn split(&self, diversity: f64, max_diversity: f64) -> (f64, f64) {
        if max_diversity <= 0.0 {
            return (0.0, 100.0);
        }
        let exploration = 100.0 * diversity / max_diversity;
        (exploration, 100.0 - exploration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapsed_population_has_zero_diversity() {
        let bounds = Bounds::new(vec![0.0; 2], vec![1.0; 2]).unwrap();
        let p = [0.5, 0.5];
        let positions = vec![&p[..]; 5];
        assert_eq!(CentroidDistance.measure(&positions, &bounds), 0.0);
    }

    #[test]
    fn test_corners_diversity() {
        let bounds = Bounds::new(vec![0.0; 2], vec![1.0; 2]).unwrap();
        let a = [0.0, 0.0];
        let b = [1.0, 1.0];
        let d = CentroidDistance.measure(&[&a[..], &b[..]], &bounds);
        assert!((d - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_diversity_ratio() {
        assert_eq!(DiversityRatio.split(0.25, 0.5), (50.0, 50.0));
        assert_eq!(DiversityRatio.split(0.0, 0.0), (0.0, 100.0));
    }
}
