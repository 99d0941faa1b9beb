//! Box constraints and boundary repair.

use crate::error::ConfigError;
use crate::random::{uniform, uniform_vec};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A validated search box `lb[i] < ub[i]` for every dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    lb: Vec<f64>,
    ub: Vec<f64>,
}

impl Bounds {
    pub fn new(lb: Vec<f64>, ub: Vec<f64>) -> Result<Self, ConfigError> {
        if lb.len() != ub.len() {
            return Err(ConfigError::BoundsLength {
                lb: lb.len(),
                ub: ub.len(),
            });
        }
        if lb.is_empty() {
            return Err(ConfigError::EmptyBounds);
        }
        for (dim, (&lo, &hi)) in lb.iter().zip(ub.iter()).enumerate() {
            if !lo.is_finite() || !hi.is_finite() || lo >= hi {
                return Err(ConfigError::BoundsOrder { dim, lb: lo, ub: hi });
            }
        }
        Ok(Self { lb, ub })
    }

    pub fn lb(&self) -> &[f64] {
        &self.lb
    }

    pub fn ub(&self) -> &[f64] {
        &self.ub
    }

    pub fn n_dims(&self) -> usize {
        self.lb.len()
    }

    /// Per-dimension width `ub[i] - lb[i]`.
    pub fn range(&self) -> Vec<f64> {
        self.lb
            .iter()
            .zip(self.ub.iter())
            .map(|(lo, hi)| hi - lo)
            .collect()
    }

    /// Length of the box diagonal.
    pub fn diagonal(&self) -> f64 {
        self.range().iter().map(|r| r * r).sum::<f64>().sqrt()
    }

    /// Samples a position uniformly inside the box.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Vec<f64> {
        uniform_vec(rng, &self.lb, &self.ub)
    }

    pub fn contains(&self, position: &[f64]) -> bool {
        position.len() == self.n_dims()
            && position
                .iter()
                .zip(self.lb.iter().zip(self.ub.iter()))
                .all(|(x, (lo, hi))| lo <= x && x <= hi)
    }

    /// Element-wise clamp into the box. A NaN component lands on the midpoint.
    pub fn clip(&self, mut position: Vec<f64>) -> Vec<f64> {
        for (x, (&lo, &hi)) in position.iter_mut().zip(self.lb.iter().zip(self.ub.iter())) {
            *x = if x.is_nan() {
                lo + 0.5 * (hi - lo)
            } else {
                x.clamp(lo, hi)
            };
        }
        position
    }
}

/// How an out-of-box position is brought back into the box.
///
/// Both policies are idempotent: repairing a repaired position is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RepairPolicy {
    /// Clamp each component to `[lb[i], ub[i]]`.
    #[default]
    Clip,

    /// Resample each out-of-range component uniformly in `[lb[i], ub[i]]`.
    ///
    /// In-range components are left untouched. Avoids piling agents up on
    /// the box faces.
    Random,
}

impl RepairPolicy {
    pub fn repair<R: Rng>(self, bounds: &Bounds, position: Vec<f64>, rng: &mut R) -> Vec<f64> {
        match self {
            RepairPolicy::Clip => bounds.clip(position),
            RepairPolicy::Random => {
                let mut position = position;
                for (x, (&lo, &hi)) in position
                    .iter_mut()
                    .zip(bounds.lb.iter().zip(bounds.ub.iter()))
                {
                    if !(lo <= *x && *x <= hi) {
                        *x = uniform(rng, lo, hi);
                    }
                }
                position
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use proptest::prelude::*;

    fn unit_box(n: usize) -> Bounds {
        Bounds::new(vec![-1.0; n], vec![1.0; n]).unwrap()
    }

    #[test]
    fn test_new_rejects_mismatched_lengths() {
        assert_eq!(
            Bounds::new(vec![0.0; 2], vec![1.0; 3]),
            Err(ConfigError::BoundsLength { lb: 2, ub: 3 })
        );
    }

    #[test]
    fn test_new_rejects_empty() {
        assert_eq!(Bounds::new(vec![], vec![]), Err(ConfigError::EmptyBounds));
    }

    #[test]
    fn test_new_rejects_inverted() {
        let err = Bounds::new(vec![0.0, 2.0], vec![1.0, 2.0]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::BoundsOrder {
                dim: 1,
                lb: 2.0,
                ub: 2.0
            }
        );
    }

    #[test]
    fn test_clip() {
        let bounds = unit_box(3);
        assert_eq!(bounds.clip(vec![-5.0, 0.3, 9.0]), vec![-1.0, 0.3, 1.0]);
    }

    #[test]
    fn test_clip_nan_goes_to_midpoint() {
        let bounds = Bounds::new(vec![0.0], vec![4.0]).unwrap();
        assert_eq!(bounds.clip(vec![f64::NAN]), vec![2.0]);
    }

    #[test]
    fn test_random_repair_keeps_in_range_components() {
        let bounds = unit_box(3);
        let mut rng = create_rng(5);
        let repaired = RepairPolicy::Random.repair(&bounds, vec![0.25, 7.0, -0.5], &mut rng);
        assert_eq!(repaired[0], 0.25);
        assert_eq!(repaired[2], -0.5);
        assert!((-1.0..=1.0).contains(&repaired[1]));
    }

    #[test]
    fn test_diagonal() {
        let bounds = Bounds::new(vec![0.0, 0.0], vec![3.0, 4.0]).unwrap();
        assert!((bounds.diagonal() - 5.0).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn prop_repair_lands_in_box(
            xs in proptest::collection::vec(-1e6f64..1e6, 5),
            seed in any::<u64>(),
            random in any::<bool>(),
        ) {
            let bounds = Bounds::new(
                vec![-3.0, 0.0, -10.0, 5.0, -0.5],
                vec![3.0, 1.0, -2.0, 6.0, 0.5],
            ).unwrap();
            let policy = if random { RepairPolicy::Random } else { RepairPolicy::Clip };
            let mut rng = create_rng(seed);
            let repaired = policy.repair(&bounds, xs, &mut rng);
            prop_assert!(bounds.contains(&repaired));
        }

        #[test]
        fn prop_repair_is_idempotent(
            xs in proptest::collection::vec(-100f64..100.0, 4),
            seed in any::<u64>(),
            random in any::<bool>(),
        ) {
            let bounds = unit_box(4);
            let policy = if random { RepairPolicy::Random } else { RepairPolicy::Clip };
            let mut rng = create_rng(seed);
            let once = policy.repair(&bounds, xs, &mut rng);
            let twice = policy.repair(&bounds, once.clone(), &mut rng);
            prop_assert_eq!(once, twice);
        }
    }
}
