//! Seeded random sources.
//!
//! Every run owns a single `u64` seed. Initialization draws from
//! [`create_rng`]`(seed)`, and each epoch draws from its own stream
//! [`epoch_rng`]`(seed, epoch)`. Because an epoch's stream depends only on
//! the seed and the epoch index, a run resumed from a checkpoint replays
//! exactly the draws an uninterrupted run would have made.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Creates a deterministic RNG from a seed.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Creates the RNG stream used by epoch `epoch` of a run seeded with `seed`.
pub fn epoch_rng(seed: u64, epoch: usize) -> StdRng {
    let offset = (epoch as u64).wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    StdRng::seed_from_u64(splitmix64(seed ^ offset))
}

/// SplitMix64 finalizer (Steele et al., 2014).
fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Uniform sample in `[lo, hi]`. Returns `lo` when the interval is empty.
pub fn uniform<R: Rng>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    let x = lo + (hi - lo) * rng.random::<f64>();
    if hi > lo {
        x.min(hi)
    } else {
        lo
    }
}

/// `n` independent uniform samples in `[0, 1)`.
pub fn unit_vec<R: Rng>(rng: &mut R, n: usize) -> Vec<f64> {
    (0..n).map(|_| rng.random::<f64>()).collect()
}

/// One uniform sample per dimension, `x[i]` in `[lb[i], ub[i])`.
pub fn uniform_vec<R: Rng>(rng: &mut R, lb: &[f64], ub: &[f64]) -> Vec<f64> {
    lb.iter()
        .zip(ub.iter())
        .map(|(&lo, &hi)| uniform(rng, lo, hi))
        .collect()
}
