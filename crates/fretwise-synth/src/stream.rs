//! Reproducible per-unit random streams.
//!
//! A batch run has one global seed. Each unit of work (one note, one sample
//! index) derives its own generator from that seed and its position, so the
//! output does not depend on scheduling or thread count.

use rand::SeedableRng;
use rand::rngs::StdRng;

/// SplitMix64 finalizer.
pub fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}

/// Seed for unit `unit` of a run seeded with `global_seed`.
pub fn unit_seed(global_seed: u64, unit: u64) -> u64 {
    splitmix64(global_seed.wrapping_add(splitmix64(unit)))
}

/// Independent generator for unit `unit` of a run seeded with `global_seed`.
pub fn unit_stream(global_seed: u64, unit: u64) -> StdRng {
    StdRng::seed_from_u64(unit_seed(global_seed, unit))
}
