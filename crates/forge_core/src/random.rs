//! Random source for a generation pass.
//!
//! There is no ambient generator: every operation that needs randomness
//! takes an `&mut R where R: Rng`. A pass owns one [`ForgeRng`], seeded when
//! the settings carry a seed so runs can be reproduced.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// The generator type owned by a generation pass.
pub type ForgeRng = StdRng;

/// A generator that replays the same sequence for the same seed.
#[must_use]
pub fn seeded(seed: u64) -> ForgeRng {
    StdRng::seed_from_u64(seed)
}

/// Seeded when `seed` is given, otherwise drawn from the OS.
#[must_use]
pub fn from_seed_or_entropy(seed: Option<u64>) -> ForgeRng {
    match seed {
        Some(seed) => {
            log::debug!("Random source seeded with {seed}");
            seeded(seed)
        }
        None => StdRng::from_os_rng(),
    }
}

/// `base + U(-spread, spread)`. A zero spread returns `base` without drawing.
///
/// # Panics
///
/// Panics if `spread` is NaN or infinite.
pub fn jitter<R: Rng + ?Sized>(rng: &mut R, base: f32, spread: f32) -> f32 {
    if spread == 0.0 {
        return base;
    }
    let spread = spread.abs();
    base + rng.random_range(-spread..=spread)
}
