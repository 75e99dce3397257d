//! Seeded per-harmonic random gains shared by every oscillator.

use morphwave_wavetable::NUM_HARMONICS;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::OnceLock;

/// Number of random stages the amplitude morph steps through.
pub const NUM_RANDOM_STAGES: usize = 16;

const SEED: u64 = 0x6d6f_7270_6877_6176;

static VALUES: OnceLock<RandomValues> = OnceLock::new();

/// A `NUM_RANDOM_STAGES x NUM_HARMONICS` table of values in `[0, 1)`.
///
/// Built once from a fixed seed, then read-only, so every oscillator and
/// every run sees the same table.
#[derive(Debug)]
pub struct RandomValues {
    stages: Vec<Vec<f32>>,
}

impl RandomValues {
    fn build() -> Self {
        let mut rng = StdRng::seed_from_u64(SEED);
        let stages = (0..NUM_RANDOM_STAGES)
            .map(|_| (0..NUM_HARMONICS).map(|_| rng.random::<f32>()).collect())
            .collect();
        tracing::debug!(stages = NUM_RANDOM_STAGES, "built random amplitude table");
        Self { stages }
    }

    /// The shared table.
    pub fn get() -> &'static RandomValues {
        VALUES.get_or_init(Self::build)
    }

    /// Build the table now rather than on first use. Oscillator
    /// constructors call this so the audio thread only ever reads it.
    pub fn init() {
        VALUES.get_or_init(Self::build);
    }

    /// True once the shared table exists.
    pub fn is_built() -> bool {
        VALUES.get().is_some()
    }

    /// Value for `harmonic` at fractional `stage`, blended between the two
    /// neighbouring stages.
    #[inline]
    pub fn value(&self, stage: f32, harmonic: usize) -> f32 {
        let last = NUM_RANDOM_STAGES - 1;
        let stage = stage.clamp(0.0, last as f32);
        let index = (stage as usize).min(last - 1);
        let t = stage - index as f32;
        let harmonic = harmonic.min(NUM_HARMONICS - 1);
        let from = self.stages[index][harmonic];
        let to = self.stages[index + 1][harmonic];
        from + (to - from) * t
    }
}
