//! 64-bit linear congruential generator, the sole randomness source of a run.
//!
//! The state is threaded by value: every draw returns the value together
//! with the successor state, so the consumption order is explicit at every
//! call site and two runs with the same seed read the same stream.

const MULTIPLIER: u64 = 6_364_136_223_846_793_005;
const INCREMENT: u64 = 1_442_695_040_888_963_407;
const TWO_POW_64: f64 = 18_446_744_073_709_551_616.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lcg64 {
    state: u64,
}

impl Lcg64 {
    /// Fold the seed into the `mod 2^64` residue class; negative seeds map to
    /// their two's-complement image.
    pub fn new(seed: i64) -> Self {
        Self { state: seed as u64 }
    }

    /// Resume from a raw state, used by derived per-tick streams.
    pub fn from_state(state: u64) -> Self {
        Self { state }
    }

    pub fn state(self) -> u64 {
        self.state
    }

    /// One step of `s' = (a*s + c) mod 2^64`; the value is `s' / 2^64`.
    pub fn uniform(self) -> (f64, Self) {
        let next = MULTIPLIER.wrapping_mul(self.state).wrapping_add(INCREMENT);
        (next as f64 / TWO_POW_64, Self { state: next })
    }
}
