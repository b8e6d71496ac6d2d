//! Stream-seed derivation for the random-matching topology.
//!
//! The fingerprint is private to this implementation: both schedulers share
//! it, which is what keeps their pair lists identical. It is not part of the
//! cross-language surface.

const MATCH_STREAM_TAG: u64 = 0x4d41_5443_485f_5631;

fn mix_seed(seed: u64, salt: u64) -> u64 {
    let mut value = seed ^ salt.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    value ^= value.rotate_left(29);
    value = value.wrapping_mul(0x517C_C1B7_2722_0A95);
    value ^ (value >> 31)
}

/// Seed for the per-tick matching stream, derived from the run seed and the
/// tick number.
pub fn matching_stream_seed(seed: i64, tick: u64) -> u64 {
    mix_seed(mix_seed(seed as u64, MATCH_STREAM_TAG), tick)
}
