//! The pairwise dialogue kernel.
//!
//! A pure function of the two participants: joint distribution, projection
//! through the transition matrix, marginalization, 4-decimal rounding, then
//! per-marginal normalization. The rounding-before-normalize order is part
//! of the output contract and must not be reordered.

use crate::agent::Agent;
use crate::transition::transition_matrix;

/// Half-to-even decimal rounding at `scale` (e.g. `1e4` for 4 places).
pub(crate) fn round_scaled(value: f64, scale: f64) -> f64 {
    (value * scale).round_ties_even() / scale
}

/// Run one dialogue and return both participants' next distributions,
/// alice's first. Never touches the shared RNG.
pub fn talk(alice: &Agent, bob: &Agent) -> ([f64; 3], [f64; 3]) {
    let matrix = transition_matrix(alice, bob);

    // Joint distribution as a length-9 row vector, row-major.
    let mut joint = [0.0_f64; 9];
    for i in 0..3 {
        for j in 0..3 {
            joint[3 * i + j] = alice.prefs[i] * bob.prefs[j];
        }
    }

    // Project: r = v * T.
    let mut projected = [0.0_f64; 9];
    for (col, slot) in projected.iter_mut().enumerate() {
        let mut sum = 0.0;
        for (k, weight) in joint.iter().enumerate() {
            sum += weight * matrix[k][col];
        }
        *slot = sum;
    }

    // Alice marginalizes over rows, bob over columns.
    let mut alice_marginal = [0.0_f64; 3];
    let mut bob_marginal = [0.0_f64; 3];
    for i in 0..3 {
        alice_marginal[i] =
            round_scaled(projected[3 * i] + projected[3 * i + 1] + projected[3 * i + 2], 1e4);
        bob_marginal[i] = round_scaled(projected[i] + projected[3 + i] + projected[6 + i], 1e4);
    }
    (normalize(alice_marginal), normalize(bob_marginal))
}

fn normalize(marginal: [f64; 3]) -> [f64; 3] {
    let total = marginal[0] + marginal[1] + marginal[2];
    if total <= 0.0 {
        return [1.0 / 3.0; 3];
    }
    [
        marginal[0] / total,
        marginal[1] / total,
        marginal[2] / total,
    ]
}
