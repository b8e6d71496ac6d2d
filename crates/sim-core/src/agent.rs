//! Simulation participants.

use crate::rng::Lcg64;

/// One agent: a fixed disposition pair and a preference distribution over
/// the three alternatives.
///
/// `rho` (resistance) and `pi` (persuasion) are immutable after
/// construction; `prefs` is replaced wholesale at the end of each tick and
/// always sums to 1 up to the dialogue normalization step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Agent {
    pub rho: f64,
    pub pi: f64,
    pub prefs: [f64; 3],
}

impl Agent {
    /// A fresh agent puts `u` on the first alternative, the remainder on the
    /// second, and nothing on the third.
    pub fn new(rho: f64, pi: f64, first_option_pref: f64) -> Self {
        Self {
            rho,
            pi,
            prefs: [first_option_pref, 1.0 - first_option_pref, 0.0],
        }
    }

    pub fn with_prefs(self, prefs: [f64; 3]) -> Self {
        Self { prefs, ..self }
    }
}

/// Seed the population: for each index in order, draw `rho`, `pi`, and the
/// first-option preference from the shared stream.
pub fn seed_population(count: usize, rng: Lcg64) -> (Vec<Agent>, Lcg64) {
    let mut rng = rng;
    let mut agents = Vec::with_capacity(count);
    for _ in 0..count {
        let (rho, after_rho) = rng.uniform();
        let (pi, after_pi) = after_rho.uniform();
        let (first_pref, after_pref) = after_pi.uniform();
        agents.push(Agent::new(rho, pi, first_pref));
        rng = after_pref;
    }
    (agents, rng)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_agents_hold_nothing_on_the_third_alternative() {
        let agent = Agent::new(0.4, 0.6, 0.25);
        assert_eq!(agent.prefs, [0.25, 0.75, 0.0]);
    }

    #[test]
    fn seeding_consumes_three_draws_per_agent_in_index_order() {
        let rng = Lcg64::new(42);
        let (agents, after) = seed_population(2, rng);
        assert_eq!(agents.len(), 2);

        let (rho, rng) = Lcg64::new(42).uniform();
        let (pi, rng) = rng.uniform();
        let (first_pref, rng) = rng.uniform();
        assert_eq!(agents[0].rho, rho);
        assert_eq!(agents[0].pi, pi);
        assert_eq!(agents[0].prefs[0], first_pref);

        let (_, rng) = rng.uniform();
        let (_, rng) = rng.uniform();
        let (_, rng) = rng.uniform();
        assert_eq!(after, rng);
    }
}
