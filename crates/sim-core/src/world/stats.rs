use super::*;

/// One uniform per agent in index order; inverse-CDF vote over the agent's
/// un-rounded distribution.
pub(super) fn sample_votes(agents: &[Agent], mut rng: Lcg64) -> (BTreeMap<u8, u64>, Lcg64) {
    let mut votes = BTreeMap::new();
    for agent in agents {
        let (u, next) = rng.uniform();
        rng = next;
        *votes.entry(vote_index(&agent.prefs, u)).or_insert(0) += 1;
    }
    (votes, rng)
}

fn vote_index(prefs: &[f64; 3], u: f64) -> u8 {
    if u <= prefs[0] {
        0
    } else if u <= prefs[0] + prefs[1] {
        1
    } else {
        2
    }
}

/// Assemble the reported summary: per-agent distributions rounded to three
/// decimals, averaged after rounding, and the supplied vote histogram.
pub(super) fn build_stats(agents: &[Agent], votes: &BTreeMap<u8, u64>) -> Stats {
    let rounded: Vec<[f64; 3]> = agents
        .iter()
        .map(|agent| {
            [
                round3(agent.prefs[0]),
                round3(agent.prefs[1]),
                round3(agent.prefs[2]),
            ]
        })
        .collect();
    Stats {
        total_agents: agents.len() as u32,
        vote_results: votes.clone(),
        average_preferences: average_preferences(&rounded),
        agent_preferences: rounded,
    }
}

fn average_preferences(prefs: &[[f64; 3]]) -> [f64; 3] {
    if prefs.is_empty() {
        return [0.0; 3];
    }
    let count = prefs.len() as f64;
    let mut sums = [0.0_f64; 3];
    for triple in prefs {
        for c in 0..3 {
            sums[c] += triple[c];
        }
    }
    [
        round3(sums[0] / count),
        round3(sums[1] / count),
        round3(sums[2] / count),
    ]
}

fn round3(value: f64) -> f64 {
    dialogue::round_scaled(value, 1e3)
}

impl OpinionWorld {
    /// Replace the held histogram with fresh votes from the current
    /// distributions, advancing the shared stream by one draw per agent.
    pub(super) fn cast_votes(&mut self) {
        let (votes, rng) = sample_votes(&self.agents, self.rng);
        self.last_votes = votes;
        self.rng = rng;
    }

    /// Summary for the current population and the most recent vote phase.
    pub fn statistics(&self) -> Stats {
        build_stats(&self.agents, &self.last_votes)
    }
}
