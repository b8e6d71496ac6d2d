//! The run state machine: seeded population, tick loop, vote sampling.

use std::collections::BTreeMap;

use contracts::{SimError, SimParams, Stats};

use crate::agent::Agent;
use crate::dialogue;
use crate::pairs::{self, Pair};
use crate::rng::Lcg64;

mod actors;
mod init;
mod stats;
mod step;

pub use actors::run_actor;
pub use step::StepMetrics;

/// Both marginals of one dialogue, keyed by the pair's endpoints.
#[derive(Debug, Clone, Copy)]
struct PairContribution {
    lo: usize,
    hi: usize,
    lo_marginal: [f64; 3],
    hi_marginal: [f64; 3],
}

/// Holds the population across ticks and drives the batched scheduler. The
/// shared RNG is consumed only here, never by dialogue workers.
#[derive(Debug)]
pub struct OpinionWorld {
    params: SimParams,
    agents: Vec<Agent>,
    rng: Lcg64,
    current_tick: u64,
    last_votes: BTreeMap<u8, u64>,
    worker_pool: Option<rayon::ThreadPool>,
    last_step_metrics: StepMetrics,
}

fn evaluate_pair(snapshot: &[Agent], pair: Pair) -> PairContribution {
    let (lo, hi) = pair;
    let (lo_marginal, hi_marginal) = dialogue::talk(&snapshot[lo], &snapshot[hi]);
    PairContribution {
        lo,
        hi,
        lo_marginal,
        hi_marginal,
    }
}

/// Average per-pair contributions into each agent's next distribution.
/// Contributions must arrive in pair-list order; agents without a partner
/// this tick carry their distribution forward. Returns the next population
/// and how many agents were updated.
fn apply_contributions(agents: &[Agent], contributions: &[PairContribution]) -> (Vec<Agent>, u64) {
    let mut sums = vec![[0.0_f64; 3]; agents.len()];
    let mut counts = vec![0_u64; agents.len()];
    for contribution in contributions {
        for c in 0..3 {
            sums[contribution.lo][c] += contribution.lo_marginal[c];
            sums[contribution.hi][c] += contribution.hi_marginal[c];
        }
        counts[contribution.lo] += 1;
        counts[contribution.hi] += 1;
    }

    let mut updated = 0_u64;
    let next = agents
        .iter()
        .enumerate()
        .map(|(idx, agent)| {
            if counts[idx] == 0 {
                return *agent;
            }
            updated += 1;
            let divisor = counts[idx] as f64;
            agent.with_prefs([
                sums[idx][0] / divisor,
                sums[idx][1] / divisor,
                sums[idx][2] / divisor,
            ])
        })
        .collect();
    (next, updated)
}
