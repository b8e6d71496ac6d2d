//! Per-tick pair selection under the configured topology.

use std::collections::BTreeSet;

use contracts::{SimError, Topology};

use crate::rng::Lcg64;
use crate::seeds::matching_stream_seed;

/// Unordered agent pair, normalized so the lower index comes first.
pub type Pair = (usize, usize);

/// The tick's pair list. Deterministic in `(topology, agents, seed, tick)`;
/// the shared run stream is never touched here.
pub fn generate_pairs(
    topology: Topology,
    agents: usize,
    seed: i64,
    tick: u64,
) -> Result<Vec<Pair>, SimError> {
    match topology {
        Topology::AllPairs => Ok(all_pairs(agents)),
        Topology::RandomMatch { k } => random_match(agents, k, seed, tick),
    }
}

fn all_pairs(agents: usize) -> Vec<Pair> {
    let mut pairs = Vec::with_capacity(agents * agents.saturating_sub(1) / 2);
    for i in 0..agents.saturating_sub(1) {
        for j in (i + 1)..agents {
            pairs.push((i, j));
        }
    }
    pairs
}

/// `k` candidate partners per agent from a tick-local stream, excluding the
/// agent itself with uniform probability over the rest, deduplicated
/// preserving first occurrence.
fn random_match(agents: usize, k: u32, seed: i64, tick: u64) -> Result<Vec<Pair>, SimError> {
    if k == 0 || k as usize >= agents {
        return Err(SimError::InvalidTopology {
            k,
            agents: agents as u32,
        });
    }
    let mut rng = Lcg64::from_state(matching_stream_seed(seed, tick));
    let mut seen = BTreeSet::new();
    let mut pairs = Vec::new();
    let span = (agents - 1) as f64;
    for i in 0..agents {
        for _ in 0..k {
            let (u, next) = rng.uniform();
            rng = next;
            // The clamp only matters on the measure-zero draw u == 1.
            let raw = ((u * span) as usize).min(agents - 2);
            let j = if raw >= i { raw + 1 } else { raw };
            let pair = (i.min(j), i.max(j));
            if seen.insert(pair) {
                pairs.push(pair);
            }
        }
    }
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_pairs_is_lexicographic_and_complete() {
        let pairs = generate_pairs(Topology::AllPairs, 5, 0, 1).expect("pairs");
        assert_eq!(
            pairs,
            vec![
                (0, 1),
                (0, 2),
                (0, 3),
                (0, 4),
                (1, 2),
                (1, 3),
                (1, 4),
                (2, 3),
                (2, 4),
                (3, 4),
            ]
        );
    }

    #[test]
    fn all_pairs_count_matches_the_closed_form() {
        for agents in [1_usize, 2, 3, 10, 37] {
            let pairs = all_pairs(agents);
            assert_eq!(pairs.len(), agents * agents.saturating_sub(1) / 2);
        }
    }

    #[test]
    fn random_match_rejects_out_of_range_k() {
        assert_eq!(
            generate_pairs(Topology::RandomMatch { k: 0 }, 10, 42, 1),
            Err(SimError::InvalidTopology { k: 0, agents: 10 })
        );
        assert_eq!(
            generate_pairs(Topology::RandomMatch { k: 10 }, 10, 42, 1),
            Err(SimError::InvalidTopology { k: 10, agents: 10 })
        );
        assert!(generate_pairs(Topology::RandomMatch { k: 9 }, 10, 42, 1).is_ok());
    }

    #[test]
    fn random_match_pairs_are_normalized_unique_and_bounded() {
        let pairs = generate_pairs(Topology::RandomMatch { k: 3 }, 12, 42, 1).expect("pairs");
        assert!(pairs.len() <= 12 * 3);
        let mut seen = BTreeSet::new();
        for (i, j) in &pairs {
            assert!(i < j, "pair ({i}, {j}) is not normalized");
            assert!(*j < 12);
            assert!(seen.insert((*i, *j)), "duplicate pair ({i}, {j})");
        }
    }

    #[test]
    fn random_match_covers_every_agent() {
        let pairs = generate_pairs(Topology::RandomMatch { k: 1 }, 16, 7, 3).expect("pairs");
        let mut matched = vec![false; 16];
        for (i, j) in pairs {
            matched[i] = true;
            matched[j] = true;
        }
        assert!(matched.into_iter().all(|seen| seen));
    }

    #[test]
    fn random_match_is_deterministic_per_tick_and_varies_across_ticks() {
        let first = generate_pairs(Topology::RandomMatch { k: 2 }, 20, 42, 1).expect("pairs");
        let again = generate_pairs(Topology::RandomMatch { k: 2 }, 20, 42, 1).expect("pairs");
        assert_eq!(first, again);

        let later = generate_pairs(Topology::RandomMatch { k: 2 }, 20, 42, 2).expect("pairs");
        assert_ne!(first, later);
    }
}
