//! Actor-style orchestration: one worker per agent, barrier-synchronized
//! ticks.
//!
//! The coordinator (the calling thread) owns the shared RNG, the pair list,
//! and the accumulators; workers only read the tick snapshot. Contributions
//! come back tagged with their pair-list index and are re-ordered before
//! reduction, so the merged float sums are identical to the batched
//! scheduler's under every topology.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use contracts::{SimError, SimParams, Stats};

use crate::agent::{seed_population, Agent};
use crate::dialogue;
use crate::pairs::{generate_pairs, Pair};
use crate::rng::Lcg64;

use super::stats::{build_stats, sample_votes};
use super::{apply_contributions, PairContribution};

enum TickTask {
    /// Snapshot of the whole population plus this worker's share of the
    /// tick's pair list.
    Run {
        snapshot: Arc<Vec<Agent>>,
        assignments: Vec<(usize, Pair)>,
    },
    Shutdown,
}

/// One pair's dialogue output, tagged for re-ordering on the coordinator.
struct PairOutcome {
    pair_index: usize,
    lo_marginal: [f64; 3],
    hi_marginal: [f64; 3],
}

pub fn run_actor(params: &SimParams) -> Result<Stats, SimError> {
    params.validate()?;
    let agent_count = params.agents as usize;

    let (mut agents, rng) = seed_population(agent_count, Lcg64::new(params.seed));
    let (mut last_votes, mut rng) = sample_votes(&agents, rng);

    if params.ticks == 0 {
        return Ok(build_stats(&agents, &last_votes));
    }

    thread::scope(|scope| -> Result<Stats, SimError> {
        let (report_tx, report_rx) = channel::<Vec<PairOutcome>>();
        let mut inboxes: Vec<Sender<TickTask>> = Vec::with_capacity(agent_count);
        for _ in 0..agent_count {
            let (task_tx, task_rx) = channel::<TickTask>();
            let reports = report_tx.clone();
            scope.spawn(move || worker_loop(task_rx, reports));
            inboxes.push(task_tx);
        }
        drop(report_tx);

        for tick in 1..=u64::from(params.ticks) {
            let pairs = generate_pairs(params.topology, agent_count, params.seed, tick)?;
            let snapshot = Arc::new(agents.clone());

            // Each pair belongs to the worker owning its lower index.
            let mut assignments: Vec<Vec<(usize, Pair)>> = vec![Vec::new(); agent_count];
            for (pair_index, pair) in pairs.iter().enumerate() {
                assignments[pair.0].push((pair_index, *pair));
            }
            for (worker, inbox) in inboxes.iter().enumerate() {
                let task = TickTask::Run {
                    snapshot: Arc::clone(&snapshot),
                    assignments: std::mem::take(&mut assignments[worker]),
                };
                inbox.send(task).map_err(|_| SimError::WorkerFailure {
                    message: format!("worker {worker} is gone before tick {tick}"),
                })?;
            }

            let mut outcomes: Vec<PairOutcome> = Vec::with_capacity(pairs.len());
            for _ in 0..agent_count {
                let report = report_rx.recv().map_err(|_| SimError::WorkerFailure {
                    message: format!("a worker disconnected during tick {tick}"),
                })?;
                outcomes.extend(report);
            }

            outcomes.sort_unstable_by_key(|outcome| outcome.pair_index);
            let complete = outcomes.len() == pairs.len()
                && outcomes
                    .iter()
                    .enumerate()
                    .all(|(idx, outcome)| outcome.pair_index == idx);
            if !complete {
                return Err(SimError::InternalInvariant {
                    message: format!(
                        "tick {tick} merged {} contributions for {} pairs",
                        outcomes.len(),
                        pairs.len()
                    ),
                });
            }

            let contributions: Vec<PairContribution> = outcomes
                .into_iter()
                .map(|outcome| {
                    let (lo, hi) = pairs[outcome.pair_index];
                    PairContribution {
                        lo,
                        hi,
                        lo_marginal: outcome.lo_marginal,
                        hi_marginal: outcome.hi_marginal,
                    }
                })
                .collect();
            let (next_agents, _) = apply_contributions(&agents, &contributions);
            agents = next_agents;

            let (tick_votes, next_rng) = sample_votes(&agents, rng);
            last_votes = tick_votes;
            rng = next_rng;
        }

        for inbox in &inboxes {
            let _ = inbox.send(TickTask::Shutdown);
        }
        Ok(build_stats(&agents, &last_votes))
    })
}

fn worker_loop(tasks: Receiver<TickTask>, reports: Sender<Vec<PairOutcome>>) {
    while let Ok(task) = tasks.recv() {
        match task {
            TickTask::Run {
                snapshot,
                assignments,
            } => {
                let outcomes = assignments
                    .into_iter()
                    .map(|(pair_index, (lo, hi))| {
                        let (lo_marginal, hi_marginal) =
                            dialogue::talk(&snapshot[lo], &snapshot[hi]);
                        PairOutcome {
                            pair_index,
                            lo_marginal,
                            hi_marginal,
                        }
                    })
                    .collect();
                if reports.send(outcomes).is_err() {
                    break;
                }
            }
            TickTask::Shutdown => break,
        }
    }
}
