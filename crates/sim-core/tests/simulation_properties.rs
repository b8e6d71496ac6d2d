//! End-to-end scenarios and property checks over the public run surface.

use contracts::{SchedulerKind, SimError, SimParams, Topology};
use proptest::prelude::*;
use sim_core::{run, run_with_scheduler, sweep};

fn params(agents: u32, ticks: u32, seed: i64, chunk_size: u32, topology: Topology) -> SimParams {
    SimParams {
        agents,
        ticks,
        seed,
        chunk_size,
        topology,
        worker_threads: 2,
    }
}

#[test]
fn single_tick_run_produces_a_consistent_summary() {
    let stats = run(&params(10, 1, 12_345, 256, Topology::AllPairs)).expect("run");
    assert_eq!(stats.total_agents, 10);
    assert_eq!(stats.agent_preferences.len(), 10);
    assert_eq!(stats.vote_results.values().sum::<u64>(), 10);

    let average_sum: f64 = stats.average_preferences.iter().sum();
    assert!(
        (average_sum - 1.0).abs() <= 3e-3,
        "average sums to {average_sum}"
    );
    for prefs in &stats.agent_preferences {
        let sum: f64 = prefs.iter().sum();
        assert!((sum - 1.0).abs() <= 3e-3, "agent prefs sum to {sum}");
        assert!(prefs.iter().all(|p| *p >= 0.0));
    }
}

#[test]
fn batched_and_actor_schedulers_agree_field_by_field() {
    let shared = params(12, 2, 4242, 64, Topology::AllPairs);
    let batched = run_with_scheduler(&shared, SchedulerKind::Batched).expect("batched");
    let actor = run_with_scheduler(&shared, SchedulerKind::Actor).expect("actor");
    assert_eq!(batched, actor);
}

#[test]
fn repeated_runs_return_equal_summaries() {
    let shared = params(10, 2, 42, 256, Topology::AllPairs);
    assert_eq!(run(&shared).expect("first"), run(&shared).expect("second"));
}

#[test]
fn zero_tick_run_reports_the_freshly_seeded_population() {
    let stats = run(&params(10, 0, 42, 256, Topology::AllPairs)).expect("run");
    assert_eq!(stats.vote_results.values().sum::<u64>(), 10);
    for prefs in &stats.agent_preferences {
        assert_eq!(prefs[2], 0.0);
    }
}

#[test]
fn dense_population_stays_normalized_over_several_ticks() {
    let stats = run(&params(50, 3, 99, 256, Topology::AllPairs)).expect("run");
    assert_eq!(stats.total_agents, 50);
    for prefs in &stats.agent_preferences {
        let sum: f64 = prefs.iter().sum();
        assert!((sum - 1.0).abs() <= 3e-3);
        assert!(prefs.iter().all(|p| *p >= 0.0));
    }
}

#[test]
fn sparse_random_matching_still_casts_every_vote() {
    let stats = run(&params(10, 5, 42, 256, Topology::RandomMatch { k: 1 })).expect("run");
    assert_eq!(stats.vote_results.values().sum::<u64>(), 10);
}

#[test]
fn oversized_matching_degree_is_rejected_before_any_work() {
    let result = run(&params(10, 5, 42, 256, Topology::RandomMatch { k: 10 }));
    assert_eq!(
        result,
        Err(SimError::InvalidTopology { k: 10, agents: 10 })
    );
}

#[test]
fn sweep_rejects_bad_ranges() {
    let template = params(2, 1, 42, 256, Topology::AllPairs);
    assert_eq!(
        sweep(1, 5, &template),
        Err(SimError::InvalidRange { min: 1, max: 5 })
    );
    assert_eq!(
        sweep(4, 3, &template),
        Err(SimError::InvalidRange { min: 4, max: 3 })
    );
    assert_eq!(sweep(2, 3, &template), Ok(()));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn chunk_size_never_changes_batched_output(
        agents in 2u32..10,
        ticks in 0u32..3,
        seed in any::<i64>(),
        first_chunk in 1u32..80,
        second_chunk in 1u32..80,
    ) {
        let first = run(&params(agents, ticks, seed, first_chunk, Topology::AllPairs))
            .expect("first run");
        let second = run(&params(agents, ticks, seed, second_chunk, Topology::AllPairs))
            .expect("second run");
        prop_assert_eq!(first, second);
    }

    #[test]
    fn schedulers_agree_on_all_pairs(
        agents in 2u32..9,
        ticks in 0u32..3,
        seed in any::<i64>(),
    ) {
        let shared = params(agents, ticks, seed, 16, Topology::AllPairs);
        let batched = run_with_scheduler(&shared, SchedulerKind::Batched).expect("batched");
        let actor = run_with_scheduler(&shared, SchedulerKind::Actor).expect("actor");
        prop_assert_eq!(batched, actor);
    }

    #[test]
    fn schedulers_agree_on_random_matching(
        (agents, k) in (3u32..9).prop_flat_map(|n| (Just(n), 1u32..n)),
        ticks in 1u32..3,
        seed in any::<i64>(),
    ) {
        let shared = params(agents, ticks, seed, 8, Topology::RandomMatch { k });
        let batched = run_with_scheduler(&shared, SchedulerKind::Batched).expect("batched");
        let actor = run_with_scheduler(&shared, SchedulerKind::Actor).expect("actor");
        prop_assert_eq!(batched, actor);
    }

    #[test]
    fn every_agent_votes_exactly_once(
        agents in 1u32..20,
        ticks in 0u32..4,
        seed in any::<i64>(),
    ) {
        let stats = run(&params(agents, ticks, seed, 32, Topology::AllPairs)).expect("run");
        prop_assert_eq!(stats.vote_results.values().sum::<u64>(), u64::from(agents));
    }
}
