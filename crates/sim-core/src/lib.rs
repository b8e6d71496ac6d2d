//! Deterministic opinion-dynamics engine: seeded agents, pairwise dialogue
//! through a 9x9 transition matrix, and two interchangeable tick schedulers
//! that produce identical output for identical parameters.

use std::time::Instant;

use contracts::{SchedulerKind, SimError, SimParams, Stats};

pub mod agent;
pub mod dialogue;
pub mod pairs;
pub mod rng;
pub mod seeds;
pub mod transition;
pub mod world;

use crate::world::OpinionWorld;

/// Execute a full run on the batched scheduler and return the final summary.
pub fn run(params: &SimParams) -> Result<Stats, SimError> {
    run_with_scheduler(params, SchedulerKind::Batched)
}

/// Execute a full run on the selected scheduler.
pub fn run_with_scheduler(
    params: &SimParams,
    scheduler: SchedulerKind,
) -> Result<Stats, SimError> {
    match scheduler {
        SchedulerKind::Batched => {
            let mut world = OpinionWorld::new(*params)?;
            world.run_to_completion()?;
            Ok(world.statistics())
        }
        SchedulerKind::Actor => world::run_actor(params),
    }
}

/// Run once for every population size in `min_agents..=max_agents`, printing
/// the elapsed wall-clock milliseconds of each run to stdout, one integer per
/// line.
pub fn sweep(min_agents: u32, max_agents: u32, params: &SimParams) -> Result<(), SimError> {
    if min_agents < 2 || max_agents < min_agents {
        return Err(SimError::InvalidRange {
            min: min_agents,
            max: max_agents,
        });
    }
    for agents in min_agents..=max_agents {
        let mut run_params = *params;
        run_params.agents = agents;
        let started = Instant::now();
        run(&run_params)?;
        println!("{}", started.elapsed().as_millis());
    }
    Ok(())
}
