use super::*;

impl OpinionWorld {
    /// Validate the parameters, seed the population from the run seed, and
    /// cast the initial votes. Builds the worker pool once; a single-thread
    /// configuration runs the batched scheduler inline instead.
    pub fn new(params: SimParams) -> Result<Self, SimError> {
        params.validate()?;

        let (agents, rng) =
            crate::agent::seed_population(params.agents as usize, Lcg64::new(params.seed));

        let worker_threads = usize::from(params.worker_threads);
        let worker_pool = if worker_threads > 1 {
            rayon::ThreadPoolBuilder::new()
                .num_threads(worker_threads)
                .build()
                .ok()
        } else {
            None
        };

        let mut world = Self {
            params,
            agents,
            rng,
            current_tick: 0,
            last_votes: BTreeMap::new(),
            worker_pool,
            last_step_metrics: StepMetrics::default(),
        };
        world.cast_votes();
        Ok(world)
    }

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn current_tick(&self) -> u64 {
        self.current_tick
    }

    pub fn last_step_metrics(&self) -> StepMetrics {
        self.last_step_metrics
    }
}
