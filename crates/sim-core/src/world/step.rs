use super::*;

use rayon::prelude::*;

/// What the most recent step processed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepMetrics {
    pub processed_tick: u64,
    pub pairs_processed: u64,
    pub updated_agents: u64,
}

impl OpinionWorld {
    /// Advance one tick: pair selection, dialogue over every pair, averaged
    /// reduction, then the tick's vote phase. Returns false once the
    /// configured tick budget is exhausted.
    pub fn step(&mut self) -> Result<bool, SimError> {
        if self.current_tick >= u64::from(self.params.ticks) {
            return Ok(false);
        }
        let tick = self.current_tick + 1;

        let pairs = pairs::generate_pairs(
            self.params.topology,
            self.agents.len(),
            self.params.seed,
            tick,
        )?;
        let contributions = self.evaluate_pairs(&pairs);
        let (next_agents, updated_agents) = apply_contributions(&self.agents, &contributions);
        self.agents = next_agents;
        self.cast_votes();

        self.last_step_metrics = StepMetrics {
            processed_tick: tick,
            pairs_processed: pairs.len() as u64,
            updated_agents,
        };
        self.current_tick = tick;
        Ok(true)
    }

    pub fn step_n(&mut self, n: u64) -> Result<u64, SimError> {
        let mut committed = 0_u64;
        for _ in 0..n {
            if !self.step()? {
                break;
            }
            committed += 1;
        }
        Ok(committed)
    }

    pub fn run_to_completion(&mut self) -> Result<(), SimError> {
        while self.step()? {}
        Ok(())
    }

    /// Dialogue over the tick's pair list, chunked onto the worker pool.
    /// Chunk results come back in chunk order and each chunk preserves pair
    /// order, so the merged sequence equals the pair list and the output is
    /// independent of the chunk size.
    fn evaluate_pairs(&self, pairs: &[Pair]) -> Vec<PairContribution> {
        let snapshot: &[Agent] = &self.agents;
        let chunks: Vec<&[Pair]> = pairs.chunks(self.params.chunk_size as usize).collect();
        let per_chunk: Vec<Vec<PairContribution>> = match &self.worker_pool {
            Some(pool) if chunks.len() > 1 => pool.install(|| {
                chunks
                    .into_par_iter()
                    .map(|chunk| evaluate_chunk(snapshot, chunk))
                    .collect()
            }),
            _ => chunks
                .into_iter()
                .map(|chunk| evaluate_chunk(snapshot, chunk))
                .collect(),
        };
        per_chunk.into_iter().flatten().collect()
    }
}

fn evaluate_chunk(snapshot: &[Agent], chunk: &[Pair]) -> Vec<PairContribution> {
    chunk
        .iter()
        .map(|pair| evaluate_pair(snapshot, *pair))
        .collect()
}
