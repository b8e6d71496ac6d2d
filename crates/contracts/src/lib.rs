//! Cross-boundary contracts for the opinion-dynamics simulation kernel.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Interaction topology for one tick's pair selection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Topology {
    /// Every unordered pair of distinct agents.
    AllPairs,
    /// Up to `k` candidate partners per agent, deduplicated. Requires
    /// `1 <= k <= agents - 1`.
    RandomMatch { k: u32 },
}

impl Default for Topology {
    fn default() -> Self {
        Topology::AllPairs
    }
}

/// Which tick orchestration executes the run. Both produce identical output
/// for identical parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SchedulerKind {
    /// Pair chunks dispatched on a worker pool, merged on the main task.
    Batched,
    /// One worker per agent, barrier-synchronized ticks.
    Actor,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SimParams {
    pub agents: u32,
    pub ticks: u32,
    #[serde(default = "default_seed")]
    pub seed: i64,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: u32,
    #[serde(default)]
    pub topology: Topology,
    #[serde(default = "default_worker_threads")]
    pub worker_threads: u16,
}

impl SimParams {
    /// Argument validation, performed before any simulation work begins.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.agents == 0 {
            return Err(SimError::ZeroAgents);
        }
        if self.chunk_size == 0 {
            return Err(SimError::NonPositiveChunk);
        }
        if let Topology::RandomMatch { k } = self.topology {
            if k == 0 || k >= self.agents {
                return Err(SimError::InvalidTopology {
                    k,
                    agents: self.agents,
                });
            }
        }
        Ok(())
    }
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            agents: 10,
            ticks: 1,
            seed: default_seed(),
            chunk_size: default_chunk_size(),
            topology: Topology::default(),
            worker_threads: default_worker_threads(),
        }
    }
}

fn default_seed() -> i64 {
    42
}

fn default_chunk_size() -> u32 {
    256
}

fn default_worker_threads() -> u16 {
    let available = std::thread::available_parallelism()
        .map(|parallelism| parallelism.get())
        .unwrap_or(1);
    let workers = available.saturating_mul(2).max(1);
    workers.min(u16::MAX as usize) as u16
}

/// Final run summary: one categorical vote per agent plus the rounded
/// preference distributions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Stats {
    pub total_agents: u32,
    /// Vote index (0..=2) to count; keys are present only for cast votes and
    /// the counts sum to `total_agents`.
    pub vote_results: BTreeMap<u8, u64>,
    pub average_preferences: [f64; 3],
    pub agent_preferences: Vec<[f64; 3]>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SimError {
    ZeroAgents,
    NonPositiveChunk,
    InvalidTopology { k: u32, agents: u32 },
    InvalidRange { min: u32, max: u32 },
    InternalInvariant { message: String },
    WorkerFailure { message: String },
}

impl fmt::Display for SimError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::ZeroAgents => write!(formatter, "agent count must be at least 1"),
            SimError::NonPositiveChunk => write!(formatter, "chunk size must be at least 1"),
            SimError::InvalidTopology { k, agents } => write!(
                formatter,
                "random matching requires 1 <= k <= agents - 1, got k={k} with {agents} agents"
            ),
            SimError::InvalidRange { min, max } => write!(
                formatter,
                "sweep requires 2 <= min <= max, got min={min} max={max}"
            ),
            SimError::InternalInvariant { message } => {
                write!(formatter, "internal invariant violated: {message}")
            }
            SimError::WorkerFailure { message } => {
                write!(formatter, "worker failure: {message}")
            }
        }
    }
}

impl std::error::Error for SimError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_round_trip_serialization() {
        let params = SimParams {
            agents: 24,
            ticks: 6,
            seed: -7,
            chunk_size: 32,
            topology: Topology::RandomMatch { k: 3 },
            worker_threads: 4,
        };
        let serialized = serde_json::to_string(&params).expect("serialize");
        let decoded: SimParams = serde_json::from_str(&serialized).expect("deserialize");
        assert_eq!(params, decoded);
    }

    #[test]
    fn params_fill_defaults_for_missing_fields() {
        let decoded: SimParams =
            serde_json::from_str(r#"{"agents": 8, "ticks": 2}"#).expect("deserialize");
        assert_eq!(decoded.seed, 42);
        assert_eq!(decoded.chunk_size, 256);
        assert_eq!(decoded.topology, Topology::AllPairs);
        assert!(decoded.worker_threads >= 1);
    }

    #[test]
    fn validation_rejects_bad_arguments() {
        let mut params = SimParams::default();
        params.agents = 0;
        assert_eq!(params.validate(), Err(SimError::ZeroAgents));

        let mut params = SimParams::default();
        params.chunk_size = 0;
        assert_eq!(params.validate(), Err(SimError::NonPositiveChunk));

        let mut params = SimParams::default();
        params.agents = 10;
        params.topology = Topology::RandomMatch { k: 10 };
        assert_eq!(
            params.validate(),
            Err(SimError::InvalidTopology { k: 10, agents: 10 })
        );

        params.topology = Topology::RandomMatch { k: 9 };
        assert_eq!(params.validate(), Ok(()));
    }
}
