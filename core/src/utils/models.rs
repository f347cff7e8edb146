// core/src/utils/models.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// Unit in which a training replica's capacity is quoted
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CapacityUnit {
    #[default]
    Trajectories, // trajectories/s per replica (canonical)
    Steps,        // environment steps/s per replica
}

impl FromStr for CapacityUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trajectories" | "traj" => Ok(CapacityUnit::Trajectories),
            "steps" => Ok(CapacityUnit::Steps),
            other => Err(format!("unknown capacity unit '{}' (expected trajectories or steps)", other)),
        }
    }
}

impl fmt::Display for CapacityUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CapacityUnit::Trajectories => write!(f, "trajectories/s"),
            CapacityUnit::Steps => write!(f, "steps/s"),
        }
    }
}

/// Steady-state throughput of one training replica, tagged with its unit.
///
/// Trajectories per second is the canonical unit. A steps/s figure is only
/// accepted when tagged as such and is converted by dividing by the
/// trajectory length.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct TrainerCapacity {
    pub per_replica: f64,
    pub unit: CapacityUnit,
}

impl TrainerCapacity {
    pub fn trajectories(per_replica: f64) -> Self {
        TrainerCapacity { per_replica, unit: CapacityUnit::Trajectories }
    }

    pub fn steps(per_replica: f64) -> Self {
        TrainerCapacity { per_replica, unit: CapacityUnit::Steps }
    }

    /// Trajectories/s consumed by a single replica.
    pub fn traj_per_s(&self, actor_steps_per_traj: f64) -> f64 {
        match self.unit {
            CapacityUnit::Trajectories => self.per_replica,
            CapacityUnit::Steps => self.per_replica / actor_steps_per_traj,
        }
    }
}

// Pipeline parameters, fixed for one evaluation or search
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Parameters {
    pub total_gpus: u32,
    pub trainer_gpus_per_replica: f64,
    pub trainer_capacity: TrainerCapacity,
    pub inference_gpus_per_replica: f64,
    pub inference_reqs_per_s_per_replica: f64,
    pub actor_steps_per_traj: f64,
    pub actor_steps_per_s: f64,
}

impl Parameters {
    /// Trajectories/s the trainer pool can absorb with `trainer_replicas` replicas.
    pub fn trainer_traj_rate(&self, trainer_replicas: u64) -> f64 {
        trainer_replicas as f64 * self.trainer_capacity.traj_per_s(self.actor_steps_per_traj)
    }

    /// Steps/s the inference pool can serve with `inference_replicas` replicas.
    pub fn inference_capacity(&self, inference_replicas: u64) -> f64 {
        inference_replicas as f64 * self.inference_reqs_per_s_per_replica
    }
}

// One trial allocation
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Configuration {
    pub trainer_gpus: f64,
    pub inference_gpus: f64,
    pub actors: f64,
}

impl Configuration {
    pub fn new(trainer_gpus: f64, inference_gpus: f64, actors: f64) -> Self {
        Configuration { trainer_gpus, inference_gpus, actors }
    }
}

// Stage whose capacity equals the realised throughput
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Bottleneck {
    Actors,
    Inference,
    Trainer,
    Env, // actor demand and inference capacity saturate together
}

impl fmt::Display for Bottleneck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Bottleneck::Actors => "actors",
            Bottleneck::Inference => "inference",
            Bottleneck::Trainer => "trainer",
            Bottleneck::Env => "env",
        };
        f.write_str(tag)
    }
}

/// Reason a configuration cannot run. Checked in declaration order.
#[derive(Clone, Copy, Debug, Error, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Infeasible {
    #[error("invalid_gpu_split: GPU split is negative or exceeds the pool")]
    InvalidGpuSplit,
    #[error("no_trainer: trainer GPUs do not fit a single replica")]
    NoTrainer,
    #[error("no_inference: inference GPUs do not fit a single replica")]
    NoInference,
    #[error("no_actors: actor count must be finite and positive")]
    NoActors,
}

impl Infeasible {
    pub fn code(&self) -> &'static str {
        match self {
            Infeasible::InvalidGpuSplit => "invalid_gpu_split",
            Infeasible::NoTrainer => "no_trainer",
            Infeasible::NoInference => "no_inference",
            Infeasible::NoActors => "no_actors",
        }
    }
}

/// Rates for a feasible configuration. Step rates are steps/s,
/// trajectory rates are trajectories/s.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Report {
    pub config: Configuration,
    pub trainer_replicas: u64,
    pub inference_replicas: u64,
    pub generation_demand: f64,
    pub inference_capacity: f64,
    pub generation_rate: f64,
    pub rollout_traj_rate: f64,
    pub trainer_traj_rate: f64,
    pub trajectories_per_second: f64,
    pub samples_per_second: f64,
    pub bottleneck: Bottleneck,
}
