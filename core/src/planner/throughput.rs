// core/src/planner/throughput.rs
use crate::utils::models::{Bottleneck, Configuration, Infeasible, Parameters, Report};
use crate::utils::REPLICA_SNAP_ULPS;

/// Number of whole replicas that fit in `gpus` when each costs `per_replica`.
///
/// A ratio within a few ULPs of an integer is that integer, so 0.3 / 0.1
/// counts as 3. Anything else is floored. Counts past `u64::MAX` saturate.
pub fn replicas(gpus: f64, per_replica: f64) -> u64 {
    if !(gpus > 0.0) || !(per_replica > 0.0) {
        return 0;
    }
    let ratio = gpus / per_replica;
    let nearest = ratio.round();
    if (ratio - nearest).abs() <= REPLICA_SNAP_ULPS * f64::EPSILON * ratio {
        nearest as u64
    } else {
        ratio.floor() as u64
    }
}

/// Evaluates single configurations against a fixed parameter set.
///
/// Holds no mutable state; callers construct one and pass it around.
#[derive(Clone, Debug)]
pub struct ThroughputModel {
    params: Parameters,
}

impl ThroughputModel {
    pub fn new(params: Parameters) -> Self {
        ThroughputModel { params }
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    /// Rates and bottleneck for `config`, or the first precondition it fails.
    pub fn evaluate(&self, config: &Configuration) -> Result<Report, Infeasible> {
        let p = &self.params;
        let gt = config.trainer_gpus;
        let gi = config.inference_gpus;

        // NaN splits fail every comparison, so test for validity rather than invalidity
        if !(gt >= 0.0 && gi >= 0.0 && gt + gi <= p.total_gpus as f64) {
            return Err(Infeasible::InvalidGpuSplit);
        }

        let trainer_replicas = replicas(gt, p.trainer_gpus_per_replica);
        if trainer_replicas == 0 {
            return Err(Infeasible::NoTrainer);
        }

        let inference_replicas = replicas(gi, p.inference_gpus_per_replica);
        if inference_replicas == 0 {
            return Err(Infeasible::NoInference);
        }

        if !config.actors.is_finite() || config.actors <= 0.0 {
            return Err(Infeasible::NoActors);
        }

        let generation_demand = config.actors * p.actor_steps_per_s;
        let inference_capacity = p.inference_capacity(inference_replicas);
        let generation_rate = generation_demand.min(inference_capacity);
        let rollout_traj_rate = generation_rate / p.actor_steps_per_traj;
        let trainer_traj_rate = p.trainer_traj_rate(trainer_replicas);
        let trajectories_per_second = rollout_traj_rate.min(trainer_traj_rate);
        let samples_per_second = trajectories_per_second * p.actor_steps_per_traj;

        let bottleneck = classify(
            trajectories_per_second,
            rollout_traj_rate,
            generation_rate,
            generation_demand,
            inference_capacity,
        );

        Ok(Report {
            config: *config,
            trainer_replicas,
            inference_replicas,
            generation_demand,
            inference_capacity,
            generation_rate,
            rollout_traj_rate,
            trainer_traj_rate,
            trajectories_per_second,
            samples_per_second,
            bottleneck,
        })
    }
}

// Tie-break over the three-way min. Exact float equality is intended here.
#[allow(clippy::float_cmp)]
fn classify(
    throughput: f64,
    rollout: f64,
    generation_rate: f64,
    generation_demand: f64,
    inference_capacity: f64,
) -> Bottleneck {
    if throughput < rollout {
        Bottleneck::Trainer
    } else if generation_rate == generation_demand && generation_rate == inference_capacity {
        Bottleneck::Env
    } else if generation_rate == generation_demand {
        Bottleneck::Actors
    } else {
        Bottleneck::Inference
    }
}
