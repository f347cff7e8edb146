// core/src/planner/allocator.rs
use crate::planner::throughput::{replicas, ThroughputModel};
use crate::utils::models::{Configuration, Infeasible, Parameters, Report};
use log::{debug, info, warn};
use serde::Serialize;

/// Result of sizing and evaluating one trainer/inference split.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct PartitionOutcome {
    pub trainer_gpus: u32,
    pub inference_gpus: u32,
    pub actors_needed: Option<f64>, // None when the split cannot host both stages
    pub outcome: Result<Report, Infeasible>,
}

impl PartitionOutcome {
    pub fn report(&self) -> Option<&Report> {
        self.outcome.as_ref().ok()
    }
}

/// Searches trainer/inference splits of the GPU pool for the highest
/// samples/s.
///
/// Only the trainer share is enumerated: the inference share is whatever
/// is left, and for each split the actor count is sized in closed form to
/// saturate the slower of the two GPU stages. Adding actors beyond that
/// cannot raise throughput, so no nested actor search is needed.
#[derive(Clone, Debug)]
pub struct Allocator {
    model: ThroughputModel,
}

impl Allocator {
    pub fn new(model: ThroughputModel) -> Self {
        Allocator { model }
    }

    pub fn from_params(params: Parameters) -> Self {
        Allocator::new(ThroughputModel::new(params))
    }

    pub fn model(&self) -> &ThroughputModel {
        &self.model
    }

    /// Best trajectories/s a split could deliver with unlimited actors.
    pub fn max_rollout_traj_rate(&self, trainer_replicas: u64, inference_replicas: u64) -> f64 {
        let p = self.model.params();
        let trainer_traj_rate = p.trainer_traj_rate(trainer_replicas);
        let inference_traj_equivalent =
            p.inference_capacity(inference_replicas) / p.actor_steps_per_traj;
        trainer_traj_rate.min(inference_traj_equivalent)
    }

    /// Fewest actors whose step output reaches `traj_rate`, never below one.
    pub fn actors_needed(&self, traj_rate: f64) -> f64 {
        let p = self.model.params();
        (traj_rate * p.actor_steps_per_traj / p.actor_steps_per_s).ceil().max(1.0)
    }

    /// Sizes and evaluates one split.
    pub fn evaluate_partition(&self, trainer_gpus: u32) -> PartitionOutcome {
        let p = self.model.params();
        let inference_gpus = p.total_gpus.saturating_sub(trainer_gpus);

        let trainer_replicas = replicas(trainer_gpus as f64, p.trainer_gpus_per_replica);
        let inference_replicas = replicas(inference_gpus as f64, p.inference_gpus_per_replica);
        if trainer_replicas == 0 || inference_replicas == 0 {
            let reason =
                if trainer_replicas == 0 { Infeasible::NoTrainer } else { Infeasible::NoInference };
            debug!("Skipping split {}/{}: {}", trainer_gpus, inference_gpus, reason.code());
            return PartitionOutcome {
                trainer_gpus,
                inference_gpus,
                actors_needed: None,
                outcome: Err(reason),
            };
        }

        let max_rate = self.max_rollout_traj_rate(trainer_replicas, inference_replicas);
        let actors = self.actors_needed(max_rate);
        let config = Configuration::new(trainer_gpus as f64, inference_gpus as f64, actors);
        let outcome = self.model.evaluate(&config);
        if let Err(reason) = &outcome {
            debug!("Split {}/{} infeasible: {}", trainer_gpus, inference_gpus, reason.code());
        }

        PartitionOutcome { trainer_gpus, inference_gpus, actors_needed: Some(actors), outcome }
    }

    /// Every split with at least one GPU on each side, in ascending trainer share.
    pub fn sweep(&self) -> Vec<PartitionOutcome> {
        let total = self.model.params().total_gpus;
        (1..total).map(|trainer_gpus| self.evaluate_partition(trainer_gpus)).collect()
    }

    /// Highest samples/s over all splits. Ties keep the lowest trainer share.
    /// `None` when no split is feasible.
    pub fn compute_best_config(&self) -> Option<Report> {
        let best = self
            .sweep()
            .into_iter()
            .filter_map(|partition| partition.outcome.ok())
            .fold(None::<Report>, |best, candidate| match best {
                Some(current) if candidate.samples_per_second > current.samples_per_second => {
                    Some(candidate)
                }
                Some(current) => Some(current),
                None => Some(candidate),
            });

        match &best {
            Some(report) => info!(
                "Best split: {} trainer / {} inference GPUs, {} actors, {:.3} samples/s ({} bound)",
                report.config.trainer_gpus,
                report.config.inference_gpus,
                report.config.actors,
                report.samples_per_second,
                report.bottleneck
            ),
            None => warn!(
                "No feasible configuration for a pool of {} GPUs",
                self.model.params().total_gpus
            ),
        }
        best
    }
}
