// core/src/planner/bounds.rs
use crate::utils::models::{CapacityUnit, Parameters, TrainerCapacity};
use log::debug;
use serde::{Deserialize, Serialize};

/// Accepted range and fallback for one externally supplied field.
#[derive(Clone, Copy, Debug, Serialize, PartialEq)]
pub struct FieldBounds {
    pub name: &'static str,
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub integer: bool,
}

impl FieldBounds {
    /// Missing or NaN input falls back to the default. Anything else,
    /// infinities included, is clamped into range, then floored for
    /// integer fields.
    pub fn bound(&self, value: Option<f64>) -> f64 {
        let bounded = match value {
            Some(v) if !v.is_nan() => {
                let clamped = v.clamp(self.min, self.max);
                if self.integer {
                    clamped.floor()
                } else {
                    clamped
                }
            }
            _ => self.default,
        };
        if let Some(v) = value {
            if v != bounded {
                debug!("Bounded {} from {} to {}", self.name, v, bounded);
            }
        }
        bounded
    }
}

pub const TOTAL_GPUS: FieldBounds =
    FieldBounds { name: "total-gpus", min: 1.0, max: 4096.0, default: 16.0, integer: true };
pub const TRAINER_GPUS_PER_REPLICA: FieldBounds = FieldBounds {
    name: "trainer-gpus-per-replica",
    min: 0.125,
    max: 1024.0,
    default: 4.0,
    integer: false,
};
pub const TRAINER_CAPACITY_PER_REPLICA: FieldBounds = FieldBounds {
    name: "trainer-capacity-per-replica",
    min: 0.001,
    max: 1e6,
    default: 5.0,
    integer: false,
};
pub const INFERENCE_GPUS_PER_REPLICA: FieldBounds = FieldBounds {
    name: "inference-gpus-per-replica",
    min: 0.125,
    max: 1024.0,
    default: 1.0,
    integer: false,
};
pub const INFERENCE_REQS_PER_S_PER_REPLICA: FieldBounds = FieldBounds {
    name: "inference-reqs-per-s-per-replica",
    min: 0.001,
    max: 1e7,
    default: 2000.0,
    integer: false,
};
pub const ACTOR_STEPS_PER_TRAJ: FieldBounds =
    FieldBounds { name: "actor-steps-per-traj", min: 1.0, max: 1e6, default: 30.0, integer: true };
pub const ACTOR_STEPS_PER_S: FieldBounds =
    FieldBounds { name: "actor-steps-per-s", min: 0.001, max: 1e6, default: 4.0, integer: false };

pub const ALL_FIELDS: [FieldBounds; 7] = [
    TOTAL_GPUS,
    TRAINER_GPUS_PER_REPLICA,
    TRAINER_CAPACITY_PER_REPLICA,
    INFERENCE_GPUS_PER_REPLICA,
    INFERENCE_REQS_PER_S_PER_REPLICA,
    ACTOR_STEPS_PER_TRAJ,
    ACTOR_STEPS_PER_S,
];

/// Parameters exactly as a caller supplied them, before bounding.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RawParameters {
    #[serde(rename = "total-gpus")]
    pub total_gpus: Option<f64>,
    #[serde(rename = "trainer-gpus-per-replica")]
    pub trainer_gpus_per_replica: Option<f64>,
    #[serde(rename = "trainer-capacity-per-replica")]
    pub trainer_capacity_per_replica: Option<f64>,
    #[serde(rename = "trainer-capacity-unit")]
    pub trainer_capacity_unit: Option<CapacityUnit>,
    #[serde(rename = "inference-gpus-per-replica")]
    pub inference_gpus_per_replica: Option<f64>,
    #[serde(rename = "inference-reqs-per-s-per-replica")]
    pub inference_reqs_per_s_per_replica: Option<f64>,
    #[serde(rename = "actor-steps-per-traj")]
    pub actor_steps_per_traj: Option<f64>,
    #[serde(rename = "actor-steps-per-s")]
    pub actor_steps_per_s: Option<f64>,
}

impl RawParameters {
    /// Fields set in `other` replace those in `self`.
    pub fn overlay(self, other: RawParameters) -> RawParameters {
        RawParameters {
            total_gpus: other.total_gpus.or(self.total_gpus),
            trainer_gpus_per_replica: other
                .trainer_gpus_per_replica
                .or(self.trainer_gpus_per_replica),
            trainer_capacity_per_replica: other
                .trainer_capacity_per_replica
                .or(self.trainer_capacity_per_replica),
            trainer_capacity_unit: other.trainer_capacity_unit.or(self.trainer_capacity_unit),
            inference_gpus_per_replica: other
                .inference_gpus_per_replica
                .or(self.inference_gpus_per_replica),
            inference_reqs_per_s_per_replica: other
                .inference_reqs_per_s_per_replica
                .or(self.inference_reqs_per_s_per_replica),
            actor_steps_per_traj: other.actor_steps_per_traj.or(self.actor_steps_per_traj),
            actor_steps_per_s: other.actor_steps_per_s.or(self.actor_steps_per_s),
        }
    }

    /// Clamps every field into its documented range.
    pub fn bounded(&self) -> Parameters {
        Parameters {
            total_gpus: TOTAL_GPUS.bound(self.total_gpus) as u32,
            trainer_gpus_per_replica: TRAINER_GPUS_PER_REPLICA.bound(self.trainer_gpus_per_replica),
            trainer_capacity: TrainerCapacity {
                per_replica: TRAINER_CAPACITY_PER_REPLICA.bound(self.trainer_capacity_per_replica),
                unit: self.trainer_capacity_unit.unwrap_or_default(),
            },
            inference_gpus_per_replica: INFERENCE_GPUS_PER_REPLICA
                .bound(self.inference_gpus_per_replica),
            inference_reqs_per_s_per_replica: INFERENCE_REQS_PER_S_PER_REPLICA
                .bound(self.inference_reqs_per_s_per_replica),
            actor_steps_per_traj: ACTOR_STEPS_PER_TRAJ.bound(self.actor_steps_per_traj),
            actor_steps_per_s: ACTOR_STEPS_PER_S.bound(self.actor_steps_per_s),
        }
    }
}

impl Default for Parameters {
    fn default() -> Self {
        RawParameters::default().bounded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bound_falls_back_on_missing_and_nan() {
        assert_eq!(TOTAL_GPUS.bound(None), 16.0);
        assert_eq!(ACTOR_STEPS_PER_S.bound(Some(f64::NAN)), 4.0);
    }

    #[test]
    fn test_bound_clamps_out_of_range() {
        assert_eq!(TOTAL_GPUS.bound(Some(0.0)), 1.0);
        assert_eq!(TOTAL_GPUS.bound(Some(-3.0)), 1.0);
        assert_eq!(TOTAL_GPUS.bound(Some(f64::INFINITY)), 4096.0);
        assert_eq!(INFERENCE_REQS_PER_S_PER_REPLICA.bound(Some(f64::NEG_INFINITY)), 0.001);
        assert_eq!(TRAINER_GPUS_PER_REPLICA.bound(Some(2.5)), 2.5);
    }

    #[test]
    fn test_integer_fields_are_floored() {
        assert_eq!(TOTAL_GPUS.bound(Some(7.9)), 7.0);
        assert_eq!(ACTOR_STEPS_PER_TRAJ.bound(Some(30.5)), 30.0);
        assert_eq!(ACTOR_STEPS_PER_TRAJ.bound(Some(0.4)), 1.0);
    }

    #[test]
    fn test_defaults_match_field_table() {
        let params = Parameters::default();
        assert_eq!(params.total_gpus, 16);
        assert_eq!(params.trainer_gpus_per_replica, 4.0);
        assert_eq!(params.trainer_capacity, TrainerCapacity::trajectories(5.0));
        assert_eq!(params.inference_gpus_per_replica, 1.0);
        assert_eq!(params.inference_reqs_per_s_per_replica, 2000.0);
        assert_eq!(params.actor_steps_per_traj, 30.0);
        assert_eq!(params.actor_steps_per_s, 4.0);
    }

    #[test]
    fn test_overlay_prefers_later_values() {
        let file = RawParameters { total_gpus: Some(8.0), actor_steps_per_s: Some(2.0), ..Default::default() };
        let flags = RawParameters { total_gpus: Some(32.0), ..Default::default() };
        let merged = file.overlay(flags);
        assert_eq!(merged.total_gpus, Some(32.0));
        assert_eq!(merged.actor_steps_per_s, Some(2.0));
    }
}
