// core/src/lib.rs
//! Capacity planner for a three-stage rollout pipeline: actors generate
//! environment steps, an inference pool serves them, and a trainer pool
//! consumes the resulting trajectories. All three share one GPU pool.

pub mod config;
pub mod planner;
pub mod utils;

pub use planner::allocator::{Allocator, PartitionOutcome};
pub use planner::bounds::{FieldBounds, RawParameters};
pub use planner::throughput::ThroughputModel;
pub use utils::models::{
    Bottleneck, Configuration, Infeasible, Parameters, Report, TrainerCapacity,
};
