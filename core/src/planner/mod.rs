// core/src/planner/mod.rs
pub mod allocator;
pub mod bounds;
pub mod throughput;
