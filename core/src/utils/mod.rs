// core/src/utils/mod.rs
pub mod logging;
pub mod models;

// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE_NAME: &str = "default.json";

// Ratios this many ULPs from an integer count as that integer when sizing replicas
pub const REPLICA_SNAP_ULPS: f64 = 4.0;
