mod bounds;
mod evaluate;
mod optimize;
mod render;
mod sweep;

use anyhow::{Context, Result};
use pipeplan_core::config::PlannerConfig;
use pipeplan_core::utils::logging::{self, LoggingError};
use pipeplan_core::utils::models::CapacityUnit;
use pipeplan_core::{Parameters, RawParameters};
use std::{env, path::PathBuf};
use structopt::{clap::AppSettings, StructOpt};

use self::{
    bounds::BoundsCommand, evaluate::EvaluateCommand, optimize::OptimizeCommand,
    sweep::SweepCommand,
};

// Level used when neither the config file nor the flags name one
const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(StructOpt, Debug)]
#[structopt(
    name = "pipeplan",
    about = "Capacity planner for actor / inference / trainer pipelines sharing a GPU pool",
    global_settings = &[AppSettings::DisableHelpSubcommand, AppSettings::AllowNegativeNumbers]
)]
pub enum AppCommand {
    /// Evaluate one trainer/inference/actor configuration
    #[structopt(name = "evaluate")]
    Evaluate(EvaluateCommand),

    /// Find the GPU split with the highest samples/s
    #[structopt(name = "optimize")]
    Optimize(OptimizeCommand),

    /// Show every trainer/inference split of the pool
    #[structopt(name = "sweep")]
    Sweep(SweepCommand),

    /// Print accepted parameter ranges and defaults
    #[structopt(name = "bounds")]
    Bounds(BoundsCommand),
}

impl AppCommand {
    pub fn execute(self) -> Result<()> {
        match self {
            AppCommand::Evaluate(cmd) => cmd.execute(),
            AppCommand::Optimize(cmd) => cmd.execute(),
            AppCommand::Sweep(cmd) => cmd.execute(),
            AppCommand::Bounds(cmd) => cmd.execute(),
        }
    }
}

/// Pipeline parameter flags shared by every planning subcommand.
/// Flags override the matching keys of the config file.
#[derive(StructOpt, Debug)]
pub struct ParamArgs {
    /// Optional path to config file (defaults to ./default.json when present)
    #[structopt(long, parse(from_os_str))]
    config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error)
    #[structopt(long)]
    log_level: Option<String>,

    /// Size of the shared GPU pool
    #[structopt(long)]
    total_gpus: Option<f64>,

    /// GPUs consumed by one training replica
    #[structopt(long)]
    trainer_gpus_per_replica: Option<f64>,

    /// Throughput of one training replica
    #[structopt(long)]
    trainer_capacity: Option<f64>,

    /// Unit of --trainer-capacity: trajectories (default) or steps
    #[structopt(long)]
    trainer_capacity_unit: Option<CapacityUnit>,

    /// GPUs consumed by one inference replica
    #[structopt(long)]
    inference_gpus_per_replica: Option<f64>,

    /// Requests (environment steps) per second served by one inference replica
    #[structopt(long = "inference-reqs-per-s")]
    inference_reqs_per_s: Option<f64>,

    /// Environment steps per trajectory
    #[structopt(long)]
    actor_steps_per_traj: Option<f64>,

    /// Environment steps generated per second by one actor
    #[structopt(long)]
    actor_steps_per_s: Option<f64>,

    /// Print the result as JSON
    #[structopt(long)]
    pub json: bool,
}

impl ParamArgs {
    fn overrides(&self) -> RawParameters {
        RawParameters {
            total_gpus: self.total_gpus,
            trainer_gpus_per_replica: self.trainer_gpus_per_replica,
            trainer_capacity_per_replica: self.trainer_capacity,
            trainer_capacity_unit: self.trainer_capacity_unit,
            inference_gpus_per_replica: self.inference_gpus_per_replica,
            inference_reqs_per_s_per_replica: self.inference_reqs_per_s,
            actor_steps_per_traj: self.actor_steps_per_traj,
            actor_steps_per_s: self.actor_steps_per_s,
        }
    }

    /// Reads the config file, starts logging and returns bounded parameters.
    pub fn resolve(&self) -> Result<Parameters> {
        let current_dir = env::current_dir().context("Failed to get current directory")?;
        let config = PlannerConfig::resolve(self.config.as_deref(), &current_dir)
            .context("Failed to load planner config")?;

        let level = self
            .log_level
            .as_deref()
            .or(config.log_level.as_deref())
            .unwrap_or(DEFAULT_LOG_LEVEL);
        // A logger installed earlier in the process keeps serving
        match logging::init(logging::parse_level(level), config.log_path.as_deref()) {
            Ok(()) | Err(LoggingError::AlreadySet(_)) => {}
            Err(e) => return Err(e).context("Failed to initialize logger"),
        }

        let raw = config.parameters.overlay(self.overrides());
        let params = raw.bounded();
        log::debug!("Resolved parameters: {:?}", params);
        Ok(params)
    }
}
