use anyhow::{Context, Result};
use colored::*;
use pipeplan_core::Allocator;
use structopt::StructOpt;

use crate::cli::render;
use crate::cli::ParamArgs;

#[derive(StructOpt, Debug)]
pub struct SweepCommand {
    /// Only list splits that can run
    #[structopt(long)]
    pub feasible_only: bool,

    #[structopt(flatten)]
    pub params: ParamArgs,
}

impl SweepCommand {
    pub fn execute(self) -> Result<()> {
        let params = self.params.resolve()?;
        let allocator = Allocator::from_params(params);
        let mut partitions = allocator.sweep();
        if self.feasible_only {
            partitions.retain(|partition| partition.outcome.is_ok());
        }

        if self.params.json {
            let text = serde_json::to_string_pretty(&partitions)
                .context("Failed to serialize sweep")?;
            println!("{}", text);
            return Ok(());
        }

        if partitions.is_empty() {
            return render::no_feasible(allocator.model().params(), false);
        }

        // Same strict-greater rule as the optimizer so the marked row matches it
        let mut best: Option<(u32, f64)> = None;
        for partition in &partitions {
            if let Some(report) = partition.report() {
                if best.map_or(true, |(_, samples)| report.samples_per_second > samples) {
                    best = Some((partition.trainer_gpus, report.samples_per_second));
                }
            }
        }
        let best_gt = best.map(|(gt, _)| gt);

        println!(
            "{}",
            format!(
                "{:<6} {:<6} {:<5} {:<5} {:<10} {:<14} {:<14} {:<11}",
                "gT", "gI", "nT", "nI", "Actors", "Traj/s", "Samples/s", "Bottleneck"
            )
            .bold()
            .underline()
        );
        for partition in &partitions {
            let line = match &partition.outcome {
                Ok(report) => format!(
                    "{:<6} {:<6} {:<5} {:<5} {:<10} {:<14.3} {:<14.3} {:<11}",
                    partition.trainer_gpus,
                    partition.inference_gpus,
                    report.trainer_replicas,
                    report.inference_replicas,
                    report.config.actors,
                    report.trajectories_per_second,
                    report.samples_per_second,
                    report.bottleneck
                ),
                Err(reason) => format!(
                    "{:<6} {:<6} {}",
                    partition.trainer_gpus,
                    partition.inference_gpus,
                    reason.code()
                ),
            };
            if Some(partition.trainer_gpus) == best_gt {
                println!("{} {}", line.green().bold(), "<- best".green());
            } else if partition.outcome.is_err() {
                println!("{}", line.dimmed());
            } else {
                println!("{}", line);
            }
        }
        Ok(())
    }
}
