// Presentation of planner records. Values are printed as computed, never re-derived.
use anyhow::{Context, Result};
use colored::*;
use pipeplan_core::{Bottleneck, Configuration, Infeasible, Parameters, Report};
use serde_json::json;

fn print_json(value: &serde_json::Value) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to serialize result")?;
    println!("{}", text);
    Ok(())
}

fn stage_label(label: &str, stage: Bottleneck, bottleneck: Bottleneck) -> ColoredString {
    if stage == bottleneck || (bottleneck == Bottleneck::Env && stage != Bottleneck::Trainer) {
        label.red().bold()
    } else {
        label.green()
    }
}

pub fn report(params: &Parameters, report: &Report, as_json: bool) -> Result<()> {
    if as_json {
        return print_json(&json!({ "valid": true, "params": params, "report": report }));
    }

    let b = report.bottleneck;
    println!(
        "{} Split: {} trainer GPUs / {} inference GPUs, {} actors (pool {})",
        "[INFO]".blue(),
        report.config.trainer_gpus.to_string().yellow(),
        report.config.inference_gpus.to_string().yellow(),
        report.config.actors.to_string().yellow(),
        params.total_gpus
    );
    println!("  {:<24} {}", "Trainer replicas:".green(), report.trainer_replicas);
    println!("  {:<24} {}", "Inference replicas:".green(), report.inference_replicas);
    println!(
        "  {:<24} {:.3} steps/s",
        stage_label("Actor demand:", Bottleneck::Actors, b),
        report.generation_demand
    );
    println!(
        "  {:<24} {:.3} steps/s",
        stage_label("Inference capacity:", Bottleneck::Inference, b),
        report.inference_capacity
    );
    println!("  {:<24} {:.3} steps/s", "Generation rate:".green(), report.generation_rate);
    println!("  {:<24} {:.3} traj/s", "Rollout rate:".green(), report.rollout_traj_rate);
    println!(
        "  {:<24} {:.3} traj/s",
        stage_label("Trainer capacity:", Bottleneck::Trainer, b),
        report.trainer_traj_rate
    );
    println!(
        "  {:<24} {}",
        "Throughput:".green(),
        format!("{:.3} traj/s", report.trajectories_per_second).bold()
    );
    println!(
        "  {:<24} {}",
        "Samples:".green(),
        format!("{:.3} samples/s", report.samples_per_second).bold()
    );
    println!("  {:<24} {}", "Bottleneck:".green(), b.to_string().red().bold());
    Ok(())
}

pub fn infeasible(config: &Configuration, reason: Infeasible, as_json: bool) -> Result<()> {
    if as_json {
        return print_json(&json!({ "valid": false, "config": config, "reason": reason }));
    }
    println!("{} Configuration cannot run: {}", "[WARN]".yellow(), reason.to_string().italic());
    Ok(())
}

pub fn no_feasible(params: &Parameters, as_json: bool) -> Result<()> {
    if as_json {
        return print_json(&json!({
            "valid": false,
            "params": params,
            "reason": "no_feasible_configuration",
        }));
    }
    println!(
        "{} No feasible configuration: no split of {} GPUs fits both a trainer ({} GPUs) and an inference replica ({} GPUs).",
        "[WARN]".yellow(),
        params.total_gpus,
        params.trainer_gpus_per_replica,
        params.inference_gpus_per_replica
    );
    Ok(())
}
