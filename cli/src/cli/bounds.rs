use anyhow::{Context, Result};
use colored::*;
use pipeplan_core::planner::bounds::ALL_FIELDS;
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
pub struct BoundsCommand {
    /// Print the table as JSON
    #[structopt(long)]
    pub json: bool,
}

impl BoundsCommand {
    pub fn execute(self) -> Result<()> {
        if self.json {
            let text = serde_json::to_string_pretty(&ALL_FIELDS)
                .context("Failed to serialize parameter bounds")?;
            println!("{}", text);
            return Ok(());
        }

        println!(
            "{}",
            format!("{:<34} {:<10} {:<12} {:<10} {:<8}", "Field", "Min", "Max", "Default", "Integer")
                .bold()
                .underline()
        );
        for field in ALL_FIELDS.iter() {
            println!(
                "{:<34} {:<10} {:<12} {:<10} {:<8}",
                field.name.cyan(),
                field.min,
                field.max,
                field.default,
                if field.integer { "yes" } else { "no" }
            );
        }
        println!(
            "{} Missing or non-numeric values use the default; others are clamped.",
            "[INFO]".blue()
        );
        Ok(())
    }
}
