use anyhow::Result;
use pipeplan_core::{Configuration, ThroughputModel};
use structopt::StructOpt;

use crate::cli::render;
use crate::cli::ParamArgs;

#[derive(StructOpt, Debug)]
pub struct EvaluateCommand {
    /// GPUs given to the training stage
    #[structopt(long)]
    pub trainer_gpus: f64,

    /// GPUs given to the inference stage
    #[structopt(long)]
    pub inference_gpus: f64,

    /// Number of trajectory-generating actors
    #[structopt(long)]
    pub actors: f64,

    #[structopt(flatten)]
    pub params: ParamArgs,
}

impl EvaluateCommand {
    pub fn execute(self) -> Result<()> {
        let params = self.params.resolve()?;
        let model = ThroughputModel::new(params);
        let config = Configuration::new(self.trainer_gpus, self.inference_gpus, self.actors);

        match model.evaluate(&config) {
            Ok(report) => render::report(model.params(), &report, self.params.json),
            Err(reason) => {
                log::info!("Configuration {:?} rejected: {}", config, reason.code());
                render::infeasible(&config, reason, self.params.json)
            }
        }
    }
}
