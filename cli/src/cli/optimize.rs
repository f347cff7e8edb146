use anyhow::Result;
use pipeplan_core::Allocator;
use structopt::StructOpt;

use crate::cli::render;
use crate::cli::ParamArgs;

#[derive(StructOpt, Debug)]
pub struct OptimizeCommand {
    #[structopt(flatten)]
    pub params: ParamArgs,
}

impl OptimizeCommand {
    pub fn execute(self) -> Result<()> {
        let params = self.params.resolve()?;
        let allocator = Allocator::from_params(params);

        match allocator.compute_best_config() {
            Some(report) => render::report(allocator.model().params(), &report, self.params.json),
            None => render::no_feasible(allocator.model().params(), self.params.json),
        }
    }
}
