//! Compare command - agreement between policies on sampled states

use std::{fs, path::PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::Parser;

use crate::{
    cli::output::create_spinner,
    comparison::Experiment,
    config::{self, ExperimentConfig},
};

#[derive(Parser, Debug)]
#[command(about = "Compare policies on sampled states")]
pub struct CompareArgs {
    /// Experiment configuration (JSON)
    #[arg(long, short = 'c')]
    pub config: PathBuf,

    /// Override the configured seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Also write the JSON report to this file
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn execute(args: CompareArgs) -> Result<()> {
    let config: ExperimentConfig = config::load_json(&args.config)
        .with_context(|| format!("loading experiment {}", args.config.display()))?;

    let experiment = Experiment::from_config(&config)?;
    if experiment.sampler().is_empty() {
        return Err(anyhow!(
            "sampler yielded 0 states; check the predicates of '{}'",
            config.experiment_name
        ));
    }

    let spinner = create_spinner("Comparing policies")?;
    let report = experiment.run_seeded(args.seed.or(config.seed));
    spinner.finish_and_clear();

    let json = serde_json::to_string_pretty(&report)?;
    println!("{json}");

    if let Some(path) = &args.output {
        fs::write(path, &json).with_context(|| format!("writing report {}", path.display()))?;
    }

    Ok(())
}
