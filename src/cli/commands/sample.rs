//! Sample command - draw states matching predicates

use anyhow::Result;
use clap::Parser;
use rand::{SeedableRng, rngs::StdRng};

use super::GameArgs;
use crate::{
    cli::output::{format_number, print_kv, print_record, print_section},
    config::SamplerConfig,
    dataset::build_sampler,
};

#[derive(Parser, Debug)]
#[command(about = "Sample enumerated states through predicates")]
pub struct SampleArgs {
    #[command(flatten)]
    pub game: GameArgs,

    /// Predicate over record fields, e.g. "freespace >= 4 and not terminal"
    #[arg(long = "where", value_name = "EXPR")]
    pub predicates: Vec<String>,

    /// Number of states to draw
    #[arg(short = 'k', long, default_value_t = 1)]
    pub k: usize,

    /// Sample without replacement
    #[arg(long)]
    pub no_replace: bool,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Stop expanding states at this ply
    #[arg(long)]
    pub max_depth: Option<usize>,
}

pub fn execute(args: SampleArgs) -> Result<()> {
    let game = args.game.build()?;

    let config = SamplerConfig {
        max_depth: args.max_depth,
        predicates: args.predicates.clone(),
        ..SamplerConfig::default()
    }
    .with_sample(args.k, !args.no_replace);
    let sampler = build_sampler(&config, &game)?;

    print_section("Sampler");
    print_kv("states", &format_number(sampler.dataset().len()));
    print_kv("matching", &format_number(sampler.len()));
    for predicate in sampler.predicates() {
        print_kv("where", &predicate.to_string());
    }
    print_kv(
        "draw",
        &format!(
            "{} {}",
            sampler.k(),
            if sampler.replace() {
                "with replacement"
            } else {
                "without replacement"
            }
        ),
    );

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let samples = sampler.samples(&mut rng);

    print_section("Samples");
    if samples.is_empty() {
        println!("  (no states matched)");
    }
    for (i, record) in samples.iter().enumerate() {
        print_record(i + 1, record);
    }

    Ok(())
}
