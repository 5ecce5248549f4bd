//! Enumerate command - count every reachable state of a game

use std::{collections::BTreeMap, time::Instant};

use anyhow::Result;
use clap::Parser;

use super::{GameArgs, describe_game};
use crate::{
    cli::output::{format_number, format_percent, print_section, print_stats_table, print_subsection},
    dataset::{OutcomeLabel, ProgressObserver, StateDataset},
    ports::NoopObserver,
};

#[derive(Parser, Debug)]
#[command(about = "Enumerate every reachable state of a game")]
pub struct EnumerateArgs {
    #[command(flatten)]
    pub game: GameArgs,

    /// Stop expanding states at this ply
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Hide the progress spinner
    #[arg(long)]
    pub quiet: bool,
}

pub fn execute(args: EnumerateArgs) -> Result<()> {
    let game = args.game.build()?;

    print_section("Game");
    print_stats_table(&describe_game(&game));

    let started = Instant::now();
    let dataset = if args.quiet {
        StateDataset::generate_observed(&game, args.max_depth, &mut NoopObserver)?
    } else {
        StateDataset::generate_observed(&game, args.max_depth, &mut ProgressObserver::new())?
    };
    let elapsed = started.elapsed();

    let total = dataset.len();
    let terminal = dataset.iter().filter(|r| r.state.is_terminal()).count();
    let count_label = |label: OutcomeLabel| dataset.iter().filter(|r| r.outcome == label).count();

    print_section("States");
    print_stats_table(&[
        ("total", format_number(total)),
        (
            "terminal",
            format!("{} ({})", format_number(terminal), format_percent(terminal, total)),
        ),
        ("winning", format_number(count_label(OutcomeLabel::Winning))),
        ("tied", format_number(count_label(OutcomeLabel::Tied))),
        ("losing", format_number(count_label(OutcomeLabel::Losing))),
        ("elapsed", format!("{:.2?}", elapsed)),
    ]);

    let mut per_ply: BTreeMap<usize, usize> = BTreeMap::new();
    for record in &dataset {
        *per_ply.entry(record.ply).or_default() += 1;
    }
    print_subsection("States per ply");
    for (ply, count) in per_ply {
        println!("  {ply:>4}  {:>12}", format_number(count));
    }

    Ok(())
}
