extern crate cup_sim;

mod common;

use std::path::PathBuf;

use clap::Parser;
use common::TracingArgs;
use cup_sim::ranking::{RankingEntry, RankingTable};
use cup_sim::tournament::{TournamentBuilder, TournamentConfig};

#[derive(Parser, Debug)]
#[command(
    name = "world_cup",
    about = "Simulate a football tournament",
    long_about = "Draws the teams into groups, plays every group as a round robin and\n\
                  runs the best teams of each group through a knockout bracket.\n\
                  Team strength comes from a ranking snapshot."
)]
struct Args {
    /// Teams taking part. Defaults to eight well known nations.
    teams: Vec<String>,

    /// JSON ranking snapshot: an array of {"rank", "country", "points"}
    #[arg(short = 'r', long = "rankings")]
    rankings: Option<PathBuf>,

    /// JSON tournament configuration, missing fields use the defaults
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Teams per group
    #[arg(short = 'g', long = "group-size")]
    group_size: Option<usize>,

    /// Teams qualifying from every group
    #[arg(long = "qualifiers")]
    qualifiers_per_group: Option<usize>,

    /// Extra qualifiers from the best teams below the qualifying places
    #[arg(long = "best-placed")]
    best_placed: Option<usize>,

    /// Skip the third place play-off
    #[arg(long = "no-third-place")]
    no_third_place: bool,

    /// Optional directory to save result.json, summary.json and summary.md
    #[arg(short = 'o', long = "output-dir")]
    output_dir: Option<PathBuf>,

    /// Optional random seed for reproducibility
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    #[command(flatten)]
    tracing: TracingArgs,
}

const DEFAULT_TEAMS: [&str; 8] = [
    "Polska", "Niemcy", "Hiszpania", "Brazylia", "Francja", "Anglia", "Argentyna", "Meksyk",
];

/// A small ranking snapshot used when no file is given.
fn builtin_rankings() -> RankingTable {
    RankingTable::new(vec![
        RankingEntry::new(1, "Argentina", 1867.25),
        RankingEntry::new(2, "France", 1859.78),
        RankingEntry::new(3, "Spain", 1853.27),
        RankingEntry::new(4, "England", 1813.81),
        RankingEntry::new(5, "Brazil", 1775.85),
        RankingEntry::new(6, "Netherlands", 1747.55),
        RankingEntry::new(7, "Portugal", 1740.54),
        RankingEntry::new(8, "Belgium", 1735.75),
        RankingEntry::new(9, "Italy", 1718.31),
        RankingEntry::new(10, "Germany", 1716.98),
        RankingEntry::new(11, "Croatia", 1698.66),
        RankingEntry::new(12, "Morocco", 1694.24),
        RankingEntry::new(15, "Japan", 1652.64),
        RankingEntry::new(16, "United States", 1645.48),
        RankingEntry::new(17, "Mexico", 1646.94),
        RankingEntry::new(21, "Denmark", 1621.41),
        RankingEntry::new(23, "Korea, South", 1574.38),
        RankingEntry::new(35, "Poland", 1531.39),
    ])
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    args.tracing.init_tracing();

    let rankings = match &args.rankings {
        Some(path) => RankingTable::from_json_file(path)?,
        None => builtin_rankings(),
    };

    let mut config = match &args.config {
        Some(path) => TournamentConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => TournamentConfig::default(),
    };
    if let Some(group_size) = args.group_size {
        config.group_size = group_size;
    }
    if let Some(qualifiers) = args.qualifiers_per_group {
        config.qualifiers_per_group = qualifiers;
    }
    if let Some(best_placed) = args.best_placed {
        config.best_placed_qualifiers = best_placed;
    }
    if args.no_third_place {
        config.third_place_playoff = false;
    }

    let mut builder = TournamentBuilder::new().config(config).rankings(rankings);
    if let Some(seed) = args.seed {
        builder = builder.seed(seed);
    }
    builder = if args.teams.is_empty() {
        builder.add_teams(DEFAULT_TEAMS)
    } else {
        builder.add_teams(args.teams.clone())
    };

    let tournament = builder.build()?;
    let result = tournament.run()?;

    println!("{}", result.to_markdown());

    if let Some(output_dir) = &args.output_dir {
        result.save_to_dir(output_dir)?;
        println!("Results saved to {}", output_dir.display());
    }

    Ok(())
}
