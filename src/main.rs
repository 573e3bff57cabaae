use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use epiwis::error::Result;
use epiwis::logging::init_tracing;
use epiwis::{MissingPolicy, ScoreRun, ScoringConfig, run_pipeline};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum MissingArg {
    Reject,
    Skip,
}

impl From<MissingArg> for MissingPolicy {
    fn from(arg: MissingArg) -> Self {
        match arg {
            MissingArg::Reject => MissingPolicy::Reject,
            MissingArg::Skip => MissingPolicy::Skip,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "epiwis")]
#[command(about = "Interval and weighted interval scoring for epidemic forecasts", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score prediction files against observations and write reports
    Score(ScoreArgs),
}

#[derive(clap::Args, Debug)]
struct ScoreArgs {
    /// Observations table (location, date, value)
    #[arg(long)]
    observations: PathBuf,

    /// One or more prediction tables
    #[arg(long, required = true, num_args = 1..)]
    predictions: Vec<PathBuf>,

    /// Output directory
    #[arg(long)]
    out: PathBuf,

    /// Interval ranges in percent, comma separated
    #[arg(long, value_delimiter = ',')]
    ranges: Option<Vec<f64>>,

    /// JSON scoring configuration; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Score the intersection when predicted and observed keys differ
    #[arg(long)]
    allow_mismatch: bool,

    /// What to do with identifiers that carry a missing value
    #[arg(long, value_enum)]
    missing: Option<MissingArg>,

    /// Score intervals only; a 0.5 quantile is ignored if present
    #[arg(long)]
    no_median: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        // Messages already embed their sources.
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Score(args) => {
            let run = build_run(args)?;
            let summary = run_pipeline(&run)?;
            tracing::info!(
                matched = summary.n_matched,
                wis_mean = summary.wis_mean,
                out = %run.out_dir.display(),
                "done"
            );
            Ok(())
        }
    }
}

fn build_run(args: ScoreArgs) -> Result<ScoreRun> {
    let mut config = match &args.config {
        Some(path) => ScoringConfig::load(path)?,
        None => ScoringConfig::default(),
    };
    if let Some(ranges) = args.ranges {
        config.interval_ranges = ranges;
    }
    if args.allow_mismatch {
        config.allow_mismatch = true;
    }
    if let Some(missing) = args.missing {
        config.missing = missing.into();
    }
    if args.no_median {
        config.require_median = false;
        config.include_median = false;
    }

    Ok(ScoreRun {
        observations: args.observations,
        predictions: args.predictions,
        out_dir: args.out,
        config,
    })
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
