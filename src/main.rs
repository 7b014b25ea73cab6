// ===== cubeforge/src/main.rs =====
use clap::{Parser, Subcommand};
use std::process;
use tracing::{error, info};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Start position CSV (row 2 holds the 54 color codes)
    #[arg(global = true, short = 'p', long, default_value = "data/start_position.csv")]
    start: String,

    /// Move table JSON; the built-in quarter turns are used when omitted
    #[arg(global = true, short, long)]
    mappings: Option<String>,

    /// Parameter sheet CSV
    #[arg(global = true, long, default_value = "data/parameters.csv")]
    params: String,

    /// Parameter set (column) to use; random when omitted
    #[arg(global = true, long)]
    set: Option<String>,

    /// Learned sequence store
    #[arg(global = true, short, long, default_value = "data/improvements.csv")]
    learned: String,

    /// Results file
    #[arg(global = true, short, long, default_value = "data/results.csv")]
    results: String,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search level by level, learning new sequences on the way
    Solve(cmd::solve::SolveArgs),
    /// Chain learned sequences only, without random search
    Recall(cmd::recall::RecallArgs),
    /// Apply a move sequence to the start position and show the result
    Apply(cmd::apply::ApplyArgs),
    /// Export the move table as JSON
    Mappings(cmd::mappings::MappingsArgs),
}

fn main() {
    let cli = Cli::parse();

    let max_level = if cli.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(max_level).init();

    info!("🚀 Initializing CubeForge...");

    let paths = cmd::Paths {
        start: cli.start,
        mappings: cli.mappings,
        params: cli.params,
        set: cli.set,
        learned: cli.learned,
        results: cli.results,
    };

    let outcome = match cli.command {
        Commands::Solve(args) => cmd::solve::run(args, &paths),
        Commands::Recall(args) => cmd::recall::run(args, &paths),
        Commands::Apply(args) => cmd::apply::run(args, &paths),
        Commands::Mappings(args) => cmd::mappings::run(args, &paths),
    };

    if let Err(e) = outcome {
        error!("❌ {}", e);
        process::exit(1);
    }
}
