use super::Paths;
use crate::reports;
use chrono::Local;
use clap::Args;
use cubeforge::config::SearchParams;
use cubeforge::error::CfResult;
use cubeforge::learned::{CsvStore, SequenceStore};
use cubeforge::loader;
use cubeforge::optimizer::recall_run;
use cubeforge::pieces::Level;
use cubeforge::results::{append_result, ResultRow};
use tracing::{info, warn};

#[derive(Args, Debug, Clone)]
pub struct RecallArgs {
    #[command(flatten)]
    pub search: SearchParams,

    /// JSON solver config used instead of the parameter sheet
    #[arg(long)]
    pub config: Option<String>,

    /// Do not append to the results file
    #[arg(long, default_value_t = false)]
    pub no_save: bool,
}

pub fn run(args: RecallArgs, paths: &Paths) -> CfResult<()> {
    let mut rng = super::seeded_rng(args.search.seed);
    let config = super::load_config(paths, args.search.clone(), args.config.as_deref(), &mut rng)?;

    let table = loader::load_move_table(paths.mappings.as_deref())?;
    let original = loader::load_start_position(&paths.start)?;
    let store = CsvStore::open(&paths.learned)?;
    let entries = store.entries()?;
    if entries.is_empty() {
        warn!("⚠️  No learned sequences in {}", paths.learned);
        return Ok(());
    }

    let level = Level::E3;
    let budget = config.level(level)?.max_iterations;
    reports::print_cube_net("START", &original);

    for run_id in 1..=config.run.total_runs {
        info!("➡️  Recall run #{} of {}", run_id, config.run.total_runs);
        let started = Local::now();

        // One scramble per run; every attempt in the run starts from it.
        let (start, scramble) =
            loader::shuffle(&original, config.run.no_moves_to_shuffle, &table, &mut rng);
        if !scramble.is_empty() {
            info!("🔀 Scrambled with {} moves: {}", scramble.len(), scramble);
        }

        let shuffle = if args.search.shuffle_learned {
            Some(&mut rng)
        } else {
            None
        };
        let outcome = recall_run(
            &start,
            level,
            &table,
            &entries,
            budget,
            config.run.solutions_per_run,
            shuffle,
        );

        reports::print_recall_summary(run_id, &outcome);

        if !args.no_save {
            for s in &outcome.solutions {
                let row = ResultRow::new(run_id, started, &start, s.elapsed, s.iterations, &s.moves);
                append_result(&paths.results, &row)?;
            }
        }
    }

    Ok(())
}
