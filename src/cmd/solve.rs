use super::Paths;
use crate::reports;
use chrono::Local;
use clap::Args;
use cubeforge::config::SearchParams;
use cubeforge::error::CfResult;
use cubeforge::learned::{CsvStore, SequenceStore};
use cubeforge::loader;
use cubeforge::optimizer::{LevelProgress, OptimizationOptions, Orchestrator, ProgressCallback};
use cubeforge::results::{append_result, ResultRow};
use std::sync::Arc;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct SolveArgs {
    #[command(flatten)]
    pub search: SearchParams,

    /// JSON solver config used instead of the parameter sheet
    #[arg(long)]
    pub config: Option<String>,

    /// Do not append to the results file
    #[arg(long, default_value_t = false)]
    pub no_save: bool,

    /// Fail when a level is exhausted
    #[arg(long, default_value_t = false)]
    pub strict: bool,
}

struct CliLogger;
impl ProgressCallback for CliLogger {
    fn on_progress(&self, p: &LevelProgress) -> bool {
        if p.iteration % 100 == 0 {
            info!(
                "{} It {:5}/{} | {:2}/{} correct | len {} | +{} ♻️{} | {}",
                p.level,
                p.iteration,
                p.max_iterations,
                p.correct,
                p.target,
                p.move_len,
                p.improvements,
                p.reuses,
                p.phase
            );
        }
        true
    }
}

pub fn run(args: SolveArgs, paths: &Paths) -> CfResult<()> {
    let mut rng = super::seeded_rng(args.search.seed);
    let config = super::load_config(paths, args.search.clone(), args.config.as_deref(), &mut rng)?;

    let table = Arc::new(loader::load_move_table(paths.mappings.as_deref())?);
    let start = loader::load_start_position(&paths.start)?;
    let store: Arc<dyn SequenceStore> = Arc::new(CsvStore::open(&paths.learned)?);

    let options = OptimizationOptions::from(&config);
    info!(
        "🔥 {} workers x {} attempts per batch",
        options.num_threads, options.attempts_per_worker
    );
    let orchestrator = Orchestrator::new(table, store.clone(), options)?;

    reports::print_cube_net("START", &start);
    reports::print_piece_status(&start);

    for run_id in 1..=config.run.total_runs {
        info!("➡️  Run #{} of {}", run_id, config.run.total_runs);
        let started = Local::now();
        let seed = args.search.seed.map(|s| s.wrapping_add(run_id as u64 * 100));

        let report = orchestrator.run(&start, seed, &CliLogger)?;

        reports::print_run_summary(run_id, &report);
        reports::print_cube_net("FINAL", &report.final_state);
        reports::print_piece_status(&report.final_state);

        if !args.no_save {
            let row = ResultRow::new(
                run_id,
                started,
                &report.start_state,
                report.elapsed,
                report.last_improvement_iteration(),
                &report.sequence,
            );
            append_result(&paths.results, &row)?;
        }

        if args.strict {
            report.ensure_solved()?;
        }
    }

    info!("📚 Learned store now holds {} entries", store.len()?);
    Ok(())
}
