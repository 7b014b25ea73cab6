use crate::config::{LevelParams, SolverConfig};
use crate::cube::{CubeState, MoveSequence, MoveTable};
use crate::error::{CfResult, CubeForgeError};
use crate::learned::SequenceStore;
use crate::loader;
use crate::optimizer::{Candidate, Seeker, TrialRequest};
use crate::pieces::{Level, TouchIndex};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const SCRAMBLE_SALT: u64 = 0x5EED_5C4A;

pub struct OptimizationOptions {
    pub num_threads: usize,
    pub attempts_per_worker: usize,
    pub guard_learned_reuse: bool,
    pub no_moves_to_shuffle: usize,
    pub levels: BTreeMap<Level, LevelParams>,
}

impl From<&SolverConfig> for OptimizationOptions {
    fn from(cfg: &SolverConfig) -> Self {
        Self {
            num_threads: cfg.search.resolved_workers(),
            attempts_per_worker: cfg.search.attempts_per_worker,
            guard_learned_reuse: cfg.search.guard_learned_reuse,
            no_moves_to_shuffle: cfg.run.no_moves_to_shuffle,
            levels: cfg.levels.clone(),
        }
    }
}

impl OptimizationOptions {
    fn level(&self, level: Level) -> CfResult<&LevelParams> {
        self.levels.get(&level).ok_or_else(|| {
            CubeForgeError::Config(format!("no parameters configured for level {}", level))
        })
    }
}

/// Per-level search state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Searching,
    Improved,
    StuckGrowing,
    Solved,
    Exhausted,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Solved | Phase::Exhausted)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Searching => "SEARCHING",
            Phase::Improved => "IMPROVED",
            Phase::StuckGrowing => "STUCK_GROWING",
            Phase::Solved => "SOLVED",
            Phase::Exhausted => "EXHAUSTED",
        };
        f.write_str(s)
    }
}

/// Snapshot handed to the progress callback after every round.
#[derive(Debug, Clone, Copy)]
pub struct LevelProgress {
    pub level: Level,
    pub phase: Phase,
    pub iteration: usize,
    pub max_iterations: usize,
    pub correct: usize,
    pub target: usize,
    pub move_len: usize,
    pub improvements: usize,
    pub reuses: usize,
}

/// A trait for receiving updates during a run.
/// Boolean return value indicates if the search should continue (true) or abort (false).
pub trait ProgressCallback: Send + Sync {
    fn on_progress(&self, progress: &LevelProgress) -> bool;
}

/// Callback that never aborts and reports nothing.
pub struct Silent;

impl ProgressCallback for Silent {
    fn on_progress(&self, _progress: &LevelProgress) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelStatus {
    Solved,
    Exhausted,
}

#[derive(Debug, Clone)]
pub struct LevelReport {
    pub level: Level,
    pub status: LevelStatus,
    pub start_count: usize,
    pub end_count: usize,
    pub target: usize,
    pub iterations: usize,
    /// Iteration at which the count last rose (0 when it never did).
    pub last_improvement: usize,
    pub improvements: usize,
    pub reuses: usize,
    pub recorded: usize,
    pub sequence: MoveSequence,
    pub end_state: CubeState,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub scramble: MoveSequence,
    pub start_state: CubeState,
    pub final_state: CubeState,
    pub levels: Vec<LevelReport>,
    pub sequence: MoveSequence,
    pub elapsed: Duration,
}

impl RunReport {
    pub fn is_solved(&self) -> bool {
        self.levels.len() == Level::ALL.len()
            && self.levels.iter().all(|l| l.status == LevelStatus::Solved)
    }

    pub fn total_moves(&self) -> usize {
        self.sequence.len()
    }

    pub fn iterations(&self) -> usize {
        self.levels.iter().map(|l| l.iterations).sum()
    }

    /// Run-wide iteration count at the last improvement of the last level
    /// that improved.
    pub fn last_improvement_iteration(&self) -> usize {
        let mut offset = 0;
        let mut last = 0;
        for l in &self.levels {
            if l.last_improvement > 0 {
                last = offset + l.last_improvement;
            }
            offset += l.iterations;
        }
        last
    }

    pub fn improvements(&self) -> usize {
        self.levels.iter().map(|l| l.improvements).sum()
    }

    pub fn reuses(&self) -> usize {
        self.levels.iter().map(|l| l.reuses).sum()
    }

    pub fn recorded(&self) -> usize {
        self.levels.iter().map(|l| l.recorded).sum()
    }

    /// Turns an exhausted level into `CubeForgeError::SearchExhausted`.
    pub fn ensure_solved(&self) -> CfResult<()> {
        match self
            .levels
            .iter()
            .find(|l| l.status == LevelStatus::Exhausted)
        {
            Some(l) => Err(CubeForgeError::SearchExhausted {
                level: l.level.to_string(),
                correct: l.end_count,
                target: l.target,
            }),
            None => Ok(()),
        }
    }
}

/// Derives a worker seed; each (level, round, worker) gets its own stream.
fn worker_seed(seed: u64, level: Level, round: usize, worker: usize) -> u64 {
    seed.wrapping_add((level as u64 + 1) << 48)
        .wrapping_add((round as u64) << 16)
        .wrapping_add(worker as u64)
}

pub struct Orchestrator {
    pool: rayon::ThreadPool,
    options: OptimizationOptions,
    table: Arc<MoveTable>,
    touch: Arc<TouchIndex>,
    store: Arc<dyn SequenceStore>,
}

impl Orchestrator {
    pub fn new(
        table: Arc<MoveTable>,
        store: Arc<dyn SequenceStore>,
        options: OptimizationOptions,
    ) -> CfResult<Self> {
        let threads = options.num_threads.max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("cubeforge-worker-{}", i))
            .build()
            .map_err(|e| CubeForgeError::Config(format!("cannot build worker pool: {}", e)))?;
        let touch = Arc::new(TouchIndex::new(&table));

        Ok(Self {
            pool,
            options,
            table,
            touch,
            store,
        })
    }

    pub fn options(&self) -> &OptimizationOptions {
        &self.options
    }

    pub fn table(&self) -> &MoveTable {
        &self.table
    }

    /// Runs every worker once against the same request and joins. The best
    /// count wins; ties go to the lowest worker index.
    fn run_batch(&self, seekers: &mut [Seeker], req: &TrialRequest) -> Option<Candidate> {
        let results: Vec<Option<Candidate>> = self
            .pool
            .install(|| seekers.par_iter_mut().map(|s| s.search(req)).collect());

        let mut best: Option<Candidate> = None;
        for c in results.into_iter().flatten() {
            match &best {
                Some(b) if b.count() >= c.count() => {}
                _ => best = Some(c),
            }
        }
        best
    }

    /// Drives one level from `state` until it is solved or its budget runs out.
    pub fn solve_level<CB: ProgressCallback>(
        &self,
        state: &CubeState,
        level: Level,
        seed: Option<u64>,
        callback: &CB,
    ) -> CfResult<LevelReport> {
        let params = *self.options.level(level)?;
        let target = params.target_correct_stones.min(level.piece_count());
        let threads = self.options.num_threads.max(1);

        let mut seekers: Vec<Seeker> = (0..threads)
            .map(|i| {
                Seeker::new(
                    self.table.clone(),
                    self.touch.clone(),
                    seed.map(|s| worker_seed(s, level, 0, i)),
                )
            })
            .collect();

        let mut current = *state;
        let mut correct = level.correct_pieces(&current);
        let start_count = correct.count();
        let mut sequence = MoveSequence::default();

        let mut phase = Phase::Searching;
        let mut iteration = 0usize;
        let mut last_improvement = 0usize;
        let mut move_len = 1usize;
        let mut no_improvement = 0usize;
        let mut improvements = 0usize;
        let mut reuses = 0usize;
        let mut recorded = 0usize;

        info!(
            "🧩 Level {}: {}/{} correct, budget {} iterations",
            level, start_count, target, params.max_iterations
        );

        while !phase.is_terminal() {
            // 1. Termination checks
            if correct.count() >= target {
                phase = Phase::Solved;
                break;
            }
            if iteration >= params.max_iterations {
                phase = Phase::Exhausted;
                break;
            }
            iteration += 1;

            // 2. Learned reuse
            if let Some(reuse) =
                self.store
                    .lookup(&current, level, &self.table, self.options.guard_learned_reuse)?
            {
                debug!(
                    "♻️  {} reuse '{}': {} -> {}",
                    level,
                    reuse.entry.sequence,
                    correct.count(),
                    reuse.correct.count()
                );
                sequence.extend_from(&reuse.entry.sequence);
                current = reuse.state;
                correct = reuse.correct;
                reuses += 1;
                last_improvement = iteration;
                phase = Phase::Searching;
            } else {
                // 3. Random batch
                if let Some(s) = seed {
                    for (i, seeker) in seekers.iter_mut().enumerate() {
                        seeker.rng.seed(worker_seed(s, level, iteration, i));
                    }
                }
                let req = TrialRequest {
                    state: current,
                    level,
                    move_len,
                    locked: correct,
                    attempts: self.options.attempts_per_worker,
                    variability: params.variability,
                };

                match self.run_batch(&mut seekers, &req) {
                    Some(c) if c.count() > correct.count() => {
                        phase = Phase::Improved;
                        let before = correct.count();
                        if self.store.record(before, c.count(), &c.sequence, correct)? {
                            recorded += 1;
                        }
                        info!(
                            "✨ {} iter {}: {} -> {} with '{}'",
                            level,
                            iteration,
                            before,
                            c.count(),
                            c.sequence
                        );
                        sequence.extend_from(&c.sequence);
                        current = c.state;
                        correct = c.correct;
                        improvements += 1;
                        last_improvement = iteration;
                        move_len = 1;
                        no_improvement = 0;
                    }
                    _ => {
                        no_improvement += 1;
                        if no_improvement >= params.no_improvement_threshold
                            && move_len < params.max_moves_per_sequence
                        {
                            move_len += 1;
                            no_improvement = 0;
                            phase = Phase::StuckGrowing;
                            debug!("📏 {} iter {}: move length -> {}", level, iteration, move_len);
                        } else {
                            phase = Phase::Searching;
                        }
                    }
                }
            }

            // 4. Report
            let progress = LevelProgress {
                level,
                phase,
                iteration,
                max_iterations: params.max_iterations,
                correct: correct.count(),
                target,
                move_len,
                improvements,
                reuses,
            };
            if !callback.on_progress(&progress) {
                warn!("🛑 {} aborted by callback at iteration {}", level, iteration);
                phase = Phase::Exhausted;
            } else if !phase.is_terminal() {
                phase = Phase::Searching;
            }
        }

        // A state may reach the target on the aborting round.
        let status = if correct.count() >= target {
            LevelStatus::Solved
        } else {
            LevelStatus::Exhausted
        };

        match status {
            LevelStatus::Solved => info!(
                "✅ Level {} solved in {} iterations ({} moves)",
                level,
                iteration,
                sequence.len()
            ),
            LevelStatus::Exhausted => warn!(
                "⏳ Level {} exhausted at {}/{} after {} iterations",
                level,
                correct.count(),
                target,
                iteration
            ),
        }

        Ok(LevelReport {
            level,
            status,
            start_count,
            end_count: correct.count(),
            target,
            iterations: iteration,
            last_improvement,
            improvements,
            reuses,
            recorded,
            sequence,
            end_state: current,
        })
    }

    /// Scrambles `start` (when configured) and solves E1, E2, E3 in order,
    /// stopping at the first exhausted level.
    pub fn run<CB: ProgressCallback>(
        &self,
        start: &CubeState,
        seed: Option<u64>,
        callback: &CB,
    ) -> CfResult<RunReport> {
        let started = Instant::now();

        let mut rng = match seed {
            Some(s) => fastrand::Rng::with_seed(s ^ SCRAMBLE_SALT),
            None => fastrand::Rng::new(),
        };
        let (start_state, scramble) = loader::shuffle(
            start,
            self.options.no_moves_to_shuffle,
            &self.table,
            &mut rng,
        );
        if !scramble.is_empty() {
            info!("🔀 Scrambled with {} moves: {}", scramble.len(), scramble);
        }

        let mut state = start_state;
        let mut sequence = MoveSequence::default();
        let mut levels = Vec::with_capacity(Level::ALL.len());

        for level in Level::ALL {
            let report = self.solve_level(&state, level, seed, callback)?;
            state = report.end_state;
            sequence.extend_from(&report.sequence);
            let exhausted = report.status == LevelStatus::Exhausted;
            levels.push(report);
            if exhausted {
                break;
            }
        }

        Ok(RunReport {
            scramble,
            start_state,
            final_state: state,
            levels,
            sequence,
            elapsed: started.elapsed(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_seeds_differ_per_slot() {
        let a = worker_seed(1, Level::E1, 1, 0);
        assert_ne!(a, worker_seed(1, Level::E1, 1, 1));
        assert_ne!(a, worker_seed(1, Level::E1, 2, 0));
        assert_ne!(a, worker_seed(1, Level::E2, 1, 0));
    }

    #[test]
    fn test_ensure_solved_reports_first_exhausted_level() {
        let level = LevelReport {
            level: Level::E2,
            status: LevelStatus::Exhausted,
            start_count: 8,
            end_count: 10,
            target: 12,
            iterations: 5,
            last_improvement: 3,
            improvements: 1,
            reuses: 0,
            recorded: 1,
            sequence: MoveSequence::default(),
            end_state: CubeState::solved(),
        };
        let report = RunReport {
            scramble: MoveSequence::default(),
            start_state: CubeState::solved(),
            final_state: CubeState::solved(),
            levels: vec![level],
            sequence: MoveSequence::default(),
            elapsed: Duration::ZERO,
        };
        match report.ensure_solved() {
            Err(CubeForgeError::SearchExhausted {
                level,
                correct,
                target,
            }) => {
                assert_eq!(level, "E2");
                assert_eq!((correct, target), (10, 12));
            }
            other => panic!("expected SearchExhausted, got {:?}", other),
        }
        assert!(!report.is_solved());
    }
}
