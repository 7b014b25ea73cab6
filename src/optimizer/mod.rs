// ===== cubeforge/src/optimizer/mod.rs =====
pub mod mutation;
pub mod recall;
pub mod runner;

use crate::cube::{CubeState, Move, MoveSequence, MoveTable};
use crate::pieces::{Level, PieceMask, TouchIndex};
use std::sync::Arc;

/// Inputs for one worker batch slot. All workers in a batch share one request.
#[derive(Debug, Clone, Copy)]
pub struct TrialRequest {
    pub state: CubeState,
    pub level: Level,
    pub move_len: usize,
    /// Pieces correct in `state`; no trial may leave one of them broken.
    pub locked: PieceMask,
    pub attempts: usize,
    pub variability: u8,
}

impl TrialRequest {
    pub fn start_count(&self) -> usize {
        self.locked.count()
    }
}

/// Best improving trial of a worker.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub sequence: MoveSequence,
    pub state: CubeState,
    pub correct: PieceMask,
}

impl Candidate {
    pub fn count(&self) -> usize {
        self.correct.count()
    }
}

/// A search worker: owns its RNG and scratch buffers, borrows the move table.
#[repr(align(64))]
pub struct Seeker {
    pub table: Arc<MoveTable>,
    pub touch: Arc<TouchIndex>,
    pub rng: fastrand::Rng,
    scratch: Vec<Move>,
}

impl Seeker {
    pub fn new(table: Arc<MoveTable>, touch: Arc<TouchIndex>, seed: Option<u64>) -> Self {
        let rng = if let Some(s) = seed {
            fastrand::Rng::with_seed(s)
        } else {
            fastrand::Rng::new()
        };

        Self {
            table,
            touch,
            rng,
            scratch: Vec::new(),
        }
    }

    /// Runs `req.attempts` independent trials and returns the best one whose
    /// count strictly exceeds the start count. `None` is a normal outcome.
    pub fn search(&mut self, req: &TrialRequest) -> Option<Candidate> {
        let start = req.start_count();
        let mut best: Option<Candidate> = None;
        let mut best_count = start;

        for _ in 0..req.attempts {
            // 1. Alphabet and bias
            let alphabet = mutation::select_alphabet(&mut self.rng, req.variability);
            let damaging = mutation::most_damaging(&alphabet, req.locked, &self.touch);

            // 2. Sequence
            mutation::generate_sequence(
                &mut self.rng,
                &alphabet,
                damaging,
                req.move_len,
                &mut self.scratch,
            );

            // 3. Evaluate, locked pieces are a hard constraint
            let next = self.table.apply_sequence(&req.state, &self.scratch);
            let correct = req.level.correct_pieces(&next);
            if !correct.contains_all(req.locked) {
                continue;
            }

            let count = correct.count();
            if count > best_count {
                best_count = count;
                best = Some(Candidate {
                    sequence: MoveSequence::new(self.scratch.clone()),
                    state: next,
                    correct,
                });
            }
        }

        best
    }
}

pub use self::recall::{
    recall_once, recall_run, CombinationHistory, RecallOutcome, RecallRun, RecallSolution,
};
pub use self::runner::{
    LevelProgress, LevelReport, LevelStatus, OptimizationOptions, Orchestrator, Phase,
    ProgressCallback, RunReport, Silent,
};
