use crate::cube::{CubeState, MoveSequence, MoveTable};
use crate::learned::LearnedEntry;
use crate::pieces::Level;
use std::collections::HashSet;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Chains of learned sequences that are used up for the current start
/// state: every extension failed, or the chain already solved it.
/// Lives for one run only.
#[derive(Debug, Default, Clone)]
pub struct CombinationHistory {
    exhausted: HashSet<Vec<MoveSequence>>,
}

impl CombinationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, chain: &[MoveSequence]) -> bool {
        self.exhausted.contains(chain)
    }

    pub fn insert(&mut self, chain: Vec<MoveSequence>) -> bool {
        self.exhausted.insert(chain)
    }

    pub fn len(&self) -> usize {
        self.exhausted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exhausted.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct RecallOutcome {
    pub state: CubeState,
    pub chain: Vec<MoveSequence>,
    pub solved: bool,
    pub iterations: usize,
}

impl RecallOutcome {
    /// The chain flattened into one move sequence.
    pub fn moves(&self) -> MoveSequence {
        let mut out = MoveSequence::default();
        for seq in &self.chain {
            out.extend_from(seq);
        }
        out
    }
}

/// Greedily chains learned sequences from `start` until `level` is solved
/// or `max_iterations` rounds pass.
///
/// Each round applies the first usable entry (storage order, or shuffled
/// when `shuffle` is given) that extends the chain into unexplored territory
/// and strictly raises the count. A round without such an entry marks the
/// chain exhausted and restarts from `start`.
pub fn recall_once(
    start: &CubeState,
    level: Level,
    table: &MoveTable,
    entries: &[LearnedEntry],
    history: &mut CombinationHistory,
    max_iterations: usize,
    mut shuffle: Option<&mut fastrand::Rng>,
) -> RecallOutcome {
    let target = level.piece_count();
    let mut current = *start;
    let mut chain: Vec<MoveSequence> = Vec::new();
    let mut order: Vec<usize> = (0..entries.len()).collect();
    let mut iteration = 0usize;

    while level.correct_count(&current) < target && iteration < max_iterations {
        iteration += 1;
        if let Some(rng) = shuffle.as_deref_mut() {
            rng.shuffle(&mut order);
        }

        // 1. Entries whose extension of the chain is still open
        let mut candidate_chain = chain.clone();
        let viable: Vec<usize> = order
            .iter()
            .copied()
            .filter(|&i| {
                candidate_chain.push(entries[i].sequence.clone());
                let closed = history.contains(&candidate_chain);
                candidate_chain.pop();
                !closed
            })
            .collect();

        // 2. First one that improves
        let mut improved = false;
        if !viable.is_empty() {
            let correct = level.correct_pieces(&current);
            for i in viable {
                let entry = &entries[i];
                if !correct.contains_all(entry.required) {
                    continue;
                }
                let next = table.apply_sequence(&current, entry.sequence.as_slice());
                let next_count = level.correct_count(&next);
                if next_count > correct.count() {
                    current = next;
                    chain.push(entry.sequence.clone());
                    if next_count >= target {
                        history.insert(chain.clone());
                    }
                    improved = true;
                    break;
                }
            }
        }

        // 3. Dead end: close the chain and start over
        if !improved {
            if !chain.is_empty() {
                history.insert(std::mem::take(&mut chain));
            }
            current = *start;
        }
    }

    RecallOutcome {
        state: current,
        solved: level.correct_count(&current) >= target,
        chain,
        iterations: iteration,
    }
}

#[derive(Debug, Clone)]
pub struct RecallSolution {
    pub moves: MoveSequence,
    /// Run-wide iteration count when the solution was found.
    pub iterations: usize,
    pub elapsed: Duration,
}

#[derive(Debug, Clone)]
pub struct RecallRun {
    pub solutions: Vec<RecallSolution>,
    pub iterations: usize,
    pub exhausted_chains: usize,
}

/// Repeats `recall_once` on one start state with a shared history until
/// `solutions_per_run` distinct solutions exist, the budget is spent, or an
/// attempt ends unsolved.
pub fn recall_run(
    start: &CubeState,
    level: Level,
    table: &MoveTable,
    entries: &[LearnedEntry],
    max_iterations: usize,
    solutions_per_run: usize,
    mut shuffle: Option<&mut fastrand::Rng>,
) -> RecallRun {
    let started = Instant::now();
    let mut history = CombinationHistory::new();
    let mut solutions: Vec<RecallSolution> = Vec::new();
    let mut iterations = 0usize;

    while iterations < max_iterations && solutions.len() < solutions_per_run {
        let outcome = recall_once(
            start,
            level,
            table,
            entries,
            &mut history,
            max_iterations - iterations,
            shuffle.as_deref_mut(),
        );
        iterations += outcome.iterations;

        if !outcome.solved {
            debug!("Recall attempt ended unsolved after {} iterations", outcome.iterations);
            break;
        }

        let moves = outcome.moves();
        if solutions.iter().any(|s| s.moves == moves) {
            debug!("Duplicate recall solution ignored: {}", moves);
        } else {
            info!(
                "🎯 Solution {} at iteration {}: {} moves",
                solutions.len() + 1,
                iterations,
                moves.len()
            );
            solutions.push(RecallSolution {
                moves,
                iterations,
                elapsed: started.elapsed(),
            });
        }

        // Already-solved starts produce the same empty chain forever.
        if outcome.iterations == 0 {
            break;
        }
    }

    RecallRun {
        solutions,
        iterations,
        exhausted_chains: history.len(),
    }
}
