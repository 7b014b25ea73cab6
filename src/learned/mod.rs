pub mod csv_store;
pub mod memory;

pub use self::csv_store::CsvStore;
pub use self::memory::MemoryStore;

use crate::cube::{CubeState, MoveSequence, MoveTable};
use crate::error::{CfResult, CubeForgeError};
use crate::pieces::{Level, PieceMask};

/// A move sequence that once raised the correct-piece count.
#[derive(Debug, Clone, PartialEq)]
pub struct LearnedEntry {
    pub start_count: usize,
    pub end_count: usize,
    pub improvement: usize,
    /// Pieces that were correct when the sequence was discovered.
    pub required: PieceMask,
    pub sequence: MoveSequence,
    pub move_count: usize,
    pub value: f64,
}

impl LearnedEntry {
    pub fn new(
        start_count: usize,
        end_count: usize,
        sequence: MoveSequence,
        required: PieceMask,
    ) -> CfResult<Self> {
        if sequence.is_empty() {
            return Err(CubeForgeError::Validation(
                "learned sequence must contain at least one move".to_string(),
            ));
        }
        if end_count <= start_count {
            return Err(CubeForgeError::Validation(format!(
                "learned sequence must improve the count ({} -> {})",
                start_count, end_count
            )));
        }
        let improvement = end_count - start_count;
        let move_count = sequence.len();
        Ok(Self {
            start_count,
            end_count,
            improvement,
            required,
            sequence,
            move_count,
            value: improvement as f64 / move_count as f64,
        })
    }

    pub fn key(&self) -> (usize, MoveSequence) {
        (self.start_count, self.sequence.clone())
    }
}

/// Outcome of a successful lookup: the entry and the state its replay produced.
#[derive(Debug, Clone)]
pub struct Reuse {
    pub entry: LearnedEntry,
    pub state: CubeState,
    pub correct: PieceMask,
}

/// Append-only table of learned sequences.
///
/// Readers may scan concurrently; `record` is called by a single writer.
/// A poisoned lock surfaces as an error from every method.
pub trait SequenceStore: Send + Sync {
    /// Visits every entry in storage order.
    fn scan(&self, visit: &mut dyn FnMut(&LearnedEntry)) -> CfResult<()>;

    /// Appends a new entry. Returns `Ok(false)` when the (start count,
    /// sequence) pair is already stored.
    fn record(
        &self,
        start_count: usize,
        end_count: usize,
        sequence: &MoveSequence,
        required: PieceMask,
    ) -> CfResult<bool>;

    fn len(&self) -> CfResult<usize>;

    fn is_empty(&self) -> CfResult<bool> {
        Ok(self.len()? == 0)
    }

    fn entries(&self) -> CfResult<Vec<LearnedEntry>> {
        let mut out = Vec::new();
        self.scan(&mut |e| out.push(e.clone()))?;
        Ok(out)
    }

    /// Best stored sequence that genuinely improves `state` at `level`.
    ///
    /// Candidates must share the current count. Each one is replayed
    /// against the actual state and kept only if the count strictly rises;
    /// with `guard_locked` the replay must also leave every currently-correct
    /// piece intact. Highest value wins, earlier entries win ties.
    fn lookup(
        &self,
        state: &CubeState,
        level: Level,
        table: &MoveTable,
        guard_locked: bool,
    ) -> CfResult<Option<Reuse>> {
        let locked = level.correct_pieces(state);
        let current = locked.count();
        let mut best: Option<Reuse> = None;

        self.scan(&mut |entry| {
            if entry.start_count != current {
                return;
            }
            if let Some(b) = &best {
                if entry.value <= b.entry.value {
                    return;
                }
            }

            let replay = table.apply_sequence(state, entry.sequence.as_slice());
            let correct = level.correct_pieces(&replay);
            if correct.count() <= current {
                return;
            }
            if guard_locked && !correct.contains_all(locked) {
                return;
            }

            best = Some(Reuse {
                entry: entry.clone(),
                state: replay,
                correct,
            });
        })?;

        Ok(best)
    }
}
