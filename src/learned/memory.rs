use super::{LearnedEntry, SequenceStore};
use crate::cube::MoveSequence;
use crate::error::{CfResult, CubeForgeError};
use crate::pieces::PieceMask;
use std::collections::HashSet;
use std::sync::RwLock;

#[derive(Debug, Default)]
pub(crate) struct Rows {
    pub entries: Vec<LearnedEntry>,
    pub keys: HashSet<(usize, MoveSequence)>,
}

impl Rows {
    /// Inserts unless the key is already present; first writer wins.
    pub fn insert(&mut self, entry: LearnedEntry) -> bool {
        if !self.keys.insert(entry.key()) {
            return false;
        }
        self.entries.push(entry);
        true
    }
}

pub(crate) fn poisoned() -> CubeForgeError {
    CubeForgeError::Validation("learned store lock poisoned".to_string())
}

/// In-process store; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: RwLock<Rows>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<I: IntoIterator<Item = LearnedEntry>>(entries: I) -> Self {
        let mut rows = Rows::default();
        for e in entries {
            rows.insert(e);
        }
        Self {
            rows: RwLock::new(rows),
        }
    }
}

impl SequenceStore for MemoryStore {
    fn scan(&self, visit: &mut dyn FnMut(&LearnedEntry)) -> CfResult<()> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        rows.entries.iter().for_each(|e| visit(e));
        Ok(())
    }

    fn record(
        &self,
        start_count: usize,
        end_count: usize,
        sequence: &MoveSequence,
        required: PieceMask,
    ) -> CfResult<bool> {
        let entry = LearnedEntry::new(start_count, end_count, sequence.clone(), required)?;
        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        Ok(rows.insert(entry))
    }

    fn len(&self) -> CfResult<usize> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        Ok(rows.entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_pair_is_rejected() {
        let store = MemoryStore::new();
        let seq: MoveSequence = "R U".parse().unwrap();
        assert!(store.record(3, 5, &seq, PieceMask::EMPTY).unwrap());
        assert!(!store.record(3, 6, &seq, PieceMask::EMPTY).unwrap());
        assert_eq!(store.len().unwrap(), 1);
        // Same sequence from a different count is a new entry.
        assert!(store.record(4, 5, &seq, PieceMask::EMPTY).unwrap());
        assert_eq!(store.len().unwrap(), 2);
    }

    #[test]
    fn test_value_is_improvement_per_move() {
        let store = MemoryStore::new();
        let seq: MoveSequence = "R U F B".parse().unwrap();
        store.record(2, 4, &seq, PieceMask::EMPTY).unwrap();
        let e = &store.entries().unwrap()[0];
        assert_eq!(e.improvement, 2);
        assert_eq!(e.move_count, 4);
        assert!((e.value - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_poisoned_lock_is_an_error_not_an_empty_store() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let seq: MoveSequence = "Fb".parse().unwrap();
        store.record(0, 8, &seq, PieceMask::EMPTY).unwrap();

        let writer = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = writer.rows.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();

        assert!(store.len().is_err());
        assert!(store.entries().is_err());
        assert!(store.scan(&mut |_| {}).is_err());
        let table = crate::cube::MoveTable::standard();
        let state = table.apply_sequence(&crate::cube::CubeState::solved(), &[crate::cube::Move::F]);
        assert!(store
            .lookup(&state, crate::pieces::Level::E1, &table, true)
            .is_err());
    }

    #[test]
    fn test_empty_sequence_is_invalid() {
        let store = MemoryStore::new();
        let res = store.record(1, 2, &MoveSequence::default(), PieceMask::EMPTY);
        assert!(matches!(res, Err(CubeForgeError::Validation(_))));
        assert!(store.is_empty().unwrap());
    }
}
