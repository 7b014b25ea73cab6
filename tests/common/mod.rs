#![allow(dead_code)]

use cubeforge::config::{LevelParams, SolverConfig};
use cubeforge::cube::{Color, CubeState, MoveSequence, MoveTable};
use cubeforge::learned::{MemoryStore, SequenceStore};
use cubeforge::optimizer::{OptimizationOptions, Orchestrator};
use cubeforge::pieces::{Level, PieceMask};
use proptest::prelude::*;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub fn seq(text: &str) -> MoveSequence {
    text.parse().expect("valid move sequence")
}

/// Solved state with `moves` applied.
pub fn scrambled(moves: &str) -> CubeState {
    let table = MoveTable::standard();
    table.apply_sequence(&CubeState::solved(), seq(moves).as_slice())
}

pub fn arb_color() -> impl Strategy<Value = Color> {
    prop_oneof![
        Just(Color::White),
        Just(Color::Green),
        Just(Color::Red),
        Just(Color::Orange),
        Just(Color::Blue),
        Just(Color::Yellow),
    ]
}

prop_compose! {
    /// Any 54-symbol vector, legal or not.
    pub fn arb_state()(colors in proptest::collection::vec(arb_color(), 54)) -> CubeState {
        let mut facelets = [Color::White; 54];
        facelets.copy_from_slice(&colors);
        CubeState::from_facelets(facelets)
    }
}

/// Small, fast configuration for search tests.
pub fn test_config(workers: usize, attempts: usize, max_iterations: usize) -> SolverConfig {
    let mut cfg = SolverConfig::default();
    cfg.search.workers = workers;
    cfg.search.attempts_per_worker = attempts;
    for level in Level::ALL {
        cfg.levels.insert(
            level,
            LevelParams {
                max_iterations,
                max_moves_per_sequence: 4,
                target_correct_stones: level.piece_count(),
                no_improvement_threshold: 3,
                variability: 100,
            },
        );
    }
    cfg
}

pub fn orchestrator(cfg: &SolverConfig, store: Arc<dyn SequenceStore>) -> Orchestrator {
    Orchestrator::new(
        Arc::new(MoveTable::standard()),
        store,
        OptimizationOptions::from(cfg),
    )
    .expect("worker pool")
}

pub fn memory_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new())
}

pub fn record(store: &dyn SequenceStore, start: usize, end: usize, moves: &str) -> bool {
    store
        .record(start, end, &seq(moves), PieceMask::EMPTY)
        .expect("record")
}

pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    let mut f = File::create(&path).expect("create file");
    f.write_all(content.as_bytes()).expect("write file");
    path
}

/// Two-row start-position CSV for `state`.
pub fn start_position_csv(state: &CubeState) -> String {
    let header: Vec<String> = (1..=54).map(|i| i.to_string()).collect();
    format!("{}\n{}\n", header.join(";"), state.to_symbols())
}

pub const PARAMETER_SHEET: &str = "\
Parameter;Quick;Deep
MAX_ITERATIONS E1;200;10.000
MAX_ITERATIONS E2;200;20.000
MAX_ITERATIONS E3;200;50.000
MAX_MOVES_PER_SEQUENCE E1;4;6
MAX_MOVES_PER_SEQUENCE E2;4;8
MAX_MOVES_PER_SEQUENCE E3;4;10
TARGET_CORRECT_STONES E1;8;8
TARGET_CORRECT_STONES E2;12;12
TARGET_CORRECT_STONES E3;20;20
NO_IMPROVEMENT_THRESHOLD E1;3;30
NO_IMPROVEMENT_THRESHOLD E2;3;40
NO_IMPROVEMENT_THRESHOLD E3;3;50
VARIABILITY E1;100;80
VARIABILITY E2;100;80
VARIABILITY E3;100;100
NO_MOVES_TO_SHUFFLE;0;25
TOTAL_RUNS;1;3
SOLUTIONS_PER_RUN;1;2
";
