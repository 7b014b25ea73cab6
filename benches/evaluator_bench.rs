// ===== cubeforge/benches/evaluator_bench.rs =====
use criterion::{criterion_group, criterion_main, Criterion};
use cubeforge::cube::{CubeState, MoveSequence, MoveTable};
use cubeforge::learned::{MemoryStore, SequenceStore};
use cubeforge::optimizer::{Seeker, TrialRequest};
use cubeforge::pieces::{Level, PieceMask, TouchIndex};
use std::hint::black_box;
use std::sync::Arc;

fn scrambled(table: &MoveTable, moves: &str) -> CubeState {
    let seq: MoveSequence = moves.parse().expect("valid moves");
    table.apply_sequence(&CubeState::solved(), seq.as_slice())
}

fn criterion_benchmark(c: &mut Criterion) {
    let table = Arc::new(MoveTable::standard());
    let touch = Arc::new(TouchIndex::new(&table));
    let state = scrambled(&table, "R U Fb L D B Rb Ub");
    let seq: MoveSequence = "R U Rb Ub F Fb L D".parse().expect("valid moves");

    c.bench_function("correct_pieces E3", |b| {
        b.iter(|| Level::E3.correct_pieces(black_box(&state)))
    });

    c.bench_function("apply_sequence (8 moves)", |b| {
        b.iter(|| table.apply_sequence(black_box(&state), black_box(seq.as_slice())))
    });

    // One worker batch slot: 200 trials of length 4.
    let req = TrialRequest {
        state,
        level: Level::E1,
        move_len: 4,
        locked: Level::E1.correct_pieces(&state),
        attempts: 200,
        variability: 100,
    };
    let mut seeker = Seeker::new(table.clone(), touch.clone(), Some(42));
    c.bench_function("seeker search (200 x 4)", |b| {
        b.iter(|| seeker.search(black_box(&req)))
    });

    // Lookup over a store of entries that rarely match.
    let store = MemoryStore::new();
    for i in 0..400usize {
        let moves = if i % 2 == 0 { "R U Rb" } else { "F D Fb Db" };
        let seq: MoveSequence = moves.parse().expect("valid moves");
        let _ = store.record(i % 20, i % 20 + 1 + i / 20, &seq, PieceMask::EMPTY);
    }
    c.bench_function("learned lookup", |b| {
        b.iter(|| store.lookup(black_box(&state), Level::E3, &table, true).ok())
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
