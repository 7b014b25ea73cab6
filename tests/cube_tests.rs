use cubeforge::cube::{Color, CubeState, Move, MoveTable};
use cubeforge::error::CubeForgeError;
use cubeforge::pieces::Level;
use proptest::prelude::*;
use rstest::rstest;
use std::collections::HashSet;

mod common;

fn arb_move() -> impl Strategy<Value = Move> {
    (0usize..12).prop_map(|i| Move::ALL[i])
}

proptest! {
    #[test]
    fn prop_move_then_inverse_is_identity(state in common::arb_state(), mv in arb_move()) {
        let table = MoveTable::standard();
        let there = table.apply(&state, mv);
        let back = table.apply(&there, mv.inverse());
        prop_assert_eq!(back, state);
    }

    #[test]
    fn prop_only_targets_change(state in common::arb_state(), mv in arb_move()) {
        let table = MoveTable::standard();
        let next = table.apply(&state, mv);
        let targets: HashSet<usize> = table.targets(mv).collect();
        for i in 0..54 {
            if !targets.contains(&i) {
                prop_assert_eq!(next.facelets()[i], state.facelets()[i], "position {}", i + 1);
            }
        }
    }

    #[test]
    fn prop_sequence_then_inverse_is_identity(
        state in common::arb_state(),
        moves in proptest::collection::vec(arb_move(), 0..12)
    ) {
        let table = MoveTable::standard();
        let seq = cubeforge::cube::MoveSequence::new(moves);
        let there = table.apply_sequence(&state, seq.as_slice());
        let back = table.apply_sequence(&there, seq.inverse().as_slice());
        prop_assert_eq!(back, state);
    }
}

#[rstest]
#[case(Move::F)]
#[case(Move::U)]
#[case(Move::L)]
#[case(Move::R)]
#[case(Move::B)]
#[case(Move::D)]
fn test_four_quarter_turns_are_identity(#[case] mv: Move) {
    let table = MoveTable::standard();
    let s = common::scrambled("R U Fb L D B");
    let four = table.apply_sequence(&s, &[mv; 4]);
    assert_eq!(four, s);
    let once = table.apply(&s, mv);
    assert_ne!(once, s, "{} must change a scrambled state", mv);
}

#[test]
fn test_front_then_inverse_keeps_solved() {
    let table = MoveTable::standard();
    let solved = CubeState::solved();
    assert_eq!(Level::E3.correct_count(&solved), 20);

    let after_f = table.apply_named(&solved, "F").unwrap();
    assert_ne!(after_f, solved);
    let after_fb = table.apply_named(&after_f, "Fb").unwrap();

    assert_eq!(after_fb, solved);
    assert_eq!(Level::E3.correct_count(&after_fb), 20);
}

#[test]
fn test_empty_sequence_returns_input() {
    let table = MoveTable::standard();
    let s = common::scrambled("R U");
    assert_eq!(table.apply_sequence(&s, &[]), s);
}

#[test]
fn test_apply_named_rejects_unknown_move() {
    let table = MoveTable::standard();
    match table.apply_named(&CubeState::solved(), "X2") {
        Err(CubeForgeError::UnknownMove(name)) => assert_eq!(name, "X2"),
        other => panic!("expected UnknownMove, got {:?}", other),
    }
}

#[test]
fn test_apply_is_deterministic() {
    let table = MoveTable::standard();
    let s = common::scrambled("D Lb B");
    let seq = common::seq("R U Rb Ub F");
    let a = table.apply_sequence(&s, seq.as_slice());
    let b = table.apply_sequence(&s, seq.as_slice());
    assert_eq!(a, b);
}

#[test]
fn test_state_rejects_unknown_symbol() {
    let mut symbols = vec!["w"; 54];
    symbols[10] = "x";
    assert!(matches!(
        CubeState::from_symbols(&symbols),
        Err(CubeForgeError::InvalidState(_))
    ));
}

#[test]
fn test_face_turn_keeps_color_counts() {
    let table = MoveTable::standard();
    let s = common::scrambled("F R U B L D Fb");
    for c in [
        Color::White,
        Color::Green,
        Color::Red,
        Color::Orange,
        Color::Blue,
        Color::Yellow,
    ] {
        let n = s.facelets().iter().filter(|&&f| f == c).count();
        assert_eq!(n, 9, "color {}", c);
    }
}

#[test]
fn test_parse_sequence_resolves_names() {
    let seq = cubeforge::cube::parse_sequence("R  U\tRb").unwrap();
    assert_eq!(seq.as_slice(), &[Move::R, Move::U, Move::Rb]);
    assert_eq!(seq.to_string(), "R U Rb");
    assert!(matches!(
        cubeforge::cube::parse_sequence("R Ux"),
        Err(CubeForgeError::UnknownMove(_))
    ));
}
