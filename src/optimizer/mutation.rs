// ===== cubeforge/src/optimizer/mutation.rs =====
use crate::cube::Move;
use crate::pieces::{PieceMask, TouchIndex};
use fastrand::Rng;

const PAIR_COUNT: usize = Move::ALL.len() / 2;

/// Picks the move alphabet for one trial: `variability` percent of the six
/// inverse pairs, each pair kept or dropped as a whole. A share that rounds
/// to no pairs falls back to all twelve moves.
pub fn select_alphabet(rng: &mut Rng, variability: u8) -> Vec<Move> {
    let wanted = (PAIR_COUNT as f64 * f64::from(variability.min(100)) / 100.0).round() as usize;
    if wanted == 0 {
        return Move::ALL.to_vec();
    }
    let pairs = wanted.min(PAIR_COUNT);

    let mut faces: [usize; PAIR_COUNT] = [0, 1, 2, 3, 4, 5];
    rng.shuffle(&mut faces);

    let mut alphabet = Vec::with_capacity(pairs * 2);
    for &f in &faces[..pairs] {
        alphabet.push(Move::ALL[f * 2]);
        alphabet.push(Move::ALL[f * 2 + 1]);
    }
    alphabet
}

/// The move in `alphabet` touching the most locked pieces, if it touches any.
/// Ties go to the earlier move.
pub fn most_damaging(alphabet: &[Move], locked: PieceMask, touch: &TouchIndex) -> Option<Move> {
    let mut best: Option<(Move, usize)> = None;
    for &mv in alphabet {
        let hits = touch.touched(mv).intersection(locked).count();
        if hits == 0 {
            continue;
        }
        match best {
            Some((_, b)) if b >= hits => {}
            _ => best = Some((mv, hits)),
        }
    }
    best.map(|(mv, _)| mv)
}

/// Random sequence of `len` moves from `alphabet`.
///
/// The first move avoids `damaging`; every later move avoids undoing its
/// predecessor. A filter that would leave nothing falls back to the whole
/// alphabet.
pub fn generate_sequence(
    rng: &mut Rng,
    alphabet: &[Move],
    damaging: Option<Move>,
    len: usize,
    out: &mut Vec<Move>,
) {
    out.clear();
    if alphabet.is_empty() {
        return;
    }

    let mut buf: Vec<Move> = Vec::with_capacity(alphabet.len());
    for i in 0..len {
        let excluded = if i == 0 {
            damaging
        } else {
            out.last().map(|m| m.inverse())
        };

        buf.clear();
        buf.extend(alphabet.iter().copied().filter(|&m| Some(m) != excluded));
        let pool: &[Move] = if buf.is_empty() { alphabet } else { &buf };

        out.push(pool[rng.usize(0..pool.len())]);
    }
}
