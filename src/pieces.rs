use crate::consts::PIECE_COUNT;
use crate::cube::{Color, CubeState, Move, MoveTable};
use crate::error::{CfResult, CubeForgeError};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::{Display, EnumIter, EnumString};

use crate::cube::Color::{Blue as B, Green as G, Orange as O, Red as R, White as W, Yellow as Y};

/// A rigid corner (3 facelets) or edge (2 facelets) with its target colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub name: &'static str,
    pub positions: &'static [usize],
    pub colors: &'static [Color],
}

impl Piece {
    #[inline(always)]
    pub fn is_correct(&self, state: &CubeState) -> bool {
        self.positions
            .iter()
            .zip(self.colors)
            .all(|(&pos, &col)| state.at(pos) == col)
    }
}

const fn piece(
    name: &'static str,
    positions: &'static [usize],
    colors: &'static [Color],
) -> Piece {
    Piece {
        name,
        positions,
        colors,
    }
}

/// Ordered so that every level is a prefix: E1 = 0..8, E2 = 0..12, E3 = 0..20.
pub const PIECES: [Piece; PIECE_COUNT] = [
    // Level 1: white cross and white corners
    piece("E1", &[1, 12, 25], &[W, R, G]),
    piece("E2", &[3, 27, 28], &[W, G, O]),
    piece("E3", &[9, 34, 39], &[W, O, B]),
    piece("E4", &[7, 18, 37], &[W, R, B]),
    piece("K1", &[4, 15], &[W, R]),
    piece("K2", &[2, 26], &[W, G]),
    piece("K3", &[6, 31], &[W, O]),
    piece("K4", &[8, 38], &[W, B]),
    // Level 2: middle layer edges
    piece("K5", &[17, 40], &[R, B]),
    piece("K6", &[11, 22], &[R, G]),
    piece("K7", &[24, 29], &[G, O]),
    piece("K8", &[35, 42], &[O, B]),
    // Level 3: yellow layer
    piece("E5", &[10, 19, 52], &[R, G, Y]),
    piece("E6", &[21, 30, 54], &[G, O, Y]),
    piece("E7", &[36, 45, 48], &[O, B, Y]),
    piece("E8", &[16, 43, 46], &[R, B, Y]),
    piece("K9", &[13, 49], &[R, Y]),
    piece("K10", &[20, 53], &[G, Y]),
    piece("K11", &[33, 51], &[O, Y]),
    piece("K12", &[44, 47], &[B, Y]),
];

/// Index of a piece by name.
pub fn piece_index(name: &str) -> Option<usize> {
    PIECES.iter().position(|p| p.name == name.trim())
}

/// Set of pieces as a bitmask over `PIECES`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceMask(u32);

impl PieceMask {
    pub const EMPTY: PieceMask = PieceMask(0);

    #[inline(always)]
    pub fn bits(self) -> u32 {
        self.0
    }

    #[inline(always)]
    pub fn count(self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline(always)]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline(always)]
    pub fn contains(self, index: usize) -> bool {
        self.0 & (1 << index) != 0
    }

    #[inline(always)]
    pub fn insert(&mut self, index: usize) {
        self.0 |= 1 << index;
    }

    #[inline(always)]
    pub fn contains_all(self, other: PieceMask) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline(always)]
    pub fn intersection(self, other: PieceMask) -> PieceMask {
        PieceMask(self.0 & other.0)
    }

    pub fn indices(self) -> impl Iterator<Item = usize> {
        (0..PIECE_COUNT).filter(move |&i| self.contains(i))
    }

    pub fn names(self) -> impl Iterator<Item = &'static str> {
        self.indices().map(|i| PIECES[i].name)
    }

    /// Parses names joined by `-` ("E1-K2"). Empty input is the empty set.
    pub fn parse_names(text: &str) -> CfResult<PieceMask> {
        let mut mask = PieceMask::EMPTY;
        for name in text.split('-').map(str::trim).filter(|n| !n.is_empty()) {
            let idx = piece_index(name).ok_or_else(|| {
                CubeForgeError::Validation(format!("unknown piece name '{}'", name))
            })?;
            mask.insert(idx);
        }
        Ok(mask)
    }
}

impl fmt::Display for PieceMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.names().collect();
        f.write_str(&names.join("-"))
    }
}

/// A solving stage. Each level's piece set strictly contains the previous one.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    EnumString,
    Display,
    Serialize,
    Deserialize,
)]
pub enum Level {
    E1,
    E2,
    E3,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::E1, Level::E2, Level::E3];

    pub fn piece_count(self) -> usize {
        match self {
            Level::E1 => 8,
            Level::E2 => 12,
            Level::E3 => PIECE_COUNT,
        }
    }

    pub fn pieces(self) -> &'static [Piece] {
        &PIECES[..self.piece_count()]
    }

    pub fn mask(self) -> PieceMask {
        PieceMask((1u32 << self.piece_count()) - 1)
    }

    pub fn next(self) -> Option<Level> {
        match self {
            Level::E1 => Some(Level::E2),
            Level::E2 => Some(Level::E3),
            Level::E3 => None,
        }
    }

    /// Pieces of this level that are correct in `state`. Allocation free.
    #[inline]
    pub fn correct_pieces(self, state: &CubeState) -> PieceMask {
        let mut mask = PieceMask::EMPTY;
        for (i, p) in self.pieces().iter().enumerate() {
            if p.is_correct(state) {
                mask.insert(i);
            }
        }
        mask
    }

    #[inline]
    pub fn correct_count(self, state: &CubeState) -> usize {
        self.correct_pieces(state).count()
    }

    pub fn is_solved(self, state: &CubeState) -> bool {
        self.correct_count(state) == self.piece_count()
    }
}

/// For each canonical move, the pieces owning at least one facelet it writes to.
#[derive(Debug, Clone)]
pub struct TouchIndex {
    touched: [PieceMask; 12],
}

impl TouchIndex {
    pub fn new(table: &MoveTable) -> Self {
        let mut touched = [PieceMask::EMPTY; 12];
        for mv in Move::ALL {
            let mut mask = PieceMask::EMPTY;
            for target in table.targets(mv) {
                let position = target + 1;
                for (i, p) in PIECES.iter().enumerate() {
                    if p.positions.contains(&position) {
                        mask.insert(i);
                    }
                }
            }
            touched[mv.index()] = mask;
        }
        Self { touched }
    }

    #[inline(always)]
    pub fn touched(&self, mv: Move) -> PieceMask {
        self.touched[mv.index()]
    }
}
