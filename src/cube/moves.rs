use super::geometry::{self, Face};
use super::CubeState;
use crate::consts::{FACELET_COUNT, MOVE_COUNT};
use crate::error::{CfResult, CubeForgeError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use strum_macros::{Display, EnumIter, EnumString};
use tracing::{debug, warn};

/// The twelve canonical quarter turns. `X` is clockwise seen from outside
/// face X, `Xb` is its inverse.
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
pub enum Move {
    F,
    Fb,
    U,
    Ub,
    L,
    Lb,
    R,
    Rb,
    B,
    Bb,
    D,
    Db,
}

impl Move {
    /// Inverse pairs sit next to each other: index ^ 1 is the inverse.
    pub const ALL: [Move; MOVE_COUNT] = [
        Move::F,
        Move::Fb,
        Move::U,
        Move::Ub,
        Move::L,
        Move::Lb,
        Move::R,
        Move::Rb,
        Move::B,
        Move::Bb,
        Move::D,
        Move::Db,
    ];

    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline(always)]
    pub fn inverse(self) -> Move {
        Move::ALL[self.index() ^ 1]
    }

    #[inline(always)]
    pub fn is_clockwise(self) -> bool {
        self.index() % 2 == 0
    }

    pub fn face(self) -> Face {
        match self {
            Move::F | Move::Fb => Face::Front,
            Move::U | Move::Ub => Face::Up,
            Move::L | Move::Lb => Face::Left,
            Move::R | Move::Rb => Face::Right,
            Move::B | Move::Bb => Face::Back,
            Move::D | Move::Db => Face::Down,
        }
    }

    /// Resolves a move name, reporting unknown names as UnknownMove.
    pub fn parse_name(name: &str) -> CfResult<Move> {
        Move::from_str(name.trim()).map_err(|_| CubeForgeError::UnknownMove(name.to_string()))
    }
}

/// An ordered list of moves, written space-separated ("R U Fb").
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct MoveSequence(Vec<Move>);

impl MoveSequence {
    pub fn new(moves: Vec<Move>) -> Self {
        Self(moves)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Move] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.0.iter()
    }

    pub fn push(&mut self, mv: Move) {
        self.0.push(mv);
    }

    pub fn extend_from(&mut self, other: &MoveSequence) {
        self.0.extend_from_slice(&other.0);
    }

    /// The sequence that undoes this one.
    pub fn inverse(&self) -> MoveSequence {
        Self(self.0.iter().rev().map(|m| m.inverse()).collect())
    }
}

impl From<Vec<Move>> for MoveSequence {
    fn from(moves: Vec<Move>) -> Self {
        Self(moves)
    }
}

impl fmt::Display for MoveSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, mv) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", mv)?;
        }
        Ok(())
    }
}

impl FromStr for MoveSequence {
    type Err = CubeForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split_whitespace()
            .map(Move::parse_name)
            .collect::<CfResult<Vec<_>>>()
            .map(Self)
    }
}

/// Parses space-separated move names ("R U Rb").
pub fn parse_sequence(text: &str) -> CfResult<MoveSequence> {
    text.parse()
}

impl From<MoveSequence> for String {
    fn from(seq: MoveSequence) -> Self {
        seq.to_string()
    }
}

impl TryFrom<String> for MoveSequence {
    type Error = CubeForgeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A position in the collaborator's JSON; targets show up both as numbers
/// and as numeric strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum PositionRef {
    Number(usize),
    Text(String),
}

impl PositionRef {
    fn resolve(&self, mv: &str) -> CfResult<usize> {
        let pos = match self {
            PositionRef::Number(n) => *n,
            PositionRef::Text(s) => s.trim().parse::<usize>().map_err(|_| {
                CubeForgeError::Config(format!("move '{}': position '{}' is not a number", mv, s))
            })?,
        };
        parse_position(pos, mv)
    }
}

fn parse_position(pos: usize, mv: &str) -> CfResult<usize> {
    if (1..=FACELET_COUNT).contains(&pos) {
        Ok(pos - 1)
    } else {
        Err(CubeForgeError::Config(format!(
            "move '{}': position {} outside 1..={}",
            mv, pos, FACELET_COUNT
        )))
    }
}

/// Immutable move-name -> partial permutation table.
///
/// Applying a move writes each source position's color into its target
/// position; unmapped positions keep their color.
#[derive(Debug, Clone)]
pub struct MoveTable {
    pairs: Vec<Vec<(u8, u8)>>,
}

impl MoveTable {
    /// Quarter turns derived from cube geometry.
    pub fn standard() -> Self {
        Self {
            pairs: Move::ALL.iter().map(|&m| geometry::standard_pairs(m)).collect(),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> CfResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Reads `{"F": {"1": 3, ...}, ...}` with 1-based positions.
    pub fn from_json_str(json: &str) -> CfResult<Self> {
        let raw: HashMap<String, BTreeMap<String, PositionRef>> = serde_json::from_str(json)?;

        let mut pairs: Vec<Option<Vec<(u8, u8)>>> = vec![None; MOVE_COUNT];
        for (name, mapping) in &raw {
            let mv = match Move::from_str(name.trim()) {
                Ok(m) => m,
                Err(_) => {
                    warn!("Ignoring non-canonical move '{}' in move table", name);
                    continue;
                }
            };

            let mut entries = Vec::with_capacity(mapping.len());
            for (src, tgt) in mapping {
                let src_pos = src.trim().parse::<usize>().map_err(|_| {
                    CubeForgeError::Config(format!(
                        "move '{}': position '{}' is not a number",
                        name, src
                    ))
                })?;
                let s = parse_position(src_pos, name)?;
                let t = tgt.resolve(name)?;
                entries.push((s as u8, t as u8));
            }
            pairs[mv.index()] = Some(entries);
        }

        let mut resolved = Vec::with_capacity(MOVE_COUNT);
        for (mv, slot) in Move::ALL.iter().zip(pairs) {
            match slot {
                Some(p) => resolved.push(p),
                None => return Err(CubeForgeError::UnknownMove(mv.to_string())),
            }
        }

        debug!("Loaded move table with {} moves", resolved.len());
        Ok(Self { pairs: resolved })
    }

    /// Writes the table in the same format `from_json_str` reads.
    pub fn to_json_string(&self) -> CfResult<String> {
        let mut out: BTreeMap<String, BTreeMap<usize, usize>> = BTreeMap::new();
        for mv in Move::ALL {
            let mapping = self.pairs[mv.index()]
                .iter()
                .map(|&(s, t)| (s as usize + 1, t as usize + 1))
                .collect();
            out.insert(mv.to_string(), mapping);
        }
        Ok(serde_json::to_string_pretty(&out)?)
    }

    #[inline(always)]
    pub fn apply(&self, state: &CubeState, mv: Move) -> CubeState {
        let src = state.facelets();
        let mut next = *src;
        for &(s, t) in &self.pairs[mv.index()] {
            next[t as usize] = src[s as usize];
        }
        CubeState::from_facelets(next)
    }

    /// Folds `apply` left to right. An empty slice returns the input.
    pub fn apply_sequence(&self, state: &CubeState, moves: &[Move]) -> CubeState {
        moves.iter().fold(*state, |acc, &m| self.apply(&acc, m))
    }

    pub fn apply_named(&self, state: &CubeState, name: &str) -> CfResult<CubeState> {
        Ok(self.apply(state, Move::parse_name(name)?))
    }

    /// 0-based positions a move writes to.
    pub fn targets(&self, mv: Move) -> impl Iterator<Item = usize> + '_ {
        self.pairs[mv.index()].iter().map(|&(_, t)| t as usize)
    }
}

impl Default for MoveTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverse_pairs_are_adjacent() {
        assert_eq!(Move::F.inverse(), Move::Fb);
        assert_eq!(Move::Db.inverse(), Move::D);
        for m in Move::ALL {
            assert_eq!(m.inverse().inverse(), m);
            assert_eq!(m.face(), m.inverse().face());
        }
    }

    #[test]
    fn test_sequence_text_roundtrip() {
        let seq: MoveSequence = "R U Rb Ub".parse().unwrap();
        assert_eq!(seq.len(), 4);
        assert_eq!(seq.to_string(), "R U Rb Ub");
        assert_eq!(seq.inverse().to_string(), "U R Ub Rb");
    }

    #[test]
    fn test_unknown_name_is_reported() {
        match "R X".parse::<MoveSequence>() {
            Err(CubeForgeError::UnknownMove(name)) => assert_eq!(name, "X"),
            other => panic!("expected UnknownMove, got {:?}", other),
        }
    }

    #[test]
    fn test_json_roundtrip_keeps_behavior() {
        let table = MoveTable::standard();
        let json = table.to_json_string().unwrap();
        let reloaded = MoveTable::from_json_str(&json).unwrap();

        let seq: MoveSequence = "F R U Bb L Db".parse().unwrap();
        let s = CubeState::solved();
        assert_eq!(
            table.apply_sequence(&s, seq.as_slice()),
            reloaded.apply_sequence(&s, seq.as_slice())
        );
    }

    #[test]
    fn test_missing_move_is_unknown_move() {
        let json = r#"{"F": {"1": 3}}"#;
        match MoveTable::from_json_str(json) {
            Err(CubeForgeError::UnknownMove(name)) => assert_eq!(name, "Fb"),
            other => panic!("expected UnknownMove, got {:?}", other),
        }
    }

    #[test]
    fn test_string_targets_are_accepted() {
        let mut map = BTreeMap::new();
        for m in Move::ALL {
            map.insert(m.to_string(), BTreeMap::from([("1".to_string(), "2".to_string())]));
        }
        let json = serde_json::to_string(&map).unwrap();
        let table = MoveTable::from_json_str(&json).unwrap();
        let s = CubeState::solved();
        let next = table.apply(&s, Move::U);
        assert_eq!(next.at(2), s.at(1));
    }

    #[test]
    fn test_out_of_range_position_is_config_error() {
        let mut map = BTreeMap::new();
        for m in Move::ALL {
            map.insert(m.to_string(), BTreeMap::from([("55".to_string(), 1)]));
        }
        let json = serde_json::to_string(&map).unwrap();
        assert!(matches!(
            MoveTable::from_json_str(&json),
            Err(CubeForgeError::Config(_))
        ));
    }
}
