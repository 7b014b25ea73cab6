pub mod geometry;
pub mod moves;

pub use self::geometry::Face;
pub use self::moves::{parse_sequence, Move, MoveSequence, MoveTable};

use crate::consts::FACELET_COUNT;
use crate::error::{CfResult, CubeForgeError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum_macros::{Display, EnumIter, EnumString};

/// One of the six sticker colors, written as a single lowercase letter.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    EnumString,
    Display,
    Serialize,
    Deserialize,
)]
#[repr(u8)]
pub enum Color {
    #[strum(serialize = "w")]
    #[serde(rename = "w")]
    White,
    #[strum(serialize = "g")]
    #[serde(rename = "g")]
    Green,
    #[strum(serialize = "r")]
    #[serde(rename = "r")]
    Red,
    #[strum(serialize = "o")]
    #[serde(rename = "o")]
    Orange,
    #[strum(serialize = "b")]
    #[serde(rename = "b")]
    Blue,
    #[strum(serialize = "y")]
    #[serde(rename = "y")]
    Yellow,
}

impl Color {
    /// Parses a color code, case-insensitively and ignoring surrounding whitespace.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Color::from_str(&symbol.trim().to_ascii_lowercase()).ok()
    }
}

/// A full puzzle configuration: 54 facelet colors indexed by position 1..=54.
///
/// Positions follow the unfolded net: front 1-9, left 10-18, up 19-27,
/// right 28-36, down 37-45, back 46-54. Any 54-symbol vector is accepted;
/// physical legality (color counts, parity) is never checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CubeState {
    facelets: [Color; FACELET_COUNT],
}

impl CubeState {
    pub fn from_facelets(facelets: [Color; FACELET_COUNT]) -> Self {
        Self { facelets }
    }

    /// The reference configuration every piece definition is measured against.
    pub fn solved() -> Self {
        let mut facelets = [Color::White; FACELET_COUNT];
        for (i, slot) in facelets.iter_mut().enumerate() {
            *slot = Face::ALL[i / 9].solved_color();
        }
        Self { facelets }
    }

    /// Builds a state from 54 color codes. Anything else is an InvalidState.
    pub fn from_symbols<S: AsRef<str>>(symbols: &[S]) -> CfResult<Self> {
        if symbols.len() != FACELET_COUNT {
            return Err(CubeForgeError::InvalidState(format!(
                "expected {} color codes, found {}",
                FACELET_COUNT,
                symbols.len()
            )));
        }

        let mut facelets = [Color::White; FACELET_COUNT];
        for (i, sym) in symbols.iter().enumerate() {
            facelets[i] = Color::from_symbol(sym.as_ref()).ok_or_else(|| {
                CubeForgeError::InvalidState(format!(
                    "position {} holds '{}', allowed codes are w, g, r, o, b, y",
                    i + 1,
                    sym.as_ref()
                ))
            })?;
        }
        Ok(Self { facelets })
    }

    /// Color at a 1-based position.
    #[inline(always)]
    pub fn at(&self, position: usize) -> Color {
        self.facelets[position - 1]
    }

    #[inline(always)]
    pub fn facelets(&self) -> &[Color; FACELET_COUNT] {
        &self.facelets
    }

    /// `;`-joined color codes, the same shape the start-position CSV uses.
    pub fn to_symbols(&self) -> String {
        self.facelets
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(";")
    }
}

impl Default for CubeState {
    fn default() -> Self {
        Self::solved()
    }
}

impl fmt::Display for CubeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.facelets {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

impl FromStr for CubeState {
    type Err = CubeForgeError;

    /// Accepts either 54 separated codes (`;`, `,` or whitespace) or a
    /// compact 54-character string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s
            .split(|c: char| c == ';' || c == ',' || c.is_whitespace())
            .filter(|p| !p.is_empty())
            .collect();

        if parts.len() == 1 && parts[0].len() == FACELET_COUNT {
            let chars: Vec<String> = parts[0].chars().map(|c| c.to_string()).collect();
            return Self::from_symbols(&chars);
        }
        Self::from_symbols(&parts)
    }
}
