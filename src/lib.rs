pub mod config;
pub mod consts;
pub mod cube;
pub mod error;
pub mod learned;
pub mod loader;
pub mod optimizer;
pub mod pieces;
pub mod results;
// cmd and reports are binary modules (see main.rs).

pub use crate::cube::{Color, CubeState, Move, MoveSequence, MoveTable};
pub use crate::error::{CfResult, CubeForgeError};
pub use crate::pieces::{Level, PieceMask};
