// ===== cubeforge/src/cube/geometry.rs =====
// Derives the canonical quarter-turn permutations from 3D coordinates.
//
// Axes: x points right, y points up, z points out of the front face.
// Every facelet is described by the cubie it sits on (each coordinate in
// -1..=1) and its outward normal. A face turn rotates both vectors of every
// facelet in that face's layer; the facelet now carrying the rotated frame
// is the move's target position.

use super::moves::Move;
use super::Color;
use crate::consts::FACELET_COUNT;
use std::ops::RangeInclusive;
use strum_macros::{Display, EnumIter};

pub type Vec3 = [i8; 3];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
pub enum Face {
    Front,
    Left,
    Up,
    Right,
    Down,
    Back,
}

impl Face {
    /// Blocks of nine positions, in state-vector order.
    pub const ALL: [Face; 6] = [
        Face::Front,
        Face::Left,
        Face::Up,
        Face::Right,
        Face::Down,
        Face::Back,
    ];

    pub fn solved_color(self) -> Color {
        match self {
            Face::Front => Color::White,
            Face::Left => Color::Red,
            Face::Up => Color::Green,
            Face::Right => Color::Orange,
            Face::Down => Color::Blue,
            Face::Back => Color::Yellow,
        }
    }

    pub fn normal(self) -> Vec3 {
        match self {
            Face::Front => [0, 0, 1],
            Face::Left => [-1, 0, 0],
            Face::Up => [0, 1, 0],
            Face::Right => [1, 0, 0],
            Face::Down => [0, -1, 0],
            Face::Back => [0, 0, -1],
        }
    }

    /// 1-based positions belonging to this face.
    pub fn positions(self) -> RangeInclusive<usize> {
        let start = (self as usize) * 9 + 1;
        start..=start + 8
    }
}

/// Cubie position and outward normal of a 0-based facelet index.
pub fn facelet_frame(index: usize) -> (Vec3, Vec3) {
    let face = Face::ALL[index / 9];
    let r = ((index % 9) / 3) as i8;
    let c = (index % 3) as i8;

    let pos = match face {
        Face::Front => [c - 1, 1 - r, 1],
        Face::Left => [-1, 1 - r, c - 1],
        Face::Up => [c - 1, 1, r - 1],
        Face::Right => [1, 1 - r, 1 - c],
        Face::Down => [c - 1, -1, 1 - r],
        // Unfolded below Down: row 0 touches Down's far edge.
        Face::Back => [c - 1, r - 1, -1],
    };
    (pos, face.normal())
}

#[inline]
fn dot(a: Vec3, b: Vec3) -> i8 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[inline]
fn cross(a: Vec3, b: Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// Quarter turn about a unit axis; clockwise as seen from the axis tip.
fn quarter_turn(v: Vec3, axis: Vec3, clockwise: bool) -> Vec3 {
    let d = dot(axis, v);
    let x = cross(axis, v);
    let sign = if clockwise { -1 } else { 1 };
    [
        axis[0] * d + sign * x[0],
        axis[1] * d + sign * x[1],
        axis[2] * d + sign * x[2],
    ]
}

/// (source, target) pairs, 0-based, for one canonical move.
/// Fixed points (the face center) are left out.
pub fn standard_pairs(mv: Move) -> Vec<(u8, u8)> {
    let axis = mv.face().normal();
    let clockwise = mv.is_clockwise();
    let frames: Vec<(Vec3, Vec3)> = (0..FACELET_COUNT).map(facelet_frame).collect();

    let mut pairs = Vec::with_capacity(20);
    for (source, &(pos, normal)) in frames.iter().enumerate() {
        if dot(pos, axis) != 1 {
            continue;
        }
        let moved = (
            quarter_turn(pos, axis, clockwise),
            quarter_turn(normal, axis, clockwise),
        );
        if let Some(target) = frames.iter().position(|f| *f == moved) {
            if target != source {
                pairs.push((source as u8, target as u8));
            }
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_are_unique() {
        let frames: Vec<_> = (0..FACELET_COUNT).map(facelet_frame).collect();
        for i in 0..FACELET_COUNT {
            for j in (i + 1)..FACELET_COUNT {
                assert_ne!(frames[i], frames[j], "facelets {} and {} collide", i + 1, j + 1);
            }
        }
    }

    #[test]
    fn test_every_move_cycles_twenty_facelets() {
        for mv in Move::ALL {
            assert_eq!(standard_pairs(mv).len(), 20, "move {}", mv);
        }
    }

    #[test]
    fn test_front_turn_moves_top_left_to_top_right() {
        // Clockwise from the front: corner 1 travels to corner 3.
        let pairs = standard_pairs(Move::F);
        assert!(pairs.contains(&(0, 2)));
        // Up's bottom-left sticker (25) lands on Right's top-left (28).
        assert!(pairs.contains(&(24, 27)));
    }

    #[test]
    fn test_right_turn_lifts_front_into_up() {
        // Front-right edge sticker (6) goes to Up's right edge (24).
        let pairs = standard_pairs(Move::R);
        assert!(pairs.contains(&(5, 23)));
    }
}
