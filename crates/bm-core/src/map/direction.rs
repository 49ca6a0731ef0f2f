//! Travel directions between systems.

use serde::{Deserialize, Serialize};
use strum::EnumIter;

/// A physical direction in which to travel.
///
/// Declaration order is the canonical order; every walk over a system's
/// neighbors follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns the direction opposite to this one.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}
