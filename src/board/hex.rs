//! Hex coordinate system for the board (axial coordinates, flat-topped)
//!
//! Uses axial coordinates (q, r) for easy neighbor calculation. Facing 0 is
//! north and facings increase clockwise.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Axial hex coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct HexCoord {
    pub q: i32,
    pub r: i32,
}

impl HexCoord {
    pub fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Cube coordinate S (derived from q and r)
    pub fn s(&self) -> i32 {
        -self.q - self.r
    }

    /// Distance in hexes
    pub fn distance(&self, other: &Self) -> u32 {
        let dq = (self.q - other.q).abs();
        let dr = (self.r - other.r).abs();
        let ds = (self.s() - other.s()).abs();
        ((dq + dr + ds) / 2) as u32
    }

    /// The adjacent hex across the given hexside
    pub fn neighbor(&self, facing: Facing) -> HexCoord {
        let offset = facing.offset();
        HexCoord::new(self.q + offset.q, self.r + offset.r)
    }

    /// Get all 6 neighboring hex coordinates, in facing order
    pub fn neighbors(&self) -> [HexCoord; 6] {
        Facing::all().map(|f| self.neighbor(f))
    }

    /// Walk `steps` hexes in a straight line
    pub fn translated(&self, facing: Facing, steps: u32) -> HexCoord {
        let offset = facing.offset();
        HexCoord::new(
            self.q + offset.q * steps as i32,
            self.r + offset.r * steps as i32,
        )
    }

    /// Facing that leads from self to an adjacent hex
    pub fn direction_to(&self, other: &Self) -> Option<Facing> {
        Facing::all().into_iter().find(|f| self.neighbor(*f) == *other)
    }

    pub fn is_adjacent(&self, other: &Self) -> bool {
        self.distance(other) == 1
    }
}

impl fmt::Display for HexCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.q, self.r)
    }
}

/// Hexside a unit faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Facing {
    #[default]
    North,
    NorthEast,
    SouthEast,
    South,
    SouthWest,
    NorthWest,
}

impl Facing {
    /// Get the hex offset for this direction
    pub fn offset(&self) -> HexCoord {
        match self {
            Facing::North => HexCoord::new(0, -1),
            Facing::NorthEast => HexCoord::new(1, -1),
            Facing::SouthEast => HexCoord::new(1, 0),
            Facing::South => HexCoord::new(0, 1),
            Facing::SouthWest => HexCoord::new(-1, 1),
            Facing::NorthWest => HexCoord::new(-1, 0),
        }
    }

    pub fn index(&self) -> u8 {
        match self {
            Facing::North => 0,
            Facing::NorthEast => 1,
            Facing::SouthEast => 2,
            Facing::South => 3,
            Facing::SouthWest => 4,
            Facing::NorthWest => 5,
        }
    }

    /// Facing for an index, wrapping modulo 6 (negative indices wrap too)
    pub fn from_index(index: i32) -> Self {
        Self::all()[index.rem_euclid(6) as usize]
    }

    /// Rotate clockwise by `hexsides` (negative rotates counter-clockwise)
    pub fn rotate(&self, hexsides: i32) -> Self {
        Self::from_index(self.index() as i32 + hexsides)
    }

    pub fn turn_right(&self) -> Self {
        self.rotate(1)
    }

    pub fn turn_left(&self) -> Self {
        self.rotate(-1)
    }

    /// Get opposite direction
    pub fn opposite(&self) -> Self {
        self.rotate(3)
    }

    /// All directions
    pub fn all() -> [Facing; 6] {
        [
            Facing::North,
            Facing::NorthEast,
            Facing::SouthEast,
            Facing::South,
            Facing::SouthWest,
            Facing::NorthWest,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_distance_same() {
        let a = HexCoord::new(0, 0);
        assert_eq!(a.distance(&a), 0);
    }

    #[test]
    fn test_hex_distance_adjacent() {
        let a = HexCoord::new(3, 3);
        for n in a.neighbors() {
            assert_eq!(a.distance(&n), 1);
        }
    }

    #[test]
    fn test_translated_distance() {
        let a = HexCoord::new(5, 5);
        let b = a.translated(Facing::SouthEast, 4);
        assert_eq!(a.distance(&b), 4);
    }

    #[test]
    fn test_direction_to_neighbor() {
        let a = HexCoord::new(2, 2);
        let b = a.neighbor(Facing::SouthWest);
        assert_eq!(a.direction_to(&b), Some(Facing::SouthWest));
        assert_eq!(a.direction_to(&HexCoord::new(9, 9)), None);
    }

    #[test]
    fn test_rotation_wraps() {
        assert_eq!(Facing::North.turn_left(), Facing::NorthWest);
        assert_eq!(Facing::NorthWest.turn_right(), Facing::North);
        assert_eq!(Facing::from_index(-2), Facing::SouthWest);
        assert_eq!(Facing::SouthEast.rotate(7), Facing::South);
    }

    #[test]
    fn test_direction_opposite() {
        assert_eq!(Facing::North.opposite(), Facing::South);
        assert_eq!(Facing::NorthEast.opposite(), Facing::SouthWest);
    }

    #[test]
    fn test_opposite_offsets_cancel() {
        for f in Facing::all() {
            let a = f.offset();
            let b = f.opposite().offset();
            assert_eq!((a.q + b.q, a.r + b.r), (0, 0));
        }
    }
}
