//! Board query interface - hex grid, terrain, buildings and minefields
//!
//! The board is shared state: movement resolution reads it freely and
//! writes only destructive terrain effects (ice breaking, collapses,
//! minefield consumption).

pub mod board_map;
pub mod building;
pub mod hex;
pub mod minefield;
pub mod terrain;

pub use board_map::{Board, BoardQuery, Hex};
pub use building::{Building, BuildingClass};
pub use hex::{Facing, HexCoord};
pub use minefield::{MineKind, Minefield, DENSITY_LOSS_PER_DETONATION, LAID_MINEFIELD_DENSITY};
pub use terrain::Terrain;
