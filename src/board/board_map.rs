//! Board with hex grid, terrain, buildings and minefields
//!
//! The movement engine reads the board through [`BoardQuery`] and writes
//! back only the destructive terrain effects it causes (broken ice,
//! collapsed buildings, spent minefields). Those writes are visible to every
//! unit that resolves after this one in the same phase.

use serde::{Deserialize, Serialize};

use crate::board::building::Building;
use crate::board::hex::HexCoord;
use crate::board::minefield::Minefield;
use crate::board::terrain::Terrain;
use crate::core::types::{BuildingId, MinefieldId};

/// A single hex on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hex {
    pub coord: HexCoord,
    /// Ground level
    pub level: i32,
    pub terrain: Terrain,
    #[serde(default)]
    pub road: bool,
    #[serde(default)]
    pub water_depth: u8,
    #[serde(default)]
    pub ice: bool,
    #[serde(default)]
    pub fire: bool,
    /// This hex is the top of a cliff toward its lower neighbors
    #[serde(default)]
    pub cliff_top: bool,
    #[serde(default)]
    pub fog: bool,
    #[serde(default)]
    pub building: Option<BuildingId>,
}

impl Hex {
    pub fn new(coord: HexCoord, terrain: Terrain) -> Self {
        Self {
            coord,
            level: 0,
            terrain,
            road: false,
            water_depth: 0,
            ice: false,
            fire: false,
            cliff_top: false,
            fog: false,
            building: None,
        }
    }

    pub fn has_water(&self) -> bool {
        self.water_depth > 0
    }

    /// Water not covered by ice
    pub fn open_water(&self) -> bool {
        self.water_depth > 0 && !self.ice
    }

    /// Movement point cost to enter this hex for a ground unit
    pub fn mp_cost(&self) -> u32 {
        let water = match (self.open_water(), self.water_depth) {
            (false, _) => 0,
            (true, 1) => 1,
            (true, _) => 3,
        };
        self.terrain.mp_cost() + water
    }
}

/// Read access to the board plus the narrow set of terrain mutations the
/// movement engine is allowed to perform
pub trait BoardQuery {
    fn in_bounds(&self, coord: HexCoord) -> bool;

    fn hex(&self, coord: HexCoord) -> Option<&Hex>;

    fn building(&self, id: BuildingId) -> Option<&Building>;

    /// Minefields in a hex (cloned so callers can mutate the board afterwards)
    fn minefields_at(&self, coord: HexCoord) -> Vec<Minefield>;

    /// Hex on the outermost ring of the board
    fn is_edge(&self, coord: HexCoord) -> bool;

    /// Remove the ice from a hex; returns false if there was none
    fn break_ice(&mut self, coord: HexCoord) -> bool;

    /// Turn a swamp into quicksand; returns false if the hex is not swamp
    fn reveal_quicksand(&mut self, coord: HexCoord) -> bool;

    /// Turn a magma crust into liquid magma
    fn break_magma_crust(&mut self, coord: HexCoord) -> bool;

    /// Apply damage to a building; returns true if it collapsed
    fn damage_building(&mut self, id: BuildingId, amount: u32) -> bool;

    /// Bring a building down, leaving rubble in all of its hexes
    fn collapse_building(&mut self, id: BuildingId);

    fn add_minefield(&mut self, field: Minefield);

    fn remove_minefield(&mut self, id: MinefieldId);

    /// Reduce density after a detonation; returns true if the field is spent
    fn reduce_minefield(&mut self, id: MinefieldId) -> bool;

    // === DERIVED QUERIES ===

    fn level(&self, coord: HexCoord) -> Option<i32> {
        self.hex(coord).map(|h| h.level)
    }

    fn building_at(&self, coord: HexCoord) -> Option<&Building> {
        self.hex(coord)
            .and_then(|h| h.building)
            .and_then(|id| self.building(id))
    }

    /// Height of whatever stands on the hex (building roof), 0 if nothing
    fn surface_height(&self, coord: HexCoord) -> i32 {
        self.building_at(coord).map(|b| b.height).unwrap_or(0)
    }

    fn water_depth(&self, coord: HexCoord) -> u8 {
        self.hex(coord).map(|h| h.water_depth).unwrap_or(0)
    }
}

/// The concrete board store (parallelogram of `width` x `height` hexes)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub width: u32,
    pub height: u32,
    hexes: Vec<Hex>,
    #[serde(default)]
    pub buildings: Vec<Building>,
    #[serde(default)]
    pub minefields: Vec<Minefield>,
}

impl Board {
    /// Create a new board with clear terrain at level 0
    pub fn new(width: u32, height: u32) -> Self {
        let mut hexes = Vec::with_capacity((width * height) as usize);
        for r in 0..height as i32 {
            for q in 0..width as i32 {
                hexes.push(Hex::new(HexCoord::new(q, r), Terrain::Clear));
            }
        }

        Self {
            width,
            height,
            hexes,
            buildings: Vec::new(),
            minefields: Vec::new(),
        }
    }

    fn index(&self, coord: HexCoord) -> Option<usize> {
        if self.in_bounds(coord) {
            Some((coord.r as u32 * self.width + coord.q as u32) as usize)
        } else {
            None
        }
    }

    /// Get a mutable hex at the given coordinate
    pub fn hex_mut(&mut self, coord: HexCoord) -> Option<&mut Hex> {
        let idx = self.index(coord)?;
        self.hexes.get_mut(idx)
    }

    /// Set terrain at a coordinate
    pub fn set_terrain(&mut self, coord: HexCoord, terrain: Terrain) {
        if let Some(hex) = self.hex_mut(coord) {
            hex.terrain = terrain;
        }
    }

    /// Set ground level at a coordinate
    pub fn set_level(&mut self, coord: HexCoord, level: i32) {
        if let Some(hex) = self.hex_mut(coord) {
            hex.level = level;
        }
    }

    pub fn set_water(&mut self, coord: HexCoord, depth: u8) {
        if let Some(hex) = self.hex_mut(coord) {
            hex.water_depth = depth;
        }
    }

    /// Place a building and link every hex it covers
    pub fn add_building(&mut self, building: Building) -> BuildingId {
        let id = building.id;
        for coord in &building.hexes {
            if let Some(hex) = self.hex_mut(*coord) {
                hex.building = Some(id);
            }
        }
        self.buildings.push(building);
        id
    }

    pub fn building_mut(&mut self, id: BuildingId) -> Option<&mut Building> {
        self.buildings.iter_mut().find(|b| b.id == id)
    }

    /// Modify a hex in place
    pub fn edit(&mut self, coord: HexCoord, f: impl FnOnce(&mut Hex)) {
        if let Some(hex) = self.hex_mut(coord) {
            f(hex);
        }
    }
}

impl BoardQuery for Board {
    fn in_bounds(&self, coord: HexCoord) -> bool {
        coord.q >= 0 && coord.r >= 0 && coord.q < self.width as i32 && coord.r < self.height as i32
    }

    fn hex(&self, coord: HexCoord) -> Option<&Hex> {
        let idx = self.index(coord)?;
        self.hexes.get(idx)
    }

    fn building(&self, id: BuildingId) -> Option<&Building> {
        self.buildings.iter().find(|b| b.id == id)
    }

    fn minefields_at(&self, coord: HexCoord) -> Vec<Minefield> {
        self.minefields
            .iter()
            .filter(|m| m.coord == coord)
            .cloned()
            .collect()
    }

    fn is_edge(&self, coord: HexCoord) -> bool {
        self.in_bounds(coord)
            && (coord.q == 0
                || coord.r == 0
                || coord.q == self.width as i32 - 1
                || coord.r == self.height as i32 - 1)
    }

    fn break_ice(&mut self, coord: HexCoord) -> bool {
        match self.hex_mut(coord) {
            Some(hex) if hex.ice => {
                hex.ice = false;
                true
            }
            _ => false,
        }
    }

    fn reveal_quicksand(&mut self, coord: HexCoord) -> bool {
        match self.hex_mut(coord) {
            Some(hex) if hex.terrain == Terrain::Swamp => {
                hex.terrain = Terrain::Quicksand;
                true
            }
            _ => false,
        }
    }

    fn break_magma_crust(&mut self, coord: HexCoord) -> bool {
        match self.hex_mut(coord) {
            Some(hex) if hex.terrain == Terrain::MagmaCrust => {
                hex.terrain = Terrain::MagmaLiquid;
                true
            }
            _ => false,
        }
    }

    fn damage_building(&mut self, id: BuildingId, amount: u32) -> bool {
        let collapsed = match self.building_mut(id) {
            Some(building) => building.take_damage(amount),
            None => return false,
        };
        if collapsed {
            self.collapse_building(id);
        }
        collapsed
    }

    fn collapse_building(&mut self, id: BuildingId) {
        let Some(pos) = self.buildings.iter().position(|b| b.id == id) else {
            return;
        };
        let building = self.buildings.remove(pos);
        for coord in building.hexes {
            if let Some(hex) = self.hex_mut(coord) {
                hex.building = None;
                hex.terrain = Terrain::Rubble;
            }
        }
    }

    fn add_minefield(&mut self, field: Minefield) {
        self.minefields.push(field);
    }

    fn remove_minefield(&mut self, id: MinefieldId) {
        self.minefields.retain(|m| m.id != id);
    }

    fn reduce_minefield(&mut self, id: MinefieldId) -> bool {
        let spent = match self.minefields.iter_mut().find(|m| m.id == id) {
            Some(field) => field.reduce(),
            None => return false,
        };
        if spent {
            self.remove_minefield(id);
        }
        spent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::building::BuildingClass;
    use crate::board::minefield::MineKind;
    use crate::core::types::PlayerId;

    #[test]
    fn test_board_creation() {
        let board = Board::new(10, 8);
        assert_eq!(board.width, 10);
        assert!(board.hex(HexCoord::new(9, 7)).is_some());
        assert!(board.hex(HexCoord::new(10, 0)).is_none());
        assert!(board.hex(HexCoord::new(-1, 0)).is_none());
    }

    #[test]
    fn test_edges() {
        let board = Board::new(10, 10);
        assert!(board.is_edge(HexCoord::new(0, 5)));
        assert!(board.is_edge(HexCoord::new(9, 5)));
        assert!(!board.is_edge(HexCoord::new(5, 5)));
        assert!(!board.is_edge(HexCoord::new(20, 5)));
    }

    #[test]
    fn test_hex_cost_with_water() {
        let mut hex = Hex::new(HexCoord::new(0, 0), Terrain::Clear);
        hex.water_depth = 1;
        assert_eq!(hex.mp_cost(), 2);
        hex.water_depth = 2;
        assert_eq!(hex.mp_cost(), 4);
        hex.ice = true;
        assert_eq!(hex.mp_cost(), 1);
    }

    #[test]
    fn test_break_ice_once() {
        let mut board = Board::new(5, 5);
        let c = HexCoord::new(2, 2);
        board.edit(c, |h| h.ice = true);
        assert!(board.break_ice(c));
        assert!(!board.break_ice(c));
    }

    #[test]
    fn test_reveal_quicksand_only_in_swamp() {
        let mut board = Board::new(5, 5);
        let c = HexCoord::new(1, 1);
        assert!(!board.reveal_quicksand(c));
        board.set_terrain(c, Terrain::Swamp);
        assert!(board.reveal_quicksand(c));
        assert_eq!(board.hex(c).unwrap().terrain, Terrain::Quicksand);
    }

    #[test]
    fn test_building_collapse_leaves_rubble() {
        let mut board = Board::new(5, 5);
        let hexes = vec![HexCoord::new(1, 1), HexCoord::new(2, 1)];
        let id = board.add_building(Building::new("Barn", BuildingClass::Light, 2, hexes));
        assert_eq!(board.surface_height(HexCoord::new(2, 1)), 2);

        assert!(board.damage_building(id, 20));
        assert!(board.building(id).is_none());
        assert_eq!(board.hex(HexCoord::new(2, 1)).unwrap().terrain, Terrain::Rubble);
        assert_eq!(board.surface_height(HexCoord::new(2, 1)), 0);
    }

    #[test]
    fn test_minefield_spent_after_reductions() {
        let mut board = Board::new(5, 5);
        let c = HexCoord::new(3, 3);
        let field = Minefield::new(c, MineKind::Conventional, 10, PlayerId(2));
        let id = field.id;
        board.add_minefield(field);

        assert_eq!(board.minefields_at(c).len(), 1);
        assert!(!board.reduce_minefield(id));
        assert!(board.reduce_minefield(id));
        assert!(board.minefields_at(c).is_empty());
    }

    #[test]
    fn test_board_serde_round_trip_keeps_buildings() {
        let mut board = Board::new(3, 3);
        board.add_building(Building::new("Hut", BuildingClass::Medium, 1, vec![HexCoord::new(1, 1)]));
        let json = serde_json::to_string(&board).unwrap();
        let back: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(back.surface_height(HexCoord::new(1, 1)), 1);
    }
}
