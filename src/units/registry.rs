//! Registry of every unit in the game, keyed by id
//!
//! Relations between units (swarming, transport, towing) are stored as ids
//! and resolved through this registry; no unit owns another.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::board::hex::HexCoord;
use crate::core::types::UnitId;
use crate::units::unit::UnitState;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnitRegistry {
    units: AHashMap<UnitId, UnitState>,
}

impl UnitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, unit: UnitState) -> UnitId {
        let id = unit.id;
        self.units.insert(id, unit);
        id
    }

    pub fn remove(&mut self, id: UnitId) -> Option<UnitState> {
        self.units.remove(&id)
    }

    pub fn get(&self, id: UnitId) -> Option<&UnitState> {
        self.units.get(&id)
    }

    pub fn get_mut(&mut self, id: UnitId) -> Option<&mut UnitState> {
        self.units.get_mut(&id)
    }

    pub fn contains(&self, id: UnitId) -> bool {
        self.units.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Units in id order, so callers iterate deterministically
    pub fn ids(&self) -> Vec<UnitId> {
        let mut ids: Vec<UnitId> = self.units.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Deployed units standing in a hex, in id order
    pub fn occupants(&self, coord: HexCoord) -> Vec<UnitId> {
        let mut ids: Vec<UnitId> = self
            .units
            .values()
            .filter(|u| u.is_deployed() && u.position == coord)
            .map(|u| u.id)
            .collect();
        ids.sort();
        ids
    }

    /// Deployed ground-level units in a hex other than `except`
    pub fn ground_occupants(&self, coord: HexCoord, except: UnitId) -> Vec<UnitId> {
        self.occupants(coord)
            .into_iter()
            .filter(|id| *id != except)
            .filter(|id| self.get(*id).map(|u| !u.is_airborne()).unwrap_or(false))
            .collect()
    }

    /// Would `unit` standing in `coord` break stacking?
    ///
    /// Enemies never share a hex; two non-infantry ground units never
    /// share a hex. Airborne units do not stack with the ground.
    pub fn violates_stacking(&self, unit: &UnitState, coord: HexCoord) -> bool {
        if unit.is_airborne() {
            return false;
        }
        self.ground_occupants(coord, unit.id).into_iter().any(|id| {
            let Some(other) = self.get(id) else {
                return false;
            };
            other.owner != unit.owner
                || (!other.category.is_infantry() && !unit.category.is_infantry())
        })
    }

    /// Enemy hidden units adjacent to or in a hex, in id order
    pub fn hidden_enemies_near(&self, unit: &UnitState, coord: HexCoord) -> Vec<UnitId> {
        let mut ids: Vec<UnitId> = self
            .units
            .values()
            .filter(|u| u.is_deployed() && u.status.hidden && u.owner != unit.owner)
            .filter(|u| u.position.distance(&coord) <= 1)
            .map(|u| u.id)
            .collect();
        ids.sort();
        ids
    }
}
