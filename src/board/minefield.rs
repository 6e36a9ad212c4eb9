//! Minefields laid in board hexes

use serde::{Deserialize, Serialize};

use crate::board::hex::HexCoord;
use crate::core::types::{MinefieldId, PlayerId};

/// Density removed from a minefield each time it goes off
pub const DENSITY_LOSS_PER_DETONATION: u32 = 5;

/// Density of a freshly laid field
pub const LAID_MINEFIELD_DENSITY: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MineKind {
    /// Triggered by ground contact on a die roll
    #[default]
    Conventional,
    /// Triggered by any unit at least as heavy as the setting
    Vibrabomb,
    /// Also triggered by low-flying craft
    Active,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Minefield {
    pub id: MinefieldId,
    pub coord: HexCoord,
    pub kind: MineKind,
    /// Damage dealt on detonation
    pub density: u32,
    /// Vibrabomb weight threshold in tons
    pub setting: u32,
    pub owner: PlayerId,
}

impl Minefield {
    pub fn new(coord: HexCoord, kind: MineKind, density: u32, owner: PlayerId) -> Self {
        Self {
            id: MinefieldId::new(),
            coord,
            kind,
            density,
            setting: 0,
            owner,
        }
    }

    pub fn with_setting(mut self, setting: u32) -> Self {
        self.setting = setting;
        self
    }

    /// Reduce density after a detonation; returns true when the field is spent
    pub fn reduce(&mut self) -> bool {
        self.density = self.density.saturating_sub(DENSITY_LOSS_PER_DETONATION);
        self.density == 0
    }
}
