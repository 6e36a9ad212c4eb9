//! Buildings that span one or more hexes
//!
//! Construction factor (CF) is shared by every hex of the building and
//! drops as units push through walls. A building at zero CF collapses.

use serde::{Deserialize, Serialize};

use crate::board::hex::HexCoord;
use crate::core::types::BuildingId;

/// Construction class of a building
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BuildingClass {
    #[default]
    Light,
    Medium,
    Heavy,
    Hardened,
}

impl BuildingClass {
    /// Construction factor of an undamaged building
    pub fn initial_cf(&self) -> u32 {
        match self {
            BuildingClass::Light => 15,
            BuildingClass::Medium => 40,
            BuildingClass::Heavy => 90,
            BuildingClass::Hardened => 120,
        }
    }

    /// Piloting modifier for moving through its walls
    pub fn entry_modifier(&self) -> i32 {
        match self {
            BuildingClass::Light => 0,
            BuildingClass::Medium => 1,
            BuildingClass::Heavy => 2,
            BuildingClass::Hardened => 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Building {
    pub id: BuildingId,
    pub name: String,
    pub class: BuildingClass,
    /// Height in levels above the hex level
    pub height: i32,
    pub cf: u32,
    pub hexes: Vec<HexCoord>,
}

impl Building {
    pub fn new(name: impl Into<String>, class: BuildingClass, height: i32, hexes: Vec<HexCoord>) -> Self {
        Self {
            id: BuildingId::new(),
            name: name.into(),
            class,
            height,
            cf: class.initial_cf(),
            hexes,
        }
    }

    /// Apply damage; returns true when the building collapses
    pub fn take_damage(&mut self, amount: u32) -> bool {
        self.cf = self.cf.saturating_sub(amount);
        self.cf == 0
    }

    /// Would this much weight bring it down?
    pub fn overloaded_by(&self, tonnage: u32) -> bool {
        tonnage > self.cf
    }
}
