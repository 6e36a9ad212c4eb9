//! Base terrain types and their effects on movement
//!
//! A hex has exactly one base terrain. Water, ice, roads, fire and cliff
//! edges are carried as hex features on top of it.

use serde::{Deserialize, Serialize};

/// Primary terrain type for a hex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Terrain {
    #[default]
    Clear,
    Pavement,
    Rough,
    Rubble,
    LightWoods,
    HeavyWoods,
    Swamp,
    Quicksand,
    Mud,
    Sand,
    DeepSnow,
    MagmaCrust,
    MagmaLiquid,
}

impl Terrain {
    /// Movement point cost to enter, before elevation and water
    pub fn mp_cost(&self) -> u32 {
        match self {
            Terrain::Clear | Terrain::Pavement | Terrain::Sand | Terrain::MagmaCrust => 1,
            Terrain::Rough
            | Terrain::Rubble
            | Terrain::LightWoods
            | Terrain::Swamp
            | Terrain::Quicksand
            | Terrain::Mud => 2,
            Terrain::HeavyWoods | Terrain::DeepSnow | Terrain::MagmaLiquid => 3,
        }
    }

    /// Bog-down check modifier, if this terrain can bog a unit down
    pub fn bog_modifier(&self) -> Option<i32> {
        match self {
            Terrain::Swamp => Some(1),
            Terrain::Quicksand => Some(3),
            Terrain::Mud => Some(0),
            Terrain::DeepSnow => Some(1),
            Terrain::Sand => Some(0),
            _ => None,
        }
    }

    /// Paved surface for skid purposes
    pub fn is_paved(&self) -> bool {
        matches!(self, Terrain::Pavement)
    }

    pub fn is_woods(&self) -> bool {
        matches!(self, Terrain::LightWoods | Terrain::HeavyWoods)
    }

    pub fn is_magma(&self) -> bool {
        matches!(self, Terrain::MagmaCrust | Terrain::MagmaLiquid)
    }

    /// Can a low-flying craft set down here safely?
    pub fn is_landable(&self) -> bool {
        matches!(
            self,
            Terrain::Clear | Terrain::Pavement | Terrain::Rough | Terrain::Rubble | Terrain::Sand
        )
    }

    /// Height of the terrain itself above the hex level (woods canopy)
    pub fn canopy_height(&self) -> i32 {
        match self {
            Terrain::LightWoods | Terrain::HeavyWoods => 2,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_costs_one() {
        assert_eq!(Terrain::Clear.mp_cost(), 1);
        assert_eq!(Terrain::Pavement.mp_cost(), 1);
    }

    #[test]
    fn test_heavy_woods_costs_more_than_light() {
        assert!(Terrain::HeavyWoods.mp_cost() > Terrain::LightWoods.mp_cost());
    }

    #[test]
    fn test_quicksand_worse_than_swamp() {
        assert!(Terrain::Quicksand.bog_modifier() > Terrain::Swamp.bog_modifier());
        assert_eq!(Terrain::Clear.bog_modifier(), None);
    }

    #[test]
    fn test_only_pavement_is_paved() {
        assert!(Terrain::Pavement.is_paved());
        assert!(!Terrain::Rough.is_paved());
    }

    #[test]
    fn test_woods_not_landable() {
        assert!(!Terrain::LightWoods.is_landable());
        assert!(Terrain::Clear.is_landable());
    }
}
