//! Unit categories and their movement capabilities
//!
//! Rules never test "is this a tank?". They ask a category for the
//! capability they need (ground, air, water) and query that.

use serde::{Deserialize, Serialize};

use crate::board::board_map::Hex;
use crate::board::terrain::Terrain;

/// Broad kind of unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum UnitCategory {
    #[default]
    Mech,
    Tracked,
    Wheeled,
    Hover,
    Vtol,
    Wige,
    Infantry,
    BattleArmor,
    Aerodyne,
    Spheroid,
}

/// Movement on the ground
pub trait GroundMovable {
    /// Terrain legality for entering a hex on the ground
    fn can_enter(&self, hex: &Hex) -> bool;

    /// Levels the unit can climb in one step
    fn max_climb(&self) -> i32;

    /// Falls over on a failed check (otherwise the unit just stops)
    fn falls(&self) -> bool {
        false
    }

    fn skids(&self) -> bool {
        true
    }

    fn bogs_down(&self, terrain: Terrain) -> bool {
        terrain.bog_modifier().is_some() && terrain != Terrain::Sand
    }

    fn breaks_ice(&self) -> bool {
        true
    }

    /// Height in levels above the level the unit stands on
    fn height(&self) -> i32 {
        0
    }

    fn is_vehicle(&self) -> bool {
        false
    }
}

/// Movement above the ground
pub trait AirMovable {
    /// Lateral slides on failed handling checks
    fn sideslips(&self) -> bool {
        true
    }

    fn is_aerospace(&self) -> bool {
        false
    }

    fn is_spheroid(&self) -> bool {
        false
    }

    /// Highest elevation above the surface this craft cruises at
    fn max_elevation(&self) -> i32;

    fn can_land_on(&self, hex: &Hex) -> bool {
        hex.terrain.is_landable() || hex.ice || hex.has_water()
    }
}

/// Movement in water
pub trait WaterMovable {
    /// Deepest water the unit can enter; `None` means any depth
    fn max_depth(&self) -> Option<u8>;

    /// Stays on the surface instead of submerging
    fn floats(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MechProfile;

#[derive(Debug, Clone, Copy)]
pub struct TrackedProfile;

#[derive(Debug, Clone, Copy)]
pub struct WheeledProfile;

#[derive(Debug, Clone, Copy)]
pub struct HoverProfile;

#[derive(Debug, Clone, Copy)]
pub struct VtolProfile;

#[derive(Debug, Clone, Copy)]
pub struct WigeProfile;

#[derive(Debug, Clone, Copy)]
pub struct FootProfile;

#[derive(Debug, Clone, Copy)]
pub struct AeroProfile {
    spheroid: bool,
}

static MECH: MechProfile = MechProfile;
static TRACKED: TrackedProfile = TrackedProfile;
static WHEELED: WheeledProfile = WheeledProfile;
static HOVER: HoverProfile = HoverProfile;
static VTOL: VtolProfile = VtolProfile;
static WIGE: WigeProfile = WigeProfile;
static FOOT: FootProfile = FootProfile;
static AERODYNE: AeroProfile = AeroProfile { spheroid: false };
static SPHEROID: AeroProfile = AeroProfile { spheroid: true };

impl GroundMovable for MechProfile {
    fn can_enter(&self, _hex: &Hex) -> bool {
        true
    }

    fn max_climb(&self) -> i32 {
        2
    }

    fn falls(&self) -> bool {
        true
    }

    fn height(&self) -> i32 {
        1
    }
}

impl WaterMovable for MechProfile {
    fn max_depth(&self) -> Option<u8> {
        None
    }
}

impl GroundMovable for TrackedProfile {
    fn can_enter(&self, hex: &Hex) -> bool {
        !hex.open_water() && hex.terrain != Terrain::MagmaLiquid
    }

    fn max_climb(&self) -> i32 {
        1
    }

    fn is_vehicle(&self) -> bool {
        true
    }
}

impl WaterMovable for TrackedProfile {
    fn max_depth(&self) -> Option<u8> {
        Some(0)
    }
}

impl GroundMovable for WheeledProfile {
    fn can_enter(&self, hex: &Hex) -> bool {
        if hex.road {
            return !hex.open_water();
        }
        !hex.open_water()
            && !hex.terrain.is_woods()
            && !matches!(
                hex.terrain,
                Terrain::Rough | Terrain::Rubble | Terrain::DeepSnow | Terrain::MagmaLiquid
            )
    }

    fn max_climb(&self) -> i32 {
        1
    }

    fn bogs_down(&self, terrain: Terrain) -> bool {
        terrain.bog_modifier().is_some()
    }

    fn is_vehicle(&self) -> bool {
        true
    }
}

impl WaterMovable for WheeledProfile {
    fn max_depth(&self) -> Option<u8> {
        Some(0)
    }
}

impl GroundMovable for HoverProfile {
    fn can_enter(&self, hex: &Hex) -> bool {
        !hex.terrain.is_woods() && hex.terrain != Terrain::MagmaLiquid
    }

    fn max_climb(&self) -> i32 {
        1
    }

    fn skids(&self) -> bool {
        false
    }

    fn bogs_down(&self, _terrain: Terrain) -> bool {
        false
    }

    fn breaks_ice(&self) -> bool {
        false
    }

    fn is_vehicle(&self) -> bool {
        true
    }
}

impl AirMovable for HoverProfile {
    fn max_elevation(&self) -> i32 {
        0
    }
}

impl WaterMovable for HoverProfile {
    fn max_depth(&self) -> Option<u8> {
        None
    }

    fn floats(&self) -> bool {
        true
    }
}

impl AirMovable for VtolProfile {
    fn max_elevation(&self) -> i32 {
        50
    }
}

impl GroundMovable for WigeProfile {
    fn can_enter(&self, hex: &Hex) -> bool {
        !hex.terrain.is_woods() && hex.terrain != Terrain::MagmaLiquid
    }

    fn max_climb(&self) -> i32 {
        1
    }

    fn skids(&self) -> bool {
        false
    }

    fn bogs_down(&self, _terrain: Terrain) -> bool {
        false
    }

    fn breaks_ice(&self) -> bool {
        false
    }

    fn is_vehicle(&self) -> bool {
        true
    }
}

impl AirMovable for WigeProfile {
    fn max_elevation(&self) -> i32 {
        1
    }
}

impl WaterMovable for WigeProfile {
    fn max_depth(&self) -> Option<u8> {
        None
    }

    fn floats(&self) -> bool {
        true
    }
}

impl GroundMovable for FootProfile {
    fn can_enter(&self, hex: &Hex) -> bool {
        !hex.open_water() && hex.terrain != Terrain::MagmaLiquid
    }

    fn max_climb(&self) -> i32 {
        2
    }

    fn skids(&self) -> bool {
        false
    }

    fn breaks_ice(&self) -> bool {
        false
    }
}

impl AirMovable for AeroProfile {
    fn sideslips(&self) -> bool {
        false
    }

    fn is_aerospace(&self) -> bool {
        true
    }

    fn is_spheroid(&self) -> bool {
        self.spheroid
    }

    fn max_elevation(&self) -> i32 {
        10
    }
}

impl UnitCategory {
    pub fn ground(&self) -> Option<&'static dyn GroundMovable> {
        match self {
            UnitCategory::Mech => Some(&MECH),
            UnitCategory::Tracked => Some(&TRACKED),
            UnitCategory::Wheeled => Some(&WHEELED),
            UnitCategory::Hover => Some(&HOVER),
            UnitCategory::Wige => Some(&WIGE),
            UnitCategory::Infantry | UnitCategory::BattleArmor => Some(&FOOT),
            UnitCategory::Vtol | UnitCategory::Aerodyne | UnitCategory::Spheroid => None,
        }
    }

    pub fn air(&self) -> Option<&'static dyn AirMovable> {
        match self {
            UnitCategory::Hover => Some(&HOVER),
            UnitCategory::Vtol => Some(&VTOL),
            UnitCategory::Wige => Some(&WIGE),
            UnitCategory::Aerodyne => Some(&AERODYNE),
            UnitCategory::Spheroid => Some(&SPHEROID),
            _ => None,
        }
    }

    pub fn water(&self) -> Option<&'static dyn WaterMovable> {
        match self {
            UnitCategory::Mech => Some(&MECH),
            UnitCategory::Tracked => Some(&TRACKED),
            UnitCategory::Wheeled => Some(&WHEELED),
            UnitCategory::Hover => Some(&HOVER),
            UnitCategory::Wige => Some(&WIGE),
            _ => None,
        }
    }

    pub fn is_aerospace(&self) -> bool {
        self.air().map(|a| a.is_aerospace()).unwrap_or(false)
    }

    pub fn is_infantry(&self) -> bool {
        matches!(self, UnitCategory::Infantry | UnitCategory::BattleArmor)
    }

    /// Units that resolve sideslips rather than skids
    pub fn sideslips(&self) -> bool {
        self.air().map(|a| a.sideslips()).unwrap_or(false)
    }

    /// Can make charge attacks
    pub fn can_charge(&self) -> bool {
        matches!(
            self,
            UnitCategory::Mech | UnitCategory::Tracked | UnitCategory::Wheeled | UnitCategory::Hover
        )
    }

    /// Can make ramming attacks
    pub fn can_ram(&self) -> bool {
        matches!(
            self,
            UnitCategory::Aerodyne | UnitCategory::Spheroid | UnitCategory::Vtol | UnitCategory::Wige
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::hex::HexCoord;

    fn hex(terrain: Terrain) -> Hex {
        Hex::new(HexCoord::new(0, 0), terrain)
    }

    #[test]
    fn test_mech_enters_anything() {
        let ground = UnitCategory::Mech.ground().unwrap();
        assert!(ground.can_enter(&hex(Terrain::HeavyWoods)));
        assert!(ground.falls());
    }

    #[test]
    fn test_wheeled_stays_out_of_woods_unless_road() {
        let ground = UnitCategory::Wheeled.ground().unwrap();
        let mut woods = hex(Terrain::LightWoods);
        assert!(!ground.can_enter(&woods));
        woods.road = true;
        assert!(ground.can_enter(&woods));
    }

    #[test]
    fn test_tracked_cannot_ford() {
        let ground = UnitCategory::Tracked.ground().unwrap();
        let mut water = hex(Terrain::Clear);
        water.water_depth = 1;
        assert!(!ground.can_enter(&water));
    }

    #[test]
    fn test_hover_floats_and_sideslips() {
        assert!(UnitCategory::Hover.water().unwrap().floats());
        assert!(UnitCategory::Hover.sideslips());
        assert!(!UnitCategory::Hover.ground().unwrap().skids());
    }

    #[test]
    fn test_vtol_has_no_ground_movement() {
        assert!(UnitCategory::Vtol.ground().is_none());
        assert!(UnitCategory::Vtol.air().is_some());
    }

    #[test]
    fn test_aero_capabilities() {
        assert!(UnitCategory::Aerodyne.is_aerospace());
        assert!(UnitCategory::Spheroid.air().unwrap().is_spheroid());
        assert!(!UnitCategory::Aerodyne.sideslips());
    }

    #[test]
    fn test_only_wheeled_bogs_in_sand() {
        assert!(UnitCategory::Wheeled.ground().unwrap().bogs_down(Terrain::Sand));
        assert!(!UnitCategory::Mech.ground().unwrap().bogs_down(Terrain::Sand));
        assert!(UnitCategory::Mech.ground().unwrap().bogs_down(Terrain::Swamp));
    }

    #[test]
    fn test_infantry_cannot_charge() {
        assert!(!UnitCategory::Infantry.can_charge());
        assert!(UnitCategory::Mech.can_charge());
    }
}
