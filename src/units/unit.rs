//! Long-lived unit state
//!
//! A unit spans the whole game. During one path resolution only the
//! movement engine may mutate it.

use serde::{Deserialize, Serialize};

use crate::board::hex::{Facing, HexCoord};
use crate::core::types::{PlayerId, UnitId};
use crate::movement::path::MoveType;
use crate::units::category::UnitCategory;

/// Crew hits at which the crew is killed
pub const LETHAL_CREW_HITS: u8 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crew {
    pub piloting: i32,
    pub gunnery: i32,
    pub hits: u8,
}

impl Default for Crew {
    fn default() -> Self {
        Self {
            piloting: 5,
            gunnery: 4,
            hits: 0,
        }
    }
}

/// Critical damage that affects handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CriticalState {
    pub gyro_hits: u8,
    pub leg_actuator_hits: u8,
    pub hip_hits: u8,
    pub legs_destroyed: u8,
}

impl CriticalState {
    /// Any damage that makes a jump landing risky
    pub fn legs_or_gyro_damaged(&self) -> bool {
        self.gyro_hits > 0 || self.leg_actuator_hits > 0 || self.hip_hits > 0 || self.legs_destroyed > 0
    }
}

/// Equipment and design quirks that modify handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Equipment {
    #[serde(default)]
    pub small_cockpit: bool,
    #[serde(default)]
    pub hardened_armor: bool,
    #[serde(default)]
    pub prototype_docking_collar: bool,
    #[serde(default)]
    pub quad: bool,
}

/// Posture and status flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusFlags {
    pub prone: bool,
    pub hull_down: bool,
    pub stuck: bool,
    pub shutdown: bool,
    pub self_destructing: bool,
    pub evading: bool,
    pub bracing: bool,
    pub dug_in: bool,
    pub fortified: bool,
    pub searchlight: bool,
    pub climb_mode: bool,
    pub hidden: bool,
    pub done: bool,
    pub destroyed: bool,
    pub fled: bool,
    pub crew_ejected: bool,
}

/// Flight state for aerospace units; `UnitState::elevation` is altitude
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AeroState {
    pub velocity: u32,
    pub next_velocity: u32,
    pub thrust_spent: u32,
    pub safe_thrust: u32,
    pub max_thrust: u32,
    pub structural_integrity: u32,
    pub out_of_control: bool,
}

impl AeroState {
    pub fn new(safe_thrust: u32, structural_integrity: u32) -> Self {
        Self {
            velocity: 0,
            next_velocity: 0,
            thrust_spent: 0,
            safe_thrust,
            max_thrust: (safe_thrust * 3).div_ceil(2),
            structural_integrity,
            out_of_control: false,
        }
    }
}

/// One hex the unit passed through, with the facing it had there
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassedHex {
    pub coord: HexCoord,
    pub facing: Facing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitState {
    pub id: UnitId,
    pub owner: PlayerId,
    pub name: String,
    pub category: UnitCategory,
    /// Category a convertible unit switches to
    #[serde(default)]
    pub alt_category: Option<UnitCategory>,
    pub tonnage: u32,
    #[serde(default)]
    pub crew: Crew,

    // Movement allowance
    pub walk_mp: u32,
    pub run_mp: u32,
    #[serde(default)]
    pub jump_mp: u32,

    // Position
    pub position: HexCoord,
    pub facing: Facing,
    /// Levels above the hex level (altitude for aerospace)
    #[serde(default)]
    pub elevation: i32,

    // This turn
    #[serde(default)]
    pub mp_used: u32,
    #[serde(default)]
    pub distance_moved: u32,
    #[serde(default)]
    pub move_type: MoveType,
    #[serde(default)]
    pub passed_through: Vec<PassedHex>,

    #[serde(default)]
    pub status: StatusFlags,
    #[serde(default)]
    pub heat: u32,

    // Damage
    pub armor: u32,
    pub structure: u32,
    #[serde(default)]
    pub critical: CriticalState,
    #[serde(default)]
    pub equipment: Equipment,

    // Relations to other units, by id only
    #[serde(default)]
    pub swarm_attacker: Option<UnitId>,
    #[serde(default)]
    pub swarm_target: Option<UnitId>,
    #[serde(default)]
    pub loaded_in: Option<UnitId>,
    #[serde(default)]
    pub cargo: Vec<UnitId>,
    #[serde(default)]
    pub towing: Option<UnitId>,
    #[serde(default)]
    pub towed_by: Option<UnitId>,
    #[serde(default)]
    pub squadron: Option<UnitId>,

    #[serde(default)]
    pub aero: Option<AeroState>,
}

impl UnitState {
    pub fn new(name: impl Into<String>, category: UnitCategory, tonnage: u32) -> Self {
        let aero = category.is_aerospace().then(|| AeroState::new(5, 6));
        Self {
            id: UnitId::new(),
            owner: PlayerId::default(),
            name: name.into(),
            category,
            alt_category: None,
            tonnage,
            crew: Crew::default(),
            walk_mp: 4,
            run_mp: 6,
            jump_mp: 0,
            position: HexCoord::default(),
            facing: Facing::default(),
            elevation: 0,
            mp_used: 0,
            distance_moved: 0,
            move_type: MoveType::None,
            passed_through: Vec::new(),
            status: StatusFlags::default(),
            heat: 0,
            armor: tonnage * 2,
            structure: tonnage,
            critical: CriticalState::default(),
            equipment: Equipment::default(),
            swarm_attacker: None,
            swarm_target: None,
            loaded_in: None,
            cargo: Vec::new(),
            towing: None,
            towed_by: None,
            squadron: None,
            aero,
        }
    }

    /// Set walking and jumping MP; running MP is 1.5x walking, rounded up
    pub fn with_mp(mut self, walk: u32, jump: u32) -> Self {
        self.walk_mp = walk;
        self.run_mp = (walk * 3).div_ceil(2);
        self.jump_mp = jump;
        self
    }

    pub fn at(mut self, position: HexCoord, facing: Facing) -> Self {
        self.position = position;
        self.facing = facing;
        self
    }

    pub fn owned_by(mut self, owner: PlayerId) -> Self {
        self.owner = owner;
        self
    }

    pub fn with_piloting(mut self, piloting: i32) -> Self {
        self.crew.piloting = piloting;
        self
    }

    pub fn with_elevation(mut self, elevation: i32) -> Self {
        self.elevation = elevation;
        self
    }

    pub fn sprint_mp(&self) -> u32 {
        self.walk_mp * 2
    }

    /// MP available under a movement type
    pub fn mp_allowance(&self, move_type: MoveType) -> u32 {
        match move_type {
            MoveType::None => 0,
            MoveType::Walk => self.walk_mp,
            MoveType::Run | MoveType::Skid => self.run_mp,
            MoveType::Sprint => self.sprint_mp(),
            MoveType::Jump => self.jump_mp,
            MoveType::Illegal => 0,
        }
    }

    /// MP left this turn; a unit that has not moved yet may still run
    pub fn remaining_mp(&self) -> u32 {
        let allowance = match self.move_type {
            MoveType::None => self.run_mp,
            other => self.mp_allowance(other),
        };
        allowance.saturating_sub(self.mp_used)
    }

    /// Burn armor, then structure. Returns true if this destroyed the unit.
    pub fn apply_damage(&mut self, amount: u32) -> bool {
        if self.status.destroyed {
            return false;
        }
        let to_armor = amount.min(self.armor);
        self.armor -= to_armor;
        let rest = amount - to_armor;
        self.structure = self.structure.saturating_sub(rest);
        if self.structure == 0 {
            self.status.destroyed = true;
            return true;
        }
        false
    }

    /// Crew takes a hit. Returns true if the crew was killed.
    pub fn hit_crew(&mut self, hits: u8) -> bool {
        self.crew.hits = self.crew.hits.saturating_add(hits);
        if self.crew.hits >= LETHAL_CREW_HITS && !self.status.destroyed {
            self.status.destroyed = true;
            return true;
        }
        false
    }

    /// Above the surface for this step's purposes (VTOL/WiGE flight, aero)
    pub fn is_airborne(&self) -> bool {
        match self.category {
            UnitCategory::Vtol | UnitCategory::Wige | UnitCategory::Aerodyne | UnitCategory::Spheroid => {
                self.elevation > 0
            }
            _ => false,
        }
    }

    /// On the board and able to act
    pub fn is_deployed(&self) -> bool {
        !self.status.destroyed && !self.status.fled && self.loaded_in.is_none()
    }

    /// Can still be given orders this phase
    pub fn is_selectable(&self) -> bool {
        self.is_deployed()
            && !self.status.done
            && !self.status.shutdown
            && !self.status.crew_ejected
            && !self.status.stuck
    }

    /// Clear per-turn movement bookkeeping
    pub fn reset_for_turn(&mut self) {
        self.mp_used = 0;
        self.distance_moved = 0;
        self.move_type = MoveType::None;
        self.passed_through.clear();
        self.status.done = false;
        self.status.evading = false;
        self.status.bracing = false;
        if let Some(aero) = self.aero.as_mut() {
            aero.velocity = aero.next_velocity;
            aero.thrust_spent = 0;
        }
    }

    pub fn record_passage(&mut self) {
        self.passed_through.push(PassedHex {
            coord: self.position,
            facing: self.facing,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_mp_rounds_up() {
        let unit = UnitState::new("Atlas", UnitCategory::Mech, 100).with_mp(3, 0);
        assert_eq!(unit.run_mp, 5);
        assert_eq!(unit.sprint_mp(), 6);
    }

    #[test]
    fn test_damage_burns_armor_first() {
        let mut unit = UnitState::new("Locust", UnitCategory::Mech, 20);
        assert_eq!(unit.armor, 40);
        assert!(!unit.apply_damage(45));
        assert_eq!(unit.armor, 0);
        assert_eq!(unit.structure, 15);
        assert!(unit.apply_damage(15));
        assert!(unit.status.destroyed);
        assert!(!unit.apply_damage(5));
    }

    #[test]
    fn test_crew_killed_at_six_hits() {
        let mut unit = UnitState::new("Hunchback", UnitCategory::Mech, 50);
        assert!(!unit.hit_crew(5));
        assert!(unit.hit_crew(1));
        assert!(unit.status.destroyed);
    }

    #[test]
    fn test_remaining_mp_by_move_type() {
        let mut unit = UnitState::new("Griffin", UnitCategory::Mech, 55).with_mp(5, 5);
        assert_eq!(unit.remaining_mp(), 8);
        unit.move_type = MoveType::Walk;
        unit.mp_used = 3;
        assert_eq!(unit.remaining_mp(), 2);
        unit.move_type = MoveType::Jump;
        unit.mp_used = 5;
        assert_eq!(unit.remaining_mp(), 0);
    }

    #[test]
    fn test_ground_unit_never_airborne() {
        let unit = UnitState::new("Tank", UnitCategory::Tracked, 50).with_elevation(2);
        assert!(!unit.is_airborne());
        let vtol = UnitState::new("Warrior", UnitCategory::Vtol, 20).with_elevation(3);
        assert!(vtol.is_airborne());
    }

    #[test]
    fn test_stuck_unit_not_selectable() {
        let mut unit = UnitState::new("Tank", UnitCategory::Tracked, 50);
        assert!(unit.is_selectable());
        unit.status.stuck = true;
        assert!(!unit.is_selectable());
    }

    #[test]
    fn test_aero_units_get_flight_state() {
        let fighter = UnitState::new("Shilone", UnitCategory::Aerodyne, 65);
        assert!(fighter.aero.is_some());
        let mech = UnitState::new("Atlas", UnitCategory::Mech, 100);
        assert!(mech.aero.is_none());
    }
}
