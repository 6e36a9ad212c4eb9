//! Skill-check evaluator
//!
//! Every hazard that can go wrong asks for a piloting (or driving) check:
//! a target number built from the crew's skill plus modifiers, against one
//! 2d6 roll. The evaluator only computes and rolls; callers apply the
//! consequences of a failure.

use serde::{Deserialize, Serialize};

use crate::board::building::BuildingClass;
use crate::dice::DiceSource;
use crate::movement::path::MoveType;
use crate::units::category::UnitCategory;
use crate::units::unit::UnitState;

/// Target for checks that ignore crew skill
pub const SWARM_DROWNING_TARGET: i32 = 7;

/// What a check is for, with the context that sets its modifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardKind {
    Skid { distance: u32, ice: bool },
    Sideslip { distance: u32, controlled: bool },
    BogDown { terrain_mod: i32 },
    Extraction { terrain_mod: i32 },
    Cliff { levels: i32, ascending: bool },
    BuildingEntry { class: BuildingClass },
    Water { depth: u8 },
    Rubble,
    Magma,
    Reckless { woods: bool },
    Leap { levels: i32 },
    LeapLegDamage { levels: i32 },
    BackwardsElevation,
    StandUp { careful: bool },
    JumpLanding,
    PilotDamage { levels: i32 },
    Control { modifier: i32 },
    CollisionAvoidance { velocity: u32 },
    Recovery { prototype_collar: bool },
    SwarmDrowning,
}

impl HazardKind {
    pub fn name(&self) -> &'static str {
        match self {
            HazardKind::Skid { .. } => "skid",
            HazardKind::Sideslip { .. } => "sideslip",
            HazardKind::BogDown { .. } => "bog-down",
            HazardKind::Extraction { .. } => "extraction",
            HazardKind::Cliff { .. } => "cliff",
            HazardKind::BuildingEntry { .. } => "building",
            HazardKind::Water { .. } => "water",
            HazardKind::Rubble => "rubble",
            HazardKind::Magma => "magma",
            HazardKind::Reckless { .. } => "reckless movement",
            HazardKind::Leap { .. } => "leap",
            HazardKind::LeapLegDamage { .. } => "leap leg damage",
            HazardKind::BackwardsElevation => "backwards elevation change",
            HazardKind::StandUp { .. } => "stand up",
            HazardKind::JumpLanding => "jump landing",
            HazardKind::PilotDamage { .. } => "pilot damage",
            HazardKind::Control { .. } => "control",
            HazardKind::CollisionAvoidance { .. } => "collision avoidance",
            HazardKind::Recovery { .. } => "recovery",
            HazardKind::SwarmDrowning => "swarm drowning",
        }
    }

    /// Modifier contributed by the hazard itself
    fn modifier(&self) -> Option<Modifier> {
        let (value, reason) = match *self {
            HazardKind::Skid { distance, ice } => {
                let mut value = distance_modifier(distance);
                if ice {
                    value += 4;
                }
                (value, format!("skidding after {distance} hexes"))
            }
            HazardKind::Sideslip { distance, controlled } => {
                let mut value = distance_modifier(distance);
                if controlled {
                    value -= 1;
                }
                (value, format!("sideslip after {distance} hexes"))
            }
            HazardKind::BogDown { terrain_mod } | HazardKind::Extraction { terrain_mod } => {
                (terrain_mod, "terrain".to_string())
            }
            HazardKind::Cliff { levels, ascending } => {
                let value = if ascending { levels } else { levels + 1 };
                (value, format!("cliff of {levels} levels"))
            }
            HazardKind::BuildingEntry { class } => (class.entry_modifier(), format!("{class:?} building")),
            HazardKind::Water { depth } => {
                let value = match depth {
                    0 | 1 => -1,
                    2 => 0,
                    _ => 1,
                };
                (value, format!("water depth {depth}"))
            }
            HazardKind::Reckless { woods } => (i32::from(woods), "reckless movement".to_string()),
            HazardKind::Leap { levels } | HazardKind::LeapLegDamage { levels } => {
                (levels, format!("leaping {levels} levels"))
            }
            HazardKind::StandUp { careful: true } => (-2, "careful stand".to_string()),
            HazardKind::PilotDamage { levels } => (levels, format!("fell {levels} levels")),
            HazardKind::Control { modifier } => (modifier, "control".to_string()),
            HazardKind::CollisionAvoidance { velocity } => {
                ((velocity / 2) as i32, format!("velocity {velocity}"))
            }
            HazardKind::Recovery { prototype_collar: true } => (2, "prototype docking collar".to_string()),
            _ => return None,
        };
        if value == 0 {
            return None;
        }
        Some(Modifier { value, reason })
    }
}

/// Skid and sideslip distance table
pub fn distance_modifier(distance: u32) -> i32 {
    match distance {
        0..=2 => -1,
        3..=4 => 0,
        5..=7 => 1,
        8..=10 => 2,
        11..=17 => 4,
        _ => 5,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifier {
    pub value: i32,
    pub reason: String,
}

/// Base value plus the modifiers that built it, kept for reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetNumber {
    pub base: i32,
    pub modifiers: Vec<Modifier>,
}

impl TargetNumber {
    pub fn new(base: i32) -> Self {
        Self {
            base,
            modifiers: Vec::new(),
        }
    }

    pub fn add(&mut self, value: i32, reason: impl Into<String>) {
        if value != 0 {
            self.modifiers.push(Modifier {
                value,
                reason: reason.into(),
            });
        }
    }

    pub fn total(&self) -> i32 {
        self.base + self.modifiers.iter().map(|m| m.value).sum::<i32>()
    }

    /// "5 (base) +3 (gyro hit) = 8"
    pub fn describe(&self) -> String {
        let mut text = format!("{} (base)", self.base);
        for m in &self.modifiers {
            text.push_str(&format!(" {:+} ({})", m.value, m.reason));
        }
        text.push_str(&format!(" = {}", self.total()));
        text
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub hazard: HazardKind,
    pub target: TargetNumber,
    pub roll: i32,
    /// Target minus roll; positive means failure
    pub margin: i32,
}

impl CheckResult {
    pub fn failed(&self) -> bool {
        self.margin > 0
    }

    pub fn passed(&self) -> bool {
        !self.failed()
    }

    pub fn describe(&self) -> String {
        format!(
            "{} check: needs {}, rolls {}: {}",
            self.hazard.name(),
            self.target.describe(),
            self.roll,
            if self.failed() { "fails" } else { "succeeds" }
        )
    }
}

/// Target number for a unit facing a hazard while moving with `move_type`
pub fn target_number(unit: &UnitState, hazard: HazardKind, move_type: MoveType) -> TargetNumber {
    if hazard == HazardKind::SwarmDrowning {
        return TargetNumber::new(SWARM_DROWNING_TARGET);
    }

    let mut target = TargetNumber::new(unit.crew.piloting);
    let crit = &unit.critical;
    target.add(3 * i32::from(crit.gyro_hits), "gyro hits");
    target.add(i32::from(crit.leg_actuator_hits), "leg actuator hits");
    target.add(2 * i32::from(crit.hip_hits), "hip hits");
    target.add(5 * i32::from(crit.legs_destroyed), "destroyed legs");

    if unit.equipment.small_cockpit {
        target.add(1, "small cockpit");
    }
    if unit.equipment.quad && unit.category == UnitCategory::Mech {
        target.add(-2, "quad");
    }
    if unit.equipment.hardened_armor && move_type.is_running() {
        target.add(1, "hardened armor");
    }
    if let Some(m) = hazard.modifier() {
        target.modifiers.push(m);
    }
    target
}

/// Roll a skill check: exactly one 2d6 draw
pub fn check(
    unit: &UnitState,
    hazard: HazardKind,
    move_type: MoveType,
    dice: &mut dyn DiceSource,
) -> CheckResult {
    let target = target_number(unit, hazard, move_type);
    let roll = dice.roll_2d6();
    let margin = target.total() - roll;
    tracing::debug!(
        unit = %unit.id,
        check = hazard.name(),
        target = target.total(),
        roll,
        margin,
        "skill check"
    );
    CheckResult {
        hazard,
        target,
        roll,
        margin,
    }
}
