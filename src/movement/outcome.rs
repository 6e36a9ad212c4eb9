//! What a step handler tells the interpreter to do next

use serde::{Deserialize, Serialize};

use crate::board::hex::{Facing, HexCoord};

/// Why movement stopped early with a chance to continue next turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InterruptCause {
    FailedStandUp,
    Fell,
    PointBlankShot,
    Fishtail,
    CliffAscentStop,
    LevelDrop,
    HiddenUnitDetected,
    MinefieldDetonation,
}

/// Why a unit's movement ended for this turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnOverCause {
    Fall,
    Skid,
    Sideslip,
    Stuck,
    Reckless,
    Collapse,
    CliffDescent,
    Mounted,
    Recovery,
    Grounded,
    Attack,
}

/// A fall to resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallSpec {
    /// Hex the unit lands in
    pub hex: HexCoord,
    /// Levels fallen (0 for a fall in place)
    pub levels: i32,
}

impl FallSpec {
    pub fn in_place(hex: HexCoord) -> Self {
        Self { hex, levels: 0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkidSpec {
    pub direction: Facing,
    pub distance: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideSpec {
    pub direction: Facing,
    pub distance: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepOutcome {
    Continue,
    Fall(FallSpec),
    Skid(SkidSpec),
    Sideslip(SlideSpec),
    Stuck,
    TurnOver(TurnOverCause),
    /// The step happened; movement stops after it
    Interrupt(InterruptCause),
    /// The step did not happen; the unit stays where it was
    Halt(InterruptCause),
    Destroyed,
    Abort,
}

impl StepOutcome {
    pub fn is_continue(&self) -> bool {
        matches!(self, StepOutcome::Continue)
    }
}

