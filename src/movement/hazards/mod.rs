//! Hazard and terrain handlers
//!
//! Each handler pairs an `applies` precondition with a resolver that rolls
//! whatever checks it needs and returns a [`StepOutcome`]. Handlers mutate
//! the moving unit's working copy and the board's destructible terrain;
//! deciding what happens to the rest of the path is the interpreter's job.

pub mod bog;
pub mod building;
pub mod cliff;
pub mod fire;
pub mod minefield;
pub mod sideslip;
pub mod skid;
pub mod terrain;
pub mod water;

use crate::board::board_map::BoardQuery;
use crate::board::hex::{Facing, HexCoord};
use crate::movement::path::{MoveType, StepKind};
use crate::units::unit::UnitState;

/// The step being evaluated, as seen by hazard handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub kind: StepKind,
    pub from: HexCoord,
    pub to: HexCoord,
    /// Facing before the step
    pub prev_facing: Facing,
    pub move_type: MoveType,
    /// In jump flight (the take-off hex excluded)
    pub jumping: bool,
    /// Final hex of a jump
    pub landing: bool,
    /// Hexes moved this turn before the step
    pub distance: u32,
    /// The last hex-changing step was a backwards step
    pub last_moved_backwards: bool,
}

impl Transition {
    pub fn changes_hex(&self) -> bool {
        self.from != self.to
    }

    /// The unit touches the ground in the destination hex
    pub fn ground_contact(&self, unit: &UnitState) -> bool {
        !unit.is_airborne() && (!self.jumping || self.landing)
    }

    /// Walking or driving across the ground (no jump involved)
    pub fn on_foot(&self, unit: &UnitState) -> bool {
        !unit.is_airborne() && !self.jumping
    }

    /// Destination level minus origin level
    pub fn level_change(&self, board: &dyn BoardQuery) -> i32 {
        let from = board.level(self.from).unwrap_or(0);
        let to = board.level(self.to).unwrap_or(from);
        to - from
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::board::board_map::Board;
    use crate::core::config::GameOptions;
    use crate::dice::ScriptedDice;
    use crate::movement::context::MoveContext;
    use crate::movement::report::ReportLog;
    use crate::units::registry::UnitRegistry;

    /// Owns everything a [`MoveContext`] borrows
    pub struct World {
        pub board: Board,
        pub units: UnitRegistry,
        pub dice: ScriptedDice,
        pub log: ReportLog,
        pub options: GameOptions,
    }

    impl World {
        pub fn new(dice: ScriptedDice) -> Self {
            Self {
                board: Board::new(10, 10),
                units: UnitRegistry::new(),
                dice,
                log: ReportLog::new(),
                options: GameOptions::default(),
            }
        }

        pub fn ctx(&mut self) -> MoveContext<'_> {
            MoveContext::new(
                &mut self.board,
                &mut self.units,
                &mut self.dice,
                &mut self.log,
                &self.options,
            )
        }
    }

    /// A forward step from `from` into `to` at the given speed
    pub fn entering(from: HexCoord, to: HexCoord, move_type: MoveType) -> Transition {
        Transition {
            kind: StepKind::Forwards,
            from,
            to,
            prev_facing: from.direction_to(&to).unwrap_or_default(),
            move_type,
            jumping: false,
            landing: false,
            distance: 0,
            last_moved_backwards: false,
        }
    }

    /// A turn in place after `distance` hexes
    pub fn turning(at: HexCoord, kind: StepKind, prev_facing: Facing, distance: u32) -> Transition {
        Transition {
            kind,
            from: at,
            to: at,
            prev_facing,
            move_type: MoveType::Run,
            jumping: false,
            landing: false,
            distance,
            last_moved_backwards: false,
        }
    }
}
