//! What happens to a unit after its path has been resolved
//!
//! A unit whose movement was cut short by an interrupt may get another go
//! once the current phase ends; everything else is done for the turn.

use serde::{Deserialize, Serialize};

use crate::movement::context::{tonnage_damage, MoveContext};
use crate::movement::outcome::InterruptCause;
use crate::movement::report::ReportKind;
use crate::units::category::UnitCategory;
use crate::units::unit::UnitState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContinuationDecision {
    Done,
    ContinueNextTurn { interrupted: bool },
    Destroyed,
}

/// The parts of a resolution the policy looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContinuationInput {
    pub interrupt: Option<InterruptCause>,
    /// Movement ended outright (fall, skid, stuck, attack...)
    pub turn_over: bool,
    pub jumped: bool,
}

/// Decide whether the unit may continue. Marks the unit done unless it is
/// destroyed or continuing; an already-done unit is left untouched.
pub fn decide(unit: &mut UnitState, input: &ContinuationInput) -> ContinuationDecision {
    if unit.status.done {
        return ContinuationDecision::Done;
    }
    if unit.status.destroyed {
        return ContinuationDecision::Destroyed;
    }

    let may_continue = input.interrupt.is_some()
        && !input.turn_over
        && !input.jumped
        && unit.remaining_mp() > 0
        && unit.is_selectable();
    if may_continue {
        tracing::debug!(unit = %unit.id, cause = ?input.interrupt, mp_left = unit.remaining_mp(), "continuation scheduled");
        return ContinuationDecision::ContinueNextTurn { interrupted: true };
    }

    unit.status.done = true;
    ContinuationDecision::Done
}

/// Airborne WiGEs that covered too little ground set down; the rest stay
/// at most one level above the surface. Returns true if the unit crashed
/// to destruction.
pub fn land_wige(ctx: &mut MoveContext<'_>, unit: &mut UnitState) -> bool {
    if unit.category != UnitCategory::Wige || !unit.is_airborne() || unit.status.destroyed {
        return false;
    }
    let at = unit.position;

    if unit.distance_moved >= ctx.options.wige_min_hexes {
        let ceiling = ctx.board.surface_height(at) + 1;
        unit.elevation = unit.elevation.min(ceiling);
        return false;
    }

    let safe = ctx
        .board
        .hex(at)
        .is_some_and(|h| ctx.board.building_at(at).is_none() && (h.terrain.is_landable() || h.road || h.ice || h.has_water()));
    unit.elevation = 0;
    if safe {
        ctx.report(
            unit.id,
            ReportKind::WigeLanded,
            format!("{} moved {} hex(es) and settles at {}", unit.name, unit.distance_moved, at),
        );
        return false;
    }

    let damage = tonnage_damage(unit.tonnage);
    ctx.report(
        unit.id,
        ReportKind::WigeCrashed,
        format!("{} comes down hard at {} and takes {} damage", unit.name, at, damage),
    );
    if unit.apply_damage(damage) {
        ctx.report(unit.id, ReportKind::UnitDestroyed, format!("{} is destroyed", unit.name));
        return true;
    }
    false
}
