//! Aerospace movement
//!
//! Aerospace units spend thrust instead of MP and carry their flight state
//! in [`AeroState`](crate::units::unit::AeroState). `UnitState::elevation`
//! is the craft's altitude. The step loop feeds thrust steps and entered
//! hexes through here; the end-of-path checks decide whether the craft
//! stays under control.

use crate::movement::check::HazardKind;
use crate::movement::context::{tonnage_damage, MoveContext};
use crate::movement::outcome::StepOutcome;
use crate::movement::path::StepKind;
use crate::movement::report::ReportKind;
use crate::units::category::UnitCategory;
use crate::units::unit::UnitState;

/// Minimum thrust a hovering spheroid spends each turn to hold altitude
pub const SPHEROID_HOLD_THRUST: u32 = 2;

fn lost_control(ctx: &mut MoveContext<'_>, unit: &mut UnitState, modifier: i32, why: &str) {
    let result = ctx.roll(unit, HazardKind::Control { modifier });
    if result.passed() {
        return;
    }
    let loss = (result.margin as u32).div_ceil(2) as i32;
    unit.elevation -= loss;
    if let Some(aero) = unit.aero.as_mut() {
        aero.out_of_control = true;
    }
    ctx.report_check(
        unit.id,
        ReportKind::ControlRollFailed,
        format!("{} loses control ({}) and drops {} altitude", unit.name, why, loss),
        &result,
    );
}

/// Apply a thrust or altitude step. `thrust_spent` tracks the path's MP.
pub fn apply_step(ctx: &mut MoveContext<'_>, unit: &mut UnitState, kind: StepKind) -> StepOutcome {
    let id = unit.id;
    let is_spheroid = unit.category == UnitCategory::Spheroid;
    let mp_used = unit.mp_used;
    let Some(aero) = unit.aero.as_mut() else {
        return StepOutcome::Continue;
    };
    aero.thrust_spent = mp_used;

    match kind {
        StepKind::Accelerate => aero.next_velocity += 1,
        StepKind::Decelerate => aero.next_velocity = aero.next_velocity.saturating_sub(1),
        StepKind::Hover if !is_spheroid => {
            tracing::error!(unit = %id, "only spheroids can hover");
            return StepOutcome::Abort;
        }
        _ => {}
    }
    tracing::trace!(unit = %id, ?kind, velocity = aero.next_velocity, thrust = aero.thrust_spent, "aero step");
    StepOutcome::Continue
}

/// Another airborne unit at our altitude in the hex just entered
pub fn collision_avoidance(ctx: &mut MoveContext<'_>, unit: &mut UnitState) -> StepOutcome {
    if !unit.is_airborne() {
        return StepOutcome::Continue;
    }
    let other = ctx
        .units
        .occupants(unit.position)
        .into_iter()
        .filter(|id| *id != unit.id)
        .find(|id| {
            ctx.units
                .get(*id)
                .is_some_and(|u| u.is_airborne() && u.elevation == unit.elevation)
        });
    let Some(other_id) = other else {
        return StepOutcome::Continue;
    };

    let velocity = unit.aero.map(|a| a.velocity.max(a.next_velocity)).unwrap_or(0);
    let result = ctx.roll(unit, HazardKind::CollisionAvoidance { velocity });
    if result.passed() {
        return StepOutcome::Continue;
    }

    let other_tons = ctx.units.get(other_id).map(|u| u.tonnage).unwrap_or(0);
    ctx.report_check(
        unit.id,
        ReportKind::AirCollision,
        format!("{} collides in the air at {}", unit.name, unit.position),
        &result,
    );
    ctx.damage_unit(other_id, tonnage_damage(unit.tonnage));
    if unit.apply_damage(tonnage_damage(other_tons)) {
        ctx.report(unit.id, ReportKind::UnitDestroyed, format!("{} is destroyed", unit.name));
        return StepOutcome::Destroyed;
    }
    StepOutcome::Continue
}

/// Control, stall and altitude checks once the path is done.
/// Returns true if the craft crashed.
pub fn end_of_path(ctx: &mut MoveContext<'_>, unit: &mut UnitState) -> bool {
    let Some(aero) = unit.aero else {
        return false;
    };
    if !unit.is_airborne() || unit.status.destroyed {
        return false;
    }

    if aero.thrust_spent > aero.structural_integrity {
        let excess = (aero.thrust_spent - aero.structural_integrity) as i32;
        lost_control(ctx, unit, excess, "thrust over structural integrity");
    }
    let limit = 2 * aero.safe_thrust;
    if aero.next_velocity > limit {
        let excess = (aero.next_velocity - limit) as i32;
        lost_control(ctx, unit, excess, "velocity over twice safe thrust");
    }

    match unit.category {
        UnitCategory::Aerodyne if aero.next_velocity == 0 => {
            unit.elevation -= 1;
            if let Some(a) = unit.aero.as_mut() {
                a.out_of_control = true;
            }
            ctx.report(
                unit.id,
                ReportKind::Stall,
                format!("{} stalls and drops to altitude {}", unit.name, unit.elevation),
            );
        }
        UnitCategory::Spheroid if aero.thrust_spent < SPHEROID_HOLD_THRUST => {
            unit.elevation -= 1;
            ctx.report(
                unit.id,
                ReportKind::AltitudeLost,
                format!("{} sinks to altitude {}", unit.name, unit.elevation),
            );
        }
        _ => {}
    }

    if unit.elevation <= 0 {
        unit.elevation = 0;
        unit.status.destroyed = true;
        ctx.report(unit.id, ReportKind::Crash, format!("{} crashes at {}", unit.name, unit.position));
        tracing::info!(unit = %unit.id, at = %unit.position, "aerospace crash");
        return true;
    }
    false
}

/// Lift off to altitude 1
pub fn takeoff(ctx: &mut MoveContext<'_>, unit: &mut UnitState, vertical: bool) {
    unit.elevation = 1;
    if let Some(aero) = unit.aero.as_mut() {
        if !vertical {
            aero.next_velocity = aero.next_velocity.max(1);
        }
    }
    ctx.report(
        unit.id,
        ReportKind::TookOff,
        format!("{} takes off{}", unit.name, if vertical { " vertically" } else { "" }),
    );
}

/// Land on a runway: a control roll at +velocity/2, damage on failure.
/// Returns true if the landing destroyed the craft.
pub fn land(ctx: &mut MoveContext<'_>, unit: &mut UnitState) -> bool {
    let velocity = unit.aero.map(|a| a.velocity).unwrap_or(0);
    let result = ctx.roll(
        unit,
        HazardKind::Control {
            modifier: (velocity / 2) as i32,
        },
    );
    touch_down(unit);

    if result.passed() {
        ctx.report(unit.id, ReportKind::Landed, format!("{} lands at {}", unit.name, unit.position));
        return false;
    }
    let damage = tonnage_damage(unit.tonnage) * result.margin as u32;
    ctx.report_check(
        unit.id,
        ReportKind::Crash,
        format!("{} lands hard and takes {} damage", unit.name, damage),
        &result,
    );
    if unit.apply_damage(damage) {
        ctx.report(unit.id, ReportKind::UnitDestroyed, format!("{} is destroyed", unit.name));
        return true;
    }
    false
}

pub fn vertical_land(ctx: &mut MoveContext<'_>, unit: &mut UnitState) {
    touch_down(unit);
    ctx.report(
        unit.id,
        ReportKind::Landed,
        format!("{} sets down vertically at {}", unit.name, unit.position),
    );
}

fn touch_down(unit: &mut UnitState) {
    unit.elevation = 0;
    if let Some(aero) = unit.aero.as_mut() {
        aero.velocity = 0;
        aero.next_velocity = 0;
        aero.out_of_control = false;
    }
}
