//! Footing checks: rubble, reckless running, leaps, backing across
//! elevation changes and landing a jump on damaged legs

use crate::board::terrain::Terrain;
use crate::movement::check::HazardKind;
use crate::movement::context::MoveContext;
use crate::movement::hazards::Transition;
use crate::movement::outcome::{FallSpec, StepOutcome, TurnOverCause};
use crate::movement::path::StepKind;
use crate::movement::report::ReportKind;
use crate::units::category::UnitCategory;
use crate::units::unit::UnitState;

fn is_mech(unit: &UnitState) -> bool {
    unit.category == UnitCategory::Mech
}

pub fn rubble(ctx: &mut MoveContext<'_>, unit: &mut UnitState, tr: &Transition) -> StepOutcome {
    let in_rubble = ctx.board.hex(tr.to).is_some_and(|h| h.terrain == Terrain::Rubble);
    if !in_rubble || !is_mech(unit) || !tr.changes_hex() || !tr.on_foot(unit) {
        return StepOutcome::Continue;
    }
    let result = ctx.roll(unit, HazardKind::Rubble);
    if result.passed() {
        return StepOutcome::Continue;
    }
    ctx.report_check(unit.id, ReportKind::Fall, format!("{} stumbles in the rubble", unit.name), &result);
    StepOutcome::Fall(FallSpec::in_place(tr.to))
}

/// Running blind in fog or darkness
pub fn reckless(ctx: &mut MoveContext<'_>, unit: &mut UnitState, tr: &Transition) -> StepOutcome {
    let Some(hex) = ctx.board.hex(tr.to) else {
        return StepOutcome::Continue;
    };
    let obscured = ctx.options.fog_or_darkness || hex.fog;
    let woods = hex.terrain.is_woods();
    if !obscured
        || !tr.move_type.is_running()
        || !tr.changes_hex()
        || !tr.on_foot(unit)
        || unit.category.is_infantry()
        || unit.category.ground().is_none()
    {
        return StepOutcome::Continue;
    }

    let result = ctx.roll(unit, HazardKind::Reckless { woods });
    if result.passed() {
        return StepOutcome::Continue;
    }
    if is_mech(unit) {
        ctx.report_check(unit.id, ReportKind::Fall, format!("{} trips running blind", unit.name), &result);
        StepOutcome::Fall(FallSpec::in_place(tr.to))
    } else {
        ctx.report_check(
            unit.id,
            ReportKind::TerrainCollision,
            format!("{} runs off course and stops", unit.name),
            &result,
        );
        StepOutcome::TurnOver(TurnOverCause::Reckless)
    }
}

/// Dropping three or more levels without jump jets
pub fn leap(ctx: &mut MoveContext<'_>, unit: &mut UnitState, tr: &Transition) -> StepOutcome {
    let drop = -tr.level_change(&*ctx.board);
    if !ctx.options.leaping || drop < 3 || !is_mech(unit) || !tr.changes_hex() || !tr.on_foot(unit) {
        return StepOutcome::Continue;
    }

    let legs = ctx.roll(unit, HazardKind::LeapLegDamage { levels: drop });
    if legs.failed() {
        unit.critical.leg_actuator_hits += 1;
        let damage = 2 * drop as u32;
        ctx.report_check(
            unit.id,
            ReportKind::LegDamage,
            format!("{} lands hard and takes {} damage to the legs", unit.name, damage),
            &legs,
        );
        if unit.apply_damage(damage) {
            ctx.report(unit.id, ReportKind::UnitDestroyed, format!("{} is destroyed", unit.name));
            return StepOutcome::Destroyed;
        }
    }

    let result = ctx.roll(unit, HazardKind::Leap { levels: drop });
    if result.passed() {
        return StepOutcome::Continue;
    }
    ctx.report_check(unit.id, ReportKind::Fall, format!("{} falls after the leap", unit.name), &result);
    StepOutcome::Fall(FallSpec {
        hex: tr.to,
        levels: drop,
    })
}

pub fn backwards_elevation(ctx: &mut MoveContext<'_>, unit: &mut UnitState, tr: &Transition) -> StepOutcome {
    if !ctx.options.backward_elevation_check
        || tr.kind != StepKind::Backwards
        || !is_mech(unit)
        || !tr.on_foot(unit)
        || tr.level_change(&*ctx.board) == 0
    {
        return StepOutcome::Continue;
    }
    let result = ctx.roll(unit, HazardKind::BackwardsElevation);
    if result.passed() {
        return StepOutcome::Continue;
    }
    ctx.report_check(
        unit.id,
        ReportKind::Fall,
        format!("{} loses its balance backing across the slope", unit.name),
        &result,
    );
    StepOutcome::Fall(FallSpec::in_place(tr.from))
}

pub fn jump_landing(ctx: &mut MoveContext<'_>, unit: &mut UnitState, tr: &Transition) -> StepOutcome {
    if !tr.landing || !is_mech(unit) || !unit.critical.legs_or_gyro_damaged() {
        return StepOutcome::Continue;
    }
    let result = ctx.roll(unit, HazardKind::JumpLanding);
    if result.passed() {
        return StepOutcome::Continue;
    }
    ctx.report_check(unit.id, ReportKind::Fall, format!("{} botches the landing", unit.name), &result);
    StepOutcome::Fall(FallSpec::in_place(tr.to))
}
