//! Burning hexes and magma

use crate::board::terrain::Terrain;
use crate::movement::check::HazardKind;
use crate::movement::context::MoveContext;
use crate::movement::hazards::Transition;
use crate::movement::outcome::{FallSpec, StepOutcome};
use crate::movement::report::ReportKind;
use crate::units::category::UnitCategory;
use crate::units::unit::UnitState;

pub const FIRE_HEAT: u32 = 2;
pub const MAGMA_HEAT: u32 = 30;
pub const FIRE_DAMAGE: u32 = 2;
/// 2d6 at or above which fire damages a non-mech
pub const FIRE_DAMAGE_TARGET: i32 = 8;

pub fn fire(ctx: &mut MoveContext<'_>, unit: &mut UnitState, tr: &Transition) -> StepOutcome {
    let burning = ctx.board.hex(tr.to).is_some_and(|h| h.fire);
    if !burning || !tr.changes_hex() || !tr.ground_contact(unit) || unit.category.ground().is_none() {
        return StepOutcome::Continue;
    }

    if unit.category == UnitCategory::Mech {
        unit.heat += FIRE_HEAT;
        ctx.report(
            unit.id,
            ReportKind::FireHeat,
            format!("{} walks through fire at {} and gains {} heat", unit.name, tr.to, FIRE_HEAT),
        );
        return StepOutcome::Continue;
    }

    let roll = ctx.dice.roll_2d6();
    if roll < FIRE_DAMAGE_TARGET {
        return StepOutcome::Continue;
    }
    ctx.report(
        unit.id,
        ReportKind::FireDamage,
        format!("{} is scorched at {} (rolled {}) for {} damage", unit.name, tr.to, roll, FIRE_DAMAGE),
    );
    if unit.apply_damage(FIRE_DAMAGE) {
        ctx.report(unit.id, ReportKind::UnitDestroyed, format!("{} burns out", unit.name));
        return StepOutcome::Destroyed;
    }
    StepOutcome::Continue
}

pub fn magma(ctx: &mut MoveContext<'_>, unit: &mut UnitState, tr: &Transition) -> StepOutcome {
    let Some(terrain) = ctx.board.hex(tr.to).map(|h| h.terrain) else {
        return StepOutcome::Continue;
    };
    if !terrain.is_magma() || !tr.changes_hex() || !tr.ground_contact(unit) || unit.category.ground().is_none() {
        return StepOutcome::Continue;
    }

    if terrain == Terrain::MagmaCrust {
        let roll = ctx.dice.d6();
        if roll != 6 {
            return StepOutcome::Continue;
        }
        ctx.board.break_magma_crust(tr.to);
        ctx.report(
            unit.id,
            ReportKind::MagmaCrustBroken,
            format!("the magma crust at {} gives way under {}", tr.to, unit.name),
        );
    }

    if unit.category != UnitCategory::Mech {
        unit.status.destroyed = true;
        ctx.report(
            unit.id,
            ReportKind::Magma,
            format!("{} is swallowed by the magma at {}", unit.name, tr.to),
        );
        return StepOutcome::Destroyed;
    }

    unit.heat += MAGMA_HEAT;
    ctx.report(
        unit.id,
        ReportKind::Magma,
        format!("{} wades into magma and gains {} heat", unit.name, MAGMA_HEAT),
    );
    let result = ctx.roll(unit, HazardKind::Magma);
    if result.passed() {
        return StepOutcome::Continue;
    }
    ctx.report_check(unit.id, ReportKind::Fall, format!("{} falls in the magma", unit.name), &result);
    StepOutcome::Fall(FallSpec::in_place(tr.to))
}
