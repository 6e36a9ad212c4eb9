//! Bogging down in swamp, mud, snow and sand

use crate::board::terrain::Terrain;
use crate::movement::check::HazardKind;
use crate::movement::context::MoveContext;
use crate::movement::hazards::Transition;
use crate::movement::outcome::StepOutcome;
use crate::movement::report::ReportKind;
use crate::units::unit::UnitState;

pub fn applies(ctx: &MoveContext<'_>, unit: &UnitState, tr: &Transition) -> bool {
    if !ctx.options.bog_down || !tr.changes_hex() || !tr.on_foot(unit) {
        return false;
    }
    let Some(hex) = ctx.board.hex(tr.to) else {
        return false;
    };
    let Some(ground) = unit.category.ground() else {
        return false;
    };
    !hex.road && !hex.ice && hex.terrain.bog_modifier().is_some() && ground.bogs_down(hex.terrain)
}

pub fn enter(ctx: &mut MoveContext<'_>, unit: &mut UnitState, tr: &Transition) -> StepOutcome {
    if !applies(ctx, unit, tr) {
        return StepOutcome::Continue;
    }
    let Some(hex) = ctx.board.hex(tr.to).cloned() else {
        return StepOutcome::Continue;
    };
    let terrain_mod = hex.terrain.bog_modifier().unwrap_or(0);
    let result = ctx.roll(unit, HazardKind::BogDown { terrain_mod });
    if result.passed() {
        return StepOutcome::Continue;
    }

    unit.status.stuck = true;
    ctx.report_check(
        unit.id,
        ReportKind::BogDown,
        format!("{} bogs down in {:?} at {}", unit.name, hex.terrain, tr.to),
        &result,
    );

    if hex.terrain == Terrain::Swamp {
        let roll = ctx.dice.roll_2d6();
        let quicksand = roll >= ctx.options.quicksand_face;
        if quicksand {
            ctx.board.reveal_quicksand(tr.to);
        }
        ctx.report(
            unit.id,
            ReportKind::Quicksand,
            format!(
                "quicksand check at {}: rolls {} against {}, {}",
                tr.to,
                roll,
                ctx.options.quicksand_face,
                if quicksand {
                    "the swamp is quicksand"
                } else {
                    "no quicksand"
                }
            ),
        );
    }
    StepOutcome::Stuck
}

/// A stuck unit tries to pull free before moving. Returns true on success.
pub fn attempt_extraction(ctx: &mut MoveContext<'_>, unit: &mut UnitState) -> bool {
    let terrain_mod = ctx
        .board
        .hex(unit.position)
        .and_then(|h| h.terrain.bog_modifier())
        .unwrap_or(0);
    let result = ctx.roll(unit, HazardKind::Extraction { terrain_mod });
    if result.passed() {
        unit.status.stuck = false;
        ctx.report(unit.id, ReportKind::Unstuck, format!("{} pulls free", unit.name));
        true
    } else {
        ctx.report_check(
            unit.id,
            ReportKind::StillStuck,
            format!("{} is still stuck", unit.name),
            &result,
        );
        false
    }
}
