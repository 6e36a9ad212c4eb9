//! Climbing up or down a cliff edge

use crate::movement::check::HazardKind;
use crate::movement::context::MoveContext;
use crate::movement::hazards::Transition;
use crate::movement::outcome::{FallSpec, InterruptCause, StepOutcome, TurnOverCause};
use crate::movement::report::ReportKind;
use crate::units::unit::UnitState;

pub fn applies(ctx: &MoveContext<'_>, unit: &UnitState, tr: &Transition) -> bool {
    if !ctx.options.cliffs || !tr.changes_hex() || !tr.on_foot(unit) || unit.category.ground().is_none() {
        return false;
    }
    let change = tr.level_change(&*ctx.board);
    if !(1..=2).contains(&change.abs()) {
        return false;
    }
    let higher = if change > 0 { tr.to } else { tr.from };
    ctx.board.hex(higher).is_some_and(|h| h.cliff_top)
}

pub fn enter(ctx: &mut MoveContext<'_>, unit: &mut UnitState, tr: &Transition) -> StepOutcome {
    if !applies(ctx, unit, tr) {
        return StepOutcome::Continue;
    }
    let change = tr.level_change(&*ctx.board);
    let ascending = change > 0;
    let levels = change.abs();
    let result = ctx.roll(unit, HazardKind::Cliff { levels, ascending });
    if result.passed() {
        return StepOutcome::Continue;
    }

    if ascending {
        ctx.report_check(
            unit.id,
            ReportKind::CliffStop,
            format!("{} fails to climb the cliff and stops at {}", unit.name, tr.from),
            &result,
        );
        StepOutcome::Halt(InterruptCause::CliffAscentStop)
    } else if unit.category.ground().is_some_and(|g| g.falls()) {
        ctx.report_check(
            unit.id,
            ReportKind::CliffStop,
            format!("{} loses its footing on the cliff", unit.name),
            &result,
        );
        StepOutcome::Fall(FallSpec { hex: tr.to, levels })
    } else {
        ctx.report_check(
            unit.id,
            ReportKind::CliffStop,
            format!("{} lurches down the cliff and stalls at {}", unit.name, tr.to),
            &result,
        );
        StepOutcome::TurnOver(TurnOverCause::CliffDescent)
    }
}
