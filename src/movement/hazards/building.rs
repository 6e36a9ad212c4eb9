//! Moving through buildings, collapsing them, and skimming their roofs

use crate::board::hex::HexCoord;
use crate::movement::check::HazardKind;
use crate::movement::context::{tonnage_damage, MoveContext};
use crate::movement::hazards::Transition;
use crate::movement::outcome::{FallSpec, InterruptCause, StepOutcome, TurnOverCause};
use crate::movement::report::ReportKind;
use crate::units::category::UnitCategory;
use crate::units::unit::UnitState;

/// Inside the building standing in `coord` (below its roof)
fn inside(ctx: &MoveContext<'_>, unit: &UnitState, coord: HexCoord) -> bool {
    ctx.board
        .building_at(coord)
        .is_some_and(|b| unit.elevation < b.height)
}

pub fn applies(ctx: &MoveContext<'_>, unit: &UnitState, tr: &Transition) -> bool {
    if !tr.changes_hex() || !tr.on_foot(unit) {
        return false;
    }
    let entering = ctx.board.building_at(tr.to).is_some() && !unit.status.climb_mode;
    let leaving = inside(ctx, unit, tr.from);
    entering || leaving
}

/// Push through a wall into, out of, or within a building
pub fn enter(ctx: &mut MoveContext<'_>, unit: &mut UnitState, tr: &Transition) -> StepOutcome {
    if !applies(ctx, unit, tr) {
        return StepOutcome::Continue;
    }
    let target = ctx
        .board
        .building_at(tr.to)
        .or_else(|| ctx.board.building_at(tr.from))
        .cloned();
    let Some(building) = target else {
        return StepOutcome::Continue;
    };

    if ctx.board.building_at(tr.to).is_some() {
        let wall_damage = tonnage_damage(unit.tonnage);
        let collapsed = ctx.board.damage_building(building.id, wall_damage);
        ctx.report(
            unit.id,
            ReportKind::BuildingDamage,
            format!("{} smashes into {} for {} damage", unit.name, building.name, wall_damage),
        );
        if collapsed {
            return collapse_on(ctx, unit, &building.name, building.cf, tr.to);
        }
    }

    let result = ctx.roll(unit, HazardKind::BuildingEntry { class: building.class });
    if result.passed() {
        return StepOutcome::Continue;
    }
    let damage = building.cf.div_ceil(10);
    ctx.report_check(
        unit.id,
        ReportKind::BuildingDamage,
        format!("{} scrapes the walls of {} and takes {} damage", unit.name, building.name, damage),
        &result,
    );
    if unit.apply_damage(damage) {
        ctx.report(unit.id, ReportKind::UnitDestroyed, format!("{} is destroyed", unit.name));
        return StepOutcome::Destroyed;
    }
    StepOutcome::Continue
}

/// After a step ends in or on a building: does the weight bring it down?
pub fn check_collapse(ctx: &mut MoveContext<'_>, unit: &mut UnitState) -> StepOutcome {
    if unit.is_airborne() {
        return StepOutcome::Continue;
    }
    let at = unit.position;
    let Some(building) = ctx.board.building_at(at).cloned() else {
        return StepOutcome::Continue;
    };
    if unit.elevation > building.height {
        return StepOutcome::Continue;
    }

    let others: u32 = ctx
        .units
        .ground_occupants(at, unit.id)
        .into_iter()
        .filter_map(|id| ctx.units.get(id).map(|u| u.tonnage))
        .sum();
    if !building.overloaded_by(unit.tonnage + others) {
        return StepOutcome::Continue;
    }
    ctx.board.collapse_building(building.id);
    collapse_on(ctx, unit, &building.name, building.cf, at)
}

/// A building fell in around the unit at `at`
fn collapse_on(ctx: &mut MoveContext<'_>, unit: &mut UnitState, name: &str, cf: u32, at: HexCoord) -> StepOutcome {
    let damage = cf.div_ceil(10);
    ctx.report(
        unit.id,
        ReportKind::BuildingCollapse,
        format!("{name} collapses; everyone inside takes {damage} damage"),
    );
    tracing::debug!(%at, cf, "building collapse");

    for id in ctx.units.ground_occupants(at, unit.id) {
        ctx.damage_unit(id, damage);
    }
    if unit.apply_damage(damage) {
        ctx.report(unit.id, ReportKind::UnitDestroyed, format!("{} is destroyed", unit.name));
        return StepOutcome::Destroyed;
    }

    let levels = unit.elevation;
    if unit.category.ground().is_some_and(|g| g.falls()) {
        StepOutcome::Fall(FallSpec { hex: at, levels })
    } else {
        unit.elevation = 0;
        StepOutcome::TurnOver(TurnOverCause::Collapse)
    }
}

/// A WiGE skimming a roof puts its weight on it
pub fn wige_roof_load(ctx: &mut MoveContext<'_>, unit: &mut UnitState) -> StepOutcome {
    if unit.category != UnitCategory::Wige || !unit.is_airborne() {
        return StepOutcome::Continue;
    }
    let Some(building) = ctx.board.building_at(unit.position).cloned() else {
        return StepOutcome::Continue;
    };
    let above_roof = unit.elevation - building.height;
    if !(0..=1).contains(&above_roof) || !building.overloaded_by(unit.tonnage) {
        return StepOutcome::Continue;
    }

    ctx.board.collapse_building(building.id);
    unit.elevation = (unit.elevation - 1).max(0);
    ctx.report(
        unit.id,
        ReportKind::BuildingCollapse,
        format!("{} collapses under {}", building.name, unit.name),
    );
    ctx.report(
        unit.id,
        ReportKind::LevelDrop,
        format!("{} drops to elevation {}", unit.name, unit.elevation),
    );
    StepOutcome::Interrupt(InterruptCause::LevelDrop)
}
