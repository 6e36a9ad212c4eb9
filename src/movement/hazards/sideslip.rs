//! Sideslips: hovercraft, VTOLs and WiGEs sliding out of a fast turn

use crate::movement::check::HazardKind;
use crate::movement::collision;
use crate::movement::context::{tonnage_damage, MoveContext};
use crate::movement::hazards::Transition;
use crate::movement::outcome::{SlideSpec, StepOutcome};
use crate::movement::report::ReportKind;
use crate::units::category::UnitCategory;
use crate::units::unit::UnitState;

/// Hexes an uncontrolled slide covers
pub fn slide_distance(margin: i32, distance: u32) -> u32 {
    (margin.max(0) as u32).min(distance / 2).max(1)
}

fn floats_or_flies(unit: &UnitState) -> bool {
    match unit.category {
        UnitCategory::Hover => true,
        UnitCategory::Vtol | UnitCategory::Wige => unit.is_airborne(),
        _ => false,
    }
}

pub fn applies(unit: &UnitState, tr: &Transition) -> bool {
    unit.category.sideslips()
        && floats_or_flies(unit)
        && tr.move_type.is_running()
        && ((tr.kind.is_turn() && tr.distance >= 1) || tr.kind.is_lateral())
}

pub fn check_step(ctx: &mut MoveContext<'_>, unit: &mut UnitState, tr: &Transition) -> StepOutcome {
    if !applies(unit, tr) {
        return StepOutcome::Continue;
    }
    let controlled = tr.kind.is_lateral();
    let result = ctx.roll(
        unit,
        HazardKind::Sideslip {
            distance: tr.distance,
            controlled,
        },
    );
    if result.passed() {
        return StepOutcome::Continue;
    }

    let spec = if controlled {
        SlideSpec {
            direction: tr.from.direction_to(&tr.to).unwrap_or(tr.prev_facing),
            distance: 1,
        }
    } else {
        SlideSpec {
            direction: tr.prev_facing,
            distance: slide_distance(result.margin, tr.distance),
        }
    };
    ctx.report_check(
        unit.id,
        ReportKind::Sideslip,
        format!("{} sideslips {} hex(es) toward {:?}", unit.name, spec.distance, spec.direction),
        &result,
    );
    StepOutcome::Sideslip(spec)
}

fn crash(ctx: &mut MoveContext<'_>, unit: &mut UnitState, what: &str) -> bool {
    let damage = tonnage_damage(unit.tonnage);
    ctx.report(
        unit.id,
        ReportKind::TerrainCollision,
        format!("{} slides into {} and takes {} damage", unit.name, what, damage),
    );
    let destroyed = unit.apply_damage(damage);
    if destroyed {
        ctx.report(unit.id, ReportKind::UnitDestroyed, format!("{} is destroyed", unit.name));
    }
    destroyed
}

/// Slide the unit. Returns true if it was destroyed.
pub fn resolve(ctx: &mut MoveContext<'_>, unit: &mut UnitState, spec: SlideSpec) -> bool {
    for _ in 0..spec.distance {
        let cur = unit.position;
        let next = cur.neighbor(spec.direction);
        let Some(hex) = ctx.board.hex(next).cloned() else {
            break;
        };
        let cur_level = ctx.board.level(cur).unwrap_or(0);

        if unit.is_airborne() {
            let altitude = cur_level + unit.elevation;
            let surface = ctx.board.surface_height(next).max(hex.terrain.canopy_height());
            let obstacle = hex.level + surface;
            if obstacle > altitude {
                if crash(ctx, unit, "higher ground") {
                    return true;
                }
                break;
            }
            unit.position = next;
            unit.record_passage();
            unit.elevation = altitude - hex.level;
            if obstacle == altitude {
                return ground(ctx, unit);
            }
        } else {
            if hex.level > cur_level || hex.terrain.is_woods() || hex.building.is_some() {
                if crash(ctx, unit, "an obstacle") {
                    return true;
                }
                break;
            }
            if ctx.units.violates_stacking(unit, next) {
                if let Some(victim) = ctx.units.ground_occupants(next, unit.id).first().copied() {
                    if collision::collide(ctx, unit, victim, spec.direction) {
                        return true;
                    }
                }
                break;
            }
            unit.position = next;
            unit.record_passage();
        }
        unit.distance_moved += 1;
    }
    ctx.notify(unit);
    false
}

/// The slide ran the craft into the surface
fn ground(ctx: &mut MoveContext<'_>, unit: &mut UnitState) -> bool {
    let landable = ctx
        .board
        .hex(unit.position)
        .zip(unit.category.air())
        .is_some_and(|(hex, air)| air.can_land_on(hex));
    unit.elevation = ctx.board.surface_height(unit.position);
    ctx.report(
        unit.id,
        ReportKind::Grounded,
        format!("{} is forced down at {}", unit.name, unit.position),
    );
    let destroyed = if landable {
        false
    } else {
        crash(ctx, unit, "the ground")
    };
    ctx.notify(unit);
    destroyed
}
