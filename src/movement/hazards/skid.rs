//! Skids: turning at speed on pavement or ice

use crate::board::hex::HexCoord;
use crate::movement::check::HazardKind;
use crate::movement::collision;
use crate::movement::context::{tonnage_damage, MoveContext};
use crate::movement::fall;
use crate::movement::hazards::{minefield, Transition};
use crate::movement::outcome::{FallSpec, InterruptCause, SkidSpec, StepOutcome};
use crate::movement::path::StepKind;
use crate::movement::report::ReportKind;
use crate::units::unit::UnitState;

/// Hexes skidded after moving `distance` hexes: `(distance - 1) / 2`,
/// rounded half up
pub fn skid_distance(distance: u32) -> u32 {
    distance / 2
}

/// Is the hex slick enough to skid on?
fn slick(ctx: &MoveContext<'_>, at: HexCoord) -> bool {
    ctx.board
        .hex(at)
        .is_some_and(|h| h.terrain.is_paved() || h.ice || (h.road && ctx.options.skid_on_road))
}

pub fn applies(ctx: &MoveContext<'_>, unit: &UnitState, tr: &Transition) -> bool {
    tr.kind.is_turn()
        && tr.on_foot(unit)
        && tr.move_type.is_running()
        && tr.distance >= 1
        && unit.category.ground().is_some_and(|g| g.skids())
        && slick(ctx, tr.from)
}

/// Roll the skid check for a turn step
pub fn check_turn(ctx: &mut MoveContext<'_>, unit: &mut UnitState, tr: &Transition) -> StepOutcome {
    if !applies(ctx, unit, tr) {
        return StepOutcome::Continue;
    }
    let ice = ctx.board.hex(tr.from).is_some_and(|h| h.ice);
    let result = ctx.roll(
        unit,
        HazardKind::Skid {
            distance: tr.distance,
            ice,
        },
    );
    if result.passed() {
        return StepOutcome::Continue;
    }

    let is_vehicle = unit.category.ground().is_some_and(|g| g.is_vehicle());
    if is_vehicle && result.margin <= 1 {
        ctx.report_check(
            unit.id,
            ReportKind::Fishtail,
            format!("{} fishtails and keeps its heading", unit.name),
            &result,
        );
        return StepOutcome::Halt(InterruptCause::Fishtail);
    }

    let direction = if tr.last_moved_backwards {
        tr.prev_facing.opposite()
    } else {
        tr.prev_facing
    };
    let distance = skid_distance(tr.distance);
    ctx.report_check(
        unit.id,
        ReportKind::Skid,
        format!("{} skids {} hex(es) toward {:?}", unit.name, distance, direction),
        &result,
    );
    StepOutcome::Skid(SkidSpec { direction, distance })
}

/// Slide the unit hex by hex. Returns true if it was destroyed.
pub fn resolve(ctx: &mut MoveContext<'_>, unit: &mut UnitState, spec: SkidSpec) -> bool {
    let mut fell = false;

    for _ in 0..spec.distance {
        let cur = unit.position;
        let next = cur.neighbor(spec.direction);
        let Some(hex) = ctx.board.hex(next).cloned() else {
            ctx.report(unit.id, ReportKind::TerrainCollision, format!("{} skids to the board edge", unit.name));
            break;
        };
        let cur_level = ctx.board.level(cur).unwrap_or(0);

        if hex.building.is_some() || hex.level > cur_level {
            let damage = tonnage_damage(unit.tonnage);
            ctx.report(
                unit.id,
                ReportKind::TerrainCollision,
                format!("{} skids into {} and takes {} damage", unit.name, next, damage),
            );
            if let Some(id) = hex.building {
                ctx.board.damage_building(id, damage);
            }
            if unit.apply_damage(damage) {
                ctx.report(unit.id, ReportKind::UnitDestroyed, format!("{} is destroyed", unit.name));
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
        unit.distance_moved += 1;

        if hex.level < cur_level && unit.category.ground().is_some_and(|g| g.falls()) {
            unit.position = cur;
            fell = true;
            if fall::resolve_fall(ctx, unit, FallSpec { hex: next, levels: cur_level - hex.level }, true) {
                return true;
            }
            break;
        }

        let tr = Transition {
            kind: StepKind::Forwards,
            from: cur,
            to: next,
            prev_facing: unit.facing,
            move_type: unit.move_type,
            jumping: false,
            landing: false,
            distance: unit.distance_moved,
            last_moved_backwards: false,
        };
        match minefield::enter(ctx, unit, &tr) {
            StepOutcome::Destroyed => return true,
            _ if unit.status.destroyed => return true,
            _ => {}
        }

        if hex.has_water() {
            break;
        }
    }

    if !fell && unit.category.ground().is_some_and(|g| g.falls()) {
        return fall::resolve_fall(ctx, unit, FallSpec::in_place(unit.position), true);
    }
    ctx.notify(unit);
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::hex::Facing;
    use crate::board::terrain::Terrain;
    use crate::dice::ScriptedDice;
    use crate::movement::hazards::fixtures::{turning, World};
    use crate::movement::path::MoveType;
    use crate::units::category::UnitCategory;

    #[test]
    fn test_skid_distance_rounds_half_up() {
        assert_eq!(skid_distance(1), 0);
        assert_eq!(skid_distance(2), 1);
        assert_eq!(skid_distance(3), 1);
        assert_eq!(skid_distance(4), 2);
        assert_eq!(skid_distance(9), 4);
    }

    fn runner(at: HexCoord) -> UnitState {
        let mut unit = UnitState::new("Phoenix Hawk", UnitCategory::Mech, 45).at(at, Facing::North);
        unit.move_type = MoveType::Run;
        unit
    }

    #[test]
    fn test_no_skid_on_clear_ground() {
        let mut world = World::new(ScriptedDice::new(2, 1));
        let at = HexCoord::new(5, 5);
        let mut unit = runner(at);
        let tr = turning(at, StepKind::TurnRight, Facing::North, 4);
        let outcome = check_turn(&mut world.ctx(), &mut unit, &tr);
        assert_eq!(outcome, StepOutcome::Continue);
        assert!(world.log.is_empty());
    }

    #[test]
    fn test_failed_skid_on_pavement() {
        let mut world = World::new(ScriptedDice::new(2, 1));
        let at = HexCoord::new(5, 5);
        world.board.set_terrain(at, Terrain::Pavement);
        let mut unit = runner(at);
        let tr = turning(at, StepKind::TurnRight, Facing::North, 5);

        let outcome = check_turn(&mut world.ctx(), &mut unit, &tr);
        assert_eq!(
            outcome,
            StepOutcome::Skid(SkidSpec {
                direction: Facing::North,
                distance: 2
            })
        );
        assert_eq!(world.log.count(ReportKind::Skid), 1);
    }

    #[test]
    fn test_vehicle_fishtails_on_small_margin() {
        // target 5 + 1 (distance 5) = 6, roll 5: margin 1
        let mut world = World::new(ScriptedDice::new(5, 1));
        let at = HexCoord::new(5, 5);
        world.board.set_terrain(at, Terrain::Pavement);
        let mut tank = UnitState::new("Striker", UnitCategory::Wheeled, 35).at(at, Facing::North);
        tank.move_type = MoveType::Run;
        let tr = turning(at, StepKind::TurnLeft, Facing::North, 5);

        let outcome = check_turn(&mut world.ctx(), &mut tank, &tr);
        assert_eq!(outcome, StepOutcome::Halt(InterruptCause::Fishtail));
    }

    #[test]
    fn test_skid_slides_then_falls() {
        let mut world = World::new(ScriptedDice::passing());
        let mut unit = runner(HexCoord::new(5, 5));
        let destroyed = resolve(
            &mut world.ctx(),
            &mut unit,
            SkidSpec {
                direction: Facing::North,
                distance: 2,
            },
        );
        assert!(!destroyed);
        assert_eq!(unit.position, HexCoord::new(5, 3));
        assert!(unit.status.prone);
        assert_eq!(world.log.count(ReportKind::Fall), 1);
    }

    #[test]
    fn test_skid_stops_at_higher_hex() {
        let mut world = World::new(ScriptedDice::passing());
        world.board.set_level(HexCoord::new(5, 3), 1);
        let mut unit = runner(HexCoord::new(5, 5));
        resolve(
            &mut world.ctx(),
            &mut unit,
            SkidSpec {
                direction: Facing::North,
                distance: 3,
            },
        );
        assert_eq!(unit.position, HexCoord::new(5, 4));
        assert_eq!(world.log.count(ReportKind::TerrainCollision), 1);
    }

    #[test]
    fn test_skid_into_unit_collides() {
        let mut world = World::new(ScriptedDice::passing());
        let victim = world
            .units
            .insert(UnitState::new("Victim", UnitCategory::Mech, 50).at(HexCoord::new(5, 3), Facing::South));
        let mut unit = runner(HexCoord::new(5, 5));
        resolve(
            &mut world.ctx(),
            &mut unit,
            SkidSpec {
                direction: Facing::North,
                distance: 3,
            },
        );
        assert_eq!(unit.position, HexCoord::new(5, 4));
        assert_eq!(world.units.get(victim).unwrap().position, HexCoord::new(5, 2));
        assert_eq!(world.log.count(ReportKind::UnitCollision), 1);
    }
}
