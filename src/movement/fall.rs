//! Falls: damage, new facing, prone, pilot damage and landing on others

use crate::board::hex::Facing;
use crate::movement::check::HazardKind;
use crate::movement::collision;
use crate::movement::context::{tonnage_damage, MoveContext};
use crate::movement::outcome::FallSpec;
use crate::movement::report::ReportKind;
use crate::units::unit::UnitState;

/// `ceil(tonnage / 10) x (levels + 1)`, halved (rounded up) into water
pub fn fall_damage(tonnage: u32, levels: i32, into_water: bool) -> u32 {
    let base = tonnage_damage(tonnage) * (levels.max(0) as u32 + 1);
    if into_water {
        base.div_ceil(2)
    } else {
        base
    }
}

/// Facing after a fall from a 1d6 roll
pub fn facing_after_fall(facing: Facing, roll: i32) -> Facing {
    match roll {
        1 => facing,
        2 => facing.rotate(1),
        3 => facing.rotate(2),
        4 => facing.opposite(),
        5 => facing.rotate(-2),
        _ => facing.rotate(-1),
    }
}

/// Resolve a fall for `unit`. Returns true if the unit was destroyed.
///
/// When `land_on_occupants` is set, units already standing in the hex it
/// lands in take the same damage and are pushed out of the way.
pub fn resolve_fall(ctx: &mut MoveContext<'_>, unit: &mut UnitState, spec: FallSpec, land_on_occupants: bool) -> bool {
    let from = unit.position;
    if from != spec.hex {
        unit.position = spec.hex;
        unit.record_passage();
    }

    let into_water = ctx.board.water_depth(spec.hex) > 0;
    let damage = fall_damage(unit.tonnage, spec.levels, into_water);
    let falls_over = unit.category.ground().is_some_and(|g| g.falls());

    if falls_over {
        let roll = ctx.dice.d6();
        unit.facing = facing_after_fall(unit.facing, roll);
        unit.status.prone = true;
    }
    unit.elevation = 0;
    unit.status.hull_down = false;

    let mut destroyed = unit.apply_damage(damage);
    ctx.report(
        unit.id,
        ReportKind::Fall,
        format!(
            "{} falls {} level(s) into {}{}, taking {} damage",
            unit.name,
            spec.levels,
            spec.hex,
            if into_water { " (water)" } else { "" },
            damage
        ),
    );
    tracing::debug!(unit = %unit.id, hex = %spec.hex, levels = spec.levels, damage, "fall");

    if !destroyed && falls_over {
        let result = ctx.roll(unit, HazardKind::PilotDamage { levels: spec.levels });
        if result.failed() {
            destroyed = unit.hit_crew(1);
            ctx.report_check(
                unit.id,
                ReportKind::CrewHit,
                format!("{}'s crew is hurt in the fall ({} hits)", unit.name, unit.crew.hits),
                &result,
            );
        }
    }

    if destroyed {
        ctx.report(unit.id, ReportKind::UnitDestroyed, format!("{} is destroyed", unit.name));
    } else if land_on_occupants {
        let direction = from.direction_to(&spec.hex).unwrap_or(unit.facing);
        let victims: Vec<_> = ctx
            .units
            .ground_occupants(spec.hex, unit.id)
            .into_iter()
            .filter(|id| {
                ctx.units
                    .get(*id)
                    .is_some_and(|other| !other.category.is_infantry() || other.owner != unit.owner)
            })
            .collect();
        for victim in victims {
            ctx.report(
                victim,
                ReportKind::UnitCollision,
                format!("{} falls onto it and deals {} damage", unit.name, damage),
            );
            if !ctx.damage_unit(victim, damage) {
                collision::displace(ctx, victim, direction, &[spec.hex]);
            }
        }
    }

    ctx.notify(unit);
    destroyed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::board_map::Board;
    use crate::board::hex::HexCoord;
    use crate::core::config::GameOptions;
    use crate::dice::ScriptedDice;
    use crate::movement::report::ReportLog;
    use crate::units::category::UnitCategory;
    use crate::units::registry::UnitRegistry;

    #[test]
    fn test_fall_damage_formula() {
        assert_eq!(fall_damage(50, 0, false), 5);
        assert_eq!(fall_damage(55, 2, false), 18);
        assert_eq!(fall_damage(55, 0, true), 3);
    }

    #[test]
    fn test_fall_facing_table() {
        let f = Facing::North;
        assert_eq!(facing_after_fall(f, 1), Facing::North);
        assert_eq!(facing_after_fall(f, 2), Facing::NorthEast);
        assert_eq!(facing_after_fall(f, 3), Facing::SouthEast);
        assert_eq!(facing_after_fall(f, 4), Facing::South);
        assert_eq!(facing_after_fall(f, 5), Facing::SouthWest);
        assert_eq!(facing_after_fall(f, 6), Facing::NorthWest);
    }

    #[test]
    fn test_fall_makes_mech_prone_and_hurts_crew_on_failed_check() {
        let mut board = Board::new(6, 6);
        let mut units = UnitRegistry::new();
        let mut dice = ScriptedDice::passing().with_totals(&[2]).with_faces(&[4]);
        let mut log = ReportLog::new();
        let options = GameOptions::default();
        let mut unit = UnitState::new("Centurion", UnitCategory::Mech, 50).at(HexCoord::new(2, 2), Facing::North);

        let destroyed = {
            let mut ctx = MoveContext::new(&mut board, &mut units, &mut dice, &mut log, &options);
            resolve_fall(&mut ctx, &mut unit, FallSpec::in_place(HexCoord::new(2, 2)), true)
        };

        assert!(!destroyed);
        assert!(unit.status.prone);
        assert_eq!(unit.facing, Facing::South);
        assert_eq!(unit.crew.hits, 1);
        assert_eq!(unit.armor, 95);
        assert_eq!(log.count(ReportKind::Fall), 1);
        assert_eq!(log.count(ReportKind::CrewHit), 1);
    }

    #[test]
    fn test_vehicle_does_not_go_prone() {
        let mut board = Board::new(6, 6);
        let mut units = UnitRegistry::new();
        let mut dice = ScriptedDice::passing();
        let mut log = ReportLog::new();
        let options = GameOptions::default();
        let mut tank = UnitState::new("Vedette", UnitCategory::Tracked, 50).at(HexCoord::new(2, 2), Facing::North);
        {
            let mut ctx = MoveContext::new(&mut board, &mut units, &mut dice, &mut log, &options);
            resolve_fall(&mut ctx, &mut tank, FallSpec { hex: HexCoord::new(2, 3), levels: 1 }, true);
        }
        assert!(!tank.status.prone);
        assert_eq!(tank.position, HexCoord::new(2, 3));
        assert_eq!(tank.armor, 90);
        assert_eq!(tank.facing, Facing::North);
    }

    #[test]
    fn test_landing_on_occupant_pushes_it() {
        let mut board = Board::new(6, 6);
        let mut units = UnitRegistry::new();
        let victim = units.insert(UnitState::new("Victim", UnitCategory::Mech, 40).at(HexCoord::new(2, 3), Facing::North));
        let mut dice = ScriptedDice::passing();
        let mut log = ReportLog::new();
        let options = GameOptions::default();
        let mut unit = UnitState::new("Faller", UnitCategory::Mech, 60).at(HexCoord::new(2, 2), Facing::South);
        {
            let mut ctx = MoveContext::new(&mut board, &mut units, &mut dice, &mut log, &options);
            resolve_fall(&mut ctx, &mut unit, FallSpec { hex: HexCoord::new(2, 3), levels: 0 }, true);
        }
        let pushed = units.get(victim).unwrap();
        assert_eq!(pushed.position, HexCoord::new(2, 4));
        assert_eq!(pushed.armor, 80 - 6);
        assert_eq!(log.count(ReportKind::Displaced), 1);
    }
}
