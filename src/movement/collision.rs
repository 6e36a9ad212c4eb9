//! Collisions and forced displacement
//!
//! A unit pushed out of its hex tries the hexes around it in a fixed order
//! and takes the first legal one. If the hex straight ahead is only blocked
//! by other units, those are pushed first (a domino). A unit with nowhere
//! to go is destroyed.

use crate::board::hex::{Facing, HexCoord};
use crate::core::types::UnitId;
use crate::movement::context::{tonnage_damage, MoveContext};
use crate::movement::fall;
use crate::movement::outcome::FallSpec;
use crate::movement::report::ReportKind;
use crate::units::unit::UnitState;

/// Deepest chain of units one push may shove along
pub const MAX_DOMINO_DEPTH: u32 = 6;

/// Hexsides tried, in order, when displacing toward `direction`
pub fn search_order(direction: Facing) -> [Facing; 6] {
    [
        direction,
        direction.rotate(1),
        direction.rotate(-1),
        direction.rotate(2),
        direction.rotate(-2),
        direction.opposite(),
    ]
}

/// Push `victim` out of its hex toward `direction`, never into `blocked`.
/// Returns the hex it ended in, or `None` if it was destroyed.
pub fn displace(ctx: &mut MoveContext<'_>, victim: UnitId, direction: Facing, blocked: &[HexCoord]) -> Option<HexCoord> {
    let mut blocked = blocked.to_vec();
    displace_at_depth(ctx, victim, direction, &mut blocked, 0)
}

fn displace_at_depth(
    ctx: &mut MoveContext<'_>,
    victim: UnitId,
    direction: Facing,
    blocked: &mut Vec<HexCoord>,
    depth: u32,
) -> Option<HexCoord> {
    let mut unit = ctx.units.get(victim).cloned()?;
    let from = unit.position;

    for (i, facing) in search_order(direction).into_iter().enumerate() {
        let to = from.neighbor(facing);
        if blocked.contains(&to) || !can_displace_into(ctx, &unit, from, to) {
            continue;
        }

        let mut domino = false;
        if ctx.units.violates_stacking(&unit, to) {
            if i != 0 || depth >= MAX_DOMINO_DEPTH {
                continue;
            }
            let in_the_way: Vec<UnitId> = ctx
                .units
                .ground_occupants(to, victim)
                .into_iter()
                .filter(|id| {
                    ctx.units
                        .get(*id)
                        .is_some_and(|o| o.owner != unit.owner || (!o.category.is_infantry() && !unit.category.is_infantry()))
                })
                .collect();
            blocked.push(from);
            for other in in_the_way {
                displace_at_depth(ctx, other, facing, blocked, depth + 1);
            }
            blocked.pop();
            if ctx.units.violates_stacking(&unit, to) {
                continue;
            }
            domino = true;
        }

        unit.position = to;
        ctx.report(
            victim,
            if domino { ReportKind::Domino } else { ReportKind::Displaced },
            format!("{} is pushed from {} to {}", unit.name, from, to),
        );
        tracing::debug!(unit = %victim, %from, %to, depth, "displaced");

        let drop = ctx.board.level(from).unwrap_or(0) - ctx.board.level(to).unwrap_or(0);
        if drop >= 1 && unit.category.ground().is_some_and(|g| g.falls()) {
            unit.position = from;
            fall::resolve_fall(ctx, &mut unit, FallSpec { hex: to, levels: drop }, false);
        }
        ctx.units.insert(unit.clone());
        ctx.notify(&unit);
        return Some(to);
    }

    unit.status.destroyed = true;
    ctx.report(
        victim,
        ReportKind::DisplacementDeath,
        format!("{} has nowhere to go from {} and is destroyed", unit.name, from),
    );
    ctx.units.insert(unit.clone());
    ctx.notify(&unit);
    None
}

fn can_displace_into(ctx: &MoveContext<'_>, unit: &UnitState, from: HexCoord, to: HexCoord) -> bool {
    let Some(hex) = ctx.board.hex(to) else {
        return false;
    };
    let enterable = match (unit.category.ground(), unit.category.air()) {
        (Some(ground), _) => ground.can_enter(hex),
        (None, Some(air)) => air.can_land_on(hex),
        (None, None) => false,
    };
    let climb = hex.level - ctx.board.level(from).unwrap_or(hex.level);
    enterable && climb <= 1
}

/// A moving unit runs into a unit standing in `into`: both take damage
/// based on the other's tonnage and the victim is pushed along
/// `direction`. Returns true if the mover was destroyed.
pub fn collide(ctx: &mut MoveContext<'_>, mover: &mut UnitState, victim: UnitId, direction: Facing) -> bool {
    let Some(other) = ctx.units.get(victim) else {
        return false;
    };
    let to_victim = tonnage_damage(mover.tonnage);
    let to_mover = tonnage_damage(other.tonnage);
    let victim_name = other.name.clone();

    ctx.report(
        mover.id,
        ReportKind::UnitCollision,
        format!(
            "{} collides with {}: {} damage to it, {} to {}",
            mover.name, victim_name, to_victim, to_mover, mover.name
        ),
    );
    let mover_destroyed = mover.apply_damage(to_mover);
    if mover_destroyed {
        ctx.report(mover.id, ReportKind::UnitDestroyed, format!("{} is destroyed", mover.name));
    }
    if !ctx.damage_unit(victim, to_victim) {
        displace(ctx, victim, direction, &[mover.position]);
    }
    mover_destroyed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::board_map::Board;
    use crate::board::terrain::Terrain;
    use crate::core::config::GameOptions;
    use crate::core::types::PlayerId;
    use crate::dice::ScriptedDice;
    use crate::movement::report::ReportLog;
    use crate::units::category::UnitCategory;
    use crate::units::registry::UnitRegistry;

    fn mech(name: &str, at: HexCoord) -> UnitState {
        UnitState::new(name, UnitCategory::Mech, 50).at(at, Facing::North)
    }

    #[test]
    fn test_search_order() {
        assert_eq!(
            search_order(Facing::North),
            [
                Facing::North,
                Facing::NorthEast,
                Facing::NorthWest,
                Facing::SouthEast,
                Facing::SouthWest,
                Facing::South
            ]
        );
    }

    #[test]
    fn test_displaced_straight_ahead() {
        let mut board = Board::new(8, 8);
        let mut units = UnitRegistry::new();
        let id = units.insert(mech("Victim", HexCoord::new(3, 3)));
        let mut dice = ScriptedDice::passing();
        let mut log = ReportLog::new();
        let options = GameOptions::default();
        let mut ctx = MoveContext::new(&mut board, &mut units, &mut dice, &mut log, &options);

        assert_eq!(displace(&mut ctx, id, Facing::North, &[]), Some(HexCoord::new(3, 2)));
    }

    #[test]
    fn test_blocked_terrain_tries_next_hexside() {
        let mut board = Board::new(8, 8);
        board.set_level(HexCoord::new(3, 2), 3);
        let mut units = UnitRegistry::new();
        let id = units.insert(mech("Victim", HexCoord::new(3, 3)));
        let mut dice = ScriptedDice::passing();
        let mut log = ReportLog::new();
        let options = GameOptions::default();
        let mut ctx = MoveContext::new(&mut board, &mut units, &mut dice, &mut log, &options);

        // straight ahead is a cliff two levels too high, so north-east it is
        assert_eq!(displace(&mut ctx, id, Facing::North, &[]), Some(HexCoord::new(4, 2)));
    }

    #[test]
    fn test_domino_push() {
        let mut board = Board::new(8, 8);
        let mut units = UnitRegistry::new();
        let first = units.insert(mech("First", HexCoord::new(3, 4)));
        let second = units.insert(mech("Second", HexCoord::new(3, 3)));
        let mut dice = ScriptedDice::passing();
        let mut log = ReportLog::new();
        let options = GameOptions::default();
        {
            let mut ctx = MoveContext::new(&mut board, &mut units, &mut dice, &mut log, &options);
            assert_eq!(displace(&mut ctx, first, Facing::North, &[]), Some(HexCoord::new(3, 3)));
        }
        assert_eq!(units.get(second).unwrap().position, HexCoord::new(3, 2));
        assert_eq!(log.count(ReportKind::Domino), 1);
        assert_eq!(log.count(ReportKind::Displaced), 1);
    }

    #[test]
    fn test_no_legal_hex_destroys_victim() {
        let mut board = Board::new(8, 8);
        for n in HexCoord::new(3, 3).neighbors() {
            board.set_terrain(n, Terrain::MagmaLiquid);
        }
        let mut units = UnitRegistry::new();
        let id = units.insert(
            UnitState::new("Tank", UnitCategory::Tracked, 40).at(HexCoord::new(3, 3), Facing::North),
        );
        let mut dice = ScriptedDice::passing();
        let mut log = ReportLog::new();
        let options = GameOptions::default();
        {
            let mut ctx = MoveContext::new(&mut board, &mut units, &mut dice, &mut log, &options);
            assert_eq!(displace(&mut ctx, id, Facing::North, &[]), None);
        }
        assert!(units.get(id).unwrap().status.destroyed);
        assert_eq!(log.count(ReportKind::DisplacementDeath), 1);
    }

    #[test]
    fn test_enemy_blocks_side_hex() {
        let mut board = Board::new(8, 8);
        board.set_level(HexCoord::new(3, 2), 3);
        let mut units = UnitRegistry::new();
        let id = units.insert(mech("Victim", HexCoord::new(3, 3)));
        units.insert(mech("Enemy", HexCoord::new(4, 2)).owned_by(PlayerId(7)));
        let mut dice = ScriptedDice::passing();
        let mut log = ReportLog::new();
        let options = GameOptions::default();
        let mut ctx = MoveContext::new(&mut board, &mut units, &mut dice, &mut log, &options);

        // no domino off the primary direction: north-west is next
        assert_eq!(displace(&mut ctx, id, Facing::North, &[]), Some(HexCoord::new(2, 3)));
    }

    #[test]
    fn test_collide_damages_both() {
        let mut board = Board::new(8, 8);
        let mut units = UnitRegistry::new();
        let victim = units.insert(UnitState::new("Victim", UnitCategory::Mech, 30).at(HexCoord::new(3, 2), Facing::North));
        let mut dice = ScriptedDice::passing();
        let mut log = ReportLog::new();
        let options = GameOptions::default();
        let mut mover = mech("Mover", HexCoord::new(3, 3));
        {
            let mut ctx = MoveContext::new(&mut board, &mut units, &mut dice, &mut log, &options);
            assert!(!collide(&mut ctx, &mut mover, victim, Facing::North));
        }
        assert_eq!(mover.armor, 100 - 3);
        let v = units.get(victim).unwrap();
        assert_eq!(v.armor, 60 - 5);
        assert_eq!(v.position, HexCoord::new(3, 1));
    }
}
