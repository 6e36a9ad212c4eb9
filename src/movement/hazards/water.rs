//! Water, submersion and ice

use crate::board::hex::HexCoord;
use crate::movement::check::HazardKind;
use crate::movement::context::MoveContext;
use crate::movement::hazards::Transition;
use crate::movement::outcome::{FallSpec, StepOutcome};
use crate::movement::report::ReportKind;
use crate::units::category::UnitCategory;
use crate::units::unit::UnitState;

/// Ice gives way under a heavy unit
pub fn ice(ctx: &mut MoveContext<'_>, unit: &mut UnitState, tr: &Transition) -> StepOutcome {
    let on_ice = ctx.board.hex(tr.to).is_some_and(|h| h.ice);
    let breaks_ice = unit.category.ground().is_some_and(|g| g.breaks_ice());
    if !on_ice || !breaks_ice || !tr.changes_hex() || !tr.ground_contact(unit) {
        return StepOutcome::Continue;
    }

    let roll = ctx.dice.d6();
    if roll != ctx.options.ice_break_face {
        return StepOutcome::Continue;
    }
    ctx.board.break_ice(tr.to);
    ctx.report(
        unit.id,
        ReportKind::IceBroken,
        format!("the ice at {} breaks under {} (rolled {})", tr.to, unit.name, roll),
    );

    if ctx.board.water_depth(tr.to) == 0 {
        return StepOutcome::Continue;
    }
    if unit.category != UnitCategory::Mech {
        unit.status.destroyed = true;
        ctx.report(
            unit.id,
            ReportKind::UnitDestroyed,
            format!("{} sinks through the ice and is lost", unit.name),
        );
        return StepOutcome::Destroyed;
    }
    water_check(ctx, unit, tr.to)
}

/// A mech wading into water
pub fn enter(ctx: &mut MoveContext<'_>, unit: &mut UnitState, tr: &Transition) -> StepOutcome {
    let open = ctx.board.hex(tr.to).is_some_and(|h| h.open_water());
    if !open || unit.category != UnitCategory::Mech || !tr.changes_hex() || !tr.ground_contact(unit) {
        return StepOutcome::Continue;
    }
    water_check(ctx, unit, tr.to)
}

fn water_check(ctx: &mut MoveContext<'_>, unit: &mut UnitState, at: HexCoord) -> StepOutcome {
    let depth = ctx.board.water_depth(at);
    let result = ctx.roll(unit, HazardKind::Water { depth });
    if result.passed() {
        return StepOutcome::Continue;
    }
    ctx.report_check(
        unit.id,
        ReportKind::Fall,
        format!("{} loses its footing in the water", unit.name),
        &result,
    );
    StepOutcome::Fall(FallSpec::in_place(at))
}

/// Submerged units drown the infantry swarming them or shake them off
pub fn submersion(ctx: &mut MoveContext<'_>, unit: &mut UnitState, previous: HexCoord) {
    let Some(swarmer_id) = unit.swarm_attacker else {
        return;
    };
    let depth = ctx.board.water_depth(unit.position) as i32;
    let height = unit.category.ground().map(|g| g.height()).unwrap_or(0);
    let floats = unit.category.water().is_some_and(|w| w.floats());
    if floats || depth == 0 || depth <= height {
        return;
    }

    unit.swarm_attacker = None;
    let Some(mut swarmer) = ctx.units.get(swarmer_id).cloned() else {
        return;
    };
    swarmer.swarm_target = None;

    let result = ctx.roll(&swarmer, HazardKind::SwarmDrowning);
    if result.failed() {
        swarmer.status.destroyed = true;
        ctx.report_check(
            swarmer_id,
            ReportKind::SwarmerDrowned,
            format!("{} drowns clinging to {}", swarmer.name, unit.name),
            &result,
        );
    } else {
        swarmer.position = previous;
        ctx.report_check(
            swarmer_id,
            ReportKind::SwarmerDislodged,
            format!("{} lets go of {} at {}", swarmer.name, unit.name, previous),
            &result,
        );
    }
    ctx.units.insert(swarmer.clone());
    ctx.notify(&swarmer);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::board_map::BoardQuery;
    use crate::board::hex::Facing;
    use crate::dice::ScriptedDice;
    use crate::movement::hazards::fixtures::{entering, World};
    use crate::movement::path::MoveType;

    fn mech() -> UnitState {
        UnitState::new("Archer", UnitCategory::Mech, 70).at(HexCoord::new(4, 4), Facing::North)
    }

    #[test]
    fn test_water_check_failure_falls() {
        let mut world = World::new(ScriptedDice::new(2, 1));
        world.board.set_water(HexCoord::new(4, 3), 2);
        let mut unit = mech();
        let tr = entering(HexCoord::new(4, 4), HexCoord::new(4, 3), MoveType::Walk);
        assert_eq!(
            enter(&mut world.ctx(), &mut unit, &tr),
            StepOutcome::Fall(FallSpec::in_place(HexCoord::new(4, 3)))
        );
    }

    #[test]
    fn test_ice_holds_on_other_faces() {
        let mut world = World::new(ScriptedDice::passing().with_faces(&[5]));
        world.board.edit(HexCoord::new(4, 3), |h| h.ice = true);
        let mut unit = mech();
        let tr = entering(HexCoord::new(4, 4), HexCoord::new(4, 3), MoveType::Walk);
        assert_eq!(ice(&mut world.ctx(), &mut unit, &tr), StepOutcome::Continue);
        assert!(world.board.hex(HexCoord::new(4, 3)).is_some_and(|h| h.ice));
    }

    #[test]
    fn test_tank_sinks_through_broken_ice() {
        let mut world = World::new(ScriptedDice::passing().with_faces(&[6]));
        world.board.edit(HexCoord::new(4, 3), |h| {
            h.ice = true;
            h.water_depth = 2;
        });
        let mut tank = UnitState::new("Patton", UnitCategory::Tracked, 65).at(HexCoord::new(4, 4), Facing::North);
        let tr = entering(HexCoord::new(4, 4), HexCoord::new(4, 3), MoveType::Walk);

        assert_eq!(ice(&mut world.ctx(), &mut tank, &tr), StepOutcome::Destroyed);
        assert!(!world.board.hex(HexCoord::new(4, 3)).is_some_and(|h| h.ice));
        assert_eq!(world.log.count(ReportKind::IceBroken), 1);
    }

    #[test]
    fn test_mech_through_ice_makes_water_check() {
        let mut world = World::new(ScriptedDice::passing().with_faces(&[6]));
        world.board.edit(HexCoord::new(4, 3), |h| {
            h.ice = true;
            h.water_depth = 1;
        });
        let mut unit = mech();
        let tr = entering(HexCoord::new(4, 4), HexCoord::new(4, 3), MoveType::Walk);
        assert_eq!(ice(&mut world.ctx(), &mut unit, &tr), StepOutcome::Continue);
        assert_eq!(world.log.count(ReportKind::CheckPassed), 1);
    }

    #[test]
    fn test_submersion_drowns_swarmer_on_failure() {
        let mut world = World::new(ScriptedDice::passing().with_totals(&[6]));
        world.board.set_water(HexCoord::new(4, 3), 2);
        let mut swarmer = UnitState::new("Elementals", UnitCategory::BattleArmor, 4).at(HexCoord::new(4, 3), Facing::North);
        let mut unit = mech().at(HexCoord::new(4, 3), Facing::North);
        swarmer.swarm_target = Some(unit.id);
        unit.swarm_attacker = Some(world.units.insert(swarmer));

        submersion(&mut world.ctx(), &mut unit, HexCoord::new(4, 4));

        assert!(unit.swarm_attacker.is_none());
        let swarmer = world.units.get(world.units.ids()[0]).unwrap();
        assert!(swarmer.status.destroyed);
        assert_eq!(world.log.count(ReportKind::SwarmerDrowned), 1);
    }

    #[test]
    fn test_submersion_dislodges_swarmer_on_success() {
        let mut world = World::new(ScriptedDice::passing().with_totals(&[9]));
        world.board.set_water(HexCoord::new(4, 3), 2);
        let swarmer = UnitState::new("Elementals", UnitCategory::BattleArmor, 4).at(HexCoord::new(4, 3), Facing::North);
        let mut unit = mech().at(HexCoord::new(4, 3), Facing::North);
        let swarmer_id = world.units.insert(swarmer);
        unit.swarm_attacker = Some(swarmer_id);

        submersion(&mut world.ctx(), &mut unit, HexCoord::new(4, 4));

        let swarmer = world.units.get(swarmer_id).unwrap();
        assert!(!swarmer.status.destroyed);
        assert_eq!(swarmer.position, HexCoord::new(4, 4));
        assert_eq!(world.log.count(ReportKind::SwarmerDislodged), 1);
    }
}
