//! Minefields set off by units entering their hex

use crate::board::minefield::{MineKind, Minefield};
use crate::movement::context::MoveContext;
use crate::movement::hazards::Transition;
use crate::movement::outcome::{InterruptCause, StepOutcome};
use crate::movement::path::StepKind;
use crate::movement::report::ReportKind;
use crate::units::category::UnitCategory;
use crate::units::unit::UnitState;

/// Low enough for an active minefield to reach
fn skimming(unit: &UnitState) -> bool {
    matches!(unit.category, UnitCategory::Vtol | UnitCategory::Wige) && unit.elevation <= 1
}

pub fn applies(unit: &UnitState, tr: &Transition) -> bool {
    let arrives = tr.changes_hex() || tr.kind == StepKind::Down;
    arrives && (tr.ground_contact(unit) || (skimming(unit) && !tr.jumping))
}

/// Does this field go off under the unit? Conventional fields roll 2d6.
fn triggers(ctx: &mut MoveContext<'_>, unit: &UnitState, field: &Minefield) -> bool {
    let grounded = !unit.is_airborne();
    match field.kind {
        MineKind::Conventional => {
            if !grounded || unit.category == UnitCategory::Hover {
                return false;
            }
            ctx.dice.roll_2d6() >= ctx.options.mine_trigger_target
        }
        MineKind::Vibrabomb => grounded && unit.tonnage >= field.setting,
        MineKind::Active => {
            if grounded {
                ctx.dice.roll_2d6() >= ctx.options.mine_trigger_target
            } else {
                skimming(unit)
            }
        }
    }
}

pub fn enter(ctx: &mut MoveContext<'_>, unit: &mut UnitState, tr: &Transition) -> StepOutcome {
    if !applies(unit, tr) {
        return StepOutcome::Continue;
    }
    let fields = ctx.board.minefields_at(tr.to);
    if fields.is_empty() {
        return StepOutcome::Continue;
    }

    let mut detonated = false;
    for field in fields {
        if !triggers(ctx, unit, &field) {
            continue;
        }
        detonated = true;
        let spent = ctx.board.reduce_minefield(field.id);
        ctx.report(
            unit.id,
            ReportKind::MinefieldDetonated,
            format!(
                "{:?} minefield at {} goes off under {} for {} damage{}",
                field.kind,
                tr.to,
                unit.name,
                field.density,
                if spent { "; the field is spent" } else { "" }
            ),
        );
        tracing::debug!(unit = %unit.id, at = %tr.to, density = field.density, spent, "minefield detonation");

        if unit.apply_damage(field.density) {
            ctx.report(unit.id, ReportKind::UnitDestroyed, format!("{} is destroyed", unit.name));
            return StepOutcome::Destroyed;
        }
    }

    if detonated {
        StepOutcome::Interrupt(InterruptCause::MinefieldDetonation)
    } else {
        StepOutcome::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::board_map::BoardQuery;
    use crate::board::hex::{Facing, HexCoord};
    use crate::core::types::PlayerId;
    use crate::dice::ScriptedDice;
    use crate::movement::hazards::fixtures::{entering, World};
    use crate::movement::path::MoveType;

    fn field_at(world: &mut World, kind: MineKind, density: u32) {
        world
            .board
            .add_minefield(Minefield::new(HexCoord::new(4, 3), kind, density, PlayerId(2)));
    }

    fn tank() -> UnitState {
        UnitState::new("Manticore", UnitCategory::Tracked, 60).at(HexCoord::new(4, 4), Facing::North)
    }

    fn step() -> Transition {
        entering(HexCoord::new(4, 4), HexCoord::new(4, 3), MoveType::Walk)
    }

    #[test]
    fn test_conventional_detonates_on_trigger_roll() {
        let mut world = World::new(ScriptedDice::passing().with_totals(&[7]));
        field_at(&mut world, MineKind::Conventional, 10);
        let mut unit = tank();

        assert_eq!(
            enter(&mut world.ctx(), &mut unit, &step()),
            StepOutcome::Interrupt(InterruptCause::MinefieldDetonation)
        );
        assert_eq!(unit.armor, 120 - 10);
        assert_eq!(world.board.minefields_at(HexCoord::new(4, 3))[0].density, 5);
        assert_eq!(world.log.count(ReportKind::MinefieldDetonated), 1);
    }

    #[test]
    fn test_conventional_misses_on_low_roll() {
        let mut world = World::new(ScriptedDice::passing().with_totals(&[6]));
        field_at(&mut world, MineKind::Conventional, 10);
        let mut unit = tank();
        assert_eq!(enter(&mut world.ctx(), &mut unit, &step()), StepOutcome::Continue);
        assert_eq!(unit.armor, 120);
    }

    #[test]
    fn test_spent_field_removed() {
        let mut world = World::new(ScriptedDice::passing());
        field_at(&mut world, MineKind::Conventional, 5);
        let mut unit = tank();
        enter(&mut world.ctx(), &mut unit, &step());
        assert!(world.board.minefields_at(HexCoord::new(4, 3)).is_empty());
    }

    #[test]
    fn test_vibrabomb_weight_threshold() {
        let mut world = World::new(ScriptedDice::passing());
        world
            .board
            .add_minefield(Minefield::new(HexCoord::new(4, 3), MineKind::Vibrabomb, 10, PlayerId(2)).with_setting(70));

        let mut light = tank();
        assert_eq!(enter(&mut world.ctx(), &mut light, &step()), StepOutcome::Continue);

        let mut heavy = UnitState::new("Demolisher", UnitCategory::Tracked, 80).at(HexCoord::new(4, 4), Facing::North);
        assert_eq!(
            enter(&mut world.ctx(), &mut heavy, &step()),
            StepOutcome::Interrupt(InterruptCause::MinefieldDetonation)
        );
    }

    #[test]
    fn test_active_field_reaches_low_vtol() {
        let mut world = World::new(ScriptedDice::new(2, 1));
        field_at(&mut world, MineKind::Active, 10);
        field_at(&mut world, MineKind::Conventional, 10);
        let mut vtol = UnitState::new("Warrior", UnitCategory::Vtol, 20)
            .at(HexCoord::new(4, 4), Facing::North)
            .with_elevation(1);

        assert_eq!(
            enter(&mut world.ctx(), &mut vtol, &step()),
            StepOutcome::Interrupt(InterruptCause::MinefieldDetonation)
        );
        assert_eq!(world.log.count(ReportKind::MinefieldDetonated), 1);

        let mut high = vtol.clone().with_elevation(3);
        assert_eq!(enter(&mut world.ctx(), &mut high, &step()), StepOutcome::Continue);
    }

    #[test]
    fn test_hover_skims_conventional_mines() {
        let mut world = World::new(ScriptedDice::passing());
        field_at(&mut world, MineKind::Conventional, 10);
        let mut hover = UnitState::new("Savannah Master", UnitCategory::Hover, 5).at(HexCoord::new(4, 4), Facing::North);
        assert_eq!(enter(&mut world.ctx(), &mut hover, &step()), StepOutcome::Continue);
    }

    #[test]
    fn test_lethal_detonation() {
        let mut world = World::new(ScriptedDice::passing());
        field_at(&mut world, MineKind::Conventional, 30);
        let mut unit = UnitState::new("Savannah", UnitCategory::Wheeled, 5).at(HexCoord::new(4, 4), Facing::North);
        assert_eq!(enter(&mut world.ctx(), &mut unit, &step()), StepOutcome::Destroyed);
        assert!(unit.status.destroyed);
    }
}
