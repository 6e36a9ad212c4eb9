//! Side effects of non-movement steps
//!
//! Posture and status flags, standing up, cargo and towing, carriers and
//! squadrons, mines and mode conversion. Steps that reference another unit
//! look it up in the registry; a bad reference is logged and the step does
//! nothing.

use crate::board::minefield::{Minefield, LAID_MINEFIELD_DENSITY};
use crate::core::types::{MinefieldId, UnitId};
use crate::movement::check::HazardKind;
use crate::movement::context::{tonnage_damage, MoveContext};
use crate::movement::fall;
use crate::movement::outcome::{FallSpec, InterruptCause, StepOutcome, TurnOverCause};
use crate::movement::path::StepKind;
use crate::movement::report::ReportKind;
use crate::units::category::UnitCategory;
use crate::units::unit::UnitState;

pub fn apply(ctx: &mut MoveContext<'_>, unit: &mut UnitState, kind: StepKind) -> StepOutcome {
    match kind {
        StepKind::GetUp => stand_up(ctx, unit, false),
        StepKind::CarefulStand => stand_up(ctx, unit, true),
        StepKind::Load(id) => load(ctx, unit, id),
        StepKind::Unload(id) => release(ctx, unit, id, ReportKind::Unloaded, "unloads"),
        StepKind::Launch(id) => release(ctx, unit, id, ReportKind::Launched, "launches"),
        StepKind::Undock(id) => release(ctx, unit, id, ReportKind::Launched, "undocks"),
        StepKind::Drop(id) => release(ctx, unit, id, ReportKind::Launched, "drops"),
        StepKind::Mount(id) => mount(ctx, unit, id),
        StepKind::Recover(id) => recover(ctx, unit, id),
        StepKind::Tow(id) => tow(ctx, unit, id),
        StepKind::Disconnect(id) => disconnect(ctx, unit, id),
        StepKind::Join(id) => join(ctx, unit, id),
        StepKind::LayMine(kind) => {
            let field = Minefield::new(unit.position, kind, LAID_MINEFIELD_DENSITY, unit.owner);
            ctx.board.add_minefield(field);
            ctx.report(
                unit.id,
                ReportKind::MineLaid,
                format!("{} lays a {:?} minefield at {}", unit.name, kind, unit.position),
            );
            StepOutcome::Continue
        }
        StepKind::ClearMinefield(id) => clear_minefield(ctx, unit, id),
        StepKind::ConvertMode => convert(ctx, unit),
        other => {
            set_flag(ctx, unit, other);
            StepOutcome::Continue
        }
    }
}

fn set_flag(ctx: &mut MoveContext<'_>, unit: &mut UnitState, kind: StepKind) {
    let status = &mut unit.status;
    let change = match kind {
        StepKind::ClimbModeOn => {
            status.climb_mode = true;
            "climb mode on"
        }
        StepKind::ClimbModeOff => {
            status.climb_mode = false;
            "climb mode off"
        }
        StepKind::GoProne => {
            status.prone = true;
            status.hull_down = false;
            "goes prone"
        }
        StepKind::HullDown => {
            status.hull_down = true;
            "goes hull down"
        }
        StepKind::Brace => {
            status.bracing = true;
            "braces"
        }
        StepKind::DigIn => {
            status.dug_in = true;
            "digs in"
        }
        StepKind::Fortify => {
            status.fortified = true;
            "fortifies"
        }
        StepKind::Evade => {
            status.evading = true;
            "evades"
        }
        StepKind::Shutdown => {
            status.shutdown = true;
            "shuts down"
        }
        StepKind::Startup => {
            status.shutdown = false;
            "starts up"
        }
        StepKind::SelfDestruct => {
            status.self_destructing = true;
            "starts its self-destruct sequence"
        }
        StepKind::SearchlightOn => {
            status.searchlight = true;
            "turns its searchlight on"
        }
        StepKind::SearchlightOff => {
            status.searchlight = false;
            "turns its searchlight off"
        }
        _ => return,
    };
    ctx.report(unit.id, ReportKind::StatusChange, format!("{} {}", unit.name, change));
}

fn stand_up(ctx: &mut MoveContext<'_>, unit: &mut UnitState, careful: bool) -> StepOutcome {
    if !unit.status.prone {
        return StepOutcome::Continue;
    }
    let result = ctx.roll(unit, HazardKind::StandUp { careful });
    if result.passed() {
        unit.status.prone = false;
        ctx.report(unit.id, ReportKind::StoodUp, format!("{} stands up", unit.name));
        return StepOutcome::Continue;
    }
    ctx.report_check(
        unit.id,
        ReportKind::FailedStandUp,
        format!("{} fails to stand and falls again", unit.name),
        &result,
    );
    if fall::resolve_fall(ctx, unit, FallSpec::in_place(unit.position), false) {
        return StepOutcome::Destroyed;
    }
    StepOutcome::Interrupt(InterruptCause::FailedStandUp)
}

/// A deployed unit other than the mover, or `None` with the reason logged
fn other_unit(ctx: &MoveContext<'_>, unit: &UnitState, id: UnitId, action: &str) -> Option<UnitState> {
    match ctx.units.get(id) {
        Some(other) if other.id != unit.id && !other.status.destroyed => Some(other.clone()),
        Some(_) => {
            tracing::error!(unit = %unit.id, target = %id, action, "invalid target");
            None
        }
        None => {
            tracing::error!(unit = %unit.id, target = %id, action, "target unit not found");
            None
        }
    }
}

fn within_reach(unit: &UnitState, other: &UnitState) -> bool {
    unit.position.distance(&other.position) <= 1
}

fn store(ctx: &mut MoveContext<'_>, unit: UnitState) {
    ctx.notify(&unit);
    ctx.units.insert(unit);
}

fn load(ctx: &mut MoveContext<'_>, unit: &mut UnitState, id: UnitId) -> StepOutcome {
    let Some(mut cargo) = other_unit(ctx, unit, id, "load") else {
        return StepOutcome::Continue;
    };
    if cargo.owner != unit.owner || cargo.loaded_in.is_some() || !within_reach(unit, &cargo) {
        tracing::error!(unit = %unit.id, target = %id, "cannot load a unit that is not a free friendly neighbor");
        return StepOutcome::Continue;
    }
    cargo.loaded_in = Some(unit.id);
    unit.cargo.push(id);
    ctx.report(unit.id, ReportKind::Loaded, format!("{} loads {}", unit.name, cargo.name));
    store(ctx, cargo);
    StepOutcome::Continue
}

/// Put a carried unit down (or launch it) in the carrier's hex
fn release(ctx: &mut MoveContext<'_>, unit: &mut UnitState, id: UnitId, kind: ReportKind, verb: &str) -> StepOutcome {
    if !unit.cargo.contains(&id) {
        tracing::error!(unit = %unit.id, target = %id, verb, "unit is not carried");
        return StepOutcome::Continue;
    }
    let Some(mut cargo) = other_unit(ctx, unit, id, verb) else {
        return StepOutcome::Continue;
    };
    unit.cargo.retain(|c| *c != id);
    cargo.loaded_in = None;
    cargo.position = unit.position;
    cargo.facing = unit.facing;
    cargo.elevation = if cargo.category.is_aerospace() { unit.elevation } else { 0 };
    ctx.report(unit.id, kind, format!("{} {} {}", unit.name, verb, cargo.name));
    store(ctx, cargo);
    StepOutcome::Continue
}

fn board_carrier(ctx: &mut MoveContext<'_>, unit: &mut UnitState, carrier: &mut UnitState) {
    carrier.cargo.push(unit.id);
    unit.loaded_in = Some(carrier.id);
    unit.position = carrier.position;
    unit.elevation = carrier.elevation;
    ctx.notify(carrier);
}

fn mount(ctx: &mut MoveContext<'_>, unit: &mut UnitState, id: UnitId) -> StepOutcome {
    let Some(mut carrier) = other_unit(ctx, unit, id, "mount") else {
        return StepOutcome::Continue;
    };
    if carrier.owner != unit.owner || !within_reach(unit, &carrier) {
        tracing::error!(unit = %unit.id, target = %id, "cannot mount a unit that is not a friendly neighbor");
        return StepOutcome::Continue;
    }
    board_carrier(ctx, unit, &mut carrier);
    ctx.report(unit.id, ReportKind::Mounted, format!("{} mounts {}", unit.name, carrier.name));
    ctx.units.insert(carrier);
    StepOutcome::TurnOver(TurnOverCause::Mounted)
}

fn recover(ctx: &mut MoveContext<'_>, unit: &mut UnitState, id: UnitId) -> StepOutcome {
    let Some(mut carrier) = other_unit(ctx, unit, id, "recover") else {
        return StepOutcome::Continue;
    };
    if carrier.owner != unit.owner || !within_reach(unit, &carrier) {
        tracing::error!(unit = %unit.id, target = %id, "carrier is not a friendly neighbor");
        return StepOutcome::Continue;
    }

    let result = ctx.roll(
        unit,
        HazardKind::Recovery {
            prototype_collar: unit.equipment.prototype_docking_collar,
        },
    );
    if result.passed() {
        board_carrier(ctx, unit, &mut carrier);
        ctx.report(unit.id, ReportKind::Recovered, format!("{} is recovered by {}", unit.name, carrier.name));
        ctx.units.insert(carrier);
        return StepOutcome::TurnOver(TurnOverCause::Recovery);
    }

    ctx.report_check(
        unit.id,
        ReportKind::UnitCollision,
        format!("{} misses the recovery and strikes {}", unit.name, carrier.name),
        &result,
    );
    let carrier_tons = carrier.tonnage;
    ctx.damage_unit(id, tonnage_damage(unit.tonnage));
    if unit.apply_damage(tonnage_damage(carrier_tons)) {
        ctx.report(unit.id, ReportKind::UnitDestroyed, format!("{} is destroyed", unit.name));
        return StepOutcome::Destroyed;
    }
    StepOutcome::TurnOver(TurnOverCause::Recovery)
}

fn tow(ctx: &mut MoveContext<'_>, unit: &mut UnitState, id: UnitId) -> StepOutcome {
    let Some(mut trailer) = other_unit(ctx, unit, id, "tow") else {
        return StepOutcome::Continue;
    };
    if unit.towing.is_some() || trailer.towed_by.is_some() || !within_reach(unit, &trailer) {
        tracing::error!(unit = %unit.id, target = %id, "cannot hitch");
        return StepOutcome::Continue;
    }
    unit.towing = Some(id);
    trailer.towed_by = Some(unit.id);
    ctx.report(unit.id, ReportKind::Towing, format!("{} hitches {}", unit.name, trailer.name));
    store(ctx, trailer);
    StepOutcome::Continue
}

fn disconnect(ctx: &mut MoveContext<'_>, unit: &mut UnitState, id: UnitId) -> StepOutcome {
    if unit.towing != Some(id) {
        tracing::error!(unit = %unit.id, target = %id, "not towing that unit");
        return StepOutcome::Continue;
    }
    unit.towing = None;
    if let Some(mut trailer) = other_unit(ctx, unit, id, "disconnect") {
        trailer.towed_by = None;
        ctx.report(unit.id, ReportKind::Disconnected, format!("{} drops {}", unit.name, trailer.name));
        store(ctx, trailer);
    }
    StepOutcome::Continue
}

fn join(ctx: &mut MoveContext<'_>, unit: &mut UnitState, id: UnitId) -> StepOutcome {
    let Some(leader) = other_unit(ctx, unit, id, "join") else {
        return StepOutcome::Continue;
    };
    if leader.owner != unit.owner || !unit.category.is_aerospace() || !leader.category.is_aerospace() {
        tracing::error!(unit = %unit.id, target = %id, "only friendly aerospace units form squadrons");
        return StepOutcome::Continue;
    }
    unit.squadron = Some(leader.squadron.unwrap_or(leader.id));
    ctx.report(unit.id, ReportKind::Joined, format!("{} joins {}'s squadron", unit.name, leader.name));
    StepOutcome::Continue
}

fn clear_minefield(ctx: &mut MoveContext<'_>, unit: &mut UnitState, id: MinefieldId) -> StepOutcome {
    let field = ctx
        .board
        .minefields_at(unit.position)
        .into_iter()
        .find(|f| f.id == id);
    let Some(field) = field else {
        tracing::error!(unit = %unit.id, "no such minefield in the unit's hex");
        return StepOutcome::Continue;
    };

    let roll = ctx.dice.roll_2d6();
    if roll >= ctx.options.mine_clear_target {
        ctx.board.remove_minefield(id);
        ctx.report(
            unit.id,
            ReportKind::MinefieldCleared,
            format!("{} clears the minefield at {} (rolled {})", unit.name, unit.position, roll),
        );
        return StepOutcome::Continue;
    }
    if roll > ctx.options.mine_clear_backfire {
        return StepOutcome::Continue;
    }

    ctx.board.reduce_minefield(id);
    ctx.report(
        unit.id,
        ReportKind::MinefieldDetonated,
        format!(
            "{} sets off the minefield it was clearing (rolled {}) for {} damage",
            unit.name, roll, field.density
        ),
    );
    if unit.apply_damage(field.density) {
        ctx.report(unit.id, ReportKind::UnitDestroyed, format!("{} is destroyed", unit.name));
        return StepOutcome::Destroyed;
    }
    StepOutcome::Continue
}

fn convert(ctx: &mut MoveContext<'_>, unit: &mut UnitState) -> StepOutcome {
    let Some(alt) = unit.alt_category else {
        tracing::error!(unit = %unit.id, "unit has no alternate mode");
        return StepOutcome::Continue;
    };
    let from = unit.category;
    unit.alt_category = Some(from);
    unit.category = alt;
    if alt != UnitCategory::Mech {
        unit.status.prone = false;
    }
    ctx.report(
        unit.id,
        ReportKind::Converted,
        format!("{} converts from {:?} to {:?}", unit.name, from, alt),
    );
    StepOutcome::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::board_map::BoardQuery;
    use crate::board::hex::{Facing, HexCoord};
    use crate::board::minefield::MineKind;
    use crate::core::types::PlayerId;
    use crate::dice::ScriptedDice;
    use crate::movement::hazards::fixtures::World;

    fn mech() -> UnitState {
        UnitState::new("Crab", UnitCategory::Mech, 50).at(HexCoord::new(4, 4), Facing::North)
    }

    #[test]
    fn test_flags_set_unconditionally() {
        let mut world = World::new(ScriptedDice::passing());
        let mut unit = mech();
        for kind in [StepKind::SearchlightOn, StepKind::DigIn, StepKind::Evade, StepKind::Shutdown] {
            assert_eq!(apply(&mut world.ctx(), &mut unit, kind), StepOutcome::Continue);
        }
        assert!(unit.status.searchlight);
        assert!(unit.status.dug_in);
        assert!(unit.status.evading);
        assert!(unit.status.shutdown);
        assert_eq!(world.log.count(ReportKind::StatusChange), 4);
    }

    #[test]
    fn test_failed_stand_up_interrupts() {
        let mut world = World::new(ScriptedDice::new(2, 1));
        let mut unit = mech();
        unit.status.prone = true;
        assert_eq!(
            apply(&mut world.ctx(), &mut unit, StepKind::GetUp),
            StepOutcome::Interrupt(InterruptCause::FailedStandUp)
        );
        assert!(unit.status.prone);
        assert_eq!(world.log.count(ReportKind::FailedStandUp), 1);
        assert_eq!(world.log.count(ReportKind::Fall), 1);
    }

    #[test]
    fn test_stand_up() {
        let mut world = World::new(ScriptedDice::passing());
        let mut unit = mech();
        unit.status.prone = true;
        assert_eq!(apply(&mut world.ctx(), &mut unit, StepKind::CarefulStand), StepOutcome::Continue);
        assert!(!unit.status.prone);
    }

    #[test]
    fn test_load_then_unload() {
        let mut world = World::new(ScriptedDice::passing());
        let infantry = UnitState::new("Rifles", UnitCategory::Infantry, 3).at(HexCoord::new(4, 3), Facing::South);
        let infantry_id = world.units.insert(infantry);
        let mut apc = UnitState::new("APC", UnitCategory::Tracked, 10).at(HexCoord::new(4, 4), Facing::North);

        apply(&mut world.ctx(), &mut apc, StepKind::Load(infantry_id));
        assert_eq!(apc.cargo, vec![infantry_id]);
        assert_eq!(world.units.get(infantry_id).and_then(|u| u.loaded_in), Some(apc.id));

        apc.position = HexCoord::new(6, 6);
        apply(&mut world.ctx(), &mut apc, StepKind::Unload(infantry_id));
        assert!(apc.cargo.is_empty());
        let infantry = world.units.get(infantry_id).unwrap();
        assert_eq!(infantry.loaded_in, None);
        assert_eq!(infantry.position, HexCoord::new(6, 6));
    }

    #[test]
    fn test_missing_target_is_a_no_op() {
        let mut world = World::new(ScriptedDice::passing());
        let mut unit = mech();
        let before = unit.clone();
        assert_eq!(
            apply(&mut world.ctx(), &mut unit, StepKind::Tow(UnitId::new())),
            StepOutcome::Continue
        );
        assert_eq!(unit, before);
        assert!(world.log.is_empty());
    }

    #[test]
    fn test_mount_ends_movement() {
        let mut world = World::new(ScriptedDice::passing());
        let carrier = UnitState::new("Carrier", UnitCategory::Tracked, 60).at(HexCoord::new(4, 3), Facing::North);
        let carrier_id = world.units.insert(carrier);
        let mut trooper = UnitState::new("Elementals", UnitCategory::BattleArmor, 4).at(HexCoord::new(4, 4), Facing::North);

        assert_eq!(
            apply(&mut world.ctx(), &mut trooper, StepKind::Mount(carrier_id)),
            StepOutcome::TurnOver(TurnOverCause::Mounted)
        );
        assert_eq!(trooper.loaded_in, Some(carrier_id));
        assert_eq!(trooper.position, HexCoord::new(4, 3));
    }

    #[test]
    fn test_failed_recovery_damages_both() {
        let mut world = World::new(ScriptedDice::new(2, 1));
        let carrier = UnitState::new("Carrier", UnitCategory::Spheroid, 100)
            .at(HexCoord::new(4, 3), Facing::North)
            .with_elevation(3);
        let carrier_id = world.units.insert(carrier);
        let mut fighter = UnitState::new("Sparrowhawk", UnitCategory::Aerodyne, 30)
            .at(HexCoord::new(4, 4), Facing::North)
            .with_elevation(3);

        assert_eq!(
            apply(&mut world.ctx(), &mut fighter, StepKind::Recover(carrier_id)),
            StepOutcome::TurnOver(TurnOverCause::Recovery)
        );
        assert_eq!(fighter.armor, 60 - 10);
        assert_eq!(world.units.get(carrier_id).map(|u| u.armor), Some(200 - 3));
        assert_eq!(fighter.loaded_in, None);
    }

    #[test]
    fn test_lay_and_clear_minefield() {
        let mut world = World::new(ScriptedDice::passing());
        let mut unit = mech();
        apply(&mut world.ctx(), &mut unit, StepKind::LayMine(MineKind::Vibrabomb));
        let fields = world.board.minefields_at(unit.position);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].density, LAID_MINEFIELD_DENSITY);

        apply(&mut world.ctx(), &mut unit, StepKind::ClearMinefield(fields[0].id));
        assert!(world.board.minefields_at(unit.position).is_empty());
        assert_eq!(world.log.count(ReportKind::MinefieldCleared), 1);
    }

    #[test]
    fn test_clearing_backfires_on_low_roll() {
        let mut world = World::new(ScriptedDice::new(4, 1));
        let mut unit = mech();
        let field = Minefield::new(unit.position, MineKind::Conventional, 10, PlayerId(3));
        let id = field.id;
        world.board.add_minefield(field);

        apply(&mut world.ctx(), &mut unit, StepKind::ClearMinefield(id));
        assert_eq!(unit.armor, 100 - 10);
        assert_eq!(world.board.minefields_at(unit.position)[0].density, 5);
    }

    #[test]
    fn test_convert_swaps_categories() {
        let mut world = World::new(ScriptedDice::passing());
        let mut unit = mech();
        unit.alt_category = Some(UnitCategory::Tracked);
        apply(&mut world.ctx(), &mut unit, StepKind::ConvertMode);
        assert_eq!(unit.category, UnitCategory::Tracked);
        assert_eq!(unit.alt_category, Some(UnitCategory::Mech));
    }
}
