//! Step interpreter
//!
//! Walks a [`MovePath`] one step at a time against the live board. Every
//! step is checked for legality, committed to a working copy of the unit,
//! and handed to the hazard handlers. Their [`StepOutcome`] decides whether
//! the loop goes on. The working copy goes back into the registry when the
//! path is finished, so the mover never sees itself as an occupant.

use serde::{Deserialize, Serialize};

use crate::board::hex::{Facing, HexCoord};
use crate::core::error::{MovementError, Result};
use crate::core::types::UnitId;
use crate::movement::actions::{self, AttackAction, AttackKind};
use crate::movement::aero;
use crate::movement::context::{EntityUpdate, MoveContext};
use crate::movement::continuation::{self, ContinuationDecision, ContinuationInput};
use crate::movement::fall;
use crate::movement::hazards::{bog, building, cliff, fire, minefield, sideslip, skid, terrain, water, Transition};
use crate::movement::outcome::{InterruptCause, StepOutcome, TurnOverCause};
use crate::movement::path::{MovePath, MoveStep, MoveType, StepKind};
use crate::movement::report::ReportKind;
use crate::movement::special;
use crate::units::category::UnitCategory;
use crate::units::unit::UnitState;

/// Result of resolving one path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOutcome {
    pub decision: ContinuationDecision,
    pub turn_over: Option<TurnOverCause>,
    pub interrupt: Option<InterruptCause>,
    pub attacks: Vec<AttackAction>,
    /// Final state of every unit the resolution touched, mover last
    pub updates: Vec<EntityUpdate>,
}

/// Bookkeeping carried across the step loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunningMoveState {
    // Last good state, restored when a step is halted
    pub last_position: HexCoord,
    pub last_facing: Facing,
    pub last_elevation: i32,
    pub last_mp: u32,
    pub distance: u32,
    passed: usize,

    pub move_type: MoveType,
    pub prev_kind: Option<StepKind>,
    pub last_moved_backwards: bool,
    pub jumping: bool,
    pub fell: bool,
    pub aborted: bool,
    pub turn_over: Option<TurnOverCause>,
    pub interrupt: Option<InterruptCause>,
}

impl RunningMoveState {
    pub fn new(unit: &UnitState, move_type: MoveType) -> Self {
        Self {
            last_position: unit.position,
            last_facing: unit.facing,
            last_elevation: unit.elevation,
            last_mp: unit.mp_used,
            distance: unit.distance_moved,
            passed: unit.passed_through.len(),
            move_type,
            prev_kind: None,
            last_moved_backwards: false,
            jumping: false,
            fell: false,
            aborted: false,
            turn_over: None,
            interrupt: None,
        }
    }

    /// The loop has to stop
    pub fn stopped(&self) -> bool {
        self.aborted || self.turn_over.is_some() || self.interrupt.is_some()
    }

    fn record(&mut self, unit: &UnitState) {
        self.last_position = unit.position;
        self.last_facing = unit.facing;
        self.last_elevation = unit.elevation;
        self.last_mp = unit.mp_used;
        self.distance = unit.distance_moved;
        self.passed = unit.passed_through.len();
    }

    fn restore(&self, unit: &mut UnitState) {
        unit.position = self.last_position;
        unit.facing = self.last_facing;
        unit.elevation = self.last_elevation;
        unit.mp_used = self.last_mp;
        unit.distance_moved = self.distance;
        unit.passed_through.truncate(self.passed);
    }
}

type Handler = fn(&mut MoveContext<'_>, &mut UnitState, &Transition) -> StepOutcome;

/// Checks made on entering a hex, in resolution order
const ENTRY_HAZARDS: [Handler; 14] = [
    sideslip::check_step,
    cliff::enter,
    terrain::leap,
    terrain::backwards_elevation,
    building::enter,
    terrain::rubble,
    terrain::reckless,
    water::enter,
    water::ice,
    bog::enter,
    fire::fire,
    fire::magma,
    minefield::enter,
    terrain::jump_landing,
];

/// Resolve `path` for `unit_id`
///
/// Fails without touching anything when the unit is missing, the path is
/// empty, or the path asks for an action the unit cannot take.
pub fn resolve(ctx: &mut MoveContext<'_>, unit_id: UnitId, path: &MovePath) -> Result<MoveOutcome> {
    let mut unit = ctx
        .units
        .get(unit_id)
        .cloned()
        .ok_or(MovementError::UnitNotFound(unit_id))?;
    validate(ctx, &unit, path)?;
    ctx.units.remove(unit_id);

    tracing::info!(unit = %unit_id, name = %unit.name, steps = path.len(), move_type = ?path.move_type(), "resolving path");

    if path.move_type() != MoveType::None {
        unit.move_type = path.move_type();
    }
    let mut state = RunningMoveState::new(&unit, unit.move_type);
    let mut attacks = Vec::new();

    if let Some(kind) = path.steps().iter().map(|s| s.kind).find(StepKind::is_whole_path) {
        resolve_whole_path(ctx, &mut unit, kind);
    } else if unit.status.stuck && path.has_movement() && !bog::attempt_extraction(ctx, &mut unit) {
        state.turn_over = Some(TurnOverCause::Stuck);
    } else {
        run_steps(ctx, &mut unit, path, &mut state, &mut attacks);
        if unit.category.is_aerospace() {
            aero::end_of_path(ctx, &mut unit);
        }
    }
    continuation::land_wige(ctx, &mut unit);

    let input = ContinuationInput {
        interrupt: state.interrupt,
        turn_over: state.turn_over.is_some(),
        jumped: state.jumping,
    };
    let decision = continuation::decide(&mut unit, &input);

    ctx.notify(&unit);
    ctx.units.insert(unit.clone());
    let mut updates = ctx.take_updates();
    // the mover's own update goes last
    if let Some(pos) = updates.iter().position(|u| u.unit == unit_id) {
        let mine = updates.remove(pos);
        updates.push(mine);
    }

    tracing::info!(
        unit = %unit_id,
        at = %unit.position,
        ?decision,
        turn_over = ?state.turn_over,
        interrupt = ?state.interrupt,
        "path resolved"
    );

    Ok(MoveOutcome {
        decision,
        turn_over: state.turn_over,
        interrupt: state.interrupt,
        attacks,
        updates,
    })
}

fn illegal(unit: &UnitState, reason: &str) -> MovementError {
    MovementError::IllegalAction {
        unit: unit.id,
        reason: reason.to_string(),
    }
}

fn validate(ctx: &MoveContext<'_>, unit: &UnitState, path: &MovePath) -> Result<()> {
    if path.is_empty() {
        return Err(MovementError::EmptyPath(unit.id));
    }
    if path.unit() != unit.id {
        return Err(illegal(unit, "path was planned for another unit"));
    }
    if !unit.is_deployed() {
        return Err(illegal(unit, "unit is not on the board"));
    }
    if unit.status.done {
        return Err(illegal(unit, "unit has already moved this turn"));
    }
    actions::validate(unit, path)?;

    let aerospace = unit.category.is_aerospace();
    for step in path.steps() {
        match step.kind {
            StepKind::Flee if !ctx.board.is_edge(unit.position) => {
                return Err(illegal(unit, "can only flee from a board edge"))
            }
            StepKind::Takeoff if unit.category != UnitCategory::Aerodyne => {
                return Err(illegal(unit, "only aerodynes take off from a runway"))
            }
            StepKind::VerticalTakeoff if !aerospace => return Err(illegal(unit, "not an aerospace unit")),
            StepKind::Takeoff | StepKind::VerticalTakeoff if unit.is_airborne() => {
                return Err(illegal(unit, "already airborne"))
            }
            StepKind::Land | StepKind::VerticalLand if !aerospace || !unit.is_airborne() => {
                return Err(illegal(unit, "only airborne aerospace units land"))
            }
            _ => {}
        }
    }
    Ok(())
}

fn resolve_whole_path(ctx: &mut MoveContext<'_>, unit: &mut UnitState, kind: StepKind) {
    match kind {
        StepKind::Flee => {
            unit.status.fled = true;
            ctx.report(unit.id, ReportKind::Fled, format!("{} flees the board at {}", unit.name, unit.position));
        }
        StepKind::Eject => eject(ctx, unit),
        StepKind::Takeoff => aero::takeoff(ctx, unit, false),
        StepKind::VerticalTakeoff => aero::takeoff(ctx, unit, true),
        StepKind::Land => {
            aero::land(ctx, unit);
        }
        StepKind::VerticalLand => aero::vertical_land(ctx, unit),
        _ => {}
    }
}

/// The crew abandons the unit; a mech's pilot lands beside it on foot
fn eject(ctx: &mut MoveContext<'_>, unit: &mut UnitState) {
    unit.status.crew_ejected = true;
    ctx.report(unit.id, ReportKind::Ejected, format!("{}'s crew ejects", unit.name));
    if unit.category != UnitCategory::Mech {
        return;
    }
    let mut pilot = UnitState::new(format!("{} pilot", unit.name), UnitCategory::Infantry, 1)
        .with_mp(1, 0)
        .owned_by(unit.owner)
        .at(unit.position, unit.facing);
    pilot.crew = unit.crew;
    pilot.status.done = true;
    ctx.notify(&pilot);
    ctx.units.insert(pilot);
}

fn run_steps(
    ctx: &mut MoveContext<'_>,
    unit: &mut UnitState,
    path: &MovePath,
    state: &mut RunningMoveState,
    attacks: &mut Vec<AttackAction>,
) {
    let steps = path.steps();
    let final_hex = steps.iter().rposition(|s| s.kind.is_hex_change());

    for (index, step) in steps.iter().enumerate() {
        if unit.status.destroyed || state.stopped() {
            break;
        }
        let is_final_hex = final_hex == Some(index);

        let touches_down = !state.jumping || is_final_hex;
        if step.kind.is_hex_change() && touches_down && detect_hidden(ctx, unit, step.position) {
            state.interrupt = Some(InterruptCause::HiddenUnitDetected);
            break;
        }
        if let Err(reason) = check_legal(ctx, unit, step, state, is_final_hex) {
            tracing::warn!(unit = %unit.id, step = index, kind = ?step.kind, %reason, "illegal step");
            ctx.report(
                unit.id,
                ReportKind::IllegalStep,
                format!("{} cannot {:?} into {}: {}", unit.name, step.kind, step.position, reason),
            );
            break;
        }

        let tr = Transition {
            kind: step.kind,
            from: unit.position,
            to: step.position,
            prev_facing: unit.facing,
            move_type: step.move_type,
            jumping: state.jumping,
            landing: state.jumping && is_final_hex,
            distance: unit.distance_moved,
            last_moved_backwards: state.last_moved_backwards,
        };
        commit(unit, step);
        tracing::debug!(unit = %unit.id, step = index, kind = ?step.kind, at = %unit.position, mp = unit.mp_used, "step");

        let mut outcome = dispatch(ctx, unit, step, &tr, state, attacks);
        if outcome.is_continue() && !unit.status.destroyed && (tr.changes_hex() || step.kind == StepKind::Down) {
            outcome = after_step(ctx, unit, &tr);
        }
        apply_outcome(ctx, unit, outcome, state);

        state.prev_kind = Some(step.kind);
        if step.kind.is_hex_change() {
            state.last_moved_backwards = step.kind == StepKind::Backwards;
        }
        state.record(unit);
    }
}

fn commit(unit: &mut UnitState, step: &MoveStep) {
    let moved = unit.position != step.position;
    unit.position = step.position;
    unit.facing = step.facing;
    unit.elevation = step.elevation;
    unit.mp_used = step.mp_used;
    unit.distance_moved = step.distance;
    if moved {
        unit.record_passage();
    }
}

/// Why a step cannot be taken, if it cannot
fn check_legal(
    ctx: &MoveContext<'_>,
    unit: &UnitState,
    step: &MoveStep,
    state: &RunningMoveState,
    is_final_hex: bool,
) -> std::result::Result<(), String> {
    if step.move_type == MoveType::Illegal {
        return Err("not enough movement points".to_string());
    }
    if step.move_type == MoveType::Sprint && !ctx.options.sprint {
        return Err("sprinting is not allowed".to_string());
    }
    let aerospace = unit.category.is_aerospace();
    if !aerospace {
        let allowance = unit.mp_allowance(step.move_type);
        if step.mp_used > allowance {
            return Err(format!("needs {} MP, has {}", step.mp_used, allowance));
        }
    }
    if !step.kind.is_hex_change() {
        return Ok(());
    }

    let Some(hex) = ctx.board.hex(step.position) else {
        return Err("off the board".to_string());
    };
    if aerospace {
        return Ok(());
    }
    if unit.status.prone {
        return Err("unit is prone".to_string());
    }
    if unit.status.stuck {
        return Err("unit is stuck".to_string());
    }

    let airborne = unit.is_airborne();
    if !airborne && !state.jumping {
        let Some(ground) = unit.category.ground() else {
            return Err("must be airborne to move".to_string());
        };
        if !ground.can_enter(hex) {
            return Err(format!("cannot enter {:?}", hex.terrain));
        }
        let from_level = ctx.board.level(unit.position).unwrap_or(hex.level);
        let change = hex.level - from_level;
        if change > ground.max_climb() {
            return Err(format!("cannot climb {change} levels"));
        }
        let leaps = unit.category == UnitCategory::Mech && ctx.options.leaping;
        if -change > ground.max_climb() && !leaps {
            return Err(format!("cannot drop {} levels", -change));
        }
    }

    if !airborne && (!state.jumping || is_final_hex) {
        let enemy = ctx
            .units
            .ground_occupants(step.position, unit.id)
            .into_iter()
            .any(|id| ctx.units.get(id).is_some_and(|o| o.owner != unit.owner));
        if enemy {
            return Err("enemy unit in the way".to_string());
        }
        if is_final_hex && ctx.units.violates_stacking(unit, step.position) {
            return Err("no room to stop".to_string());
        }
    }
    Ok(())
}

fn dispatch(
    ctx: &mut MoveContext<'_>,
    unit: &mut UnitState,
    step: &MoveStep,
    tr: &Transition,
    state: &mut RunningMoveState,
    attacks: &mut Vec<AttackAction>,
) -> StepOutcome {
    let aerospace = unit.category.is_aerospace();
    if step.kind.is_hex_change() {
        if aerospace {
            return aero::collision_avoidance(ctx, unit);
        }
        for handler in ENTRY_HAZARDS {
            let outcome = handler(ctx, unit, tr);
            if !outcome.is_continue() {
                return outcome;
            }
            if unit.status.destroyed {
                return StepOutcome::Destroyed;
            }
        }
        return StepOutcome::Continue;
    }

    if let Some((kind, target)) = AttackKind::of(step.kind) {
        attacks.push(actions::declare(ctx, unit, kind, target));
        return StepOutcome::TurnOver(TurnOverCause::Attack);
    }

    match step.kind {
        StepKind::TurnLeft | StepKind::TurnRight => {
            let outcome = skid::check_turn(ctx, unit, tr);
            if !outcome.is_continue() {
                return outcome;
            }
            sideslip::check_step(ctx, unit, tr)
        }
        StepKind::StartJump => {
            state.jumping = true;
            StepOutcome::Continue
        }
        StepKind::Up | StepKind::Down | StepKind::Accelerate | StepKind::Decelerate | StepKind::Hover if aerospace => {
            aero::apply_step(ctx, unit, step.kind)
        }
        StepKind::Up | StepKind::Accelerate | StepKind::Decelerate | StepKind::Hover => StepOutcome::Continue,
        StepKind::Down => minefield::enter(ctx, unit, tr),
        kind if kind.is_whole_path() => StepOutcome::Continue,
        kind => special::apply(ctx, unit, kind),
    }
}

/// Checks made once the unit stands in its new hex
fn after_step(ctx: &mut MoveContext<'_>, unit: &mut UnitState, tr: &Transition) -> StepOutcome {
    // mid-jump hexes and airborne units only load roofs they skim
    if !tr.ground_contact(unit) {
        return building::wige_roof_load(ctx, unit);
    }
    if tr.changes_hex() {
        water::submersion(ctx, unit, tr.from);
    }
    let outcome = building::check_collapse(ctx, unit);
    if !outcome.is_continue() {
        return outcome;
    }
    let outcome = building::wige_roof_load(ctx, unit);
    if !outcome.is_continue() {
        return outcome;
    }
    if tr.changes_hex() && point_blank(ctx, unit) {
        return StepOutcome::Interrupt(InterruptCause::PointBlankShot);
    }
    StepOutcome::Continue
}

fn reveal(ctx: &mut MoveContext<'_>, id: UnitId) -> Option<String> {
    let hidden = ctx.units.get_mut(id)?;
    hidden.status.hidden = false;
    let snapshot = hidden.clone();
    ctx.notify(&snapshot);
    Some(snapshot.name)
}

/// Walking into a hidden unit's hex: the mover stops short
fn detect_hidden(ctx: &mut MoveContext<'_>, unit: &UnitState, coord: HexCoord) -> bool {
    if !ctx.options.hidden_units {
        return false;
    }
    let found: Vec<UnitId> = ctx
        .units
        .hidden_enemies_near(unit, coord)
        .into_iter()
        .filter(|id| ctx.units.get(*id).is_some_and(|u| u.position == coord))
        .collect();
    for id in &found {
        if let Some(name) = reveal(ctx, *id) {
            ctx.report(
                unit.id,
                ReportKind::HiddenUnitDetected,
                format!("{} runs into hidden {} at {} and stops at {}", unit.name, name, coord, unit.position),
            );
        }
    }
    !found.is_empty()
}

/// Moving next to a hidden unit draws its point-blank fire
fn point_blank(ctx: &mut MoveContext<'_>, unit: &UnitState) -> bool {
    if !ctx.options.hidden_units {
        return false;
    }
    let shooters = ctx.units.hidden_enemies_near(unit, unit.position);
    for id in &shooters {
        if let Some(name) = reveal(ctx, *id) {
            ctx.report(
                unit.id,
                ReportKind::PointBlankShot,
                format!("hidden {} opens fire on {} at point-blank range", name, unit.name),
            );
        }
    }
    !shooters.is_empty()
}

fn apply_outcome(ctx: &mut MoveContext<'_>, unit: &mut UnitState, outcome: StepOutcome, state: &mut RunningMoveState) {
    match outcome {
        StepOutcome::Continue => {}
        StepOutcome::Fall(spec) => {
            state.fell = true;
            if fall::resolve_fall(ctx, unit, spec, true) {
                return;
            }
            if ctx.options.falls_end_movement {
                state.turn_over = Some(TurnOverCause::Fall);
            } else {
                state.interrupt = Some(InterruptCause::Fell);
            }
        }
        StepOutcome::Skid(spec) => {
            unit.mp_used = unit.run_mp;
            unit.move_type = MoveType::Skid;
            state.move_type = MoveType::Skid;
            skid::resolve(ctx, unit, spec);
            state.turn_over = Some(TurnOverCause::Skid);
        }
        StepOutcome::Sideslip(spec) => {
            sideslip::resolve(ctx, unit, spec);
            state.turn_over = Some(TurnOverCause::Sideslip);
        }
        StepOutcome::Stuck => state.turn_over = Some(TurnOverCause::Stuck),
        StepOutcome::TurnOver(cause) => state.turn_over = Some(cause),
        StepOutcome::Interrupt(cause) => state.interrupt = Some(cause),
        StepOutcome::Halt(cause) => {
            state.restore(unit);
            state.interrupt = Some(cause);
        }
        StepOutcome::Destroyed => unit.status.destroyed = true,
        StepOutcome::Abort => state.aborted = true,
    }
}
