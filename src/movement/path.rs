//! Planned movement: steps, paths and the path builder
//!
//! A [`MovePath`] is an ordered list of [`MoveStep`]s, each carrying the
//! position, facing and elevation the unit will have *after* that step plus
//! cumulative distance and MP. Paths are immutable once built; the
//! interpreter only reads them.

use serde::{Deserialize, Serialize};

use crate::board::board_map::BoardQuery;
use crate::board::hex::{Facing, HexCoord};
use crate::board::minefield::MineKind;
use crate::core::config::GameOptions;
use crate::core::types::{MinefieldId, UnitId};
use crate::units::category::UnitCategory;
use crate::units::unit::UnitState;

/// How the unit is moving this turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MoveType {
    #[default]
    None,
    Walk,
    Run,
    Sprint,
    Jump,
    Skid,
    Illegal,
}

impl MoveType {
    /// Running speed or faster
    pub fn is_running(&self) -> bool {
        matches!(self, MoveType::Run | MoveType::Sprint)
    }
}

/// One atomic action in a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepKind {
    // Movement
    Forwards,
    Backwards,
    LateralLeft,
    LateralRight,
    TurnLeft,
    TurnRight,
    Up,
    Down,
    StartJump,

    // Posture and flags
    ClimbModeOn,
    ClimbModeOff,
    GetUp,
    CarefulStand,
    GoProne,
    HullDown,
    Brace,
    DigIn,
    Fortify,
    Evade,
    Shutdown,
    Startup,
    SelfDestruct,
    SearchlightOn,
    SearchlightOff,

    // Cargo and towing
    Load(UnitId),
    Unload(UnitId),
    Mount(UnitId),
    Tow(UnitId),
    Disconnect(UnitId),

    // Whole-path actions
    Eject,
    Flee,
    Takeoff,
    VerticalTakeoff,
    Land,
    VerticalLand,

    // Engineering
    LayMine(MineKind),
    ClearMinefield(MinefieldId),
    ConvertMode,

    // Attacks
    Charge(UnitId),
    Dfa(UnitId),
    Ram(UnitId),

    // Carriers and squadrons
    Launch(UnitId),
    Undock(UnitId),
    Drop(UnitId),
    Recover(UnitId),
    Join(UnitId),

    // Aerospace
    Accelerate,
    Decelerate,
    Hover,
}

impl StepKind {
    /// Steps that change the hex the unit occupies
    pub fn is_hex_change(&self) -> bool {
        matches!(
            self,
            StepKind::Forwards | StepKind::Backwards | StepKind::LateralLeft | StepKind::LateralRight
        )
    }

    pub fn is_turn(&self) -> bool {
        matches!(self, StepKind::TurnLeft | StepKind::TurnRight)
    }

    pub fn is_lateral(&self) -> bool {
        matches!(self, StepKind::LateralLeft | StepKind::LateralRight)
    }

    pub fn is_attack(&self) -> bool {
        matches!(self, StepKind::Charge(_) | StepKind::Dfa(_) | StepKind::Ram(_))
    }

    /// Steps that move the unit at all (and so need a stuck unit freed)
    pub fn is_movement(&self) -> bool {
        self.is_hex_change()
            || self.is_turn()
            || matches!(self, StepKind::Up | StepKind::Down | StepKind::StartJump)
    }

    /// Steps resolved before, and instead of, the step loop
    pub fn is_whole_path(&self) -> bool {
        matches!(
            self,
            StepKind::Eject
                | StepKind::Flee
                | StepKind::Takeoff
                | StepKind::VerticalTakeoff
                | StepKind::Land
                | StepKind::VerticalLand
        )
    }

    /// Unit referenced by the step, if any
    pub fn target_unit(&self) -> Option<UnitId> {
        match self {
            StepKind::Load(id)
            | StepKind::Unload(id)
            | StepKind::Mount(id)
            | StepKind::Tow(id)
            | StepKind::Disconnect(id)
            | StepKind::Charge(id)
            | StepKind::Dfa(id)
            | StepKind::Ram(id)
            | StepKind::Launch(id)
            | StepKind::Undock(id)
            | StepKind::Drop(id)
            | StepKind::Recover(id)
            | StepKind::Join(id) => Some(*id),
            _ => None,
        }
    }
}

/// A step and the unit's state right after it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveStep {
    pub kind: StepKind,
    pub position: HexCoord,
    pub facing: Facing,
    pub elevation: i32,
    /// Hexes moved this turn, cumulative
    pub distance: u32,
    /// MP spent this turn, cumulative
    pub mp_used: u32,
    pub move_type: MoveType,
}

/// An immutable planned path for one unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovePath {
    unit: UnitId,
    steps: Vec<MoveStep>,
}

impl MovePath {
    pub fn new(unit: UnitId, steps: Vec<MoveStep>) -> Self {
        Self { unit, steps }
    }

    pub fn unit(&self) -> UnitId {
        self.unit
    }

    pub fn steps(&self) -> &[MoveStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn last(&self) -> Option<&MoveStep> {
        self.steps.last()
    }

    /// Movement type of the path as a whole (that of its last step)
    pub fn move_type(&self) -> MoveType {
        self.steps.last().map(|s| s.move_type).unwrap_or_default()
    }

    /// Cumulative MP after the whole path
    pub fn total_mp(&self) -> u32 {
        self.steps.last().map(|s| s.mp_used).unwrap_or(0)
    }

    pub fn is_jump(&self) -> bool {
        self.steps.iter().any(|s| s.kind == StepKind::StartJump)
    }

    pub fn contains(&self, pred: impl Fn(&StepKind) -> bool) -> bool {
        self.steps.iter().any(|s| pred(&s.kind))
    }

    pub fn has_movement(&self) -> bool {
        self.contains(StepKind::is_movement)
    }
}

/// Builds a [`MovePath`] step by step from a unit's current state,
/// computing positions, facings, MP costs and the movement type
pub struct PathBuilder<'a> {
    board: &'a dyn BoardQuery,
    unit: UnitId,
    category: UnitCategory,
    walk_mp: u32,
    run_mp: u32,
    sprint_mp: Option<u32>,
    jump_mp: u32,
    thrust: Option<(u32, u32)>,

    position: HexCoord,
    facing: Facing,
    elevation: i32,
    climb_mode: bool,
    mp_used: u32,
    distance: u32,
    jumping: bool,
    steps: Vec<MoveStep>,
}

impl<'a> PathBuilder<'a> {
    /// Start planning from where the unit stands, carrying over MP already
    /// spent this turn
    pub fn new(board: &'a dyn BoardQuery, unit: &UnitState, options: &GameOptions) -> Self {
        Self {
            board,
            unit: unit.id,
            category: unit.category,
            walk_mp: unit.walk_mp,
            run_mp: unit.run_mp,
            sprint_mp: options.sprint.then(|| unit.sprint_mp()),
            jump_mp: unit.jump_mp,
            thrust: unit.aero.map(|a| (a.safe_thrust, a.max_thrust)),
            position: unit.position,
            facing: unit.facing,
            elevation: unit.elevation,
            climb_mode: unit.status.climb_mode,
            mp_used: unit.mp_used,
            distance: unit.distance_moved,
            jumping: false,
            steps: Vec::new(),
        }
    }

    /// Append a step (chainable)
    pub fn step(mut self, kind: StepKind) -> Self {
        self.push(kind);
        self
    }

    /// Append `count` forward steps
    pub fn forwards(mut self, count: usize) -> Self {
        for _ in 0..count {
            self.push(StepKind::Forwards);
        }
        self
    }

    pub fn push(&mut self, kind: StepKind) {
        let cost = match kind {
            StepKind::Forwards => self.enter(self.facing, 0),
            StepKind::Backwards => self.enter(self.facing.opposite(), 0),
            StepKind::LateralLeft => self.enter(self.facing.turn_left(), 1),
            StepKind::LateralRight => self.enter(self.facing.turn_right(), 1),
            StepKind::TurnLeft => {
                self.facing = self.facing.turn_left();
                self.turn_cost()
            }
            StepKind::TurnRight => {
                self.facing = self.facing.turn_right();
                self.turn_cost()
            }
            StepKind::Up => {
                self.elevation += 1;
                if self.thrust.is_some() {
                    2
                } else {
                    1
                }
            }
            StepKind::Down => {
                self.elevation = (self.elevation - 1).max(0);
                if self.thrust.is_some() {
                    0
                } else {
                    1
                }
            }
            StepKind::StartJump => {
                self.jumping = true;
                0
            }
            StepKind::ClimbModeOn => {
                self.climb_mode = true;
                0
            }
            StepKind::ClimbModeOff => {
                self.climb_mode = false;
                0
            }
            StepKind::GetUp | StepKind::HullDown => 2,
            StepKind::CarefulStand => self.walk_mp.saturating_sub(self.mp_used),
            StepKind::GoProne | StepKind::Load(_) | StepKind::Unload(_) | StepKind::Mount(_) => 1,
            StepKind::Accelerate | StepKind::Decelerate => 1,
            StepKind::Hover => 2,
            StepKind::Takeoff | StepKind::VerticalTakeoff => {
                self.elevation = 1;
                0
            }
            StepKind::Land | StepKind::VerticalLand => {
                self.elevation = 0;
                0
            }
            _ => 0,
        };

        self.mp_used += cost;
        self.steps.push(MoveStep {
            kind,
            position: self.position,
            facing: self.facing,
            elevation: self.elevation,
            distance: self.distance,
            mp_used: self.mp_used,
            move_type: MoveType::None,
        });
    }

    fn turn_cost(&self) -> u32 {
        if self.jumping || self.thrust.is_some() {
            0
        } else {
            1
        }
    }

    /// Move one hex in `direction`; returns the MP cost
    fn enter(&mut self, direction: Facing, extra: u32) -> u32 {
        let from = self.position;
        let to = from.neighbor(direction);
        self.position = to;
        self.distance += 1;

        if self.jumping {
            return 1;
        }
        if self.thrust.is_some() {
            return 0;
        }
        if self.category.ground().is_none() || (self.category == UnitCategory::Wige && self.elevation > 0) {
            return 1 + extra;
        }

        let Some(hex) = self.board.hex(to) else {
            return 1 + extra;
        };
        let from_level = self.board.level(from).unwrap_or(hex.level);
        let climb = (hex.level - from_level).max(0) as u32;

        let terrain_cost = match self.category {
            UnitCategory::Tracked | UnitCategory::Wheeled if hex.road || hex.terrain.is_paved() => 1,
            UnitCategory::Hover => hex.terrain.mp_cost(),
            _ => hex.mp_cost(),
        };

        self.elevation = if self.climb_mode && hex.building.is_some() {
            self.board.surface_height(to)
        } else {
            0
        };

        terrain_cost + climb + extra
    }

    fn classify(&self, mp: u32) -> MoveType {
        if let Some((safe, max)) = self.thrust {
            return if mp <= safe {
                MoveType::Walk
            } else if mp <= max {
                MoveType::Run
            } else {
                MoveType::Illegal
            };
        }
        if mp <= self.walk_mp {
            MoveType::Walk
        } else if mp <= self.run_mp {
            MoveType::Run
        } else if self.sprint_mp.is_some_and(|s| mp <= s) {
            MoveType::Sprint
        } else {
            MoveType::Illegal
        }
    }

    /// Fastest legal movement type and its allowance
    fn fastest(&self) -> (MoveType, u32) {
        match (self.thrust, self.sprint_mp) {
            (Some((_, max)), _) => (MoveType::Run, max),
            (None, Some(sprint)) => (MoveType::Sprint, sprint),
            (None, None) => (MoveType::Run, self.run_mp),
        }
    }

    /// Finish the path, stamping every step with the path's movement type.
    /// Steps beyond the unit's best allowance are marked illegal.
    pub fn build(mut self) -> MovePath {
        let total = self.mp_used;
        let overall = if self.jumping {
            MoveType::Jump
        } else if total == 0 && self.distance == 0 {
            MoveType::None
        } else {
            self.classify(total)
        };
        let (fastest, fastest_mp) = self.fastest();
        let jump_mp = self.jump_mp;

        for step in &mut self.steps {
            step.move_type = match overall {
                MoveType::Jump if step.mp_used > jump_mp => MoveType::Illegal,
                MoveType::Illegal if step.mp_used <= fastest_mp => fastest,
                other => other,
            };
        }
        MovePath::new(self.unit, self.steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::board_map::Board;
    use crate::board::terrain::Terrain;

    fn mech() -> UnitState {
        UnitState::new("Wolverine", UnitCategory::Mech, 55)
            .with_mp(5, 5)
            .at(HexCoord::new(2, 5), Facing::North)
    }

    #[test]
    fn test_clear_walk_costs_one_per_hex() {
        let board = Board::new(10, 10);
        let path = PathBuilder::new(&board, &mech(), &GameOptions::default())
            .forwards(3)
            .build();

        assert_eq!(path.len(), 3);
        assert_eq!(path.total_mp(), 3);
        assert_eq!(path.move_type(), MoveType::Walk);
        assert_eq!(path.last().unwrap().position, HexCoord::new(2, 2));
        assert_eq!(path.last().unwrap().distance, 3);
    }

    #[test]
    fn test_terrain_and_climb_costs() {
        let mut board = Board::new(10, 10);
        board.set_terrain(HexCoord::new(2, 4), Terrain::HeavyWoods);
        board.set_level(HexCoord::new(2, 3), 1);
        let path = PathBuilder::new(&board, &mech(), &GameOptions::default())
            .forwards(2)
            .build();

        // heavy woods 3, then clear plus one level climbed 2
        assert_eq!(path.steps()[0].mp_used, 3);
        assert_eq!(path.total_mp(), 5);
    }

    #[test]
    fn test_running_path_marks_every_step_run() {
        let board = Board::new(10, 10);
        let path = PathBuilder::new(&board, &mech(), &GameOptions::default())
            .forwards(3)
            .step(StepKind::TurnRight)
            .forwards(2)
            .build();

        assert_eq!(path.total_mp(), 6);
        assert!(path.steps().iter().all(|s| s.move_type == MoveType::Run));
    }

    #[test]
    fn test_over_allowance_steps_illegal() {
        let board = Board::new(20, 20);
        let unit = mech().at(HexCoord::new(5, 15), Facing::North);
        let path = PathBuilder::new(&board, &unit, &GameOptions::default())
            .forwards(10)
            .build();

        assert_eq!(path.steps()[7].move_type, MoveType::Run);
        assert_eq!(path.steps()[8].move_type, MoveType::Illegal);
    }

    #[test]
    fn test_sprint_only_when_enabled() {
        let board = Board::new(20, 20);
        let unit = mech().at(HexCoord::new(5, 15), Facing::North);
        let options = GameOptions {
            sprint: true,
            ..GameOptions::default()
        };
        let path = PathBuilder::new(&board, &unit, &options).forwards(10).build();
        assert_eq!(path.move_type(), MoveType::Sprint);
    }

    #[test]
    fn test_jump_path() {
        let board = Board::new(10, 10);
        let path = PathBuilder::new(&board, &mech(), &GameOptions::default())
            .step(StepKind::StartJump)
            .forwards(2)
            .step(StepKind::TurnLeft)
            .forwards(2)
            .build();

        assert!(path.is_jump());
        assert_eq!(path.total_mp(), 4);
        assert!(path.steps().iter().all(|s| s.move_type == MoveType::Jump));
    }

    #[test]
    fn test_tracked_road_costs_one() {
        let mut board = Board::new(10, 10);
        board.edit(HexCoord::new(2, 4), |h| {
            h.terrain = Terrain::LightWoods;
            h.road = true;
        });
        let tank = UnitState::new("Manticore", UnitCategory::Tracked, 60)
            .with_mp(4, 0)
            .at(HexCoord::new(2, 5), Facing::North);
        let path = PathBuilder::new(&board, &tank, &GameOptions::default())
            .forwards(1)
            .build();
        assert_eq!(path.total_mp(), 1);
    }

    #[test]
    fn test_flag_only_path_is_stationary() {
        let board = Board::new(10, 10);
        let path = PathBuilder::new(&board, &mech(), &GameOptions::default())
            .step(StepKind::SearchlightOn)
            .build();
        assert_eq!(path.move_type(), MoveType::None);
        assert!(!path.has_movement());
    }
}
