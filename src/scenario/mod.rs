//! Scenario files - a board, the units on it and one scripted path
//!
//! Scenarios are plain JSON so they can be written by hand or dumped from
//! a game in progress. Units and buildings are described compactly and
//! expanded into full engine state on load.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::board::board_map::{Board, BoardQuery, Hex};
use crate::board::building::{Building, BuildingClass};
use crate::board::hex::{Facing, HexCoord};
use crate::board::minefield::{MineKind, Minefield};
use crate::core::config::GameOptions;
use crate::core::error::{MovementError, Result};
use crate::core::types::{PlayerId, UnitId};
use crate::dice::DiceSource;
use crate::movement::context::MoveContext;
use crate::movement::interpreter::{resolve, MoveOutcome};
use crate::movement::path::{MovePath, PathBuilder, StepKind};
use crate::movement::report::{MoveReport, ReportLog};
use crate::units::category::UnitCategory;
use crate::units::registry::UnitRegistry;
use crate::units::unit::UnitState;

// === BOARD ===

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildingSpec {
    pub name: String,
    #[serde(default)]
    pub class: BuildingClass,
    pub height: i32,
    pub hexes: Vec<HexCoord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinefieldSpec {
    pub coord: HexCoord,
    #[serde(default)]
    pub kind: MineKind,
    pub density: u32,
    /// Vibrabomb weight threshold
    #[serde(default)]
    pub setting: u32,
    #[serde(default)]
    pub owner: PlayerId,
}

/// Clear board plus the hexes that differ from clear level-0 ground
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardSpec {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub hexes: Vec<Hex>,
    #[serde(default)]
    pub buildings: Vec<BuildingSpec>,
    #[serde(default)]
    pub minefields: Vec<MinefieldSpec>,
}

impl BoardSpec {
    pub fn build(&self) -> Result<Board> {
        let mut board = Board::new(self.width, self.height);
        for hex in &self.hexes {
            let Some(slot) = board.hex_mut(hex.coord) else {
                return Err(MovementError::Config(format!("hex {} is off the board", hex.coord)));
            };
            *slot = hex.clone();
        }
        for spec in &self.buildings {
            board.add_building(Building::new(spec.name.clone(), spec.class, spec.height, spec.hexes.clone()));
        }
        for spec in &self.minefields {
            board.add_minefield(Minefield::new(spec.coord, spec.kind, spec.density, spec.owner).with_setting(spec.setting));
        }
        Ok(board)
    }
}

// === UNITS ===

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitSpec {
    /// Fixed id, needed when a step targets this unit
    #[serde(default)]
    pub id: Option<UnitId>,
    pub name: String,
    pub category: UnitCategory,
    pub tonnage: u32,
    #[serde(default)]
    pub walk_mp: u32,
    #[serde(default)]
    pub jump_mp: u32,
    #[serde(default)]
    pub owner: PlayerId,
    pub position: HexCoord,
    #[serde(default)]
    pub facing: Facing,
    #[serde(default)]
    pub elevation: i32,
    #[serde(default)]
    pub piloting: Option<i32>,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub prone: bool,
    #[serde(default)]
    pub stuck: bool,
}

impl UnitSpec {
    pub fn to_unit(&self) -> UnitState {
        let mut unit = UnitState::new(self.name.clone(), self.category, self.tonnage)
            .with_mp(self.walk_mp, self.jump_mp)
            .owned_by(self.owner)
            .at(self.position, self.facing)
            .with_elevation(self.elevation);
        if let Some(id) = self.id {
            unit.id = id;
        }
        if let Some(piloting) = self.piloting {
            unit = unit.with_piloting(piloting);
        }
        unit.status.hidden = self.hidden;
        unit.status.prone = self.prone;
        unit.status.stuck = self.stuck;
        unit
    }
}

// === SCRIPT ===

/// One scripted step, optionally repeated
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScriptStep {
    pub step: StepKind,
    #[serde(default = "one")]
    pub repeat: usize,
}

fn one() -> usize {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub board: BoardSpec,
    pub units: Vec<UnitSpec>,
    /// Name of the unit that moves
    pub mover: String,
    pub steps: Vec<ScriptStep>,
    #[serde(default)]
    pub options: GameOptions,
    /// Dice seed, overridable from the command line
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Everything left after a scenario has been resolved
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioRun {
    pub path: MovePath,
    pub outcome: MoveOutcome,
    pub reports: Vec<MoveReport>,
    #[serde(skip)]
    pub board: Board,
    #[serde(skip)]
    pub units: UnitRegistry,
}

impl Scenario {
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Build the board and registry, then resolve the scripted path
    pub fn run(&self, dice: &mut dyn DiceSource) -> Result<ScenarioRun> {
        self.options.validate()?;
        let mut board = self.board.build()?;
        let mut units = UnitRegistry::new();
        let mut mover = None;
        for spec in &self.units {
            let id = units.insert(spec.to_unit());
            if spec.name == self.mover {
                mover = Some(id);
            }
        }
        let mover = mover.ok_or_else(|| MovementError::Config(format!("no unit named '{}'", self.mover)))?;
        let unit = units.get(mover).ok_or(MovementError::UnitNotFound(mover))?;

        let mut builder = PathBuilder::new(&board, unit, &self.options);
        for script in &self.steps {
            for _ in 0..script.repeat {
                builder.push(script.step);
            }
        }
        let path = builder.build();

        let mut log = ReportLog::new();
        let outcome = {
            let mut ctx = MoveContext::new(&mut board, &mut units, dice, &mut log, &self.options);
            resolve(&mut ctx, mover, &path)?
        };
        tracing::debug!(reports = log.len(), "scenario resolved");

        Ok(ScenarioRun {
            path,
            outcome,
            reports: log.reports,
            board,
            units,
        })
    }
}
