//! Everything one resolution call reads and writes

use serde::{Deserialize, Serialize};

use crate::board::board_map::BoardQuery;
use crate::board::hex::{Facing, HexCoord};
use crate::core::config::GameOptions;
use crate::core::types::UnitId;
use crate::dice::DiceSource;
use crate::movement::check::{self, CheckResult, HazardKind};
use crate::movement::report::{MoveReport, ReportKind, ReportSink};
use crate::units::registry::UnitRegistry;
use crate::units::unit::UnitState;

/// Final state of a unit touched by the resolution, for the transport layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityUpdate {
    pub unit: UnitId,
    pub position: HexCoord,
    pub facing: Facing,
    pub elevation: i32,
    pub prone: bool,
    pub destroyed: bool,
}

impl EntityUpdate {
    pub fn of(unit: &UnitState) -> Self {
        Self {
            unit: unit.id,
            position: unit.position,
            facing: unit.facing,
            elevation: unit.elevation,
            prone: unit.status.prone,
            destroyed: unit.status.destroyed,
        }
    }
}

/// Collaborators for a single resolution. The caller owns all of them;
/// nothing here outlives the call.
pub struct MoveContext<'a> {
    pub board: &'a mut dyn BoardQuery,
    pub units: &'a mut UnitRegistry,
    pub dice: &'a mut dyn DiceSource,
    pub sink: &'a mut dyn ReportSink,
    pub options: &'a GameOptions,
    updates: Vec<EntityUpdate>,
}

impl<'a> MoveContext<'a> {
    pub fn new(
        board: &'a mut dyn BoardQuery,
        units: &'a mut UnitRegistry,
        dice: &'a mut dyn DiceSource,
        sink: &'a mut dyn ReportSink,
        options: &'a GameOptions,
    ) -> Self {
        Self {
            board,
            units,
            dice,
            sink,
            options,
            updates: Vec::new(),
        }
    }

    pub fn report(&mut self, subject: UnitId, kind: ReportKind, description: impl Into<String>) {
        self.sink.push(MoveReport {
            subject,
            kind,
            description: description.into(),
            check: None,
        });
    }

    pub fn report_check(
        &mut self,
        subject: UnitId,
        kind: ReportKind,
        description: impl Into<String>,
        result: &CheckResult,
    ) {
        self.sink.push(MoveReport {
            subject,
            kind,
            description: format!("{}; {}", description.into(), result.describe()),
            check: Some(result.clone()),
        });
    }

    /// Roll a check for `unit`, reporting it if it passes. A failure is left
    /// for the caller to report with its consequence.
    pub fn roll(&mut self, unit: &UnitState, hazard: HazardKind) -> CheckResult {
        let result = check::check(unit, hazard, unit.move_type, self.dice);
        if result.passed() {
            self.sink.push(MoveReport {
                subject: unit.id,
                kind: ReportKind::CheckPassed,
                description: format!("{} {}", unit.name, result.describe()),
                check: Some(result.clone()),
            });
        }
        result
    }

    /// Record a unit's current state as an entity update
    pub fn notify(&mut self, unit: &UnitState) {
        let update = EntityUpdate::of(unit);
        match self.updates.iter_mut().find(|u| u.unit == unit.id) {
            Some(existing) => *existing = update,
            None => self.updates.push(update),
        }
    }

    pub fn take_updates(&mut self) -> Vec<EntityUpdate> {
        std::mem::take(&mut self.updates)
    }

    /// Damage a unit held in the registry; returns true if that destroyed it
    pub fn damage_unit(&mut self, id: UnitId, amount: u32) -> bool {
        let Some(unit) = self.units.get_mut(id) else {
            return false;
        };
        let destroyed = unit.apply_damage(amount);
        let snapshot = unit.clone();
        self.notify(&snapshot);
        if destroyed {
            self.report(id, ReportKind::UnitDestroyed, format!("{} is destroyed", snapshot.name));
        }
        destroyed
    }
}

/// One tenth of the tonnage, rounded up: the basic collision damage unit
pub fn tonnage_damage(tonnage: u32) -> u32 {
    tonnage.div_ceil(10)
}
