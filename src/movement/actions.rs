//! Attack declarations made as part of a movement path

use serde::{Deserialize, Serialize};

use crate::board::hex::HexCoord;
use crate::core::error::{MovementError, Result};
use crate::core::types::UnitId;
use crate::movement::context::MoveContext;
use crate::movement::path::{MovePath, StepKind};
use crate::movement::report::ReportKind;
use crate::units::category::UnitCategory;
use crate::units::unit::UnitState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackKind {
    Charge,
    Dfa,
    Ram,
}

impl AttackKind {
    pub fn of(step: StepKind) -> Option<(AttackKind, UnitId)> {
        match step {
            StepKind::Charge(id) => Some((AttackKind::Charge, id)),
            StepKind::Dfa(id) => Some((AttackKind::Dfa, id)),
            StepKind::Ram(id) => Some((AttackKind::Ram, id)),
            _ => None,
        }
    }
}

/// An attack declared at the end of movement, resolved by the combat phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackAction {
    pub kind: AttackKind,
    pub attacker: UnitId,
    /// `None` when the declared target no longer exists
    pub target: Option<UnitId>,
    pub from: HexCoord,
    pub to: HexCoord,
}

/// Check every attack step in the path against what the unit can do
pub fn validate(unit: &UnitState, path: &MovePath) -> Result<()> {
    for step in path.steps() {
        let Some((kind, _)) = AttackKind::of(step.kind) else {
            continue;
        };
        let reason = match kind {
            AttackKind::Charge if !unit.category.can_charge() => Some("unit cannot charge"),
            AttackKind::Charge if path.is_jump() => Some("cannot charge while jumping"),
            AttackKind::Dfa if unit.category != UnitCategory::Mech => Some("only mechs can make death from above attacks"),
            AttackKind::Dfa if !path.is_jump() => Some("death from above needs a jump"),
            AttackKind::Ram if !unit.category.can_ram() => Some("unit cannot ram"),
            _ => None,
        };
        if let Some(reason) = reason {
            return Err(MovementError::IllegalAction {
                unit: unit.id,
                reason: reason.to_string(),
            });
        }
    }
    Ok(())
}

/// Declare the attack from where the unit now stands
pub fn declare(ctx: &mut MoveContext<'_>, unit: &UnitState, kind: AttackKind, target: UnitId) -> AttackAction {
    let found = ctx.units.get(target).filter(|t| t.is_deployed());
    let (target, to) = match found {
        Some(t) => (Some(t.id), t.position),
        None => {
            tracing::error!(unit = %unit.id, %target, ?kind, "attack target missing or destroyed");
            (None, unit.position)
        }
    };
    ctx.report(
        unit.id,
        ReportKind::AttackDeclared,
        format!("{} declares a {:?} attack from {} at {}", unit.name, kind, unit.position, to),
    );
    AttackAction {
        kind,
        attacker: unit.id,
        target,
        from: unit.position,
        to,
    }
}
