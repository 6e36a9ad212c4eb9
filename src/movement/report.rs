//! Movement reports
//!
//! Reports are the user-visible narration of a resolution. They are
//! appended in the order things happen and never rewritten.

use serde::{Deserialize, Serialize};

use crate::core::types::UnitId;
use crate::movement::check::CheckResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportKind {
    CheckPassed,
    IllegalStep,

    // Falls and crew
    Fall,
    CrewHit,
    StoodUp,
    FailedStandUp,

    // Skids and slides
    Skid,
    Fishtail,
    Sideslip,
    Grounded,
    TerrainCollision,
    UnitCollision,

    // Displacement
    Displaced,
    Domino,
    DisplacementDeath,

    // Terrain
    BogDown,
    Unstuck,
    StillStuck,
    Quicksand,
    CliffStop,
    LegDamage,
    IceBroken,
    SwarmerDrowned,
    SwarmerDislodged,
    FireHeat,
    FireDamage,
    MagmaCrustBroken,
    Magma,

    // Buildings
    BuildingDamage,
    BuildingCollapse,
    LevelDrop,

    // Mines
    MinefieldDetonated,
    MinefieldCleared,
    MineLaid,

    // Hidden units
    HiddenUnitDetected,
    PointBlankShot,

    // Whole-path actions
    Fled,
    Ejected,
    TookOff,
    Landed,
    WigeLanded,
    WigeCrashed,

    // Aerospace
    ControlRollFailed,
    Stall,
    AltitudeLost,
    Crash,
    AirCollision,

    // Special steps
    AttackDeclared,
    StatusChange,
    Loaded,
    Unloaded,
    Mounted,
    Towing,
    Disconnected,
    Launched,
    Recovered,
    Joined,
    Converted,

    UnitDestroyed,
}

impl ReportKind {
    /// Something physically went wrong for somebody
    pub fn is_hazard(&self) -> bool {
        !matches!(
            self,
            ReportKind::CheckPassed
                | ReportKind::IllegalStep
                | ReportKind::StoodUp
                | ReportKind::Unstuck
                | ReportKind::SwarmerDislodged
                | ReportKind::MinefieldCleared
                | ReportKind::MineLaid
                | ReportKind::HiddenUnitDetected
                | ReportKind::Fled
                | ReportKind::Ejected
                | ReportKind::TookOff
                | ReportKind::Landed
                | ReportKind::WigeLanded
                | ReportKind::AttackDeclared
                | ReportKind::StatusChange
                | ReportKind::Loaded
                | ReportKind::Unloaded
                | ReportKind::Mounted
                | ReportKind::Towing
                | ReportKind::Disconnected
                | ReportKind::Launched
                | ReportKind::Recovered
                | ReportKind::Joined
                | ReportKind::Converted
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveReport {
    pub subject: UnitId,
    pub kind: ReportKind,
    pub description: String,
    #[serde(default)]
    pub check: Option<CheckResult>,
}

/// Where reports go
pub trait ReportSink {
    fn push(&mut self, report: MoveReport);
}

/// Ordered in-memory report list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportLog {
    pub reports: Vec<MoveReport>,
}

impl ReportLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn of_kind(&self, kind: ReportKind) -> impl Iterator<Item = &MoveReport> {
        self.reports.iter().filter(move |r| r.kind == kind)
    }

    pub fn count(&self, kind: ReportKind) -> usize {
        self.of_kind(kind).count()
    }

    pub fn hazards(&self) -> impl Iterator<Item = &MoveReport> {
        self.reports.iter().filter(|r| r.kind.is_hazard())
    }
}

impl ReportSink for ReportLog {
    fn push(&mut self, report: MoveReport) {
        self.reports.push(report);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_keeps_order() {
        let mut log = ReportLog::new();
        let id = UnitId::new();
        for kind in [ReportKind::Skid, ReportKind::CheckPassed, ReportKind::Fall] {
            log.push(MoveReport {
                subject: id,
                kind,
                description: String::new(),
                check: None,
            });
        }
        let kinds: Vec<ReportKind> = log.reports.iter().map(|r| r.kind).collect();
        assert_eq!(kinds, vec![ReportKind::Skid, ReportKind::CheckPassed, ReportKind::Fall]);
        assert_eq!(log.hazards().count(), 2);
    }

    #[test]
    fn test_hazard_classification() {
        assert!(ReportKind::MinefieldDetonated.is_hazard());
        assert!(ReportKind::Quicksand.is_hazard());
        assert!(!ReportKind::CheckPassed.is_hazard());
        assert!(!ReportKind::StatusChange.is_hazard());
    }
}
