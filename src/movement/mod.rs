//! Movement resolution
//!
//! A planned [`MovePath`] is resolved step by step against the board.
//! Hazards along the way call for 2d6 skill checks whose outcomes may end
//! the move early (falls, skids, sideslips, bog-downs), displace other
//! units, damage terrain or schedule a continuation for the next phase.
//!
//! Everything the resolution needs comes in through a [`MoveContext`]:
//! the board, the unit registry, the dice, a report sink and the game
//! options.

pub mod actions;
pub mod aero;
pub mod check;
pub mod collision;
pub mod context;
pub mod continuation;
pub mod fall;
pub mod hazards;
pub mod interpreter;
pub mod outcome;
pub mod path;
pub mod report;
pub mod special;

pub use actions::{AttackAction, AttackKind};
pub use check::{CheckResult, HazardKind};
pub use context::{EntityUpdate, MoveContext};
pub use continuation::ContinuationDecision;
pub use interpreter::{resolve, MoveOutcome};
pub use outcome::{InterruptCause, StepOutcome, TurnOverCause};
pub use path::{MovePath, MoveStep, MoveType, PathBuilder, StepKind};
pub use report::{MoveReport, ReportKind, ReportLog, ReportSink};
