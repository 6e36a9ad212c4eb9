//! Iron Stride - movement resolution for turn-based armored combat
//!
//! Takes a unit's planned path across a hex board and resolves it step by
//! step: terrain and hazard checks, falls, skids, collisions, destructible
//! terrain and the decision whether the unit may keep moving.

pub mod board;
pub mod core;
pub mod dice;
pub mod movement;
pub mod scenario;
pub mod units;
