//! Game options consulted during movement resolution
//!
//! Options are injected into every resolution call. There is no global
//! configuration: two games with different rule sets can run side by side.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::{MovementError, Result};

/// Rule switches and tunable die targets for movement resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameOptions {
    // === OPTIONAL RULES ===
    /// A fall while moving ends the unit's movement.
    ///
    /// When false, a unit that falls with movement points left gets a
    /// continuation turn so it can re-plan from the ground.
    pub falls_end_movement: bool,

    /// Units entering swamp, mud, snow and similar terrain may bog down
    pub bog_down: bool,

    /// Mechs may drop three or more levels without jumping
    pub leaping: bool,

    /// Elevation changes across cliff edges require a piloting check
    pub cliffs: bool,

    /// Moving backwards across an elevation change requires a piloting check
    pub backward_elevation_check: bool,

    /// Sprint movement (twice walking MP) is allowed
    pub sprint: bool,

    /// Roads count as paved surface for skid checks
    pub skid_on_road: bool,

    /// Fog or darkness: running units make reckless-movement checks
    pub fog_or_darkness: bool,

    /// Hidden units can be detected by, and fire point-blank at, movers
    pub hidden_units: bool,

    // === DIE TARGETS ===
    /// 1d6 face on which ice gives way under a unit
    pub ice_break_face: i32,

    /// 2d6 roll at or above which a swamp turns out to be quicksand
    pub quicksand_face: i32,

    /// 2d6 roll at or above which a conventional minefield detonates
    pub mine_trigger_target: i32,

    /// 2d6 roll at or above which a minefield clearing attempt succeeds
    pub mine_clear_target: i32,

    /// 2d6 roll at or below which a clearing attempt sets the field off
    pub mine_clear_backfire: i32,

    // === WIGE ===
    /// Hexes a WiGE must cover in a turn to stay airborne
    pub wige_min_hexes: u32,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            falls_end_movement: true,
            bog_down: true,
            leaping: false,
            cliffs: true,
            backward_elevation_check: true,
            sprint: false,
            skid_on_road: true,
            fog_or_darkness: false,
            hidden_units: true,

            ice_break_face: 6,
            quicksand_face: 12,
            mine_trigger_target: 7,
            mine_clear_target: 7,
            mine_clear_backfire: 5,

            wige_min_hexes: 5,
        }
    }
}

impl GameOptions {
    /// Create options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from a TOML string (missing keys keep their defaults)
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let options: GameOptions = toml::from_str(content)?;
        options.validate()?;
        Ok(options)
    }

    /// Load options from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate die targets against the faces the dice can produce
    pub fn validate(&self) -> Result<()> {
        if !(1..=6).contains(&self.ice_break_face) {
            return Err(MovementError::Config(format!(
                "ice_break_face ({}) must be a d6 face",
                self.ice_break_face
            )));
        }

        for (name, value) in [
            ("quicksand_face", self.quicksand_face),
            ("mine_trigger_target", self.mine_trigger_target),
            ("mine_clear_target", self.mine_clear_target),
            ("mine_clear_backfire", self.mine_clear_backfire),
        ] {
            if !(2..=12).contains(&value) {
                return Err(MovementError::Config(format!(
                    "{} ({}) must be a 2d6 total",
                    name, value
                )));
            }
        }

        if self.mine_clear_backfire >= self.mine_clear_target {
            return Err(MovementError::Config(format!(
                "mine_clear_backfire ({}) should be < mine_clear_target ({})",
                self.mine_clear_backfire, self.mine_clear_target
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(GameOptions::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let options = GameOptions::from_toml_str("leaping = true\nice_break_face = 5\n").unwrap();
        assert!(options.leaping);
        assert_eq!(options.ice_break_face, 5);
        assert!(options.falls_end_movement);
        assert_eq!(options.mine_trigger_target, 7);
    }

    #[test]
    fn test_bad_die_face_rejected() {
        let result = GameOptions::from_toml_str("ice_break_face = 9\n");
        assert!(matches!(result, Err(MovementError::Config(_))));
    }

    #[test]
    fn test_backfire_must_be_below_clear_target() {
        let options = GameOptions {
            mine_clear_backfire: 8,
            ..GameOptions::default()
        };
        assert!(options.validate().is_err());
    }
}
