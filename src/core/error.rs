use thiserror::Error;

use crate::core::types::UnitId;

#[derive(Error, Debug)]
pub enum MovementError {
    #[error("Unit not found: {0}")]
    UnitNotFound(UnitId),

    #[error("Path for unit {0} has no steps")]
    EmptyPath(UnitId),

    #[error("Illegal action by unit {unit}: {reason}")]
    IllegalAction { unit: UnitId, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, MovementError>;
