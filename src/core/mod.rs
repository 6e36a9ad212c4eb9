pub mod config;
pub mod error;
pub mod types;

pub use config::GameOptions;
pub use error::{MovementError, Result};
pub use types::{BuildingId, MinefieldId, PlayerId, UnitId};
