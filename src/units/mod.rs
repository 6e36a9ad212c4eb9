//! Units: long-lived state, category capabilities and the id registry

pub mod category;
pub mod registry;
pub mod unit;

pub use category::{AirMovable, GroundMovable, UnitCategory, WaterMovable};
pub use registry::UnitRegistry;
pub use unit::{
    AeroState, CriticalState, Crew, Equipment, PassedHex, StatusFlags, UnitState, LETHAL_CREW_HITS,
};
