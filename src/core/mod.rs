//! Shared types, configuration and errors

pub mod config;
pub mod error;
pub mod types;

pub use config::TacticalConfig;
pub use error::{Result, TacticsError};
pub use types::{EffectId, GridPos, Tick, UnitId};
