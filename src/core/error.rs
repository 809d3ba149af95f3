use thiserror::Error;

#[derive(Error, Debug)]
pub enum TacticsError {
    #[error("Unknown unit: {0:?}")]
    UnknownUnit(crate::core::types::UnitId),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, TacticsError>;
