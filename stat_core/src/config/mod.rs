//! Configuration loading

mod constants;

pub use constants::{
    CombatConstants, GameConstants, PolicyConstants, ProgressionConstants, RewardConstants,
};

use thiserror::Error;

/// Error loading game constants
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Validation error: {0}")]
    ValidationError(String),
}
