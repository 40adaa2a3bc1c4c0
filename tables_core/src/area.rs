//! Hunting areas - where the player looks for monsters and how hard they hit

use crate::ConfigError;
use serde::Deserialize;
use std::path::Path;

const BUILTIN_AREAS: &str = include_str!("../tables/areas.toml");

#[derive(Debug, Deserialize)]
struct AreaFileConfig {
    #[serde(default)]
    areas: Vec<Area>,
}

/// One hunting ground
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Area {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Lowest player level allowed in
    #[serde(default = "default_level")]
    pub unlock_level: u32,
    /// Level monsters spawn at, regardless of the player's level
    pub level: u32,
    /// Every encounter is a boss
    #[serde(default)]
    pub boss: bool,
}

fn default_level() -> u32 {
    1
}

impl Area {
    pub fn is_unlocked(&self, player_level: u32) -> bool {
        player_level >= self.unlock_level
    }
}

/// Ordered list of hunting areas
#[derive(Debug, Clone, Default)]
pub struct AreaTable {
    areas: Vec<Area>,
}

impl AreaTable {
    /// The default five areas
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::parse(BUILTIN_AREAS, Path::new("areas.toml"))
    }

    /// Load areas from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            error: e,
            path: Some(path.to_path_buf()),
        })?;
        Self::parse(&content, path)
    }

    /// Parse areas from TOML text; `origin` is only used in error messages
    pub fn parse(content: &str, origin: &Path) -> Result<Self, ConfigError> {
        let config: AreaFileConfig = toml::from_str(content).map_err(|e| ConfigError::Parse {
            error: e,
            path: origin.to_path_buf(),
        })?;

        let invalid = |message: String| ConfigError::Validation {
            message,
            path: origin.to_path_buf(),
        };
        if config.areas.is_empty() {
            return Err(invalid("no areas defined".to_string()));
        }
        for (i, area) in config.areas.iter().enumerate() {
            if area.level == 0 {
                return Err(invalid(format!("area '{}' has monster level 0", area.id)));
            }
            if config.areas[..i].iter().any(|other| other.id == area.id) {
                return Err(invalid(format!("duplicate area '{}'", area.id)));
            }
        }

        Ok(AreaTable {
            areas: config.areas,
        })
    }

    pub fn all(&self) -> &[Area] {
        &self.areas
    }

    pub fn get(&self, id: &str) -> Option<&Area> {
        self.areas.iter().find(|area| area.id == id)
    }

    /// Areas open to a player at `player_level`, in file order
    pub fn unlocked(&self, player_level: u32) -> impl Iterator<Item = &Area> {
        self.areas
            .iter()
            .filter(move |area| area.is_unlocked(player_level))
    }
}
