use crate::config::TableFileConfig;
use crate::table::{Table, Weighted};
use crate::{ConfigError, RollError};
use rand::Rng;
use std::collections::HashMap;
use std::path::Path;

/// Built-in tables shipped with the crate, as `(file name, contents)`
const BUILTIN_TABLES: &[(&str, &str)] = &[
    ("loot.toml", include_str!("../tables/loot.toml")),
    ("shop.toml", include_str!("../tables/shop.toml")),
    ("monsters.toml", include_str!("../tables/monsters.toml")),
];

/// Registry of weighted tables, loaded from TOML files
#[derive(Debug, Default, Clone)]
pub struct TableRegistry {
    tables: HashMap<String, Table>,
}

impl TableRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the default loot, shop and monster tables
    pub fn builtin() -> Result<Self, ConfigError> {
        let mut registry = Self::new();
        for (name, content) in BUILTIN_TABLES {
            registry.load_str(content, Path::new(name))?;
        }
        Ok(registry)
    }

    /// Load all tables from a directory (recursively)
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let mut registry = Self::new();
        registry.load_dir(dir)?;
        Ok(registry)
    }

    /// Load tables from a directory recursively, replacing tables with the same id
    pub fn load_dir(&mut self, dir: &Path) -> Result<(), ConfigError> {
        if !dir.exists() {
            return Ok(());
        }

        let entries = std::fs::read_dir(dir).map_err(|e| ConfigError::Io {
            error: e,
            path: Some(dir.to_path_buf()),
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| ConfigError::Io {
                error: e,
                path: Some(dir.to_path_buf()),
            })?;
            let path = entry.path();

            if path.is_dir() {
                self.load_dir(&path)?;
            } else if path.extension().is_some_and(|ext| ext == "toml") {
                self.load_file(&path)?;
            }
        }

        Ok(())
    }

    /// Load a single table file
    fn load_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            error: e,
            path: Some(path.to_path_buf()),
        })?;

        self.load_str(&content, path)
    }

    /// Parse one table from TOML text; `origin` is only used in error messages
    pub fn load_str(&mut self, content: &str, origin: &Path) -> Result<(), ConfigError> {
        let config: TableFileConfig = toml::from_str(content).map_err(|e| ConfigError::Parse {
            error: e,
            path: origin.to_path_buf(),
        })?;

        let table = Table::from_config(config).map_err(|e| ConfigError::Validation {
            message: e.to_string(),
            path: origin.to_path_buf(),
        })?;

        self.insert(table);
        Ok(())
    }

    pub fn insert(&mut self, table: Table) {
        self.tables.insert(table.id.clone(), table);
    }

    /// Get a table by ID
    pub fn get(&self, id: &str) -> Option<&Table> {
        self.tables.get(id)
    }

    /// Check if a table exists
    pub fn contains(&self, id: &str) -> bool {
        self.tables.contains_key(id)
    }

    /// List all table IDs
    pub fn table_ids(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(|s| s.as_str())
    }

    /// Roll a table by ID
    pub fn roll<R: Rng + ?Sized>(
        &self,
        table_id: &str,
        level: u32,
        rng: &mut R,
    ) -> Result<Option<&str>, RollError> {
        let table = self
            .get(table_id)
            .ok_or_else(|| RollError::UnknownTable(table_id.to_string()))?;

        Ok(table.roll(level, rng))
    }

    /// Resolve a table into typed values
    pub fn typed<T, F>(&self, table_id: &str, parse: F) -> Result<Weighted<T>, RollError>
    where
        F: FnMut(&str) -> Option<T>,
    {
        let table = self
            .get(table_id)
            .ok_or_else(|| RollError::UnknownTable(table_id.to_string()))?;

        Weighted::from_table(table, parse)
    }
}
