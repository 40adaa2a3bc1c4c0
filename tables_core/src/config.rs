use serde::Deserialize;

/// TOML configuration for a table file
#[derive(Debug, Deserialize)]
pub struct TableFileConfig {
    pub table: TableConfig,
    #[serde(default)]
    pub entries: Vec<EntryConfig>,
}

/// Configuration for the table itself
#[derive(Debug, Deserialize)]
pub struct TableConfig {
    pub id: String,
}

/// Configuration for a single weighted entry
#[derive(Debug, Deserialize)]
pub struct EntryConfig {
    pub id: String,
    #[serde(default = "default_weight")]
    pub weight: u32,
    #[serde(default)]
    pub min_level: Option<u32>,
    #[serde(default)]
    pub max_level: Option<u32>,
}

fn default_weight() -> u32 {
    1
}
