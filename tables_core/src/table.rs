use crate::config::{EntryConfig, TableFileConfig};
use crate::RollError;
use rand::Rng;

/// A weighted table of string ids, optionally gated by level
#[derive(Debug, Clone)]
pub struct Table {
    pub id: String,
    entries: Vec<Entry>,
}

/// One weighted row of a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    id: String,
    weight: u32,
    min_level: Option<u32>,
    max_level: Option<u32>,
}

impl Table {
    /// Parse a table from config
    pub fn from_config(config: TableFileConfig) -> Result<Self, RollError> {
        if config.entries.is_empty() {
            return Err(RollError::EmptyTable(config.table.id));
        }

        let entries = config.entries.into_iter().map(Entry::from_config).collect();

        Ok(Table {
            id: config.table.id,
            entries,
        })
    }

    /// Build a table directly from `(id, weight)` pairs without level gates
    pub fn from_weights<S: Into<String>>(
        id: impl Into<String>,
        weights: impl IntoIterator<Item = (S, u32)>,
    ) -> Self {
        Table {
            id: id.into(),
            entries: weights
                .into_iter()
                .map(|(entry_id, weight)| Entry::new(entry_id, weight))
                .collect(),
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Roll this table at the given level, returning the chosen entry id
    ///
    /// Returns `None` when no entry is valid at `level` or all valid weights are zero.
    pub fn roll<R: Rng + ?Sized>(&self, level: u32, rng: &mut R) -> Option<&str> {
        let valid: Vec<&Entry> = self.entries.iter().filter(|e| e.level_valid(level)).collect();
        pick_index(valid.iter().map(|e| e.weight), rng).map(|i| {
            let entry: &Entry = valid[i];
            entry.id.as_str()
        })
    }
}

impl Entry {
    pub fn new(id: impl Into<String>, weight: u32) -> Self {
        Entry {
            id: id.into(),
            weight,
            min_level: None,
            max_level: None,
        }
    }

    fn from_config(config: EntryConfig) -> Self {
        Entry {
            id: config.id,
            weight: config.weight,
            min_level: config.min_level,
            max_level: config.max_level,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn weight(&self) -> u32 {
        self.weight
    }

    pub fn level_valid(&self, level: u32) -> bool {
        if let Some(min) = self.min_level {
            if level < min {
                return false;
            }
        }
        if let Some(max) = self.max_level {
            if level > max {
                return false;
            }
        }
        true
    }
}

/// A table whose ids have been resolved into typed values
///
/// Built once from a [`Table`] so that callers never deal with unknown ids at roll time.
#[derive(Debug, Clone)]
pub struct Weighted<T> {
    id: String,
    entries: Vec<(T, Entry)>,
}

impl<T> Weighted<T> {
    /// Resolve every entry id of `table` through `parse`
    pub fn from_table<F>(table: &Table, mut parse: F) -> Result<Self, RollError>
    where
        F: FnMut(&str) -> Option<T>,
    {
        let entries = table
            .entries
            .iter()
            .map(|entry| {
                parse(&entry.id)
                    .map(|value| (value, entry.clone()))
                    .ok_or_else(|| RollError::InvalidEntry {
                        table: table.id.clone(),
                        entry: entry.id.clone(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Weighted {
            id: table.id.clone(),
            entries,
        })
    }

    /// Build an ungated table from typed `(value, weight)` pairs
    pub fn from_pairs(id: impl Into<String>, pairs: impl IntoIterator<Item = (T, u32)>) -> Self {
        Weighted {
            id: id.into(),
            entries: pairs
                .into_iter()
                .enumerate()
                .map(|(i, (value, weight))| (value, Entry::new(i.to_string(), weight)))
                .collect(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Sum of the weights valid at `level`
    pub fn total_weight(&self, level: u32) -> u32 {
        self.entries
            .iter()
            .filter(|(_, e)| e.level_valid(level))
            .map(|(_, e)| e.weight)
            .sum()
    }

    /// Values valid at `level`, in table order
    pub fn available(&self, level: u32) -> impl Iterator<Item = &T> {
        self.entries
            .iter()
            .filter(move |(_, e)| e.level_valid(level))
            .map(|(value, _)| value)
    }

    /// Weighted draw among the entries valid at `level`
    pub fn roll<R: Rng + ?Sized>(&self, level: u32, rng: &mut R) -> Option<&T> {
        let valid: Vec<&(T, Entry)> = self
            .entries
            .iter()
            .filter(|(_, e)| e.level_valid(level))
            .collect();
        pick_index(valid.iter().map(|(_, e)| e.weight), rng).map(|i| {
            let pair: &(T, Entry) = valid[i];
            &pair.0
        })
    }
}

/// Weighted random selection over integer weights
fn pick_index<R: Rng + ?Sized>(weights: impl Iterator<Item = u32> + Clone, rng: &mut R) -> Option<usize> {
    let total_weight: u32 = weights.clone().sum();
    if total_weight == 0 {
        return None;
    }

    let mut roll = rng.gen_range(0..total_weight);
    for (i, weight) in weights.enumerate() {
        if roll < weight {
            return Some(i);
        }
        roll -= weight;
    }

    None
}
