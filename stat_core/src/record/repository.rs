//! Repository contracts for saving and loading character records

use super::CharacterRecord;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use thiserror::Error;
use tracing::debug;

/// Errors surfaced by repository implementations
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("repository lock was poisoned")]
    LockPoisoned,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid record id '{0}'")]
    InvalidId(String),
}

pub type Result<T> = std::result::Result<T, RepositoryError>;

/// Storage for character records, keyed by character name
///
/// Injected into whatever layer saves and loads; the combat core never touches one.
pub trait CharacterRepository {
    /// Save a record, replacing any record with the same name
    fn save(&self, record: &CharacterRecord) -> Result<()>;

    fn load(&self, id: &str) -> Result<Option<CharacterRecord>>;

    /// All stored ids, sorted
    fn list(&self) -> Result<Vec<String>>;

    /// Delete a record; returns whether it existed
    fn delete(&self, id: &str) -> Result<bool>;

    fn exists(&self, id: &str) -> Result<bool> {
        Ok(self.load(id)?.is_some())
    }
}

/// In-memory implementation of CharacterRepository
#[derive(Debug, Default)]
pub struct MemoryRepository {
    records: RwLock<BTreeMap<String, CharacterRecord>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CharacterRepository for MemoryRepository {
    fn save(&self, record: &CharacterRecord) -> Result<()> {
        let mut records = self.records.write().map_err(|_| RepositoryError::LockPoisoned)?;
        records.insert(record.name.clone(), record.clone());
        Ok(())
    }

    fn load(&self, id: &str) -> Result<Option<CharacterRecord>> {
        let records = self.records.read().map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(records.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<String>> {
        let records = self.records.read().map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(records.keys().cloned().collect())
    }

    fn delete(&self, id: &str) -> Result<bool> {
        let mut records = self.records.write().map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(records.remove(id).is_some())
    }
}

/// One pretty-printed JSON file per character: `{dir}/{name}.json`
///
/// Writes go to a temp file first and are renamed into place.
#[derive(Debug, Clone)]
pub struct JsonDirRepository {
    base_dir: PathBuf,
}

impl JsonDirRepository {
    /// Open a repository, creating the directory if needed
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn record_path(&self, id: &str) -> Result<PathBuf> {
        let valid = !id.is_empty()
            && !id.starts_with('.')
            && !id.contains(|c: char| matches!(c, '/' | '\\' | '\0'));
        if !valid {
            return Err(RepositoryError::InvalidId(id.to_string()));
        }
        Ok(self.base_dir.join(format!("{}.json", id)))
    }
}

impl CharacterRepository for JsonDirRepository {
    fn save(&self, record: &CharacterRecord) -> Result<()> {
        let path = self.record_path(&record.name)?;
        let temp_path = path.with_extension("json.tmp");

        let json = serde_json::to_vec_pretty(record)?;
        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, &path)?;

        debug!(name = %record.name, path = %path.display(), "Saved character");
        Ok(())
    }

    fn load(&self, id: &str) -> Result<Option<CharacterRecord>> {
        let path = self.record_path(id)?;
        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path)?;
        let record = serde_json::from_slice(&bytes)?;
        debug!(name = id, path = %path.display(), "Loaded character");
        Ok(Some(record))
    }

    fn list(&self) -> Result<Vec<String>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(stem.to_string());
            }
        }
        ids.sort_unstable();
        Ok(ids)
    }

    fn delete(&self, id: &str) -> Result<bool> {
        let path = self.record_path(id)?;
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path)?;
        debug!(name = id, "Deleted character");
        Ok(true)
    }

    fn exists(&self, id: &str) -> Result<bool> {
        Ok(self.record_path(id)?.exists())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::Combatant;
    use crate::types::Archetype;
    use tempfile::TempDir;

    fn record(name: &str) -> CharacterRecord {
        Combatant::player(name, Archetype::Mage)
            .with_starter_kit()
            .to_record()
    }

    fn exercise(repo: &dyn CharacterRepository) {
        assert!(repo.list().unwrap().is_empty());
        assert_eq!(repo.load("Merlin").unwrap(), None);

        repo.save(&record("Merlin")).unwrap();
        repo.save(&record("Alatar")).unwrap();
        assert_eq!(repo.list().unwrap(), vec!["Alatar", "Merlin"]);
        assert!(repo.exists("Merlin").unwrap());

        let mut updated = record("Merlin");
        updated.gold = 999;
        repo.save(&updated).unwrap();
        assert_eq!(repo.load("Merlin").unwrap().unwrap().gold, 999);

        assert!(repo.delete("Merlin").unwrap());
        assert!(!repo.delete("Merlin").unwrap());
        assert_eq!(repo.list().unwrap(), vec!["Alatar"]);
    }

    #[test]
    fn test_memory_repository() {
        exercise(&MemoryRepository::new());
    }

    #[test]
    fn test_json_dir_repository() {
        let dir = TempDir::new().unwrap();
        let repo = JsonDirRepository::new(dir.path().join("saves")).unwrap();
        exercise(&repo);

        // Records survive reopening
        let reopened = JsonDirRepository::new(repo.base_dir()).unwrap();
        let loaded = reopened.load("Alatar").unwrap().unwrap();
        assert_eq!(loaded, record("Alatar"));
        assert!(Combatant::from_record(loaded).is_ok());
    }

    #[test]
    fn test_path_like_ids_rejected() {
        let dir = TempDir::new().unwrap();
        let repo = JsonDirRepository::new(dir.path()).unwrap();
        assert!(matches!(
            repo.load("../escape"),
            Err(RepositoryError::InvalidId(_))
        ));
        assert!(matches!(repo.save(&record("")), Err(RepositoryError::InvalidId(_))));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let repo = JsonDirRepository::new(dir.path()).unwrap();
        fs::write(dir.path().join("Broken.json"), b"{ not json").unwrap();
        assert!(matches!(repo.load("Broken"), Err(RepositoryError::Json(_))));
    }
}
