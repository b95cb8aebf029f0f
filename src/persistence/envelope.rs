//! Versioned JSON files

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::PersistenceError;

/// On-disk wrapper around a payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub version: u32,
    /// Unix seconds at save time
    pub saved_at: u64,
    pub payload: T,
}

/// A JSON document with a backup sibling
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
    version: u32,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>, version: u32) -> Self {
        Self {
            path: path.into(),
            version,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backup_path(&self) -> PathBuf {
        self.path.with_extension("bak")
    }

    fn tmp_path(&self) -> PathBuf {
        self.path.with_extension("tmp")
    }

    /// Read the primary file. `Ok(None)` when it does not exist.
    pub fn read<T: DeserializeOwned>(&self) -> Result<Option<T>, PersistenceError> {
        self.read_from(&self.path)
    }

    fn read_from<T: DeserializeOwned>(&self, path: &Path) -> Result<Option<T>, PersistenceError> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let envelope: Envelope<T> = serde_json::from_slice(&bytes)?;
        if envelope.version != self.version {
            return Err(PersistenceError::UnsupportedVersion {
                found: envelope.version,
                expected: self.version,
            });
        }
        Ok(Some(envelope.payload))
    }

    /// Write via a temp file, keeping the previous save as the backup
    pub fn write<T: Serialize>(&self, payload: &T) -> Result<(), PersistenceError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }

        let saved_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let envelope = Envelope {
            version: self.version,
            saved_at,
            payload,
        };
        let json = serde_json::to_vec_pretty(&envelope)?;

        let tmp = self.tmp_path();
        fs::write(&tmp, json)?;
        if self.path.exists() {
            fs::rename(&self.path, self.backup_path())?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Load the primary file, falling back to the backup, then to `T::default()`.
    /// Failures are logged, never returned.
    pub fn load_or_recover<T: DeserializeOwned + Default>(&self) -> T {
        match self.read() {
            Ok(Some(value)) => return value,
            Ok(None) => {
                log::info!("No save at {}, starting fresh", self.path.display());
                return T::default();
            }
            Err(e) => log::warn!("Failed to load {}: {}", self.path.display(), e),
        }

        let backup = self.backup_path();
        match self.read_from(&backup) {
            Ok(Some(value)) => {
                log::warn!("Recovered from backup {}", backup.display());
                value
            }
            Ok(None) => T::default(),
            Err(e) => {
                log::warn!("Backup {} unusable: {}", backup.display(), e);
                T::default()
            }
        }
    }
}
