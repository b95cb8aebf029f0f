//! Save/load persistence with integrity checks
//!
//! Features:
//! - Versioned JSON envelope
//! - Backup rotation (tmp → save, old save → backup)
//! - Corruption detection and recovery from the backup

pub mod envelope;

pub use envelope::{Envelope, JsonFile};

use std::fmt;

/// Why a load or save failed
#[derive(Debug)]
pub enum PersistenceError {
    Io(std::io::Error),
    /// File exists but is not a valid envelope
    Json(serde_json::Error),
    /// Written by an incompatible build
    UnsupportedVersion { found: u32, expected: u32 },
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::Io(e) => write!(f, "I/O error: {e}"),
            PersistenceError::Json(e) => write!(f, "corrupt save data: {e}"),
            PersistenceError::UnsupportedVersion { found, expected } => {
                write!(f, "unsupported save version {found} (expected {expected})")
            }
        }
    }
}

impl std::error::Error for PersistenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistenceError::Io(e) => Some(e),
            PersistenceError::Json(e) => Some(e),
            PersistenceError::UnsupportedVersion { .. } => None,
        }
    }
}

impl From<std::io::Error> for PersistenceError {
    fn from(e: std::io::Error) -> Self {
        PersistenceError::Io(e)
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(e: serde_json::Error) -> Self {
        PersistenceError::Json(e)
    }
}
