//! Player preferences
//!
//! Persisted separately from the leaderboard as `settings.json` in the data
//! directory.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::persistence::{JsonFile, PersistenceError};

pub const SETTINGS_FILE: &str = "settings.json";
const SETTINGS_VERSION: u32 = 1;

/// Longest name shown on the leaderboard
pub const MAX_NAME_LEN: usize = 15;

/// Name used until the player picks one
pub const DEFAULT_PLAYER_NAME: &str = "Player";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Name submitted with final scores
    pub player_name: String,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_name: DEFAULT_PLAYER_NAME.to_string(),
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    /// Load from `<data_dir>/settings.json`, falling back to defaults
    pub fn load(data_dir: impl AsRef<Path>) -> Self {
        let mut settings: Settings = Self::file(data_dir).load_or_recover();
        settings.sanitize();
        settings
    }

    pub fn save(&self, data_dir: impl AsRef<Path>) -> Result<(), PersistenceError> {
        Self::file(data_dir).write(self)?;
        log::info!("Settings saved");
        Ok(())
    }

    fn file(data_dir: impl AsRef<Path>) -> JsonFile {
        JsonFile::new(data_dir.as_ref().join(SETTINGS_FILE), SETTINGS_VERSION)
    }

    /// Set the leaderboard name (trimmed, capped at 15 characters).
    /// A blank name falls back to the default.
    pub fn set_player_name(&mut self, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            log::warn!("Blank player name, using \"{}\"", DEFAULT_PLAYER_NAME);
            self.player_name = DEFAULT_PLAYER_NAME.to_string();
            return;
        }
        self.player_name = name.chars().take(MAX_NAME_LEN).collect();
    }

    /// Clamp values that may have been hand-edited
    fn sanitize(&mut self) {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        let name = self.player_name.clone();
        self.set_player_name(&name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Settings::load(dir.path()), Settings::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.set_player_name("  Zed  ");
        settings.muted = true;
        settings.save(dir.path()).unwrap();

        let loaded = Settings::load(dir.path());
        assert_eq!(loaded.player_name, "Zed");
        assert!(loaded.muted);
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_name_is_capped() {
        let mut settings = Settings::default();
        settings.set_player_name("abcdefghijklmnopqrstuvwxyz");
        assert_eq!(settings.player_name.len(), MAX_NAME_LEN);
    }

    #[test]
    fn test_out_of_range_volume_clamped_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let json = r#"{"version":1,"saved_at":0,"payload":{"master_volume":4.0,"sfx_volume":-1.0}}"#;
        std::fs::write(dir.path().join(SETTINGS_FILE), json).unwrap();
        let settings = Settings::load(dir.path());
        assert_eq!(settings.master_volume, 1.0);
        assert_eq!(settings.sfx_volume, 0.0);
        assert_eq!(settings.player_name, "Player");
    }

    #[test]
    fn test_blank_name_falls_back_to_default() {
        let mut settings = Settings::default();
        settings.set_player_name("Zed");
        settings.set_player_name("   ");
        assert_eq!(settings.player_name, DEFAULT_PLAYER_NAME);
        settings.set_player_name("");
        assert_eq!(settings.player_name, DEFAULT_PLAYER_NAME);
    }

    #[test]
    fn test_blank_name_on_disk_loads_as_default() {
        let dir = tempfile::tempdir().unwrap();
        let json = r#"{"version":1,"saved_at":0,"payload":{"player_name":"  "}}"#;
        std::fs::write(dir.path().join(SETTINGS_FILE), json).unwrap();
        assert_eq!(Settings::load(dir.path()).player_name, DEFAULT_PLAYER_NAME);
    }
}
