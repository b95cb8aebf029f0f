//! Data-driven game balance
//!
//! Everything here can be overridden from a TOML file without rebuilding.

use serde::{Deserialize, Serialize};

/// Environment variable naming a tuning file
pub const TUNING_ENV: &str = "SPACE_INVADERS_TUNING";
/// Fallback tuning file location (relative to the working directory)
pub const TUNING_PATH: &str = "config/tuning.toml";

/// Balance knobs read by the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Horizontal player movement per tick (pixels)
    pub player_speed: f32,
    /// Minimum time between player shots (ms)
    pub fire_rate_ms: u64,
    /// Minimum time between player shots while RapidFire is active (ms)
    pub rapid_fire_rate_ms: u64,
    /// Player laser travel per tick (pixels, upward)
    pub player_laser_speed: f32,
    /// Enemy laser travel per tick (pixels, downward)
    pub enemy_laser_speed: f32,
    /// Formation step-down distance on reversal (pixels)
    pub enemy_drop_distance: f32,
    /// Shield / RapidFire lifetime after pickup (ms)
    pub powerup_duration_ms: u64,
    /// Percent chance (0-100) a destroyed enemy drops a power-up
    pub powerup_drop_chance: u32,
    /// Power-up fall speed per tick (pixels)
    pub powerup_speed: f32,
    /// Particles spawned per enemy explosion
    pub explosion_particles: usize,
    /// Lives at the start of a game
    pub initial_lives: u8,
    /// Background decoration density
    pub star_count: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_speed: 6.0,
            fire_rate_ms: 500,
            rapid_fire_rate_ms: 150,
            player_laser_speed: 10.0,
            enemy_laser_speed: 5.0,
            enemy_drop_distance: 15.0,
            powerup_duration_ms: 10_000,
            powerup_drop_chance: 15,
            powerup_speed: 2.0,
            explosion_particles: 30,
            initial_lives: 3,
            star_count: 200,
        }
    }
}

impl Tuning {
    /// Load tuning from `$SPACE_INVADERS_TUNING` or `config/tuning.toml`, falling back to defaults.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var(TUNING_ENV) {
            if let Some(tuning) = Self::from_file(&path) {
                return tuning;
            }
        }
        Self::from_file(TUNING_PATH).unwrap_or_default()
    }

    /// Read a single TOML file. Missing files are silent, malformed ones are logged.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Option<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).ok()?;
        match Self::from_toml(&contents) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                Some(tuning)
            }
            Err(e) => {
                log::warn!("Ignoring malformed tuning file {}: {}", path.display(), e);
                None
            }
        }
    }

    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Active fire cadence for the given RapidFire state
    pub fn fire_cadence_ms(&self, rapid_fire: bool) -> u64 {
        if rapid_fire {
            self.rapid_fire_rate_ms
        } else {
            self.fire_rate_ms
        }
    }
}
