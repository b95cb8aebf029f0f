//! Space Invaders - a fixed-tick arcade shooter
//!
//! Core modules:
//! - `sim`: Simulation (entities, formation AI, collisions, tick ordering, game modes)
//! - `game`: Session driver wiring the simulation to a clock, input and the leaderboard
//! - `input`: Input events folded into per-tick intent
//! - `platform`: Monotonic clock abstraction
//! - `persistence`: Versioned JSON files with backup recovery
//! - `highscores`: Top-10 leaderboard behind the `ScoreStore` trait
//! - `settings`: Player name and volume preferences
//! - `tuning`: Data-driven game balance
//! - `audio`: Sound cue dispatch

pub mod audio;
pub mod game;
pub mod highscores;
pub mod input;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use game::Game;
pub use highscores::{HighScores, ScoreStore};
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation period in milliseconds (~60 Hz)
    pub const TICK_MS: u64 = 16;

    /// Playfield dimensions
    pub const PLAYFIELD_WIDTH: f32 = 800.0;
    pub const PLAYFIELD_HEIGHT: f32 = 600.0;

    /// Player ship
    pub const PLAYER_WIDTH: f32 = 50.0;
    pub const PLAYER_HEIGHT: f32 = 50.0;
    pub const PLAYER_START_X: f32 = PLAYFIELD_WIDTH / 2.0 - 30.0;
    pub const PLAYER_START_Y: f32 = PLAYFIELD_HEIGHT - 80.0;

    /// Enemy sprite size
    pub const ENEMY_WIDTH: f32 = 35.0;
    pub const ENEMY_HEIGHT: f32 = 35.0;

    /// Formation grid
    pub const FORMATION_ROWS: usize = 5;
    pub const FORMATION_COLS: usize = 10;
    pub const FORMATION_ORIGIN_X: f32 = 50.0;
    pub const FORMATION_ORIGIN_Y: f32 = 50.0;
    pub const FORMATION_COL_PITCH: f32 = 60.0;
    pub const FORMATION_ROW_PITCH: f32 = 40.0;

    /// Laser bolt size (both shooters)
    pub const LASER_WIDTH: f32 = 4.0;
    pub const LASER_HEIGHT: f32 = 15.0;

    /// Falling power-up capsule size
    pub const POWERUP_SIZE: f32 = 30.0;

    /// Background stars fall this far per tick
    pub const STAR_FALL_SPEED: f32 = 0.5;

    /// Particle alpha reaches 1.0 at this remaining lifetime
    pub const PARTICLE_FADE_TICKS: f32 = 60.0;
}
