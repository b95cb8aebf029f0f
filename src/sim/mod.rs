//! Simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - One clock sample per tick, passed in by the caller
//! - Seeded RNG only
//! - Stable iteration order (formation order, spawn order)
//! - No rendering, audio or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod formation;
pub mod mode;
pub mod player;
pub mod state;
pub mod tick;

pub use autopilot::autopilot_input;
pub use collision::{Bounded, Rect, ShotResolution, overlapping_pairs};
pub use formation::{Formation, FormationStep, LevelParams, seed_formation};
pub use mode::{GameMode, MenuItem, ModeCommand};
pub use player::Player;
pub use state::{
    Enemy, EnemyTier, GameEvent, GameState, Particle, PowerUp, PowerUpKind, Projectile, Shooter,
    Snapshot, Star,
};
pub use tick::{TickInput, TickOutcome, TickReport, tick};
