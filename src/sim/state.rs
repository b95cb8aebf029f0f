//! Game state and core simulation types
//!
//! The session record exclusively owns every live entity collection. Entities
//! never reference each other; the tick orchestrator mediates all interaction.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use super::collision::{Bounded, Rect};
use super::formation::{Formation, seed_formation};
use super::player::Player;
use crate::consts::*;
use crate::tuning::Tuning;

/// Enemy tier, fixed by formation row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EnemyTier {
    /// Bottom row
    Grunt,
    /// Middle rows
    Soldier,
    /// Top rows
    Elite,
}

impl EnemyTier {
    /// Tier for a formation row (row 0 is the top)
    pub fn for_row(row: usize) -> Self {
        match row {
            0 | 1 => EnemyTier::Elite,
            2 | 3 => EnemyTier::Soldier,
            _ => EnemyTier::Grunt,
        }
    }

    pub fn hit_points(&self) -> u8 {
        match self {
            EnemyTier::Grunt => 1,
            EnemyTier::Soldier => 2,
            EnemyTier::Elite => 3,
        }
    }

    pub fn score_value(&self) -> u64 {
        match self {
            EnemyTier::Grunt => 10,
            EnemyTier::Soldier => 20,
            EnemyTier::Elite => 50,
        }
    }
}

/// A formation member
#[derive(Debug, Clone, Serialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub tier: EnemyTier,
    pub hp: u8,
    /// Horizontal step per formation move
    pub speed: f32,
}

impl Enemy {
    pub fn new(pos: Vec2, tier: EnemyTier, speed: f32) -> Self {
        Self {
            pos,
            tier,
            hp: tier.hit_points(),
            speed,
        }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(ENEMY_WIDTH, ENEMY_HEIGHT)
    }

    /// Absorb one hit. Already-destroyed enemies stay at zero.
    pub fn take_hit(&mut self) {
        self.hp = self.hp.saturating_sub(1);
    }

    pub fn is_destroyed(&self) -> bool {
        self.hp == 0
    }

    pub fn score_value(&self) -> u64 {
        self.tier.score_value()
    }

    /// One horizontal formation step in `direction` (+1 right, -1 left)
    pub fn advance(&mut self, direction: f32) {
        self.pos.x += self.speed * direction;
    }

    pub fn drop_down(&mut self, distance: f32) {
        self.pos.y += distance;
    }

    /// Muzzle position for a downward shot (lower-center)
    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(
            self.pos.x + ENEMY_WIDTH / 2.0 - LASER_WIDTH / 2.0,
            self.pos.y + ENEMY_HEIGHT,
        )
    }
}

impl Bounded for Enemy {
    fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size())
    }
}

/// Who fired a projectile (decides travel direction)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Shooter {
    /// Travels up
    Player,
    /// Travels down
    Enemy,
}

/// A laser bolt
#[derive(Debug, Clone, Serialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub shooter: Shooter,
    pub speed: f32,
}

impl Projectile {
    pub fn new(pos: Vec2, shooter: Shooter, speed: f32) -> Self {
        Self { pos, shooter, speed }
    }

    pub fn update(&mut self) {
        match self.shooter {
            Shooter::Player => self.pos.y -= self.speed,
            Shooter::Enemy => self.pos.y += self.speed,
        }
    }

    /// Left the playfield through the edge it travels toward
    pub fn has_exited(&self) -> bool {
        match self.shooter {
            Shooter::Player => self.pos.y < 0.0,
            Shooter::Enemy => self.pos.y > PLAYFIELD_HEIGHT,
        }
    }
}

impl Bounded for Projectile {
    fn bounds(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, LASER_WIDTH, LASER_HEIGHT)
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PowerUpKind {
    /// Immunity to enemy fire
    Shield,
    /// Shorter fire cadence
    RapidFire,
}

impl PowerUpKind {
    /// Uniform pick between the two kinds
    pub fn random(rng: &mut impl Rng) -> Self {
        if rng.random_bool(0.5) {
            PowerUpKind::Shield
        } else {
            PowerUpKind::RapidFire
        }
    }
}

/// A falling power-up capsule
#[derive(Debug, Clone, Serialize)]
pub struct PowerUp {
    pub pos: Vec2,
    pub kind: PowerUpKind,
    pub speed: f32,
}

impl PowerUp {
    pub fn new(pos: Vec2, kind: PowerUpKind, speed: f32) -> Self {
        Self { pos, kind, speed }
    }

    pub fn update(&mut self) {
        self.pos.y += self.speed;
    }

    pub fn has_exited(&self) -> bool {
        self.pos.y > PLAYFIELD_HEIGHT
    }
}

impl Bounded for PowerUp {
    fn bounds(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, POWERUP_SIZE, POWERUP_SIZE)
    }
}

/// Downward drift added to particle velocity each tick
pub const PARTICLE_GRAVITY: f32 = 0.05;

/// An explosion fragment. Cosmetic only, never collides.
#[derive(Debug, Clone, Serialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Ticks left to live
    pub lifetime: u32,
    pub size: f32,
    /// RGB in 0..=1
    pub color: [f32; 3],
}

impl Particle {
    /// Random fragment flying out of `origin`
    pub fn burst_fragment(origin: Vec2, rng: &mut impl Rng) -> Self {
        Self {
            pos: origin,
            vel: Vec2::new(rng.random_range(-2.0..2.0), rng.random_range(-2.0..2.0)),
            lifetime: rng.random_range(20..60),
            size: rng.random_range(2u32..7) as f32,
            color: [1.0, rng.random_range(0.5..1.0), 0.0],
        }
    }

    pub fn update(&mut self) {
        self.pos += self.vel;
        self.vel.y += PARTICLE_GRAVITY;
        self.lifetime = self.lifetime.saturating_sub(1);
    }

    pub fn is_dead(&self) -> bool {
        self.lifetime == 0
    }

    /// Fade factor for rendering
    pub fn alpha(&self) -> f32 {
        (self.lifetime as f32 / PARTICLE_FADE_TICKS).clamp(0.0, 1.0)
    }
}

/// Background star (decoration)
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Star {
    pub pos: Vec2,
}

impl Star {
    pub fn random(rng: &mut impl Rng) -> Self {
        Self {
            pos: Vec2::new(
                rng.random_range(0.0..PLAYFIELD_WIDTH),
                rng.random_range(0.0..PLAYFIELD_HEIGHT),
            ),
        }
    }

    /// Fall, wrapping back to the top at a new column
    pub fn update(&mut self, rng: &mut impl Rng) {
        self.pos.y += STAR_FALL_SPEED;
        if self.pos.y > PLAYFIELD_HEIGHT {
            self.pos.y = 0.0;
            self.pos.x = rng.random_range(0.0..PLAYFIELD_WIDTH);
        }
    }
}

/// Discrete cues for the audio layer and any other observer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameEvent {
    /// Player fired
    Shoot,
    /// An enemy fired
    AlienShoot,
    /// Enemy destroyed
    Explosion,
    /// Enemy hit but survived
    Hit,
    /// Player lost a life
    PlayerHit,
    PowerUpCollected(PowerUpKind),
    /// Formation cleared; carries the level just completed
    LevelComplete(u32),
    /// Out of lives; carries the final score
    GameOver(u64),
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub rng: Pcg32,
    pub score: u64,
    pub lives: u8,
    /// Current level (1-based)
    pub level: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Player,
    pub formation: Formation,
    /// Live enemies in formation order (row-major)
    pub enemies: Vec<Enemy>,
    pub player_shots: Vec<Projectile>,
    pub enemy_shots: Vec<Projectile>,
    pub powerups: Vec<PowerUp>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    /// Background decoration
    pub stars: Vec<Star>,
    /// Cues raised since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Fresh game at level 1. `now_ms` seeds the formation cadence timers.
    pub fn new(seed: u64, tuning: Tuning, now_ms: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let stars = (0..tuning.star_count).map(|_| Star::random(&mut rng)).collect();
        let lives = tuning.initial_lives;

        let mut state = Self {
            seed,
            tuning,
            rng,
            score: 0,
            lives,
            level: 1,
            time_ticks: 0,
            player: Player::new(Vec2::new(PLAYER_START_X, PLAYER_START_Y)),
            formation: Formation::for_level(1, now_ms),
            enemies: Vec::new(),
            player_shots: Vec::new(),
            enemy_shots: Vec::new(),
            powerups: Vec::new(),
            particles: Vec::new(),
            stars,
            events: Vec::new(),
        };
        state.start_level(now_ms);
        state
    }

    /// Reseed the formation for the current level and clear per-level entities.
    /// Score, lives, particles and the player's position carry over.
    pub fn start_level(&mut self, now_ms: u64) {
        self.player_shots.clear();
        self.enemy_shots.clear();
        self.powerups.clear();
        self.player.reset_power_ups();

        self.formation = Formation::for_level(self.level, now_ms);
        self.enemies = seed_formation(&self.formation.params);
        log::info!(
            "Level {} start: {} enemies, speed {}, move every {}ms, fire every {}ms",
            self.level,
            self.enemies.len(),
            self.formation.params.speed,
            self.formation.params.move_interval_ms,
            self.formation.params.fire_interval_ms
        );
    }

    /// Advance to the next level
    pub fn next_level(&mut self, now_ms: u64) {
        self.level += 1;
        self.start_level(now_ms);
    }

    /// Spawn an explosion burst centered on `origin`
    pub fn spawn_explosion(&mut self, origin: Vec2) {
        for _ in 0..self.tuning.explosion_particles {
            let particle = Particle::burst_fragment(origin, &mut self.rng);
            self.particles.push(particle);
        }
    }

    /// Take all pending cues
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Read-only view for the presentation layer
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            player: &self.player,
            enemies: &self.enemies,
            player_shots: &self.player_shots,
            enemy_shots: &self.enemy_shots,
            powerups: &self.powerups,
            particles: &self.particles,
            stars: &self.stars,
            score: self.score,
            lives: self.lives,
            level: self.level,
        }
    }
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Snapshot<'a> {
    pub player: &'a Player,
    pub enemies: &'a [Enemy],
    pub player_shots: &'a [Projectile],
    pub enemy_shots: &'a [Projectile],
    pub powerups: &'a [PowerUp],
    pub particles: &'a [Particle],
    pub stars: &'a [Star],
    pub score: u64,
    pub lives: u8,
    pub level: u32,
}
