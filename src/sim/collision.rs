//! Axis-aligned collision detection
//!
//! Entity counts are in the tens, so every query is a brute-force pairwise
//! scan. Resolution never removes while scanning: each pass returns the
//! indices to drop and the orchestrator compacts afterwards.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Enemy, PowerUp, Projectile};

/// An axis-aligned bounding rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Rectangles overlap unless one lies entirely to one side of the other.
    /// Shared edges do not count as overlap.
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Anything with a collision box
pub trait Bounded {
    fn bounds(&self) -> Rect;
}

/// Every `(i, j)` where `a[i]` overlaps `b[j]`, in `a`-major iteration order
pub fn overlapping_pairs<A: Bounded, B: Bounded>(a: &[A], b: &[B]) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for (i, lhs) in a.iter().enumerate() {
        let lhs = lhs.bounds();
        for (j, rhs) in b.iter().enumerate() {
            if lhs.intersects(&rhs.bounds()) {
                pairs.push((i, j));
            }
        }
    }
    pairs
}

/// Outcome of player shots against the formation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShotResolution {
    /// Shots that hit something (to be removed)
    pub spent_shots: Vec<usize>,
    /// Enemies whose hit points reached zero, in hit order
    pub destroyed: Vec<usize>,
    /// Enemies that absorbed a hit and survived
    pub damaged: Vec<usize>,
}

/// Resolve player shots against enemies.
///
/// Each shot hits at most the first live enemy it overlaps (iteration order),
/// applies `take_hit`, and is spent. An enemy destroyed earlier in the pass is
/// no longer a target for later shots; a damaged survivor still is.
pub fn resolve_player_shots(shots: &[Projectile], enemies: &mut [Enemy]) -> ShotResolution {
    let mut resolution = ShotResolution::default();

    for (shot_idx, shot) in shots.iter().enumerate() {
        let shot_rect = shot.bounds();
        let target = enemies
            .iter()
            .enumerate()
            .find(|(_, e)| !e.is_destroyed() && shot_rect.intersects(&e.bounds()))
            .map(|(i, _)| i);

        let Some(enemy_idx) = target else { continue };

        resolution.spent_shots.push(shot_idx);
        let enemy = &mut enemies[enemy_idx];
        enemy.take_hit();
        if enemy.is_destroyed() {
            resolution.destroyed.push(enemy_idx);
        } else {
            resolution.damaged.push(enemy_idx);
        }
    }

    resolution
}

/// Enemy shots striking the player. A shielded player takes no hits and the
/// shots pass through untouched.
pub fn resolve_enemy_shots(shots: &[Projectile], player: &Rect, shielded: bool) -> Vec<usize> {
    if shielded {
        return Vec::new();
    }
    shots
        .iter()
        .enumerate()
        .filter(|(_, s)| s.bounds().intersects(player))
        .map(|(i, _)| i)
        .collect()
}

/// Power-ups touching the player (all of them are collected)
pub fn resolve_pickups(powerups: &[PowerUp], player: &Rect) -> Vec<usize> {
    powerups
        .iter()
        .enumerate()
        .filter(|(_, p)| p.bounds().intersects(player))
        .map(|(i, _)| i)
        .collect()
}

/// Remove the given indices from `items`, preserving the order of the rest
pub fn remove_indices<T>(items: &mut Vec<T>, indices: &[usize]) {
    if indices.is_empty() {
        return;
    }
    let mut idx = 0;
    items.retain(|_| {
        let keep = !indices.contains(&idx);
        idx += 1;
        keep
    });
}
