//! Enemy formation controller
//!
//! The whole grid moves in lockstep on one shared direction. After a
//! horizontal step, if any enemy touches or crosses a side edge, the formation
//! reverses and drops in that same step. Firing runs on its own cadence.

use glam::Vec2;
use rand::Rng;
use serde::Serialize;

use super::state::{Enemy, EnemyTier, Projectile, Shooter};
use crate::consts::*;

/// Fastest allowed formation move cadence (ms)
pub const MIN_MOVE_INTERVAL_MS: u64 = 100;
/// Fastest allowed formation fire cadence (ms)
pub const MIN_FIRE_INTERVAL_MS: u64 = 200;

/// Difficulty parameters derived from the level index
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LevelParams {
    /// Horizontal step per move
    pub speed: f32,
    pub move_interval_ms: u64,
    pub fire_interval_ms: u64,
}

impl LevelParams {
    /// `speed = 2 + level/4`, cadences shrink linearly to their floors
    pub fn for_level(level: u32) -> Self {
        let level = level.max(1);
        let steps = u64::from(level - 1);
        Self {
            speed: (2 + level / 4) as f32,
            move_interval_ms: 500u64.saturating_sub(steps * 20).max(MIN_MOVE_INTERVAL_MS),
            fire_interval_ms: 1500u64.saturating_sub(steps * 50).max(MIN_FIRE_INTERVAL_MS),
        }
    }
}

/// Build a full grid for the given parameters (row-major, top row first)
pub fn seed_formation(params: &LevelParams) -> Vec<Enemy> {
    let mut enemies = Vec::with_capacity(FORMATION_ROWS * FORMATION_COLS);
    for row in 0..FORMATION_ROWS {
        let tier = EnemyTier::for_row(row);
        for col in 0..FORMATION_COLS {
            let pos = Vec2::new(
                FORMATION_ORIGIN_X + col as f32 * FORMATION_COL_PITCH,
                FORMATION_ORIGIN_Y + row as f32 * FORMATION_ROW_PITCH,
            );
            enemies.push(Enemy::new(pos, tier, params.speed));
        }
    }
    enemies
}

/// What the formation did this tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FormationStep {
    pub moved: bool,
    pub reversed: bool,
    /// Index of the enemy that fired, if any
    pub fired: Option<usize>,
}

/// Shared formation movement/fire state
#[derive(Debug, Clone, Serialize)]
pub struct Formation {
    pub params: LevelParams,
    /// +1.0 (right) or -1.0 (left)
    pub direction: f32,
    pub last_move_ms: u64,
    pub last_fire_ms: u64,
}

impl Formation {
    pub fn for_level(level: u32, now_ms: u64) -> Self {
        Self {
            params: LevelParams::for_level(level),
            direction: 1.0,
            last_move_ms: now_ms,
            last_fire_ms: now_ms,
        }
    }

    /// Horizontal step with edge reversal. Returns true if the formation reversed.
    pub fn march(&mut self, enemies: &mut [Enemy], drop_distance: f32) -> bool {
        let mut hit_edge = false;
        for enemy in enemies.iter_mut() {
            enemy.advance(self.direction);
            if enemy.pos.x <= 0.0 || enemy.pos.x + ENEMY_WIDTH >= PLAYFIELD_WIDTH {
                hit_edge = true;
            }
        }

        if hit_edge {
            self.direction = -self.direction;
            for enemy in enemies.iter_mut() {
                enemy.drop_down(drop_distance);
            }
        }
        hit_edge
    }

    /// Run both cadences for this tick. Enemy shots are appended to `shots`.
    pub fn update(
        &mut self,
        enemies: &mut [Enemy],
        now_ms: u64,
        drop_distance: f32,
        laser_speed: f32,
        rng: &mut impl Rng,
        shots: &mut Vec<Projectile>,
    ) -> FormationStep {
        let mut step = FormationStep::default();

        if now_ms.saturating_sub(self.last_move_ms) > self.params.move_interval_ms {
            step.moved = true;
            step.reversed = self.march(enemies, drop_distance);
            self.last_move_ms = now_ms;
        }

        if now_ms.saturating_sub(self.last_fire_ms) > self.params.fire_interval_ms
            && !enemies.is_empty()
        {
            // Uniform with replacement: the same enemy may fire twice running
            let idx = rng.random_range(0..enemies.len());
            shots.push(Projectile::new(enemies[idx].muzzle(), Shooter::Enemy, laser_speed));
            step.fired = Some(idx);
            self.last_fire_ms = now_ms;
        }

        step
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_level_params_curve() {
        let l1 = LevelParams::for_level(1);
        assert_eq!(l1.speed, 2.0);
        assert_eq!(l1.move_interval_ms, 500);
        assert_eq!(l1.fire_interval_ms, 1500);

        let l4 = LevelParams::for_level(4);
        assert_eq!(l4.speed, 3.0);
        assert_eq!(l4.move_interval_ms, 440);
        assert_eq!(l4.fire_interval_ms, 1350);

        let l30 = LevelParams::for_level(30);
        assert_eq!(l30.move_interval_ms, MIN_MOVE_INTERVAL_MS);
        assert_eq!(l30.fire_interval_ms, MIN_FIRE_INTERVAL_MS);
        assert_eq!(l30.speed, 9.0);
    }

    #[test]
    fn test_seed_layout() {
        let enemies = seed_formation(&LevelParams::for_level(1));
        assert_eq!(enemies.len(), 50);
        assert_eq!(enemies[0].pos, Vec2::new(50.0, 50.0));
        assert_eq!(enemies[0].tier, EnemyTier::Elite);
        assert_eq!(enemies[49].pos, Vec2::new(50.0 + 9.0 * 60.0, 50.0 + 4.0 * 40.0));
        assert_eq!(enemies[49].tier, EnemyTier::Grunt);
        assert_eq!(enemies[25].tier, EnemyTier::Soldier);
    }

    #[test]
    fn test_move_waits_for_cadence() {
        let mut formation = Formation::for_level(1, 0);
        let mut enemies = seed_formation(&formation.params);
        let mut shots = Vec::new();
        let mut rng = Pcg32::seed_from_u64(1);

        let step = formation.update(&mut enemies, 500, 15.0, 5.0, &mut rng, &mut shots);
        assert!(!step.moved);
        assert_eq!(enemies[0].pos.x, 50.0);

        let step = formation.update(&mut enemies, 501, 15.0, 5.0, &mut rng, &mut shots);
        assert!(step.moved);
        assert_eq!(enemies[0].pos.x, 52.0);
        assert_eq!(formation.last_move_ms, 501);
    }

    #[test]
    fn test_reversal_drops_everyone() {
        let mut formation = Formation::for_level(1, 0);
        let mut enemies = vec![
            Enemy::new(Vec2::new(PLAYFIELD_WIDTH - ENEMY_WIDTH - 1.0, 100.0), EnemyTier::Grunt, 2.0),
            Enemy::new(Vec2::new(300.0, 60.0), EnemyTier::Elite, 2.0),
        ];
        let reversed = formation.march(&mut enemies, 15.0);
        assert!(reversed);
        assert_eq!(formation.direction, -1.0);
        // Overshoot is kept until the next march
        assert_eq!(enemies[0].pos.x, PLAYFIELD_WIDTH - ENEMY_WIDTH + 1.0);
        assert_eq!(enemies[0].pos.y, 115.0);
        assert_eq!(enemies[1].pos.y, 75.0);

        let reversed = formation.march(&mut enemies, 15.0);
        assert!(!reversed);
        assert_eq!(enemies[0].pos.x, PLAYFIELD_WIDTH - ENEMY_WIDTH - 1.0);
        assert_eq!(enemies[1].pos.y, 75.0);
    }

    #[test]
    fn test_every_level_starts_heading_right() {
        let mut formation = Formation::for_level(1, 0);
        let edge = Vec2::new(PLAYFIELD_WIDTH - ENEMY_WIDTH - 1.0, 100.0);
        let mut enemies = vec![Enemy::new(edge, EnemyTier::Grunt, 2.0)];
        assert!(formation.march(&mut enemies, 15.0));
        assert_eq!(formation.direction, -1.0);

        for level in 2..=5 {
            let next = Formation::for_level(level, 1_000);
            assert_eq!(next.direction, 1.0);
            assert_eq!(next.last_move_ms, 1_000);
        }
    }

    #[test]
    fn test_left_edge_reversal() {
        let mut formation = Formation::for_level(1, 0);
        formation.direction = -1.0;
        let mut enemies = vec![Enemy::new(Vec2::new(2.0, 100.0), EnemyTier::Grunt, 2.0)];
        assert!(formation.march(&mut enemies, 15.0));
        assert_eq!(formation.direction, 1.0);
        assert_eq!(enemies[0].pos, Vec2::new(0.0, 115.0));
    }

    #[test]
    fn test_fire_from_lower_center() {
        let mut formation = Formation::for_level(1, 0);
        let mut enemies = vec![Enemy::new(Vec2::new(100.0, 100.0), EnemyTier::Grunt, 2.0)];
        let mut shots = Vec::new();
        let mut rng = Pcg32::seed_from_u64(9);

        let step = formation.update(&mut enemies, 1_501, 15.0, 5.0, &mut rng, &mut shots);
        assert_eq!(step.fired, Some(0));
        assert_eq!(shots.len(), 1);
        assert_eq!(shots[0].shooter, Shooter::Enemy);
        // Moved first (cadence 500 also elapsed), then fired from the new spot
        assert_eq!(shots[0].pos, Vec2::new(102.0 + ENEMY_WIDTH / 2.0 - 2.0, 100.0 + ENEMY_HEIGHT));
    }

    #[test]
    fn test_empty_formation_never_fires() {
        let mut formation = Formation::for_level(1, 0);
        let mut shots = Vec::new();
        let mut rng = Pcg32::seed_from_u64(9);
        let step = formation.update(&mut [], 10_000, 15.0, 5.0, &mut rng, &mut shots);
        assert!(step.fired.is_none());
        assert!(shots.is_empty());
        assert_eq!(formation.last_fire_ms, 0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn reversal_inverts_and_drops(
                offset in 0.0f32..30.0,
                others in proptest::collection::vec((60.0f32..600.0, 40.0f32..300.0), 0..20),
            ) {
                let mut formation = Formation::for_level(1, 0);
                // Rightmost enemy will reach the right edge after one step of 2px
                let mut enemies = vec![Enemy::new(
                    Vec2::new(PLAYFIELD_WIDTH - ENEMY_WIDTH - 2.0 + offset, 100.0),
                    EnemyTier::Grunt,
                    2.0,
                )];
                for (x, y) in others {
                    enemies.push(Enemy::new(Vec2::new(x, y), EnemyTier::Soldier, 2.0));
                }
                let before: Vec<f32> = enemies.iter().map(|e| e.pos.y).collect();

                prop_assert!(formation.march(&mut enemies, 15.0));
                prop_assert_eq!(formation.direction, -1.0);
                for (enemy, y) in enemies.iter().zip(before) {
                    prop_assert_eq!(enemy.pos.y, y + 15.0);
                }
            }
        }
    }
}
