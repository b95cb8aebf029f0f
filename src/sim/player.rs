//! The player's ship
//!
//! Movement is clamped to the playfield every update. Firing is gated on the
//! active cadence, and power-ups are tracked as expiry timestamps compared
//! against the tick's single clock sample.

use glam::Vec2;
use serde::Serialize;

use super::collision::{Bounded, Rect};
use super::state::{PowerUpKind, Projectile, Shooter};
use crate::consts::*;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Serialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub moving_left: bool,
    pub moving_right: bool,
    /// Time of the last accepted shot (None before the first)
    pub last_fire_ms: Option<u64>,
    /// RapidFire expiry (None when inactive)
    pub rapid_fire_until: Option<u64>,
    /// Shield expiry (None when inactive)
    pub shield_until: Option<u64>,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            moving_left: false,
            moving_right: false,
            last_fire_ms: None,
            rapid_fire_until: None,
            shield_until: None,
        }
    }

    /// Largest legal x
    pub fn max_x(&self) -> f32 {
        PLAYFIELD_WIDTH - self.size.x
    }

    /// Apply movement intent, clamp, and expire finished power-ups
    pub fn update(&mut self, now_ms: u64, speed: f32) {
        if self.moving_left {
            self.pos.x -= speed;
        }
        if self.moving_right {
            self.pos.x += speed;
        }
        self.pos.x = self.pos.x.clamp(0.0, self.max_x());

        if self.rapid_fire_until.is_some_and(|until| now_ms > until) {
            log::debug!("RapidFire expired at {}ms", now_ms);
            self.rapid_fire_until = None;
        }
        if self.shield_until.is_some_and(|until| now_ms > until) {
            log::debug!("Shield expired at {}ms", now_ms);
            self.shield_until = None;
        }
    }

    pub fn rapid_fire_active(&self) -> bool {
        self.rapid_fire_until.is_some()
    }

    pub fn shield_active(&self) -> bool {
        self.shield_until.is_some()
    }

    /// Fire if the cadence allows. The elapsed time must strictly exceed it.
    pub fn fire(&mut self, now_ms: u64, tuning: &Tuning) -> Option<Projectile> {
        let cadence = tuning.fire_cadence_ms(self.rapid_fire_active());
        let ready = match self.last_fire_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) > cadence,
        };
        if !ready {
            return None;
        }

        self.last_fire_ms = Some(now_ms);
        let muzzle = Vec2::new(self.pos.x + self.size.x / 2.0 - LASER_WIDTH / 2.0, self.pos.y);
        Some(Projectile::new(muzzle, Shooter::Player, tuning.player_laser_speed))
    }

    /// (Re)start an effect for a full duration from now. Re-activation refreshes, never stacks.
    pub fn activate(&mut self, kind: PowerUpKind, now_ms: u64, duration_ms: u64) {
        let until = Some(now_ms + duration_ms);
        match kind {
            PowerUpKind::Shield => self.shield_until = until,
            PowerUpKind::RapidFire => self.rapid_fire_until = until,
        }
    }

    pub fn reset_power_ups(&mut self) {
        self.rapid_fire_until = None;
        self.shield_until = None;
    }

    /// Remaining shield strength 0..=1 for the shield bubble fade
    pub fn shield_fraction(&self, now_ms: u64, duration_ms: u64) -> f32 {
        match self.shield_until {
            Some(until) if duration_ms > 0 => {
                (until.saturating_sub(now_ms) as f32 / duration_ms as f32).clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }
}

impl Bounded for Player {
    fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player::new(Vec2::new(PLAYER_START_X, PLAYER_START_Y))
    }

    #[test]
    fn test_clamps_at_edges() {
        let mut p = player();
        p.moving_left = true;
        for _ in 0..500 {
            p.update(0, 6.0);
        }
        assert_eq!(p.pos.x, 0.0);

        p.moving_left = false;
        p.moving_right = true;
        for _ in 0..500 {
            p.update(0, 6.0);
        }
        assert_eq!(p.pos.x, PLAYFIELD_WIDTH - PLAYER_WIDTH);
    }

    #[test]
    fn test_opposing_intents_cancel() {
        let mut p = player();
        let x = p.pos.x;
        p.moving_left = true;
        p.moving_right = true;
        p.update(0, 6.0);
        assert_eq!(p.pos.x, x);
    }

    #[test]
    fn test_fire_gating() {
        let tuning = Tuning::default();
        let mut p = player();
        assert!(p.fire(1_000, &tuning).is_some());
        // Exactly at the cadence is not enough
        assert!(p.fire(1_500, &tuning).is_none());
        assert!(p.fire(1_501, &tuning).is_some());
        assert_eq!(p.last_fire_ms, Some(1_501));
    }

    #[test]
    fn test_shot_spawns_at_ship_nose() {
        let tuning = Tuning::default();
        let mut p = player();
        let shot = p.fire(0, &tuning).unwrap();
        assert_eq!(shot.shooter, Shooter::Player);
        assert_eq!(shot.pos.x, p.pos.x + PLAYER_WIDTH / 2.0 - LASER_WIDTH / 2.0);
        assert_eq!(shot.pos.y, p.pos.y);
    }

    #[test]
    fn test_rapid_fire_cadence() {
        let tuning = Tuning::default();
        let mut p = player();
        p.activate(PowerUpKind::RapidFire, 0, tuning.powerup_duration_ms);
        assert!(p.fire(100, &tuning).is_some());
        assert!(p.fire(200, &tuning).is_none());
        assert!(p.fire(251, &tuning).is_some());
    }

    #[test]
    fn test_power_up_refresh_not_stacked() {
        let mut p = player();
        p.activate(PowerUpKind::Shield, 1_000, 10_000);
        p.activate(PowerUpKind::Shield, 4_000, 10_000);
        assert_eq!(p.shield_until, Some(14_000));
    }

    #[test]
    fn test_power_up_expiry() {
        let mut p = player();
        p.activate(PowerUpKind::Shield, 0, 10_000);
        p.update(10_000, 6.0);
        assert!(p.shield_active());
        p.update(10_001, 6.0);
        assert!(!p.shield_active());
    }

    #[test]
    fn test_shield_fraction() {
        let mut p = player();
        assert_eq!(p.shield_fraction(0, 10_000), 0.0);
        p.activate(PowerUpKind::Shield, 0, 10_000);
        assert!((p.shield_fraction(5_000, 10_000) - 0.5).abs() < 1e-6);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn position_always_within_playfield(
                start_x in -2_000.0f32..2_000.0,
                moves in proptest::collection::vec((any::<bool>(), any::<bool>()), 1..200),
                speed in 0.0f32..50.0,
            ) {
                let mut p = Player::new(Vec2::new(start_x, PLAYER_START_Y));
                for (left, right) in moves {
                    p.moving_left = left;
                    p.moving_right = right;
                    p.update(0, speed);
                    prop_assert!(p.pos.x >= 0.0);
                    prop_assert!(p.pos.x <= PLAYFIELD_WIDTH - PLAYER_WIDTH);
                }
            }

            #[test]
            fn two_shots_within_cadence_yield_one(
                first in 0u64..1_000_000,
                gap in 0u64..=500,
            ) {
                let tuning = Tuning::default();
                let mut p = Player::new(Vec2::new(PLAYER_START_X, PLAYER_START_Y));
                let a = p.fire(first, &tuning);
                let b = p.fire(first + gap, &tuning);
                prop_assert!(a.is_some());
                prop_assert!(b.is_none());
            }

            #[test]
            fn shots_beyond_cadence_all_fire(
                first in 0u64..1_000_000,
                gaps in proptest::collection::vec(501u64..5_000, 1..20),
            ) {
                let tuning = Tuning::default();
                let mut p = Player::new(Vec2::new(PLAYER_START_X, PLAYER_START_Y));
                let mut now = first;
                prop_assert!(p.fire(now, &tuning).is_some());
                for gap in gaps {
                    now += gap;
                    prop_assert!(p.fire(now, &tuning).is_some());
                }
            }
        }
    }
}
