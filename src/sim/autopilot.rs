//! Demo-mode AI
//!
//! Produces the same intent a human would: dodge incoming fire, grab falling
//! power-ups when it is safe, otherwise line up under the lowest enemy and fire.

use super::state::GameState;
use super::tick::TickInput;
use crate::consts::*;

/// Shots closer than this (vertically) above the ship are threats
const DANGER_HEIGHT: f32 = 120.0;
/// Extra horizontal clearance around the ship when judging threats
const DANGER_MARGIN: f32 = 8.0;
/// Don't twitch for sub-step alignment errors
const DEADZONE: f32 = 4.0;

pub fn autopilot_input(state: &GameState) -> TickInput {
    let player = &state.player;
    let center_x = player.pos.x + player.size.x / 2.0;
    let left = player.pos.x - DANGER_MARGIN;
    let right = player.pos.x + player.size.x + DANGER_MARGIN;

    let threat = if player.shield_active() {
        None
    } else {
        state
            .enemy_shots
            .iter()
            .filter(|s| {
                s.pos.y + LASER_HEIGHT > player.pos.y - DANGER_HEIGHT
                    && s.pos.y < player.pos.y + player.size.y
                    && s.pos.x + LASER_WIDTH > left
                    && s.pos.x < right
            })
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
    };

    let target_x = if let Some(shot) = threat {
        // Run away from the bolt, toward whichever side has room
        if shot.pos.x + LASER_WIDTH / 2.0 < center_x {
            PLAYFIELD_WIDTH
        } else {
            0.0
        }
    } else if let Some(powerup) = state
        .powerups
        .iter()
        .filter(|p| p.pos.y + POWERUP_SIZE < player.pos.y + player.size.y)
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
    {
        powerup.pos.x + POWERUP_SIZE / 2.0
    } else if let Some(enemy) = state.enemies.iter().max_by(|a, b| {
        a.pos
            .y
            .total_cmp(&b.pos.y)
            .then_with(|| (b.pos.x - center_x).abs().total_cmp(&(a.pos.x - center_x).abs()))
    }) {
        // Lead the target by one formation step
        enemy.pos.x + ENEMY_WIDTH / 2.0 + enemy.speed * state.formation.direction
    } else {
        center_x
    };

    let dx = target_x - center_x;
    TickInput {
        move_left: dx < -DEADZONE,
        move_right: dx > DEADZONE,
        fire: threat.is_none() && !state.enemies.is_empty(),
        idle_mode: false,
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::sim::state::{PowerUp, PowerUpKind, Projectile, Shooter};
    use crate::tuning::Tuning;

    #[test]
    fn test_dodges_incoming_fire() {
        let mut state = GameState::new(5, Tuning::default(), 0);
        let p = state.player.pos;
        // Bolt just left of center, above the ship
        state.enemy_shots.push(Projectile::new(
            Vec2::new(p.x + 10.0, p.y - 50.0),
            Shooter::Enemy,
            5.0,
        ));
        let input = autopilot_input(&state);
        assert!(input.move_right);
        assert!(!input.fire);
    }

    #[test]
    fn test_ignores_fire_when_shielded() {
        let mut state = GameState::new(5, Tuning::default(), 0);
        state.player.activate(PowerUpKind::Shield, 0, 10_000);
        let p = state.player.pos;
        state.enemy_shots.push(Projectile::new(
            Vec2::new(p.x + 10.0, p.y - 50.0),
            Shooter::Enemy,
            5.0,
        ));
        assert!(autopilot_input(&state).fire);
    }

    #[test]
    fn test_chases_power_up() {
        let mut state = GameState::new(5, Tuning::default(), 0);
        state
            .powerups
            .push(PowerUp::new(Vec2::new(20.0, 300.0), PowerUpKind::Shield, 2.0));
        let input = autopilot_input(&state);
        assert!(input.move_left);
        assert!(!input.move_right);
    }

    #[test]
    fn test_idle_with_empty_field() {
        let mut state = GameState::new(5, Tuning::default(), 0);
        state.enemies.clear();
        let input = autopilot_input(&state);
        assert_eq!(input, TickInput::default());
    }
}
