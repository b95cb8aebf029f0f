//! Fixed timestep simulation tick
//!
//! Core game loop that advances the session by one frame. The order of the
//! steps is significant: later steps observe what earlier ones produced.
//! The caller samples its clock once and passes the same `now_ms` through
//! every timer comparison of the tick.

use rand::Rng;

use super::autopilot::autopilot_input;
use super::collision::{
    Bounded, remove_indices, resolve_enemy_shots, resolve_pickups, resolve_player_shots,
};
use super::formation::FormationStep;
use super::state::{GameEvent, GameState, PowerUp, PowerUpKind};

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Left held
    pub move_left: bool,
    /// Right held
    pub move_right: bool,
    /// One-shot fire request
    pub fire: bool,
    /// Idle/demo mode - AI plays the game
    pub idle_mode: bool,
}

/// Terminal condition observed at the end of a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TickOutcome {
    #[default]
    Continue,
    /// Formation cleared; the new level has been seeded
    LevelCleared { level: u32 },
    /// Out of lives
    GameOver { final_score: u64 },
}

/// What happened during one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub outcome: TickOutcome,
    pub formation: FormationStep,
    /// Enemies hit that survived
    pub enemy_hits: u32,
    pub enemies_destroyed: u32,
    pub player_hits: u32,
    pub powerups_collected: u32,
}

impl TickReport {
    /// All collisions resolved this tick
    pub fn collisions(&self) -> u32 {
        self.enemy_hits + self.enemies_destroyed + self.player_hits + self.powerups_collected
    }
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: u64) -> TickReport {
    let demo_input;
    let input = if input.idle_mode {
        demo_input = autopilot_input(state);
        &demo_input
    } else {
        input
    };

    state.time_ticks += 1;
    let mut report = TickReport::default();

    // 1. Player kinematics, power-up expiry, queued shot
    state.player.moving_left = input.move_left;
    state.player.moving_right = input.move_right;
    state.player.update(now_ms, state.tuning.player_speed);
    if input.fire {
        if let Some(shot) = state.player.fire(now_ms, &state.tuning) {
            state.player_shots.push(shot);
            state.events.push(GameEvent::Shoot);
        }
    }

    // 2. Particles
    for particle in state.particles.iter_mut() {
        particle.update();
    }
    state.particles.retain(|p| !p.is_dead());

    // 3. Background decoration
    for star in state.stars.iter_mut() {
        star.update(&mut state.rng);
    }

    // 4. Player shots
    for shot in state.player_shots.iter_mut() {
        shot.update();
    }
    state.player_shots.retain(|s| !s.has_exited());

    // 5. Formation
    report.formation = state.formation.update(
        &mut state.enemies,
        now_ms,
        state.tuning.enemy_drop_distance,
        state.tuning.enemy_laser_speed,
        &mut state.rng,
        &mut state.enemy_shots,
    );
    if report.formation.fired.is_some() {
        state.events.push(GameEvent::AlienShoot);
    }

    // 6. Enemy shots
    for shot in state.enemy_shots.iter_mut() {
        shot.update();
    }
    state.enemy_shots.retain(|s| !s.has_exited());

    // 7. Power-ups
    for powerup in state.powerups.iter_mut() {
        powerup.update();
    }
    state.powerups.retain(|p| !p.has_exited());

    // 8. Collisions
    resolve_collisions(state, now_ms, &mut report);

    // 9. Terminal conditions
    debug_assert!(state.player.pos.x >= 0.0 && state.player.pos.x <= state.player.max_x());
    if state.lives == 0 {
        log::info!("Game over at level {} with score {}", state.level, state.score);
        state.events.push(GameEvent::GameOver(state.score));
        report.outcome = TickOutcome::GameOver {
            final_score: state.score,
        };
    } else if state.enemies.is_empty() {
        log::info!("Level {} cleared, score {}", state.level, state.score);
        state.events.push(GameEvent::LevelComplete(state.level));
        state.next_level(now_ms);
        report.outcome = TickOutcome::LevelCleared { level: state.level };
    }

    report
}

/// Apply every collision policy, scoring and compacting afterwards
fn resolve_collisions(state: &mut GameState, now_ms: u64, report: &mut TickReport) {
    // Player shots vs formation
    let shots = resolve_player_shots(&state.player_shots, &mut state.enemies);
    for _ in &shots.damaged {
        state.events.push(GameEvent::Hit);
    }
    for &idx in &shots.destroyed {
        let (origin, center, value) = {
            let enemy = &state.enemies[idx];
            (enemy.pos, enemy.bounds().center(), enemy.score_value())
        };
        state.score += value;
        state.events.push(GameEvent::Explosion);
        state.spawn_explosion(center);

        if state.rng.random_range(0..100) < state.tuning.powerup_drop_chance {
            let kind = PowerUpKind::random(&mut state.rng);
            log::debug!("{:?} dropped at ({}, {})", kind, origin.x, origin.y);
            state.powerups.push(PowerUp::new(origin, kind, state.tuning.powerup_speed));
        }
    }
    report.enemy_hits = shots.damaged.len() as u32;
    report.enemies_destroyed = shots.destroyed.len() as u32;
    remove_indices(&mut state.player_shots, &shots.spent_shots);
    remove_indices(&mut state.enemies, &shots.destroyed);

    // Enemy shots vs player
    let player_rect = state.player.bounds();
    let hits = resolve_enemy_shots(&state.enemy_shots, &player_rect, state.player.shield_active());
    for _ in &hits {
        state.lives = state.lives.saturating_sub(1);
        state.events.push(GameEvent::PlayerHit);
    }
    report.player_hits = hits.len() as u32;
    remove_indices(&mut state.enemy_shots, &hits);

    // Power-ups vs player
    let pickups = resolve_pickups(&state.powerups, &player_rect);
    for &idx in &pickups {
        let kind = state.powerups[idx].kind;
        state
            .player
            .activate(kind, now_ms, state.tuning.powerup_duration_ms);
        state.events.push(GameEvent::PowerUpCollected(kind));
    }
    report.powerups_collected = pickups.len() as u32;
    remove_indices(&mut state.powerups, &pickups);
}
