//! Sound cues
//!
//! The simulation only emits [`GameEvent`]s. This module maps them onto
//! procedural sound effects and hands those to whatever backend is attached.
//! Each effect is described as a stack of oscillator voices so a backend can
//! synthesize it without sample files.

use crate::sim::{GameEvent, PowerUpKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// One oscillator with an exponential pitch sweep and gain decay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Voice {
    pub wave: Waveform,
    pub start_hz: f32,
    pub end_hz: f32,
    /// Peak gain before volume scaling
    pub gain: f32,
    pub duration_s: f32,
}

const fn voice(wave: Waveform, start_hz: f32, end_hz: f32, gain: f32, duration_s: f32) -> Voice {
    Voice {
        wave,
        start_hz,
        end_hz,
        gain,
        duration_s,
    }
}

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player laser
    Shoot,
    /// Enemy laser
    AlienShoot,
    /// Enemy destroyed
    Explosion,
    /// Enemy damaged but alive
    Hit,
    /// Player lost a life
    PlayerHit,
    ShieldUp,
    RapidFire,
    LevelComplete,
    GameOver,
}

impl SoundEffect {
    /// The cue for a simulation event
    pub fn for_event(event: &GameEvent) -> SoundEffect {
        match event {
            GameEvent::Shoot => SoundEffect::Shoot,
            GameEvent::AlienShoot => SoundEffect::AlienShoot,
            GameEvent::Explosion => SoundEffect::Explosion,
            GameEvent::Hit => SoundEffect::Hit,
            GameEvent::PlayerHit => SoundEffect::PlayerHit,
            GameEvent::PowerUpCollected(PowerUpKind::Shield) => SoundEffect::ShieldUp,
            GameEvent::PowerUpCollected(PowerUpKind::RapidFire) => SoundEffect::RapidFire,
            GameEvent::LevelComplete(_) => SoundEffect::LevelComplete,
            GameEvent::GameOver(_) => SoundEffect::GameOver,
        }
    }

    pub fn voices(&self) -> &'static [Voice] {
        match self {
            SoundEffect::Shoot => SHOOT,
            SoundEffect::AlienShoot => ALIEN_SHOOT,
            SoundEffect::Explosion => EXPLOSION,
            SoundEffect::Hit => HIT,
            SoundEffect::PlayerHit => PLAYER_HIT,
            SoundEffect::ShieldUp => SHIELD_UP,
            SoundEffect::RapidFire => RAPID_FIRE,
            SoundEffect::LevelComplete => LEVEL_COMPLETE,
            SoundEffect::GameOver => GAME_OVER,
        }
    }
}

// === Voice recipes ===

/// Short descending zap
const SHOOT: &[Voice] = &[voice(Waveform::Square, 880.0, 220.0, 0.25, 0.12)];
const ALIEN_SHOOT: &[Voice] = &[voice(Waveform::Sawtooth, 300.0, 120.0, 0.15, 0.15)];
/// Low boom plus a crack on top
const EXPLOSION: &[Voice] = &[
    voice(Waveform::Sawtooth, 100.0, 30.0, 0.5, 0.4),
    voice(Waveform::Square, 1500.0, 1500.0, 0.2, 0.1),
];
const HIT: &[Voice] = &[voice(Waveform::Triangle, 300.0, 300.0, 0.25, 0.05)];
const PLAYER_HIT: &[Voice] = &[
    voice(Waveform::Sine, 80.0, 40.0, 0.5, 0.25),
    voice(Waveform::Square, 400.0, 200.0, 0.25, 0.2),
];
const SHIELD_UP: &[Voice] = &[voice(Waveform::Sine, 440.0, 880.0, 0.3, 0.2)];
const RAPID_FIRE: &[Voice] = &[
    voice(Waveform::Square, 660.0, 1320.0, 0.2, 0.15),
    voice(Waveform::Triangle, 990.0, 1980.0, 0.15, 0.15),
];
/// Rising C-E-G arpeggio
const LEVEL_COMPLETE: &[Voice] = &[
    voice(Waveform::Triangle, 523.0, 523.0, 0.3, 0.15),
    voice(Waveform::Triangle, 659.0, 659.0, 0.3, 0.2),
    voice(Waveform::Triangle, 784.0, 784.0, 0.3, 0.3),
];
const GAME_OVER: &[Voice] = &[voice(Waveform::Sawtooth, 392.0, 98.0, 0.4, 1.0)];

/// Something that can actually make noise
pub trait SoundBackend {
    fn play(&mut self, effect: SoundEffect, volume: f32);
}

/// Backend for headless runs: every cue becomes a debug log line
#[derive(Debug, Default)]
pub struct LogBackend;

impl SoundBackend for LogBackend {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        log::debug!(
            "sfx {:?} at {:.2} ({} voices)",
            effect,
            volume,
            effect.voices().len()
        );
    }
}

/// Audio manager for the game
pub struct AudioManager {
    backend: Option<Box<dyn SoundBackend>>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(None)
    }
}

impl AudioManager {
    pub fn new(backend: Option<Box<dyn SoundBackend>>) -> Self {
        if backend.is_none() {
            log::warn!("No sound backend - audio disabled");
        }
        Self {
            backend,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect. Returns whether it reached a backend.
    pub fn play(&mut self, effect: SoundEffect) -> bool {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return false;
        }
        let Some(backend) = self.backend.as_mut() else {
            return false;
        };
        backend.play(effect, vol);
        true
    }

    /// Play the cue for every event, in order
    pub fn handle_events(&mut self, events: &[GameEvent]) -> usize {
        events
            .iter()
            .map(SoundEffect::for_event)
            .filter(|&effect| self.play(effect))
            .count()
    }
}
