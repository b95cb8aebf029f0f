//! Session driver
//!
//! Binds the mode state machine, the input queue, a clock and the simulation
//! together. The host calls [`Game::frame`] once per fixed tick; everything
//! else (menus, pause, game over reporting) is routed through here.

use crate::highscores::{HighScoreEntry, ScoreStore};
use crate::input::{self, InputReceiver, InputSender, InputState};
use crate::platform::Clock;
use crate::settings::DEFAULT_PLAYER_NAME;
use crate::sim::{
    GameEvent, GameMode, GameState, MenuItem, ModeCommand, Snapshot, TickOutcome, TickReport, tick,
};
use crate::tuning::Tuning;

pub struct Game<C: Clock, S: ScoreStore> {
    mode: GameMode,
    /// Live session; `None` outside of play
    session: Option<GameState>,
    input: InputState,
    inbox: InputReceiver,
    clock: C,
    store: S,
    tuning: Tuning,
    player_name: String,
    /// Base seed; each new game offsets it by the number of games started
    seed: u64,
    games_started: u64,
    idle_mode: bool,
    /// Rank earned by the most recent finished game
    last_rank: Option<usize>,
    /// Final score of the most recent finished game
    last_score: Option<u64>,
    quit_requested: bool,
    events: Vec<GameEvent>,
}

impl<C: Clock, S: ScoreStore> Game<C, S> {
    /// Create a game sitting at the main menu, plus the sender input callbacks use
    pub fn new(clock: C, store: S, tuning: Tuning, seed: u64) -> (Self, InputSender) {
        let (tx, inbox) = input::channel();
        let game = Self {
            mode: GameMode::MainMenu,
            session: None,
            input: InputState::default(),
            inbox,
            clock,
            store,
            tuning,
            player_name: DEFAULT_PLAYER_NAME.to_string(),
            seed,
            games_started: 0,
            idle_mode: false,
            last_rank: None,
            last_score: None,
            quit_requested: false,
            events: Vec::new(),
        };
        (game, tx)
    }

    pub fn with_player_name(mut self, name: impl Into<String>) -> Self {
        self.player_name = name.into();
        self
    }

    /// Let the autopilot drive the ship
    pub fn set_idle_mode(&mut self, idle: bool) {
        self.idle_mode = idle;
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn session(&self) -> Option<&GameState> {
        self.session.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn last_rank(&self) -> Option<usize> {
        self.last_rank
    }

    pub fn last_score(&self) -> Option<u64> {
        self.last_score
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn top_scores(&self, n: usize) -> Vec<HighScoreEntry> {
        self.store.fetch_top(n)
    }

    /// Apply a mode command. Returns false if it is not valid in the current mode.
    pub fn command(&mut self, cmd: ModeCommand) -> bool {
        let Some(next) = self.mode.transition(cmd) else {
            log::debug!("Ignoring {:?} in {:?}", cmd, self.mode);
            return false;
        };

        match cmd {
            ModeCommand::StartGame => self.start_session(),
            ModeCommand::GameOver => self.finish_session(),
            ModeCommand::QuitToMenu => {
                if let Some(state) = self.session.take() {
                    log::info!("Session abandoned at level {} with score {}", state.level, state.score);
                }
            }
            _ => {}
        }

        if !next.runs_simulation() {
            self.input.discard_triggers();
        }
        log::info!("Mode {:?} -> {:?}", self.mode, next);
        self.mode = next;
        true
    }

    /// Activate a menu entry on the current screen
    pub fn select(&mut self, item: MenuItem) -> bool {
        if !self.mode.menu_items().contains(&item) {
            return false;
        }
        match item.command() {
            Some(cmd) => self.command(cmd),
            None => {
                log::info!("Quit requested");
                self.store.flush();
                self.quit_requested = true;
                true
            }
        }
    }

    /// Run one scheduler tick. Returns the tick report when the simulation ran.
    pub fn frame(&mut self) -> Option<TickReport> {
        self.inbox.drain_into(&mut self.input);

        if self.input.take_pause() {
            match self.mode {
                GameMode::Playing => {
                    self.command(ModeCommand::Pause);
                }
                GameMode::Paused => {
                    self.command(ModeCommand::Resume);
                }
                _ => {}
            }
        }

        if !self.mode.runs_simulation() {
            self.input.discard_triggers();
            return None;
        }

        let state = self.session.as_mut()?;
        let now_ms = self.clock.now_ms();
        let input = self.input.take_tick_input(self.idle_mode);
        let report = tick(state, &input, now_ms);
        self.events.extend(state.drain_events());

        if let TickOutcome::GameOver { .. } = report.outcome {
            self.command(ModeCommand::GameOver);
        }
        Some(report)
    }

    /// What to draw: present while playing or paused
    pub fn snapshot(&self) -> Option<Snapshot<'_>> {
        if !self.mode.shows_playfield() {
            return None;
        }
        self.session.as_ref().map(GameState::snapshot)
    }

    /// Take the cues raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn start_session(&mut self) {
        let seed = self.seed.wrapping_add(self.games_started);
        self.games_started += 1;
        let now_ms = self.clock.now_ms();
        self.session = Some(GameState::new(seed, self.tuning.clone(), now_ms));
        self.last_rank = None;
        self.last_score = None;
        log::info!("New game (seed {})", seed);
    }

    fn finish_session(&mut self) {
        let Some(state) = self.session.take() else {
            return;
        };
        let rank = self.store.submit(&self.player_name, state.score);
        match rank {
            Some(rank) => log::info!(
                "{} placed #{} with {} points",
                self.player_name,
                rank,
                state.score
            ),
            None => log::info!("Final score {} did not make the leaderboard", state.score),
        }
        self.last_rank = rank;
        self.last_score = Some(state.score);
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::consts::TICK_MS;
    use crate::highscores::HighScores;
    use crate::input::InputEvent;
    use crate::platform::ManualClock;
    use crate::sim::{Projectile, Shooter};

    fn new_game() -> (Game<ManualClock, HighScores>, InputSender) {
        let (game, tx) = Game::new(ManualClock::new(0), HighScores::new(), Tuning::default(), 42);
        (game.with_player_name("tester"), tx)
    }

    fn step(game: &mut Game<ManualClock, HighScores>) -> Option<TickReport> {
        game.clock().advance(TICK_MS);
        game.frame()
    }

    #[test]
    fn test_menu_is_inert() {
        let (mut game, tx) = new_game();
        tx.send(InputEvent::FirePressed);
        assert!(step(&mut game).is_none());
        assert!(game.snapshot().is_none());
        assert!(game.drain_events().is_empty());

        // The fire press must not leak into the first tick of play
        assert!(game.command(ModeCommand::StartGame));
        step(&mut game);
        assert!(!game.drain_events().contains(&GameEvent::Shoot));
    }

    #[test]
    fn test_fire_reaches_simulation() {
        let (mut game, tx) = new_game();
        game.command(ModeCommand::StartGame);
        tx.send(InputEvent::FirePressed);
        step(&mut game);
        assert_eq!(game.session().unwrap().player_shots.len(), 1);
        assert!(game.drain_events().contains(&GameEvent::Shoot));
    }

    #[test]
    fn test_pause_toggle_freezes_state() {
        let (mut game, tx) = new_game();
        game.command(ModeCommand::StartGame);
        step(&mut game);

        tx.send(InputEvent::PauseToggle);
        assert!(step(&mut game).is_none());
        assert_eq!(game.mode(), GameMode::Paused);
        let ticks = game.session().unwrap().time_ticks;

        for _ in 0..10 {
            step(&mut game);
        }
        assert_eq!(game.session().unwrap().time_ticks, ticks);
        assert!(game.snapshot().is_some());

        tx.send(InputEvent::PauseToggle);
        assert!(step(&mut game).is_some());
        assert_eq!(game.mode(), GameMode::Playing);
    }

    #[test]
    fn test_quit_to_menu_discards_session() {
        let (mut game, _tx) = new_game();
        game.command(ModeCommand::StartGame);
        step(&mut game);
        assert!(!game.select(MenuItem::Resume));
        game.command(ModeCommand::Pause);
        assert!(game.select(MenuItem::MainMenu));
        assert_eq!(game.mode(), GameMode::MainMenu);
        assert!(game.session().is_none());
        assert!(game.top_scores(10).is_empty());
    }

    #[test]
    fn test_game_over_reports_score_once() {
        let (mut game, _tx) = new_game();
        game.command(ModeCommand::StartGame);

        let state = game.session.as_mut().unwrap();
        state.lives = 1;
        state.score = 340;
        let target = state.player.pos + Vec2::new(10.0, 10.0);
        state.enemy_shots.push(Projectile::new(target, Shooter::Enemy, 0.0));

        let report = step(&mut game).unwrap();
        assert_eq!(report.outcome, TickOutcome::GameOver { final_score: 340 });
        assert_eq!(game.mode(), GameMode::MainMenu);
        assert!(game.session().is_none());
        assert_eq!(game.last_score(), Some(340));
        assert_eq!(game.last_rank(), Some(1));
        assert!(game.drain_events().contains(&GameEvent::GameOver(340)));

        let top = game.top_scores(10);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].name, "tester");
        assert_eq!(top[0].score, 340);

        // Nothing further happens until a new game starts
        assert!(step(&mut game).is_none());
        assert!(!game.command(ModeCommand::GameOver));
        assert_eq!(game.top_scores(10).len(), 1);
    }

    #[test]
    fn test_new_game_resets_session() {
        let (mut game, _tx) = new_game();
        game.command(ModeCommand::StartGame);
        game.session.as_mut().unwrap().score = 99;
        game.command(ModeCommand::Pause);
        game.command(ModeCommand::QuitToMenu);
        game.command(ModeCommand::StartGame);

        let state = game.session().unwrap();
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 1);
        assert_eq!(state.lives, 3);
        assert_eq!(state.enemies.len(), 50);
        assert_ne!(state.seed, 42);
    }

    #[test]
    fn test_quit_item_sets_flag() {
        let (mut game, _tx) = new_game();
        assert!(!game.select(MenuItem::Resume));
        assert!(game.select(MenuItem::Quit));
        assert!(game.quit_requested());
    }
}
