//! Game mode state machine
//!
//! Screens and their legal transitions. Only `Playing` advances the
//! simulation; everything else is inert.

use serde::{Deserialize, Serialize};

/// Current screen / mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameMode {
    #[default]
    MainMenu,
    /// Active gameplay
    Playing,
    /// Game is paused (last frame stays visible)
    Paused,
    HighScoreMenu,
    Instructions,
    About,
}

/// Requests that move between modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeCommand {
    /// "New Game" from the main menu
    StartGame,
    /// Pause key while playing
    Pause,
    /// Resume from the pause menu
    Resume,
    /// "Main Menu" from the pause menu
    QuitToMenu,
    /// Raised by the simulation when lives run out
    GameOver,
    ShowHighScores,
    ShowInstructions,
    ShowAbout,
    /// Back from an info screen
    Back,
}

impl GameMode {
    /// Destination for `cmd`, or `None` if the command is meaningless here
    pub fn transition(self, cmd: ModeCommand) -> Option<GameMode> {
        use GameMode::*;
        use ModeCommand as C;

        match (self, cmd) {
            (MainMenu, C::StartGame) => Some(Playing),
            (MainMenu, C::ShowHighScores) => Some(HighScoreMenu),
            (MainMenu, C::ShowInstructions) => Some(Instructions),
            (MainMenu, C::ShowAbout) => Some(About),
            (HighScoreMenu | Instructions | About, C::Back) => Some(MainMenu),
            (Playing, C::Pause) => Some(Paused),
            (Playing, C::GameOver) => Some(MainMenu),
            (Paused, C::Resume) => Some(Playing),
            (Paused, C::QuitToMenu) => Some(MainMenu),
            _ => None,
        }
    }

    /// Whether ticks run in this mode
    pub fn runs_simulation(self) -> bool {
        self == GameMode::Playing
    }

    /// Whether the playfield snapshot is shown
    pub fn shows_playfield(self) -> bool {
        matches!(self, GameMode::Playing | GameMode::Paused)
    }

    /// Selectable entries on this screen, top to bottom
    pub fn menu_items(self) -> &'static [MenuItem] {
        match self {
            GameMode::MainMenu => &MenuItem::MAIN,
            GameMode::Paused => &MenuItem::PAUSE,
            GameMode::HighScoreMenu | GameMode::Instructions | GameMode::About => &[MenuItem::Back],
            GameMode::Playing => &[],
        }
    }
}

/// A menu entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    NewGame,
    HighScores,
    Instructions,
    About,
    Resume,
    MainMenu,
    Back,
    Quit,
}

impl MenuItem {
    pub const MAIN: [MenuItem; 5] = [
        MenuItem::NewGame,
        MenuItem::HighScores,
        MenuItem::Instructions,
        MenuItem::About,
        MenuItem::Quit,
    ];
    pub const PAUSE: [MenuItem; 3] = [MenuItem::Resume, MenuItem::MainMenu, MenuItem::Quit];

    pub fn label(self) -> &'static str {
        match self {
            MenuItem::NewGame => "New Game",
            MenuItem::HighScores => "High Scores",
            MenuItem::Instructions => "Instructions",
            MenuItem::About => "About",
            MenuItem::Resume => "Resume",
            MenuItem::MainMenu => "Main Menu",
            MenuItem::Back => "Back",
            MenuItem::Quit => "Quit",
        }
    }

    /// Mode command for this entry. `Quit` leaves the application instead.
    pub fn command(self) -> Option<ModeCommand> {
        match self {
            MenuItem::NewGame => Some(ModeCommand::StartGame),
            MenuItem::HighScores => Some(ModeCommand::ShowHighScores),
            MenuItem::Instructions => Some(ModeCommand::ShowInstructions),
            MenuItem::About => Some(ModeCommand::ShowAbout),
            MenuItem::Resume => Some(ModeCommand::Resume),
            MenuItem::MainMenu => Some(ModeCommand::QuitToMenu),
            MenuItem::Back => Some(ModeCommand::Back),
            MenuItem::Quit => None,
        }
    }
}
