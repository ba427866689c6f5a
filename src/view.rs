//! In-memory presentation surface.
//!
//! `ViewState` is what the renderer draws each frame. It implements
//! [`Presenter`], so the session client updates it the way a page script
//! would update the DOM: text, styles, the guess list and the game-over
//! overlay. Nothing here talks to macroquad.

use crate::config;
use crate::input::{Focus, TextField};
use crate::session::{Board, Cue, Persona, Presenter, StatusKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    pub kind: StatusKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameOverView {
    pub message: String,
    pub final_score: String,
}

/// Time left on each transient cue, in seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Effects {
    pub pulse: f32,
    pub shake: f32,
    confetti_pending: bool,
}

impl Effects {
    pub fn tick(&mut self, dt: f32) {
        self.pulse = (self.pulse - dt).max(0.0);
        self.shake = (self.shake - dt).max(0.0);
    }

    /// Returns true once per celebrate cue.
    pub fn take_confetti(&mut self) -> bool {
        std::mem::take(&mut self.confetti_pending)
    }
}

#[derive(Debug, Clone)]
pub struct ViewState {
    pub word: String,
    pub score: String,
    pub global_count: String,
    /// Most recent first.
    pub guesses: Vec<String>,
    pub status: Option<StatusLine>,
    pub game_over: Option<GameOverView>,
    pub guessing_enabled: bool,
    pub seed_field: TextField,
    pub guess_field: TextField,
    pub focus: Focus,
    pub persona: Persona,
    pub effects: Effects,
}

impl ViewState {
    pub fn new(seed: Option<&str>, persona: Persona) -> Self {
        ViewState {
            word: "?".to_string(),
            score: "0".to_string(),
            global_count: "0".to_string(),
            guesses: Vec::new(),
            status: None,
            game_over: None,
            guessing_enabled: false,
            seed_field: seed.map(TextField::with_text).unwrap_or_default(),
            guess_field: TextField::new(),
            focus: Focus::Seed,
            persona,
            effects: Effects::default(),
        }
    }

    pub fn focused_field_mut(&mut self) -> &mut TextField {
        match self.focus {
            Focus::Seed => &mut self.seed_field,
            Focus::Guess => &mut self.guess_field,
        }
    }

    /// Move focus, skipping the guess field while guessing is disabled.
    pub fn toggle_focus(&mut self) {
        let next = self.focus.toggle();
        if next == Focus::Guess && !self.guessing_enabled {
            return;
        }
        self.focus = next;
    }

    /// Guesses to draw, newest first, capped to what fits on screen.
    pub fn visible_guesses(&self) -> &[String] {
        let n = self.guesses.len().min(config::MAX_VISIBLE_GUESSES);
        &self.guesses[..n]
    }
}

/// Reverse chronological copy of a guess history.
pub fn recent_first(guesses: &[String]) -> Vec<String> {
    guesses.iter().rev().cloned().collect()
}

impl Presenter for ViewState {
    fn show_board(&mut self, board: Board<'_>) {
        self.word = board.word.to_string();
        self.score = board.score.to_string();
        self.global_count = board.global_count.to_string();
        self.guesses = recent_first(board.guesses);
    }

    fn show_status(&mut self, message: &str, kind: StatusKind) {
        self.status = Some(StatusLine {
            text: message.to_string(),
            kind,
        });
    }

    fn hide_status(&mut self) {
        self.status = None;
    }

    fn show_game_over(&mut self, message: &str, final_score: u32) {
        self.game_over = Some(GameOverView {
            message: message.to_string(),
            final_score: final_score.to_string(),
        });
    }

    fn hide_game_over(&mut self) {
        self.game_over = None;
    }

    fn set_guessing_enabled(&mut self, enabled: bool) {
        self.guessing_enabled = enabled;
        if !enabled && self.focus == Focus::Guess {
            self.focus = Focus::Seed;
        }
    }

    fn reset_guess_input(&mut self) {
        self.guess_field.clear();
        self.focus = Focus::Guess;
    }

    fn play_cue(&mut self, cue: Cue) {
        match cue {
            Cue::Celebrate => {
                self.effects.pulse = config::CUE_DURATION;
                self.effects.confetti_pending = true;
            }
            Cue::Reject => {
                self.effects.shake = config::CUE_DURATION;
            }
        }
    }
}
