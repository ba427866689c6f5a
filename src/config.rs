//! Configuration constants for the What Beats What client.

// Server contract
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";
pub const NEW_GAME_PATH: &str = "/api/new-game";
pub const GUESS_PATH: &str = "/api/guess";
pub const HISTORY_PATH: &str = "/api/history";
pub const PERSONA_HEADER: &str = "persona";
pub const GAME_OVER_MARKER: &str = "Game Over"; // Substring the server puts in its terminal message

// Game rules (client side)
pub const DEFAULT_SEED_WORD: &str = "rock"; // Used when the seed field is blank
pub const MAX_INPUT_CHARS: usize = 32;

// Window and layout
pub const WINDOW_WIDTH: i32 = 960;
pub const WINDOW_HEIGHT: i32 = 640;
pub const HISTORY_PANEL_WIDTH: i32 = 260; // Right-hand guess list
pub const BOARD_WIDTH: i32 = WINDOW_WIDTH - HISTORY_PANEL_WIDTH;
pub const MAX_VISIBLE_GUESSES: usize = 14;

// Visual cues
pub const CUE_DURATION: f32 = 0.5; // Seconds a pulse or shake lasts
pub const SHAKE_AMPLITUDE: f32 = 12.0; // Pixels
pub const SHAKE_FREQUENCY: f32 = 6.0; // Oscillations per cue
pub const PULSE_SCALE: f32 = 0.25; // Extra font scale at the peak of a pulse

// Confetti
pub const CONFETTI_COUNT: usize = 100;
pub const CONFETTI_SPREAD_DEGREES: f32 = 70.0;
pub const CONFETTI_ORIGIN_Y: f32 = 0.6; // Fraction of window height
pub const CONFETTI_SPEED: f32 = 520.0; // Pixels per second
pub const CONFETTI_LIFETIME: f32 = 1.6; // Seconds
pub const CONFETTI_GRAVITY: f32 = 640.0; // Pixels per second squared
