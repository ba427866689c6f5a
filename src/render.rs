use crate::config::{BOARD_WIDTH, HISTORY_PANEL_WIDTH, WINDOW_HEIGHT, WINDOW_WIDTH};
use crate::input::{Focus, TextField};
use crate::particles::ParticleSystem;
use crate::session::StatusKind;
use crate::utils;
use crate::view::ViewState;
use macroquad::prelude::*;

const BACKGROUND: Color = Color::new(0.06, 0.07, 0.13, 1.0);
const PANEL: Color = Color::new(0.08, 0.08, 0.20, 1.0);
const FIELD_BG: Color = Color::new(0.12, 0.13, 0.22, 1.0);
const ACCENT: Color = Color::new(0.35, 0.55, 1.0, 1.0);
const DISABLED: Color = Color::new(0.30, 0.31, 0.36, 1.0);
const REJECTED: Color = Color::new(1.0, 0.66, 0.15, 1.0);

const PADDING: f32 = 40.0;

// Conversion helper
fn faded_color(mut color: Color, alpha: f32) -> Color {
    color.a *= alpha;
    color
}

fn status_color(kind: StatusKind) -> Color {
    match kind {
        StatusKind::Success => GREEN,
        StatusKind::Rejected => REJECTED,
        StatusKind::Error => RED,
    }
}

/// Clickable regions. The window is fixed-size, so this never changes.
#[derive(Debug, Clone, Copy)]
pub struct Layout {
    pub seed_field: Rect,
    pub start_button: Rect,
    pub persona_button: Rect,
    pub guess_field: Rect,
    pub submit_button: Rect,
    pub modal: Rect,
    pub play_again_button: Rect,
}

impl Layout {
    pub fn new() -> Self {
        let board_w = BOARD_WIDTH as f32;
        let window_w = WINDOW_WIDTH as f32;
        let window_h = WINDOW_HEIGHT as f32;
        let button_w = 160.0;
        let modal_w = 520.0;
        let modal_h = 240.0;
        let modal = Rect::new((window_w - modal_w) / 2.0, (window_h - modal_h) / 2.0, modal_w, modal_h);

        Layout {
            seed_field: Rect::new(PADDING, 104.0, board_w - 3.0 * PADDING - button_w + 24.0, 44.0),
            start_button: Rect::new(board_w - PADDING - button_w, 104.0, button_w, 44.0),
            persona_button: Rect::new(board_w - PADDING - 200.0, 330.0, 200.0, 70.0),
            guess_field: Rect::new(PADDING, 440.0, board_w - 3.0 * PADDING - button_w + 24.0, 44.0),
            submit_button: Rect::new(board_w - PADDING - button_w, 440.0, button_w, 44.0),
            modal,
            play_again_button: Rect::new(modal.x + (modal_w - 180.0) / 2.0, modal.y + modal_h - 70.0, 180.0, 44.0),
        }
    }
}

impl Default for Layout {
    fn default() -> Self {
        Layout::new()
    }
}

// Handles drawing the view state using macroquad
pub struct Renderer {
    layout: Layout,
    ui_font: Option<Font>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            layout: Layout::new(),
            ui_font: None,
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    // Load an optional custom UI font; the built-in font is used otherwise
    pub async fn load_ui_font(&mut self, path: &str) {
        match load_ttf_font(path).await {
            Ok(font) => self.ui_font = Some(font),
            Err(e) => log::error!("Failed to load UI font {}: {}", path, e),
        }
    }

    fn params(&self, font_size: u16, color: Color) -> TextParams<'_> {
        TextParams {
            font: self.ui_font.as_ref(),
            font_size,
            color,
            ..Default::default()
        }
    }

    fn text(&self, text: &str, x: f32, y: f32, font_size: u16, color: Color) {
        draw_text_ex(text, x, y, self.params(font_size, color));
    }

    fn text_width(&self, text: &str, font_size: u16, scale: f32) -> f32 {
        measure_text(text, self.ui_font.as_ref(), font_size, scale).width
    }

    fn centered_text(&self, text: &str, center_x: f32, y: f32, font_size: u16, color: Color) {
        let width = self.text_width(text, font_size, 1.0);
        self.text(text, center_x - width / 2.0, y, font_size, color);
    }

    pub fn draw_frame(&self, view: &ViewState, particles: &ParticleSystem, busy: bool) {
        clear_background(BACKGROUND);

        self.draw_header(view);
        self.draw_word(view);
        self.draw_stats(view);
        self.draw_guess_row(view, busy);
        self.draw_status(view);
        self.draw_history_panel(view);
        particles.draw();

        if let Some(over) = &view.game_over {
            self.draw_game_over(&over.message, &over.final_score);
        }
    }

    fn draw_header(&self, view: &ViewState) {
        self.text("WHAT BEATS WHAT?", PADDING, 56.0, 36, GOLD);
        self.text("Seed word", PADDING, 96.0, 18, LIGHTGRAY);
        self.draw_field(&self.layout.seed_field, &view.seed_field, view.focus == Focus::Seed, true);
        self.draw_button(&self.layout.start_button, "New game", true);
    }

    fn draw_word(&self, view: &ViewState) {
        let center_x = BOARD_WIDTH as f32 / 2.0;
        self.centered_text("Current word", center_x, 200.0, 20, LIGHTGRAY);

        let pulse = utils::cue_progress(view.effects.pulse, crate::config::CUE_DURATION);
        let shake = utils::cue_progress(view.effects.shake, crate::config::CUE_DURATION);
        let scale = if view.effects.pulse > 0.0 { utils::pulse_scale(pulse) } else { 1.0 };
        let offset = if view.effects.shake > 0.0 { utils::shake_offset(shake) } else { 0.0 };

        let font_size = 64;
        let width = self.text_width(&view.word, font_size, scale);
        let color = if view.effects.shake > 0.0 { REJECTED } else { WHITE };
        draw_text_ex(
            &view.word,
            center_x - width / 2.0 + offset,
            280.0,
            TextParams {
                font_scale: scale,
                ..self.params(font_size, color)
            },
        );
    }

    fn draw_stats(&self, view: &ViewState) {
        let y = 330.0;
        let card_w = 180.0;
        let cards = [("Score", &view.score), ("Times guessed", &view.global_count)];
        for (i, (label, value)) in cards.iter().enumerate() {
            let x = PADDING + i as f32 * (card_w + 20.0);
            draw_rectangle(x, y, card_w, 70.0, PANEL);
            draw_rectangle_lines(x, y, card_w, 70.0, 2.0, faded_color(ACCENT, 0.6));
            self.text(label, x + 12.0, y + 24.0, 16, LIGHTGRAY);
            self.text(value, x + 12.0, y + 58.0, 32, WHITE);
        }

        let persona = &self.layout.persona_button;
        draw_rectangle(persona.x, persona.y, persona.w, persona.h, PANEL);
        draw_rectangle_lines(persona.x, persona.y, persona.w, persona.h, 2.0, faded_color(ACCENT, 0.6));
        self.text("Persona (F2)", persona.x + 12.0, persona.y + 24.0, 16, LIGHTGRAY);
        self.text(view.persona.as_str(), persona.x + 12.0, persona.y + 58.0, 28, SKYBLUE);
    }

    fn draw_guess_row(&self, view: &ViewState, busy: bool) {
        self.text("Your guess", PADDING, 432.0, 18, LIGHTGRAY);
        let focused = view.focus == Focus::Guess;
        self.draw_field(&self.layout.guess_field, &view.guess_field, focused, view.guessing_enabled);
        let label = if busy { "..." } else { "Beat it!" };
        self.draw_button(&self.layout.submit_button, label, view.guessing_enabled);
    }

    fn draw_status(&self, view: &ViewState) {
        if let Some(status) = &view.status {
            self.text(&status.text, PADDING, 530.0, 20, status_color(status.kind));
        }
        self.text(
            "Enter: go   Tab: switch field   F2: persona   F5: sync   Esc: quit",
            PADDING,
            WINDOW_HEIGHT as f32 - 24.0,
            14,
            GRAY,
        );
    }

    fn draw_history_panel(&self, view: &ViewState) {
        let panel_x = BOARD_WIDTH as f32;
        let panel_w = HISTORY_PANEL_WIDTH as f32;
        let padding = 16.0;

        // Panel drop shadow
        draw_rectangle(panel_x - 6.0, 8.0, 6.0, WINDOW_HEIGHT as f32 - 16.0, Color::from_rgba(0, 0, 0, 60));
        draw_rectangle(panel_x, 0.0, panel_w, WINDOW_HEIGHT as f32, PANEL);
        self.text("GUESSES", panel_x + padding, 40.0, 24, GOLD);

        let row_h = 36.0;
        let mut y = 64.0;
        for (i, guess) in view.visible_guesses().iter().enumerate() {
            let newest = i == 0;
            let bg = if newest { faded_color(ACCENT, 0.35) } else { faded_color(ACCENT, 0.12) };
            draw_rectangle(panel_x + padding, y, panel_w - 2.0 * padding, row_h - 6.0, bg);
            let color = if newest { WHITE } else { LIGHTGRAY };
            self.text(guess, panel_x + padding + 10.0, y + 21.0, 18, color);
            y += row_h;
        }
        let hidden = view.guesses.len() - view.visible_guesses().len();
        if hidden > 0 {
            self.text(&format!("+{} earlier", hidden), panel_x + padding, y + 16.0, 14, GRAY);
        }
    }

    fn draw_field(&self, rect: &Rect, field: &TextField, focused: bool, enabled: bool) {
        let border = match (enabled, focused) {
            (false, _) => DISABLED,
            (true, true) => ACCENT,
            (true, false) => faded_color(ACCENT, 0.4),
        };
        draw_rectangle(rect.x, rect.y, rect.w, rect.h, FIELD_BG);
        draw_rectangle_lines(rect.x, rect.y, rect.w, rect.h, 2.0, border);

        let text_color = if enabled { WHITE } else { DISABLED };
        let text_x = rect.x + 12.0;
        let baseline = rect.y + rect.h / 2.0 + 8.0;
        self.text(field.value(), text_x, baseline, 24, text_color);

        // Blinking caret
        if focused && enabled && (get_time() * 2.0) as i64 % 2 == 0 {
            let caret_x = text_x + self.text_width(field.value(), 24, 1.0) + 2.0;
            draw_line(caret_x, rect.y + 10.0, caret_x, rect.y + rect.h - 10.0, 2.0, WHITE);
        }
    }

    fn draw_button(&self, rect: &Rect, label: &str, enabled: bool) {
        let hovered = enabled && rect.contains(Vec2::from(mouse_position()));
        let fill = match (enabled, hovered) {
            (false, _) => DISABLED,
            (true, true) => Color::new(0.45, 0.65, 1.0, 1.0),
            (true, false) => ACCENT,
        };
        draw_rectangle(rect.x, rect.y, rect.w, rect.h, fill);
        self.centered_text(label, rect.x + rect.w / 2.0, rect.y + rect.h / 2.0 + 7.0, 22, WHITE);
    }

    fn draw_game_over(&self, message: &str, final_score: &str) {
        // Dim everything behind the overlay
        draw_rectangle(0.0, 0.0, WINDOW_WIDTH as f32, WINDOW_HEIGHT as f32, Color::from_rgba(0, 0, 0, 150));

        let modal = &self.layout.modal;
        draw_rectangle(modal.x, modal.y, modal.w, modal.h, faded_color(Color::from_rgba(0, 0, 0, 220), 1.0));
        draw_rectangle_lines(modal.x, modal.y, modal.w, modal.h, 2.0, GOLD);

        let center_x = modal.x + modal.w / 2.0;
        self.centered_text("GAME OVER", center_x, modal.y + 50.0, 36, GOLD);
        self.centered_text(message, center_x, modal.y + 100.0, 20, WHITE);
        self.centered_text(&format!("Final score: {}", final_score), center_x, modal.y + 140.0, 26, WHITE);
        self.draw_button(&self.layout.play_again_button, "Play again", true);
    }

    pub fn window_should_close() -> bool {
        is_key_down(KeyCode::Escape) || is_quit_requested()
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Renderer::new()
    }
}
