use crate::config;
use crate::input::Focus;
use crate::net::NetWorker;
use crate::particles::ParticleSystem;
use crate::render::{Layout, Renderer};
use crate::session::{GameClient, Outcome, Persona, Presenter, Request, StatusKind};
use crate::view::ViewState;
use log::info;
use macroquad::prelude::{
    KeyCode, MouseButton, Vec2, get_char_pressed, get_frame_time, is_key_pressed,
    is_mouse_button_pressed, mouse_position, next_frame,
};

/// One discrete thing the player did this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    Type(char),
    Backspace,
    /// Enter: start, submit or play again depending on context.
    Confirm,
    ToggleFocus,
    Focus(Focus),
    CyclePersona,
    StartGame,
    SubmitGuess,
    PlayAgain,
    SyncHistory,
}

/// Ties player input, the session client, the network worker and the view
/// together for one window.
pub struct Game {
    client: GameClient,
    view: ViewState,
    worker: NetWorker,
    particles: ParticleSystem,
}

impl Game {
    pub fn new(worker: NetWorker, seed: Option<&str>, persona: Persona) -> Self {
        Game {
            client: GameClient::new(),
            view: ViewState::new(seed, persona),
            worker,
            particles: ParticleSystem::new(),
        }
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn client(&self) -> &GameClient {
        &self.client
    }

    /// Run the main loop using the provided renderer
    pub async fn run(&mut self, renderer: &mut Renderer) -> Result<(), Box<dyn std::error::Error>> {
        info!("Starting main loop...");

        while !Renderer::window_should_close() {
            for action in read_input(renderer.layout(), self.view.game_over.is_some()) {
                self.handle(action);
            }
            self.pump();
            self.update_effects(get_frame_time());

            renderer.draw_frame(&self.view, &self.particles, self.worker.in_flight() > 0);
            next_frame().await;
        }

        info!("Exiting What Beats What.");
        Ok(())
    }

    pub fn handle(&mut self, action: UiAction) {
        crate::debug_ui!("{:?}", action);
        match action {
            UiAction::Type(c) => {
                self.view.focused_field_mut().push(c);
            }
            UiAction::Backspace => self.view.focused_field_mut().backspace(),
            UiAction::Confirm => {
                let next = if self.view.game_over.is_some() {
                    UiAction::PlayAgain
                } else {
                    match self.view.focus {
                        Focus::Seed => UiAction::StartGame,
                        Focus::Guess => UiAction::SubmitGuess,
                    }
                };
                self.handle(next);
            }
            UiAction::ToggleFocus => self.view.toggle_focus(),
            UiAction::Focus(focus) => {
                if focus == Focus::Seed || self.view.guessing_enabled {
                    self.view.focus = focus;
                }
            }
            UiAction::CyclePersona => {
                self.view.persona = self.view.persona.next();
                info!("Persona set to {}", self.view.persona);
            }
            UiAction::StartGame => {
                let request = self.client.prepare_start(self.view.seed_field.value());
                self.dispatch(request);
            }
            UiAction::SubmitGuess => {
                let guess = self.view.guess_field.value().to_string();
                let persona = self.view.persona;
                if let Ok(request) = self.client.prepare_guess(&guess, persona, &mut self.view) {
                    self.dispatch(request);
                }
            }
            UiAction::PlayAgain => {
                self.view.hide_game_over();
                self.handle(UiAction::StartGame);
            }
            UiAction::SyncHistory => {
                if let Ok(request) = self.client.prepare_history(&mut self.view) {
                    self.dispatch(request);
                }
            }
        }
    }

    fn dispatch(&mut self, request: Request) {
        if !self.worker.submit(request) {
            self.view
                .show_status("Network worker is not running", StatusKind::Error);
        }
    }

    /// Apply every request that finished since the last frame.
    pub fn pump(&mut self) -> Vec<Outcome> {
        self.worker
            .poll()
            .into_iter()
            .map(|completion| self.client.apply(completion, &mut self.view))
            .collect()
    }

    fn update_effects(&mut self, dt: f32) {
        self.view.effects.tick(dt);
        if self.view.effects.take_confetti() {
            let origin = Vec2::new(
                config::BOARD_WIDTH as f32 / 2.0,
                config::WINDOW_HEIGHT as f32 * config::CONFETTI_ORIGIN_Y,
            );
            self.particles
                .spawn_confetti(origin, config::CONFETTI_COUNT, config::CONFETTI_SPREAD_DEGREES);
        }
        self.particles.update(dt);
    }

    /// Block until every queued request has been applied.
    #[cfg(test)]
    fn settle(&mut self) -> Vec<Outcome> {
        let mut outcomes = Vec::new();
        while self.worker.in_flight() > 0 {
            match self.worker.wait(std::time::Duration::from_secs(5)) {
                Some(completion) => outcomes.push(self.client.apply(completion, &mut self.view)),
                None => break,
            }
        }
        outcomes
    }
}

/// Translate this frame's keyboard and mouse state into actions.
fn read_input(layout: &Layout, modal_open: bool) -> Vec<UiAction> {
    let mut actions = Vec::new();

    while let Some(c) = get_char_pressed() {
        if !c.is_control() {
            actions.push(UiAction::Type(c));
        }
    }
    if is_key_pressed(KeyCode::Backspace) {
        actions.push(UiAction::Backspace);
    }
    if is_key_pressed(KeyCode::Enter) || is_key_pressed(KeyCode::KpEnter) {
        actions.push(UiAction::Confirm);
    }
    if is_key_pressed(KeyCode::Tab) {
        actions.push(UiAction::ToggleFocus);
    }
    if is_key_pressed(KeyCode::F2) {
        actions.push(UiAction::CyclePersona);
    }
    if is_key_pressed(KeyCode::F5) {
        actions.push(UiAction::SyncHistory);
    }

    if is_mouse_button_pressed(MouseButton::Left) {
        let point = Vec2::from(mouse_position());
        if let Some(action) = click_action(layout, modal_open, point) {
            actions.push(action);
        }
    }
    actions
}

/// What a left click at `point` means. While the game-over overlay is up only
/// its button responds.
pub fn click_action(layout: &Layout, modal_open: bool, point: Vec2) -> Option<UiAction> {
    if modal_open {
        return layout
            .play_again_button
            .contains(point)
            .then_some(UiAction::PlayAgain);
    }
    let targets = [
        (layout.seed_field, UiAction::Focus(Focus::Seed)),
        (layout.start_button, UiAction::StartGame),
        (layout.persona_button, UiAction::CyclePersona),
        (layout.guess_field, UiAction::Focus(Focus::Guess)),
        (layout.submit_button, UiAction::SubmitGuess),
    ];
    targets
        .iter()
        .find(|(rect, _)| rect.contains(point))
        .map(|(_, action)| *action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{Call, ScriptedApi, accepted, rejected, started};
    use crate::api::GuessRequest;
    use std::sync::Arc;

    /// Lets a test keep inspecting the scripted server after the worker takes it.
    struct SharedApi(Arc<ScriptedApi>);

    impl crate::api::GameApi for SharedApi {
        fn new_game(&self, seed_word: &str) -> Result<crate::api::NewGameResponse, crate::error::ClientError> {
            self.0.new_game(seed_word)
        }
        fn guess(
            &self,
            request: &GuessRequest,
            persona: Persona,
        ) -> Result<crate::api::GuessResponse, crate::error::ClientError> {
            self.0.guess(request, persona)
        }
        fn history(&self, session_id: &str) -> Result<crate::api::HistoryResponse, crate::error::ClientError> {
            self.0.history(session_id)
        }
    }

    fn game_with(api: &Arc<ScriptedApi>, seed: Option<&str>) -> Game {
        let _ = env_logger::builder().is_test(true).try_init();
        let worker = NetWorker::spawn(SharedApi(Arc::clone(api))).unwrap();
        Game::new(worker, seed, Persona::Serious)
    }

    fn type_text(game: &mut Game, text: &str) {
        for c in text.chars() {
            game.handle(UiAction::Type(c));
        }
    }

    #[test]
    fn test_rock_paper_scissors_round() {
        let api = Arc::new(ScriptedApi::new());
        api.push_new_game(Ok(started("s1", "rock")));
        api.push_guess(Ok(accepted("scissors", 1, 42, &["rock", "paper", "scissors"])));
        let mut game = game_with(&api, None);

        type_text(&mut game, "rock");
        game.handle(UiAction::Confirm);
        assert_eq!(game.settle(), vec![Outcome::Started]);
        assert_eq!(game.view().word, "rock");
        assert_eq!(game.view().score, "0");
        assert_eq!(game.view().guesses, vec!["rock"]);
        assert_eq!(game.view().focus, Focus::Guess);

        type_text(&mut game, "paper");
        game.handle(UiAction::Confirm);
        assert_eq!(game.settle(), vec![Outcome::Accepted]);

        let view = game.view();
        assert_eq!(view.word, "scissors");
        assert_eq!(view.score, "1");
        assert_eq!(view.global_count, "42");
        assert_eq!(view.guesses, vec!["scissors", "paper", "rock"]);
        assert!(view.guess_field.is_empty());
        assert_eq!(view.status.as_ref().unwrap().kind, StatusKind::Success);
    }

    #[test]
    fn test_blank_seed_field_starts_with_fallback() {
        let api = Arc::new(ScriptedApi::new());
        api.push_new_game(Ok(started("s1", "rock")));
        let mut game = game_with(&api, None);
        game.handle(UiAction::StartGame);
        game.settle();
        assert_eq!(api.calls(), vec![Call::NewGame(config::DEFAULT_SEED_WORD.into())]);
    }

    #[test]
    fn test_whitespace_guess_never_reaches_worker() {
        let api = Arc::new(ScriptedApi::new());
        api.push_new_game(Ok(started("s1", "rock")));
        let mut game = game_with(&api, Some("rock"));
        game.handle(UiAction::StartGame);
        game.settle();

        type_text(&mut game, "   ");
        game.handle(UiAction::SubmitGuess);
        assert_eq!(game.worker.in_flight(), 0);
        assert_eq!(api.calls().len(), 1);
        assert_eq!(game.view().status.as_ref().unwrap().text, "Please enter a guess");
    }

    #[test]
    fn test_persona_travels_with_guess() {
        let api = Arc::new(ScriptedApi::new());
        api.push_new_game(Ok(started("s1", "rock")));
        api.push_guess(Ok(rejected("❌ Sorry, \"ash\" doesn't beat \"rock\".", "rock", 0)));
        let mut game = game_with(&api, Some("rock"));
        game.handle(UiAction::StartGame);
        game.settle();

        game.handle(UiAction::CyclePersona);
        type_text(&mut game, "ash");
        game.handle(UiAction::SubmitGuess);
        assert_eq!(game.settle(), vec![Outcome::Rejected]);

        let last = api.calls().pop().unwrap();
        assert_eq!(
            last,
            Call::Guess(
                GuessRequest { guess: "ash".into(), session_id: "s1".into() },
                Persona::Cheery
            )
        );
        assert!(game.view().effects.shake > 0.0);
        assert_eq!(game.view().status.as_ref().unwrap().kind, StatusKind::Rejected);
    }

    #[test]
    fn test_game_over_then_play_again() {
        let api = Arc::new(ScriptedApi::new());
        api.push_new_game(Ok(started("s1", "rock")));
        api.push_guess(Ok(accepted("paper", 1, 5, &["rock", "paper"])));
        api.push_guess(Ok(rejected("🎮 Game Over! \"rock\" was already guessed.", "paper", 1)));
        api.push_new_game(Ok(started("s2", "rock")));
        let mut game = game_with(&api, Some("rock"));

        game.handle(UiAction::StartGame);
        game.settle();
        type_text(&mut game, "paper");
        game.handle(UiAction::Confirm);
        game.settle();
        type_text(&mut game, "rock");
        game.handle(UiAction::Confirm);
        assert_eq!(game.settle(), vec![Outcome::GameOver]);

        let over = game.view().game_over.clone().unwrap();
        assert_eq!(over.final_score, "1");
        assert!(!game.view().guessing_enabled);
        assert!(!game.client().can_guess());

        // Guessing is blocked, and Enter now means "play again".
        game.handle(UiAction::SubmitGuess);
        assert_eq!(game.worker.in_flight(), 0);
        game.handle(UiAction::Confirm);
        assert_eq!(game.settle(), vec![Outcome::Started]);
        assert!(game.view().game_over.is_none());
        assert_eq!(game.client().session().unwrap().id, "s2");
        assert_eq!(game.view().score, "0");
    }

    #[test]
    fn test_valid_guess_launches_confetti() {
        let api = Arc::new(ScriptedApi::new());
        api.push_new_game(Ok(started("s1", "rock")));
        api.push_guess(Ok(accepted("paper", 1, 1, &["rock", "paper"])));
        let mut game = game_with(&api, Some("rock"));
        game.handle(UiAction::StartGame);
        game.settle();
        type_text(&mut game, "paper");
        game.handle(UiAction::SubmitGuess);
        game.settle();

        game.update_effects(0.016);
        assert_eq!(game.particles.len(), config::CONFETTI_COUNT);
        game.update_effects(0.016);
        assert_eq!(game.particles.len(), config::CONFETTI_COUNT);
    }

    #[test]
    fn test_sync_history_requires_session() {
        let api = Arc::new(ScriptedApi::new());
        let mut game = game_with(&api, None);
        game.handle(UiAction::SyncHistory);
        assert_eq!(game.worker.in_flight(), 0);
        assert_eq!(
            game.view().status.as_ref().unwrap().text,
            "Please start a new game first"
        );
    }

    #[test]
    fn test_focus_guess_ignored_before_start() {
        let api = Arc::new(ScriptedApi::new());
        let mut game = game_with(&api, None);
        game.handle(UiAction::Focus(Focus::Guess));
        assert_eq!(game.view().focus, Focus::Seed);
        type_text(&mut game, "fire");
        game.handle(UiAction::Backspace);
        assert_eq!(game.view().seed_field.value(), "fir");
    }

    #[test]
    fn test_click_targets() {
        let layout = Layout::new();
        let center = |r: macroquad::prelude::Rect| r.point() + r.size() / 2.0;

        assert_eq!(click_action(&layout, false, center(layout.start_button)), Some(UiAction::StartGame));
        assert_eq!(click_action(&layout, false, center(layout.submit_button)), Some(UiAction::SubmitGuess));
        assert_eq!(
            click_action(&layout, false, center(layout.guess_field)),
            Some(UiAction::Focus(Focus::Guess))
        );
        assert_eq!(click_action(&layout, false, Vec2::new(1.0, 1.0)), None);

        // Overlay swallows everything but its own button
        assert_eq!(click_action(&layout, true, center(layout.start_button)), None);
        assert_eq!(
            click_action(&layout, true, center(layout.play_again_button)),
            Some(UiAction::PlayAgain)
        );
    }
}
