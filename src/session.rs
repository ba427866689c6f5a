//! Game session client: a local mirror of the server's session plus the rules
//! for turning user actions into requests and replies into board updates.
//!
//! Every operation is split in two so the frame loop never blocks:
//! `prepare_*` validates locally and yields a [`Request`] (or reports the
//! problem to the presenter), and [`GameClient::apply`] folds the matching
//! [`Completion`] back into the session. [`GameClient::start_session`] and
//! [`GameClient::submit_guess`] chain both halves for synchronous callers.

use crate::api::{GameApi, GuessRequest, GuessResponse, HistoryResponse, NewGameResponse};
use crate::config;
use crate::error::ClientError;
use log::{info, warn};
use std::fmt;

/// Label sent with each guess; the server picks its judging style from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Persona {
    #[default]
    Serious,
    Cheery,
}

impl Persona {
    pub fn as_str(&self) -> &'static str {
        match self {
            Persona::Serious => "serious",
            Persona::Cheery => "cheery",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Persona::Serious => Persona::Cheery,
            Persona::Cheery => Persona::Serious,
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    pub current_word: String,
    pub score: u32,
    pub global_count: u64,
    /// Oldest first.
    pub guesses: Vec<String>,
    pub ended: bool,
}

impl Session {
    fn from_start(reply: NewGameResponse) -> Self {
        Session {
            id: reply.session_id,
            guesses: vec![reply.current_word.clone()],
            current_word: reply.current_word,
            score: 0,
            global_count: 0,
            ended: false,
        }
    }

    pub fn board(&self) -> Board<'_> {
        Board {
            word: &self.current_word,
            score: self.score,
            global_count: self.global_count,
            guesses: &self.guesses,
        }
    }
}

/// Everything the board shows, handed to the presenter in one piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board<'a> {
    pub word: &'a str,
    pub score: u32,
    pub global_count: u64,
    /// Oldest first; presenters decide display order.
    pub guesses: &'a [String],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    /// A gameplay "no", not a failure.
    Rejected,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Celebrate,
    Reject,
}

/// Presentation port. The session client only ever talks to the screen
/// through this.
pub trait Presenter {
    fn show_board(&mut self, board: Board<'_>);
    fn show_status(&mut self, message: &str, kind: StatusKind);
    fn hide_status(&mut self);
    fn show_game_over(&mut self, message: &str, final_score: u32);
    fn hide_game_over(&mut self);
    fn set_guessing_enabled(&mut self, enabled: bool);
    /// Clear the guess field and put the cursor back in it.
    fn reset_guess_input(&mut self);
    fn play_cue(&mut self, cue: Cue);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    NewGame { seed_word: String },
    Guess { request: GuessRequest, persona: Persona },
    History { session_id: String },
}

impl Request {
    /// Run the request against a server. Blocking.
    pub fn execute(&self, api: &dyn GameApi) -> Completion {
        match self {
            Request::NewGame { seed_word } => Completion::NewGame(api.new_game(seed_word)),
            Request::Guess { request, persona } => Completion::Guess {
                session_id: request.session_id.clone(),
                result: api.guess(request, *persona),
            },
            Request::History { session_id } => Completion::History {
                session_id: session_id.clone(),
                result: api.history(session_id),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    NewGame(Result<NewGameResponse, ClientError>),
    Guess {
        session_id: String,
        result: Result<GuessResponse, ClientError>,
    },
    History {
        session_id: String,
        result: Result<HistoryResponse, ClientError>,
    },
}

/// What a completed (or refused) operation did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Started,
    Accepted,
    Rejected,
    GameOver,
    Synced,
    Failed(ClientError),
    /// Reply for a session that is no longer current.
    Stale,
}

/// Resolve the seed field to the word actually sent.
pub fn resolve_seed(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        config::DEFAULT_SEED_WORD.to_string()
    } else {
        trimmed.to_string()
    }
}

#[derive(Debug, Default)]
pub struct GameClient {
    session: Option<Session>,
}

impl GameClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn can_guess(&self) -> bool {
        self.session.as_ref().is_some_and(|s| !s.ended)
    }

    pub fn prepare_start(&self, seed_input: &str) -> Request {
        Request::NewGame {
            seed_word: resolve_seed(seed_input),
        }
    }

    /// Validate a guess locally. On failure the presenter is told why and no
    /// request is produced.
    pub fn prepare_guess(
        &self,
        guess_input: &str,
        persona: Persona,
        presenter: &mut dyn Presenter,
    ) -> Result<Request, ClientError> {
        let checked = self.check_guess(guess_input);
        match checked {
            Ok(request) => {
                crate::debug_session!(
                    "Guess {:?} ready for session {} as {}",
                    request.guess,
                    request.session_id,
                    persona
                );
                Ok(Request::Guess { request, persona })
            }
            Err(err) => {
                presenter.show_status(&err.to_string(), StatusKind::Error);
                Err(err)
            }
        }
    }

    fn check_guess(&self, guess_input: &str) -> Result<GuessRequest, ClientError> {
        let session = self.session.as_ref().ok_or(ClientError::NoSession)?;
        if session.ended {
            return Err(ClientError::SessionEnded);
        }
        let guess = guess_input.trim();
        if guess.is_empty() {
            return Err(ClientError::EmptyGuess);
        }
        Ok(GuessRequest {
            guess: guess.to_string(),
            session_id: session.id.clone(),
        })
    }

    pub fn prepare_history(&self, presenter: &mut dyn Presenter) -> Result<Request, ClientError> {
        match &self.session {
            Some(session) => Ok(Request::History {
                session_id: session.id.clone(),
            }),
            None => {
                let err = ClientError::NoSession;
                presenter.show_status(&err.to_string(), StatusKind::Error);
                Err(err)
            }
        }
    }

    /// Fold a finished request into the session and the presenter.
    pub fn apply(&mut self, completion: Completion, presenter: &mut dyn Presenter) -> Outcome {
        match completion {
            Completion::NewGame(result) => self.apply_start(result, presenter),
            Completion::Guess { session_id, result } => {
                if !self.is_live(&session_id) {
                    warn!(target: "session", "Dropping guess reply for stale session {}", session_id);
                    return Outcome::Stale;
                }
                self.apply_guess(result, presenter)
            }
            Completion::History { session_id, result } => {
                if !self.is_live(&session_id) {
                    warn!(target: "session", "Dropping history reply for stale session {}", session_id);
                    return Outcome::Stale;
                }
                self.apply_history(result, presenter)
            }
        }
    }

    /// A reply only lands on the current session, and only while it is still running.
    fn is_live(&self, session_id: &str) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.id == session_id && !s.ended)
    }

    fn apply_start(
        &mut self,
        result: Result<NewGameResponse, ClientError>,
        presenter: &mut dyn Presenter,
    ) -> Outcome {
        let reply = match result {
            Ok(reply) => reply,
            Err(err) => {
                warn!(target: "session", "Starting game failed: {}", err);
                presenter.show_status(&format!("Error starting game: {err}"), StatusKind::Error);
                return Outcome::Failed(err);
            }
        };

        if let Some(message) = &reply.message {
            info!(target: "session", "{} (session {})", message, reply.session_id);
        }
        let session = Session::from_start(reply);
        info!(
            target: "session",
            "Started session {} with word {:?}",
            session.id, session.current_word
        );

        presenter.hide_game_over();
        presenter.show_board(session.board());
        presenter.hide_status();
        presenter.set_guessing_enabled(true);
        presenter.reset_guess_input();
        self.session = Some(session);
        Outcome::Started
    }

    fn apply_guess(
        &mut self,
        result: Result<GuessResponse, ClientError>,
        presenter: &mut dyn Presenter,
    ) -> Outcome {
        let reply = match result {
            Ok(reply) => reply,
            Err(err) => {
                warn!(target: "session", "Submitting guess failed: {}", err);
                presenter.show_status(&format!("Error: {err}"), StatusKind::Error);
                return Outcome::Failed(err);
            }
        };
        let Some(session) = self.session.as_mut() else {
            return Outcome::Stale;
        };

        if reply.valid {
            session.current_word = reply.current_word;
            session.score = reply.score;
            session.global_count = reply.global_count;
            session.guesses = reply.previous_guesses;
            info!(
                target: "session",
                "Guess accepted in session {}: word={:?} score={}",
                session.id, session.current_word, session.score
            );

            presenter.show_board(session.board());
            presenter.show_status(&reply.message, StatusKind::Success);
            presenter.play_cue(Cue::Celebrate);
            presenter.reset_guess_input();
            Outcome::Accepted
        } else if reply.is_game_over() {
            session.ended = true;
            info!(
                target: "session",
                "Game over in session {} with score {}",
                session.id, session.score
            );

            presenter.set_guessing_enabled(false);
            presenter.show_game_over(&reply.message, session.score);
            Outcome::GameOver
        } else {
            info!(target: "session", "Guess rejected in session {}: {}", session.id, reply.message);

            presenter.show_status(&reply.message, StatusKind::Rejected);
            presenter.play_cue(Cue::Reject);
            presenter.reset_guess_input();
            Outcome::Rejected
        }
    }

    fn apply_history(
        &mut self,
        result: Result<HistoryResponse, ClientError>,
        presenter: &mut dyn Presenter,
    ) -> Outcome {
        let reply = match result {
            Ok(reply) => reply,
            Err(err) => {
                warn!(target: "session", "History sync failed: {}", err);
                presenter.show_status(&format!("Error syncing history: {err}"), StatusKind::Error);
                return Outcome::Failed(err);
            }
        };
        let Some(session) = self.session.as_mut() else {
            return Outcome::Stale;
        };

        session.current_word = reply.current_word;
        session.score = reply.score;
        session.guesses = reply.guesses;
        info!(
            target: "session",
            "Synced session {}: {} guesses, score {}",
            session.id,
            session.guesses.len(),
            session.score
        );

        presenter.show_board(session.board());
        presenter.show_status("History synced", StatusKind::Success);
        Outcome::Synced
    }

    /// Start a session, blocking on the server.
    pub fn start_session(
        &mut self,
        api: &dyn GameApi,
        seed_input: &str,
        presenter: &mut dyn Presenter,
    ) -> Outcome {
        let completion = self.prepare_start(seed_input).execute(api);
        self.apply(completion, presenter)
    }

    /// Submit a guess, blocking on the server. Local validation failures
    /// never reach `api`.
    pub fn submit_guess(
        &mut self,
        api: &dyn GameApi,
        guess_input: &str,
        persona: Persona,
        presenter: &mut dyn Presenter,
    ) -> Outcome {
        match self.prepare_guess(guess_input, persona, presenter) {
            Ok(request) => {
                let completion = request.execute(api);
                self.apply(completion, presenter)
            }
            Err(err) => Outcome::Failed(err),
        }
    }

    pub fn sync_history(&mut self, api: &dyn GameApi, presenter: &mut dyn Presenter) -> Outcome {
        match self.prepare_history(presenter) {
            Ok(request) => {
                let completion = request.execute(api);
                self.apply(completion, presenter)
            }
            Err(err) => Outcome::Failed(err),
        }
    }
}
