//! Wire types and the HTTP transport for the game server.
//!
//! The server exposes three endpoints:
//! - `POST /api/new-game` creates a session from a seed word
//! - `POST /api/guess` judges a guess; the persona travels as a header
//! - `GET /api/history/{session_id}` returns the server's copy of the session
//!
//! `GameApi` is the seam the session client talks through, so tests can drive
//! the client with scripted replies instead of a live server.

use crate::config;
use crate::error::ClientError;
use crate::session::Persona;
use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGameRequest {
    pub seed_word: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGameResponse {
    pub session_id: String,
    pub current_word: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessRequest {
    pub guess: String,
    pub session_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessResponse {
    pub valid: bool,
    pub message: String,
    #[serde(default)]
    pub current_word: String,
    #[serde(default)]
    pub score: u32,
    #[serde(default)]
    pub global_count: u64,
    #[serde(default)]
    pub previous_guesses: Vec<String>,
}

impl GuessResponse {
    /// Whether this reply ends the game.
    ///
    /// The server has no structured flag for this; it only says so in the
    /// message text of a rejected guess. Keep every check for it here.
    pub fn is_game_over(&self) -> bool {
        !self.valid && self.message.contains(config::GAME_OVER_MARKER)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub current_word: String,
    pub guesses: Vec<String>,
    pub score: u32,
}

/// Error body shape used by the server for 4xx replies.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

/// The two (plus one) calls the session client needs from a server.
pub trait GameApi {
    fn new_game(&self, seed_word: &str) -> Result<NewGameResponse, ClientError>;
    fn guess(&self, request: &GuessRequest, persona: Persona) -> Result<GuessResponse, ClientError>;
    fn history(&self, session_id: &str) -> Result<HistoryResponse, ClientError>;
}

/// Blocking reqwest transport. Meant to live on the network worker thread.
#[derive(Debug, Clone)]
pub struct HttpGameApi {
    client: Client,
    base_url: String,
}

impl HttpGameApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl GameApi for HttpGameApi {
    fn new_game(&self, seed_word: &str) -> Result<NewGameResponse, ClientError> {
        let url = self.url(config::NEW_GAME_PATH);
        crate::debug_net!("POST {} seed={:?}", url, seed_word);
        // The server reads the seed from the query string; the body mirrors it.
        let response = self
            .client
            .post(&url)
            .query(&[("seed_word", seed_word)])
            .json(&NewGameRequest {
                seed_word: seed_word.to_string(),
            })
            .send()
            .map_err(transport_error)?;
        decode(response)
    }

    fn guess(&self, request: &GuessRequest, persona: Persona) -> Result<GuessResponse, ClientError> {
        let url = self.url(config::GUESS_PATH);
        crate::debug_net!(
            "POST {} guess={:?} persona={} session {}",
            url,
            request.guess,
            persona,
            request.session_id
        );
        let response = self
            .client
            .post(&url)
            .header(config::PERSONA_HEADER, persona.as_str())
            .json(request)
            .send()
            .map_err(transport_error)?;
        decode(response)
    }

    fn history(&self, session_id: &str) -> Result<HistoryResponse, ClientError> {
        let url = format!("{}/{}", self.url(config::HISTORY_PATH), session_id);
        crate::debug_net!("GET {} session {}", url, session_id);
        let response = self.client.get(&url).send().map_err(transport_error)?;
        decode(response)
    }
}

fn transport_error(err: reqwest::Error) -> ClientError {
    ClientError::Transport(err.to_string())
}

fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    let body = response.text().map_err(transport_error)?;
    if !status.is_success() {
        return Err(status_error(status.as_u16(), &body));
    }
    serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
}

fn status_error(status: u16, body: &str) -> ClientError {
    let detail = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|b| b.detail);
    ClientError::Status { status, detail }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serves one canned HTTP reply and hands back the raw request it received.
    fn one_shot_server(status_line: &'static str, body: &'static str) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut head = String::new();
            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if let Some(value) = line.to_ascii_lowercase().strip_prefix("content-length:") {
                    content_length = value.trim().parse().unwrap();
                }
                let done = line == "\r\n";
                head.push_str(&line);
                if done {
                    break;
                }
            }
            let mut body_buf = vec![0u8; content_length];
            reader.read_exact(&mut body_buf).unwrap();
            head.push_str(&String::from_utf8(body_buf).unwrap());

            let reply = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            stream.write_all(reply.as_bytes()).unwrap();
            stream.flush().unwrap();
            head
        });
        (format!("http://{}", addr), handle)
    }

    #[test]
    fn test_game_over_detection() {
        let over = testing::rejected("🎮 Game Over! \"paper\" was already guessed.", "rock", 3);
        assert!(over.is_game_over());

        let wrong = testing::rejected("❌ Sorry, \"feather\" doesn't beat \"rock\".", "rock", 3);
        assert!(!wrong.is_game_over());

        // A valid guess never ends the game, whatever its message says.
        let mut odd = testing::accepted("game", 1, 1, &["rock", "game"]);
        odd.message = "Game Over is a great word".into();
        assert!(!odd.is_game_over());
    }

    #[test]
    fn test_guess_response_missing_fields_default() {
        let parsed: GuessResponse =
            serde_json::from_str(r#"{"valid": false, "message": "nope"}"#).unwrap();
        assert!(!parsed.valid);
        assert_eq!(parsed.score, 0);
        assert!(parsed.previous_guesses.is_empty());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let api = HttpGameApi::new("http://localhost:8000/");
        assert_eq!(api.base_url(), "http://localhost:8000");
        assert_eq!(api.url(config::GUESS_PATH), "http://localhost:8000/api/guess");
    }

    #[test]
    fn test_http_new_game_sends_seed_in_query_and_body() {
        let (base, server) = one_shot_server(
            "HTTP/1.1 200 OK",
            r#"{"session_id":"abc123","current_word":"rock","message":"Game started with seed word: rock","previous_guesses":["rock"],"score":0}"#,
        );
        let api = HttpGameApi::new(base);
        let reply = api.new_game("rock").unwrap();
        assert_eq!(reply.session_id, "abc123");
        assert_eq!(reply.current_word, "rock");

        let request = server.join().unwrap();
        assert!(request.starts_with("POST /api/new-game?seed_word=rock HTTP/1.1"));
        assert!(request.ends_with(r#"{"seed_word":"rock"}"#));
    }

    #[test]
    fn test_http_guess_sends_persona_header() {
        let (base, server) = one_shot_server(
            "HTTP/1.1 200 OK",
            r#"{"valid":true,"message":"ok","current_word":"paper","score":1,"previous_guesses":["rock","paper"],"global_count":7}"#,
        );
        let api = HttpGameApi::new(base);
        let request = GuessRequest {
            guess: "paper".into(),
            session_id: "abc123".into(),
        };
        let reply = api.guess(&request, Persona::Cheery).unwrap();
        assert!(reply.valid);
        assert_eq!(reply.global_count, 7);

        let raw = server.join().unwrap().to_ascii_lowercase();
        assert!(raw.starts_with("post /api/guess http/1.1"));
        assert!(raw.contains("persona: cheery\r\n"));
        assert!(raw.contains(r#""session_id":"abc123""#));
    }

    #[test]
    fn test_http_error_detail_is_surfaced() {
        let (base, server) = one_shot_server(
            "HTTP/1.1 404 Not Found",
            r#"{"detail":"Game session not found"}"#,
        );
        let api = HttpGameApi::new(base);
        let err = api.history("missing").unwrap_err();
        assert_eq!(
            err,
            ClientError::Status {
                status: 404,
                detail: Some("Game session not found".into())
            }
        );
        assert!(server.join().unwrap().starts_with("GET /api/history/missing HTTP/1.1"));
    }

    #[test]
    fn test_http_error_without_json_body_has_no_detail() {
        let (base, server) = one_shot_server("HTTP/1.1 502 Bad Gateway", "<html>upstream down</html>");
        let api = HttpGameApi::new(base);
        let err = api.new_game("rock").unwrap_err();
        assert_eq!(err, ClientError::Status { status: 502, detail: None });
        assert_eq!(err.to_string(), "HTTP error 502");
        server.join().unwrap();
    }

    #[test]
    fn test_http_garbage_body_is_decode_error() {
        let (base, server) = one_shot_server("HTTP/1.1 200 OK", "not json");
        let api = HttpGameApi::new(base);
        let err = api.new_game("rock").unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
        server.join().unwrap();
    }

    #[test]
    fn test_http_connection_refused_is_transport_error() {
        // Bind then drop to get a port nothing listens on.
        let port = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
        let api = HttpGameApi::new(format!("http://127.0.0.1:{port}"));
        let err = api.new_game("rock").unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
    }
}
