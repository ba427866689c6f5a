// Client error types: local validation failures, transport failures, server statuses

use thiserror::Error;

/// Everything that can stop a start, guess or resync from reaching the board.
///
/// Semantic rejections (a guess that does not beat the current word) are not
/// errors; they arrive as a normal response with `valid == false`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("Please start a new game first")]
    NoSession,
    #[error("Game over. Start a new game to keep playing")]
    SessionEnded,
    #[error("Please enter a guess")]
    EmptyGuess,
    #[error("{0}")]
    Transport(String),
    #[error("HTTP error {status}{}", detail_suffix(.detail))]
    Status { status: u16, detail: Option<String> },
    #[error("Invalid response from server: {0}")]
    Decode(String),
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(d) => format!(": {d}"),
        None => String::new(),
    }
}
