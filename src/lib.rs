//! What Beats What: a desktop client for the word-association game.
//!
//! The session logic ([`session::GameClient`]) only sees the server through
//! [`api::GameApi`] and the screen through [`session::Presenter`]; the
//! macroquad front end in [`game`] and [`render`] wires both to real
//! implementations.

pub mod api;
pub mod config;
pub mod error;
pub mod game;
pub mod input;
pub mod logging;
pub mod net;
pub mod particles;
pub mod render;
pub mod session;
pub mod utils;
pub mod view;
