//! Vertical arcade shooter core.
//!
//! The crate is host-agnostic: [`game::Game::update`] takes a timestamp,
//! an input snapshot and menu events, and returns a [`render::Frame`] of
//! draw and audio commands.  The binary drives it in a terminal.

pub mod assets;
pub mod audio;
pub mod clock;
pub mod combat;
pub mod config;
pub mod entities;
pub mod error;
pub mod game;
pub mod input;
pub mod interface;
pub mod motion;
pub mod playing;
pub mod registry;
pub mod render;
pub mod screen;
pub mod spawner;

pub use config::GameConfig;
pub use error::{GameError, GameResult};
pub use game::Game;
