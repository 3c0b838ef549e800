//! Terminal input module (engine-facing).
//!
//! This module is independent of any UI framework. It maps `crossterm` key
//! events into [`crate::types::GameAction`]s. Quitting is not a game action;
//! callers check [`should_quit`] first.

pub mod map;

pub use tui_tetris2048_types as types;

pub use map::{handle_key_event, should_quit};
