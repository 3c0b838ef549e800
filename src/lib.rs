//! Tetris 2048 (workspace facade crate).
//!
//! The game itself lives in dedicated crates under `crates/`; this package
//! re-exports them as `tui_tetris2048::{core,input,term,types}` and adds the
//! binary's configuration and logging setup.

pub mod config;
pub mod logging;

pub use tui_tetris2048_core as core;
pub use tui_tetris2048_input as input;
pub use tui_tetris2048_term as term;
pub use tui_tetris2048_types as types;
