//! Terminal "game renderer" module.
//!
//! This is a small, game-oriented rendering layer for terminal gameplay.
//! It avoids widget toolkits and instead renders into a simple framebuffer
//! that can be flushed to a terminal backend.
//!
//! Goals:
//! - Keep `core` deterministic and testable
//! - Paint numbered tiles with their 2048 colours
//! - Allow precise control over aspect ratio (tiles are several chars wide)

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use tui_tetris2048_core as core;
pub use tui_tetris2048_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{tile_colors, tile_label, AnchorY, GameView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
