//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains the Tetris 2048 rules: the grid engine that stabilizes
//! the board after each lock, the numbered pieces and the session driver.
//! It has **zero dependencies** on UI or I/O, making it:
//!
//! - **Deterministic**: Same seed produces identical games
//! - **Testable**: Every rule can be driven from a literal grid
//! - **Portable**: Can run in any environment (terminal, headless)
//!
//! # Module Structure
//!
//! - [`grid`]: locked tiles, commit and the stabilization pipeline
//! - [`tile`]: numbered tiles, piece footprints and their anchors
//! - [`pieces`]: tetromino shapes and SRS rotation with wall kicks
//! - [`rng`]: seeded LCG and the uniform piece queue
//! - [`game_state`]: gravity, player actions, locking, restarts
//! - [`snapshot`]: render-facing copies of a game
//!
//! # Game Rules
//!
//! Every cell of a piece carries a 2 or a 4. When a piece locks:
//!
//! - **Full rows** clear and score the sum of their tiles
//! - **Equal neighbours** stacked vertically merge into their doubled value,
//!   which is scored
//! - **Orphans** (interior tiles with no neighbours) vanish and score their value
//! - **Game over** when a locked tile would sit above the top row
//!
//! # Example
//!
//! ```
//! use tui_tetris2048_core::GameState;
//! use tui_tetris2048_types::GameAction;
//!
//! // Create and start a game
//! let mut game = GameState::new(12345);
//! game.start();
//!
//! // Apply game actions
//! game.apply_action(GameAction::MoveRight);
//! game.apply_action(GameAction::RotateCw);
//! game.apply_action(GameAction::HardDrop);
//!
//! assert_eq!(game.pieces_locked(), 1);
//! assert!(!game.game_over());
//! ```
//!
//! # Timing
//!
//! The game uses a fixed timestep system:
//! - **Tick Rate**: 16ms (approximately 60 FPS)
//! - **Gravity**: one row every 500ms by default
//! - **Locking**: a piece that cannot descend on a gravity step locks at once
//!
//! Call [`GameState::tick`](game_state::GameState::tick) every frame with elapsed time.

pub mod game_state;
pub mod grid;
pub mod pieces;
pub mod rng;
pub mod snapshot;
pub mod tile;

pub use tui_tetris2048_types as types;

// Re-export commonly used types for convenience
pub use game_state::{GameSettings, GameState, LockEvent};
pub use grid::{CommitReport, Grid, StabilizeReport};
pub use pieces::{try_rotate, Tetromino};
pub use rng::{PieceQueue, SimpleRng};
pub use snapshot::{CellSnapshot, GameSnapshot};
pub use tile::{Anchor, Tile, TileMatrix};
