//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, terminal rendering, configuration).
//!
//! # Grid Dimensions
//!
//! The default playfield matches the classic Tetris 2048 board:
//!
//! - **Width**: 8 columns (indexed 0-7, left to right)
//! - **Height**: 12 rows (indexed 0-11, **bottom to top**)
//!
//! Other sizes are accepted as long as both dimensions fall within
//! [`MIN_GRID_DIM`]..=[`MAX_GRID_DIM`].
//!
//! # Game Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep interval (~60 FPS) |
//! | `FALL_INTERVAL_MS` | 500 | Automatic descent period |
//!
//! # Examples
//!
//! ```
//! use tui_tetris2048_types::{GameAction, PieceKind, Rotation, GRID_HEIGHT, GRID_WIDTH};
//!
//! let piece = PieceKind::from_str("t").unwrap();
//! assert_eq!(piece, PieceKind::T);
//!
//! assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
//! assert_eq!(GameAction::from_str("hardDrop"), Some(GameAction::HardDrop));
//!
//! assert_eq!(GRID_WIDTH, 8);
//! assert_eq!(GRID_HEIGHT, 12);
//! ```

/// Default grid width in cells (8 columns)
pub const GRID_WIDTH: u8 = 8;

/// Default grid height in cells (12 rows)
pub const GRID_HEIGHT: u8 = 12;

/// Smallest accepted grid dimension (an I piece must fit horizontally)
pub const MIN_GRID_DIM: u8 = 4;

/// Largest accepted grid dimension
///
/// Board coordinates are `i8`; spawn rows sit a few rows above the top,
/// so dimensions stay well below `i8::MAX`.
pub const MAX_GRID_DIM: u8 = 64;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Automatic descent period: one row every 500ms
pub const FALL_INTERVAL_MS: u32 = 500;

/// Values a freshly created tile can carry, drawn uniformly
pub const TILE_SPAWN_VALUES: [u32; 2] = [2, 4];

/// The seven tetromino piece kinds
///
/// In Tetris 2048 the kind only decides the shape; every cell of a piece
/// carries its own numbered tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// Every kind, in a fixed order (used for uniform random draws)
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
        PieceKind::S,
        PieceKind::T,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_tetris2048_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::J => "j",
            PieceKind::L => "l",
        }
    }
}

/// Rotation states following the Super Rotation System (SRS)
///
/// - **North**: Spawn orientation (0° rotation)
/// - **East**: Rotated 90° clockwise
/// - **South**: Rotated 180°
/// - **West**: Rotated 90° counter-clockwise (270° clockwise)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Rotate clockwise (90°)
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_tetris2048_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
    /// assert_eq!(Rotation::West.rotate_cw(), Rotation::North);
    /// ```
    pub fn rotate_cw(&self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    /// Rotate counter-clockwise (-90° or 270°)
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_tetris2048_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_ccw(), Rotation::West);
    /// assert_eq!(Rotation::East.rotate_ccw(), Rotation::North);
    /// ```
    pub fn rotate_ccw(&self) -> Self {
        match self {
            Rotation::North => Rotation::West,
            Rotation::West => Rotation::South,
            Rotation::South => Rotation::East,
            Rotation::East => Rotation::North,
        }
    }
}

/// Game actions that can be applied to modify game state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Move piece one cell down (never locks it)
    SoftDrop,
    /// Drop piece to its lowest valid position and lock it
    HardDrop,
    /// Rotate piece 90° clockwise
    RotateCw,
    /// Rotate piece 90° counter-clockwise
    RotateCcw,
    /// Toggle pause state
    Pause,
    /// Start a new game session
    Restart,
}

impl GameAction {
    /// Parse action from its camelCase name (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_tetris2048_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("rotateCcw"), Some(GameAction::RotateCcw));
    /// assert_eq!(GameAction::from_str("hold"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "softdrop" => Some(GameAction::SoftDrop),
            "harddrop" => Some(GameAction::HardDrop),
            "rotatecw" => Some(GameAction::RotateCw),
            "rotateccw" => Some(GameAction::RotateCcw),
            "pause" => Some(GameAction::Pause),
            "restart" => Some(GameAction::Restart),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::SoftDrop => "softDrop",
            GameAction::HardDrop => "hardDrop",
            GameAction::RotateCw => "rotateCw",
            GameAction::RotateCcw => "rotateCcw",
            GameAction::Pause => "pause",
            GameAction::Restart => "restart",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grid_fits_accepted_range() {
        assert!((MIN_GRID_DIM..=MAX_GRID_DIM).contains(&GRID_WIDTH));
        assert!((MIN_GRID_DIM..=MAX_GRID_DIM).contains(&GRID_HEIGHT));
        // Spawn rows go up to height + 3; must stay representable.
        assert!((MAX_GRID_DIM as i16 + 4) < i8::MAX as i16);
    }

    #[test]
    fn spawn_values_are_powers_of_two() {
        for v in TILE_SPAWN_VALUES {
            assert!(v >= 2 && v.is_power_of_two());
        }
    }

    #[test]
    fn piece_kind_all_round_trips_through_str() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_str(kind.as_str()), Some(kind));
        }
    }
}
