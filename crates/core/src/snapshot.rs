use arrayvec::ArrayVec;

use crate::tile::Tile;

/// One piece cell as seen by a renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellSnapshot {
    pub row: i8,
    pub col: i8,
    pub value: u32,
}

impl From<(i8, i8, Tile)> for CellSnapshot {
    fn from((row, col, tile): (i8, i8, Tile)) -> Self {
        Self {
            row,
            col,
            value: tile.value(),
        }
    }
}

/// Render-facing copy of a game, taken between locks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameSnapshot {
    pub width: u8,
    pub height: u8,
    /// Row-major tile values, row 0 = bottom, `0` = empty
    pub board: Vec<u32>,
    pub active: ArrayVec<CellSnapshot, 4>,
    pub ghost: ArrayVec<CellSnapshot, 4>,
    /// Next piece footprint, top row first
    pub next: Vec<Vec<u32>>,
    pub score: u32,
    pub paused: bool,
    pub game_over: bool,
    pub started: bool,
    pub episode_id: u32,
    pub seed: u32,
    pub pieces_locked: u32,
}

impl GameSnapshot {
    /// Locked tile value at (row, col), `0` if empty or outside
    pub fn value_at(&self, row: i8, col: i8) -> u32 {
        if row < 0 || col < 0 || row as u8 >= self.height || col as u8 >= self.width {
            return 0;
        }
        self.board[row as usize * self.width as usize + col as usize]
    }

    pub fn playable(&self) -> bool {
        self.started && !self.game_over && !self.paused
    }
}
