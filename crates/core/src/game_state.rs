//! Game state module - drives one playing session
//!
//! This module ties together the grid, the active piece and the piece queue.
//! It handles gravity timing, player actions, locking and the game lifecycle.
//! The grid keeps the score; every lock hands the piece's trimmed footprint
//! to [`Grid::lock_tiles`].

use log::{debug, info};

use crate::grid::{CommitReport, Grid};
use crate::pieces::{try_rotate, Tetromino};
use crate::rng::PieceQueue;
use crate::snapshot::{CellSnapshot, GameSnapshot};
use crate::types::{
    GameAction, FALL_INTERVAL_MS, GRID_HEIGHT, GRID_WIDTH, MAX_GRID_DIM, MIN_GRID_DIM,
};

/// Per-session parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSettings {
    pub width: u8,
    pub height: u8,
    /// Time between automatic one-row descents
    pub fall_interval_ms: u32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            width: GRID_WIDTH,
            height: GRID_HEIGHT,
            fall_interval_ms: FALL_INTERVAL_MS,
        }
    }
}

/// Last lock event (consumed by observers)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockEvent {
    /// Pieces locked in this episode, including this one
    pub pieces_locked: u32,
    pub report: CommitReport,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    grid: Grid,
    settings: GameSettings,
    active: Option<Tetromino>,
    piece_queue: PieceQueue,
    /// Monotonic episode id (increments on restart).
    episode_id: u32,
    pieces_locked: u32,
    last_event: Option<LockEvent>,
    drop_timer_ms: u32,
    paused: bool,
    started: bool,
}

impl GameState {
    /// Create a new game on the default 8x12 grid
    pub fn new(seed: u32) -> Self {
        Self::with_settings(GameSettings::default(), seed)
    }

    /// Create a new game with custom settings
    ///
    /// # Panics
    ///
    /// Panics if either grid dimension is outside
    /// `MIN_GRID_DIM..=MAX_GRID_DIM`; a narrower board cannot hold a spawned
    /// piece.
    pub fn with_settings(settings: GameSettings, seed: u32) -> Self {
        let dims = MIN_GRID_DIM..=MAX_GRID_DIM;
        assert!(
            dims.contains(&settings.width) && dims.contains(&settings.height),
            "grid size {}x{} outside {MIN_GRID_DIM}..={MAX_GRID_DIM}",
            settings.width,
            settings.height
        );
        Self {
            grid: Grid::new(settings.width, settings.height),
            settings,
            active: None,
            piece_queue: PieceQueue::new(seed),
            episode_id: 0,
            pieces_locked: 0,
            last_event: None,
            drop_timer_ms: 0,
            paused: false,
            started: false,
        }
    }

    /// Start the game and spawn the first piece
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        info!(
            "episode {} started on a {}x{} grid (seed {})",
            self.episode_id,
            self.grid.width(),
            self.grid.height(),
            self.piece_queue.seed()
        );
        self.spawn_piece();
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn game_over(&self) -> bool {
        self.grid.game_over()
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn pieces_locked(&self) -> u32 {
        self.pieces_locked
    }

    pub fn score(&self) -> u32 {
        self.grid.score()
    }

    pub fn settings(&self) -> GameSettings {
        self.settings
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[cfg(test)]
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn active(&self) -> Option<Tetromino> {
        self.active
    }

    /// The piece that spawns after the active one locks
    pub fn next_piece(&self) -> &Tetromino {
        self.piece_queue.peek()
    }

    /// Take and clear the last lock event.
    pub fn take_last_event(&mut self) -> Option<LockEvent> {
        self.last_event.take()
    }

    /// Row the active piece's box would land on if hard dropped
    pub fn ghost_row(&self) -> Option<i8> {
        self.active.map(|p| p.landed(&self.grid).row)
    }

    /// The active piece at its landing position
    pub fn ghost(&self) -> Option<Tetromino> {
        self.active.map(|p| p.landed(&self.grid))
    }

    /// Spawn the next piece above the grid
    ///
    /// The spawn position is entirely above the top row, so it always fits;
    /// blocked stacks end the game on lock instead.
    fn spawn_piece(&mut self) {
        let piece = self.piece_queue.draw().spawned(&self.grid);
        debug!(
            "spawned {} at col {} row {}",
            piece.kind.as_str(),
            piece.col,
            piece.row
        );
        self.active = Some(piece);
        self.drop_timer_ms = 0;
    }

    /// Try to move the active piece
    fn try_move(&mut self, dcol: i8, drow: i8) -> bool {
        let Some(active) = self.active else {
            return false;
        };

        let moved = active.moved(dcol, drow);
        if !moved.fits(&self.grid) {
            return false;
        }
        self.active = Some(moved);
        true
    }

    /// Try to rotate the active piece with wall kicks
    fn try_rotate(&mut self, clockwise: bool) -> bool {
        let Some(active) = self.active else {
            return false;
        };

        match try_rotate(&active, clockwise, |p| p.fits(&self.grid)) {
            Some(rotated) => {
                self.active = Some(rotated);
                true
            }
            None => false,
        }
    }

    /// Drop the active piece to its landing row and lock it
    fn hard_drop(&mut self) -> bool {
        let Some(active) = self.active else {
            return false;
        };
        self.active = Some(active.landed(&self.grid));
        self.lock_piece();
        true
    }

    /// Lock the active piece onto the grid
    fn lock_piece(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };

        let (tiles, anchor) = active.min_bounded();
        let report = self.grid.lock_tiles(&tiles, anchor);
        self.pieces_locked = self.pieces_locked.wrapping_add(1);
        self.last_event = Some(LockEvent {
            pieces_locked: self.pieces_locked,
            report,
        });

        debug!(
            "locked {} at ({}, {}): {} tiles, +{}",
            active.kind.as_str(),
            anchor.row,
            anchor.col,
            report.placed,
            report.stabilize.score_gained
        );

        if report.game_over {
            info!(
                "episode {} over: score {}, {} pieces",
                self.episode_id,
                self.grid.score(),
                self.pieces_locked
            );
            return;
        }
        self.spawn_piece();
    }

    /// Main game tick - advance gravity
    ///
    /// Returns true if the state changed.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if self.paused || self.game_over() || !self.started || self.active.is_none() {
            return false;
        }

        self.drop_timer_ms = self.drop_timer_ms.saturating_add(elapsed_ms);
        if self.drop_timer_ms < self.settings.fall_interval_ms {
            return false;
        }
        self.drop_timer_ms = 0;

        if !self.try_move(0, -1) {
            self.lock_piece();
        }
        true
    }

    /// Apply a game action
    ///
    /// Returns true if the action changed the state. Once the game is over
    /// only [`GameAction::Restart`] is honoured; while paused only
    /// [`GameAction::Pause`] and [`GameAction::Restart`] are.
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::Restart => {
                self.restart();
                return true;
            }
            _ if self.game_over() || !self.started => return false,
            GameAction::Pause => {
                self.paused = !self.paused;
                return true;
            }
            _ if self.paused => return false,
            _ => {}
        }

        match action {
            GameAction::MoveLeft => self.try_move(-1, 0),
            GameAction::MoveRight => self.try_move(1, 0),
            GameAction::SoftDrop => self.try_move(0, -1),
            GameAction::HardDrop => self.hard_drop(),
            GameAction::RotateCw => self.try_rotate(true),
            GameAction::RotateCcw => self.try_rotate(false),
            GameAction::Pause | GameAction::Restart => false,
        }
    }

    /// Start a new episode; the RNG stream carries on
    fn restart(&mut self) {
        self.grid.reset();
        self.active = None;
        self.episode_id = self.episode_id.wrapping_add(1);
        self.pieces_locked = 0;
        self.last_event = None;
        self.drop_timer_ms = 0;
        self.paused = false;
        self.started = false;
        self.start();
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.width = self.grid.width();
        out.height = self.grid.height();

        out.board.clear();
        out.board.resize(self.grid.width() as usize * self.grid.height() as usize, 0);
        let width = self.grid.width() as usize;
        for (row, col, tile) in self.grid.occupied() {
            out.board[row * width + col] = tile.value();
        }

        out.active.clear();
        out.ghost.clear();
        if let Some(active) = self.active {
            out.active.extend(active.cells().into_iter().map(CellSnapshot::from));
            out.ghost.extend(
                active
                    .landed(&self.grid)
                    .cells()
                    .into_iter()
                    .map(CellSnapshot::from),
            );
        }

        out.next = self.next_piece().min_bounded().0.to_values();
        out.score = self.grid.score();
        out.paused = self.paused;
        out.game_over = self.grid.game_over();
        out.started = self.started;
        out.episode_id = self.episode_id;
        out.seed = self.piece_queue.seed();
        out.pieces_locked = self.pieces_locked;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1)
    }
}
