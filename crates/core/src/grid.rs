//! Grid module - the locked-tile board and its stabilization rules
//!
//! The grid owns every locked tile. Coordinates are `(row, col)` with row 0
//! at the **bottom** and column 0 on the left. Storage is one flat,
//! row-major vector allocated once per grid; row clears shift rows in place.
//!
//! A piece lock ([`Grid::commit`]) writes the piece's tiles, then runs the
//! stabilization pipeline:
//!
//! 1. **Row clear**: a full row scores the sum of its values and is removed;
//!    rows above shift down and the scan restarts from row 0.
//! 2. **Merge**: two vertically adjacent equal tiles fuse into the lower one
//!    (value doubled, new value scored), the column above closes the gap and
//!    the scan restarts from the bottom.
//! 3. **Orphan removal**: an interior tile whose four neighbours are all
//!    empty is removed and its value scored.
//!
//! Clears shift rows and can stack equal tiles, so merging runs after them.
//! A merge shifts the rest of its column down, which can fill a gap and
//! complete a row, so clears and merges alternate until a merge pass changes
//! nothing. Orphan removal runs last: removing an orphan never fills a row,
//! shifts a column or isolates another tile, so the result is stable and a
//! second run is a no-op.
//!
//! Every clear removes `width` tiles and every merge or orphan removal removes
//! one, so the pipeline terminates after at most `width * height` changes.

use std::fmt;

use log::{debug, trace};

use crate::tile::{Anchor, Tile, TileMatrix};
use crate::types::MAX_GRID_DIM;

/// What one run of the stabilization pipeline did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StabilizeReport {
    pub rows_cleared: u32,
    pub merges: u32,
    pub orphans_removed: u32,
    pub score_gained: u32,
}

impl StabilizeReport {
    /// True when the board was already stable
    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }
}

/// Outcome of locking one footprint onto the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommitReport {
    /// Tiles written inside the board
    pub placed: u32,
    pub stabilize: StabilizeReport,
    pub game_over: bool,
}

/// The board of locked tiles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: u8,
    height: u8,
    /// Row-major, row 0 = bottom (row * width + col)
    cells: Vec<Option<Tile>>,
    score: u32,
    game_over: bool,
}

impl Grid {
    /// Create an empty grid
    ///
    /// # Panics
    ///
    /// Panics if a dimension is zero or above [`MAX_GRID_DIM`].
    pub fn new(width: u8, height: u8) -> Self {
        assert!(
            (1..=MAX_GRID_DIM).contains(&width) && (1..=MAX_GRID_DIM).contains(&height),
            "grid dimensions out of range: {width}x{height}"
        );
        Self {
            width,
            height,
            cells: vec![None; width as usize * height as usize],
            score: 0,
            game_over: false,
        }
    }

    /// Build a grid from tile values listed top row first (`0` = empty)
    ///
    /// The result is not stabilized; it is exactly what was given.
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_tetris2048_core::Grid;
    ///
    /// let grid = Grid::from_values(&[
    ///     &[0, 0, 0],
    ///     &[2, 0, 0],
    ///     &[4, 8, 0],
    /// ]);
    /// assert_eq!(grid.value(0, 0), 4); // bottom-left
    /// assert_eq!(grid.value(1, 0), 2);
    /// assert_eq!(grid.value(0, 1), 8);
    /// ```
    pub fn from_values(rows: &[&[u32]]) -> Self {
        assert!(!rows.is_empty(), "grid needs at least one row");
        let width = rows[0].len();
        assert!(
            rows.iter().all(|r| r.len() == width),
            "grid rows must all have the same width"
        );
        assert!(
            width <= MAX_GRID_DIM as usize && rows.len() <= MAX_GRID_DIM as usize,
            "grid dimensions out of range"
        );

        let mut grid = Self::new(width as u8, rows.len() as u8);
        for (i, values) in rows.iter().enumerate() {
            let row = grid.height as usize - 1 - i;
            for (col, &v) in values.iter().enumerate() {
                if v != 0 {
                    let idx = grid.idx(row, col);
                    grid.cells[idx] = Some(Tile::new(v));
                }
            }
        }
        grid
    }

    #[inline(always)]
    fn idx(&self, row: usize, col: usize) -> usize {
        row * self.width as usize + col
    }

    #[inline(always)]
    fn index(&self, row: i8, col: i8) -> Option<usize> {
        if !self.is_inside(row, col) {
            return None;
        }
        Some(self.idx(row as usize, col as usize))
    }

    #[inline(always)]
    fn cell(&self, row: usize, col: usize) -> Option<Tile> {
        self.cells[self.idx(row, col)]
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    /// Strict bounds check
    pub fn is_inside(&self, row: i8, col: i8) -> bool {
        row >= 0 && col >= 0 && (row as u8) < self.height && (col as u8) < self.width
    }

    /// Whether a locked tile sits at (row, col)
    ///
    /// Cells outside the board are never occupied. This lets an entering
    /// piece hang above the top row without being considered blocked.
    pub fn is_occupied(&self, row: i8, col: i8) -> bool {
        self.tile(row, col).is_some()
    }

    /// Tile at (row, col), `None` if empty or outside
    pub fn tile(&self, row: i8, col: i8) -> Option<Tile> {
        self.index(row, col).and_then(|i| self.cells[i])
    }

    /// Tile value at (row, col), `0` if empty or outside
    pub fn value(&self, row: i8, col: i8) -> u32 {
        self.tile(row, col).map_or(0, |t| t.value())
    }

    /// Raw write, bypassing the lock rules (fixtures and tooling)
    ///
    /// Returns false if out of bounds.
    pub fn set(&mut self, row: i8, col: i8, cell: Option<Tile>) -> bool {
        match self.index(row, col) {
            Some(i) => {
                self.cells[i] = cell;
                true
            }
            None => false,
        }
    }

    /// Iterate locked tiles as `(row, col, tile)`, bottom row first
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize, Tile)> + '_ {
        let width = self.width as usize;
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(i, c)| c.map(|t| (i / width, i % width, t)))
    }

    /// Number of locked tiles
    pub fn tile_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, row: usize) -> bool {
        if row >= self.height as usize {
            return false;
        }
        let start = row * self.width as usize;
        self.cells[start..start + self.width as usize]
            .iter()
            .all(|c| c.is_some())
    }

    /// Tile values row by row, **top row first** (`0` = empty)
    pub fn to_values(&self) -> Vec<Vec<u32>> {
        (0..self.height as usize)
            .rev()
            .map(|row| {
                (0..self.width as usize)
                    .map(|col| self.cell(row, col).map_or(0, |t| t.value()))
                    .collect()
            })
            .collect()
    }

    /// Empty the board for a new session
    pub fn reset(&mut self) {
        self.cells.fill(None);
        self.score = 0;
        self.game_over = false;
    }

    /// Lock a piece footprint onto the grid
    ///
    /// `tiles` lists rows top-to-bottom; `anchor` is where its bottom-left
    /// corner lands. Returns true once the game is over.
    ///
    /// See [`Grid::lock_tiles`] for the detailed variant.
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_tetris2048_core::{Anchor, Grid, TileMatrix};
    ///
    /// let mut grid = Grid::new(4, 4);
    /// let two = TileMatrix::from_values(&[&[2]]);
    ///
    /// assert!(!grid.commit(&two, Anchor::new(0, 0)));
    /// assert!(!grid.commit(&two, Anchor::new(0, 1)));
    ///
    /// // The second 2 landed on the first and merged.
    /// assert_eq!(grid.value(0, 0), 4);
    /// assert_eq!(grid.value(1, 0), 0);
    /// assert_eq!(grid.score(), 4);
    /// ```
    pub fn commit(&mut self, tiles: &TileMatrix, anchor: Anchor) -> bool {
        self.lock_tiles(tiles, anchor).game_over
    }

    /// Lock a piece footprint and report what happened
    ///
    /// A tile whose destination row is at or above the top boundary cannot
    /// be placed: the game is over, but the remaining tiles of the piece are
    /// still written. Stabilization only runs if the game is not over.
    ///
    /// Once the game is over this is a no-op.
    ///
    /// # Panics
    ///
    /// Panics on an all-empty footprint, or if a tile would land left,
    /// right or below the board. Callers only commit pieces that fit.
    pub fn lock_tiles(&mut self, tiles: &TileMatrix, anchor: Anchor) -> CommitReport {
        if self.game_over {
            return CommitReport {
                game_over: true,
                ..CommitReport::default()
            };
        }
        assert!(tiles.tile_count() > 0, "cannot commit an empty footprint");

        let bottom = tiles.rows() as i16 - 1;
        let mut placed = 0u32;

        for (r, c, tile) in tiles.iter() {
            // Matrix rows run top-to-bottom; its last row lands on anchor.row.
            let row = anchor.row as i16 + (bottom - r as i16);
            let col = anchor.col as i16 + c as i16;

            assert!(
                col >= 0 && col < self.width as i16 && row >= 0,
                "footprint tile lands outside the board at ({row}, {col})"
            );

            if row >= self.height as i16 {
                self.game_over = true;
                continue;
            }

            let idx = self.idx(row as usize, col as usize);
            self.cells[idx] = Some(tile);
            placed += 1;
        }

        let stabilize = if self.game_over {
            debug!("lock overflowed the top row; game over at score {}", self.score);
            StabilizeReport::default()
        } else {
            self.stabilize()
        };

        CommitReport {
            placed,
            stabilize,
            game_over: self.game_over,
        }
    }

    /// Run the stabilization pipeline until the board is stable
    ///
    /// [`Grid::commit`] already does this; calling it again right after is a
    /// no-op. Does nothing once the game is over.
    pub fn stabilize(&mut self) -> StabilizeReport {
        let mut report = StabilizeReport::default();
        if self.game_over {
            return report;
        }

        loop {
            self.clear_full_rows(&mut report);
            if self.merge_columns(&mut report) == 0 {
                break;
            }
        }
        while self.remove_orphans(&mut report) > 0 {}

        if !report.is_noop() {
            debug!(
                "stabilized: {} rows, {} merges, {} orphans, +{} (score {})",
                report.rows_cleared,
                report.merges,
                report.orphans_removed,
                report.score_gained,
                self.score
            );
        }
        report
    }

    fn add_score(&mut self, points: u32, report: &mut StabilizeReport) {
        self.score = self.score.saturating_add(points);
        report.score_gained = report.score_gained.saturating_add(points);
    }

    /// Lowest full row
    fn find_full_row(&self) -> Option<usize> {
        (0..self.height as usize).find(|&row| self.is_row_full(row))
    }

    /// Clear full rows, rescanning from the bottom after each clear
    fn clear_full_rows(&mut self, report: &mut StabilizeReport) -> u32 {
        let mut cleared = 0;
        while let Some(row) = self.find_full_row() {
            let start = self.idx(row, 0);
            let sum = self.cells[start..start + self.width as usize]
                .iter()
                .flatten()
                .fold(0u32, |acc, t| acc.saturating_add(t.value()));

            self.remove_row(row);
            self.add_score(sum, report);
            report.rows_cleared += 1;
            cleared += 1;
            trace!("cleared row {row} (+{sum})");
        }
        cleared
    }

    /// Remove a row; rows above shift down one and the top row becomes empty
    fn remove_row(&mut self, row: usize) {
        let width = self.width as usize;
        let start = row * width;
        // copy_within handles the overlapping ranges
        self.cells.copy_within(start + width.., start);
        let top = (self.height as usize - 1) * width;
        self.cells[top..].fill(None);
    }

    /// First vertically mergeable pair, scanning rows bottom-up, columns
    /// left-to-right. Returns the lower cell.
    fn find_merge(&self) -> Option<(usize, usize)> {
        for row in 0..(self.height as usize).saturating_sub(1) {
            for col in 0..self.width as usize {
                if let (Some(lower), Some(upper)) = (self.cell(row, col), self.cell(row + 1, col)) {
                    if lower.value() == upper.value() {
                        return Some((row, col));
                    }
                }
            }
        }
        None
    }

    /// Merge pairs until none remain, rescanning from the bottom after each
    fn merge_columns(&mut self, report: &mut StabilizeReport) -> u32 {
        let mut merges = 0;
        while let Some((row, col)) = self.find_merge() {
            let lower = self.idx(row, col);
            let Some(tile) = self.cells[lower].as_mut() else {
                break;
            };
            tile.double();
            let created = tile.value();

            self.collapse_column(row + 1, col);
            self.add_score(created, report);
            report.merges += 1;
            merges += 1;
            trace!("merged at ({row}, {col}) -> {created}");
        }
        merges
    }

    /// Drop the tile at (row, col) and shift everything above it down one
    fn collapse_column(&mut self, row: usize, col: usize) {
        let top = self.height as usize - 1;
        for r in row..top {
            let above = self.cell(r + 1, col);
            let idx = self.idx(r, col);
            self.cells[idx] = above;
        }
        let idx = self.idx(top, col);
        self.cells[idx] = None;
    }

    /// Remove interior tiles with four empty neighbours
    ///
    /// The outermost ring of rows and columns is never touched.
    fn remove_orphans(&mut self, report: &mut StabilizeReport) -> u32 {
        let mut removed = 0;
        let (h, w) = (self.height as usize, self.width as usize);
        for row in 1..h.saturating_sub(1) {
            for col in 1..w.saturating_sub(1) {
                let Some(tile) = self.cell(row, col) else {
                    continue;
                };
                let isolated = self.cell(row + 1, col).is_none()
                    && self.cell(row - 1, col).is_none()
                    && self.cell(row, col + 1).is_none()
                    && self.cell(row, col - 1).is_none();
                if isolated {
                    let idx = self.idx(row, col);
                    self.cells[idx] = None;
                    self.add_score(tile.value(), report);
                    report.orphans_removed += 1;
                    removed += 1;
                    trace!("removed orphan at ({row}, {col}) (+{})", tile.value());
                }
            }
        }
        removed
    }
}

impl fmt::Display for Grid {
    /// Top row first, `.` for empty cells
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..self.height as usize).rev() {
            for col in 0..self.width as usize {
                if col > 0 {
                    write!(f, " ")?;
                }
                match self.cell(row, col) {
                    Some(t) => write!(f, "{:>4}", t.value())?,
                    None => write!(f, "{:>4}", ".")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
