//! Pieces module - numbered tetrominoes and SRS rotation
//!
//! A [`Tetromino`] keeps its four tiles in a square box (4x4 for I, 2x2 for
//! O, 3x3 otherwise). Rotating turns the box, so every number travels with
//! its cell. Wall kicks follow the Standard Rotation System.
//! Reference: https://tetris.wiki/SRS
//!
//! Inside the box, `(lx, ly)` has `ly = 0` on the **bottom** row, matching
//! the grid. A piece's `(row, col)` is the board cell of the box's
//! bottom-left corner.

use arrayvec::ArrayVec;

use crate::grid::Grid;
use crate::rng::SimpleRng;
use crate::tile::{Anchor, Tile, TileMatrix};
use crate::types::{PieceKind, Rotation};

/// Offset of a single mino from the top-left of its box, y pointing down
pub type MinoOffset = (i8, i8);

/// Shape of a piece - 4 mino offsets
pub type PieceShape = [MinoOffset; 4];

/// Largest box side (the I piece)
const MAX_BOX: usize = 4;

/// Side of the square box a piece kind rotates in
pub fn box_size(kind: PieceKind) -> u8 {
    match kind {
        PieceKind::I => 4,
        PieceKind::O => 2,
        _ => 3,
    }
}

/// Spawn (North) shape for a piece kind, drawn top-down
pub fn spawn_shape(kind: PieceKind) -> PieceShape {
    match kind {
        // Horizontal, on the second row of the 4x4 box
        PieceKind::I => [(0, 1), (1, 1), (2, 1), (3, 1)],
        PieceKind::O => [(0, 0), (1, 0), (0, 1), (1, 1)],
        PieceKind::T => [(1, 0), (0, 1), (1, 1), (2, 1)],
        PieceKind::S => [(1, 0), (2, 0), (0, 1), (1, 1)],
        PieceKind::Z => [(0, 0), (1, 0), (1, 1), (2, 1)],
        PieceKind::J => [(0, 0), (0, 1), (1, 1), (2, 1)],
        PieceKind::L => [(2, 0), (0, 1), (1, 1), (2, 1)],
    }
}

/// SRS wall kick data
/// Each entry is (dx, dy) with dy pointing **up**, tried in order
pub type KickTable = [[(i8, i8); 5]; 8];

/// Get kick table for a piece kind
/// Returns table indexed by [`get_kick_index`]
pub fn get_kick_table(kind: PieceKind) -> &'static KickTable {
    match kind {
        PieceKind::O => &O_KICKS,
        PieceKind::I => &I_KICKS,
        _ => &JLSTZ_KICKS,
    }
}

/// O piece spins in place (its numbers move) but never kicks
const O_KICKS: KickTable = [[(0, 0); 5]; 8];

/// JLSTZ kick table (shared by J, L, S, T, Z)
const JLSTZ_KICKS: KickTable = [
    // 0->1 (N->E, clockwise)
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    // 0->3 (N->W, counter-clockwise)
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    // 1->0 (E->N, counter-clockwise)
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    // 1->2 (E->S, clockwise)
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    // 2->1 (S->E, counter-clockwise)
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    // 2->3 (S->W, clockwise)
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    // 3->2 (W->S, counter-clockwise)
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    // 3->0 (W->N, clockwise)
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
];

/// I piece kick table (different from JLSTZ)
const I_KICKS: KickTable = [
    // 0->1 (N->E)
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    // 0->3 (N->W)
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
    // 1->0 (E->N)
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    // 1->2 (E->S)
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
    // 2->1 (S->E)
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
    // 2->3 (S->W)
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    // 3->2 (W->S)
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    // 3->0 (W->N)
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
];

/// Get the kick index for a rotation transition
fn get_kick_index(from: Rotation, clockwise: bool) -> usize {
    match (from, clockwise) {
        (Rotation::North, true) => 0,  // N->E
        (Rotation::North, false) => 1, // N->W
        (Rotation::East, false) => 2,  // E->N
        (Rotation::East, true) => 3,   // E->S
        (Rotation::South, false) => 4, // S->E
        (Rotation::South, true) => 5,  // S->W
        (Rotation::West, false) => 6,  // W->S
        (Rotation::West, true) => 7,   // W->N
    }
}

/// Whether a piece cell may sit at (row, col)
///
/// Columns must be on the board and rows not below it; rows above the top
/// are free so an entering piece can straddle the boundary.
pub fn can_occupy(grid: &Grid, row: i8, col: i8) -> bool {
    col >= 0 && (col as u8) < grid.width() && row >= 0 && !grid.is_occupied(row, col)
}

/// Active falling piece made of numbered tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tetromino {
    pub kind: PieceKind,
    pub rotation: Rotation,
    /// Board column of the box's left edge
    pub col: i8,
    /// Board row of the box's bottom edge
    pub row: i8,
    size: u8,
    /// `tiles[ly][lx]`, `ly = 0` at the bottom of the box
    tiles: [[Option<Tile>; MAX_BOX]; MAX_BOX],
}

impl Tetromino {
    /// Create a piece in spawn orientation with random tile values
    ///
    /// The box starts at (0, 0); use [`Tetromino::spawned`] to place it.
    pub fn new(kind: PieceKind, rng: &mut SimpleRng) -> Self {
        let size = box_size(kind);
        let mut tiles = [[None; MAX_BOX]; MAX_BOX];
        for &(dx, dy) in spawn_shape(kind).iter() {
            let ly = (size as i8 - 1 - dy) as usize;
            tiles[ly][dx as usize] = Some(Tile::random(rng));
        }
        Self {
            kind,
            rotation: Rotation::North,
            col: 0,
            row: 0,
            size,
            tiles,
        }
    }

    /// Box side length
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Tile at a box position, `ly = 0` being the bottom row
    pub fn tile_at(&self, lx: usize, ly: usize) -> Option<Tile> {
        if lx >= self.size as usize || ly >= self.size as usize {
            return None;
        }
        self.tiles[ly][lx]
    }

    /// Occupied cells in board coordinates as `(row, col, tile)`
    pub fn cells(&self) -> ArrayVec<(i8, i8, Tile), 4> {
        let mut out = ArrayVec::new();
        let n = self.size as usize;
        for ly in 0..n {
            for lx in 0..n {
                if let Some(t) = self.tiles[ly][lx] {
                    out.push((self.row + ly as i8, self.col + lx as i8, t));
                }
            }
        }
        out
    }

    /// Check if every cell is at a free position on the grid
    pub fn fits(&self, grid: &Grid) -> bool {
        self.cells()
            .iter()
            .all(|&(row, col, _)| can_occupy(grid, row, col))
    }

    /// Same piece shifted by (dcol, drow), rows counting up
    pub fn moved(&self, dcol: i8, drow: i8) -> Self {
        Self {
            col: self.col + dcol,
            row: self.row + drow,
            ..*self
        }
    }

    /// Same piece with its box turned 90°, without any kick
    pub fn rotated(&self, clockwise: bool) -> Self {
        let n = self.size as usize;
        let mut tiles = [[None; MAX_BOX]; MAX_BOX];
        for ly in 0..n {
            for lx in 0..n {
                let (nx, ny) = if clockwise {
                    (ly, n - 1 - lx)
                } else {
                    (n - 1 - ly, lx)
                };
                tiles[ny][nx] = self.tiles[ly][lx];
            }
        }
        Self {
            rotation: if clockwise {
                self.rotation.rotate_cw()
            } else {
                self.rotation.rotate_ccw()
            },
            tiles,
            ..*self
        }
    }

    /// Lowest and highest occupied box rows, leftmost and rightmost columns
    fn bounds(&self) -> (usize, usize, usize, usize) {
        let n = self.size as usize;
        let (mut min_x, mut max_x, mut min_y, mut max_y) = (n, 0, n, 0);
        for ly in 0..n {
            for lx in 0..n {
                if self.tiles[ly][lx].is_some() {
                    min_x = min_x.min(lx);
                    max_x = max_x.max(lx);
                    min_y = min_y.min(ly);
                    max_y = max_y.max(ly);
                }
            }
        }
        (min_x, max_x, min_y, max_y)
    }

    /// Place the piece horizontally centred with its lowest tile one row
    /// above the top of the grid
    pub fn spawned(&self, grid: &Grid) -> Self {
        let (_, _, min_y, _) = self.bounds();
        Self {
            col: (grid.width().saturating_sub(self.size) / 2) as i8,
            row: grid.height() as i8 - min_y as i8,
            ..*self
        }
    }

    /// The piece moved down as far as it fits
    pub fn landed(&self, grid: &Grid) -> Self {
        let mut piece = *self;
        loop {
            let next = piece.moved(0, -1);
            if !next.fits(grid) {
                return piece;
            }
            piece = next;
        }
    }

    /// Footprint trimmed of empty border rows/columns, and its anchor
    ///
    /// This is exactly what [`Grid::commit`] consumes at lock time.
    pub fn min_bounded(&self) -> (TileMatrix, Anchor) {
        let (min_x, max_x, min_y, max_y) = self.bounds();
        let rows = (min_y..=max_y)
            .rev()
            .map(|ly| (min_x..=max_x).map(|lx| self.tiles[ly][lx]).collect())
            .collect();
        let anchor = Anchor::new(self.col + min_x as i8, self.row + min_y as i8);
        (TileMatrix::from_rows(rows), anchor)
    }
}

/// Try to rotate a piece with wall kicks
///
/// `fits` decides whether a candidate position is free. Returns the first
/// kicked candidate that fits, or `None` if every kick fails.
pub fn try_rotate(
    piece: &Tetromino,
    clockwise: bool,
    fits: impl Fn(&Tetromino) -> bool,
) -> Option<Tetromino> {
    let rotated = piece.rotated(clockwise);
    let kicks = &get_kick_table(piece.kind)[get_kick_index(piece.rotation, clockwise)];

    kicks
        .iter()
        .map(|&(dx, dy)| rotated.moved(dx, dy))
        .find(|candidate| fits(candidate))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn piece(kind: PieceKind) -> Tetromino {
        Tetromino::new(kind, &mut SimpleRng::new(5))
    }

    fn box_offsets(p: &Tetromino) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for ly in 0..p.size() as usize {
            for lx in 0..p.size() as usize {
                if p.tile_at(lx, ly).is_some() {
                    out.push((lx, ly));
                }
            }
        }
        out
    }

    #[test]
    fn test_every_kind_has_four_tiles() {
        for kind in PieceKind::ALL {
            assert_eq!(piece(kind).cells().len(), 4, "{:?}", kind);
        }
    }

    #[test]
    fn test_t_north_points_up() {
        // Nub on the top row of the 3x3 box, bar on the middle row.
        assert_eq!(
            box_offsets(&piece(PieceKind::T)),
            vec![(0, 1), (1, 1), (2, 1), (1, 2)]
        );
    }

    #[test]
    fn test_t_rotated_cw_matches_srs_east() {
        let east = piece(PieceKind::T).rotated(true);
        assert_eq!(east.rotation, Rotation::East);
        // Vertical bar in the middle column, nub to the right.
        assert_eq!(box_offsets(&east), vec![(1, 0), (1, 1), (2, 1), (1, 2)]);
    }

    #[test]
    fn test_i_rotations_follow_srs_columns() {
        let north = piece(PieceKind::I);
        let east = north.rotated(true);
        assert!(box_offsets(&east).iter().all(|&(lx, _)| lx == 2));
        let west = north.rotated(false);
        assert!(box_offsets(&west).iter().all(|&(lx, _)| lx == 1));
    }

    #[test]
    fn test_four_rotations_restore_piece() {
        for kind in PieceKind::ALL {
            let p = piece(kind);
            let back = p.rotated(true).rotated(true).rotated(true).rotated(true);
            assert_eq!(back, p);
            assert_eq!(p.rotated(true).rotated(false), p);
        }
    }

    #[test]
    fn test_rotation_carries_tile_values() {
        let p = piece(PieceKind::L);
        let mut before: Vec<u32> = p.cells().iter().map(|c| c.2.value()).collect();
        let mut after: Vec<u32> = p.rotated(true).cells().iter().map(|c| c.2.value()).collect();
        before.sort_unstable();
        after.sort_unstable();
        assert_eq!(before, after);
    }

    #[test]
    fn test_kick_index_is_unique_per_transition() {
        let mut seen = Vec::new();
        for rot in [Rotation::North, Rotation::East, Rotation::South, Rotation::West] {
            for cw in [true, false] {
                let idx = get_kick_index(rot, cw);
                assert!(!seen.contains(&idx));
                seen.push(idx);
            }
        }
        assert_eq!(seen.len(), 8);
    }
}
