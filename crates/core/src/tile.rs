//! Tile module - numbered 2048 tiles and piece footprints
//!
//! A [`Tile`] is a plain value: a power of two, at least 2. Tiles have no
//! identity beyond the board cell that holds them, so they are `Copy`.
//!
//! A [`TileMatrix`] is the rectangular footprint of a locked piece, listed
//! top-to-bottom like it would be drawn, together with an [`Anchor`] giving
//! the board coordinates of its bottom-left corner.

use crate::rng::SimpleRng;
use crate::types::TILE_SPAWN_VALUES;

/// A numbered tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    value: u32,
}

impl Tile {
    /// Create a tile with the given value
    ///
    /// # Panics
    ///
    /// Panics if `value` is not a power of two greater than or equal to 2.
    pub fn new(value: u32) -> Self {
        assert!(
            value >= 2 && value.is_power_of_two(),
            "tile value must be a power of two >= 2, got {value}"
        );
        Self { value }
    }

    /// Create a tile holding 2 or 4, chosen uniformly from `rng`
    pub fn random(rng: &mut SimpleRng) -> Self {
        let idx = rng.next_range(TILE_SPAWN_VALUES.len() as u32) as usize;
        Self {
            value: TILE_SPAWN_VALUES[idx],
        }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    /// Double the value in place (merge)
    pub fn double(&mut self) {
        self.value = self.value.saturating_mul(2);
    }
}

/// Board coordinates of a footprint's bottom-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Anchor {
    pub col: i8,
    pub row: i8,
}

impl Anchor {
    pub fn new(col: i8, row: i8) -> Self {
        Self { col, row }
    }
}

/// Rectangular tile footprint, rows top-to-bottom, columns left-to-right
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileMatrix {
    rows: usize,
    cols: usize,
    cells: Vec<Option<Tile>>,
}

impl TileMatrix {
    /// Build from nested rows (top row first)
    ///
    /// # Panics
    ///
    /// Panics on an empty or ragged matrix.
    pub fn from_rows(rows: Vec<Vec<Option<Tile>>>) -> Self {
        assert!(!rows.is_empty(), "tile matrix needs at least one row");
        let cols = rows[0].len();
        assert!(cols > 0, "tile matrix needs at least one column");
        assert!(
            rows.iter().all(|r| r.len() == cols),
            "tile matrix must be rectangular"
        );

        let n_rows = rows.len();
        let cells = rows.into_iter().flatten().collect();
        Self {
            rows: n_rows,
            cols,
            cells,
        }
    }

    /// Build from tile values (top row first), `0` marking an empty cell
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_tetris2048_core::TileMatrix;
    ///
    /// // A T piece: three tiles on the bottom row, one on top.
    /// let m = TileMatrix::from_values(&[&[0, 4, 0], &[2, 2, 8]]);
    /// assert_eq!(m.rows(), 2);
    /// assert_eq!(m.cols(), 3);
    /// assert_eq!(m.tile_count(), 4);
    /// ```
    pub fn from_values(rows: &[&[u32]]) -> Self {
        Self::from_rows(
            rows.iter()
                .map(|r| {
                    r.iter()
                        .map(|&v| if v == 0 { None } else { Some(Tile::new(v)) })
                        .collect()
                })
                .collect(),
        )
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Cell at (row, col), row 0 being the top row of the matrix
    pub fn get(&self, row: usize, col: usize) -> Option<Tile> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells[row * self.cols + col]
    }

    /// Number of non-empty cells
    pub fn tile_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Iterate non-empty cells as `(row, col, tile)`, top row first
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Tile)> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(i, c)| c.map(|t| (i / cols, i % cols, t)))
    }

    /// Tile values row by row (top first), `0` for empty cells
    pub fn to_values(&self) -> Vec<Vec<u32>> {
        self.cells
            .chunks(self.cols)
            .map(|row| row.iter().map(|c| c.map_or(0, |t| t.value())).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_double() {
        let mut t = Tile::new(8);
        t.double();
        assert_eq!(t.value(), 16);
    }

    #[test]
    #[should_panic(expected = "power of two")]
    fn test_tile_rejects_non_power_of_two() {
        let _ = Tile::new(6);
    }

    #[test]
    #[should_panic(expected = "power of two")]
    fn test_tile_rejects_one() {
        let _ = Tile::new(1);
    }

    #[test]
    fn test_random_tiles_are_two_or_four_and_both_occur() {
        let mut rng = SimpleRng::new(7);
        let mut seen = [false; 2];
        for _ in 0..200 {
            match Tile::random(&mut rng).value() {
                2 => seen[0] = true,
                4 => seen[1] = true,
                v => panic!("unexpected spawn value {v}"),
            }
        }
        assert_eq!(seen, [true, true]);
    }

    #[test]
    fn test_random_tiles_deterministic_per_seed() {
        let mut a = SimpleRng::new(99);
        let mut b = SimpleRng::new(99);
        for _ in 0..50 {
            assert_eq!(Tile::random(&mut a), Tile::random(&mut b));
        }
    }

    #[test]
    fn test_matrix_iter_and_get() {
        let m = TileMatrix::from_values(&[&[2, 0], &[4, 8]]);
        assert_eq!(m.get(0, 0), Some(Tile::new(2)));
        assert_eq!(m.get(0, 1), None);
        assert_eq!(m.get(5, 5), None);

        let cells: Vec<_> = m.iter().map(|(r, c, t)| (r, c, t.value())).collect();
        assert_eq!(cells, vec![(0, 0, 2), (1, 0, 4), (1, 1, 8)]);
        assert_eq!(m.to_values(), vec![vec![2, 0], vec![4, 8]]);
    }

    #[test]
    #[should_panic(expected = "rectangular")]
    fn test_matrix_rejects_ragged_rows() {
        let _ = TileMatrix::from_values(&[&[2, 2], &[2]]);
    }
}
