//! Pieces module tests - numbered tetrominoes, spawning and SRS rotation

use std::collections::HashSet;

use tui_tetris2048::core::pieces::{box_size, get_kick_table, spawn_shape, try_rotate};
use tui_tetris2048::core::{Grid, SimpleRng, Tetromino, Tile};
use tui_tetris2048::types::{PieceKind, Rotation};

fn piece(kind: PieceKind, seed: u32) -> Tetromino {
    Tetromino::new(kind, &mut SimpleRng::new(seed))
}

fn cell_set(p: &Tetromino) -> HashSet<(i8, i8, u32)> {
    p.cells().iter().map(|&(r, c, t)| (r, c, t.value())).collect()
}

// ============== Shape Tests ==============

#[test]
fn test_box_sizes() {
    assert_eq!(box_size(PieceKind::I), 4);
    assert_eq!(box_size(PieceKind::O), 2);
    for kind in [PieceKind::T, PieceKind::S, PieceKind::Z, PieceKind::J, PieceKind::L] {
        assert_eq!(box_size(kind), 3);
    }
}

#[test]
fn test_spawn_shapes_fit_their_box() {
    for kind in PieceKind::ALL {
        let n = box_size(kind) as i8;
        for (dx, dy) in spawn_shape(kind) {
            assert!((0..n).contains(&dx) && (0..n).contains(&dy), "{kind:?}");
        }
    }
}

#[test]
fn test_new_piece_tiles_are_two_or_four() {
    for kind in PieceKind::ALL {
        let p = piece(kind, 9);
        assert_eq!(p.rotation, Rotation::North);
        for (_, _, tile) in p.cells() {
            assert!(tile == Tile::new(2) || tile == Tile::new(4));
        }
    }
}

#[test]
fn test_same_seed_same_piece() {
    assert_eq!(piece(PieceKind::J, 123), piece(PieceKind::J, 123));
}

// ============== Spawn Tests ==============

#[test]
fn test_spawn_is_centred_just_above_the_grid() {
    let grid = Grid::new(8, 12);

    let t = piece(PieceKind::T, 1).spawned(&grid);
    assert_eq!(t.col, 2);
    let rows: Vec<i8> = t.cells().iter().map(|c| c.0).collect();
    assert_eq!(*rows.iter().min().unwrap(), 12);
    assert_eq!(*rows.iter().max().unwrap(), 13);

    let i = piece(PieceKind::I, 1).spawned(&grid);
    let cols: Vec<i8> = i.cells().iter().map(|c| c.1).collect();
    assert_eq!(cols, vec![2, 3, 4, 5]);
    assert!(i.cells().iter().all(|c| c.0 == 12));

    let o = piece(PieceKind::O, 1).spawned(&grid);
    assert_eq!((o.col, o.row), (3, 12));
}

#[test]
fn test_spawned_piece_fits_even_over_a_full_top_row() {
    let mut grid = Grid::new(4, 4);
    for col in 0..4 {
        grid.set(3, col, Some(Tile::new(2 << col)));
    }
    let p = piece(PieceKind::Z, 4).spawned(&grid);
    assert!(p.fits(&grid));
    assert!(!p.moved(0, -1).fits(&grid));
}

// ============== Movement Tests ==============

#[test]
fn test_fits_respects_walls_and_floor() {
    let grid = Grid::new(8, 12);
    let t = piece(PieceKind::T, 1).landed(&grid);

    assert_eq!(t.cells().iter().map(|c| c.0).min(), Some(0));
    assert!(t.fits(&grid));
    assert!(!t.moved(0, -1).fits(&grid));

    let left = t.moved(-t.col, 0);
    assert!(left.fits(&grid));
    assert!(!left.moved(-1, 0).fits(&grid));
}

#[test]
fn test_landed_stops_on_locked_tiles() {
    let mut grid = Grid::new(8, 12);
    for row in 0..3 {
        grid.set(row, 3, Some(Tile::new(if row % 2 == 0 { 8 } else { 16 })));
    }
    let o = piece(PieceKind::O, 2).spawned(&grid).landed(&grid);
    // Left column of the O sits on the stack in column 3.
    assert_eq!((o.col, o.row), (3, 3));
}

// ============== Rotation Tests ==============

#[test]
fn test_rotated_keeps_values() {
    let t = piece(PieceKind::T, 17);
    let mut before: Vec<u32> = t.cells().iter().map(|c| c.2.value()).collect();
    let mut after: Vec<u32> = t.rotated(false).cells().iter().map(|c| c.2.value()).collect();
    before.sort_unstable();
    after.sort_unstable();
    assert_eq!(before, after);
}

#[test]
fn test_o_rotation_spins_numbers_clockwise() {
    let o = piece(PieceKind::O, 6);
    let cw = o.rotated(true);
    assert_eq!(cw.rotation, Rotation::East);
    // Top-left moves to top-right, bottom-left to top-left.
    assert_eq!(cw.tile_at(1, 1), o.tile_at(0, 1));
    assert_eq!(cw.tile_at(0, 1), o.tile_at(0, 0));
    assert_eq!(cw.tile_at(0, 0), o.tile_at(1, 0));
    assert_eq!(cw.tile_at(1, 0), o.tile_at(1, 1));
}

#[test]
fn test_o_piece_never_kicks() {
    assert!(get_kick_table(PieceKind::O)
        .iter()
        .all(|kicks| kicks.iter().all(|&k| k == (0, 0))));
}

#[test]
fn test_try_rotate_in_open_space_uses_no_kick() {
    let grid = Grid::new(8, 12);
    let t = piece(PieceKind::T, 1).spawned(&grid).moved(0, -5);
    let rotated = try_rotate(&t, true, |p| p.fits(&grid)).unwrap();
    assert_eq!(rotated, t.rotated(true));
}

#[test]
fn test_try_rotate_kicks_i_off_the_left_wall() {
    let grid = Grid::new(8, 12);
    // Vertical I hugging the left wall (box column 2 is board column 0).
    let east = piece(PieceKind::I, 1).rotated(true).moved(-2, 0);
    assert!(east.fits(&grid));

    let south = try_rotate(&east, true, |p| p.fits(&grid)).unwrap();
    assert_eq!(south.rotation, Rotation::South);
    assert_eq!((south.col, south.row), (0, 0));
    let cols: Vec<i8> = south.cells().iter().map(|c| c.1).collect();
    assert_eq!(cols, vec![0, 1, 2, 3]);
}

#[test]
fn test_try_rotate_fails_when_every_kick_fails() {
    let t = piece(PieceKind::T, 1);
    assert!(try_rotate(&t, false, |_| false).is_none());
}

// ============== Footprint Tests ==============

#[test]
fn test_min_bounded_trims_the_box() {
    let grid = Grid::new(8, 12);
    let t = piece(PieceKind::T, 3).spawned(&grid);
    let (matrix, anchor) = t.min_bounded();

    assert_eq!((matrix.rows(), matrix.cols()), (2, 3));
    assert_eq!(matrix.get(0, 0), None);
    assert!(matrix.get(0, 1).is_some());
    assert_eq!(matrix.get(0, 2), None);
    assert_eq!((anchor.col, anchor.row), (2, 12));

    let i_east = piece(PieceKind::I, 3).rotated(true);
    let (matrix, _) = i_east.min_bounded();
    assert_eq!((matrix.rows(), matrix.cols()), (4, 1));
}

#[test]
fn test_min_bounded_maps_back_to_cells() {
    let grid = Grid::new(8, 12);
    for kind in PieceKind::ALL {
        let mut p = piece(kind, 21).spawned(&grid);
        for _ in 0..4 {
            let (matrix, anchor) = p.min_bounded();
            let bottom = matrix.rows() as i8 - 1;
            let mapped: HashSet<(i8, i8, u32)> = matrix
                .iter()
                .map(|(r, c, t)| (anchor.row + bottom - r as i8, anchor.col + c as i8, t.value()))
                .collect();
            assert_eq!(mapped, cell_set(&p), "{kind:?} {:?}", p.rotation);
            p = p.rotated(true);
        }
    }
}
