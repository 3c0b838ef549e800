//! GameView: maps a `core::GameSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use std::fmt::Write as _;

use arrayvec::ArrayString;

use crate::core::GameSnapshot;
use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};

/// Empty play area and grid lines.
const EMPTY_BG: Rgb = Rgb::new(0, 0, 58);
const GRID_LINE: Rgb = Rgb::new(0, 100, 200);
const PANEL_BG: Rgb = Rgb::new(0, 0, 0);

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// Background and number colours for a tile value
///
/// Values past 2048 share one dark style.
pub fn tile_colors(value: u32) -> (Rgb, Rgb) {
    let light = Rgb::new(248, 240, 232);
    let blue = Rgb::new(0, 100, 200);
    match value {
        2 => (Rgb::new(238, 228, 218), blue),
        4 => (Rgb::new(238, 225, 201), blue),
        8 => (Rgb::new(243, 178, 122), light),
        16 => (Rgb::new(246, 150, 100), light),
        32 => (Rgb::new(247, 124, 95), light),
        64 => (Rgb::new(246, 94, 59), light),
        128 => (Rgb::new(237, 207, 114), light),
        256 => (Rgb::new(237, 204, 97), light),
        512 => (Rgb::new(237, 200, 80), light),
        1024 => (Rgb::new(237, 197, 63), light),
        2048 => (Rgb::new(237, 194, 46), light),
        _ => (Rgb::new(60, 58, 50), light),
    }
}

/// Text drawn on a tile; 10000 and above is shown in units of 1024 ("16k")
pub fn tile_label(value: u32) -> ArrayString<8> {
    let mut s = ArrayString::new();
    // At most 7 digits plus 'k', so the write cannot overflow.
    let _ = if value >= 10_000 {
        write!(s, "{}k", value / 1024)
    } else {
        write!(s, "{value}")
    };
    s
}

/// A lightweight terminal renderer for the Tetris 2048 game.
pub struct GameView {
    /// Grid cell width in terminal columns.
    cell_w: u16,
    /// Grid cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        // Wide enough for "2048" with a column of padding either side.
        Self {
            cell_w: 6,
            cell_h: 1,
            anchor_y: AnchorY::Center,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Render a snapshot into an existing framebuffer.
    ///
    /// Callers can reuse a framebuffer across frames; it is resized to the
    /// viewport and fully repainted.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(Cell::blank(CellStyle::new(PANEL_BG, PANEL_BG)));

        let board_px_w = snap.width as u16 * self.cell_w;
        let board_px_h = snap.height as u16 * self.cell_h;
        let frame_w = board_px_w + 2;
        let frame_h = board_px_h + 2;

        let start_x = viewport.width.saturating_sub(frame_w + self.panel_width(snap)) / 2;
        let start_y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(frame_h) / 2,
            AnchorY::Top => 0,
        };
        let origin = (start_x + 1, start_y + 1);

        self.draw_border(
            fb,
            start_x,
            start_y,
            frame_w,
            frame_h,
            CellStyle::new(GRID_LINE, PANEL_BG),
        );

        // Locked tiles and empty cells.
        for row in 0..snap.height as i8 {
            for col in 0..snap.width as i8 {
                let (px, py) = self.cell_origin(snap, origin, row, col);
                match snap.value_at(row, col) {
                    0 => fb.fill_rect(
                        px,
                        py,
                        self.cell_w,
                        self.cell_h,
                        '·',
                        CellStyle::new(GRID_LINE, EMPTY_BG).dim(),
                    ),
                    v => self.draw_tile(fb, px, py, v),
                }
            }
        }

        // Ghost only while the piece can still be moved, then the active
        // piece over it.
        for cell in snap.ghost.iter().filter(|_| snap.playable()) {
            if self.on_board(snap, cell.row, cell.col) {
                let (px, py) = self.cell_origin(snap, origin, cell.row, cell.col);
                let (bg, _) = tile_colors(cell.value);
                fb.fill_rect(
                    px,
                    py,
                    self.cell_w,
                    self.cell_h,
                    '░',
                    CellStyle::new(bg, EMPTY_BG).dim(),
                );
            }
        }
        for cell in snap.active.iter() {
            if self.on_board(snap, cell.row, cell.col) {
                let (px, py) = self.cell_origin(snap, origin, cell.row, cell.col);
                self.draw_tile(fb, px, py, cell.value);
            }
        }

        self.draw_side_panel(fb, snap, viewport, start_x + frame_w + 2, start_y);

        if snap.game_over {
            self.draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, "GAME OVER");
            self.draw_overlay_text(fb, start_x, start_y + 1, frame_w, frame_h, "R to restart");
        } else if snap.paused {
            self.draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, "PAUSED");
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn panel_width(&self, snap: &GameSnapshot) -> u16 {
        let next_w = snap.next.first().map_or(0, |r| r.len() as u16) * self.cell_w;
        2 + next_w.max(10)
    }

    fn on_board(&self, snap: &GameSnapshot, row: i8, col: i8) -> bool {
        row >= 0 && col >= 0 && (row as u8) < snap.height && (col as u8) < snap.width
    }

    /// Screen position of a grid cell; grid row 0 is drawn at the bottom.
    fn cell_origin(&self, snap: &GameSnapshot, origin: (u16, u16), row: i8, col: i8) -> (u16, u16) {
        let screen_row = snap.height as u16 - 1 - row as u16;
        (
            origin.0 + col as u16 * self.cell_w,
            origin.1 + screen_row * self.cell_h,
        )
    }

    /// Fill one cell-sized block with a tile's colour and centre its number.
    fn draw_tile(&self, fb: &mut FrameBuffer, px: u16, py: u16, value: u32) {
        let (bg, fg) = tile_colors(value);
        let style = CellStyle::new(fg, bg).bold();
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ' ', style);

        let label = tile_label(value);
        let len = label.len() as u16;
        if len > self.cell_w {
            return;
        }
        let x = px + (self.cell_w - len) / 2;
        let y = py + (self.cell_h - 1) / 2;
        fb.put_str(x, y, &label, style);
    }

    fn draw_border(&self, fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
        if w < 2 || h < 2 {
            return;
        }

        fb.put_char(x, y, '┌', style);
        fb.put_char(x + w - 1, y, '┐', style);
        fb.put_char(x, y + h - 1, '└', style);
        fb.put_char(x + w - 1, y + h - 1, '┘', style);

        for dx in 1..w - 1 {
            fb.put_char(x + dx, y, '─', style);
            fb.put_char(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put_char(x, y + dy, '│', style);
            fb.put_char(x + w - 1, y + dy, '│', style);
        }
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        viewport: Viewport,
        panel_x: u16,
        start_y: u16,
    ) {
        if panel_x >= viewport.width {
            return;
        }

        let label = CellStyle::new(Rgb::new(220, 220, 220), PANEL_BG).bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);

        let mut y = start_y;
        fb.put_str(panel_x, y, "SCORE", label);
        y = y.saturating_add(1);
        fb.put_u32(panel_x, y, snap.score, value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "NEXT", label);
        y = y.saturating_add(1);
        for row in snap.next.iter() {
            for (i, &v) in row.iter().enumerate() {
                if v != 0 {
                    self.draw_tile(fb, panel_x + i as u16 * self.cell_w, y, v);
                }
            }
            y = y.saturating_add(self.cell_h);
        }
        y = y.saturating_add(1);

        fb.put_str(panel_x, y, "PIECES", label);
        y = y.saturating_add(1);
        fb.put_u32(panel_x, y, snap.pieces_locked, value);
        y = y.saturating_add(2);

        if y < viewport.height {
            fb.put_str(panel_x, y, "EPISODE", label);
            fb.put_u32(panel_x + 8, y, snap.episode_id, value);
        }
    }

    fn draw_overlay_text(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
        frame_h: u16,
        text: &str,
    ) {
        let mid_y = start_y.saturating_add(frame_h / 2);
        let text_w = text.chars().count() as u16;
        let x = start_x.saturating_add(frame_w.saturating_sub(text_w) / 2);
        let style = CellStyle::new(Rgb::new(255, 255, 255), Rgb::new(194, 24, 27)).bold();
        fb.put_str(x, mid_y, text, style);
    }
}
