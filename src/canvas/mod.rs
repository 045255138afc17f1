//! Canvas module
//!
//! A fixed-width grid of cells that only grows downward, plus the cursor
//! the decoders write through.

use crate::color::{Color, DEFAULT_BG, DEFAULT_FG};

/// Width used when a canvas is requested with width 0
pub const DEFAULT_WIDTH: usize = 80;

/// Rows a canvas may grow to. Cursor moves past the last row stop on it.
pub const MAX_ROWS: usize = 20_000;

/// A single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub c: char,
    pub fg: Color,
    pub bg: Color,
    /// Bold / heavy glyph rendering
    pub weight: bool,
    /// Foreground uses the high half of the 16-color palette
    pub intensity: bool,
    /// Background uses the high half of the 16-color palette ("ice color")
    pub bg_intensity: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            c: ' ',
            fg: DEFAULT_FG,
            bg: DEFAULT_BG,
            weight: false,
            intensity: false,
            bg_intensity: false,
        }
    }
}

impl Cell {
    /// True if the cell carries nothing visible: a space on the default background
    pub fn is_blank(&self) -> bool {
        self.c == ' ' && self.bg == DEFAULT_BG
    }

    /// Drawing attributes of this cell, without the character
    pub fn attrs(&self) -> Attrs {
        Attrs {
            fg: self.fg,
            bg: self.bg,
            weight: self.weight,
            intensity: self.intensity,
            bg_intensity: self.bg_intensity,
        }
    }
}

/// Drawing attributes a decoder carries between cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attrs {
    pub fg: Color,
    pub bg: Color,
    pub weight: bool,
    pub intensity: bool,
    pub bg_intensity: bool,
}

impl Default for Attrs {
    fn default() -> Self {
        Cell::default().attrs()
    }
}

impl Attrs {
    pub fn cell(&self, c: char) -> Cell {
        Cell {
            c,
            fg: self.fg,
            bg: self.bg,
            weight: self.weight,
            intensity: self.intensity,
            bg_intensity: self.bg_intensity,
        }
    }
}

/// Cursor position, 0-based
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub row: usize,
    pub col: usize,
}

/// Inclusive bounding rectangle of canvas content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min_row: usize,
    pub max_row: usize,
    pub min_col: usize,
    pub max_col: usize,
}

impl Bounds {
    pub fn rows(&self) -> usize {
        self.max_row - self.min_row + 1
    }

    pub fn cols(&self) -> usize {
        self.max_col - self.min_col + 1
    }
}

/// Grid of cells with a cursor
#[derive(Debug, Clone)]
pub struct Canvas {
    grid: Vec<Vec<Cell>>,
    width: usize,
    cursor: Cursor,
    /// Saved cursor position (SCOSC/SCORC)
    saved_cursor: Cursor,
}

impl Canvas {
    pub fn new(width: usize) -> Self {
        let width = if width == 0 { DEFAULT_WIDTH } else { width };
        Self {
            grid: vec![vec![Cell::default(); width]],
            width,
            cursor: Cursor::default(),
            saved_cursor: Cursor::default(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows currently allocated
    pub fn height(&self) -> usize {
        self.grid.len()
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.grid.get(row).and_then(|r| r.get(col))
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.grid.iter().map(Vec::as_slice)
    }

    fn clamp_row(row: usize) -> usize {
        row.min(MAX_ROWS - 1)
    }

    /// Append default rows until `row` exists
    fn ensure_row(&mut self, row: usize) {
        while self.grid.len() <= row {
            self.grid.push(vec![Cell::default(); self.width]);
        }
    }

    /// Write a character at the cursor and advance, wrapping at the right edge
    pub fn set_cell(
        &mut self,
        c: char,
        fg: Color,
        bg: Color,
        weight: bool,
        intensity: bool,
        bg_intensity: bool,
    ) {
        self.ensure_row(self.cursor.row);
        self.grid[self.cursor.row][self.cursor.col] = Cell {
            c,
            fg,
            bg,
            weight,
            intensity,
            bg_intensity,
        };

        self.cursor.col += 1;
        if self.cursor.col >= self.width {
            self.new_line();
        }
    }

    /// `set_cell` with a decoder's current attributes
    pub fn put_char(&mut self, c: char, attrs: &Attrs) {
        self.set_cell(c, attrs.fg, attrs.bg, attrs.weight, attrs.intensity, attrs.bg_intensity);
    }

    /// Move to column 0 of the next row
    pub fn new_line(&mut self) {
        self.cursor.col = 0;
        self.cursor.row = Self::clamp_row(self.cursor.row + 1);
        self.ensure_row(self.cursor.row);
    }

    pub fn carriage_return(&mut self) {
        self.cursor.col = 0;
    }

    /// Absolute move, 1-based coordinates
    pub fn move_to(&mut self, row: usize, col: usize) {
        let row = Self::clamp_row(row.saturating_sub(1));
        self.ensure_row(row);
        self.cursor.row = row;
        self.cursor.col = col.saturating_sub(1).min(self.width - 1);
    }

    pub fn move_up(&mut self, n: usize) {
        self.cursor.row = self.cursor.row.saturating_sub(n);
    }

    pub fn move_down(&mut self, n: usize) {
        self.cursor.row = Self::clamp_row(self.cursor.row.saturating_add(n));
        self.ensure_row(self.cursor.row);
    }

    pub fn move_forward(&mut self, n: usize) {
        self.cursor.col = self.cursor.col.saturating_add(n).min(self.width - 1);
    }

    pub fn move_backward(&mut self, n: usize) {
        self.cursor.col = self.cursor.col.saturating_sub(n);
    }

    pub fn save_cursor(&mut self) {
        self.saved_cursor = self.cursor;
    }

    pub fn restore_cursor(&mut self) {
        self.cursor = self.saved_cursor;
        self.cursor.row = Self::clamp_row(self.cursor.row);
        self.ensure_row(self.cursor.row);
    }

    /// Fill every existing cell with `fill` (as a space) and home the cursor
    pub fn clear_all(&mut self, fill: Cell) {
        let fill = Cell { c: ' ', ..fill };
        for row in &mut self.grid {
            row.fill(fill);
        }
        self.cursor = Cursor::default();
    }

    /// Smallest rectangle containing every non-blank cell, `None` if all blank
    pub fn content_bounds(&self) -> Option<Bounds> {
        let mut bounds: Option<Bounds> = None;

        for (r, row) in self.grid.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                if cell.is_blank() {
                    continue;
                }
                bounds = Some(match bounds {
                    None => Bounds {
                        min_row: r,
                        max_row: r,
                        min_col: c,
                        max_col: c,
                    },
                    Some(b) => Bounds {
                        min_row: b.min_row.min(r),
                        max_row: b.max_row.max(r),
                        min_col: b.min_col.min(c),
                        max_col: b.max_col.max(c),
                    },
                });
            }
        }

        bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ANSI_PALETTE;

    fn put(canvas: &mut Canvas, c: char) {
        canvas.set_cell(c, DEFAULT_FG, DEFAULT_BG, false, false, false);
    }

    fn assert_cursor_valid(canvas: &Canvas) {
        let cursor = canvas.cursor();
        assert!(cursor.col < canvas.width());
        assert!(canvas.height() > cursor.row);
        assert!(canvas.rows().all(|r| r.len() == canvas.width()));
    }

    #[test]
    fn test_canvas_creation() {
        let canvas = Canvas::new(80);
        assert_eq!(canvas.width(), 80);
        assert_eq!(canvas.height(), 1);
        assert_eq!(canvas.cursor(), Cursor { row: 0, col: 0 });
        assert_eq!(canvas.cell(0, 0), Some(&Cell::default()));

        let canvas = Canvas::new(0);
        assert_eq!(canvas.width(), DEFAULT_WIDTH);
    }

    #[test]
    fn test_set_cell() {
        let mut canvas = Canvas::new(80);
        canvas.set_cell('A', ANSI_PALETTE[1], ANSI_PALETTE[4], true, true, false);
        let cell = canvas.cell(0, 0).unwrap();
        assert_eq!(cell.c, 'A');
        assert_eq!(cell.fg, ANSI_PALETTE[1]);
        assert_eq!(cell.bg, ANSI_PALETTE[4]);
        assert!(cell.weight);
        assert!(cell.intensity);
        assert!(!cell.bg_intensity);
        assert_eq!(canvas.cursor().col, 1);
    }

    #[test]
    fn test_auto_wrap_appends_row() {
        let mut canvas = Canvas::new(3);
        for c in "abc".chars() {
            put(&mut canvas, c);
        }
        assert_eq!(canvas.cursor(), Cursor { row: 1, col: 0 });
        assert_eq!(canvas.height(), 2);
        put(&mut canvas, 'd');
        assert_eq!(canvas.cell(1, 0).unwrap().c, 'd');
        assert_cursor_valid(&canvas);
    }

    #[test]
    fn test_width_one_canvas() {
        let mut canvas = Canvas::new(1);
        put(&mut canvas, 'x');
        put(&mut canvas, 'y');
        assert_eq!(canvas.cell(0, 0).unwrap().c, 'x');
        assert_eq!(canvas.cell(1, 0).unwrap().c, 'y');
        assert_eq!(canvas.cursor(), Cursor { row: 2, col: 0 });
        assert_cursor_valid(&canvas);
    }

    #[test]
    fn test_new_line() {
        let mut canvas = Canvas::new(80);
        put(&mut canvas, 'a');
        canvas.new_line();
        assert_eq!(canvas.cursor(), Cursor { row: 1, col: 0 });
        assert_eq!(canvas.height(), 2);
    }

    #[test]
    fn test_move_to_clamps_and_grows() {
        let mut canvas = Canvas::new(10);
        canvas.move_to(5, 50);
        assert_eq!(canvas.cursor(), Cursor { row: 4, col: 9 });
        assert_eq!(canvas.height(), 5);

        canvas.move_to(0, 0);
        assert_eq!(canvas.cursor(), Cursor { row: 0, col: 0 });
        // Never shrinks
        assert_eq!(canvas.height(), 5);
        assert_cursor_valid(&canvas);
    }

    #[test]
    fn test_rows_stop_at_limit() {
        let mut canvas = Canvas::new(4);
        canvas.move_down(usize::MAX);
        assert_eq!(canvas.cursor().row, MAX_ROWS - 1);
        assert_eq!(canvas.height(), MAX_ROWS);

        canvas.new_line();
        assert_eq!(canvas.cursor(), Cursor { row: MAX_ROWS - 1, col: 0 });
        for c in "abcdef".chars() {
            put(&mut canvas, c);
        }
        assert_eq!(canvas.height(), MAX_ROWS);
        assert_eq!(canvas.cell(MAX_ROWS - 1, 0).unwrap().c, 'e');

        canvas.move_to(usize::MAX, 1);
        assert_eq!(canvas.cursor().row, MAX_ROWS - 1);
        assert_cursor_valid(&canvas);
    }

    #[test]
    fn test_relative_moves_clamp() {
        let mut canvas = Canvas::new(10);
        canvas.move_up(3);
        assert_eq!(canvas.cursor().row, 0);
        canvas.move_backward(3);
        assert_eq!(canvas.cursor().col, 0);
        canvas.move_forward(100);
        assert_eq!(canvas.cursor().col, 9);
        canvas.move_down(3);
        assert_eq!(canvas.cursor().row, 3);
        assert_eq!(canvas.height(), 4);
        canvas.move_up(1);
        assert_eq!(canvas.cursor().row, 2);
        assert_cursor_valid(&canvas);
    }

    #[test]
    fn test_saved_cursor_is_a_snapshot() {
        let mut canvas = Canvas::new(10);
        canvas.move_to(2, 3);
        canvas.save_cursor();
        canvas.move_to(7, 8);
        put(&mut canvas, 'z');
        canvas.restore_cursor();
        assert_eq!(canvas.cursor(), Cursor { row: 1, col: 2 });
    }

    #[test]
    fn test_clear_all() {
        let mut canvas = Canvas::new(4);
        for c in "abcdef".chars() {
            put(&mut canvas, c);
        }
        let fill = Cell {
            c: 'X',
            bg: ANSI_PALETTE[4],
            ..Cell::default()
        };
        canvas.clear_all(fill);
        assert_eq!(canvas.height(), 2);
        assert_eq!(canvas.cursor(), Cursor::default());
        for row in canvas.rows() {
            for cell in row {
                assert_eq!(cell.c, ' ');
                assert_eq!(cell.bg, ANSI_PALETTE[4]);
            }
        }
    }

    #[test]
    fn test_content_bounds() {
        let mut canvas = Canvas::new(10);
        assert_eq!(canvas.content_bounds(), None);

        canvas.move_to(2, 3);
        put(&mut canvas, 'a');
        canvas.move_to(4, 6);
        // A space with a non-default background counts as content
        canvas.set_cell(' ', DEFAULT_FG, ANSI_PALETTE[2], false, false, false);

        let bounds = canvas.content_bounds().unwrap();
        assert_eq!(
            bounds,
            Bounds {
                min_row: 1,
                max_row: 3,
                min_col: 2,
                max_col: 5,
            }
        );
        assert_eq!(bounds.rows(), 3);
        assert_eq!(bounds.cols(), 4);
    }

    #[test]
    fn test_content_bounds_ignores_plain_spaces() {
        let mut canvas = Canvas::new(10);
        for _ in 0..25 {
            put(&mut canvas, ' ');
        }
        assert_eq!(canvas.content_bounds(), None);
    }
}
