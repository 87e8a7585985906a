//! View: scroll offsets for the text area.
//!
//! A `View` knows how big the text area is and which buffer row and
//! rendered column sit at its top-left corner. [`View::scroll`] runs once
//! per frame: it recomputes the cursor's rendered column and nudges the
//! offsets just enough to bring the cursor back inside the window. After
//! it returns,
//!
//! ```text
//! row_offset <= cy < row_offset + screen_rows
//! col_offset <= rx < col_offset + screen_cols
//! ```
//!
//! The view doesn't own the buffer or cursor; both are passed in.

use crate::buffer::Buffer;
use crate::column::cx_to_rx;
use crate::cursor::Cursor;

/// Scroll state plus the size of the text area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct View {
    /// First buffer row on screen.
    pub row_offset: usize,
    /// First rendered column on screen.
    pub col_offset: usize,
    /// Text rows (status and message bars excluded).
    pub screen_rows: usize,
    pub screen_cols: usize,
    rx: usize,
}

impl View {
    /// A view at the top-left. Sizes are clamped to at least 1.
    #[must_use]
    pub fn new(screen_rows: usize, screen_cols: usize) -> Self {
        Self {
            row_offset: 0,
            col_offset: 0,
            screen_rows: screen_rows.max(1),
            screen_cols: screen_cols.max(1),
            rx: 0,
        }
    }

    /// Change the text-area size. Offsets are fixed up by the next
    /// [`scroll`](Self::scroll).
    pub fn resize(&mut self, screen_rows: usize, screen_cols: usize) {
        self.screen_rows = screen_rows.max(1);
        self.screen_cols = screen_cols.max(1);
    }

    /// The cursor's rendered column as of the last [`scroll`](Self::scroll).
    #[inline]
    #[must_use]
    pub const fn rx(&self) -> usize {
        self.rx
    }

    /// Recompute `rx` and move the offsets so the cursor is visible.
    pub fn scroll(&mut self, cursor: Cursor, buf: &Buffer) {
        self.rx = buf
            .line(cursor.cy)
            .map_or(0, |line| cx_to_rx(line.chars(), cursor.cx, buf.tab_stop()));

        if cursor.cy < self.row_offset {
            self.row_offset = cursor.cy;
        }
        if cursor.cy >= self.row_offset + self.screen_rows {
            self.row_offset = cursor.cy + 1 - self.screen_rows;
        }
        if self.rx < self.col_offset {
            self.col_offset = self.rx;
        }
        if self.rx >= self.col_offset + self.screen_cols {
            self.col_offset = self.rx + 1 - self.screen_cols;
        }
    }

    /// Put the top of the window past the last line, so the next
    /// [`scroll`](Self::scroll) brings the cursor's line to the bottom of
    /// the screen.
    pub fn scroll_to_end(&mut self, buf: &Buffer) {
        self.row_offset = buf.line_count();
    }
}
