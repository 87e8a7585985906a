//! Cursor: a logical position in the buffer and its motions.
//!
//! `cy` ranges over `[0, line_count]`; `cy == line_count` is the virtual
//! line just past the end of the file, where typing starts a new line.
//! `cx` ranges over `[0, len]` of the line under the cursor (0 on the
//! virtual line). Every motion ends with [`Cursor::clamp`], so both bounds
//! hold after any move.

use crate::buffer::Buffer;
use crate::line::Line;

// ---------------------------------------------------------------------------
// Cursor
// ---------------------------------------------------------------------------

/// A logical cursor: line `cy`, byte column `cx`, both 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Cursor {
    pub cx: usize,
    pub cy: usize,
}

/// A single-step cursor motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Up,
    Down,
    /// Wraps to the end of the previous line at column 0.
    Left,
    /// Wraps to the start of the next line at end of line.
    Right,
    Home,
    End,
}

impl Cursor {
    /// The origin.
    pub const ZERO: Self = Self { cx: 0, cy: 0 };

    /// Create a cursor at `(cy, cx)`.
    #[inline]
    #[must_use]
    pub const fn new(cy: usize, cx: usize) -> Self {
        Self { cx, cy }
    }

    /// Move one step, then clamp to the buffer.
    pub fn apply(&mut self, motion: Motion, buf: &Buffer) {
        let len = buf.line(self.cy).map(Line::len);
        match motion {
            Motion::Up => self.cy = self.cy.saturating_sub(1),
            Motion::Down => {
                if self.cy < buf.line_count() {
                    self.cy += 1;
                }
            }
            Motion::Left => {
                if self.cx > 0 {
                    self.cx -= 1;
                } else if self.cy > 0 {
                    self.cy -= 1;
                    self.cx = buf.line(self.cy).map_or(0, Line::len);
                }
            }
            Motion::Right => match len {
                Some(len) if self.cx < len => self.cx += 1,
                Some(_) => {
                    self.cy += 1;
                    self.cx = 0;
                }
                None => {}
            },
            Motion::Home => self.cx = 0,
            Motion::End => {
                if let Some(len) = len {
                    self.cx = len;
                }
            }
        }
        self.clamp(buf);
    }

    /// Pull `cy` back to at most `line_count` and `cx` back to at most the
    /// length of the line under the cursor.
    pub fn clamp(&mut self, buf: &Buffer) {
        self.cy = self.cy.min(buf.line_count());
        let len = buf.line(self.cy).map_or(0, Line::len);
        self.cx = self.cx.min(len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn buf(lines: &[&str]) -> Buffer {
        let mut b = Buffer::new(8);
        for (i, l) in lines.iter().enumerate() {
            b.insert_line(i, l.as_bytes());
        }
        b
    }

    fn moved(lines: &[&str], from: Cursor, motion: Motion) -> Cursor {
        let b = buf(lines);
        let mut c = from;
        c.apply(motion, &b);
        c
    }

    // -- Vertical -----------------------------------------------------------

    #[test]
    fn up_stops_at_top() {
        assert_eq!(moved(&["a"], Cursor::ZERO, Motion::Up), Cursor::ZERO);
    }

    #[test]
    fn down_reaches_virtual_line_and_stops() {
        let lines = ["a", "b"];
        assert_eq!(
            moved(&lines, Cursor::new(1, 0), Motion::Down),
            Cursor::new(2, 0)
        );
        assert_eq!(
            moved(&lines, Cursor::new(2, 0), Motion::Down),
            Cursor::new(2, 0)
        );
    }

    #[test]
    fn vertical_motion_clamps_column() {
        let lines = ["long line", "ab"];
        assert_eq!(
            moved(&lines, Cursor::new(0, 7), Motion::Down),
            Cursor::new(1, 2)
        );
        assert_eq!(
            moved(&lines, Cursor::new(1, 2), Motion::Down),
            Cursor::new(2, 0)
        );
    }

    // -- Horizontal ---------------------------------------------------------

    #[test]
    fn left_wraps_to_previous_line_end() {
        assert_eq!(
            moved(&["abc", "d"], Cursor::new(1, 0), Motion::Left),
            Cursor::new(0, 3)
        );
    }

    #[test]
    fn left_at_origin_is_noop() {
        assert_eq!(moved(&["abc"], Cursor::ZERO, Motion::Left), Cursor::ZERO);
    }

    #[test]
    fn right_wraps_to_next_line_start() {
        assert_eq!(
            moved(&["abc", "d"], Cursor::new(0, 3), Motion::Right),
            Cursor::new(1, 0)
        );
    }

    #[test]
    fn right_on_virtual_line_is_noop() {
        assert_eq!(
            moved(&["abc"], Cursor::new(1, 0), Motion::Right),
            Cursor::new(1, 0)
        );
    }

    #[test]
    fn home_and_end() {
        assert_eq!(
            moved(&["abc"], Cursor::new(0, 1), Motion::End),
            Cursor::new(0, 3)
        );
        assert_eq!(
            moved(&["abc"], Cursor::new(0, 3), Motion::Home),
            Cursor::new(0, 0)
        );
        assert_eq!(
            moved(&["abc"], Cursor::new(1, 0), Motion::End),
            Cursor::new(1, 0)
        );
    }

    // -- Clamp --------------------------------------------------------------

    #[test]
    fn clamp_pulls_into_bounds() {
        let b = buf(&["ab"]);
        let mut c = Cursor::new(9, 9);
        c.clamp(&b);
        assert_eq!(c, Cursor::new(1, 0));

        let mut c = Cursor::new(0, 9);
        c.clamp(&b);
        assert_eq!(c, Cursor::new(0, 2));
    }
}
