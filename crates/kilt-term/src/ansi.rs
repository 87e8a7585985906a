// SPDX-License-Identifier: MIT
//
// ANSI escape sequence generation.
//
// Pure functions that write escape sequences to any `impl Write`. No state,
// no decisions about when to emit. This module only knows the byte-level
// encoding of the handful of terminal commands the editor needs: cursor
// visibility and placement, line and screen clearing, inverted video for
// the status bar, and the cursor-position probe used to measure the screen.
//
// All cursor positions are 0-indexed in our API and converted to 1-indexed
// for the terminal (ANSI standard uses 1-based coordinates).
//
// All functions return `io::Result` propagated from the underlying writer.
// In practice they never fail when writing to `OutputBuffer` (backed by a Vec).
use std::io::{self, Write};

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Move the cursor to `(x, y)` using the CUP (Cursor Position) sequence.
///
/// Our coordinates are 0-indexed; ANSI CUP is 1-indexed.
#[inline]
pub fn cursor_to(w: &mut impl Write, x: usize, y: usize) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", y + 1, x + 1)
}

/// Move the cursor to the top-left corner (CUP with no parameters).
#[inline]
pub fn cursor_home(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[H")
}

/// Hide the cursor (DECTCEM reset).
#[inline]
pub fn cursor_hide(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25l")
}

/// Show the cursor (DECTCEM set).
#[inline]
pub fn cursor_show(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25h")
}

/// Push the cursor as far right and down as the terminal allows.
///
/// CUF and CUD stop at the screen edge, so 999 of each lands the cursor in
/// the bottom-right cell regardless of the actual size.
#[inline]
pub fn cursor_to_far_corner(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[999C\x1b[999B")
}

/// Ask the terminal to report the cursor position (DSR 6).
///
/// The reply arrives on stdin as `ESC [ row ; col R`.
#[inline]
pub fn request_cursor_position(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[6n")
}

// ─── Screen ──────────────────────────────────────────────────────────────────

/// Clear the entire screen (ED 2).
#[inline]
pub fn clear_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[2J")
}

/// Clear from the cursor to the end of the line (EL 0).
#[inline]
pub fn clear_line(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[K")
}

// ─── Attributes ──────────────────────────────────────────────────────────────

/// Switch to inverted video (SGR 7). Used for the status bar.
#[inline]
pub fn invert(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[7m")
}

/// Reset all SGR attributes to terminal defaults.
#[inline]
pub fn reset(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[m")
}

// ─── Tests ───────────────────────────────────────────────────────────────────
