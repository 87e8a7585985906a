//! Frame composition.
//!
//! One call to [`render_frame`] produces every byte of a screen update:
//!
//! ```text
//! ESC[?25l ESC[H                      hide cursor, home
//! <text row> ESC[K \r\n   × rows      buffer slice, `~`, or the banner
//! ESC[7m <status> ESC[m \r\n          inverted status bar
//! ESC[K <message>                     message bar
//! ESC[y;xH ESC[?25h                   place and show the cursor
//! ```
//!
//! The bytes are accumulated in an [`OutputBuffer`] so the caller can send
//! them in a single write. Each row clears its own tail instead of
//! clearing the whole screen up front, which avoids a visible blank frame.

use std::io::{self, Write};
use std::time::Instant;

use kilt_term::ansi;
use kilt_term::output::OutputBuffer;

use crate::buffer::Buffer;
use crate::cursor::Cursor;
use crate::message::StatusMessage;
use crate::view::View;

/// Placeholder shown in the status bar when there is no file name.
pub const NO_NAME: &str = "[No Name]";

/// Longest file name shown in the status bar.
const STATUS_NAME_MAX: usize = 20;

/// The banner shown on an empty buffer.
#[must_use]
pub fn welcome_text() -> String {
    format!("Kilt editor -- version {}", env!("CARGO_PKG_VERSION"))
}

/// Compose a full frame into `out`.
///
/// Scrolls `view` first so the cursor is on screen.
///
/// # Errors
///
/// Only if writing into `out` fails, which an [`OutputBuffer`] never does.
pub fn render_frame(
    out: &mut OutputBuffer,
    buf: &Buffer,
    view: &mut View,
    cursor: Cursor,
    message: &StatusMessage,
    now: Instant,
) -> io::Result<()> {
    view.scroll(cursor, buf);

    ansi::cursor_hide(out)?;
    ansi::cursor_home(out)?;
    draw_rows(out, buf, view)?;
    draw_status_bar(out, buf, cursor, view.screen_cols)?;
    draw_message_bar(out, message.visible_text(now), view.screen_cols)?;
    ansi::cursor_to(
        out,
        view.rx().saturating_sub(view.col_offset),
        cursor.cy.saturating_sub(view.row_offset),
    )?;
    ansi::cursor_show(out)
}

/// The text area: one line per screen row, each cleared to the right.
///
/// # Errors
///
/// Returns an error if writing to `w` fails.
pub fn draw_rows(w: &mut impl Write, buf: &Buffer, view: &View) -> io::Result<()> {
    let cols = view.screen_cols;
    for y in 0..view.screen_rows {
        if let Some(line) = buf.line(y + view.row_offset) {
            let render = line.render();
            let start = view.col_offset.min(render.len());
            let end = (view.col_offset + cols).min(render.len());
            w.write_all(&render[start..end])?;
        } else if buf.is_empty() && y == view.screen_rows / 3 {
            draw_welcome(w, cols)?;
        } else {
            w.write_all(b"~")?;
        }
        ansi::clear_line(w)?;
        w.write_all(b"\r\n")?;
    }
    Ok(())
}

fn draw_welcome(w: &mut impl Write, cols: usize) -> io::Result<()> {
    let text = welcome_text();
    let text = &text.as_bytes()[..text.len().min(cols)];
    let mut padding = (cols - text.len()) / 2;
    if padding > 0 {
        w.write_all(b"~")?;
        padding -= 1;
    }
    w.write_all(&b" ".repeat(padding))?;
    w.write_all(text)
}

/// The inverted status bar: name, line count and modified flag on the
/// left, `row/total` right-aligned.
///
/// # Errors
///
/// Returns an error if writing to `w` fails.
pub fn draw_status_bar(
    w: &mut impl Write,
    buf: &Buffer,
    cursor: Cursor,
    cols: usize,
) -> io::Result<()> {
    let name = buf
        .path()
        .map_or_else(|| NO_NAME.to_string(), |p| p.display().to_string());
    let name: String = name.chars().take(STATUS_NAME_MAX).collect();
    let modified = if buf.is_dirty() { " (modified)" } else { "" };
    let left = format!("{name} - {} lines{modified}", buf.line_count());
    let right = format!("{}/{}", cursor.cy + 1, buf.line_count());

    ansi::invert(w)?;
    let left = &left.as_bytes()[..left.len().min(cols)];
    w.write_all(left)?;
    let gap = cols - left.len();
    if gap >= right.len() {
        w.write_all(&b" ".repeat(gap - right.len()))?;
        w.write_all(right.as_bytes())?;
    } else {
        w.write_all(&b" ".repeat(gap))?;
    }
    ansi::reset(w)?;
    w.write_all(b"\r\n")
}

/// The message bar: cleared, then `text` cut to the screen width.
///
/// # Errors
///
/// Returns an error if writing to `w` fails.
pub fn draw_message_bar(w: &mut impl Write, text: Option<&str>, cols: usize) -> io::Result<()> {
    ansi::clear_line(w)?;
    if let Some(text) = text {
        let bytes = text.as_bytes();
        w.write_all(&bytes[..bytes.len().min(cols)])?;
    }
    Ok(())
}
