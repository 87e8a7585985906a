// SPDX-License-Identifier: MIT
//
// Terminal session: raw mode acquisition, size query, and RAII cleanup.
//
// `Terminal` wraps a `Platform` and turns its primitives into the session
// contract the editor relies on:
//
// - `enter()` switches to raw mode once and installs a panic hook;
//   `leave()` clears the screen, homes the cursor and restores the saved
//   mode. `Drop` calls `leave()`, so every exit path (normal quit, an
//   error propagated out of the loop, a panic) ends with a usable shell.
//
// - `query_size()` asks the OS first. When that fails or reports zero
//   columns, it pushes the cursor to the bottom-right corner, asks for a
//   cursor position report, and parses the `ESC [ rows ; cols R` reply.
//   If neither works the session cannot continue.
//
// The panic hook writes a fixed restore sequence straight to fd 1 and
// reapplies the saved termios before the default hook prints, so the panic
// message lands on a working terminal.

use std::sync::Once;
use std::time::Duration;

use tracing::{debug, warn};

use crate::ansi;
use crate::error::{Error, Result};
use crate::platform::{ByteSource, NativeTty, Platform};

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    /// Number of columns (width in character cells).
    pub cols: u16,
    /// Number of rows (height in character cells).
    pub rows: u16,
}

/// Longest cursor-position reply we are willing to read.
const CURSOR_REPORT_MAX: usize = 32;

/// Parse a cursor position report: `ESC [ rows ; cols` with an optional
/// trailing `R`.
///
/// Returns `None` if the introducer is missing, either number is absent or
/// zero, or anything other than the optional `R` follows the columns.
#[must_use]
pub fn parse_cursor_report(reply: &[u8]) -> Option<Size> {
    let body = reply.strip_prefix(b"\x1b[")?;
    let body = body.strip_suffix(b"R").unwrap_or(body);

    let (rows, rest) = parse_u16(body)?;
    let rest = rest.strip_prefix(b";")?;
    let (cols, rest) = parse_u16(rest)?;

    if !rest.is_empty() || rows == 0 || cols == 0 {
        return None;
    }
    Some(Size { cols, rows })
}

/// Parse a run of ASCII digits. `None` if there are no digits.
fn parse_u16(buf: &[u8]) -> Option<(u16, &[u8])> {
    let digits = buf.iter().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    let mut val: u16 = 0;
    for &b in &buf[..digits] {
        val = val.saturating_mul(10).saturating_add(u16::from(b - b'0'));
    }
    Some((val, &buf[digits..]))
}

// ─── Panic-Safe Terminal Restore ────────────────────────────────────────────

/// Restore sequence for emergency use: reset attributes, show the cursor,
/// clear the screen and home the cursor.
#[rustfmt::skip]
const EMERGENCY_RESTORE: &[u8] = b"\
    \x1b[m\
    \x1b[?25h\
    \x1b[2J\
    \x1b[H";

/// Panic hook guard: the hook is installed at most once per process.
static PANIC_HOOK_INSTALLED: Once = Once::new();

fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            crate::platform::emergency_restore(EMERGENCY_RESTORE);
            original(info);
        }));
    });
}

// ─── Terminal ───────────────────────────────────────────────────────────────

/// Terminal session with RAII cleanup.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use kilt_term::terminal::Terminal;
///
/// let mut term = Terminal::native(Duration::from_millis(100));
/// term.enter()?;
/// let size = term.query_size()?;
/// // ... read keys, write frames ...
/// // Screen cleared and mode restored automatically on drop.
/// # Ok::<(), kilt_term::Error>(())
/// ```
pub struct Terminal<P: Platform = NativeTty> {
    platform: P,
    /// Whether raw mode is currently held.
    active: bool,
}

impl Terminal<NativeTty> {
    /// A session on the process's controlling terminal.
    #[must_use]
    pub fn native(read_timeout: Duration) -> Self {
        Self::new(NativeTty::new(read_timeout))
    }
}

impl<P: Platform> Terminal<P> {
    /// Wrap a platform. Does **not** enter raw mode.
    pub const fn new(platform: P) -> Self {
        Self {
            platform,
            active: false,
        }
    }

    /// Whether raw mode is currently held.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Enter raw mode. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal attributes cannot be changed.
    pub fn enter(&mut self) -> Result<()> {
        if self.active {
            return Ok(());
        }
        install_panic_hook();
        self.platform.enable_raw_mode()?;
        self.active = true;
        Ok(())
    }

    /// Clear the screen, home the cursor and restore the original mode.
    /// Idempotent.
    ///
    /// The mode is restored even when the clear fails; the first error
    /// encountered is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the clear write or the mode restore fails.
    pub fn leave(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        let mut restore = Vec::with_capacity(EMERGENCY_RESTORE.len());
        ansi::clear_screen(&mut restore)?;
        ansi::cursor_home(&mut restore)?;
        ansi::cursor_show(&mut restore)?;
        let cleared = self.platform.write_all(&restore);
        let restored = self.platform.disable_raw_mode();
        self.active = false;
        cleared.and(restored)
    }

    /// Determine the window size, falling back to the cursor probe.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WindowSize`] when neither method yields a size, or
    /// an I/O error if the probe cannot be written or its reply read.
    pub fn query_size(&mut self) -> Result<Size> {
        if let Some(size) = self.platform.window_size() {
            return Ok(size);
        }

        debug!("window size query failed; probing cursor position");
        let mut probe = Vec::new();
        ansi::cursor_to_far_corner(&mut probe)?;
        ansi::request_cursor_position(&mut probe)?;
        self.platform.write_all(&probe)?;

        let mut reply = Vec::with_capacity(CURSOR_REPORT_MAX);
        while reply.len() < CURSOR_REPORT_MAX - 1 {
            match self.platform.read_byte()? {
                Some(b'R') | None => break,
                Some(b) => reply.push(b),
            }
        }

        parse_cursor_report(&reply).ok_or_else(|| {
            warn!(reply = ?String::from_utf8_lossy(&reply), "unusable cursor position report");
            Error::WindowSize
        })
    }

    /// Write one complete frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn write_frame(&mut self, frame: &[u8]) -> Result<()> {
        self.platform.write_all(frame)
    }

    /// The wrapped platform.
    pub const fn platform(&self) -> &P {
        &self.platform
    }

    /// The wrapped platform, mutably.
    pub const fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }
}

impl<P: Platform> ByteSource for Terminal<P> {
    fn read_byte(&mut self) -> Result<Option<u8>> {
        self.platform.read_byte()
    }
}

impl<P: Platform> Drop for Terminal<P> {
    fn drop(&mut self) {
        if self.active {
            let _ = self.leave();
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
