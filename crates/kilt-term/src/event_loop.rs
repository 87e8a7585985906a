// SPDX-License-Identifier: MIT
//
// Event loop: one key in, one frame out.
//
// The loop is strictly sequential: paint the whole screen into an
// `OutputBuffer` and write it in one call, then wait for the next key,
// hand it to the application, repeat. There is no background reader and
// no diffing; every key produces a full redraw.
//
// # Timeouts
//
// The platform read gives up after a short timeout (100ms by default).
// That timeout does double duty. Mid-sequence, it turns a pending ESC into
// the Escape key. When idle, it lets the loop look at the resize flag and
// give the application a tick, so a status message that expires gets
// cleared without waiting for a key.
//
// # SIGWINCH
//
// The resize handler only sets an `AtomicBool`. The loop swaps it back on
// every iteration, re-queries the size, and redraws.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, warn};

use crate::error::Result;
use crate::input::{Decoder, KeyEvent};
use crate::output::OutputBuffer;
use crate::platform::{self, NativeTty, Platform};
use crate::terminal::{Size, Terminal};

// ─── App Trait ───────────────────────────────────────────────────────────────

/// What the application tells the event loop to do after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Keep going.
    Continue,
    /// Leave the loop and restore the terminal.
    Quit,
}

/// Application interface for the event loop.
///
/// The loop calls [`on_resize`](App::on_resize) once with the initial size
/// before the first [`paint`](App::paint), then alternates painting and
/// [`on_key`](App::on_key).
pub trait App {
    /// Handle one decoded key.
    ///
    /// Return [`Action::Quit`] to exit the event loop.
    fn on_key(&mut self, key: KeyEvent) -> Action;

    /// The terminal now has `size` cells.
    fn on_resize(&mut self, _size: Size) {}

    /// Called whenever a read times out with nothing pending.
    ///
    /// Return `true` if the screen needs repainting.
    fn on_tick(&mut self) -> bool {
        false
    }

    /// Paint the complete screen into `out`.
    ///
    /// `out` is empty on entry. Whatever it holds afterwards is written to
    /// the terminal in a single call.
    fn paint(&mut self, out: &mut OutputBuffer);
}

// ─── EventLoop ───────────────────────────────────────────────────────────────

/// The terminal event loop.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use kilt_term::event_loop::{Action, App, EventLoop};
/// use kilt_term::input::KeyEvent;
/// use kilt_term::output::OutputBuffer;
///
/// struct QuitOnCtrlQ;
///
/// impl App for QuitOnCtrlQ {
///     fn on_key(&mut self, key: KeyEvent) -> Action {
///         if key.is_ctrl(b'q') { Action::Quit } else { Action::Continue }
///     }
///
///     fn paint(&mut self, out: &mut OutputBuffer) {
///         out.push_bytes(b"\x1b[H~");
///     }
/// }
///
/// EventLoop::native(Duration::from_millis(100)).run(&mut QuitOnCtrlQ)?;
/// # Ok::<(), kilt_term::Error>(())
/// ```
pub struct EventLoop<P: Platform = NativeTty> {
    terminal: Terminal<P>,
    decoder: Decoder,
    frame: OutputBuffer,
    resized: &'static AtomicBool,
}

impl EventLoop<NativeTty> {
    /// An event loop on the controlling terminal.
    #[must_use]
    pub fn native(read_timeout: std::time::Duration) -> Self {
        Self::new(Terminal::native(read_timeout))
    }
}

impl<P: Platform> EventLoop<P> {
    /// Drive `terminal`. Raw mode is not entered until [`run`](Self::run).
    pub fn new(terminal: Terminal<P>) -> Self {
        Self {
            terminal,
            decoder: Decoder::new(),
            frame: OutputBuffer::new(),
            resized: &platform::RESIZED,
        }
    }

    /// The terminal being driven.
    pub const fn terminal(&self) -> &Terminal<P> {
        &self.terminal
    }

    /// Run until the application returns [`Action::Quit`] or an error
    /// occurs.
    ///
    /// Enters raw mode, queries the window size, and on the way out
    /// clears the screen and restores the terminal, whatever the outcome.
    ///
    /// # Errors
    ///
    /// Returns an error if raw mode cannot be entered, the window size is
    /// unknown, or a terminal read or write fails.
    pub fn run(&mut self, app: &mut impl App) -> Result<()> {
        self.terminal.enter()?;
        platform::install_resize_handler();

        let result = self.run_inner(app);
        let left = self.terminal.leave();

        result.and(left)
    }

    fn run_inner(&mut self, app: &mut impl App) -> Result<()> {
        let size = self.terminal.query_size()?;
        debug!(cols = size.cols, rows = size.rows, "terminal size");
        app.on_resize(size);

        let mut dirty = true;
        loop {
            if dirty {
                self.frame.clear();
                app.paint(&mut self.frame);
                self.terminal.write_frame(self.frame.as_bytes())?;
                dirty = false;
            }

            match self.decoder.poll_key(&mut self.terminal)? {
                Some(key) => {
                    if app.on_key(key) == Action::Quit {
                        return Ok(());
                    }
                    dirty = true;
                }
                None => {
                    if app.on_tick() {
                        dirty = true;
                    }
                }
            }

            if self.resized.swap(false, Ordering::Relaxed) {
                match self.terminal.query_size() {
                    Ok(size) => {
                        debug!(cols = size.cols, rows = size.rows, "terminal resized");
                        app.on_resize(size);
                        dirty = true;
                    }
                    Err(err) => warn!(%err, "size query after resize failed"),
                }
            }
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
