// SPDX-License-Identifier: MIT
//
// Platform capabilities: the OS-facing half of the terminal session.
//
// The editor needs exactly five things from the operating system: switch
// the input device into raw mode, put it back, ask for the window size,
// read one byte with a short timeout, and write a block of bytes. Those
// are the `Platform` trait. Each target OS gets one implementation; the
// rest of the crate (size probe, decoder, event loop) is written against
// the trait and never calls the OS directly.

use std::sync::atomic::AtomicBool;
use std::time::Duration;

use crate::error::Result;
use crate::terminal::Size;

#[cfg(unix)]
mod unix;
#[cfg(unix)]
pub use unix::UnixTty;

#[cfg(not(unix))]
mod unsupported;
#[cfg(not(unix))]
pub use unsupported::UnsupportedTty;

#[cfg(test)]
pub(crate) mod scripted;

/// The platform implementation for the current target.
#[cfg(unix)]
pub type NativeTty = UnixTty;

/// The platform implementation for the current target.
#[cfg(not(unix))]
pub type NativeTty = UnsupportedTty;

/// A source of raw input bytes with a bounded wait.
///
/// `Ok(None)` means the read timeout elapsed with nothing available. That
/// is not an error: the decoder relies on it to tell a bare Escape key from
/// the start of an escape sequence.
pub trait ByteSource {
    /// Read a single byte, waiting at most the source's read timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying read fails for any reason other
    /// than the timeout.
    fn read_byte(&mut self) -> Result<Option<u8>>;
}

/// Operating-system terminal control.
///
/// Implementations must make `disable_raw_mode` restore exactly the
/// configuration that was in place before `enable_raw_mode`, and must make
/// both calls idempotent.
pub trait Platform: ByteSource {
    /// Disable echo, canonical line buffering, signal keys and output
    /// post-processing, and set the read timeout. Saves the prior state.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal attributes cannot be read or set.
    fn enable_raw_mode(&mut self) -> Result<()>;

    /// Restore the configuration saved by [`enable_raw_mode`](Self::enable_raw_mode).
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal attributes cannot be set.
    fn disable_raw_mode(&mut self) -> Result<()>;

    /// Ask the OS for the window size.
    ///
    /// Returns `None` if the query fails or reports zero columns; the
    /// caller then falls back to the cursor probe.
    fn window_size(&self) -> Option<Size>;

    /// Write all bytes to the terminal and flush.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn write_all(&mut self, bytes: &[u8]) -> Result<()>;
}

/// Convert a read timeout to termios `VTIME` units (tenths of a second).
///
/// Clamped to `1..=255`: zero would make reads spin and `VTIME` is a byte.
#[must_use]
pub fn timeout_deciseconds(timeout: Duration) -> u8 {
    let ds = timeout.as_millis().div_ceil(100);
    u8::try_from(ds.clamp(1, 255)).unwrap_or(u8::MAX)
}

/// Set when the window is resized; the event loop swaps it back to false.
pub(crate) static RESIZED: AtomicBool = AtomicBool::new(false);

/// Arrange for window resizes to set [`RESIZED`]. A no-op where the OS
/// gives us no resize notification.
pub(crate) fn install_resize_handler() {
    #[cfg(unix)]
    unix::install_resize_handler();
}

/// Best-effort terminal restore for panic paths.
///
/// Writes `restore` straight to the output descriptor and puts back the
/// saved terminal attributes, without touching any Rust-side locks.
pub(crate) fn emergency_restore(restore: &[u8]) {
    #[cfg(unix)]
    unix::emergency_restore(restore);

    #[cfg(not(unix))]
    {
        use std::io::Write;
        let mut stdout = std::io::stdout();
        let _ = stdout.write_all(restore);
        let _ = stdout.flush();
    }
}
