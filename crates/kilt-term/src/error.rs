// SPDX-License-Identifier: MIT
//
// Terminal errors.
//
// Everything in here is fatal to an editing session: if we cannot switch
// modes, read a byte, or work out how big the screen is, there is no way
// to keep drawing. The binary restores the screen, prints the error and
// exits non-zero.

use std::io;

/// A fatal terminal-control failure.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A termios, ioctl, read or write call failed.
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),

    /// Raw mode was requested but stdin is not a terminal.
    #[error("stdin is not a terminal")]
    NotATty,

    /// Neither the window-size ioctl nor the cursor probe produced a size.
    #[error("could not determine the terminal size")]
    WindowSize,

    /// No platform implementation exists for this target.
    #[error("terminal control is not supported on this platform")]
    Unsupported,
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
