// SPDX-License-Identifier: MIT
//
// Fallback for targets without a terminal implementation. Every operation
// that needs the OS fails with `Error::Unsupported`, which the binary
// reports as a fatal setup error.

use super::{ByteSource, Platform};
use crate::error::{Error, Result};
use crate::terminal::Size;

/// Placeholder platform for non-unix targets.
pub struct UnsupportedTty;

impl UnsupportedTty {
    /// Create the placeholder. The timeout is accepted for API parity.
    #[must_use]
    pub const fn new(_read_timeout: std::time::Duration) -> Self {
        Self
    }
}

impl ByteSource for UnsupportedTty {
    fn read_byte(&mut self) -> Result<Option<u8>> {
        Err(Error::Unsupported)
    }
}

impl Platform for UnsupportedTty {
    fn enable_raw_mode(&mut self) -> Result<()> {
        Err(Error::Unsupported)
    }

    fn disable_raw_mode(&mut self) -> Result<()> {
        Ok(())
    }

    fn window_size(&self) -> Option<Size> {
        None
    }

    fn write_all(&mut self, _bytes: &[u8]) -> Result<()> {
        Err(Error::Unsupported)
    }
}
