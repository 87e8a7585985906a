// SPDX-License-Identifier: MIT
//
// In-memory platform for tests: input is a queue of reads (a `None` entry
// plays the part of a read timeout) and every write lands in `output`.

use std::collections::VecDeque;

use super::{ByteSource, Platform};
use crate::error::{Error, Result};
use crate::terminal::Size;

impl ByteSource for VecDeque<u8> {
    fn read_byte(&mut self) -> Result<Option<u8>> {
        Ok(self.pop_front())
    }
}

/// A fake terminal driven by a script of reads.
#[derive(Default)]
pub(crate) struct ScriptedTty {
    /// Queued reads. `Some(b)` delivers a byte, `None` is one timeout.
    pub input: VecDeque<Option<u8>>,
    /// Everything written to the terminal, in order.
    pub output: Vec<u8>,
    /// What the window-size query reports.
    pub size: Option<Size>,
    /// Whether raw mode is currently on.
    pub raw: bool,
    /// How many times raw mode was enabled.
    pub raw_enables: usize,
    /// Fail the read once the script runs out (instead of timing out).
    pub fail_when_drained: bool,
}

impl ScriptedTty {
    pub fn with_size(cols: u16, rows: u16) -> Self {
        Self {
            size: Some(Size { cols, rows }),
            ..Self::default()
        }
    }

    /// Queue bytes to be read back-to-back.
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.input.extend(bytes.iter().copied().map(Some));
    }

    /// Queue a read timeout.
    pub fn push_timeout(&mut self) {
        self.input.push_back(None);
    }
}

impl ByteSource for ScriptedTty {
    fn read_byte(&mut self) -> Result<Option<u8>> {
        match self.input.pop_front() {
            Some(read) => Ok(read),
            None if self.fail_when_drained => Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "script exhausted",
            ))),
            None => Ok(None),
        }
    }
}

impl Platform for ScriptedTty {
    fn enable_raw_mode(&mut self) -> Result<()> {
        if !self.raw {
            self.raw = true;
            self.raw_enables += 1;
        }
        Ok(())
    }

    fn disable_raw_mode(&mut self) -> Result<()> {
        self.raw = false;
        Ok(())
    }

    fn window_size(&self) -> Option<Size> {
        self.size
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        self.output.extend_from_slice(bytes);
        Ok(())
    }
}
