// SPDX-License-Identifier: MIT
//
// Output buffering.
//
// A frame is built from dozens of fragments: cursor hide, home, one slice
// per text row, line clears, the inverted status bar, the message bar and
// the final cursor placement. Writing those one at a time lets the terminal
// paint half a frame, which shows up as tearing. `OutputBuffer` collects
// every fragment in memory so the whole frame goes out in one write call.

use std::io::{self, Write};

/// Default capacity: 16 KB, enough for most frames without reallocation.
const DEFAULT_CAPACITY: usize = 16_384;

/// A byte buffer that accumulates a frame for a single `write()` call.
pub struct OutputBuffer {
    buf: Vec<u8>,
}

impl OutputBuffer {
    /// Create an empty buffer with default capacity (16 KB).
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(DEFAULT_CAPACITY),
        }
    }

    /// Number of bytes accumulated.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the buffer is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The accumulated bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Append raw bytes (text content, already-encoded sequences).
    #[inline]
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Clear the buffer for reuse (keeps allocated capacity).
    #[inline]
    pub fn clear(&mut self) {
        self.buf.clear();
    }
}

impl Write for OutputBuffer {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // No-op: the frame is handed to the terminal as a whole.
        Ok(())
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
