//! Text buffer: the ordered lines of the document.
//!
//! A `Buffer` owns a `Vec<Line>`, the tab stop used to render them, the
//! file it came from (if any), and a modification counter. Every editing
//! operation bumps the counter; loading and a successful save put it back
//! to 0. Nothing else touches it.
//!
//! # Coordinates
//!
//! Editing operations take the cursor they act at and return where the
//! cursor ends up, so the caller never has to recompute it. A cursor on
//! the virtual line (`cy == line_count()`) is valid input: inserting a
//! character there first appends an empty line.
//!
//! # Persistence
//!
//! The file format is plain bytes, one `\n` after every line. Loading
//! strips any trailing `\n`/`\r` bytes from each physical line. Saving
//! truncates the target to the exact new length and writes the whole
//! content in place, with no temp file.

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::cursor::Cursor;
use crate::line::Line;

// ---------------------------------------------------------------------------
// Buffer
// ---------------------------------------------------------------------------

/// The document being edited.
#[derive(Debug, Clone)]
pub struct Buffer {
    lines: Vec<Line>,
    tab_stop: usize,
    path: Option<PathBuf>,
    dirty: u64,
}

impl Buffer {
    // -- Construction -------------------------------------------------------

    /// An empty, clean buffer with no file.
    #[must_use]
    pub fn new(tab_stop: usize) -> Self {
        Self {
            lines: Vec::new(),
            tab_stop: tab_stop.max(1),
            path: None,
            dirty: 0,
        }
    }

    /// Read lines from `reader`. The result is clean.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails.
    pub fn from_reader(mut reader: impl BufRead, tab_stop: usize) -> io::Result<Self> {
        let mut buf = Self::new(tab_stop);
        let mut raw = Vec::new();
        loop {
            raw.clear();
            if reader.read_until(b'\n', &mut raw)? == 0 {
                break;
            }
            while matches!(raw.last(), Some(b'\n' | b'\r')) {
                raw.pop();
            }
            buf.insert_line(buf.line_count(), &raw);
        }
        buf.dirty = 0;
        Ok(buf)
    }

    /// Load the file at `path` and remember it as the save target.
    ///
    /// A file that does not exist yet gives an empty buffer with the path
    /// set, so the first save creates it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn open(path: &Path, tab_stop: usize) -> io::Result<Self> {
        let mut buf = match File::open(path) {
            Ok(file) => Self::from_reader(BufReader::new(file), tab_stop)?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "new file");
                Self::new(tab_stop)
            }
            Err(err) => return Err(err),
        };
        buf.path = Some(path.to_path_buf());
        info!(path = %path.display(), lines = buf.line_count(), "loaded");
        Ok(buf)
    }

    // -- Access -------------------------------------------------------------

    /// Number of lines. An empty buffer has none.
    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// True when there are no lines at all.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The line at `index`, or `None` past the end.
    #[inline]
    #[must_use]
    pub fn line(&self, index: usize) -> Option<&Line> {
        self.lines.get(index)
    }

    /// All lines in document order.
    #[inline]
    #[must_use]
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    #[inline]
    #[must_use]
    pub const fn tab_stop(&self) -> usize {
        self.tab_stop
    }

    /// The modification counter. 0 means clean.
    #[inline]
    #[must_use]
    pub const fn dirty(&self) -> u64 {
        self.dirty
    }

    #[inline]
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty != 0
    }

    /// The file this buffer saves to.
    #[inline]
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.path = Some(path.into());
    }

    // -- Line operations ----------------------------------------------------

    /// Insert a new line at `index` (`0..=line_count`). Out of range is a
    /// no-op.
    pub fn insert_line(&mut self, index: usize, content: &[u8]) {
        if index > self.lines.len() {
            return;
        }
        self.lines.insert(index, Line::new(content, self.tab_stop));
        self.dirty += 1;
    }

    /// Remove the line at `index`. Out of range is a no-op.
    pub fn delete_line(&mut self, index: usize) {
        if index >= self.lines.len() {
            return;
        }
        self.lines.remove(index);
        self.dirty += 1;
    }

    /// Append `content` to the end of line `index`. Out of range is a no-op.
    pub fn append_string(&mut self, index: usize, content: &[u8]) {
        let tab_stop = self.tab_stop;
        if let Some(line) = self.lines.get_mut(index) {
            line.append(content, tab_stop);
            self.dirty += 1;
        }
    }

    // -- Editing at the cursor ----------------------------------------------

    /// Insert `ch` at `at`. Returns the cursor just after it.
    pub fn insert_char(&mut self, at: Cursor, ch: u8) -> Cursor {
        if at.cy >= self.lines.len() {
            self.insert_line(self.lines.len(), b"");
        }
        let cy = at.cy.min(self.lines.len() - 1);
        let tab_stop = self.tab_stop;
        let line = &mut self.lines[cy];
        let cx = at.cx.min(line.len());
        line.insert(cx, ch, tab_stop);
        self.dirty += 1;
        Cursor::new(cy, cx + 1)
    }

    /// Delete the byte left of `at`, joining with the previous line at
    /// column 0. Returns the new cursor.
    ///
    /// At the origin or on the virtual line nothing happens.
    pub fn delete_char(&mut self, at: Cursor) -> Cursor {
        if at.cy >= self.lines.len() || (at.cx == 0 && at.cy == 0) {
            return at;
        }

        if at.cx > 0 {
            let tab_stop = self.tab_stop;
            let line = &mut self.lines[at.cy];
            let cx = at.cx.min(line.len());
            if cx == 0 {
                return Cursor::new(at.cy, 0);
            }
            line.remove(cx - 1, tab_stop);
            self.dirty += 1;
            return Cursor::new(at.cy, cx - 1);
        }

        let joined = Cursor::new(at.cy - 1, self.lines[at.cy - 1].len());
        let tail = self.lines[at.cy].chars().to_vec();
        self.append_string(at.cy - 1, &tail);
        self.delete_line(at.cy);
        joined
    }

    /// Break the line at `at`. Returns the start of the new line.
    ///
    /// At column 0 an empty line goes in above; otherwise everything from
    /// `cx` on moves to a new line below.
    pub fn insert_newline(&mut self, at: Cursor) -> Cursor {
        if at.cx == 0 || at.cy >= self.lines.len() {
            self.insert_line(at.cy.min(self.lines.len()), b"");
        } else {
            let tab_stop = self.tab_stop;
            let tail = self.lines[at.cy].split_off(at.cx, tab_stop);
            self.lines.insert(at.cy + 1, tail);
            self.dirty += 1;
        }
        Cursor::new(at.cy + 1, 0)
    }

    // -- Persistence --------------------------------------------------------

    /// The whole document as bytes, `\n` after every line.
    #[must_use]
    pub fn serialize(&self) -> Vec<u8> {
        let total = self.lines.iter().map(|l| l.len() + 1).sum();
        let mut out = Vec::with_capacity(total);
        for line in &self.lines {
            out.extend_from_slice(line.chars());
            out.push(b'\n');
        }
        out
    }

    /// Write the serialized document to `w`. Returns the byte count.
    ///
    /// Does not touch the modification counter.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn write_to(&self, mut w: impl Write) -> io::Result<usize> {
        let bytes = self.serialize();
        w.write_all(&bytes)?;
        w.flush()?;
        Ok(bytes.len())
    }

    /// Save to `path`: truncate it to the new length and overwrite in
    /// place. Marks the buffer clean on success. Returns the byte count.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened, resized or written.
    /// The buffer stays dirty.
    pub fn save_to(&mut self, path: &Path) -> io::Result<usize> {
        let bytes = self.serialize();

        let mut options = OpenOptions::new();
        options.read(true).write(true).create(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o644);
        }

        let mut file = options.open(path)?;
        file.set_len(bytes.len() as u64)?;
        file.write_all(&bytes)?;

        self.dirty = 0;
        info!(path = %path.display(), bytes = bytes.len(), "saved");
        Ok(bytes.len())
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new(crate::options::DEFAULT_TAB_STOP)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
