//! A single line of text and its rendered form.
//!
//! `chars` is what the user typed, one byte per column. `render` is what
//! goes on screen: the same bytes with every tab expanded to spaces up to
//! the next tab stop. `render` is rebuilt in full whenever `chars` changes,
//! so it is never out of date and never contains a tab.

/// One line of the buffer, without its terminator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Line {
    chars: Vec<u8>,
    render: Vec<u8>,
}

impl Line {
    /// Create a line from raw content.
    #[must_use]
    pub fn new(content: impl Into<Vec<u8>>, tab_stop: usize) -> Self {
        let mut line = Self {
            chars: content.into(),
            render: Vec::new(),
        };
        line.update_render(tab_stop);
        line
    }

    /// The raw, editable content.
    #[inline]
    #[must_use]
    pub fn chars(&self) -> &[u8] {
        &self.chars
    }

    /// The tab-expanded content shown on screen.
    #[inline]
    #[must_use]
    pub fn render(&self) -> &[u8] {
        &self.render
    }

    /// Length of the raw content in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// True when the raw content is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Insert `ch` at `at`, clamped to the line length.
    pub fn insert(&mut self, at: usize, ch: u8, tab_stop: usize) {
        let at = at.min(self.chars.len());
        self.chars.insert(at, ch);
        self.update_render(tab_stop);
    }

    /// Remove and return the byte at `at`. `None` if out of range.
    pub fn remove(&mut self, at: usize, tab_stop: usize) -> Option<u8> {
        if at >= self.chars.len() {
            return None;
        }
        let ch = self.chars.remove(at);
        self.update_render(tab_stop);
        Some(ch)
    }

    /// Keep only the first `len` bytes.
    pub fn truncate(&mut self, len: usize, tab_stop: usize) {
        self.chars.truncate(len);
        self.update_render(tab_stop);
    }

    /// Split at `at`: this line keeps `[0, at)`, the rest is returned.
    pub fn split_off(&mut self, at: usize, tab_stop: usize) -> Self {
        let at = at.min(self.chars.len());
        let tail = self.chars.split_off(at);
        self.update_render(tab_stop);
        Self::new(tail, tab_stop)
    }

    /// Append `bytes` to the end.
    pub fn append(&mut self, bytes: &[u8], tab_stop: usize) {
        self.chars.extend_from_slice(bytes);
        self.update_render(tab_stop);
    }

    /// Rebuild `render` from `chars`.
    pub fn update_render(&mut self, tab_stop: usize) {
        let tab_stop = tab_stop.max(1);
        let tabs = self.chars.iter().filter(|&&b| b == b'\t').count();
        self.render.clear();
        self.render.reserve(self.chars.len() + tabs * (tab_stop - 1));
        for &b in &self.chars {
            if b == b'\t' {
                self.render.push(b' ');
                while self.render.len() % tab_stop != 0 {
                    self.render.push(b' ');
                }
            } else {
                self.render.push(b);
            }
        }
    }
}
