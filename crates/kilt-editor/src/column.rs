//! Logical ↔ rendered column mapping.
//!
//! A logical column counts raw bytes of a line. A rendered column counts
//! screen cells. They differ only because a tab advances to the next
//! multiple of the tab stop; every other byte is one cell wide.

/// Rendered column of logical column `cx` in `chars`.
///
/// `cx` past the end of the line is treated as the end.
#[must_use]
pub fn cx_to_rx(chars: &[u8], cx: usize, tab_stop: usize) -> usize {
    let tab_stop = tab_stop.max(1);
    chars
        .iter()
        .take(cx)
        .fold(0, |rx, &b| advance(rx, b, tab_stop))
}

/// Logical column that owns rendered column `rx`.
///
/// A column inside a tab's expansion maps to the tab itself. `rx` past the
/// rendered end maps to the line length.
#[must_use]
pub fn rx_to_cx(chars: &[u8], rx: usize, tab_stop: usize) -> usize {
    let tab_stop = tab_stop.max(1);
    let mut cur = 0;
    for (cx, &b) in chars.iter().enumerate() {
        cur = advance(cur, b, tab_stop);
        if cur > rx {
            return cx;
        }
    }
    chars.len()
}

/// The rendered column just after byte `b` placed at column `rx`.
#[inline]
const fn advance(rx: usize, b: u8, tab_stop: usize) -> usize {
    if b == b'\t' {
        rx + tab_stop - rx % tab_stop
    } else {
        rx + 1
    }
}
