//! Find: first line whose rendered text contains a query.
//!
//! The scan always starts at line 0, runs forward, and stops at the first
//! hit. There is no wrap-around and no next/previous match. Matching is on
//! the rendered text, so the hit is converted back to a logical column
//! through [`rx_to_cx`].

use tracing::debug;

use crate::buffer::Buffer;
use crate::column::rx_to_cx;
use crate::cursor::Cursor;

/// Where `query` first occurs, as a cursor on the raw text.
///
/// `None` for an empty query or no match.
#[must_use]
pub fn find_first(buf: &Buffer, query: &[u8]) -> Option<Cursor> {
    if query.is_empty() {
        return None;
    }
    let hit = buf.lines().iter().enumerate().find_map(|(cy, line)| {
        line.render()
            .windows(query.len())
            .position(|w| w == query)
            .map(|rx| Cursor::new(cy, rx_to_cx(line.chars(), rx, buf.tab_stop())))
    });
    debug!(query = %String::from_utf8_lossy(query), ?hit, "find");
    hit
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn buf(lines: &[&str]) -> Buffer {
        let mut b = Buffer::new(8);
        for (i, l) in lines.iter().enumerate() {
            b.insert_line(i, l.as_bytes());
        }
        b
    }

    #[test]
    fn finds_word_column() {
        let b = buf(&["hello world"]);
        assert_eq!(find_first(&b, b"world"), Some(Cursor::new(0, 6)));
    }

    #[test]
    fn first_line_wins() {
        let b = buf(&["nothing", "a match", "another match"]);
        assert_eq!(find_first(&b, b"match"), Some(Cursor::new(1, 2)));
    }

    #[test]
    fn match_after_tab_maps_to_logical_column() {
        let b = buf(&["\tneedle"]);
        assert_eq!(find_first(&b, b"needle"), Some(Cursor::new(0, 1)));
    }

    #[test]
    fn no_match() {
        let b = buf(&["abc"]);
        assert_eq!(find_first(&b, b"xyz"), None);
        assert_eq!(find_first(&b, b"abcd"), None);
    }

    #[test]
    fn empty_query_or_buffer() {
        assert_eq!(find_first(&buf(&["abc"]), b""), None);
        assert_eq!(find_first(&Buffer::new(8), b"a"), None);
    }
}
