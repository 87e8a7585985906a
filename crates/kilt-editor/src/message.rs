//! Status message: one line of text with a birth time.
//!
//! The message bar shows the current message until it is older than the
//! display window, then shows nothing. Setting a new message replaces the
//! old one and restarts the clock.

use std::time::{Duration, Instant};

/// The transient message shown under the status bar.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    text: String,
    set_at: Option<Instant>,
    timeout: Duration,
}

impl StatusMessage {
    /// No message; anything set later is shown for `timeout`.
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self {
            text: String::new(),
            set_at: None,
            timeout,
        }
    }

    /// Replace the message, stamped with the current time.
    pub fn set(&mut self, text: impl Into<String>) {
        self.set_at_time(text, Instant::now());
    }

    /// Replace the message, stamped with `now`.
    pub fn set_at_time(&mut self, text: impl Into<String>, now: Instant) {
        self.text = text.into();
        self.set_at = Some(now);
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the message should be on screen at `now`.
    #[must_use]
    pub fn is_visible(&self, now: Instant) -> bool {
        !self.text.is_empty()
            && self
                .set_at
                .is_some_and(|t| now.saturating_duration_since(t) < self.timeout)
    }

    /// The text to draw at `now`, if any.
    #[must_use]
    pub fn visible_text(&self, now: Instant) -> Option<&str> {
        self.is_visible(now).then_some(self.text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const FIVE: Duration = Duration::from_secs(5);

    #[test]
    fn empty_is_never_visible() {
        let msg = StatusMessage::new(FIVE);
        assert!(!msg.is_visible(Instant::now()));
        assert_eq!(msg.visible_text(Instant::now()), None);
    }

    #[test]
    fn visible_inside_window() {
        let t0 = Instant::now();
        let mut msg = StatusMessage::new(FIVE);
        msg.set_at_time("saved", t0);
        assert!(msg.is_visible(t0));
        assert!(msg.is_visible(t0 + Duration::from_millis(4999)));
        assert_eq!(msg.visible_text(t0), Some("saved"));
    }

    #[test]
    fn hidden_after_window() {
        let t0 = Instant::now();
        let mut msg = StatusMessage::new(FIVE);
        msg.set_at_time("saved", t0);
        assert!(!msg.is_visible(t0 + FIVE));
        assert_eq!(msg.text(), "saved");
    }

    #[test]
    fn set_restarts_clock() {
        let t0 = Instant::now();
        let mut msg = StatusMessage::new(FIVE);
        msg.set_at_time("one", t0);
        msg.set_at_time("two", t0 + Duration::from_secs(4));
        assert!(msg.is_visible(t0 + Duration::from_secs(8)));
        assert_eq!(msg.text(), "two");
    }
}
