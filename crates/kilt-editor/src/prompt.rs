//! One-line input prompt on the message bar.
//!
//! Used for "Save as" and "Search". The caller feeds decoded keys to
//! [`Prompt::handle_key`] and shows [`Prompt::message`] on the message bar
//! after each one:
//!
//! - printable ASCII is appended
//! - Backspace and Delete remove the last byte
//! - Escape cancels
//! - Enter submits, unless the input is still empty

use kilt_term::input::{KeyCode, KeyEvent};

/// What a key did to the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    /// Still collecting input.
    Pending,
    /// Enter on a non-empty input.
    Submitted(String),
    /// Escape.
    Cancelled,
}

/// An in-progress prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    label: &'static str,
    input: String,
}

impl Prompt {
    /// A prompt shown as `"{label}{input} (ESC to cancel)"`.
    #[must_use]
    pub const fn new(label: &'static str) -> Self {
        Self {
            label,
            input: String::new(),
        }
    }

    /// What has been typed so far.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// The message-bar text for the current input.
    #[must_use]
    pub fn message(&self) -> String {
        format!("{}{} (ESC to cancel)", self.label, self.input)
    }

    /// Apply one key.
    pub fn handle_key(&mut self, key: KeyEvent) -> PromptOutcome {
        match key.code {
            KeyCode::Escape => PromptOutcome::Cancelled,
            KeyCode::Enter if !self.input.is_empty() => {
                PromptOutcome::Submitted(std::mem::take(&mut self.input))
            }
            KeyCode::Backspace | KeyCode::Delete => {
                self.input.pop();
                PromptOutcome::Pending
            }
            KeyCode::Char(c)
                if key.modifiers.is_empty() && (c.is_ascii_graphic() || c == b' ') =>
            {
                self.input.push(char::from(c));
                PromptOutcome::Pending
            }
            _ => PromptOutcome::Pending,
        }
    }
}
