// SPDX-License-Identifier: MIT
//
// Terminal input decoder.
//
// Turns raw stdin bytes into logical keys: characters, Enter, Tab,
// Backspace, arrows, Home/End, PageUp/PageDown, Delete and a bare Escape.
//
// # Design
//
// The decoder is a small state machine fed one byte at a time through
// [`Decoder::advance`]:
//
// ```text
//   Normal ──ESC──▶ Escape ──'['──▶ Csi ──digit──▶ CsiParam ──'~'──▶ key
//                     │               │                │
//                     └──'O'──▶ Ss3   └──A/B/C/D/H/F──▶ key
// ```
//
// A lone ESC byte is ambiguous: it could be the Escape key or the start of
// a sequence. The platform read returns "nothing" once its short timeout
// expires; at that point [`Decoder::flush`] turns whatever is pending into
// an Escape key. Any sequence we don't recognize also ends as Escape; an
// ESC arriving mid-sequence emits Escape and begins a new sequence.
// Malformed input is never an error.

use bitflags::bitflags;
use tracing::trace;

use crate::error::Result;
use crate::platform::ByteSource;

// ─── Key Types ──────────────────────────────────────────────────────────────

/// A decoded key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Which key was pressed.
    pub code: KeyCode,
    /// Active modifier keys.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// A key with no modifiers.
    #[must_use]
    pub const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
        }
    }

    /// Ctrl + `letter` (lowercase ASCII).
    #[must_use]
    pub const fn ctrl(letter: u8) -> Self {
        Self {
            code: KeyCode::Char(letter),
            modifiers: Modifiers::CTRL,
        }
    }

    /// Whether this is Ctrl + `letter`.
    #[must_use]
    pub const fn is_ctrl(&self, letter: u8) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
            && matches!(self.code, KeyCode::Char(c) if c == letter)
    }
}

/// Identity of a key.
///
/// Characters are single bytes: the editor works in one byte per column,
/// so bytes outside ASCII pass through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    /// A character byte.
    Char(u8),
    // ── Named keys ──────────────────────────────────────────────
    Enter,
    Tab,
    Backspace,
    Escape,
    Delete,
    // ── Navigation ──────────────────────────────────────────────
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
}

bitflags! {
    /// Keyboard modifier flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const CTRL = 0b0000_0100;
    }
}

// ─── Decoder ────────────────────────────────────────────────────────────────

const ESC: u8 = 0x1B;

/// Where the decoder is inside an escape sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Between keys.
    Normal,
    /// Saw ESC, waiting for the family byte.
    Escape,
    /// Saw `ESC [`.
    Csi,
    /// Saw `ESC O`.
    Ss3,
    /// Inside `ESC [ <params>`, waiting for the final byte.
    ///
    /// `param` is the numeric parameter so far; `plain` stays true while
    /// the parameter is a single run of digits (the only shape we map).
    CsiParam { param: u16, plain: bool },
}

/// Byte-at-a-time key decoder.
///
/// # Example
///
/// ```
/// use kilt_term::input::{Decoder, KeyCode, KeyEvent};
///
/// let mut decoder = Decoder::new();
/// assert_eq!(decoder.advance(0x1b), None);
/// assert_eq!(decoder.advance(b'['), None);
/// assert_eq!(decoder.advance(b'A'), Some(KeyEvent::plain(KeyCode::Up)));
/// ```
#[derive(Debug)]
pub struct Decoder {
    state: State,
}

impl Decoder {
    /// A decoder in the `Normal` state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: State::Normal,
        }
    }

    /// Whether a partial escape sequence is waiting for more bytes.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.state != State::Normal
    }

    /// Feed one byte. Returns a key once one is complete.
    pub fn advance(&mut self, byte: u8) -> Option<KeyEvent> {
        match self.state {
            State::Normal => self.normal(byte),
            State::Escape => match byte {
                b'[' => self.wait(State::Csi),
                b'O' => self.wait(State::Ss3),
                _ => self.collapse(byte),
            },
            State::Csi => match byte {
                b'A' => self.finish(KeyCode::Up),
                b'B' => self.finish(KeyCode::Down),
                b'C' => self.finish(KeyCode::Right),
                b'D' => self.finish(KeyCode::Left),
                b'H' => self.finish(KeyCode::Home),
                b'F' => self.finish(KeyCode::End),
                b'0'..=b'9' => self.wait(State::CsiParam {
                    param: u16::from(byte - b'0'),
                    plain: true,
                }),
                // Parameter or intermediate bytes: keep swallowing.
                0x20..=0x3F => self.wait(State::CsiParam {
                    param: 0,
                    plain: false,
                }),
                _ => self.collapse(byte),
            },
            State::Ss3 => match byte {
                b'A' => self.finish(KeyCode::Up),
                b'B' => self.finish(KeyCode::Down),
                b'C' => self.finish(KeyCode::Right),
                b'D' => self.finish(KeyCode::Left),
                b'H' => self.finish(KeyCode::Home),
                b'F' => self.finish(KeyCode::End),
                _ => self.collapse(byte),
            },
            State::CsiParam { param, plain } => match byte {
                b'0'..=b'9' => self.wait(State::CsiParam {
                    param: param
                        .saturating_mul(10)
                        .saturating_add(u16::from(byte - b'0')),
                    plain,
                }),
                0x20..=0x3F => self.wait(State::CsiParam {
                    param,
                    plain: false,
                }),
                b'~' if plain => match tilde_key(param) {
                    Some(code) => self.finish(code),
                    None => self.collapse(byte),
                },
                _ => self.collapse(byte),
            },
        }
    }

    /// Resolve a read timeout.
    ///
    /// A pending partial sequence (including a lone ESC) becomes an Escape
    /// key. Returns `None` when nothing was pending.
    pub fn flush(&mut self) -> Option<KeyEvent> {
        if self.state == State::Normal {
            return None;
        }
        trace!(state = ?self.state, "escape sequence timed out");
        self.state = State::Normal;
        Some(KeyEvent::plain(KeyCode::Escape))
    }

    /// Block until a complete key is available.
    ///
    /// Timeouts with nothing pending are ignored; a timeout in the middle
    /// of a sequence produces Escape.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying read fails.
    pub fn read_key(&mut self, src: &mut impl ByteSource) -> Result<KeyEvent> {
        loop {
            if let Some(key) = self.poll_key(src)? {
                return Ok(key);
            }
        }
    }

    /// Read bytes until a key completes or the source times out.
    ///
    /// Returns `Ok(None)` when the source timed out with no sequence in
    /// progress, so the caller can do periodic work between keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying read fails.
    pub fn poll_key(&mut self, src: &mut impl ByteSource) -> Result<Option<KeyEvent>> {
        loop {
            match src.read_byte()? {
                Some(byte) => {
                    if let Some(key) = self.advance(byte) {
                        return Ok(Some(key));
                    }
                }
                None => return Ok(self.flush()),
            }
        }
    }

    // ── State transitions ───────────────────────────────────────────

    fn normal(&mut self, byte: u8) -> Option<KeyEvent> {
        let key = match byte {
            ESC => return self.wait(State::Escape),
            b'\r' | b'\n' => KeyEvent::plain(KeyCode::Enter),
            b'\t' => KeyEvent::plain(KeyCode::Tab),
            0x7F | 0x08 => KeyEvent::plain(KeyCode::Backspace),
            0x00 => KeyEvent::ctrl(b'@'),
            b @ 0x01..=0x1A => KeyEvent::ctrl(b + b'a' - 1),
            b @ 0x1C..=0x1F => KeyEvent::ctrl(b + 0x40),
            b => KeyEvent::plain(KeyCode::Char(b)),
        };
        Some(key)
    }

    const fn wait(&mut self, next: State) -> Option<KeyEvent> {
        self.state = next;
        None
    }

    const fn finish(&mut self, code: KeyCode) -> Option<KeyEvent> {
        self.state = State::Normal;
        Some(KeyEvent::plain(code))
    }

    fn collapse(&mut self, byte: u8) -> Option<KeyEvent> {
        trace!(state = ?self.state, byte, "unrecognized escape sequence");
        // A fresh ESC ends the pending sequence and starts the next one.
        self.state = if byte == ESC {
            State::Escape
        } else {
            State::Normal
        };
        Some(KeyEvent::plain(KeyCode::Escape))
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Map the parameter of a `CSI n ~` sequence.
const fn tilde_key(param: u16) -> Option<KeyCode> {
    match param {
        1 | 7 => Some(KeyCode::Home),
        3 => Some(KeyCode::Delete),
        4 | 8 => Some(KeyCode::End),
        5 => Some(KeyCode::PageUp),
        6 => Some(KeyCode::PageDown),
        _ => None,
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
