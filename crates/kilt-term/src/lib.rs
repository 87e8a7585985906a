// SPDX-License-Identifier: MIT
//
// kilt-term: Terminal layer for kilt.
//
// Owns everything that touches the terminal device: entering and leaving
// raw mode, querying the window size (with a cursor-probe fallback when the
// ioctl path fails), turning raw stdin bytes into logical keys, and writing
// each frame in a single write call.
//
// Like the rest of kilt, this crate talks ANSI directly over termios rather
// than going through a TUI framework. The OS-specific pieces sit behind the
// `Platform` trait so the loop, decoder and size probe run the same way
// against a real TTY or a scripted one in tests.

pub mod ansi;
pub mod error;
pub mod event_loop;
pub mod input;
pub mod output;
pub mod platform;
pub mod terminal;

pub use error::{Error, Result};
