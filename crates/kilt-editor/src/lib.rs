//! # kilt-editor: Editor core for kilt
//!
//! Everything between a decoded key and the bytes of a frame:
//!
//! - **[`line`]**: `Line`, raw bytes plus their tab-expanded rendering
//! - **[`column`]**: logical ↔ rendered column mapping
//! - **[`buffer`]**: `Buffer`, the ordered lines with editing operations,
//!   a modification counter, and load/save
//! - **[`cursor`]**: `Cursor` and the arrow/Home/End motions
//! - **[`view`]**: scroll offsets that keep the cursor on screen
//! - **[`render`]**: composes rows, status bar and message bar into one
//!   frame
//! - **[`search`]**, **[`prompt`]**, **[`message`]**: find, the one-line
//!   input prompt, and the timed status message
//! - **[`options`]**: tunables and their environment overrides
//!
//! The crate never touches the terminal itself; frames are written into a
//! kilt-term [`OutputBuffer`](kilt_term::output::OutputBuffer) and the
//! caller sends them.

pub mod buffer;
pub mod column;
pub mod cursor;
pub mod line;
pub mod message;
pub mod options;
pub mod prompt;
pub mod render;
pub mod search;
pub mod view;
