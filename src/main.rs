// SPDX-License-Identifier: MIT
//
// kilt: a small raw-mode terminal text editor.
//
// This is the binary that wires the two crates together:
//
//   kilt-term   → raw mode, size query, key decoding, event loop
//   kilt-editor → lines, buffer, cursor, view, frame composition
//
// The Editor struct implements kilt-term's App trait. Each keypress flows
// through:
//
//   stdin → decoder → on_key → buffer/cursor mutation
//   paint → scroll → render_frame → one write to the terminal
//
// Layout:
//
//   ┌──────────────────────────────┐
//   │ text area                    │  ← rows - 2
//   ├──────────────────────────────┤
//   │ status bar (inverted)        │  ← 1 row
//   ├──────────────────────────────┤
//   │ message bar                  │  ← 1 row
//   └──────────────────────────────┘

mod editor;
mod logging;

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use kilt_editor::buffer::Buffer;
use kilt_editor::options::Options;
use kilt_term::event_loop::EventLoop;
use tracing::{error, info};

use crate::editor::Editor;

fn main() -> ExitCode {
    let options = Options::from_env();
    let _log_guard = logging::init(&options);

    let buffer = match env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => match Buffer::open(&path, options.tab_stop) {
            Ok(buffer) => buffer,
            Err(err) => {
                error!(path = %path.display(), %err, "load failed");
                eprintln!("kilt: {}: {err}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => Buffer::new(options.tab_stop),
    };

    let mut editor = Editor::new(buffer, &options);
    let mut event_loop = EventLoop::native(options.read_timeout);

    // `run` has already restored the terminal when it returns, so the
    // error lands on a clean screen.
    if let Err(err) = event_loop.run(&mut editor) {
        error!(%err, "fatal terminal error");
        eprintln!("kilt: {err}");
        return ExitCode::FAILURE;
    }

    info!("exit");
    ExitCode::SUCCESS
}
