// SPDX-License-Identifier: MIT
//
// File logging.
//
// stdout is the screen, so logs can only go to a file. Nothing is
// installed unless a log file is configured; a failure to set up logging
// is reported on stderr before the terminal is taken over and the editor
// runs without it.

use std::path::Path;

use kilt_editor::options::Options;
use tracing_appender::non_blocking::WorkerGuard;

/// Install the global subscriber if `options.log_file` is set.
///
/// Hold the returned guard for the life of the process; dropping it
/// flushes and stops the background writer.
pub fn init(options: &Options) -> Option<WorkerGuard> {
    let path = options.log_file.as_deref()?;
    let file_name = path.file_name()?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    match tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_max_level(options.log_level)
        .try_init()
    {
        Ok(()) => Some(guard),
        Err(err) => {
            eprintln!("kilt: logging disabled: {err}");
            None
        }
    }
}
