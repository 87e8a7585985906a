//! Editor options: tunables and their environment overrides.
//!
//! Every constant the editor depends on lives in [`Options`]. The defaults
//! can be overridden from the environment when the binary starts:
//!
//! | Variable          | Field        | Type     | Default      |
//! |-------------------|--------------|----------|--------------|
//! | `KILT_TABSTOP`    | `tab_stop`   | integer  | 8            |
//! | `KILT_QUIT_TIMES` | `quit_times` | integer  | 3            |
//! | `KILT_LOG`        | `log_file`   | path     | none (off)   |
//! | `KILT_LOG_LEVEL`  | `log_level`  | level    | `info`       |
//!
//! Values that fail to parse, and zero for the integer options, are
//! ignored and the default kept.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::Level;

/// Columns per tab stop.
pub const DEFAULT_TAB_STOP: usize = 8;

/// Extra Ctrl-Q presses needed to quit with unsaved changes.
pub const DEFAULT_QUIT_TIMES: u32 = 3;

/// How long a status message stays on the message bar.
pub const DEFAULT_MESSAGE_TIMEOUT: Duration = Duration::from_secs(5);

/// Raw-mode read timeout. Also the escape-sequence timeout.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(100);

/// Editor configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub tab_stop: usize,
    pub quit_times: u32,
    pub message_timeout: Duration,
    pub read_timeout: Duration,
    /// Write logs here. No logging when `None`.
    pub log_file: Option<PathBuf>,
    pub log_level: Level,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            tab_stop: DEFAULT_TAB_STOP,
            quit_times: DEFAULT_QUIT_TIMES,
            message_timeout: DEFAULT_MESSAGE_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            log_file: None,
            log_level: Level::INFO,
        }
    }
}

impl Options {
    /// Defaults with the process environment layered on top.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults with overrides from `lookup(variable)`.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut opts = Self::default();

        if let Some(n) = lookup("KILT_TABSTOP").and_then(|v| parse_env_value::<usize>(&v)) {
            if n > 0 {
                opts.tab_stop = n;
            }
        }
        if let Some(n) = lookup("KILT_QUIT_TIMES").and_then(|v| parse_env_value::<u32>(&v)) {
            if n > 0 {
                opts.quit_times = n;
            }
        }
        if let Some(path) = lookup("KILT_LOG").filter(|v| !v.trim().is_empty()) {
            opts.log_file = Some(PathBuf::from(path));
        }
        if let Some(level) = lookup("KILT_LOG_LEVEL").and_then(|v| parse_env_value::<Level>(&v)) {
            opts.log_level = level;
        }

        opts
    }
}

/// Parse one environment value, ignoring surrounding whitespace.
#[must_use]
pub fn parse_env_value<T: FromStr>(raw: &str) -> Option<T> {
    raw.trim().parse().ok()
}
