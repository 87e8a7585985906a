// SPDX-License-Identifier: MIT
//
// Unix terminal control via termios, ioctl and raw fd I/O.
//
// Safety: termios (tcgetattr, tcsetattr), ioctl (TIOCGWINSZ), isatty and
// read/write on raw descriptors are the POSIX interfaces for terminal
// control; there is no safe alternative in std. Each unsafe block is
// minimal.
#![allow(unsafe_code)]

use std::io::{self, Write};
use std::sync::Mutex;
use std::sync::atomic::Ordering;
use std::time::Duration;

use tracing::debug;

use super::{timeout_deciseconds, ByteSource, Platform};
use crate::error::{Error, Result};
use crate::terminal::Size;

/// Global backup of the original termios for panic recovery.
///
/// [`UnixTty`] owns its own copy, but the panic hook can't reach it. This
/// backup lives behind a [`Mutex`], not `static mut`.
static TERMIOS_BACKUP: Mutex<Option<libc::termios>> = Mutex::new(None);

/// Write `restore` directly to fd 1 and reapply the backed-up termios.
///
/// Bypasses `io::stdout()` so a panic raised while the stdout lock is held
/// cannot deadlock here.
pub(super) fn emergency_restore(restore: &[u8]) {
    unsafe {
        let _ = libc::write(
            libc::STDOUT_FILENO,
            restore.as_ptr().cast::<libc::c_void>(),
            restore.len(),
        );
    }
    if let Ok(guard) = TERMIOS_BACKUP.lock() {
        if let Some(ref original) = *guard {
            unsafe {
                let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, original);
            }
        }
    }
}

/// Install a `SIGWINCH` handler that sets [`super::RESIZED`].
///
/// Storing to an atomic is async-signal-safe. `SA_RESTART` keeps the
/// blocking `read` from failing with `EINTR` on resize.
pub(super) fn install_resize_handler() {
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = on_sigwinch as *const () as usize;
        sa.sa_flags = libc::SA_RESTART;
        libc::sigemptyset(&raw mut sa.sa_mask);
        libc::sigaction(libc::SIGWINCH, &raw const sa, std::ptr::null_mut());
    }
}

extern "C" fn on_sigwinch(_sig: libc::c_int) {
    super::RESIZED.store(true, Ordering::Relaxed);
}

/// The controlling terminal on stdin/stdout.
pub struct UnixTty {
    /// Attributes in effect before raw mode; `Some` while raw mode is on.
    original: Option<libc::termios>,
    /// `VTIME` value for raw-mode reads.
    vtime: u8,
}

impl UnixTty {
    /// Create a handle whose raw-mode reads give up after `read_timeout`.
    #[must_use]
    pub fn new(read_timeout: Duration) -> Self {
        Self {
            original: None,
            vtime: timeout_deciseconds(read_timeout),
        }
    }
}

impl ByteSource for UnixTty {
    fn read_byte(&mut self) -> Result<Option<u8>> {
        let mut byte = 0u8;
        let n = unsafe { libc::read(libc::STDIN_FILENO, (&raw mut byte).cast(), 1) };
        match n {
            1 => Ok(Some(byte)),
            0 => Ok(None),
            _ => {
                let err = io::Error::last_os_error();
                // Some platforms report the VTIME expiry as EAGAIN.
                if err.kind() == io::ErrorKind::WouldBlock {
                    Ok(None)
                } else {
                    Err(err.into())
                }
            }
        }
    }
}

impl Platform for UnixTty {
    fn enable_raw_mode(&mut self) -> Result<()> {
        if self.original.is_some() {
            return Ok(());
        }
        if unsafe { libc::isatty(libc::STDIN_FILENO) } == 0 {
            return Err(Error::NotATty);
        }

        let mut termios: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(libc::STDIN_FILENO, &raw mut termios) } != 0 {
            return Err(io::Error::last_os_error().into());
        }

        self.original = Some(termios);
        if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
            *guard = Some(termios);
        }

        termios.c_iflag &= !(libc::BRKINT | libc::ICRNL | libc::INPCK | libc::ISTRIP | libc::IXON);
        termios.c_oflag &= !libc::OPOST;
        termios.c_cflag |= libc::CS8;
        termios.c_lflag &= !(libc::ECHO | libc::ICANON | libc::IEXTEN | libc::ISIG);

        // VMIN=0 + VTIME: read() returns after one byte or when the timer runs out.
        termios.c_cc[libc::VMIN] = 0;
        termios.c_cc[libc::VTIME] = self.vtime;

        let raw = &raw const termios;
        let rc = unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, raw) };
        if rc != 0 {
            return Err(io::Error::last_os_error().into());
        }

        debug!(vtime = self.vtime, "raw mode enabled");
        Ok(())
    }

    fn disable_raw_mode(&mut self) -> Result<()> {
        let Some(original) = self.original.take() else {
            return Ok(());
        };

        let saved = &raw const original;
        let rc = unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, saved) };
        if rc != 0 {
            return Err(io::Error::last_os_error().into());
        }

        if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
            *guard = None;
        }

        debug!("raw mode disabled");
        Ok(())
    }

    fn window_size(&self) -> Option<Size> {
        let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
        let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &raw mut ws) };

        if result == -1 || ws.ws_col == 0 {
            None
        } else {
            Some(Size {
                cols: ws.ws_col,
                rows: ws.ws_row,
            })
        }
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(bytes)?;
        stdout.flush()?;
        Ok(())
    }
}
