//! Unix terminal implementation
//!
//! Raw mode via termios and window size via `TIOCGWINSZ`, reading stdin and
//! writing stdout directly through POSIX calls.
//!
//! SIGTERM, SIGHUP and SIGINT only raise a flag. The read loop sees it on the
//! next timeout tick, and the editor then unwinds through its normal exit
//! path, which restores the terminal.

use std::os::fd::BorrowedFd;
use std::sync::atomic::{AtomicBool, Ordering};

use nix::libc::{self, STDIN_FILENO, STDOUT_FILENO};
use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};
use nix::sys::termios::{
    tcgetattr, tcsetattr, ControlFlags, InputFlags, LocalFlags, OutputFlags, SetArg,
    SpecialCharacterIndices, Termios,
};
use nix::unistd::{read, write};

use super::{probe_window_size, Terminal, TtyError, TtyResult, WindowSize};

/// Idle timeout for a read, in tenths of a second (VTIME)
const READ_TIMEOUT_DECISECONDS: u8 = 1;

/// Signals that end the editor
const SHUTDOWN_SIGNALS: [Signal; 3] = [Signal::SIGTERM, Signal::SIGHUP, Signal::SIGINT];

/// Set by the signal handler, never cleared
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

extern "C" fn handle_shutdown_signal(_: libc::c_int) {
    SHUTDOWN.store(true, Ordering::SeqCst);
}

/// Route the shutdown signals to the flag checked by [`StdTerminal`].
///
/// No `SA_RESTART`, so a blocked read returns `EINTR` right away.
pub fn install_signal_handlers() -> TtyResult<()> {
    let action = SigAction::new(
        SigHandler::Handler(handle_shutdown_signal),
        SaFlags::empty(),
        SigSet::empty(),
    );
    for signal in SHUTDOWN_SIGNALS {
        // SAFETY: the handler only stores to an atomic
        unsafe { sigaction(signal, &action) }.map_err(TtyError::Signal)?;
    }
    tracing::debug!("signal handlers installed");
    Ok(())
}

/// Whether a shutdown signal has arrived
pub fn shutdown_signalled() -> bool {
    SHUTDOWN.load(Ordering::SeqCst)
}

/// Raw mode guard
///
/// Captures the terminal attributes on creation and puts the terminal in raw
/// mode. The captured attributes are restored by [`RawMode::disable`] or, if
/// that was never called, when the guard is dropped.
pub struct RawMode {
    fd: BorrowedFd<'static>,
    original: Termios,
    active: bool,
}

impl RawMode {
    /// Switch stdin to raw mode
    pub fn enable() -> TtyResult<Self> {
        // SAFETY: stdin stays open for the lifetime of the process
        let fd = unsafe { BorrowedFd::borrow_raw(STDIN_FILENO) };

        let original = tcgetattr(fd).map_err(TtyError::GetAttr)?;
        let mut raw = original.clone();

        raw.input_flags.remove(
            InputFlags::IXON
                | InputFlags::ICRNL
                | InputFlags::BRKINT
                | InputFlags::INPCK
                | InputFlags::ISTRIP,
        );
        raw.output_flags.remove(OutputFlags::OPOST);
        raw.control_flags.insert(ControlFlags::CS8);
        raw.local_flags.remove(
            LocalFlags::ECHO | LocalFlags::ICANON | LocalFlags::ISIG | LocalFlags::IEXTEN,
        );
        // Return from read() after the idle timeout even if nothing arrived
        raw.control_chars[SpecialCharacterIndices::VMIN as usize] = 0;
        raw.control_chars[SpecialCharacterIndices::VTIME as usize] = READ_TIMEOUT_DECISECONDS;

        tcsetattr(fd, SetArg::TCSAFLUSH, &raw).map_err(TtyError::SetAttr)?;
        tracing::debug!("raw mode enabled");

        Ok(Self {
            fd,
            original,
            active: true,
        })
    }

    /// Restore the captured terminal attributes
    pub fn disable(&mut self) -> TtyResult<()> {
        if !self.active {
            return Ok(());
        }
        tcsetattr(self.fd, SetArg::TCSAFLUSH, &self.original).map_err(TtyError::SetAttr)?;
        self.active = false;
        tracing::debug!("raw mode disabled");
        Ok(())
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        if let Err(e) = self.disable() {
            tracing::error!("{}", e);
        }
    }
}

/// The process's controlling terminal: stdin for keys, stdout for frames
pub struct StdTerminal {
    raw: RawMode,
}

impl StdTerminal {
    /// Take over the terminal, switching it to raw mode
    pub fn new() -> TtyResult<Self> {
        install_signal_handlers()?;
        Ok(Self {
            raw: RawMode::enable()?,
        })
    }

    /// Hand the terminal back in its original mode
    pub fn restore(&mut self) -> TtyResult<()> {
        self.raw.disable()
    }
}

impl Terminal for StdTerminal {
    fn read_byte(&mut self) -> TtyResult<Option<u8>> {
        let mut buf = [0u8; 1];
        match read(STDIN_FILENO, &mut buf) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(buf[0])),
            // EAGAIN and EWOULDBLOCK are the same value on Linux
            Err(nix::errno::Errno::EAGAIN) | Err(nix::errno::Errno::EINTR) => Ok(None),
            Err(e) => Err(TtyError::Read(e)),
        }
    }

    fn write_all(&mut self, mut data: &[u8]) -> TtyResult<()> {
        while !data.is_empty() {
            match write(STDOUT_FILENO, data) {
                Ok(n) => data = &data[n..],
                Err(nix::errno::Errno::EINTR) => continue,
                Err(e) => return Err(TtyError::Write(e)),
            }
        }
        Ok(())
    }

    fn shutdown_requested(&self) -> bool {
        shutdown_signalled()
    }

    fn window_size(&mut self) -> TtyResult<WindowSize> {
        match get_window_size(STDOUT_FILENO) {
            Ok(size) if size.cols != 0 => Ok(size),
            Ok(_) => {
                tracing::warn!("terminal reported zero columns, probing cursor");
                probe_window_size(self)
            }
            Err(e) => {
                tracing::warn!("{}, probing cursor", e);
                probe_window_size(self)
            }
        }
    }
}

/// Get the window size from a terminal file descriptor
fn get_window_size(fd: libc::c_int) -> TtyResult<WindowSize> {
    let mut winsize = libc::winsize {
        ws_row: 0,
        ws_col: 0,
        ws_xpixel: 0,
        ws_ypixel: 0,
    };

    // SAFETY: TIOCGWINSZ is a valid ioctl for getting window size
    let result = unsafe { libc::ioctl(fd, libc::TIOCGWINSZ, &mut winsize) };

    if result < 0 {
        Err(TtyError::WindowSize(nix::errno::Errno::last()))
    } else {
        Ok(WindowSize::new(winsize.ws_col, winsize.ws_row))
    }
}
