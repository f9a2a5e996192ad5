//! Terminal I/O
//!
//! Raw-mode handling, byte-level reads with an idle timeout, raw output and
//! window size discovery. The editor only talks to the terminal through the
//! [`Terminal`] trait, so the same code drives a real tty or a scripted
//! [`crate::headless::HeadlessTerminal`].

#[cfg(unix)]
mod unix;

#[cfg(unix)]
pub use unix::{install_signal_handlers, shutdown_signalled, RawMode, StdTerminal};

/// Cursor-position query (DSR 6)
pub const QUERY_CURSOR_POSITION: &[u8] = b"\x1b[6n";

/// Push the cursor to the bottom-right corner, used before the query when
/// the driver cannot report the window size
pub const CURSOR_TO_EXTREME: &[u8] = b"\x1b[999C\x1b[999B";

/// Longest cursor report we are willing to read
const MAX_REPORT_LEN: usize = 32;

/// Error type for terminal operations
#[derive(Debug, thiserror::Error)]
pub enum TtyError {
    #[error("Failed to obtain terminal attributes: {0}")]
    GetAttr(#[source] nix::Error),

    #[error("Failed to set terminal attributes: {0}")]
    SetAttr(#[source] nix::Error),

    #[error("Failed to read from terminal: {0}")]
    Read(#[source] nix::Error),

    #[error("Failed to write to terminal: {0}")]
    Write(#[source] nix::Error),

    #[error("Failed to query window size: {0}")]
    WindowSize(#[source] nix::Error),

    #[error("Improper cursor position response: {0:?}")]
    CursorReport(String),

    #[error("Failed to install signal handler: {0}")]
    Signal(#[source] nix::Error),

    #[error("Terminal input closed")]
    EndOfInput,

    #[error("Shutdown requested by signal")]
    Shutdown,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for terminal operations
pub type TtyResult<T> = Result<T, TtyError>;

/// Window size in character cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSize {
    pub rows: u16,
    pub cols: u16,
}

impl WindowSize {
    /// Create a new window size from columns and rows
    pub fn new(cols: u16, rows: u16) -> Self {
        Self { rows, cols }
    }
}

impl Default for WindowSize {
    fn default() -> Self {
        Self::new(80, 24)
    }
}

/// A character-cell terminal the editor can read keys from and paint on
pub trait Terminal {
    /// Read a single byte.
    ///
    /// Returns `Ok(None)` when the idle timeout expires before a byte
    /// arrives. This is the only place the editor ever blocks.
    fn read_byte(&mut self) -> TtyResult<Option<u8>>;

    /// Write all bytes to the terminal and flush them
    fn write_all(&mut self, data: &[u8]) -> TtyResult<()>;

    /// Current window size in cells
    fn window_size(&mut self) -> TtyResult<WindowSize>;

    /// Whether the process was asked to terminate
    fn shutdown_requested(&self) -> bool {
        false
    }
}

/// Discover the window size by parking the cursor in the far corner and
/// asking the terminal where it ended up.
pub fn probe_window_size<T: Terminal + ?Sized>(term: &mut T) -> TtyResult<WindowSize> {
    term.write_all(CURSOR_TO_EXTREME)?;
    let (rows, cols) = query_cursor_position(term)?;
    tracing::debug!(rows, cols, "window size from cursor probe");
    Ok(WindowSize::new(cols, rows))
}

/// Send DSR 6 and read back the `ESC [ rows ; cols R` reply
pub fn query_cursor_position<T: Terminal + ?Sized>(term: &mut T) -> TtyResult<(u16, u16)> {
    term.write_all(QUERY_CURSOR_POSITION)?;

    let mut reply = Vec::with_capacity(MAX_REPORT_LEN);
    while reply.len() < MAX_REPORT_LEN {
        match term.read_byte()? {
            Some(b'R') => break,
            Some(byte) => reply.push(byte),
            None => break,
        }
    }

    parse_cursor_report(&reply)
        .ok_or_else(|| TtyError::CursorReport(String::from_utf8_lossy(&reply).into_owned()))
}

/// Parse a cursor report body (`ESC [ rows ; cols`, terminator stripped)
pub fn parse_cursor_report(reply: &[u8]) -> Option<(u16, u16)> {
    let body = reply.strip_prefix(b"\x1b[")?;
    let body = body.strip_suffix(b"R").unwrap_or(body);
    let text = std::str::from_utf8(body).ok()?;
    let (rows, cols) = text.split_once(';')?;
    let rows = rows.parse().ok()?;
    let cols = cols.parse().ok()?;
    Some((rows, cols))
}
