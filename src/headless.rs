//! Headless terminal
//!
//! An in-memory [`Terminal`] with scripted input and captured output. Used to
//! drive the editor deterministically without a tty, e.g. in tests or when
//! replaying a recorded key stream.

use std::collections::VecDeque;

use crate::tty::{Terminal, TtyError, TtyResult, WindowSize};

/// Scripted terminal
///
/// Input is a queue of events: a byte, or an idle-timeout tick. Once the
/// queue is drained every further read fails with [`TtyError::EndOfInput`].
#[derive(Debug, Default)]
pub struct HeadlessTerminal {
    input: VecDeque<Option<u8>>,
    output: Vec<u8>,
    size: WindowSize,
    shutdown: bool,
}

impl HeadlessTerminal {
    /// Create a terminal of the given size with no pending input
    pub fn new(size: WindowSize) -> Self {
        Self {
            input: VecDeque::new(),
            output: Vec::new(),
            size,
            shutdown: false,
        }
    }

    /// Queue raw input bytes
    pub fn push_input(&mut self, bytes: &[u8]) {
        self.input.extend(bytes.iter().copied().map(Some));
    }

    /// Queue an idle-timeout tick (a read that returns no byte)
    pub fn push_timeout(&mut self) {
        self.input.push_back(None);
    }

    /// Number of queued input events not yet consumed
    pub fn pending_input(&self) -> usize {
        self.input.len()
    }

    /// Everything written so far
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    /// Everything written so far, lossily decoded
    pub fn output_text(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }

    /// Drop captured output
    pub fn clear_output(&mut self) {
        self.output.clear();
    }

    /// Act as if a terminating signal arrived
    pub fn request_shutdown(&mut self) {
        self.shutdown = true;
    }

    /// Change the reported window size
    pub fn resize(&mut self, size: WindowSize) {
        self.size = size;
    }
}

impl Terminal for HeadlessTerminal {
    fn read_byte(&mut self) -> TtyResult<Option<u8>> {
        self.input.pop_front().ok_or(TtyError::EndOfInput)
    }

    fn write_all(&mut self, data: &[u8]) -> TtyResult<()> {
        self.output.extend_from_slice(data);
        Ok(())
    }

    fn window_size(&mut self) -> TtyResult<WindowSize> {
        Ok(self.size)
    }

    fn shutdown_requested(&self) -> bool {
        self.shutdown
    }
}
