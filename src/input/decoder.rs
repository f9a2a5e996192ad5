//! Key Decoder State Machine
//!
//! A small deterministic automaton over the input byte stream. Each step
//! consumes either a byte or an idle-timeout tick (`None`) and may produce
//! a [`Key`].
//!
//! States:
//! - Ground: waiting for the first byte of a key
//! - Utf8: collecting continuation bytes of a multi-byte character
//! - Escape: after ESC; a timeout here means the user pressed ESC itself
//! - EscapeOther: ESC followed by neither `[` nor `O`; swallow one more byte
//! - Csi: after `ESC [`
//! - CsiParam: after `ESC [ <digit>`, expecting `~`
//! - Ss3: after `ESC O`

use super::{Key, ESC};
use crate::tty::{Terminal, TtyError, TtyResult};

/// Decoder state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Ground,
    Utf8,
    Escape,
    EscapeOther,
    Csi,
    CsiParam(u8),
    Ss3,
}

/// Turns raw terminal bytes into [`Key`]s
#[derive(Debug)]
pub struct KeyDecoder {
    state: State,
    /// UTF-8 decoder state
    utf8_buffer: Vec<u8>,
    utf8_remaining: u8,
    /// A byte that ended a malformed UTF-8 sequence and must be decoded again
    replay: Option<u8>,
}

impl Default for KeyDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyDecoder {
    /// Create a decoder in the ground state
    pub fn new() -> Self {
        Self {
            state: State::Ground,
            utf8_buffer: Vec::with_capacity(4),
            utf8_remaining: 0,
            replay: None,
        }
    }

    /// Reset to the ground state, dropping any partial sequence
    pub fn reset(&mut self) {
        self.state = State::Ground;
        self.utf8_buffer.clear();
        self.utf8_remaining = 0;
        self.replay = None;
    }

    /// Block until one complete key has been read from the terminal.
    ///
    /// Fails with [`TtyError::Shutdown`] once the terminal reports a
    /// shutdown request, dropping any partial sequence.
    pub fn read_key<T: Terminal + ?Sized>(&mut self, term: &mut T) -> TtyResult<Key> {
        loop {
            let input = match self.replay.take() {
                Some(byte) => Some(byte),
                None => {
                    if term.shutdown_requested() {
                        self.reset();
                        return Err(TtyError::Shutdown);
                    }
                    term.read_byte()?
                }
            };
            if let Some(key) = self.step(input) {
                return Ok(key);
            }
        }
    }

    /// Decode a chunk of bytes, returning every key it completes.
    ///
    /// A trailing partial sequence is kept until more bytes or a
    /// [`KeyDecoder::timeout`] arrive.
    pub fn feed(&mut self, data: &[u8]) -> Vec<Key> {
        let mut keys = Vec::new();
        for &byte in data {
            keys.extend(self.step(Some(byte)));
            keys.extend(self.drain_replay());
        }
        keys
    }

    /// Signal that the idle timeout expired with no byte available
    pub fn timeout(&mut self) -> Option<Key> {
        self.step(None).or_else(|| self.drain_replay())
    }

    fn drain_replay(&mut self) -> Option<Key> {
        let byte = self.replay.take()?;
        self.step(Some(byte))
    }

    /// Advance the automaton by one input unit
    fn step(&mut self, input: Option<u8>) -> Option<Key> {
        match self.state {
            State::Ground => self.process_ground(input),
            State::Utf8 => self.process_utf8_continuation(input),
            State::Escape => self.process_escape(input),
            State::EscapeOther => self.finish(Key::Escape),
            State::Csi => self.process_csi(input),
            State::CsiParam(digit) => self.process_csi_param(digit, input),
            State::Ss3 => self.process_ss3(input),
        }
    }

    /// Return to ground, emitting `key`
    fn finish(&mut self, key: Key) -> Option<Key> {
        self.state = State::Ground;
        Some(key)
    }

    fn process_ground(&mut self, input: Option<u8>) -> Option<Key> {
        match input? {
            // NUL never reaches the editor
            0x00 => None,
            ESC => {
                self.state = State::Escape;
                None
            }
            byte @ 0x01..=0x7F => Some(Key::Char(byte as char)),
            byte @ 0xC0..=0xF7 => self.start_utf8(byte),
            _ => Some(Key::Char(char::REPLACEMENT_CHARACTER)),
        }
    }

    fn process_escape(&mut self, input: Option<u8>) -> Option<Key> {
        match input {
            None => self.finish(Key::Escape),
            Some(b'[') => {
                self.state = State::Csi;
                None
            }
            Some(b'O') => {
                self.state = State::Ss3;
                None
            }
            Some(_) => {
                self.state = State::EscapeOther;
                None
            }
        }
    }

    fn process_csi(&mut self, input: Option<u8>) -> Option<Key> {
        let key = match input {
            Some(digit @ b'0'..=b'9') => {
                self.state = State::CsiParam(digit);
                return None;
            }
            Some(b'A') => Key::Up,
            Some(b'B') => Key::Down,
            Some(b'C') => Key::Right,
            Some(b'D') => Key::Left,
            Some(b'H') => Key::Home,
            Some(b'F') => Key::End,
            _ => Key::Escape,
        };
        self.finish(key)
    }

    fn process_csi_param(&mut self, digit: u8, input: Option<u8>) -> Option<Key> {
        let key = match (input, digit) {
            (Some(b'~'), b'1') | (Some(b'~'), b'7') => Key::Home,
            (Some(b'~'), b'3') => Key::Delete,
            (Some(b'~'), b'4') | (Some(b'~'), b'8') => Key::End,
            (Some(b'~'), b'5') => Key::PageUp,
            (Some(b'~'), b'6') => Key::PageDown,
            _ => Key::Escape,
        };
        self.finish(key)
    }

    fn process_ss3(&mut self, input: Option<u8>) -> Option<Key> {
        let key = match input {
            Some(b'H') => Key::Home,
            Some(b'F') => Key::End,
            _ => Key::Escape,
        };
        self.finish(key)
    }

    /// Start a multi-byte UTF-8 character
    fn start_utf8(&mut self, byte: u8) -> Option<Key> {
        let remaining = match byte {
            0xC0..=0xDF => 1,
            0xE0..=0xEF => 2,
            _ => 3,
        };
        self.utf8_buffer.clear();
        self.utf8_buffer.push(byte);
        self.utf8_remaining = remaining;
        self.state = State::Utf8;
        None
    }

    fn process_utf8_continuation(&mut self, input: Option<u8>) -> Option<Key> {
        match input {
            Some(byte @ 0x80..=0xBF) => {
                self.utf8_buffer.push(byte);
                self.utf8_remaining -= 1;
                if self.utf8_remaining > 0 {
                    return None;
                }
                let c = std::str::from_utf8(&self.utf8_buffer)
                    .ok()
                    .and_then(|s| s.chars().next())
                    .unwrap_or(char::REPLACEMENT_CHARACTER);
                self.utf8_buffer.clear();
                self.finish(Key::Char(c))
            }
            other => {
                // Truncated sequence; the interrupting byte starts a new key
                self.replay = other;
                self.utf8_buffer.clear();
                self.utf8_remaining = 0;
                self.finish(Key::Char(char::REPLACEMENT_CHARACTER))
            }
        }
    }
}
