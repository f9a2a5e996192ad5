//! Keyboard Input Module
//!
//! Decodes the raw byte stream coming from a terminal in raw mode into
//! logical keys. This is the inverse of what a terminal emulator does when
//! it encodes key presses:
//!
//! - Plain characters (including C0 controls) are passed through unchanged,
//!   decoded from UTF-8 so the original code point is preserved.
//! - Cursor and navigation keys arrive as CSI (`ESC [`) or SS3 (`ESC O`)
//!   sequences and are mapped to [`Key`] variants.
//! - A lone ESC, or any sequence we do not recognize, becomes [`Key::Escape`].
//!
//! Control combinations are not decoded here: Ctrl+letter arrives as a
//! plain control character, which callers compare against [`ctrl_key`].

mod decoder;

pub use decoder::KeyDecoder;

/// Escape byte
pub const ESC: u8 = 0x1b;

/// DEL, sent by most terminals for the Backspace key
pub const BACKSPACE: char = '\x7f';

/// Logical key produced by the decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A plain character, including control characters like `\r` or Ctrl-Q
    Char(char),

    // Cursor keys
    Up,
    Down,
    Left,
    Right,

    // Navigation
    Home,
    End,
    PageUp,
    PageDown,
    Delete,

    /// A lone ESC or an unrecognized escape sequence
    Escape,
}

impl Key {
    /// Whether this is the Ctrl combination of `letter`
    pub fn is_ctrl(self, letter: char) -> bool {
        self == Key::Char(ctrl_key(letter))
    }

    /// Whether this is the Enter key (raw mode delivers CR)
    pub fn is_enter(self) -> bool {
        self == Key::Char('\r')
    }

    /// Whether this key erases the character before the cursor
    pub fn is_backspace(self) -> bool {
        self == Key::Char(BACKSPACE) || self.is_ctrl('h')
    }
}

/// Map a letter to the control character Ctrl+letter produces.
///
/// Terminals send Ctrl combinations by clearing bits 5 and 6 of the
/// character code.
pub const fn ctrl_key(letter: char) -> char {
    ((letter as u32) & 0x1f) as u8 as char
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ctrl_key() {
        assert_eq!(ctrl_key('q'), '\x11');
        assert_eq!(ctrl_key('s'), '\x13');
        assert_eq!(ctrl_key('f'), '\x06');
        assert_eq!(ctrl_key('h'), '\x08');
        // Upper and lower case map to the same control
        assert_eq!(ctrl_key('Q'), ctrl_key('q'));
    }

    #[test]
    fn test_key_predicates() {
        assert!(Key::Char('\x11').is_ctrl('q'));
        assert!(!Key::Char('q').is_ctrl('q'));
        assert!(Key::Char('\r').is_enter());
        assert!(Key::Char('\x7f').is_backspace());
        assert!(Key::Char('\x08').is_backspace());
        assert!(!Key::Delete.is_backspace());
    }
}
