//! Terminal Renderer
//!
//! Turns the buffer and viewport into one output frame of VT100/xterm
//! control sequences. The whole frame is assembled in memory and written
//! with a single call, so the terminal never shows a half-drawn screen.
//!
//! Frame layout:
//! - `screen_rows` text rows (buffer lines, or `~` past the end)
//! - a reverse-video status bar
//! - a message bar
//!
//! Sequences used (all must stay byte-exact):
//! - `ESC [?25l` / `ESC [?25h` hide/show cursor while painting
//! - `ESC [H` cursor home, `ESC [<r>;<c>H` cursor position
//! - `ESC [K` erase to end of line
//! - `ESC [7m` reverse video, `ESC [m` reset attributes
//! - `ESC [<n>m` foreground color per highlight class

use crate::core::{Buffer, Highlight, DEFAULT_FG};
use crate::view::Viewport;

pub const HIDE_CURSOR: &str = "\x1b[?25l";
pub const SHOW_CURSOR: &str = "\x1b[?25h";
pub const CURSOR_HOME: &str = "\x1b[H";
pub const CLEAR_SCREEN: &str = "\x1b[2J";
pub const ERASE_LINE: &str = "\x1b[K";
pub const REVERSE_VIDEO: &str = "\x1b[7m";
pub const RESET_ATTRIBUTES: &str = "\x1b[m";

/// Maximum characters of the filename shown in the status bar
const STATUS_FILENAME_WIDTH: usize = 20;

/// Everything a frame shows
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub buffer: &'a Buffer,
    pub view: &'a Viewport,
    /// Name shown in the status bar
    pub filename: Option<&'a str>,
    /// Message bar text, already filtered for expiry
    pub message: Option<&'a str>,
}

/// Builds output frames, reusing one allocation across frames
#[derive(Debug, Default)]
pub struct Renderer {
    out: String,
}

/// Sequence that wipes the screen and homes the cursor, used on exit
pub fn clear_screen() -> String {
    format!("{}{}", CLEAR_SCREEN, CURSOR_HOME)
}

/// Banner shown on an empty buffer
pub fn welcome_message() -> String {
    format!("Mochi editor -- version {}", env!("CARGO_PKG_VERSION"))
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render a complete frame
    pub fn render(&mut self, frame: &Frame<'_>) -> &[u8] {
        self.out.clear();
        self.out.push_str(HIDE_CURSOR);
        self.out.push_str(CURSOR_HOME);

        self.draw_rows(frame);
        self.draw_status_bar(frame);
        self.draw_message_bar(frame);

        let view = frame.view;
        self.out.push_str(&format!(
            "\x1b[{};{}H",
            view.cy.saturating_sub(view.row_offset) + 1,
            view.rx.saturating_sub(view.col_offset) + 1
        ));
        self.out.push_str(SHOW_CURSOR);

        self.out.as_bytes()
    }

    fn draw_rows(&mut self, frame: &Frame<'_>) {
        let view = frame.view;
        let buffer = frame.buffer;

        for y in 0..view.screen_rows {
            let file_row = y + view.row_offset;
            match buffer.line(file_row) {
                Some(line) => {
                    let start = view.col_offset.min(line.render_len());
                    let end = (view.col_offset + view.screen_cols).min(line.render_len());
                    let chars = &line.render()[start..end];
                    let tags = &line.highlights()[start..end];
                    self.draw_highlighted(chars, tags);
                }
                None if buffer.is_empty() && y == view.screen_rows / 3 => {
                    self.draw_welcome(view.screen_cols);
                }
                None => self.out.push('~'),
            }

            self.out.push_str(ERASE_LINE);
            self.out.push_str("\r\n");
        }
    }

    /// Emit characters, switching color only when the class changes
    fn draw_highlighted(&mut self, chars: &[char], tags: &[Highlight]) {
        let mut current: Option<u8> = None;
        for (&c, &tag) in chars.iter().zip(tags) {
            let color = match tag {
                Highlight::Normal => None,
                other => Some(other.color()),
            };
            if color != current {
                self.out
                    .push_str(&format!("\x1b[{}m", color.unwrap_or(DEFAULT_FG)));
                current = color;
            }
            self.out.push(c);
        }
        self.out.push_str(&format!("\x1b[{}m", DEFAULT_FG));
    }

    fn draw_welcome(&mut self, cols: usize) {
        let welcome: String = welcome_message().chars().take(cols).collect();
        let mut padding = (cols - welcome.chars().count()) / 2;
        if padding > 0 {
            self.out.push('~');
            padding -= 1;
        }
        self.out.extend(std::iter::repeat(' ').take(padding));
        self.out.push_str(&welcome);
    }

    fn draw_status_bar(&mut self, frame: &Frame<'_>) {
        let cols = frame.view.screen_cols;
        let lines = frame.buffer.len();

        let name: String = frame
            .filename
            .unwrap_or("[No Name]")
            .chars()
            .take(STATUS_FILENAME_WIDTH)
            .collect();
        let modified = if frame.buffer.is_dirty() {
            " (modified)"
        } else {
            ""
        };
        let left: String = format!("{} - {} lines{}", name, lines, modified)
            .chars()
            .take(cols)
            .collect();
        let right = format!("{}/{}", frame.view.cy + 1, lines);

        self.out.push_str(REVERSE_VIDEO);
        self.out.push_str(&left);

        let mut len = left.chars().count();
        while len < cols {
            if cols - len == right.len() {
                self.out.push_str(&right);
                break;
            }
            self.out.push(' ');
            len += 1;
        }

        self.out.push_str(RESET_ATTRIBUTES);
        self.out.push_str("\r\n");
    }

    fn draw_message_bar(&mut self, frame: &Frame<'_>) {
        self.out.push_str(ERASE_LINE);
        if let Some(message) = frame.message {
            self.out
                .extend(message.chars().take(frame.view.screen_cols));
        }
    }
}
