//! Editor Controller
//!
//! The run loop: paint a frame, decode one key, dispatch it to buffer,
//! viewport or search operations. Owns the status message and the quit
//! confirmation counter.
//!
//! Everything happens on one call stack. The only place the editor waits is
//! the terminal read inside [`KeyDecoder::read_key`].

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::app::{Config, ConfigError};
use crate::core::Buffer;
use crate::input::{Key, KeyDecoder};
use crate::renderer::{clear_screen, Frame, Renderer};
use crate::search::SearchSession;
use crate::storage::{FileStorage, Storage};
use crate::tty::{Terminal, TtyError};
use crate::view::{Movement, Viewport};

/// Rows reserved below the text for the status and message bars
const RESERVED_ROWS: usize = 2;

pub const HELP_MESSAGE: &str = "HELP: Ctrl-S = save | Ctrl-Q = quit | Ctrl-F = find";

/// Error type for the editor
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error(transparent)]
    Tty(#[from] TtyError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for editor operations
pub type EditorResult<T> = Result<T, EditorError>;

/// Whether the run loop should keep going after a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Status message with the time it was set
#[derive(Debug, Clone)]
pub struct StatusMessage {
    text: String,
    set_at: Instant,
}

impl Default for StatusMessage {
    fn default() -> Self {
        Self {
            text: String::new(),
            set_at: Instant::now(),
        }
    }
}

impl StatusMessage {
    /// Replace the message and restart its timer
    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.set_at = Instant::now();
    }

    /// Current message text, expired or not
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The message, if it is non-empty and younger than `timeout`
    pub fn visible(&self, timeout: Duration) -> Option<&str> {
        if self.text.is_empty() || self.set_at.elapsed() >= timeout {
            None
        } else {
            Some(&self.text)
        }
    }
}

/// The editor: one buffer shown on one terminal
pub struct Editor<T: Terminal, S: Storage = FileStorage> {
    terminal: T,
    storage: S,
    decoder: KeyDecoder,
    renderer: Renderer,
    buffer: Buffer,
    view: Viewport,
    filename: Option<PathBuf>,
    status: StatusMessage,
    message_timeout: Duration,
    /// Configured number of extra Ctrl-Q presses on a dirty buffer
    quit_times: usize,
    /// Presses still needed before quitting
    quit_remaining: usize,
}

impl<T: Terminal, S: Storage> Editor<T, S> {
    /// Create an editor with an empty buffer, sized to the terminal
    pub fn new(mut terminal: T, storage: S, config: &Config) -> EditorResult<Self> {
        config.validate()?;
        let size = terminal.window_size()?;
        info!(rows = size.rows, cols = size.cols, "window size");

        let view = Viewport::new(
            usize::from(size.rows).saturating_sub(RESERVED_ROWS),
            usize::from(size.cols),
        );
        let mut status = StatusMessage::default();
        status.set(HELP_MESSAGE);

        Ok(Self {
            terminal,
            storage,
            decoder: KeyDecoder::new(),
            renderer: Renderer::new(),
            buffer: Buffer::new(config.tab_stop),
            view,
            filename: None,
            status,
            message_timeout: Duration::from_secs(config.message_timeout_secs),
            quit_times: config.quit_times,
            quit_remaining: config.quit_times,
        })
    }

    /// Load a file into the buffer.
    ///
    /// A missing file gives an empty buffer that will be saved under `path`.
    /// Any other load failure is reported in the status bar and also leaves
    /// an empty buffer under `path`.
    pub fn open(&mut self, path: &Path) {
        let lines = match self.storage.load(path) {
            Ok(lines) => lines,
            Err(e) if e.is_not_found() => {
                info!(path = %path.display(), "new file");
                Vec::new()
            }
            Err(e) => {
                warn!("{}", e);
                self.status.set(format!("Can't open! I/O error: {}", e));
                Vec::new()
            }
        };

        self.buffer = Buffer::from_lines(lines, self.buffer.tab_stop());
        self.view = Viewport::new(self.view.screen_rows, self.view.screen_cols);
        self.filename = Some(path.to_path_buf());
    }

    /// Run until the user quits or a shutdown is requested, then clear the
    /// screen
    pub fn run(&mut self) -> EditorResult<()> {
        loop {
            self.refresh_screen()?;
            match self.process_keypress() {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break,
                Err(EditorError::Tty(TtyError::Shutdown)) => {
                    info!("shutdown requested");
                    break;
                }
                Err(e) => return Err(e),
            }
        }
        self.terminal.write_all(clear_screen().as_bytes())?;
        info!("editor exited");
        Ok(())
    }

    /// Paint one frame
    pub fn refresh_screen(&mut self) -> EditorResult<()> {
        self.view.scroll(&self.buffer);
        let filename = self.filename.as_ref().map(|p| p.to_string_lossy());
        let frame = Frame {
            buffer: &self.buffer,
            view: &self.view,
            filename: filename.as_deref(),
            message: self.status.visible(self.message_timeout),
        };
        let bytes = self.renderer.render(&frame);
        self.terminal.write_all(bytes)?;
        Ok(())
    }

    /// Read one key from the terminal and act on it
    pub fn process_keypress(&mut self) -> EditorResult<Flow> {
        let key = self.decoder.read_key(&mut self.terminal)?;
        self.process_key(key)
    }

    /// Act on one key
    pub fn process_key(&mut self, key: Key) -> EditorResult<Flow> {
        if key.is_ctrl('q') {
            if self.buffer.is_dirty() && self.quit_remaining > 0 {
                self.status.set(format!(
                    "WARNING!!! File has unsaved changes. Press Ctrl-Q {} more times to quit.",
                    self.quit_remaining
                ));
                self.quit_remaining -= 1;
                debug!(remaining = self.quit_remaining, "quit needs confirmation");
                return Ok(Flow::Continue);
            }
            return Ok(Flow::Quit);
        }

        match key {
            k if k.is_enter() => self.insert_newline(),
            k if k.is_ctrl('s') => self.save()?,
            k if k.is_ctrl('f') => self.find()?,
            // The screen is repainted after every key anyway
            k if k.is_ctrl('l') => {}
            Key::Escape => {}
            Key::Home => self.view.home(),
            Key::End => self.view.end(&self.buffer),
            Key::Delete => {
                self.view.move_cursor(Movement::Right, &self.buffer);
                self.delete_char();
            }
            k if k.is_backspace() => self.delete_char(),
            Key::PageUp => self.view.page(Movement::Up, &self.buffer),
            Key::PageDown => self.view.page(Movement::Down, &self.buffer),
            Key::Up => self.view.move_cursor(Movement::Up, &self.buffer),
            Key::Down => self.view.move_cursor(Movement::Down, &self.buffer),
            Key::Left => self.view.move_cursor(Movement::Left, &self.buffer),
            Key::Right => self.view.move_cursor(Movement::Right, &self.buffer),
            Key::Char(c) => self.insert_char(c),
        }

        self.quit_remaining = self.quit_times;
        Ok(Flow::Continue)
    }

    /// Insert a character at the cursor
    fn insert_char(&mut self, c: char) {
        if self.view.cy == self.buffer.len() {
            self.buffer.insert_line(self.buffer.len(), "");
        }
        self.buffer.insert_char(self.view.cy, self.view.cx, c);
        self.view.cx += 1;
    }

    /// Break the line at the cursor
    fn insert_newline(&mut self) {
        if self.view.cx == 0 {
            self.buffer.insert_line(self.view.cy, "");
        } else {
            self.buffer.split_line(self.view.cy, self.view.cx);
        }
        self.view.cy += 1;
        self.view.cx = 0;
    }

    /// Erase the character before the cursor, joining lines at column 0
    fn delete_char(&mut self) {
        let view = &mut self.view;
        if view.cy == self.buffer.len() || (view.cx == 0 && view.cy == 0) {
            return;
        }

        if view.cx > 0 {
            self.buffer.delete_char(view.cy, view.cx - 1);
            view.cx -= 1;
        } else {
            view.cx = self.buffer.line(view.cy - 1).map_or(0, |line| line.len());
            self.buffer.merge_with_previous(view.cy);
            view.cy -= 1;
        }
    }

    /// Write the buffer out, asking for a name if there is none
    fn save(&mut self) -> EditorResult<()> {
        let path = match self.filename.clone() {
            Some(path) => path,
            None => match self.prompt("Save as: {} (ESC to cancel)", |_, _, _, _| {})? {
                Some(name) => PathBuf::from(name),
                None => {
                    self.status.set("Save aborted");
                    return Ok(());
                }
            }
        };
        self.filename = Some(path.clone());

        let text = self.buffer.rows_to_text();
        match self.storage.save(&path, &text) {
            Ok(()) => {
                self.buffer.mark_clean();
                self.status
                    .set(format!("{} bytes written to disk", text.len()));
            }
            Err(e) => {
                warn!("{}", e);
                self.status.set(format!("Can't save! I/O error: {}", e));
            }
        }
        Ok(())
    }

    /// Interactive incremental search
    fn find(&mut self) -> EditorResult<()> {
        let mut session = SearchSession::new(&self.view);
        let query = self.prompt(
            "Search: {} (Use ESC/Arrows/Enter)",
            |buffer, view, query, key| {
                session.on_query(buffer, view, query, key);
            },
        )?;
        debug!(?query, "search finished");
        Ok(())
    }

    /// Read a line of input in the message bar.
    ///
    /// `{}` in `template` is replaced by the input so far. `on_input` sees
    /// every key together with the current input, including the final
    /// Enter or ESC. Returns `None` if the user pressed ESC.
    pub fn prompt<F>(&mut self, template: &str, mut on_input: F) -> EditorResult<Option<String>>
    where
        F: FnMut(&mut Buffer, &mut Viewport, &str, Key),
    {
        let mut input = String::new();
        loop {
            self.status.set(template.replace("{}", &input));
            self.refresh_screen()?;

            let key = self.decoder.read_key(&mut self.terminal)?;
            if key == Key::Delete || key.is_backspace() {
                input.pop();
            } else if key == Key::Escape {
                self.status.set("");
                on_input(&mut self.buffer, &mut self.view, &input, key);
                return Ok(None);
            } else if key.is_enter() {
                if !input.is_empty() {
                    self.status.set("");
                    on_input(&mut self.buffer, &mut self.view, &input, key);
                    return Ok(Some(input));
                }
            } else if let Key::Char(c) = key {
                if c.is_ascii() && !c.is_ascii_control() {
                    input.push(c);
                }
            }

            on_input(&mut self.buffer, &mut self.view, &input, key);
        }
    }

    /// Set the status message
    pub fn set_status_message(&mut self, text: impl Into<String>) {
        self.status.set(text);
    }

    pub fn status_message(&self) -> &str {
        self.status.text()
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn view(&self) -> &Viewport {
        &self.view
    }

    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    pub fn terminal(&self) -> &T {
        &self.terminal
    }

    pub fn terminal_mut(&mut self) -> &mut T {
        &mut self.terminal
    }
}
