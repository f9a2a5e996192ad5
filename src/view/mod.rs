//! Viewport Controller
//!
//! Tracks the cursor in content coordinates (`cx`, `cy`), derives the
//! render column `rx` through tab expansion, and keeps the scroll offsets
//! such that the cursor is always inside the visible window.
//!
//! `cy` ranges over `0..=buffer.len()`; `cy == buffer.len()` is the virtual
//! line past the end of the buffer, where typing appends a new line.

use crate::core::{Buffer, Line};

/// Direction of a single cursor move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Up,
    Down,
    Left,
    Right,
}

/// Saved cursor and scroll position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewSnapshot {
    pub cx: usize,
    pub cy: usize,
    pub row_offset: usize,
    pub col_offset: usize,
}

/// Cursor and scroll state for one window onto the buffer
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Viewport {
    /// Cursor column in content coordinates
    pub cx: usize,
    /// Cursor line
    pub cy: usize,
    /// Cursor column in render coordinates, derived by [`Viewport::scroll`]
    pub rx: usize,
    /// First buffer line shown
    pub row_offset: usize,
    /// First render column shown
    pub col_offset: usize,
    /// Text rows available on screen
    pub screen_rows: usize,
    /// Columns available on screen
    pub screen_cols: usize,
}

/// Map a content column to its render column
pub fn cx_to_rx(line: &Line, cx: usize) -> usize {
    let tab_stop = line.tab_stop();
    let end = cx.min(line.len());
    let mut rx = 0;
    for &c in &line.content()[..end] {
        if c == '\t' {
            rx += (tab_stop - 1) - (rx % tab_stop);
        }
        rx += 1;
    }
    rx
}

/// Map a render column back to a content column.
///
/// A render column inside a tab's expansion maps to the tab itself. Columns
/// past the end of the line map to the line length.
pub fn rx_to_cx(line: &Line, rx: usize) -> usize {
    let tab_stop = line.tab_stop();
    let mut current_rx = 0;
    for (cx, &c) in line.content().iter().enumerate() {
        if c == '\t' {
            current_rx += (tab_stop - 1) - (current_rx % tab_stop);
        }
        current_rx += 1;
        if current_rx > rx {
            return cx;
        }
    }
    line.len()
}

impl Viewport {
    /// Create a viewport of the given text area
    pub fn new(screen_rows: usize, screen_cols: usize) -> Self {
        Self {
            screen_rows,
            screen_cols,
            ..Self::default()
        }
    }

    /// Resize the text area
    pub fn resize(&mut self, screen_rows: usize, screen_cols: usize) {
        self.screen_rows = screen_rows;
        self.screen_cols = screen_cols;
    }

    /// Capture cursor and scroll position
    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            cx: self.cx,
            cy: self.cy,
            row_offset: self.row_offset,
            col_offset: self.col_offset,
        }
    }

    /// Return to a captured cursor and scroll position
    pub fn restore(&mut self, snapshot: ViewSnapshot) {
        self.cx = snapshot.cx;
        self.cy = snapshot.cy;
        self.row_offset = snapshot.row_offset;
        self.col_offset = snapshot.col_offset;
    }

    /// Recompute `rx` and adjust the scroll offsets just enough to keep the
    /// cursor visible
    pub fn scroll(&mut self, buffer: &Buffer) {
        self.rx = buffer
            .line(self.cy)
            .map_or(0, |line| cx_to_rx(line, self.cx));

        if self.cy < self.row_offset {
            self.row_offset = self.cy;
        }
        if self.cy >= self.row_offset + self.screen_rows {
            self.row_offset = (self.cy + 1).saturating_sub(self.screen_rows);
        }
        if self.rx < self.col_offset {
            self.col_offset = self.rx;
        }
        if self.rx >= self.col_offset + self.screen_cols {
            self.col_offset = (self.rx + 1).saturating_sub(self.screen_cols);
        }
    }

    /// Move the cursor one step, wrapping across line ends
    pub fn move_cursor(&mut self, movement: Movement, buffer: &Buffer) {
        let row_len = buffer.line(self.cy).map(Line::len);

        match movement {
            Movement::Up => {
                self.cy = self.cy.saturating_sub(1);
            }
            Movement::Down => {
                if self.cy < buffer.len() {
                    self.cy += 1;
                }
            }
            Movement::Left => {
                if self.cx > 0 {
                    self.cx -= 1;
                } else if self.cy > 0 {
                    self.cy -= 1;
                    self.cx = buffer.line(self.cy).map_or(0, Line::len);
                }
            }
            Movement::Right => {
                if let Some(len) = row_len {
                    if self.cx < len {
                        self.cx += 1;
                    } else {
                        self.cy += 1;
                        self.cx = 0;
                    }
                }
            }
        }

        self.clamp_cx(buffer);
    }

    /// Jump to the top (or bottom) of the window, then move a full screen
    pub fn page(&mut self, movement: Movement, buffer: &Buffer) {
        match movement {
            Movement::Up => self.cy = self.row_offset,
            Movement::Down => {
                let bottom = (self.row_offset + self.screen_rows).saturating_sub(1);
                self.cy = bottom.min(buffer.len());
            }
            Movement::Left | Movement::Right => return,
        }
        for _ in 0..self.screen_rows {
            self.move_cursor(movement, buffer);
        }
    }

    /// Snap to the start of the line
    pub fn home(&mut self) {
        self.cx = 0;
    }

    /// Snap to the end of the line
    pub fn end(&mut self, buffer: &Buffer) {
        if let Some(line) = buffer.line(self.cy) {
            self.cx = line.len();
        }
    }

    /// Clamp `cx` to the current line's length
    fn clamp_cx(&mut self, buffer: &Buffer) {
        let len = buffer.line(self.cy).map_or(0, Line::len);
        self.cx = self.cx.min(len);
    }
}
