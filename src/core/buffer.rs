//! Text buffer
//!
//! An ordered list of lines plus the dirty flag. Line numbers are indices
//! into the list; inserting or removing a line shifts the lines after it and
//! leaves the ones before it untouched. Every mutating operation marks the
//! buffer dirty, out-of-range operations are silent no-ops.

use super::line::{Line, DEFAULT_TAB_STOP};

/// The editor's text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    lines: Vec<Line>,
    dirty: bool,
    tab_stop: usize,
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new(DEFAULT_TAB_STOP)
    }
}

impl Buffer {
    /// Create an empty buffer
    pub fn new(tab_stop: usize) -> Self {
        Self {
            lines: Vec::new(),
            dirty: false,
            tab_stop: tab_stop.max(1),
        }
    }

    /// Create a clean buffer holding the given lines
    pub fn from_lines<I, S>(lines: I, tab_stop: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut buffer = Self::new(tab_stop);
        for text in lines {
            buffer.insert_line(buffer.len(), text.as_ref());
        }
        buffer.dirty = false;
        buffer
    }

    /// Number of lines
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the buffer has no lines
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get a line
    pub fn line(&self, at: usize) -> Option<&Line> {
        self.lines.get(at)
    }

    /// Get a mutable line.
    ///
    /// Direct access is for overlays such as search highlights; content
    /// edits go through the buffer so the dirty flag stays correct.
    pub fn line_mut(&mut self, at: usize) -> Option<&mut Line> {
        self.lines.get_mut(at)
    }

    /// All lines
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Tab stop width
    pub fn tab_stop(&self) -> usize {
        self.tab_stop
    }

    /// Whether there are modifications since the last load or save
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag after a successful save
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Insert a new line before line `at` (`at == len()` appends)
    pub fn insert_line(&mut self, at: usize, text: &str) {
        if at > self.lines.len() {
            return;
        }
        self.lines.insert(at, Line::new(text, self.tab_stop));
        self.dirty = true;
    }

    /// Remove line `at`
    pub fn delete_line(&mut self, at: usize) {
        if at >= self.lines.len() {
            return;
        }
        self.lines.remove(at);
        self.dirty = true;
    }

    /// Insert a character into line `row`, clamping `at` to the line end
    pub fn insert_char(&mut self, row: usize, at: usize, c: char) {
        if let Some(line) = self.lines.get_mut(row) {
            line.insert_char(at, c);
            self.dirty = true;
        }
    }

    /// Append text to the end of line `row`
    pub fn append_string(&mut self, row: usize, s: &str) {
        if let Some(line) = self.lines.get_mut(row) {
            let chars: Vec<char> = s.chars().collect();
            line.append(&chars);
            self.dirty = true;
        }
    }

    /// Remove the character at `at` in line `row`
    pub fn delete_char(&mut self, row: usize, at: usize) {
        if let Some(line) = self.lines.get_mut(row) {
            if line.delete_char(at) {
                self.dirty = true;
            }
        }
    }

    /// Split line `row` at `at`; the tail becomes a new line below
    pub fn split_line(&mut self, row: usize, at: usize) {
        let Some(line) = self.lines.get_mut(row) else {
            return;
        };
        let tail = line.split_off(at);
        self.lines
            .insert(row + 1, Line::from_chars(tail, self.tab_stop));
        self.dirty = true;
    }

    /// Join line `row` onto the end of line `row - 1`
    pub fn merge_with_previous(&mut self, row: usize) {
        if row == 0 || row >= self.lines.len() {
            return;
        }
        let line = self.lines.remove(row);
        self.lines[row - 1].append(line.content());
        self.dirty = true;
    }

    /// The whole text, each line followed by a newline
    pub fn rows_to_text(&self) -> String {
        let mut text = String::new();
        for line in &self.lines {
            text.extend(line.content());
            text.push('\n');
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(buffer: &Buffer) -> Vec<String> {
        buffer.lines().iter().map(Line::text).collect()
    }

    #[test]
    fn test_from_lines_is_clean() {
        let buffer = Buffer::from_lines(["one", "two"], DEFAULT_TAB_STOP);
        assert_eq!(buffer.len(), 2);
        assert!(!buffer.is_dirty());
    }

    #[test]
    fn test_insert_line_bounds() {
        let mut buffer = Buffer::from_lines(["a", "c"], DEFAULT_TAB_STOP);
        buffer.insert_line(5, "x");
        assert_eq!(buffer.len(), 2);
        assert!(!buffer.is_dirty());

        buffer.insert_line(1, "b");
        buffer.insert_line(3, "d");
        assert_eq!(texts(&buffer), vec!["a", "b", "c", "d"]);
        assert!(buffer.is_dirty());
    }

    #[test]
    fn test_delete_line_keeps_other_indices() {
        let mut buffer = Buffer::from_lines(["a", "b", "c"], DEFAULT_TAB_STOP);
        buffer.delete_line(3);
        assert!(!buffer.is_dirty());
        buffer.delete_line(1);
        assert_eq!(texts(&buffer), vec!["a", "c"]);
        assert!(buffer.is_dirty());
    }

    #[test]
    fn test_char_edits() {
        let mut buffer = Buffer::from_lines(["ac"], DEFAULT_TAB_STOP);
        buffer.insert_char(0, 1, 'b');
        assert_eq!(texts(&buffer), vec!["abc"]);

        buffer.append_string(0, "de");
        assert_eq!(texts(&buffer), vec!["abcde"]);

        buffer.delete_char(0, 0);
        assert_eq!(texts(&buffer), vec!["bcde"]);

        // Missing row is ignored
        buffer.insert_char(9, 0, 'z');
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn test_delete_char_out_of_range_stays_clean() {
        let mut buffer = Buffer::from_lines(["ab"], DEFAULT_TAB_STOP);
        buffer.delete_char(0, 2);
        assert!(!buffer.is_dirty());
        assert_eq!(texts(&buffer), vec!["ab"]);
    }

    #[test]
    fn test_split_and_merge() {
        let mut buffer = Buffer::from_lines(["hello world"], DEFAULT_TAB_STOP);
        buffer.split_line(0, 5);
        assert_eq!(texts(&buffer), vec!["hello", " world"]);

        buffer.merge_with_previous(1);
        assert_eq!(texts(&buffer), vec!["hello world"]);

        buffer.merge_with_previous(0);
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn test_rows_to_text() {
        let buffer = Buffer::from_lines(["a", "", "b\tc"], DEFAULT_TAB_STOP);
        assert_eq!(buffer.rows_to_text(), "a\n\nb\tc\n");
        assert_eq!(Buffer::default().rows_to_text(), "");
    }

    #[test]
    fn test_mark_clean() {
        let mut buffer = Buffer::default();
        buffer.insert_line(0, "x");
        assert!(buffer.is_dirty());
        buffer.mark_clean();
        assert!(!buffer.is_dirty());
    }
}
