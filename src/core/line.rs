//! Buffer line representation
//!
//! A line keeps its stored characters, the rendered form shown on screen
//! (tabs expanded to the next tab stop) and one highlight tag per rendered
//! character. The rendered form and tags are rebuilt in full whenever the
//! content changes.

use super::highlight::Highlight;

/// Default distance between tab stops
pub const DEFAULT_TAB_STOP: usize = 8;

/// A line of text in the buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Stored characters
    content: Vec<char>,
    /// Characters as drawn, tabs expanded
    render: Vec<char>,
    /// One tag per rendered character
    highlights: Vec<Highlight>,
    /// Tab stop width used for rendering
    tab_stop: usize,
}

impl Line {
    /// Create a line from text, rendering it immediately
    pub fn new(text: &str, tab_stop: usize) -> Self {
        Self::from_chars(text.chars().collect(), tab_stop)
    }

    /// Create a line from stored characters
    pub fn from_chars(content: Vec<char>, tab_stop: usize) -> Self {
        let mut line = Self {
            content,
            render: Vec::new(),
            highlights: Vec::new(),
            tab_stop: tab_stop.max(1),
        };
        line.update();
        line
    }

    /// Number of stored characters
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Check if the line has no characters
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Number of rendered characters
    pub fn render_len(&self) -> usize {
        self.render.len()
    }

    /// Stored characters
    pub fn content(&self) -> &[char] {
        &self.content
    }

    /// Rendered characters
    pub fn render(&self) -> &[char] {
        &self.render
    }

    /// Highlight tags, parallel to [`Line::render`]
    pub fn highlights(&self) -> &[Highlight] {
        &self.highlights
    }

    /// Mutable highlight tags; the length cannot change
    pub fn highlights_mut(&mut self) -> &mut [Highlight] {
        &mut self.highlights
    }

    /// Tab stop width used for rendering
    pub fn tab_stop(&self) -> usize {
        self.tab_stop
    }

    /// Stored text as a string
    pub fn text(&self) -> String {
        self.content.iter().collect()
    }

    /// Rendered text as a string
    pub fn render_text(&self) -> String {
        self.render.iter().collect()
    }

    /// Insert a character, clamping `at` to the end of the line
    pub fn insert_char(&mut self, at: usize, c: char) {
        let at = at.min(self.content.len());
        self.content.insert(at, c);
        self.update();
    }

    /// Remove the character at `at`. Returns false if there is none.
    pub fn delete_char(&mut self, at: usize) -> bool {
        if at >= self.content.len() {
            return false;
        }
        self.content.remove(at);
        self.update();
        true
    }

    /// Append characters to the end of the line
    pub fn append(&mut self, chars: &[char]) {
        self.content.extend_from_slice(chars);
        self.update();
    }

    /// Cut the line at `at`, returning everything from `at` onwards
    pub fn split_off(&mut self, at: usize) -> Vec<char> {
        let at = at.min(self.content.len());
        let tail = self.content.split_off(at);
        self.update();
        tail
    }

    /// Rebuild the rendered form and highlight tags from the content
    pub fn update(&mut self) {
        let tabs = self.content.iter().filter(|&&c| c == '\t').count();
        self.render.clear();
        self.render
            .reserve(self.content.len() + tabs * (self.tab_stop - 1));

        for &c in &self.content {
            if c == '\t' {
                self.render.push(' ');
                while self.render.len() % self.tab_stop != 0 {
                    self.render.push(' ');
                }
            } else {
                self.render.push(c);
            }
        }

        self.update_highlight();
    }

    /// Recompute the highlight tags from the rendered form
    pub fn update_highlight(&mut self) {
        self.highlights.clear();
        self.highlights
            .extend(self.render.iter().map(|&c| Highlight::classify(c)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_line_plain() {
        let line = Line::new("hello", DEFAULT_TAB_STOP);
        assert_eq!(line.len(), 5);
        assert_eq!(line.render_len(), 5);
        assert_eq!(line.render_text(), "hello");
        assert_eq!(line.highlights().len(), 5);
    }

    #[test]
    fn test_line_tab_expansion() {
        let line = Line::new("\tx", DEFAULT_TAB_STOP);
        assert_eq!(line.render_text(), "        x");

        let line = Line::new("abc\tx", DEFAULT_TAB_STOP);
        assert_eq!(line.render_text(), "abc     x");

        // A tab at a stop boundary still takes a full stop
        let line = Line::new("abcdefgh\tx", DEFAULT_TAB_STOP);
        assert_eq!(line.render_len(), 17);
    }

    #[test]
    fn test_line_custom_tab_stop() {
        let line = Line::new("a\tb", 4);
        assert_eq!(line.render_text(), "a   b");
        assert_eq!(line.tab_stop(), 4);
    }

    #[test]
    fn test_line_number_highlight() {
        let line = Line::new("3a7", DEFAULT_TAB_STOP);
        assert_eq!(
            line.highlights(),
            &[Highlight::Number, Highlight::Normal, Highlight::Number]
        );
    }

    #[test]
    fn test_line_insert_clamps() {
        let mut line = Line::new("ab", DEFAULT_TAB_STOP);
        line.insert_char(100, 'c');
        assert_eq!(line.text(), "abc");
        line.insert_char(0, '1');
        assert_eq!(line.text(), "1abc");
        assert_eq!(line.highlights()[0], Highlight::Number);
    }

    #[test]
    fn test_line_delete_out_of_range() {
        let mut line = Line::new("ab", DEFAULT_TAB_STOP);
        assert!(!line.delete_char(2));
        assert!(line.delete_char(0));
        assert_eq!(line.text(), "b");
    }

    #[test]
    fn test_line_split_and_append() {
        let mut line = Line::new("hello world", DEFAULT_TAB_STOP);
        let tail = line.split_off(5);
        assert_eq!(line.text(), "hello");
        assert_eq!(tail.iter().collect::<String>(), " world");

        line.append(&tail);
        assert_eq!(line.text(), "hello world");
    }

    proptest! {
        #[test]
        fn prop_render_invariants(s in "[a-z0-9\t ]{0,40}") {
            let line = Line::new(&s, DEFAULT_TAB_STOP);
            prop_assert_eq!(line.highlights().len(), line.render_len());
            prop_assert!(line.render_len() >= line.len());
            prop_assert!(!line.render().contains(&'\t'));
        }

        #[test]
        fn prop_insert_then_delete_is_identity(
            s in "[a-z\t]{0,30}",
            at in 0usize..40,
            c in proptest::char::range(' ', '~'),
        ) {
            let original = Line::new(&s, DEFAULT_TAB_STOP);
            let mut line = original.clone();
            let at = at.min(line.len());
            line.insert_char(at, c);
            line.delete_char(at);
            prop_assert_eq!(line, original);
        }
    }
}
