//! Incremental Search
//!
//! A [`SearchSession`] lives for exactly one search prompt. Each keystroke
//! in the prompt calls [`SearchSession::on_query`], which:
//!
//! 1. restores the highlight tags of the previously matched line,
//! 2. ends the session on Enter or ESC (ESC also restores the view),
//! 3. picks the direction from the arrow keys, or restarts from the top
//!    when the query text changed,
//! 4. scans at most one full pass over the buffer's rendered lines, wrapping
//!    around at either end, and highlights the first hit.

use crate::core::{Buffer, Highlight};
use crate::input::Key;
use crate::view::{rx_to_cx, ViewSnapshot, Viewport};

/// Search direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

/// Highlight tags of one line as they were before a match was painted
#[derive(Debug, Clone, PartialEq, Eq)]
struct SavedHighlight {
    row: usize,
    tags: Vec<Highlight>,
}

/// State of one interactive search
#[derive(Debug, Clone)]
pub struct SearchSession {
    /// Cursor and scroll position when the search started
    saved_view: ViewSnapshot,
    /// Line of the current match
    last_match: Option<usize>,
    direction: Direction,
    saved_highlight: Option<SavedHighlight>,
}

impl SearchSession {
    /// Start a search from the current view
    pub fn new(view: &Viewport) -> Self {
        Self {
            saved_view: view.snapshot(),
            last_match: None,
            direction: Direction::Forward,
            saved_highlight: None,
        }
    }

    /// Line of the current match, if any
    pub fn last_match(&self) -> Option<usize> {
        self.last_match
    }

    /// Current search direction
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// React to one prompt keystroke with the prompt's current text.
    ///
    /// Returns the line of a new match, if one was found.
    pub fn on_query(
        &mut self,
        buffer: &mut Buffer,
        view: &mut Viewport,
        query: &str,
        key: Key,
    ) -> Option<usize> {
        self.restore_highlight(buffer);

        match key {
            Key::Escape => {
                self.reset();
                view.restore(self.saved_view);
                return None;
            }
            k if k.is_enter() => {
                self.reset();
                return None;
            }
            Key::Right | Key::Down => self.direction = Direction::Forward,
            Key::Left | Key::Up => self.direction = Direction::Backward,
            _ => self.reset(),
        }

        if self.last_match.is_none() {
            self.direction = Direction::Forward;
        }

        let needle: Vec<char> = query.chars().collect();
        if needle.is_empty() {
            return None;
        }

        let (row, rx) = self.find_next(buffer, &needle)?;
        self.last_match = Some(row);

        if let Some(line) = buffer.line(row) {
            view.cy = row;
            view.cx = rx_to_cx(line, rx);
        }
        // Scroll so the match lands on the top row
        view.row_offset = buffer.len();
        view.scroll(buffer);

        if let Some(line) = buffer.line_mut(row) {
            self.saved_highlight = Some(SavedHighlight {
                row,
                tags: line.highlights().to_vec(),
            });
            for tag in &mut line.highlights_mut()[rx..rx + needle.len()] {
                *tag = Highlight::Match;
            }
        }

        tracing::debug!(row, rx, query, "search match");
        Some(row)
    }

    /// Scan one full pass from the line after the last match
    fn find_next(&self, buffer: &Buffer, needle: &[char]) -> Option<(usize, usize)> {
        let count = buffer.len();
        let mut current = self.last_match;

        for _ in 0..count {
            let row = match (current, self.direction) {
                (None, _) => 0,
                (Some(row), Direction::Forward) => (row + 1) % count,
                (Some(0), Direction::Backward) => count - 1,
                (Some(row), Direction::Backward) => row - 1,
            };
            current = Some(row);

            let render = buffer.line(row)?.render();
            if let Some(rx) = render
                .windows(needle.len())
                .position(|window| window == needle)
            {
                return Some((row, rx));
            }
        }
        None
    }

    /// Put back the tags the last match painted over
    fn restore_highlight(&mut self, buffer: &mut Buffer) {
        let Some(saved) = self.saved_highlight.take() else {
            return;
        };
        let Some(line) = buffer.line_mut(saved.row) else {
            return;
        };
        if line.highlights().len() == saved.tags.len() {
            line.highlights_mut().copy_from_slice(&saved.tags);
        } else {
            line.update_highlight();
        }
    }

    fn reset(&mut self) {
        self.last_match = None;
        self.direction = Direction::Forward;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DEFAULT_TAB_STOP;

    fn setup(lines: &[&str]) -> (Buffer, Viewport) {
        (
            Buffer::from_lines(lines.iter().copied(), DEFAULT_TAB_STOP),
            Viewport::new(10, 80),
        )
    }

    fn match_tags(buffer: &Buffer, row: usize) -> usize {
        buffer.lines()[row]
            .highlights()
            .iter()
            .filter(|&&h| h == Highlight::Match)
            .count()
    }

    #[test]
    fn test_search_finds_and_highlights() {
        let (mut buffer, mut view) = setup(&["alpha", "beta", "gamma"]);
        let mut session = SearchSession::new(&view);

        let hit = session.on_query(&mut buffer, &mut view, "mm", Key::Char('m'));
        assert_eq!(hit, Some(2));
        assert_eq!((view.cx, view.cy), (2, 2));
        assert_eq!(view.row_offset, 2);
        assert_eq!(match_tags(&buffer, 2), 2);
    }

    #[test]
    fn test_search_wraps_to_single_match() {
        let (mut buffer, mut view) = setup(&["a", "b", "needle", "c", "d", "e"]);
        let mut session = SearchSession::new(&view);

        assert_eq!(
            session.on_query(&mut buffer, &mut view, "needle", Key::Char('e')),
            Some(2)
        );
        assert_eq!(
            session.on_query(&mut buffer, &mut view, "needle", Key::Down),
            Some(2)
        );
        assert_eq!(view.cy, 2);
        // Only one match painted at a time
        assert_eq!(match_tags(&buffer, 2), 6);
    }

    #[test]
    fn test_search_backward_wraps() {
        let (mut buffer, mut view) = setup(&["x1", "y", "x2", "x3"]);
        let mut session = SearchSession::new(&view);

        assert_eq!(session.on_query(&mut buffer, &mut view, "x", Key::Char('x')), Some(0));
        assert_eq!(session.on_query(&mut buffer, &mut view, "x", Key::Up), Some(3));
        assert_eq!(session.direction(), Direction::Backward);
        assert_eq!(session.on_query(&mut buffer, &mut view, "x", Key::Left), Some(2));
        assert_eq!(session.on_query(&mut buffer, &mut view, "x", Key::Right), Some(3));
        assert_eq!(match_tags(&buffer, 2), 0);
    }

    #[test]
    fn test_search_restores_tags_between_queries() {
        let (mut buffer, mut view) = setup(&["a1b", "a2b"]);
        let original = buffer.lines()[0].highlights().to_vec();
        let mut session = SearchSession::new(&view);

        session.on_query(&mut buffer, &mut view, "a1", Key::Char('1'));
        assert_eq!(buffer.lines()[0].highlights()[1], Highlight::Match);

        session.on_query(&mut buffer, &mut view, "a2", Key::Char('2'));
        assert_eq!(buffer.lines()[0].highlights(), original.as_slice());
        assert_eq!(session.last_match(), Some(1));
    }

    #[test]
    fn test_search_recomputes_highlight_of_edited_row() {
        let (mut buffer, mut view) = setup(&["a1b", "xyz"]);
        let mut session = SearchSession::new(&view);
        session.on_query(&mut buffer, &mut view, "a1", Key::Char('1'));

        // Row grows while the match is painted; the saved tags no longer fit
        buffer.insert_char(0, 3, '7');
        buffer.line_mut(0).unwrap().highlights_mut()[0] = Highlight::Match;

        assert_eq!(session.on_query(&mut buffer, &mut view, "zzz", Key::Char('z')), None);
        assert_eq!(
            buffer.lines()[0].highlights(),
            &[
                Highlight::Normal,
                Highlight::Number,
                Highlight::Normal,
                Highlight::Number
            ]
        );
    }

    #[test]
    fn test_search_escape_restores_view() {
        let (mut buffer, mut view) = setup(&["one", "two", "three"]);
        view.cx = 1;
        view.cy = 1;
        let mut session = SearchSession::new(&view);

        session.on_query(&mut buffer, &mut view, "three", Key::Char('e'));
        assert_eq!(view.cy, 2);

        session.on_query(&mut buffer, &mut view, "three", Key::Escape);
        assert_eq!((view.cx, view.cy), (1, 1));
        assert_eq!(match_tags(&buffer, 2), 0);
        assert_eq!(session.last_match(), None);
    }

    #[test]
    fn test_search_enter_keeps_match_position() {
        let (mut buffer, mut view) = setup(&["one", "two"]);
        let mut session = SearchSession::new(&view);

        session.on_query(&mut buffer, &mut view, "wo", Key::Char('o'));
        session.on_query(&mut buffer, &mut view, "wo", Key::Char('\r'));
        assert_eq!((view.cx, view.cy), (1, 1));
        assert_eq!(match_tags(&buffer, 1), 0);
    }

    #[test]
    fn test_search_no_match_leaves_state() {
        let (mut buffer, mut view) = setup(&["one", "two"]);
        view.cy = 1;
        let before = buffer.clone();
        let mut session = SearchSession::new(&view);

        assert_eq!(session.on_query(&mut buffer, &mut view, "zzz", Key::Char('z')), None);
        assert_eq!(view.cy, 1);
        assert_eq!(buffer, before);
    }

    #[test]
    fn test_search_matches_rendered_text() {
        let (mut buffer, mut view) = setup(&["\tfoo"]);
        let mut session = SearchSession::new(&view);

        session.on_query(&mut buffer, &mut view, "foo", Key::Char('o'));
        assert_eq!(view.cx, 1);
        assert_eq!(buffer.lines()[0].highlights()[8], Highlight::Match);
    }

    #[test]
    fn test_search_empty_buffer() {
        let (mut buffer, mut view) = setup(&[]);
        let mut session = SearchSession::new(&view);
        assert_eq!(session.on_query(&mut buffer, &mut view, "x", Key::Char('x')), None);
    }
}
