//! Highlight tags
//!
//! Every rendered character of a line carries one tag selecting its
//! foreground color. Tags never alter the stored text.

/// SGR foreground code for the terminal's default color
pub const DEFAULT_FG: u8 = 39;

/// Highlight class of one rendered character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Highlight {
    #[default]
    Normal,
    /// A decimal digit
    Number,
    /// Part of the current search match
    Match,
}

impl Highlight {
    /// Classify a rendered character
    pub fn classify(c: char) -> Self {
        if c.is_ascii_digit() {
            Highlight::Number
        } else {
            Highlight::Normal
        }
    }

    /// SGR foreground color code used to draw this class
    pub fn color(self) -> u8 {
        match self {
            Highlight::Normal => DEFAULT_FG,
            Highlight::Number => 31,
            Highlight::Match => 34,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(Highlight::classify('0'), Highlight::Number);
        assert_eq!(Highlight::classify('9'), Highlight::Number);
        assert_eq!(Highlight::classify('a'), Highlight::Normal);
        assert_eq!(Highlight::classify(' '), Highlight::Normal);
    }

    #[test]
    fn test_colors() {
        assert_eq!(Highlight::Normal.color(), 39);
        assert_eq!(Highlight::Number.color(), 31);
        assert_eq!(Highlight::Match.color(), 34);
        assert_eq!(Highlight::default(), Highlight::Normal);
    }
}
