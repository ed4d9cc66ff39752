//! Comments and the spacing classifier shared by decorator, restorer and printer.

use text_size::{TextRange, TextSize};

/// Line breaks in front of a trivia group.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub enum Spacing {
    /// Same line as whatever precedes it.
    #[default]
    None,
    /// Exactly one line break.
    Newline,
    /// Two or more line breaks, kept as a single blank line.
    Blank,
}

impl Spacing {
    pub fn from_line_delta(delta: u32) -> Self {
        match delta {
            0 => Self::None,
            1 => Self::Newline,
            _ => Self::Blank,
        }
    }

    pub fn line_breaks(self) -> usize {
        match self {
            Self::None => 0,
            Self::Newline => 1,
            Self::Blank => 2,
        }
    }
}

/// A comment as found by the lexer.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Comment {
    pub text: Box<str>,
    pub range: TextRange,
}

impl Comment {
    pub fn is_line_comment(&self) -> bool {
        is_line_comment(&self.text)
    }
}

pub fn is_line_comment(text: &str) -> bool {
    text.starts_with("//")
}

/// One row of the comment table handed to the printer.
///
/// `texts` is empty when the entry only carries line breaks.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommentEntry {
    pub offset: TextSize,
    pub spacing: Spacing,
    pub texts: Vec<Box<str>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_delta_collapses_past_two() {
        assert_eq!(Spacing::from_line_delta(0), Spacing::None);
        assert_eq!(Spacing::from_line_delta(1), Spacing::Newline);
        assert_eq!(Spacing::from_line_delta(2), Spacing::Blank);
        assert_eq!(Spacing::from_line_delta(7), Spacing::Blank);
        assert_eq!(Spacing::from_line_delta(7).line_breaks(), 2);
    }

    #[test]
    fn spacing_orders_by_line_breaks() {
        assert!(Spacing::None < Spacing::Newline);
        assert_eq!(Spacing::Newline.max(Spacing::Blank), Spacing::Blank);
    }
}
