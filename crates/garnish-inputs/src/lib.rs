//! Source inputs and the position resolver the decorator works against.

use camino::{Utf8Path, Utf8PathBuf};
use garnish_syntax::ast;
pub use line_index::{LineCol, LineIndex};
use text_size::TextSize;

/// Maps offsets to lines for the decorator.
///
/// Line deltas between neighbouring tokens and comments decide how trivia is
/// classified, so implementations must count lines exactly like the lexer:
/// every `\n` starts a new line.
pub trait PositionResolver {
    /// Zero-based line of `offset`, or `None` when the offset is outside the text.
    fn line_of(&self, offset: TextSize) -> Option<u32>;

    fn resolve(&self, node: &ast::Node) -> (TextSize, TextSize) {
        (node.range.start(), node.range.end())
    }
}

impl PositionResolver for LineIndex {
    fn line_of(&self, offset: TextSize) -> Option<u32> {
        self.try_line_col(offset).map(|line_col| line_col.line)
    }
}

impl<R: PositionResolver + ?Sized> PositionResolver for &R {
    fn line_of(&self, offset: TextSize) -> Option<u32> {
        (**self).line_of(offset)
    }

    fn resolve(&self, node: &ast::Node) -> (TextSize, TextSize) {
        (**self).resolve(node)
    }
}

#[derive(Debug)]
pub struct File {
    path: Utf8PathBuf,
    text: String,
    line_index: LineIndex,
}

impl File {
    pub fn new(path: impl Into<Utf8PathBuf>, text: String) -> Self {
        let line_index = LineIndex::new(&text);
        Self { path: path.into(), text, line_index }
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    pub fn line_col(&self, offset: TextSize) -> Option<LineCol> {
        self.line_index.try_line_col(offset)
    }

    pub fn offset(&self, line_col: LineCol) -> Option<TextSize> {
        self.line_index.offset(line_col)
    }
}

impl PositionResolver for File {
    fn line_of(&self, offset: TextSize) -> Option<u32> {
        self.line_index.line_of(offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_count_newlines() {
        let file = File::new("main.go", "package main\n\nfunc main() {}\n".to_owned());
        assert_eq!(file.line_of(TextSize::new(0)), Some(0));
        assert_eq!(file.line_of(TextSize::new(12)), Some(0));
        assert_eq!(file.line_of(TextSize::new(13)), Some(1));
        assert_eq!(file.line_of(TextSize::new(14)), Some(2));
        assert_eq!(file.line_of(TextSize::new(29)), Some(3));
    }

    #[test]
    fn offsets_past_the_end_do_not_resolve() {
        let file = File::new("main.go", "package main".to_owned());
        assert_eq!(file.line_of(TextSize::new(12)), Some(0));
        assert_eq!(file.line_of(TextSize::new(13)), None);
    }

    #[test]
    fn line_col_maps_back_to_offset() {
        let file = File::new("main.go", "package main\nfunc f() {}\n".to_owned());
        let line_col = file.line_col(TextSize::new(18)).unwrap();
        assert_eq!((line_col.line, line_col.col), (1, 5));
        assert_eq!(file.offset(line_col), Some(TextSize::new(18)));
        assert_eq!(file.path(), "main.go");
    }
}
