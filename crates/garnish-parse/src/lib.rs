//! Parser for the Go subset garnish decorates.
//!
//! Produces the positional tree of [`garnish_syntax::ast`] together with the
//! comments the lexer set aside, so that nothing of the source is lost.

use garnish_errors::Diagnostic;
use garnish_syntax::ast::{Metadata, Node, SourceTree};
use garnish_syntax::{Anchor, Comment};

mod grammar;
mod parser;
#[cfg(test)]
mod tests;

/// Result of parsing one file. The tree is always complete; malformed
/// regions show up as `Bad*` nodes alongside a diagnostic.
#[derive(Debug)]
pub struct Parse {
    pub tree: SourceTree,
    pub diagnostics: Vec<Diagnostic>,
}

impl Parse {
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn into_result(self) -> Result<SourceTree, Vec<Diagnostic>> {
        if self.diagnostics.is_empty() { Ok(self.tree) } else { Err(self.diagnostics) }
    }
}

pub fn parse(text: &str) -> Parse {
    let mut parser = parser::Parser::new(text);
    let root = grammar::items::file(&mut parser);
    let (comments, diagnostics) = parser.finish();
    let metadata = metadata(&root, &comments);
    Parse { tree: SourceTree { root, comments, metadata }, diagnostics }
}

/// Build constraints ahead of the package clause, e.g. `//go:build go1.21`,
/// record the language version the file targets.
fn metadata(root: &Node, comments: &[Comment]) -> Metadata {
    let mut metadata = Metadata::default();
    let package = root.token(Anchor::Package).map_or(root.range.end(), |token| token.range.start());

    let version = comments
        .iter()
        .take_while(|comment| comment.range.end() <= package)
        .filter_map(|comment| comment.text.strip_prefix("//go:build"))
        .flat_map(|constraint| {
            constraint.split(|c: char| !(c.is_ascii_alphanumeric() || c == '.'))
        })
        .find(|term| term.starts_with("go1."));

    if let Some(version) = version {
        metadata.insert("go_version", version);
    }
    metadata
}
