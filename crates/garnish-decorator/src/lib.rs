//! Comment-preserving tree edits.
//!
//! [`Decorator`] turns a parsed tree and its comments into a [`DecoratedTree`]
//! where every comment and line break hangs off a named anchor of a node.
//! Callers edit that tree freely; [`Restorer`] then synthesizes positions and
//! a comment table for the printer, so surviving trivia comes out next to the
//! same tokens it was written next to.

mod decorator;
pub mod dst;
mod error;
mod restorer;

use garnish_inputs::LineIndex;
use garnish_syntax::Registry;

pub use crate::decorator::Decorator;
pub use crate::dst::{DecoratedTree, Decoration, Trivia};
pub use crate::error::Error;
pub use crate::restorer::{AnchorPosition, Restored, Restorer};

/// Parses and decorates `text` with the built-in shapes.
pub fn decorate(text: &str) -> Result<DecoratedTree, Error> {
    let tree = garnish_parse::parse(text).into_result().map_err(Error::Syntax)?;
    let line_index = LineIndex::new(text);
    let registry = Registry::standard();
    Decorator::new(&registry, &line_index).decorate(&tree)
}

/// Restores and prints `tree` with the built-in shapes.
pub fn print(tree: &DecoratedTree) -> Result<String, Error> {
    let registry = Registry::standard();
    Restorer::new(&registry).print(tree)
}
