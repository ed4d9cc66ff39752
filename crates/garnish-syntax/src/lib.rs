//! Syntax definitions shared by every garnish crate.
//!
//! Token kinds for the lexer, node kinds and anchors for the trees, the shape
//! registry that ties a node kind to its anchors, and the positional tree the
//! parser produces and the restorer synthesizes.

pub mod ast;
mod node_kind;
pub mod shape;
mod syntax_kind;
mod syntax_set;
mod trivia;

pub use node_kind::{Anchor, NodeKind};
pub use shape::{Registry, Shape, UnknownShape};
pub use syntax_kind::SyntaxKind;
pub use syntax_set::SyntaxSet;
pub use text_size::{TextRange, TextSize};
pub use trivia::{Comment, CommentEntry, Spacing, is_line_comment};
