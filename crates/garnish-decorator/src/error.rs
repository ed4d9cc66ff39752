use std::io;

use garnish_errors::Diagnostic;
use garnish_syntax::{Anchor, NodeKind, UnknownShape};
use text_size::TextSize;

/// Everything that stops a tree from being decorated, restored or printed.
///
/// None of these are recoverable for the tree at hand: no partially
/// decorated or partially restored tree is ever returned.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    UnknownShape(#[from] UnknownShape),

    #[error("offset {offset:?} does not resolve to a line")]
    UnresolvedPosition { offset: TextSize },

    #[error("`{kind}` does not fit its shape at `{anchor}`: {reason}")]
    StructuralMismatch { kind: NodeKind, anchor: Anchor, reason: String },

    #[error("source has {} syntax error(s)", .0.len())]
    Syntax(Vec<Diagnostic>),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    pub(crate) fn mismatch(kind: NodeKind, anchor: Anchor, reason: impl Into<String>) -> Self {
        Self::StructuralMismatch { kind, anchor, reason: reason.into() }
    }
}
