//! Decorated tree to positional tree plus comment table.
//!
//! Positions are synthesized: a counter walks the tree in the same order the
//! decorator flattened it and hands out one offset per trivia group, anchor
//! and list separator. Line breaks widen the step so that a comment table
//! sorted by offset also reads in line order. The printer only compares
//! offsets, so these need not match any real text.

use std::io;

use garnish_syntax::ast::{self, Metadata};
use garnish_syntax::shape::{ListLayout, Presence, Shape, SlotKind, TokenText};
use garnish_syntax::{Anchor, CommentEntry, NodeKind, Registry, Spacing, TextRange, TextSize};
use tracing::{debug, warn};

use crate::Error;
use crate::dst::{self, DecoratedTree, Trivia};

/// Where an anchor landed in the synthesized coordinate space.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AnchorPosition {
    pub kind: NodeKind,
    pub anchor: Anchor,
    pub offset: TextSize,
}

/// Output of [`Restorer::restore`], ready for the printer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Restored {
    pub root: ast::Node,
    /// Ordered by offset.
    pub comments: Vec<CommentEntry>,
    /// One entry per anchor instance, in walk order.
    pub positions: Vec<AnchorPosition>,
    pub metadata: Metadata,
}

pub struct Restorer<'a> {
    registry: &'a Registry,
}

impl<'a> Restorer<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    /// Each call starts from a fresh counter, so a restorer can be reused
    /// and shared between threads.
    pub fn restore(&self, tree: &DecoratedTree) -> Result<Restored, Error> {
        let mut synthesizer = Synthesizer::new(self.registry);
        let root = synthesizer.node(&tree.root)?;
        debug!(
            positions = synthesizer.positions.len(),
            comments = synthesizer.comments.len(),
            "restored"
        );

        Ok(Restored {
            root,
            comments: synthesizer.comments,
            positions: synthesizer.positions,
            metadata: tree.metadata.clone(),
        })
    }

    pub fn print(&self, tree: &DecoratedTree) -> Result<String, Error> {
        let restored = self.restore(tree)?;
        Ok(garnish_printer::print(self.registry, &restored.root, &restored.comments)?)
    }

    pub fn fprint(&self, out: &mut impl io::Write, tree: &DecoratedTree) -> Result<(), Error> {
        let text = self.print(tree)?;
        out.write_all(text.as_bytes())?;
        Ok(())
    }
}

struct Synthesizer<'a> {
    registry: &'a Registry,
    offset: u32,
    comments: Vec<CommentEntry>,
    positions: Vec<AnchorPosition>,
}

impl<'a> Synthesizer<'a> {
    fn new(registry: &'a Registry) -> Self {
        Self { registry, offset: 0, comments: Vec::new(), positions: Vec::new() }
    }

    fn advance(&mut self, spacing: Spacing) -> TextSize {
        self.offset += 1 + spacing.line_breaks() as u32;
        TextSize::new(self.offset)
    }

    fn node(&mut self, node: &dst::Node) -> Result<ast::Node, Error> {
        let restored = self.enclosed(node)?;
        self.after(node, Anchor::End);
        Ok(restored)
    }

    /// Restores `node` up to its `End` anchor, leaving out the trivia after it.
    fn enclosed(&mut self, node: &dst::Node) -> Result<ast::Node, Error> {
        let shape = self.registry.shape_of(node.kind)?;
        validate(shape, node)?;
        warn_detached(shape, node);

        let start = self.point(node, Anchor::Start);
        let mut slots = Vec::with_capacity(node.slots.len());
        for (descriptor, slot) in shape.anchors().iter().zip(&node.slots) {
            let anchor = descriptor.anchor;
            let slot = match slot {
                dst::Slot::Token(Some(text)) => {
                    let offset = self.point(node, anchor);
                    ast::Slot::Token(Some(ast::Token { text: text.clone(), range: TextRange::empty(offset) }))
                }
                dst::Slot::Token(None) => ast::Slot::Token(None),
                dst::Slot::Node(Some(child)) => {
                    let child = self.node(child)?;
                    self.point(node, anchor);
                    ast::Slot::Node(Some(Box::new(child)))
                }
                dst::Slot::Node(None) => ast::Slot::Node(None),
                dst::Slot::List(nodes) => {
                    let separated = matches!(
                        descriptor.slot,
                        SlotKind::List(ListLayout { separator: Some(_), .. })
                    );
                    let mut list = ast::List::default();
                    for element in nodes {
                        if separated {
                            // `1, // one` prints the comma ahead of the comment.
                            list.nodes.push(self.enclosed(element)?);
                            let offset = self.advance(Spacing::None);
                            list.separators.push(TextRange::empty(offset));
                            self.after(element, Anchor::End);
                        } else {
                            list.nodes.push(self.node(element)?);
                        }
                    }
                    ast::Slot::List(list)
                }
            };
            slots.push(slot);
        }
        let end = self.anchor(node, Anchor::End);

        Ok(ast::Node { kind: node.kind, range: TextRange::new(start, end), slots })
    }

    /// Before-trivia, the anchor itself, then after-trivia.
    fn point(&mut self, node: &dst::Node, anchor: Anchor) -> TextSize {
        let offset = self.anchor(node, anchor);
        self.after(node, anchor);
        offset
    }

    fn anchor(&mut self, node: &dst::Node, anchor: Anchor) -> TextSize {
        if let Some(decoration) = node.decs.get(&anchor) {
            for group in &decoration.before {
                self.trivia(group);
            }
        }
        let offset = self.advance(Spacing::None);
        self.positions.push(AnchorPosition { kind: node.kind, anchor, offset });
        offset
    }

    fn after(&mut self, node: &dst::Node, anchor: Anchor) {
        if let Some(decoration) = node.decs.get(&anchor) {
            for group in &decoration.after {
                self.trivia(group);
            }
        }
    }

    fn trivia(&mut self, group: &Trivia) {
        let offset = self.advance(group.spacing);
        self.comments.push(CommentEntry {
            offset,
            spacing: group.spacing,
            texts: group.comments.clone(),
        });
    }
}

fn validate(shape: &Shape, node: &dst::Node) -> Result<(), Error> {
    let kind = node.kind;
    let anchors = shape.anchors();
    if anchors.len() != node.slots.len() {
        let reason = format!("expected {} slots, found {}", anchors.len(), node.slots.len());
        return Err(Error::mismatch(kind, Anchor::Start, reason));
    }

    let present = |anchor: Anchor| {
        shape.index_of(anchor).and_then(|index| node.slots.get(index)).is_some_and(dst::Slot::is_present)
    };

    for (descriptor, slot) in anchors.iter().zip(&node.slots) {
        let anchor = descriptor.anchor;
        match (descriptor.slot, slot) {
            (SlotKind::Token(TokenText::Fixed(expected)), dst::Slot::Token(Some(text)))
                if **text != *expected =>
            {
                return Err(Error::mismatch(kind, anchor, format!("expected `{expected}`, found `{text}`")));
            }
            (SlotKind::Token(_), dst::Slot::Token(_))
            | (SlotKind::Node, dst::Slot::Node(_))
            | (SlotKind::List(_), dst::Slot::List(_)) => {}
            _ => return Err(Error::mismatch(kind, anchor, "slot kind differs from shape")),
        }

        match descriptor.presence {
            Presence::Required if !slot.is_present() => {
                return Err(Error::mismatch(kind, anchor, "required anchor is missing"));
            }
            Presence::With(other) if slot.is_present() != present(other) => {
                let reason = if slot.is_present() {
                    format!("present without `{other}`")
                } else {
                    format!("missing although `{other}` is present")
                };
                return Err(Error::mismatch(kind, anchor, reason));
            }
            _ => {}
        }
    }
    Ok(())
}

/// Trivia keyed on an anchor that prints nothing cannot be placed.
fn warn_detached(shape: &Shape, node: &dst::Node) {
    for (&anchor, decoration) in &node.decs {
        if decoration.is_empty() || matches!(anchor, Anchor::Start | Anchor::End) {
            continue;
        }
        let attached = shape.index_of(anchor).and_then(|index| node.slots.get(index)).is_some_and(
            |slot| matches!(slot, dst::Slot::Token(Some(_)) | dst::Slot::Node(Some(_))),
        );
        if !attached {
            warn!(kind = %node.kind, anchor = %anchor, "dropping trivia on an absent anchor");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_widen_with_line_breaks() {
        let registry = Registry::standard();
        let mut synthesizer = Synthesizer::new(&registry);
        assert_eq!(synthesizer.advance(Spacing::None), TextSize::new(1));
        assert_eq!(synthesizer.advance(Spacing::Newline), TextSize::new(3));
        assert_eq!(synthesizer.advance(Spacing::Blank), TextSize::new(6));
    }

    #[test]
    fn fixed_tokens_must_keep_their_text() {
        let mut call = dst::Node::call(dst::Node::ident("f"), Vec::new());
        call.set_token(Anchor::Lparen, Some("[".into())).unwrap();
        let err = validate(&garnish_syntax::shape::CALL_EXPR, &call).unwrap_err();
        assert_eq!(err.to_string(), "`CallExpr` does not fit its shape at `Lparen`: expected `(`, found `[`");
    }

    #[test]
    fn conditional_anchors_follow_their_condition() {
        let mut spec = dst::Node::new(NodeKind::ValueSpec);
        spec.list_mut(Anchor::Names).unwrap().push(dst::Node::ident("x"));
        spec.set_token(Anchor::Assign, Some("=".into())).unwrap();
        let err = validate(&garnish_syntax::shape::VALUE_SPEC, &spec).unwrap_err();
        assert!(matches!(
            err,
            Error::StructuralMismatch { kind: NodeKind::ValueSpec, anchor: Anchor::Values, .. }
        ));

        spec.list_mut(Anchor::Values).unwrap().push(dst::Node::basic_lit("1"));
        assert!(validate(&garnish_syntax::shape::VALUE_SPEC, &spec).is_ok());
    }
}
