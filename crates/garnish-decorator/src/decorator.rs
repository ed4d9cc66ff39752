//! Positional tree plus comment list to decorated tree.
//!
//! The tree is first flattened into the points trivia can attach to: the
//! `Start` and `End` of every node, every present token anchor, and every
//! present child anchor (right after the child). List separators are kept
//! in the same sequence because they decide which element a comment
//! belongs to. Each comment then falls into exactly one gap between two
//! neighbouring fragments, and the gap decides the slot:
//!
//! - comments on the line of the point in front go to its `after` slot,
//! - comments in front of a separator go to the `before` slot of the
//!   element's `End`,
//! - comments that close the line of a separator go to the `after` slot of
//!   the element's `End`, which restores behind the separator,
//! - everything else goes to the `before` slot of the point behind the gap.
//!
//! Finally the tree is rebuilt, handing out the decorations in the order the
//! points were produced.

use garnish_inputs::PositionResolver;
use garnish_syntax::ast::{self, SourceTree};
use garnish_syntax::shape::{AnchorDescriptor, SlotKind};
use garnish_syntax::{Anchor, Comment, Registry, Spacing, TextRange, TextSize};
use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::Error;
use crate::dst::{self, DecoratedTree, Decoration, Trivia};

#[derive(Clone, Copy, Debug)]
enum Fragment {
    Point(TextRange),
    Separator(TextRange),
}

impl Fragment {
    fn range(self) -> TextRange {
        match self {
            Self::Point(range) | Self::Separator(range) => range,
        }
    }
}

/// Trivia found in one gap, split between the fragments around it.
struct Gap {
    after: Vec<Trivia>,
    before: Vec<Trivia>,
}

pub struct Decorator<'a, R> {
    registry: &'a Registry,
    resolver: R,
}

impl<'a, R: PositionResolver> Decorator<'a, R> {
    pub fn new(registry: &'a Registry, resolver: R) -> Self {
        Self { registry, resolver }
    }

    /// Decorates `tree` without touching it. Fails on the first node the
    /// registry does not know and on the first offset the resolver cannot
    /// place.
    pub fn decorate(&self, tree: &SourceTree) -> Result<DecoratedTree, Error> {
        let mut fragments = Vec::new();
        self.flatten(&tree.root, &mut fragments)?;
        debug!(fragments = fragments.len(), comments = tree.comments.len(), "flattened");

        let decorations = self.assign(&fragments, &tree.comments)?;
        let mut decorations = decorations.into_iter();
        let root = self.rebuild(&tree.root, &mut decorations)?;
        Ok(DecoratedTree { root, metadata: tree.metadata.clone() })
    }

    fn check(&self, node: &ast::Node) -> Result<&'static [AnchorDescriptor], Error> {
        let anchors = self.registry.shape_of(node.kind)?.anchors();
        if anchors.len() != node.slots.len() {
            let reason = format!("expected {} slots, found {}", anchors.len(), node.slots.len());
            return Err(Error::mismatch(node.kind, Anchor::Start, reason));
        }
        for (descriptor, slot) in anchors.iter().zip(&node.slots) {
            let fits = matches!(
                (descriptor.slot, slot),
                (SlotKind::Token(_), ast::Slot::Token(_))
                    | (SlotKind::Node, ast::Slot::Node(_))
                    | (SlotKind::List(_), ast::Slot::List(_))
            );
            if !fits {
                return Err(Error::mismatch(node.kind, descriptor.anchor, "slot kind differs from shape"));
            }
        }
        Ok(anchors)
    }

    fn flatten(&self, node: &ast::Node, out: &mut Vec<Fragment>) -> Result<(), Error> {
        self.check(node)?;
        let (start, end) = self.resolver.resolve(node);

        out.push(Fragment::Point(TextRange::empty(start)));
        for slot in &node.slots {
            match slot {
                ast::Slot::Token(Some(token)) => out.push(Fragment::Point(token.range)),
                ast::Slot::Node(Some(child)) => {
                    self.flatten(child, out)?;
                    let (_, child_end) = self.resolver.resolve(child);
                    out.push(Fragment::Point(TextRange::empty(child_end)));
                }
                ast::Slot::List(list) => {
                    for (i, element) in list.nodes.iter().enumerate() {
                        self.flatten(element, out)?;
                        if let Some(&separator) = list.separators.get(i) {
                            out.push(Fragment::Separator(separator));
                        }
                    }
                }
                ast::Slot::Token(None) | ast::Slot::Node(None) => {}
            }
        }
        out.push(Fragment::Point(TextRange::empty(end)));
        Ok(())
    }

    /// One decoration per point, in flattening order.
    fn assign(&self, fragments: &[Fragment], comments: &[Comment]) -> Result<Vec<Decoration>, Error> {
        let mut decorations: Vec<Decoration> = Vec::new();
        let mut comments = comments.iter().peekable();
        let mut prev = None;

        for &fragment in fragments {
            let start = fragment.range().start();
            let mut gap = Vec::new();
            while let Some(comment) = comments.next_if(|comment| comment.range.start() < start) {
                gap.push(comment);
            }

            let Gap { after, before } = self.gap(prev, Some(fragment), &gap)?;
            if let Some(last) = decorations.last_mut() {
                last.after.extend(after);
            }
            match fragment {
                Fragment::Point(_) => decorations.push(Decoration { before, after: Vec::new() }),
                Fragment::Separator(_) => {
                    if let Some(last) = decorations.last_mut() {
                        last.before.extend(before);
                    }
                }
            }
            prev = Some(fragment);
        }

        let rest: Vec<_> = comments.collect();
        if !rest.is_empty() {
            let Gap { after, .. } = self.gap(prev, None, &rest)?;
            if let Some(last) = decorations.last_mut() {
                last.after.extend(after);
            }
        }
        Ok(decorations)
    }

    fn gap(
        &self,
        prev: Option<Fragment>,
        next: Option<Fragment>,
        comments: &[&Comment],
    ) -> Result<Gap, Error> {
        let mut line = match prev {
            Some(fragment) => Some(self.line_of(fragment.range().end())?),
            None => None,
        };

        let mut groups: Vec<Trivia> = Vec::new();
        for comment in comments {
            let first = self.line_of(comment.range.start())?;
            let delta = line.map_or(0, |line| first.saturating_sub(line));
            match groups.last_mut() {
                Some(group) if delta == 0 => group.comments.push(comment.text.clone()),
                _ => groups.push(Trivia::comment(Spacing::from_line_delta(delta), comment.text.clone())),
            }
            line = Some(self.line_of(comment.range.end())?);
        }

        let next_delta = match (line, next) {
            (Some(line), Some(next)) => self.line_of(next.range().start())?.saturating_sub(line),
            _ => 0,
        };
        let same_line = groups.first().is_some_and(|group| group.spacing == Spacing::None);

        let (after, mut before) = match (prev, next) {
            (Some(Fragment::Point(_)), None) => {
                return Ok(Gap { after: groups, before: Vec::new() });
            }
            (Some(Fragment::Point(_)), Some(Fragment::Separator(_))) => {
                return Ok(Gap { after: Vec::new(), before: groups });
            }
            (Some(Fragment::Point(_)), Some(Fragment::Point(_))) => {
                let before = groups.split_off(usize::from(same_line));
                (groups, before)
            }
            (Some(Fragment::Separator(_)), _) => {
                // `a, // a` trails `a`; `a, /* b */ b` leads `b`.
                let trailing = same_line && (groups.len() > 1 || next_delta > 0);
                let before = groups.split_off(usize::from(trailing));
                (groups, before)
            }
            (None, _) => (Vec::new(), groups),
        };

        if next_delta > 0 {
            before.push(Trivia::spacing(Spacing::from_line_delta(next_delta)));
        }
        if !comments.is_empty() {
            trace!(after = after.len(), before = before.len(), "assigned comments");
        }
        Ok(Gap { after, before })
    }

    fn rebuild(
        &self,
        node: &ast::Node,
        decorations: &mut std::vec::IntoIter<Decoration>,
    ) -> Result<dst::Node, Error> {
        let anchors = self.check(node)?;
        let mut decs = IndexMap::new();
        attach(&mut decs, Anchor::Start, decorations);

        let mut slots = Vec::with_capacity(node.slots.len());
        for (descriptor, slot) in anchors.iter().zip(&node.slots) {
            let anchor = descriptor.anchor;
            let slot = match slot {
                ast::Slot::Token(Some(token)) => {
                    attach(&mut decs, anchor, decorations);
                    dst::Slot::Token(Some(token.text.clone()))
                }
                ast::Slot::Token(None) => dst::Slot::Token(None),
                ast::Slot::Node(Some(child)) => {
                    let child = self.rebuild(child, decorations)?;
                    attach(&mut decs, anchor, decorations);
                    dst::Slot::Node(Some(Box::new(child)))
                }
                ast::Slot::Node(None) => dst::Slot::Node(None),
                ast::Slot::List(list) => dst::Slot::List(
                    list.nodes
                        .iter()
                        .map(|element| self.rebuild(element, decorations))
                        .collect::<Result<_, _>>()?,
                ),
            };
            slots.push(slot);
        }

        attach(&mut decs, Anchor::End, decorations);
        Ok(dst::Node { kind: node.kind, decs, slots })
    }

    fn line_of(&self, offset: TextSize) -> Result<u32, Error> {
        self.resolver.line_of(offset).ok_or(Error::UnresolvedPosition { offset })
    }
}

fn attach(
    decs: &mut IndexMap<Anchor, Decoration>,
    anchor: Anchor,
    decorations: &mut std::vec::IntoIter<Decoration>,
) {
    if let Some(decoration) = decorations.next().filter(|decoration| !decoration.is_empty()) {
        decs.insert(anchor, decoration);
    }
}
