//! Canonical printer for positional trees.
//!
//! The printer walks a tree in shape order and writes tokens with canonical
//! spacing. Comments come from a separate table ordered by position: every
//! entry whose offset lies below the next token is written before it. Line
//! breaks recorded in the table and line breaks implied by the layout are
//! merged, the larger one wins.

use garnish_syntax::ast::{self, Slot};
use garnish_syntax::shape::{AnchorDescriptor, Gap, ListLayout, ListStyle, SlotKind};
use garnish_syntax::{
    Anchor, CommentEntry, NodeKind, Registry, Spacing, UnknownShape, is_line_comment,
};
use text_size::TextSize;

pub fn print(
    registry: &Registry,
    root: &ast::Node,
    comments: &[CommentEntry],
) -> Result<String, UnknownShape> {
    let mut printer = Printer::new(registry, comments);
    printer.node(root)?;
    Ok(printer.finish())
}

/// Layout that applies to the next token once the comments in front of it
/// have been written.
#[derive(Default)]
struct Layout {
    newlines: usize,
    space: bool,
}

struct Printer<'a> {
    registry: &'a Registry,
    comments: &'a [CommentEntry],
    next_comment: usize,

    out: String,
    line: usize,
    at_line_start: bool,
    tokens: usize,

    /// Line breaks requested by comments.
    newlines: usize,
    /// A block comment asks for a space before whatever follows it.
    space: bool,
    layout: Layout,

    /// Output line of every open delimiter.
    open: Vec<usize>,
    /// The last token written opens a delimiter.
    opened: bool,
    /// Extra indentation of continued expressions.
    continuation: usize,
    dedent: bool,
}

impl<'a> Printer<'a> {
    fn new(registry: &'a Registry, comments: &'a [CommentEntry]) -> Self {
        Self {
            registry,
            comments,
            next_comment: 0,
            out: String::new(),
            line: 0,
            at_line_start: true,
            tokens: 0,
            newlines: 0,
            space: false,
            layout: Layout::default(),
            open: Vec::new(),
            opened: false,
            continuation: 0,
            dedent: false,
        }
    }

    fn node(&mut self, node: &ast::Node) -> Result<(), UnknownShape> {
        let shape = self.registry.shape_of(node.kind)?;
        let tokens = self.tokens;
        let continuation = self.continuation;
        if node.kind == NodeKind::CaseClause {
            self.dedent = true;
        }

        for (index, (descriptor, slot)) in shape.anchors().iter().zip(&node.slots).enumerate() {
            if self.tokens != tokens
                && continues(node.kind, descriptor.anchor)
                && slot_start(slot).is_some_and(|pos| self.breaks_before(pos))
            {
                self.continuation += 1;
            }

            match slot {
                Slot::Token(Some(token)) => {
                    self.gap(tokens, descriptor.gap, || space_if_content(node, index));
                    self.token(token.range.start(), &token.text);
                }
                Slot::Node(Some(child)) => {
                    self.gap(tokens, descriptor.gap, || {
                        first_token(child).is_none_or(|token| &*token.text != "(")
                    });
                    self.node(child)?;
                }
                Slot::List(list) if !list.nodes.is_empty() => {
                    let SlotKind::List(layout) = descriptor.slot else {
                        continue;
                    };
                    let bound = next_token(node, index);
                    self.list(node, descriptor, layout, list, bound, tokens)?;
                }
                _ => {}
            }
        }
        self.continuation = continuation;
        Ok(())
    }

    fn list(
        &mut self,
        node: &ast::Node,
        descriptor: &AnchorDescriptor,
        layout: ListLayout,
        list: &ast::List,
        bound: Option<TextSize>,
        tokens: usize,
    ) -> Result<(), UnknownShape> {
        let lines = match layout.style {
            ListStyle::Inline => false,
            ListStyle::Lines => true,
            ListStyle::Grouped => node.token(Anchor::Lparen).is_some(),
        };

        let last = list.nodes.len() - 1;
        for (i, element) in list.nodes.iter().enumerate() {
            if lines {
                self.layout.newlines = self.layout.newlines.max(1);
            } else if i == 0 {
                self.gap(tokens, descriptor.gap, || true);
            } else {
                self.layout.space = true;
            }

            self.node(element)?;

            if let Some(separator) = layout.separator {
                let pos = list.separators.get(i).map_or(element.range.end(), |range| range.start());
                let trailing = i == last;
                if !trailing || bound.is_some_and(|bound| self.breaks_between(pos, bound)) {
                    self.token(pos, separator);
                }
            }
        }

        if lines {
            self.layout.newlines = self.layout.newlines.max(1);
        }
        Ok(())
    }

    /// Applies the gap in front of an anchor. Nothing separates the first
    /// printed anchor of a node from what precedes the node itself.
    fn gap(&mut self, tokens: usize, gap: Gap, content: impl FnOnce() -> bool) {
        if self.tokens == tokens {
            return;
        }
        match gap {
            Gap::Glue => {}
            Gap::Space => self.layout.space = true,
            Gap::SpaceIfContent | Gap::SpaceUnlessParen => {
                if content() {
                    self.layout.space = true;
                }
            }
            Gap::Line => self.layout.newlines = self.layout.newlines.max(1),
        }
    }

    /// Whether a trailing separator at `pos` is needed because the list is
    /// closed on a later line.
    fn breaks_between(&self, pos: TextSize, bound: TextSize) -> bool {
        self.comments[self.next_comment..]
            .iter()
            .skip_while(|entry| entry.offset <= pos)
            .take_while(|entry| entry.offset < bound)
            .any(|entry| {
                entry.spacing != Spacing::None || entry.texts.iter().any(|text| is_line_comment(text))
            })
    }

    /// Whether the next token, at `pos`, starts a new line.
    fn breaks_before(&self, pos: TextSize) -> bool {
        self.newlines > 0
            || self.layout.newlines > 0
            || self.comments[self.next_comment..].iter().take_while(|entry| entry.offset < pos).any(
                |entry| {
                    entry.spacing != Spacing::None
                        || entry.texts.iter().any(|text| is_line_comment(text))
                },
            )
    }

    fn token(&mut self, pos: TextSize, text: &str) {
        self.flush(pos);
        let closer = matches!(text, ")" | "]" | "}");
        if closer {
            self.open.pop();
        }

        let newlines = self.newlines.max(self.layout.newlines);
        // `( /* x */ )` keeps the comment off both delimiters.
        let space = if closer {
            self.space && self.opened
        } else {
            self.space || (self.layout.space && !self.after_opener())
        };
        self.newlines = 0;
        self.layout = Layout::default();
        self.space = false;

        self.break_lines(newlines);
        if self.at_line_start {
            self.indent();
        } else if space && !matches!(text, "," | ";") {
            self.out.push(' ');
        }

        self.write(text);
        self.tokens += 1;
        self.dedent = false;
        self.opened = matches!(text, "(" | "[" | "{");
        if self.opened {
            self.open.push(self.line);
        }
    }

    fn flush(&mut self, pos: TextSize) {
        while let Some(entry) = self.comments.get(self.next_comment) {
            if entry.offset >= pos {
                break;
            }
            self.next_comment += 1;
            self.newlines = self.newlines.max(entry.spacing.line_breaks());
            for text in &entry.texts {
                self.comment(text);
            }
        }
    }

    fn comment(&mut self, text: &str) {
        let newlines = std::mem::take(&mut self.newlines);
        if newlines > 0 {
            // A comment that opens a line also opens it for the token after it.
            self.layout.newlines = 0;
        }
        self.break_lines(newlines);
        if self.at_line_start {
            self.indent();
        } else {
            self.out.push(' ');
        }
        self.write(text);

        if is_line_comment(text) {
            self.newlines = 1;
            self.space = false;
        } else {
            self.space = true;
        }
    }

    fn break_lines(&mut self, newlines: usize) {
        if newlines == 0 || self.out.is_empty() {
            return;
        }
        for _ in 0..newlines.min(2) {
            self.out.push('\n');
        }
        self.line += newlines.min(2);
        self.at_line_start = true;
    }

    fn indent(&mut self) {
        let open = &self.open;
        let mut level =
            open.iter().enumerate().filter(|&(i, line)| i == 0 || open[i - 1] != *line).count();
        level += self.continuation;
        if self.dedent {
            level = level.saturating_sub(1);
        }
        for _ in 0..level {
            self.out.push('\t');
        }
    }

    fn write(&mut self, text: &str) {
        self.out.push_str(text);
        self.line += text.matches('\n').count();
        self.at_line_start = false;
    }

    fn after_opener(&self) -> bool {
        self.out.ends_with(['(', '[', '{'])
    }

    fn finish(mut self) -> String {
        self.flush(TextSize::new(u32::MAX));
        let len = self.out.trim_end().len();
        self.out.truncate(len);
        self.out.push('\n');
        self.out
    }
}

/// `struct {` keeps its space only when members follow.
fn space_if_content(node: &ast::Node, index: usize) -> bool {
    match node.slots.get(index + 1) {
        Some(Slot::List(list)) => !list.nodes.is_empty(),
        Some(Slot::Node(child)) => child.is_some(),
        Some(Slot::Token(token)) => token.is_some(),
        None => false,
    }
}

/// Anchors after which a line break indents the rest of the node.
fn continues(kind: NodeKind, anchor: Anchor) -> bool {
    matches!(
        (kind, anchor),
        (NodeKind::BinaryExpr, Anchor::Y)
            | (NodeKind::SelectorExpr, Anchor::Sel)
            | (NodeKind::AssignStmt, Anchor::Rhs)
            | (NodeKind::ValueSpec, Anchor::Values)
    )
}

fn first_token(node: &ast::Node) -> Option<&ast::Token> {
    node.slots.iter().find_map(slot_token)
}

fn slot_token(slot: &Slot) -> Option<&ast::Token> {
    match slot {
        Slot::Token(token) => token.as_ref(),
        Slot::Node(child) => child.as_deref().and_then(first_token),
        Slot::List(list) => list.nodes.first().and_then(first_token),
    }
}

fn slot_start(slot: &Slot) -> Option<TextSize> {
    slot_token(slot).map(|token| token.range.start())
}

/// Position of the token that follows the anchor at `index`, if a token
/// comes before any other content.
fn next_token(node: &ast::Node, index: usize) -> Option<TextSize> {
    for slot in &node.slots[index + 1..] {
        match slot {
            Slot::Token(Some(token)) => return Some(token.range.start()),
            Slot::Token(None) | Slot::Node(None) => {}
            Slot::List(list) if list.nodes.is_empty() => {}
            _ => return None,
        }
    }
    None
}

#[cfg(test)]
mod tests;
