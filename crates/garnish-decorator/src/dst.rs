//! Decorated syntax tree.
//!
//! Mirrors the positional tree node for node but carries no offsets. Trivia
//! lives in [`Decoration`]s keyed by anchor, so nodes can be moved, copied
//! or dropped and their comments travel with them.

use std::fmt;

use garnish_syntax::ast::Metadata;
use garnish_syntax::shape::{SlotKind, TokenText, standard_shape};
use garnish_syntax::{Anchor, NodeKind, Spacing};
use indexmap::IndexMap;

use crate::Error;

/// Comments that share a line, or a bare line break when `comments` is empty.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Trivia {
    pub spacing: Spacing,
    pub comments: Vec<Box<str>>,
}

impl Trivia {
    pub fn spacing(spacing: Spacing) -> Self {
        Self { spacing, comments: Vec::new() }
    }

    pub fn comment(spacing: Spacing, text: impl Into<Box<str>>) -> Self {
        Self { spacing, comments: vec![text.into()] }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Decoration {
    pub before: Vec<Trivia>,
    pub after: Vec<Trivia>,
}

impl Decoration {
    pub fn is_empty(&self) -> bool {
        self.before.is_empty() && self.after.is_empty()
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Slot {
    Token(Option<Box<str>>),
    Node(Option<Box<Node>>),
    List(Vec<Node>),
}

impl Slot {
    /// Tokens and nodes are present when set, lists when not empty.
    pub fn is_present(&self) -> bool {
        match self {
            Self::Token(token) => token.is_some(),
            Self::Node(node) => node.is_some(),
            Self::List(nodes) => !nodes.is_empty(),
        }
    }
}

/// A decorated node. Slots follow the built-in shape of `kind`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    /// Only anchors that carry trivia have an entry.
    pub decs: IndexMap<Anchor, Decoration>,
    pub slots: Vec<Slot>,
}

impl Node {
    /// A node with every slot empty and no trivia.
    pub fn new(kind: NodeKind) -> Self {
        let slots = standard_shape(kind)
            .anchors()
            .iter()
            .map(|descriptor| match descriptor.slot {
                SlotKind::Token(_) => Slot::Token(None),
                SlotKind::Node => Slot::Node(None),
                SlotKind::List(_) => Slot::List(Vec::new()),
            })
            .collect();
        Self { kind, decs: IndexMap::new(), slots }
    }

    pub fn ident(name: impl Into<Box<str>>) -> Self {
        Self::new(NodeKind::Ident).put(Anchor::Name, Slot::Token(Some(name.into())))
    }

    /// A literal spelled exactly as `value`, quotes included.
    pub fn basic_lit(value: impl Into<Box<str>>) -> Self {
        Self::new(NodeKind::BasicLit).put(Anchor::Value, Slot::Token(Some(value.into())))
    }

    pub fn expr_stmt(x: Self) -> Self {
        Self::new(NodeKind::ExprStmt).put(Anchor::X, Slot::Node(Some(Box::new(x))))
    }

    pub fn call(fun: Self, args: Vec<Self>) -> Self {
        Self::new(NodeKind::CallExpr)
            .put(Anchor::Fun, Slot::Node(Some(Box::new(fun))))
            .fixed(Anchor::Lparen)
            .put(Anchor::Args, Slot::List(args))
            .fixed(Anchor::Rparen)
    }

    /// `lhs tok rhs`, where `tok` is `=`, `:=` or an operator assignment.
    pub fn assign(lhs: Vec<Self>, tok: impl Into<Box<str>>, rhs: Vec<Self>) -> Self {
        Self::new(NodeKind::AssignStmt)
            .put(Anchor::Lhs, Slot::List(lhs))
            .put(Anchor::Tok, Slot::Token(Some(tok.into())))
            .put(Anchor::Rhs, Slot::List(rhs))
    }

    pub fn return_stmt(results: Vec<Self>) -> Self {
        Self::new(NodeKind::ReturnStmt).fixed(Anchor::Return).put(Anchor::Results, Slot::List(results))
    }

    fn put(mut self, anchor: Anchor, slot: Slot) -> Self {
        if let Some(index) = self.index(anchor) {
            self.slots[index] = slot;
        }
        self
    }

    fn fixed(self, anchor: Anchor) -> Self {
        match standard_shape(self.kind).descriptor(anchor).map(|descriptor| descriptor.slot) {
            Some(SlotKind::Token(TokenText::Fixed(text))) => {
                self.put(anchor, Slot::Token(Some(text.into())))
            }
            _ => self,
        }
    }

    fn index(&self, anchor: Anchor) -> Option<usize> {
        standard_shape(self.kind).index_of(anchor)
    }

    pub fn slot(&self, anchor: Anchor) -> Option<&Slot> {
        self.index(anchor).and_then(|index| self.slots.get(index))
    }

    fn slot_mut(&mut self, anchor: Anchor) -> Option<&mut Slot> {
        self.index(anchor).and_then(|index| self.slots.get_mut(index))
    }

    pub fn token(&self, anchor: Anchor) -> Option<&str> {
        match self.slot(anchor)? {
            Slot::Token(token) => token.as_deref(),
            _ => None,
        }
    }

    /// Replaces the token at `anchor`, returning the previous text.
    pub fn set_token(
        &mut self,
        anchor: Anchor,
        text: Option<Box<str>>,
    ) -> Result<Option<Box<str>>, Error> {
        let kind = self.kind;
        match self.slot_mut(anchor) {
            Some(Slot::Token(token)) => Ok(std::mem::replace(token, text)),
            _ => Err(Error::mismatch(kind, anchor, "not a token anchor")),
        }
    }

    pub fn node(&self, anchor: Anchor) -> Option<&Self> {
        match self.slot(anchor)? {
            Slot::Node(node) => node.as_deref(),
            _ => None,
        }
    }

    pub fn node_mut(&mut self, anchor: Anchor) -> Option<&mut Self> {
        match self.slot_mut(anchor)? {
            Slot::Node(node) => node.as_deref_mut(),
            _ => None,
        }
    }

    /// Replaces the child at `anchor`, returning the previous one.
    pub fn set_node(&mut self, anchor: Anchor, node: Option<Self>) -> Result<Option<Self>, Error> {
        let kind = self.kind;
        match self.slot_mut(anchor) {
            Some(Slot::Node(slot)) => {
                Ok(std::mem::replace(slot, node.map(Box::new)).map(|node| *node))
            }
            _ => Err(Error::mismatch(kind, anchor, "not a node anchor")),
        }
    }

    pub fn list(&self, anchor: Anchor) -> &[Self] {
        match self.slot(anchor) {
            Some(Slot::List(nodes)) => nodes,
            _ => &[],
        }
    }

    pub fn list_mut(&mut self, anchor: Anchor) -> Option<&mut Vec<Self>> {
        match self.slot_mut(anchor)? {
            Slot::List(nodes) => Some(nodes),
            _ => None,
        }
    }

    pub fn decs(&self, anchor: Anchor) -> Option<&Decoration> {
        self.decs.get(&anchor)
    }

    pub fn decs_mut(&mut self, anchor: Anchor) -> &mut Decoration {
        self.decs.entry(anchor).or_default()
    }

    fn write(&self, f: &mut fmt::Formatter<'_>, depth: usize, label: Option<Anchor>) -> fmt::Result {
        let pad = depth * 2;
        write!(f, "{:pad$}", "")?;
        if let Some(label) = label {
            write!(f, "{label}: ")?;
        }
        writeln!(f, "{}", self.kind)?;

        let pad = pad + 2;
        self.write_decs(f, pad, Anchor::Start, Side::Before)?;
        self.write_decs(f, pad, Anchor::Start, Side::After)?;
        let anchors = standard_shape(self.kind).anchors();
        for (descriptor, slot) in anchors.iter().zip(&self.slots) {
            let anchor = descriptor.anchor;
            self.write_decs(f, pad, anchor, Side::Before)?;
            match slot {
                Slot::Token(Some(text)) => writeln!(f, "{:pad$}{anchor}: {text:?}", "")?,
                Slot::Node(Some(node)) => node.write(f, depth + 1, Some(anchor))?,
                Slot::List(nodes) if !nodes.is_empty() => {
                    writeln!(f, "{:pad$}{anchor}:", "")?;
                    for node in nodes {
                        node.write(f, depth + 2, None)?;
                    }
                }
                _ => {}
            }
            self.write_decs(f, pad, anchor, Side::After)?;
        }
        self.write_decs(f, pad, Anchor::End, Side::Before)?;
        self.write_decs(f, pad, Anchor::End, Side::After)
    }

    fn write_decs(
        &self,
        f: &mut fmt::Formatter<'_>,
        pad: usize,
        anchor: Anchor,
        side: Side,
    ) -> fmt::Result {
        let groups = match (self.decs.get(&anchor), side) {
            (Some(decs), Side::Before) => &decs.before,
            (Some(decs), Side::After) => &decs.after,
            (None, _) => return Ok(()),
        };
        if groups.is_empty() {
            return Ok(());
        }

        let side = match side {
            Side::Before => "before",
            Side::After => "after",
        };
        write!(f, "{:pad$}{anchor}.{side}:", "")?;
        for group in groups {
            write!(f, " [{:?}", group.spacing)?;
            for comment in &group.comments {
                write!(f, " {comment:?}")?;
            }
            write!(f, "]")?;
        }
        writeln!(f)
    }
}

#[derive(Clone, Copy)]
enum Side {
    Before,
    After,
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write(f, 0, None)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DecoratedTree {
    pub root: Node,
    pub metadata: Metadata,
}

impl fmt::Display for DecoratedTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in self.metadata.iter() {
            writeln!(f, "#{key} = {value}")?;
        }
        write!(f, "{}", self.root)
    }
}
