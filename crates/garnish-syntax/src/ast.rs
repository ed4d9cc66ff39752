//! Positional syntax tree.
//!
//! Nodes keep one slot per declared anchor of their shape, in shape order.
//! The parser fills in real source ranges; the restorer fills in synthesized
//! ones.

use std::fmt;

use indexmap::IndexMap;
use text_size::TextRange;

use crate::shape::{SlotKind, standard_shape};
use crate::{Anchor, Comment, NodeKind};

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Token {
    pub text: Box<str>,
    pub range: TextRange,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct List {
    pub nodes: Vec<Node>,
    /// Ranges of the separators following `nodes[i]`, where present.
    pub separators: Vec<TextRange>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Slot {
    Token(Option<Token>),
    Node(Option<Box<Node>>),
    List(List),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub range: TextRange,
    pub slots: Vec<Slot>,
}

impl Node {
    /// A node with every slot empty.
    pub fn new(kind: NodeKind, range: TextRange) -> Self {
        let slots = standard_shape(kind)
            .anchors()
            .iter()
            .map(|descriptor| match descriptor.slot {
                SlotKind::Token(_) => Slot::Token(None),
                SlotKind::Node => Slot::Node(None),
                SlotKind::List(_) => Slot::List(List::default()),
            })
            .collect();
        Self { kind, range, slots }
    }

    pub fn slot(&self, anchor: Anchor) -> Option<&Slot> {
        standard_shape(self.kind).index_of(anchor).and_then(|index| self.slots.get(index))
    }

    pub fn slot_mut(&mut self, anchor: Anchor) -> Option<&mut Slot> {
        standard_shape(self.kind).index_of(anchor).and_then(|index| self.slots.get_mut(index))
    }

    pub fn token(&self, anchor: Anchor) -> Option<&Token> {
        match self.slot(anchor)? {
            Slot::Token(token) => token.as_ref(),
            _ => None,
        }
    }

    pub fn child(&self, anchor: Anchor) -> Option<&Self> {
        match self.slot(anchor)? {
            Slot::Node(node) => node.as_deref(),
            _ => None,
        }
    }

    pub fn list(&self, anchor: Anchor) -> &[Self] {
        match self.slot(anchor) {
            Some(Slot::List(list)) => &list.nodes,
            _ => &[],
        }
    }

    /// Text of an `Ident` or `BasicLit`.
    pub fn leaf_text(&self) -> Option<&str> {
        match self.kind {
            NodeKind::Ident => self.token(Anchor::Name).map(|token| &*token.text),
            NodeKind::BasicLit => self.token(Anchor::Value).map(|token| &*token.text),
            _ => None,
        }
    }

    fn write(&self, f: &mut fmt::Formatter<'_>, depth: usize, label: Option<Anchor>) -> fmt::Result {
        let indent = depth * 2;
        write!(f, "{:indent$}", "")?;
        if let Some(label) = label {
            write!(f, "{label}: ")?;
        }
        writeln!(f, "{}@{:?}", self.kind, self.range)?;

        let anchors = standard_shape(self.kind).anchors();
        for (descriptor, slot) in anchors.iter().zip(&self.slots) {
            let anchor = descriptor.anchor;
            match slot {
                Slot::Token(Some(token)) => {
                    writeln!(f, "{:pad$}{anchor}: {:?}@{:?}", "", token.text, token.range, pad = indent + 2)?;
                }
                Slot::Node(Some(node)) => node.write(f, depth + 1, Some(anchor))?,
                Slot::List(list) if !list.nodes.is_empty() => {
                    writeln!(f, "{:pad$}{anchor}:", "", pad = indent + 2)?;
                    for node in &list.nodes {
                        node.write(f, depth + 2, None)?;
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write(f, 0, None)
    }
}

/// Opaque key/value payload carried on the root, e.g. the language version.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Metadata(IndexMap<Box<str>, Box<str>>);

impl Metadata {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(|value| &**value)
    }

    pub fn insert(&mut self, key: impl Into<Box<str>>, value: impl Into<Box<str>>) -> Option<Box<str>> {
        self.0.insert(key.into(), value.into())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(key, value)| (&**key, &**value))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Everything the parser hands to the decorator.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SourceTree {
    pub root: Node,
    pub comments: Vec<Comment>,
    pub metadata: Metadata,
}
