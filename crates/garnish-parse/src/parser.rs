use drop_bomb::DropBomb;
use garnish_errors::Diagnostic;
use garnish_syntax::ast::{self, Slot};
use garnish_syntax::shape::standard_shape;
use garnish_syntax::{Anchor, Comment, NodeKind, SyntaxKind, SyntaxSet};
use garnish_tokenizer::Token;
use text_size::{TextRange, TextSize};

pub(crate) struct Parser<'a> {
    text: &'a str,
    tokens: Vec<Token>,
    comments: Vec<Comment>,
    pos: usize,
    last_end: TextSize,
    no_composite_lit: bool,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        let lexed = garnish_tokenizer::tokenize(text);
        let diagnostics =
            lexed.errors.iter().map(|error| Diagnostic::error(error.message, error.range)).collect();
        Self {
            text,
            tokens: lexed.tokens,
            comments: lexed.comments,
            pos: 0,
            last_end: TextSize::new(0),
            no_composite_lit: false,
            diagnostics,
        }
    }

    pub(crate) fn text(&self) -> &'a str {
        self.text
    }

    fn current(&self) -> Token {
        self.nth_token(0)
    }

    fn nth_token(&self, n: usize) -> Token {
        let last = self.tokens.len() - 1;
        self.tokens[(self.pos + n).min(last)]
    }

    pub(crate) fn peek_kind(&self) -> SyntaxKind {
        self.current().kind
    }

    pub(crate) fn nth(&self, n: usize) -> SyntaxKind {
        self.nth_token(n).kind
    }

    pub(crate) fn at(&self, kind: SyntaxKind) -> bool {
        self.peek_kind() == kind
    }

    pub(crate) fn at_set(&self, set: &SyntaxSet) -> bool {
        set.contains(self.peek_kind())
    }

    pub(crate) fn current_start(&self) -> TextSize {
        self.current().range.start()
    }

    /// Consumes the current token and returns it with its text.
    pub(crate) fn bump(&mut self) -> ast::Token {
        let token = self.current();
        debug_assert_ne!(token.kind, SyntaxKind::EOF, "bumped past the end of input");

        if token.kind != SyntaxKind::EOF {
            self.pos += 1;
        }
        if !token.is_implicit() {
            self.last_end = token.range.end();
        }
        ast::Token { text: self.text[token.range].into(), range: token.range }
    }

    pub(crate) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn error(&mut self, message: &str) {
        let range = self.current().range;
        self.error_at(message, range);
    }

    pub(crate) fn error_at(&mut self, message: &str, range: TextRange) {
        self.diagnostics.push(Diagnostic::error(message, range));
    }

    /// Statement and declaration terminator. It may be left out before a
    /// closing `)` or `}`.
    pub(crate) fn expect_semicolon(&mut self) {
        const CLOSERS: SyntaxSet =
            SyntaxSet::new([SyntaxKind::RIGHT_PAREN, SyntaxKind::RIGHT_BRACE, SyntaxKind::EOF]);

        if self.eat(SyntaxKind::SEMICOLON) || self.at_set(&CLOSERS) {
            return;
        }

        self.error("expected `;` or a line break");
        while !self.at(SyntaxKind::SEMICOLON) && !self.at_set(&CLOSERS) {
            self.bump();
        }
        self.eat(SyntaxKind::SEMICOLON);
    }

    pub(crate) fn start(&self, kind: NodeKind) -> Marker {
        self.start_at(kind, self.current_start())
    }

    pub(crate) fn start_at(&self, kind: NodeKind, start: TextSize) -> Marker {
        Marker::new(kind, start)
    }

    pub(crate) fn no_composite_lit(&self) -> bool {
        self.no_composite_lit
    }

    /// Runs `f` with composite literals of bare type names allowed or not,
    /// as control clause headers require.
    pub(crate) fn with_composite_lit<T>(
        &mut self,
        allowed: bool,
        f: impl FnOnce(&mut Self) -> T,
    ) -> T {
        let saved = std::mem::replace(&mut self.no_composite_lit, !allowed);
        let result = f(self);
        self.no_composite_lit = saved;
        result
    }

    pub(crate) fn finish(self) -> (Vec<Comment>, Vec<Diagnostic>) {
        (self.comments, self.diagnostics)
    }
}

/// A node under construction. Must be completed.
pub(crate) struct Marker {
    node: ast::Node,
    start: TextSize,
    bomb: DropBomb,
}

impl Marker {
    fn new(kind: NodeKind, start: TextSize) -> Self {
        Self {
            node: ast::Node::new(kind, TextRange::empty(start)),
            start,
            bomb: DropBomb::new("Marker must be completed"),
        }
    }

    fn slot(&mut self, anchor: Anchor) -> &mut Slot {
        let kind = self.node.kind;
        let index = standard_shape(kind)
            .index_of(anchor)
            .unwrap_or_else(|| panic!("{kind} has no anchor {anchor}"));
        &mut self.node.slots[index]
    }

    pub(crate) fn token(&mut self, p: &mut Parser<'_>, anchor: Anchor) {
        let token = p.bump();
        self.put_token(anchor, token);
    }

    pub(crate) fn put_token(&mut self, anchor: Anchor, token: ast::Token) {
        match self.slot(anchor) {
            Slot::Token(slot) => *slot = Some(token),
            _ => unreachable!("{anchor} is not a token anchor"),
        }
    }

    pub(crate) fn expect(
        &mut self,
        p: &mut Parser<'_>,
        kind: SyntaxKind,
        anchor: Anchor,
        message: &str,
    ) -> bool {
        if p.at(kind) {
            self.token(p, anchor);
            true
        } else {
            p.error(message);
            false
        }
    }

    pub(crate) fn node(&mut self, anchor: Anchor, node: ast::Node) {
        match self.slot(anchor) {
            Slot::Node(slot) => *slot = Some(Box::new(node)),
            _ => unreachable!("{anchor} is not a node anchor"),
        }
    }

    fn list_mut(&mut self, anchor: Anchor) -> &mut ast::List {
        match self.slot(anchor) {
            Slot::List(list) => list,
            _ => unreachable!("{anchor} is not a list anchor"),
        }
    }

    pub(crate) fn push(&mut self, anchor: Anchor, node: ast::Node) {
        self.list_mut(anchor).nodes.push(node);
    }

    /// Consumes the current token as the separator after the last element of `anchor`.
    pub(crate) fn separator(&mut self, p: &mut Parser<'_>, anchor: Anchor) {
        let range = p.bump().range;
        self.list_mut(anchor).separators.push(range);
    }

    pub(crate) fn list(&mut self, anchor: Anchor, list: ast::List) {
        *self.list_mut(anchor) = list;
    }

    pub(crate) fn complete(self, p: &Parser<'_>) -> ast::Node {
        let end = p.last_end;
        self.complete_at(end)
    }

    /// Completes the node with an explicit end, for nodes assembled after
    /// the parser has moved past them.
    pub(crate) fn complete_at(mut self, end: TextSize) -> ast::Node {
        self.bomb.defuse();
        self.node.range = TextRange::new(self.start, end.max(self.start));
        self.node
    }
}

/// Wraps an already parsed node as the `anchor` child of a new `kind` node.
pub(crate) fn precede(node: ast::Node, kind: NodeKind, anchor: Anchor) -> Marker {
    let mut m = Marker::new(kind, node.range.start());
    m.node(anchor, node);
    m
}
