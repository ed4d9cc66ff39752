use garnish_syntax::ast::{self, Node};
use garnish_syntax::{Anchor, NodeKind, SyntaxKind, SyntaxSet};
use text_size::TextRange;

use crate::parser::Parser;

mod exprs;
pub(crate) mod items;
mod stmts;
mod types;

use SyntaxKind::*;

/// Never consumed while recovering from an error, so that the enclosing
/// construct can still close.
const RECOVERY: SyntaxSet =
    SyntaxSet::new([RIGHT_PAREN, RIGHT_BRACKET, RIGHT_BRACE, SEMICOLON, EOF]);

pub(crate) fn ident(p: &mut Parser<'_>) -> Node {
    if p.at(NAME) {
        let mut m = p.start(NodeKind::Ident);
        m.token(p, Anchor::Name);
        m.complete(p)
    } else {
        bad(p, NodeKind::BadExpr, "expected identifier")
    }
}

pub(crate) fn bad(p: &mut Parser<'_>, kind: NodeKind, message: &str) -> Node {
    p.error(message);
    let m = p.start(kind);
    if !p.at_set(&RECOVERY) {
        p.bump();
    }
    m.complete(p)
}

/// Comma separated elements up to (not including) `close`. A trailing comma
/// is kept as the separator of the last element.
pub(crate) fn delimited(
    p: &mut Parser<'_>,
    close: SyntaxKind,
    mut element: impl FnMut(&mut Parser<'_>) -> Node,
) -> ast::List {
    let mut list = ast::List::default();
    while !p.at(close) && !p.at(EOF) {
        list.nodes.push(element(p));
        if !p.at(COMMA) {
            break;
        }
        list.separators.push(p.bump().range);
    }
    list
}

/// Bumps the current token when the last iteration of a loop made no progress.
pub(crate) fn ensure_progress(p: &mut Parser<'_>, before: usize) {
    if p.position() == before && !p.at(EOF) {
        p.error("unexpected token");
        p.bump();
    }
}

/// A `Field` covering `names` and `ty`, built after both were parsed.
pub(crate) fn field(p: &Parser<'_>, names: ast::List, ty: Node) -> Node {
    let start = names.nodes.first().map_or(ty.range.start(), |name| name.range.start());
    let end = ty.range.end();
    let mut m = p.start_at(NodeKind::Field, start);
    m.list(Anchor::Names, names);
    m.node(Anchor::Type, ty);
    m.complete_at(end)
}

pub(crate) fn comma(range: TextRange) -> ast::Token {
    ast::Token { text: ",".into(), range }
}
