use garnish_syntax::ast::{self, Node};
use garnish_syntax::{Anchor, NodeKind, SyntaxKind::*};

use super::{bad, delimited, ident, stmts, types};
use crate::parser::{Parser, precede};

pub(crate) fn expr(p: &mut Parser<'_>) -> Node {
    binary_expr(p, 1)
}

/// One or more comma separated expressions.
pub(crate) fn expr_list(p: &mut Parser<'_>) -> ast::List {
    let mut list = ast::List::default();
    list.nodes.push(expr(p));
    while p.at(COMMA) {
        list.separators.push(p.bump().range);
        list.nodes.push(expr(p));
    }
    list
}

fn binary_expr(p: &mut Parser<'_>, min_precedence: u8) -> Node {
    let mut lhs = unary_expr(p);

    loop {
        let precedence = match p.peek_kind().binary_precedence() {
            Some(precedence) if precedence >= min_precedence => precedence,
            _ => return lhs,
        };

        let mut m = precede(lhs, NodeKind::BinaryExpr, Anchor::X);
        m.token(p, Anchor::Op);
        m.node(Anchor::Y, binary_expr(p, precedence + 1));
        lhs = m.complete(p);
    }
}

fn unary_expr(p: &mut Parser<'_>) -> Node {
    match p.peek_kind() {
        STAR => {
            let mut m = p.start(NodeKind::StarExpr);
            m.token(p, Anchor::Star);
            m.node(Anchor::X, unary_expr(p));
            m.complete(p)
        }
        kind if kind.is_unary_operator() => {
            let mut m = p.start(NodeKind::UnaryExpr);
            m.token(p, Anchor::Op);
            m.node(Anchor::X, unary_expr(p));
            m.complete(p)
        }
        _ => primary_expr(p),
    }
}

fn primary_expr(p: &mut Parser<'_>) -> Node {
    let mut x = operand(p);
    loop {
        x = match p.peek_kind() {
            DOT => selector_or_assertion(p, x),
            LEFT_BRACKET => index_or_slice(p, x),
            LEFT_PAREN => call(p, x),
            LEFT_BRACE if accepts_literal(p, &x) => composite_lit(p, Some(x)),
            _ => return x,
        };
    }
}

/// Inside control clause headers a `{` after a plain type name opens the
/// body, not a composite literal.
fn accepts_literal(p: &Parser<'_>, x: &Node) -> bool {
    match x.kind {
        NodeKind::ArrayType | NodeKind::MapType | NodeKind::StructType => true,
        NodeKind::Ident
        | NodeKind::SelectorExpr
        | NodeKind::IndexExpr
        | NodeKind::IndexListExpr => !p.no_composite_lit(),
        _ => false,
    }
}

fn operand(p: &mut Parser<'_>) -> Node {
    match p.peek_kind() {
        NAME => ident(p),
        kind if kind.is_literal() => basic_lit(p),
        LEFT_PAREN => {
            let mut m = p.start(NodeKind::ParenExpr);
            m.token(p, Anchor::Lparen);
            m.node(Anchor::X, p.with_composite_lit(true, expr));
            m.expect(p, RIGHT_PAREN, Anchor::Rparen, "expected `)`");
            m.complete(p)
        }
        FUNC_KW => func_lit(p),
        LEFT_BRACKET | MAP_KW | STRUCT_KW | INTERFACE_KW => types::ty(p),
        _ => bad(p, NodeKind::BadExpr, "expected expression"),
    }
}

pub(crate) fn basic_lit(p: &mut Parser<'_>) -> Node {
    let mut m = p.start(NodeKind::BasicLit);
    m.token(p, Anchor::Value);
    m.complete(p)
}

/// A function literal, or a bare function type when no body follows.
fn func_lit(p: &mut Parser<'_>) -> Node {
    let ty = types::func_type(p);
    if !p.at(LEFT_BRACE) {
        return ty;
    }

    let mut m = precede(ty, NodeKind::FuncLit, Anchor::Type);
    m.node(Anchor::Body, stmts::block(p));
    m.complete(p)
}

fn selector_or_assertion(p: &mut Parser<'_>, x: Node) -> Node {
    if p.nth(1) != LEFT_PAREN {
        let mut m = precede(x, NodeKind::SelectorExpr, Anchor::X);
        m.token(p, Anchor::Dot);
        m.node(Anchor::Sel, ident(p));
        return m.complete(p);
    }

    let mut m = precede(x, NodeKind::TypeAssertExpr, Anchor::X);
    m.token(p, Anchor::Dot);
    m.token(p, Anchor::Lparen);
    let ty = if p.at(TYPE_KW) {
        // `x.(type)` in a type switch guard.
        let mut keyword = p.start(NodeKind::Ident);
        keyword.token(p, Anchor::Name);
        keyword.complete(p)
    } else {
        types::ty(p)
    };
    m.node(Anchor::Type, ty);
    m.expect(p, RIGHT_PAREN, Anchor::Rparen, "expected `)`");
    m.complete(p)
}

fn index_or_slice(p: &mut Parser<'_>, x: Node) -> Node {
    let start = x.range.start();
    let lbrack = p.bump();

    p.with_composite_lit(true, |p| {
        let low = (!p.at(COLON)).then(|| expr(p));

        if p.at(COLON) {
            let mut m = p.start_at(NodeKind::SliceExpr, start);
            m.node(Anchor::X, x);
            m.put_token(Anchor::Lbrack, lbrack);
            if let Some(low) = low {
                m.node(Anchor::Low, low);
            }
            m.token(p, Anchor::Colon);
            if !p.at(RIGHT_BRACKET) {
                m.node(Anchor::High, expr(p));
            }
            m.expect(p, RIGHT_BRACKET, Anchor::Rbrack, "expected `]`");
            return m.complete(p);
        }

        let Some(first) = low else {
            unreachable!("an index without a colon starts with an expression")
        };

        if p.at(COMMA) {
            let mut indices = ast::List::default();
            indices.nodes.push(first);
            indices.separators.push(p.bump().range);
            let rest = delimited(p, RIGHT_BRACKET, types::ty);
            indices.nodes.extend(rest.nodes);
            indices.separators.extend(rest.separators);

            let mut m = p.start_at(NodeKind::IndexListExpr, start);
            m.node(Anchor::X, x);
            m.put_token(Anchor::Lbrack, lbrack);
            m.list(Anchor::Indices, indices);
            m.expect(p, RIGHT_BRACKET, Anchor::Rbrack, "expected `]`");
            return m.complete(p);
        }

        let mut m = p.start_at(NodeKind::IndexExpr, start);
        m.node(Anchor::X, x);
        m.put_token(Anchor::Lbrack, lbrack);
        m.node(Anchor::Index, first);
        m.expect(p, RIGHT_BRACKET, Anchor::Rbrack, "expected `]`");
        m.complete(p)
    })
}

fn call(p: &mut Parser<'_>, fun: Node) -> Node {
    let mut m = precede(fun, NodeKind::CallExpr, Anchor::Fun);
    m.token(p, Anchor::Lparen);

    let (args, ellipsis) = p.with_composite_lit(true, |p| {
        let mut args = ast::List::default();
        let mut ellipsis = None;
        while !p.at(RIGHT_PAREN) && !p.at(EOF) {
            args.nodes.push(expr(p));
            if p.at(ELLIPSIS) {
                ellipsis = Some(p.bump());
                break;
            }
            if !p.at(COMMA) {
                break;
            }
            args.separators.push(p.bump().range);
        }
        (args, ellipsis)
    });

    m.list(Anchor::Args, args);
    if let Some(ellipsis) = ellipsis {
        m.put_token(Anchor::Ellipsis, ellipsis);
    }
    m.expect(p, RIGHT_PAREN, Anchor::Rparen, "expected `)`");
    m.complete(p)
}

/// `T{...}`, or an elided `{...}` element inside another literal.
fn composite_lit(p: &mut Parser<'_>, ty: Option<Node>) -> Node {
    let mut m = match ty {
        Some(ty) => precede(ty, NodeKind::CompositeLit, Anchor::Type),
        None => p.start(NodeKind::CompositeLit),
    };
    m.token(p, Anchor::Lbrace);
    let elts = p.with_composite_lit(true, |p| delimited(p, RIGHT_BRACE, element));
    m.list(Anchor::Elts, elts);
    m.expect(p, RIGHT_BRACE, Anchor::Rbrace, "expected `}`");
    m.complete(p)
}

fn element(p: &mut Parser<'_>) -> Node {
    let key = element_value(p);
    if !p.at(COLON) {
        return key;
    }

    let mut m = precede(key, NodeKind::KeyValueExpr, Anchor::Key);
    m.token(p, Anchor::Colon);
    m.node(Anchor::Value, element_value(p));
    m.complete(p)
}

fn element_value(p: &mut Parser<'_>) -> Node {
    if p.at(LEFT_BRACE) { composite_lit(p, None) } else { expr(p) }
}
