use garnish_syntax::ast::{self, Node};
use garnish_syntax::{Anchor, NodeKind, SyntaxKind, SyntaxSet};
use text_size::TextRange;

use super::{bad, delimited, ensure_progress, exprs, field, ident};
use crate::parser::{Marker, Parser, precede};

use SyntaxKind::*;

/// Tokens a type can start with.
pub(crate) const TYPE_FIRST: SyntaxSet = SyntaxSet::new([
    NAME,
    STAR,
    LEFT_BRACKET,
    LEFT_PAREN,
    MAP_KW,
    FUNC_KW,
    STRUCT_KW,
    INTERFACE_KW,
]);

pub(crate) fn ty(p: &mut Parser<'_>) -> Node {
    match p.peek_kind() {
        NAME => type_name(p),
        STAR => {
            let mut m = p.start(NodeKind::StarExpr);
            m.token(p, Anchor::Star);
            m.node(Anchor::X, ty(p));
            m.complete(p)
        }
        LEFT_BRACKET => array_type(p),
        MAP_KW => map_type(p),
        FUNC_KW => func_type(p),
        STRUCT_KW => struct_type(p),
        INTERFACE_KW => interface_type(p),
        LEFT_PAREN => {
            let mut m = p.start(NodeKind::ParenExpr);
            m.token(p, Anchor::Lparen);
            m.node(Anchor::X, ty(p));
            m.expect(p, RIGHT_PAREN, Anchor::Rparen, "expected `)`");
            m.complete(p)
        }
        _ => bad(p, NodeKind::BadExpr, "expected type"),
    }
}

/// `T`, `pkg.T`, and either followed by type arguments.
fn type_name(p: &mut Parser<'_>) -> Node {
    let mut name = ident(p);
    if p.at(DOT) {
        let mut m = precede(name, NodeKind::SelectorExpr, Anchor::X);
        m.token(p, Anchor::Dot);
        m.node(Anchor::Sel, ident(p));
        name = m.complete(p);
    }
    if p.at(LEFT_BRACKET) { type_args(p, name) } else { name }
}

fn type_args(p: &mut Parser<'_>, base: Node) -> Node {
    let lbrack = p.bump();
    let args = delimited(p, RIGHT_BRACKET, ty);

    if args.nodes.len() == 1 && args.separators.is_empty() {
        let mut m = precede(base, NodeKind::IndexExpr, Anchor::X);
        m.put_token(Anchor::Lbrack, lbrack);
        if let Some(index) = args.nodes.into_iter().next() {
            m.node(Anchor::Index, index);
        }
        m.expect(p, RIGHT_BRACKET, Anchor::Rbrack, "expected `]`");
        m.complete(p)
    } else {
        let mut m = precede(base, NodeKind::IndexListExpr, Anchor::X);
        m.put_token(Anchor::Lbrack, lbrack);
        m.list(Anchor::Indices, args);
        m.expect(p, RIGHT_BRACKET, Anchor::Rbrack, "expected `]`");
        m.complete(p)
    }
}

fn array_type(p: &mut Parser<'_>) -> Node {
    let mut m = p.start(NodeKind::ArrayType);
    m.token(p, Anchor::Lbrack);
    match p.peek_kind() {
        RIGHT_BRACKET => {}
        ELLIPSIS => {
            let mut len = p.start(NodeKind::Ellipsis);
            len.token(p, Anchor::Ellipsis);
            m.node(Anchor::Len, len.complete(p));
        }
        _ => m.node(Anchor::Len, p.with_composite_lit(true, exprs::expr)),
    }
    m.expect(p, RIGHT_BRACKET, Anchor::Rbrack, "expected `]`");
    m.node(Anchor::Elt, ty(p));
    m.complete(p)
}

fn map_type(p: &mut Parser<'_>) -> Node {
    let mut m = p.start(NodeKind::MapType);
    m.token(p, Anchor::Map);
    m.expect(p, LEFT_BRACKET, Anchor::Lbrack, "expected `[`");
    m.node(Anchor::Key, ty(p));
    m.expect(p, RIGHT_BRACKET, Anchor::Rbrack, "expected `]`");
    m.node(Anchor::Value, ty(p));
    m.complete(p)
}

pub(crate) fn func_type(p: &mut Parser<'_>) -> Node {
    let mut m = p.start(NodeKind::FuncType);
    m.token(p, Anchor::Func);
    signature(p, &mut m);
    m.complete(p)
}

/// Parameters and results, shared by function declarations, literals and
/// interface methods.
pub(crate) fn signature(p: &mut Parser<'_>, m: &mut Marker) {
    if m.expect(p, LEFT_PAREN, Anchor::ParamsOpen, "expected `(`") {
        m.list(Anchor::Params, params(p, RIGHT_PAREN, param_type));
        m.expect(p, RIGHT_PAREN, Anchor::ParamsClose, "expected `)`");
    }

    if p.at(LEFT_PAREN) {
        m.token(p, Anchor::ResultsOpen);
        m.list(Anchor::Results, params(p, RIGHT_PAREN, param_type));
        m.expect(p, RIGHT_PAREN, Anchor::ResultsClose, "expected `)`");
    } else if p.at_set(&TYPE_FIRST) {
        let result = ty(p);
        let result = field(p, ast::List::default(), result);
        m.push(Anchor::Results, result);
    }
}

fn param_type(p: &mut Parser<'_>) -> Node {
    if p.at(ELLIPSIS) {
        let mut m = p.start(NodeKind::Ellipsis);
        m.token(p, Anchor::Ellipsis);
        m.node(Anchor::Elt, ty(p));
        m.complete(p)
    } else {
        ty(p)
    }
}

/// A type parameter constraint: a union of terms, each optionally `~T`.
pub(crate) fn constraint(p: &mut Parser<'_>) -> Node {
    let mut lhs = constraint_term(p);
    while p.at(PIPE) {
        let mut m = precede(lhs, NodeKind::BinaryExpr, Anchor::X);
        m.token(p, Anchor::Op);
        m.node(Anchor::Y, constraint_term(p));
        lhs = m.complete(p);
    }
    lhs
}

fn constraint_term(p: &mut Parser<'_>) -> Node {
    if p.at(TILDE) {
        let mut m = p.start(NodeKind::UnaryExpr);
        m.token(p, Anchor::Op);
        m.node(Anchor::X, ty(p));
        m.complete(p)
    } else {
        ty(p)
    }
}

struct Param {
    first: Node,
    ty: Option<Node>,
    separator: Option<TextRange>,
}

/// A parameter list up to `close`, with consecutive names sharing a type
/// grouped into one `Field` (`a, b int`).
pub(crate) fn params(
    p: &mut Parser<'_>,
    close: SyntaxKind,
    element: fn(&mut Parser<'_>) -> Node,
) -> ast::List {
    let mut entries = Vec::new();
    while !p.at(close) && !p.at(EOF) {
        let (first, ty) = match (p.peek_kind(), p.nth(1)) {
            (NAME, DOT | COMMA | RIGHT_PAREN | RIGHT_BRACKET) => (element(p), None),
            (NAME, _) => {
                let name = ident(p);
                (name, Some(element(p)))
            }
            _ => (element(p), None),
        };
        let separator = p.at(COMMA).then(|| p.bump().range);
        let last = separator.is_none();
        entries.push(Param { first, ty, separator });
        if last {
            break;
        }
    }

    let mut list = ast::List::default();
    if entries.iter().all(|entry| entry.ty.is_none()) {
        for entry in entries {
            list.nodes.push(field(p, ast::List::default(), entry.first));
            list.separators.extend(entry.separator);
        }
        return list;
    }

    let mut names = ast::List::default();
    for entry in entries {
        if entry.first.kind != NodeKind::Ident {
            p.error_at("expected parameter name", entry.first.range);
        }
        names.nodes.push(entry.first);
        match entry.ty {
            Some(ty) => {
                list.nodes.push(field(p, std::mem::take(&mut names), ty));
                list.separators.extend(entry.separator);
            }
            None => names.separators.extend(entry.separator),
        }
    }

    if !names.nodes.is_empty() {
        p.error_at("missing parameter type", names.nodes[0].range);
        let mut separators = names.separators.into_iter();
        for name in names.nodes {
            list.nodes.push(field(p, ast::List::default(), name));
            list.separators.extend(separators.next());
        }
    }
    list
}

fn struct_type(p: &mut Parser<'_>) -> Node {
    let mut m = p.start(NodeKind::StructType);
    m.token(p, Anchor::Struct);
    if m.expect(p, LEFT_BRACE, Anchor::Lbrace, "expected `{`") {
        while !p.at(RIGHT_BRACE) && !p.at(EOF) {
            let before = p.position();
            m.push(Anchor::Fields, struct_field(p));
            p.expect_semicolon();
            ensure_progress(p, before);
        }
        m.expect(p, RIGHT_BRACE, Anchor::Rbrace, "expected `}`");
    }
    m.complete(p)
}

fn struct_field(p: &mut Parser<'_>) -> Node {
    let mut m = p.start(NodeKind::Field);
    let embedded = !p.at(NAME) || matches!(p.nth(1), DOT | SEMICOLON | RIGHT_BRACE | STRING);

    if !embedded {
        let mut names = ast::List::default();
        names.nodes.push(ident(p));
        while p.at(COMMA) {
            names.separators.push(p.bump().range);
            names.nodes.push(ident(p));
        }
        m.list(Anchor::Names, names);
    }
    m.node(Anchor::Type, ty(p));

    if p.at(STRING) {
        m.node(Anchor::Tag, exprs::basic_lit(p));
    }
    m.complete(p)
}

fn interface_type(p: &mut Parser<'_>) -> Node {
    let mut m = p.start(NodeKind::InterfaceType);
    m.token(p, Anchor::Interface);
    if m.expect(p, LEFT_BRACE, Anchor::Lbrace, "expected `{`") {
        while !p.at(RIGHT_BRACE) && !p.at(EOF) {
            let before = p.position();
            m.push(Anchor::Methods, interface_elem(p));
            p.expect_semicolon();
            ensure_progress(p, before);
        }
        m.expect(p, RIGHT_BRACE, Anchor::Rbrace, "expected `}`");
    }
    m.complete(p)
}

/// A method (`String() string`) or an embedded constraint (`~int | ~string`).
fn interface_elem(p: &mut Parser<'_>) -> Node {
    let mut m = p.start(NodeKind::Field);
    if p.at(NAME) && p.nth(1) == LEFT_PAREN {
        m.push(Anchor::Names, ident(p));
        let mut signature_marker = p.start(NodeKind::FuncType);
        signature(p, &mut signature_marker);
        m.node(Anchor::Type, signature_marker.complete(p));
    } else {
        m.node(Anchor::Type, constraint(p));
    }
    m.complete(p)
}
