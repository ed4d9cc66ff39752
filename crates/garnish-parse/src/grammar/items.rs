use garnish_syntax::ast::{self, Node};
use garnish_syntax::{Anchor, NodeKind, SyntaxKind::*, SyntaxSet};
use text_size::TextSize;

use super::exprs::{basic_lit, expr_list};
use super::types::{constraint, params, signature, ty};
use super::{bad, ensure_progress, ident, stmts};
use crate::parser::{Marker, Parser};

const VALUE_SPEC_END: SyntaxSet = SyntaxSet::new([EQ, SEMICOLON, RIGHT_PAREN, EOF]);

/// The file starts at its package clause so that header comments sit in
/// front of it, and ends with the text so that trailing comments sit inside.
pub(crate) fn file(p: &mut Parser<'_>) -> Node {
    let mut m = p.start(NodeKind::File);
    m.expect(p, PACKAGE_KW, Anchor::Package, "expected `package`");
    m.node(Anchor::Name, ident(p));
    p.expect_semicolon();

    let mut decls = ast::List::default();
    while !p.at(EOF) {
        let before = p.position();
        decls.nodes.push(decl(p));
        p.expect_semicolon();
        ensure_progress(p, before);
    }
    m.list(Anchor::Decls, decls);

    let end = TextSize::of(p.text());
    m.complete_at(end)
}

fn decl(p: &mut Parser<'_>) -> Node {
    match p.peek_kind() {
        IMPORT_KW | CONST_KW | VAR_KW | TYPE_KW => gen_decl(p),
        FUNC_KW => func_decl(p),
        _ => bad(p, NodeKind::BadDecl, "expected declaration"),
    }
}

/// `import`, `const`, `var` and `type` declarations, grouped or not.
pub(crate) fn gen_decl(p: &mut Parser<'_>) -> Node {
    let mut m = p.start(NodeKind::GenDecl);
    let spec: fn(&mut Parser<'_>) -> Node = match p.peek_kind() {
        IMPORT_KW => import_spec,
        TYPE_KW => type_spec,
        _ => value_spec,
    };
    m.token(p, Anchor::Tok);

    if p.at(LEFT_PAREN) {
        m.token(p, Anchor::Lparen);
        while !p.at(RIGHT_PAREN) && !p.at(EOF) {
            let before = p.position();
            m.push(Anchor::Specs, spec(p));
            p.expect_semicolon();
            ensure_progress(p, before);
        }
        m.expect(p, RIGHT_PAREN, Anchor::Rparen, "expected `)`");
    } else {
        m.push(Anchor::Specs, spec(p));
    }
    m.complete(p)
}

fn import_spec(p: &mut Parser<'_>) -> Node {
    let mut m = p.start(NodeKind::ImportSpec);
    if p.at(NAME) || p.at(DOT) {
        // `.` imports are kept as an identifier spelled `.`.
        let mut name = p.start(NodeKind::Ident);
        name.token(p, Anchor::Name);
        m.node(Anchor::Name, name.complete(p));
    }

    let path = if p.at(STRING) {
        basic_lit(p)
    } else {
        bad(p, NodeKind::BadExpr, "expected import path")
    };
    m.node(Anchor::Path, path);
    m.complete(p)
}

fn value_spec(p: &mut Parser<'_>) -> Node {
    let mut m = p.start(NodeKind::ValueSpec);
    m.push(Anchor::Names, ident(p));
    while p.at(COMMA) {
        m.separator(p, Anchor::Names);
        m.push(Anchor::Names, ident(p));
    }

    if !p.at_set(&VALUE_SPEC_END) {
        m.node(Anchor::Type, ty(p));
    }
    if p.at(EQ) {
        m.token(p, Anchor::Assign);
        m.list(Anchor::Values, p.with_composite_lit(true, expr_list));
    }
    m.complete(p)
}

fn type_spec(p: &mut Parser<'_>) -> Node {
    let mut m = p.start(NodeKind::TypeSpec);
    m.node(Anchor::Name, ident(p));

    // `[T any]` declares type parameters; `[N]T` is an array type.
    if p.at(LEFT_BRACKET) && p.nth(1) == NAME && p.nth(2) != RIGHT_BRACKET {
        type_params(p, &mut m);
    }
    if p.at(EQ) {
        m.token(p, Anchor::Assign);
    }
    m.node(Anchor::Value, ty(p));
    m.complete(p)
}

fn type_params(p: &mut Parser<'_>, m: &mut Marker) {
    m.token(p, Anchor::TypeParamsOpen);
    m.list(Anchor::TypeParams, params(p, RIGHT_BRACKET, constraint));
    m.expect(p, RIGHT_BRACKET, Anchor::TypeParamsClose, "expected `]`");
}

fn func_decl(p: &mut Parser<'_>) -> Node {
    let mut m = p.start(NodeKind::FuncDecl);
    m.token(p, Anchor::Func);

    if p.at(LEFT_PAREN) {
        m.token(p, Anchor::RecvOpen);
        m.list(Anchor::Recv, params(p, RIGHT_PAREN, ty));
        m.expect(p, RIGHT_PAREN, Anchor::RecvClose, "expected `)`");
    }

    m.node(Anchor::Name, ident(p));
    if p.at(LEFT_BRACKET) {
        type_params(p, &mut m);
    }
    signature(p, &mut m);

    if p.at(LEFT_BRACE) {
        m.node(Anchor::Body, stmts::block(p));
    }
    m.complete(p)
}
