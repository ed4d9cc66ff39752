use garnish_syntax::ast::{self, Node, Slot};
use garnish_syntax::{Anchor, NodeKind, SyntaxKind::*, SyntaxSet};
use text_size::{TextRange, TextSize};

use super::exprs::{expr, expr_list};
use super::{comma, ensure_progress, ident, items};
use crate::parser::{Marker, Parser, precede};

const STMT_LIST_END: SyntaxSet = SyntaxSet::new([RIGHT_BRACE, CASE_KW, DEFAULT_KW, EOF]);

pub(crate) fn block(p: &mut Parser<'_>) -> Node {
    let mut m = p.start(NodeKind::BlockStmt);
    if m.expect(p, LEFT_BRACE, Anchor::Lbrace, "expected `{`") {
        let list = p.with_composite_lit(true, stmt_list);
        m.list(Anchor::List, list);
        m.expect(p, RIGHT_BRACE, Anchor::Rbrace, "expected `}`");
    }
    m.complete(p)
}

fn stmt_list(p: &mut Parser<'_>) -> ast::List {
    let mut list = ast::List::default();
    while !p.at_set(&STMT_LIST_END) {
        if p.eat(SEMICOLON) {
            continue;
        }
        let before = p.position();
        list.nodes.push(stmt(p));
        p.expect_semicolon();
        ensure_progress(p, before);
    }
    list
}

fn stmt(p: &mut Parser<'_>) -> Node {
    match p.peek_kind() {
        VAR_KW | CONST_KW | TYPE_KW => {
            let mut m = p.start(NodeKind::DeclStmt);
            m.node(Anchor::Decl, items::gen_decl(p));
            m.complete(p)
        }
        RETURN_KW => {
            let mut m = p.start(NodeKind::ReturnStmt);
            m.token(p, Anchor::Return);
            if !p.at(SEMICOLON) && !p.at_set(&STMT_LIST_END) {
                m.list(Anchor::Results, expr_list(p));
            }
            m.complete(p)
        }
        BREAK_KW | CONTINUE_KW | GOTO_KW | FALLTHROUGH_KW => {
            let mut m = p.start(NodeKind::BranchStmt);
            m.token(p, Anchor::Tok);
            if p.at(NAME) {
                m.node(Anchor::Label, ident(p));
            }
            m.complete(p)
        }
        GO_KW => {
            let mut m = p.start(NodeKind::GoStmt);
            m.token(p, Anchor::Go);
            m.node(Anchor::Call, expr(p));
            m.complete(p)
        }
        DEFER_KW => {
            let mut m = p.start(NodeKind::DeferStmt);
            m.token(p, Anchor::Defer);
            m.node(Anchor::Call, expr(p));
            m.complete(p)
        }
        LEFT_BRACE => block(p),
        IF_KW => if_stmt(p),
        FOR_KW => for_stmt(p),
        SWITCH_KW => switch_stmt(p),
        _ => simple_stmt(p),
    }
}

fn simple_stmt(p: &mut Parser<'_>) -> Node {
    let lhs = expr_list(p);
    finish_simple_stmt(p, lhs)
}

/// Assignment, increment or expression statement around an already parsed
/// left-hand side.
fn finish_simple_stmt(p: &mut Parser<'_>, lhs: ast::List) -> Node {
    let kind = p.peek_kind();

    if kind.is_assign_operator() {
        let start = lhs.nodes.first().map_or(p.current_start(), |node| node.range.start());
        let mut m = p.start_at(NodeKind::AssignStmt, start);
        m.list(Anchor::Lhs, lhs);
        m.token(p, Anchor::Tok);
        m.list(Anchor::Rhs, expr_list(p));
        return m.complete(p);
    }

    let x = single(p, lhs);
    if matches!(kind, PLUS_PLUS | MINUS_MINUS) {
        let mut m = precede(x, NodeKind::IncDecStmt, Anchor::X);
        m.token(p, Anchor::Tok);
        m.complete(p)
    } else {
        precede(x, NodeKind::ExprStmt, Anchor::X).complete(p)
    }
}

fn single(p: &mut Parser<'_>, list: ast::List) -> Node {
    if let Some(extra) = list.nodes.get(1) {
        p.error_at("expected a single expression", extra.range);
    }
    let start = p.current_start();
    list.nodes
        .into_iter()
        .next()
        .unwrap_or_else(|| Node::new(NodeKind::BadExpr, TextRange::empty(start)))
}

/// The expression of an expression statement that turned out to be a
/// condition or a switch tag.
fn stmt_expr(p: &mut Parser<'_>, stmt: Node) -> Node {
    let range = stmt.range;
    if stmt.kind == NodeKind::ExprStmt {
        if let Some(Slot::Node(Some(x))) = stmt.slots.into_iter().next() {
            return *x;
        }
    }
    p.error_at("expected an expression", range);
    Node::new(NodeKind::BadExpr, range)
}

fn if_stmt(p: &mut Parser<'_>) -> Node {
    let mut m = p.start(NodeKind::IfStmt);
    m.token(p, Anchor::If);

    p.with_composite_lit(false, |p| {
        let stmt = simple_stmt(p);
        if p.at(SEMICOLON) {
            m.node(Anchor::Init, stmt);
            m.token(p, Anchor::Semicolon);
            m.node(Anchor::Cond, expr(p));
        } else {
            m.node(Anchor::Cond, stmt_expr(p, stmt));
        }
    });

    m.node(Anchor::Body, block(p));
    if p.at(ELSE_KW) {
        m.token(p, Anchor::Else);
        let alternative = if p.at(IF_KW) { if_stmt(p) } else { block(p) };
        m.node(Anchor::Alternative, alternative);
    }
    m.complete(p)
}

fn for_stmt(p: &mut Parser<'_>) -> Node {
    let start = p.current_start();
    let for_token = p.bump();

    let mut m = p.with_composite_lit(false, |p| {
        if p.at(LEFT_BRACE) {
            let mut m = p.start_at(NodeKind::ForStmt, start);
            m.put_token(Anchor::For, for_token);
            return m;
        }

        if p.at(RANGE_KW) {
            let mut m = p.start_at(NodeKind::RangeStmt, start);
            m.put_token(Anchor::For, for_token);
            m.token(p, Anchor::Range);
            m.node(Anchor::X, expr(p));
            return m;
        }

        let init = if p.at(SEMICOLON) {
            None
        } else {
            let lhs = expr_list(p);
            if matches!(p.peek_kind(), COLON_EQ | EQ) && p.nth(1) == RANGE_KW {
                return range_header(p, start, for_token, lhs);
            }
            Some(finish_simple_stmt(p, lhs))
        };

        let mut m = p.start_at(NodeKind::ForStmt, start);
        m.put_token(Anchor::For, for_token);

        match init {
            Some(stmt) if !p.at(SEMICOLON) => m.node(Anchor::Cond, stmt_expr(p, stmt)),
            init => {
                if let Some(init) = init {
                    m.node(Anchor::Init, init);
                }
                m.token(p, Anchor::InitSemicolon);
                if !p.at(SEMICOLON) {
                    m.node(Anchor::Cond, expr(p));
                }
                m.expect(p, SEMICOLON, Anchor::CondSemicolon, "expected `;`");
                if !p.at(LEFT_BRACE) {
                    m.node(Anchor::Post, simple_stmt(p));
                }
            }
        }
        m
    });

    m.node(Anchor::Body, block(p));
    m.complete(p)
}

/// `for k, v := range x`, with the key and value already parsed.
fn range_header(
    p: &mut Parser<'_>,
    start: TextSize,
    for_token: ast::Token,
    lhs: ast::List,
) -> Marker {
    let mut m = p.start_at(NodeKind::RangeStmt, start);
    m.put_token(Anchor::For, for_token);

    if lhs.nodes.len() > 2 {
        p.error_at("expected at most two iteration variables", lhs.nodes[2].range);
    }
    let mut separators = lhs.separators.into_iter();
    let mut nodes = lhs.nodes.into_iter();
    if let Some(key) = nodes.next() {
        m.node(Anchor::Key, key);
    }
    if let (Some(value), Some(separator)) = (nodes.next(), separators.next()) {
        m.put_token(Anchor::Comma, comma(separator));
        m.node(Anchor::Value, value);
    }

    m.token(p, Anchor::Tok);
    m.token(p, Anchor::Range);
    m.node(Anchor::X, expr(p));
    m
}

fn switch_stmt(p: &mut Parser<'_>) -> Node {
    let mut m = p.start(NodeKind::SwitchStmt);
    m.token(p, Anchor::Switch);

    if !p.at(LEFT_BRACE) {
        p.with_composite_lit(false, |p| {
            let stmt = simple_stmt(p);
            if p.at(SEMICOLON) {
                m.node(Anchor::Init, stmt);
                m.token(p, Anchor::Semicolon);
                if !p.at(LEFT_BRACE) {
                    m.node(Anchor::Tag, simple_stmt_expr(p));
                }
            } else {
                m.node(Anchor::Tag, stmt_expr(p, stmt));
            }
        });
    }

    m.node(Anchor::Body, switch_body(p));
    m.complete(p)
}

fn simple_stmt_expr(p: &mut Parser<'_>) -> Node {
    let stmt = simple_stmt(p);
    stmt_expr(p, stmt)
}

fn switch_body(p: &mut Parser<'_>) -> Node {
    let mut m = p.start(NodeKind::BlockStmt);
    if m.expect(p, LEFT_BRACE, Anchor::Lbrace, "expected `{`") {
        while !p.at(RIGHT_BRACE) && !p.at(EOF) {
            if p.at(CASE_KW) || p.at(DEFAULT_KW) {
                m.push(Anchor::List, case_clause(p));
            } else {
                p.error("expected `case` or `default`");
                p.bump();
            }
        }
        m.expect(p, RIGHT_BRACE, Anchor::Rbrace, "expected `}`");
    }
    m.complete(p)
}

fn case_clause(p: &mut Parser<'_>) -> Node {
    let mut m = p.start(NodeKind::CaseClause);
    let is_case = p.at(CASE_KW);
    m.token(p, Anchor::Case);
    if is_case {
        m.list(Anchor::List, p.with_composite_lit(true, expr_list));
    }
    m.expect(p, COLON, Anchor::Colon, "expected `:`");
    m.list(Anchor::Body, p.with_composite_lit(true, stmt_list));
    m.complete(p)
}
