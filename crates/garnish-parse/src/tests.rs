use expect_test::expect;
use garnish_syntax::ast::Node;
use garnish_syntax::{Anchor, NodeKind};

use crate::parse;

fn parse_ok(text: &str) -> Node {
    let parse = parse(text);
    assert!(!parse.has_errors(), "unexpected diagnostics: {:?}", parse.diagnostics);
    parse.tree.root
}

fn find(node: &Node, kind: NodeKind) -> Option<&Node> {
    if node.kind == kind {
        return Some(node);
    }
    node.slots.iter().find_map(|slot| match slot {
        garnish_syntax::ast::Slot::Token(_) => None,
        garnish_syntax::ast::Slot::Node(child) => child.as_deref().and_then(|child| find(child, kind)),
        garnish_syntax::ast::Slot::List(list) => list.nodes.iter().find_map(|child| find(child, kind)),
    })
}

fn in_main(body: &str) -> String {
    format!("package main\n\nfunc main() {{\n{body}\n}}\n")
}

fn text(node: Option<&Node>) -> Option<&str> {
    node.and_then(Node::leaf_text)
}

#[test]
fn value_declaration() {
    let root = parse_ok("package p\n\nvar x = 1\n");
    expect![[r#"
        File@0..21
          Package: "package"@0..7
          Name: Ident@8..9
            Name: "p"@8..9
          Decls:
            GenDecl@11..20
              Tok: "var"@11..14
              Specs:
                ValueSpec@15..20
                  Names:
                    Ident@15..16
                      Name: "x"@15..16
                  Assign: "="@17..18
                  Values:
                    BasicLit@19..20
                      Value: "1"@19..20
    "#]]
    .assert_eq(&root.to_string());
}

#[test]
fn generic_alias() {
    let root = parse_ok("package p\n\ntype Vector[T any] = []T\n");
    let spec = find(&root, NodeKind::TypeSpec).unwrap();

    assert_eq!(text(spec.child(Anchor::Name)), Some("Vector"));
    assert!(spec.token(Anchor::TypeParamsOpen).is_some());
    assert!(spec.token(Anchor::Assign).is_some());

    let params = spec.list(Anchor::TypeParams);
    assert_eq!(params.len(), 1);
    assert_eq!(text(params[0].list(Anchor::Names).first()), Some("T"));
    assert_eq!(text(params[0].child(Anchor::Type)), Some("any"));

    assert_eq!(spec.child(Anchor::Value).map(|value| value.kind), Some(NodeKind::ArrayType));
}

#[test]
fn array_type_is_not_type_parameters() {
    let root = parse_ok("package p\n\ntype Buf [N]byte\n");
    let spec = find(&root, NodeKind::TypeSpec).unwrap();
    assert!(spec.token(Anchor::TypeParamsOpen).is_none());
    let value = spec.child(Anchor::Value).unwrap();
    assert_eq!(value.kind, NodeKind::ArrayType);
    assert_eq!(text(value.child(Anchor::Len)), Some("N"));
}

#[test]
fn constraint_union() {
    let root = parse_ok("package p\n\ntype Number[T ~int | ~float64] = T\n");
    let spec = find(&root, NodeKind::TypeSpec).unwrap();
    let constraint = spec.list(Anchor::TypeParams)[0].child(Anchor::Type).unwrap();
    assert_eq!(constraint.kind, NodeKind::BinaryExpr);
    assert_eq!(constraint.token(Anchor::Op).map(|op| &*op.text), Some("|"));
    assert_eq!(constraint.child(Anchor::X).map(|x| x.kind), Some(NodeKind::UnaryExpr));
}

#[test]
fn parameters_sharing_a_type_are_grouped() {
    let root = parse_ok("package p\n\nfunc f(a, b int, c string) (int, error) {\n}\n");
    let func = find(&root, NodeKind::FuncDecl).unwrap();

    let params = func.list(Anchor::Params);
    assert_eq!(params.len(), 2);
    assert_eq!(params[0].list(Anchor::Names).len(), 2);
    assert_eq!(text(params[0].child(Anchor::Type)), Some("int"));
    assert_eq!(text(params[1].list(Anchor::Names).first()), Some("c"));

    let Some(garnish_syntax::ast::Slot::List(list)) = func.slot(Anchor::Params) else {
        panic!("params are a list");
    };
    assert_eq!(list.separators.len(), 1);

    let results = func.list(Anchor::Results);
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|field| field.list(Anchor::Names).is_empty()));
    assert!(func.token(Anchor::ResultsOpen).is_some());
}

#[test]
fn method_with_receiver_and_bare_result() {
    let root = parse_ok("package p\n\nfunc (s *Stack) Len() int {\n\treturn len(s.items)\n}\n");
    let func = find(&root, NodeKind::FuncDecl).unwrap();
    assert_eq!(func.list(Anchor::Recv).len(), 1);
    assert_eq!(text(func.child(Anchor::Name)), Some("Len"));
    assert!(func.token(Anchor::ResultsOpen).is_none());
    assert_eq!(func.list(Anchor::Results).len(), 1);
    assert!(find(func, NodeKind::ReturnStmt).is_some());
}

#[test]
fn range_with_key_and_value() {
    let root = parse_ok(&in_main("\tfor k, v := range m {\n\t}"));
    let range = find(&root, NodeKind::RangeStmt).unwrap();

    assert_eq!(text(range.child(Anchor::Key)), Some("k"));
    assert!(range.token(Anchor::Comma).is_some());
    assert_eq!(text(range.child(Anchor::Value)), Some("v"));
    assert_eq!(range.token(Anchor::Tok).map(|tok| &*tok.text), Some(":="));
    assert_eq!(text(range.child(Anchor::X)), Some("m"));
}

#[test]
fn range_without_variables() {
    let root = parse_ok(&in_main("\tfor range ch {\n\t}"));
    let range = find(&root, NodeKind::RangeStmt).unwrap();
    assert!(range.child(Anchor::Key).is_none());
    assert!(range.token(Anchor::Tok).is_none());
    assert!(range.token(Anchor::Range).is_some());
}

#[test]
fn range_over_call() {
    let root = parse_ok(&in_main("\tfor i := range slices.All(s) {\n\t}"));
    let range = find(&root, NodeKind::RangeStmt).unwrap();
    let x = range.child(Anchor::X).unwrap();
    assert_eq!(x.kind, NodeKind::CallExpr);
    assert_eq!(x.child(Anchor::Fun).map(|fun| fun.kind), Some(NodeKind::SelectorExpr));
    assert_eq!(x.list(Anchor::Args).len(), 1);
}

#[test]
fn three_clause_for() {
    let root = parse_ok(&in_main("\tfor i := 0; i < n; i++ {\n\t}"));
    let stmt = find(&root, NodeKind::ForStmt).unwrap();
    assert_eq!(stmt.child(Anchor::Init).map(|init| init.kind), Some(NodeKind::AssignStmt));
    assert_eq!(stmt.child(Anchor::Cond).map(|cond| cond.kind), Some(NodeKind::BinaryExpr));
    assert_eq!(stmt.child(Anchor::Post).map(|post| post.kind), Some(NodeKind::IncDecStmt));
    assert!(stmt.token(Anchor::CondSemicolon).is_some());
}

#[test]
fn condition_only_for() {
    let root = parse_ok(&in_main("\tfor ok {\n\t}"));
    let stmt = find(&root, NodeKind::ForStmt).unwrap();
    assert!(stmt.token(Anchor::InitSemicolon).is_none());
    assert_eq!(text(stmt.child(Anchor::Cond)), Some("ok"));
}

#[test]
fn brace_after_condition_opens_the_body() {
    let root = parse_ok(&in_main("\tif x := f(); x {\n\t\ty := T{1}\n\t}"));
    let stmt = find(&root, NodeKind::IfStmt).unwrap();
    assert!(stmt.child(Anchor::Init).is_some());
    assert_eq!(text(stmt.child(Anchor::Cond)), Some("x"));
    assert!(find(stmt.child(Anchor::Body).unwrap(), NodeKind::CompositeLit).is_some());
}

#[test]
fn else_if_chain() {
    let root = parse_ok(&in_main("\tif a {\n\t} else if b {\n\t} else {\n\t}"));
    let stmt = find(&root, NodeKind::IfStmt).unwrap();
    let alternative = stmt.child(Anchor::Alternative).unwrap();
    assert_eq!(alternative.kind, NodeKind::IfStmt);
    assert_eq!(alternative.child(Anchor::Alternative).map(|alt| alt.kind), Some(NodeKind::BlockStmt));
}

#[test]
fn switch_clauses() {
    let root = parse_ok(&in_main("\tswitch x {\n\tcase 1, 2:\n\t\tf()\n\tdefault:\n\t}"));
    let stmt = find(&root, NodeKind::SwitchStmt).unwrap();
    let clauses = stmt.child(Anchor::Body).unwrap().list(Anchor::List);
    assert_eq!(clauses.len(), 2);
    assert_eq!(clauses[0].token(Anchor::Case).map(|case| &*case.text), Some("case"));
    assert_eq!(clauses[0].list(Anchor::List).len(), 2);
    assert_eq!(clauses[0].list(Anchor::Body).len(), 1);
    assert_eq!(clauses[1].token(Anchor::Case).map(|case| &*case.text), Some("default"));
}

#[test]
fn struct_and_interface_members() {
    let root = parse_ok(
        "package p\n\ntype S struct {\n\tA, B int `json:\"a\"`\n\tfmt.Stringer\n}\n\ntype I interface {\n\tString() string\n\t~int | ~string\n}\n",
    );
    let st = find(&root, NodeKind::StructType).unwrap();
    let fields = st.list(Anchor::Fields);
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[0].list(Anchor::Names).len(), 2);
    assert!(fields[0].child(Anchor::Tag).is_some());
    assert!(fields[1].list(Anchor::Names).is_empty());

    let iface = find(&root, NodeKind::InterfaceType).unwrap();
    let methods = iface.list(Anchor::Methods);
    assert_eq!(methods.len(), 2);
    let signature = methods[0].child(Anchor::Type).unwrap();
    assert_eq!(signature.kind, NodeKind::FuncType);
    assert!(signature.token(Anchor::Func).is_none());
    assert_eq!(methods[1].child(Anchor::Type).map(|ty| ty.kind), Some(NodeKind::BinaryExpr));
}

#[test]
fn composite_literals_with_keys_and_elided_types() {
    let root = parse_ok(&in_main("\tm := map[string][]int{\"a\": {1, 2}, \"b\": nil}"));
    let lit = find(&root, NodeKind::CompositeLit).unwrap();
    let elts = lit.list(Anchor::Elts);
    assert_eq!(elts.len(), 2);
    assert_eq!(elts[0].kind, NodeKind::KeyValueExpr);
    let value = elts[0].child(Anchor::Value).unwrap();
    assert_eq!(value.kind, NodeKind::CompositeLit);
    assert!(value.child(Anchor::Type).is_none());
}

#[test]
fn binary_precedence() {
    let root = parse_ok(&in_main("\tx := a + b*c"));
    let sum = find(&root, NodeKind::BinaryExpr).unwrap();
    assert_eq!(sum.token(Anchor::Op).map(|op| &*op.text), Some("+"));
    assert_eq!(sum.child(Anchor::Y).map(|y| y.kind), Some(NodeKind::BinaryExpr));
}

#[test]
fn slices_calls_and_assertions() {
    let root = parse_ok(&in_main("\tv := xs[1:].(T)\n\tf(args...)\n\tg[int, string](1)"));
    let slice = find(&root, NodeKind::SliceExpr).unwrap();
    assert!(slice.child(Anchor::Low).is_some());
    assert!(slice.child(Anchor::High).is_none());
    assert!(find(&root, NodeKind::TypeAssertExpr).is_some());

    let call = find(&root, NodeKind::CallExpr).unwrap();
    assert!(call.token(Anchor::Ellipsis).is_some());
    let generic = find(&root, NodeKind::IndexListExpr).unwrap();
    assert_eq!(generic.list(Anchor::Indices).len(), 2);
}

#[test]
fn comments_are_set_aside() {
    let parse = parse("package p // package\n\n/* doc */\nvar x int\n");
    assert!(!parse.has_errors());
    let texts: Vec<_> = parse.tree.comments.iter().map(|comment| &*comment.text).collect();
    assert_eq!(texts, ["// package", "/* doc */"]);
}

#[test]
fn build_constraint_sets_version() {
    let parse = parse("//go:build go1.21 && linux\n\npackage p\n");
    assert_eq!(parse.tree.metadata.get("go_version"), Some("go1.21"));

    let parse = super::parse("// go1.21 is only mentioned here\npackage p\n");
    assert!(parse.tree.metadata.is_empty());
}

#[test]
fn file_spans_from_package_to_end() {
    let text = "// header\npackage p\n\n// trailing\n";
    let root = parse_ok(text);
    assert_eq!(u32::from(root.range.start()), 10);
    assert_eq!(u32::from(root.range.end()) as usize, text.len());
}

#[test]
fn malformed_input_reports_and_terminates() {
    let parse = parse("package p\n\nfunc (\n");
    assert!(parse.has_errors());
    assert!(parse.into_result().is_err());

    let parse = super::parse("package p\n\n) } ]\nvar x = \n");
    assert!(parse.has_errors());
    assert!(find(&parse.tree.root, NodeKind::BadDecl).is_some());
}

#[test]
fn unterminated_comment_is_reported() {
    let parse = parse("package main\n/* open");
    let messages: Vec<_> = parse.diagnostics.iter().map(|diagnostic| diagnostic.message()).collect();
    assert_eq!(messages, ["comment not terminated"]);
    assert_eq!(u32::from(parse.diagnostics[0].range().start()), 13);
}
