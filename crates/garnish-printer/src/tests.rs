use garnish_syntax::{CommentEntry, NodeKind, Registry, Spacing, TextSize, UnknownShape};

use crate::print;

fn print_plain(text: &str) -> String {
    print_with(text, &[])
}

fn print_with(text: &str, comments: &[CommentEntry]) -> String {
    let parse = garnish_parse::parse(text);
    assert!(!parse.has_errors(), "unexpected diagnostics: {:?}", parse.diagnostics);
    print(&Registry::standard(), &parse.tree.root, comments).unwrap()
}

fn entry(offset: u32, spacing: Spacing, texts: &[&str]) -> CommentEntry {
    CommentEntry {
        offset: TextSize::new(offset),
        spacing,
        texts: texts.iter().map(|&text| text.into()).collect(),
    }
}

#[test]
fn canonical_spacing_without_trivia() {
    let printed = print_plain("package p\nfunc   f(a,b int)(int,error){ return a,nil }\n");
    assert_eq!(printed, "package p\nfunc f(a, b int) (int, error) {\n\treturn a, nil\n}\n");
}

#[test]
fn empty_struct_glues_its_braces() {
    let text = "package p\ntype T struct{}\ntype I interface {\n\tM()\n}\n";
    assert_eq!(print_plain(text), text);
}

#[test]
fn case_labels_are_dedented() {
    let text = "package p\nfunc f() {\n\tswitch x {\n\tcase 1:\n\t\tg()\n\tdefault:\n\t}\n}\n";
    assert_eq!(print_plain(text), text);
}

#[test]
fn blank_entry_separates_declarations() {
    // `var` starts at 10.
    let printed = print_with("package p\nvar x = 1\n", &[entry(9, Spacing::Blank, &[])]);
    assert_eq!(printed, "package p\n\nvar x = 1\n");
}

#[test]
fn trailing_comments_follow_the_last_token() {
    let printed = print_with(
        "package p\nvar x = 1\n",
        &[entry(19, Spacing::None, &["/* one */", "// two"])],
    );
    assert_eq!(printed, "package p\nvar x = 1 /* one */ // two\n");
}

#[test]
fn block_comment_keeps_closer_tight() {
    // `ab` spans 20..22.
    let printed = print_with("package p\nvar x = f(ab)\n", &[entry(21, Spacing::None, &["/*x*/"])]);
    assert_eq!(printed, "package p\nvar x = f(ab /*x*/)\n");
}

#[test]
fn block_comment_between_delimiters_keeps_both_spaces() {
    // `(` is at 19, `{` at 23.
    let printed = print_with("package p\nvar x = f( )\n", &[entry(20, Spacing::None, &["/*f*/"])]);
    assert_eq!(printed, "package p\nvar x = f( /*f*/ )\n");

    let printed =
        print_with("package p\nvar x = []int{ }\n", &[entry(24, Spacing::None, &["/*e*/"])]);
    assert_eq!(printed, "package p\nvar x = []int{ /*e*/ }\n");
}

#[test]
fn continued_lines_are_indented() {
    let text = "package p\nvar x = a +\n\tb\n";
    assert_eq!(print_with(text, &[entry(22, Spacing::Newline, &[])]), text);

    // `Foo` is at 27.
    let text = "package p\nfunc f() {\n\tx.\n\t\tFoo()\n\ty()\n}\n";
    assert_eq!(print_with(text, &[entry(25, Spacing::Newline, &[])]), text);
}

#[test]
fn list_closed_on_a_new_line_keeps_its_trailing_comma() {
    let text = "package p\nvar x = f(\n\ta,\n)\n";
    let printed =
        print_with(text, &[entry(21, Spacing::Newline, &[]), entry(24, Spacing::Newline, &[])]);
    assert_eq!(printed, text);
}

#[test]
fn trailing_comma_dropped_on_one_line() {
    assert_eq!(print_plain("package p\nvar x = f(a,)\n"), "package p\nvar x = f(a)\n");
}

#[test]
fn unknown_shape_fails() {
    let parse = garnish_parse::parse("package p\n");
    let err = print(&Registry::default(), &parse.tree.root, &[]).unwrap_err();
    assert_eq!(err, UnknownShape { kind: NodeKind::File });
}
