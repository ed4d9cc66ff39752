//! The shape registry: per node kind, the ordered anchors trivia can attach to.
//!
//! A shape lists the anchors of a kind in source order. Each anchor owns one
//! slot of the node (a token, a child node, or a list of child nodes), so the
//! decorator, the restorer and the printer can all walk any node generically.
//! Supporting a new construct is a matter of adding a kind and its shape here.

use rustc_hash::FxHashMap;

use crate::{Anchor, NodeKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenText {
    Fixed(&'static str),
    Variable,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListStyle {
    /// Elements follow each other on one line unless trivia says otherwise.
    Inline,
    /// Every element starts on its own line.
    Lines,
    /// `Lines` when the owning node has its parentheses, `Inline` otherwise.
    Grouped,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListLayout {
    pub separator: Option<&'static str>,
    pub style: ListStyle,
}

const COMMAS: ListLayout = ListLayout { separator: Some(","), style: ListStyle::Inline };
const LINES: ListLayout = ListLayout { separator: None, style: ListStyle::Lines };
const GROUPED: ListLayout = ListLayout { separator: None, style: ListStyle::Grouped };

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotKind {
    Token(TokenText),
    Node,
    List(ListLayout),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
    /// Present exactly when the named anchor of the same node is present.
    With(Anchor),
}

/// What separates an anchor's content from whatever was printed before it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gap {
    Glue,
    Space,
    /// A space when the list anchor that follows is not empty (`struct {` vs `struct{}`).
    SpaceIfContent,
    /// A space unless the content starts with `(`, as in interface methods.
    SpaceUnlessParen,
    Line,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnchorDescriptor {
    pub anchor: Anchor,
    pub slot: SlotKind,
    pub presence: Presence,
    pub gap: Gap,
}

impl AnchorDescriptor {
    const fn new(anchor: Anchor, slot: SlotKind) -> Self {
        Self { anchor, slot, presence: Presence::Required, gap: Gap::Glue }
    }

    const fn optional(mut self) -> Self {
        self.presence = Presence::Optional;
        self
    }

    const fn with(mut self, anchor: Anchor) -> Self {
        self.presence = Presence::With(anchor);
        self
    }

    const fn space(self) -> Self {
        self.gap(Gap::Space)
    }

    const fn gap(mut self, gap: Gap) -> Self {
        self.gap = gap;
        self
    }

    /// Token and node anchors carry decorations; list anchors are covered by
    /// their delimiters and by the `Start`/`End` of their elements.
    pub fn is_decorated(&self) -> bool {
        !matches!(self.slot, SlotKind::List(_))
    }
}

const fn token(anchor: Anchor, text: &'static str) -> AnchorDescriptor {
    AnchorDescriptor::new(anchor, SlotKind::Token(TokenText::Fixed(text)))
}

const fn variable(anchor: Anchor) -> AnchorDescriptor {
    AnchorDescriptor::new(anchor, SlotKind::Token(TokenText::Variable))
}

const fn node(anchor: Anchor) -> AnchorDescriptor {
    AnchorDescriptor::new(anchor, SlotKind::Node)
}

const fn list(anchor: Anchor, layout: ListLayout) -> AnchorDescriptor {
    AnchorDescriptor::new(anchor, SlotKind::List(layout))
}

#[derive(Debug, PartialEq, Eq)]
pub struct Shape {
    kind: NodeKind,
    anchors: &'static [AnchorDescriptor],
}

impl Shape {
    pub const fn new(kind: NodeKind, anchors: &'static [AnchorDescriptor]) -> Self {
        Self { kind, anchors }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Declared anchors in source order, without the implicit `Start` and `End`.
    pub fn anchors(&self) -> &'static [AnchorDescriptor] {
        self.anchors
    }

    pub fn index_of(&self, anchor: Anchor) -> Option<usize> {
        self.anchors.iter().position(|descriptor| descriptor.anchor == anchor)
    }

    pub fn descriptor(&self, anchor: Anchor) -> Option<&'static AnchorDescriptor> {
        self.anchors.iter().find(|descriptor| descriptor.anchor == anchor)
    }

    pub fn has_anchor(&self, anchor: Anchor) -> bool {
        matches!(anchor, Anchor::Start | Anchor::End) || self.index_of(anchor).is_some()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("no shape is registered for node kind `{kind}`")]
pub struct UnknownShape {
    pub kind: NodeKind,
}

/// Lookup table from node kind to shape.
///
/// `Registry::standard()` knows every kind the parser produces. An empty
/// registry can be filled selectively with [`Registry::register`].
#[derive(Clone, Debug, Default)]
pub struct Registry {
    shapes: FxHashMap<NodeKind, &'static Shape>,
}

impl Registry {
    pub fn standard() -> Self {
        let mut registry = Self::default();
        for &kind in NodeKind::ALL {
            registry.register(standard_shape(kind));
        }
        registry
    }

    /// Registers `shape`, returning the shape it replaced.
    pub fn register(&mut self, shape: &'static Shape) -> Option<&'static Shape> {
        self.shapes.insert(shape.kind, shape)
    }

    pub fn shape_of(&self, kind: NodeKind) -> Result<&'static Shape, UnknownShape> {
        self.shapes.get(&kind).copied().ok_or(UnknownShape { kind })
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

use Anchor::*;

pub static FILE: Shape = Shape::new(
    NodeKind::File,
    &[token(Package, "package"), node(Name).space(), list(Decls, LINES).optional()],
);

pub static GEN_DECL: Shape = Shape::new(
    NodeKind::GenDecl,
    &[
        variable(Tok),
        token(Lparen, "(").optional().space(),
        list(Specs, GROUPED).optional().space(),
        token(Rparen, ")").with(Lparen),
    ],
);

pub static IMPORT_SPEC: Shape =
    Shape::new(NodeKind::ImportSpec, &[node(Name).optional(), node(Path).space()]);

pub static VALUE_SPEC: Shape = Shape::new(
    NodeKind::ValueSpec,
    &[
        list(Names, COMMAS),
        node(Type).optional().space(),
        token(Assign, "=").optional().space(),
        list(Values, COMMAS).with(Assign).space(),
    ],
);

pub static TYPE_SPEC: Shape = Shape::new(
    NodeKind::TypeSpec,
    &[
        node(Name),
        token(TypeParamsOpen, "[").optional(),
        list(TypeParams, COMMAS).with(TypeParamsOpen),
        token(TypeParamsClose, "]").with(TypeParamsOpen),
        token(Assign, "=").optional().space(),
        node(Value).space(),
    ],
);

pub static FUNC_DECL: Shape = Shape::new(
    NodeKind::FuncDecl,
    &[
        token(Func, "func"),
        token(RecvOpen, "(").optional().space(),
        list(Recv, COMMAS).with(RecvOpen),
        token(RecvClose, ")").with(RecvOpen),
        node(Name).space(),
        token(TypeParamsOpen, "[").optional(),
        list(TypeParams, COMMAS).with(TypeParamsOpen),
        token(TypeParamsClose, "]").with(TypeParamsOpen),
        token(ParamsOpen, "("),
        list(Params, COMMAS).optional(),
        token(ParamsClose, ")"),
        token(ResultsOpen, "(").optional().space(),
        list(Results, COMMAS).optional().space(),
        token(ResultsClose, ")").with(ResultsOpen),
        node(Body).optional().space(),
    ],
);

pub static FIELD: Shape = Shape::new(
    NodeKind::Field,
    &[
        list(Names, COMMAS).optional(),
        node(Type).gap(Gap::SpaceUnlessParen),
        node(Tag).optional().space(),
    ],
);

pub static IDENT: Shape = Shape::new(NodeKind::Ident, &[variable(Name)]);

pub static BASIC_LIT: Shape = Shape::new(NodeKind::BasicLit, &[variable(Value)]);

pub static COMPOSITE_LIT: Shape = Shape::new(
    NodeKind::CompositeLit,
    &[
        node(Type).optional(),
        token(Lbrace, "{"),
        list(Elts, COMMAS).optional(),
        token(Rbrace, "}"),
    ],
);

pub static FUNC_LIT: Shape = Shape::new(NodeKind::FuncLit, &[node(Type), node(Body).space()]);

pub static PAREN_EXPR: Shape =
    Shape::new(NodeKind::ParenExpr, &[token(Lparen, "("), node(X), token(Rparen, ")")]);

pub static SELECTOR_EXPR: Shape =
    Shape::new(NodeKind::SelectorExpr, &[node(X), token(Dot, "."), node(Sel)]);

pub static INDEX_EXPR: Shape = Shape::new(
    NodeKind::IndexExpr,
    &[node(X), token(Lbrack, "["), node(Index), token(Rbrack, "]")],
);

pub static INDEX_LIST_EXPR: Shape = Shape::new(
    NodeKind::IndexListExpr,
    &[node(X), token(Lbrack, "["), list(Indices, COMMAS), token(Rbrack, "]")],
);

pub static SLICE_EXPR: Shape = Shape::new(
    NodeKind::SliceExpr,
    &[
        node(X),
        token(Lbrack, "["),
        node(Low).optional(),
        token(Colon, ":"),
        node(High).optional(),
        token(Rbrack, "]"),
    ],
);

pub static TYPE_ASSERT_EXPR: Shape = Shape::new(
    NodeKind::TypeAssertExpr,
    &[node(X), token(Dot, "."), token(Lparen, "("), node(Type), token(Rparen, ")")],
);

pub static CALL_EXPR: Shape = Shape::new(
    NodeKind::CallExpr,
    &[
        node(Fun),
        token(Lparen, "("),
        list(Args, COMMAS).optional(),
        token(Ellipsis, "...").optional(),
        token(Rparen, ")"),
    ],
);

pub static STAR_EXPR: Shape = Shape::new(NodeKind::StarExpr, &[token(Star, "*"), node(X)]);

pub static UNARY_EXPR: Shape = Shape::new(NodeKind::UnaryExpr, &[variable(Op), node(X)]);

pub static BINARY_EXPR: Shape =
    Shape::new(NodeKind::BinaryExpr, &[node(X), variable(Op).space(), node(Y).space()]);

pub static KEY_VALUE_EXPR: Shape =
    Shape::new(NodeKind::KeyValueExpr, &[node(Key), token(Colon, ":"), node(Value).space()]);

pub static ARRAY_TYPE: Shape = Shape::new(
    NodeKind::ArrayType,
    &[token(Lbrack, "["), node(Len).optional(), token(Rbrack, "]"), node(Elt)],
);

pub static MAP_TYPE: Shape = Shape::new(
    NodeKind::MapType,
    &[token(Map, "map"), token(Lbrack, "["), node(Key), token(Rbrack, "]"), node(Value)],
);

pub static FUNC_TYPE: Shape = Shape::new(
    NodeKind::FuncType,
    &[
        token(Func, "func").optional(),
        token(ParamsOpen, "("),
        list(Params, COMMAS).optional(),
        token(ParamsClose, ")"),
        token(ResultsOpen, "(").optional().space(),
        list(Results, COMMAS).optional().space(),
        token(ResultsClose, ")").with(ResultsOpen),
    ],
);

pub static STRUCT_TYPE: Shape = Shape::new(
    NodeKind::StructType,
    &[
        token(Struct, "struct"),
        token(Lbrace, "{").gap(Gap::SpaceIfContent),
        list(Fields, LINES).optional(),
        token(Rbrace, "}"),
    ],
);

pub static INTERFACE_TYPE: Shape = Shape::new(
    NodeKind::InterfaceType,
    &[
        token(Interface, "interface"),
        token(Lbrace, "{").gap(Gap::SpaceIfContent),
        list(Methods, LINES).optional(),
        token(Rbrace, "}"),
    ],
);

pub static ELLIPSIS: Shape =
    Shape::new(NodeKind::Ellipsis, &[token(Ellipsis, "..."), node(Elt).optional()]);

pub static BLOCK_STMT: Shape = Shape::new(
    NodeKind::BlockStmt,
    &[token(Lbrace, "{"), list(List, LINES).optional(), token(Rbrace, "}")],
);

pub static EXPR_STMT: Shape = Shape::new(NodeKind::ExprStmt, &[node(X)]);

pub static ASSIGN_STMT: Shape = Shape::new(
    NodeKind::AssignStmt,
    &[list(Lhs, COMMAS), variable(Tok).space(), list(Rhs, COMMAS).space()],
);

pub static INC_DEC_STMT: Shape = Shape::new(NodeKind::IncDecStmt, &[node(X), variable(Tok)]);

pub static RETURN_STMT: Shape = Shape::new(
    NodeKind::ReturnStmt,
    &[token(Return, "return"), list(Results, COMMAS).optional().space()],
);

pub static BRANCH_STMT: Shape =
    Shape::new(NodeKind::BranchStmt, &[variable(Tok), node(Label).optional().space()]);

pub static DECL_STMT: Shape = Shape::new(NodeKind::DeclStmt, &[node(Decl)]);

pub static GO_STMT: Shape = Shape::new(NodeKind::GoStmt, &[token(Go, "go"), node(Call).space()]);

pub static DEFER_STMT: Shape =
    Shape::new(NodeKind::DeferStmt, &[token(Defer, "defer"), node(Call).space()]);

pub static IF_STMT: Shape = Shape::new(
    NodeKind::IfStmt,
    &[
        token(If, "if"),
        node(Init).optional().space(),
        token(Semicolon, ";").with(Init),
        node(Cond).space(),
        node(Body).space(),
        token(Else, "else").optional().space(),
        node(Alternative).with(Else).space(),
    ],
);

pub static FOR_STMT: Shape = Shape::new(
    NodeKind::ForStmt,
    &[
        token(For, "for"),
        node(Init).optional().space(),
        token(InitSemicolon, ";").optional(),
        node(Cond).optional().space(),
        token(CondSemicolon, ";").with(InitSemicolon),
        node(Post).optional().space(),
        node(Body).space(),
    ],
);

pub static RANGE_STMT: Shape = Shape::new(
    NodeKind::RangeStmt,
    &[
        token(For, "for"),
        node(Key).optional().space(),
        token(Comma, ",").with(Value),
        node(Value).optional().space(),
        variable(Tok).with(Key).space(),
        token(Range, "range").space(),
        node(X).space(),
        node(Body).space(),
    ],
);

pub static SWITCH_STMT: Shape = Shape::new(
    NodeKind::SwitchStmt,
    &[
        token(Switch, "switch"),
        node(Init).optional().space(),
        token(Semicolon, ";").with(Init),
        node(Tag).optional().space(),
        node(Body).space(),
    ],
);

pub static CASE_CLAUSE: Shape = Shape::new(
    NodeKind::CaseClause,
    &[
        variable(Case),
        list(List, COMMAS).optional().space(),
        token(Colon, ":"),
        list(Body, LINES).optional(),
    ],
);

pub static BAD_EXPR: Shape = Shape::new(NodeKind::BadExpr, &[]);
pub static BAD_STMT: Shape = Shape::new(NodeKind::BadStmt, &[]);
pub static BAD_DECL: Shape = Shape::new(NodeKind::BadDecl, &[]);

/// The built-in shape of `kind`.
pub fn standard_shape(kind: NodeKind) -> &'static Shape {
    match kind {
        NodeKind::File => &FILE,
        NodeKind::GenDecl => &GEN_DECL,
        NodeKind::ImportSpec => &IMPORT_SPEC,
        NodeKind::ValueSpec => &VALUE_SPEC,
        NodeKind::TypeSpec => &TYPE_SPEC,
        NodeKind::FuncDecl => &FUNC_DECL,
        NodeKind::Field => &FIELD,
        NodeKind::Ident => &IDENT,
        NodeKind::BasicLit => &BASIC_LIT,
        NodeKind::CompositeLit => &COMPOSITE_LIT,
        NodeKind::FuncLit => &FUNC_LIT,
        NodeKind::ParenExpr => &PAREN_EXPR,
        NodeKind::SelectorExpr => &SELECTOR_EXPR,
        NodeKind::IndexExpr => &INDEX_EXPR,
        NodeKind::IndexListExpr => &INDEX_LIST_EXPR,
        NodeKind::SliceExpr => &SLICE_EXPR,
        NodeKind::TypeAssertExpr => &TYPE_ASSERT_EXPR,
        NodeKind::CallExpr => &CALL_EXPR,
        NodeKind::StarExpr => &STAR_EXPR,
        NodeKind::UnaryExpr => &UNARY_EXPR,
        NodeKind::BinaryExpr => &BINARY_EXPR,
        NodeKind::KeyValueExpr => &KEY_VALUE_EXPR,
        NodeKind::ArrayType => &ARRAY_TYPE,
        NodeKind::MapType => &MAP_TYPE,
        NodeKind::FuncType => &FUNC_TYPE,
        NodeKind::StructType => &STRUCT_TYPE,
        NodeKind::InterfaceType => &INTERFACE_TYPE,
        NodeKind::Ellipsis => &ELLIPSIS,
        NodeKind::BlockStmt => &BLOCK_STMT,
        NodeKind::ExprStmt => &EXPR_STMT,
        NodeKind::AssignStmt => &ASSIGN_STMT,
        NodeKind::IncDecStmt => &INC_DEC_STMT,
        NodeKind::ReturnStmt => &RETURN_STMT,
        NodeKind::BranchStmt => &BRANCH_STMT,
        NodeKind::DeclStmt => &DECL_STMT,
        NodeKind::GoStmt => &GO_STMT,
        NodeKind::DeferStmt => &DEFER_STMT,
        NodeKind::IfStmt => &IF_STMT,
        NodeKind::ForStmt => &FOR_STMT,
        NodeKind::RangeStmt => &RANGE_STMT,
        NodeKind::SwitchStmt => &SWITCH_STMT,
        NodeKind::CaseClause => &CASE_CLAUSE,
        NodeKind::BadExpr => &BAD_EXPR,
        NodeKind::BadStmt => &BAD_STMT,
        NodeKind::BadDecl => &BAD_DECL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_exactly_one_shape() {
        let registry = Registry::standard();
        assert_eq!(registry.len(), NodeKind::ALL.len());

        for &kind in NodeKind::ALL {
            let shape = registry.shape_of(kind).unwrap();
            assert_eq!(shape.kind(), kind);
        }
    }

    #[test]
    fn anchors_are_unique_and_conditions_resolve() {
        for &kind in NodeKind::ALL {
            let shape = standard_shape(kind);
            for (i, descriptor) in shape.anchors().iter().enumerate() {
                assert!(
                    !matches!(descriptor.anchor, Anchor::Start | Anchor::End),
                    "{kind} declares an implicit anchor"
                );
                assert_eq!(shape.index_of(descriptor.anchor), Some(i), "{kind} repeats an anchor");
                if let Presence::With(other) = descriptor.presence {
                    assert!(shape.index_of(other).is_some(), "{kind}.{} depends on a missing anchor", descriptor.anchor);
                }
            }
        }
    }

    #[test]
    fn generic_alias_anchors_follow_source_order() {
        let anchors: Vec<_> = TYPE_SPEC.anchors().iter().map(|d| d.anchor).collect();
        assert_eq!(
            anchors,
            [Name, TypeParamsOpen, TypeParams, TypeParamsClose, Assign, Value]
        );
    }

    #[test]
    fn range_header_declares_range_and_iterated_expression() {
        let range = RANGE_STMT.index_of(Range).unwrap();
        let x = RANGE_STMT.index_of(X).unwrap();
        assert!(range < x);
        assert!(RANGE_STMT.index_of(Body).unwrap() > x);
    }

    #[test]
    fn empty_registry_fails_closed() {
        let registry = Registry::default();
        assert!(registry.is_empty());
        assert_eq!(
            registry.shape_of(NodeKind::RangeStmt),
            Err(UnknownShape { kind: NodeKind::RangeStmt })
        );
    }

    #[test]
    fn registering_a_shape_makes_it_visible() {
        let mut registry = Registry::default();
        assert_eq!(registry.register(&IDENT), None);
        assert_eq!(registry.shape_of(NodeKind::Ident), Ok(&IDENT));
        assert_eq!(registry.register(&IDENT), Some(&IDENT));
    }
}
