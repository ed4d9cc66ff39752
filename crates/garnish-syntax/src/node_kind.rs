use std::fmt;

macro_rules! named_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd)]
        pub enum $name {
            $($variant,)*
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant,)*];

            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant),)*
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

named_enum! {
    /// Syntactic node kinds understood by the parser and the shape registry.
    NodeKind {
        File,
        GenDecl,
        ImportSpec,
        ValueSpec,
        TypeSpec,
        FuncDecl,
        Field,

        Ident,
        BasicLit,
        CompositeLit,
        FuncLit,
        ParenExpr,
        SelectorExpr,
        IndexExpr,
        IndexListExpr,
        SliceExpr,
        TypeAssertExpr,
        CallExpr,
        StarExpr,
        UnaryExpr,
        BinaryExpr,
        KeyValueExpr,

        ArrayType,
        MapType,
        FuncType,
        StructType,
        InterfaceType,
        Ellipsis,

        BlockStmt,
        ExprStmt,
        AssignStmt,
        IncDecStmt,
        ReturnStmt,
        BranchStmt,
        DeclStmt,
        GoStmt,
        DeferStmt,
        IfStmt,
        ForStmt,
        RangeStmt,
        SwitchStmt,
        CaseClause,

        BadExpr,
        BadStmt,
        BadDecl,
    }
}

named_enum! {
    /// A named position inside a node's shape.
    ///
    /// `Start` and `End` belong to every node; the rest are declared per kind
    /// by the shape registry.
    Anchor {
        Start,
        End,

        Alternative,
        Args,
        Assign,
        Body,
        Call,
        Case,
        Colon,
        Comma,
        Cond,
        CondSemicolon,
        Decl,
        Decls,
        Defer,
        Dot,
        Ellipsis,
        Else,
        Elt,
        Elts,
        Fields,
        For,
        Fun,
        Func,
        Go,
        High,
        If,
        Index,
        Indices,
        Init,
        InitSemicolon,
        Interface,
        Key,
        Label,
        Lbrace,
        Lbrack,
        Len,
        Lhs,
        List,
        Low,
        Lparen,
        Map,
        Methods,
        Name,
        Names,
        Op,
        Package,
        Params,
        ParamsClose,
        ParamsOpen,
        Path,
        Post,
        Range,
        Rbrace,
        Rbrack,
        Recv,
        RecvClose,
        RecvOpen,
        Results,
        ResultsClose,
        ResultsOpen,
        Return,
        Rhs,
        Rparen,
        Sel,
        Semicolon,
        Specs,
        Star,
        Struct,
        Switch,
        Tag,
        Tok,
        Type,
        TypeParams,
        TypeParamsClose,
        TypeParamsOpen,
        Value,
        Values,
        X,
        Y,
    }
}
