#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SyntaxKind {
    LEFT_PAREN,
    RIGHT_PAREN,
    LEFT_BRACKET,
    RIGHT_BRACKET,
    LEFT_BRACE,
    RIGHT_BRACE,
    COMMA,
    SEMICOLON,
    COLON,
    DOT,
    ELLIPSIS,

    PLUS,
    MINUS,
    STAR,
    SLASH,
    PERCENT,
    AMP,
    PIPE,
    CARET,
    SHL,
    SHR,
    AMP_CARET,
    AMP_AMP,
    PIPE_PIPE,
    ARROW,
    PLUS_PLUS,
    MINUS_MINUS,
    EQ_EQ,
    NEQ,
    LT,
    LT_EQ,
    GT,
    GT_EQ,
    BANG,
    TILDE,
    EQ,
    COLON_EQ,
    PLUS_EQ,
    MINUS_EQ,
    STAR_EQ,
    SLASH_EQ,
    PERCENT_EQ,
    AMP_EQ,
    PIPE_EQ,
    CARET_EQ,
    SHL_EQ,
    SHR_EQ,
    AMP_CARET_EQ,

    BREAK_KW,
    CASE_KW,
    CHAN_KW,
    CONST_KW,
    CONTINUE_KW,
    DEFAULT_KW,
    DEFER_KW,
    ELSE_KW,
    FALLTHROUGH_KW,
    FOR_KW,
    FUNC_KW,
    GO_KW,
    GOTO_KW,
    IF_KW,
    IMPORT_KW,
    INTERFACE_KW,
    MAP_KW,
    PACKAGE_KW,
    RANGE_KW,
    RETURN_KW,
    SELECT_KW,
    STRUCT_KW,
    SWITCH_KW,
    TYPE_KW,
    VAR_KW,

    NAME,
    INT_NUMBER,
    FLOAT_NUMBER,
    IMAGINARY_NUMBER,
    RUNE,
    STRING,

    UNKNOWN,
    EOF,
}

impl SyntaxKind {
    pub fn from_keyword(ident: &str) -> Option<Self> {
        use SyntaxKind::*;

        let kind = match ident {
            "break" => BREAK_KW,
            "case" => CASE_KW,
            "chan" => CHAN_KW,
            "const" => CONST_KW,
            "continue" => CONTINUE_KW,
            "default" => DEFAULT_KW,
            "defer" => DEFER_KW,
            "else" => ELSE_KW,
            "fallthrough" => FALLTHROUGH_KW,
            "for" => FOR_KW,
            "func" => FUNC_KW,
            "go" => GO_KW,
            "goto" => GOTO_KW,
            "if" => IF_KW,
            "import" => IMPORT_KW,
            "interface" => INTERFACE_KW,
            "map" => MAP_KW,
            "package" => PACKAGE_KW,
            "range" => RANGE_KW,
            "return" => RETURN_KW,
            "select" => SELECT_KW,
            "struct" => STRUCT_KW,
            "switch" => SWITCH_KW,
            "type" => TYPE_KW,
            "var" => VAR_KW,
            _ => return None,
        };
        Some(kind)
    }

    pub fn is_literal(self) -> bool {
        use SyntaxKind::*;
        matches!(self, INT_NUMBER | FLOAT_NUMBER | IMAGINARY_NUMBER | RUNE | STRING)
    }

    /// A line ending after one of these kinds gets an automatic semicolon.
    pub fn ends_statement(self) -> bool {
        use SyntaxKind::*;
        self.is_literal()
            || matches!(
                self,
                NAME | BREAK_KW
                    | CONTINUE_KW
                    | FALLTHROUGH_KW
                    | RETURN_KW
                    | PLUS_PLUS
                    | MINUS_MINUS
                    | RIGHT_PAREN
                    | RIGHT_BRACKET
                    | RIGHT_BRACE
            )
    }

    pub fn binary_precedence(self) -> Option<u8> {
        use SyntaxKind::*;

        let precedence = match self {
            PIPE_PIPE => 1,
            AMP_AMP => 2,
            EQ_EQ | NEQ | LT | LT_EQ | GT | GT_EQ => 3,
            PLUS | MINUS | PIPE | CARET => 4,
            STAR | SLASH | PERCENT | SHL | SHR | AMP | AMP_CARET => 5,
            _ => return None,
        };
        Some(precedence)
    }

    pub fn is_unary_operator(self) -> bool {
        use SyntaxKind::*;
        matches!(self, PLUS | MINUS | BANG | CARET | STAR | AMP | ARROW | TILDE)
    }

    pub fn is_assign_operator(self) -> bool {
        use SyntaxKind::*;
        matches!(
            self,
            EQ | COLON_EQ
                | PLUS_EQ
                | MINUS_EQ
                | STAR_EQ
                | SLASH_EQ
                | PERCENT_EQ
                | AMP_EQ
                | PIPE_EQ
                | CARET_EQ
                | SHL_EQ
                | SHR_EQ
                | AMP_CARET_EQ
        )
    }
}
