//! Lexer for the Go subset understood by garnish.
//!
//! Comments never reach the token stream; they are collected in source order
//! and handed to the parser at the end. Newlines are insignificant except for
//! automatic semicolon insertion.

mod cursor;

use cursor::{Cursor, EOF_CHAR};
use garnish_syntax::Comment;
pub use garnish_syntax::SyntaxKind;
use garnish_syntax::SyntaxKind::*;
use text_size::{TextRange, TextSize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub range: TextRange,
}

/// A malformed piece of input. Lexing goes on past it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexError {
    pub message: &'static str,
    pub range: TextRange,
}

impl Token {
    const EOF: Self = Self { kind: EOF, range: TextRange::empty(TextSize::new(0)) };

    /// Semicolons the lexer inserted at a line end have no text.
    pub fn is_implicit(&self) -> bool {
        self.kind == SEMICOLON && self.range.is_empty()
    }
}

pub struct Tokenizer<'a> {
    text: &'a str,
    cursor: Cursor<'a>,
    current: Token,
    insert_semicolon: bool,
    comments: Vec<Comment>,
    errors: Vec<LexError>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut tokenizer = Self {
            text,
            cursor: Cursor::new(text),
            current: Token::EOF,
            insert_semicolon: false,
            comments: Vec::new(),
            errors: Vec::new(),
        };
        tokenizer.next_token();
        tokenizer
    }

    pub fn peek(&self) -> &Token {
        &self.current
    }

    pub fn next_token(&mut self) -> Token {
        let next = self.lex();
        std::mem::replace(&mut self.current, next)
    }

    /// Comments seen so far, including those before the peeked token.
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn finish(self) -> (Vec<Comment>, Vec<LexError>) {
        (self.comments, self.errors)
    }

    fn lex(&mut self) -> Token {
        if let Some(semicolon) = self.trivia() {
            return semicolon;
        }

        let start = self.cursor.offset();
        let kind = self.syntax_kind();
        self.insert_semicolon = kind.ends_statement();
        Token { kind, range: TextRange::new(start, self.cursor.offset()) }
    }

    fn implicit_semicolon(&mut self, at: TextSize) -> Token {
        self.insert_semicolon = false;
        Token { kind: SEMICOLON, range: TextRange::empty(at) }
    }

    fn trivia(&mut self) -> Option<Token> {
        loop {
            let start = self.cursor.offset();
            match self.cursor.peek() {
                '\n' => {
                    if self.insert_semicolon {
                        self.cursor.advance();
                        return Some(self.implicit_semicolon(start));
                    }
                    self.cursor.advance();
                }
                ' ' | '\t' | '\r' => self.cursor.advance_while(|c| matches!(c, ' ' | '\t' | '\r')),
                '/' if self.cursor.second() == '/' => {
                    self.cursor.advance_while(|c| c != '\n');
                    self.push_comment(start);
                }
                '/' if self.cursor.second() == '*' => {
                    self.cursor.advance();
                    self.cursor.advance();
                    while !self.cursor.is_eof() && !self.cursor.rest().starts_with("*/") {
                        self.cursor.advance();
                    }
                    let closed = self.cursor.eat('*') && self.cursor.eat('/');

                    let range = self.push_comment(start);
                    if !closed {
                        self.errors.push(LexError { message: "comment not terminated", range });
                    }
                    if self.insert_semicolon && self.text[range].contains('\n') {
                        return Some(self.implicit_semicolon(range.end()));
                    }
                }
                _ if self.cursor.is_eof() => {
                    return self.insert_semicolon.then(|| self.implicit_semicolon(start));
                }
                _ => return None,
            }
        }
    }

    fn push_comment(&mut self, start: TextSize) -> TextRange {
        let range = TextRange::new(start, self.cursor.offset());
        self.comments.push(Comment { text: self.text[range].into(), range });
        range
    }

    fn syntax_kind(&mut self) -> SyntaxKind {
        let start = self.cursor.offset();

        match self.cursor.advance() {
            '(' => LEFT_PAREN,
            ')' => RIGHT_PAREN,
            '[' => LEFT_BRACKET,
            ']' => RIGHT_BRACKET,
            '{' => LEFT_BRACE,
            '}' => RIGHT_BRACE,
            ',' => COMMA,
            ';' => SEMICOLON,
            ':' => self.pick('=', COLON_EQ, COLON),
            '.' => {
                if self.cursor.rest().starts_with("..") {
                    self.cursor.advance();
                    self.cursor.advance();
                    ELLIPSIS
                } else if self.cursor.peek().is_ascii_digit() {
                    self.digits(false);
                    self.float_exponent();
                    self.imaginary(FLOAT_NUMBER)
                } else {
                    DOT
                }
            }
            '+' => self.pick_either('+', PLUS_PLUS, '=', PLUS_EQ, PLUS),
            '-' => self.pick_either('-', MINUS_MINUS, '=', MINUS_EQ, MINUS),
            '*' => self.pick('=', STAR_EQ, STAR),
            '/' => self.pick('=', SLASH_EQ, SLASH),
            '%' => self.pick('=', PERCENT_EQ, PERCENT),
            '^' => self.pick('=', CARET_EQ, CARET),
            '~' => TILDE,
            '=' => self.pick('=', EQ_EQ, EQ),
            '!' => self.pick('=', NEQ, BANG),
            '&' => {
                if self.cursor.eat('^') {
                    self.pick('=', AMP_CARET_EQ, AMP_CARET)
                } else {
                    self.pick_either('&', AMP_AMP, '=', AMP_EQ, AMP)
                }
            }
            '|' => self.pick_either('|', PIPE_PIPE, '=', PIPE_EQ, PIPE),
            '<' => {
                if self.cursor.eat('<') {
                    self.pick('=', SHL_EQ, SHL)
                } else {
                    self.pick_either('=', LT_EQ, '-', ARROW, LT)
                }
            }
            '>' => {
                if self.cursor.eat('>') {
                    self.pick('=', SHR_EQ, SHR)
                } else {
                    self.pick('=', GT_EQ, GT)
                }
            }
            '"' => self.quoted('"', STRING),
            '\'' => self.quoted('\'', RUNE),
            '`' => {
                self.cursor.advance_while(|c| c != '`');
                if self.cursor.eat('`') { STRING } else { UNKNOWN }
            }
            first_char @ '0'..='9' => self.number(first_char),
            c if c == '_' || c.is_alphabetic() => {
                self.cursor.advance_while(|c| c == '_' || c.is_alphanumeric());
                let end = self.cursor.offset();
                SyntaxKind::from_keyword(&self.text[TextRange::new(start, end)]).unwrap_or(NAME)
            }
            EOF_CHAR if self.cursor.is_eof() && start == self.cursor.offset() => EOF,
            _ => UNKNOWN,
        }
    }

    fn pick(&mut self, next: char, matched: SyntaxKind, otherwise: SyntaxKind) -> SyntaxKind {
        if self.cursor.eat(next) { matched } else { otherwise }
    }

    fn pick_either(
        &mut self,
        first: char,
        first_kind: SyntaxKind,
        second: char,
        second_kind: SyntaxKind,
        otherwise: SyntaxKind,
    ) -> SyntaxKind {
        if self.cursor.eat(first) {
            first_kind
        } else {
            self.pick(second, second_kind, otherwise)
        }
    }

    fn quoted(&mut self, quote: char, kind: SyntaxKind) -> SyntaxKind {
        loop {
            match self.cursor.peek() {
                c if c == quote => {
                    self.cursor.advance();
                    return kind;
                }
                '\\' => {
                    self.cursor.advance();
                    self.cursor.advance();
                }
                '\n' => return UNKNOWN,
                _ if self.cursor.is_eof() => return UNKNOWN,
                _ => {
                    self.cursor.advance();
                }
            }
        }
    }

    fn number(&mut self, c: char) -> SyntaxKind {
        if c == '0' {
            match self.cursor.peek() {
                'b' | 'B' | 'o' | 'O' => {
                    self.cursor.advance();
                    self.digits(false);
                    return self.imaginary(INT_NUMBER);
                }
                'x' | 'X' => {
                    self.cursor.advance();
                    self.digits(true);
                    return self.imaginary(INT_NUMBER);
                }
                _ => {}
            }
        }
        self.digits(false);

        if self.cursor.peek() == '.' && self.cursor.second() != '.' {
            self.cursor.advance();
            self.digits(false);
            self.float_exponent();
            return self.imaginary(FLOAT_NUMBER);
        }

        if matches!(self.cursor.peek(), 'e' | 'E') {
            self.float_exponent();
            return self.imaginary(FLOAT_NUMBER);
        }

        self.imaginary(INT_NUMBER)
    }

    fn imaginary(&mut self, kind: SyntaxKind) -> SyntaxKind {
        if self.cursor.eat('i') { IMAGINARY_NUMBER } else { kind }
    }

    fn digits(&mut self, allow_hex: bool) {
        loop {
            match self.cursor.peek() {
                '_' | '0'..='9' => {
                    self.cursor.advance();
                }
                'a'..='f' | 'A'..='F' if allow_hex => {
                    self.cursor.advance();
                }
                _ => return,
            }
        }
    }

    fn float_exponent(&mut self) {
        if matches!(self.cursor.peek(), 'e' | 'E') {
            self.cursor.advance();
            if matches!(self.cursor.peek(), '-' | '+') {
                self.cursor.advance();
            }
            self.digits(false);
        }
    }
}

pub struct Lexed {
    /// Always ends with `EOF`.
    pub tokens: Vec<Token>,
    pub comments: Vec<Comment>,
    pub errors: Vec<LexError>,
}

pub fn tokenize(text: &str) -> Lexed {
    let mut tokenizer = Tokenizer::new(text);
    let mut tokens = Vec::new();
    loop {
        let token = tokenizer.next_token();
        tokens.push(token);
        if token.kind == EOF {
            break;
        }
    }
    let (comments, errors) = tokenizer.finish();
    Lexed { tokens, comments, errors }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: u32, end: u32) -> TextRange {
        TextRange::new(TextSize::new(start), TextSize::new(end))
    }

    fn kinds(text: &str) -> Vec<SyntaxKind> {
        tokenize(text).tokens.into_iter().map(|token| token.kind).collect()
    }

    fn texts(text: &str) -> Vec<&str> {
        tokenize(text)
            .tokens
            .into_iter()
            .filter(|token| token.kind != EOF)
            .map(|token| &text[token.range])
            .collect()
    }

    #[test]
    fn test_integer_literals() {
        for input in ["123", "0", "0b1010", "0o755", "0x1f", "123_456", "0755"] {
            assert_eq!(kinds(input), [INT_NUMBER, SEMICOLON, EOF], "Input: '{input}'");
        }
    }

    #[test]
    fn test_float_and_imaginary_literals() {
        for input in ["123.456", "0.0", "1e10", "1.0e-5", ".5", "1."] {
            assert_eq!(kinds(input)[0], FLOAT_NUMBER, "Input: '{input}'");
        }
        assert_eq!(kinds("2i")[0], IMAGINARY_NUMBER);
        assert_eq!(kinds("1.5i")[0], IMAGINARY_NUMBER);
    }

    #[test]
    fn operators_take_the_longest_match() {
        assert_eq!(
            texts("a &^= b <<= c := d ... e <- f != g"),
            ["a", "&^=", "b", "<<=", "c", ":=", "d", "...", "e", "<-", "f", "!=", "g", ""]
        );
        assert_eq!(
            kinds("x++"),
            [NAME, PLUS_PLUS, SEMICOLON, EOF]
        );
    }

    #[test]
    fn keywords_are_not_names() {
        assert_eq!(kinds("for range rangeX"), [FOR_KW, RANGE_KW, NAME, SEMICOLON, EOF]);
    }

    #[test]
    fn semicolons_are_inserted_only_after_statement_ends() {
        let text = "x := f(\n\ta,\n)\nif x {\n}\n";
        assert_eq!(
            kinds(text),
            [
                NAME, COLON_EQ, NAME, LEFT_PAREN, NAME, COMMA, RIGHT_PAREN, SEMICOLON, IF_KW,
                NAME, LEFT_BRACE, RIGHT_BRACE, SEMICOLON, EOF
            ]
        );

        let tokens = tokenize(text).tokens;
        assert!(tokens[7].is_implicit());
        assert_eq!(tokens[7].range, TextRange::empty(TextSize::new(13)));
    }

    #[test]
    fn comments_are_collected_in_order() {
        let text = "a /* one */ b // two\n/* three\n*/ c";
        let Lexed { tokens, comments, errors } = tokenize(text);
        assert!(errors.is_empty());

        let comments: Vec<_> = comments.iter().map(|c| (&*c.text, c.range)).collect();
        assert_eq!(
            comments,
            [
                ("/* one */", range(2, 11)),
                ("// two", range(14, 20)),
                ("/* three\n*/", range(21, 32)),
            ]
        );
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(kinds, [NAME, NAME, SEMICOLON, NAME, SEMICOLON, EOF]);
    }

    #[test]
    fn multiline_block_comment_ends_a_statement() {
        assert_eq!(kinds("x /*\n*/ y"), [NAME, SEMICOLON, NAME, SEMICOLON, EOF]);
        assert_eq!(kinds("x /* */ y"), [NAME, NAME, SEMICOLON, EOF]);
    }

    #[test]
    fn unterminated_block_comment_is_an_error() {
        let text = "package main\n/* open";
        let Lexed { tokens, comments, errors } = tokenize(text);

        assert_eq!(errors, [LexError { message: "comment not terminated", range: range(13, 20) }]);
        assert_eq!(&*comments[0].text, "/* open");
        assert_eq!(tokens.last().map(|token| token.kind), Some(EOF));

        assert!(tokenize("/* a */ /**/").errors.is_empty());
        assert_eq!(tokenize("/* a *").errors.len(), 1);
    }

    #[test]
    fn strings_runes_and_raw_strings() {
        assert_eq!(texts(r#""a\"b" 'c' '\n'"#), [r#""a\"b""#, "'c'", r"'\n'", ""]);
        let raw = "`line\nnext`";
        assert_eq!(kinds(raw), [STRING, SEMICOLON, EOF]);
        assert_eq!(kinds("\"open\n"), [UNKNOWN, EOF]);
    }

    #[test]
    fn unicode_identifiers() {
        assert_eq!(texts("héllo := 1"), ["héllo", ":=", "1", ""]);
    }

    #[test]
    fn peek_does_not_consume() {
        let mut tokenizer = Tokenizer::new("package main");
        assert_eq!(tokenizer.peek().kind, PACKAGE_KW);
        assert_eq!(tokenizer.next_token().kind, PACKAGE_KW);
        assert_eq!(tokenizer.peek().kind, NAME);
    }
}
