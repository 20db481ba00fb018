//! Token types shared by the lexer and the parser.

use serde::Serialize;
use std::fmt;

/// 1-based source position of a token's first character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum TokenKind {
    Ident,
    Keyword(Keyword),
    Number,
    String,
    Op(Op),
    Punct(Punct),
    /// A line indented deeper than the enclosing block.
    Indent,
    /// One closed indentation level.
    Dedent,
    /// End of a logical line.
    Newline,
    Eof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Keyword {
    Def,
    Return,
    If,
    Elif,
    Else,
    Lambda,
    None,
    Is,
    And,
    Or,
    Not,
    True,
    False,
    /// Reserved so class declarations fail loudly instead of parsing as calls.
    Class,
}

impl Keyword {
    pub fn from_ident(text: &str) -> Option<Self> {
        let keyword = match text {
            "def" => Keyword::Def,
            "return" => Keyword::Return,
            "if" => Keyword::If,
            "elif" => Keyword::Elif,
            "else" => Keyword::Else,
            "lambda" => Keyword::Lambda,
            "None" => Keyword::None,
            "is" => Keyword::Is,
            "and" => Keyword::And,
            "or" => Keyword::Or,
            "not" => Keyword::Not,
            "True" => Keyword::True,
            "False" => Keyword::False,
            "class" => Keyword::Class,
            _ => return None,
        };
        Some(keyword)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Op {
    EqEq,
    NotEq,
    LtEq,
    GtEq,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Assign,
    Lt,
    Gt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Punct {
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Colon,
    Dot,
}

impl Punct {
    pub fn opens_group(self) -> bool {
        matches!(self, Punct::LParen | Punct::LBracket | Punct::LBrace)
    }

    pub fn closes_group(self) -> bool {
        matches!(self, Punct::RParen | Punct::RBracket | Punct::RBrace)
    }

    /// Source text in quotes, for error messages.
    pub fn quoted(self) -> &'static str {
        match self {
            Punct::LParen => "'('",
            Punct::RParen => "')'",
            Punct::LBracket => "'['",
            Punct::RBracket => "']'",
            Punct::LBrace => "'{'",
            Punct::RBrace => "'}'",
            Punct::Comma => "','",
            Punct::Colon => "':'",
            Punct::Dot => "'.'",
        }
    }
}

/// Operators and punctuation, multi-character entries first.
pub(crate) const SYMBOLS: &[(&str, TokenKind)] = &[
    ("==", TokenKind::Op(Op::EqEq)),
    ("!=", TokenKind::Op(Op::NotEq)),
    ("<=", TokenKind::Op(Op::LtEq)),
    (">=", TokenKind::Op(Op::GtEq)),
    ("+", TokenKind::Op(Op::Plus)),
    ("-", TokenKind::Op(Op::Minus)),
    ("*", TokenKind::Op(Op::Star)),
    ("/", TokenKind::Op(Op::Slash)),
    ("%", TokenKind::Op(Op::Percent)),
    ("=", TokenKind::Op(Op::Assign)),
    ("<", TokenKind::Op(Op::Lt)),
    (">", TokenKind::Op(Op::Gt)),
    ("(", TokenKind::Punct(Punct::LParen)),
    (")", TokenKind::Punct(Punct::RParen)),
    ("[", TokenKind::Punct(Punct::LBracket)),
    ("]", TokenKind::Punct(Punct::RBracket)),
    ("{", TokenKind::Punct(Punct::LBrace)),
    ("}", TokenKind::Punct(Punct::RBrace)),
    (",", TokenKind::Punct(Punct::Comma)),
    (":", TokenKind::Punct(Punct::Colon)),
    (".", TokenKind::Punct(Punct::Dot)),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// Verbatim source text; empty for synthesized tokens.
    pub text: &'a str,
    pub span: Span,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, text: &'a str, span: Span) -> Self {
        Self { kind, text, span }
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Ident => write!(f, "identifier '{}'", self.text),
            TokenKind::Keyword(_) => write!(f, "keyword '{}'", self.text),
            TokenKind::Number => write!(f, "number {}", self.text),
            TokenKind::String => write!(f, "string {}", self.text),
            TokenKind::Op(_) | TokenKind::Punct(_) => write!(f, "'{}'", self.text),
            TokenKind::Indent => f.write_str("indent"),
            TokenKind::Dedent => f.write_str("dedent"),
            TokenKind::Newline => f.write_str("end of line"),
            TokenKind::Eof => f.write_str("end of input"),
        }
    }
}
