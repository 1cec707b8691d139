use crate::diagnostics::Position;

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Integer(i64),
    String(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenType {
    Ampersand,
    Comma,
    Equal,
    LBrace,
    LBracket,
    LParen,
    Minus,
    Plus,
    RBrace,
    RBracket,
    RParen,
    Semicolon,
    Slash,
    Star,

    KInt,
    KMain,
    KPrintf,
    KProgram,
    KScanf,
    KVoid,

    Literal(Literal),
    Identifier(String),

    Error,
    EOF,
}

/// Byte offsets of a lexeme into the source text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span(pub usize, pub usize);

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub span: Span,
    pub line: usize,
    pub column: usize,
    pub tok_type: TokenType,
}

impl Token {
    pub fn position(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
        }
    }
}
