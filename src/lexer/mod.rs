pub mod token;


use lazy_static::lazy_static;
use std::collections::HashMap;
use std::str::Chars;
use thiserror::Error;
use token::{Literal, Span, Token, TokenType};

macro_rules! hash_map {
    ( $( $key: expr => $value: expr ),* $(,)? ) => {{
        let mut m = HashMap::new();
        $(
            m.insert($key, $value);
        )*
        m
    }}
}

lazy_static! {
    static ref KEYWORDS: HashMap<&'static str, TokenType> = hash_map! {
        "int"     => TokenType::KInt,
        "main"    => TokenType::KMain,
        "printf"  => TokenType::KPrintf,
        "program" => TokenType::KProgram,
        "scanf"   => TokenType::KScanf,
        "void"    => TokenType::KVoid,
    };
}

#[derive(Error, Debug)]
pub enum LexerErrorType {
    #[error("unexpected EOF")]
    UnexpectedEOF,

    #[error("invalid escape {0:?}")]
    InvalidEscape(char),

    #[error("integer literal out of range: {0}")]
    IntegerOutOfRange(String),

    #[error("expected start of token, found {0:?}")]
    UnexpectedChar(char),
}

pub type LexerResult = Result<Token, LexerError>;

#[derive(Error, Debug)]
#[error("lexical error at line {}, column {}: {error}", .token.line, .token.column)]
pub struct LexerError {
    pub token: Token,
    pub error: LexerErrorType,
}

pub struct Lexer<'a> {
    input_str: &'a str,
    input: Chars<'a>,
    line: usize,
    line_start: usize,
    start: usize,
    current: usize,
    eof: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input_str: &'a str) -> Self {
        Self {
            input_str,
            input: input_str.chars(),
            line: 1,
            line_start: 0,
            start: 0,
            current: 0,
            eof: false,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.clone().next()
    }

    fn peek_next(&self) -> Option<char> {
        let mut iter = self.input.clone();
        iter.next();
        iter.next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.input.next();
        if let Some(c) = c {
            // offsets are byte positions, Span slices must stay on char boundaries
            self.current += c.len_utf8();
        }
        c
    }

    fn make_token(&self, tok_type: TokenType) -> Token {
        let span = Span(self.start, self.current);
        Token {
            tok_type,
            span,
            line: self.line,
            column: self.start - self.line_start + 1,
        }
    }

    fn make_error(&self, error: LexerErrorType) -> LexerError {
        LexerError {
            token: self.make_token(TokenType::Error),
            error,
        }
    }

    fn skip_whitespace(&mut self) {
        loop {
            match self.peek() {
                Some('\r' | '\t' | ' ') => {
                    self.advance();
                }
                Some('\n') => {
                    self.line += 1;
                    self.advance();
                    self.line_start = self.current;
                }
                Some('/') => {
                    if let Some('/') = self.peek_next() {
                        self.advance();
                        self.advance();
                        while let Some(c) = self.advance() {
                            if c == '\n' {
                                self.line += 1;
                                self.line_start = self.current;
                                break;
                            }
                        }
                    } else {
                        break;
                    }
                }
                _ => break,
            };
        }
    }

    fn get_lexeme(&self) -> &'a str {
        let start = self.start;
        let end = self.current;
        &self.input_str[start..end]
    }

    fn number(&mut self) -> LexerResult {
        while let Some('0'..='9') = self.peek() {
            self.advance();
        }

        let lexeme = self.get_lexeme();
        match lexeme.parse::<i64>() {
            Ok(int) => Ok(self.make_token(TokenType::Literal(Literal::Integer(int)))),
            Err(_) => Err(self.make_error(LexerErrorType::IntegerOutOfRange(lexeme.to_string()))),
        }
    }

    fn read_escape(&mut self) -> Result<char, LexerError> {
        if let Some(c) = self.peek() {
            self.advance();
            match c {
                'n' => Ok('\n'),
                't' => Ok('\t'),
                'r' => Ok('\r'),
                '\\' => Ok('\\'),
                '"' => Ok('"'),
                '\'' => Ok('\''),
                _ => Err(self.make_error(LexerErrorType::InvalidEscape(c))),
            }
        } else {
            Err(self.make_error(LexerErrorType::UnexpectedEOF))
        }
    }

    fn string(&mut self) -> LexerResult {
        let mut string = String::new();
        loop {
            match self.peek() {
                None => return Err(self.make_error(LexerErrorType::UnexpectedEOF)),
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    string.push(self.read_escape()?);
                }
                Some(c) => {
                    if c == '\n' {
                        self.line += 1;
                    }
                    self.advance();
                    string.push(c);
                }
            };
        }
        Ok(self.make_token(TokenType::Literal(Literal::String(string))))
    }

    fn identifier(&mut self) -> LexerResult {
        loop {
            match self.peek() {
                Some(_c) if _c == '_' || _c.is_ascii_alphanumeric() => self.advance(),
                _ => break,
            };
        }
        let lexeme = self.get_lexeme();

        if let Some(ttype) = KEYWORDS.get(lexeme) {
            Ok(self.make_token(ttype.clone()))
        } else {
            Ok(self.make_token(TokenType::Identifier(lexeme.to_string())))
        }
    }
}

impl<'a> Lexer<'a> {
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexerError> {
        let mut tokens = Vec::new();
        while !self.eof {
            tokens.push(self.next_token()?);
        }
        tokens.pop();
        Ok(tokens)
    }

    pub fn next_token(&mut self) -> LexerResult {
        self.skip_whitespace();

        self.start = self.current;
        let c = match self.advance() {
            Some(c) => c,
            None => {
                self.eof = true;
                return Ok(self.make_token(TokenType::EOF));
            }
        };

        match c {
            '&' => Ok(self.make_token(TokenType::Ampersand)),
            ',' => Ok(self.make_token(TokenType::Comma)),
            '=' => Ok(self.make_token(TokenType::Equal)),
            '{' => Ok(self.make_token(TokenType::LBrace)),
            '[' => Ok(self.make_token(TokenType::LBracket)),
            '(' => Ok(self.make_token(TokenType::LParen)),
            '-' => Ok(self.make_token(TokenType::Minus)),
            '+' => Ok(self.make_token(TokenType::Plus)),
            '}' => Ok(self.make_token(TokenType::RBrace)),
            ']' => Ok(self.make_token(TokenType::RBracket)),
            ')' => Ok(self.make_token(TokenType::RParen)),
            ';' => Ok(self.make_token(TokenType::Semicolon)),
            '/' => Ok(self.make_token(TokenType::Slash)),
            '*' => Ok(self.make_token(TokenType::Star)),

            '"' => self.string(),

            c if c.is_ascii_digit() => self.number(),
            c if c == '_' || c.is_ascii_alphabetic() => self.identifier(),
            _ => Err(self.make_error(LexerErrorType::UnexpectedChar(c))),
        }
    }
}
