pub mod symbol_table;

#[cfg(test)]
mod test;

use crate::diagnostics::{ErrorList, Position};
use crate::lexer::token::{Literal, Token, TokenType};
use crate::lexer::{Lexer, LexerError};
use symbol_table::{Symbol, SymbolTable};
use thiserror::Error;

// <program>     ::= "program" <identifier> ";" <function>
// <function>    ::= "void" "main" "(" ")" <block>
// <block>       ::= "{" ( <var-decl> | <statement> )* "}"
// <var-decl>    ::= "int" <decl-var> ( "," <decl-var> )* ";"
// <decl-var>    ::= <identifier> ( <array-decl> | ( "=" <expr> )? )
// <array-decl>  ::= "[" <integer>? "]" ( "=" <array-init> )?
// <array-init>  ::= "{" ( <integer> ( "," <integer> )* )? "}"
// <statement>   ::= <print-stmt> | <scan-stmt> | <assign-stmt>
// <print-stmt>  ::= "printf" "(" ( <string> | <expr> ) ( "," <expr> )* ")" ";"
// <scan-stmt>   ::= "scanf" "(" <string> "," "&"? <identifier> ")" ";"
// <assign-stmt> ::= <identifier> ( "[" <expr> "]" )? "=" <expr> ";"
// <expr>        ::= <term> ( ( "+" | "-" ) <term> )*
// <term>        ::= <factor> ( ( "*" | "/" ) <factor> )*
// <factor>      ::= <identifier> ( "[" <expr> "]" )? | <integer> | "(" <expr> ")"

macro_rules! recognize_binary_expr {
    ( $self: ident, $ops: pat, $nextp: ident ) => {{
        $self.$nextp()?;
        while let Some($ops) = $self.lookahead_type() {
            $self.bump()?;
            $self.$nextp()?;
        }
        Ok(())
    }};
}

/// Unrecoverable parse failures. Syntax and semantic findings are recoverable
/// and go to the [`ErrorList`] instead.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error(transparent)]
    Lexer(#[from] LexerError),
}

pub type ParseResult<T> = Result<T, ParseError>;

/// An identifier's text and location, captured before the parser moves past
/// the token.
#[derive(Debug, Clone)]
struct Ident {
    name: String,
    position: Position,
}

pub struct Parser<'a> {
    input: &'a str,
    lexer: Lexer<'a>,
    lookahead: Option<Token>,
    errors: ErrorList,
    symbols: SymbolTable,
}

impl<'a> Parser<'a> {
    /// Pulls the first token into the lookahead slot. Fails only on a lexer
    /// error; an empty input simply leaves the lookahead empty.
    pub fn new(input: &'a str) -> ParseResult<Self> {
        let mut lexer = Lexer::new(input);
        let first = lexer.next_token()?;
        let lookahead = match first.tok_type {
            TokenType::EOF => None,
            _ => Some(first),
        };
        Ok(Self {
            input,
            lexer,
            lookahead,
            errors: ErrorList::new(),
            symbols: SymbolTable::new(),
        })
    }

    pub fn errors(&self) -> &ErrorList {
        &self.errors
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn into_report(self) -> (ErrorList, SymbolTable) {
        (self.errors, self.symbols)
    }

    fn lookahead_type(&self) -> Option<&TokenType> {
        self.lookahead.as_ref().map(|t| &t.tok_type)
    }

    fn lookahead_lexeme(&self) -> &str {
        match &self.lookahead {
            Some(token) => &self.input[token.span.0..token.span.1],
            None => "<eof>",
        }
    }

    /// Advances the lookahead by one token. EOF empties the slot.
    fn bump(&mut self) -> ParseResult<()> {
        let token = self.lexer.next_token()?;
        self.lookahead = match token.tok_type {
            TokenType::EOF => None,
            _ => Some(token),
        };
        Ok(())
    }

    /// Matches one expected terminal. On a match the lookahead advances; on a
    /// mismatch a diagnostic is recorded and the lookahead is deliberately
    /// left in place, so the caller proceeds as though the terminal had been
    /// present. Fatal only when the token stream is already exhausted.
    fn consume(&mut self, tok_type: TokenType, exp: &'static str) -> ParseResult<()> {
        match &self.lookahead {
            None => Err(ParseError::UnexpectedEof),
            Some(token) if token.tok_type == tok_type => self.bump(),
            Some(_) => {
                self.error_expected(exp);
                Ok(())
            }
        }
    }

    /// Like [`consume`](Self::consume) for the identifier category; hands the
    /// matched name back. `None` means a diagnostic was recorded and the
    /// lookahead was not advanced.
    fn consume_identifier(&mut self) -> ParseResult<Option<Ident>> {
        match &self.lookahead {
            None => Err(ParseError::UnexpectedEof),
            Some(token) => match &token.tok_type {
                TokenType::Identifier(name) => {
                    let ident = Ident {
                        name: name.clone(),
                        position: token.position(),
                    };
                    self.bump()?;
                    Ok(Some(ident))
                }
                _ => {
                    self.error_expected("<identifier>");
                    Ok(None)
                }
            },
        }
    }

    fn consume_integer(&mut self) -> ParseResult<Option<i64>> {
        match &self.lookahead {
            None => Err(ParseError::UnexpectedEof),
            Some(token) => match &token.tok_type {
                TokenType::Literal(Literal::Integer(value)) => {
                    let value = *value;
                    self.bump()?;
                    Ok(Some(value))
                }
                _ => {
                    self.error_expected("<integer>");
                    Ok(None)
                }
            },
        }
    }

    fn consume_string(&mut self) -> ParseResult<Option<String>> {
        match &self.lookahead {
            None => Err(ParseError::UnexpectedEof),
            Some(token) => match &token.tok_type {
                TokenType::Literal(Literal::String(value)) => {
                    let value = value.clone();
                    self.bump()?;
                    Ok(Some(value))
                }
                _ => {
                    self.error_expected("<string>");
                    Ok(None)
                }
            },
        }
    }

    /// Records a diagnostic at the lookahead's position, or with the
    /// end-of-input sentinel when no lookahead remains.
    fn error(&mut self, message: impl Into<String>) {
        let position = self.lookahead.as_ref().map(Token::position);
        self.errors.add_error(message, position);
    }

    fn error_at(&mut self, position: Position, message: impl Into<String>) {
        self.errors.add_error(message, Some(position));
    }

    fn error_expected(&mut self, exp: &'static str) {
        let got = self.lookahead_lexeme().to_string();
        self.error(format!("expected `{exp}`, found `{got}`"));
    }
}

impl<'a> Parser<'a> {
    /// Recognizes the whole program, then reports: the completion banner
    /// first, then the diagnostics if any were recorded, else the symbol
    /// table. Diagnostics suppress the symbol dump.
    pub fn parse(&mut self) -> ParseResult<()> {
        self.program()?;
        println!("Syntax analysis completed successfully.\n");

        if self.errors.has_errors() {
            self.errors.print_errors();
        } else {
            self.symbols.print_table();
        }
        Ok(())
    }

    pub fn program(&mut self) -> ParseResult<()> {
        self.consume(TokenType::KProgram, "program")?;
        self.consume_identifier()?;
        self.consume(TokenType::Semicolon, ";")?;
        self.function()
    }

    fn function(&mut self) -> ParseResult<()> {
        self.consume(TokenType::KVoid, "void")?;
        self.consume(TokenType::KMain, "main")?;
        self.consume(TokenType::LParen, "(")?;
        self.consume(TokenType::RParen, ")")?;
        self.block()
    }

    /// If the stream runs out inside the block, an "unexpected end of file"
    /// diagnostic is recorded and the closing-brace match then fails fatally,
    /// so that diagnostic never reaches the printed report; it is observable
    /// only through [`errors`](Self::errors).
    fn block(&mut self) -> ParseResult<()> {
        self.consume(TokenType::LBrace, "{")?;

        loop {
            match self.lookahead_type() {
                None => {
                    self.error("unexpected end of file");
                    break;
                }
                Some(TokenType::RBrace) => break,
                Some(TokenType::KInt) => self.var_decl()?,
                Some(_) => self.statement()?,
            }
        }

        self.consume(TokenType::RBrace, "}")
    }
}

impl<'a> Parser<'a> {
    // Declarations

    fn var_decl(&mut self) -> ParseResult<()> {
        self.consume(TokenType::KInt, "int")?;
        self.decl_var()?;
        while let Some(TokenType::Comma) = self.lookahead_type() {
            self.bump()?;
            self.decl_var()?;
        }
        self.consume(TokenType::Semicolon, ";")
    }

    /// One declarator. A name that is already declared gets a diagnostic and
    /// is not registered again; the first declaration wins.
    fn decl_var(&mut self) -> ParseResult<()> {
        let Some(ident) = self.consume_identifier()? else {
            return Ok(());
        };

        let duplicate = self.symbols.exists(&ident.name);
        if duplicate {
            self.error_at(
                ident.position,
                format!("variable `{}` already declared", ident.name),
            );
        }

        match self.lookahead_type() {
            Some(TokenType::LBracket) => self.array_decl(ident, duplicate),
            Some(TokenType::Equal) => {
                self.bump()?;
                self.expr()?;
                if !duplicate {
                    self.symbols.declare(Symbol::scalar(ident.name));
                }
                Ok(())
            }
            _ => {
                if !duplicate {
                    self.symbols.declare(Symbol::scalar(ident.name));
                }
                Ok(())
            }
        }
    }

    fn array_decl(&mut self, ident: Ident, duplicate: bool) -> ParseResult<()> {
        self.consume(TokenType::LBracket, "[")?;

        // a missing or non-positive element count means "unspecified"
        let size = match self.lookahead_type() {
            Some(TokenType::Literal(Literal::Integer(value))) => {
                let value = *value;
                self.bump()?;
                usize::try_from(value).ok().filter(|&size| size > 0)
            }
            _ => None,
        };

        self.consume(TokenType::RBracket, "]")?;

        if let Some(TokenType::Equal) = self.lookahead_type() {
            self.bump()?;
            self.array_init(&ident, size)?;
        }

        if !duplicate {
            self.symbols.declare(Symbol::array(ident.name, size));
        }
        Ok(())
    }

    fn array_init(&mut self, ident: &Ident, declared: Option<usize>) -> ParseResult<()> {
        self.consume(TokenType::LBrace, "{")?;

        let mut count = 0;
        if let Some(TokenType::Literal(Literal::Integer(_))) = self.lookahead_type() {
            self.bump()?;
            count += 1;
            while let Some(TokenType::Comma) = self.lookahead_type() {
                self.bump()?;
                self.consume_integer()?;
                count += 1;
            }
        }

        self.consume(TokenType::RBrace, "}")?;

        if let Some(declared) = declared {
            if count != declared {
                self.error(format!(
                    "invalid size for array `{}`: expected {} elements, received {}",
                    ident.name, declared, count
                ));
            }
        }
        Ok(())
    }
}

impl<'a> Parser<'a> {
    // Statements

    fn statement(&mut self) -> ParseResult<()> {
        match self.lookahead_type() {
            Some(TokenType::KPrintf) => self.print_stmt(),
            Some(TokenType::KScanf) => self.scan_stmt(),
            Some(TokenType::Identifier(_)) => self.assign_stmt(),
            None => Err(ParseError::UnexpectedEof),
            Some(_) => {
                let got = self.lookahead_lexeme().to_string();
                self.error(format!("invalid command `{got}`"));
                // skip the offending token so block() cannot stall on it
                self.bump()
            }
        }
    }

    fn print_stmt(&mut self) -> ParseResult<()> {
        self.consume(TokenType::KPrintf, "printf")?;
        self.consume(TokenType::LParen, "(")?;

        match self.lookahead_type() {
            Some(TokenType::Literal(Literal::String(_))) => self.bump()?,
            _ => self.expr()?,
        }

        while let Some(TokenType::Comma) = self.lookahead_type() {
            self.bump()?;
            self.expr()?;
        }

        self.consume(TokenType::RParen, ")")?;
        self.consume(TokenType::Semicolon, ";")
    }

    fn scan_stmt(&mut self) -> ParseResult<()> {
        self.consume(TokenType::KScanf, "scanf")?;
        self.consume(TokenType::LParen, "(")?;
        self.consume_string()?;
        self.consume(TokenType::Comma, ",")?;

        if let Some(TokenType::Ampersand) = self.lookahead_type() {
            self.bump()?;
        }
        self.consume_identifier()?;

        self.consume(TokenType::RParen, ")")?;
        self.consume(TokenType::Semicolon, ";")
    }

    fn assign_stmt(&mut self) -> ParseResult<()> {
        let Some(ident) = self.consume_identifier()? else {
            return Ok(());
        };

        if !self.symbols.exists(&ident.name) {
            self.error_at(
                ident.position,
                format!("undeclared variable `{}`", ident.name),
            );
        }

        if let Some(TokenType::LBracket) = self.lookahead_type() {
            self.bump()?;
            self.expr()?;
            self.consume(TokenType::RBracket, "]")?;
        }

        self.consume(TokenType::Equal, "=")?;
        self.expr()?;
        self.consume(TokenType::Semicolon, ";")
    }
}

impl<'a> Parser<'a> {
    // Expressions

    fn expr(&mut self) -> ParseResult<()> {
        recognize_binary_expr!(self, TokenType::Plus | TokenType::Minus, term)
    }

    fn term(&mut self) -> ParseResult<()> {
        recognize_binary_expr!(self, TokenType::Star | TokenType::Slash, factor)
    }

    fn factor(&mut self) -> ParseResult<()> {
        match self.lookahead_type() {
            Some(TokenType::Identifier(_)) => {
                if let Some(ident) = self.consume_identifier()? {
                    if !self.symbols.exists(&ident.name) {
                        self.error_at(
                            ident.position,
                            format!("undeclared variable `{}`", ident.name),
                        );
                    }
                }

                if let Some(TokenType::LBracket) = self.lookahead_type() {
                    self.bump()?;
                    self.expr()?;
                    self.consume(TokenType::RBracket, "]")?;
                }
                Ok(())
            }
            Some(TokenType::Literal(Literal::Integer(_))) => self.bump(),
            Some(TokenType::LParen) => {
                self.bump()?;
                self.expr()?;
                self.consume(TokenType::RParen, ")")
            }
            None => Err(ParseError::UnexpectedEof),
            Some(_) => {
                let got = self.lookahead_lexeme().to_string();
                self.error(format!("expected identifier, integer or `(`, found `{got}`"));
                Ok(())
            }
        }
    }
}
