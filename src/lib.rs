pub mod diagnostics;
pub mod lexer;
pub mod parser;

use parser::Parser;

/// Runs the syntax analyzer over one source text: recognizes the program,
/// then prints the completion banner followed by either the accumulated
/// diagnostics or the symbol table. Returns `Err` only for fatal conditions
/// (lexer failure, or end of input where the grammar required more tokens).
pub fn analyze(input: &str) -> anyhow::Result<()> {
    let mut parser = Parser::new(input)?;
    parser.parse()?;
    Ok(())
}
