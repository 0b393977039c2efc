//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including the error type, token helpers, and the `program` entry rule.
//!
//! # Parser Architecture
//!
//! The parser is a hand-written predictive recursive descent parser. Each
//! grammar rule is one method, and the alternative to take is chosen by
//! inspecting only the current lookahead token (its FIRST set); nothing is
//! ever backtracked. Every `..._rest` method accepts exactly the FOLLOW set of
//! its rule and rejects anything else.
//!
//! - This module: Parser struct, helper methods, and the `program` rule
//! - `declarations`: functions, procedures, `const`/`var` sections, types
//! - `statements`: blocks and statements, including sugar expansion
//! - `expressions`: the six-level expression grammar
//!
//! # Implementation
//!
//! Parser methods are split across multiple files using `impl Parser` blocks,
//! allowing each module to extend the Parser with related functionality while
//! maintaining access to the shared parser state.

use crate::parser::ast::*;
use crate::parser::lexer::{LexError, Lexer, SourceLocation, Token, TokenKind};
use std::mem;
use std::str::Chars;
use thiserror::Error;
use tracing::trace;

/// Parser error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Parse error at line {}, column {}: {message}", location.line, location.column)]
pub struct ParseError {
    pub message: String,
    pub location: SourceLocation,
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError {
            message: err.message,
            location: err.location,
        }
    }
}

/// Recursive descent parser pulling tokens from a [`Lexer`] one at a time
pub struct Parser<I: Iterator<Item = char>> {
    pub(crate) lexer: Lexer<I>,
    pub(crate) current: Token,
}

impl<'a> Parser<Chars<'a>> {
    pub fn new(source: &'a str) -> Result<Self, ParseError> {
        Self::from_lexer(Lexer::new(source))
    }
}

impl<I: Iterator<Item = char>> Parser<I> {
    /// Wrap a lexer, reading the first lookahead token.
    pub fn from_lexer(mut lexer: Lexer<I>) -> Result<Self, ParseError> {
        let current = lexer.read()?;
        Ok(Self { lexer, current })
    }

    /// Parse a whole compilation unit.
    ///
    /// `program name; <globals> begin ... end.` followed by end of input. The
    /// program's statement block becomes the body of a synthesized `main`
    /// function appended after the user functions.
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        trace!("program");

        self.expect(TokenKind::Program)?;
        let name = self.expect_identifier()?;
        self.expect(TokenKind::Semicolon)?;

        let mut program = Program::new(name);
        let mut decls = Vec::new();
        self.parse_globals(&mut program.functions, &mut decls)?;

        let body = self.parse_block_body(decls)?;
        self.expect(TokenKind::Dot)?;
        self.expect(TokenKind::Eoi)?;

        program.functions.push(FunctionDecl {
            name: MAIN_FUNCTION.to_string(),
            args: Vec::new(),
            result: Some(TypeNode::Int),
            body: Some(body),
        });

        Ok(program)
    }

    // ===== Helper methods =====

    pub(crate) fn peek(&self) -> &TokenKind {
        &self.current.kind
    }

    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        mem::discriminant(self.peek()) == mem::discriminant(kind)
    }

    /// Consume the current token and pull the next one from the lexer.
    pub(crate) fn advance(&mut self) -> Result<Token, ParseError> {
        let next = self.lexer.read()?;
        Ok(mem::replace(&mut self.current, next))
    }

    pub(crate) fn current_location(&self) -> SourceLocation {
        self.current.location
    }

    pub(crate) fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if self.check(&kind) {
            self.advance()
        } else {
            Err(ParseError {
                message: format!(
                    "Token mismatch: expected {}, found {}",
                    kind.name(),
                    self.current
                ),
                location: self.current_location(),
            })
        }
    }

    pub(crate) fn expect_identifier(&mut self) -> Result<String, ParseError> {
        if let TokenKind::Ident(name) = self.peek() {
            let name = name.clone();
            self.advance()?;
            return Ok(name);
        }
        Err(ParseError {
            message: format!("Expected identifier, found {}", self.current),
            location: self.current_location(),
        })
    }

    /// Error for a token outside the FIRST/FOLLOW set of the current rule.
    pub(crate) fn unexpected(&self) -> ParseError {
        ParseError {
            message: format!("Unexpected {} encountered", self.current),
            location: self.current_location(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_program() {
        let mut parser = Parser::new("program p; begin end.").unwrap();
        let program = parser.parse_program().unwrap();

        assert_eq!(program.name, "p");
        assert_eq!(program.functions.len(), 1);
        let main = program.main().unwrap();
        assert_eq!(main.result, Some(TypeNode::Int));
        assert_eq!(main.body, Some(Block::default()));
    }

    #[test]
    fn test_missing_final_dot() {
        let mut parser = Parser::new("program p; begin end").unwrap();
        let err = parser.parse_program().unwrap_err();
        assert!(err.message.contains("expected symbol dot"));
        assert!(err.message.contains("end of input"));
    }

    #[test]
    fn test_trailing_tokens_rejected() {
        let mut parser = Parser::new("program p; begin end. x").unwrap();
        let err = parser.parse_program().unwrap_err();
        assert!(err.message.contains("expected end of input"));
    }

    #[test]
    fn test_lex_error_becomes_parse_error() {
        let mut parser = Parser::new("program p; begin x := # end.").unwrap();
        let err = parser.parse_program().unwrap_err();
        assert!(err.message.contains("Unknown character '#'"));
        assert_eq!(err.location, SourceLocation::new(1, 23));
    }

    #[test]
    fn test_global_sections_feed_main_block() {
        let source = "program p; const n = 3; var x : integer; begin x := n end.";
        let mut parser = Parser::new(source).unwrap();
        let program = parser.parse_program().unwrap();

        let body = program.main().unwrap().body.as_ref().unwrap();
        assert_eq!(body.decls.len(), 2);
        assert_eq!(body.decls[0].name(), "n");
        assert_eq!(body.decls[1].name(), "x");
    }
}
