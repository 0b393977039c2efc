//! Source parser
//!
//! This module transforms program text into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization (characters → tokens, pulled one at a time)
//! - [`parse`]: Parsing (tokens → AST), split over `declarations`,
//!   `statements` and `expressions`
//! - [`ast`]: AST node definitions
//! - [`print`]: indented AST listing for debugging
//!
//! # Supported Language
//!
//! - Types: `integer` and `array [lo .. hi] of T` with inclusive bounds
//! - Declarations: `const`, `var`, `function`, `procedure`, `forward`
//! - Statements: assignment, calls, `if`, `while`, `for .. to/downto`,
//!   `exit`, nested blocks, `inc`, `dec`, `readln`, `write`, `writeln`
//! - Expressions: arithmetic, relational (non-chaining), `and`, `or`
//!
//! # Parser Implementation
//!
//! Hand-written predictive recursive descent parser with one token of
//! lookahead. No external parser generator dependencies.

pub mod ast;
mod declarations;
mod expressions;
pub mod lexer;
pub mod parse;
pub mod print;
mod statements;

pub use parse::{ParseError, Parser};
pub use statements::{READ_FORMAT, WRITELN_FORMAT, WRITE_STR_FORMAT};
