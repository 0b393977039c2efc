//! # Introduction
//!
//! `sfe` is the front end of a compiler for a small Pascal-like teaching
//! language. It reads program text, builds an AST, resolves names against a
//! scoped symbol table and lowers the result to a tree IR that a code
//! generating backend consumes.
//!
//! ## Compilation pipeline
//!
//! ```text
//! Source → Lexer → Parser → AST → Lowering → IR → Backend
//! ```
//!
//! 1. [`parser`]: tokenises the source and builds the AST. Loop and I/O sugar
//!    (`while`, `for`, `inc`, `readln`, `writeln`, ...) is expanded here, so
//!    the AST has a single loop form and a single assignment form.
//! 2. [`lower`]: walks the AST with a [`lower::SymbolTable`], reporting
//!    unknown or duplicate names, and builds [`ir`] nodes.
//! 3. [`ir::backend`]: the [`ir::backend::Backend`] trait through which
//!    finished functions are handed on. Code generation itself lives outside
//!    this crate.
//!
//! ## Language
//!
//! Types: `integer` and `array [lo .. hi] of T`.
//! Control flow: `if/else`, `while`, `for .. to/downto`, `exit`, nested blocks.
//! Built-ins: `inc`, `dec`, `readln`, `write`, `writeln`.
//!
//! ```
//! use sfe::ir::backend::GlobalRegistry;
//!
//! let source = "program hello; begin write('hello') end.";
//! let mut backend = GlobalRegistry::new();
//! let translation = sfe::compile(source, &mut backend).unwrap();
//! assert_eq!(backend.function_names(&translation.ir), vec!["main"]);
//! ```

pub mod errors;
pub mod ir;
pub mod lower;
pub mod parser;

pub use errors::CompileError;
pub use lower::{translate, Translation};

use ir::backend::Backend;
use parser::ast::Program;
use parser::{ParseError, Parser};

/// Parse a complete program.
pub fn parse_source(source: &str) -> Result<Program, ParseError> {
    Parser::new(source)?.parse_program()
}

/// Parse and lower a complete program.
pub fn compile(source: &str, backend: &mut dyn Backend) -> Result<Translation, CompileError> {
    let program = parse_source(source)?;
    Ok(translate(&program, backend)?)
}
