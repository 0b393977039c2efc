//! Statement parsing
//!
//! Blocks and statements. Loop and I/O sugar is expanded right here:
//!
//! - `while C do S` becomes `loop { break if not C; S }`
//! - `for v := A to B do S` becomes `v := A; loop { break if v > B; S; v += 1 }`
//!   (`downto` flips the comparison and decrements instead)
//! - `inc(x)` / `dec(x)` become `x += 1` / `x -= 1`
//! - `readln(x)`, `write('s')` and `writeln(e)` become formatted read/write
//!   statements using `"%d"`, `"%s"` and `"%d\n"`

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseError, Parser};
use tracing::trace;

/// Format used by `readln`
pub const READ_FORMAT: &str = "%d";
/// Format used by `write` with a string literal
pub const WRITE_STR_FORMAT: &str = "%s";
/// Format used by `writeln`
pub const WRITELN_FORMAT: &str = "%d\n";

impl<I: Iterator<Item = char>> Parser<I> {
    /// `[const ...] [var ...] begin stmt { ; stmt } end`
    pub(crate) fn parse_block(&mut self) -> Result<Block, ParseError> {
        trace!("block");
        match self.peek() {
            TokenKind::Const | TokenKind::Var | TokenKind::Begin => {
                let decls = self.parse_local_decls()?;
                self.parse_block_body(decls)
            }
            _ => Err(self.unexpected()),
        }
    }

    /// `begin ... end` with declarations that were already parsed.
    pub(crate) fn parse_block_body(
        &mut self,
        decls: Vec<LocalDecl>,
    ) -> Result<Block, ParseError> {
        self.expect(TokenKind::Begin)?;

        let mut stmts = Vec::new();
        self.parse_stmt(&mut stmts)?;

        loop {
            trace!("block_rest");
            match self.peek() {
                TokenKind::Semicolon => {
                    self.advance()?;
                    self.parse_stmt(&mut stmts)?;
                }
                TokenKind::End => break,
                _ => return Err(self.unexpected()),
            }
        }

        self.expect(TokenKind::End)?;
        Ok(Block::new(decls, stmts))
    }

    /// Parse one statement, appending what it expands to onto `stmts`.
    ///
    /// An empty statement appends nothing; `for` appends two.
    pub(crate) fn parse_stmt(&mut self, stmts: &mut Vec<Stmt>) -> Result<(), ParseError> {
        trace!("stmt");
        match self.peek() {
            TokenKind::Ident(_) => {
                let name = self.expect_identifier()?;
                stmts.push(self.parse_stmt_ident(name)?);
            }

            TokenKind::If => {
                self.advance()?;
                let cond = self.parse_expr0()?;
                self.expect(TokenKind::Then)?;
                let then_branch = self.parse_branch()?;
                let else_branch = self.parse_else_branch()?;
                stmts.push(Stmt::If {
                    cond,
                    then_branch,
                    else_branch,
                });
            }

            TokenKind::While => {
                self.advance()?;
                let cond = self.parse_expr0()?;
                self.expect(TokenKind::Do)?;

                let mut body = vec![Stmt::BreakIf(Expr::unary(UnaryOp::Not, cond))];
                self.parse_stmt(&mut body)?;
                stmts.push(Stmt::Loop(Block::of(body)));
            }

            TokenKind::For => {
                self.advance()?;
                let var = self.expect_identifier()?;
                self.expect(TokenKind::Assign)?;
                let from = self.parse_expr0()?;
                let ascending = self.parse_for_direction()?;
                let to = self.parse_expr0()?;
                self.expect(TokenKind::Do)?;

                let (stop, step) = if ascending {
                    (BinaryOp::Gt, AssignOp::AddAssign)
                } else {
                    (BinaryOp::Lt, AssignOp::SubAssign)
                };

                let mut body = vec![Stmt::BreakIf(Expr::binary(stop, Expr::var(&var), to))];
                self.parse_stmt(&mut body)?;
                body.push(Stmt::Assign {
                    op: step,
                    target: Expr::var(&var),
                    value: Expr::Int(1),
                });

                stmts.push(Stmt::assign(Expr::var(var), from));
                stmts.push(Stmt::Loop(Block::of(body)));
            }

            TokenKind::Exit => {
                self.advance()?;
                stmts.push(Stmt::Exit);
            }

            TokenKind::Const | TokenKind::Var | TokenKind::Begin => {
                stmts.push(Stmt::Block(self.parse_block()?));
            }

            TokenKind::Inc | TokenKind::Dec => {
                let op = if self.check(&TokenKind::Inc) {
                    AssignOp::AddAssign
                } else {
                    AssignOp::SubAssign
                };
                self.advance()?;
                let target = self.parse_lvalue_arg()?;
                stmts.push(Stmt::Assign {
                    op,
                    target,
                    value: Expr::Int(1),
                });
            }

            TokenKind::Readln => {
                self.advance()?;
                let target = self.parse_lvalue_arg()?;
                stmts.push(Stmt::Read {
                    format: READ_FORMAT.to_string(),
                    target,
                });
            }

            TokenKind::Write => {
                self.advance()?;
                self.expect(TokenKind::LParen)?;
                let text = match self.peek() {
                    TokenKind::Str(text) => text.clone(),
                    _ => return Err(self.unexpected()),
                };
                self.advance()?;
                self.expect(TokenKind::RParen)?;
                stmts.push(Stmt::Write {
                    format: WRITE_STR_FORMAT.to_string(),
                    value: Expr::Str(text),
                });
            }

            TokenKind::Writeln => {
                self.advance()?;
                self.expect(TokenKind::LParen)?;
                let value = self.parse_expr0()?;
                self.expect(TokenKind::RParen)?;
                stmts.push(Stmt::Write {
                    format: WRITELN_FORMAT.to_string(),
                    value,
                });
            }

            // Empty statement
            TokenKind::Semicolon | TokenKind::End => {}

            _ => return Err(self.unexpected()),
        }

        Ok(())
    }

    /// Assignment or call statement after a leading identifier.
    fn parse_stmt_ident(&mut self, name: String) -> Result<Stmt, ParseError> {
        trace!("stmt_ident");
        match self.peek() {
            TokenKind::Assign | TokenKind::LBracket => {
                let target = self.parse_lvalue_tail(name)?;
                self.expect(TokenKind::Assign)?;
                let value = self.parse_expr0()?;
                Ok(Stmt::assign(target, value))
            }
            TokenKind::LParen => {
                self.advance()?;
                let args = self.parse_call_args()?;
                self.expect(TokenKind::RParen)?;
                Ok(Stmt::Call(CallExpr { name, args }))
            }
            _ => Err(self.unexpected()),
        }
    }

    /// `( lvalue )` as taken by `inc`, `dec` and `readln`
    fn parse_lvalue_arg(&mut self) -> Result<Expr, ParseError> {
        self.expect(TokenKind::LParen)?;
        let name = self.expect_identifier()?;
        let target = self.parse_lvalue_tail(name)?;
        self.expect(TokenKind::RParen)?;
        Ok(target)
    }

    /// Optional `[index]` after an assignable name.
    fn parse_lvalue_tail(&mut self, name: String) -> Result<Expr, ParseError> {
        trace!("lvalue_tail");
        match self.peek() {
            TokenKind::LBracket => {
                self.advance()?;
                let index = self.parse_expr0()?;
                self.expect(TokenKind::RBracket)?;
                Ok(Expr::Index {
                    array: name,
                    index: Box::new(index),
                })
            }
            TokenKind::Assign | TokenKind::RParen => Ok(Expr::Var(name)),
            _ => Err(self.unexpected()),
        }
    }

    /// Single statement wrapped in its own block.
    fn parse_branch(&mut self) -> Result<Block, ParseError> {
        let mut stmts = Vec::new();
        self.parse_stmt(&mut stmts)?;
        Ok(Block::of(stmts))
    }

    fn parse_else_branch(&mut self) -> Result<Option<Block>, ParseError> {
        trace!("else_branch");
        match self.peek() {
            TokenKind::Else => {
                self.advance()?;
                Ok(Some(self.parse_branch()?))
            }
            TokenKind::Semicolon | TokenKind::End => Ok(None),
            _ => Err(self.unexpected()),
        }
    }

    /// `true` for `to`, `false` for `downto`
    fn parse_for_direction(&mut self) -> Result<bool, ParseError> {
        trace!("for_direction");
        let ascending = match self.peek() {
            TokenKind::To => true,
            TokenKind::Downto => false,
            _ => return Err(self.unexpected()),
        };
        self.advance()?;
        Ok(ascending)
    }
}
