//! Expression parsing
//!
//! Six precedence levels, lowest first:
//!
//! | Level | Operators              | Notes                               |
//! |-------|------------------------|-------------------------------------|
//! | 0     | `or`                   | left-associative                    |
//! | 1     | `and`                  | left-associative                    |
//! | 2     | `= <> < <= > >=`       | at most one, no chaining            |
//! | 3     | `+ -`, unary `-`       | `-a * b` negates the whole term     |
//! | 4     | `* div mod`            | left-associative                    |
//! | 5     | atoms                  | number, name, call, index, `( e )`  |
//!
//! Each `parse_exprN_rest` loops over its operators and then checks the
//! lookahead against the level's FOLLOW set.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseError, Parser};
use tracing::trace;

/// Tokens that may follow a complete expression.
fn is_expr_follow(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::RParen
            | TokenKind::RBracket
            | TokenKind::Comma
            | TokenKind::Semicolon
            | TokenKind::Then
            | TokenKind::Else
            | TokenKind::Do
            | TokenKind::To
            | TokenKind::Downto
            | TokenKind::End
            | TokenKind::Eoi
    )
}

fn is_expr1_follow(kind: &TokenKind) -> bool {
    matches!(kind, TokenKind::Or) || is_expr_follow(kind)
}

fn is_expr2_follow(kind: &TokenKind) -> bool {
    matches!(kind, TokenKind::And) || is_expr1_follow(kind)
}

fn is_expr3_follow(kind: &TokenKind) -> bool {
    relational_op(kind).is_some() || is_expr2_follow(kind)
}

fn is_expr4_follow(kind: &TokenKind) -> bool {
    matches!(kind, TokenKind::Plus | TokenKind::Minus) || is_expr3_follow(kind)
}

fn is_expr5_follow(kind: &TokenKind) -> bool {
    multiplicative_op(kind).is_some() || is_expr4_follow(kind)
}

/// FIRST set shared by every expression level.
fn starts_expr(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Minus | TokenKind::Ident(_) | TokenKind::Number(_) | TokenKind::LParen
    )
}

fn relational_op(kind: &TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Eq => Some(BinaryOp::Eq),
        TokenKind::Neq => Some(BinaryOp::Ne),
        TokenKind::Lt => Some(BinaryOp::Lt),
        TokenKind::Leq => Some(BinaryOp::Le),
        TokenKind::Gt => Some(BinaryOp::Gt),
        TokenKind::Geq => Some(BinaryOp::Ge),
        _ => None,
    }
}

fn multiplicative_op(kind: &TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Mult => Some(BinaryOp::Mul),
        TokenKind::Div => Some(BinaryOp::Div),
        TokenKind::Mod => Some(BinaryOp::Mod),
        _ => None,
    }
}

impl<I: Iterator<Item = char>> Parser<I> {
    /// Parse a complete expression followed by end of input.
    ///
    /// Used for testing and for tools that evaluate expressions on their own.
    pub fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_expr0()?;
        self.expect(TokenKind::Eoi)?;
        Ok(expr)
    }

    pub(crate) fn parse_expr0(&mut self) -> Result<Expr, ParseError> {
        trace!("expr0");
        if !starts_expr(self.peek()) {
            return Err(self.unexpected());
        }
        let lhs = self.parse_expr1()?;
        self.parse_expr0_rest(lhs)
    }

    fn parse_expr0_rest(&mut self, mut lhs: Expr) -> Result<Expr, ParseError> {
        loop {
            trace!("expr0_rest");
            match self.peek() {
                TokenKind::Or => {
                    self.advance()?;
                    let rhs = self.parse_expr1()?;
                    lhs = Expr::binary(BinaryOp::Or, lhs, rhs);
                }
                kind if is_expr_follow(kind) => return Ok(lhs),
                _ => return Err(self.unexpected()),
            }
        }
    }

    fn parse_expr1(&mut self) -> Result<Expr, ParseError> {
        trace!("expr1");
        if !starts_expr(self.peek()) {
            return Err(self.unexpected());
        }
        let lhs = self.parse_expr2()?;
        self.parse_expr1_rest(lhs)
    }

    fn parse_expr1_rest(&mut self, mut lhs: Expr) -> Result<Expr, ParseError> {
        loop {
            trace!("expr1_rest");
            match self.peek() {
                TokenKind::And => {
                    self.advance()?;
                    let rhs = self.parse_expr2()?;
                    lhs = Expr::binary(BinaryOp::And, lhs, rhs);
                }
                kind if is_expr1_follow(kind) => return Ok(lhs),
                _ => return Err(self.unexpected()),
            }
        }
    }

    fn parse_expr2(&mut self) -> Result<Expr, ParseError> {
        trace!("expr2");
        if !starts_expr(self.peek()) {
            return Err(self.unexpected());
        }
        let lhs = self.parse_expr3()?;
        self.parse_expr2_rest(lhs)
    }

    /// Relational operators are non-associative: one at most.
    fn parse_expr2_rest(&mut self, lhs: Expr) -> Result<Expr, ParseError> {
        trace!("expr2_rest");
        if let Some(op) = relational_op(self.peek()) {
            self.advance()?;
            let rhs = self.parse_expr3()?;
            return Ok(Expr::binary(op, lhs, rhs));
        }
        if is_expr2_follow(self.peek()) {
            Ok(lhs)
        } else {
            Err(self.unexpected())
        }
    }

    fn parse_expr3(&mut self) -> Result<Expr, ParseError> {
        trace!("expr3");
        let lhs = match self.peek() {
            TokenKind::Minus => {
                self.advance()?;
                let operand = self.parse_expr4()?;
                Expr::unary(UnaryOp::Neg, operand)
            }
            kind if starts_expr(kind) => self.parse_expr4()?,
            _ => return Err(self.unexpected()),
        };
        self.parse_expr3_rest(lhs)
    }

    fn parse_expr3_rest(&mut self, mut lhs: Expr) -> Result<Expr, ParseError> {
        loop {
            trace!("expr3_rest");
            let op = match self.peek() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                kind if is_expr3_follow(kind) => return Ok(lhs),
                _ => return Err(self.unexpected()),
            };
            self.advance()?;
            let rhs = self.parse_expr4()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
    }

    fn parse_expr4(&mut self) -> Result<Expr, ParseError> {
        trace!("expr4");
        let lhs = self.parse_expr5()?;
        self.parse_expr4_rest(lhs)
    }

    fn parse_expr4_rest(&mut self, mut lhs: Expr) -> Result<Expr, ParseError> {
        loop {
            trace!("expr4_rest");
            let op = match self.peek() {
                kind if is_expr4_follow(kind) => return Ok(lhs),
                kind => match multiplicative_op(kind) {
                    Some(op) => op,
                    None => return Err(self.unexpected()),
                },
            };
            self.advance()?;
            let rhs = self.parse_expr5()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
    }

    /// Atoms: number, name, call, index or parenthesized expression.
    fn parse_expr5(&mut self) -> Result<Expr, ParseError> {
        trace!("expr5");
        match self.peek() {
            TokenKind::Number(value) => {
                let value = *value;
                self.advance()?;
                Ok(Expr::Int(value))
            }
            TokenKind::Ident(_) => {
                let name = self.expect_identifier()?;
                self.parse_expr5_ident(name)
            }
            TokenKind::LParen => {
                self.advance()?;
                let expr = self.parse_expr0()?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }
            _ => Err(self.unexpected()),
        }
    }

    fn parse_expr5_ident(&mut self, name: String) -> Result<Expr, ParseError> {
        trace!("expr5_ident");
        match self.peek() {
            TokenKind::LParen => {
                self.advance()?;
                let args = self.parse_call_args()?;
                self.expect(TokenKind::RParen)?;
                Ok(Expr::Call(CallExpr { name, args }))
            }
            TokenKind::LBracket => {
                self.advance()?;
                let index = self.parse_expr0()?;
                self.expect(TokenKind::RBracket)?;
                Ok(Expr::Index {
                    array: name,
                    index: Box::new(index),
                })
            }
            kind if is_expr5_follow(kind) => Ok(Expr::Var(name)),
            _ => Err(self.unexpected()),
        }
    }

    /// Comma-separated call arguments, up to (not including) `)`.
    pub(crate) fn parse_call_args(&mut self) -> Result<Vec<Expr>, ParseError> {
        trace!("call_args");
        let mut args = Vec::new();
        match self.peek() {
            kind if starts_expr(kind) => args.push(self.parse_expr0()?),
            TokenKind::RParen => return Ok(args),
            _ => return Err(self.unexpected()),
        }

        loop {
            trace!("call_args_rest");
            match self.peek() {
                TokenKind::Comma => {
                    self.advance()?;
                    args.push(self.parse_expr0()?);
                }
                TokenKind::RParen => return Ok(args),
                _ => return Err(self.unexpected()),
            }
        }
    }
}
