//! Human-readable AST listing
//!
//! One construct per line, children indented one column deeper than their
//! parent. Binary operators are printed on their own line between the two
//! operands, so the tree shape can be read off the indentation.

use crate::parser::ast::*;
use std::fmt::{self, Write};
use std::io;

struct AstPrinter<'a, W: Write> {
    out: &'a mut W,
}

impl<W: Write> AstPrinter<'_, W> {
    fn line(&mut self, off: usize, text: fmt::Arguments<'_>) -> fmt::Result {
        writeln!(self.out, "{:off$}{}", "", text, off = off)
    }

    fn program(&mut self, program: &Program, off: usize) -> fmt::Result {
        self.line(off, format_args!("program {}", program.name))?;
        for function in &program.functions {
            self.function(function, off)?;
        }
        Ok(())
    }

    fn function(&mut self, function: &FunctionDecl, off: usize) -> fmt::Result {
        let keyword = if function.is_procedure() {
            "procedure"
        } else {
            "function"
        };
        self.line(off, format_args!("{} {}(", keyword, function.name))?;

        for (name, ty) in &function.args {
            self.line(off + 1, format_args!("{} :", name))?;
            self.type_node(ty, off + 2)?;
        }

        match &function.result {
            None => self.line(off, format_args!(");"))?,
            Some(ty) => {
                self.line(off, format_args!(") :"))?;
                self.type_node(ty, off + 1)?;
                self.line(off, format_args!(";"))?;
            }
        }

        match &function.body {
            None => self.line(off, format_args!("forward;")),
            Some(body) => self.block(body, off + 1),
        }
    }

    fn type_node(&mut self, ty: &TypeNode, off: usize) -> fmt::Result {
        match ty {
            TypeNode::Int => self.line(off, format_args!("integer")),
            TypeNode::Array { begin, end, elem } => {
                self.line(off, format_args!("array [ {} .. {} ] of", begin, end))?;
                self.type_node(elem, off + 1)
            }
        }
    }

    fn local_decl(&mut self, decl: &LocalDecl, off: usize) -> fmt::Result {
        match decl {
            LocalDecl::Const(c) => {
                self.line(off, format_args!("const {} = {};", c.name, c.value))
            }
            LocalDecl::Var(v) => {
                self.line(off, format_args!("var {} :", v.name))?;
                self.type_node(&v.ty, off + 1)?;
                self.line(off, format_args!(";"))
            }
        }
    }

    fn block(&mut self, block: &Block, off: usize) -> fmt::Result {
        for decl in &block.decls {
            self.local_decl(decl, off)?;
        }

        self.line(off, format_args!("begin"))?;
        for (i, stmt) in block.stmts.iter().enumerate() {
            if i > 0 {
                self.line(off + 1, format_args!(";"))?;
            }
            self.stmt(stmt, off + 1)?;
        }
        self.line(off, format_args!("end"))
    }

    fn stmt(&mut self, stmt: &Stmt, off: usize) -> fmt::Result {
        match stmt {
            Stmt::Assign { op, target, value } => {
                self.expr(target, off + 1)?;
                self.line(off, format_args!("{}", op.symbol()))?;
                self.expr(value, off + 1)
            }
            Stmt::Call(call) => self.call(call, off),
            Stmt::Block(block) => self.block(block, off),
            Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.line(off, format_args!("if"))?;
                self.expr(cond, off + 1)?;
                self.line(off, format_args!("then"))?;
                self.block(then_branch, off + 1)?;
                if let Some(else_branch) = else_branch {
                    self.line(off, format_args!("else"))?;
                    self.block(else_branch, off + 1)?;
                }
                Ok(())
            }
            Stmt::Loop(body) => {
                self.line(off, format_args!("loop"))?;
                self.block(body, off + 1)
            }
            Stmt::BreakIf(cond) => {
                self.line(off, format_args!("break if"))?;
                self.expr(cond, off + 1)
            }
            Stmt::Exit => self.line(off, format_args!("exit")),
            Stmt::Read { format, target } => self.io_call("scanf", format, target, off),
            Stmt::Write { format, value } => self.io_call("printf", format, value, off),
        }
    }

    fn io_call(&mut self, callee: &str, format: &str, arg: &Expr, off: usize) -> fmt::Result {
        self.line(off, format_args!("{}(", callee))?;
        self.line(off + 1, format_args!("'{}'", format.escape_debug()))?;
        self.line(off, format_args!(","))?;
        self.expr(arg, off + 1)?;
        self.line(off, format_args!(")"))
    }

    fn call(&mut self, call: &CallExpr, off: usize) -> fmt::Result {
        self.line(off, format_args!("{}(", call.name))?;
        for (i, arg) in call.args.iter().enumerate() {
            if i > 0 {
                self.line(off, format_args!(","))?;
            }
            self.expr(arg, off + 1)?;
        }
        self.line(off, format_args!(")"))
    }

    fn expr(&mut self, expr: &Expr, off: usize) -> fmt::Result {
        match expr {
            Expr::Int(value) => self.line(off, format_args!("{}", value)),
            Expr::Str(text) => self.line(off, format_args!("'{}'", text.escape_debug())),
            Expr::Var(name) => self.line(off, format_args!("{}", name)),
            Expr::Index { array, index } => {
                self.line(off, format_args!("{}[", array))?;
                self.expr(index, off + 1)?;
                self.line(off, format_args!("]"))
            }
            Expr::Call(call) => self.call(call, off),
            Expr::Unary { op, operand } => {
                let symbol = match op {
                    UnaryOp::Neg => "-",
                    UnaryOp::Not => "!",
                };
                self.line(off, format_args!("{}", symbol))?;
                self.expr(operand, off + 1)
            }
            Expr::Binary { op, lhs, rhs } => {
                self.expr(lhs, off + 1)?;
                self.line(off, format_args!("{}", op.symbol()))?;
                self.expr(rhs, off + 1)
            }
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        AstPrinter { out: f }.program(self, 0)
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        AstPrinter { out: f }.block(self, 0)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        AstPrinter { out: f }.expr(self, 0)
    }
}

impl Program {
    /// Write the indented listing to a stream.
    pub fn print<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "{}", self)
    }
}
