//! S-expression rendering of IR trees
//!
//! Declarations are printed inline as one-line references wherever they are
//! used; only the translation unit spells out complete function definitions.
//! The output is meant for humans and for comparing tree shapes in tests, not
//! as a persistent format.

use super::{Ir, IrBinaryOp, IrHandle, IrNode, IrUnaryOp};
use std::fmt;

/// Display adapter returned by [`Ir::display`]
pub struct IrDump<'a> {
    ir: &'a Ir,
    root: IrHandle,
}

impl Ir {
    pub fn display(&self, root: IrHandle) -> IrDump<'_> {
        IrDump { ir: self, root }
    }

    /// Render the tree rooted at `root`.
    pub fn dump(&self, root: IrHandle) -> String {
        self.display(root).to_string()
    }
}

impl fmt::Display for IrDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.node(f, self.root, 0)?;
        writeln!(f)
    }
}

fn unary_name(op: IrUnaryOp) -> &'static str {
    match op {
        IrUnaryOp::Negate => "negate_expr",
        IrUnaryOp::TruthNot => "truth_not_expr",
    }
}

fn binary_name(op: IrBinaryOp) -> &'static str {
    match op {
        IrBinaryOp::Plus => "plus_expr",
        IrBinaryOp::Minus => "minus_expr",
        IrBinaryOp::Mult => "mult_expr",
        IrBinaryOp::TruncDiv => "trunc_div_expr",
        IrBinaryOp::TruncMod => "trunc_mod_expr",
        IrBinaryOp::Eq => "eq_expr",
        IrBinaryOp::Ne => "ne_expr",
        IrBinaryOp::Lt => "lt_expr",
        IrBinaryOp::Le => "le_expr",
        IrBinaryOp::Gt => "gt_expr",
        IrBinaryOp::Ge => "ge_expr",
        IrBinaryOp::TruthOr => "truth_or_expr",
        IrBinaryOp::TruthAnd => "truth_and_expr",
    }
}

impl IrDump<'_> {
    fn node(&self, f: &mut fmt::Formatter<'_>, handle: IrHandle, depth: usize) -> fmt::Result {
        write!(f, "{:indent$}", "", indent = depth * 2)?;

        match self.ir.get(handle) {
            IrNode::IntCst(value) => write!(f, "(int_cst {})", value),
            IrNode::StringCst(text) => write!(f, "(string_cst {:?})", text),

            IrNode::VarDecl { .. }
            | IrNode::ParmDecl { .. }
            | IrNode::ResultDecl { .. }
            | IrNode::FunctionDecl { .. } => self.decl_ref(f, handle),

            IrNode::AddrOf(inner) => self.compound(f, "addr_expr", &[*inner], depth),
            IrNode::ArrayRef { array, index } => {
                self.compound(f, "array_ref", &[*array, *index], depth)
            }
            IrNode::Unary { op, operand } => {
                self.compound(f, unary_name(*op), &[*operand], depth)
            }
            IrNode::Binary { op, lhs, rhs } => {
                self.compound(f, binary_name(*op), &[*lhs, *rhs], depth)
            }
            IrNode::Modify { target, value } => {
                self.compound(f, "modify_expr", &[*target, *value], depth)
            }
            IrNode::PreIncrement { target, amount } => {
                self.compound(f, "preincrement_expr", &[*target, *amount], depth)
            }
            IrNode::PreDecrement { target, amount } => {
                self.compound(f, "predecrement_expr", &[*target, *amount], depth)
            }
            IrNode::Call { function, args } => {
                let mut children = vec![*function];
                children.extend(args);
                self.compound(f, "call_expr", &children, depth)
            }

            IrNode::DeclExpr(decl) => self.compound(f, "decl_expr", &[*decl], depth),
            IrNode::Bind { vars, body, .. } => {
                let mut head = String::from("bind_expr (vars");
                for name in vars.iter().filter_map(|var| self.ir.decl_name(*var)) {
                    head.push(' ');
                    head.push_str(name);
                }
                head.push(')');
                self.compound(f, &head, body, depth)
            }
            IrNode::Cond {
                cond,
                then_branch,
                else_branch,
            } => {
                let mut children = vec![*cond, *then_branch];
                children.extend(else_branch);
                self.compound(f, "cond_expr", &children, depth)
            }
            IrNode::Loop(body) => self.compound(f, "loop_expr", &[*body], depth),
            IrNode::ExitIf(cond) => self.compound(f, "exit_expr", &[*cond], depth),
            IrNode::Return(result) => self.compound(f, "return_expr", &[*result], depth),

            IrNode::TranslationUnit { name, functions } => {
                write!(f, "(translation_unit {}", name)?;
                for function in functions {
                    writeln!(f)?;
                    write!(f, "{:indent$}", "", indent = (depth + 1) * 2)?;
                    self.function_def(f, *function, depth + 1)?;
                }
                write!(f, ")")
            }
        }
    }

    /// `(head` followed by each child on its own line, then `)`.
    fn compound(
        &self,
        f: &mut fmt::Formatter<'_>,
        head: &str,
        children: &[IrHandle],
        depth: usize,
    ) -> fmt::Result {
        write!(f, "({}", head)?;
        for child in children {
            writeln!(f)?;
            self.node(f, *child, depth + 1)?;
        }
        write!(f, ")")
    }

    fn decl_ref(&self, f: &mut fmt::Formatter<'_>, handle: IrHandle) -> fmt::Result {
        match self.ir.get(handle) {
            IrNode::VarDecl {
                name,
                ty,
                read_only,
                initial,
            } => {
                write!(f, "(var_decl {} ", name)?;
                if *read_only {
                    write!(f, "const ")?;
                }
                write!(f, "{}", ty)?;
                match initial.map(|init| self.ir.get(init)) {
                    Some(IrNode::IntCst(value)) => write!(f, " = {}", value)?,
                    Some(_) => write!(f, " = {}", initial.unwrap_or(handle))?,
                    None => {}
                }
                write!(f, ")")
            }
            IrNode::ParmDecl { name, ty } => write!(f, "(parm_decl {} {})", name, ty),
            IrNode::ResultDecl { ty } => write!(f, "(result_decl {})", ty),
            IrNode::FunctionDecl {
                name, ty, external, ..
            } => {
                write!(f, "(function_decl {} {}", name, ty)?;
                if *external {
                    write!(f, " external")?;
                }
                write!(f, ")")
            }
            _ => write!(f, "{}", handle),
        }
    }

    /// Complete function definition: signature, parameters and body.
    fn function_def(
        &self,
        f: &mut fmt::Formatter<'_>,
        handle: IrHandle,
        depth: usize,
    ) -> fmt::Result {
        let IrNode::FunctionDecl {
            name,
            ty,
            params,
            body,
            ..
        } = self.ir.get(handle)
        else {
            return self.decl_ref(f, handle);
        };

        write!(f, "(function {} {}", name, ty)?;
        for param in params {
            writeln!(f)?;
            self.node(f, *param, depth + 1)?;
        }
        if let Some(body) = body {
            writeln!(f)?;
            self.node(f, *body, depth + 1)?;
        }
        write!(f, ")")
    }
}
